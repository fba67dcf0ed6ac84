use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::{json, Value as Json};
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};
use vx_client::catalog::{self, book, cc, line, log, studio};
use vx_client::{CallOptions, Client, ClientConfig, ClientEvent, OperationSpec};

pub mod cli;
pub mod convert;

use cli::{Args, Command};
use convert::{parse_args, props_to_json, reply_to_json};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    args.validate()?;

    let client = Client::new(ClientConfig::from(&args)).context("Invalid client configuration")?;
    let result = run(&client, &args.command).await;
    client.disconnect().await;

    let output = result?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Run one command and return the document to print
async fn run(client: &Client, command: &Command) -> Result<Json> {
    match command {
        Command::Ping => {
            open_session(client, &cc::PING).await?;
            let started = Instant::now();
            client.ping().await.context("Ping failed")?;
            Ok(json!({ "pong": true, "elapsed_ms": started.elapsed().as_millis() as u64 }))
        }
        Command::Server => {
            open_session(client, &cc::GET_SERVER).await?;
            props_to_json(&client.get_server().await?)
        }
        Command::Studios => {
            open_session(client, &cc::STUDIO_LIST).await?;
            props_to_json(&client.studio_list().await?)
        }
        Command::Lines => {
            open_session(client, &studio::LINE_LIST).await?;
            props_to_json(&client.line_list().await?)
        }
        Command::Line { line } => {
            open_session(client, &line::GET_LINE).await?;
            props_to_json(&client.get_line(*line).await?)
        }
        Command::Call { line, number, handset, hybrid } => {
            open_session(client, &line::CALL_LINE).await?;
            let options = CallOptions { handset: (*handset).then_some(true), hybrid: *hybrid, port: None };
            client.call_line(*line, number, options).await?;
            Ok(json!({ "sent": "call_line", "line": line, "number": number }))
        }
        Command::Drop { line } => {
            open_session(client, &line::DROP_LINE).await?;
            client.drop_line(*line).await?;
            Ok(json!({ "sent": "drop_line", "line": line }))
        }
        Command::Records { from, to } => {
            open_session(client, &book::RECORD_LIST).await?;
            props_to_json(&client.record_list(Command::range(*from, *to)?).await?)
        }
        Command::Log { from, to } => {
            open_session(client, &log::LOG_LIST).await?;
            props_to_json(&client.log_list(Command::range(*from, *to)?).await?)
        }
        Command::Watch => {
            client.connect_login_select().await.context("Failed to open session")?;
            watch(client).await?;
            Ok(json!({ "event": "disconnected" }))
        }
        Command::Raw { method, args } => {
            let spec = catalog::lookup(method)
                .with_context(|| format!("Unknown method '{}'", method))?;
            open_session(client, spec).await?;
            let reply = client.call(spec, &parse_args(args)).await?;
            reply_to_json(method, &reply)
        }
    }
}

/// Connect and go only as far through login and studio selection as `spec` needs
async fn open_session(client: &Client, spec: &OperationSpec) -> Result<()> {
    if spec.requires_studio {
        return client.connect_login_select().await.context("Failed to open session");
    }
    client.connect().await.context("Failed to connect")?;
    if spec.requires_login {
        let config = client.config();
        let logged = client.login(&config.username, &config.password).await.context("Login failed")?;
        if !logged {
            anyhow::bail!("Login refused for user '{}'", config.username);
        }
    }
    Ok(())
}

/// Print one JSON line per event until the engine hangs up or Ctrl+C
async fn watch(client: &Client) -> Result<()> {
    let mut events = client.subscribe();
    info!("Watching studio {}", client.config().studio_id);
    loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(ClientEvent::Disconnected) => return Ok(()),
                Ok(event) => println!("{}", serde_json::to_string(&event)?),
                Err(RecvError::Lagged(missed)) => warn!("Dropped {} events", missed),
                Err(RecvError::Closed) => return Ok(()),
            },
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted");
                return Ok(());
            }
        }
    }
}
