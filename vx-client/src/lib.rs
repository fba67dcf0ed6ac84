//! # vx-client
//!
//! Async client for the LWCP control port of Telos VX talkshow systems.
//!
//! One [`Client`] owns one TCP session. Requests are described by the static
//! catalog in [`vx_api`], validated and rendered before anything is written,
//! and matched to their replies on the shared stream by the
//! [`correlation`] table. Unsolicited studio, line, book and show changes are
//! broadcast to [`Client::subscribe`] receivers.
//!
//! ```rust,no_run
//! use vx_client::{CallOptions, Client, ClientConfig, ClientEvent};
//!
//! # async fn run() -> vx_client::Result<()> {
//! let client = Client::new(ClientConfig::for_host("192.168.0.20").with_log("error:warning"))?;
//! let mut events = client.subscribe();
//! client.connect_login_select().await?;
//!
//! client.call_line(2, "5550100", CallOptions::default()).await?;
//! while let Ok(event) = events.recv().await {
//!     if let ClientEvent::LineChanged { line, props } = event {
//!         println!("line {} -> {:?}", line, props.get("state"));
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
mod connection;
pub mod correlation;
pub mod dispatch;
pub mod error;
pub mod event;
pub mod logging;
pub mod methods;
pub mod session;

pub use client::{Client, Reply};
pub use config::{ClientConfig, DEFAULT_PORT};
pub use error::{ClientError, ErrorKind, Result};
pub use event::ClientEvent;
pub use logging::{init_logging, init_logging_from_env, LogWatchers, LoggingError};
pub use methods::{CallOptions, FromReply, RecordFields, TakeOptions};
pub use session::{ConnectionState, Session};

pub use lwcp_parser::{Properties, Value};
pub use vx_api::{args, catalog, ArgValue, ErrorChannel, OperationSpec};
