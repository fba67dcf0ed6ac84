//! The public client: one TCP session to a VX engine

use std::sync::Arc;

use lwcp_parser::{LineParser, LwcpParser, Properties};
use tokio::sync::broadcast;
use tracing::{debug, error, warn};
use vx_api::{apply_expectations, build_request, catalog, ArgValue, OperationSpec, Request};

use crate::config::ClientConfig;
use crate::connection::{send_frame, Shared};
use crate::correlation::{Ticket, WaiterKey, WaiterOutcome};
use crate::error::{ClientError, Result};
use crate::event::ClientEvent;
use crate::logging::{self, LogWatchers};
use crate::session::Session;

/// What a completed call produced
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// The request was written; the operation has no reply
    Sent,
    /// The decoded reply properties
    Props(Properties),
}

impl Reply {
    pub fn props(&self) -> Option<&Properties> {
        match self {
            Reply::Props(props) => Some(props),
            Reply::Sent => None,
        }
    }

    pub fn into_props(self) -> Properties {
        match self {
            Reply::Props(props) => props,
            Reply::Sent => Properties::new(),
        }
    }
}

/// Client for the LWCP control port of a Telos VX engine
///
/// Cloning is cheap; clones share the connection, so calls can be issued
/// concurrently from several tasks.
///
/// ```rust,no_run
/// use vx_client::{Client, ClientConfig};
///
/// # async fn run() -> vx_client::Result<()> {
/// let client = Client::new(ClientConfig::for_host("192.168.0.20"))?;
/// client.connect_login_select().await?;
/// let line = client.get_line(1).await?;
/// println!("{:?}", line.get("state"));
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    config: ClientConfig,
    shared: Arc<Shared>,
}

impl Client {
    pub fn new(config: ClientConfig) -> Result<Self> {
        Self::with_parser(config, Arc::new(LwcpParser))
    }

    /// Use a different line parser for inbound traffic
    pub fn with_parser(config: ClientConfig, parser: Arc<dyn LineParser>) -> Result<Self> {
        config.validate().map_err(log_error)?;
        if let Some(spec) = &config.log {
            if !logging::is_initialized() {
                if let Err(e) = logging::init_logging(LogWatchers::parse(spec)) {
                    warn!("Log watchers not installed: {}", e);
                }
            }
        }
        let shared = Arc::new(Shared::new(parser, config.event_capacity));
        Ok(Self { config, shared })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Snapshot of the current session state
    pub fn session(&self) -> Session {
        self.shared.core.lock().session.clone()
    }

    pub fn is_connected(&self) -> bool {
        self.shared.core.lock().session.is_connected()
    }

    pub fn is_authenticated(&self) -> bool {
        self.shared.core.lock().session.authenticated
    }

    pub fn is_studio_selected(&self) -> bool {
        self.shared.core.lock().session.studio_selected
    }

    /// Number of calls currently waiting for a reply
    pub fn pending_requests(&self) -> usize {
        self.shared.core.lock().correlator.pending_count()
    }

    /// Receive every unsolicited notification from now on
    pub fn subscribe(&self) -> broadcast::Receiver<ClientEvent> {
        self.shared.events.subscribe()
    }

    pub fn set_host(&mut self, host: &str) {
        if host.is_empty() {
            warn!("Ignoring empty host");
            return;
        }
        self.config.host = Some(host.to_string());
    }

    pub fn set_port(&mut self, port: u16) {
        if port == 0 {
            warn!("Ignoring port 0");
            return;
        }
        self.config.port = port;
    }

    pub fn set_studio_id(&mut self, studio_id: u32) {
        if studio_id == 0 {
            warn!("Ignoring studio id 0");
            return;
        }
        self.config.studio_id = studio_id;
    }

    pub fn set_username(&mut self, username: &str) {
        if username.is_empty() {
            warn!("Ignoring empty username");
            return;
        }
        self.config.username = username.to_string();
    }

    pub fn set_password(&mut self, password: &str) {
        if password.is_empty() {
            warn!("Ignoring empty password");
            return;
        }
        self.config.password = password.to_string();
    }

    /// Open the connection, giving up after the configured connect timeout
    pub async fn connect(&self) -> Result<()> {
        let Some(host) = self.config.host.as_deref() else {
            return Err(log_error(ClientError::HostNotSet));
        };
        self.shared
            .connect(host, self.config.port, self.config.connect_timeout)
            .await
            .map_err(|e| match e {
                // connect_within already logged these
                ClientError::ConnectTimeout(_) | ClientError::Io(_) => e,
                other => log_error(other),
            })
    }

    /// Close the connection; pending calls fail with [`ClientError::Disconnected`]
    pub async fn disconnect(&self) {
        self.shared.disconnect().await;
    }

    /// Connect, log in with the configured credentials and select the configured studio
    pub async fn connect_login_select(&self) -> Result<()> {
        if self.config.host.is_none() {
            return Err(log_error(ClientError::HostNotSet));
        }
        self.connect().await?;
        if !self.login(&self.config.username, &self.config.password).await? {
            return Err(log_error(ClientError::LoginRejected));
        }
        self.select_studio(self.config.studio_id).await?;
        Ok(())
    }

    /// Invoke a catalog operation by method name
    pub async fn call_method(&self, method: &str, args: &[Option<ArgValue>]) -> Result<Reply> {
        match catalog::lookup(method) {
            Some(spec) => self.call(spec, args).await,
            None => Err(log_error(ClientError::UnknownMethod(method.to_string()))),
        }
    }

    /// Build, send and, when the operation has one, await the reply
    ///
    /// Gates are checked before anything is written. The wait is bounded by the
    /// configured request timeout; dropping the returned future deregisters the
    /// waiter.
    pub async fn call(&self, spec: &OperationSpec, args: &[Option<ArgValue>]) -> Result<Reply> {
        // held from waiter registration through the write
        let mut writer = self.shared.lock_writer().await;
        let (request, waiter) = self.prepare(spec, args).map_err(log_error)?;
        let frame = request.to_wire();

        let Some((ticket, rx)) = waiter else {
            send_frame(&mut writer, &frame).await.map_err(log_error)?;
            return Ok(Reply::Sent);
        };

        let _pending = PendingReply { shared: &self.shared, ticket };
        send_frame(&mut writer, &frame).await.map_err(log_error)?;
        drop(writer);

        let outcome = match self.config.request_timeout {
            Some(limit) => match tokio::time::timeout(limit, rx).await {
                Ok(outcome) => outcome,
                Err(_) => {
                    return Err(log_error(ClientError::ReplyTimeout { method: spec.method, timeout: limit }));
                }
            },
            None => rx.await,
        };

        match outcome {
            Ok(WaiterOutcome::Reply(mut props)) => {
                apply_expectations(spec, &mut props);
                Ok(Reply::Props(props))
            }
            Ok(WaiterOutcome::Rejected(message)) => Err(log_error(ClientError::Rejected(message))),
            Ok(WaiterOutcome::Disconnected) | Err(_) => Err(log_error(ClientError::Disconnected)),
        }
    }

    /// Every check that can refuse a call, then waiter registration, under one lock
    fn prepare(
        &self,
        spec: &OperationSpec,
        args: &[Option<ArgValue>],
    ) -> Result<(Request, Option<(Ticket, tokio::sync::oneshot::Receiver<WaiterOutcome>)>)> {
        spec.validate()?;

        let mut core = self.shared.core.lock();
        core.session.check_gates(spec)?;
        let request = build_request(spec, args)?;
        core.session.check_line_state(spec, request.id.as_deref())?;
        if !core.session.is_connected() {
            return Err(ClientError::NotConnected);
        }

        let waiter = WaiterKey::for_request(spec, &request)
            .map(|key| core.correlator.register(key, spec.error_channel));
        debug!("Prepared '{}': {}", spec.method, request);
        Ok((request, waiter))
    }
}

/// Deregisters the waiter if the call ends before its reply arrives
struct PendingReply<'a> {
    shared: &'a Shared,
    ticket: Ticket,
}

impl Drop for PendingReply<'_> {
    fn drop(&mut self) {
        self.shared.core.lock().correlator.cancel(self.ticket);
    }
}

fn log_error(error: ClientError) -> ClientError {
    error!("{}", error);
    error
}

#[cfg(test)]
mod tests {
    use super::*;
    use vx_api::args;

    #[test]
    fn test_setters_ignore_invalid_values() {
        let mut client = Client::new(ClientConfig::default()).unwrap();
        client.set_host("");
        client.set_port(0);
        client.set_studio_id(0);
        client.set_username("");
        client.set_password("");
        assert!(client.config().host.is_none());
        assert_eq!(client.config().port, 20518);
        assert_eq!(client.config().studio_id, 1);
        assert_eq!(client.config().username, "user");

        client.set_host("10.1.1.1");
        client.set_port(20519);
        client.set_studio_id(4);
        client.set_password("pw");
        assert_eq!(client.config().host.as_deref(), Some("10.1.1.1"));
        assert_eq!(client.config().port, 20519);
        assert_eq!(client.config().studio_id, 4);
        assert_eq!(client.config().password, "pw");
    }

    #[test]
    fn test_invalid_config_is_refused() {
        let result = Client::new(ClientConfig::default().with_port(0));
        assert!(matches!(result, Err(ClientError::InvalidConfig(_))));
    }

    #[tokio::test]
    async fn test_connect_without_host() {
        let client = Client::new(ClientConfig::default()).unwrap();
        assert!(matches!(client.connect().await, Err(ClientError::HostNotSet)));
        assert!(matches!(client.connect_login_select().await, Err(ClientError::HostNotSet)));
    }

    #[tokio::test]
    async fn test_gates_before_connection() {
        let client = Client::new(ClientConfig::default()).unwrap();
        let result = client.call_method("get_line", &args![1u32]).await;
        assert!(matches!(result, Err(ClientError::LoginRequired { method: "get_line" })));

        let result = client.call_method("get_server", &args![]).await;
        assert!(matches!(result, Err(ClientError::NotConnected)));

        let result = client.call_method("no_such_method", &args![]).await;
        assert!(matches!(result, Err(ClientError::UnknownMethod(_))));
        assert_eq!(client.pending_requests(), 0);
    }
}
