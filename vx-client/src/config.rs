//! Configuration for a [`Client`](crate::Client)

use std::time::Duration;

use crate::error::ClientError;

/// Well-known LWCP control port of a VX engine
pub const DEFAULT_PORT: u16 = 20518;

/// Connection and session settings
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Address of the VX engine; required before connecting
    pub host: Option<String>,

    /// Default: 20518
    pub port: u16,

    /// Studio selected by `connect_login_select`
    /// Default: 1
    pub studio_id: u32,

    /// Default: "user"
    pub username: String,

    /// Default: empty
    pub password: String,

    /// Colon-separated log watchers, e.g. `"error:warning:input"`
    pub log: Option<String>,

    /// Default: 5 seconds
    pub connect_timeout: Duration,

    /// Upper bound on the wait for a correlated reply; `None` waits forever
    /// Default: 30 seconds
    pub request_timeout: Option<Duration>,

    /// Buffer size of the event broadcast channel
    /// Default: 256
    pub event_capacity: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: None,
            port: DEFAULT_PORT,
            studio_id: 1,
            username: "user".to_string(),
            password: String::new(),
            log: None,
            connect_timeout: Duration::from_secs(5),
            request_timeout: Some(Duration::from_secs(30)),
            event_capacity: 256,
        }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for a config pointing at `host` with every other default
    pub fn for_host(host: impl Into<String>) -> Self {
        Self::default().with_host(host)
    }

    /// Validate the configuration and return any issues
    pub fn validate(&self) -> Result<(), ClientError> {
        if matches!(self.host.as_deref(), Some("")) {
            return Err(ClientError::InvalidConfig("Host must not be empty".to_string()));
        }
        if self.port == 0 {
            return Err(ClientError::InvalidConfig("Port must be greater than 0".to_string()));
        }
        if self.studio_id == 0 {
            return Err(ClientError::InvalidConfig("Studio id must be greater than 0".to_string()));
        }
        if self.connect_timeout == Duration::ZERO {
            return Err(ClientError::InvalidConfig(
                "Connect timeout must be greater than 0".to_string(),
            ));
        }
        if self.request_timeout == Some(Duration::ZERO) {
            return Err(ClientError::InvalidConfig(
                "Request timeout must be greater than 0".to_string(),
            ));
        }
        if self.event_capacity == 0 {
            return Err(ClientError::InvalidConfig(
                "Event capacity must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_studio(mut self, studio_id: u32) -> Self {
        self.studio_id = studio_id;
        self
    }

    pub fn with_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = username.into();
        self.password = password.into();
        self
    }

    pub fn with_log(mut self, watchers: impl Into<String>) -> Self {
        self.log = Some(watchers.into());
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.port, 20518);
        assert_eq!(config.studio_id, 1);
        assert_eq!(config.username, "user");
        assert_eq!(config.password, "");
        assert_eq!(config.connect_timeout, Duration::from_secs(5));
        assert!(config.host.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        assert!(ClientConfig::default().with_host("").validate().is_err());
        assert!(ClientConfig::default().with_port(0).validate().is_err());
        assert!(ClientConfig::default().with_studio(0).validate().is_err());
        assert!(ClientConfig::default()
            .with_connect_timeout(Duration::ZERO)
            .validate()
            .is_err());
        assert!(ClientConfig::default()
            .with_request_timeout(Some(Duration::ZERO))
            .validate()
            .is_err());
        assert!(ClientConfig::default().with_event_capacity(0).validate().is_err());
        assert!(ClientConfig::default().with_request_timeout(None).validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = ClientConfig::for_host("10.0.0.5")
            .with_port(20519)
            .with_studio(3)
            .with_credentials("producer", "secret")
            .with_log("error:warn");

        assert_eq!(config.host.as_deref(), Some("10.0.0.5"));
        assert_eq!(config.port, 20519);
        assert_eq!(config.studio_id, 3);
        assert_eq!(config.username, "producer");
        assert_eq!(config.log.as_deref(), Some("error:warn"));
        assert!(config.validate().is_ok());
    }
}
