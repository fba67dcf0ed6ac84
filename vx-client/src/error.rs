//! Error types for the vx-client crate

use std::time::Duration;

use vx_api::{BuildError, ModelError, ValidationError};

/// Broad failure categories, mirroring how each failure is handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed static model entry or client configuration
    Configuration,
    /// A login, studio or line-state gate was not met; nothing was sent
    Precondition,
    /// A caller argument could not be used
    Argument,
    /// The far end rejected the request
    Protocol,
    /// Socket-level failure
    Transport,
}

/// Errors returned by [`Client`](crate::Client) operations
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Unknown method '{0}'")]
    UnknownMethod(String),

    #[error("The method '{method}' requires authentication. Please login first.")]
    LoginRequired { method: &'static str },

    #[error("The method '{method}' requires a selected studio. Please select a studio first.")]
    StudioRequired { method: &'static str },

    #[error("The method '{method}' cannot run while line {line} is {state}")]
    LineState {
        method: &'static str,
        line: String,
        state: String,
    },

    #[error(transparent)]
    Argument(#[from] ValidationError),

    #[error("Request rejected by the server: {0}")]
    Rejected(String),

    #[error("The server refused the login")]
    LoginRejected,

    #[error("The host address has not been set")]
    HostNotSet,

    #[error("Failed to connect to the server within {0:?}")]
    ConnectTimeout(Duration),

    #[error("Socket error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Not connected to the server")]
    NotConnected,

    #[error("Already connected or connecting to the server")]
    AlreadyConnected,

    #[error("No reply to '{method}' within {timeout:?}")]
    ReplyTimeout {
        method: &'static str,
        timeout: Duration,
    },

    #[error("The connection closed before a reply arrived")]
    Disconnected,
}

impl ClientError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::Model(_)
            | ClientError::InvalidConfig(_)
            | ClientError::UnknownMethod(_)
            | ClientError::HostNotSet => ErrorKind::Configuration,
            ClientError::LoginRequired { .. }
            | ClientError::StudioRequired { .. }
            | ClientError::LineState { .. }
            | ClientError::NotConnected
            | ClientError::AlreadyConnected => ErrorKind::Precondition,
            ClientError::Argument(_) => ErrorKind::Argument,
            ClientError::Rejected(_) | ClientError::LoginRejected | ClientError::ReplyTimeout { .. } => {
                ErrorKind::Protocol
            }
            ClientError::ConnectTimeout(_) | ClientError::Io(_) | ClientError::Disconnected => {
                ErrorKind::Transport
            }
        }
    }
}

impl From<BuildError> for ClientError {
    fn from(error: BuildError) -> Self {
        match error {
            BuildError::Model(e) => ClientError::Model(e),
            BuildError::Argument(e) => ClientError::Argument(e),
        }
    }
}

/// Convenience type alias for Results using ClientError
pub type Result<T> = std::result::Result<T, ClientError>;
