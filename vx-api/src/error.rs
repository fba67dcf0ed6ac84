use thiserror::Error;

/// Argument validation failures raised while building a request
///
/// Each variant names the method, the argument and its position so the log line
/// points straight at the offending call site.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Missing argument '{argument}' at position {position} of the method '{method}'")]
    MissingArgument {
        method: &'static str,
        argument: &'static str,
        position: usize,
    },

    #[error("Invalid argument type for '{argument}' at position {position} of the method '{method}' -> Expected '{expected}' and got '{actual}'")]
    TypeMismatch {
        method: &'static str,
        argument: &'static str,
        position: usize,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("Invalid argument number value for '{argument}' at position {position} of the method '{method}' -> The minimum value is {min}, got {value}")]
    BelowMinimum {
        method: &'static str,
        argument: &'static str,
        position: usize,
        min: f64,
        value: f64,
    },

    #[error("Invalid argument number value for '{argument}' at position {position} of the method '{method}' -> The maximum value is {max}, got {value}")]
    AboveMaximum {
        method: &'static str,
        argument: &'static str,
        position: usize,
        max: f64,
        value: f64,
    },

    #[error("Invalid argument value for '{argument}' at position {position} of the method '{method}' -> {value} is not one of {allowed:?}")]
    NotAllowed {
        method: &'static str,
        argument: &'static str,
        position: usize,
        value: String,
        allowed: &'static [&'static str],
    },

    #[error("Argument '{argument}' at position {position} of the method '{method}' has no wire representation")]
    Unserializable {
        method: &'static str,
        argument: &'static str,
        position: usize,
    },
}

impl ValidationError {
    /// The method whose call failed validation
    pub fn method(&self) -> &'static str {
        match self {
            Self::MissingArgument { method, .. }
            | Self::TypeMismatch { method, .. }
            | Self::BelowMinimum { method, .. }
            | Self::AboveMaximum { method, .. }
            | Self::NotAllowed { method, .. }
            | Self::Unserializable { method, .. } => method,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Self::MissingArgument { .. })
    }
}

/// A malformed static model entry
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("INVALID MODEL: an operation has an empty method name")]
    EmptyMethod,

    #[error("INVALID MODEL: the method '{method}' has an empty {field}")]
    EmptyField {
        method: &'static str,
        field: &'static str,
    },

    #[error("INVALID MODEL: property #{index} of the method '{method}' has no name")]
    UnnamedProperty { method: &'static str, index: usize },

    #[error("INVALID MODEL: the argument '{argument}' of the method '{method}' has a minimum greater than its maximum")]
    InvertedBounds {
        method: &'static str,
        argument: &'static str,
    },

    #[error("INVALID MODEL: the argument '{argument}' of the method '{method}' whitelists values but does not expect a string")]
    WhitelistOnNonString {
        method: &'static str,
        argument: &'static str,
    },

    #[error("INVALID MODEL: the range argument '{argument}' of the method '{method}' cannot carry numeric bounds")]
    BoundedRange {
        method: &'static str,
        argument: &'static str,
    },
}

/// Why a request could not be built
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BuildError {
    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Argument(#[from] ValidationError),
}

/// Type alias for request building results
pub type Result<T> = std::result::Result<T, BuildError>;
