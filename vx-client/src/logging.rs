//! Logging infrastructure for the VX client
//!
//! Output is driven by a colon-separated watcher spec such as
//! `"error:warning:input:output"`. Each watcher is an independent switch:
//! enabling warnings does not enable errors, and wire traffic is shown only
//! when its direction is watched.

use std::fmt;

use tracing::{Level, Metadata};
use tracing_subscriber::{filter::filter_fn, fmt as fmt_layer, Layer, Registry};

/// Target of every line received from the server
pub const WIRE_INPUT: &str = "vx_client::wire::input";
/// Target of every frame written to the server
pub const WIRE_OUTPUT: &str = "vx_client::wire::output";

/// Logging configuration error
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Failed to initialize tracing subscriber: {0}")]
    TracingInit(String),

    #[error("Invalid environment variable: {0}")]
    InvalidEnv(String),
}

/// Which kinds of log output are shown
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogWatchers {
    pub error: bool,
    pub warning: bool,
    pub input: bool,
    pub output: bool,
    /// Annotate output with source file and line
    pub trace: bool,
}

impl LogWatchers {
    /// Parse a watcher spec; unknown and blank segments are ignored
    pub fn parse(spec: &str) -> Self {
        let mut watchers = Self::default();
        for item in spec.split(':').map(str::trim).filter(|item| !item.is_empty()) {
            match item.to_lowercase().as_str() {
                "error" | "errors" | "err" => watchers.error = true,
                "warning" | "warnings" | "warn" => watchers.warning = true,
                "input" | "in" | "request" | "req" => watchers.input = true,
                "output" | "out" | "response" | "res" => watchers.output = true,
                "trace" | "stack" | "stack trace" | "stacktrace" => watchers.trace = true,
                "all" => watchers = Self::all(),
                _ => {}
            }
        }
        watchers
    }

    pub fn all() -> Self {
        Self { error: true, warning: true, input: true, output: true, trace: true }
    }

    pub fn is_silent(&self) -> bool {
        !(self.error || self.warning || self.input || self.output)
    }

    /// Whether an event with this metadata passes the switches
    pub fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        match metadata.target() {
            WIRE_INPUT => self.input,
            WIRE_OUTPUT => self.output,
            _ => match *metadata.level() {
                Level::ERROR => self.error,
                Level::WARN => self.warning,
                _ => false,
            },
        }
    }
}

impl fmt::Display for LogWatchers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = [
            (self.error, "error"),
            (self.warning, "warning"),
            (self.input, "input"),
            (self.output, "output"),
            (self.trace, "trace"),
        ];
        let enabled: Vec<&str> = names.iter().filter(|(on, _)| *on).map(|(_, name)| *name).collect();
        f.write_str(&enabled.join(":"))
    }
}

/// Install a global subscriber that honours `watchers`
///
/// A silent spec installs nothing. Installing twice reports
/// [`LoggingError::TracingInit`].
pub fn init_logging(watchers: LogWatchers) -> Result<(), LoggingError> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    if watchers.is_silent() {
        return Ok(());
    }

    let layer = fmt_layer::layer()
        .with_writer(std::io::stderr)
        .with_target(watchers.input || watchers.output)
        .with_file(watchers.trace)
        .with_line_number(watchers.trace)
        .compact()
        .with_filter(filter_fn(move |metadata| watchers.enabled(metadata)));

    Registry::default()
        .with(layer)
        .try_init()
        .map_err(|e| LoggingError::TracingInit(e.to_string()))
}

/// Initialize logging from the `VX_LOG` environment variable
///
/// An unset variable leaves logging silent.
pub fn init_logging_from_env() -> Result<(), LoggingError> {
    match std::env::var("VX_LOG") {
        Ok(spec) => init_logging(LogWatchers::parse(&spec)),
        Err(std::env::VarError::NotPresent) => Ok(()),
        Err(e) => Err(LoggingError::InvalidEnv(format!("VX_LOG: {}", e))),
    }
}

/// Check if a global subscriber has been installed
pub fn is_initialized() -> bool {
    tracing::dispatcher::has_been_set()
}
