//! Command-line arguments and their conversion into a client configuration

use std::time::Duration;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use vx_client::{ClientConfig, DEFAULT_PORT};

/// Talk to a Telos VX engine over its LWCP control port
///
/// Every command prints JSON on stdout. Diagnostics go to stderr and are
/// selected with `--log` (`error:warning:input:output:trace`, or `all`).
#[derive(Parser, Debug)]
#[command(name = "vx")]
#[command(about = "Telos VX control-port client")]
#[command(version)]
pub struct Args {
    /// Engine address
    #[arg(long, env = "VX_HOST")]
    pub host: String,

    /// LWCP control port
    #[arg(short, long, env = "VX_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Studio selected after login
    #[arg(short, long, env = "VX_STUDIO", default_value_t = 1)]
    pub studio: u32,

    #[arg(short, long, env = "VX_USER", default_value = "user")]
    pub user: String,

    #[arg(long, env = "VX_PASSWORD", default_value = "", hide_env_values = true)]
    pub password: String,

    /// Log watchers, e.g. `error:warning` or `all`
    #[arg(long, env = "VX_LOG")]
    pub log: Option<String>,

    /// Seconds to wait for each reply; 0 waits forever
    #[arg(long, default_value_t = 5)]
    pub timeout: u64,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Round trip through the engine and report the latency
    Ping,
    /// Server identity and capabilities
    Server,
    /// Studios known to the engine
    Studios,
    /// Lines of the selected studio
    Lines,
    /// State of one line
    Line { line: u32 },
    /// Dial a number on a line
    Call {
        line: u32,
        number: String,
        /// Use the handset instead of the hybrid
        #[arg(long)]
        handset: bool,
        #[arg(long)]
        hybrid: Option<u32>,
    },
    /// Hang up a line
    Drop { line: u32 },
    /// Phone book records
    Records {
        #[arg(long, requires = "to")]
        from: Option<u32>,
        #[arg(long, requires = "from")]
        to: Option<u32>,
    },
    /// Call log entries
    Log {
        #[arg(long, requires = "to")]
        from: Option<u32>,
        #[arg(long, requires = "from")]
        to: Option<u32>,
    },
    /// Print every unsolicited change until interrupted
    Watch,
    /// Invoke any catalog operation; each argument is a JSON value
    Raw {
        method: String,
        #[arg(allow_hyphen_values = true)]
        args: Vec<String>,
    },
}

impl Command {
    /// Range argument shared by `records` and `log`
    pub fn range(from: Option<u32>, to: Option<u32>) -> Result<Option<(u32, u32)>> {
        match (from, to) {
            (Some(from), Some(to)) if from > to => bail!("Invalid range: from ({}) > to ({})", from, to),
            (Some(from), Some(to)) => Ok(Some((from, to))),
            _ => Ok(None),
        }
    }
}

impl Args {
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            bail!("Host must not be empty");
        }
        if self.port == 0 {
            bail!("Port must be in 1..=65535");
        }
        if self.studio == 0 {
            bail!("Studio id must be at least 1");
        }
        match &self.command {
            Command::Records { from, to } | Command::Log { from, to } => {
                Command::range(*from, *to)?;
            }
            Command::Line { line } | Command::Call { line, .. } | Command::Drop { line } if *line == 0 => {
                bail!("Line numbers start at 1");
            }
            _ => {}
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        (self.timeout > 0).then(|| Duration::from_secs(self.timeout))
    }
}

impl From<&Args> for ClientConfig {
    fn from(args: &Args) -> Self {
        let config = ClientConfig::for_host(args.host.trim())
            .with_port(args.port)
            .with_studio(args.studio)
            .with_credentials(args.user.as_str(), args.password.as_str())
            .with_request_timeout(args.request_timeout());
        match &args.log {
            Some(watchers) => config.with_log(watchers.as_str()),
            None => config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use vx_client::LogWatchers;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_defaults() {
        let args = parse(&["vx", "--host", "10.0.0.5", "ping"]);
        assert_eq!(args.port, DEFAULT_PORT);
        assert_eq!(args.studio, 1);
        assert_eq!(args.user, "user");
        assert_eq!(args.password, "");
        assert_eq!(args.command, Command::Ping);
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_config_from_args() {
        let args = parse(&[
            "vx", "--host", " 10.0.0.5 ", "--port", "4000", "--studio", "3", "--user", "producer",
            "--password", "secret", "--log", "all", "--timeout", "0", "lines",
        ]);
        let config = ClientConfig::from(&args);
        assert_eq!(config.host.as_deref(), Some("10.0.0.5"));
        assert_eq!(config.port, 4000);
        assert_eq!(config.studio_id, 3);
        assert_eq!(config.username, "producer");
        assert_eq!(config.password, "secret");
        assert_eq!(config.log.as_deref(), Some("all"));
        assert_eq!(config.log.as_deref().map(LogWatchers::parse), Some(LogWatchers::all()));
        assert_eq!(config.request_timeout, None);
    }

    #[rstest]
    #[case(&["vx", "--host", "h", "line", "2"], Command::Line { line: 2 })]
    #[case(&["vx", "--host", "h", "drop", "4"], Command::Drop { line: 4 })]
    #[case(
        &["vx", "--host", "h", "call", "1", "5550100", "--hybrid", "2"],
        Command::Call { line: 1, number: "5550100".into(), handset: false, hybrid: Some(2) }
    )]
    #[case(&["vx", "--host", "h", "log", "--from", "0", "--to", "9"], Command::Log { from: Some(0), to: Some(9) })]
    #[case(
        &["vx", "--host", "h", "raw", "set_busy_all", "true"],
        Command::Raw { method: "set_busy_all".into(), args: vec!["true".into()] }
    )]
    fn test_subcommands(#[case] argv: &[&str], #[case] expected: Command) {
        assert_eq!(parse(argv).command, expected);
    }

    #[test]
    fn test_raw_accepts_negative_numbers() {
        let args = parse(&["vx", "--host", "h", "raw", "drop_line", "-1"]);
        assert_eq!(args.command, Command::Raw { method: "drop_line".into(), args: vec!["-1".into()] });
    }

    #[test]
    fn test_range_needs_both_ends() {
        assert!(Args::try_parse_from(["vx", "--host", "h", "records", "--from", "3"]).is_err());
    }

    #[rstest]
    #[case(&["vx", "--host", "", "ping"])]
    #[case(&["vx", "--host", "h", "--studio", "0", "ping"])]
    #[case(&["vx", "--host", "h", "line", "0"])]
    #[case(&["vx", "--host", "h", "records", "--from", "9", "--to", "3"])]
    fn test_validate_rejects(#[case] argv: &[&str]) {
        assert!(parse(argv).validate().is_err());
    }
}
