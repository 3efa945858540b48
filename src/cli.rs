// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `animdag`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "animdag",
    version,
    about = "Play a choreography of animations in dependency order.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the choreography file (TOML).
    ///
    /// Default: `Choreography.toml` in the current working directory.
    #[arg(long, value_name = "PATH", default_value = "Choreography.toml")]
    pub config: String,

    /// Parse + validate, print the play order and edges, but don't play.
    #[arg(long)]
    pub dry_run: bool,

    /// Frame period in milliseconds.
    #[arg(
        long,
        value_name = "N",
        default_value_t = 16,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub frame_ms: u64,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `ANIMDAG_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let args = CliArgs::try_parse_from(["animdag"]).unwrap();
        assert_eq!(args.config, "Choreography.toml");
        assert_eq!(args.frame_ms, 16);
        assert!(!args.dry_run);
        assert!(args.log_level.is_none());
    }

    #[test]
    fn zero_frame_period_is_rejected() {
        assert!(CliArgs::try_parse_from(["animdag", "--frame-ms", "0"]).is_err());
    }
}
