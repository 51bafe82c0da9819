//! Main CLI parser and top-level argument handling.
//!
//! Endpoint options are global so every subcommand talks to the same port.

use std::net::IpAddr;
use std::path::PathBuf;

use arbiter_core::Settings;
use clap::Parser;

use crate::commands::Commands;

/// Single-instance arbiter.
///
/// Running without a subcommand is the same as `arbiter run`.
#[derive(Parser, Debug)]
#[command(name = "arbiter")]
#[command(about = "Keep one instance running, replacing an older one on startup")]
#[command(version)]
pub struct Cli {
    /// Settings file to use instead of the default location
    #[arg(long = "config", env = "ARBITER_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Loopback address of the instance port
    #[arg(long, env = "ARBITER_HOST", global = true)]
    pub host: Option<IpAddr>,

    /// Port used as the instance lock
    #[arg(long, env = "ARBITER_PORT", global = true)]
    pub port: Option<u16>,

    /// Shared token carried by the takeover command
    #[arg(long, env = "ARBITER_TOKEN", hide_env_values = true, global = true)]
    pub token: Option<String>,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Settings given on the command line or through the environment.
    pub fn overrides(&self) -> Settings {
        Settings {
            host: self.host,
            port: self.port,
            token: self.token.clone(),
        }
    }

    /// The requested subcommand, `run` when none was given.
    pub fn subcommand_or_default(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Run)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::net::Ipv4Addr;

    #[test]
    fn test_cli_parser_builds() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults_to_run() {
        let cli = Cli::parse_from(["arbiter"]);
        assert_eq!(cli.subcommand_or_default(), Commands::Run);
    }

    #[test]
    fn test_global_args_after_subcommand() {
        let cli = Cli::parse_from([
            "arbiter", "signal", "--legacy", "--port", "40000", "--host", "127.0.0.1", "-v",
        ]);
        assert!(cli.verbose);
        assert_eq!(cli.subcommand_or_default(), Commands::Signal { legacy: true });

        let overrides = cli.overrides();
        assert_eq!(overrides.port, Some(40000));
        assert_eq!(overrides.host, Some(IpAddr::V4(Ipv4Addr::LOCALHOST)));
    }

    #[test]
    fn test_rejects_invalid_port() {
        assert!(Cli::try_parse_from(["arbiter", "--port", "70000"]).is_err());
        assert!(Cli::try_parse_from(["arbiter", "--host", "localhost"]).is_err());
    }
}
