//! CLI entry point.
//!
//! Loads `.env`, parses arguments, resolves settings and dispatches to a
//! handler. Errors become sysexits-style exit codes.

use std::process::ExitCode;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use arbiter_cli::{Cli, CliConfig, CliError, Commands, handlers};

/// Log to stderr so command output on stdout stays clean.
///
/// `RUST_LOG` picks the filter, defaulting to `info`; `--verbose` forces `debug`.
fn init_tracing(verbose: bool) {
    let env_filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .compact()
        .try_init()
        .ok();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = CliConfig::load(cli.config.as_deref(), &cli.overrides())?;
    debug!(source = ?config.source, endpoint = %config.settings.endpoint(), "Resolved settings");

    match cli.subcommand_or_default() {
        Commands::Run => handlers::run::execute(&config.settings).await,
        Commands::Signal { legacy } => handlers::signal::execute(&config.settings, legacy).await,
        Commands::Status => handlers::status::execute(&config.settings).await,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Before parsing, so ARBITER_* values in .env reach clap
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}
