//! Available subcommands.

use clap::Subcommand;

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Take over the instance role and hold it until replaced or interrupted
    Run,

    /// Ask the running instance to shut down without taking its place
    Signal {
        /// Send only the bare command understood by older builds
        #[arg(long)]
        legacy: bool,
    },

    /// Report whether an instance is listening on the instance port
    Status,
}
