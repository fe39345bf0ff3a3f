//! Command-line interface for the Atlas BAG import.
#![forbid(unsafe_code)]
#![warn(missing_docs)]

use clap::{Parser, Subcommand};

mod error;
mod import;
mod logging;

pub use error::CliError;
pub use import::DEFAULT_BATCH_SIZE;
pub use logging::init_logging;
use import::{ImportArgs, run_import};

pub(crate) const ARG_DIVA_DIR: &str = "diva-dir";
pub(crate) const ARG_DATABASE: &str = "database";
pub(crate) const ARG_BATCH_SIZE: &str = "batch-size";
pub(crate) const ENV_DIVA_DIR: &str = "ATLAS_CMDS_IMPORT_DIVA_DIR";

/// Run the Atlas CLI with the current process arguments and environment.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Import(args) => run_import(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "atlas",
    about = "Import BAG and gebieden deliveries into a relational store",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Import a complete diva delivery.
    Import(ImportArgs),
}

#[cfg(test)]
mod tests;
