//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

use atlas_cli::CliError;

fn main() -> eyre::Result<()> {
    atlas_cli::init_logging()?;
    match atlas_cli::run() {
        // Help and version requests exit through clap with its own status.
        Err(CliError::ArgumentParsing(err)) => err.exit(),
        result => Ok(result?),
    }
}
