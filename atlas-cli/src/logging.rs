//! Log output for the Atlas CLI.
//!
//! Library crates log through the `log` facade. The subscriber installed
//! here bridges those records into `tracing` and writes them to stderr so
//! stdout stays reserved for the JSON report.

use tracing_subscriber::{EnvFilter, fmt::MakeWriter};

use crate::CliError;

/// Environment variable holding an `EnvFilter` directive, e.g. `info`.
pub(crate) const ENV_LOG: &str = "ATLAS_LOG";

/// Directive used when `ATLAS_LOG` is unset or invalid.
pub(crate) const DEFAULT_FILTER: &str = "warn";

/// Install the process-wide subscriber writing to stderr.
///
/// # Errors
/// Returns [`CliError::Logging`] when a logger is already installed.
pub fn init_logging() -> Result<(), CliError> {
    install(std::io::stderr)
}

pub(crate) fn install<W>(writer: W) -> Result<(), CliError>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let filter =
        EnvFilter::try_from_env(ENV_LOG).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .try_init()
        .map_err(CliError::Logging)
}
