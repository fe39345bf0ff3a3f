//! Error types emitted by the Atlas CLI.

use std::sync::Arc;

use atlas_core::StoreError;
use atlas_data::{ConfigurationError, JobError};
use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors emitted by the Atlas CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Long flag name of the option.
        field: &'static str,
        /// Environment variable that can supply it.
        env: &'static str,
    },
    /// Batch size must allow at least one row per statement.
    #[error("{field} must be at least 1")]
    InvalidBatchSize {
        /// Long flag name of the option.
        field: &'static str,
    },
    /// The delivery root is not a directory.
    #[error("{field} path {path:?} does not exist or is not a directory")]
    MissingDivaDir {
        /// Long flag name of the option.
        field: &'static str,
        /// Configured delivery root.
        path: Utf8PathBuf,
    },
    /// The database path names a directory.
    #[error("{field} path {path:?} is a directory")]
    DatabaseIsDirectory {
        /// Long flag name of the option.
        field: &'static str,
        /// Configured database path.
        path: Utf8PathBuf,
    },
    /// The delivery is incomplete.
    #[error("invalid delivery: {0}")]
    Delivery(#[from] ConfigurationError),
    /// Opening the target database failed.
    #[error("failed to open database {path:?}: {source}")]
    OpenStore {
        /// Database path.
        path: Utf8PathBuf,
        /// Store failure.
        #[source]
        source: StoreError,
    },
    /// A task of the import failed.
    #[error("import failed: {0}")]
    Import(#[from] JobError),
    /// Serializing the import report failed.
    #[error("failed to serialize import report: {0}")]
    SerializeReport(#[source] serde_json::Error),
    /// Installing the log subscriber failed.
    #[error("failed to install log output: {0}")]
    Logging(#[source] Box<dyn std::error::Error + Send + Sync>),
    /// Writing the import report failed.
    #[error("failed to write import report: {0}")]
    WriteReport(#[source] std::io::Error),
}
