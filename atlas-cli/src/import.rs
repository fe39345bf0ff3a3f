//! Import command implementation for the Atlas CLI.

use std::io::Write;

use atlas_data::{BagImportConfig, BagImportJob, Job, JobReport, SqliteStore};
use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::{ARG_BATCH_SIZE, ARG_DATABASE, ARG_DIVA_DIR, CliError, ENV_DIVA_DIR};

/// Rows per insert statement unless configured otherwise.
pub const DEFAULT_BATCH_SIZE: usize = 4000;

const DEFAULT_DATABASE: &str = "atlas.sqlite";

/// CLI arguments for the `import` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Import a diva delivery (bag, bag_wkt, gebieden and \
                 gebieden_shp) into a SQLite database, replacing every \
                 imported table. Paths can come from CLI flags, \
                 configuration files, or environment variables.",
    about = "Import a BAG and gebieden delivery"
)]
#[ortho_config(prefix = "ATLAS")]
pub(crate) struct ImportArgs {
    /// Root directory of the diva delivery.
    #[arg(long = ARG_DIVA_DIR, value_name = "dir")]
    #[serde(default)]
    pub(crate) diva_dir: Option<Utf8PathBuf>,
    /// SQLite database to write (`atlas.sqlite` by default).
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
    /// Rows per insert statement.
    #[arg(long = ARG_BATCH_SIZE, value_name = "rows")]
    #[serde(default)]
    pub(crate) batch_size: Option<usize>,
}

impl ImportArgs {
    pub(crate) fn into_config(self) -> Result<ImportConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        ImportConfig::try_from(merged)
    }
}

/// Resolved `import` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ImportConfig {
    /// Root of the diva delivery.
    pub(crate) diva_dir: Utf8PathBuf,
    /// Target database.
    pub(crate) database: Utf8PathBuf,
    /// Rows per insert statement.
    pub(crate) batch_size: usize,
}

impl ImportConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        if !atlas_fs::dir_exists(&self.diva_dir) {
            return Err(CliError::MissingDivaDir {
                field: ARG_DIVA_DIR,
                path: self.diva_dir.clone(),
            });
        }
        if atlas_fs::dir_exists(&self.database) {
            return Err(CliError::DatabaseIsDirectory {
                field: ARG_DATABASE,
                path: self.database.clone(),
            });
        }
        Ok(())
    }

    fn job_config(&self) -> BagImportConfig {
        BagImportConfig {
            diva_dir: self.diva_dir.clone(),
            batch_size: self.batch_size,
        }
    }
}

impl TryFrom<ImportArgs> for ImportConfig {
    type Error = CliError;

    fn try_from(args: ImportArgs) -> Result<Self, Self::Error> {
        let diva_dir = args.diva_dir.ok_or(CliError::MissingArgument {
            field: ARG_DIVA_DIR,
            env: ENV_DIVA_DIR,
        })?;
        let database = args
            .database
            .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_DATABASE));
        let batch_size = args.batch_size.unwrap_or(DEFAULT_BATCH_SIZE);
        if batch_size == 0 {
            return Err(CliError::InvalidBatchSize {
                field: ARG_BATCH_SIZE,
            });
        }
        Ok(Self {
            diva_dir,
            database,
            batch_size,
        })
    }
}

pub(crate) fn run_import(args: ImportArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_import_with(args, &mut stdout)
}

pub(crate) fn run_import_with(args: ImportArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    let report = execute_import(&config)?;
    write_report(writer, &report)
}

/// Resolve the delivery before touching the database, then run every task.
pub(crate) fn execute_import(config: &ImportConfig) -> Result<JobReport, CliError> {
    let mut job = BagImportJob::new(&config.job_config())?;
    run_job(&mut job, &config.database)
}

pub(crate) fn run_job(job: &mut Job, database: &Utf8Path) -> Result<JobReport, CliError> {
    let mut store = SqliteStore::open(database).map_err(|source| CliError::OpenStore {
        path: database.to_path_buf(),
        source,
    })?;
    let report = job.run(&mut store)?;
    log::info!(
        "{} materialized {} rows with {} warnings into {database}",
        report.job,
        report.materialized(),
        report.warnings(),
    );
    Ok(report)
}

pub(crate) fn write_report(writer: &mut dyn Write, report: &JobReport) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(report).map_err(CliError::SerializeReport)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteReport)?;
    writer.write_all(b"\n").map_err(CliError::WriteReport)?;
    Ok(())
}
