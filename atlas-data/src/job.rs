//! Ordered import runs.

use atlas_core::{CodeTable, EntityStore, TaskReport};
use camino::Utf8PathBuf;
use serde::Serialize;
use thiserror::Error;

use crate::{
    geometry::{
        BOUWBLOK_SHAPEFILE, BUURT_SHAPEFILE, BUURTCOMBINATIE_SHAPEFILE,
        GEBIEDSGERICHTWERKEN_SHAPEFILE, GROOTSTEDELIJKGEBIED_SHAPEFILE, LIGPLAATS_WKT, PAND_WKT,
        STADSDEEL_SHAPEFILE, STANDPLAATS_WKT, ShapefileSource, UNESCO_SHAPEFILE,
    },
    layout::{ConfigurationError, DivaLayout, require_file},
    merge::KeyTransform,
    task::{
        AddressLinkPass, BouwblokRows, BuurtRows, BuurtcombinatieFeatures, CodeTableConfig,
        ExtractTask, FeatureTask, GebiedsgerichtwerkenFeatures, GemeenteRows,
        GrootstedelijkgebiedFeatures, LigplaatsRows, LinkKind, LinkSource, NummeraanduidingRows,
        OpenbareRuimteRows, PandRows, ShapefileGeometryPass, StadsdeelRows, StandplaatsRows, Task,
        TaskError, UnescoFeatures, VerblijfsobjectPandRows, VerblijfsobjectRows, WktGeometryPass,
        WoonplaatsRows, execute,
    },
    uva2::resolve_extract,
};

/// Errors that end a job.
#[derive(Debug, Error)]
pub enum JobError {
    /// The delivery could not be resolved.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    /// A task failed; earlier tasks stay materialized.
    #[error("task `{task}` failed")]
    Task {
        /// Failure of the task.
        #[source]
        source: TaskError,
        /// Name of the failing task.
        task: String,
    },
}

/// Reports of every task a job ran, in run order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobReport {
    /// Job name.
    pub job: String,
    /// One report per completed task.
    pub tasks: Vec<TaskReport>,
}

impl JobReport {
    /// Rows materialized across all tasks.
    #[must_use]
    pub fn materialized(&self) -> usize {
        self.tasks.iter().map(|report| report.materialized).sum()
    }

    /// Warnings recorded across all tasks.
    #[must_use]
    pub fn warnings(&self) -> usize {
        self.tasks
            .iter()
            .map(|report| report.diagnostics.warnings().len())
            .sum()
    }
}

/// A named, ordered list of tasks.
pub struct Job {
    name: String,
    tasks: Vec<Box<dyn Task>>,
}

impl Job {
    /// Empty job called `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tasks: Vec::new(),
        }
    }

    /// Append `task`.
    #[must_use]
    pub fn with_task(mut self, task: impl Task + 'static) -> Self {
        self.tasks.push(Box::new(task));
        self
    }

    /// Job name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Task names in run order.
    #[must_use]
    pub fn task_names(&self) -> Vec<&str> {
        self.tasks.iter().map(|task| task.name()).collect()
    }

    /// Run every task in order, stopping at the first failure.
    ///
    /// Tasks that already completed stay materialized.
    pub fn run(&mut self, store: &mut dyn EntityStore) -> Result<JobReport, JobError> {
        log::info!("starting {}", self.name);
        let mut reports = Vec::with_capacity(self.tasks.len());
        for task in &mut self.tasks {
            let report = execute(task.as_mut(), store).map_err(|source| JobError::Task {
                source,
                task: task.name().to_owned(),
            })?;
            reports.push(report);
        }
        Ok(JobReport {
            job: self.name.clone(),
            tasks: reports,
        })
    }
}

/// Settings of a full BAG import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BagImportConfig {
    /// Root holding `bag`, `bag_wkt`, `gebieden` and `gebieden_shp`.
    pub diva_dir: Utf8PathBuf,
    /// Rows per insert statement.
    pub batch_size: usize,
}

/// The full BAG and gebieden import.
pub struct BagImportJob;

impl BagImportJob {
    /// Job name.
    pub const NAME: &'static str = "Import BAG";

    /// Validate the diva layout, resolve every source file and build the
    /// task list in dependency order.
    ///
    /// Fails before any task exists when a directory, extract, shapefile or
    /// WKT file is missing.
    pub fn new(config: &BagImportConfig) -> Result<Job, ConfigurationError> {
        let layout = DivaLayout::open(&config.diva_dir)?;
        let sources = Sources::new(&layout);
        let batch = config.batch_size;
        let mut job = Job::new(Self::NAME);

        for table in CodeTable::ALL {
            let path = sources.bag_extract(table.record_code())?;
            job = job.with_task(
                CodeTableConfig {
                    table,
                    path,
                    batch_size: batch,
                }
                .into_task(),
            );
        }

        let job = job
            .with_task(ExtractTask::new(
                "Import GME",
                &sources.gebieden_extract("GME")?,
                GemeenteRows,
                batch,
            ))
            .with_task(ExtractTask::new(
                "Import WPL",
                &sources.bag_extract("WPL")?,
                WoonplaatsRows,
                batch,
            ))
            .with_task(
                ExtractTask::new(
                    "Import SDL",
                    &sources.gebieden_extract("SDL")?,
                    StadsdeelRows,
                    batch,
                )
                .with_pass(sources.shapefile_pass(STADSDEEL_SHAPEFILE, "CODE", KeyTransform::Identity)?),
            )
            .with_task(
                ExtractTask::new("Import BRT", &sources.gebieden_extract("BRT")?, BuurtRows, batch)
                    .with_pass(sources.shapefile_pass(
                        BUURT_SHAPEFILE,
                        "VOLLCODE",
                        KeyTransform::DropFirstChar,
                    )?),
            )
            .with_task(
                ExtractTask::new(
                    "Import BBK",
                    &sources.gebieden_extract("BBK")?,
                    BouwblokRows,
                    batch,
                )
                .with_pass(sources.shapefile_pass(BOUWBLOK_SHAPEFILE, "CODE", KeyTransform::Identity)?),
            )
            .with_task(ExtractTask::new(
                "Import OPR",
                &sources.bag_extract("OPR")?,
                OpenbareRuimteRows,
                batch,
            ))
            .with_task(
                ExtractTask::new("Import LIG", &sources.bag_extract("LIG")?, LigplaatsRows, batch)
                    .with_pass(WktGeometryPass::new(&sources.wkt(LIGPLAATS_WKT)?)),
            )
            .with_task(
                ExtractTask::new("Import STA", &sources.bag_extract("STA")?, StandplaatsRows, batch)
                    .with_pass(WktGeometryPass::new(&sources.wkt(STANDPLAATS_WKT)?)),
            )
            .with_task(ExtractTask::new(
                "Import VBO",
                &sources.bag_extract("VBO")?,
                VerblijfsobjectRows,
                batch,
            ))
            .with_task(
                ExtractTask::new(
                    "Import NUM",
                    &sources.bag_extract("NUM")?,
                    NummeraanduidingRows,
                    batch,
                )
                .with_pass(AddressLinkPass::new(sources.link_sources()?)),
            )
            .with_task(
                ExtractTask::new("Import PND", &sources.bag_extract("PND")?, PandRows, batch)
                    .with_pass(WktGeometryPass::new(&sources.wkt(PAND_WKT)?)),
            )
            .with_task(ExtractTask::new(
                "Import PNDVBO",
                &sources.bag_extract("PNDVBO")?,
                VerblijfsobjectPandRows,
                batch,
            ))
            .with_task(FeatureTask::shapefile(
                "Import GBD Buurtcombinatie",
                &sources.shapefile(BUURTCOMBINATIE_SHAPEFILE)?,
                BuurtcombinatieFeatures,
                batch,
            ))
            .with_task(FeatureTask::shapefile(
                "Import GBD Gebiedsgerichtwerken",
                &sources.shapefile(GEBIEDSGERICHTWERKEN_SHAPEFILE)?,
                GebiedsgerichtwerkenFeatures,
                batch,
            ))
            .with_task(FeatureTask::shapefile(
                "Import GBD Grootstedelijkgebied",
                &sources.shapefile(GROOTSTEDELIJKGEBIED_SHAPEFILE)?,
                GrootstedelijkgebiedFeatures,
                batch,
            ))
            .with_task(FeatureTask::shapefile(
                "Import GBD unesco",
                &sources.shapefile(UNESCO_SHAPEFILE)?,
                UnescoFeatures,
                batch,
            ));
        Ok(job)
    }
}

struct Sources {
    bag: Utf8PathBuf,
    bag_wkt: Utf8PathBuf,
    gebieden: Utf8PathBuf,
    gebieden_shp: Utf8PathBuf,
}

impl Sources {
    fn new(layout: &DivaLayout) -> Self {
        Self {
            bag: layout.bag(),
            bag_wkt: layout.bag_wkt(),
            gebieden: layout.gebieden(),
            gebieden_shp: layout.gebieden_shp(),
        }
    }

    fn bag_extract(&self, code: &str) -> Result<Utf8PathBuf, ConfigurationError> {
        resolve_extract(&self.bag, code)
    }

    fn gebieden_extract(&self, code: &str) -> Result<Utf8PathBuf, ConfigurationError> {
        resolve_extract(&self.gebieden, code)
    }

    fn wkt(&self, name: &str) -> Result<Utf8PathBuf, ConfigurationError> {
        require_file(self.bag_wkt.join(name))
    }

    fn shapefile(&self, name: &str) -> Result<Utf8PathBuf, ConfigurationError> {
        require_file(self.gebieden_shp.join(name))
    }

    fn shapefile_pass(
        &self,
        name: &str,
        key_column: &'static str,
        transform: KeyTransform,
    ) -> Result<ShapefileGeometryPass, ConfigurationError> {
        let path = self.shapefile(name)?;
        Ok(ShapefileGeometryPass::new(
            name,
            ShapefileSource::open(&path, [key_column]),
            key_column,
            transform,
        ))
    }

    fn link_sources(&self) -> Result<Vec<LinkSource>, ConfigurationError> {
        LinkKind::ALL
            .into_iter()
            .map(|kind| -> Result<LinkSource, ConfigurationError> {
                Ok(LinkSource {
                    kind,
                    path: self.bag_extract(kind.record_code())?,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests;
