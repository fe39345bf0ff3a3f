//! Import tasks and the lifecycle runner that drives them.
//!
//! A task owns everything needed to import one entity kind. The runner
//! enforces `before → process → after`; a task is never asked to process
//! without its reference caches loaded.

use std::fmt;

use atlas_core::{EntityStore, StoreError, TaskReport};
use thiserror::Error;

use crate::error::ReaderError;

mod bag;
mod codes;
mod extract;
mod gebieden;
mod passes;
mod shapes;

pub use bag::{
    LigplaatsRows, NummeraanduidingRows, OpenbareRuimteRows, PandRows, StandplaatsRows,
    VerblijfsobjectPandRows, VerblijfsobjectRows, WoonplaatsRows,
};
pub use codes::{CodeTableConfig, CodeTableRows};
pub use extract::{ExtractTask, MergePass, RowProcessor};
pub use gebieden::{BouwblokRows, BuurtRows, GemeenteRows, StadsdeelRows};
pub use passes::{AddressLinkPass, LinkKind, LinkSource, ShapefileGeometryPass, WktGeometryPass};
pub use shapes::{
    BuurtcombinatieFeatures, FeatureProcessor, FeatureTask, GebiedsgerichtwerkenFeatures,
    GrootstedelijkgebiedFeatures, UnescoFeatures,
};

/// Lifecycle position of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    /// Constructed; nothing loaded.
    Uninitialized,
    /// Target cleared and reference caches loaded.
    Ready,
    /// Rows read, merged and materialized.
    Processing,
    /// Caches released and report produced.
    Done,
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Uninitialized => "uninitialized",
            Self::Ready => "ready",
            Self::Processing => "processing",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

/// Errors raised while running a task.
#[derive(Debug, Error)]
pub enum TaskError {
    /// A lifecycle step was requested out of order.
    #[error("task {task} cannot move from {from} to {to}")]
    InvalidTransition {
        /// Task name.
        task: String,
        /// State the task was in.
        from: TaskState,
        /// State that was requested.
        to: TaskState,
    },
    /// A source file could not be read.
    #[error(transparent)]
    Reader(#[from] ReaderError),
    /// The entity store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// One step of an import job.
pub trait Task {
    /// Human-readable name, e.g. `Import SDL`.
    fn name(&self) -> &str;

    /// Clear the task's own entity set and load the key sets it references.
    fn before(&mut self, store: &mut dyn EntityStore) -> Result<(), TaskError>;

    /// Read the sources, run merge passes and materialize the result once.
    fn process(&mut self, store: &mut dyn EntityStore) -> Result<(), TaskError>;

    /// Release in-memory state and hand back the task's findings.
    fn after(&mut self) -> TaskReport;
}

/// Drives one task through its lifecycle, refusing out-of-order calls.
pub struct TaskRunner<'t> {
    task: &'t mut dyn Task,
    state: TaskState,
}

impl<'t> TaskRunner<'t> {
    /// Wrap `task` in the `Uninitialized` state.
    pub fn new(task: &'t mut dyn Task) -> Self {
        Self {
            task,
            state: TaskState::Uninitialized,
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> TaskState {
        self.state
    }

    fn expect_state(&self, from: TaskState, to: TaskState) -> Result<(), TaskError> {
        if self.state == from {
            Ok(())
        } else {
            Err(TaskError::InvalidTransition {
                task: self.task.name().to_owned(),
                from: self.state,
                to,
            })
        }
    }

    /// Run the `before` phase.
    pub fn before(&mut self, store: &mut dyn EntityStore) -> Result<(), TaskError> {
        self.expect_state(TaskState::Uninitialized, TaskState::Ready)?;
        self.task.before(store)?;
        self.state = TaskState::Ready;
        Ok(())
    }

    /// Run the `process` phase.
    pub fn process(&mut self, store: &mut dyn EntityStore) -> Result<(), TaskError> {
        self.expect_state(TaskState::Ready, TaskState::Processing)?;
        self.task.process(store)?;
        self.state = TaskState::Processing;
        Ok(())
    }

    /// Run the `after` phase.
    pub fn after(&mut self) -> Result<TaskReport, TaskError> {
        self.expect_state(TaskState::Processing, TaskState::Done)?;
        let report = self.task.after();
        self.state = TaskState::Done;
        Ok(report)
    }
}

/// Run all three phases of `task` against `store`.
pub fn execute(task: &mut dyn Task, store: &mut dyn EntityStore) -> Result<TaskReport, TaskError> {
    let mut runner = TaskRunner::new(task);
    runner.before(store)?;
    runner.process(store)?;
    let report = runner.after()?;
    log::info!(
        "{}: materialized {} rows, {} warnings",
        report.task,
        report.materialized,
        report.diagnostics.warnings().len()
    );
    Ok(report)
}

#[cfg(test)]
mod tests;
