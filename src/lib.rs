//! Facade crate for the Atlas BAG import.
//!
//! This crate re-exports the core domain types and exposes the delivery
//! readers, import job and SQLite store behind the `store-sqlite` feature.

#![forbid(unsafe_code)]

pub use atlas_core::{
    CodeTable, DiagnosticKind, Diagnostics, Entity, EntityKind, EntitySet, EntityStore,
    Rejection, StoreError, TaskReport, Warning,
};

#[cfg(feature = "store-sqlite")]
pub use atlas_data::{
    BagImportConfig, BagImportJob, ConfigurationError, Job, JobError, JobReport, SqliteStore,
};
