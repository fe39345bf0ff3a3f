//! Readers, import tasks and storage for the Atlas BAG import.
//!
//! A diva delivery holds four source directories: UVA2 attribute extracts
//! for the registry (`bag`) and for the area hierarchy (`gebieden`), `id;WKT`
//! outline files (`bag_wkt`) and area shapefiles (`gebieden_shp`).
//! [`BagImportJob`] resolves every source up front and returns a [`Job`]
//! whose tasks import one entity kind each, in dependency order, into an
//! [`atlas_core::EntityStore`] such as [`SqliteStore`].
#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod error;
pub mod geometry;
mod job;
mod layout;
mod merge;
pub mod store;
pub mod task;
pub mod uva2;

pub use error::ReaderError;
pub use job::{BagImportConfig, BagImportJob, Job, JobError, JobReport};
pub use layout::{ConfigurationError, DivaLayout, require_file};
pub use merge::{KeyTransform, KeyedEntities};
pub use store::SqliteStore;
pub use task::{Task, TaskError, TaskRunner, TaskState, execute};
