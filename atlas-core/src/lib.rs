//! Core domain types for the Atlas BAG import.
//!
//! This crate holds everything that does not touch a file or a database:
//! record schemas, the validity filter, reference validation, field
//! coercion, entity types and the [`EntityStore`] boundary. Readers, tasks
//! and the SQLite store live in `atlas-data`.
#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod coerce;
pub mod entity;
pub mod outcome;
pub mod record;
pub mod reference;
pub mod store;
pub mod validity;

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;

pub use entity::{
    AddressTarget, Bouwblok, Buurt, Buurtcombinatie, CodeEntry, CodeTable, Entity, EntityKind,
    EntityRows, EntitySet, Gebiedsgerichtwerken, Gemeente, Geometric, Grootstedelijkgebied,
    Ligplaats, Nummeraanduiding, OpenbareRuimte, Pand, Stadsdeel, Standplaats, Unesco,
    Verblijfsobject, VerblijfsobjectPandRelatie, Woonplaats,
};
pub use outcome::{DiagnosticKind, Diagnostics, Rejection, RowOutcome, TaskReport, Warning};
pub use record::{FieldCountMismatch, Record, RecordSchema};
pub use reference::{ReferenceCheck, ReferencePolicy, References, RowContext};
pub use store::{EntityStore, StoreError};
pub use validity::is_valid;
