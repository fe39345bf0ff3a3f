//! Storage boundary for materialized entity sets.

use std::collections::{HashMap, HashSet};

use thiserror::Error;

use crate::entity::{EntityKind, EntitySet};

/// Errors raised by an [`EntityStore`] backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend failed while performing `operation`.
    #[error("store operation `{operation}` failed: {source}")]
    Backend {
        /// Short description of what was attempted.
        operation: String,
        /// Backend error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// Key lookup was requested for a kind without natural keys.
    #[error("{kind} rows have no natural key")]
    NoNaturalKey {
        /// Offending kind.
        kind: EntityKind,
    },
    /// Code lookup was requested for a kind without a code column.
    #[error("{kind} rows have no code column")]
    NoCodeColumn {
        /// Offending kind.
        kind: EntityKind,
    },
}

impl StoreError {
    /// Wrap a backend error with the operation that produced it.
    pub fn backend(
        operation: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Backend {
            operation: operation.into(),
            source: Box::new(source),
        }
    }
}

/// Shared storage the import reads reference keys from and replaces entity
/// sets in.
///
/// A single writer is assumed. Each call runs to completion before
/// returning.
pub trait EntityStore {
    /// Remove every stored row of `kind`.
    fn clear(&mut self, kind: EntityKind) -> Result<(), StoreError>;

    /// All natural keys currently stored for `kind`.
    fn keys(&self, kind: EntityKind) -> Result<HashSet<String>, StoreError>;

    /// Mapping from `code` to natural key for `kind`.
    fn code_index(&self, kind: EntityKind) -> Result<HashMap<String, String>, StoreError>;

    /// Persist `set` in batches of at most `batch_size` rows and return the
    /// number of rows written.
    fn bulk_insert(&mut self, set: &EntitySet, batch_size: usize) -> Result<usize, StoreError>;
}

impl<S: EntityStore + ?Sized> EntityStore for &mut S {
    fn clear(&mut self, kind: EntityKind) -> Result<(), StoreError> {
        (**self).clear(kind)
    }

    fn keys(&self, kind: EntityKind) -> Result<HashSet<String>, StoreError> {
        (**self).keys(kind)
    }

    fn code_index(&self, kind: EntityKind) -> Result<HashMap<String, String>, StoreError> {
        (**self).code_index(kind)
    }

    fn bulk_insert(&mut self, set: &EntitySet, batch_size: usize) -> Result<usize, StoreError> {
        (**self).bulk_insert(set, batch_size)
    }
}
