//! Test helpers shared by the workspace crates.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::{
    entity::{EntityKind, EntitySet},
    record::RecordSchema,
    store::{EntityStore, StoreError},
};

/// In-memory [`EntityStore`] that records every insert call.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    sets: BTreeMap<EntityKind, EntitySet>,
    inserts: Vec<(EntityKind, usize)>,
    clears: Vec<EntityKind>,
}

impl MemoryStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed `set` as if an earlier task had materialized it.
    #[must_use]
    pub fn with_set(mut self, set: EntitySet) -> Self {
        self.sets.insert(set.kind(), set);
        self
    }

    /// Stored set of `kind`.
    #[must_use]
    pub fn set(&self, kind: EntityKind) -> Option<&EntitySet> {
        self.sets.get(&kind)
    }

    /// `(kind, row count)` of every `bulk_insert` call, in order.
    #[must_use]
    pub fn inserts(&self) -> &[(EntityKind, usize)] {
        &self.inserts
    }

    /// Kinds passed to `clear`, in order.
    #[must_use]
    pub fn clears(&self) -> &[EntityKind] {
        &self.clears
    }
}

impl EntityStore for MemoryStore {
    fn clear(&mut self, kind: EntityKind) -> Result<(), StoreError> {
        self.clears.push(kind);
        self.sets.remove(&kind);
        Ok(())
    }

    fn keys(&self, kind: EntityKind) -> Result<HashSet<String>, StoreError> {
        if !kind.has_natural_key() {
            return Err(StoreError::NoNaturalKey { kind });
        }
        Ok(self
            .sets
            .get(&kind)
            .map(|set| set.rows().keys().into_iter().collect())
            .unwrap_or_default())
    }

    fn code_index(&self, kind: EntityKind) -> Result<HashMap<String, String>, StoreError> {
        if !kind.has_code() {
            return Err(StoreError::NoCodeColumn { kind });
        }
        Ok(self
            .sets
            .get(&kind)
            .map(|set| set.rows().code_pairs().into_iter().collect())
            .unwrap_or_default())
    }

    fn bulk_insert(&mut self, set: &EntitySet, _batch_size: usize) -> Result<usize, StoreError> {
        self.inserts.push((set.kind(), set.len()));
        self.sets.insert(set.kind(), set.clone());
        Ok(set.len())
    }
}

/// Render one UVA2 line: the record-type tag followed by `values`.
///
/// # Examples
/// ```
/// use atlas_core::test_support::uva2_line;
///
/// assert_eq!(uva2_line("BRN", &["001", "Foo"]), "BRN;001;Foo");
/// ```
#[must_use]
pub fn uva2_line(code: &str, values: &[&str]) -> String {
    std::iter::once(code)
        .chain(values.iter().copied())
        .collect::<Vec<_>>()
        .join(";")
}

/// Render one UVA2 line of `schema` with `values` set by field name and
/// every other field empty.
#[must_use]
pub fn schema_line(schema: &RecordSchema, values: &[(&str, &str)]) -> String {
    let row: Vec<&str> = schema
        .fields()
        .iter()
        .map(|field| {
            values
                .iter()
                .find(|(name, _)| *name == field.as_str())
                .map_or("", |(_, value)| *value)
        })
        .collect();
    uva2_line(schema.code(), &row)
}
