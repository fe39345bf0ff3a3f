//! Keyed entity collections and the second-pass merge over them.
//!
//! After the attribute pass a task owns its entities in a
//! [`KeyedEntities`]; geometry and linking passes reach them only through
//! [`KeyedEntities::merge`].

use std::collections::BTreeMap;

use atlas_core::{DiagnosticKind, Diagnostics};

/// How a secondary-source identifier maps onto an entity key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyTransform {
    /// Prefix a `0`; WKT files drop the leading zero of BAG keys.
    LeadingZero,
    /// Remove the first character; buurt `VOLLCODE` carries the stadsdeel
    /// letter in front of the buurt code.
    DropFirstChar,
    /// Use the identifier as is.
    Identity,
}

impl KeyTransform {
    /// Apply the transform.
    ///
    /// # Examples
    /// ```
    /// use atlas_data::KeyTransform;
    ///
    /// assert_eq!(KeyTransform::LeadingZero.apply("363010000123"), "0363010000123");
    /// assert_eq!(KeyTransform::DropFirstChar.apply("A00a"), "00a");
    /// assert_eq!(KeyTransform::Identity.apply("A"), "A");
    /// ```
    #[must_use]
    pub fn apply(self, id: &str) -> String {
        match self {
            Self::LeadingZero => format!("0{id}"),
            Self::DropFirstChar => {
                let mut chars = id.chars();
                chars.next();
                chars.as_str().to_owned()
            }
            Self::Identity => id.to_owned(),
        }
    }
}

/// Entities of one task, ordered by merge key.
#[derive(Debug, Clone)]
pub struct KeyedEntities<E> {
    label: &'static str,
    entities: BTreeMap<String, E>,
}

impl<E> KeyedEntities<E> {
    /// Empty collection for entities named `label` in warnings.
    #[must_use]
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            entities: BTreeMap::new(),
        }
    }

    /// Insert `entity` under `key`; a repeated key replaces the earlier entity
    /// with a warning.
    pub fn insert(&mut self, key: String, entity: E, diagnostics: &mut Diagnostics) {
        if self.entities.contains_key(&key) {
            diagnostics.warn(
                DiagnosticKind::DuplicateKey,
                format!("{} {key} occurs more than once; keeping the last row", self.label),
            );
        }
        self.entities.insert(key, entity);
    }

    /// Apply `f` to the entity under `key`.
    ///
    /// Returns `false` and warns with both `source_id` and `key` when nothing
    /// matches.
    pub fn merge<F>(&mut self, source_id: &str, key: &str, diagnostics: &mut Diagnostics, f: F) -> bool
    where
        F: FnOnce(&mut E),
    {
        if let Some(entity) = self.entities.get_mut(key) {
            f(entity);
            return true;
        }
        diagnostics.warn(
            DiagnosticKind::GeometryJoinMiss,
            format!(
                "{source_id} references non-existing {} {key}; skipping",
                self.label
            ),
        );
        false
    }

    /// Entity under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&E> {
        self.entities.get(key)
    }

    /// Whether an entity is stored under `key`.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entities.contains_key(key)
    }

    /// Number of entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether the collection is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Entities in key order.
    #[must_use]
    pub fn into_values(self) -> Vec<E> {
        self.entities.into_values().collect()
    }
}
