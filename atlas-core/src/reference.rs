//! Foreign-key validation against previously materialized key sets.
//!
//! A task loads [`References`] in its `before` phase and hands a
//! [`RowContext`] to its row processor for every row. The context resolves
//! references under a [`ReferencePolicy`] and records warnings in the task's
//! [`Diagnostics`].

use std::{
    collections::{HashMap, HashSet},
    sync::LazyLock,
};

use crate::{
    coerce::{self, CoerceError},
    entity::EntityKind,
    outcome::{DiagnosticKind, Diagnostics, Rejection},
    record::Record,
    store::{EntityStore, StoreError},
};

/// What happens when a reference cannot be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferencePolicy {
    /// Reject the whole row.
    Required,
    /// Null the field and keep the row.
    Optional,
}

/// Natural keys of the kinds a task references, loaded once per task.
#[derive(Debug, Clone, Default)]
pub struct References {
    keys: HashMap<EntityKind, HashSet<String>>,
    codes: HashMap<EntityKind, HashMap<String, String>>,
}

static EMPTY_KEYS: LazyLock<HashSet<String>> = LazyLock::new(HashSet::new);

impl References {
    /// Empty reference cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the key sets of `kinds` from `store`.
    pub fn load<S: EntityStore + ?Sized>(
        store: &S,
        kinds: &[EntityKind],
    ) -> Result<Self, StoreError> {
        let mut references = Self::new();
        for &kind in kinds {
            references.keys.insert(kind, store.keys(kind)?);
        }
        Ok(references)
    }

    /// Additionally load the `code → key` index of `kind`.
    pub fn load_codes<S: EntityStore + ?Sized>(
        &mut self,
        store: &S,
        kind: EntityKind,
    ) -> Result<(), StoreError> {
        self.codes.insert(kind, store.code_index(kind)?);
        Ok(())
    }

    /// Replace the key set of `kind`.
    pub fn insert_keys<I, S>(&mut self, kind: EntityKind, keys: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keys
            .insert(kind, keys.into_iter().map(Into::into).collect());
    }

    /// Key set of `kind`; empty when it was never loaded.
    #[must_use]
    pub fn keys(&self, kind: EntityKind) -> &HashSet<String> {
        self.keys.get(&kind).unwrap_or(&EMPTY_KEYS)
    }

    /// Whether `key` is a materialized key of `kind`.
    #[must_use]
    pub fn contains(&self, kind: EntityKind, key: &str) -> bool {
        self.keys(kind).contains(key)
    }

    /// Natural key of the `kind` row whose code is `code`.
    #[must_use]
    pub fn key_for_code(&self, kind: EntityKind, code: &str) -> Option<&str> {
        self.codes
            .get(&kind)
            .and_then(|index| index.get(code))
            .map(String::as_str)
    }

    /// Drop every cached key.
    pub fn clear(&mut self) {
        self.keys.clear();
        self.codes.clear();
    }
}

/// One foreign key to validate.
#[derive(Debug, Clone, Copy)]
pub struct ReferenceCheck<'a> {
    /// Referenced kind.
    pub target: EntityKind,
    /// Raw key, `None` when the field is empty.
    pub key: Option<&'a str>,
    /// Required or optional.
    pub policy: ReferencePolicy,
}

impl<'a> ReferenceCheck<'a> {
    /// A reference that must resolve.
    #[must_use]
    pub fn required(target: EntityKind, key: Option<&'a str>) -> Self {
        Self {
            target,
            key,
            policy: ReferencePolicy::Required,
        }
    }

    /// A reference that is nulled when it does not resolve.
    #[must_use]
    pub fn optional(target: EntityKind, key: Option<&'a str>) -> Self {
        Self {
            target,
            key,
            policy: ReferencePolicy::Optional,
        }
    }
}

/// Per-row view over the task's references and diagnostics.
pub struct RowContext<'a> {
    entity: EntityKind,
    id: &'a str,
    references: &'a References,
    diagnostics: &'a mut Diagnostics,
}

impl<'a> RowContext<'a> {
    /// Context for the row of kind `entity` identified by `id`.
    pub fn new(
        entity: EntityKind,
        id: &'a str,
        references: &'a References,
        diagnostics: &'a mut Diagnostics,
    ) -> Self {
        Self {
            entity,
            id,
            references,
            diagnostics,
        }
    }

    /// Natural key of the row.
    #[must_use]
    pub fn id(&self) -> &str {
        self.id
    }

    /// The task's reference cache.
    #[must_use]
    pub fn references(&self) -> &References {
        self.references
    }

    /// Resolve one reference.
    ///
    /// Returns `Ok(None)` for an empty optional key or a dangling optional
    /// key (after recording a warning), and `Err` when a required key is
    /// empty or dangling.
    pub fn check(&mut self, check: ReferenceCheck<'_>) -> Result<Option<String>, Rejection> {
        let Some(key) = check.key.map(str::trim).filter(|key| !key.is_empty()) else {
            return match check.policy {
                ReferencePolicy::Optional => Ok(None),
                ReferencePolicy::Required => Err(Rejection::MissingReference {
                    entity: self.entity.label(),
                    id: self.id.to_owned(),
                    target: check.target.label(),
                }),
            };
        };
        if self.references.contains(check.target, key) {
            return Ok(Some(key.to_owned()));
        }
        match check.policy {
            ReferencePolicy::Required => Err(Rejection::DanglingReference {
                entity: self.entity.label(),
                id: self.id.to_owned(),
                target: check.target.label(),
                key: key.to_owned(),
            }),
            ReferencePolicy::Optional => {
                self.diagnostics.warn(
                    DiagnosticKind::DanglingOptionalReference,
                    format!(
                        "{} {} references non-existing {} {key}; ignoring",
                        self.entity.label(),
                        self.id,
                        check.target.label()
                    ),
                );
                Ok(None)
            }
        }
    }

    /// Resolve a batch of references in order, stopping at the first
    /// rejection.
    pub fn check_all(
        &mut self,
        checks: &[ReferenceCheck<'_>],
    ) -> Result<Vec<Option<String>>, Rejection> {
        checks.iter().map(|check| self.check(*check)).collect()
    }

    /// Resolve a required reference.
    pub fn required(&mut self, target: EntityKind, key: Option<&str>) -> Result<String, Rejection> {
        self.check(ReferenceCheck::required(target, key))?
            .ok_or_else(|| Rejection::MissingReference {
                entity: self.entity.label(),
                id: self.id.to_owned(),
                target: target.label(),
            })
    }

    /// Resolve an optional reference.
    pub fn optional(&mut self, target: EntityKind, key: Option<&str>) -> Option<String> {
        self.check(ReferenceCheck::optional(target, key))
            .ok()
            .flatten()
    }

    /// Record a malformed field and return `None`.
    fn malformed<T>(&mut self, field: &str, error: &CoerceError) -> Option<T> {
        self.diagnostics.warn(
            DiagnosticKind::MalformedField,
            format!(
                "{} {} has {error} in {field}; ignoring",
                self.entity.label(),
                self.id
            ),
        );
        None
    }

    /// `YYYYMMDD` date from `field`; malformed values are nulled with a warning.
    pub fn date(&mut self, record: &Record, field: &str) -> Option<chrono::NaiveDate> {
        coerce::parse_date(record.value(field)).unwrap_or_else(|err| self.malformed(field, &err))
    }

    /// `J`/`N` indicator from `field`.
    pub fn indicator(&mut self, record: &Record, field: &str) -> Option<bool> {
        coerce::parse_indicator(record.value(field))
            .unwrap_or_else(|err| self.malformed(field, &err))
    }

    /// Integer from `field`.
    pub fn number(&mut self, record: &Record, field: &str) -> Option<i64> {
        coerce::parse_number(record.value(field)).unwrap_or_else(|err| self.malformed(field, &err))
    }

    /// Point from the `x` and `y` fields.
    pub fn point(&mut self, record: &Record, x: &str, y: &str) -> Option<geo::Point<f64>> {
        coerce::point_from_coordinates(record.value(x), record.value(y))
            .unwrap_or_else(|err| self.malformed(x, &err))
    }

    /// Record an arbitrary warning against the task.
    pub fn warn(&mut self, kind: DiagnosticKind, message: impl Into<String>) {
        self.diagnostics.warn(kind, message);
    }
}
