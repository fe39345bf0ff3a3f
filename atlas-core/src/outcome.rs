//! Row outcomes, rejection reasons and the per-task diagnostics ledger.

use std::collections::BTreeMap;

use thiserror::Error;

/// Why a row did not make it into the materialized set.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Rejection {
    /// The row's own window or a relation window is not open.
    #[error("invalid validity window")]
    InvalidWindow,
    /// A required reference points at a key that was never materialized.
    #[error("{entity} {id} references non-existing {target} {key}; skipping")]
    DanglingReference {
        /// Label of the rejected row's kind.
        entity: &'static str,
        /// Natural key of the rejected row.
        id: String,
        /// Label of the referenced kind.
        target: &'static str,
        /// The missing key.
        key: String,
    },
    /// A required reference is empty.
    #[error("{entity} {id} has no {target}; skipping")]
    MissingReference {
        /// Label of the rejected row's kind.
        entity: &'static str,
        /// Natural key of the rejected row.
        id: String,
        /// Label of the referenced kind.
        target: &'static str,
    },
    /// The row has no natural key.
    #[error("{entity} row on line {line} has no key; skipping")]
    MissingKey {
        /// Label of the rejected row's kind.
        entity: &'static str,
        /// Source line of the row.
        line: u64,
    },
}

impl Rejection {
    /// Diagnostic bucket this rejection is counted under.
    #[must_use]
    pub fn kind(&self) -> DiagnosticKind {
        match self {
            Self::InvalidWindow => DiagnosticKind::StructuralInvalidity,
            Self::DanglingReference { .. } | Self::MissingReference { .. } => {
                DiagnosticKind::DanglingRequiredReference
            }
            Self::MissingKey { .. } => DiagnosticKind::MalformedRow,
        }
    }
}

/// Result of transforming one raw row.
#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome<E> {
    /// Keep the entity; it takes no part in a merge pass.
    Accepted(E),
    /// Keep the entity under a merge key.
    AcceptedKeyed(String, E),
    /// Drop the row.
    Rejected(Rejection),
}

impl<E> RowOutcome<E> {
    /// Shorthand for a required-reference rejection propagated with `?`.
    pub fn from_result(result: Result<Self, Rejection>) -> Self {
        result.unwrap_or_else(Self::Rejected)
    }
}

/// Counted categories of data-quality findings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DiagnosticKind {
    /// Malformed or closed validity window; counted without a warning.
    StructuralInvalidity,
    /// Required reference absent from its key set; row rejected.
    DanglingRequiredReference,
    /// Optional reference absent from its key set; field nulled.
    DanglingOptionalReference,
    /// Secondary-source row with no matching entity.
    GeometryJoinMiss,
    /// Field value of the wrong shape; field nulled.
    MalformedField,
    /// Row whose column layout or key is unusable; row skipped.
    MalformedRow,
    /// Second row for an already seen key; the later row wins.
    DuplicateKey,
}

/// One recorded warning.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Warning {
    /// Bucket the warning was counted under.
    pub kind: DiagnosticKind,
    /// Human-readable message, identical to the logged text.
    pub message: String,
}

/// Counts by kind plus the warning messages of one task.
///
/// Every warning is also emitted through `log::warn!`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Diagnostics {
    counts: BTreeMap<DiagnosticKind, usize>,
    warnings: Vec<Warning>,
}

impl Diagnostics {
    /// Empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Count an occurrence of `kind` without a warning.
    pub fn count(&mut self, kind: DiagnosticKind) {
        *self.counts.entry(kind).or_default() += 1;
    }

    /// Log and record a warning.
    pub fn warn(&mut self, kind: DiagnosticKind, message: impl Into<String>) {
        let message = message.into();
        log::warn!("{message}");
        self.count(kind);
        self.warnings.push(Warning { kind, message });
    }

    /// Record a rejected row; structural invalidity stays silent.
    pub fn reject(&mut self, rejection: &Rejection) {
        match rejection {
            Rejection::InvalidWindow => self.count(DiagnosticKind::StructuralInvalidity),
            other => self.warn(other.kind(), other.to_string()),
        }
    }

    /// Occurrences of `kind`.
    #[must_use]
    pub fn count_of(&self, kind: DiagnosticKind) -> usize {
        self.counts.get(&kind).copied().unwrap_or_default()
    }

    /// All counts, ordered by kind.
    #[must_use]
    pub fn counts(&self) -> &BTreeMap<DiagnosticKind, usize> {
        &self.counts
    }

    /// Recorded warnings in emission order.
    #[must_use]
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Warnings of a single kind.
    pub fn warnings_of(&self, kind: DiagnosticKind) -> impl Iterator<Item = &Warning> {
        self.warnings
            .iter()
            .filter(move |warning| warning.kind == kind)
    }

    /// Whether nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

/// Summary of one completed task.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TaskReport {
    /// Task name, e.g. `Import SDL`.
    pub task: String,
    /// Number of rows handed to the store.
    pub materialized: usize,
    /// Findings recorded while the task ran.
    pub diagnostics: Diagnostics,
}
