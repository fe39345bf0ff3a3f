//! Code-description tables.

use super::{Column, Entity, Value, impl_rows_access, text};

/// The nine code tables, in import order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CodeTable {
    /// Reason for removal (AVR).
    RedenAfvoer,
    /// Source (BRN).
    Bron,
    /// Ownership relation (EGM).
    Eigendomsverhouding,
    /// Financing method (FNG).
    Financieringswijze,
    /// Usage (GBK).
    Gebruik,
    /// Position (LGG).
    Ligging,
    /// Entrance location (LOC).
    LocatieIngang,
    /// Access (TGG).
    Toegang,
    /// Status (STS).
    Status,
}

impl CodeTable {
    /// All tables in the order they are imported.
    pub const ALL: [Self; 9] = [
        Self::RedenAfvoer,
        Self::Bron,
        Self::Eigendomsverhouding,
        Self::Financieringswijze,
        Self::Gebruik,
        Self::Ligging,
        Self::LocatieIngang,
        Self::Toegang,
        Self::Status,
    ];

    /// Record-type code in the extract.
    #[must_use]
    pub fn record_code(self) -> &'static str {
        match self {
            Self::RedenAfvoer => "AVR",
            Self::Bron => "BRN",
            Self::Eigendomsverhouding => "EGM",
            Self::Financieringswijze => "FNG",
            Self::Gebruik => "GBK",
            Self::Ligging => "LGG",
            Self::LocatieIngang => "LOC",
            Self::Toegang => "TGG",
            Self::Status => "STS",
        }
    }

    /// Storage table name.
    #[must_use]
    pub fn table_name(self) -> &'static str {
        match self {
            Self::RedenAfvoer => "reden_afvoer",
            Self::Bron => "bron",
            Self::Eigendomsverhouding => "eigendomsverhouding",
            Self::Financieringswijze => "financieringswijze",
            Self::Gebruik => "gebruik",
            Self::Ligging => "ligging",
            Self::LocatieIngang => "locatie_ingang",
            Self::Toegang => "toegang",
            Self::Status => "status",
        }
    }

    /// Lower-case name used in warnings.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::RedenAfvoer => "reden afvoer",
            Self::LocatieIngang => "locatie ingang",
            other => other.table_name(),
        }
    }
}

/// One `code → omschrijving` row of a code table.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CodeEntry {
    /// Natural key.
    pub code: String,
    /// Human-readable description.
    pub omschrijving: String,
}

impl CodeEntry {
    /// Build an entry.
    pub fn new(code: impl Into<String>, omschrijving: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            omschrijving: omschrijving.into(),
        }
    }
}

const CODE_COLUMNS: &[Column] = &[text("id"), text("omschrijving")];

impl Entity for CodeEntry {
    fn columns() -> &'static [Column] {
        CODE_COLUMNS
    }

    fn key(&self) -> Option<&str> {
        Some(&self.code)
    }

    fn values(&self) -> Vec<Value> {
        vec![Value::from(&self.code), Value::from(&self.omschrijving)]
    }

    impl_rows_access!(CodeEntry, Codes);
}
