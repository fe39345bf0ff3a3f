//! Raw attribute records and the fixed per-type schemas that describe them.
//!
//! UVA2 extracts carry no usable header: the field layout of every record
//! type is an external contract. A [`RecordSchema`] captures that contract
//! and a [`Record`] pairs one row's values with it so processors can address
//! fields by name.

use std::{collections::HashMap, sync::Arc};

use thiserror::Error;

use crate::validity::{
    BEGIN_GELDIGHEID, EIND_GELDIGHEID, relation_begin_field, relation_end_field, relation_group_of,
};

/// Ordered field layout of one record type.
///
/// # Examples
/// ```
/// use atlas_core::RecordSchema;
///
/// let schema = RecordSchema::builder("SDL")
///     .fields(["sleutelVerzendend", "Stadsdeelcode"])
///     .validity()
///     .relation("SDLGME", ["GME/sleutelVerzendend"])
///     .build();
///
/// assert_eq!(schema.code(), "SDL");
/// assert_eq!(schema.position("SDLGME/GME/sleutelVerzendend"), Some(4));
/// assert_eq!(schema.len(), 7);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSchema {
    code: String,
    fields: Vec<String>,
    positions: HashMap<String, usize>,
}

impl RecordSchema {
    /// Start building the schema for the record type tagged `code`.
    pub fn builder(code: impl Into<String>) -> RecordSchemaBuilder {
        RecordSchemaBuilder {
            code: code.into(),
            fields: Vec::new(),
        }
    }

    /// Record-type tag found in the first column of matching rows.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Field names in column order, excluding the leading tag column.
    #[must_use]
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Number of value columns following the tag.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the schema declares no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Column index of `field`, if the schema declares it.
    #[must_use]
    pub fn position(&self, field: &str) -> Option<usize> {
        self.positions.get(field).copied()
    }

    /// Whether the schema carries the record's own validity window.
    #[must_use]
    pub fn has_validity(&self) -> bool {
        self.positions.contains_key(BEGIN_GELDIGHEID)
    }

    /// Relation groups in declaration order.
    #[must_use]
    pub fn relation_groups(&self) -> Vec<&str> {
        self.fields
            .iter()
            .filter_map(|field| relation_group_of(field))
            .collect()
    }
}

/// Builder returned by [`RecordSchema::builder`].
#[derive(Debug, Clone)]
pub struct RecordSchemaBuilder {
    code: String,
    fields: Vec<String>,
}

impl RecordSchemaBuilder {
    /// Append a single field.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>) -> Self {
        self.fields.push(name.into());
        self
    }

    /// Append several fields in order.
    #[must_use]
    pub fn fields<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields.extend(names.into_iter().map(Into::into));
        self
    }

    /// Append the record's own validity window fields.
    #[must_use]
    pub fn validity(self) -> Self {
        self.field(BEGIN_GELDIGHEID).field(EIND_GELDIGHEID)
    }

    /// Append a relation group: its target fields followed by its window.
    ///
    /// Target fields are prefixed with the group name, so
    /// `relation("SDLGME", ["GME/sleutelVerzendend"])` declares
    /// `SDLGME/GME/sleutelVerzendend`.
    #[must_use]
    pub fn relation<I, S>(mut self, group: &str, targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for target in targets {
            self.fields.push(format!("{group}/{}", target.as_ref()));
        }
        self.fields.push(relation_begin_field(group));
        self.fields.push(relation_end_field(group));
        self
    }

    /// Finish the schema.
    #[must_use]
    pub fn build(self) -> RecordSchema {
        let positions = self
            .fields
            .iter()
            .enumerate()
            .map(|(index, name)| (name.clone(), index))
            .collect();
        RecordSchema {
            code: self.code,
            fields: self.fields,
            positions,
        }
    }
}

/// Raised when a row's column count does not match its schema.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{code} row has {found} fields, expected {expected}")]
pub struct FieldCountMismatch {
    /// Record-type tag of the schema.
    pub code: String,
    /// Number of columns declared by the schema.
    pub expected: usize,
    /// Number of columns present in the row.
    pub found: usize,
}

/// One raw row of a record type, addressable by field name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    schema: Arc<RecordSchema>,
    values: Vec<String>,
    line: u64,
}

impl Record {
    /// Pair `values` with `schema`; the counts must match exactly.
    pub fn new(
        schema: Arc<RecordSchema>,
        values: Vec<String>,
        line: u64,
    ) -> Result<Self, FieldCountMismatch> {
        if values.len() != schema.len() {
            return Err(FieldCountMismatch {
                code: schema.code().to_owned(),
                expected: schema.len(),
                found: values.len(),
            });
        }
        Ok(Self {
            schema,
            values,
            line,
        })
    }

    /// Build a record from named values; unnamed fields are left empty.
    ///
    /// Names the schema does not declare are ignored.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use atlas_core::{Record, RecordSchema};
    ///
    /// let schema = Arc::new(RecordSchema::builder("BRN").fields(["Code", "Omschrijving"]).build());
    /// let record = Record::from_pairs(schema, [("Code", "01")]);
    ///
    /// assert_eq!(record.value("Code"), Some("01"));
    /// assert_eq!(record.value("Omschrijving"), None);
    /// ```
    pub fn from_pairs<'a, I>(schema: Arc<RecordSchema>, pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut values = vec![String::new(); schema.len()];
        for (name, value) in pairs {
            if let Some(slot) = schema
                .position(name)
                .and_then(|index| values.get_mut(index))
            {
                *slot = value.to_owned();
            }
        }
        Self {
            schema,
            values,
            line: 0,
        }
    }

    /// Schema the record was read with.
    #[must_use]
    pub fn schema(&self) -> &RecordSchema {
        &self.schema
    }

    /// Record-type tag.
    #[must_use]
    pub fn code(&self) -> &str {
        self.schema.code()
    }

    /// One-based line number in the source file, or zero when synthesised.
    #[must_use]
    pub fn line(&self) -> u64 {
        self.line
    }

    /// Trimmed value of `field`, or `None` when empty or undeclared.
    #[must_use]
    pub fn value(&self, field: &str) -> Option<&str> {
        self.schema
            .position(field)
            .and_then(|index| self.values.get(index))
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
    }

    /// Trimmed value of `field` as an owned string, empty when absent.
    #[must_use]
    pub fn text(&self, field: &str) -> String {
        self.value(field).unwrap_or_default().to_owned()
    }
}
