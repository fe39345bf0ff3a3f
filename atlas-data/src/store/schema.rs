//! Table layout derived from entity column models.

use atlas_core::{
    EntityKind,
    entity::{Column, ColumnType},
};

/// Highest number of bound parameters one statement may carry.
pub(super) const MAX_VARIABLES: usize = 999;

/// Column holding the natural key of keyed kinds.
pub(super) const KEY_COLUMN: &str = "id";
/// Column holding the government code of kinds looked up by code.
pub(super) const CODE_COLUMN: &str = "code";

fn sql_type(ty: ColumnType) -> &'static str {
    match ty {
        ColumnType::Integer | ColumnType::Boolean => "INTEGER",
        ColumnType::Text | ColumnType::Date | ColumnType::Geometry => "TEXT",
    }
}

/// `CREATE TABLE` statement for `kind`.
///
/// Every table gets a surrogate `row_id`; natural keys are plain columns so
/// keyless kinds share the same shape.
pub(super) fn create_table(kind: EntityKind, columns: &[Column]) -> String {
    let definitions: Vec<String> = columns
        .iter()
        .map(|column| format!("{} {}", column.name, sql_type(column.ty)))
        .collect();
    format!(
        "CREATE TABLE IF NOT EXISTS {} (row_id INTEGER PRIMARY KEY, {})",
        kind.table_name(),
        definitions.join(", ")
    )
}

/// Rows per insert statement for a table of `width` columns.
pub(super) fn rows_per_statement(width: usize, batch_size: usize) -> usize {
    let by_variables = MAX_VARIABLES / width.max(1);
    batch_size.min(by_variables).max(1)
}

/// Multi-row `INSERT` for `rows` rows of `columns`.
pub(super) fn insert(kind: EntityKind, columns: &[Column], rows: usize) -> String {
    let names: Vec<&str> = columns.iter().map(|column| column.name).collect();
    let placeholders = format!("({})", vec!["?"; columns.len()].join(", "));
    format!(
        "INSERT INTO {} ({}) VALUES {}",
        kind.table_name(),
        names.join(", "),
        vec![placeholders; rows].join(", ")
    )
}
