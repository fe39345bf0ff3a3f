//! Code-description tables.

use std::sync::Arc;

use atlas_core::{CodeEntry, CodeTable, EntityKind, Record, RecordSchema, RowContext, RowOutcome};
use camino::Utf8PathBuf;

use super::extract::{ExtractTask, RowProcessor};
use crate::uva2::schema;

/// Where to read one code table from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTableConfig {
    /// Table to import.
    pub table: CodeTable,
    /// Resolved `{CODE}_*.UVA2` extract.
    pub path: Utf8PathBuf,
    /// Rows per insert statement.
    pub batch_size: usize,
}

impl CodeTableConfig {
    /// Build the import task for this table.
    #[must_use]
    pub fn into_task(self) -> ExtractTask<CodeTableRows> {
        ExtractTask::new(
            format!("Import {}", self.table.record_code()),
            &self.path,
            CodeTableRows::new(self.table),
            self.batch_size,
        )
    }
}

/// Rows of a code table: `Code` and `Omschrijving`, no window.
#[derive(Debug, Clone, Copy)]
pub struct CodeTableRows {
    table: CodeTable,
}

impl CodeTableRows {
    /// Processor for `table`.
    #[must_use]
    pub fn new(table: CodeTable) -> Self {
        Self { table }
    }
}

impl RowProcessor for CodeTableRows {
    type Entity = CodeEntry;

    fn kind(&self) -> EntityKind {
        EntityKind::Code(self.table)
    }

    fn schema(&self) -> Arc<RecordSchema> {
        schema::code_table(self.table)
    }

    fn key_field(&self) -> &'static str {
        "Code"
    }

    fn process(&self, record: &Record, ctx: &mut RowContext<'_>) -> RowOutcome<CodeEntry> {
        RowOutcome::Accepted(CodeEntry::new(ctx.id(), record.text("Omschrijving")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::Task;
    use atlas_core::{Diagnostics, References};
    use rstest::rstest;

    #[rstest]
    fn code_rows_keep_code_and_description() {
        let processor = CodeTableRows::new(CodeTable::Status);
        let record = Record::from_pairs(
            processor.schema(),
            [("Code", "16"), ("Omschrijving", "Naamgeving uitgegeven")],
        );
        let references = References::new();
        let mut diagnostics = Diagnostics::new();
        let mut ctx = RowContext::new(processor.kind(), "16", &references, &mut diagnostics);

        let outcome = processor.process(&record, &mut ctx);

        assert_eq!(
            outcome,
            RowOutcome::Accepted(CodeEntry::new("16", "Naamgeving uitgegeven"))
        );
    }

    #[rstest]
    fn task_is_named_after_the_record_code() {
        let config = CodeTableConfig {
            table: CodeTable::RedenAfvoer,
            path: Utf8PathBuf::from("bag/AVR_1.UVA2"),
            batch_size: 10,
        };

        let task = config.into_task();

        assert_eq!(task.name(), "Import AVR");
    }
}
