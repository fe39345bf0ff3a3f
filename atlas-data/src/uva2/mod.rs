//! Reader for UVA2 attribute extracts.
//!
//! A UVA2 file is `;`-delimited Windows-1252 text. Its first column tags the
//! record type; the file opens with `VAN`, `TM` and
//! `HISTORISCHE_CONFIGURATIES` preamble lines and may repeat the field names
//! as a header. Only rows whose tag matches the requested schema are
//! yielded, zipped with that schema's fixed field list.

use std::sync::Arc;

use atlas_core::{Record, RecordSchema};
use camino::{Utf8Path, Utf8PathBuf};
use csv::{ByteRecord, ByteRecordsIntoIter, ReaderBuilder};
use encoding_rs::WINDOWS_1252;

use crate::{error::ReaderError, layout::ConfigurationError};

pub mod schema;

/// File extension of attribute extracts.
pub const EXTRACT_EXTENSION: &str = ".UVA2";

/// A row that was skipped because it could not be paired with its schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedRow {
    /// One-based line number.
    pub line: u64,
    /// Explanation suitable for a warning.
    pub message: String,
}

/// Lazy, single-use iterator over the records of one type in a UVA2 file.
///
/// Rows whose column count differs from the schema are not yielded; they are
/// collected as [`MalformedRow`]s for the caller to report.
pub struct Uva2Reader {
    path: Utf8PathBuf,
    schema: Arc<RecordSchema>,
    rows: ByteRecordsIntoIter<cap_std::fs_utf8::File>,
    malformed: Vec<MalformedRow>,
}

impl Uva2Reader {
    /// Open `path` and read records of `schema`'s type.
    pub fn open(path: &Utf8Path, schema: Arc<RecordSchema>) -> Result<Self, ReaderError> {
        let file = atlas_fs::open_utf8_file(path).map_err(|source| ReaderError::Open {
            source,
            path: path.to_path_buf(),
        })?;
        let rows = ReaderBuilder::new()
            .delimiter(b';')
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .from_reader(file)
            .into_byte_records();
        Ok(Self {
            path: path.to_path_buf(),
            schema,
            rows,
            malformed: Vec::new(),
        })
    }

    /// Path being read.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Drain the rows skipped so far.
    pub fn take_malformed(&mut self) -> Vec<MalformedRow> {
        std::mem::take(&mut self.malformed)
    }

    fn decode(raw: &[u8]) -> String {
        let (text, _) = WINDOWS_1252.decode_without_bom_handling(raw);
        text.into_owned()
    }

    fn to_record(&mut self, row: &ByteRecord) -> Option<Record> {
        let line = row.position().map_or(0, csv::Position::line);
        let mut fields = row.iter();
        let tag = fields.next().map(Self::decode)?;
        if tag.trim() != self.schema.code() {
            return None;
        }
        let mut values: Vec<String> = fields.map(Self::decode).collect();
        if values.len() == self.schema.len() + 1
            && values.last().is_some_and(|value| value.trim().is_empty())
        {
            values.pop();
        }
        if is_header(&self.schema, &values) {
            return None;
        }
        match Record::new(Arc::clone(&self.schema), values, line) {
            Ok(record) => Some(record),
            Err(mismatch) => {
                self.malformed.push(MalformedRow {
                    line,
                    message: format!("{}: line {line}: {mismatch}; skipping", self.path),
                });
                None
            }
        }
    }
}

fn is_header(schema: &RecordSchema, values: &[String]) -> bool {
    values.len() == schema.len()
        && values
            .iter()
            .zip(schema.fields())
            .all(|(value, field)| value.trim() == field)
}

impl Iterator for Uva2Reader {
    type Item = Result<Record, ReaderError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let row = match self.rows.next()? {
                Ok(row) => row,
                Err(source) => {
                    let line = source.position().map_or(0, csv::Position::line);
                    return Some(Err(ReaderError::Read {
                        source,
                        path: self.path.clone(),
                        line,
                    }));
                }
            };
            if let Some(record) = self.to_record(&row) {
                return Some(Ok(record));
            }
        }
    }
}

/// Find the newest `{prefix}_*.UVA2` extract in `dir`.
///
/// Candidates are ordered by modification time, then by name, and the last
/// one wins.
///
/// # Examples
/// ```no_run
/// use camino::Utf8Path;
/// use atlas_data::uva2::resolve_extract;
///
/// # fn main() -> Result<(), atlas_data::ConfigurationError> {
/// let path = resolve_extract(Utf8Path::new("diva/bag"), "BRN")?;
/// println!("reading {path}");
/// # Ok(())
/// # }
/// ```
pub fn resolve_extract(dir: &Utf8Path, prefix: &str) -> Result<Utf8PathBuf, ConfigurationError> {
    let files = atlas_fs::list_files(dir).map_err(|source| ConfigurationError::ListDirectory {
        source,
        path: dir.to_path_buf(),
    })?;
    let stem = format!("{prefix}_");
    files
        .into_iter()
        .filter(|file| file.name.starts_with(&stem) && file.name.ends_with(EXTRACT_EXTENSION))
        .max_by(|left, right| (left.modified, &left.name).cmp(&(right.modified, &right.name)))
        .map(|file| dir.join(file.name))
        .ok_or_else(|| ConfigurationError::MissingExtract {
            dir: dir.to_path_buf(),
            prefix: prefix.to_owned(),
        })
}

#[cfg(test)]
mod tests;
