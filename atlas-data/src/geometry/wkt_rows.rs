//! Reader for flat `id;WKT` geometry files.
//!
//! Files are decoded as Windows-1252, like the UVA2 extracts of the same
//! delivery.

use std::io::{BufRead, BufReader, Split};

use camino::{Utf8Path, Utf8PathBuf};
use encoding_rs::WINDOWS_1252;
use geo::Geometry;
use wkt::TryFromWkt;

use crate::{error::ReaderError, uva2::MalformedRow};

/// One geometry keyed by its source identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct WktRow {
    /// Identifier as written in the file, before any key transform.
    pub id: String,
    /// Parsed geometry.
    pub geometry: Geometry<f64>,
}

/// Lazy iterator over the rows of an `id;WKT` file.
///
/// Blank lines are ignored. Lines without a `;` separator or with
/// unparsable WKT are collected as [`MalformedRow`]s.
pub struct WktReader {
    path: Utf8PathBuf,
    lines: Split<BufReader<cap_std::fs_utf8::File>>,
    line: u64,
    malformed: Vec<MalformedRow>,
}

impl WktReader {
    /// Open the WKT file at `path`.
    pub fn open(path: &Utf8Path) -> Result<Self, ReaderError> {
        let file = atlas_fs::open_utf8_file(path).map_err(|source| ReaderError::Open {
            source,
            path: path.to_path_buf(),
        })?;
        Ok(Self {
            path: path.to_path_buf(),
            lines: BufReader::new(file).split(b'\n'),
            line: 0,
            malformed: Vec::new(),
        })
    }

    /// Drain the lines skipped so far.
    pub fn take_malformed(&mut self) -> Vec<MalformedRow> {
        std::mem::take(&mut self.malformed)
    }

    fn skip(&mut self, message: &str) {
        self.malformed.push(MalformedRow {
            line: self.line,
            message: format!("{}: line {}: {message}; skipping", self.path, self.line),
        });
    }

    fn parse(&mut self, text: &str) -> Option<WktRow> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }
        let Some((id, wkt)) = trimmed.split_once(';') else {
            self.skip("missing `;` separator");
            return None;
        };
        match Geometry::<f64>::try_from_wkt_str(wkt.trim()) {
            Ok(geometry) => Some(WktRow {
                id: id.trim().to_owned(),
                geometry,
            }),
            Err(err) => {
                self.skip(&format!("invalid WKT ({err})"));
                None
            }
        }
    }
}

impl Iterator for WktReader {
    type Item = Result<WktRow, ReaderError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let read = self.lines.next()?;
            self.line += 1;
            let raw = match read {
                Ok(raw) => raw,
                Err(source) => {
                    return Some(Err(ReaderError::ReadLine {
                        source,
                        path: self.path.clone(),
                        line: self.line,
                    }));
                }
            };
            let (text, _) = WINDOWS_1252.decode_without_bom_handling(&raw);
            if let Some(row) = self.parse(&text) {
                return Some(Ok(row));
            }
        }
    }
}
