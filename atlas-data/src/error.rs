//! Errors raised while reading source files.

use std::io;

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors raised while reading source files.
#[derive(Debug, Error)]
pub enum ReaderError {
    /// The file could not be opened.
    #[error("failed to open source file at {path}")]
    Open {
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
        /// File being opened.
        path: Utf8PathBuf,
    },
    /// A UVA2 extract could not be read.
    #[error("failed to read {path} near line {line}")]
    Read {
        /// Underlying CSV failure.
        #[source]
        source: csv::Error,
        /// Extract being read.
        path: Utf8PathBuf,
        /// Last line read before the failure.
        line: u64,
    },
    /// A line of a WKT file could not be read.
    #[error("failed to read line {line} of {path}")]
    ReadLine {
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
        /// File being read.
        path: Utf8PathBuf,
        /// Line number, starting at 1.
        line: u64,
    },
    /// A shapefile could not be opened or decoded.
    #[error("failed to read shapefile {path}")]
    Shapefile {
        /// Underlying shapefile failure.
        #[source]
        source: shapefile::Error,
        /// Shapefile being read.
        path: Utf8PathBuf,
    },
}
