//! On-disk layout of a diva delivery and the errors raised while resolving
//! it.

use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use thiserror::Error;

/// Raised before any task runs when a required input is absent.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// The delivery root or one of its source directories is missing.
    #[error("required directory {path} does not exist")]
    MissingDirectory {
        /// Expected directory.
        path: Utf8PathBuf,
    },
    /// No extract for a record type was found.
    #[error("no {prefix}_*.UVA2 extract found in {dir}")]
    MissingExtract {
        /// Directory that was searched.
        dir: Utf8PathBuf,
        /// Record-type prefix, e.g. `BRN`.
        prefix: String,
    },
    /// A WKT file or shapefile is missing.
    #[error("required file {path} does not exist")]
    MissingFile {
        /// Expected file.
        path: Utf8PathBuf,
    },
    /// A source directory could not be listed.
    #[error("failed to list directory {path}")]
    ListDirectory {
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
        /// Directory being listed.
        path: Utf8PathBuf,
    },
}

/// The four source directories below a diva root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DivaLayout {
    root: Utf8PathBuf,
}

impl DivaLayout {
    /// Attribute extracts of the address and object registry.
    pub const BAG: &'static str = "bag";
    /// `id;WKT` geometry files.
    pub const BAG_WKT: &'static str = "bag_wkt";
    /// Attribute extracts of the area registry.
    pub const GEBIEDEN: &'static str = "gebieden";
    /// Area shapefiles.
    pub const GEBIEDEN_SHP: &'static str = "gebieden_shp";

    /// Validate that `root` and each of its source directories exist.
    ///
    /// # Examples
    /// ```no_run
    /// use atlas_data::DivaLayout;
    /// use camino::Utf8Path;
    ///
    /// # fn main() -> Result<(), atlas_data::ConfigurationError> {
    /// let layout = DivaLayout::open(Utf8Path::new("/srv/diva"))?;
    /// assert!(layout.bag().ends_with("bag"));
    /// # Ok(())
    /// # }
    /// ```
    pub fn open(root: &Utf8Path) -> Result<Self, ConfigurationError> {
        let layout = Self {
            root: root.to_path_buf(),
        };
        for dir in [
            layout.root.clone(),
            layout.bag(),
            layout.bag_wkt(),
            layout.gebieden(),
            layout.gebieden_shp(),
        ] {
            if !atlas_fs::dir_exists(&dir) {
                return Err(ConfigurationError::MissingDirectory { path: dir });
            }
        }
        Ok(layout)
    }

    /// Root directory.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Directory of the registry extracts.
    #[must_use]
    pub fn bag(&self) -> Utf8PathBuf {
        self.root.join(Self::BAG)
    }

    /// Directory of the `id;WKT` geometry files.
    #[must_use]
    pub fn bag_wkt(&self) -> Utf8PathBuf {
        self.root.join(Self::BAG_WKT)
    }

    /// Directory of the area extracts.
    #[must_use]
    pub fn gebieden(&self) -> Utf8PathBuf {
        self.root.join(Self::GEBIEDEN)
    }

    /// Directory of the area shapefiles.
    #[must_use]
    pub fn gebieden_shp(&self) -> Utf8PathBuf {
        self.root.join(Self::GEBIEDEN_SHP)
    }
}

/// Fail unless `path` names an existing regular file.
pub fn require_file(path: Utf8PathBuf) -> Result<Utf8PathBuf, ConfigurationError> {
    match atlas_fs::file_is_file(&path) {
        Ok(true) => Ok(path),
        Ok(false) | Err(_) => Err(ConfigurationError::MissingFile { path }),
    }
}
