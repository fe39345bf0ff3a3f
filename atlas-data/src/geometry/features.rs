//! Vector features read from area shapefiles.

use std::collections::HashMap;

use camino::{Utf8Path, Utf8PathBuf};
use geo::Geometry;
use shapefile::dbase::{FieldValue, Record as DbaseRecord};

use crate::error::ReaderError;

/// One shapefile feature: requested attribute columns as text plus the
/// converted shape.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Feature {
    /// Attribute values keyed by column name; empty values are absent.
    pub attributes: HashMap<String, String>,
    /// Shape, or `None` for null and unsupported shapes.
    pub geometry: Option<Geometry<f64>>,
}

impl Feature {
    /// Value of attribute `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Value of attribute `name`, empty when absent.
    #[must_use]
    pub fn text(&self, name: &str) -> String {
        self.get(name).unwrap_or_default().to_owned()
    }
}

/// Streams features to a visitor.
///
/// Sources apply no filtering; every feature is handed to `visit` in file
/// order.
pub trait FeatureSource {
    /// Visit every feature once.
    fn for_each_feature(&mut self, visit: &mut dyn FnMut(Feature)) -> Result<(), ReaderError>;
}

/// [`FeatureSource`] backed by a `.shp` file and its `.dbf` attribute table.
#[derive(Debug)]
pub struct ShapefileSource {
    path: Utf8PathBuf,
    columns: Vec<String>,
}

impl ShapefileSource {
    /// Read `columns` of each feature in the shapefile at `path`.
    ///
    /// The file is opened lazily by [`FeatureSource::for_each_feature`].
    pub fn open<I, S>(path: &Utf8Path, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            path: path.to_path_buf(),
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }

    /// Path of the `.shp` file.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    fn attributes(&self, record: &DbaseRecord) -> HashMap<String, String> {
        self.columns
            .iter()
            .filter_map(|column| {
                let value = record.get(column).and_then(field_text)?;
                Some((column.clone(), value))
            })
            .collect()
    }
}

impl FeatureSource for ShapefileSource {
    fn for_each_feature(&mut self, visit: &mut dyn FnMut(Feature)) -> Result<(), ReaderError> {
        let shapefile_error = |source| ReaderError::Shapefile {
            source,
            path: self.path.clone(),
        };
        let mut reader =
            shapefile::Reader::from_path(self.path.as_std_path()).map_err(shapefile_error)?;
        for item in reader.iter_shapes_and_records() {
            let (shape, record) = item.map_err(shapefile_error)?;
            let geometry = Geometry::<f64>::try_from(shape).ok();
            visit(Feature {
                attributes: self.attributes(&record),
                geometry,
            });
        }
        Ok(())
    }
}

fn field_text(value: &FieldValue) -> Option<String> {
    let text = match value {
        FieldValue::Character(text) => text.as_deref().map(str::to_owned)?,
        FieldValue::Memo(text) => text.clone(),
        FieldValue::Numeric(number) => number.map(|n| n.to_string())?,
        FieldValue::Float(number) => number.map(|n| n.to_string())?,
        FieldValue::Double(number) => number.to_string(),
        FieldValue::Integer(number) => number.to_string(),
        FieldValue::Logical(flag) => flag.map(|flag| if flag { "J" } else { "N" }.to_owned())?,
        FieldValue::Date(date) => date.map(|date| {
            format!("{:04}{:02}{:02}", date.year(), date.month(), date.day())
        })?,
        _ => return None,
    };
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

/// In-memory [`FeatureSource`].
#[derive(Debug, Clone, Default)]
pub struct VecFeatureSource {
    features: Vec<Feature>,
}

impl VecFeatureSource {
    /// Serve `features` in order.
    #[must_use]
    pub fn new(features: Vec<Feature>) -> Self {
        Self { features }
    }
}

impl FeatureSource for VecFeatureSource {
    fn for_each_feature(&mut self, visit: &mut dyn FnMut(Feature)) -> Result<(), ReaderError> {
        self.features.iter().cloned().for_each(visit);
        Ok(())
    }
}
