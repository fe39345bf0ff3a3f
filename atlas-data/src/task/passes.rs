//! Merge passes: outlines from shapefiles and WKT files, and the address
//! links of nummeraanduidingen.

use std::sync::Arc;

use atlas_core::{
    AddressTarget, DiagnosticKind, Diagnostics, EntityKind, Geometric, Nummeraanduiding,
    References, Rejection, is_valid,
};
use camino::{Utf8Path, Utf8PathBuf};

use super::{TaskError, extract::MergePass};
use crate::{
    geometry::{FeatureSource, WktReader},
    merge::{KeyTransform, KeyedEntities},
    uva2::{
        Uva2Reader,
        schema::{self, NUMMERAANDUIDING, SLEUTEL},
    },
};

fn file_label(path: &Utf8Path) -> String {
    path.file_name().unwrap_or(path.as_str()).to_owned()
}

fn attach<E: Geometric>(
    entities: &mut KeyedEntities<E>,
    source_id: &str,
    key: &str,
    geometry: geo::Geometry<f64>,
    diagnostics: &mut Diagnostics,
) {
    let mut supported = true;
    entities.merge(source_id, key, diagnostics, |entity| {
        supported = entity.attach_geometry(geometry);
    });
    if !supported {
        diagnostics.warn(
            DiagnosticKind::MalformedField,
            format!("{source_id} has an unsupported geometry type; ignoring"),
        );
    }
}

/// Attaches shapefile outlines to entities keyed by a government code.
pub struct ShapefileGeometryPass {
    label: String,
    source: Box<dyn FeatureSource>,
    key_column: &'static str,
    transform: KeyTransform,
}

impl ShapefileGeometryPass {
    /// Match the `key_column` attribute of each feature of `source`, after
    /// `transform`, against entity keys. `label` names the source in
    /// warnings.
    pub fn new(
        label: impl Into<String>,
        source: impl FeatureSource + 'static,
        key_column: &'static str,
        transform: KeyTransform,
    ) -> Self {
        Self {
            label: label.into(),
            source: Box::new(source),
            key_column,
            transform,
        }
    }
}

impl<E: Geometric> MergePass<E> for ShapefileGeometryPass {
    fn run(
        &mut self,
        entities: &mut KeyedEntities<E>,
        _references: &References,
        diagnostics: &mut Diagnostics,
    ) -> Result<(), TaskError> {
        let label = &self.label;
        let key_column = self.key_column;
        let transform = self.transform;
        self.source.for_each_feature(&mut |feature| {
            let Some(raw) = feature.get(key_column) else {
                diagnostics.warn(
                    DiagnosticKind::MalformedRow,
                    format!("{label} has a feature without {key_column}; skipping"),
                );
                return;
            };
            let source_id = format!("{label} feature {raw}");
            let key = transform.apply(raw);
            let Some(geometry) = feature.geometry else {
                diagnostics.warn(
                    DiagnosticKind::MalformedField,
                    format!("{source_id} has no geometry; skipping"),
                );
                return;
            };
            attach(entities, &source_id, &key, geometry, diagnostics);
        })?;
        Ok(())
    }
}

/// Attaches outlines from an `id;WKT` file whose identifiers lack the
/// leading zero of the entity keys.
#[derive(Debug, Clone)]
pub struct WktGeometryPass {
    path: Utf8PathBuf,
    transform: KeyTransform,
}

impl WktGeometryPass {
    /// Read geometries from `path`.
    #[must_use]
    pub fn new(path: &Utf8Path) -> Self {
        Self {
            path: path.to_path_buf(),
            transform: KeyTransform::LeadingZero,
        }
    }
}

impl<E: Geometric> MergePass<E> for WktGeometryPass {
    fn run(
        &mut self,
        entities: &mut KeyedEntities<E>,
        _references: &References,
        diagnostics: &mut Diagnostics,
    ) -> Result<(), TaskError> {
        let label = file_label(&self.path);
        let mut reader = WktReader::open(&self.path)?;
        for row in reader.by_ref() {
            let row = row?;
            let source_id = format!("{label} row {}", row.id);
            let key = self.transform.apply(&row.id);
            attach(entities, &source_id, &key, row.geometry, diagnostics);
        }
        for row in reader.take_malformed() {
            diagnostics.warn(DiagnosticKind::MalformedRow, row.message);
        }
        Ok(())
    }
}

/// The four record types that link an address to the object it designates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    /// Main address of a ligplaats (`NUMLIGHFD`).
    LigplaatsHoofdadres,
    /// Main address of a standplaats (`NUMSTAHFD`).
    StandplaatsHoofdadres,
    /// Main address of a verblijfsobject (`NUMVBOHFD`).
    VerblijfsobjectHoofdadres,
    /// Secondary address of a verblijfsobject (`NUMVBONVN`).
    VerblijfsobjectNevenadres,
}

impl LinkKind {
    /// Link types in the order they are applied.
    pub const ALL: [Self; 4] = [
        Self::LigplaatsHoofdadres,
        Self::StandplaatsHoofdadres,
        Self::VerblijfsobjectHoofdadres,
        Self::VerblijfsobjectNevenadres,
    ];

    /// UVA2 record code, also the extract file prefix.
    #[must_use]
    pub fn record_code(self) -> &'static str {
        match self {
            Self::LigplaatsHoofdadres => "NUMLIGHFD",
            Self::StandplaatsHoofdadres => "NUMSTAHFD",
            Self::VerblijfsobjectHoofdadres => "NUMVBOHFD",
            Self::VerblijfsobjectNevenadres => "NUMVBONVN",
        }
    }

    fn target_code(self) -> &'static str {
        match self {
            Self::LigplaatsHoofdadres => "LIG",
            Self::StandplaatsHoofdadres => "STA",
            Self::VerblijfsobjectHoofdadres | Self::VerblijfsobjectNevenadres => "VBO",
        }
    }

    /// Kind of the linked object.
    #[must_use]
    pub fn target(self) -> EntityKind {
        match self {
            Self::LigplaatsHoofdadres => EntityKind::Ligplaats,
            Self::StandplaatsHoofdadres => EntityKind::Standplaats,
            Self::VerblijfsobjectHoofdadres | Self::VerblijfsobjectNevenadres => {
                EntityKind::Verblijfsobject
            }
        }
    }

    /// Whether the link makes the address the object's main address.
    #[must_use]
    pub fn hoofdadres(self) -> bool {
        !matches!(self, Self::VerblijfsobjectNevenadres)
    }

    fn address_target(self, key: String) -> AddressTarget {
        match self {
            Self::LigplaatsHoofdadres => AddressTarget::Ligplaats(key),
            Self::StandplaatsHoofdadres => AddressTarget::Standplaats(key),
            Self::VerblijfsobjectHoofdadres | Self::VerblijfsobjectNevenadres => {
                AddressTarget::Verblijfsobject(key)
            }
        }
    }

    fn target_field(self) -> String {
        format!("{}/{}/{SLEUTEL}", self.record_code(), self.target_code())
    }
}

/// One linking extract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkSource {
    /// Link type.
    pub kind: LinkKind,
    /// Resolved `{CODE}_*.UVA2` extract.
    pub path: Utf8PathBuf,
}

/// Points nummeraanduidingen at their ligplaats, standplaats or
/// verblijfsobject. Sources are applied in order, so a later link replaces
/// an earlier one.
#[derive(Debug, Clone, Default)]
pub struct AddressLinkPass {
    sources: Vec<LinkSource>,
}

impl AddressLinkPass {
    /// Apply `sources` in order.
    #[must_use]
    pub fn new(sources: Vec<LinkSource>) -> Self {
        Self { sources }
    }

    fn apply(
        source: &LinkSource,
        entities: &mut KeyedEntities<Nummeraanduiding>,
        references: &References,
        diagnostics: &mut Diagnostics,
    ) -> Result<(), TaskError> {
        let kind = source.kind;
        let schema = schema::address_link(kind.record_code(), kind.target_code());
        let relations = schema.relation_groups();
        let target_field = kind.target_field();
        let mut reader = Uva2Reader::open(&source.path, Arc::clone(&schema))?;
        for record in reader.by_ref() {
            let record = record?;
            if !is_valid(&record, &relations) {
                diagnostics.reject(&Rejection::InvalidWindow);
                continue;
            }
            let Some(id) = record.value(SLEUTEL) else {
                diagnostics.reject(&Rejection::MissingKey {
                    entity: kind.record_code(),
                    line: record.line(),
                });
                continue;
            };
            let target = record.text(&target_field);
            if !references.contains(kind.target(), &target) {
                diagnostics.warn(
                    DiagnosticKind::DanglingRequiredReference,
                    format!(
                        "{} {id} references non-existing {} {target}; skipping",
                        kind.record_code(),
                        kind.target().label()
                    ),
                );
                continue;
            }
            let address = record.text(NUMMERAANDUIDING);
            let source_id = format!("{} {id}", kind.record_code());
            entities.merge(&source_id, &address, diagnostics, |nummeraanduiding| {
                nummeraanduiding.link(kind.address_target(target), kind.hoofdadres());
            });
        }
        for row in reader.take_malformed() {
            diagnostics.warn(DiagnosticKind::MalformedRow, row.message);
        }
        Ok(())
    }
}

impl MergePass<Nummeraanduiding> for AddressLinkPass {
    fn references(&self) -> Vec<EntityKind> {
        vec![
            EntityKind::Ligplaats,
            EntityKind::Standplaats,
            EntityKind::Verblijfsobject,
        ]
    }

    fn run(
        &mut self,
        entities: &mut KeyedEntities<Nummeraanduiding>,
        references: &References,
        diagnostics: &mut Diagnostics,
    ) -> Result<(), TaskError> {
        for source in &self.sources {
            Self::apply(source, entities, references, diagnostics)?;
        }
        Ok(())
    }
}
