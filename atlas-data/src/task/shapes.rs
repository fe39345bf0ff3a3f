//! Area kinds read from a shapefile alone.

use atlas_core::{
    Buurtcombinatie, DiagnosticKind, Diagnostics, Entity, EntityKind, EntitySet, EntityStore,
    Gebiedsgerichtwerken, Grootstedelijkgebied, References, TaskReport, Unesco,
    coerce::parse_date, entity::into_multipolygon,
};
use camino::Utf8Path;
use chrono::NaiveDate;
use geo::MultiPolygon;

use super::{Task, TaskError};
use crate::geometry::{Feature, FeatureSource, ShapefileSource};

/// Turns shapefile features into entities.
pub trait FeatureProcessor {
    /// Entity produced.
    type Entity: Entity;

    /// Kind the task replaces.
    fn kind(&self) -> EntityKind;

    /// Attribute columns to read.
    fn columns(&self) -> &'static [&'static str];

    /// Kinds whose `code → key` index must be loaded before processing.
    fn code_indexes(&self) -> Vec<EntityKind> {
        Vec::new()
    }

    /// Build an entity, or `None` to skip the feature.
    fn process(
        &self,
        feature: Feature,
        references: &References,
        diagnostics: &mut Diagnostics,
    ) -> Option<Self::Entity>;
}

/// Imports every feature of one shapefile.
pub struct FeatureTask<F: FeatureProcessor> {
    name: String,
    source: Box<dyn FeatureSource>,
    processor: F,
    batch_size: usize,
    references: References,
    diagnostics: Diagnostics,
    materialized: usize,
}

impl<F: FeatureProcessor> FeatureTask<F> {
    /// Task named `name` reading features from `source`.
    pub fn new(
        name: impl Into<String>,
        source: impl FeatureSource + 'static,
        processor: F,
        batch_size: usize,
    ) -> Self {
        Self {
            name: name.into(),
            source: Box::new(source),
            processor,
            batch_size,
            references: References::new(),
            diagnostics: Diagnostics::new(),
            materialized: 0,
        }
    }

    /// Task reading the shapefile at `path`.
    pub fn shapefile(name: impl Into<String>, path: &Utf8Path, processor: F, batch_size: usize) -> Self {
        let source = ShapefileSource::open(path, processor.columns().iter().copied());
        Self::new(name, source, processor, batch_size)
    }
}

impl<F: FeatureProcessor> Task for FeatureTask<F> {
    fn name(&self) -> &str {
        &self.name
    }

    fn before(&mut self, store: &mut dyn EntityStore) -> Result<(), TaskError> {
        store.clear(self.processor.kind())?;
        self.references = References::new();
        for kind in self.processor.code_indexes() {
            self.references.load_codes(&*store, kind)?;
        }
        Ok(())
    }

    fn process(&mut self, store: &mut dyn EntityStore) -> Result<(), TaskError> {
        let processor = &self.processor;
        let references = &self.references;
        let diagnostics = &mut self.diagnostics;
        let mut entities = Vec::new();
        self.source.for_each_feature(&mut |feature| {
            entities.extend(processor.process(feature, references, diagnostics));
        })?;
        let set = EntitySet::new(self.processor.kind(), entities);
        self.materialized = store.bulk_insert(&set, self.batch_size)?;
        Ok(())
    }

    fn after(&mut self) -> TaskReport {
        self.references.clear();
        TaskReport {
            task: self.name.clone(),
            materialized: std::mem::take(&mut self.materialized),
            diagnostics: std::mem::take(&mut self.diagnostics),
        }
    }
}

fn outline(
    feature: &mut Feature,
    entity: &str,
    diagnostics: &mut Diagnostics,
) -> Option<MultiPolygon<f64>> {
    let outline = feature.geometry.take().and_then(into_multipolygon);
    if outline.is_none() {
        diagnostics.warn(
            DiagnosticKind::MalformedField,
            format!("{entity} has no polygonal geometry; ignoring"),
        );
    }
    outline
}

fn date(
    feature: &Feature,
    column: &str,
    entity: &str,
    diagnostics: &mut Diagnostics,
) -> Option<NaiveDate> {
    parse_date(feature.get(column)).unwrap_or_else(|err| {
        diagnostics.warn(
            DiagnosticKind::MalformedField,
            format!("{entity} has {err} in {column}; ignoring"),
        );
        None
    })
}

/// `GBD_Buurtcombinatie` features.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuurtcombinatieFeatures;

impl FeatureProcessor for BuurtcombinatieFeatures {
    type Entity = Buurtcombinatie;

    fn kind(&self) -> EntityKind {
        EntityKind::Buurtcombinatie
    }

    fn columns(&self) -> &'static [&'static str] {
        &["NAAM", "CODE", "VOLLCODE", "DOCNR", "DOCDATUM", "INGSDATUM"]
    }

    fn process(
        &self,
        mut feature: Feature,
        _references: &References,
        diagnostics: &mut Diagnostics,
    ) -> Option<Buurtcombinatie> {
        let label = format!("buurtcombinatie {}", feature.text("VOLLCODE"));
        Some(Buurtcombinatie {
            naam: feature.text("NAAM"),
            code: feature.text("CODE"),
            vollcode: feature.text("VOLLCODE"),
            brondocument_naam: feature.text("DOCNR"),
            brondocument_datum: date(&feature, "DOCDATUM", &label, diagnostics),
            ingang_cyclus: date(&feature, "INGSDATUM", &label, diagnostics),
            geometrie: outline(&mut feature, &label, diagnostics),
        })
    }
}

/// `GBD_gebiedsgerichtwerken` features, tied to their stadsdeel by code.
#[derive(Debug, Clone, Copy, Default)]
pub struct GebiedsgerichtwerkenFeatures;

impl FeatureProcessor for GebiedsgerichtwerkenFeatures {
    type Entity = Gebiedsgerichtwerken;

    fn kind(&self) -> EntityKind {
        EntityKind::Gebiedsgerichtwerken
    }

    fn columns(&self) -> &'static [&'static str] {
        &["NAAM", "CODE", "STADSDEEL"]
    }

    fn code_indexes(&self) -> Vec<EntityKind> {
        vec![EntityKind::Stadsdeel]
    }

    fn process(
        &self,
        mut feature: Feature,
        references: &References,
        diagnostics: &mut Diagnostics,
    ) -> Option<Gebiedsgerichtwerken> {
        let code = feature.text("CODE");
        let stadsdeel = feature.text("STADSDEEL");
        let label = format!("gebiedsgerichtwerken {code}");
        let Some(stadsdeel_id) = references.key_for_code(EntityKind::Stadsdeel, &stadsdeel) else {
            diagnostics.warn(
                DiagnosticKind::DanglingRequiredReference,
                format!("{label} references non-existing stadsdeel {stadsdeel}; skipping"),
            );
            return None;
        };
        let stadsdeel_id = stadsdeel_id.to_owned();
        Some(Gebiedsgerichtwerken {
            naam: feature.text("NAAM"),
            geometrie: outline(&mut feature, &label, diagnostics),
            code,
            stadsdeel_id,
        })
    }
}

macro_rules! named_area_features {
    ($name:ident, $entity:ident, $kind:ident, $doc:literal) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $name;

        impl FeatureProcessor for $name {
            type Entity = $entity;

            fn kind(&self) -> EntityKind {
                EntityKind::$kind
            }

            fn columns(&self) -> &'static [&'static str] {
                &["NAAM"]
            }

            fn process(
                &self,
                mut feature: Feature,
                _references: &References,
                diagnostics: &mut Diagnostics,
            ) -> Option<$entity> {
                let naam = feature.text("NAAM");
                let label = format!("{} {naam}", EntityKind::$kind.label());
                Some($entity {
                    geometrie: outline(&mut feature, &label, diagnostics),
                    naam,
                })
            }
        }
    };
}

named_area_features!(
    GrootstedelijkgebiedFeatures,
    Grootstedelijkgebied,
    Grootstedelijkgebied,
    "`GBD_grootstedelijke_projecten` features."
);
named_area_features!(UnescoFeatures, Unesco, Unesco, "`GBD_unesco` features.");
