//! Administrative areas: the gemeente → stadsdeel → buurt → bouwblok
//! hierarchy and the shapefile-only area layers.

use chrono::NaiveDate;
use geo::{Geometry, MultiPolygon};

use super::{
    Column, Entity, Geometric, Value, boolean, date, geometry, impl_rows_access, into_multipolygon,
    text,
};

/// Municipality.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Gemeente {
    /// Natural key (`sleutelVerzendend`).
    pub id: String,
    /// Municipal code.
    pub code: String,
    /// Name.
    pub naam: String,
    /// Whether the municipality is a service area.
    pub verzorgingsgebied: Option<bool>,
    /// Whether the record has lapsed.
    pub vervallen: Option<bool>,
}

const GEMEENTE_COLUMNS: &[Column] = &[
    text("id"),
    text("code"),
    text("naam"),
    boolean("verzorgingsgebied"),
    boolean("vervallen"),
];

impl Entity for Gemeente {
    fn columns() -> &'static [Column] {
        GEMEENTE_COLUMNS
    }

    fn key(&self) -> Option<&str> {
        Some(&self.id)
    }

    fn code(&self) -> Option<&str> {
        Some(&self.code)
    }

    fn values(&self) -> Vec<Value> {
        vec![
            Value::from(&self.id),
            Value::from(&self.code),
            Value::from(&self.naam),
            Value::from(self.verzorgingsgebied),
            Value::from(self.vervallen),
        ]
    }

    impl_rows_access!(Gemeente, Gemeenten);
}

/// City district.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Stadsdeel {
    /// Natural key.
    pub id: String,
    /// District code, used to join the shapefile.
    pub code: String,
    /// Name.
    pub naam: String,
    /// Source document reference.
    pub brondocument_naam: String,
    /// Source document date.
    pub brondocument_datum: Option<NaiveDate>,
    /// Start of the validity cycle.
    pub ingang_cyclus: Option<NaiveDate>,
    /// Whether the record has lapsed.
    pub vervallen: Option<bool>,
    /// Parent gemeente.
    pub gemeente_id: String,
    /// Outline from the district shapefile.
    pub geometrie: Option<MultiPolygon<f64>>,
}

const STADSDEEL_COLUMNS: &[Column] = &[
    text("id"),
    text("code"),
    text("naam"),
    text("brondocument_naam"),
    date("brondocument_datum"),
    date("ingang_cyclus"),
    boolean("vervallen"),
    text("gemeente_id"),
    geometry("geometrie"),
];

impl Entity for Stadsdeel {
    fn columns() -> &'static [Column] {
        STADSDEEL_COLUMNS
    }

    fn key(&self) -> Option<&str> {
        Some(&self.id)
    }

    fn code(&self) -> Option<&str> {
        Some(&self.code)
    }

    fn values(&self) -> Vec<Value> {
        vec![
            Value::from(&self.id),
            Value::from(&self.code),
            Value::from(&self.naam),
            Value::from(&self.brondocument_naam),
            Value::from(self.brondocument_datum),
            Value::from(self.ingang_cyclus),
            Value::from(self.vervallen),
            Value::from(&self.gemeente_id),
            Value::geometry(self.geometrie.as_ref()),
        ]
    }

    impl_rows_access!(Stadsdeel, Stadsdelen);
}

impl Geometric for Stadsdeel {
    fn attach_geometry(&mut self, geometry: Geometry<f64>) -> bool {
        attach_area(&mut self.geometrie, geometry)
    }
}

/// Neighbourhood.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Buurt {
    /// Natural key.
    pub id: String,
    /// Neighbourhood code without the district prefix.
    pub code: String,
    /// Name.
    pub naam: String,
    /// Source document reference.
    pub brondocument_naam: String,
    /// Source document date.
    pub brondocument_datum: Option<NaiveDate>,
    /// Start of the validity cycle.
    pub ingang_cyclus: Option<NaiveDate>,
    /// Whether the record has lapsed.
    pub vervallen: Option<bool>,
    /// Parent stadsdeel.
    pub stadsdeel_id: String,
    /// Outline from the neighbourhood shapefile.
    pub geometrie: Option<MultiPolygon<f64>>,
}

const BUURT_COLUMNS: &[Column] = &[
    text("id"),
    text("code"),
    text("naam"),
    text("brondocument_naam"),
    date("brondocument_datum"),
    date("ingang_cyclus"),
    boolean("vervallen"),
    text("stadsdeel_id"),
    geometry("geometrie"),
];

impl Entity for Buurt {
    fn columns() -> &'static [Column] {
        BUURT_COLUMNS
    }

    fn key(&self) -> Option<&str> {
        Some(&self.id)
    }

    fn code(&self) -> Option<&str> {
        Some(&self.code)
    }

    fn values(&self) -> Vec<Value> {
        vec![
            Value::from(&self.id),
            Value::from(&self.code),
            Value::from(&self.naam),
            Value::from(&self.brondocument_naam),
            Value::from(self.brondocument_datum),
            Value::from(self.ingang_cyclus),
            Value::from(self.vervallen),
            Value::from(&self.stadsdeel_id),
            Value::geometry(self.geometrie.as_ref()),
        ]
    }

    impl_rows_access!(Buurt, Buurten);
}

impl Geometric for Buurt {
    fn attach_geometry(&mut self, geometry: Geometry<f64>) -> bool {
        attach_area(&mut self.geometrie, geometry)
    }
}

/// Building block.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bouwblok {
    /// Natural key.
    pub id: String,
    /// Block number.
    pub code: String,
    /// Start of the validity cycle.
    pub ingang_cyclus: Option<NaiveDate>,
    /// Parent buurt.
    pub buurt_id: String,
    /// Outline from the block shapefile.
    pub geometrie: Option<MultiPolygon<f64>>,
}

const BOUWBLOK_COLUMNS: &[Column] = &[
    text("id"),
    text("code"),
    date("ingang_cyclus"),
    text("buurt_id"),
    geometry("geometrie"),
];

impl Entity for Bouwblok {
    fn columns() -> &'static [Column] {
        BOUWBLOK_COLUMNS
    }

    fn key(&self) -> Option<&str> {
        Some(&self.id)
    }

    fn code(&self) -> Option<&str> {
        Some(&self.code)
    }

    fn values(&self) -> Vec<Value> {
        vec![
            Value::from(&self.id),
            Value::from(&self.code),
            Value::from(self.ingang_cyclus),
            Value::from(&self.buurt_id),
            Value::geometry(self.geometrie.as_ref()),
        ]
    }

    impl_rows_access!(Bouwblok, Bouwblokken);
}

impl Geometric for Bouwblok {
    fn attach_geometry(&mut self, geometry: Geometry<f64>) -> bool {
        attach_area(&mut self.geometrie, geometry)
    }
}

/// Cluster of neighbourhoods, read from its shapefile alone.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Buurtcombinatie {
    /// Name.
    pub naam: String,
    /// Short code.
    pub code: String,
    /// Code including the district letter.
    pub vollcode: String,
    /// Source document reference.
    pub brondocument_naam: String,
    /// Source document date.
    pub brondocument_datum: Option<NaiveDate>,
    /// Start of the validity cycle.
    pub ingang_cyclus: Option<NaiveDate>,
    /// Outline.
    pub geometrie: Option<MultiPolygon<f64>>,
}

const BUURTCOMBINATIE_COLUMNS: &[Column] = &[
    text("naam"),
    text("code"),
    text("vollcode"),
    text("brondocument_naam"),
    date("brondocument_datum"),
    date("ingang_cyclus"),
    geometry("geometrie"),
];

impl Entity for Buurtcombinatie {
    fn columns() -> &'static [Column] {
        BUURTCOMBINATIE_COLUMNS
    }

    fn key(&self) -> Option<&str> {
        None
    }

    fn values(&self) -> Vec<Value> {
        vec![
            Value::from(&self.naam),
            Value::from(&self.code),
            Value::from(&self.vollcode),
            Value::from(&self.brondocument_naam),
            Value::from(self.brondocument_datum),
            Value::from(self.ingang_cyclus),
            Value::geometry(self.geometrie.as_ref()),
        ]
    }

    impl_rows_access!(Buurtcombinatie, Buurtcombinaties);
}

/// Area-focused working region, tied to a stadsdeel by its code.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Gebiedsgerichtwerken {
    /// Name.
    pub naam: String,
    /// Region code.
    pub code: String,
    /// Natural key of the owning stadsdeel.
    pub stadsdeel_id: String,
    /// Outline.
    pub geometrie: Option<MultiPolygon<f64>>,
}

const GEBIEDSGERICHTWERKEN_COLUMNS: &[Column] = &[
    text("naam"),
    text("code"),
    text("stadsdeel_id"),
    geometry("geometrie"),
];

impl Entity for Gebiedsgerichtwerken {
    fn columns() -> &'static [Column] {
        GEBIEDSGERICHTWERKEN_COLUMNS
    }

    fn key(&self) -> Option<&str> {
        None
    }

    fn values(&self) -> Vec<Value> {
        vec![
            Value::from(&self.naam),
            Value::from(&self.code),
            Value::from(&self.stadsdeel_id),
            Value::geometry(self.geometrie.as_ref()),
        ]
    }

    impl_rows_access!(Gebiedsgerichtwerken, Gebiedsgerichtwerkens);
}

/// Metropolitan project area.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Grootstedelijkgebied {
    /// Name.
    pub naam: String,
    /// Outline.
    pub geometrie: Option<MultiPolygon<f64>>,
}

/// UNESCO heritage area.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Unesco {
    /// Name.
    pub naam: String,
    /// Outline.
    pub geometrie: Option<MultiPolygon<f64>>,
}

const NAMED_AREA_COLUMNS: &[Column] = &[text("naam"), geometry("geometrie")];

impl Entity for Grootstedelijkgebied {
    fn columns() -> &'static [Column] {
        NAMED_AREA_COLUMNS
    }

    fn key(&self) -> Option<&str> {
        None
    }

    fn values(&self) -> Vec<Value> {
        vec![
            Value::from(&self.naam),
            Value::geometry(self.geometrie.as_ref()),
        ]
    }

    impl_rows_access!(Grootstedelijkgebied, Grootstedelijkgebieden);
}

impl Entity for Unesco {
    fn columns() -> &'static [Column] {
        NAMED_AREA_COLUMNS
    }

    fn key(&self) -> Option<&str> {
        None
    }

    fn values(&self) -> Vec<Value> {
        vec![
            Value::from(&self.naam),
            Value::geometry(self.geometrie.as_ref()),
        ]
    }

    impl_rows_access!(Unesco, Unescos);
}

fn attach_area(slot: &mut Option<MultiPolygon<f64>>, geometry: Geometry<f64>) -> bool {
    match into_multipolygon(geometry) {
        Some(multi) => {
            *slot = Some(multi);
            true
        }
        None => false,
    }
}
