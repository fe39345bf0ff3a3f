//! Address and building registry objects.

use chrono::NaiveDate;
use geo::{Geometry, Point};

use super::{
    Column, Entity, Geometric, Value, boolean, date, geometry, impl_rows_access, integer, text,
};

/// Town.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Woonplaats {
    /// Natural key.
    pub id: String,
    /// Town identifier.
    pub code: String,
    /// Name.
    pub naam: String,
    /// Mutation document number.
    pub document_nummer: String,
    /// Mutation document date.
    pub document_mutatie: Option<NaiveDate>,
    /// Spelling used by the postal service.
    pub naam_ptt: String,
    /// Whether the record has lapsed.
    pub vervallen: Option<bool>,
    /// Parent gemeente.
    pub gemeente_id: String,
}

const WOONPLAATS_COLUMNS: &[Column] = &[
    text("id"),
    text("code"),
    text("naam"),
    text("document_nummer"),
    date("document_mutatie"),
    text("naam_ptt"),
    boolean("vervallen"),
    text("gemeente_id"),
];

impl Entity for Woonplaats {
    fn columns() -> &'static [Column] {
        WOONPLAATS_COLUMNS
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
            Value::from(&self.document_nummer),
            Value::from(self.document_mutatie),
            Value::from(&self.naam_ptt),
            Value::from(self.vervallen),
            Value::from(&self.gemeente_id),
        ]
    }

    impl_rows_access!(Woonplaats, Woonplaatsen);
}

/// Public space such as a street or square.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OpenbareRuimte {
    /// Natural key.
    pub id: String,
    /// Domain type, e.g. `01` for a road.
    pub type_code: String,
    /// Name.
    pub naam: String,
    /// Street code.
    pub code: String,
    /// Mutation document number.
    pub document_nummer: String,
    /// Mutation document date.
    pub document_mutatie: Option<NaiveDate>,
    /// Street number.
    pub straat_nummer: String,
    /// NEN spelling.
    pub naam_nen: String,
    /// Postal spelling.
    pub naam_ptt: String,
    /// Whether the record has lapsed.
    pub vervallen: Option<bool>,
    /// Optional bron code.
    pub bron_id: Option<String>,
    /// Optional status code.
    pub status_id: Option<String>,
    /// Parent woonplaats.
    pub woonplaats_id: String,
}

const OPENBARE_RUIMTE_COLUMNS: &[Column] = &[
    text("id"),
    text("type"),
    text("naam"),
    text("code"),
    text("document_nummer"),
    date("document_mutatie"),
    text("straat_nummer"),
    text("naam_nen"),
    text("naam_ptt"),
    boolean("vervallen"),
    text("bron_id"),
    text("status_id"),
    text("woonplaats_id"),
];

impl Entity for OpenbareRuimte {
    fn columns() -> &'static [Column] {
        OPENBARE_RUIMTE_COLUMNS
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
            Value::from(&self.type_code),
            Value::from(&self.naam),
            Value::from(&self.code),
            Value::from(&self.document_nummer),
            Value::from(self.document_mutatie),
            Value::from(&self.straat_nummer),
            Value::from(&self.naam_nen),
            Value::from(&self.naam_ptt),
            Value::from(self.vervallen),
            Value::from(self.bron_id.as_ref()),
            Value::from(self.status_id.as_ref()),
            Value::from(&self.woonplaats_id),
        ]
    }

    impl_rows_access!(OpenbareRuimte, OpenbareRuimtes);
}

/// The single object an address designates.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AddressTarget {
    /// A ligplaats key.
    Ligplaats(String),
    /// A standplaats key.
    Standplaats(String),
    /// A verblijfsobject key.
    Verblijfsobject(String),
}

impl AddressTarget {
    fn ligplaats_id(&self) -> Option<&String> {
        match self {
            Self::Ligplaats(id) => Some(id),
            _ => None,
        }
    }

    fn standplaats_id(&self) -> Option<&String> {
        match self {
            Self::Standplaats(id) => Some(id),
            _ => None,
        }
    }

    fn verblijfsobject_id(&self) -> Option<&String> {
        match self {
            Self::Verblijfsobject(id) => Some(id),
            _ => None,
        }
    }
}

/// Address designation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Nummeraanduiding {
    /// Natural key.
    pub id: String,
    /// Address identification code.
    pub code: String,
    /// House number.
    pub huisnummer: Option<i64>,
    /// House letter.
    pub huisletter: String,
    /// House number suffix.
    pub huisnummer_toevoeging: String,
    /// Postcode.
    pub postcode: String,
    /// Mutation document date.
    pub document_mutatie: Option<NaiveDate>,
    /// Mutation document number.
    pub document_nummer: String,
    /// Type of the addressed object.
    pub type_code: String,
    /// Legacy address number.
    pub adres_nummer: String,
    /// Whether the record has lapsed.
    pub vervallen: Option<bool>,
    /// Optional bron code.
    pub bron_id: Option<String>,
    /// Optional status code.
    pub status_id: Option<String>,
    /// Parent openbare ruimte.
    pub openbare_ruimte_id: String,
    /// Object this address designates, set by the linking pass.
    pub target: Option<AddressTarget>,
    /// Whether this is the primary address of its target.
    pub hoofdadres: Option<bool>,
}

impl Nummeraanduiding {
    /// Point the address at `target`, replacing any earlier link.
    pub fn link(&mut self, target: AddressTarget, hoofdadres: bool) {
        self.target = Some(target);
        self.hoofdadres = Some(hoofdadres);
    }
}

const NUMMERAANDUIDING_COLUMNS: &[Column] = &[
    text("id"),
    text("code"),
    integer("huisnummer"),
    text("huisletter"),
    text("huisnummer_toevoeging"),
    text("postcode"),
    date("document_mutatie"),
    text("document_nummer"),
    text("type"),
    text("adres_nummer"),
    boolean("vervallen"),
    text("bron_id"),
    text("status_id"),
    text("openbare_ruimte_id"),
    text("ligplaats_id"),
    text("standplaats_id"),
    text("verblijfsobject_id"),
    boolean("hoofdadres"),
];

impl Entity for Nummeraanduiding {
    fn columns() -> &'static [Column] {
        NUMMERAANDUIDING_COLUMNS
    }

    fn key(&self) -> Option<&str> {
        Some(&self.id)
    }

    fn code(&self) -> Option<&str> {
        Some(&self.code)
    }

    fn values(&self) -> Vec<Value> {
        let target = self.target.as_ref();
        vec![
            Value::from(&self.id),
            Value::from(&self.code),
            Value::from(self.huisnummer),
            Value::from(&self.huisletter),
            Value::from(&self.huisnummer_toevoeging),
            Value::from(&self.postcode),
            Value::from(self.document_mutatie),
            Value::from(&self.document_nummer),
            Value::from(&self.type_code),
            Value::from(&self.adres_nummer),
            Value::from(self.vervallen),
            Value::from(self.bron_id.as_ref()),
            Value::from(self.status_id.as_ref()),
            Value::from(&self.openbare_ruimte_id),
            Value::from(target.and_then(AddressTarget::ligplaats_id)),
            Value::from(target.and_then(AddressTarget::standplaats_id)),
            Value::from(target.and_then(AddressTarget::verblijfsobject_id)),
            Value::from(self.hoofdadres),
        ]
    }

    impl_rows_access!(Nummeraanduiding, Nummeraanduidingen);
}

/// Mooring.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ligplaats {
    /// Natural key.
    pub id: String,
    /// Registry identification.
    pub identificatie: String,
    /// Whether the record has lapsed.
    pub vervallen: Option<bool>,
    /// Mutation document number.
    pub document_nummer: String,
    /// Mutation document date.
    pub document_mutatie: Option<NaiveDate>,
    /// Optional bron code.
    pub bron_id: Option<String>,
    /// Optional status code.
    pub status_id: Option<String>,
    /// Optional enclosing buurt.
    pub buurt_id: Option<String>,
    /// Outline from the geometry file.
    pub geometrie: Option<Geometry<f64>>,
}

/// Pitch.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Standplaats {
    /// Natural key.
    pub id: String,
    /// Registry identification.
    pub identificatie: String,
    /// Whether the record has lapsed.
    pub vervallen: Option<bool>,
    /// Mutation document number.
    pub document_nummer: String,
    /// Mutation document date.
    pub document_mutatie: Option<NaiveDate>,
    /// Optional bron code.
    pub bron_id: Option<String>,
    /// Optional status code.
    pub status_id: Option<String>,
    /// Optional enclosing buurt.
    pub buurt_id: Option<String>,
    /// Outline from the geometry file.
    pub geometrie: Option<Geometry<f64>>,
}

const PLAATS_COLUMNS: &[Column] = &[
    text("id"),
    text("identificatie"),
    boolean("vervallen"),
    text("document_nummer"),
    date("document_mutatie"),
    text("bron_id"),
    text("status_id"),
    text("buurt_id"),
    geometry("geometrie"),
];

macro_rules! plaats_entity {
    ($ty:ident, $variant:ident) => {
        impl Entity for $ty {
            fn columns() -> &'static [Column] {
                PLAATS_COLUMNS
            }

            fn key(&self) -> Option<&str> {
                Some(&self.id)
            }

            fn values(&self) -> Vec<Value> {
                vec![
                    Value::from(&self.id),
                    Value::from(&self.identificatie),
                    Value::from(self.vervallen),
                    Value::from(&self.document_nummer),
                    Value::from(self.document_mutatie),
                    Value::from(self.bron_id.as_ref()),
                    Value::from(self.status_id.as_ref()),
                    Value::from(self.buurt_id.as_ref()),
                    Value::geometry(self.geometrie.as_ref()),
                ]
            }

            impl_rows_access!($ty, $variant);
        }

        impl Geometric for $ty {
            fn attach_geometry(&mut self, geometry: Geometry<f64>) -> bool {
                self.geometrie = Some(geometry);
                true
            }
        }
    };
}

plaats_entity!(Ligplaats, Ligplaatsen);
plaats_entity!(Standplaats, Standplaatsen);

/// Dwelling or other addressable unit inside a pand.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Verblijfsobject {
    /// Natural key.
    pub id: String,
    /// Registry identification.
    pub identificatie: String,
    /// Location built from the X/Y coordinate fields.
    pub geometrie: Option<Point<f64>>,
    /// Intended-use code.
    pub gebruiksdoel_code: String,
    /// Intended-use description.
    pub gebruiksdoel_omschrijving: String,
    /// Floor area in square metres.
    pub oppervlakte: Option<i64>,
    /// Mutation document date.
    pub document_mutatie: Option<NaiveDate>,
    /// Mutation document number.
    pub document_nummer: String,
    /// Floor of the entrance.
    pub bouwlaag_toegang: Option<i64>,
    /// Coordinate status code.
    pub status_coordinaat_code: String,
    /// Coordinate status description.
    pub status_coordinaat_omschrijving: String,
    /// Number of floors.
    pub bouwlagen: Option<i64>,
    /// Dwelling type code.
    pub type_woonobject_code: String,
    /// Dwelling type description.
    pub type_woonobject_omschrijving: String,
    /// Whether it counts towards the housing stock.
    pub woningvoorraad: Option<bool>,
    /// Number of rooms.
    pub aantal_kamers: Option<i64>,
    /// Whether the record has lapsed.
    pub vervallen: Option<bool>,
    /// Optional reden afvoer code.
    pub reden_afvoer_id: Option<String>,
    /// Optional bron code.
    pub bron_id: Option<String>,
    /// Optional eigendomsverhouding code.
    pub eigendomsverhouding_id: Option<String>,
    /// Optional financieringswijze code.
    pub financieringswijze_id: Option<String>,
    /// Optional gebruik code.
    pub gebruik_id: Option<String>,
    /// Optional locatie ingang code.
    pub locatie_ingang_id: Option<String>,
    /// Optional ligging code.
    pub ligging_id: Option<String>,
    /// Optional toegang code.
    pub toegang_id: Option<String>,
    /// Optional status code.
    pub status_id: Option<String>,
    /// Optional enclosing buurt.
    pub buurt_id: Option<String>,
}

const VERBLIJFSOBJECT_COLUMNS: &[Column] = &[
    text("id"),
    text("identificatie"),
    geometry("geometrie"),
    text("gebruiksdoel_code"),
    text("gebruiksdoel_omschrijving"),
    integer("oppervlakte"),
    date("document_mutatie"),
    text("document_nummer"),
    integer("bouwlaag_toegang"),
    text("status_coordinaat_code"),
    text("status_coordinaat_omschrijving"),
    integer("bouwlagen"),
    text("type_woonobject_code"),
    text("type_woonobject_omschrijving"),
    boolean("woningvoorraad"),
    integer("aantal_kamers"),
    boolean("vervallen"),
    text("reden_afvoer_id"),
    text("bron_id"),
    text("eigendomsverhouding_id"),
    text("financieringswijze_id"),
    text("gebruik_id"),
    text("locatie_ingang_id"),
    text("ligging_id"),
    text("toegang_id"),
    text("status_id"),
    text("buurt_id"),
];

impl Entity for Verblijfsobject {
    fn columns() -> &'static [Column] {
        VERBLIJFSOBJECT_COLUMNS
    }

    fn key(&self) -> Option<&str> {
        Some(&self.id)
    }

    fn values(&self) -> Vec<Value> {
        vec![
            Value::from(&self.id),
            Value::from(&self.identificatie),
            Value::geometry(self.geometrie.as_ref()),
            Value::from(&self.gebruiksdoel_code),
            Value::from(&self.gebruiksdoel_omschrijving),
            Value::from(self.oppervlakte),
            Value::from(self.document_mutatie),
            Value::from(&self.document_nummer),
            Value::from(self.bouwlaag_toegang),
            Value::from(&self.status_coordinaat_code),
            Value::from(&self.status_coordinaat_omschrijving),
            Value::from(self.bouwlagen),
            Value::from(&self.type_woonobject_code),
            Value::from(&self.type_woonobject_omschrijving),
            Value::from(self.woningvoorraad),
            Value::from(self.aantal_kamers),
            Value::from(self.vervallen),
            Value::from(self.reden_afvoer_id.as_ref()),
            Value::from(self.bron_id.as_ref()),
            Value::from(self.eigendomsverhouding_id.as_ref()),
            Value::from(self.financieringswijze_id.as_ref()),
            Value::from(self.gebruik_id.as_ref()),
            Value::from(self.locatie_ingang_id.as_ref()),
            Value::from(self.ligging_id.as_ref()),
            Value::from(self.toegang_id.as_ref()),
            Value::from(self.status_id.as_ref()),
            Value::from(self.buurt_id.as_ref()),
        ]
    }

    impl_rows_access!(Verblijfsobject, Verblijfsobjecten);
}

/// Building.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pand {
    /// Natural key.
    pub id: String,
    /// Registry identification.
    pub identificatie: String,
    /// Mutation document date.
    pub document_mutatie: Option<NaiveDate>,
    /// Mutation document number.
    pub document_nummer: String,
    /// Original construction year.
    pub bouwjaar: Option<i64>,
    /// Lowest floor.
    pub laagste_bouwlaag: Option<i64>,
    /// Highest floor.
    pub hoogste_bouwlaag: Option<i64>,
    /// Building number.
    pub pandnummer: String,
    /// Whether the record has lapsed.
    pub vervallen: Option<bool>,
    /// Optional status code.
    pub status_id: Option<String>,
    /// Optional enclosing bouwblok.
    pub bouwblok_id: Option<String>,
    /// Footprint from the geometry file.
    pub geometrie: Option<Geometry<f64>>,
}

const PAND_COLUMNS: &[Column] = &[
    text("id"),
    text("identificatie"),
    date("document_mutatie"),
    text("document_nummer"),
    integer("bouwjaar"),
    integer("laagste_bouwlaag"),
    integer("hoogste_bouwlaag"),
    text("pandnummer"),
    boolean("vervallen"),
    text("status_id"),
    text("bouwblok_id"),
    geometry("geometrie"),
];

impl Entity for Pand {
    fn columns() -> &'static [Column] {
        PAND_COLUMNS
    }

    fn key(&self) -> Option<&str> {
        Some(&self.id)
    }

    fn values(&self) -> Vec<Value> {
        vec![
            Value::from(&self.id),
            Value::from(&self.identificatie),
            Value::from(self.document_mutatie),
            Value::from(&self.document_nummer),
            Value::from(self.bouwjaar),
            Value::from(self.laagste_bouwlaag),
            Value::from(self.hoogste_bouwlaag),
            Value::from(&self.pandnummer),
            Value::from(self.vervallen),
            Value::from(self.status_id.as_ref()),
            Value::from(self.bouwblok_id.as_ref()),
            Value::geometry(self.geometrie.as_ref()),
        ]
    }

    impl_rows_access!(Pand, Panden);
}

impl Geometric for Pand {
    fn attach_geometry(&mut self, geometry: Geometry<f64>) -> bool {
        self.geometrie = Some(geometry);
        true
    }
}

/// A verblijfsobject located in a pand.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VerblijfsobjectPandRelatie {
    /// Verblijfsobject key.
    pub verblijfsobject_id: String,
    /// Pand key.
    pub pand_id: String,
}

const RELATIE_COLUMNS: &[Column] = &[text("verblijfsobject_id"), text("pand_id")];

impl Entity for VerblijfsobjectPandRelatie {
    fn columns() -> &'static [Column] {
        RELATIE_COLUMNS
    }

    fn key(&self) -> Option<&str> {
        None
    }

    fn values(&self) -> Vec<Value> {
        vec![
            Value::from(&self.verblijfsobject_id),
            Value::from(&self.pand_id),
        ]
    }

    impl_rows_access!(VerblijfsobjectPandRelatie, VerblijfsobjectPandRelaties);
}
