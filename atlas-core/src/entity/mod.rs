//! Entity types produced by the import and the column model used to persist
//! them.
//!
//! Each entity knows its own column layout and how to flatten itself into
//! [`Value`]s, so storage backends can stay generic over the ~20 kinds.

mod bag;
mod codes;
mod gebieden;

use std::fmt;

use chrono::NaiveDate;
use geo::{Geometry, MultiPolygon};

pub use bag::{
    AddressTarget, Ligplaats, Nummeraanduiding, OpenbareRuimte, Pand, Standplaats,
    Verblijfsobject, VerblijfsobjectPandRelatie, Woonplaats,
};
pub use codes::{CodeEntry, CodeTable};
pub use gebieden::{
    Bouwblok, Buurt, Buurtcombinatie, Gebiedsgerichtwerken, Gemeente, Grootstedelijkgebied,
    Stadsdeel, Unesco,
};

/// Every entity kind the import materializes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EntityKind {
    /// One of the code-description tables.
    Code(CodeTable),
    /// Municipality.
    Gemeente,
    /// Town.
    Woonplaats,
    /// City district.
    Stadsdeel,
    /// Neighbourhood.
    Buurt,
    /// Building block.
    Bouwblok,
    /// Public space such as a street.
    OpenbareRuimte,
    /// Mooring.
    Ligplaats,
    /// Pitch.
    Standplaats,
    /// Dwelling or other addressable unit.
    Verblijfsobject,
    /// Address designation.
    Nummeraanduiding,
    /// Building.
    Pand,
    /// Link between a verblijfsobject and the pand containing it.
    VerblijfsobjectPandRelatie,
    /// Cluster of neighbourhoods.
    Buurtcombinatie,
    /// Area-focused working region.
    Gebiedsgerichtwerken,
    /// Metropolitan project area.
    Grootstedelijkgebied,
    /// UNESCO heritage area.
    Unesco,
}

impl EntityKind {
    /// Storage table name.
    #[must_use]
    pub fn table_name(self) -> &'static str {
        match self {
            Self::Code(table) => table.table_name(),
            Self::Gemeente => "gemeente",
            Self::Woonplaats => "woonplaats",
            Self::Stadsdeel => "stadsdeel",
            Self::Buurt => "buurt",
            Self::Bouwblok => "bouwblok",
            Self::OpenbareRuimte => "openbare_ruimte",
            Self::Ligplaats => "ligplaats",
            Self::Standplaats => "standplaats",
            Self::Verblijfsobject => "verblijfsobject",
            Self::Nummeraanduiding => "nummeraanduiding",
            Self::Pand => "pand",
            Self::VerblijfsobjectPandRelatie => "verblijfsobject_pand_relatie",
            Self::Buurtcombinatie => "buurtcombinatie",
            Self::Gebiedsgerichtwerken => "gebiedsgerichtwerken",
            Self::Grootstedelijkgebied => "grootstedelijkgebied",
            Self::Unesco => "unesco",
        }
    }

    /// Lower-case name used in warnings.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Code(table) => table.label(),
            Self::OpenbareRuimte => "openbare ruimte",
            Self::VerblijfsobjectPandRelatie => "verblijfsobject-pand relatie",
            other => other.table_name(),
        }
    }

    /// Whether rows carry a natural key that other kinds reference.
    #[must_use]
    pub fn has_natural_key(self) -> bool {
        !matches!(
            self,
            Self::VerblijfsobjectPandRelatie
                | Self::Buurtcombinatie
                | Self::Gebiedsgerichtwerken
                | Self::Grootstedelijkgebied
                | Self::Unesco
        )
    }

    /// Whether keyed rows can also be looked up by their `code` column.
    #[must_use]
    pub fn has_code(self) -> bool {
        matches!(
            self,
            Self::Gemeente
                | Self::Woonplaats
                | Self::Stadsdeel
                | Self::Buurt
                | Self::Bouwblok
                | Self::OpenbareRuimte
                | Self::Nummeraanduiding
        )
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Storage type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    /// UTF-8 text.
    Text,
    /// Signed integer.
    Integer,
    /// Boolean flag.
    Boolean,
    /// Calendar date.
    Date,
    /// Vector geometry.
    Geometry,
}

/// One persisted column of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    /// Column name.
    pub name: &'static str,
    /// Column type.
    pub ty: ColumnType,
}

impl Column {
    pub(crate) const fn new(name: &'static str, ty: ColumnType) -> Self {
        Self { name, ty }
    }
}

pub(crate) const fn text(name: &'static str) -> Column {
    Column::new(name, ColumnType::Text)
}

pub(crate) const fn integer(name: &'static str) -> Column {
    Column::new(name, ColumnType::Integer)
}

pub(crate) const fn boolean(name: &'static str) -> Column {
    Column::new(name, ColumnType::Boolean)
}

pub(crate) const fn date(name: &'static str) -> Column {
    Column::new(name, ColumnType::Date)
}

pub(crate) const fn geometry(name: &'static str) -> Column {
    Column::new(name, ColumnType::Geometry)
}

/// A single column value ready for a storage backend.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// SQL `NULL`.
    Null,
    /// Text.
    Text(String),
    /// Integer.
    Integer(i64),
    /// Boolean.
    Boolean(bool),
    /// Date.
    Date(NaiveDate),
    /// Geometry.
    Geometry(Geometry<f64>),
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        if value.is_empty() {
            Self::Null
        } else {
            Self::Text(value.to_owned())
        }
    }
}

impl From<&String> for Value {
    fn from(value: &String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<Option<&String>> for Value {
    fn from(value: Option<&String>) -> Self {
        value.map_or(Self::Null, Self::from)
    }
}

impl From<Option<i64>> for Value {
    fn from(value: Option<i64>) -> Self {
        value.map_or(Self::Null, Self::Integer)
    }
}

impl From<Option<bool>> for Value {
    fn from(value: Option<bool>) -> Self {
        value.map_or(Self::Null, Self::Boolean)
    }
}

impl From<Option<NaiveDate>> for Value {
    fn from(value: Option<NaiveDate>) -> Self {
        value.map_or(Self::Null, Self::Date)
    }
}

impl Value {
    /// Wrap an optional geometry of any concrete shape.
    pub fn geometry<G: Clone + Into<Geometry<f64>>>(value: Option<&G>) -> Self {
        value.map_or(Self::Null, |geometry| Self::Geometry(geometry.clone().into()))
    }
}

/// Behaviour shared by every materialized entity.
pub trait Entity: Clone + fmt::Debug + Sized {
    /// Persisted columns in value order.
    fn columns() -> &'static [Column];

    /// Natural key, when the kind has one.
    fn key(&self) -> Option<&str>;

    /// Secondary `code`, for kinds looked up by code.
    fn code(&self) -> Option<&str> {
        None
    }

    /// Column values in the order given by [`Entity::columns`].
    fn values(&self) -> Vec<Value>;

    /// Wrap a batch of entities of this type.
    fn into_rows(rows: Vec<Self>) -> EntityRows;

    /// Borrow the entities of this type from `rows`, if it holds them.
    fn from_rows(rows: &EntityRows) -> Option<&[Self]>;
}

/// An entity that receives geometry from a secondary source.
pub trait Geometric {
    /// Attach `geometry`, returning `false` when its shape is unsupported.
    fn attach_geometry(&mut self, geometry: Geometry<f64>) -> bool;
}

/// Normalize a polygonal geometry into a multipolygon.
///
/// # Examples
/// ```
/// use atlas_core::entity::into_multipolygon;
/// use geo::{Geometry, Point, polygon};
///
/// let square = polygon![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 1.0, y: 1.0)];
/// assert_eq!(into_multipolygon(Geometry::Polygon(square)).map(|m| m.0.len()), Some(1));
/// assert!(into_multipolygon(Geometry::Point(Point::new(0.0, 0.0))).is_none());
/// ```
#[must_use]
pub fn into_multipolygon(geometry: Geometry<f64>) -> Option<MultiPolygon<f64>> {
    match geometry {
        Geometry::Polygon(polygon) => Some(MultiPolygon::new(vec![polygon])),
        Geometry::MultiPolygon(multi) => Some(multi),
        Geometry::GeometryCollection(collection) => collection
            .into_iter()
            .map(into_multipolygon)
            .try_fold(Vec::new(), |mut polygons, multi| {
                polygons.extend(multi?.0);
                Some(polygons)
            })
            .map(MultiPolygon::new),
        _ => None,
    }
}

macro_rules! entity_rows {
    ($($variant:ident($ty:ty)),+ $(,)?) => {
        /// Homogeneous batch of entities of one Rust type.
        #[derive(Debug, Clone, PartialEq)]
        pub enum EntityRows {
            $(
                #[doc = concat!("Rows of [`", stringify!($ty), "`].")]
                $variant(Vec<$ty>),
            )+
        }

        impl EntityRows {
            /// Number of rows.
            #[must_use]
            pub fn len(&self) -> usize {
                match self {
                    $(Self::$variant(rows) => rows.len(),)+
                }
            }

            /// Whether the batch is empty.
            #[must_use]
            pub fn is_empty(&self) -> bool {
                self.len() == 0
            }

            /// Column layout of the contained type.
            #[must_use]
            pub fn columns(&self) -> &'static [Column] {
                match self {
                    $(Self::$variant(_) => <$ty as Entity>::columns(),)+
                }
            }

            /// Natural keys of the rows that have one.
            #[must_use]
            pub fn keys(&self) -> Vec<String> {
                match self {
                    $(Self::$variant(rows) => rows
                        .iter()
                        .filter_map(|row| row.key().map(str::to_owned))
                        .collect(),)+
                }
            }

            /// `(code, key)` pairs of the rows that have both.
            #[must_use]
            pub fn code_pairs(&self) -> Vec<(String, String)> {
                match self {
                    $(Self::$variant(rows) => rows
                        .iter()
                        .filter_map(|row| Some((row.code()?.to_owned(), row.key()?.to_owned())))
                        .collect(),)+
                }
            }

            /// Flattened values of each row.
            pub fn value_rows(&self) -> Box<dyn Iterator<Item = Vec<Value>> + '_> {
                match self {
                    $(Self::$variant(rows) => Box::new(rows.iter().map(Entity::values)),)+
                }
            }
        }

        $(
            impl From<Vec<$ty>> for EntityRows {
                fn from(rows: Vec<$ty>) -> Self {
                    Self::$variant(rows)
                }
            }
        )+
    };
}

entity_rows! {
    Codes(CodeEntry),
    Gemeenten(Gemeente),
    Woonplaatsen(Woonplaats),
    Stadsdelen(Stadsdeel),
    Buurten(Buurt),
    Bouwblokken(Bouwblok),
    OpenbareRuimtes(OpenbareRuimte),
    Ligplaatsen(Ligplaats),
    Standplaatsen(Standplaats),
    Verblijfsobjecten(Verblijfsobject),
    Nummeraanduidingen(Nummeraanduiding),
    Panden(Pand),
    VerblijfsobjectPandRelaties(VerblijfsobjectPandRelatie),
    Buurtcombinaties(Buurtcombinatie),
    Gebiedsgerichtwerkens(Gebiedsgerichtwerken),
    Grootstedelijkgebieden(Grootstedelijkgebied),
    Unescos(Unesco),
}

/// The finished output of one task, handed to the store in a single call.
#[derive(Debug, Clone, PartialEq)]
pub struct EntitySet {
    kind: EntityKind,
    rows: EntityRows,
}

impl EntitySet {
    /// Wrap `rows` as the materialized set of `kind`.
    pub fn new<E: Entity>(kind: EntityKind, rows: Vec<E>) -> Self {
        Self {
            kind,
            rows: E::into_rows(rows),
        }
    }

    /// Kind the set replaces in storage.
    #[must_use]
    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Underlying rows.
    #[must_use]
    pub fn rows(&self) -> &EntityRows {
        &self.rows
    }

    /// Typed view of the rows, if they hold entities of type `E`.
    #[must_use]
    pub fn entities<E: Entity>(&self) -> Option<&[E]> {
        E::from_rows(&self.rows)
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

macro_rules! impl_rows_access {
    ($ty:ty, $variant:ident) => {
        fn into_rows(rows: Vec<Self>) -> $crate::entity::EntityRows {
            $crate::entity::EntityRows::$variant(rows)
        }

        fn from_rows(rows: &$crate::entity::EntityRows) -> Option<&[Self]> {
            match rows {
                $crate::entity::EntityRows::$variant(rows) => Some(rows),
                _ => None,
            }
        }
    };
}

pub(crate) use impl_rows_access;

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{Point, polygon};
    use rstest::rstest;

    #[rstest]
    fn kinds_without_natural_keys() {
        assert!(EntityKind::Stadsdeel.has_natural_key());
        assert!(EntityKind::Code(CodeTable::Bron).has_natural_key());
        assert!(!EntityKind::Unesco.has_natural_key());
        assert!(!EntityKind::VerblijfsobjectPandRelatie.has_natural_key());
    }

    #[rstest]
    fn labels_read_naturally() {
        assert_eq!(EntityKind::OpenbareRuimte.to_string(), "openbare ruimte");
        assert_eq!(EntityKind::Code(CodeTable::RedenAfvoer).label(), "reden afvoer");
        assert_eq!(EntityKind::Gemeente.label(), "gemeente");
    }

    #[rstest]
    fn flattens_collections_of_polygons() {
        let a = polygon![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 1.0, y: 1.0)];
        let b = polygon![(x: 2.0, y: 2.0), (x: 3.0, y: 2.0), (x: 3.0, y: 3.0)];
        let collection = Geometry::GeometryCollection(geo::GeometryCollection::from(vec![
            Geometry::Polygon(a),
            Geometry::MultiPolygon(MultiPolygon::new(vec![b])),
        ]));

        let multi = into_multipolygon(collection).expect("polygonal collection");

        assert_eq!(multi.0.len(), 2);
    }

    #[rstest]
    fn rejects_collections_with_points() {
        let collection = Geometry::GeometryCollection(geo::GeometryCollection::from(vec![Geometry::Point(
            Point::new(0.0, 0.0),
        )]));
        assert!(into_multipolygon(collection).is_none());
    }

    #[rstest]
    fn empty_text_is_null() {
        assert_eq!(Value::from(""), Value::Null);
        assert_eq!(Value::from("x"), Value::Text("x".into()));
    }

    #[rstest]
    fn typed_view_matches_row_type() {
        let set = EntitySet::new(
            EntityKind::Code(CodeTable::Bron),
            vec![CodeEntry::new("001", "Foo")],
        );

        assert_eq!(set.entities::<CodeEntry>().map(<[_]>::len), Some(1));
        assert!(set.entities::<Gemeente>().is_none());
        assert_eq!(set.rows().keys(), ["001"]);
    }
}
