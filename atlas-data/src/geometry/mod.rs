//! Secondary geometry sources: area shapefiles and flat `id;WKT` files.

mod features;
mod wkt_rows;

pub use features::{Feature, FeatureSource, ShapefileSource, VecFeatureSource};
pub use wkt_rows::{WktReader, WktRow};

/// Shapefile holding stadsdeel outlines.
pub const STADSDEEL_SHAPEFILE: &str = "GBD_Stadsdeel.shp";
/// Shapefile holding buurt outlines.
pub const BUURT_SHAPEFILE: &str = "GBD_Buurt.shp";
/// Shapefile holding bouwblok outlines.
pub const BOUWBLOK_SHAPEFILE: &str = "GBD_Bouwblok.shp";
/// Shapefile holding buurtcombinaties.
pub const BUURTCOMBINATIE_SHAPEFILE: &str = "GBD_Buurtcombinatie.shp";
/// Shapefile holding gebiedsgerichtwerken areas.
pub const GEBIEDSGERICHTWERKEN_SHAPEFILE: &str = "GBD_gebiedsgerichtwerken.shp";
/// Shapefile holding grootstedelijke projects.
pub const GROOTSTEDELIJKGEBIED_SHAPEFILE: &str = "GBD_grootstedelijke_projecten.shp";
/// Shapefile holding UNESCO heritage areas.
pub const UNESCO_SHAPEFILE: &str = "GBD_unesco.shp";

/// WKT file holding ligplaats outlines.
pub const LIGPLAATS_WKT: &str = "BAG_LIGPLAATS_GEOMETRIE.dat";
/// WKT file holding standplaats outlines.
pub const STANDPLAATS_WKT: &str = "BAG_STANDPLAATS_GEOMETRIE.dat";
/// WKT file holding pand outlines.
pub const PAND_WKT: &str = "BAG_PAND_GEOMETRIE.dat";
