//! Test helpers for composing diva deliveries on disk.

use atlas_data::{
    DivaLayout,
    geometry::{
        BOUWBLOK_SHAPEFILE, BUURT_SHAPEFILE, BUURTCOMBINATIE_SHAPEFILE,
        GEBIEDSGERICHTWERKEN_SHAPEFILE, GROOTSTEDELIJKGEBIED_SHAPEFILE, LIGPLAATS_WKT, PAND_WKT,
        STADSDEEL_SHAPEFILE, STANDPLAATS_WKT, UNESCO_SHAPEFILE,
    },
};
use camino::{Utf8Path, Utf8PathBuf};
use tempfile::TempDir;

const BAG_CODES: [&str; 21] = [
    "AVR", "BRN", "EGM", "FNG", "GBK", "LGG", "LOC", "TGG", "STS", "WPL", "OPR", "LIG", "STA",
    "VBO", "NUM", "NUMLIGHFD", "NUMSTAHFD", "NUMVBOHFD", "NUMVBONVN", "PND", "PNDVBO",
];

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    std::fs::write(path, contents).expect("write fixture file");
}

/// A delivery whose extracts hold no rows and whose shapefiles are empty
/// placeholders.
pub(super) struct Delivery {
    dir: TempDir,
}

impl Delivery {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let delivery = Self { dir };
        let root = delivery.root();
        for sub in [
            DivaLayout::BAG,
            DivaLayout::BAG_WKT,
            DivaLayout::GEBIEDEN,
            DivaLayout::GEBIEDEN_SHP,
        ] {
            std::fs::create_dir(root.join(sub)).expect("create source dir");
        }
        for code in BAG_CODES {
            let name = format!("{code}_20240101.UVA2");
            write_utf8(&root.join(DivaLayout::BAG).join(name), b"");
        }
        for code in ["GME", "SDL", "BRT", "BBK"] {
            let name = format!("{code}_20240101.UVA2");
            write_utf8(&root.join(DivaLayout::GEBIEDEN).join(name), b"");
        }
        for name in [LIGPLAATS_WKT, STANDPLAATS_WKT, PAND_WKT] {
            write_utf8(&root.join(DivaLayout::BAG_WKT).join(name), b"");
        }
        for name in [
            STADSDEEL_SHAPEFILE,
            BUURT_SHAPEFILE,
            BOUWBLOK_SHAPEFILE,
            BUURTCOMBINATIE_SHAPEFILE,
            GEBIEDSGERICHTWERKEN_SHAPEFILE,
            GROOTSTEDELIJKGEBIED_SHAPEFILE,
            UNESCO_SHAPEFILE,
        ] {
            write_utf8(&root.join(DivaLayout::GEBIEDEN_SHP).join(name), b"");
        }
        delivery
    }

    pub(super) fn root(&self) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(self.dir.path().to_path_buf()).expect("utf-8 workspace")
    }
}
