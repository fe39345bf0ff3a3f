//! Field layouts of every UVA2 record type the import reads.
//!
//! These layouts are an external contract; extracts carry no header the
//! reader could trust.

use std::sync::Arc;

use atlas_core::{CodeTable, RecordSchema};

/// Natural key column shared by every registry record type.
pub const SLEUTEL: &str = "sleutelVerzendend";
/// Lapsed-record indicator shared by most record types.
pub const VERVALLEN: &str = "Indicatie-vervallen";
/// Foreign key naming the address of a linking row.
pub const NUMMERAANDUIDING: &str = "IdentificatiecodeNummeraanduiding";

const CODE: &str = "Code";

fn relation_to(target: &str, key: &str) -> String {
    format!("{target}/{key}")
}

/// Code-description table.
#[must_use]
pub fn code_table(table: CodeTable) -> Arc<RecordSchema> {
    Arc::new(
        RecordSchema::builder(table.record_code())
            .fields([CODE, "Omschrijving"])
            .build(),
    )
}

/// Gemeente (`GME`).
#[must_use]
pub fn gemeente() -> Arc<RecordSchema> {
    Arc::new(
        RecordSchema::builder("GME")
            .fields([
                SLEUTEL,
                "Gemeentecode",
                "Gemeentenaam",
                "IndicatieVerzorgingsgebied",
                VERVALLEN,
            ])
            .validity()
            .build(),
    )
}

/// Woonplaats (`WPL`).
#[must_use]
pub fn woonplaats() -> Arc<RecordSchema> {
    Arc::new(
        RecordSchema::builder("WPL")
            .fields([
                SLEUTEL,
                "Woonplaatsidentificatie",
                "Woonplaatsnaam",
                "DocumentnummerMutatieWoonplaats",
                "DocumentdatumMutatieWoonplaats",
                "WoonplaatsPTTSchrijfwijze",
                VERVALLEN,
            ])
            .validity()
            .relation("WPLGME", [relation_to("GME", SLEUTEL)])
            .build(),
    )
}

/// Stadsdeel (`SDL`).
#[must_use]
pub fn stadsdeel() -> Arc<RecordSchema> {
    Arc::new(
        RecordSchema::builder("SDL")
            .fields([
                SLEUTEL,
                "Stadsdeelcode",
                "Stadsdeelnaam",
                "Brondocumentverwijzing",
                "Brondocumentdatum",
                VERVALLEN,
            ])
            .validity()
            .relation("SDLGME", [relation_to("GME", SLEUTEL)])
            .build(),
    )
}

/// Buurt (`BRT`).
#[must_use]
pub fn buurt() -> Arc<RecordSchema> {
    Arc::new(
        RecordSchema::builder("BRT")
            .fields([
                SLEUTEL,
                "Buurtcode",
                "Buurtnaam",
                "Brondocumentverwijzing",
                "Brondocumentdatum",
                VERVALLEN,
            ])
            .validity()
            .relation("BRTSDL", [relation_to("SDL", SLEUTEL)])
            .build(),
    )
}

/// Bouwblok (`BBK`).
#[must_use]
pub fn bouwblok() -> Arc<RecordSchema> {
    Arc::new(
        RecordSchema::builder("BBK")
            .fields([SLEUTEL, "Bouwbloknummer"])
            .validity()
            .relation("BBKBRT", [relation_to("BRT", SLEUTEL)])
            .build(),
    )
}

/// Openbare ruimte (`OPR`).
#[must_use]
pub fn openbare_ruimte() -> Arc<RecordSchema> {
    Arc::new(
        RecordSchema::builder("OPR")
            .fields([
                SLEUTEL,
                "TypeOpenbareRuimteDomein",
                "NaamOpenbareRuimte",
                "Straatcode",
                "DocumentnummerMutatieOpenbareRuimte",
                "DocumentdatumMutatieOpenbareRuimte",
                "Straatnummer",
                "StraatnaamNENSchrijfwijze",
                "StraatnaamPTTSchrijfwijze",
                VERVALLEN,
            ])
            .validity()
            .relation("OPRBRN", [relation_to("BRN", CODE)])
            .relation("OPRSTS", [relation_to("STS", CODE)])
            .relation("OPRWPL", [relation_to("WPL", SLEUTEL)])
            .build(),
    )
}

/// Nummeraanduiding (`NUM`).
#[must_use]
pub fn nummeraanduiding() -> Arc<RecordSchema> {
    Arc::new(
        RecordSchema::builder("NUM")
            .fields([
                SLEUTEL,
                NUMMERAANDUIDING,
                "Huisnummer",
                "Huisletter",
                "Huisnummertoevoeging",
                "Postcode",
                "DocumentdatumMutatieNummeraanduiding",
                "DocumentnummerMutatieNummeraanduiding",
                "TypeAdresseerbaarObjectDomein",
                "Adresnummer",
                VERVALLEN,
            ])
            .validity()
            .relation("NUMBRN", [relation_to("BRN", CODE)])
            .relation("NUMSTS", [relation_to("STS", CODE)])
            .relation("NUMOPR", [relation_to("OPR", SLEUTEL)])
            .build(),
    )
}

/// Address link record type (`NUMLIGHFD`, `NUMSTAHFD`, `NUMVBOHFD`,
/// `NUMVBONVN`); `target` is the record code of the linked object.
#[must_use]
pub fn address_link(code: &str, target: &str) -> Arc<RecordSchema> {
    Arc::new(
        RecordSchema::builder(code)
            .fields([SLEUTEL, NUMMERAANDUIDING])
            .validity()
            .relation(code, [relation_to(target, SLEUTEL)])
            .build(),
    )
}

fn plaats(code: &str, name: &str) -> Arc<RecordSchema> {
    Arc::new(
        RecordSchema::builder(code)
            .fields([
                SLEUTEL.to_owned(),
                format!("{name}identificatie"),
                VERVALLEN.to_owned(),
                format!("DocumentnummerMutatie{name}"),
                format!("DocumentdatumMutatie{name}"),
            ])
            .validity()
            .relation(&format!("{code}BRN"), [relation_to("BRN", CODE)])
            .relation(&format!("{code}STS"), [relation_to("STS", CODE)])
            .relation(&format!("{code}BRT"), [relation_to("BRT", SLEUTEL)])
            .build(),
    )
}

/// Ligplaats (`LIG`).
#[must_use]
pub fn ligplaats() -> Arc<RecordSchema> {
    plaats("LIG", "Ligplaats")
}

/// Standplaats (`STA`).
#[must_use]
pub fn standplaats() -> Arc<RecordSchema> {
    plaats("STA", "Standplaats")
}

/// Relation groups of a verblijfsobject, in column order.
pub const VERBLIJFSOBJECT_RELATIONS: [(&str, &str); 12] = [
    ("VBOAVR", "AVR/Code"),
    ("VBOBRN", "BRN/Code"),
    ("VBOEGM", "EGM/Code"),
    ("VBOFNG", "FNG/Code"),
    ("VBOGBK", "GBK/Code"),
    ("VBOLOC", "LOC/Code"),
    ("VBOLGG", "LGG/Code"),
    ("VBOMNT", "MNT/Code"),
    ("VBOTGG", "TGG/Code"),
    ("VBOOVR", "OVR/Code"),
    ("VBOSTS", "STS/Code"),
    ("VBOBRT", "BRT/sleutelVerzendend"),
];

/// Verblijfsobject (`VBO`).
#[must_use]
pub fn verblijfsobject() -> Arc<RecordSchema> {
    let builder = RecordSchema::builder("VBO")
        .fields([
            SLEUTEL,
            "Verblijfsobjectidentificatie",
            "X-Coordinaat",
            "Y-Coordinaat",
            "GebruiksdoelVerblijfsobjectDomein",
            "OmschrijvingGebruiksdoelVerblijfsobjectDomein",
            "OppervlakteVerblijfsobject",
            "DocumentdatumMutatieVerblijfsobject",
            "DocumentnummerMutatieVerblijfsobject",
            "Bouwlaagtoegang",
            "StatusCoordinaatDomein",
            "OmschrijvingCoordinaatDomein",
            "AantalBouwlagen",
            "TypeWoonobjectDomein",
            "OmschrijvingTypeWoonobjectDomein",
            "IndicatieWoningvoorraad",
            "AantalKamers",
            VERVALLEN,
        ])
        .validity();
    let builder = VERBLIJFSOBJECT_RELATIONS
        .iter()
        .fold(builder, |builder, (group, target)| {
            builder.relation(group, [*target])
        });
    Arc::new(builder.build())
}

/// Pand (`PND`).
#[must_use]
pub fn pand() -> Arc<RecordSchema> {
    Arc::new(
        RecordSchema::builder("PND")
            .fields([
                SLEUTEL,
                "Pandidentificatie",
                "DocumentdatumMutatiePand",
                "DocumentnummerMutatiePand",
                "OorspronkelijkBouwjaarPand",
                "LaagsteBouwlaag",
                "HoogsteBouwlaag",
                "Pandnummer",
                VERVALLEN,
            ])
            .validity()
            .relation("PNDSTS", [relation_to("STS", CODE)])
            .relation("PNDBBK", [relation_to("BBK", SLEUTEL)])
            .build(),
    )
}

/// Pand–verblijfsobject relation (`PNDVBO`).
#[must_use]
pub fn pand_verblijfsobject() -> Arc<RecordSchema> {
    Arc::new(
        RecordSchema::builder("PNDVBO")
            .field(SLEUTEL)
            .validity()
            .relation("PNDVBO", [relation_to("VBO", SLEUTEL)])
            .build(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(gemeente(), "GME", 7)]
    #[case(stadsdeel(), "SDL", 11)]
    #[case(bouwblok(), "BBK", 7)]
    #[case(address_link("NUMLIGHFD", "LIG"), "NUMLIGHFD", 7)]
    #[case(pand_verblijfsobject(), "PNDVBO", 6)]
    fn layouts_have_expected_width(
        #[case] schema: Arc<RecordSchema>,
        #[case] code: &str,
        #[case] width: usize,
    ) {
        assert_eq!(schema.code(), code);
        assert_eq!(schema.len(), width);
    }

    #[rstest]
    fn plaats_layouts_name_their_type() {
        let schema = ligplaats();
        assert!(schema.position("Ligplaatsidentificatie").is_some());
        assert!(schema.position("LIGBRT/BRT/sleutelVerzendend").is_some());
        assert!(schema.position("LIGSTS/TijdvakRelatie/einddatumRelatie").is_some());
    }

    #[rstest]
    fn verblijfsobject_declares_every_relation() {
        let schema = verblijfsobject();
        for (group, target) in VERBLIJFSOBJECT_RELATIONS {
            assert!(
                schema.position(&format!("{group}/{target}")).is_some(),
                "missing {group}/{target}"
            );
        }
    }
}
