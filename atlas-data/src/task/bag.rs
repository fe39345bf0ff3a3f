//! Row processors for the address and object registry.

use std::sync::Arc;

use atlas_core::{
    CodeTable, EntityKind, Ligplaats, Nummeraanduiding, OpenbareRuimte, Pand, Record,
    RecordSchema, Rejection, RowContext, RowOutcome, Standplaats,
    Verblijfsobject, VerblijfsobjectPandRelatie, Woonplaats,
};

use super::extract::RowProcessor;
use crate::uva2::schema::{self, NUMMERAANDUIDING, SLEUTEL, VERVALLEN};

const fn code(table: CodeTable) -> EntityKind {
    EntityKind::Code(table)
}

/// Woonplaats rows (`WPL`).
#[derive(Debug, Clone, Copy, Default)]
pub struct WoonplaatsRows;

impl WoonplaatsRows {
    fn build(record: &Record, ctx: &mut RowContext<'_>) -> Result<RowOutcome<Woonplaats>, Rejection> {
        let id = ctx.id().to_owned();
        let gemeente_id =
            ctx.required(EntityKind::Gemeente, record.value("WPLGME/GME/sleutelVerzendend"))?;
        Ok(RowOutcome::Accepted(Woonplaats {
            id,
            code: record.text("Woonplaatsidentificatie"),
            naam: record.text("Woonplaatsnaam"),
            document_nummer: record.text("DocumentnummerMutatieWoonplaats"),
            document_mutatie: ctx.date(record, "DocumentdatumMutatieWoonplaats"),
            naam_ptt: record.text("WoonplaatsPTTSchrijfwijze"),
            vervallen: ctx.indicator(record, VERVALLEN),
            gemeente_id,
        }))
    }
}

impl RowProcessor for WoonplaatsRows {
    type Entity = Woonplaats;

    fn kind(&self) -> EntityKind {
        EntityKind::Woonplaats
    }

    fn schema(&self) -> Arc<RecordSchema> {
        schema::woonplaats()
    }

    fn key_field(&self) -> &'static str {
        SLEUTEL
    }

    fn references(&self) -> Vec<EntityKind> {
        vec![EntityKind::Gemeente]
    }

    fn process(&self, record: &Record, ctx: &mut RowContext<'_>) -> RowOutcome<Woonplaats> {
        RowOutcome::from_result(Self::build(record, ctx))
    }
}

/// Openbare ruimte rows (`OPR`).
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenbareRuimteRows;

impl OpenbareRuimteRows {
    fn build(
        record: &Record,
        ctx: &mut RowContext<'_>,
    ) -> Result<RowOutcome<OpenbareRuimte>, Rejection> {
        let id = ctx.id().to_owned();
        let bron_id = ctx.optional(code(CodeTable::Bron), record.value("OPRBRN/BRN/Code"));
        let status_id = ctx.optional(code(CodeTable::Status), record.value("OPRSTS/STS/Code"));
        let woonplaats_id = ctx.required(
            EntityKind::Woonplaats,
            record.value("OPRWPL/WPL/sleutelVerzendend"),
        )?;
        Ok(RowOutcome::Accepted(OpenbareRuimte {
            id,
            type_code: record.text("TypeOpenbareRuimteDomein"),
            naam: record.text("NaamOpenbareRuimte"),
            code: record.text("Straatcode"),
            document_nummer: record.text("DocumentnummerMutatieOpenbareRuimte"),
            document_mutatie: ctx.date(record, "DocumentdatumMutatieOpenbareRuimte"),
            straat_nummer: record.text("Straatnummer"),
            naam_nen: record.text("StraatnaamNENSchrijfwijze"),
            naam_ptt: record.text("StraatnaamPTTSchrijfwijze"),
            vervallen: ctx.indicator(record, VERVALLEN),
            bron_id,
            status_id,
            woonplaats_id,
        }))
    }
}

impl RowProcessor for OpenbareRuimteRows {
    type Entity = OpenbareRuimte;

    fn kind(&self) -> EntityKind {
        EntityKind::OpenbareRuimte
    }

    fn schema(&self) -> Arc<RecordSchema> {
        schema::openbare_ruimte()
    }

    fn key_field(&self) -> &'static str {
        SLEUTEL
    }

    fn references(&self) -> Vec<EntityKind> {
        vec![
            code(CodeTable::Bron),
            code(CodeTable::Status),
            EntityKind::Woonplaats,
        ]
    }

    fn process(&self, record: &Record, ctx: &mut RowContext<'_>) -> RowOutcome<OpenbareRuimte> {
        RowOutcome::from_result(Self::build(record, ctx))
    }
}

macro_rules! plaats_rows {
    ($name:ident, $entity:ident, $kind:ident, $schema:path, $code:literal, $label:literal) => {
        #[doc = concat!($label, " rows (`", $code, "`), keyed by their natural key for the WKT pass.")]
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $name;

        impl RowProcessor for $name {
            type Entity = $entity;

            fn kind(&self) -> EntityKind {
                EntityKind::$kind
            }

            fn schema(&self) -> Arc<RecordSchema> {
                $schema()
            }

            fn key_field(&self) -> &'static str {
                SLEUTEL
            }

            fn references(&self) -> Vec<EntityKind> {
                vec![
                    code(CodeTable::Bron),
                    code(CodeTable::Status),
                    EntityKind::Buurt,
                ]
            }

            fn process(&self, record: &Record, ctx: &mut RowContext<'_>) -> RowOutcome<$entity> {
                let id = ctx.id().to_owned();
                let field = |group: &str, target: &str| format!("{}{group}/{target}", $code);
                let bron_id = ctx.optional(code(CodeTable::Bron), record.value(&field("BRN", "BRN/Code")));
                let status_id =
                    ctx.optional(code(CodeTable::Status), record.value(&field("STS", "STS/Code")));
                let buurt_id = ctx.optional(
                    EntityKind::Buurt,
                    record.value(&field("BRT", "BRT/sleutelVerzendend")),
                );
                let entity = $entity {
                    id: id.clone(),
                    identificatie: record.text(concat!($label, "identificatie")),
                    vervallen: ctx.indicator(record, VERVALLEN),
                    document_nummer: record.text(concat!("DocumentnummerMutatie", $label)),
                    document_mutatie: ctx.date(record, concat!("DocumentdatumMutatie", $label)),
                    bron_id,
                    status_id,
                    buurt_id,
                    geometrie: None,
                };
                RowOutcome::AcceptedKeyed(id, entity)
            }
        }
    };
}

plaats_rows!(LigplaatsRows, Ligplaats, Ligplaats, schema::ligplaats, "LIG", "Ligplaats");
plaats_rows!(StandplaatsRows, Standplaats, Standplaats, schema::standplaats, "STA", "Standplaats");

/// Verblijfsobject rows (`VBO`).
///
/// Every code-table reference and the buurt reference are optional. The
/// point geometry is built from the X/Y coordinate fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct VerblijfsobjectRows;

const VERBLIJFSOBJECT_CODES: [(CodeTable, &str); 9] = [
    (CodeTable::RedenAfvoer, "VBOAVR/AVR/Code"),
    (CodeTable::Bron, "VBOBRN/BRN/Code"),
    (CodeTable::Eigendomsverhouding, "VBOEGM/EGM/Code"),
    (CodeTable::Financieringswijze, "VBOFNG/FNG/Code"),
    (CodeTable::Gebruik, "VBOGBK/GBK/Code"),
    (CodeTable::LocatieIngang, "VBOLOC/LOC/Code"),
    (CodeTable::Ligging, "VBOLGG/LGG/Code"),
    (CodeTable::Toegang, "VBOTGG/TGG/Code"),
    (CodeTable::Status, "VBOSTS/STS/Code"),
];

impl RowProcessor for VerblijfsobjectRows {
    type Entity = Verblijfsobject;

    fn kind(&self) -> EntityKind {
        EntityKind::Verblijfsobject
    }

    fn schema(&self) -> Arc<RecordSchema> {
        schema::verblijfsobject()
    }

    fn key_field(&self) -> &'static str {
        SLEUTEL
    }

    fn references(&self) -> Vec<EntityKind> {
        VERBLIJFSOBJECT_CODES
            .iter()
            .map(|(table, _)| code(*table))
            .chain([EntityKind::Buurt])
            .collect()
    }

    fn process(&self, record: &Record, ctx: &mut RowContext<'_>) -> RowOutcome<Verblijfsobject> {
        let id = ctx.id().to_owned();
        let [
            reden_afvoer_id,
            bron_id,
            eigendomsverhouding_id,
            financieringswijze_id,
            gebruik_id,
            locatie_ingang_id,
            ligging_id,
            toegang_id,
            status_id,
        ] = VERBLIJFSOBJECT_CODES.map(|(table, field)| ctx.optional(code(table), record.value(field)));
        let buurt_id = ctx.optional(EntityKind::Buurt, record.value("VBOBRT/BRT/sleutelVerzendend"));

        RowOutcome::Accepted(Verblijfsobject {
            id,
            identificatie: record.text("Verblijfsobjectidentificatie"),
            geometrie: ctx.point(record, "X-Coordinaat", "Y-Coordinaat"),
            gebruiksdoel_code: record.text("GebruiksdoelVerblijfsobjectDomein"),
            gebruiksdoel_omschrijving: record.text("OmschrijvingGebruiksdoelVerblijfsobjectDomein"),
            oppervlakte: ctx.number(record, "OppervlakteVerblijfsobject"),
            document_mutatie: ctx.date(record, "DocumentdatumMutatieVerblijfsobject"),
            document_nummer: record.text("DocumentnummerMutatieVerblijfsobject"),
            bouwlaag_toegang: ctx.number(record, "Bouwlaagtoegang"),
            status_coordinaat_code: record.text("StatusCoordinaatDomein"),
            status_coordinaat_omschrijving: record.text("OmschrijvingCoordinaatDomein"),
            bouwlagen: ctx.number(record, "AantalBouwlagen"),
            type_woonobject_code: record.text("TypeWoonobjectDomein"),
            type_woonobject_omschrijving: record.text("OmschrijvingTypeWoonobjectDomein"),
            woningvoorraad: ctx.indicator(record, "IndicatieWoningvoorraad"),
            aantal_kamers: ctx.number(record, "AantalKamers"),
            vervallen: ctx.indicator(record, VERVALLEN),
            reden_afvoer_id,
            bron_id,
            eigendomsverhouding_id,
            financieringswijze_id,
            gebruik_id,
            locatie_ingang_id,
            ligging_id,
            toegang_id,
            status_id,
            buurt_id,
        })
    }
}

/// Nummeraanduiding rows (`NUM`), keyed by their natural key for the
/// address-link pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct NummeraanduidingRows;

impl NummeraanduidingRows {
    fn build(
        record: &Record,
        ctx: &mut RowContext<'_>,
    ) -> Result<RowOutcome<Nummeraanduiding>, Rejection> {
        let id = ctx.id().to_owned();
        let bron_id = ctx.optional(code(CodeTable::Bron), record.value("NUMBRN/BRN/Code"));
        let status_id = ctx.optional(code(CodeTable::Status), record.value("NUMSTS/STS/Code"));
        let openbare_ruimte_id = ctx.required(
            EntityKind::OpenbareRuimte,
            record.value("NUMOPR/OPR/sleutelVerzendend"),
        )?;
        let nummeraanduiding = Nummeraanduiding {
            id: id.clone(),
            code: record.text(NUMMERAANDUIDING),
            huisnummer: ctx.number(record, "Huisnummer"),
            huisletter: record.text("Huisletter"),
            huisnummer_toevoeging: record.text("Huisnummertoevoeging"),
            postcode: record.text("Postcode"),
            document_mutatie: ctx.date(record, "DocumentdatumMutatieNummeraanduiding"),
            document_nummer: record.text("DocumentnummerMutatieNummeraanduiding"),
            type_code: record.text("TypeAdresseerbaarObjectDomein"),
            adres_nummer: record.text("Adresnummer"),
            vervallen: ctx.indicator(record, VERVALLEN),
            bron_id,
            status_id,
            openbare_ruimte_id,
            target: None,
            hoofdadres: None,
        };
        Ok(RowOutcome::AcceptedKeyed(id, nummeraanduiding))
    }
}

impl RowProcessor for NummeraanduidingRows {
    type Entity = Nummeraanduiding;

    fn kind(&self) -> EntityKind {
        EntityKind::Nummeraanduiding
    }

    fn schema(&self) -> Arc<RecordSchema> {
        schema::nummeraanduiding()
    }

    fn key_field(&self) -> &'static str {
        SLEUTEL
    }

    fn references(&self) -> Vec<EntityKind> {
        vec![
            code(CodeTable::Bron),
            code(CodeTable::Status),
            EntityKind::OpenbareRuimte,
        ]
    }

    fn process(&self, record: &Record, ctx: &mut RowContext<'_>) -> RowOutcome<Nummeraanduiding> {
        RowOutcome::from_result(Self::build(record, ctx))
    }
}

/// Pand rows (`PND`), keyed by their natural key for the WKT pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct PandRows;

impl RowProcessor for PandRows {
    type Entity = Pand;

    fn kind(&self) -> EntityKind {
        EntityKind::Pand
    }

    fn schema(&self) -> Arc<RecordSchema> {
        schema::pand()
    }

    fn key_field(&self) -> &'static str {
        SLEUTEL
    }

    fn references(&self) -> Vec<EntityKind> {
        vec![code(CodeTable::Status), EntityKind::Bouwblok]
    }

    fn process(&self, record: &Record, ctx: &mut RowContext<'_>) -> RowOutcome<Pand> {
        let id = ctx.id().to_owned();
        let status_id = ctx.optional(code(CodeTable::Status), record.value("PNDSTS/STS/Code"));
        let bouwblok_id =
            ctx.optional(EntityKind::Bouwblok, record.value("PNDBBK/BBK/sleutelVerzendend"));
        let pand = Pand {
            id: id.clone(),
            identificatie: record.text("Pandidentificatie"),
            document_mutatie: ctx.date(record, "DocumentdatumMutatiePand"),
            document_nummer: record.text("DocumentnummerMutatiePand"),
            bouwjaar: ctx.number(record, "OorspronkelijkBouwjaarPand"),
            laagste_bouwlaag: ctx.number(record, "LaagsteBouwlaag"),
            hoogste_bouwlaag: ctx.number(record, "HoogsteBouwlaag"),
            pandnummer: record.text("Pandnummer"),
            vervallen: ctx.indicator(record, VERVALLEN),
            status_id,
            bouwblok_id,
            geometrie: None,
        };
        RowOutcome::AcceptedKeyed(id, pand)
    }
}

/// Pand–verblijfsobject relation rows (`PNDVBO`).
///
/// The row key is the pand; both ends must exist. Repeated pairs collapse
/// into one relation.
#[derive(Debug, Clone, Copy, Default)]
pub struct VerblijfsobjectPandRows;

impl VerblijfsobjectPandRows {
    fn build(
        record: &Record,
        ctx: &mut RowContext<'_>,
    ) -> Result<RowOutcome<VerblijfsobjectPandRelatie>, Rejection> {
        let pand = ctx.id().to_owned();
        let verblijfsobject_id = ctx.required(
            EntityKind::Verblijfsobject,
            record.value("PNDVBO/VBO/sleutelVerzendend"),
        )?;
        let pand_id = ctx.required(EntityKind::Pand, Some(&pand))?;
        Ok(RowOutcome::Accepted(VerblijfsobjectPandRelatie {
            verblijfsobject_id,
            pand_id,
        }))
    }
}

impl RowProcessor for VerblijfsobjectPandRows {
    type Entity = VerblijfsobjectPandRelatie;

    fn kind(&self) -> EntityKind {
        EntityKind::VerblijfsobjectPandRelatie
    }

    fn schema(&self) -> Arc<RecordSchema> {
        schema::pand_verblijfsobject()
    }

    fn key_field(&self) -> &'static str {
        SLEUTEL
    }

    fn references(&self) -> Vec<EntityKind> {
        vec![EntityKind::Verblijfsobject, EntityKind::Pand]
    }

    fn process(
        &self,
        record: &Record,
        ctx: &mut RowContext<'_>,
    ) -> RowOutcome<VerblijfsobjectPandRelatie> {
        RowOutcome::from_result(Self::build(record, ctx))
    }

    fn finish(&self, mut entities: Vec<VerblijfsobjectPandRelatie>) -> Vec<VerblijfsobjectPandRelatie> {
        entities.sort();
        entities.dedup();
        entities
    }
}
