//! Row processors for the area hierarchy: gemeente, stadsdeel, buurt and
//! bouwblok.
//!
//! Stadsdelen, buurten and bouwblokken are keyed by their government code so
//! the shapefile pass can attach outlines.

use std::sync::Arc;

use atlas_core::{
    Bouwblok, Buurt, EntityKind, Gemeente, Record, RecordSchema, Rejection, RowContext,
    RowOutcome, Stadsdeel, validity::BEGIN_GELDIGHEID,
};

use super::extract::RowProcessor;
use crate::uva2::schema::{self, SLEUTEL, VERVALLEN};

/// Gemeente rows (`GME`).
#[derive(Debug, Clone, Copy, Default)]
pub struct GemeenteRows;

impl RowProcessor for GemeenteRows {
    type Entity = Gemeente;

    fn kind(&self) -> EntityKind {
        EntityKind::Gemeente
    }

    fn schema(&self) -> Arc<RecordSchema> {
        schema::gemeente()
    }

    fn key_field(&self) -> &'static str {
        SLEUTEL
    }

    fn process(&self, record: &Record, ctx: &mut RowContext<'_>) -> RowOutcome<Gemeente> {
        let id = ctx.id().to_owned();
        RowOutcome::Accepted(Gemeente {
            id,
            code: record.text("Gemeentecode"),
            naam: record.text("Gemeentenaam"),
            verzorgingsgebied: ctx.indicator(record, "IndicatieVerzorgingsgebied"),
            vervallen: ctx.indicator(record, VERVALLEN),
        })
    }
}

/// Stadsdeel rows (`SDL`), keyed by `Stadsdeelcode`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StadsdeelRows;

impl StadsdeelRows {
    fn build(record: &Record, ctx: &mut RowContext<'_>) -> Result<RowOutcome<Stadsdeel>, Rejection> {
        let id = ctx.id().to_owned();
        let gemeente_id =
            ctx.required(EntityKind::Gemeente, record.value("SDLGME/GME/sleutelVerzendend"))?;
        let code = record.text("Stadsdeelcode");
        let stadsdeel = Stadsdeel {
            id,
            code: code.clone(),
            naam: record.text("Stadsdeelnaam"),
            brondocument_naam: record.text("Brondocumentverwijzing"),
            brondocument_datum: ctx.date(record, "Brondocumentdatum"),
            ingang_cyclus: ctx.date(record, BEGIN_GELDIGHEID),
            vervallen: ctx.indicator(record, VERVALLEN),
            gemeente_id,
            geometrie: None,
        };
        Ok(RowOutcome::AcceptedKeyed(code, stadsdeel))
    }
}

impl RowProcessor for StadsdeelRows {
    type Entity = Stadsdeel;

    fn kind(&self) -> EntityKind {
        EntityKind::Stadsdeel
    }

    fn schema(&self) -> Arc<RecordSchema> {
        schema::stadsdeel()
    }

    fn key_field(&self) -> &'static str {
        SLEUTEL
    }

    fn references(&self) -> Vec<EntityKind> {
        vec![EntityKind::Gemeente]
    }

    fn process(&self, record: &Record, ctx: &mut RowContext<'_>) -> RowOutcome<Stadsdeel> {
        RowOutcome::from_result(Self::build(record, ctx))
    }
}

/// Buurt rows (`BRT`), keyed by `Buurtcode`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuurtRows;

impl BuurtRows {
    fn build(record: &Record, ctx: &mut RowContext<'_>) -> Result<RowOutcome<Buurt>, Rejection> {
        let id = ctx.id().to_owned();
        let stadsdeel_id =
            ctx.required(EntityKind::Stadsdeel, record.value("BRTSDL/SDL/sleutelVerzendend"))?;
        let code = record.text("Buurtcode");
        let buurt = Buurt {
            id,
            code: code.clone(),
            naam: record.text("Buurtnaam"),
            brondocument_naam: record.text("Brondocumentverwijzing"),
            brondocument_datum: ctx.date(record, "Brondocumentdatum"),
            ingang_cyclus: ctx.date(record, BEGIN_GELDIGHEID),
            vervallen: ctx.indicator(record, VERVALLEN),
            stadsdeel_id,
            geometrie: None,
        };
        Ok(RowOutcome::AcceptedKeyed(code, buurt))
    }
}

impl RowProcessor for BuurtRows {
    type Entity = Buurt;

    fn kind(&self) -> EntityKind {
        EntityKind::Buurt
    }

    fn schema(&self) -> Arc<RecordSchema> {
        schema::buurt()
    }

    fn key_field(&self) -> &'static str {
        SLEUTEL
    }

    fn references(&self) -> Vec<EntityKind> {
        vec![EntityKind::Stadsdeel]
    }

    fn process(&self, record: &Record, ctx: &mut RowContext<'_>) -> RowOutcome<Buurt> {
        RowOutcome::from_result(Self::build(record, ctx))
    }
}

/// Bouwblok rows (`BBK`), keyed by `Bouwbloknummer`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BouwblokRows;

impl BouwblokRows {
    fn build(record: &Record, ctx: &mut RowContext<'_>) -> Result<RowOutcome<Bouwblok>, Rejection> {
        let id = ctx.id().to_owned();
        let buurt_id =
            ctx.required(EntityKind::Buurt, record.value("BBKBRT/BRT/sleutelVerzendend"))?;
        let code = record.text("Bouwbloknummer");
        let bouwblok = Bouwblok {
            id,
            code: code.clone(),
            ingang_cyclus: ctx.date(record, BEGIN_GELDIGHEID),
            buurt_id,
            geometrie: None,
        };
        Ok(RowOutcome::AcceptedKeyed(code, bouwblok))
    }
}

impl RowProcessor for BouwblokRows {
    type Entity = Bouwblok;

    fn kind(&self) -> EntityKind {
        EntityKind::Bouwblok
    }

    fn schema(&self) -> Arc<RecordSchema> {
        schema::bouwblok()
    }

    fn key_field(&self) -> &'static str {
        SLEUTEL
    }

    fn references(&self) -> Vec<EntityKind> {
        vec![EntityKind::Buurt]
    }

    fn process(&self, record: &Record, ctx: &mut RowContext<'_>) -> RowOutcome<Bouwblok> {
        RowOutcome::from_result(Self::build(record, ctx))
    }
}
