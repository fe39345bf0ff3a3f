use super::*;
use atlas_core::{
    CodeEntry, CodeTable, EntityKind, EntitySet, EntityStore, Stadsdeel, StoreError, Unesco,
};
use geo::{MultiPolygon, polygon};
use rstest::{fixture, rstest};

#[fixture]
fn store() -> SqliteStore {
    SqliteStore::in_memory().expect("open in-memory store")
}

fn stadsdelen(codes: &[(&str, &str)]) -> EntitySet {
    EntitySet::new(
        EntityKind::Stadsdeel,
        codes
            .iter()
            .map(|(id, code)| Stadsdeel {
                id: (*id).to_owned(),
                code: (*code).to_owned(),
                naam: format!("Stadsdeel {code}"),
                gemeente_id: "03630000000000".into(),
                ..Stadsdeel::default()
            })
            .collect::<Vec<_>>(),
    )
}

#[rstest]
fn unknown_kinds_read_as_empty(store: SqliteStore) {
    assert!(store.keys(EntityKind::Buurt).expect("keys").is_empty());
    assert!(store.code_index(EntityKind::Buurt).expect("codes").is_empty());
}

#[rstest]
fn inserted_keys_round_trip(mut store: SqliteStore) {
    let written = store
        .bulk_insert(&stadsdelen(&[("S1", "A"), ("S2", "B"), ("S3", "E")]), 2)
        .expect("insert");

    assert_eq!(written, 3);
    let keys = store.keys(EntityKind::Stadsdeel).expect("keys");
    assert_eq!(keys.len(), 3);
    assert!(keys.contains("S2"));
    let codes = store.code_index(EntityKind::Stadsdeel).expect("codes");
    assert_eq!(codes.get("E").map(String::as_str), Some("S3"));
}

#[rstest]
fn clear_then_insert_replaces_the_set(mut store: SqliteStore) {
    store
        .bulk_insert(&stadsdelen(&[("S1", "A"), ("S2", "B")]), 100)
        .expect("first insert");
    store.clear(EntityKind::Stadsdeel).expect("clear");
    store
        .bulk_insert(&stadsdelen(&[("S9", "Z")]), 100)
        .expect("second insert");

    let keys = store.keys(EntityKind::Stadsdeel).expect("keys");
    assert_eq!(keys.into_iter().collect::<Vec<_>>(), ["S9"]);
}

#[rstest]
fn code_entries_are_keyed_by_code(mut store: SqliteStore) {
    let kind = EntityKind::Code(CodeTable::Bron);
    store
        .bulk_insert(
            &EntitySet::new(kind, vec![CodeEntry::new("001", "Gemeente")]),
            10,
        )
        .expect("insert");

    assert!(store.keys(kind).expect("keys").contains("001"));
    assert!(matches!(
        store.code_index(kind),
        Err(StoreError::NoCodeColumn { .. })
    ));
}

#[rstest]
fn values_are_stored_as_text_dates_and_wkt(mut store: SqliteStore) {
    let unesco = Unesco {
        naam: "Grachtengordel".into(),
        geometrie: Some(MultiPolygon::new(vec![polygon![
            (x: 0.0, y: 0.0),
            (x: 1.0, y: 0.0),
            (x: 1.0, y: 1.0),
            (x: 0.0, y: 0.0),
        ]])),
    };
    store
        .bulk_insert(&EntitySet::new(EntityKind::Unesco, vec![unesco]), 10)
        .expect("insert");

    let geometry: String = store
        .connection()
        .query_row("SELECT geometrie FROM unesco", [], |row| row.get(0))
        .expect("read geometry");
    assert!(geometry.starts_with("MULTIPOLYGON"));
}

#[rstest]
fn keyless_kinds_refuse_key_lookup(store: SqliteStore) {
    assert!(matches!(
        store.keys(EntityKind::Unesco),
        Err(StoreError::NoNaturalKey { .. })
    ));
}
