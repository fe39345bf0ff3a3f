//! Behavioural tests for import tasks running against an entity store.

use std::{cell::RefCell, collections::HashMap};

use atlas_core::{
    CodeEntry, CodeTable, DiagnosticKind, EntityKind, EntitySet, Gemeente, OpenbareRuimte,
    Stadsdeel, TaskReport, Woonplaats,
    test_support::{MemoryStore, schema_line, uva2_line},
    validity::BEGIN_GELDIGHEID,
};
use atlas_data::{
    KeyTransform,
    geometry::{Feature, VecFeatureSource},
    task::{
        CodeTableConfig, ExtractTask, OpenbareRuimteRows, ShapefileGeometryPass, StadsdeelRows,
        execute,
    },
    uva2::schema,
};
use camino::{Utf8Path, Utf8PathBuf};
use geo::{Geometry, polygon};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use tempfile::TempDir;

#[fixture]
fn workdir() -> TempDir {
    tempfile::tempdir().expect("create temp dir")
}

#[fixture]
fn store() -> RefCell<MemoryStore> {
    RefCell::new(MemoryStore::new())
}

#[fixture]
fn extract() -> RefCell<Option<Utf8PathBuf>> {
    RefCell::new(None)
}

#[fixture]
fn outlines() -> RefCell<Vec<Feature>> {
    RefCell::new(Vec::new())
}

#[fixture]
fn report() -> RefCell<Option<TaskReport>> {
    RefCell::new(None)
}

fn write(dir: &TempDir, name: &str, lines: &[String]) -> Utf8PathBuf {
    let path = Utf8Path::from_path(dir.path())
        .expect("utf-8 temp path")
        .join(name);
    let body: String = lines.iter().map(|line| format!("{line}\n")).collect();
    std::fs::write(&path, body).expect("write extract");
    path
}

fn stadsdeel_line(sleutel: &str, code: &str, gemeente: &str) -> String {
    let schema = schema::stadsdeel();
    let values: Vec<&str> = schema
        .fields()
        .iter()
        .map(|field| match field.as_str() {
            "sleutelVerzendend" => sleutel,
            "Stadsdeelcode" => code,
            "SDLGME/GME/sleutelVerzendend" => gemeente,
            BEGIN_GELDIGHEID => "20100101",
            _ => "",
        })
        .collect();
    uva2_line("SDL", &values)
}

fn outline(code: &str) -> Feature {
    Feature {
        attributes: HashMap::from([("CODE".to_owned(), code.to_owned())]),
        geometry: Some(Geometry::Polygon(polygon![
            (x: 0.0, y: 0.0),
            (x: 1.0, y: 0.0),
            (x: 1.0, y: 1.0),
            (x: 0.0, y: 0.0),
        ])),
    }
}

fn stadsdelen(store: &RefCell<MemoryStore>) -> Vec<Stadsdeel> {
    store
        .borrow()
        .set(EntityKind::Stadsdeel)
        .and_then(|set| set.entities::<Stadsdeel>())
        .expect("stadsdeel rows")
        .to_vec()
}

#[given("a BRN extract with codes 001 and 002")]
fn bron_extract(
    #[from(workdir)] workdir: &TempDir,
    #[from(extract)] extract: &RefCell<Option<Utf8PathBuf>>,
) {
    let path = write(
        workdir,
        "BRN_20240101.UVA2",
        &[
            uva2_line("BRN", &["001", "Gemeente"]),
            uva2_line("BRN", &["002", "Kadaster"]),
        ],
    );
    *extract.borrow_mut() = Some(path);
}

#[given("gemeente G1 has been imported")]
fn gemeente_imported(#[from(store)] store: &RefCell<MemoryStore>) {
    let gemeente = Gemeente {
        id: "G1".into(),
        ..Gemeente::default()
    };
    store.replace_with(|current| {
        std::mem::take(current).with_set(EntitySet::new(EntityKind::Gemeente, vec![gemeente]))
    });
}

#[given("bron codes 001 and 002 have been imported")]
fn bron_imported(#[from(store)] store: &RefCell<MemoryStore>) {
    let codes = vec![
        CodeEntry::new("001", "Gemeente"),
        CodeEntry::new("002", "Kadaster"),
    ];
    store.replace_with(|current| {
        std::mem::take(current)
            .with_set(EntitySet::new(EntityKind::Code(CodeTable::Bron), codes))
    });
}

#[given("woonplaats W1 has been imported")]
fn woonplaats_imported(#[from(store)] store: &RefCell<MemoryStore>) {
    let woonplaats = Woonplaats {
        id: "W1".into(),
        ..Woonplaats::default()
    };
    store.replace_with(|current| {
        std::mem::take(current)
            .with_set(EntitySet::new(EntityKind::Woonplaats, vec![woonplaats]))
    });
}

#[given("an OPR extract with one street in woonplaats W1 citing bron 003")]
fn openbare_ruimte_extract(
    #[from(workdir)] workdir: &TempDir,
    #[from(extract)] extract: &RefCell<Option<Utf8PathBuf>>,
) {
    let line = schema_line(
        &schema::openbare_ruimte(),
        &[
            ("sleutelVerzendend", "O1"),
            ("NaamOpenbareRuimte", "Dam"),
            ("OPRBRN/BRN/Code", "003"),
            ("OPRWPL/WPL/sleutelVerzendend", "W1"),
            (BEGIN_GELDIGHEID, "20100101"),
        ],
    );
    let path = write(workdir, "OPR_20240101.UVA2", &[line]);
    *extract.borrow_mut() = Some(path);
}

#[given("a SDL extract with stadsdelen A and B in gemeente G1")]
fn stadsdeel_extract(
    #[from(workdir)] workdir: &TempDir,
    #[from(extract)] extract: &RefCell<Option<Utf8PathBuf>>,
) {
    let path = write(
        workdir,
        "SDL_20240101.UVA2",
        &[
            stadsdeel_line("S1", "A", "G1"),
            stadsdeel_line("S2", "B", "G1"),
        ],
    );
    *extract.borrow_mut() = Some(path);
}

#[given("stadsdeel outlines for codes A and Z")]
fn stadsdeel_outlines(#[from(outlines)] outlines: &RefCell<Vec<Feature>>) {
    *outlines.borrow_mut() = vec![outline("A"), outline("Z")];
}

#[when("the BRN task runs")]
fn run_bron(
    #[from(store)] store: &RefCell<MemoryStore>,
    #[from(extract)] extract: &RefCell<Option<Utf8PathBuf>>,
    #[from(report)] report: &RefCell<Option<TaskReport>>,
) {
    let path = extract.borrow().clone().expect("extract written");
    let mut task = CodeTableConfig {
        table: CodeTable::Bron,
        path,
        batch_size: 100,
    }
    .into_task();
    let outcome = execute(&mut task, &mut *store.borrow_mut()).expect("task runs");
    *report.borrow_mut() = Some(outcome);
}

#[when("the SDL task runs")]
fn run_stadsdeel(
    #[from(store)] store: &RefCell<MemoryStore>,
    #[from(extract)] extract: &RefCell<Option<Utf8PathBuf>>,
    #[from(outlines)] outlines: &RefCell<Vec<Feature>>,
    #[from(report)] report: &RefCell<Option<TaskReport>>,
) {
    let path = extract.borrow().clone().expect("extract written");
    let source = VecFeatureSource::new(outlines.borrow().clone());
    let mut task = ExtractTask::new("Import SDL", &path, StadsdeelRows, 100).with_pass(
        ShapefileGeometryPass::new("GBD_Stadsdeel.shp", source, "CODE", KeyTransform::Identity),
    );
    let outcome = execute(&mut task, &mut *store.borrow_mut()).expect("task runs");
    *report.borrow_mut() = Some(outcome);
}

#[when("the OPR task runs")]
fn run_openbare_ruimte(
    #[from(store)] store: &RefCell<MemoryStore>,
    #[from(extract)] extract: &RefCell<Option<Utf8PathBuf>>,
    #[from(report)] report: &RefCell<Option<TaskReport>>,
) {
    let path = extract.borrow().clone().expect("extract written");
    let mut task = ExtractTask::new("Import OPR", &path, OpenbareRuimteRows, 100);
    let outcome = execute(&mut task, &mut *store.borrow_mut()).expect("task runs");
    *report.borrow_mut() = Some(outcome);
}

#[then("the store holds bron codes 001 and 002")]
fn bron_stored(#[from(store)] store: &RefCell<MemoryStore>) {
    let store = store.borrow();
    let rows = store
        .set(EntityKind::Code(CodeTable::Bron))
        .and_then(|set| set.entities::<CodeEntry>())
        .expect("bron rows");
    assert_eq!(
        rows,
        [
            CodeEntry::new("001", "Gemeente"),
            CodeEntry::new("002", "Kadaster"),
        ]
    );
}

#[then("stadsdeel A has an outline and B has none")]
fn outline_attached(#[from(store)] store: &RefCell<MemoryStore>) {
    let rows = stadsdelen(store);
    let by_code = |code: &str| {
        rows.iter()
            .find(|row| row.code == code)
            .expect("stadsdeel imported")
    };
    assert!(by_code("A").geometrie.is_some());
    assert!(by_code("B").geometrie.is_none());
}

#[then("one warning names the unmatched outline Z")]
fn unmatched_outline_reported(#[from(report)] report: &RefCell<Option<TaskReport>>) {
    let report = report.borrow();
    let diagnostics = &report.as_ref().expect("task ran").diagnostics;
    let misses: Vec<_> = diagnostics
        .warnings_of(DiagnosticKind::GeometryJoinMiss)
        .collect();
    assert_eq!(misses.len(), 1);
    assert!(misses[0].message.contains("Z"));
}

#[then("the store holds 1 openbare ruimte without a bron")]
fn openbare_ruimte_without_bron(#[from(store)] store: &RefCell<MemoryStore>) {
    let store = store.borrow();
    let rows = store
        .set(EntityKind::OpenbareRuimte)
        .and_then(|set| set.entities::<OpenbareRuimte>())
        .expect("openbare ruimte rows");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, "O1");
    assert_eq!(rows[0].bron_id, None);
    assert_eq!(rows[0].woonplaats_id, "W1");
}

#[then("exactly one warning names bron 003")]
fn dangling_bron_reported(#[from(report)] report: &RefCell<Option<TaskReport>>) {
    let report = report.borrow();
    let diagnostics = &report.as_ref().expect("task ran").diagnostics;
    let dangling: Vec<_> = diagnostics
        .warnings_of(DiagnosticKind::DanglingOptionalReference)
        .collect();
    assert_eq!(dangling.len(), 1);
    assert!(dangling[0].message.contains("003"));
    assert_eq!(
        diagnostics.count_of(DiagnosticKind::DanglingOptionalReference),
        1
    );
}

#[then("the store holds 2 stadsdelen")]
fn two_stadsdelen(#[from(store)] store: &RefCell<MemoryStore>) {
    assert_eq!(stadsdelen(store).len(), 2);
}

#[scenario(path = "tests/features/import_tasks.feature", index = 0)]
fn importing_a_code_table(
    workdir: TempDir,
    store: RefCell<MemoryStore>,
    extract: RefCell<Option<Utf8PathBuf>>,
    report: RefCell<Option<TaskReport>>,
) {
    let _ = (workdir, store, extract, report);
}

#[scenario(path = "tests/features/import_tasks.feature", index = 1)]
fn attaching_shapefile_outlines(
    workdir: TempDir,
    store: RefCell<MemoryStore>,
    extract: RefCell<Option<Utf8PathBuf>>,
    outlines: RefCell<Vec<Feature>>,
    report: RefCell<Option<TaskReport>>,
) {
    let _ = (workdir, store, extract, outlines, report);
}

#[scenario(path = "tests/features/import_tasks.feature", index = 2)]
fn rerunning_replaces_rows(
    workdir: TempDir,
    store: RefCell<MemoryStore>,
    extract: RefCell<Option<Utf8PathBuf>>,
    outlines: RefCell<Vec<Feature>>,
    report: RefCell<Option<TaskReport>>,
) {
    let _ = (workdir, store, extract, outlines, report);
}

#[scenario(path = "tests/features/import_tasks.feature", index = 3)]
fn nulling_dangling_optional_reference(
    workdir: TempDir,
    store: RefCell<MemoryStore>,
    extract: RefCell<Option<Utf8PathBuf>>,
    report: RefCell<Option<TaskReport>>,
) {
    let _ = (workdir, store, extract, report);
}
