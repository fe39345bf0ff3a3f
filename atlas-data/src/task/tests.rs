use super::*;
use atlas_core::{
    CodeEntry, CodeTable, DiagnosticKind, EntityKind, EntitySet, Gemeente, Stadsdeel,
    test_support::{MemoryStore, uva2_line},
    validity::BEGIN_GELDIGHEID,
};
use camino::{Utf8Path, Utf8PathBuf};
use rstest::{fixture, rstest};
use tempfile::TempDir;

#[derive(Default)]
struct CountingTask {
    calls: Vec<&'static str>,
}

impl Task for CountingTask {
    fn name(&self) -> &str {
        "Import nothing"
    }

    fn before(&mut self, _store: &mut dyn EntityStore) -> Result<(), TaskError> {
        self.calls.push("before");
        Ok(())
    }

    fn process(&mut self, _store: &mut dyn EntityStore) -> Result<(), TaskError> {
        self.calls.push("process");
        Ok(())
    }

    fn after(&mut self) -> TaskReport {
        self.calls.push("after");
        TaskReport {
            task: self.name().to_owned(),
            materialized: 0,
            diagnostics: atlas_core::Diagnostics::new(),
        }
    }
}

#[fixture]
fn workdir() -> TempDir {
    tempfile::tempdir().expect("create temp dir")
}

fn write(dir: &TempDir, name: &str, lines: &[String]) -> Utf8PathBuf {
    let path = Utf8Path::from_path(dir.path())
        .expect("utf-8 temp path")
        .join(name);
    let body: String = lines.iter().map(|line| format!("{line}\n")).collect();
    std::fs::write(&path, body).expect("write extract");
    path
}

#[rstest]
fn runner_refuses_process_before_before() {
    let mut task = CountingTask::default();
    let mut store = MemoryStore::new();
    let mut runner = TaskRunner::new(&mut task);

    let err = runner.process(&mut store).expect_err("out of order");

    assert!(matches!(
        err,
        TaskError::InvalidTransition {
            from: TaskState::Uninitialized,
            to: TaskState::Processing,
            ..
        }
    ));
    assert_eq!(runner.state(), TaskState::Uninitialized);
}

#[rstest]
fn runner_refuses_a_second_before() {
    let mut task = CountingTask::default();
    let mut store = MemoryStore::new();
    let mut runner = TaskRunner::new(&mut task);

    runner.before(&mut store).expect("first before");

    assert!(runner.before(&mut store).is_err());
    assert_eq!(runner.state(), TaskState::Ready);
}

#[rstest]
fn execute_runs_phases_in_order() {
    let mut task = CountingTask::default();
    let mut store = MemoryStore::new();

    execute(&mut task, &mut store).expect("task runs");

    assert_eq!(task.calls, ["before", "process", "after"]);
}

#[rstest]
fn code_table_task_materializes_once(workdir: TempDir) {
    let path = write(
        &workdir,
        "STS_20240101.UVA2",
        &[
            uva2_line("STS", &["16", "Naamgeving uitgegeven"]),
            uva2_line("STS", &["17", "Naamgeving ingetrokken"]),
        ],
    );
    let mut task = CodeTableConfig {
        table: CodeTable::Status,
        path,
        batch_size: 1,
    }
    .into_task();
    let mut store = MemoryStore::new();
    let kind = EntityKind::Code(CodeTable::Status);

    let report = execute(&mut task, &mut store).expect("task runs");

    assert_eq!(report.task, "Import STS");
    assert_eq!(report.materialized, 2);
    assert_eq!(store.inserts(), [(kind, 2)]);
    let rows = store
        .set(kind)
        .and_then(|set| set.entities::<CodeEntry>())
        .expect("code rows");
    assert_eq!(rows[1], CodeEntry::new("17", "Naamgeving ingetrokken"));
}

fn stadsdeel_line(sleutel: &str, code: &str, gemeente: &str, begin: &str) -> String {
    let schema = crate::uva2::schema::stadsdeel();
    let values: Vec<&str> = schema
        .fields()
        .iter()
        .map(|field| match field.as_str() {
            "sleutelVerzendend" => sleutel,
            "Stadsdeelcode" => code,
            "SDLGME/GME/sleutelVerzendend" => gemeente,
            BEGIN_GELDIGHEID => begin,
            _ => "",
        })
        .collect();
    uva2_line("SDL", &values)
}

#[fixture]
fn gemeente_store() -> MemoryStore {
    MemoryStore::new().with_set(EntitySet::new(
        EntityKind::Gemeente,
        vec![Gemeente {
            id: "G1".into(),
            ..Gemeente::default()
        }],
    ))
}

#[rstest]
fn extract_task_filters_and_validates(workdir: TempDir, mut gemeente_store: MemoryStore) {
    let path = write(
        &workdir,
        "SDL_20240101.UVA2",
        &[
            stadsdeel_line("S1", "A", "G1", "20100101"),
            stadsdeel_line("S2", "B", "G2", "20100101"),
            stadsdeel_line("S3", "C", "G1", ""),
        ],
    );
    let mut task = ExtractTask::new("Import SDL", &path, StadsdeelRows, 100);

    let report = execute(&mut task, &mut gemeente_store).expect("task runs");

    assert_eq!(report.materialized, 1);
    assert_eq!(
        report
            .diagnostics
            .count_of(DiagnosticKind::DanglingRequiredReference),
        1
    );
    assert_eq!(
        report.diagnostics.count_of(DiagnosticKind::StructuralInvalidity),
        1
    );
    assert!(report.diagnostics.warnings()[0].message.contains("G2"));
}

#[rstest]
fn rerunning_a_task_replaces_its_rows(workdir: TempDir, mut gemeente_store: MemoryStore) {
    let path = write(
        &workdir,
        "SDL_20240101.UVA2",
        &[stadsdeel_line("S1", "A", "G1", "20100101")],
    );

    for _ in 0..2 {
        let mut task = ExtractTask::new("Import SDL", &path, StadsdeelRows, 100);
        execute(&mut task, &mut gemeente_store).expect("task runs");
    }

    let rows = gemeente_store
        .set(EntityKind::Stadsdeel)
        .and_then(|set| set.entities::<Stadsdeel>())
        .expect("stadsdeel rows");
    assert_eq!(rows.len(), 1);
    assert_eq!(
        gemeente_store.clears(),
        [EntityKind::Stadsdeel, EntityKind::Stadsdeel]
    );
}
