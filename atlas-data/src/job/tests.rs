use super::*;
use crate::task::TaskState;
use atlas_core::{Diagnostics, test_support::MemoryStore};
use camino::Utf8Path;
use rstest::{fixture, rstest};
use tempfile::TempDir;

const BAG_CODES: [&str; 21] = [
    "AVR", "BRN", "EGM", "FNG", "GBK", "LGG", "LOC", "TGG", "STS", "WPL", "OPR", "LIG", "STA",
    "VBO", "NUM", "NUMLIGHFD", "NUMSTAHFD", "NUMVBOHFD", "NUMVBONVN", "PND", "PNDVBO",
];

fn touch(path: &Utf8Path) {
    std::fs::write(path, "").expect("create source file");
}

fn root(dir: &TempDir) -> Utf8PathBuf {
    Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 temp path")
}

#[fixture]
fn delivery() -> TempDir {
    let dir = tempfile::tempdir().expect("create temp dir");
    let root = root(&dir);
    for sub in [
        DivaLayout::BAG,
        DivaLayout::BAG_WKT,
        DivaLayout::GEBIEDEN,
        DivaLayout::GEBIEDEN_SHP,
    ] {
        std::fs::create_dir(root.join(sub)).expect("create source dir");
    }
    for code in BAG_CODES {
        touch(&root.join(DivaLayout::BAG).join(format!("{code}_20240101.UVA2")));
    }
    for code in ["GME", "SDL", "BRT", "BBK"] {
        touch(&root.join(DivaLayout::GEBIEDEN).join(format!("{code}_20240101.UVA2")));
    }
    for name in [LIGPLAATS_WKT, STANDPLAATS_WKT, PAND_WKT] {
        touch(&root.join(DivaLayout::BAG_WKT).join(name));
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
        touch(&root.join(DivaLayout::GEBIEDEN_SHP).join(name));
    }
    dir
}

fn config(dir: &TempDir) -> BagImportConfig {
    BagImportConfig {
        diva_dir: root(dir),
        batch_size: 4000,
    }
}

#[rstest]
fn tasks_follow_dependency_order(delivery: TempDir) {
    let job = BagImportJob::new(&config(&delivery)).expect("complete delivery");

    assert_eq!(job.name(), "Import BAG");
    assert_eq!(
        job.task_names(),
        [
            "Import AVR",
            "Import BRN",
            "Import EGM",
            "Import FNG",
            "Import GBK",
            "Import LGG",
            "Import LOC",
            "Import TGG",
            "Import STS",
            "Import GME",
            "Import WPL",
            "Import SDL",
            "Import BRT",
            "Import BBK",
            "Import OPR",
            "Import LIG",
            "Import STA",
            "Import VBO",
            "Import NUM",
            "Import PND",
            "Import PNDVBO",
            "Import GBD Buurtcombinatie",
            "Import GBD Gebiedsgerichtwerken",
            "Import GBD Grootstedelijkgebied",
            "Import GBD unesco",
        ]
    );
}

#[rstest]
fn missing_source_directory_is_fatal(delivery: TempDir) {
    std::fs::remove_dir_all(delivery.path().join(DivaLayout::BAG_WKT)).expect("remove bag_wkt");

    let err = BagImportJob::new(&config(&delivery)).err().expect("incomplete delivery");

    assert!(matches!(
        err,
        ConfigurationError::MissingDirectory { ref path } if path.ends_with(DivaLayout::BAG_WKT)
    ));
}

#[rstest]
#[case("bag", "NUMVBONVN_20240101.UVA2")]
#[case("gebieden", "BBK_20240101.UVA2")]
fn missing_extract_is_fatal(delivery: TempDir, #[case] dir: &str, #[case] file: &str) {
    std::fs::remove_file(delivery.path().join(dir).join(file)).expect("remove extract");

    let err = BagImportJob::new(&config(&delivery)).err().expect("incomplete delivery");

    assert!(matches!(err, ConfigurationError::MissingExtract { .. }));
}

#[rstest]
fn missing_shapefile_is_fatal(delivery: TempDir) {
    std::fs::remove_file(delivery.path().join(DivaLayout::GEBIEDEN_SHP).join(UNESCO_SHAPEFILE))
        .expect("remove shapefile");

    let err = BagImportJob::new(&config(&delivery)).err().expect("incomplete delivery");

    assert!(matches!(err, ConfigurationError::MissingFile { .. }));
}

struct Step {
    name: &'static str,
    fail: bool,
}

impl Task for Step {
    fn name(&self) -> &str {
        self.name
    }

    fn before(&mut self, _store: &mut dyn EntityStore) -> Result<(), TaskError> {
        Ok(())
    }

    fn process(&mut self, _store: &mut dyn EntityStore) -> Result<(), TaskError> {
        if self.fail {
            return Err(TaskError::InvalidTransition {
                task: self.name.to_owned(),
                from: TaskState::Ready,
                to: TaskState::Processing,
            });
        }
        Ok(())
    }

    fn after(&mut self) -> TaskReport {
        TaskReport {
            task: self.name.to_owned(),
            materialized: 1,
            diagnostics: Diagnostics::new(),
        }
    }
}

#[rstest]
fn run_collects_one_report_per_task() {
    let mut job = Job::new("steps")
        .with_task(Step { name: "one", fail: false })
        .with_task(Step { name: "two", fail: false });

    let report = job.run(&mut MemoryStore::new()).expect("job runs");

    assert_eq!(report.job, "steps");
    assert_eq!(report.tasks.len(), 2);
    assert_eq!(report.materialized(), 2);
    assert_eq!(report.warnings(), 0);
}

#[rstest]
fn run_stops_at_the_first_failing_task() {
    let mut job = Job::new("steps")
        .with_task(Step { name: "one", fail: true })
        .with_task(Step { name: "two", fail: false });

    let err = job.run(&mut MemoryStore::new()).expect_err("first task fails");

    assert!(matches!(err, JobError::Task { ref task, .. } if task == "one"));
}
