//! Log output of import runs.

use std::{
    io::{self, Write},
    sync::{Arc, Mutex, PoisonError},
};

use super::helpers::write_utf8;
use crate::{import::run_job, logging::install};
use atlas_core::{CodeTable, test_support::schema_line, validity::BEGIN_GELDIGHEID};
use atlas_data::{
    Job,
    task::{CodeTableConfig, ExtractTask, GemeenteRows, OpenbareRuimteRows, WoonplaatsRows},
    uva2::schema,
};
use camino::{Utf8Path, Utf8PathBuf};
use rstest::rstest;
use tempfile::TempDir;
use tracing_subscriber::fmt::MakeWriter;

/// Log sink shared between the subscriber and the test.
#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Captured {
    fn text(&self) -> String {
        let bytes = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

impl Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for Captured {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

fn extract(dir: &Utf8Path, name: &str, line: &str) -> Utf8PathBuf {
    let path = dir.join(name);
    write_utf8(&path, format!("{line}\n").as_bytes());
    path
}

/// GME, WPL, BRN and OPR tasks where the street cites an unknown bron.
fn dangling_bron_job(dir: &Utf8Path) -> Job {
    let gemeente = extract(
        dir,
        "GME_20240101.UVA2",
        &schema_line(
            &schema::gemeente(),
            &[("sleutelVerzendend", "G1"), (BEGIN_GELDIGHEID, "20100101")],
        ),
    );
    let woonplaats = extract(
        dir,
        "WPL_20240101.UVA2",
        &schema_line(
            &schema::woonplaats(),
            &[
                ("sleutelVerzendend", "W1"),
                ("WPLGME/GME/sleutelVerzendend", "G1"),
                (BEGIN_GELDIGHEID, "20100101"),
            ],
        ),
    );
    let bron = extract(
        dir,
        "BRN_20240101.UVA2",
        &schema_line(
            &schema::code_table(CodeTable::Bron),
            &[("Code", "001"), ("Omschrijving", "Gemeente")],
        ),
    );
    let openbare_ruimte = extract(
        dir,
        "OPR_20240101.UVA2",
        &schema_line(
            &schema::openbare_ruimte(),
            &[
                ("sleutelVerzendend", "O1"),
                ("NaamOpenbareRuimte", "Dam"),
                ("OPRBRN/BRN/Code", "003"),
                ("OPRWPL/WPL/sleutelVerzendend", "W1"),
                (BEGIN_GELDIGHEID, "20100101"),
            ],
        ),
    );
    Job::new("Import dangling bron")
        .with_task(ExtractTask::new("Import GME", &gemeente, GemeenteRows, 100))
        .with_task(ExtractTask::new("Import WPL", &woonplaats, WoonplaatsRows, 100))
        .with_task(
            CodeTableConfig {
                table: CodeTable::Bron,
                path: bron,
                batch_size: 100,
            }
            .into_task(),
        )
        .with_task(ExtractTask::new(
            "Import OPR",
            &openbare_ruimte,
            OpenbareRuimteRows,
            100,
        ))
}

#[rstest]
fn dangling_optional_reference_is_logged_as_a_warning() {
    let captured = Captured::default();
    install(captured.clone()).expect("first subscriber in this process");
    let dir = TempDir::new().expect("tempdir");
    let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");

    let mut job = dangling_bron_job(&root);

    let report = run_job(&mut job, &root.join("atlas.sqlite")).expect("job runs");

    assert_eq!(report.materialized(), 4);
    assert_eq!(report.warnings(), 1);
    let output = captured.text();
    let dangling: Vec<&str> = output
        .lines()
        .filter(|line| line.contains("references non-existing"))
        .collect();
    assert_eq!(dangling.len(), 1, "log output: {output}");
    assert!(dangling[0].contains("WARN"), "log output: {output}");
    assert!(dangling[0].contains("003"), "log output: {output}");
}
