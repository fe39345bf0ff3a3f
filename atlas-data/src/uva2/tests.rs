//! Unit tests for the UVA2 reader and extract resolution.

use std::{
    fs,
    time::{Duration, SystemTime},
};

use atlas_core::{CodeTable, test_support::uva2_line};
use camino::{Utf8Path, Utf8PathBuf};
use rstest::{fixture, rstest};
use tempfile::TempDir;

use super::*;

#[fixture]
fn dir() -> TempDir {
    tempfile::tempdir().expect("create temp dir")
}

fn utf8(dir: &TempDir) -> Utf8PathBuf {
    Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 temp dir")
}

fn write_extract(dir: &Utf8Path, name: &str, bytes: &[u8]) -> Utf8PathBuf {
    let path = dir.join(name);
    fs::write(&path, bytes).expect("write extract");
    path
}

fn read_all(path: &Utf8Path, schema: Arc<RecordSchema>) -> (Vec<Record>, Vec<MalformedRow>) {
    let mut reader = Uva2Reader::open(path, schema).expect("open extract");
    let records = reader
        .by_ref()
        .collect::<Result<Vec<_>, _>>()
        .expect("read records");
    (records, reader.take_malformed())
}

fn bron_schema() -> Arc<RecordSchema> {
    schema::code_table(CodeTable::Bron)
}

#[rstest]
fn skips_preamble_header_and_foreign_tags(dir: TempDir) {
    let root = utf8(&dir);
    let text = [
        "VAN;20150101".to_owned(),
        "TM;20151231".to_owned(),
        "HISTORISCHE_CONFIGURATIES;N".to_owned(),
        uva2_line("BRN", &["Code", "Omschrijving"]),
        uva2_line("BRN", &["001", "Bouwvergunning"]),
        uva2_line("STS", &["01", "Actief"]),
        uva2_line("BRN", &["002", "Sloopvergunning", ""]),
    ]
    .join("\n");
    let path = write_extract(&root, "BRN_20151231.UVA2", text.as_bytes());

    let (records, malformed) = read_all(&path, bron_schema());

    let codes: Vec<_> = records.iter().map(|r| r.text("Code")).collect();
    assert_eq!(codes, ["001", "002"]);
    assert_eq!(records[1].value("Omschrijving"), Some("Sloopvergunning"));
    assert!(malformed.is_empty());
}

#[rstest]
fn collects_rows_with_wrong_column_count(dir: TempDir) {
    let root = utf8(&dir);
    let text = [
        uva2_line("BRN", &["001", "Foo"]),
        uva2_line("BRN", &["002"]),
        uva2_line("BRN", &["003", "Bar", "extra", "columns"]),
    ]
    .join("\n");
    let path = write_extract(&root, "BRN_1.UVA2", text.as_bytes());

    let (records, malformed) = read_all(&path, bron_schema());

    assert_eq!(records.len(), 1);
    let lines: Vec<_> = malformed.iter().map(|row| row.line).collect();
    assert_eq!(lines, [2, 3]);
    assert!(malformed[0].message.contains("line 2"));
}

#[rstest]
fn decodes_windows_1252(dir: TempDir) {
    let root = utf8(&dir);
    let mut bytes = b"BRN;004;Caf".to_vec();
    bytes.push(0xE9);
    bytes.extend_from_slice(b"\n");
    let path = write_extract(&root, "BRN_1.UVA2", &bytes);

    let (records, _) = read_all(&path, bron_schema());

    assert_eq!(records[0].value("Omschrijving"), Some("Café"));
}

#[rstest]
fn records_carry_line_numbers(dir: TempDir) {
    let root = utf8(&dir);
    let text = ["VAN;20150101".to_owned(), uva2_line("BRN", &["001", "Foo"])].join("\n");
    let path = write_extract(&root, "BRN_1.UVA2", text.as_bytes());

    let (records, _) = read_all(&path, bron_schema());

    assert_eq!(records[0].line(), 2);
}

#[rstest]
fn missing_file_is_an_open_error(dir: TempDir) {
    let root = utf8(&dir);

    let err = Uva2Reader::open(&root.join("BRN_1.UVA2"), bron_schema())
        .err()
        .expect("absent file should fail");

    assert!(matches!(err, ReaderError::Open { .. }));
}

fn touch(path: &Utf8Path, secs: u64) {
    let file = fs::File::options()
        .write(true)
        .open(path)
        .expect("reopen extract");
    file.set_modified(SystemTime::UNIX_EPOCH + Duration::from_secs(secs))
        .expect("set modification time");
}

#[rstest]
fn resolves_newest_matching_extract(dir: TempDir) {
    let root = utf8(&dir);
    let older = write_extract(&root, "BRN_20160101.UVA2", b"");
    let newer = write_extract(&root, "BRN_20150101.UVA2", b"");
    write_extract(&root, "BRNX_20170101.UVA2", b"");
    write_extract(&root, "BRN_20170101.csv", b"");
    touch(&older, 1_600_000_000);
    touch(&newer, 1_700_000_000);

    let resolved = resolve_extract(&root, "BRN").expect("extract exists");

    assert_eq!(resolved, newer);
}

#[rstest]
fn ties_are_broken_by_name(dir: TempDir) {
    let root = utf8(&dir);
    let first = write_extract(&root, "STS_1.UVA2", b"");
    let second = write_extract(&root, "STS_2.UVA2", b"");
    touch(&first, 1_650_000_000);
    touch(&second, 1_650_000_000);

    let resolved = resolve_extract(&root, "STS").expect("extract exists");

    assert_eq!(resolved.file_name(), Some("STS_2.UVA2"));
}

#[rstest]
fn missing_extract_is_fatal(dir: TempDir) {
    let root = utf8(&dir);
    write_extract(&root, "BRN_1.UVA2", b"");

    let err = resolve_extract(&root, "AVR").expect_err("no AVR extract");

    assert!(matches!(
        err,
        ConfigurationError::MissingExtract { ref prefix, .. } if prefix == "AVR"
    ));
}
