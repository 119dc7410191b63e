use std::fs;
use std::path::PathBuf;

use fifa_normalizer::data::export::{preview, write_file};
use fifa_normalizer::data::filter::{group_by, value_counts};
use fifa_normalizer::data::schema::{CLUB, NAME, NATIONALITY, OVERALL};
use fifa_normalizer::{load_file, CellValue, NormalizeError, Normalizer, Table};

fn fixture_path(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    path
}

fn cleaned_fixture() -> Table {
    let raw = load_file(&fixture_path("players_raw.csv")).expect("fixture should load");
    Normalizer::default()
        .run(raw)
        .expect("fixture should normalize")
        .cleaned
}

/// Compare cell by cell; reloading renumbers `source_row`.
fn assert_same_cells(left: &Table, right: &Table) {
    assert_eq!(left.columns, right.columns);
    assert_eq!(left.len(), right.len());
    for (l, r) in left.records.iter().zip(&right.records) {
        assert_eq!(l.cells, r.cells);
    }
}

#[test]
fn loads_fixture_and_drops_index_column() {
    let raw = load_file(&fixture_path("players_raw.csv")).expect("fixture should load");
    assert_eq!(raw.len(), 8);
    assert_eq!(raw.columns.first().map(String::as_str), Some("ID"));
    assert_eq!(raw.records[0].get(OVERALL), &CellValue::Integer(94));
    assert!(raw.records[4].get(CLUB).is_null());
}

#[test]
fn missing_column_is_reported_by_name() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("broken.csv");
    fs::write(&path, "ID,Name,Age\n1,A,20\n").expect("write csv");
    let err = load_file(&path).expect_err("should fail");
    match err.downcast_ref::<NormalizeError>() {
        Some(NormalizeError::MissingColumn { column }) => assert_eq!(column, "Nationality"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn ragged_row_is_a_format_error() {
    let raw = fs::read_to_string(fixture_path("players_raw.csv")).expect("fixture");
    let mut lines: Vec<&str> = raw.lines().collect();
    lines.push("99,1,2,3");
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("ragged.csv");
    fs::write(&path, lines.join("\n")).expect("write csv");
    let err = load_file(&path).expect_err("should fail");
    assert!(matches!(
        err.downcast_ref::<NormalizeError>(),
        Some(NormalizeError::Format { .. })
    ));
}

#[test]
fn unsupported_extension_is_rejected() {
    assert!(load_file(&fixture_path("players_raw.xlsx")).is_err());
}

#[test]
fn csv_export_reloads_and_renormalizes_unchanged() {
    let cleaned = cleaned_fixture();
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("clean.csv");
    write_file(&cleaned, &path).expect("csv export");

    let reloaded = load_file(&path).expect("exported csv should load");
    let again = Normalizer::default()
        .run(reloaded)
        .expect("exported csv should normalize")
        .cleaned;
    assert_same_cells(&cleaned, &again);
}

#[test]
fn parquet_export_reloads_and_renormalizes_unchanged() {
    let cleaned = cleaned_fixture();
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("clean.parquet");
    write_file(&cleaned, &path).expect("parquet export");

    let reloaded = load_file(&path).expect("exported parquet should load");
    assert_eq!(reloaded.len(), cleaned.len());
    let again = Normalizer::default()
        .run(reloaded)
        .expect("exported parquet should normalize")
        .cleaned;
    assert_same_cells(&cleaned, &again);
}

#[test]
fn json_records_load() {
    let cleaned = cleaned_fixture();
    let rows: Vec<serde_json::Value> = cleaned
        .records
        .iter()
        .map(|r| {
            let obj: serde_json::Map<String, serde_json::Value> = r
                .cells
                .iter()
                .map(|(k, v)| {
                    let json = match v {
                        CellValue::Integer(i) => serde_json::json!(i),
                        CellValue::Float(f) => serde_json::json!(f),
                        CellValue::Null => serde_json::Value::Null,
                        other => serde_json::json!(other.to_field()),
                    };
                    (k.clone(), json)
                })
                .collect();
            serde_json::Value::Object(obj)
        })
        .collect();
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("clean.json");
    fs::write(&path, serde_json::to_string(&rows).expect("json")).expect("write json");

    let reloaded = load_file(&path).expect("json should load");
    assert_eq!(reloaded.len(), cleaned.len());
    assert_eq!(reloaded.records[0].get(NAME), cleaned.records[0].get(NAME));
}

#[test]
fn consumers_can_group_and_count() {
    let cleaned = cleaned_fixture();
    let by_overall = group_by(&cleaned, OVERALL);
    assert_eq!(by_overall[&CellValue::Integer(80)].len(), 2);
    let nations = value_counts(&cleaned, NATIONALITY);
    assert_eq!(nations.len(), 6);
    let rendered = preview(&cleaned, &[NAME, OVERALL], 2).expect("preview");
    assert!(rendered.contains("L. Messi"));
}
