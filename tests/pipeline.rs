use std::path::PathBuf;

use fifa_normalizer::data::schema::{
    AGE, BODY_TYPE, CLUB, COMPOSITE_COLUMNS, CONTRACT_VALID_UNTIL, HEIGHT, HEIGHT_CM, JOINED,
    LOANED_FROM, MENTAL, NAME, PHOTO, POSITION, POSITIONAL_COLUMNS, PREFERRED_FOOT, RATING,
    RELEASE_CLAUSE, SPECIAL, VALUE, WAGE, WEIGHT_LBS, WORK_RATE,
};
use fifa_normalizer::{
    load_file, CellValue, NormalizeError, NormalizeOutcome, Normalizer, NormalizerConfig, Record,
    Table,
};

fn fixture_path(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    path
}

fn run_fixture() -> NormalizeOutcome {
    let raw = load_file(&fixture_path("players_raw.csv")).expect("fixture should load");
    Normalizer::default().run(raw).expect("fixture should normalize")
}

fn player<'a>(table: &'a Table, name: &str) -> &'a Record {
    table
        .records
        .iter()
        .find(|r| r.get(NAME).as_str() == Some(name))
        .unwrap_or_else(|| panic!("{name} should be in the table"))
}

#[test]
fn splits_fixture_into_expected_subsets() {
    let outcome = run_fixture();
    assert_eq!(outcome.cleaned.len(), 6);
    assert_eq!(outcome.free_agents.len(), 1);
    assert_eq!(outcome.dropped_without_foot, 1);
    assert_eq!(outcome.goalkeepers.len(), 1);
    assert_eq!(
        outcome.goalkeepers.records[0].get(NAME),
        &CellValue::String("De Gea".into())
    );
    assert_eq!(
        outcome.free_agents.records[0].get(NAME),
        &CellValue::String("L. Free".into())
    );
}

#[test]
fn cleaned_rows_have_club_and_foot() {
    let outcome = run_fixture();
    assert_eq!(outcome.cleaned.null_count(CLUB), 0);
    assert_eq!(outcome.cleaned.null_count(PREFERRED_FOOT), 0);
}

#[test]
fn irrelevant_and_loan_columns_are_gone() {
    let cleaned = run_fixture().cleaned;
    assert!(!cleaned.has_column(PHOTO));
    assert!(!cleaned.has_column(LOANED_FROM));
    assert!(!cleaned.has_column(HEIGHT));
    assert!(cleaned.has_column(HEIGHT_CM));
    assert!(!cleaned.has_column(""));
    for column in COMPOSITE_COLUMNS {
        assert!(cleaned.has_column(column), "{column} should be derived");
    }
}

#[test]
fn converts_messi_row() {
    let cleaned = run_fixture().cleaned;
    let messi = player(&cleaned, "L. Messi");
    assert_eq!(messi.get(VALUE), &CellValue::Float(110_500_000.0));
    assert_eq!(messi.get(WAGE), &CellValue::Float(565_000.0));
    assert_eq!(messi.get(RELEASE_CLAUSE), &CellValue::Float(226_500_000.0));
    assert_eq!(messi.get(HEIGHT_CM), &CellValue::Integer(170));
    assert_eq!(messi.get(WEIGHT_LBS), &CellValue::Float(159.0));
    assert_eq!(messi.get("RF"), &CellValue::Integer(90));
    assert_eq!(messi.get(JOINED), &CellValue::Date("2004-07-01".into()));
    assert_eq!(messi.get(CONTRACT_VALID_UNTIL), &CellValue::Integer(2021));
    assert_eq!(messi.get(RATING), &CellValue::Integer(94));
    assert_eq!(messi.get(MENTAL), &CellValue::Integer(90));
    assert_eq!(messi.get(BODY_TYPE), &CellValue::String("Lean".into()));
}

#[test]
fn goalkeeper_ratings_are_null_and_outfield_are_full() {
    let cleaned = run_fixture().cleaned;
    for record in &cleaned.records {
        let keeper = record.get(POSITION).as_str() == Some("GK");
        for column in POSITIONAL_COLUMNS {
            let cell = record.get(column);
            if keeper {
                assert!(cell.is_null(), "{column} of a goalkeeper should be null");
            } else {
                assert!(cell.as_i64().is_some(), "{column} should be an integer");
            }
        }
    }
}

#[test]
fn loan_without_joined_date_becomes_permanent() {
    let cleaned = run_fixture().cleaned;
    let loanee = player(&cleaned, "K. Loanee");
    assert_eq!(loanee.get(JOINED), &CellValue::Date("2018-07-01".into()));
    assert_eq!(loanee.get(CONTRACT_VALID_UNTIL), &CellValue::Integer(2021));
}

#[test]
fn release_clause_imputed_from_same_overall() {
    let outcome = run_fixture();
    let kane = player(&outcome.cleaned, "H. Kane");
    assert_eq!(kane.get(RELEASE_CLAUSE), &CellValue::Float(1_000_000.0));

    assert_eq!(outcome.imputation_gaps.len(), 1);
    let gap = &outcome.imputation_gaps[0];
    assert_eq!(gap.row.name.as_deref(), Some("R. Lonely"));
    assert_eq!(gap.overall, CellValue::Integer(75));
    assert!(player(&outcome.cleaned, "R. Lonely")
        .get(RELEASE_CLAUSE)
        .is_null());
}

#[test]
fn composite_rating_rounds_half_to_even() {
    let cleaned = run_fixture().cleaned;
    // (75 + 78) / 2 = 76.5
    assert_eq!(
        player(&cleaned, "R. Lonely").get(RATING),
        &CellValue::Integer(76)
    );
}

#[test]
fn second_pass_is_a_no_op() {
    let first = run_fixture();
    let second = Normalizer::default()
        .run(first.cleaned.clone())
        .expect("cleaned table should normalize again");
    assert_eq!(second.cleaned, first.cleaned);
    assert!(second.free_agents.is_empty());
    assert_eq!(second.dropped_without_foot, 0);
    assert_eq!(second.imputation_gaps, first.imputation_gaps);
}

#[test]
fn config_changes_loan_policy() {
    let config = NormalizerConfig::from_json_str(
        r#"{ "loan_joined_date": "2019-07-01", "loan_contract_year": 2023 }"#,
    )
    .expect("config");
    let raw = load_file(&fixture_path("players_raw.csv")).expect("fixture should load");
    let outcome = Normalizer::new(config).run(raw).expect("normalize");
    let loanee = player(&outcome.cleaned, "K. Loanee");
    assert_eq!(loanee.get(JOINED), &CellValue::Date("2019-07-01".into()));
    assert_eq!(loanee.get(CONTRACT_VALID_UNTIL), &CellValue::Integer(2023));
}

#[test]
fn malformed_currency_aborts_with_row_context() {
    let mut raw = load_file(&fixture_path("players_raw.csv")).expect("fixture should load");
    raw.records[0].set(WAGE, CellValue::String("€12X".into()));
    let err = Normalizer::default().run(raw).expect_err("should fail");
    match err {
        NormalizeError::Parse {
            row, column, raw, ..
        } => {
            assert_eq!(row.name.as_deref(), Some("L. Messi"));
            assert_eq!(column, WAGE);
            assert_eq!(raw, "€12X");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn malformed_value_in_excluded_row_is_ignored() {
    let mut raw = load_file(&fixture_path("players_raw.csv")).expect("fixture should load");
    let free_agent = raw
        .records
        .iter_mut()
        .find(|r| r.get(CLUB).is_null())
        .expect("fixture has a free agent");
    free_agent.set(VALUE, CellValue::String("not money".into()));
    assert!(Normalizer::default().run(raw).is_ok());
}

#[test]
fn single_free_agent_leaves_cleaned_table_empty() {
    let raw = load_file(&fixture_path("players_raw.csv")).expect("fixture should load");
    let only_free = raw.filter(|r| r.get(CLUB).is_null());
    assert_eq!(only_free.len(), 1);
    let outcome = Normalizer::default().run(only_free).expect("normalize");
    assert!(outcome.cleaned.is_empty());
    assert_eq!(outcome.free_agents.len(), 1);
}

#[test]
fn cleaned_row_missing_an_analysis_field_is_rejected() {
    for column in [AGE, BODY_TYPE, SPECIAL, WORK_RATE, "GKDiving"] {
        let mut raw = load_file(&fixture_path("players_raw.csv")).expect("fixture should load");
        raw.records[0].set(column, CellValue::Null);
        match Normalizer::default().run(raw) {
            Err(NormalizeError::MissingValue { row, column: missing }) => {
                assert_eq!(row.name.as_deref(), Some("L. Messi"));
                assert_eq!(missing, column);
            }
            other => panic!("{column}: unexpected outcome {:?}", other.map(|o| o.cleaned.len())),
        }
    }
}
