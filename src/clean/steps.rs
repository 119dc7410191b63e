//! Table-level cleaning steps. Each consumes a table and returns a new one;
//! [`super::Normalizer::run`] chains them in the required order.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use log::{debug, info, warn};

use super::composite::COMPOSITES;
use super::convert;
use super::{is_goalkeeper, ImputationGap};
use crate::data::model::{CellValue, Record, Table};
use crate::data::schema::{
    BODY_TYPE, BODY_TYPES, CLUB, CONTRACT_VALID_UNTIL, CURRENCY_COLUMNS, HEIGHT, HEIGHT_CM,
    JOINED, LOANED_FROM, OVERALL, POSITIONAL_COLUMNS, PREFERRED_FOOT, RELEASE_CLAUSE, WEIGHT,
    WEIGHT_LBS,
};
use crate::error::{ConversionError, NormalizeError, Result};

type CellConverter = fn(&CellValue) -> std::result::Result<CellValue, ConversionError>;

fn parse_error(record: &Record, column: &str, source: ConversionError) -> NormalizeError {
    NormalizeError::Parse {
        row: record.row_id(),
        column: column.to_string(),
        raw: record.get(column).to_field(),
        source,
    }
}

fn require_column(table: &Table, column: &str) -> Result<()> {
    if table.has_column(column) {
        Ok(())
    } else {
        Err(NormalizeError::missing_column(column))
    }
}

/// Run `convert` over every cell of `column`.
fn convert_column(table: Table, column: &str, convert: CellConverter) -> Result<Table> {
    require_column(&table, column)?;
    table.try_map_records(|mut record| {
        let value = convert(record.get(column)).map_err(|e| parse_error(&record, column, e))?;
        record.set(column, value);
        Ok(record)
    })
}

/// Convert `raw` and rename it to `cleaned`; a table already carrying
/// `cleaned` is checked in place.
fn convert_renamed(
    table: Table,
    raw: &str,
    cleaned: &str,
    convert: CellConverter,
) -> Result<Table> {
    if table.has_column(raw) {
        Ok(convert_column(table, raw, convert)?.rename_column(raw, cleaned))
    } else if table.has_column(cleaned) {
        convert_column(table, cleaned, convert)
    } else {
        Err(NormalizeError::missing_column(raw))
    }
}

// ---------------------------------------------------------------------------
// Row selection
// ---------------------------------------------------------------------------

/// Remove media / identity columns. Names the table lacks are ignored.
pub fn drop_irrelevant_columns(table: Table, columns: &[&str]) -> Table {
    let before = table.columns.len();
    let table = table.drop_columns(columns);
    debug!("dropped {} irrelevant columns", before - table.columns.len());
    table
}

/// Split into (with club, free agents).
pub fn partition_missing_club(table: Table) -> (Table, Table) {
    let (with_club, free_agents) = table.partition(|r| !r.get(CLUB).is_null());
    info!(
        "{} players with a club, {} free agents set aside",
        with_club.len(),
        free_agents.len()
    );
    (with_club, free_agents)
}

/// Drop rows without a preferred foot. Such rows carry no skill data.
pub fn drop_missing_preferred_foot(table: Table) -> Table {
    let before = table.len();
    let table = table.filter(|r| !r.get(PREFERRED_FOOT).is_null());
    info!(
        "dropped {} rows without a preferred foot",
        before - table.len()
    );
    table
}

// ---------------------------------------------------------------------------
// Contract fields
// ---------------------------------------------------------------------------

/// Treat loans without a joined date as permanent moves: joined date and
/// contract expiry are set to the given constants. This is an
/// approximation, not a derived fact. `Loaned From` is dropped afterwards.
pub fn normalize_loan_records(table: Table, joined: NaiveDate, contract_year: i64) -> Table {
    if !table.has_column(LOANED_FROM) {
        return table;
    }
    let mut patched = 0usize;
    let table = table.map_records(|mut record| {
        if !record.get(LOANED_FROM).is_null() && record.get(JOINED).is_null() {
            record.set(JOINED, CellValue::Date(joined.to_string()));
            record.set(CONTRACT_VALID_UNTIL, CellValue::Integer(contract_year));
            patched += 1;
        }
        record
    });
    info!("{patched} loan records assumed permanent");
    table.drop_columns(&[LOANED_FROM])
}

/// Joined dates to ISO dates.
pub fn normalize_joined_dates(table: Table) -> Result<Table> {
    convert_column(table, JOINED, convert::joined_cell)
}

/// Contract expiry to an integer year.
pub fn normalize_contract_years(table: Table) -> Result<Table> {
    convert_column(table, CONTRACT_VALID_UNTIL, convert::contract_year_cell)
}

// ---------------------------------------------------------------------------
// Currency
// ---------------------------------------------------------------------------

/// Value, Wage and Release Clause to floats in currency units.
pub fn convert_currency_columns(table: Table) -> Result<Table> {
    CURRENCY_COLUMNS.iter().try_fold(table, |table, column| {
        convert_column(table, column, convert::currency_cell)
    })
}

/// Fill missing release clauses with the mean release clause of the
/// players sharing the same overall rating. Group means are computed over
/// the whole table before any row is filled. Rows whose group has no
/// known value stay Null and are reported as gaps.
pub fn impute_release_clause(table: Table) -> Result<(Table, Vec<ImputationGap>)> {
    require_column(&table, RELEASE_CLAUSE)?;
    require_column(&table, OVERALL)?;

    let mut groups: BTreeMap<CellValue, (f64, usize)> = BTreeMap::new();
    for record in &table.records {
        if let Some(clause) = record.get(RELEASE_CLAUSE).as_f64() {
            let entry = groups.entry(record.get(OVERALL).clone()).or_default();
            entry.0 += clause;
            entry.1 += 1;
        }
    }

    let mut gaps = Vec::new();
    let mut imputed = 0usize;
    let table = table.map_records(|mut record| {
        if !record.get(RELEASE_CLAUSE).is_null() {
            return record;
        }
        let overall = record.get(OVERALL).clone();
        match groups.get(&overall) {
            Some(&(sum, count)) if count > 0 => {
                record.set(RELEASE_CLAUSE, CellValue::Float(sum / count as f64));
                imputed += 1;
            }
            _ => {
                warn!(
                    "no release clause to impute from for {} (overall {overall})",
                    record.row_id()
                );
                gaps.push(ImputationGap {
                    row: record.row_id(),
                    overall,
                });
            }
        }
        record
    });
    info!(
        "imputed {imputed} release clauses, {} left missing",
        gaps.len()
    );
    Ok((table, gaps))
}

// ---------------------------------------------------------------------------
// Physical and positional fields
// ---------------------------------------------------------------------------

/// Height to centimetres as `Height (cms)`, weight to pounds as
/// `Weight (lbs)`.
pub fn convert_height_weight(table: Table) -> Result<Table> {
    let table = convert_renamed(table, HEIGHT, HEIGHT_CM, convert::height_cell)?;
    convert_renamed(table, WEIGHT, WEIGHT_LBS, convert::weight_cell)
}

/// Positional ratings to integers. Goalkeepers get Null in every
/// positional field; any other row must have all of them.
pub fn normalize_positional_ratings(table: Table, goalkeeper_position: &str) -> Result<Table> {
    for column in POSITIONAL_COLUMNS {
        require_column(&table, column)?;
    }
    table.try_map_records(|mut record| {
        let keeper = is_goalkeeper(&record, goalkeeper_position);
        for column in POSITIONAL_COLUMNS {
            if keeper {
                record.set(column, CellValue::Null);
                continue;
            }
            if record.get(column).is_null() {
                return Err(NormalizeError::MissingValue {
                    row: record.row_id(),
                    column: column.to_string(),
                });
            }
            let value = convert::positional_cell(record.get(column))
                .map_err(|e| parse_error(&record, column, e))?;
            record.set(column, value);
        }
        Ok(record)
    })
}

// ---------------------------------------------------------------------------
// Derived and categorical fields
// ---------------------------------------------------------------------------

/// Append (or recompute) the eight composite scores.
pub fn derive_composite_scores(table: Table) -> Result<Table> {
    let table = COMPOSITES
        .iter()
        .fold(table, |table, composite| table.with_column(composite.name));
    table.try_map_records(|mut record| {
        for composite in &COMPOSITES {
            let score = composite
                .score(&record)
                .map_err(|column| NormalizeError::MissingValue {
                    row: record.row_id(),
                    column: column.to_string(),
                })?;
            record.set(composite.name, CellValue::Integer(score));
        }
        Ok(record)
    })
}

/// Coerce body types outside Normal / Lean / Stocky to `default`. Null is
/// left for `validate_cleaned` to reject.
pub fn normalize_body_type(table: Table, default: &str) -> Table {
    let mut coerced: BTreeSet<String> = BTreeSet::new();
    let table = table.map_records(|mut record| {
        let unknown = match record.get(BODY_TYPE) {
            CellValue::String(body) if !BODY_TYPES.contains(&body.as_str()) => Some(body.clone()),
            _ => None,
        };
        if let Some(body) = unknown {
            coerced.insert(body);
            record.set(BODY_TYPE, CellValue::String(default.to_string()));
        }
        record
    });
    if !coerced.is_empty() {
        warn!("body types {coerced:?} coerced to {default:?}");
    }
    table
}
