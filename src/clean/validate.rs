use std::collections::BTreeSet;

use super::composite::COMPOSITES;
use super::{is_goalkeeper, ImputationGap};
use crate::data::model::{CellValue, Record, Table};
use crate::data::schema::{
    CLUB, CONTINUOUS_COLUMNS, CONTRACT_VALID_UNTIL, DISCRETE_COLUMNS, HEIGHT_CM, NAME,
    NATIONALITY, POSITIONAL_COLUMNS, RELEASE_CLAUSE, SKILL_COLUMNS, VALUE, WAGE, WEIGHT_LBS,
};
use crate::error::{NormalizeError, Result};

/// Fields every cleaned row must carry. Release Clause is checked on its
/// own because imputation gaps may leave it Null.
fn non_null_columns() -> impl Iterator<Item = &'static str> {
    [NAME, CLUB, NATIONALITY]
        .into_iter()
        .chain(CONTINUOUS_COLUMNS)
        .chain(DISCRETE_COLUMNS)
        .chain(SKILL_COLUMNS)
        .filter(|column| *column != RELEASE_CLAUSE)
}

#[derive(Clone, Copy)]
enum Expect {
    Integer,
    Float,
}

impl Expect {
    fn matches(self, cell: &CellValue) -> bool {
        matches!(
            (self, cell),
            (Expect::Integer, CellValue::Integer(_)) | (Expect::Float, CellValue::Float(_))
        )
    }
}

fn check(record: &Record, column: &str, expect: Expect) -> Result<()> {
    let cell = record.get(column);
    if cell.is_null() {
        return Err(NormalizeError::MissingValue {
            row: record.row_id(),
            column: column.to_string(),
        });
    }
    if !expect.matches(cell) {
        return Err(NormalizeError::Invariant {
            row: record.row_id(),
            message: format!("'{column}' holds a {} value", cell.type_name()),
        });
    }
    Ok(())
}

/// Check a cleaned table: every analysis field present, numeric fields typed,
/// positional ratings null exactly for goalkeepers. A Null release clause
/// is accepted only for rows listed in `gaps`.
pub fn validate_cleaned(
    table: &Table,
    goalkeeper_position: &str,
    gaps: &[ImputationGap],
) -> Result<()> {
    let gap_rows: BTreeSet<usize> = gaps.iter().map(|g| g.row.row).collect();

    for record in &table.records {
        for column in non_null_columns() {
            if record.get(column).is_null() {
                return Err(NormalizeError::MissingValue {
                    row: record.row_id(),
                    column: column.to_string(),
                });
            }
        }

        check(record, VALUE, Expect::Float)?;
        check(record, WAGE, Expect::Float)?;
        if !(record.get(RELEASE_CLAUSE).is_null() && gap_rows.contains(&record.source_row)) {
            check(record, RELEASE_CLAUSE, Expect::Float)?;
        }
        check(record, HEIGHT_CM, Expect::Integer)?;
        check(record, WEIGHT_LBS, Expect::Float)?;
        check(record, CONTRACT_VALID_UNTIL, Expect::Integer)?;

        let keeper = is_goalkeeper(record, goalkeeper_position);
        for column in POSITIONAL_COLUMNS {
            if keeper {
                if !record.get(column).is_null() {
                    return Err(NormalizeError::Invariant {
                        row: record.row_id(),
                        message: format!("goalkeeper has a '{column}' rating"),
                    });
                }
            } else {
                check(record, column, Expect::Integer)?;
            }
        }

        for composite in &COMPOSITES {
            check(record, composite.name, Expect::Integer)?;
        }
    }
    Ok(())
}
