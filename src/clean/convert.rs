//! Cell-level converters from the extract's string formats to canonical
//! values. Every `*_cell` function passes an already-canonical value
//! through unchanged, which is what makes the pipeline idempotent.

use chrono::NaiveDate;

use crate::data::model::CellValue;
use crate::error::ConversionError;

const CURRENCY_SYMBOLS: [char; 3] = ['€', '£', '$'];

/// `"€105.5M"` → `105500000.0`, `"€500K"` → `500000.0`, `"€0"` → `0.0`.
pub fn convert_currency(raw: &str) -> Result<f64, ConversionError> {
    let body = raw.trim().trim_start_matches(&CURRENCY_SYMBOLS[..]);
    let (number, multiplier) = match body.chars().last() {
        Some('K') => (&body[..body.len() - 1], 1e3),
        Some('M') => (&body[..body.len() - 1], 1e6),
        Some(c) if c.is_alphabetic() => return Err(ConversionError::UnknownSuffix(c)),
        Some(_) => (body, 1.0),
        None => {
            return Err(ConversionError::UnexpectedFormat {
                expected: "<symbol><number>[K|M]",
            })
        }
    };
    let amount = parse_finite(number)?;
    Ok(amount * multiplier)
}

/// `5'11"` (the closing quote is optional) → centimetres, rounded half
/// to even.
pub fn convert_height(raw: &str) -> Result<i64, ConversionError> {
    let trimmed = raw.trim().trim_end_matches('"');
    let (feet, inches) = trimmed
        .split_once('\'')
        .ok_or(ConversionError::UnexpectedFormat {
            expected: "feet'inches\"",
        })?;
    let feet = parse_unsigned(feet)?;
    let inches = parse_unsigned(inches)?;
    if inches >= 12 {
        return Err(ConversionError::UnexpectedFormat {
            expected: "inches below 12",
        });
    }
    let total_inches = feet
        .checked_mul(12)
        .and_then(|f| f.checked_add(inches))
        .ok_or(ConversionError::UnexpectedFormat {
            expected: "a plausible height",
        })?;
    Ok((f64::from(total_inches) * 2.54).round_ties_even() as i64)
}

/// `"185lbs"` → `185.0`.
pub fn convert_weight(raw: &str) -> Result<f64, ConversionError> {
    let number = raw
        .trim()
        .strip_suffix("lbs")
        .ok_or(ConversionError::UnexpectedFormat {
            expected: "<number>lbs",
        })?;
    parse_finite(number)
}

/// `"85+3"` → `88`. A bare integer is its own rating.
pub fn convert_positional(raw: &str) -> Result<i64, ConversionError> {
    match raw.trim().split_once('+') {
        Some((base, growth)) => parse_signed(base)?
            .checked_add(parse_signed(growth)?)
            .ok_or(ConversionError::UnexpectedFormat {
                expected: "a rating like 85+3",
            }),
        None => parse_signed(raw),
    }
}

/// `"2021"` or `"Jun 30, 2019"` → the four-digit year.
pub fn convert_contract_year(raw: &str) -> Result<i64, ConversionError> {
    let trimmed = raw.trim();
    let year = trimmed
        .rsplit(|c: char| !c.is_ascii_digit())
        .next()
        .unwrap_or_default();
    if year.len() != 4 {
        return Err(ConversionError::UnexpectedFormat {
            expected: "a four-digit year",
        });
    }
    parse_signed(year)
}

/// `"Jul 1, 2004"` or `"2004-07-01"` → the date.
pub fn convert_joined(raw: &str) -> Result<NaiveDate, ConversionError> {
    let trimmed = raw.trim();
    NaiveDate::parse_from_str(trimmed, "%b %d, %Y")
        .or_else(|_| NaiveDate::parse_from_str(trimmed, "%Y-%m-%d"))
        .map_err(|_| ConversionError::UnexpectedFormat {
            expected: "a date like 'Jul 1, 2004'",
        })
}

fn parse_finite(s: &str) -> Result<f64, ConversionError> {
    match s.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(ConversionError::NotNumeric(s.trim().to_string())),
    }
}

fn parse_unsigned(s: &str) -> Result<u32, ConversionError> {
    s.trim()
        .parse()
        .map_err(|_| ConversionError::NotNumeric(s.trim().to_string()))
}

fn parse_signed(s: &str) -> Result<i64, ConversionError> {
    s.trim()
        .parse()
        .map_err(|_| ConversionError::NotNumeric(s.trim().to_string()))
}

fn unexpected(cell: &CellValue) -> ConversionError {
    ConversionError::UnexpectedType {
        found: cell.type_name(),
    }
}

// ---------------------------------------------------------------------------
// Cell adapters
// ---------------------------------------------------------------------------

/// Currency → Float.
pub fn currency_cell(cell: &CellValue) -> Result<CellValue, ConversionError> {
    match cell {
        CellValue::String(s) => convert_currency(s).map(CellValue::Float),
        CellValue::Integer(i) => Ok(CellValue::Float(*i as f64)),
        CellValue::Float(_) | CellValue::Null => Ok(cell.clone()),
        other => Err(unexpected(other)),
    }
}

/// Height → Integer centimetres.
pub fn height_cell(cell: &CellValue) -> Result<CellValue, ConversionError> {
    match cell {
        CellValue::String(s) => convert_height(s).map(CellValue::Integer),
        CellValue::Integer(_) | CellValue::Null => Ok(cell.clone()),
        other => Err(unexpected(other)),
    }
}

/// Weight → Float pounds.
pub fn weight_cell(cell: &CellValue) -> Result<CellValue, ConversionError> {
    match cell {
        CellValue::String(s) => convert_weight(s).map(CellValue::Float),
        CellValue::Integer(i) => Ok(CellValue::Float(*i as f64)),
        CellValue::Float(_) | CellValue::Null => Ok(cell.clone()),
        other => Err(unexpected(other)),
    }
}

/// Positional rating → Integer.
pub fn positional_cell(cell: &CellValue) -> Result<CellValue, ConversionError> {
    match cell {
        CellValue::String(s) => convert_positional(s).map(CellValue::Integer),
        CellValue::Integer(_) | CellValue::Null => Ok(cell.clone()),
        other => Err(unexpected(other)),
    }
}

/// Contract expiry → Integer year.
pub fn contract_year_cell(cell: &CellValue) -> Result<CellValue, ConversionError> {
    match cell {
        CellValue::String(s) => convert_contract_year(s).map(CellValue::Integer),
        CellValue::Float(f) if f.fract() == 0.0 => Ok(CellValue::Integer(*f as i64)),
        CellValue::Integer(_) | CellValue::Null => Ok(cell.clone()),
        other => Err(unexpected(other)),
    }
}

/// Joined → Date.
pub fn joined_cell(cell: &CellValue) -> Result<CellValue, ConversionError> {
    match cell {
        CellValue::String(s) => convert_joined(s).map(|d| CellValue::Date(d.to_string())),
        CellValue::Date(_) | CellValue::Null => Ok(cell.clone()),
        other => Err(unexpected(other)),
    }
}
