use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{
    Array, AsArray, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array,
};
use arrow::datatypes::DataType;
use log::{debug, info};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{CellValue, Record, Table};
use super::schema;
use crate::error::NormalizeError;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a player extract from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, one row per player (the raw extract)
/// * `.json`    – `[{ "Name": ..., "Club": ..., ... }, ...]`
/// * `.parquet` – flat columns, as written by [`super::export`]
///
/// Fails with [`NormalizeError::MissingColumn`] when a required column is
/// absent; retrieve it with `err.downcast_ref::<NormalizeError>()`.
pub fn load_file(path: &Path) -> Result<Table> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "csv" => {
            let file = std::fs::File::open(path)
                .with_context(|| format!("opening CSV {}", path.display()))?;
            read_csv(file)?
        }
        "json" => load_json(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => bail!("Unsupported file extension: .{other}"),
    };

    info!(
        "loaded {} rows x {} columns from {}",
        table.len(),
        table.columns.len(),
        path.display()
    );
    Ok(table)
}

/// Check the header against the schema and drop a leading unnamed index
/// column (an empty or `Unnamed: 0` header, as pandas writes it).
fn finish(mut columns: Vec<String>, mut records: Vec<Record>) -> Result<Table> {
    if columns.first().is_some_and(|c| is_index_header(c)) {
        let index = columns.remove(0);
        debug!("dropping unnamed index column {index:?}");
        for r in &mut records {
            r.cells.remove(&index);
        }
    }
    if let Some(column) = schema::first_missing_required(&columns) {
        return Err(NormalizeError::missing_column(column).into());
    }
    Ok(Table::new(columns, records))
}

fn is_index_header(h: &str) -> bool {
    let h = h.trim();
    h.is_empty() || h.starts_with("Unnamed: 0")
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Read a delimited extract: header row with column names, then one row
/// per player. Cell types are inferred (see [`guess_cell_type`]).
pub fn read_csv<R: Read>(input: R) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(input);
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut records = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let row = result.with_context(|| format!("CSV row {row_no}"))?;
        if row.len() != headers.len() {
            return Err(NormalizeError::Format {
                message: format!(
                    "CSV row {row_no} has {} fields, header has {}",
                    row.len(),
                    headers.len()
                ),
            }
            .into());
        }

        let mut record = Record::new(row_no);
        for (col_name, value) in headers.iter().zip(row.iter()) {
            record.set(col_name, guess_cell_type(value));
        }
        records.push(record);
    }

    finish(headers, records)
}

fn guess_cell_type(s: &str) -> CellValue {
    let s = s.trim();
    if s.is_empty() {
        return CellValue::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return CellValue::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        if f.is_finite() {
            return CellValue::Float(f);
        }
    }
    if s == "true" || s == "false" {
        return CellValue::Bool(s == "true");
    }
    CellValue::String(s.to_string())
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "ID": 158023, "Name": "L. Messi", "Value": "€110.5M", ... },
///   ...
/// ]
/// ```
///
/// Columns are collected from the object keys of every record.
fn load_json(path: &Path) -> Result<Table> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let rows = root.as_array().context("Expected top-level JSON array")?;

    let mut columns: Vec<String> = Vec::new();
    let mut records = Vec::with_capacity(rows.len());

    for (i, row) in rows.iter().enumerate() {
        let obj = row
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;

        let mut record = Record::new(i);
        for (key, val) in obj {
            if !columns.iter().any(|c| c == key) {
                columns.push(key.clone());
            }
            record.set(key, json_to_cell(val));
        }
        records.push(record);
    }

    finish(columns, records)
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) if s.trim().is_empty() => CellValue::Null,
        JsonValue::String(s) => CellValue::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one flat column per field (Utf8, Int32/64,
/// Float32/64, Boolean). Works with files written by pandas, Polars, or
/// [`super::export::write_parquet`].
fn load_parquet(path: &Path) -> Result<Table> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let columns: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        for row in 0..batch.num_rows() {
            let mut cells = BTreeMap::new();
            for (col_idx, field) in schema.fields().iter().enumerate() {
                let value = extract_cell(batch.column(col_idx), row)
                    .with_context(|| format!("Row {row}: failed to read '{}'", field.name()))?;
                cells.insert(field.name().clone(), value);
            }
            let source_row = records.len();
            records.push(Record { source_row, cells });
        }
    }

    finish(columns, records)
}

// -- Parquet / Arrow helpers --

/// Extract a single cell from an Arrow column at a given row.
fn extract_cell(col: &Arc<dyn Array>, row: usize) -> Result<CellValue> {
    if col.is_null(row) {
        return Ok(CellValue::Null);
    }
    let value = match col.data_type() {
        DataType::Utf8 => CellValue::String(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => CellValue::String(col.as_string::<i64>().value(row).to_string()),
        DataType::Int32 => {
            let arr = col
                .as_any()
                .downcast_ref::<Int32Array>()
                .context("expected Int32Array")?;
            CellValue::Integer(arr.value(row) as i64)
        }
        DataType::Int64 => {
            let arr = col
                .as_any()
                .downcast_ref::<Int64Array>()
                .context("expected Int64Array")?;
            CellValue::Integer(arr.value(row))
        }
        DataType::Float32 => {
            let arr = col
                .as_any()
                .downcast_ref::<Float32Array>()
                .context("expected Float32Array")?;
            CellValue::Float(arr.value(row) as f64)
        }
        DataType::Float64 => {
            let arr = col
                .as_any()
                .downcast_ref::<Float64Array>()
                .context("expected Float64Array")?;
            CellValue::Float(arr.value(row))
        }
        DataType::Boolean => {
            let arr = col
                .as_any()
                .downcast_ref::<BooleanArray>()
                .context("expected BooleanArray")?;
            CellValue::Bool(arr.value(row))
        }
        other => bail!("unsupported column type {other:?}"),
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guesses_cell_types() {
        assert_eq!(guess_cell_type(""), CellValue::Null);
        assert_eq!(guess_cell_type("94"), CellValue::Integer(94));
        assert_eq!(guess_cell_type("10.0"), CellValue::Float(10.0));
        assert_eq!(guess_cell_type("€110.5M"), CellValue::String("€110.5M".into()));
        assert_eq!(guess_cell_type("88+2"), CellValue::String("88+2".into()));
    }

    #[test]
    fn missing_required_column_is_a_format_error() {
        let err = read_csv("ID,Name\n1,A\n".as_bytes()).expect_err("should fail");
        match err.downcast_ref::<NormalizeError>() {
            Some(NormalizeError::MissingColumn { column }) => assert_eq!(column, "Age"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn index_header_detection() {
        assert!(is_index_header(""));
        assert!(is_index_header("Unnamed: 0"));
        assert!(!is_index_header("ID"));
    }
}
