use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{ArrayRef, BooleanArray, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;
use log::info;
use parquet::arrow::ArrowWriter;

use super::model::{CellValue, Table};

/// Write a table to disk.  Dispatch by extension (`.csv` or `.parquet`).
pub fn write_file(table: &Table, path: &Path) -> Result<()> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("creating {}", path.display()))?;
            write_csv(table, file)?;
        }
        "parquet" | "pq" => write_parquet(table, path)?,
        other => bail!("Unsupported export extension: .{other}"),
    }
    info!("wrote {} rows to {}", table.len(), path.display());
    Ok(())
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

/// Header row plus one row per record. Null cells are written empty.
pub fn write_csv<W: Write>(table: &Table, out: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer
        .write_record(&table.columns)
        .context("writing CSV header")?;
    for record in &table.records {
        writer
            .write_record(table.columns.iter().map(|c| record.get(c).to_field()))
            .with_context(|| format!("writing CSV row {}", record.source_row))?;
    }
    writer.flush().context("flushing CSV writer")?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Arrow / Parquet
// ---------------------------------------------------------------------------

/// Arrow type for a column: Int64 if every non-null cell is an integer,
/// Float64 if all are numeric, Boolean if all are bools, Utf8 otherwise.
fn infer_type<'a>(values: impl Iterator<Item = &'a CellValue>) -> DataType {
    let (mut ints, mut floats, mut bools, mut other) = (0usize, 0usize, 0usize, 0usize);
    for v in values {
        match v {
            CellValue::Null => {}
            CellValue::Integer(_) => ints += 1,
            CellValue::Float(_) => floats += 1,
            CellValue::Bool(_) => bools += 1,
            CellValue::String(_) | CellValue::Date(_) => other += 1,
        }
    }
    match (ints, floats, bools, other) {
        (_, 0, 0, 0) => DataType::Int64,
        (_, _, 0, 0) => DataType::Float64,
        (0, 0, _, 0) => DataType::Boolean,
        _ => DataType::Utf8,
    }
}

/// Convert the table into a single Arrow record batch.
pub fn to_record_batch(table: &Table) -> Result<RecordBatch> {
    let mut fields = Vec::with_capacity(table.columns.len());
    let mut arrays: Vec<ArrayRef> = Vec::with_capacity(table.columns.len());

    for name in &table.columns {
        let data_type = infer_type(table.column(name));
        let array: ArrayRef = match data_type {
            DataType::Int64 => Arc::new(Int64Array::from(
                table.column(name).map(CellValue::as_i64).collect::<Vec<_>>(),
            )),
            DataType::Float64 => Arc::new(Float64Array::from(
                table.column(name).map(CellValue::as_f64).collect::<Vec<_>>(),
            )),
            DataType::Boolean => Arc::new(BooleanArray::from(
                table
                    .column(name)
                    .map(|v| match v {
                        CellValue::Bool(b) => Some(*b),
                        _ => None,
                    })
                    .collect::<Vec<_>>(),
            )),
            _ => Arc::new(StringArray::from(
                table
                    .column(name)
                    .map(|v| (!v.is_null()).then(|| v.to_field()))
                    .collect::<Vec<_>>(),
            )),
        };
        fields.push(Field::new(name, array.data_type().clone(), true));
        arrays.push(array);
    }

    RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays).context("building record batch")
}

/// Write the table as a single-row-group Parquet file.
pub fn write_parquet(table: &Table, path: &Path) -> Result<()> {
    let batch = to_record_batch(table)?;
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    let mut writer =
        ArrowWriter::try_new(file, batch.schema(), None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

/// Render the first `rows` rows of selected columns as a text table.
pub fn preview(table: &Table, columns: &[&str], rows: usize) -> Result<String> {
    let head = Table::new(
        columns
            .iter()
            .filter(|c| table.has_column(c))
            .map(|c| c.to_string())
            .collect(),
        table.records.iter().take(rows).cloned().collect(),
    );
    let batch = to_record_batch(&head)?;
    let rendered = pretty_format_batches(&[batch]).context("formatting preview")?;
    Ok(rendered.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Record;

    #[test]
    fn infers_column_types() {
        let ints = [CellValue::Integer(1), CellValue::Null];
        assert_eq!(infer_type(ints.iter()), DataType::Int64);
        let mixed = [CellValue::Integer(1), CellValue::Float(2.5)];
        assert_eq!(infer_type(mixed.iter()), DataType::Float64);
        let text = [CellValue::Integer(1), CellValue::String("x".into())];
        assert_eq!(infer_type(text.iter()), DataType::Utf8);
    }

    #[test]
    fn csv_writes_nulls_as_empty_cells() {
        let table = Table::new(
            vec!["Name".into(), "Release Clause".into()],
            vec![Record::new(0).with("Name", CellValue::String("A".into()))],
        );
        let mut buf = Vec::new();
        write_csv(&table, &mut buf).expect("csv export");
        let text = String::from_utf8(buf).expect("utf8");
        assert_eq!(text, "Name,Release Clause\nA,\n");
    }
}
