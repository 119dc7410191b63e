use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use super::schema;

// ---------------------------------------------------------------------------
// CellValue – a single cell of the player table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell mirroring the dtypes a tabular extract carries.
/// Used as a `BTreeMap` / `BTreeSet` key downstream, so it must be `Ord`.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    /// ISO-8601 date (`YYYY-MM-DD`) kept as text.
    Date(String),
    Null,
}

// -- Total order for grouping keys --
//
// `group_by`, `value_counts` and release-clause imputation key on
// `Overall` and other cells, so CellValue must be Eq + Ord. Variants order
// Null first, then by kind; floats use `total_cmp`. Integer(80) and
// Float(80.0) are different keys, matching the derived PartialEq.

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use CellValue::*;
        fn discriminant(v: &CellValue) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                String(_) => 4,
                Date(_) => 5,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (String(a), String(b)) | (Date(a), Date(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl std::hash::Hash for CellValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::String(s) | CellValue::Date(s) => s.hash(state),
            CellValue::Integer(i) => i.hash(state),
            CellValue::Float(f) => f.to_bits().hash(state),
            CellValue::Bool(b) => b.hash(state),
            CellValue::Null => {}
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Date(d) => write!(f, "{d}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl CellValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Numeric view of the cell, for averaging and comparisons.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            CellValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::String(s) | CellValue::Date(s) => Some(s),
            _ => None,
        }
    }

    /// Text written into a delimited export; Null becomes an empty cell.
    pub fn to_field(&self) -> String {
        match self {
            CellValue::Null => String::new(),
            other => other.to_string(),
        }
    }

    /// Short dtype label used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            CellValue::String(_) => "string",
            CellValue::Integer(_) => "integer",
            CellValue::Float(_) => "float",
            CellValue::Bool(_) => "bool",
            CellValue::Date(_) => "date",
            CellValue::Null => "null",
        }
    }
}

static NULL: CellValue = CellValue::Null;

// ---------------------------------------------------------------------------
// Record – one player row
// ---------------------------------------------------------------------------

/// One player (one row of the source extract).
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Zero-based data row in the source extract.
    pub source_row: usize,
    /// Column name → value. Absent columns read as Null.
    pub cells: BTreeMap<String, CellValue>,
}

impl Record {
    pub fn new(source_row: usize) -> Self {
        Self {
            source_row,
            cells: BTreeMap::new(),
        }
    }

    pub fn get(&self, column: &str) -> &CellValue {
        self.cells.get(column).unwrap_or(&NULL)
    }

    pub fn set(&mut self, column: &str, value: CellValue) {
        self.cells.insert(column.to_string(), value);
    }

    pub fn with(mut self, column: &str, value: CellValue) -> Self {
        self.set(column, value);
        self
    }

    pub fn row_id(&self) -> RowId {
        RowId {
            row: self.source_row,
            id: self.get(schema::ID).as_i64(),
            name: self.get(schema::NAME).as_str().map(str::to_string),
        }
    }
}

/// Identity of a row, carried in error context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowId {
    pub row: usize,
    pub id: Option<i64>,
    pub name: Option<String>,
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "row {}", self.row)?;
        match (&self.id, &self.name) {
            (Some(id), Some(name)) => write!(f, " (ID {id}, {name})"),
            (Some(id), None) => write!(f, " (ID {id})"),
            (None, Some(name)) => write!(f, " ({name})"),
            (None, None) => Ok(()),
        }
    }
}

// ---------------------------------------------------------------------------
// Table – the complete player table
// ---------------------------------------------------------------------------

/// An ordered set of columns plus the player rows. Every transform consumes
/// the table and hands back a new one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    /// Column names in source order.
    pub columns: Vec<String>,
    pub records: Vec<Record>,
}

impl Table {
    pub fn new(columns: Vec<String>, records: Vec<Record>) -> Self {
        Self { columns, records }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// All values of one column, in row order.
    pub fn column<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a CellValue> + 'a {
        self.records.iter().map(move |r| r.get(name))
    }

    /// Sorted set of distinct values in a column.
    pub fn unique_values(&self, name: &str) -> BTreeSet<CellValue> {
        self.column(name).cloned().collect()
    }

    /// Number of Null cells in a column.
    pub fn null_count(&self, name: &str) -> usize {
        self.column(name).filter(|v| v.is_null()).count()
    }

    /// Keep the rows matching `keep`.
    pub fn filter<F>(self, mut keep: F) -> Self
    where
        F: FnMut(&Record) -> bool,
    {
        let Table { columns, records } = self;
        let records = records.into_iter().filter(|r| keep(r)).collect();
        Table { columns, records }
    }

    /// Split into (matching, not matching), both keeping every column.
    pub fn partition<F>(self, mut pred: F) -> (Self, Self)
    where
        F: FnMut(&Record) -> bool,
    {
        let Table { columns, records } = self;
        let (yes, no): (Vec<_>, Vec<_>) = records.into_iter().partition(|r| pred(r));
        (Table::new(columns.clone(), yes), Table::new(columns, no))
    }

    /// Remove columns; names the table does not carry are ignored.
    pub fn drop_columns(self, names: &[&str]) -> Self {
        let Table { columns, records } = self;
        let columns = columns
            .into_iter()
            .filter(|c| !names.contains(&c.as_str()))
            .collect();
        let records = records
            .into_iter()
            .map(|mut r| {
                for name in names {
                    r.cells.remove(*name);
                }
                r
            })
            .collect();
        Table { columns, records }
    }

    /// Rename a column in place in the column order and in every row.
    pub fn rename_column(self, from: &str, to: &str) -> Self {
        let Table { columns, records } = self;
        let columns = columns
            .into_iter()
            .map(|c| if c == from { to.to_string() } else { c })
            .collect();
        let records = records
            .into_iter()
            .map(|mut r| {
                if let Some(v) = r.cells.remove(from) {
                    r.cells.insert(to.to_string(), v);
                }
                r
            })
            .collect();
        Table { columns, records }
    }

    /// Append a column name if the table does not have it yet.
    pub fn with_column(mut self, name: &str) -> Self {
        if !self.has_column(name) {
            self.columns.push(name.to_string());
        }
        self
    }

    /// Rebuild every record through a fallible row transform.
    pub fn try_map_records<F, E>(self, f: F) -> Result<Self, E>
    where
        F: FnMut(Record) -> Result<Record, E>,
    {
        let Table { columns, records } = self;
        let records = records.into_iter().map(f).collect::<Result<Vec<_>, E>>()?;
        Ok(Table { columns, records })
    }

    /// Rebuild every record through an infallible row transform.
    pub fn map_records<F>(self, f: F) -> Self
    where
        F: FnMut(Record) -> Record,
    {
        let Table { columns, records } = self;
        Table {
            columns,
            records: records.into_iter().map(f).collect(),
        }
    }
}
