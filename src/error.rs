use thiserror::Error;

use crate::data::model::RowId;

/// Why a single cell could not be converted to its canonical form.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConversionError {
    #[error("unrecognized suffix '{0}'")]
    UnknownSuffix(char),

    #[error("'{0}' is not a number")]
    NotNumeric(String),

    #[error("expected {expected}")]
    UnexpectedFormat { expected: &'static str },

    #[error("unexpected {found} value")]
    UnexpectedType { found: &'static str },
}

#[derive(Error, Debug)]
pub enum NormalizeError {
    #[error("format error: {message}")]
    Format { message: String },

    #[error("format error: missing column '{column}'")]
    MissingColumn { column: String },

    #[error("parse error in '{column}' at {row}: {source} (raw value: {raw:?})")]
    Parse {
        row: RowId,
        column: String,
        raw: String,
        #[source]
        source: ConversionError,
    },

    #[error("missing value in '{column}' at {row}")]
    MissingValue { row: RowId, column: String },

    #[error("invariant violated at {row}: {message}")]
    Invariant { row: RowId, message: String },
}

impl NormalizeError {
    pub fn missing_column(column: &str) -> Self {
        NormalizeError::MissingColumn {
            column: column.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, NormalizeError>;
