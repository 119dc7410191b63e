pub mod clean;
pub mod config;
pub mod data;
pub mod error;

pub use clean::{ImputationGap, NormalizeOutcome, Normalizer};
pub use config::NormalizerConfig;
pub use data::loader::load_file;
pub use data::model::{CellValue, Record, RowId, Table};
pub use error::{ConversionError, NormalizeError};
