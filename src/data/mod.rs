/// Data layer: schema, core types, loading, filtering and export.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Table, check against schema
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Table    │  ordered columns, Vec<Record>
///   └──────────┘
///        │                       (clean:: pipeline runs here)
///        ▼
///   ┌──────────┐     ┌──────────┐
///   │  filter   │     │  export   │  Table → .csv / .parquet
///   └──────────┘     └──────────┘
/// ```

pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
pub mod schema;
