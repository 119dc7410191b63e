use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::data::schema;

/// Policy knobs of the cleaning pipeline. Every field has a default, so a
/// JSON override file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    /// Columns removed before any other step.
    pub irrelevant_columns: Vec<String>,
    /// Joined date assumed for loans that became permanent.
    pub loan_joined_date: NaiveDate,
    /// Contract expiry assumed for loans that became permanent.
    pub loan_contract_year: i64,
    /// Bucket for body types outside Normal / Lean / Stocky.
    pub body_type_default: String,
    /// Position value identifying goalkeepers.
    pub goalkeeper_position: String,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            irrelevant_columns: schema::IRRELEVANT_COLUMNS
                .iter()
                .map(|c| c.to_string())
                .collect(),
            loan_joined_date: NaiveDate::from_ymd_opt(2018, 7, 1).unwrap_or_default(),
            loan_contract_year: 2021,
            body_type_default: "Lean".to_string(),
            goalkeeper_position: "GK".to_string(),
        }
    }
}

impl NormalizerConfig {
    pub fn from_json_str(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("parsing normalizer config")
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_json_str(&text)
    }
}
