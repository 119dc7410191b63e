//! Cleaning pipeline: raw extract → typed player table.
//!
//! ```text
//!  drop irrelevant columns
//!  split off free agents (no club)
//!  drop rows without a preferred foot
//!  loans → permanent, joined date, contract year
//!  currency → float
//!  impute release clause            (needs every row: barrier)
//!  height / weight
//!  positional ratings
//!  composite scores
//!  body type
//!  validate, flag goalkeepers
//! ```

pub mod composite;
pub mod convert;
pub mod steps;
pub mod validate;

use log::info;

use crate::config::NormalizerConfig;
use crate::data::filter;
use crate::data::model::{CellValue, Record, RowId, Table};
use crate::data::schema::POSITION;
use crate::error::Result;

/// A row whose release clause could not be imputed: no other player with
/// the same overall rating has one. The cell stays Null.
#[derive(Debug, Clone, PartialEq)]
pub struct ImputationGap {
    pub row: RowId,
    pub overall: CellValue,
}

/// Result of one pipeline run.
#[derive(Debug, Clone)]
pub struct NormalizeOutcome {
    /// Players with a club and a preferred foot, fully typed.
    pub cleaned: Table,
    /// Players without a club, as loaded (minus irrelevant columns).
    pub free_agents: Table,
    /// The goalkeeper rows of `cleaned`; their positional ratings are Null.
    pub goalkeepers: Table,
    /// Rows removed for lacking a preferred foot.
    pub dropped_without_foot: usize,
    pub imputation_gaps: Vec<ImputationGap>,
}

pub fn is_goalkeeper(record: &Record, goalkeeper_position: &str) -> bool {
    record.get(POSITION).as_str() == Some(goalkeeper_position)
}

#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    config: NormalizerConfig,
}

impl Normalizer {
    pub fn new(config: NormalizerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    /// Run every step in order. Malformed cells abort the run; expected
    /// gaps (no club, no foot, goalkeeper ratings) are handled by policy.
    pub fn run(&self, raw: Table) -> Result<NormalizeOutcome> {
        let cfg = &self.config;
        let keeper = cfg.goalkeeper_position.as_str();
        info!("normalizing {} rows", raw.len());

        let irrelevant: Vec<&str> = cfg.irrelevant_columns.iter().map(String::as_str).collect();
        let table = steps::drop_irrelevant_columns(raw, &irrelevant);
        let (table, free_agents) = steps::partition_missing_club(table);

        let before = table.len();
        let table = steps::drop_missing_preferred_foot(table);
        let dropped_without_foot = before - table.len();

        let table =
            steps::normalize_loan_records(table, cfg.loan_joined_date, cfg.loan_contract_year);
        let table = steps::normalize_joined_dates(table)?;
        let table = steps::normalize_contract_years(table)?;
        let table = steps::convert_currency_columns(table)?;
        let (table, imputation_gaps) = steps::impute_release_clause(table)?;
        let table = steps::convert_height_weight(table)?;
        let table = steps::normalize_positional_ratings(table, keeper)?;
        let table = steps::derive_composite_scores(table)?;
        let cleaned = steps::normalize_body_type(table, &cfg.body_type_default);

        validate::validate_cleaned(&cleaned, keeper, &imputation_gaps)?;
        let goalkeepers = filter::where_rows(&cleaned, |r| is_goalkeeper(r, keeper));

        info!(
            "cleaned {} rows ({} goalkeepers), {} free agents, {} dropped, {} imputation gaps",
            cleaned.len(),
            goalkeepers.len(),
            free_agents.len(),
            dropped_without_foot,
            imputation_gaps.len()
        );

        Ok(NormalizeOutcome {
            cleaned,
            free_agents,
            goalkeepers,
            dropped_without_foot,
            imputation_gaps,
        })
    }
}
