use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::warn;

use fifa_normalizer::data::{export, loader, schema};
use fifa_normalizer::Normalizer;

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let input = args
        .next()
        .map(PathBuf::from)
        .context("usage: fifa-normalizer <input> [output]")?;
    let output = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| default_output(&input));

    let raw = loader::load_file(&input)?;
    let outcome = Normalizer::default()
        .run(raw)
        .with_context(|| format!("normalizing {}", input.display()))?;

    export::write_file(&outcome.cleaned, &output)?;

    println!("Normalization complete");
    println!("Cleaned rows: {}", outcome.cleaned.len());
    println!("Goalkeepers: {}", outcome.goalkeepers.len());
    println!("Free agents: {}", outcome.free_agents.len());
    println!("Dropped (no preferred foot): {}", outcome.dropped_without_foot);
    if !outcome.imputation_gaps.is_empty() {
        println!("Release clause gaps: {}", outcome.imputation_gaps.len());
        for gap in outcome.imputation_gaps.iter().take(8) {
            println!(" - {} (overall {})", gap.row, gap.overall);
        }
    }
    println!("Output: {}", output.display());

    let mut columns = vec![schema::NAME, schema::CLUB, schema::OVERALL];
    columns.extend(schema::CONTINUOUS_COLUMNS.iter().skip(3));
    match export::preview(&outcome.cleaned, &columns, 5) {
        Ok(table) => println!("{table}"),
        Err(err) => warn!("preview unavailable: {err:#}"),
    }

    Ok(())
}

fn default_output(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("players");
    input.with_file_name(format!("{stem}_clean.csv"))
}
