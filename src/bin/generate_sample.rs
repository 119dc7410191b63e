use std::path::PathBuf;

use anyhow::{Context, Result};

use fifa_normalizer::data::schema::{
    self, ColumnKind, PLAYER_COLUMNS, POSITIONAL_COLUMNS, RELEASE_CLAUSE, SKILL_COLUMNS,
};

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform integer in `lo..=hi`.
    fn range(&mut self, lo: i64, hi: i64) -> i64 {
        lo + (self.next_f64() * (hi - lo + 1) as f64) as i64
    }

    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[self.range(0, items.len() as i64 - 1) as usize]
    }
}

const NATIONS: [&str; 6] = ["Argentina", "Brazil", "England", "France", "Germany", "Spain"];
const CLUBS: [&str; 5] = ["FC Barcelona", "Juventus", "Chelsea", "Ajax", "Boca Juniors"];
const POSITIONS: [&str; 10] = ["ST", "LW", "RW", "CAM", "CM", "CDM", "LB", "CB", "RB", "GK"];
const BODY: [&str; 5] = ["Normal", "Lean", "Normal", "Stocky", "Messi"];
const WORK_RATES: [&str; 3] = ["High/ Medium", "Medium/ Medium", "Low/ High"];

fn currency(amount: f64) -> String {
    if amount >= 1e6 {
        format!("€{:.1}M", amount / 1e6)
    } else if amount >= 1e3 {
        format!("€{:.0}K", amount / 1e3)
    } else {
        format!("€{amount:.0}")
    }
}

/// One synthetic raw row, keyed by column name.
fn player_row(rng: &mut SimpleRng, i: usize) -> Vec<(&'static str, String)> {
    let overall = rng.range(55, 92);
    let has_foot = !rng.chance(0.02);
    let has_club = !rng.chance(0.04);
    let on_loan = has_club && rng.chance(0.08);
    let position = rng.pick(&POSITIONS);
    let keeper = position == "GK";
    let value = (overall as f64 - 50.0).powi(3) * 2_500.0;

    let mut row: Vec<(&'static str, String)> = Vec::new();
    for spec in PLAYER_COLUMNS {
        let cell = match spec.name {
            schema::ID => (200_000 + i).to_string(),
            schema::NAME => format!("Player {i}"),
            schema::AGE => rng.range(17, 38).to_string(),
            schema::NATIONALITY => rng.pick(&NATIONS).to_string(),
            schema::OVERALL => overall.to_string(),
            schema::POTENTIAL => (overall + rng.range(0, 8)).to_string(),
            schema::CLUB if has_club => rng.pick(&CLUBS).to_string(),
            schema::VALUE => currency(value),
            schema::WAGE => currency(value / 400.0),
            schema::SPECIAL => rng.range(1200, 2300).to_string(),
            schema::PREFERRED_FOOT if has_foot => {
                let foot = if rng.chance(0.75) { "Right" } else { "Left" };
                foot.to_string()
            }
            schema::INTERNATIONAL_REPUTATION => rng.range(1, 5).to_string(),
            schema::WEAK_FOOT | schema::SKILL_MOVES => rng.range(1, 5).to_string(),
            schema::WORK_RATE => rng.pick(&WORK_RATES).to_string(),
            schema::BODY_TYPE => rng.pick(&BODY).to_string(),
            schema::POSITION => position.to_string(),
            schema::JOINED if !on_loan => {
                format!("Jul {}, {}", rng.range(1, 28), rng.range(2008, 2018))
            }
            schema::LOANED_FROM if on_loan => rng.pick(&CLUBS).to_string(),
            schema::CONTRACT_VALID_UNTIL if on_loan => "Jun 30, 2019".to_string(),
            schema::CONTRACT_VALID_UNTIL => rng.range(2019, 2023).to_string(),
            schema::HEIGHT if has_foot => format!("{}'{}", rng.range(5, 6), rng.range(0, 11)),
            schema::WEIGHT if has_foot => format!("{}lbs", rng.range(140, 200)),
            schema::RELEASE_CLAUSE if !rng.chance(0.06) => currency(value * 1.8),
            _ => match spec.kind {
                ColumnKind::Media => format!("https://cdn.example.org/{}/{i}.png", spec.name),
                _ => String::new(),
            },
        };
        row.push((spec.name, cell));
    }
    for column in POSITIONAL_COLUMNS {
        let cell = if has_foot && !keeper {
            format!("{}+{}", rng.range(35, overall), rng.range(0, 3))
        } else {
            String::new()
        };
        row.push((column, cell));
    }
    for column in SKILL_COLUMNS {
        let cell = if has_foot {
            rng.range(20, 95).to_string()
        } else {
            String::new()
        };
        row.push((column, cell));
    }
    row
}

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let rows: usize = match args.next() {
        Some(n) => n.parse().context("row count must be a positive integer")?,
        None => 500,
    };
    let output_path = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("sample_players.csv"));

    let mut rng = SimpleRng::new(42);
    let mut writer = csv::Writer::from_path(&output_path)
        .with_context(|| format!("creating {}", output_path.display()))?;

    // Header in extract order: unnamed index, player columns, positional
    // ratings, skills, release clause last.
    let mut header: Vec<&str> = vec![""];
    header.extend(
        PLAYER_COLUMNS
            .iter()
            .map(|s| s.name)
            .filter(|n| *n != RELEASE_CLAUSE),
    );
    header.extend(POSITIONAL_COLUMNS);
    header.extend(SKILL_COLUMNS);
    header.push(RELEASE_CLAUSE);
    writer.write_record(&header)?;

    for i in 0..rows {
        let cells = player_row(&mut rng, i);
        let mut record = vec![i.to_string()];
        for column in header.iter().skip(1) {
            let cell = cells
                .iter()
                .find(|(name, _)| name == column)
                .map(|(_, v)| v.clone())
                .unwrap_or_default();
            record.push(cell);
        }
        writer.write_record(&record)?;
    }
    writer.flush()?;

    println!("Wrote {rows} players to {}", output_path.display());
    Ok(())
}
