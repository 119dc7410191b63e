use crate::data::model::Record;
use crate::data::schema::{
    DEFENDING, GENERAL, MENTAL, MOBILITY, OVERALL, PASSING, POTENTIAL, POWER, RATING, SHOOTING,
};

/// A derived score: the rounded mean of a fixed set of base attributes.
#[derive(Debug, Clone, Copy)]
pub struct Composite {
    pub name: &'static str,
    pub inputs: &'static [&'static str],
}

pub const COMPOSITES: [Composite; 8] = [
    Composite {
        name: DEFENDING,
        inputs: &["Marking", "StandingTackle", "SlidingTackle"],
    },
    Composite {
        name: GENERAL,
        inputs: &["HeadingAccuracy", "Dribbling", "Curve", "BallControl"],
    },
    Composite {
        name: PASSING,
        inputs: &["Crossing", "ShortPassing", "LongPassing"],
    },
    Composite {
        name: MOBILITY,
        inputs: &["Acceleration", "SprintSpeed", "Agility", "Reactions"],
    },
    Composite {
        name: POWER,
        inputs: &["Balance", "Jumping", "Stamina", "Strength"],
    },
    Composite {
        name: RATING,
        inputs: &[POTENTIAL, OVERALL],
    },
    Composite {
        name: SHOOTING,
        inputs: &[
            "Finishing",
            "Volleys",
            "FKAccuracy",
            "ShotPower",
            "LongShots",
            "Penalties",
        ],
    },
    Composite {
        name: MENTAL,
        inputs: &[
            "Aggression",
            "Interceptions",
            "Positioning",
            "Vision",
            "Composure",
        ],
    },
];

impl Composite {
    /// Mean of the inputs rounded half to even. `Err` names the first input
    /// that is missing or not numeric.
    pub fn score(&self, record: &Record) -> Result<i64, &'static str> {
        let mut sum = 0.0;
        for &input in self.inputs {
            sum += record.get(input).as_f64().ok_or(input)?;
        }
        let mean = sum / self.inputs.len() as f64;
        Ok(mean.round_ties_even() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::CellValue;

    fn record_with(inputs: &[&str], value: i64) -> Record {
        inputs.iter().fold(Record::new(0), |r, c| {
            r.with(c, CellValue::Integer(value))
        })
    }

    #[test]
    fn bounds_are_preserved() {
        for composite in &COMPOSITES {
            assert_eq!(composite.score(&record_with(composite.inputs, 100)), Ok(100));
            assert_eq!(composite.score(&record_with(composite.inputs, 0)), Ok(0));
        }
    }

    #[test]
    fn mean_rounds_half_to_even() {
        let r = Record::new(0)
            .with(OVERALL, CellValue::Integer(90))
            .with(POTENTIAL, CellValue::Integer(91));
        let rating = COMPOSITES.iter().find(|c| c.name == RATING).expect("rating");
        assert_eq!(rating.score(&r), Ok(90));
    }

    #[test]
    fn missing_input_is_named() {
        let defending = &COMPOSITES[0];
        let r = Record::new(0).with("Marking", CellValue::Integer(50));
        assert_eq!(defending.score(&r), Err("StandingTackle"));
    }
}
