//! The player table schema. Every stage refers to columns through the
//! constants and groups defined here rather than inline strings.

// ---------------------------------------------------------------------------
// Column names
// ---------------------------------------------------------------------------

pub const ID: &str = "ID";
pub const NAME: &str = "Name";
pub const AGE: &str = "Age";
pub const PHOTO: &str = "Photo";
pub const NATIONALITY: &str = "Nationality";
pub const FLAG: &str = "Flag";
pub const OVERALL: &str = "Overall";
pub const POTENTIAL: &str = "Potential";
pub const CLUB: &str = "Club";
pub const CLUB_LOGO: &str = "Club Logo";
pub const VALUE: &str = "Value";
pub const WAGE: &str = "Wage";
pub const SPECIAL: &str = "Special";
pub const PREFERRED_FOOT: &str = "Preferred Foot";
pub const INTERNATIONAL_REPUTATION: &str = "International Reputation";
pub const WEAK_FOOT: &str = "Weak Foot";
pub const SKILL_MOVES: &str = "Skill Moves";
pub const WORK_RATE: &str = "Work Rate";
pub const BODY_TYPE: &str = "Body Type";
pub const REAL_FACE: &str = "Real Face";
pub const POSITION: &str = "Position";
pub const JERSEY_NUMBER: &str = "Jersey Number";
pub const JOINED: &str = "Joined";
pub const LOANED_FROM: &str = "Loaned From";
pub const CONTRACT_VALID_UNTIL: &str = "Contract Valid Until";
pub const HEIGHT: &str = "Height";
pub const WEIGHT: &str = "Weight";
pub const RELEASE_CLAUSE: &str = "Release Clause";

/// Height after conversion to centimetres.
pub const HEIGHT_CM: &str = "Height (cms)";
/// Weight after stripping the `lbs` suffix.
pub const WEIGHT_LBS: &str = "Weight (lbs)";

pub const DEFENDING: &str = "Defending";
pub const GENERAL: &str = "General";
pub const PASSING: &str = "Passing";
pub const MOBILITY: &str = "Mobility";
pub const POWER: &str = "Power";
pub const RATING: &str = "Rating";
pub const SHOOTING: &str = "Shooting";
pub const MENTAL: &str = "Mental";

// ---------------------------------------------------------------------------
// Column groups
// ---------------------------------------------------------------------------

/// Media and identity columns with no analytical use.
pub const IRRELEVANT_COLUMNS: [&str; 5] = [PHOTO, FLAG, CLUB_LOGO, REAL_FACE, JERSEY_NUMBER];

pub const CURRENCY_COLUMNS: [&str; 3] = [VALUE, WAGE, RELEASE_CLAUSE];

/// Per-position ratings, stored raw as `base+growth`.
pub const POSITIONAL_COLUMNS: [&str; 26] = [
    "LS", "ST", "RS", "LW", "LF", "CF", "RF", "RW", "LAM", "CAM", "RAM", "LM", "LCM", "CM",
    "RCM", "RM", "LWB", "LDM", "CDM", "RDM", "RWB", "LB", "LCB", "CB", "RCB", "RB",
];

/// Base skill attributes, each 0-100.
pub const SKILL_COLUMNS: [&str; 34] = [
    "Crossing",
    "Finishing",
    "HeadingAccuracy",
    "ShortPassing",
    "Volleys",
    "Dribbling",
    "Curve",
    "FKAccuracy",
    "LongPassing",
    "BallControl",
    "Acceleration",
    "SprintSpeed",
    "Agility",
    "Reactions",
    "Balance",
    "ShotPower",
    "Jumping",
    "Stamina",
    "Strength",
    "LongShots",
    "Aggression",
    "Interceptions",
    "Positioning",
    "Vision",
    "Penalties",
    "Composure",
    "Marking",
    "StandingTackle",
    "SlidingTackle",
    "GKDiving",
    "GKHandling",
    "GKKicking",
    "GKPositioning",
    "GKReflexes",
];

pub const COMPOSITE_COLUMNS: [&str; 8] = [
    DEFENDING, GENERAL, PASSING, MOBILITY, POWER, RATING, SHOOTING, MENTAL,
];

/// Continuous variables of the cleaned table used by downstream analysis.
pub const CONTINUOUS_COLUMNS: [&str; 9] = [
    AGE,
    OVERALL,
    POTENTIAL,
    VALUE,
    WAGE,
    SPECIAL,
    HEIGHT_CM,
    WEIGHT_LBS,
    RELEASE_CLAUSE,
];

/// Discrete variables of the cleaned table used by downstream analysis.
pub const DISCRETE_COLUMNS: [&str; 8] = [
    PREFERRED_FOOT,
    INTERNATIONAL_REPUTATION,
    WEAK_FOOT,
    SKILL_MOVES,
    WORK_RATE,
    BODY_TYPE,
    POSITION,
    CONTRACT_VALID_UNTIL,
];

/// Canonical body types. Anything else is coerced to the configured default.
pub const BODY_TYPES: [&str; 3] = ["Normal", "Lean", "Stocky"];

// ---------------------------------------------------------------------------
// Column specs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Identifier,
    Text,
    Category,
    Integer,
    Media,
    Currency,
    Height,
    Weight,
    PositionalRating,
    JoinedDate,
    ContractYear,
}

#[derive(Debug, Clone, Copy)]
pub struct ColumnSpec {
    pub name: &'static str,
    pub kind: ColumnKind,
    /// Must be present in any extract handed to the pipeline.
    pub required: bool,
    /// Name the column carries once cleaned, when it is renamed.
    pub cleaned_name: Option<&'static str>,
}

const fn col(name: &'static str, kind: ColumnKind, required: bool) -> ColumnSpec {
    ColumnSpec {
        name,
        kind,
        required,
        cleaned_name: None,
    }
}

const fn renamed(name: &'static str, kind: ColumnKind, cleaned: &'static str) -> ColumnSpec {
    ColumnSpec {
        name,
        kind,
        required: true,
        cleaned_name: Some(cleaned),
    }
}

/// The non-skill, non-positional columns of the raw extract, in source order.
pub const PLAYER_COLUMNS: [ColumnSpec; 28] = [
    col(ID, ColumnKind::Identifier, true),
    col(NAME, ColumnKind::Text, true),
    col(AGE, ColumnKind::Integer, true),
    col(PHOTO, ColumnKind::Media, false),
    col(NATIONALITY, ColumnKind::Category, true),
    col(FLAG, ColumnKind::Media, false),
    col(OVERALL, ColumnKind::Integer, true),
    col(POTENTIAL, ColumnKind::Integer, true),
    col(CLUB, ColumnKind::Category, true),
    col(CLUB_LOGO, ColumnKind::Media, false),
    col(VALUE, ColumnKind::Currency, true),
    col(WAGE, ColumnKind::Currency, true),
    col(SPECIAL, ColumnKind::Integer, true),
    col(PREFERRED_FOOT, ColumnKind::Category, true),
    col(INTERNATIONAL_REPUTATION, ColumnKind::Integer, true),
    col(WEAK_FOOT, ColumnKind::Integer, true),
    col(SKILL_MOVES, ColumnKind::Integer, true),
    col(WORK_RATE, ColumnKind::Category, true),
    col(BODY_TYPE, ColumnKind::Category, true),
    col(REAL_FACE, ColumnKind::Media, false),
    col(POSITION, ColumnKind::Category, true),
    col(JERSEY_NUMBER, ColumnKind::Media, false),
    col(JOINED, ColumnKind::JoinedDate, true),
    col(LOANED_FROM, ColumnKind::Text, false),
    col(CONTRACT_VALID_UNTIL, ColumnKind::ContractYear, true),
    renamed(HEIGHT, ColumnKind::Height, HEIGHT_CM),
    renamed(WEIGHT, ColumnKind::Weight, WEIGHT_LBS),
    col(RELEASE_CLAUSE, ColumnKind::Currency, true),
];

/// All column specs: player columns, positional ratings, then skills.
pub fn column_specs() -> impl Iterator<Item = ColumnSpec> {
    PLAYER_COLUMNS
        .into_iter()
        .chain(
            POSITIONAL_COLUMNS
                .into_iter()
                .map(|name| col(name, ColumnKind::PositionalRating, true)),
        )
        .chain(
            SKILL_COLUMNS
                .into_iter()
                .map(|name| col(name, ColumnKind::Integer, true)),
        )
}

/// Look up the spec of a column by its raw or cleaned name.
pub fn spec_for(name: &str) -> Option<ColumnSpec> {
    column_specs().find(|spec| spec.name == name || spec.cleaned_name == Some(name))
}

/// First required column absent from `headers`, if any. A renamed column
/// may appear under either its raw or its cleaned name.
pub fn first_missing_required<S: AsRef<str>>(headers: &[S]) -> Option<&'static str> {
    let has = |name: &str| headers.iter().any(|h| h.as_ref() == name);
    column_specs()
        .filter(|spec| spec.required)
        .find(|spec| !has(spec.name) && !spec.cleaned_name.is_some_and(|c| has(c)))
        .map(|spec| spec.name)
}
