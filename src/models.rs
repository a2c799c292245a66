use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

pub const INSTITUTE: &str = "Institute";
pub const QUOTA: &str = "Quota";
pub const SEAT_TYPE: &str = "Seat Type";
pub const GENDER: &str = "Gender";
pub const OPENING_RANK: &str = "Opening Rank";
pub const CLOSING_RANK: &str = "Closing Rank";
pub const INSTITUTE_TYPE: &str = "Institute Type";

/// Columns every round file must carry (after header trimming).
pub const REQUIRED_COLUMNS: [&str; 6] = [INSTITUTE, QUOTA, SEAT_TYPE, GENDER, OPENING_RANK, CLOSING_RANK];

pub const ROUND_PLACEHOLDER: &str = "{round}";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub data_directory: String,
    // Must contain `{round}`, replaced by 1..=round_count
    pub file_pattern: String,
    pub round_count: u32,
    pub output_directory: String,
    pub export_institutes: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_directory: ".".to_string(),
            file_pattern: "2024_Round_{round}.csv".to_string(),
            round_count: 5,
            output_directory: "institutes_csv".to_string(),
            export_institutes: true,
        }
    }
}

impl Config {
    pub fn load_from_file(file_path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(file_path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to_file(&self, file_path: &str) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(file_path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if !self.file_pattern.contains(ROUND_PLACEHOLDER) {
            anyhow::bail!(
                "file_pattern '{}' must contain the {} placeholder",
                self.file_pattern,
                ROUND_PLACEHOLDER
            );
        }
        if self.round_count == 0 {
            anyhow::bail!("round_count must be at least 1");
        }
        Ok(())
    }

    /// Candidate file name for a round, e.g. `2024_Round_3.csv`.
    pub fn round_file_name(&self, round: RoundId) -> String {
        self.file_pattern.replace(ROUND_PLACEHOLDER, &round.0.to_string())
    }
}

/// Admission round number. Displays as `Round N`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RoundId(pub u32);

impl fmt::Display for RoundId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Round {}", self.0)
    }
}

impl FromStr for RoundId {
    type Err = ValidationError;

    /// Accepts both `Round 3` and a bare `3`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::MissingRound);
        }
        let number = trimmed
            .strip_prefix("Round")
            .map(str::trim)
            .unwrap_or(trimmed);
        number
            .parse::<u32>()
            .map(RoundId)
            .map_err(|_| ValidationError::UnknownRound(trimmed.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum InstituteType {
    Iit,
    Iiit,
    Nit,
    Gfti,
}

impl InstituteType {
    pub const ALL: [InstituteType; 4] = [
        InstituteType::Iit,
        InstituteType::Iiit,
        InstituteType::Nit,
        InstituteType::Gfti,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InstituteType::Iit => "IIT",
            InstituteType::Iiit => "IIIT",
            InstituteType::Nit => "NIT",
            InstituteType::Gfti => "GFTI",
        }
    }
}

impl fmt::Display for InstituteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InstituteType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        InstituteType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::UnknownInstituteType(s.to_string()))
    }
}

/// Opening/closing rank cell.
///
/// `Raw` only exists between loading and normalization. After
/// [`crate::normalizer::normalize`] a rank is either a finite `Value` or `Missing`.
#[derive(Debug, Clone, PartialEq)]
pub enum Rank {
    Raw(String),
    Value(f64),
    Missing,
}

impl Rank {
    /// Numeric view of the rank; unparseable text counts as missing.
    pub fn value(&self) -> Option<f64> {
        match self {
            Rank::Value(v) => Some(*v),
            Rank::Missing => None,
            Rank::Raw(text) => crate::normalizer::parse_rank(text).value(),
        }
    }

    pub fn is_missing(&self) -> bool {
        self.value().is_none()
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rank::Raw(text) => f.write_str(text),
            Rank::Value(v) => write!(f, "{v}"),
            Rank::Missing => Ok(()),
        }
    }
}

/// One admission-outcome row of a round table.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub institute: String,
    pub quota: String,
    pub seat_type: String,
    pub gender: String,
    pub opening_rank: Rank,
    pub closing_rank: Rank,
    pub institute_type: Option<InstituteType>,
    /// Source columns beyond the required ones, keyed by trimmed header.
    pub extra: BTreeMap<String, String>,
}

impl Record {
    /// Cell text for a column name, as it would be written back to CSV.
    pub fn cell(&self, column: &str) -> Option<String> {
        match column {
            INSTITUTE => Some(self.institute.clone()),
            QUOTA => Some(self.quota.clone()),
            SEAT_TYPE => Some(self.seat_type.clone()),
            GENDER => Some(self.gender.clone()),
            OPENING_RANK => Some(self.opening_rank.to_string()),
            CLOSING_RANK => Some(self.closing_rank.to_string()),
            // A source column of that name wins over the derived tag.
            INSTITUTE_TYPE => self
                .extra
                .get(INSTITUTE_TYPE)
                .cloned()
                .or_else(|| self.institute_type.map(|t| t.to_string())),
            other => self.extra.get(other).cloned(),
        }
    }
}

/// All records of one round, in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundTable {
    pub round: RoundId,
    /// Trimmed header labels in source order.
    pub headers: Vec<String>,
    pub records: Vec<Record>,
}

impl RoundTable {
    pub fn new(round: RoundId, headers: Vec<String>, records: Vec<Record>) -> Self {
        Self {
            round,
            headers,
            records,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Loaded rounds keyed by round number. Only rounds whose file was found and parsed are present.
pub type RoundSet = BTreeMap<RoundId, RoundTable>;

#[cfg(test)]
pub(crate) fn record(
    institute: &str,
    quota: &str,
    seat_type: &str,
    gender: &str,
    opening: &str,
    closing: &str,
) -> Record {
    Record {
        institute: institute.to_string(),
        quota: quota.to_string(),
        seat_type: seat_type.to_string(),
        gender: gender.to_string(),
        opening_rank: Rank::Raw(opening.to_string()),
        closing_rank: Rank::Raw(closing.to_string()),
        institute_type: None,
        extra: BTreeMap::new(),
    }
}

#[cfg(test)]
pub(crate) fn table(round: u32, records: Vec<Record>) -> RoundTable {
    RoundTable::new(
        RoundId(round),
        REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect(),
        records,
    )
}
