use crate::classifier::classify_record;
use crate::error::ValidationError;
use crate::models::{InstituteType, Record, RoundTable};

/// Raw filter inputs as typed by a user. Empty strings mean "no constraint".
#[derive(Debug, Clone, Default)]
pub struct FilterRequest {
    pub institute_type: Option<String>,
    pub institute: Option<String>,
    pub quota: Option<String>,
    pub seat_type: Option<String>,
    pub gender: Option<String>,
    pub min_rank: Option<String>,
}

/// Validated query: optional equality predicates plus the mandatory rank threshold.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterQuery {
    pub institute_type: Option<InstituteType>,
    pub institute: Option<String>,
    pub quota: Option<String>,
    pub seat_type: Option<String>,
    pub gender: Option<String>,
    /// Records must close strictly above this rank.
    pub min_rank: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FilterOutcome<'a> {
    /// Matching records, ascending by institute name.
    Matches(Vec<&'a Record>),
    NoData,
}

impl<'a> FilterOutcome<'a> {
    pub fn records(&self) -> &[&'a Record] {
        match self {
            FilterOutcome::Matches(records) => records,
            FilterOutcome::NoData => &[],
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, FilterOutcome::NoData)
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.is_empty()).cloned()
}

/// Only plain ASCII digits are a rank: no sign, no decimals, no surrounding blanks.
pub fn parse_min_rank(text: &str) -> Result<u64, ValidationError> {
    if text.is_empty() {
        return Err(ValidationError::MissingRank);
    }
    if !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::InvalidRank(text.to_string()));
    }
    text.parse::<u64>()
        .map_err(|_| ValidationError::InvalidRank(text.to_string()))
}

impl FilterRequest {
    pub fn validate(&self) -> Result<FilterQuery, ValidationError> {
        let min_rank = match self.min_rank.as_deref() {
            None => return Err(ValidationError::MissingRank),
            Some(text) => parse_min_rank(text)?,
        };

        let institute_type = non_empty(&self.institute_type)
            .map(|t| t.parse::<InstituteType>())
            .transpose()?;

        Ok(FilterQuery {
            institute_type,
            institute: non_empty(&self.institute),
            quota: non_empty(&self.quota),
            seat_type: non_empty(&self.seat_type),
            gender: non_empty(&self.gender),
            min_rank,
        })
    }
}

impl FilterQuery {
    pub fn new(min_rank: u64) -> Self {
        Self {
            min_rank,
            ..Self::default()
        }
    }

    pub fn matches(&self, record: &Record) -> bool {
        fn eq(expected: &Option<String>, actual: &str) -> bool {
            expected.as_deref().map_or(true, |e| e == actual)
        }

        if let Some(kind) = self.institute_type {
            let actual = record
                .institute_type
                .unwrap_or_else(|| classify_record(record));
            if actual != kind {
                return false;
            }
        }

        eq(&self.institute, &record.institute)
            && eq(&self.quota, &record.quota)
            && eq(&self.seat_type, &record.seat_type)
            && eq(&self.gender, &record.gender)
            && record
                .closing_rank
                .value()
                .map_or(false, |closing| closing > self.min_rank as f64)
    }
}

/// Run a query against a classified round.
pub fn apply<'a>(table: &'a RoundTable, query: &FilterQuery) -> FilterOutcome<'a> {
    let mut matched: Vec<&Record> = table.records.iter().filter(|r| query.matches(r)).collect();
    if matched.is_empty() {
        return FilterOutcome::NoData;
    }
    // Vec::sort_by is stable, ties keep source order
    matched.sort_by(|a, b| a.institute.cmp(&b.institute));
    FilterOutcome::Matches(matched)
}
