//! Dependent drop-down state as plain transitions: picking a round refreshes
//! every option list, picking an institute type narrows the institutes.

use std::collections::HashSet;

use crate::classifier::classify_record;
use crate::error::ValidationError;
use crate::filter::FilterRequest;
use crate::models::{InstituteType, Record, RoundId, RoundSet, RoundTable};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    pub round: Option<RoundId>,
    pub institute_type: Option<InstituteType>,
    pub institute: Option<String>,
    pub quota: Option<String>,
    pub seat_type: Option<String>,
    pub gender: Option<String>,
}

/// Choices offered once a round is picked, each in first-appearance order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoundOptions {
    pub institute_types: Vec<InstituteType>,
    pub institutes: Vec<String>,
    pub quotas: Vec<String>,
    pub seat_types: Vec<String>,
    pub genders: Vec<String>,
}

fn distinct<'a, T, F>(records: impl Iterator<Item = &'a Record>, key: F) -> Vec<T>
where
    T: Clone + Eq + std::hash::Hash,
    F: Fn(&'a Record) -> T,
{
    let mut seen = HashSet::new();
    records
        .map(key)
        .filter(|value| seen.insert(value.clone()))
        .collect()
}

fn round_table(rounds: &RoundSet, round: RoundId) -> Result<&RoundTable, ValidationError> {
    rounds
        .get(&round)
        .ok_or_else(|| ValidationError::UnknownRound(round.to_string()))
}

fn type_of(record: &Record) -> InstituteType {
    record
        .institute_type
        .unwrap_or_else(|| classify_record(record))
}

/// New round picked: every dependent selection is cleared.
pub fn on_round_selected(
    rounds: &RoundSet,
    round: RoundId,
) -> Result<(Selection, RoundOptions), ValidationError> {
    let table = round_table(rounds, round)?;
    let records = || table.records.iter();

    let options = RoundOptions {
        institute_types: distinct(records(), type_of),
        institutes: distinct(records(), |r| r.institute.clone()),
        quotas: distinct(records(), |r| r.quota.clone()),
        seat_types: distinct(records(), |r| r.seat_type.clone()),
        genders: distinct(records(), |r| r.gender.clone()),
    };
    let selection = Selection {
        round: Some(round),
        ..Selection::default()
    };
    Ok((selection, options))
}

/// Institute type picked (or cleared): returns the institutes to offer and clears the institute choice.
pub fn on_type_selected(
    rounds: &RoundSet,
    current: &Selection,
    institute_type: Option<InstituteType>,
) -> Result<(Selection, Vec<String>), ValidationError> {
    let round = current.round.ok_or(ValidationError::MissingRound)?;
    let table = round_table(rounds, round)?;

    let institutes = distinct(
        table
            .records
            .iter()
            .filter(|r| institute_type.map_or(true, |kind| type_of(r) == kind)),
        |r| r.institute.clone(),
    );
    let selection = Selection {
        institute_type,
        institute: None,
        ..current.clone()
    };
    Ok((selection, institutes))
}

impl Selection {
    /// Pair the selection with the typed rank to form a filter request.
    pub fn to_request(&self, min_rank: &str) -> FilterRequest {
        FilterRequest {
            institute_type: self.institute_type.map(|t| t.to_string()),
            institute: self.institute.clone(),
            quota: self.quota.clone(),
            seat_type: self.seat_type.clone(),
            gender: self.gender.clone(),
            min_rank: Some(min_rank.to_string()),
        }
    }
}
