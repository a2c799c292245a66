use std::cmp::Ordering;
use std::collections::HashMap;

use crate::classifier::classify_record;
use crate::models::{InstituteType, Record};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupBy {
    Gender,
    SeatType,
    Quota,
}

impl GroupBy {
    fn key<'r>(&self, record: &'r Record) -> &'r str {
        match self {
            GroupBy::Gender => &record.gender,
            GroupBy::SeatType => &record.seat_type,
            GroupBy::Quota => &record.quota,
        }
    }
}

/// Average opening and closing rank of one group. Missing ranks are skipped.
#[derive(Debug, Clone, PartialEq)]
pub struct RankMeans {
    pub key: String,
    pub count: usize,
    /// `None` when no record in the group has a numeric rank.
    pub mean_opening: Option<f64>,
    pub mean_closing: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeComparison {
    pub institute_type: InstituteType,
    pub by_gender: Vec<RankMeans>,
    pub by_seat_type: Vec<RankMeans>,
    /// Only reported for NITs, where home-state quotas matter.
    pub by_quota: Option<Vec<RankMeans>>,
}

#[derive(Default)]
struct Accumulator {
    count: usize,
    opening_sum: f64,
    opening_n: usize,
    closing_sum: f64,
    closing_n: usize,
}

fn mean(sum: f64, n: usize) -> Option<f64> {
    if n == 0 {
        None
    } else {
        Some(sum / n as f64)
    }
}

/// Group records by `by`, groups in first-appearance order.
pub fn mean_ranks_by<'a>(records: impl IntoIterator<Item = &'a Record>, by: GroupBy) -> Vec<RankMeans> {
    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Accumulator> = HashMap::new();

    for record in records {
        let key = by.key(record);
        let acc = groups.entry(key.to_string()).or_insert_with(|| {
            order.push(key.to_string());
            Accumulator::default()
        });
        acc.count += 1;
        if let Some(v) = record.opening_rank.value() {
            acc.opening_sum += v;
            acc.opening_n += 1;
        }
        if let Some(v) = record.closing_rank.value() {
            acc.closing_sum += v;
            acc.closing_n += 1;
        }
    }

    order
        .into_iter()
        .filter_map(|key| {
            let acc = groups.remove(&key)?;
            Some(RankMeans {
                key,
                count: acc.count,
                mean_opening: mean(acc.opening_sum, acc.opening_n),
                mean_closing: mean(acc.closing_sum, acc.closing_n),
            })
        })
        .collect()
}

/// Per institute type (first-appearance order), rank averages by gender and seat type.
pub fn compare_by_type(records: &[&Record]) -> Vec<TypeComparison> {
    let mut types: Vec<InstituteType> = Vec::new();
    for record in records {
        let kind = record
            .institute_type
            .unwrap_or_else(|| classify_record(record));
        if !types.contains(&kind) {
            types.push(kind);
        }
    }

    types
        .into_iter()
        .map(|kind| {
            let subset: Vec<&Record> = records
                .iter()
                .copied()
                .filter(|r| r.institute_type.unwrap_or_else(|| classify_record(r)) == kind)
                .collect();
            TypeComparison {
                institute_type: kind,
                by_gender: mean_ranks_by(subset.iter().copied(), GroupBy::Gender),
                by_seat_type: mean_ranks_by(subset.iter().copied(), GroupBy::SeatType),
                by_quota: (kind == InstituteType::Nit)
                    .then(|| mean_ranks_by(subset.iter().copied(), GroupBy::Quota)),
            }
        })
        .collect()
}

/// Stable ascending sort by opening rank; missing ranks go last.
pub fn sort_by_opening_rank(records: &mut [&Record]) {
    records.sort_by(|a, b| match (a.opening_rank.value(), b.opening_rank.value()) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}
