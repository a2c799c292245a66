use std::collections::BTreeMap;
use std::fs::File;
use std::path::{Path, PathBuf};

use crate::error::LoadError;
use crate::models::{
    Config, Rank, Record, RoundId, RoundSet, RoundTable, CLOSING_RANK, GENDER, INSTITUTE,
    OPENING_RANK, QUOTA, REQUIRED_COLUMNS, SEAT_TYPE,
};

/// Outcome of loading every candidate round.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub rounds: RoundSet,
    /// Rounds whose file existed but could not be loaded.
    pub failures: Vec<(RoundId, LoadError)>,
}

/// Load rounds `1..=round_count` as configured. Missing files are skipped.
pub fn load_rounds(config: &Config) -> LoadReport {
    let data_dir = Path::new(&config.data_directory);
    let candidates = (1..=config.round_count)
        .map(RoundId)
        .map(|round| (round, data_dir.join(config.round_file_name(round))));
    load_candidates(candidates)
}

/// Load an explicit list of `(round, path)` candidates.
pub fn load_candidates(candidates: impl IntoIterator<Item = (RoundId, PathBuf)>) -> LoadReport {
    let mut report = LoadReport::default();

    for (round, path) in candidates {
        if !path.exists() {
            log::debug!("{}: no file at {}, skipping", round, path.display());
            continue;
        }

        match load_round_file(round, &path) {
            Ok(table) => {
                log::info!("{}: loaded {} records from {}", round, table.len(), path.display());
                report.rounds.insert(round, table);
            }
            Err(e) => {
                log::warn!("{}: {}", round, e);
                report.failures.push((round, e));
            }
        }
    }

    report
}

/// Parse one round file. Header labels are trimmed, cell values are kept as-is.
pub fn load_round_file(round: RoundId, path: &Path) -> Result<RoundTable, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_round(round, file).map_err(|e| e.with_path(path))
}

/// Parse a round from any reader. Errors carry an empty path until [`load_round_file`] fills it in.
pub fn read_round<R: std::io::Read>(round: RoundId, source: R) -> Result<RoundTable, LoadError> {
    let csv_error = |source: csv::Error| LoadError::Csv {
        path: PathBuf::new(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(source);

    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_error)?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| LoadError::MissingColumn {
                path: PathBuf::new(),
                column: name.to_string(),
            })
    };
    let institute_idx = column(INSTITUTE)?;
    let quota_idx = column(QUOTA)?;
    let seat_type_idx = column(SEAT_TYPE)?;
    let gender_idx = column(GENDER)?;
    let opening_idx = column(OPENING_RANK)?;
    let closing_idx = column(CLOSING_RANK)?;

    let mut records = Vec::new();
    for result in reader.records() {
        let row = result.map_err(csv_error)?;
        let get = |idx: usize| row.get(idx).unwrap_or("").to_string();

        let extra: BTreeMap<String, String> = headers
            .iter()
            .enumerate()
            .filter(|(_, h)| !REQUIRED_COLUMNS.contains(&h.as_str()))
            .map(|(idx, h)| (h.clone(), get(idx)))
            .collect();

        records.push(Record {
            institute: get(institute_idx),
            quota: get(quota_idx),
            seat_type: get(seat_type_idx),
            gender: get(gender_idx),
            opening_rank: Rank::Raw(get(opening_idx)),
            closing_rank: Rank::Raw(get(closing_idx)),
            institute_type: None,
            extra,
        });
    }

    Ok(RoundTable::new(round, headers, records))
}

impl LoadError {
    fn with_path(self, path: &Path) -> Self {
        let path = path.to_path_buf();
        match self {
            LoadError::Io { source, .. } => LoadError::Io { path, source },
            LoadError::Csv { source, .. } => LoadError::Csv { path, source },
            LoadError::MissingColumn { column, .. } => LoadError::MissingColumn { path, column },
        }
    }
}
