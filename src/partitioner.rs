use anyhow::{Context, Result};
use csv::Writer;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::models::{RoundId, RoundSet, RoundTable, INSTITUTE};

/// One institute's slice of a round, ready to be written as CSV.
#[derive(Debug, Clone, PartialEq)]
pub struct InstituteExport {
    pub institute: String,
    /// Institute name with spaces replaced by underscores.
    pub file_stem: String,
    /// Source headers minus the institute column.
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl InstituteExport {
    pub fn file_name(&self) -> String {
        format!("{}.csv", self.file_stem)
    }
}

pub fn file_stem_for(institute: &str) -> String {
    institute.replace(' ', "_")
}

/// Split a round by institute, in order of first appearance.
pub fn partition(table: &RoundTable) -> Vec<InstituteExport> {
    let headers: Vec<String> = table
        .headers
        .iter()
        .filter(|h| h.as_str() != INSTITUTE)
        .cloned()
        .collect();

    let mut exports: Vec<InstituteExport> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for record in &table.records {
        let slot = *index.entry(record.institute.as_str()).or_insert_with(|| {
            exports.push(InstituteExport {
                institute: record.institute.clone(),
                file_stem: file_stem_for(&record.institute),
                headers: headers.clone(),
                rows: Vec::new(),
            });
            exports.len() - 1
        });

        let row = headers
            .iter()
            .map(|h| record.cell(h).unwrap_or_default())
            .collect();
        exports[slot].rows.push(row);
    }

    exports
}

/// Write each export to `<output_dir>/<Round N>/<file_stem>.csv`, header row included.
pub fn write_exports(table: &RoundTable, exports: &[InstituteExport], output_dir: &Path) -> Result<Vec<PathBuf>> {
    let round_dir = output_dir.join(table.round.to_string());
    fs::create_dir_all(&round_dir)
        .with_context(|| format!("Failed to create directory: {}", round_dir.display()))?;

    let mut written = Vec::with_capacity(exports.len());
    for export in exports {
        let csv_path = round_dir.join(export.file_name());
        let mut writer = Writer::from_path(&csv_path)
            .with_context(|| format!("Failed to create file: {}", csv_path.display()))?;

        writer.write_record(&export.headers)?;
        for row in &export.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        written.push(csv_path);
    }

    log::info!(
        "{}: wrote {} institute files to {}",
        table.round,
        written.len(),
        round_dir.display()
    );
    Ok(written)
}

/// Partition and write in one step.
pub fn export_round(table: &RoundTable, output_dir: &Path) -> Result<Vec<PathBuf>> {
    let exports = partition(table);
    write_exports(table, &exports, output_dir)
}

/// Files written per round, and the rounds whose export failed.
#[derive(Debug, Default)]
pub struct ExportReport {
    pub written: Vec<(RoundId, Vec<PathBuf>)>,
    pub failures: Vec<(RoundId, anyhow::Error)>,
}

/// Export every round. A failing round is recorded and the remaining rounds still export.
pub fn export_all(rounds: &RoundSet, output_dir: &Path) -> ExportReport {
    let mut report = ExportReport::default();
    for (round, table) in rounds {
        match export_round(table, output_dir) {
            Ok(paths) => report.written.push((*round, paths)),
            Err(e) => {
                log::warn!("{}: export failed: {:#}", round, e);
                report.failures.push((*round, e));
            }
        }
    }
    report
}
