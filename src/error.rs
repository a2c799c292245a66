use std::path::PathBuf;

use thiserror::Error;

/// A round file exists but could not be turned into a table.
///
/// Scoped to a single round: the loader records it and moves on to the next one.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{path} has no '{column}' column")]
    MissingColumn { path: PathBuf, column: String },
}

/// Invalid user input for a query. Recoverable: the caller re-prompts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter a rank number.")]
    MissingRank,

    #[error("Please enter a valid rank number (got '{0}').")]
    InvalidRank(String),

    #[error("Please select a round.")]
    MissingRound,

    #[error("Unknown round '{0}'.")]
    UnknownRound(String),

    #[error("Unknown institute type '{0}' (expected IIT, IIIT, NIT or GFTI).")]
    UnknownInstituteType(String),
}
