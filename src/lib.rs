//! Multi-round admission rank tables: load, split per institute, classify
//! institutes into IIT / IIIT / NIT / GFTI, normalize ranks and filter.
//!
//! ```text
//!  2024_Round_{1..N}.csv
//!        │ loader
//!        ▼
//!     RoundSet ──► partitioner ──► institutes_csv/<Round N>/<Institute>.csv
//!        │ classifier + normalizer (in place, once)
//!        ▼
//!     filter / selection / stats (read-only queries)
//! ```

pub mod classifier;
pub mod error;
pub mod filter;
pub mod loader;
pub mod models;
pub mod normalizer;
pub mod partitioner;
pub mod selection;
pub mod stats;

pub use error::{LoadError, ValidationError};
pub use models::{Config, InstituteType, Rank, Record, RoundId, RoundSet, RoundTable};

/// Classify and normalize every loaded round. Run once before serving queries.
pub fn prepare_rounds(rounds: &mut RoundSet) {
    classifier::classify_all(rounds);
    normalizer::normalize_all(rounds);
}
