//! # Ranking Publisher
//!
//! Formats a run's ranked universe (and the recent-IPO scan) into the
//! persisted JSON artifacts: human-oriented formatted values in the
//! rankings snapshot, machine-oriented full precision in the history store
//! (owned by the `history` crate).
//!
//! Publication is decoupled from store maintenance: if ranking fails for a
//! run, the updated store is still valid and only the snapshot write is
//! skipped and reported.

// Declare the modules that constitute this crate.
pub mod error;
pub mod format;
pub mod ipos;
pub mod rankings;

// Re-export the key components to create a clean, public-facing API.
pub use error::PublishError;
pub use format::{format_return, format_volume};
pub use ipos::{IpoRow, IpoSnapshot};
pub use rankings::{RankingRow, RankingsSnapshot, UpdateType, FORMULA_DESCRIPTION};
