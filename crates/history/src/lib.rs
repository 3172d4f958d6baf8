//! # History Store
//!
//! This crate owns the persisted rolling price history: one thinned series
//! per symbol plus the shared benchmark series. It is the system's
//! "permanent archive" between runs.
//!
//! ## Architectural Principles
//!
//! - **Two write paths, one shape:** a full rebuild (thin a freshly fetched
//!   series) and an incremental daily update (append one bar, trim to the
//!   window cap) must converge on the same on-disk layout, so either path
//!   can feed the next run's scoring unchanged.
//! - **Compact on disk:** the store uses single-letter field names and
//!   drops volume from aged bars, bounding file size while keeping full
//!   resolution where the volume-weighted and short-horizon math needs it.
//!
//! ## Public API
//!
//! - `HistoryStore` / `StockEntry`: the persisted store and its per-symbol
//!   entries, with `load` and `save`.
//! - `thin_series`: the rebuild-path thinning transform.
//! - `append_with_trim`: the update-path rolling-window append.
//! - `clean_bars`: ingestion-side data-quality filter.
//! - `previous_trading_day`: weekend-aware session resolution.

// Declare the modules that constitute this crate.
pub mod error;
pub mod store;
pub mod window;

// Re-export the key components to create a clean, public-facing API.
pub use error::HistoryError;
pub use store::{HistoryStore, StockEntry};
pub use window::{
    append_with_trim, clean_bars, previous_trading_day, thin_series, MAX_WINDOW, RECENT_FALLBACK,
    RECENT_FULL_RESOLUTION, THIN_STRIDE,
};
