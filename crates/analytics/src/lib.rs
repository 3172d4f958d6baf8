//! # Relative Strength Engine
//!
//! This crate provides the pure calculation pipeline of the system: trailing
//! returns, benchmark alignment, RS scoring, and percentile ranking.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of
//!   external systems. It depends only on `core-types` (Layer 0).
//! - **Stateless Calculation:** Every function takes bar slices or record
//!   collections as input and produces values as output. The full-rebuild
//!   and daily-update entry points both call this one pipeline, so the two
//!   write paths cannot drift apart numerically.
//!
//! ## Public API
//!
//! - `trailing_return`: fractional return over a fixed lookback window.
//! - `align`: per-period stock/benchmark/relative returns for one symbol.
//! - `rs_score` / `weighted_score`: the fixed-weight RS formula.
//! - `assign_ranks`: dense 1-99 percentile ranking of a scored universe.

// Declare the modules that constitute this crate.
pub mod aligner;
pub mod ranker;
pub mod returns;
pub mod scorer;

// Re-export the key components to create a clean, public-facing API.
pub use aligner::{align, Aligned, AlignmentStatus, AVG_VOLUME_BARS};
pub use ranker::assign_ranks;
pub use returns::trailing_return;
pub use scorer::{rs_score, weighted_score};
