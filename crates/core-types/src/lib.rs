pub mod bar;
pub mod periods;
pub mod records;

// Re-export the core types to provide a clean public API.
pub use bar::Bar;
pub use periods::{Period, RsWeights, RS_WEIGHTS, SCORING_MIN_BARS};
pub use records::{PeriodReturns, RankedRecord, RsRecord};
