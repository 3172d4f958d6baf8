use serde::{Deserialize, Serialize};

/// Minimum series length (trading days) required before a symbol can be
/// scored. Series shorter than this produce the all-zero relative return
/// vector rather than an error; see `RsRecord` for the caveat.
pub const SCORING_MIN_BARS: usize = 252;

/// The four fixed trailing lookback horizons of the RS formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Period {
    ThreeMonths,
    SixMonths,
    NineMonths,
    TwelveMonths,
}

impl Period {
    /// All periods in ascending horizon order.
    pub const ALL: [Period; 4] = [
        Period::ThreeMonths,
        Period::SixMonths,
        Period::NineMonths,
        Period::TwelveMonths,
    ];

    /// The lookback window in trading days.
    pub fn trading_days(&self) -> usize {
        match self {
            Period::ThreeMonths => 63,
            Period::SixMonths => 126,
            Period::NineMonths => 189,
            Period::TwelveMonths => 252,
        }
    }
}

/// The per-period weights of the RS scoring formula.
///
/// Kept as a named constant set (rather than literals inside the scorer) so
/// tests can exercise the weighted sum with synthetic weights.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RsWeights {
    pub m3: f64,
    pub m6: f64,
    pub m9: f64,
    pub m12: f64,
}

/// IBD-methodology approximation: the most recent quarter counts double.
/// RS = 2×(3m relative) + (6m relative) + (9m relative) + (12m relative).
pub const RS_WEIGHTS: RsWeights = RsWeights {
    m3: 2.0,
    m6: 1.0,
    m9: 1.0,
    m12: 1.0,
};
