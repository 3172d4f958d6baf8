use crate::periods::Period;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One fractional value per lookback period. Used both for a symbol's
/// absolute returns and for its benchmark-relative returns.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PeriodReturns {
    pub m3: f64,
    pub m6: f64,
    pub m9: f64,
    pub m12: f64,
}

impl PeriodReturns {
    pub fn set(&mut self, period: Period, value: f64) {
        match period {
            Period::ThreeMonths => self.m3 = value,
            Period::SixMonths => self.m6 = value,
            Period::NineMonths => self.m9 = value,
            Period::TwelveMonths => self.m12 = value,
        }
    }
}

/// The scored (but not yet ranked) result for one symbol in one run.
///
/// Caveat inherited from the original methodology: a symbol with
/// insufficient history carries the all-zero `relative_returns` vector,
/// which is indistinguishable from genuinely flat relative performance.
/// Callers that need to tell the two apart must check series length before
/// scoring; the run loop does this and skips unscorable symbols entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RsRecord {
    pub symbol: String,
    pub rs_score: f64,
    pub avg_volume: u64,
    pub relative_returns: PeriodReturns,
    /// Absolute (non-relative) 3-month return for the symbol itself.
    pub stock_return_3m: f64,
    /// Absolute 12-month return for the symbol itself.
    pub stock_return_12m: f64,
    pub ipo_date: Option<NaiveDate>,
}

/// An `RsRecord` plus its dense 1-99 percentile rank for one run.
///
/// The rank is a pure function of the sorted universe for this run; it is
/// never carried over between runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedRecord {
    #[serde(flatten)]
    pub record: RsRecord,
    pub rs_rank: u32,
}
