use crate::returns::trailing_return;
use core_types::{Bar, Period, PeriodReturns, SCORING_MIN_BARS};
use serde::{Deserialize, Serialize};

/// Number of trailing volume-carrying observations averaged for a symbol's
/// volume figure. Thinned history bars carry no volume and are skipped.
pub const AVG_VOLUME_BARS: usize = 50;

/// Outcome of aligning one symbol against the benchmark.
///
/// This is deliberately a tri-state rather than an error: an unscorable
/// symbol still produces a complete (all-zero) result so downstream
/// aggregation stays a total function. Callers decide whether to keep or
/// skip unscorable symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlignmentStatus {
    /// Enough history on both sides; the returns are meaningful.
    Scored,
    /// The symbol has fewer than the 252 bars required for a 12-month
    /// window. All returns are zero-filled.
    InsufficientHistory,
    /// One of the series is empty.
    NoData,
}

/// Per-period returns for one symbol, the benchmark, and their difference,
/// plus the symbol's trailing average volume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aligned {
    pub status: AlignmentStatus,
    pub relative: PeriodReturns,
    pub stock: PeriodReturns,
    pub benchmark: PeriodReturns,
    pub avg_volume: u64,
}

impl Aligned {
    fn empty(status: AlignmentStatus) -> Self {
        Self {
            status,
            relative: PeriodReturns::default(),
            stock: PeriodReturns::default(),
            benchmark: PeriodReturns::default(),
            avg_volume: 0,
        }
    }
}

/// Aligns one symbol's series against the benchmark series over the four
/// fixed lookback periods.
///
/// Both series are assumed calendar-aligned by the provider. A period where
/// either side lacks sufficient data is zero-filled rather than omitted;
/// note that this makes "flat relative performance" and "insufficient
/// history" indistinguishable in the output vector. Check `status` (or
/// series length) where the distinction matters.
pub fn align(stock: &[Bar], benchmark: &[Bar]) -> Aligned {
    if stock.is_empty() || benchmark.is_empty() {
        return Aligned::empty(AlignmentStatus::NoData);
    }
    if stock.len() < SCORING_MIN_BARS {
        return Aligned::empty(AlignmentStatus::InsufficientHistory);
    }

    let mut aligned = Aligned::empty(AlignmentStatus::Scored);

    for period in Period::ALL {
        let days = period.trading_days();
        match (
            trailing_return(stock, days),
            trailing_return(benchmark, days),
        ) {
            (Some(stock_ret), Some(bench_ret)) => {
                aligned.stock.set(period, stock_ret);
                aligned.benchmark.set(period, bench_ret);
                aligned.relative.set(period, stock_ret - bench_ret);
            }
            // Zero-fill the period when either side falls short.
            _ => {}
        }
    }

    aligned.avg_volume = average_volume(stock);
    aligned
}

/// Mean volume over the most recent `AVG_VOLUME_BARS` observations that
/// carry a volume field.
fn average_volume(bars: &[Bar]) -> u64 {
    let volumes: Vec<f64> = bars
        .iter()
        .rev()
        .filter_map(|bar| bar.volume)
        .take(AVG_VOLUME_BARS)
        .collect();

    if volumes.is_empty() {
        return 0;
    }
    (volumes.iter().sum::<f64>() / volumes.len() as f64) as u64
}
