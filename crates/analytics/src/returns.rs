use core_types::Bar;

/// Computes the trailing fractional return over `days_back` trading days:
/// `(close[last] - close[last - days_back]) / close[last - days_back]`.
///
/// Returns `None` when the series holds fewer than `days_back + 1`
/// observations, or when the window's starting close is non-positive (a
/// data-quality violation that must never reach the division; ingestion
/// rejects such bars, but a stale store could still contain one).
pub fn trailing_return(bars: &[Bar], days_back: usize) -> Option<f64> {
    if bars.len() < days_back + 1 {
        return None;
    }

    let end = bars[bars.len() - 1].close;
    let start = bars[bars.len() - 1 - days_back].close;

    if start <= 0.0 {
        return None;
    }

    Some((end - start) / start)
}
