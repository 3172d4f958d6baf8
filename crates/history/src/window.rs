use chrono::{Datelike, Days, NaiveDate, Weekday};
use core_types::Bar;
use tracing::warn;

/// Maximum retained series length. Incremental updates trim from the
/// oldest end once a series grows past this.
pub const MAX_WINDOW: usize = 365;

/// Number of most-recent bars stored at full resolution (with volume) on a
/// rebuild.
pub const RECENT_FULL_RESOLUTION: usize = 30;

/// Shrinking fallback when a series is shorter than the full-resolution
/// window: keep this many recent bars instead, or everything if even that
/// is unavailable.
pub const RECENT_FALLBACK: usize = 10;

/// Stride applied to aged bars on a rebuild: every Nth bar survives.
pub const THIN_STRIDE: usize = 5;

/// Thins a freshly fetched series to its stored representation: every
/// `THIN_STRIDE`th bar, stripped of volume, for all but the most recent
/// window, and every bar with volume for the recent window itself.
///
/// The recent window shrinks from 30 to 10 to "all available" as the
/// series gets shorter, so a young listing still stores something usable.
pub fn thin_series(bars: &[Bar]) -> Vec<Bar> {
    let recent = if bars.len() >= RECENT_FULL_RESOLUTION {
        RECENT_FULL_RESOLUTION
    } else if bars.len() >= RECENT_FALLBACK {
        RECENT_FALLBACK
    } else {
        bars.len()
    };
    let split = bars.len() - recent;

    let mut thinned: Vec<Bar> = bars[..split]
        .iter()
        .step_by(THIN_STRIDE)
        .map(Bar::close_only)
        .collect();
    thinned.extend_from_slice(&bars[split..]);
    thinned
}

/// Appends one new daily bar to a stored series and trims the oldest bars
/// past `MAX_WINDOW`, keeping exactly the most recent window.
pub fn append_with_trim(series: &mut Vec<Bar>, bar: Bar) {
    series.push(bar);
    if series.len() > MAX_WINDOW {
        let excess = series.len() - MAX_WINDOW;
        series.drain(..excess);
    }
}

/// Ingestion-side data-quality filter: drops bars with a non-positive
/// close and bars whose timestamp does not strictly increase. Offending
/// bars must never reach a return calculation, where a non-positive close
/// would corrupt the score with an infinite or NaN value.
pub fn clean_bars(symbol: &str, bars: Vec<Bar>) -> Vec<Bar> {
    let mut cleaned: Vec<Bar> = Vec::with_capacity(bars.len());

    for bar in bars {
        if bar.close <= 0.0 {
            warn!(symbol, timestamp = bar.timestamp, close = bar.close, "rejecting bar with non-positive close");
            continue;
        }
        if let Some(last) = cleaned.last() {
            if bar.timestamp <= last.timestamp {
                warn!(symbol, timestamp = bar.timestamp, "rejecting out-of-order bar");
                continue;
            }
        }
        cleaned.push(bar);
    }

    cleaned
}

/// The most recently completed trading session as of `today`: Monday and
/// Sunday map back to the prior Friday, every other day to the previous
/// calendar day (Saturday thus maps to Friday too).
pub fn previous_trading_day(today: NaiveDate) -> NaiveDate {
    let days_back = match today.weekday() {
        Weekday::Mon => 3,
        Weekday::Sun => 2,
        _ => 1,
    };
    today - Days::new(days_back)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(len: usize) -> Vec<Bar> {
        (0..len)
            .map(|i| Bar {
                timestamp: i as i64 * 86_400_000,
                close: 100.0 + i as f64,
                volume: Some(1_000.0 + i as f64),
                open: Some(99.0),
            })
            .collect()
    }

    #[test]
    fn thinning_preserves_recent_thirty_exactly() {
        let bars = series(300);
        let thinned = thin_series(&bars);

        // The most recent 30 bars survive untouched, volume included.
        let recent = &thinned[thinned.len() - 30..];
        assert_eq!(recent, &bars[270..]);

        // Older bars: every 5th close survives, volume dropped.
        let older = &thinned[..thinned.len() - 30];
        assert_eq!(older.len(), 270usize.div_ceil(5));
        for (i, bar) in older.iter().enumerate() {
            assert_eq!(bar.close, bars[i * 5].close);
            assert_eq!(bar.timestamp, bars[i * 5].timestamp);
            assert_eq!(bar.volume, None);
            assert_eq!(bar.open, None);
        }
    }

    #[test]
    fn thinning_falls_back_to_ten_recent_bars() {
        let bars = series(20);
        let thinned = thin_series(&bars);

        let recent = &thinned[thinned.len() - 10..];
        assert_eq!(recent, &bars[10..]);
        // 10 older bars stepped by 5.
        assert_eq!(thinned.len() - 10, 2);
    }

    #[test]
    fn thinning_keeps_everything_for_tiny_series() {
        let bars = series(7);
        let thinned = thin_series(&bars);
        assert_eq!(thinned, bars);

        assert!(thin_series(&[]).is_empty());
    }

    #[test]
    fn append_grows_by_one_below_the_cap() {
        let mut bars = series(100);
        let new_bar = Bar {
            timestamp: 200 * 86_400_000,
            close: 321.0,
            volume: Some(9.0),
            open: None,
        };
        append_with_trim(&mut bars, new_bar.clone());
        assert_eq!(bars.len(), 101);
        assert_eq!(bars.last(), Some(&new_bar));
    }

    #[test]
    fn append_at_the_cap_drops_the_oldest() {
        let mut bars = series(MAX_WINDOW);
        let first_timestamp = bars[0].timestamp;
        let second_timestamp = bars[1].timestamp;

        let new_bar = Bar {
            timestamp: 1_000 * 86_400_000,
            close: 500.0,
            volume: None,
            open: None,
        };
        append_with_trim(&mut bars, new_bar.clone());

        assert_eq!(bars.len(), MAX_WINDOW);
        assert_ne!(bars[0].timestamp, first_timestamp);
        assert_eq!(bars[0].timestamp, second_timestamp);
        assert_eq!(bars.last(), Some(&new_bar));
    }

    #[test]
    fn clean_bars_rejects_bad_closes_and_order() {
        let mut bars = series(5);
        bars[1].close = 0.0;
        bars[3].timestamp = bars[2].timestamp; // duplicate
        let cleaned = clean_bars("TEST", bars.clone());

        assert_eq!(cleaned.len(), 3);
        assert!(cleaned.iter().all(|b| b.close > 0.0));
        assert!(cleaned.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
    }

    #[test]
    fn previous_trading_day_skips_weekends() {
        // 2026-08-24 is a Monday; the prior session is Friday the 21st.
        let monday = NaiveDate::from_ymd_opt(2026, 8, 24).unwrap();
        assert_eq!(
            previous_trading_day(monday),
            NaiveDate::from_ymd_opt(2026, 8, 21).unwrap()
        );

        let sunday = NaiveDate::from_ymd_opt(2026, 8, 23).unwrap();
        assert_eq!(
            previous_trading_day(sunday),
            NaiveDate::from_ymd_opt(2026, 8, 21).unwrap()
        );

        let saturday = NaiveDate::from_ymd_opt(2026, 8, 22).unwrap();
        assert_eq!(
            previous_trading_day(saturday),
            NaiveDate::from_ymd_opt(2026, 8, 21).unwrap()
        );

        let wednesday = NaiveDate::from_ymd_opt(2026, 8, 26).unwrap();
        assert_eq!(
            previous_trading_day(wednesday),
            NaiveDate::from_ymd_opt(2026, 8, 25).unwrap()
        );
    }
}
