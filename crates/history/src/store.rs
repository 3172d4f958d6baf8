use crate::error::HistoryError;
use chrono::{DateTime, NaiveDate, Utc};
use core_types::Bar;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// The persisted rolling history: one thinned series per symbol plus the
/// shared benchmark series.
///
/// Field names are single letters on disk to keep the artifact small; per
/// run the file holds thousands of symbols at up to 365 bars each.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryStore {
    /// Timestamp of the last write, rebuild or update.
    #[serde(rename = "u")]
    pub last_updated: DateTime<Utc>,

    /// The benchmark series, maintained under the same thinning and
    /// rolling-window rules as any symbol.
    #[serde(rename = "s")]
    pub benchmark: Vec<Bar>,

    /// Number of per-symbol entries; kept for consumers that want the
    /// count without walking `stocks`.
    #[serde(rename = "n")]
    pub stock_count: usize,

    #[serde(rename = "d")]
    pub stocks: Vec<StockEntry>,
}

/// One symbol's entry in the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockEntry {
    #[serde(rename = "s")]
    pub symbol: String,

    /// Thinned for aged bars, full-resolution for the most recent window.
    #[serde(rename = "h")]
    pub series: Vec<Bar>,

    /// When this entry was last touched by a rebuild or update.
    #[serde(rename = "u")]
    pub last_update: DateTime<Utc>,

    #[serde(rename = "i", default)]
    pub ipo_date: Option<NaiveDate>,
}

impl HistoryStore {
    /// Creates a store from freshly rebuilt series, stamping the current
    /// time and record count.
    pub fn new(benchmark: Vec<Bar>, stocks: Vec<StockEntry>) -> Self {
        Self {
            last_updated: Utc::now(),
            benchmark,
            stock_count: stocks.len(),
            stocks,
        }
    }

    /// Re-stamps the metadata after an in-place mutation (incremental
    /// update path).
    pub fn refresh_metadata(&mut self) {
        self.last_updated = Utc::now();
        self.stock_count = self.stocks.len();
    }

    /// Loads the store from disk. A missing file is reported as
    /// `MissingStore`: an incremental update without a prior rebuild is a
    /// fatal misuse, and the caller aborts the run on it.
    pub fn load(path: &Path) -> Result<Self, HistoryError> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                HistoryError::MissingStore(path.display().to_string())
            } else {
                HistoryError::Io(e)
            }
        })?;

        let store: HistoryStore = serde_json::from_str(&contents)?;
        info!(
            stocks = store.stock_count,
            benchmark_bars = store.benchmark.len(),
            "loaded history store"
        );
        Ok(store)
    }

    /// Writes the store to disk as one atomic logical write per run.
    pub fn save(&self, path: &Path) -> Result<(), HistoryError> {
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        info!(stocks = self.stock_count, path = %path.display(), "saved history store");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_store() -> HistoryStore {
        let bar = Bar {
            timestamp: 1_700_000_000_000,
            close: 450.5,
            volume: Some(1_000_000.0),
            open: None,
        };
        HistoryStore::new(
            vec![bar.clone()],
            vec![StockEntry {
                symbol: "AAPL".to_string(),
                series: vec![bar],
                last_update: Utc::now(),
                ipo_date: NaiveDate::from_ymd_opt(1980, 12, 12),
            }],
        )
    }

    #[test]
    fn serializes_with_compact_field_names() {
        let store = sample_store();
        let json = serde_json::to_string(&store).unwrap();

        assert!(json.contains("\"u\""));
        assert!(json.contains("\"s\""));
        assert!(json.contains("\"n\":1"));
        assert!(json.contains("\"d\""));
        assert!(json.contains("\"h\""));
        assert!(json.contains("\"t\":1700000000000"));
        assert!(json.contains("\"i\":\"1980-12-12\""));
        // Long names must not leak into the artifact.
        assert!(!json.contains("benchmark"));
        assert!(!json.contains("timestamp"));
    }

    #[test]
    fn round_trips_through_json() {
        let store = sample_store();
        let json = serde_json::to_string(&store).unwrap();
        let back: HistoryStore = serde_json::from_str(&json).unwrap();
        assert_eq!(back, store);
    }

    #[test]
    fn thinned_bars_omit_volume_on_disk() {
        let bar = Bar {
            timestamp: 1,
            close: 10.0,
            volume: None,
            open: None,
        };
        let json = serde_json::to_string(&bar).unwrap();
        assert_eq!(json, "{\"t\":1,\"c\":10.0}");
    }

    #[test]
    fn missing_store_is_a_distinct_error() {
        let err = HistoryStore::load(Path::new("/nonexistent/historical_data.json")).unwrap_err();
        assert!(matches!(err, HistoryError::MissingStore(_)));
    }
}
