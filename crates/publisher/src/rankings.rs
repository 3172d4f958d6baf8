use crate::error::PublishError;
use crate::format::{format_return, format_volume};
use chrono::{DateTime, NaiveDate, Utc};
use core_types::RankedRecord;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Human-readable description of the scoring formula, echoed into every
/// rankings snapshot so consumers can see what produced the numbers.
pub const FORMULA_DESCRIPTION: &str =
    "RS = 2×(3m relative vs benchmark) + 6m + 9m + 12m relative performance";

/// Which write path produced a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateType {
    FullRebuild,
    DailyUpdate,
}

/// The rankings artifact: the sorted, ranked, human-formatted universe for
/// one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingsSnapshot {
    pub last_updated: DateTime<Utc>,
    pub formula_used: String,
    pub total_stocks: usize,
    pub benchmark: String,
    pub update_type: UpdateType,
    pub data: Vec<RankingRow>,
}

/// One formatted row of the rankings artifact. Returns are percentage
/// strings; volume carries both the compact form and the raw count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingRow {
    pub symbol: String,
    pub rs_rank: u32,
    pub rs_score: f64,
    pub avg_volume: String,
    pub raw_volume: u64,
    pub relative_3m: String,
    pub relative_6m: String,
    pub relative_9m: String,
    pub relative_12m: String,
    pub stock_return_3m: String,
    pub stock_return_12m: String,
    pub ipo_date: Option<NaiveDate>,
}

impl RankingRow {
    pub fn from_ranked(ranked: &RankedRecord) -> Self {
        let record = &ranked.record;
        Self {
            symbol: record.symbol.clone(),
            rs_rank: ranked.rs_rank,
            // Four decimals is plenty for a sum of fractional returns.
            rs_score: (record.rs_score * 10_000.0).round() / 10_000.0,
            avg_volume: format_volume(record.avg_volume as f64),
            raw_volume: record.avg_volume,
            relative_3m: format_return(record.relative_returns.m3),
            relative_6m: format_return(record.relative_returns.m6),
            relative_9m: format_return(record.relative_returns.m9),
            relative_12m: format_return(record.relative_returns.m12),
            stock_return_3m: format_return(record.stock_return_3m),
            stock_return_12m: format_return(record.stock_return_12m),
            ipo_date: record.ipo_date,
        }
    }
}

impl RankingsSnapshot {
    /// Builds the snapshot from a ranked universe (already sorted by the
    /// ranker, best first).
    pub fn new(ranked: &[RankedRecord], benchmark: String, update_type: UpdateType) -> Self {
        Self {
            last_updated: Utc::now(),
            formula_used: FORMULA_DESCRIPTION.to_string(),
            total_stocks: ranked.len(),
            benchmark,
            update_type,
            data: ranked.iter().map(RankingRow::from_ranked).collect(),
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), PublishError> {
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        info!(stocks = self.total_stocks, path = %path.display(), "saved rankings snapshot");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::{PeriodReturns, RsRecord};

    fn ranked(symbol: &str, score: f64, rank: u32) -> RankedRecord {
        RankedRecord {
            record: RsRecord {
                symbol: symbol.to_string(),
                rs_score: score,
                avg_volume: 2_460_000,
                relative_returns: PeriodReturns {
                    m3: 0.10,
                    m6: -0.05,
                    m9: 0.0,
                    m12: 0.225,
                },
                stock_return_3m: 0.12,
                stock_return_12m: 0.30,
                ipo_date: None,
            },
            rs_rank: rank,
        }
    }

    #[test]
    fn row_formats_every_field() {
        let row = RankingRow::from_ranked(&ranked("NVDA", 0.123456, 99));
        assert_eq!(row.symbol, "NVDA");
        assert_eq!(row.rs_rank, 99);
        assert_eq!(row.rs_score, 0.1235);
        assert_eq!(row.avg_volume, "2.5M");
        assert_eq!(row.raw_volume, 2_460_000);
        assert_eq!(row.relative_3m, "10.0%");
        assert_eq!(row.relative_6m, "-5.0%");
        assert_eq!(row.relative_12m, "22.5%");
        assert_eq!(row.stock_return_3m, "12.0%");
    }

    #[test]
    fn snapshot_carries_run_metadata() {
        let universe = vec![ranked("A", 0.2, 99), ranked("B", 0.1, 50)];
        let snapshot =
            RankingsSnapshot::new(&universe, "S&P 500 (SPY)".to_string(), UpdateType::DailyUpdate);

        assert_eq!(snapshot.total_stocks, 2);
        assert_eq!(snapshot.benchmark, "S&P 500 (SPY)");
        assert_eq!(snapshot.formula_used, FORMULA_DESCRIPTION);
        assert_eq!(snapshot.data.len(), 2);

        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(json.contains("\"update_type\":\"daily_update\""));
    }

    #[test]
    fn update_type_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&UpdateType::FullRebuild).unwrap(),
            "\"full_rebuild\""
        );
        assert_eq!(
            serde_json::to_string(&UpdateType::DailyUpdate).unwrap(),
            "\"daily_update\""
        );
    }
}
