use crate::error::PublishError;
use crate::format::format_volume;
use api_client::IpoListing;
use chrono::{DateTime, NaiveDate, Utc};
use core_types::Bar;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// The recent-IPO artifact: every common stock listed within the lookback
/// window, enriched with current price and trading statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IpoSnapshot {
    pub last_updated: DateTime<Utc>,
    pub total_recent_ipos: usize,
    pub lookback_days: i64,
    pub note: String,
    pub data: Vec<IpoRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IpoRow {
    pub symbol: String,
    pub company_name: String,
    pub ipo_date: NaiveDate,
    pub days_since_ipo: i64,
    pub current_price: f64,
    /// First observed session open, used as an IPO price proxy.
    pub ipo_price: Option<f64>,
    pub percent_from_ipo: Option<f64>,
    pub avg_volume: String,
    pub raw_volume: u64,
}

impl IpoRow {
    /// Builds a row from a listing and its recent daily bars (oldest
    /// first). Returns `None` when no bars are available; such listings are
    /// skipped rather than published with empty statistics.
    pub fn from_bars(listing: &IpoListing, bars: &[Bar], today: NaiveDate) -> Option<Self> {
        let last = bars.last()?;
        let current_price = round2(last.close);

        let ipo_price = bars.first().and_then(|b| b.open).map(round2);
        let percent_from_ipo = ipo_price
            .filter(|&p| p > 0.0)
            .map(|p| round1((current_price - p) / p * 100.0));

        let volumes: Vec<f64> = bars.iter().filter_map(|b| b.volume).collect();
        let raw_volume = if volumes.is_empty() {
            0
        } else {
            (volumes.iter().sum::<f64>() / volumes.len() as f64) as u64
        };

        Some(Self {
            symbol: listing.ticker.clone(),
            company_name: listing.company_name.clone(),
            ipo_date: listing.list_date,
            days_since_ipo: (today - listing.list_date).num_days(),
            current_price,
            ipo_price,
            percent_from_ipo,
            avg_volume: format_volume(raw_volume as f64),
            raw_volume,
        })
    }
}

impl IpoSnapshot {
    /// Builds the snapshot, sorting newest listings first.
    pub fn new(mut rows: Vec<IpoRow>, lookback_days: i64) -> Self {
        rows.sort_by(|a, b| b.ipo_date.cmp(&a.ipo_date));
        Self {
            last_updated: Utc::now(),
            total_recent_ipos: rows.len(),
            lookback_days,
            note: format!(
                "Stocks that IPOed in the last {} days. Updated daily. \
                 May not have RS scores due to insufficient history.",
                lookback_days
            ),
            data: rows,
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), PublishError> {
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        info!(ipos = self.total_recent_ipos, path = %path.display(), "saved recent-IPO snapshot");
        Ok(())
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
