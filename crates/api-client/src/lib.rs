use crate::error::ApiError;
use crate::responses::{
    AggsResponse, OpenCloseResponse, ProviderErrorResponse, TickerDetailsResponse,
    TickerListResponse,
};
use async_trait::async_trait;
use chrono::NaiveDate;
use configuration::Provider;
use core_types::Bar;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

pub mod error;
pub mod responses;
// --- Public API ---
pub use responses::{IpoListing, TickerInfo};

/// The generic, abstract interface for the upstream market-data provider.
/// This trait is the contract that the run orchestrator uses, allowing the
/// underlying implementation (live or mock) to be swapped out.
#[async_trait]
pub trait MarketDataApi: Send + Sync {
    /// Lists every active common-stock ticker, walking all pages.
    async fn list_common_stocks(&self) -> Result<Vec<String>, ApiError>;

    /// Fetches a symbol's daily bars over a date range, oldest first.
    async fn fetch_daily_bars(
        &self,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Bar>, ApiError>;

    /// Fetches the single daily bar for one completed session.
    async fn fetch_single_day(&self, symbol: &str, date: NaiveDate) -> Result<Bar, ApiError>;

    /// Looks up a symbol's listing (IPO) date from the ticker details.
    async fn fetch_list_date(&self, symbol: &str) -> Result<Option<NaiveDate>, ApiError>;

    /// Lists common stocks whose listing date is on or after `since`.
    async fn fetch_recent_listings(&self, since: NaiveDate) -> Result<Vec<IpoListing>, ApiError>;
}

/// A concrete implementation of `MarketDataApi` for a Polygon-style REST
/// provider.
///
/// Every request is followed by a fixed pacing delay. The provider enforces
/// a rate budget (~2 requests/second); exceeding it produces throttling
/// errors upstream, so the delay is part of the client's contract rather
/// than an optimization.
#[derive(Clone)]
pub struct PolygonClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    request_delay: Duration,
    page_limit: u32,
}

impl PolygonClient {
    pub fn new(api_key: String, provider: &Provider) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: provider.base_url.clone(),
            api_key,
            request_delay: Duration::from_millis(provider.request_delay_ms),
            page_limit: provider.page_limit,
        }
    }

    /// Performs a GET, enforces the pacing delay, and decodes the body.
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let response = self
            .client
            .get(url)
            .query(query)
            .query(&[("apiKey", self.api_key.as_str())])
            .send()
            .await;

        // Pace unconditionally; a failed request still consumed budget.
        tokio::time::sleep(self.request_delay).await;

        let response = response?;
        let status = response.status();
        let text = response.text().await?;

        if status.is_success() {
            serde_json::from_str::<T>(&text).map_err(|e| ApiError::Deserialization(e.to_string()))
        } else {
            let message = serde_json::from_str::<ProviderErrorResponse>(&text)
                .ok()
                .and_then(|body| body.error.or(body.message).or(body.status))
                .unwrap_or(text);
            Err(ApiError::Provider(status.as_u16(), message))
        }
    }

    /// Walks a paginated ticker listing. The first page must succeed; a
    /// failure on a later page logs a warning and returns the partial
    /// result rather than discarding the pages already fetched.
    async fn walk_ticker_pages(
        &self,
        first_query: Vec<(&str, String)>,
    ) -> Result<Vec<TickerInfo>, ApiError> {
        let url = format!("{}/v3/reference/tickers", self.base_url);
        let first: TickerListResponse = self.get_json(&url, &first_query).await?;

        let mut tickers = first.results;
        let mut cursor = first.next_url;
        let mut page_number = 1u32;

        while let Some(next_url) = cursor {
            page_number += 1;
            match self.get_json::<TickerListResponse>(&next_url, &[]).await {
                Ok(page) => {
                    debug!(
                        page = page_number,
                        count = page.results.len(),
                        "fetched ticker page"
                    );
                    tickers.extend(page.results);
                    cursor = page.next_url;
                }
                Err(e) => {
                    warn!(page = page_number, error = %e, "ticker page fetch failed; keeping partial listing");
                    break;
                }
            }
        }

        Ok(tickers)
    }
}

#[async_trait]
impl MarketDataApi for PolygonClient {
    async fn list_common_stocks(&self) -> Result<Vec<String>, ApiError> {
        let query = vec![
            ("market", "stocks".to_string()),
            ("type", "CS".to_string()),
            ("active", "true".to_string()),
            ("limit", self.page_limit.to_string()),
        ];

        let tickers = self.walk_ticker_pages(query).await?;
        Ok(tickers.into_iter().map(|t| t.ticker).collect())
    }

    async fn fetch_daily_bars(
        &self,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Bar>, ApiError> {
        let url = format!(
            "{}/v2/aggs/ticker/{}/range/1/day/{}/{}",
            self.base_url, symbol, from, to
        );
        let query = [
            ("adjusted", "true".to_string()),
            ("sort", "asc".to_string()),
            ("limit", "50000".to_string()),
        ];

        let response: AggsResponse = self.get_json(&url, &query).await?;
        Ok(response.results)
    }

    async fn fetch_single_day(&self, symbol: &str, date: NaiveDate) -> Result<Bar, ApiError> {
        let url = format!("{}/v1/open-close/{}/{}", self.base_url, symbol, date);
        let query = [("adjusted", "true".to_string())];

        let response: OpenCloseResponse = self.get_json(&url, &query).await?;

        if response.status != "OK" {
            return Err(ApiError::NoData(format!("{} on {}", symbol, date)));
        }
        let close = response
            .close
            .ok_or_else(|| ApiError::NoData(format!("{} on {}: no close", symbol, date)))?;

        Ok(Bar {
            timestamp: date
                .and_hms_opt(0, 0, 0)
                .map(|dt| dt.and_utc().timestamp_millis())
                .unwrap_or_default(),
            close,
            volume: response.volume,
            open: response.open,
        })
    }

    async fn fetch_list_date(&self, symbol: &str) -> Result<Option<NaiveDate>, ApiError> {
        let url = format!("{}/v3/reference/tickers/{}", self.base_url, symbol);

        let response: TickerDetailsResponse = self.get_json(&url, &[]).await?;
        Ok(response.results.and_then(|details| details.list_date))
    }

    async fn fetch_recent_listings(&self, since: NaiveDate) -> Result<Vec<IpoListing>, ApiError> {
        let query = vec![
            ("market", "stocks".to_string()),
            ("type", "CS".to_string()),
            ("active", "true".to_string()),
            ("limit", self.page_limit.to_string()),
            ("list_date.gte", since.to_string()),
        ];

        let tickers = self.walk_ticker_pages(query).await?;

        // Entries without a listing date cannot be aged and are skipped.
        let listings = tickers
            .into_iter()
            .filter_map(|t| {
                let list_date = t.list_date?;
                Some(IpoListing {
                    company_name: t.name.unwrap_or_else(|| "N/A".to_string()),
                    ticker: t.ticker,
                    list_date,
                })
            })
            .collect();

        Ok(listings)
    }
}
