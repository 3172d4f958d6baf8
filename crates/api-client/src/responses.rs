use chrono::NaiveDate;
use core_types::Bar;
use serde::Deserialize;

/// Envelope of the paginated ticker listing endpoint.
#[derive(Debug, Deserialize)]
pub struct TickerListResponse {
    #[serde(default)]
    pub results: Vec<TickerInfo>,
    pub next_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TickerInfo {
    pub ticker: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub list_date: Option<NaiveDate>,
}

/// Envelope of the ranged daily-aggregates endpoint. The per-bar payload
/// uses the same compact keys as our `Bar`, so it deserializes directly.
#[derive(Debug, Deserialize)]
pub struct AggsResponse {
    #[serde(default)]
    pub results: Vec<Bar>,
}

/// Payload of the single-day open/close endpoint, which (unlike the
/// aggregates) spells its fields out in full.
#[derive(Debug, Deserialize)]
pub struct OpenCloseResponse {
    pub status: String,
    #[serde(default)]
    pub open: Option<f64>,
    #[serde(default)]
    pub close: Option<f64>,
    #[serde(default)]
    pub volume: Option<f64>,
}

/// Envelope of the ticker details endpoint.
#[derive(Debug, Deserialize)]
pub struct TickerDetailsResponse {
    pub results: Option<TickerDetails>,
}

#[derive(Debug, Deserialize)]
pub struct TickerDetails {
    #[serde(default)]
    pub list_date: Option<NaiveDate>,
}

/// Error body returned by the provider on non-2xx responses.
#[derive(Debug, Deserialize)]
pub struct ProviderErrorResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// A recently listed symbol, as consumed by the IPO scan.
#[derive(Debug, Clone, PartialEq)]
pub struct IpoListing {
    pub ticker: String,
    pub company_name: String,
    pub list_date: NaiveDate,
}
