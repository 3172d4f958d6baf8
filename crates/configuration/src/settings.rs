use serde::Deserialize;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub provider: Provider,
    pub benchmark: Benchmark,
    pub history: History,
    pub ipo: Ipo,
    pub output: Output,
}

/// Connection parameters for the upstream market-data provider.
///
/// The API credential is deliberately not part of the file-based config; it
/// is read from the `POLYGON_API_KEY` environment variable at startup so it
/// never lands in version control.
#[derive(Debug, Clone, Deserialize)]
pub struct Provider {
    /// Base URL of the provider's REST API.
    pub base_url: String,
    /// Minimum delay between consecutive requests, in milliseconds.
    /// The provider enforces a rate budget of roughly 2 requests/second;
    /// violating it causes upstream throttling, so this is a hard contract,
    /// not a tuning knob.
    pub request_delay_ms: u64,
    /// Page size for paginated listing endpoints.
    pub page_limit: u32,
}

/// The single reference index every symbol is scored against.
#[derive(Debug, Clone, Deserialize)]
pub struct Benchmark {
    /// Ticker used to fetch the benchmark series (e.g. "SPY").
    pub symbol: String,
    /// Human-readable name echoed into the rankings artifact.
    pub description: String,
}

/// Fetch-window parameters for the history store. The window and thinning
/// bounds themselves are fixed constants of the `history` crate, since the
/// two write paths must agree on them exactly.
#[derive(Debug, Clone, Deserialize)]
pub struct History {
    /// Calendar days of history fetched on a full rebuild. Wider than 12
    /// months of trading days to buffer weekends and holidays.
    pub rebuild_lookback_days: i64,
}

/// Recent-IPO scan parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct Ipo {
    /// How far back a listing date may be to still count as "recent".
    pub lookback_days: i64,
}

/// Paths of the persisted artifacts.
#[derive(Debug, Clone, Deserialize)]
pub struct Output {
    pub rankings_path: String,
    pub history_path: String,
    pub recent_ipos_path: String,
}
