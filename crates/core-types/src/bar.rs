use serde::{Deserialize, Serialize};

/// A single daily price/volume observation for one symbol.
///
/// Serialized with the compact field names used by the persisted history
/// store (`t`/`c`/`v`/`o`), which also match the provider's aggregate
/// payloads so both can deserialize into the same type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Unix timestamp of the session, in milliseconds.
    #[serde(rename = "t")]
    pub timestamp: i64,

    /// Closing price. Must be positive; bars violating this are rejected
    /// at ingestion, before any return calculation sees them.
    #[serde(rename = "c")]
    pub close: f64,

    /// Session volume. Absent on thinned historical bars.
    #[serde(rename = "v", skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,

    /// Session open. Only carried where a consumer needs it (e.g. the
    /// first-day open used as an IPO price proxy).
    #[serde(rename = "o", skip_serializing_if = "Option::is_none")]
    pub open: Option<f64>,
}

impl Bar {
    /// A copy of this bar with the volume and open stripped, as stored for
    /// aged (thinned) history.
    pub fn close_only(&self) -> Self {
        Self {
            timestamp: self.timestamp,
            close: self.close,
            volume: None,
            open: None,
        }
    }
}
