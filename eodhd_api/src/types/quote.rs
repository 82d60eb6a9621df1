//! Live quote returned by the `/real-time` endpoint.

use serde::{Deserialize, Serialize};

use super::numeric::{lenient_f64, lenient_i64};

/// Latest quote for one symbol.
///
/// Only `close` is used downstream (it is the latest traded price during the
/// session). Every numeric field is optional because the provider emits
/// `"NA"` for values it does not have.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RealTimeQuote {
    /// Provider code, e.g. `SPY.US`.
    #[serde(default)]
    pub code: String,

    /// Unix timestamp of the quote.
    #[serde(default, deserialize_with = "lenient_i64")]
    pub timestamp: Option<i64>,

    #[serde(default, deserialize_with = "lenient_f64")]
    pub open: Option<f64>,

    #[serde(default, deserialize_with = "lenient_f64")]
    pub high: Option<f64>,

    #[serde(default, deserialize_with = "lenient_f64")]
    pub low: Option<f64>,

    /// Latest price.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub close: Option<f64>,

    #[serde(default, deserialize_with = "lenient_f64")]
    pub volume: Option<f64>,

    #[serde(default, deserialize_with = "lenient_f64")]
    pub previous_close: Option<f64>,

    #[serde(default, deserialize_with = "lenient_f64")]
    pub change: Option<f64>,

    /// Change versus previous close, in percent.
    #[serde(default, rename = "change_p", deserialize_with = "lenient_f64")]
    pub change_pct: Option<f64>,
}
