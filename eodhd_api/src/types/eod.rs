//! Daily bars returned by the `/eod` endpoint.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::numeric::lenient_f64;

/// One end-of-day bar. The endpoint returns a JSON array of these,
/// oldest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EodBar {
    pub date: NaiveDate,

    #[serde(default, deserialize_with = "lenient_f64")]
    pub open: Option<f64>,

    #[serde(default, deserialize_with = "lenient_f64")]
    pub high: Option<f64>,

    #[serde(default, deserialize_with = "lenient_f64")]
    pub low: Option<f64>,

    #[serde(default, deserialize_with = "lenient_f64")]
    pub close: Option<f64>,

    /// Close adjusted for splits and dividends.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub adjusted_close: Option<f64>,

    #[serde(default, deserialize_with = "lenient_f64")]
    pub volume: Option<f64>,
}
