//! Query builder for the end-of-day history endpoint.

use chrono::NaiveDate;
use url::Url;

/// Parameters for `/api/eod/{symbol}`.
///
/// Requests daily bars with split/dividend adjusted values. Both bounds are
/// inclusive. Unset bounds are left to the provider, which returns the full
/// available history.
#[derive(Clone, Copy, Debug, Default)]
pub struct EodQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl EodQuery {
    /// Creates a query over the inclusive range `from..=to`.
    pub fn range(from: NaiveDate, to: NaiveDate) -> Self {
        Self::default().with_from(from).with_to(to)
    }

    pub fn with_from(mut self, from: NaiveDate) -> Self {
        self.from = Some(from);
        self
    }

    pub fn with_to(mut self, to: NaiveDate) -> Self {
        self.to = Some(to);
        self
    }

    /// Appends this query's parameters to the given URL, returning the modified URL.
    pub fn add_to_url(&self, url: &Url) -> Url {
        let mut url = url.clone();
        if let Some(from) = self.from {
            url.query_pairs_mut()
                .append_pair("from", from.format("%Y-%m-%d").to_string().as_str());
        };
        if let Some(to) = self.to {
            url.query_pairs_mut()
                .append_pair("to", to.format("%Y-%m-%d").to_string().as_str());
        };
        url.query_pairs_mut()
            .append_pair("period", "d")
            .append_pair("fmt", "json")
            .append_pair("adjusted", "true");
        url
    }
}
