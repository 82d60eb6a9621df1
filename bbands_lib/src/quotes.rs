//! Quote client: the failure-absorbing boundary between the provider API
//! and the analysis code.
//!
//! Every fetch returns a plain value. Provider errors, unparsable payloads,
//! and empty ranges are logged here and surface as `None` or an empty
//! [`PriceSeries`], so nothing downstream has to handle provider errors.

use async_trait::async_trait;
use chrono::NaiveDate;
use eodhd_api::types::EodBar;
use eodhd_api::{Client, EodQuery};

use crate::calendar;
use crate::config::DashboardConfig;
use crate::error::DashboardError;

/// One adjusted daily close.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub adjusted_close: f64,
}

impl PriceBar {
    pub fn new(date: NaiveDate, adjusted_close: f64) -> Self {
        Self {
            date,
            adjusted_close,
        }
    }
}

/// Adjusted closes for one symbol, oldest first.
///
/// Construction drops non-finite closes and sorts by date, so the first and
/// last bars are always the chronological ends of the range.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceSeries {
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    pub fn new(mut bars: Vec<PriceBar>) -> Self {
        bars.retain(|bar| bar.adjusted_close.is_finite());
        bars.sort_by_key(|bar| bar.date);
        Self { bars }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a series from provider bars, dropping rows without a numeric
    /// adjusted close.
    pub fn from_eod_bars(bars: Vec<EodBar>) -> Self {
        Self::new(
            bars.into_iter()
                .filter_map(|bar| bar.adjusted_close.map(|close| PriceBar::new(bar.date, close)))
                .collect(),
        )
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Adjusted close of the earliest bar.
    pub fn first_close(&self) -> Option<f64> {
        self.bars.first().map(|bar| bar.adjusted_close)
    }

    /// Adjusted close of the latest bar.
    pub fn last_close(&self) -> Option<f64> {
        self.bars.last().map(|bar| bar.adjusted_close)
    }
}

/// Latest observed price for a symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    pub symbol: String,
    pub price: f64,
}

/// Source of quotes and adjusted-close history.
///
/// Implementations never return errors: failures are logged and reported
/// as `None` or an empty series.
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Latest quote, or `None` when the provider fails or has no numeric price.
    async fn fetch_latest_quote(&self, symbol: &str) -> Option<Quote>;

    /// Adjusted closes over the inclusive range `from..=to`.
    async fn fetch_historical_series(
        &self,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> PriceSeries;

    /// The five business days ending one business day before `today`.
    /// Its last bar is the previous close.
    async fn fetch_previous_close_series(&self, symbol: &str, today: NaiveDate) -> PriceSeries {
        let window = calendar::previous_close_window(today);
        self.fetch_historical_series(symbol, window.from, window.to)
            .await
    }
}

/// [`PriceSource`] backed by the EOD Historical Data API.
pub struct EodhdPriceSource {
    client: Client,
}

impl EodhdPriceSource {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds the API client from configuration. Fails when no API token is set.
    pub fn from_config(config: &DashboardConfig) -> Result<Self, DashboardError> {
        let token = config.require_api_token()?;
        let client = Client::with_base_url(&config.base_url, token)?
            .with_timeout(config.request_timeout())?
            .with_exchange(&config.exchange);
        Ok(Self::new(client))
    }
}

#[async_trait]
impl PriceSource for EodhdPriceSource {
    async fn fetch_latest_quote(&self, symbol: &str) -> Option<Quote> {
        match self.client.get_real_time(symbol).await {
            Ok(quote) => match quote.close {
                Some(price) => Some(Quote {
                    symbol: symbol.to_string(),
                    price,
                }),
                None => {
                    tracing::warn!("Quote for {} has no numeric close", symbol);
                    None
                }
            },
            Err(e) => {
                tracing::warn!(
                    "Failed to fetch current price for {}: {}",
                    symbol,
                    describe(&e)
                );
                None
            }
        }
    }

    async fn fetch_historical_series(
        &self,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> PriceSeries {
        let query = EodQuery::range(from, to);
        match self.client.get_eod(symbol, &query).await {
            Ok(bars) => {
                let total = bars.len();
                let series = PriceSeries::from_eod_bars(bars);
                if series.len() < total {
                    tracing::debug!(
                        "{}: dropped {} of {} bars without a numeric adjusted close",
                        symbol,
                        total - series.len(),
                        total
                    );
                }
                series
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to fetch history for {} ({} to {}): {}",
                    symbol,
                    from,
                    to,
                    describe(&e)
                );
                PriceSeries::empty()
            }
        }
    }
}

fn describe(err: &eodhd_api::Error) -> String {
    match err {
        eodhd_api::Error::HttpStatus { status, body } => format!("HTTP {}: {}", status, body),
        other => other.to_string(),
    }
}
