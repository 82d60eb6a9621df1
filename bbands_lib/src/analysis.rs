//! Concurrent fetch-and-derive for one or more tickers.
//!
//! A single analysis issues the quote fetch and all five history fetches at
//! once and waits for every one of them before computing metrics, so its
//! latency is that of the slowest call. Calls fail independently: a failed
//! fetch only blanks the metrics that depend on it.

use std::sync::Arc;

use chrono::{Local, NaiveDate};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::calendar::AnalysisWindows;
use crate::config::DashboardConfig;
use crate::error::DashboardError;
use crate::metrics::{self, AnalysisResult, SeriesBundle};
use crate::quotes::{EodhdPriceSource, PriceSource};

/// Runs analyses against a [`PriceSource`].
///
/// Cloning is cheap; clones share the same source. Analyses keep no state
/// between calls, so any number may run at once.
#[derive(Clone)]
pub struct Analyzer {
    source: Arc<dyn PriceSource>,
    concurrency: usize,
}

impl Analyzer {
    pub fn new(source: Arc<dyn PriceSource>) -> Self {
        Self {
            source,
            concurrency: 4,
        }
    }

    /// Builds an analyzer backed by the EOD Historical Data API.
    pub fn from_config(config: &DashboardConfig) -> Result<Self, DashboardError> {
        config.validate()?;
        let source = EodhdPriceSource::from_config(config)?;
        Ok(Self::new(Arc::new(source)).with_concurrency(config.concurrency))
    }

    /// Maximum tickers in flight for [`Analyzer::analyze_many`]. Clamped to at least 1.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Analyzes `symbol` as of the local calendar date.
    pub async fn analyze(&self, symbol: &str) -> AnalysisResult {
        self.analyze_as_of(symbol, Local::now().date_naive()).await
    }

    /// Analyzes `symbol` as of `today`.
    pub async fn analyze_as_of(&self, symbol: &str, today: NaiveDate) -> AnalysisResult {
        let symbol = symbol.trim();
        let windows = AnalysisWindows::for_date(today);
        let source = self.source.as_ref();

        let (quote, previous_close, month, quarter, year, five_day) = tokio::join!(
            source.fetch_latest_quote(symbol),
            source.fetch_previous_close_series(symbol, today),
            source.fetch_historical_series(symbol, windows.month.from, windows.month.to),
            source.fetch_historical_series(symbol, windows.quarter.from, windows.quarter.to),
            source.fetch_historical_series(symbol, windows.year.from, windows.year.to),
            source.fetch_historical_series(symbol, windows.five_day.from, windows.five_day.to),
        );

        let bundle = SeriesBundle {
            month,
            quarter,
            year,
            five_day,
            previous_close,
        };
        let result = metrics::compute(symbol, today, quote.map(|q| q.price), &bundle);

        if result.is_available() {
            tracing::info!(
                "{}: price {:?}, today {:?}%, 5d {:?}%, mtd {:?}%, qtd {:?}%, ytd {:?}%",
                result.symbol,
                result.current_price,
                result.today_pct,
                result.five_day_pct,
                result.mtd_pct,
                result.qtd_pct,
                result.ytd_pct
            );
        } else {
            tracing::warn!("{}: no current price, metrics unavailable", result.symbol);
        }
        result
    }

    /// Analyzes several symbols as of the local calendar date.
    pub async fn analyze_many(&self, symbols: &[String]) -> Vec<AnalysisResult> {
        self.analyze_many_as_of(symbols, Local::now().date_naive())
            .await
    }

    /// Analyzes several symbols with at most `concurrency` in flight.
    /// Results come back in input order.
    pub async fn analyze_many_as_of(
        &self,
        symbols: &[String],
        today: NaiveDate,
    ) -> Vec<AnalysisResult> {
        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut join_set = JoinSet::new();

        for (idx, symbol) in symbols.iter().enumerate() {
            let sem = Arc::clone(&semaphore);
            let analyzer = self.clone();
            let symbol = symbol.clone();
            join_set.spawn(async move {
                let Ok(_permit) = sem.acquire_owned().await else {
                    return (idx, AnalysisResult::unavailable(&symbol, today));
                };
                (idx, analyzer.analyze_as_of(&symbol, today).await)
            });
        }

        let mut slots: Vec<Option<AnalysisResult>> = vec![None; symbols.len()];
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((idx, result)) => slots[idx] = Some(result),
                Err(e) => tracing::error!("Analysis task failed: {}", e),
            }
        }

        slots
            .into_iter()
            .zip(symbols)
            .map(|(slot, symbol)| {
                slot.unwrap_or_else(|| AnalysisResult::unavailable(symbol.trim(), today))
            })
            .collect()
    }
}
