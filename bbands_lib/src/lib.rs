//! Core of the Bollinger-Band ETF dashboard.
//!
//! Loads sector sheets of band-crossing signals, orders them by signal
//! strength, and analyzes a ticker by fetching its live quote and several
//! windows of adjusted closes concurrently from EOD Historical Data.

pub mod analysis;
pub mod calendar;
pub mod chart;
pub mod config;
pub mod error;
pub mod metrics;
pub mod quotes;
pub mod signals;
pub mod workbook;

pub use eodhd_api;

pub use analysis::Analyzer;
pub use calendar::{AnalysisWindows, DateWindow};
pub use config::{ConfigError, DashboardConfig};
pub use error::DashboardError;
pub use metrics::{percentage_change, AnalysisResult, SeriesBundle};
pub use quotes::{EodhdPriceSource, PriceBar, PriceSeries, PriceSource, Quote};
pub use signals::{highlight_style, prioritize, Band, TickerRow};
pub use workbook::{Workbook, WorkbookError};
