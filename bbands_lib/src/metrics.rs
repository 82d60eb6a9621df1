//! Percentage-change metrics derived from a quote and its history windows.

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::quotes::PriceSeries;

/// Rounds to two decimal places using the exact value of `value`, with
/// exact midpoints going to the even neighbour. `25.025` is stored just
/// below the midpoint and rounds to `25.02`.
pub fn round2(value: f64) -> f64 {
    Decimal::from_f64_retain(value)
        .map(|d| d.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven))
        .and_then(|d| d.to_f64())
        .unwrap_or_else(|| (value * 100.0).round_ties_even() / 100.0)
}

/// Percentage change from `reference` to `current`, rounded to two decimals.
///
/// Returns `None` when either price is absent, when the reference is zero,
/// or when the result is not finite.
pub fn percentage_change(current: Option<f64>, reference: Option<f64>) -> Option<f64> {
    let current = current?;
    let reference = reference?;
    if reference == 0.0 {
        return None;
    }
    let pct = round2(((current - reference) / reference) * 100.0);
    pct.is_finite().then_some(pct)
}

/// The history windows fetched for one analysis.
#[derive(Debug, Clone, Default)]
pub struct SeriesBundle {
    pub month: PriceSeries,
    pub quarter: PriceSeries,
    pub year: PriceSeries,
    pub five_day: PriceSeries,
    pub previous_close: PriceSeries,
}

/// Per-symbol metrics. Every value is optional because any fetch may fail.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub symbol: String,
    pub as_of: NaiveDate,
    pub current_price: Option<f64>,
    /// Change versus the previous close.
    pub today_pct: Option<f64>,
    pub five_day_pct: Option<f64>,
    pub mtd_pct: Option<f64>,
    pub qtd_pct: Option<f64>,
    pub ytd_pct: Option<f64>,
}

impl AnalysisResult {
    /// A result with only the symbol set.
    pub fn unavailable(symbol: &str, as_of: NaiveDate) -> Self {
        Self {
            symbol: symbol.to_string(),
            as_of,
            current_price: None,
            today_pct: None,
            five_day_pct: None,
            mtd_pct: None,
            qtd_pct: None,
            ytd_pct: None,
        }
    }

    /// True when a current price was obtained.
    pub fn is_available(&self) -> bool {
        self.current_price.is_some()
    }
}

/// Derives every metric for one symbol.
///
/// Month, quarter, year and five-day changes use the first bar of their
/// window as the reference. The daily change uses the last bar of the
/// previous-close window. Without a current price nothing is computed.
pub fn compute(
    symbol: &str,
    as_of: NaiveDate,
    current_price: Option<f64>,
    series: &SeriesBundle,
) -> AnalysisResult {
    let Some(current) = current_price else {
        return AnalysisResult::unavailable(symbol, as_of);
    };
    let current = Some(current);

    AnalysisResult {
        symbol: symbol.to_string(),
        as_of,
        current_price: current,
        today_pct: percentage_change(current, series.previous_close.last_close()),
        five_day_pct: percentage_change(current, series.five_day.first_close()),
        mtd_pct: percentage_change(current, series.month.first_close()),
        qtd_pct: percentage_change(current, series.quarter.first_close()),
        ytd_pct: percentage_change(current, series.year.first_close()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quotes::PriceBar;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn series(points: &[(u32, f64)]) -> PriceSeries {
        PriceSeries::new(
            points
                .iter()
                .map(|(day, close)| PriceBar::new(d(2024, 8, *day), *close))
                .collect(),
        )
    }

    #[test]
    fn round2_nearest() {
        assert_eq!(round2(2.345678), 2.35);
        assert_eq!(round2(-2.345678), -2.35);
        assert_eq!(round2(10.0), 10.0);
    }

    #[test]
    fn round2_exact_midpoints_go_to_even() {
        assert_eq!(round2(0.125), 0.12);
        assert_eq!(round2(0.375), 0.38);
        assert_eq!(round2(-0.125), -0.12);
    }

    #[test]
    fn round2_uses_stored_value_not_decimal_literal() {
        // 2.675 and 25.025 are stored slightly below the midpoint.
        assert_eq!(round2(2.675), 2.67);
        assert_eq!(round2(25.025), 25.02);
    }

    #[test]
    fn percentage_change_basic() {
        assert_eq!(percentage_change(Some(110.0), Some(100.0)), Some(10.0));
        assert_eq!(percentage_change(Some(90.0), Some(100.0)), Some(-10.0));
        assert_eq!(percentage_change(Some(100.0), Some(100.0)), Some(0.0));
    }

    #[test]
    fn percentage_change_rounds() {
        // (101 - 99) / 99 * 100 = 2.0202...
        assert_eq!(percentage_change(Some(101.0), Some(99.0)), Some(2.02));
        // (532.9 - 531) / 531 * 100 = 0.35781...
        assert_eq!(percentage_change(Some(532.9), Some(531.0)), Some(0.36));
        // (100.02 - 80) / 80 * 100 lands just below 25.025.
        assert_eq!(percentage_change(Some(100.02), Some(80.0)), Some(25.02));
    }

    #[test]
    fn percentage_change_absent_inputs() {
        assert_eq!(percentage_change(None, Some(100.0)), None);
        assert_eq!(percentage_change(Some(100.0), None), None);
        assert_eq!(percentage_change(None, None), None);
    }

    #[test]
    fn percentage_change_zero_reference_is_absent() {
        assert_eq!(percentage_change(Some(100.0), Some(0.0)), None);
        assert_eq!(percentage_change(Some(0.0), Some(0.0)), None);
        assert_eq!(percentage_change(Some(100.0), Some(-0.0)), None);
    }

    #[test]
    fn percentage_change_non_finite_is_absent() {
        assert_eq!(percentage_change(Some(f64::INFINITY), Some(1.0)), None);
        assert_eq!(percentage_change(Some(f64::NAN), Some(1.0)), None);
    }

    #[test]
    fn compute_uses_first_bar_for_period_windows() {
        let bundle = SeriesBundle {
            month: series(&[(1, 100.0), (2, 104.0), (5, 108.0)]),
            quarter: series(&[(1, 80.0), (5, 108.0)]),
            year: series(&[(1, 50.0), (5, 108.0)]),
            five_day: series(&[(1, 88.0), (5, 108.0)]),
            previous_close: series(&[(1, 120.0), (2, 100.0)]),
        };
        let result = compute("XLK", d(2024, 8, 6), Some(110.0), &bundle);
        assert_eq!(result.current_price, Some(110.0));
        assert_eq!(result.mtd_pct, Some(10.0));
        assert_eq!(result.qtd_pct, Some(37.5));
        assert_eq!(result.ytd_pct, Some(120.0));
        assert_eq!(result.five_day_pct, Some(25.0));
        assert!(result.is_available());
    }

    #[test]
    fn compute_uses_last_bar_for_previous_close() {
        let bundle = SeriesBundle {
            previous_close: series(&[(1, 200.0), (2, 150.0), (5, 100.0)]),
            ..SeriesBundle::default()
        };
        let result = compute("XLE", d(2024, 8, 6), Some(105.0), &bundle);
        assert_eq!(result.today_pct, Some(5.0));
    }

    #[test]
    fn compute_empty_series_gives_absent_fields() {
        let bundle = SeriesBundle {
            month: series(&[(1, 100.0)]),
            ..SeriesBundle::default()
        };
        let result = compute("XLV", d(2024, 8, 6), Some(110.0), &bundle);
        assert_eq!(result.mtd_pct, Some(10.0));
        assert_eq!(result.today_pct, None);
        assert_eq!(result.five_day_pct, None);
        assert_eq!(result.qtd_pct, None);
        assert_eq!(result.ytd_pct, None);
    }

    #[test]
    fn compute_zero_month_start_is_absent() {
        let bundle = SeriesBundle {
            month: series(&[(1, 0.0), (2, 90.0)]),
            ..SeriesBundle::default()
        };
        let result = compute("XLU", d(2024, 8, 6), Some(100.0), &bundle);
        assert_eq!(result.mtd_pct, None);
        assert_eq!(result.current_price, Some(100.0));
    }

    #[test]
    fn compute_without_price_collapses() {
        let bundle = SeriesBundle {
            month: series(&[(1, 100.0)]),
            quarter: series(&[(1, 100.0)]),
            year: series(&[(1, 100.0)]),
            five_day: series(&[(1, 100.0)]),
            previous_close: series(&[(1, 100.0)]),
        };
        let result = compute("XLB", d(2024, 8, 6), None, &bundle);
        assert_eq!(result, AnalysisResult::unavailable("XLB", d(2024, 8, 6)));
        assert!(!result.is_available());
    }

    #[test]
    fn result_serializes_absent_as_null() {
        let result = AnalysisResult::unavailable("SPY", d(2024, 8, 6));
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["symbol"], "SPY");
        assert_eq!(json["as_of"], "2024-08-06");
        assert!(json["current_price"].is_null());
        assert!(json["ytd_pct"].is_null());
    }
}
