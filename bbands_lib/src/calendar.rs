//! Business-day arithmetic and the date windows used by an analysis.
//!
//! Business days are Monday through Friday. Exchange holidays are not
//! modelled; the provider simply returns no bar for them.

use chrono::{Datelike, Days, Months, NaiveDate, Weekday};

/// Business days covered by the short-term windows.
pub const FIVE_DAY_SPAN: u32 = 5;

/// An inclusive date range sent to the history endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateWindow {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Self {
        Self { from, to }
    }
}

/// The five history windows fetched for one analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisWindows {
    pub month: DateWindow,
    pub quarter: DateWindow,
    pub year: DateWindow,
    pub five_day: DateWindow,
    pub previous_close: DateWindow,
}

impl AnalysisWindows {
    /// Computes every window relative to `today`.
    pub fn for_date(today: NaiveDate) -> Self {
        Self {
            month: DateWindow::new(month_start(today), today),
            quarter: DateWindow::new(quarter_start(today), today),
            year: DateWindow::new(year_start(today), today),
            five_day: DateWindow::new(sub_business_days(today, FIVE_DAY_SPAN), today),
            previous_close: previous_close_window(today),
        }
    }
}

pub fn is_business_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Steps back `n` business days from `date`.
///
/// Each step moves to the previous weekday, so a weekend date first rolls
/// back to Friday: `Saturday - 1` is Friday and `Monday - 1` is the Friday
/// before it.
pub fn sub_business_days(date: NaiveDate, n: u32) -> NaiveDate {
    let mut current = date;
    let mut remaining = n;
    while remaining > 0 {
        match current.pred_opt() {
            Some(prev) => current = prev,
            None => break,
        }
        if is_business_day(current) {
            remaining -= 1;
        }
    }
    current
}

/// The window whose last bar is the previous close: the five business days
/// ending one business day before `today`.
pub fn previous_close_window(today: NaiveDate) -> DateWindow {
    let end = sub_business_days(today, 1);
    DateWindow::new(sub_business_days(end, FIVE_DAY_SPAN), end)
}

pub fn month_start(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.day0()))
}

/// First day of the calendar quarter (Jan, Apr, Jul, Oct) containing `date`.
///
/// On a quarter's first day this is `date` itself. It does not roll back to
/// the previous quarter the way an offset-subtracting calendar would.
pub fn quarter_start(date: NaiveDate) -> NaiveDate {
    month_start(date) - Months::new(date.month0() % 3)
}

pub fn year_start(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.ordinal0()))
}
