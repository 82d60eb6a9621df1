//! Bollinger-Band crossing signals and the prioritized signal table.
//!
//! Each ticker row carries three crossing indicators (daily, weekly,
//! monthly). A row's priority is its strongest indicator, and the table is
//! ordered so that rows touching the upper 2-sigma band come first.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

/// Priority given to cell text outside the known band values.
///
/// It ranks below every known value, so such rows sort to the bottom of
/// their sheet instead of failing the whole table.
pub const UNRECOGNIZED_PRIORITY: u8 = 6;

/// Position of the price relative to the Bollinger envelope.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Band {
    /// Crossed the upper band at two standard deviations.
    UBand2Std,
    /// Crossed the upper band at one standard deviation.
    UBand1Std,
    /// Inside one standard deviation of the mean.
    MidZone,
    /// Crossed the lower band at one standard deviation.
    LBand1Std,
    /// Crossed the lower band at two standard deviations.
    LBand2Std,
    /// Cell text that is not one of the known values (kept verbatim, trimmed).
    Unrecognized(String),
}

impl Band {
    pub const KNOWN: [Band; 5] = [
        Band::UBand2Std,
        Band::UBand1Std,
        Band::MidZone,
        Band::LBand1Std,
        Band::LBand2Std,
    ];

    /// Parses sheet cell text. Never fails; unknown text becomes
    /// [`Band::Unrecognized`].
    pub fn parse(text: &str) -> Band {
        match text.trim() {
            "UBand 2STD" => Band::UBand2Std,
            "UBand 1STD" => Band::UBand1Std,
            "Mid Zone" => Band::MidZone,
            "LBand 1STD" => Band::LBand1Std,
            "LBand 2STD" => Band::LBand2Std,
            other => Band::Unrecognized(other.to_string()),
        }
    }

    /// The text used for this band in the sector sheets.
    pub fn as_str(&self) -> &str {
        match self {
            Band::UBand2Std => "UBand 2STD",
            Band::UBand1Std => "UBand 1STD",
            Band::MidZone => "Mid Zone",
            Band::LBand1Std => "LBand 1STD",
            Band::LBand2Std => "LBand 2STD",
            Band::Unrecognized(text) => text,
        }
    }

    /// Sort rank, 1 being the strongest signal.
    pub fn priority(&self) -> u8 {
        match self {
            Band::UBand2Std => 1,
            Band::UBand1Std => 2,
            Band::LBand1Std => 3,
            Band::LBand2Std => 4,
            Band::MidZone => 5,
            Band::Unrecognized(_) => UNRECOGNIZED_PRIORITY,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Band::Unrecognized(_))
    }
}

impl FromStr for Band {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Band::parse(s))
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Band {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// CSS declarations used to highlight a band cell. Mid Zone and
/// unrecognized values get no highlight.
pub fn highlight_style(band: &Band) -> &'static str {
    match band {
        Band::LBand1Std => "background-color: lightcoral",
        Band::LBand2Std => "background-color: red",
        Band::UBand1Std => "color: black; background-color: lightgreen",
        Band::UBand2Std => "background-color: green",
        Band::MidZone | Band::Unrecognized(_) => "",
    }
}

/// One row of a sector sheet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickerRow {
    pub symbol: String,
    pub daily: Band,
    pub weekly: Band,
    pub monthly: Band,
    /// Remaining sheet columns as `(header, value)`, in sheet order.
    #[serde(skip)]
    pub extra: Vec<(String, String)>,
}

impl TickerRow {
    pub fn new(symbol: &str, daily: Band, weekly: Band, monthly: Band) -> Self {
        Self {
            symbol: symbol.to_string(),
            daily,
            weekly,
            monthly,
            extra: Vec::new(),
        }
    }

    pub fn bands(&self) -> [&Band; 3] {
        [&self.daily, &self.weekly, &self.monthly]
    }

    /// The strongest (lowest) priority among the three indicators.
    pub fn priority(&self) -> u8 {
        self.bands()
            .iter()
            .map(|band| band.priority())
            .min()
            .unwrap_or(UNRECOGNIZED_PRIORITY)
    }
}

/// Orders rows by ascending priority. The sort is stable, so rows of equal
/// priority keep their sheet order.
pub fn prioritize(mut rows: Vec<TickerRow>) -> Vec<TickerRow> {
    for row in &rows {
        for band in row.bands() {
            if let Band::Unrecognized(text) = band {
                tracing::warn!(
                    "{}: unrecognized band value '{}' ranks last",
                    row.symbol,
                    text
                );
            }
        }
    }
    rows.sort_by_key(TickerRow::priority);
    rows
}
