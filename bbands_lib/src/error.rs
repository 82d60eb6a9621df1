//! Error types for the library layer.

use std::fmt;

use crate::config::ConfigError;
use crate::workbook::WorkbookError;

/// Errors produced by the library layer when setting up a dashboard.
///
/// Fetch failures during an analysis never reach this type; the quote
/// client absorbs them into absent values.
#[derive(Debug)]
pub enum DashboardError {
    /// The provider client could not be constructed.
    Api(eodhd_api::Error),
    /// Configuration was missing or invalid.
    Config(ConfigError),
    /// The signal workbook could not be loaded.
    Workbook(WorkbookError),
}

impl fmt::Display for DashboardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Api(e) => write!(f, "API error: {}", e),
            Self::Config(e) => write!(f, "Config error: {}", e),
            Self::Workbook(e) => write!(f, "Workbook error: {}", e),
        }
    }
}

impl std::error::Error for DashboardError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Api(e) => Some(e),
            Self::Config(e) => Some(e),
            Self::Workbook(e) => Some(e),
        }
    }
}

impl From<eodhd_api::Error> for DashboardError {
    fn from(e: eodhd_api::Error) -> Self {
        Self::Api(e)
    }
}

impl From<ConfigError> for DashboardError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<WorkbookError> for DashboardError {
    fn from(e: WorkbookError) -> Self {
        Self::Workbook(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn display_prefixes_category() {
        let err = DashboardError::from(ConfigError::MissingApiToken);
        assert!(err.to_string().starts_with("Config error: No API token"));

        let err = DashboardError::from(eodhd_api::Error::RequestFailed);
        assert_eq!(err.to_string(), "API error: Request failed");
    }

    #[test]
    fn source_chains_to_inner_error() {
        let err = DashboardError::from(WorkbookError::UnknownSector("Metals".to_string()));
        assert!(err.source().is_some());
        assert!(err.to_string().contains("Unknown sector: Metals"));
    }
}
