//! CLI subcommand implementations.

pub mod analyze;
pub mod chart;
pub mod dashboard;
pub mod sectors;
pub mod signals;

use anyhow::{Context, Result};
use bbands_lib::{DashboardConfig, Workbook};

/// Loads the workbook named by the resolved configuration.
pub(crate) fn load_workbook(config: &DashboardConfig) -> Result<Workbook> {
    let path = config.require_workbook()?;
    Workbook::load(path).with_context(|| format!("Failed to load workbook {}", path.display()))
}
