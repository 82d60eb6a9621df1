use anyhow::Result;
use bbands_lib::DashboardConfig;

use crate::output::{
    print_sectors_csv, print_sectors_json, print_sectors_markdown, print_sectors_table,
    OutputFormat,
};

pub fn run(config: &DashboardConfig, format: &OutputFormat) -> Result<()> {
    let workbook = super::load_workbook(config)?;
    match format {
        OutputFormat::Table => print_sectors_table(&workbook),
        OutputFormat::Json => print_sectors_json(&workbook),
        OutputFormat::Csv => print_sectors_csv(&workbook)?,
        OutputFormat::Markdown => print_sectors_markdown(&workbook),
    }
    Ok(())
}
