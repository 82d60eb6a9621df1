use anyhow::Result;
use bbands_lib::{prioritize, DashboardConfig};
use clap::Args;

use crate::output::{
    print_signals_csv, print_signals_json, print_signals_markdown, print_signals_table,
    OutputFormat,
};

#[derive(Args)]
pub struct SignalsArgs {
    /// Sector sheet name (case-insensitive)
    #[arg(long)]
    pub sector: String,
}

pub fn run(args: &SignalsArgs, config: &DashboardConfig, format: &OutputFormat) -> Result<()> {
    let workbook = super::load_workbook(config)?;
    let rows = prioritize(workbook.sector(&args.sector)?.to_vec());

    eprintln!("{} - Bollinger Bands Analysis ({} tickers)", args.sector, rows.len());
    match format {
        OutputFormat::Table => print_signals_table(&rows),
        OutputFormat::Json => print_signals_json(&rows),
        OutputFormat::Csv => print_signals_csv(&rows)?,
        OutputFormat::Markdown => print_signals_markdown(&rows),
    }
    Ok(())
}
