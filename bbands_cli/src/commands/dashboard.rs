use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use bbands_lib::{prioritize, Analyzer, DashboardConfig};
use clap::Args;

use super::analyze::parse_date;
use crate::html;

#[derive(Args)]
pub struct DashboardArgs {
    /// Sector sheet name (case-insensitive)
    #[arg(long)]
    pub sector: String,

    /// Ticker to chart and analyze (defaults to the top-ranked ticker)
    #[arg(long)]
    pub ticker: Option<String>,

    /// Output HTML file
    #[arg(long)]
    pub out: PathBuf,

    /// Analyze as of this date (YYYY-MM-DD) instead of today
    #[arg(long)]
    pub as_of: Option<String>,
}

pub async fn run(args: &DashboardArgs, config: &DashboardConfig) -> Result<()> {
    let as_of = args.as_of.as_deref().map(parse_date).transpose()?;
    let workbook = super::load_workbook(config)?;
    let rows = prioritize(workbook.sector(&args.sector)?.to_vec());
    if rows.is_empty() {
        bail!("Sector '{}' has no tickers", args.sector);
    }

    let selected = match &args.ticker {
        Some(ticker) => rows
            .iter()
            .find(|row| row.symbol.eq_ignore_ascii_case(ticker.trim()))
            .map(|row| row.symbol.clone())
            .ok_or_else(|| anyhow!("Ticker '{}' is not in sector '{}'", ticker, args.sector))?,
        None => rows[0].symbol.clone(),
    };

    let analyzer = Analyzer::from_config(config)?;
    let result = match as_of {
        Some(date) => analyzer.analyze_as_of(&selected, date).await,
        None => analyzer.analyze(&selected).await,
    };

    let page = html::render_dashboard(&args.sector, &rows, &result)?;
    std::fs::write(&args.out, page)
        .with_context(|| format!("Failed to write {}", args.out.display()))?;
    eprintln!("Wrote dashboard for {} to {}", selected, args.out.display());
    Ok(())
}
