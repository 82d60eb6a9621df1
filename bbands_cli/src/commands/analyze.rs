use anyhow::{bail, Result};
use bbands_lib::{AnalysisResult, Analyzer, DashboardConfig};
use chrono::NaiveDate;
use clap::Args;

use crate::output::{
    print_analysis_csv, print_analysis_markdown, print_analysis_table, print_json,
    unavailable_message, OutputFormat,
};

#[derive(Args)]
pub struct AnalyzeArgs {
    /// Ticker symbols (e.g. XLK XLE)
    #[arg(required = true, num_args = 1..)]
    pub symbols: Vec<String>,

    /// Analyze as of this date (YYYY-MM-DD) instead of today
    #[arg(long)]
    pub as_of: Option<String>,
}

pub async fn run(args: &AnalyzeArgs, config: &DashboardConfig, format: &OutputFormat) -> Result<()> {
    let symbols = normalize_symbols(&args.symbols)?;
    let as_of = args.as_of.as_deref().map(parse_date).transpose()?;

    let analyzer = Analyzer::from_config(config)?;
    let results = match (symbols.as_slice(), as_of) {
        ([symbol], Some(date)) => vec![analyzer.analyze_as_of(symbol, date).await],
        ([symbol], None) => vec![analyzer.analyze(symbol).await],
        (_, Some(date)) => analyzer.analyze_many_as_of(&symbols, date).await,
        (_, None) => analyzer.analyze_many(&symbols).await,
    };

    match format {
        OutputFormat::Json => print_json(&results),
        OutputFormat::Csv => print_analysis_csv(&results)?,
        OutputFormat::Table | OutputFormat::Markdown => {
            let (available, missing): (Vec<AnalysisResult>, Vec<AnalysisResult>) =
                results.into_iter().partition(AnalysisResult::is_available);
            for result in &missing {
                eprintln!("{}", unavailable_message(&result.symbol));
            }
            if !available.is_empty() {
                if matches!(format, OutputFormat::Markdown) {
                    print_analysis_markdown(&available);
                } else {
                    print_analysis_table(&available);
                }
            }
        }
    }
    Ok(())
}

/// Trims and upper-cases symbols, dropping duplicates but keeping order.
fn normalize_symbols(raw: &[String]) -> Result<Vec<String>> {
    let mut symbols: Vec<String> = Vec::with_capacity(raw.len());
    for symbol in raw {
        let symbol = symbol.trim().to_ascii_uppercase();
        if symbol.is_empty() {
            bail!("Symbols must not be empty");
        }
        if !symbols.contains(&symbol) {
            symbols.push(symbol);
        }
    }
    Ok(symbols)
}

pub(crate) fn parse_date(value: &str) -> Result<NaiveDate> {
    match NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d") {
        Ok(date) => Ok(date),
        Err(_) => bail!("Invalid date '{}': expected YYYY-MM-DD", value),
    }
}
