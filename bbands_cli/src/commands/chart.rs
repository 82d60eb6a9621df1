use anyhow::{bail, Result};
use bbands_lib::chart;
use clap::Args;
use serde::Serialize;

use crate::output::{print_json, OutputFormat};

#[derive(Args)]
pub struct ChartArgs {
    /// Ticker symbol (e.g. XLK, AMEX:SPY)
    pub symbol: String,
}

#[derive(Serialize)]
struct ChartEmbed {
    symbol: String,
    url: String,
    html: String,
}

pub fn run(args: &ChartArgs, format: &OutputFormat) -> Result<()> {
    let symbol = args.symbol.trim();
    if symbol.is_empty() {
        bail!("Symbol must not be empty");
    }
    match format {
        OutputFormat::Json => print_json(&ChartEmbed {
            symbol: symbol.to_string(),
            url: chart::widget_url(symbol),
            html: chart::tradingview_embed(symbol),
        }),
        _ => println!("{}", chart::tradingview_embed(symbol)),
    }
    Ok(())
}
