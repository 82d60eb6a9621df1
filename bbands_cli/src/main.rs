mod commands;
mod html;
mod output;

use std::path::PathBuf;

use anyhow::{Context, Result};
use bbands_lib::DashboardConfig;
use clap::{Parser, Subcommand};

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "bbands")]
#[command(about = "Bollinger-Band signal dashboard for sector ETFs")]
struct Cli {
    /// Output format: table, json, csv, or markdown
    #[arg(long, default_value = "table", global = true)]
    output: String,

    /// TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Sector workbook: an .xlsx/.xls/.ods file or a directory of CSV sheets
    #[arg(long, global = true)]
    workbook: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List sectors in the workbook
    Sectors,
    /// Show the prioritized band signals of a sector
    Signals(commands::signals::SignalsArgs),
    /// Fetch live price changes for one or more tickers
    Analyze(commands::analyze::AnalyzeArgs),
    /// Print the chart embed for a ticker
    Chart(commands::chart::ChartArgs),
    /// Write a static HTML dashboard for a sector
    Dashboard(commands::dashboard::DashboardArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("bbands=info".parse()?)
                .add_directive("eodhd_api=warn".parse()?),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let format = match cli.output.as_str() {
        "json" => OutputFormat::Json,
        "csv" => OutputFormat::Csv,
        "markdown" | "md" => OutputFormat::Markdown,
        _ => OutputFormat::Table,
    };

    let config = load_config(&cli)?;

    match &cli.command {
        Commands::Sectors => commands::sectors::run(&config, &format)?,
        Commands::Signals(args) => commands::signals::run(args, &config, &format)?,
        Commands::Analyze(args) => commands::analyze::run(args, &config, &format).await?,
        Commands::Chart(args) => commands::chart::run(args, &format)?,
        Commands::Dashboard(args) => commands::dashboard::run(args, &config).await?,
    }

    Ok(())
}

/// Defaults, then the config file, then the environment, then flags.
fn load_config(cli: &Cli) -> Result<DashboardConfig> {
    let config = match &cli.config {
        Some(path) => DashboardConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => DashboardConfig::default(),
    };
    let mut config = config.with_env();
    if let Some(workbook) = &cli.workbook {
        config.workbook = Some(workbook.clone());
    }
    config.validate()?;
    Ok(config)
}
