use std::collections::BTreeMap;

use anyhow::Result;
use bbands_lib::workbook::{BAND_COLUMNS, SYMBOL_COLUMN};
use bbands_lib::{AnalysisResult, Band, TickerRow, Workbook};
use serde::Serialize;
use tabled::builder::Builder;
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Clone, Debug)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
    Markdown,
}

#[derive(Tabled, Serialize)]
struct SectorRow {
    #[tabled(rename = "Sector")]
    #[serde(rename = "Sector")]
    sector: String,
    #[tabled(rename = "Tickers")]
    #[serde(rename = "Tickers")]
    tickers: usize,
    #[tabled(rename = "Top Ticker")]
    #[serde(rename = "Top Ticker")]
    top_ticker: String,
}

#[derive(Tabled, Serialize)]
struct AnalysisRow {
    #[tabled(rename = "Symbol")]
    #[serde(rename = "Symbol")]
    symbol: String,
    #[tabled(rename = "Price")]
    #[serde(rename = "Price")]
    price: String,
    #[tabled(rename = "Today")]
    #[serde(rename = "Today")]
    today: String,
    #[tabled(rename = "5-Day")]
    #[serde(rename = "5-Day")]
    five_day: String,
    #[tabled(rename = "MTD")]
    #[serde(rename = "MTD")]
    mtd: String,
    #[tabled(rename = "QTD")]
    #[serde(rename = "QTD")]
    qtd: String,
    #[tabled(rename = "YTD")]
    #[serde(rename = "YTD")]
    ytd: String,
}

/// JSON shape of one signal row. Extra sheet columns are nested.
#[derive(Serialize)]
struct SignalRecord<'a> {
    symbol: &'a str,
    daily: &'a Band,
    weekly: &'a Band,
    monthly: &'a Band,
    priority: u8,
    extra: BTreeMap<&'a str, &'a str>,
}

// -- Row builders --

fn build_sector_rows(workbook: &Workbook) -> Vec<SectorRow> {
    workbook
        .sectors()
        .map(|name| {
            let rows = workbook.sector(name).unwrap_or_default();
            let top_ticker = rows
                .iter()
                .min_by_key(|row| row.priority())
                .map(|row| row.symbol.clone())
                .unwrap_or_default();
            SectorRow {
                sector: name.to_string(),
                tickers: rows.len(),
                top_ticker,
            }
        })
        .collect()
}

fn build_analysis_rows(results: &[AnalysisResult]) -> Vec<AnalysisRow> {
    results
        .iter()
        .map(|r| AnalysisRow {
            symbol: r.symbol.clone(),
            price: format_price(r.current_price),
            today: format_pct(r.today_pct),
            five_day: format_pct(r.five_day_pct),
            mtd: format_pct(r.mtd_pct),
            qtd: format_pct(r.qtd_pct),
            ytd: format_pct(r.ytd_pct),
        })
        .collect()
}

/// Headers and cells for prioritized signal rows. Band columns come first,
/// then any extra sheet columns, then the computed priority.
fn build_signal_grid(rows: &[TickerRow]) -> (Vec<String>, Vec<Vec<String>>) {
    let extra_headers: Vec<&str> = rows
        .first()
        .map(|row| row.extra.iter().map(|(h, _)| h.as_str()).collect())
        .unwrap_or_default();

    let mut headers = vec![SYMBOL_COLUMN.to_string()];
    headers.extend(BAND_COLUMNS.iter().map(|c| c.to_string()));
    headers.extend(extra_headers.iter().map(|h| h.to_string()));
    headers.push("Priority".to_string());

    let records = rows
        .iter()
        .map(|row| {
            let mut record = vec![row.symbol.clone()];
            record.extend(row.bands().iter().map(|band| band.to_string()));
            for header in &extra_headers {
                let value = row
                    .extra
                    .iter()
                    .find(|(h, _)| h.as_str() == *header)
                    .map(|(_, v)| v.clone())
                    .unwrap_or_default();
                record.push(value);
            }
            record.push(row.priority().to_string());
            record
        })
        .collect();

    (headers, records)
}

fn signal_table(rows: &[TickerRow]) -> Table {
    let (headers, records) = build_signal_grid(rows);
    let mut builder = Builder::default();
    builder.push_record(headers);
    for record in records {
        builder.push_record(record);
    }
    builder.build()
}

// -- Table output --

pub fn print_sectors_table(workbook: &Workbook) {
    println!("{}", Table::new(build_sector_rows(workbook)));
}

pub fn print_signals_table(rows: &[TickerRow]) {
    println!("{}", signal_table(rows));
}

pub fn print_analysis_table(results: &[AnalysisResult]) {
    println!("{}", Table::new(build_analysis_rows(results)));
}

// -- Markdown output --

pub fn print_sectors_markdown(workbook: &Workbook) {
    let mut table = Table::new(build_sector_rows(workbook));
    table.with(Style::markdown());
    println!("{}", table);
}

pub fn print_signals_markdown(rows: &[TickerRow]) {
    let mut table = signal_table(rows);
    table.with(Style::markdown());
    println!("{}", table);
}

pub fn print_analysis_markdown(results: &[AnalysisResult]) {
    let mut table = Table::new(build_analysis_rows(results));
    table.with(Style::markdown());
    println!("{}", table);
}

// -- CSV output --

pub fn print_sectors_csv(workbook: &Workbook) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(std::io::stdout());
    for row in build_sector_rows(workbook) {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn print_signals_csv(rows: &[TickerRow]) -> Result<()> {
    let (headers, records) = build_signal_grid(rows);
    let mut wtr = csv::Writer::from_writer(std::io::stdout());
    wtr.write_record(&headers)?;
    for record in records {
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn print_analysis_csv(results: &[AnalysisResult]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(std::io::stdout());
    for row in build_analysis_rows(results) {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

// -- JSON output --

pub fn print_sectors_json(workbook: &Workbook) {
    print_json(&build_sector_rows(workbook));
}

pub fn print_signals_json(rows: &[TickerRow]) {
    let records: Vec<SignalRecord<'_>> = rows
        .iter()
        .map(|row| SignalRecord {
            symbol: &row.symbol,
            daily: &row.daily,
            weekly: &row.weekly,
            monthly: &row.monthly,
            priority: row.priority(),
            extra: row
                .extra
                .iter()
                .map(|(h, v)| (h.as_str(), v.as_str()))
                .collect(),
        })
        .collect();
    print_json(&records);
}

pub fn print_json<T: serde::Serialize>(data: &T) {
    match serde_json::to_string_pretty(data) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize to JSON: {}", e),
    }
}

/// Message shown when no current price could be fetched.
pub fn unavailable_message(symbol: &str) -> String {
    format!("Could not fetch data for {}. Please try again later.", symbol)
}

pub fn format_price(price: Option<f64>) -> String {
    match price {
        Some(p) => format!("{:.2}", p),
        None => "-".to_string(),
    }
}

pub fn format_pct(pct: Option<f64>) -> String {
    match pct {
        Some(p) => format!("{:.2}%", p),
        None => "-".to_string(),
    }
}
