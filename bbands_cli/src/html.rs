//! Static HTML rendering of the sector dashboard.
//!
//! The page has the prioritized signal table with highlighted band cells,
//! the chart for the selected ticker, and its price-change panel. Markup is
//! written through `quick_xml`, which escapes every text node and attribute.

use std::io::Write;

use anyhow::Result;
use bbands_lib::workbook::{BAND_COLUMNS, SYMBOL_COLUMN};
use bbands_lib::{chart, highlight_style, AnalysisResult, TickerRow};
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::output::{format_pct, format_price, unavailable_message};

const PAGE_STYLE: &str = "
body { font-family: sans-serif; background: #0e1117; color: #fafafa; margin: 2rem; }
table { border-collapse: collapse; margin-bottom: 2rem; }
th, td { border: 1px solid #31333f; padding: 0.3rem 0.6rem; text-align: left; }
.layout { display: flex; gap: 2rem; }
.chart { flex: 3; }
.metrics { flex: 1; }
";

fn start<W: Write>(writer: &mut Writer<W>, tag: &str, attrs: &[(&str, &str)]) -> Result<()> {
    let elem = BytesStart::new(tag).with_attributes(attrs.iter().copied());
    writer.write_event(Event::Start(elem))?;
    Ok(())
}

fn end<W: Write>(writer: &mut Writer<W>, tag: &str) -> Result<()> {
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

fn text<W: Write>(writer: &mut Writer<W>, content: &str) -> Result<()> {
    writer.write_event(Event::Text(BytesText::new(content)))?;
    Ok(())
}

/// `<tag attrs>content</tag>` with `content` escaped.
fn text_element<W: Write>(
    writer: &mut Writer<W>,
    tag: &str,
    attrs: &[(&str, &str)],
    content: &str,
) -> Result<()> {
    start(writer, tag, attrs)?;
    text(writer, content)?;
    end(writer, tag)
}

fn write_signal_table<W: Write>(writer: &mut Writer<W>, rows: &[TickerRow]) -> Result<()> {
    let extra_headers: Vec<&str> = rows
        .first()
        .map(|row| row.extra.iter().map(|(h, _)| h.as_str()).collect())
        .unwrap_or_default();

    start(writer, "table", &[])?;
    start(writer, "tr", &[])?;
    text_element(writer, "th", &[], SYMBOL_COLUMN)?;
    for header in BAND_COLUMNS {
        text_element(writer, "th", &[], header)?;
    }
    for header in &extra_headers {
        text_element(writer, "th", &[], header)?;
    }
    end(writer, "tr")?;

    for row in rows {
        start(writer, "tr", &[])?;
        text_element(writer, "td", &[], &row.symbol)?;
        for band in row.bands() {
            let style = highlight_style(band);
            if style.is_empty() {
                text_element(writer, "td", &[], band.as_str())?;
            } else {
                text_element(writer, "td", &[("style", style)], band.as_str())?;
            }
        }
        for header in &extra_headers {
            let value = row
                .extra
                .iter()
                .find(|(h, _)| h.as_str() == *header)
                .map(|(_, v)| v.as_str())
                .unwrap_or("");
            text_element(writer, "td", &[], value)?;
        }
        end(writer, "tr")?;
    }
    end(writer, "table")
}

fn write_chart<W: Write>(writer: &mut Writer<W>, symbol: &str) -> Result<()> {
    let url = chart::widget_url(symbol);
    let height = chart::CHART_HEIGHT.to_string();
    start(writer, "div", &[("class", "chart")])?;
    start(
        writer,
        "iframe",
        &[
            ("src", url.as_str()),
            ("width", "100%"),
            ("height", height.as_str()),
            ("frameborder", "0"),
            ("allowfullscreen", ""),
        ],
    )?;
    end(writer, "iframe")?;
    end(writer, "div")
}

fn write_metrics<W: Write>(writer: &mut Writer<W>, result: &AnalysisResult) -> Result<()> {
    start(writer, "div", &[("class", "metrics")])?;
    if result.is_available() {
        text_element(writer, "h2", &[], &result.symbol)?;
        let lines = [
            ("Current Price:", format_price(result.current_price)),
            ("Today:", format_pct(result.today_pct)),
            ("5-Day:", format_pct(result.five_day_pct)),
            ("MTD:", format_pct(result.mtd_pct)),
            ("QTD:", format_pct(result.qtd_pct)),
            ("YTD:", format_pct(result.ytd_pct)),
        ];
        for (label, value) in lines {
            start(writer, "p", &[])?;
            text_element(writer, "strong", &[], label)?;
            text(writer, &format!(" {}", value))?;
            end(writer, "p")?;
        }
    } else {
        text_element(writer, "p", &[], &unavailable_message(&result.symbol))?;
    }
    end(writer, "div")
}

/// Renders the full dashboard page for one sector and one analyzed ticker.
pub fn render_dashboard(sector: &str, rows: &[TickerRow], result: &AnalysisResult) -> Result<String> {
    let title = format!("{} - Bollinger Bands Analysis", sector);
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    writer.write_event(Event::DocType(BytesText::from_escaped("html")))?;
    start(&mut writer, "html", &[])?;

    start(&mut writer, "head", &[])?;
    writer.write_event(Event::Empty(
        BytesStart::new("meta").with_attributes([("charset", "utf-8")]),
    ))?;
    text_element(&mut writer, "title", &[], &title)?;
    start(&mut writer, "style", &[])?;
    // Constant stylesheet; `<style>` content is raw text in HTML.
    writer.write_event(Event::Text(BytesText::from_escaped(PAGE_STYLE)))?;
    end(&mut writer, "style")?;
    end(&mut writer, "head")?;

    start(&mut writer, "body", &[])?;
    text_element(&mut writer, "h1", &[], &title)?;
    text_element(&mut writer, "p", &[], &format!("As of {}", result.as_of))?;

    write_signal_table(&mut writer, rows)?;

    start(&mut writer, "div", &[("class", "layout")])?;
    write_chart(&mut writer, &result.symbol)?;
    write_metrics(&mut writer, result)?;
    end(&mut writer, "div")?;

    end(&mut writer, "body")?;
    end(&mut writer, "html")?;

    let mut page = String::from_utf8(writer.into_inner())?;
    page.push('\n');
    Ok(page)
}
