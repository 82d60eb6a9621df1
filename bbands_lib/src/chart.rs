//! Embeddable TradingView chart for a ticker.
//!
//! The widget shows daily candles on a dark theme with a 20-period,
//! 2-sigma Bollinger Bands study so the chart matches the sheet signals.

/// Height of the embedded chart in pixels.
pub const CHART_HEIGHT: u32 = 600;

const WIDGET_BASE: &str = "https://s.tradingview.com/widgetembed/";

/// URL-encoded `[{"id":"BB@tv-basicstudies","inputs":[20,2]}]`.
const BOLLINGER_STUDY: &str =
    "[%7B%22id%22%3A%22BB%40tv-basicstudies%22%2C%22inputs%22%3A%5B20%2C2%5D%7D]";

/// Keeps only characters that are valid in an exchange ticker.
fn sanitize_symbol(symbol: &str) -> String {
    symbol
        .trim()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | ':' | '_'))
        .collect()
}

/// Widget URL for `symbol`.
pub fn widget_url(symbol: &str) -> String {
    let symbol = sanitize_symbol(symbol);
    format!(
        "{base}?frameElementId=tradingview_c2a09&symbol={symbol}&interval=D\
         &hidesidetoolbar=1&symboledit=1&saveimage=1&toolbarbg=f1f3f6\
         &studies={studies}&theme=Dark&style=1&timezone=exchange&withdateranges=1\
         &hideideas=1&studies_overrides={{}}&overrides={{}}&enabled_features=[]\
         &disabled_features=[]&locale=en&utm_source=www.tradingview.com\
         &utm_medium=widget&utm_campaign=chart&utm_term={symbol}",
        base = WIDGET_BASE,
        symbol = symbol,
        studies = BOLLINGER_STUDY,
    )
}

/// `<iframe>` markup embedding the chart for `symbol`.
pub fn tradingview_embed(symbol: &str) -> String {
    format!(
        r#"<iframe src="{}" width="100%" height="{}" frameborder="0" allowfullscreen></iframe>"#,
        widget_url(symbol).replace('&', "&amp;"),
        CHART_HEIGHT
    )
}
