//! HTTP client for the EOD Historical Data REST API.

use std::time::Duration;

use serde::de::DeserializeOwned;
use url::Url;

use crate::{
    query::EodQuery,
    types::{EodBar, RealTimeQuote},
    Error,
};

/// Default request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Exchange suffix appended to every symbol unless overridden.
const DEFAULT_EXCHANGE: &str = "US";

/// HTTP client for the EOD Historical Data API.
///
/// The API token is sent as the `api_token` query parameter on every request
/// and is never written to logs.
pub struct Client {
    /// Base URL for the API. Defaults to `https://eodhd.com`.
    base_api_url: String,
    api_token: String,
    exchange: String,
    http: reqwest::Client,
}

impl Client {
    /// Creates a new client pointing at the production API.
    pub fn new(api_token: &str) -> Result<Self, Error> {
        Self::with_base_url("https://eodhd.com", api_token)
    }

    /// Creates a new client with a custom base URL. Used for testing with wiremock.
    pub fn with_base_url(base_url: &str, api_token: &str) -> Result<Self, Error> {
        Ok(Self {
            base_api_url: base_url.trim_end_matches('/').to_string(),
            api_token: api_token.to_string(),
            exchange: DEFAULT_EXCHANGE.to_string(),
            http: build_http_client(REQUEST_TIMEOUT)?,
        })
    }

    /// Replaces the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, Error> {
        self.http = build_http_client(timeout)?;
        Ok(self)
    }

    /// Sets the exchange suffix (`SPY` becomes `SPY.{exchange}`).
    pub fn with_exchange(mut self, exchange: &str) -> Self {
        self.exchange = exchange.to_string();
        self
    }

    /// Provider code for a bare ticker, e.g. `SPY` -> `SPY.US`.
    pub fn provider_code(&self, symbol: &str) -> String {
        format!("{}.{}", symbol.trim(), self.exchange)
    }

    fn get_url(&self, endpoint: &str, symbol: &str) -> Result<Url, Error> {
        let mut url = Url::parse(&self.base_api_url).map_err(|e| {
            tracing::error!("Invalid base URL {}: {}", self.base_api_url, e);
            Error::RequestFailed
        })?;
        url.path_segments_mut()
            .map_err(|_| {
                tracing::error!("Base URL cannot carry a path: {}", self.base_api_url);
                Error::RequestFailed
            })?
            .pop_if_empty()
            .extend(["api", endpoint, self.provider_code(symbol).as_str()]);
        Ok(url)
    }

    async fn get<T>(&self, url: Url) -> Result<T, Error>
    where
        T: DeserializeOwned,
    {
        tracing::debug!("GET {}", url);
        let resp = self
            .http
            .get(url)
            .query(&[("api_token", self.api_token.as_str())])
            .header("accept", "application/json")
            .send()
            .await
            .map_err(|e| {
                tracing::debug!("Failed to get resource: {}", e.without_url());
                Error::RequestFailed
            })?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| {
            tracing::debug!("Failed to read response body: {}", e.without_url());
            Error::RequestFailed
        })?;

        if !status.is_success() {
            let snippet = truncate_body(&body);
            tracing::debug!("Request failed with status {}: {}", status, snippet);
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                body: snippet,
            });
        }

        let parsed = serde_json::from_str::<T>(&body).map_err(|e| {
            let snippet = truncate_body(&body);
            tracing::debug!("Failed to parse resource: {} | body: {}", e, snippet);
            Error::RequestFailed
        })?;

        Ok(parsed)
    }

    /// Fetches the latest quote for a symbol.
    pub async fn get_real_time(&self, symbol: &str) -> Result<RealTimeQuote, Error> {
        let mut url = self.get_url("real-time", symbol)?;
        url.query_pairs_mut().append_pair("fmt", "json");
        self.get::<RealTimeQuote>(url).await
    }

    /// Fetches end-of-day bars for a symbol, oldest first.
    pub async fn get_eod(&self, symbol: &str, query: &EodQuery) -> Result<Vec<EodBar>, Error> {
        let url = query.add_to_url(&self.get_url("eod", symbol)?);
        self.get::<Vec<EodBar>>(url).await
    }
}

fn build_http_client(timeout: Duration) -> Result<reqwest::Client, Error> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| {
            tracing::error!("Failed to build HTTP client: {}", e);
            Error::RequestFailed
        })
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 500;
    if body.len() <= MAX {
        body.to_string()
    } else {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...[truncated]", &body[..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_code_appends_exchange() {
        let client = Client::new("token").unwrap();
        assert_eq!(client.provider_code("SPY"), "SPY.US");
        assert_eq!(client.provider_code(" XLK "), "XLK.US");
    }

    #[test]
    fn provider_code_custom_exchange() {
        let client = Client::new("token").unwrap().with_exchange("LSE");
        assert_eq!(client.provider_code("VOD"), "VOD.LSE");
    }

    #[test]
    fn url_has_no_token_and_tolerates_trailing_slash() {
        let client = Client::with_base_url("http://localhost:1234/", "secret").unwrap();
        let url = client.get_url("eod", "SPY").unwrap();
        assert_eq!(url.as_str(), "http://localhost:1234/api/eod/SPY.US");
        assert!(!url.as_str().contains("secret"));
    }

    #[test]
    fn truncate_short_body_unchanged() {
        assert_eq!(truncate_body("oops"), "oops");
    }

    #[test]
    fn truncate_long_body() {
        let body = "x".repeat(600);
        let out = truncate_body(&body);
        assert!(out.ends_with("...[truncated]"));
        assert_eq!(out.len(), 500 + "...[truncated]".len());
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        let body = "é".repeat(400);
        let out = truncate_body(&body);
        assert!(out.ends_with("...[truncated]"));
    }
}
