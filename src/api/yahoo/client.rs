use reqwest::Client as HttpClient;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use super::models::ChartResponse;
use crate::models::DailyBar;

/// Errors from the market data endpoint
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection, timeout, or any other transport-level failure
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// Body that does not match the chart payload schema
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),
}

/// Yahoo Finance chart API client
pub struct YahooClient {
    http_client: HttpClient,
    base_url: String,
}

impl YahooClient {
    const DEFAULT_BASE_URL: &'static str = "https://query2.finance.yahoo.com";
    // Yahoo rejects requests that carry no browser user agent
    const USER_AGENT: &'static str =
        "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36";
    const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

    /// Create a client against the default endpoint.
    ///
    /// `STOCKDL_BASE_URL` overrides the endpoint when set.
    pub fn new() -> Self {
        let base_url = std::env::var("STOCKDL_BASE_URL")
            .unwrap_or_else(|_| Self::DEFAULT_BASE_URL.to_string());
        Self::with_base_url(base_url)
    }

    /// Create a client with a custom base URL (for testing)
    pub fn with_base_url(base_url: String) -> Self {
        let http_client = HttpClient::builder()
            .user_agent(Self::USER_AGENT)
            .timeout(Self::REQUEST_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http_client,
            base_url,
        }
    }

    /// GET /v8/finance/chart/{symbol}
    ///
    /// Retrieves the maximum available daily OHLCV history for a symbol.
    ///
    /// # Returns
    /// * `Ok(Vec<DailyBar>)` - Chronological daily bars; empty when the
    ///   provider has no data for the symbol
    /// * `Err(FetchError)` - Transport failure or unusable response body
    pub async fn daily_history(&self, symbol: &str) -> Result<Vec<DailyBar>, FetchError> {
        let url = format!(
            "{}/v8/finance/chart/{}?range=max&interval=1d",
            self.base_url, symbol
        );
        debug!("GET {}", url);

        let response = self.http_client.get(&url).send().await?;
        let status = response.status();

        // Unknown symbols come back as an HTTP error with a JSON error body;
        // that still decodes below and flattens to an empty series.
        let payload = response
            .json::<ChartResponse>()
            .await
            .map_err(|e| FetchError::UnexpectedResponse(format!("{} (HTTP {})", e, status)))?;

        let bars = payload.into_daily_bars();
        debug!("{}: {} daily bars", symbol, bars.len());
        Ok(bars)
    }
}

impl Default for YahooClient {
    fn default() -> Self {
        Self::new()
    }
}
