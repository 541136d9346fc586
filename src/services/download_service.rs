use std::path::Path;

use thiserror::Error;
use tracing::{info, warn};

use crate::api::yahoo::{FetchError, YahooClient};
use crate::models::DailyBar;
use crate::services::csv_service;

/// Everything that can go wrong between the button press and the saved file
#[derive(Error, Debug)]
pub enum DownloadError {
    #[error("Please select or enter a stock ticker.")]
    EmptyTicker,
    #[error("{0}")]
    Fetch(#[from] FetchError),
    #[error("No data found for {0}")]
    NoData(String),
    #[error("{0}")]
    Csv(#[from] csv::Error),
}

/// Result of a completed download, kept for the chart and notifications
#[derive(Debug, Clone)]
pub struct DownloadOutcome {
    pub symbol: String,
    pub csv_filename: String,
    pub bars: Vec<DailyBar>,
}

/// Canonical ticker form used for requests, filenames and display
pub fn normalize_symbol(raw: &str) -> String {
    raw.trim().to_uppercase()
}

pub fn csv_filename(symbol: &str) -> String {
    format!("{}_stock_data.csv", symbol)
}

/// Fetch the full daily history for a ticker and save it as CSV in `out_dir`.
///
/// The ticker is trimmed and uppercased first; an empty result aborts
/// before any network traffic.
pub async fn fetch_and_save(
    client: &YahooClient,
    raw_symbol: &str,
    out_dir: &Path,
) -> Result<DownloadOutcome, DownloadError> {
    let symbol = normalize_symbol(raw_symbol);
    if symbol.is_empty() {
        return Err(DownloadError::EmptyTicker);
    }

    info!("Fetching full price history for {}", symbol);
    let bars = client.daily_history(&symbol).await?;
    if bars.is_empty() {
        warn!("Provider returned no usable rows for {}", symbol);
        return Err(DownloadError::NoData(symbol));
    }

    let filename = csv_filename(&symbol);
    let path = out_dir.join(&filename);
    csv_service::write_history(&path, &bars)?;
    info!("Saved {} rows for {} to {}", bars.len(), symbol, path.display());

    Ok(DownloadOutcome {
        symbol,
        csv_filename: filename,
        bars,
    })
}
