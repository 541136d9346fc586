//! Historical price data models

use chrono::NaiveDate;

/// A single daily OHLCV observation for a ticker
#[derive(Debug, Clone, PartialEq)]
pub struct DailyBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}
