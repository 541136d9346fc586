use serde::{Deserialize, Serialize};

use crate::models::DailyBar;

/// Top-level payload of the v8 chart endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartResponse {
    pub chart: Chart,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chart {
    pub result: Option<Vec<ChartResult>>,
    pub error: Option<ChartError>,
}

/// Error body sent for unknown or delisted symbols
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartError {
    pub code: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartResult {
    #[serde(default)]
    pub timestamp: Vec<i64>,
    pub indicators: Indicators,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Indicators {
    #[serde(default)]
    pub quote: Vec<QuoteBlock>,
}

/// Parallel per-day arrays; entries are null on days the symbol did not trade
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteBlock {
    #[serde(default)]
    pub open: Vec<Option<f64>>,
    #[serde(default)]
    pub high: Vec<Option<f64>>,
    #[serde(default)]
    pub low: Vec<Option<f64>>,
    #[serde(default)]
    pub close: Vec<Option<f64>>,
    #[serde(default)]
    pub volume: Vec<Option<u64>>,
}

impl ChartResponse {
    /// Flatten the parallel timestamp/quote arrays into daily bars.
    ///
    /// Rows with any null OHLC value are skipped. A missing result set,
    /// an error body, or all-null quotes yield an empty vector, which the
    /// caller treats the same as "no data for this symbol".
    pub fn into_daily_bars(self) -> Vec<DailyBar> {
        let result = match self.chart.result.and_then(|mut r| {
            if r.is_empty() {
                None
            } else {
                Some(r.remove(0))
            }
        }) {
            Some(result) => result,
            None => return Vec::new(),
        };

        let quote = match result.indicators.quote.first() {
            Some(quote) => quote,
            None => return Vec::new(),
        };

        let mut bars = Vec::with_capacity(result.timestamp.len());
        for (i, &ts) in result.timestamp.iter().enumerate() {
            let date = match chrono::DateTime::from_timestamp(ts, 0) {
                Some(dt) => dt.date_naive(),
                None => continue,
            };

            let open = quote.open.get(i).copied().flatten();
            let high = quote.high.get(i).copied().flatten();
            let low = quote.low.get(i).copied().flatten();
            let close = quote.close.get(i).copied().flatten();

            if let (Some(open), Some(high), Some(low), Some(close)) = (open, high, low, close) {
                bars.push(DailyBar {
                    date,
                    open,
                    high,
                    low,
                    close,
                    volume: quote.volume.get(i).copied().flatten().unwrap_or(0),
                });
            }
        }

        bars
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_chart_payload_into_bars() {
        let body = r#"{
            "chart": {
                "result": [{
                    "meta": {"currency": "USD", "symbol": "AAPL"},
                    "timestamp": [1704202200, 1704288600, 1704375000],
                    "indicators": {
                        "quote": [{
                            "open": [187.15, 184.22, 182.15],
                            "high": [188.44, 185.88, 183.09],
                            "low": [183.89, 183.43, 180.88],
                            "close": [185.64, 184.25, 181.91],
                            "volume": [82488700, 58414500, 71983600]
                        }]
                    }
                }],
                "error": null
            }
        }"#;

        let response: ChartResponse = serde_json::from_str(body).unwrap();
        let bars = response.into_daily_bars();

        assert_eq!(bars.len(), 3);
        assert_eq!(bars[0].date.to_string(), "2024-01-02");
        assert_eq!(bars[0].close, 185.64);
        assert_eq!(bars[2].volume, 71983600);
        // Chronological order preserved from the payload
        assert!(bars[0].date < bars[1].date && bars[1].date < bars[2].date);
    }

    #[test]
    fn skips_null_rows() {
        let body = r#"{
            "chart": {
                "result": [{
                    "timestamp": [1704202200, 1704288600, 1704375000],
                    "indicators": {
                        "quote": [{
                            "open": [187.15, null, 182.15],
                            "high": [188.44, null, 183.09],
                            "low": [183.89, null, 180.88],
                            "close": [185.64, null, 181.91],
                            "volume": [82488700, null, 71983600]
                        }]
                    }
                }],
                "error": null
            }
        }"#;

        let response: ChartResponse = serde_json::from_str(body).unwrap();
        let bars = response.into_daily_bars();

        assert_eq!(bars.len(), 2);
        assert_eq!(bars[1].date.to_string(), "2024-01-04");
    }

    #[test]
    fn error_body_yields_no_bars() {
        let body = r#"{
            "chart": {
                "result": null,
                "error": {"code": "Not Found", "description": "No data found, symbol may be delisted"}
            }
        }"#;

        let response: ChartResponse = serde_json::from_str(body).unwrap();
        assert!(response.into_daily_bars().is_empty());
    }

    #[test]
    fn missing_quote_block_yields_no_bars() {
        let body = r#"{
            "chart": {
                "result": [{
                    "timestamp": [1704202200],
                    "indicators": {"quote": []}
                }],
                "error": null
            }
        }"#;

        let response: ChartResponse = serde_json::from_str(body).unwrap();
        assert!(response.into_daily_bars().is_empty());
    }
}
