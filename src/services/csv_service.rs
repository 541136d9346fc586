use std::path::Path;

use crate::models::DailyBar;

/// Column order written to every export file, index column first
const HEADER: [&str; 6] = ["Date", "Open", "High", "Low", "Close", "Volume"];

/// Write the full series to `path`, one row per day in chronological
/// order. Any existing file is overwritten without confirmation.
pub fn write_history(path: &Path, bars: &[DailyBar]) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(HEADER)?;

    for bar in bars {
        writer.write_record(&[
            bar.date.format("%Y-%m-%d").to_string(),
            bar.open.to_string(),
            bar.high.to_string(),
            bar.low.to_string(),
            bar.close.to_string(),
            bar.volume.to_string(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::fs;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicU64, Ordering};

    static TEST_SEQ: AtomicU64 = AtomicU64::new(0);

    fn temp_csv_path() -> PathBuf {
        let n = TEST_SEQ.fetch_add(1, Ordering::Relaxed);
        std::env::temp_dir().join(format!("stockdl_csv_{}_{}.csv", std::process::id(), n))
    }

    fn bar(date: &str, close: f64) -> DailyBar {
        DailyBar {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            open: close - 1.0,
            high: close + 2.0,
            low: close - 2.0,
            close,
            volume: 1000,
        }
    }

    #[test]
    fn writes_header_and_rows_in_order() {
        let path = temp_csv_path();
        let bars = vec![bar("2020-01-02", 10.0), bar("2020-01-03", 11.5)];

        write_history(&path, &bars).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "Date,Open,High,Low,Close,Volume");
        assert_eq!(lines[1], "2020-01-02,9,12,8,10,1000");
        assert_eq!(lines[2], "2020-01-03,10.5,13.5,9.5,11.5,1000");

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn overwrites_existing_file() {
        let path = temp_csv_path();

        write_history(&path, &[bar("2020-01-02", 10.0), bar("2020-01-03", 11.0)]).unwrap();
        write_history(&path, &[bar("2021-06-01", 99.0)]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "2021-06-01,98,101,97,99,1000");

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn writes_empty_series_as_header_only() {
        let path = temp_csv_path();

        write_history(&path, &[]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.trim_end(), "Date,Open,High,Low,Close,Volume");

        let _ = fs::remove_file(&path);
    }
}
