use chrono::{Duration, NaiveDate};
use plotters::prelude::*;

use crate::models::DailyBar;

/// Rendered chart pixels in RGB8 row-major order
#[derive(Debug, Clone)]
pub struct ChartImage {
    pub width: u32,
    pub height: u32,
    pub rgb: Vec<u8>,
}

/// Render a closing-price line chart for `symbol` into an RGB8 buffer
pub fn render_close_chart(
    bars: &[DailyBar],
    symbol: &str,
    width: u32,
    height: u32,
) -> Result<ChartImage, String> {
    if bars.is_empty() {
        return Err("No data points to plot.".to_string());
    }

    let mut rgb = vec![0u8; width as usize * height as usize * 3];

    {
        let backend = BitMapBackend::with_buffer(&mut rgb, (width, height));
        let root = backend.into_drawing_area();
        root.fill(&WHITE)
            .map_err(|e| format!("Failed to fill canvas: {}", e))?;

        // Find price range
        let min_price = bars.iter().map(|b| b.close).fold(f64::INFINITY, f64::min);
        let max_price = bars
            .iter()
            .map(|b| b.close)
            .fold(f64::NEG_INFINITY, f64::max);

        // Add some padding to the price range
        let price_range = (max_price - min_price).max(1e-8); // Avoid division by zero
        let padding = price_range * 0.1;
        let y_min = (min_price - padding).max(0.0);
        let y_max = max_price + padding;

        // Get date range
        let x_min = bars[0].date;
        let mut x_max = bars[bars.len() - 1].date;
        if x_min >= x_max {
            // A single-day series still needs a non-empty axis
            x_max = x_min + Duration::days(1);
        }

        // Build chart with f64 Y axis
        let mut chart = ChartBuilder::on(&root)
            .caption(
                &format!("{} Stock Price", symbol),
                ("sans-serif", 40.0).into_font(),
            )
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(x_min..x_max, y_min..y_max)
            .map_err(|e| format!("Failed to build chart: {}", e))?;

        // Configure mesh
        chart
            .configure_mesh()
            .y_desc("Price (USD)")
            .x_desc("Date")
            .draw()
            .map_err(|e| format!("Failed to draw mesh: {}", e))?;

        // Draw the closing price as a single polyline
        let series: Vec<(NaiveDate, f64)> = bars.iter().map(|b| (b.date, b.close)).collect();
        chart
            .draw_series(std::iter::once(PathElement::new(series, &BLUE)))
            .map_err(|e| format!("Failed to draw series: {}", e))?
            .label(format!("{} Closing Price", symbol))
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE));

        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()
            .map_err(|e| format!("Failed to draw legend: {}", e))?;

        root.present()
            .map_err(|e| format!("Failed to render chart: {}", e))?;
    }

    Ok(ChartImage { width, height, rgb })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(date: &str, close: f64) -> DailyBar {
        DailyBar {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            open: close,
            high: close,
            low: close,
            close,
            volume: 0,
        }
    }

    #[test]
    fn rejects_empty_series() {
        let err = render_close_chart(&[], "AAPL", 320, 240).unwrap_err();
        assert!(err.contains("No data"));
    }

    #[test]
    fn renders_buffer_of_requested_size() {
        let bars = vec![
            bar("2024-01-02", 185.6),
            bar("2024-01-03", 184.3),
            bar("2024-01-04", 181.9),
        ];

        match render_close_chart(&bars, "AAPL", 320, 240) {
            Ok(image) => {
                assert_eq!(image.width, 320);
                assert_eq!(image.height, 240);
                assert_eq!(image.rgb.len(), 320 * 240 * 3);
                // The line and axes leave non-white pixels behind
                assert!(image.rgb.iter().any(|&b| b != 255));
            }
            // Headless environments without system fonts cannot draw the labels
            Err(e) => assert!(e.to_lowercase().contains("font"), "unexpected error: {}", e),
        }
    }

    #[test]
    fn single_day_series_renders() {
        let bars = vec![bar("2024-01-02", 185.6)];

        match render_close_chart(&bars, "MSFT", 200, 150) {
            Ok(image) => assert_eq!(image.rgb.len(), 200 * 150 * 3),
            Err(e) => assert!(e.to_lowercase().contains("font"), "unexpected error: {}", e),
        }
    }
}
