//! Forecast panel: summary statistics and an hourly timeline.

use chrono::{DateTime, NaiveDateTime};

use crate::model::{ForecastPoint, ForecastResult, PLACEHOLDER};
use crate::view::region::{DisplayRegion, Panel};

/// Only the first day of hourly points is shown, whatever the API returns.
pub const MAX_FORECAST_POINTS: usize = 24;

/// Min, max and arithmetic mean of the forecast AQI values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastSummary {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

/// Returns `None` for an empty sequence; there is no meaningful zero here.
pub fn summarize(points: &[ForecastPoint]) -> Option<ForecastSummary> {
    if points.is_empty() {
        return None;
    }
    let min = points.iter().map(|p| p.aqi).fold(f64::INFINITY, f64::min);
    let max = points.iter().map(|p| p.aqi).fold(f64::NEG_INFINITY, f64::max);
    let mean = points.iter().map(|p| p.aqi).sum::<f64>() / points.len() as f64;
    Some(ForecastSummary { min, max, mean })
}

/// Short `HH:MM` label for a forecast timestamp.
///
/// ISO timestamps are parsed; anything else containing a `T` keeps the five
/// characters after it, and timestamps without a `T` pass through unchanged.
pub fn time_label(ts: &str) -> String {
    if let Ok(dt) = DateTime::parse_from_rfc3339(ts) {
        return dt.format("%H:%M").to_string();
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(ts, "%Y-%m-%dT%H:%M:%S%.f") {
        return dt.format("%H:%M").to_string();
    }
    match ts.split_once('T') {
        Some((_, time)) => time.chars().take(5).collect(),
        None => ts.to_string(),
    }
}

fn rounded(value: f64) -> String {
    format!("{}", value.round())
}

pub fn forecast_panel(forecast: &ForecastResult) -> Panel {
    let points = &forecast.points[..forecast.points.len().min(MAX_FORECAST_POINTS)];

    let (min, max, mean) = match summarize(points) {
        Some(s) => (rounded(s.min), rounded(s.max), rounded(s.mean)),
        None => (
            PLACEHOLDER.to_string(),
            PLACEHOLDER.to_string(),
            PLACEHOLDER.to_string(),
        ),
    };

    let mut panel = Panel::new(format!("Next {}h Forecast", forecast.horizon))
        .line(format!("min {} · max {} · avg {}", min, max, mean));

    if points.is_empty() {
        panel = panel.line(PLACEHOLDER);
    }
    for p in points {
        panel = panel.line(format!("{} · AQI {}", time_label(&p.ts), rounded(p.aqi)));
    }
    panel
}

pub fn render_forecast(region: &mut DisplayRegion, forecast: &ForecastResult) {
    region.fill(forecast_panel(forecast));
}
