/// Core data types for the AirSight dashboard.
///
/// This module defines the payloads returned by the AirSight API and the
/// shared error type imported by all other modules. It contains no I/O;
/// the only logic is display formatting for AQI values and the mapping from
/// an error to the text the dashboard shows.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::map::MapError;

/// Shown wherever an optional value is missing.
pub const PLACEHOLDER: &str = "—";

/// Shown in place of an AQI number when no reading is available.
pub const AQI_PLACEHOLDER: &str = "--";

/// Shown when a failure carries no usable message.
pub const GENERIC_FAILURE: &str = "Something went wrong";

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// WGS84 position of the measurement station.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// Upstream category assigned by the API, e.g. `{"label": "Good", "color": "#009966"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub label: String,
    pub color: String,
    #[serde(default)]
    pub code: Option<String>,
}

/// The upstream vendor sometimes skips temperature or humidity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Weather {
    #[serde(default)]
    pub temp_c: Option<f64>,
    #[serde(default)]
    pub humidity_pct: Option<f64>,
}

/// Pollutant concentrations, any of which may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pollutants {
    #[serde(default)]
    pub pm25: Option<f64>,
    #[serde(default)]
    pub pm10: Option<f64>,
    #[serde(default)]
    pub no2: Option<f64>,
    #[serde(default)]
    pub o3: Option<f64>,
}

/// Current-moment air quality reading for a city.
///
/// Returned by `GET /api/v1/search`. `aqi` is `null` on the wire when the
/// vendor has no reading; it is then rendered as a placeholder and
/// classified as 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub city: String,
    #[serde(default)]
    pub aqi: Option<f64>,
    #[serde(default)]
    pub category: Option<Category>,
    pub coordinates: Coordinates,
    #[serde(default)]
    pub weather: Option<Weather>,
    #[serde(default)]
    pub pollutants: Option<Pollutants>,
    pub updated_at: String,
    pub source: String,
}

impl Snapshot {
    pub fn aqi_reading(&self) -> AqiReading {
        AqiReading::from(self.aqi)
    }

    pub fn category_label(&self) -> Option<&str> {
        self.category.as_ref().map(|c| c.label.as_str())
    }
}

// ---------------------------------------------------------------------------
// Insights and forecast
// ---------------------------------------------------------------------------

/// Returned by `GET /api/v1/insights/current`.
///
/// The wire payload also embeds a copy of the snapshot; it is ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InsightResult {
    #[serde(default)]
    pub recommendation: Option<String>,
    #[serde(default)]
    pub anomaly: Option<String>,
}

/// One hourly forecast value. `ts` is an ISO 8601 timestamp, e.g.
/// `"2024-05-01T13:00:00"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub ts: String,
    pub aqi: f64,
    #[serde(default)]
    pub lower: Option<f64>,
    #[serde(default)]
    pub upper: Option<f64>,
}

/// Returned by `GET /api/v1/insights/forecast`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    #[serde(default)]
    pub city: Option<String>,
    pub horizon: u32,
    #[serde(default)]
    pub points: Vec<ForecastPoint>,
}

// ---------------------------------------------------------------------------
// AQI readings
// ---------------------------------------------------------------------------

/// An AQI as the dashboard displays it: either a number or the
/// non-numeric placeholder used on the failure path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AqiReading {
    Value(f64),
    Placeholder,
}

impl From<Option<f64>> for AqiReading {
    fn from(aqi: Option<f64>) -> Self {
        match aqi {
            Some(v) => AqiReading::Value(v),
            None => AqiReading::Placeholder,
        }
    }
}

impl fmt::Display for AqiReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AqiReading::Value(v) => write!(f, "{}", v),
            AqiReading::Placeholder => f.write_str(AQI_PLACEHOLDER),
        }
    }
}

/// Formats an optional measurement, substituting [`PLACEHOLDER`].
pub fn or_placeholder(value: Option<f64>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can arise during a search cycle.
///
/// Kinds stay distinct so callers and logs can tell them apart, even though
/// the dashboard renders all of them through one failure path.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DashboardError {
    /// The request did not complete within the configured timeout.
    #[error("request timed out after {secs}s: {url}")]
    Timeout { url: String, secs: u64 },
    /// Connection-level failure (DNS, refused, reset, ...).
    #[error("network error: {0}")]
    Network(String),
    /// Non-2xx response. `message` is the text extracted from the body.
    #[error("HTTP error {status}: {message}")]
    Http { status: u16, message: String },
    /// The response body could not be deserialized.
    #[error("parse error: {0}")]
    Parse(String),
    /// The map could not be (re)built.
    #[error("map error: {0}")]
    Map(#[from] MapError),
}

impl DashboardError {
    /// The text shown to the user for this failure.
    pub fn user_message(&self) -> String {
        let msg = match self {
            DashboardError::Http { message, .. } => message.trim().to_string(),
            DashboardError::Timeout { .. } => "The request timed out".to_string(),
            DashboardError::Network(msg) | DashboardError::Parse(msg) => msg.trim().to_string(),
            DashboardError::Map(e) => e.to_string(),
        };
        if msg.is_empty() {
            GENERIC_FAILURE.to_string()
        } else {
            msg
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_tolerates_missing_optional_blocks() {
        let json = r#"{
            "city": "Delhi",
            "aqi": 42,
            "coordinates": {"lat": 28.61, "lon": 77.21},
            "updated_at": "2024-05-01T13:00:00",
            "source": "vendor_live"
        }"#;
        let snap: Snapshot = serde_json::from_str(json).expect("minimal snapshot should parse");
        assert_eq!(snap.aqi, Some(42.0));
        assert!(snap.category.is_none());
        assert!(snap.weather.is_none());
        assert!(snap.pollutants.is_none());
    }

    #[test]
    fn test_snapshot_null_aqi_is_placeholder() {
        let json = r##"{
            "city": "Mumbai",
            "aqi": null,
            "category": {"label": "Good", "code": "good", "color": "#009966"},
            "coordinates": {"lat": 19.07, "lon": 72.87},
            "pollutants": {"pm25": 12.5},
            "weather": {"temp_c": 31.0},
            "updated_at": "2024-05-01T13:00:00",
            "source": "cache_fresh"
        }"##;
        let snap: Snapshot = serde_json::from_str(json).expect("snapshot should parse");
        assert_eq!(snap.aqi_reading(), AqiReading::Placeholder);
        assert_eq!(snap.category_label(), Some("Good"));
        assert_eq!(snap.category.as_ref().map(|c| c.color.as_str()), Some("#009966"));
        let p = snap.pollutants.expect("pollutants present");
        assert_eq!(p.pm25, Some(12.5));
        assert_eq!(p.no2, None);
        assert_eq!(snap.weather.and_then(|w| w.humidity_pct), None);
    }

    #[test]
    fn test_insights_ignore_embedded_snapshot() {
        let json = r#"{"snapshot": {"city": "x"}, "recommendation": "Go outside", "anomaly": null}"#;
        let ins: InsightResult = serde_json::from_str(json).expect("insights should parse");
        assert_eq!(ins.recommendation.as_deref(), Some("Go outside"));
        assert_eq!(ins.anomaly, None);
    }

    #[test]
    fn test_aqi_reading_display() {
        assert_eq!(AqiReading::Value(42.0).to_string(), "42");
        assert_eq!(AqiReading::Value(42.5).to_string(), "42.5");
        assert_eq!(AqiReading::Placeholder.to_string(), "--");
    }

    #[test]
    fn test_user_message_prefers_http_body_text() {
        let err = DashboardError::Http {
            status: 500,
            message: "city not found".to_string(),
        };
        assert_eq!(err.user_message(), "city not found");
    }

    #[test]
    fn test_user_message_falls_back_when_empty() {
        let err = DashboardError::Http {
            status: 502,
            message: "   ".to_string(),
        };
        assert_eq!(err.user_message(), GENERIC_FAILURE);
    }
}
