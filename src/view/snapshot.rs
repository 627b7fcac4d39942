//! Snapshot panel.

use crate::model::{or_placeholder, Snapshot};
use crate::severity::SeverityTier;
use crate::view::region::{Badge, DisplayRegion, Panel};

/// Badge color used when the API sends no category.
pub const FALLBACK_BADGE_COLOR: &str = "#9fb0d9";

/// `"{label} · AQI {aqi}"`, preferring the upstream category over the tier.
pub fn snapshot_badge(snap: &Snapshot, tier: &SeverityTier) -> Badge {
    let label = snap.category_label().unwrap_or(tier.label);
    let color = snap
        .category
        .as_ref()
        .map(|c| c.color.clone())
        .unwrap_or_else(|| FALLBACK_BADGE_COLOR.to_string());
    Badge {
        text: format!("{} · AQI {}", label, snap.aqi_reading()),
        color,
    }
}

/// Builds the snapshot panel. `tier` is the theme tier already derived from
/// this snapshot.
pub fn snapshot_panel(snap: &Snapshot, tier: &SeverityTier) -> Panel {
    let weather = snap.weather.clone().unwrap_or_default();
    let pollutants = snap.pollutants.clone().unwrap_or_default();

    Panel::new(snap.city.clone())
        .with_badge(snapshot_badge(snap, tier))
        .line(format!(
            "Updated: {} · Source: {}",
            snap.updated_at, snap.source
        ))
        .line(format!(
            "Coordinates: {:.2}, {:.2}",
            snap.coordinates.lat, snap.coordinates.lon
        ))
        .line(format!(
            "Weather: {}°C · {}% RH",
            or_placeholder(weather.temp_c),
            or_placeholder(weather.humidity_pct)
        ))
        .line(format!("PM2.5: {}", or_placeholder(pollutants.pm25)))
        .line(format!("PM10: {}", or_placeholder(pollutants.pm10)))
        .line(format!("NO₂: {}", or_placeholder(pollutants.no2)))
        .line(format!("O₃: {}", or_placeholder(pollutants.o3)))
}

pub fn render_snapshot(region: &mut DisplayRegion, snap: &Snapshot, tier: &SeverityTier) {
    region.fill(snapshot_panel(snap, tier));
}
