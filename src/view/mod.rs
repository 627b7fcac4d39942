//! View renderers.
//!
//! Each renderer takes a target region and an already-fetched payload,
//! derives display-only values, writes them into the region and clears its
//! busy indicator. Missing optional fields render as a placeholder; no
//! renderer fails.
//!
//! Submodules:
//! - `region`: display region lifecycle and panel contents.
//! - `theme`: page theme and hero summary (single mutation point).
//! - `snapshot`, `insights`, `forecast`: the three primary panels.

pub mod forecast;
pub mod insights;
pub mod region;
pub mod snapshot;
pub mod theme;

pub use forecast::render_forecast;
pub use insights::render_insights;
pub use region::{Badge, DisplayRegion, Panel, RegionState};
pub use snapshot::{render_snapshot, snapshot_badge};
pub use theme::ThemeState;

use crate::model::{Snapshot, PLACEHOLDER};
use crate::severity::SeverityTier;

/// Empty badge shown before the first successful search.
pub fn blank_badge() -> Badge {
    Badge {
        text: PLACEHOLDER.to_string(),
        color: snapshot::FALLBACK_BADGE_COLOR.to_string(),
    }
}

/// Mirrors the snapshot badge onto the map card's badge, if the front end
/// has one.
pub fn update_map_badge(slot: Option<&mut Badge>, snap: &Snapshot, tier: &SeverityTier) {
    if let Some(badge) = slot {
        *badge = snapshot_badge(snap, tier);
    }
}
