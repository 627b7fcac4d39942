//! AQI severity classification.
//!
//! - `tiers`: the static tier table and `classify`.
//! - `heat`: the coarse heat-overlay intensity derived from the same breakpoints.

pub mod heat;
pub mod tiers;

pub use heat::{heat_color, heat_intensity, HeatStop, HEAT_GRADIENT};
pub use tiers::{classify, classify_reading, coerce_aqi, SeverityTier, SEVERITY_TIERS};
