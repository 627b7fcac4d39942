/// AQI severity tiers.
///
/// Defines the canonical list of severity tiers used for the page theme,
/// the hero summary and badge labels. This is the single source of truth for
/// AQI breakpoints. The heat mapper and renderers reference tiers
/// from here rather than hardcoding boundaries.

use crate::model::AqiReading;

// ---------------------------------------------------------------------------
// Tier metadata
// ---------------------------------------------------------------------------

/// A labeled AQI bucket and the display text associated with it.
#[derive(Debug, PartialEq)]
pub struct SeverityTier {
    /// Inclusive upper AQI bound of this tier.
    pub upper_bound: f64,
    /// Theme identifier, e.g. `"good"`.
    pub identifier: &'static str,
    /// Human-readable label, e.g. `"Unhealthy (SG)"`.
    pub label: &'static str,
    /// Headline shown in the hero summary.
    pub hero_phrase: &'static str,
    /// Secondary advice line.
    pub sub_phrase: &'static str,
}

/// All tiers in ascending order of `upper_bound`. The last entry is a
/// catch-all with an unbounded upper limit.
///
/// Breakpoints follow the US EPA AQI scale.
pub static SEVERITY_TIERS: &[SeverityTier] = &[
    SeverityTier {
        upper_bound: 50.0,
        identifier: "good",
        label: "Good",
        hero_phrase: "clear & fresh",
        sub_phrase: "breathe easy",
    },
    SeverityTier {
        upper_bound: 100.0,
        identifier: "moderate",
        label: "Moderate",
        hero_phrase: "fair air",
        sub_phrase: "generally acceptable",
    },
    SeverityTier {
        upper_bound: 150.0,
        identifier: "usg",
        label: "Unhealthy (SG)",
        hero_phrase: "sensitive groups",
        sub_phrase: "limit prolonged exertion",
    },
    SeverityTier {
        upper_bound: 200.0,
        identifier: "unhealthy",
        label: "Unhealthy",
        hero_phrase: "mask up outdoors",
        sub_phrase: "reduce outdoor time",
    },
    SeverityTier {
        upper_bound: 300.0,
        identifier: "veryunhealthy",
        label: "Very Unhealthy",
        hero_phrase: "avoid outdoor activity",
        sub_phrase: "stay indoors when possible",
    },
    SeverityTier {
        upper_bound: f64::INFINITY,
        identifier: "hazardous",
        label: "Hazardous",
        hero_phrase: "health alert",
        sub_phrase: "remain indoors",
    },
];

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Returns the first tier whose upper bound is >= `aqi`, or the last tier if
/// none matches.
///
/// NaN compares false against every bound and lands in the last tier; run
/// raw values through [`coerce_aqi`] first.
pub fn classify(aqi: f64) -> &'static SeverityTier {
    SEVERITY_TIERS
        .iter()
        .find(|t| aqi <= t.upper_bound)
        .unwrap_or(&SEVERITY_TIERS[SEVERITY_TIERS.len() - 1])
}

/// Numeric coercion applied before classification: missing or non-finite
/// values become 0.
pub fn coerce_aqi(aqi: Option<f64>) -> f64 {
    match aqi {
        Some(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

/// Classifies a displayed reading. The placeholder maps to the lowest tier.
pub fn classify_reading(reading: AqiReading) -> &'static SeverityTier {
    match reading {
        AqiReading::Value(v) => classify(coerce_aqi(Some(v))),
        AqiReading::Placeholder => classify(0.0),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
