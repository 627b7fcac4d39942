//! Page theme and hero summary.
//!
//! The theme is process-wide visual state derived from the latest AQI. It is
//! owned by `ThemeState` and changed only through [`ThemeState::apply`];
//! anything that needs the current tier reads it from here explicitly.

use crate::model::{AqiReading, PLACEHOLDER};
use crate::severity::{classify_reading, SeverityTier, SEVERITY_TIERS};

#[derive(Debug, Clone)]
pub struct ThemeState {
    tier: &'static SeverityTier,
    hero_title: String,
    hero_sub: String,
}

impl Default for ThemeState {
    fn default() -> Self {
        let tier = &SEVERITY_TIERS[0];
        Self {
            tier,
            hero_title: tier.hero_phrase.to_string(),
            hero_sub: PLACEHOLDER.to_string(),
        }
    }
}

impl ThemeState {
    /// Reclassifies `reading` and rewrites the hero summary.
    ///
    /// `label` overrides the tier label in the subtitle when non-empty.
    /// The placeholder reading maps to the lowest tier.
    pub fn apply(
        &mut self,
        reading: AqiReading,
        city: &str,
        label: Option<&str>,
    ) -> &'static SeverityTier {
        let tier = classify_reading(reading);
        let city = if city.trim().is_empty() { PLACEHOLDER } else { city };
        let label = label.filter(|l| !l.is_empty()).unwrap_or(tier.label);

        self.tier = tier;
        self.hero_title = tier.hero_phrase.to_string();
        self.hero_sub = format!("{} • AQI {} ({})", city, reading, label);
        tier
    }

    pub fn tier(&self) -> &'static SeverityTier {
        self.tier
    }

    /// Theme identifier for the whole page, e.g. `"moderate"`.
    pub fn page_class(&self) -> &'static str {
        self.tier.identifier
    }

    pub fn hero_title(&self) -> &str {
        &self.hero_title
    }

    pub fn hero_sub(&self) -> &str {
        &self.hero_sub
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_uses_upstream_label() {
        let mut theme = ThemeState::default();
        let tier = theme.apply(AqiReading::Value(120.0), "Delhi", Some("USG"));
        assert_eq!(tier.identifier, "usg");
        assert_eq!(theme.page_class(), "usg");
        assert_eq!(theme.hero_title(), "sensitive groups");
        assert_eq!(theme.hero_sub(), "Delhi • AQI 120 (USG)");
    }

    #[test]
    fn test_placeholder_resets_to_lowest_tier() {
        let mut theme = ThemeState::default();
        theme.apply(AqiReading::Value(350.0), "Delhi", None);
        assert_eq!(theme.page_class(), "hazardous");

        theme.apply(AqiReading::Placeholder, "Atlantis", Some(""));
        assert_eq!(theme.page_class(), "good");
        assert_eq!(theme.hero_sub(), "Atlantis • AQI -- (Good)");
    }

    #[test]
    fn test_blank_city_shows_placeholder() {
        let mut theme = ThemeState::default();
        theme.apply(AqiReading::Value(10.0), "  ", None);
        assert_eq!(theme.hero_sub(), "— • AQI 10 (Good)");
    }
}
