//! Health & activity panel.

use crate::model::{InsightResult, PLACEHOLDER};
use crate::view::region::{DisplayRegion, Panel};

pub fn insights_panel(insights: &InsightResult) -> Panel {
    let mut lines: Vec<String> = insights
        .recommendation
        .iter()
        .filter(|r| !r.is_empty())
        .cloned()
        .collect();
    if let Some(anomaly) = insights.anomaly.as_deref().filter(|a| !a.is_empty()) {
        lines.push(format!("⚠ {}", anomaly));
    }
    if lines.is_empty() {
        lines.push(PLACEHOLDER.to_string());
    }

    Panel {
        heading: "Health & Activity".to_string(),
        badge: None,
        lines,
    }
}

pub fn render_insights(region: &mut DisplayRegion, insights: &InsightResult) {
    region.fill(insights_panel(insights));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recommendation_and_anomaly() {
        let panel = insights_panel(&InsightResult {
            recommendation: Some("Great air today".to_string()),
            anomaly: Some("PM2.5 spike in the last 3h".to_string()),
        });
        assert_eq!(
            panel.lines,
            vec!["Great air today", "⚠ PM2.5 spike in the last 3h"]
        );
    }

    #[test]
    fn test_anomaly_only() {
        let panel = insights_panel(&InsightResult {
            recommendation: None,
            anomaly: Some("sensor drift".to_string()),
        });
        assert_eq!(panel.lines, vec!["⚠ sensor drift"]);
    }

    #[test]
    fn test_empty_insights_show_placeholder() {
        let mut region = DisplayRegion::busy("insights");
        render_insights(&mut region, &InsightResult::default());
        assert!(!region.is_busy());
        assert_eq!(region.content().map(|p| p.lines.clone()), Some(vec![PLACEHOLDER.to_string()]));
    }
}
