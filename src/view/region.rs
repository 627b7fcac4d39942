//! Display regions: one per dashboard panel, each with a busy indicator and
//! a content area.

use std::fmt;

/// Lifecycle of a display region.
///
/// `Idle → Loading → Ready`, or `Loading → Error` for the primary group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionState {
    Idle,
    Loading,
    Ready,
    Error,
}

/// A small colored label, e.g. `"Good · AQI 42"` on `#009966`.
#[derive(Debug, Clone, PartialEq)]
pub struct Badge {
    pub text: String,
    pub color: String,
}

/// Rendered contents of a region.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Panel {
    pub heading: String,
    pub badge: Option<Badge>,
    pub lines: Vec<String>,
}

impl Panel {
    pub fn new(heading: impl Into<String>) -> Self {
        Self {
            heading: heading.into(),
            ..Default::default()
        }
    }

    pub fn with_badge(mut self, badge: Badge) -> Self {
        self.badge = Some(badge);
        self
    }

    pub fn line(mut self, line: impl Into<String>) -> Self {
        self.lines.push(line.into());
        self
    }

    /// True if any heading, badge or line contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.heading.contains(needle)
            || self.badge.as_ref().is_some_and(|b| b.text.contains(needle))
            || self.lines.iter().any(|l| l.contains(needle))
    }
}

impl fmt::Display for Panel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.heading)?;
        if let Some(badge) = &self.badge {
            write!(f, "  [{}]", badge.text)?;
        }
        writeln!(f)?;
        for line in &self.lines {
            writeln!(f, "  {}", line)?;
        }
        Ok(())
    }
}

/// A dashboard panel.
#[derive(Debug, Clone)]
pub struct DisplayRegion {
    name: &'static str,
    state: RegionState,
    content: Option<Panel>,
}

impl DisplayRegion {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            state: RegionState::Idle,
            content: None,
        }
    }

    /// A region that starts busy, like a skeleton placeholder in markup.
    pub fn busy(name: &'static str) -> Self {
        Self {
            name,
            state: RegionState::Loading,
            content: None,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn state(&self) -> RegionState {
        self.state
    }

    pub fn is_busy(&self) -> bool {
        self.state == RegionState::Loading
    }

    pub fn content(&self) -> Option<&Panel> {
        self.content.as_ref()
    }

    /// Clears prior content and marks the region busy.
    pub fn begin_loading(&mut self) {
        self.content = None;
        self.state = RegionState::Loading;
    }

    /// Populates the region and clears busy.
    pub fn fill(&mut self, panel: Panel) {
        self.content = Some(panel);
        self.state = RegionState::Ready;
    }

    /// Puts the region in the error state, either showing `panel` or left
    /// visibly empty.
    pub fn fail(&mut self, panel: Option<Panel>) {
        self.content = panel;
        self.state = RegionState::Error;
    }

    /// Back to an empty `Idle` region, as before the first render.
    pub fn reset(&mut self) {
        self.content = None;
        self.state = RegionState::Idle;
    }

    /// Drops the busy indicator without touching content.
    pub fn clear_busy(&mut self) {
        if self.state == RegionState::Loading {
            self.state = RegionState::Idle;
        }
    }
}
