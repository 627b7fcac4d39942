//! Search orchestration.
//!
//! `Dashboard` owns every display region, the theme, the map renderer and
//! the last-city store, and drives one search cycle at a time:
//!
//! 1. resolve the city (blank input → default city),
//! 2. mark the three primary regions busy and disable the trigger,
//! 3. fetch the snapshot, a hard dependency,
//! 4. render it, then fetch insights and forecast concurrently; either
//!    failing aborts the pair,
//! 5. render insights and forecast,
//! 6. rebuild the map,
//! 7. update the map badge if there is one,
//! 8. persist the city.
//!
//! Any failure in 3–6 takes the single failure path: an apology in the
//! snapshot region, empty insights and forecast regions, and the theme reset
//! to the placeholder AQI. The trigger is re-enabled whatever happens.
//!
//! `search` takes `&mut self`, so two cycles can never interleave on one
//! dashboard.

use std::time::Instant;

use crate::config::DashboardConfig;
use crate::ingest::AirQualityApi;
use crate::logging::{self, Component};
use crate::map::{MapBackend, MapRenderer};
use crate::model::{AqiReading, DashboardError};
use crate::store::LastCityStore;
use crate::view::{
    blank_badge, render_forecast, render_insights, render_snapshot, update_map_badge, Badge,
    DisplayRegion, Panel, ThemeState,
};

/// Heading of the failure panel.
pub const FAILURE_HEADING: &str = "Oops";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPhase {
    Idle,
    Loading,
    Ready,
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Ready { city: String },
    Failed { city: String, error: DashboardError },
}

impl SearchOutcome {
    pub fn city(&self) -> &str {
        match self {
            SearchOutcome::Ready { city } | SearchOutcome::Failed { city, .. } => city,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, SearchOutcome::Ready { .. })
    }
}

/// Trimmed input, or `default_city` when the input is blank.
pub fn resolve_city(input: &str, default_city: &str) -> String {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        default_city.trim().to_string()
    } else {
        trimmed.to_string()
    }
}

pub struct Dashboard<A, S, B>
where
    A: AirQualityApi,
    S: LastCityStore,
    B: MapBackend,
{
    api: A,
    store: S,
    map: MapRenderer<B>,
    default_city: String,
    forecast_horizon: u32,

    input: String,
    trigger_enabled: bool,
    phase: SearchPhase,

    snapshot: DisplayRegion,
    insights: DisplayRegion,
    forecast: DisplayRegion,
    map_region: DisplayRegion,
    map_badge: Option<Badge>,
    theme: ThemeState,
}

impl<A, S, B> Dashboard<A, S, B>
where
    A: AirQualityApi,
    S: LastCityStore,
    B: MapBackend,
{
    pub fn new(api: A, store: S, backend: B, config: &DashboardConfig) -> Self {
        Self {
            api,
            store,
            map: MapRenderer::new(backend),
            default_city: config.default_city.clone(),
            forecast_horizon: config.forecast_horizon,
            input: String::new(),
            trigger_enabled: true,
            phase: SearchPhase::Idle,
            snapshot: DisplayRegion::new("snapshot"),
            insights: DisplayRegion::new("insights"),
            forecast: DisplayRegion::new("forecast"),
            map_region: DisplayRegion::busy("map"),
            map_badge: Some(blank_badge()),
            theme: ThemeState::default(),
        }
    }

    /// Drop the map badge, for front ends that don't show one.
    pub fn without_map_badge(mut self) -> Self {
        self.map_badge = None;
        self
    }

    // -----------------------------------------------------------------------
    // Input
    // -----------------------------------------------------------------------

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: &str) {
        self.input = text.to_string();
    }

    /// City searched when the input is blank.
    pub fn default_city(&self) -> &str {
        &self.default_city
    }

    pub fn is_trigger_enabled(&self) -> bool {
        self.trigger_enabled
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Pre-fill the input from the stored city, then run the initial search.
    ///
    /// The initial search runs even when nothing was stored.
    pub async fn startup(&mut self) -> SearchOutcome {
        match self.store.load() {
            Ok(Some(city)) => {
                logging::debug(Component::Store, Some(&city), "restored last searched city");
                self.input = city;
            }
            Ok(None) => {}
            Err(e) => logging::warn(Component::Store, None, &format!("could not read last city: {}", e)),
        }
        self.search().await
    }

    /// Set the input and search.
    pub async fn search_for(&mut self, text: &str) -> SearchOutcome {
        self.set_input(text);
        self.search().await
    }

    /// Run one full search cycle for the current input.
    pub async fn search(&mut self) -> SearchOutcome {
        let started = Instant::now();
        let city = resolve_city(&self.input, &self.default_city);

        self.phase = SearchPhase::Loading;
        self.trigger_enabled = false;
        for region in [&mut self.snapshot, &mut self.insights, &mut self.forecast] {
            region.begin_loading();
        }
        logging::debug(Component::Ui, Some(&city), "search started");

        let outcome = match self.run_cycle(&city).await {
            Ok(()) => {
                self.phase = SearchPhase::Ready;
                if let Err(e) = self.store.save(&city) {
                    logging::warn(Component::Store, Some(&city), &format!("could not save last city: {}", e));
                }
                SearchOutcome::Ready { city }
            }
            Err(error) => {
                logging::log_failure(&city, "search", &error);
                self.render_failure(&city, &error);
                self.phase = SearchPhase::Failed;
                SearchOutcome::Failed { city, error }
            }
        };

        self.trigger_enabled = true;
        logging::log_search_summary(outcome.city(), outcome.is_ready(), started.elapsed().as_millis());
        outcome
    }

    async fn run_cycle(&mut self, city: &str) -> Result<(), DashboardError> {
        let snap = self.api.snapshot(city).await?;
        let tier = self
            .theme
            .apply(snap.aqi_reading(), &snap.city, snap.category_label());
        render_snapshot(&mut self.snapshot, &snap, tier);

        let (insights, forecast) = tokio::try_join!(
            self.api.current_insights(city),
            self.api.forecast(city, self.forecast_horizon),
        )?;
        render_insights(&mut self.insights, &insights);
        render_forecast(&mut self.forecast, &forecast);

        self.map.render(
            &mut self.map_region,
            snap.coordinates,
            snap.aqi_reading(),
            snap.category.as_ref(),
        )?;

        update_map_badge(self.map_badge.as_mut(), &snap, tier);
        Ok(())
    }

    fn render_failure(&mut self, city: &str, error: &DashboardError) {
        self.snapshot
            .fail(Some(Panel::new(FAILURE_HEADING).line(error.user_message())));
        self.insights.fail(None);
        self.forecast.fail(None);
        self.theme.apply(AqiReading::Placeholder, city, None);
    }

    // -----------------------------------------------------------------------
    // Read access for front ends and tests
    // -----------------------------------------------------------------------

    pub fn phase(&self) -> SearchPhase {
        self.phase
    }

    pub fn snapshot_region(&self) -> &DisplayRegion {
        &self.snapshot
    }

    pub fn insights_region(&self) -> &DisplayRegion {
        &self.insights
    }

    pub fn forecast_region(&self) -> &DisplayRegion {
        &self.forecast
    }

    pub fn map_region(&self) -> &DisplayRegion {
        &self.map_region
    }

    pub fn map_badge(&self) -> Option<&Badge> {
        self.map_badge.as_ref()
    }

    pub fn theme(&self) -> &ThemeState {
        &self.theme
    }

    pub fn map(&self) -> &MapRenderer<B> {
        &self.map
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn api(&self) -> &A {
        &self.api
    }
}
