//! AirSight: city air-quality dashboard core.
//!
//! Looks up a city through the AirSight API and presents a current
//! snapshot, health insights, a 24-hour forecast and a heat-map of the
//! measurement location.
//!
//! # Modules
//! - `model`: API payloads and the shared error type.
//! - `severity`: AQI tier classification and heat intensity.
//! - `view`: display regions, renderers and the page theme.
//! - `map`: map/heat overlay state machine over a [`map::MapBackend`].
//! - `ingest`: the [`ingest::AirQualityApi`] trait and its HTTP client.
//! - `orchestrator`: the search cycle.
//! - `store`: last-searched-city persistence.
//! - `config`, `logging`: settings and structured logging.

pub mod config;
pub mod ingest;
pub mod logging;
pub mod map;
pub mod model;
pub mod orchestrator;
pub mod severity;
pub mod store;
pub mod view;

pub use orchestrator::{Dashboard, SearchOutcome};
