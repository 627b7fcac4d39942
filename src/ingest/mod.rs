//! Remote data sources.
//!
//! The dashboard only talks to the AirSight API, through [`AirQualityApi`].
//! `airsight` holds the HTTP implementation; tests substitute their own.

pub mod airsight;

use async_trait::async_trait;

use crate::model::{DashboardError, ForecastResult, InsightResult, Snapshot};

pub use airsight::HttpApiClient;

/// The three calls a search cycle makes.
#[async_trait]
pub trait AirQualityApi: Send + Sync {
    /// `GET /api/v1/search?city=`: current reading for `city`.
    async fn snapshot(&self, city: &str) -> Result<Snapshot, DashboardError>;

    /// `GET /api/v1/insights/current?city=`: health recommendation and anomaly note.
    async fn current_insights(&self, city: &str) -> Result<InsightResult, DashboardError>;

    /// `GET /api/v1/insights/forecast?city=&horizon=`: hourly AQI forecast.
    async fn forecast(&self, city: &str, horizon: u32) -> Result<ForecastResult, DashboardError>;
}
