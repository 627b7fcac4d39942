#![allow(dead_code)]

use std::collections::HashMap;
use std::io::ErrorKind;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use airsight::ingest::AirQualityApi;
use airsight::model::{
    Category, Coordinates, DashboardError, ForecastPoint, ForecastResult, InsightResult, Snapshot,
};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub const DELHI: Coordinates = Coordinates { lat: 28.6139, lon: 77.2090 };

pub fn snapshot(city: &str, aqi: f64) -> Snapshot {
    Snapshot {
        city: city.to_string(),
        aqi: Some(aqi),
        category: Some(Category {
            label: "Good".to_string(),
            color: "#009966".to_string(),
            code: Some("good".to_string()),
        }),
        coordinates: DELHI,
        weather: None,
        pollutants: None,
        updated_at: "2024-05-01T13:00:00".to_string(),
        source: "vendor_live".to_string(),
    }
}

pub fn insights() -> InsightResult {
    InsightResult {
        recommendation: Some("Great air today — enjoy outdoor exercise.".to_string()),
        anomaly: None,
    }
}

pub fn forecast(values: &[f64]) -> ForecastResult {
    ForecastResult {
        city: Some("Delhi".to_string()),
        horizon: 24,
        points: values
            .iter()
            .enumerate()
            .map(|(h, aqi)| ForecastPoint {
                ts: format!("2024-05-01T{:02}:00:00", h % 24),
                aqi: *aqi,
                lower: None,
                upper: None,
            })
            .collect(),
    }
}

pub fn http_error(status: u16, message: &str) -> DashboardError {
    DashboardError::Http {
        status,
        message: message.to_string(),
    }
}

// ---------------------------------------------------------------------------
// In-process API
// ---------------------------------------------------------------------------

/// Canned responses plus a log of every call, in order.
pub struct FakeApi {
    pub snapshot: Result<Snapshot, DashboardError>,
    pub insights: Result<InsightResult, DashboardError>,
    pub forecast: Result<ForecastResult, DashboardError>,
    /// Applied to insights and forecast so their overlap is observable.
    pub delay: Duration,
    pub calls: Mutex<Vec<String>>,
    /// Served in order before falling back to `snapshot`.
    queued_snapshots: Mutex<Vec<Result<Snapshot, DashboardError>>>,
}

impl FakeApi {
    pub fn healthy(aqi: f64) -> Self {
        Self {
            snapshot: Ok(snapshot("Delhi", aqi)),
            insights: Ok(insights()),
            forecast: Ok(forecast(&[10.0, 50.0, 90.0])),
            delay: Duration::ZERO,
            calls: Mutex::new(Vec::new()),
            queued_snapshots: Mutex::new(Vec::new()),
        }
    }

    pub fn queue_snapshot(&self, result: Result<Snapshot, DashboardError>) {
        self.queued_snapshots.lock().unwrap().push(result);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, entry: String) {
        self.calls.lock().unwrap().push(entry);
    }

    async fn pause(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

#[async_trait]
impl AirQualityApi for FakeApi {
    async fn snapshot(&self, city: &str) -> Result<Snapshot, DashboardError> {
        self.record(format!("snapshot:{}", city));
        let mut queued = self.queued_snapshots.lock().unwrap();
        if queued.is_empty() {
            self.snapshot.clone()
        } else {
            queued.remove(0)
        }
    }

    async fn current_insights(&self, city: &str) -> Result<InsightResult, DashboardError> {
        self.record(format!("start:insights:{}", city));
        self.pause().await;
        self.record("end:insights".to_string());
        self.insights.clone()
    }

    async fn forecast(&self, city: &str, horizon: u32) -> Result<ForecastResult, DashboardError> {
        self.record(format!("start:forecast:{}:{}", city, horizon));
        self.pause().await;
        self.record("end:forecast".to_string());
        self.forecast.clone()
    }
}

// ---------------------------------------------------------------------------
// Local HTTP server
// ---------------------------------------------------------------------------

/// A canned HTTP response.
#[derive(Clone)]
pub struct Canned {
    pub status: u16,
    pub content_type: &'static str,
    pub body: String,
    pub delay: Duration,
}

impl Canned {
    pub fn json(body: &str) -> Self {
        Self {
            status: 200,
            content_type: "application/json",
            body: body.to_string(),
            delay: Duration::ZERO,
        }
    }

    pub fn status(status: u16, content_type: &'static str, body: &str) -> Self {
        Self {
            status,
            content_type,
            body: body.to_string(),
            delay: Duration::ZERO,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// Raw request heads seen by a [`start_server`] instance.
pub type RequestLog = Arc<Mutex<Vec<String>>>;

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        404 => "Not Found",
        422 => "Unprocessable Entity",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        _ => "Unknown",
    }
}

/// Serves `routes` (keyed by request path, query excluded) on a loopback
/// port until the test ends. Unknown paths get a 404.
///
/// Returns `None` when the sandbox forbids binding a socket.
pub async fn start_server(routes: HashMap<&'static str, Canned>) -> Option<(String, RequestLog)> {
    let listener = match TcpListener::bind("127.0.0.1:0").await {
        Ok(listener) => listener,
        Err(err) if err.kind() == ErrorKind::PermissionDenied => return None,
        Err(err) => panic!("failed to bind local test listener: {err}"),
    };
    let addr = listener.local_addr().unwrap();
    let log: RequestLog = Arc::new(Mutex::new(Vec::new()));
    let routes = Arc::new(routes);

    let server_log = log.clone();
    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };
            let routes = routes.clone();
            let log = server_log.clone();
            tokio::spawn(async move {
                let mut head = Vec::new();
                let mut buf = [0u8; 1024];
                while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut buf).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => head.extend_from_slice(&buf[..n]),
                    }
                }
                let head = String::from_utf8_lossy(&head).to_string();
                let target = head
                    .lines()
                    .next()
                    .and_then(|line| line.split_whitespace().nth(1))
                    .unwrap_or("/")
                    .to_string();
                log.lock().unwrap().push(head);

                let path = target.split('?').next().unwrap_or("/");
                let canned = routes
                    .get(path)
                    .cloned()
                    .unwrap_or_else(|| Canned::status(404, "text/plain", "no such route"));

                if !canned.delay.is_zero() {
                    tokio::time::sleep(canned.delay).await;
                }
                let response = format!(
                    "HTTP/1.1 {} {}\r\nContent-Length: {}\r\nContent-Type: {}\r\nConnection: close\r\n\r\n{}",
                    canned.status,
                    reason(canned.status),
                    canned.body.len(),
                    canned.content_type,
                    canned.body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    Some((format!("http://{}", addr), log))
}

pub const SNAPSHOT_JSON: &str = r##"{
    "city": "Delhi",
    "coordinates": {"lat": 28.6139, "lon": 77.209},
    "aqi": 42,
    "category": {"label": "Good", "code": "good", "color": "#009966"},
    "pollutants": {"pm25": 11.0, "pm10": 20.0},
    "weather": {"temp_c": 31.0, "humidity_pct": 40.0},
    "updated_at": "2024-05-01T13:00:00",
    "source": "vendor_live"
}"##;

pub const INSIGHTS_JSON: &str = r#"{
    "snapshot": {"city": "Delhi"},
    "recommendation": "Great air today — enjoy outdoor exercise.",
    "anomaly": null
}"#;

pub const FORECAST_JSON: &str = r#"{
    "city": "Delhi",
    "horizon": 24,
    "points": [
        {"ts": "2024-05-01T14:00:00", "aqi": 40.2},
        {"ts": "2024-05-01T15:00:00", "aqi": 44.9}
    ]
}"#;
