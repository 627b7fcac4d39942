/// Structured logging for the AirSight dashboard
///
/// Provides context-rich logging tagged with the emitting component and,
/// where relevant, the city being searched. Events go through `tracing`;
/// `init_logger` installs a `tracing-subscriber` formatter for the binary.

use std::fmt;
use std::str::FromStr;

use tracing_subscriber::EnvFilter;

use crate::model::DashboardError;

// ---------------------------------------------------------------------------
// Log Levels
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warning => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" | "trace" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warning),
            "error" => Ok(LogLevel::Error),
            other => Err(format!("unknown log level: {}", other)),
        }
    }
}

// ---------------------------------------------------------------------------
// Components
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Component {
    Api,
    Map,
    Store,
    Ui,
    System,
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Component::Api => write!(f, "API"),
            Component::Map => write!(f, "MAP"),
            Component::Store => write!(f, "STORE"),
            Component::Ui => write!(f, "UI"),
            Component::System => write!(f, "SYS"),
        }
    }
}

// ---------------------------------------------------------------------------
// Failure Classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureType {
    /// Expected failure - e.g. the user searched for a city the API doesn't know
    Expected,
    /// Unexpected failure - indicates service degradation or a contract change
    Unexpected,
    /// Unknown - cannot determine if this is expected or not
    Unknown,
}

impl fmt::Display for FailureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureType::Expected => write!(f, "EXPECTED"),
            FailureType::Unexpected => write!(f, "UNEXPECTED"),
            FailureType::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// Classify a failed search cycle by error kind.
pub fn classify_failure(err: &DashboardError) -> FailureType {
    match err {
        // The API answers unknown cities with 404
        DashboardError::Http { status: 404, .. } => FailureType::Expected,
        DashboardError::Http { status, .. } if *status >= 500 => FailureType::Unexpected,
        DashboardError::Http { .. } => FailureType::Unknown,
        // Timeouts and connection errors point at the service or the network
        DashboardError::Timeout { .. } | DashboardError::Network(_) => FailureType::Unexpected,
        // Parse errors suggest API changes
        DashboardError::Parse(_) => FailureType::Unexpected,
        DashboardError::Map(_) => FailureType::Unknown,
    }
}

// ---------------------------------------------------------------------------
// Initialization
// ---------------------------------------------------------------------------

/// Install the global subscriber.
///
/// `RUST_LOG` wins over `min_level` when set. Calling this twice is harmless;
/// the second call is ignored.
pub fn init_logger(min_level: LogLevel) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("airsight={}", min_level)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

// ---------------------------------------------------------------------------
// Public Logging Functions
// ---------------------------------------------------------------------------

/// Log a general informational message
pub fn info(component: Component, city: Option<&str>, message: &str) {
    tracing::info!(component = %component, city = city.unwrap_or("-"), "{}", message);
}

/// Log a warning message
pub fn warn(component: Component, city: Option<&str>, message: &str) {
    tracing::warn!(component = %component, city = city.unwrap_or("-"), "{}", message);
}

/// Log an error message
pub fn error(component: Component, city: Option<&str>, message: &str) {
    tracing::error!(component = %component, city = city.unwrap_or("-"), "{}", message);
}

/// Log a debug message
pub fn debug(component: Component, city: Option<&str>, message: &str) {
    tracing::debug!(component = %component, city = city.unwrap_or("-"), "{}", message);
}

// ---------------------------------------------------------------------------
// Structured Failure Logging
// ---------------------------------------------------------------------------

/// Log a failed operation with automatic classification
pub fn log_failure(city: &str, operation: &str, err: &DashboardError) {
    let failure_type = classify_failure(err);
    let component = match err {
        DashboardError::Map(_) => Component::Map,
        _ => Component::Api,
    };
    let message = format!("{} failed [{}]: {}", operation, failure_type, err);

    match failure_type {
        FailureType::Expected => info(component, Some(city), &message),
        FailureType::Unexpected => error(component, Some(city), &message),
        FailureType::Unknown => warn(component, Some(city), &message),
    }
}

/// Log the end of a search cycle
pub fn log_search_summary(city: &str, succeeded: bool, elapsed_ms: u128) {
    if succeeded {
        info(Component::Ui, Some(city), &format!("search complete in {} ms", elapsed_ms));
    } else {
        warn(Component::Ui, Some(city), &format!("search failed after {} ms", elapsed_ms));
    }
}
