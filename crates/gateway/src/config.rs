//! Environment-derived service configuration.
//!
//! All settings are read once at startup and never mutated. Presence of
//! `GOOGLE_CLOUD_PROJECT` gates the store and the answering model; absence
//! degrades those features instead of failing.

/// Default lookback window for `/ask` queries, in days.
const DEFAULT_SINCE_DAYS: i64 = 7;

/// Default cap on rows fetched per `/ask` query.
const DEFAULT_MAX_ROWS: u32 = 200;

/// Runtime configuration for the relay.
#[derive(Debug, Clone)]
pub struct Config {
    /// Shared secret for inbound chat events; empty disables the check.
    pub verify_token: String,
    /// Outbound chat webhook URL; empty disables notifications.
    pub chat_webhook_url: String,
    /// Cloud project; gates the BigQuery store and the Vertex model.
    pub project: Option<String>,
    /// OAuth bearer token for Google APIs.
    pub access_token: Option<String>,
    /// Vertex model location.
    pub vertex_location: String,
    /// Vertex model name.
    pub vertex_model: String,
    /// BigQuery dataset holding the alerts table.
    pub bq_dataset: String,
    /// BigQuery table name.
    pub bq_table: String,
    /// Default `/ask` lookback window in days.
    pub ask_default_since_days: i64,
    /// Maximum rows fetched per `/ask` query.
    pub ask_max_rows: u32,
    /// Timestamp column name in the alerts table.
    pub ask_ts_column: String,
    /// Service column name in the alerts table.
    pub ask_service_column: String,
    /// BigQuery endpoint override (emulators, tests).
    pub bigquery_base_url: Option<String>,
    /// Vertex endpoint override (tests).
    pub vertex_base_url: Option<String>,
    /// Listen port.
    pub port: u16,
}

impl Config {
    /// Read configuration from process environment, applying defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            verify_token: env_or("VERIFY_TOKEN", ""),
            chat_webhook_url: env_or("CHAT_WEBHOOK_URL", ""),
            project: std::env::var("GOOGLE_CLOUD_PROJECT").ok(),
            access_token: std::env::var("GOOGLE_ACCESS_TOKEN").ok(),
            vertex_location: env_or("VERTEX_LOCATION", "us-central1"),
            vertex_model: env_or("VERTEX_MODEL", "gemini-2.5-pro"),
            bq_dataset: env_or("BQ_DATASET", "chat_alerts"),
            bq_table: env_or("BQ_TABLE", "alerts"),
            ask_default_since_days: parsed_env("ASK_DEFAULT_SINCE_DAYS", DEFAULT_SINCE_DAYS),
            ask_max_rows: parsed_env("ASK_MAX_ROWS", DEFAULT_MAX_ROWS),
            ask_ts_column: env_or("ASK_TS_COLUMN", "ts"),
            ask_service_column: env_or("ASK_SERVICE_COLUMN", "service"),
            bigquery_base_url: std::env::var("BIGQUERY_BASE_URL").ok(),
            vertex_base_url: std::env::var("VERTEX_BASE_URL").ok(),
            port: parsed_env("PORT", 8080),
        }
    }

    /// Config with all collaborators disabled (tests).
    #[cfg(test)]
    #[must_use]
    pub fn bare() -> Self {
        Self {
            verify_token: String::new(),
            chat_webhook_url: String::new(),
            project: None,
            access_token: None,
            vertex_location: "us-central1".to_string(),
            vertex_model: "gemini-2.5-pro".to_string(),
            bq_dataset: "chat_alerts".to_string(),
            bq_table: "alerts".to_string(),
            ask_default_since_days: DEFAULT_SINCE_DAYS,
            ask_max_rows: DEFAULT_MAX_ROWS,
            ask_ts_column: "ts".to_string(),
            ask_service_column: "service".to_string(),
            bigquery_base_url: None,
            vertex_base_url: None,
            port: 8080,
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parsed_env<T: std::str::FromStr + Copy>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
