//! Inbound alert types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A structured error alert describing one production incident.
///
/// Received once over HTTP and never mutated; the persisted copy is a
/// projection built by the gateway when it writes to the log store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorAlert {
    /// Name of the service that produced the error.
    pub service: String,
    /// Error classification (exception class, policy name, ...).
    pub error_type: String,
    /// Free-text error message.
    pub message: String,
    /// ISO-8601 timestamp; ingestion time is used when absent.
    #[serde(default)]
    pub timestamp: Option<String>,
    /// Optional stack trace; truncated for chat display.
    #[serde(default)]
    pub stack_trace: Option<String>,
    /// Approximate number of affected users.
    #[serde(default)]
    pub affected_users: Option<u64>,
    /// Severity label (LOW/MEDIUM/HIGH/CRITICAL, anything else is unknown).
    #[serde(default = "default_severity")]
    pub severity: String,
    /// Recent log entries attached to the alert; only the count is surfaced
    /// in notifications.
    #[serde(default)]
    pub recent_logs: Option<Vec<Value>>,
    /// Deployment environment the error came from.
    #[serde(default = "default_environment")]
    pub environment: String,
}

fn default_severity() -> String {
    "MEDIUM".to_string()
}

fn default_environment() -> String {
    "production".to_string()
}

/// Severity levels recognized in alert payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
    /// Anything that is not one of the four known labels.
    Unknown,
}

impl Severity {
    /// Parse a severity label case-insensitively. Unrecognized labels map to
    /// [`Severity::Unknown`] rather than failing.
    #[must_use]
    pub fn parse(label: &str) -> Self {
        match label.to_ascii_uppercase().as_str() {
            "LOW" => Self::Low,
            "MEDIUM" => Self::Medium,
            "HIGH" => Self::High,
            "CRITICAL" => Self::Critical,
            _ => Self::Unknown,
        }
    }

    /// Indicator glyph used as the notification header.
    #[must_use]
    pub const fn glyph(&self) -> &'static str {
        match self {
            Self::Low => "🟡",
            Self::Medium => "🟠",
            Self::High => "🔴",
            Self::Critical => "🚨",
            Self::Unknown => "⚪",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_parse_is_case_insensitive() {
        assert_eq!(Severity::parse("critical"), Severity::Critical);
        assert_eq!(Severity::parse("High"), Severity::High);
        assert_eq!(Severity::parse("LOW"), Severity::Low);
    }

    #[test]
    fn unrecognized_severity_maps_to_unknown() {
        assert_eq!(Severity::parse("SEV1"), Severity::Unknown);
        assert_eq!(Severity::parse(""), Severity::Unknown);
        assert_eq!(Severity::Unknown.glyph(), "⚪");
    }

    #[test]
    fn alert_deserializes_with_defaults() {
        let alert: ErrorAlert = serde_json::from_str(
            r#"{"service": "auth", "error_type": "Timeout", "message": "upstream timed out"}"#,
        )
        .unwrap();
        assert_eq!(alert.severity, "MEDIUM");
        assert_eq!(alert.environment, "production");
        assert!(alert.timestamp.is_none());
        assert!(alert.affected_users.is_none());
    }
}
