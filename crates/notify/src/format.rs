//! Rendering of alerts into chat notification text.

use chrono::{DateTime, Utc};
use std::fmt::Write;

use crate::alert::{ErrorAlert, Severity};

/// Maximum stack trace length included in a notification.
const STACK_TRACE_LIMIT: usize = 200;

/// Render an alert into the human-readable notification message.
///
/// `received_at` is used as the displayed timestamp when the alert carries
/// none of its own.
#[must_use]
pub fn render_notification(alert: &ErrorAlert, received_at: DateTime<Utc>) -> String {
    let timestamp = alert
        .timestamp
        .clone()
        .unwrap_or_else(|| received_at.to_rfc3339());

    let glyph = Severity::parse(&alert.severity).glyph();

    let mut message = format!(
        "{glyph} **Production Error Alert**\n\n\
         **Service:** {}\n\
         **Error:** {}\n\
         **Message:** {}\n\
         **Severity:** {}\n\
         **Time:** {timestamp}\n\
         **Environment:** {}",
        alert.service, alert.error_type, alert.message, alert.severity, alert.environment
    );

    if let Some(users) = alert.affected_users {
        if users > 0 {
            let _ = write!(message, "\n**Affected Users:** ~{users}");
        }
    }

    if let Some(trace) = &alert.stack_trace {
        let truncated = truncate_trace(trace);
        let _ = write!(message, "\n**Stack Trace:** ```{truncated}```");
    }

    if let Some(logs) = &alert.recent_logs {
        if !logs.is_empty() {
            let _ = write!(message, "\n**Recent Logs:** {} entries available", logs.len());
        }
    }

    message.push_str("\n\n💬 *Type `/ask <question>` to investigate this error*");
    message
}

/// Truncate long stack traces for chat, appending an ellipsis marker.
fn truncate_trace(trace: &str) -> String {
    if trace.chars().count() > STACK_TRACE_LIMIT {
        let head: String = trace.chars().take(STACK_TRACE_LIMIT).collect();
        format!("{head}...")
    } else {
        trace.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn alert() -> ErrorAlert {
        ErrorAlert {
            service: "user-auth".to_string(),
            error_type: "DatabaseTimeout".to_string(),
            message: "connection pool exhausted".to_string(),
            timestamp: None,
            stack_trace: None,
            affected_users: None,
            severity: "CRITICAL".to_string(),
            recent_logs: None,
            environment: "production".to_string(),
        }
    }

    #[test]
    fn critical_alert_uses_critical_glyph() {
        let text = render_notification(&alert(), Utc::now());
        assert!(text.starts_with("🚨"));
        assert!(text.contains("**Service:** user-auth"));
        assert!(text.contains("**Severity:** CRITICAL"));
    }

    #[test]
    fn sections_are_omitted_when_absent() {
        let text = render_notification(&alert(), Utc::now());
        assert!(!text.contains("Affected Users"));
        assert!(!text.contains("Stack Trace"));
        assert!(!text.contains("Recent Logs"));
    }

    #[test]
    fn zero_affected_users_is_omitted() {
        let mut a = alert();
        a.affected_users = Some(0);
        let text = render_notification(&a, Utc::now());
        assert!(!text.contains("Affected Users"));

        a.affected_users = Some(500);
        let text = render_notification(&a, Utc::now());
        assert!(text.contains("**Affected Users:** ~500"));
    }

    #[test]
    fn long_stack_trace_is_truncated_with_marker() {
        let mut a = alert();
        a.stack_trace = Some("x".repeat(300));
        let text = render_notification(&a, Utc::now());
        assert!(text.contains("Stack Trace"));
        assert!(text.contains(&format!("{}...", "x".repeat(200))));
        assert!(!text.contains(&"x".repeat(201)));
    }

    #[test]
    fn short_stack_trace_is_kept_verbatim() {
        let mut a = alert();
        a.stack_trace = Some("at main.rs:10".to_string());
        let text = render_notification(&a, Utc::now());
        assert!(text.contains("```at main.rs:10```"));
        assert!(!text.contains("..."));
    }

    #[test]
    fn recent_logs_surface_only_the_count() {
        let mut a = alert();
        a.recent_logs = Some(vec![json!({"line": "boom"}), json!({"line": "bang"})]);
        let text = render_notification(&a, Utc::now());
        assert!(text.contains("**Recent Logs:** 2 entries available"));
        assert!(!text.contains("boom"));
    }

    #[test]
    fn empty_recent_logs_list_is_omitted() {
        let mut a = alert();
        a.recent_logs = Some(vec![]);
        let text = render_notification(&a, Utc::now());
        assert!(!text.contains("Recent Logs"));
    }

    #[test]
    fn explicit_timestamp_is_preferred() {
        let mut a = alert();
        a.timestamp = Some("2026-08-01T12:00:00+00:00".to_string());
        let text = render_notification(&a, Utc::now());
        assert!(text.contains("**Time:** 2026-08-01T12:00:00+00:00"));
    }
}
