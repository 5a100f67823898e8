//! Alert ingestion: notify the chat channel, persist the stored projection.

use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use ask::LogRow;
use notify::{render_notification, ErrorAlert};

use crate::state::AppState;

/// Outcome of one ingestion: both legs are attempted independently and
/// reported as booleans, never as errors.
#[derive(Debug, Clone, Copy)]
pub struct IngestOutcome {
    pub notification_sent: bool,
    pub stored: bool,
}

/// Process one inbound alert: format and send the notification, then
/// persist the stored row. Failure of either leg never prevents the other.
pub async fn ingest_alert(state: &AppState, alert: &ErrorAlert) -> IngestOutcome {
    let received_at = Utc::now();
    info!(service = %alert.service, severity = %alert.severity, "Received alert");

    let message = render_notification(alert, received_at);
    let notification_sent = state.notifier.send(&message).await;
    debug!(notification_sent, "Notification attempted");

    let stored = match &state.store {
        Some(store) => match store.append(&stored_row(alert, received_at)).await {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "Failed to store alert");
                false
            }
        },
        None => {
            debug!("No store configured, skipping alert persistence");
            false
        }
    };

    IngestOutcome {
        notification_sent,
        stored,
    }
}

/// The persisted projection of an alert. Field mapping is fixed:
/// `error_type` doubles as the policy label, `message` becomes the summary,
/// and every row starts in the `open` state.
fn stored_row(alert: &ErrorAlert, received_at: DateTime<Utc>) -> LogRow {
    let ts = alert
        .timestamp
        .clone()
        .unwrap_or_else(|| received_at.to_rfc3339());

    let mut row = LogRow::new();
    row.insert("ts".to_string(), json!(ts));
    row.insert("service".to_string(), json!(alert.service));
    row.insert("policy".to_string(), json!(alert.error_type));
    row.insert("state".to_string(), json!("open"));
    row.insert("summary".to_string(), json!(alert.message));
    row.insert("severity".to_string(), json!(alert.severity));
    row.insert("error_type".to_string(), json!(alert.error_type));
    row.insert("resource".to_string(), json!(alert.service));
    row.insert("url".to_string(), Value::Null);
    row
}
