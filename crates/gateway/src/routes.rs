//! HTTP surface: liveness, alert ingestion, chat command routing.

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use ask::parse_filters;
use notify::ErrorAlert;

use crate::events::ChatEvent;
use crate::ingest::ingest_alert;
use crate::state::AppState;

/// Liveness response for `GET /`.
const LIVENESS_TEXT: &str = "Alert Relay - OK";

/// Header carrying the chat verification token.
const CHAT_TOKEN_HEADER: &str = "X-Goog-Chat-Token";

const SLASH_USAGE: &str = "Usage: `/ask <question> [service:... since:N]`\n\
     Example: `/ask why is auth failing? service:user-auth since:1`";

const MENTION_USAGE: &str = "Usage: `@Alert Relay <question>` or `/ask <question>`\n\
     Example: `@Alert Relay why is auth failing?`";

const GREETING: &str = "Hey! I monitor production errors and can answer questions.\n\
     Type `/ask <question>` or mention me with `@Alert Relay <question>`.";

const FALLBACK_HELP: &str =
    "I monitor production errors. Type `/ask <question>` or mention me to investigate.";

/// Build the service router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/alert", post(receive_alert))
        .route("/chat", post(chat))
        .with_state(state)
}

/// Response body for `POST /alert`.
#[derive(Debug, Serialize)]
struct AlertResponse {
    status: &'static str,
    service: String,
    notification_sent: bool,
    bigquery_stored: bool,
    timestamp: String,
}

/// Response body for `POST /chat`.
#[derive(Debug, Serialize)]
struct ChatResponse {
    text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    thread: Option<Thread>,
}

#[derive(Debug, Serialize)]
struct Thread {
    name: String,
}

impl ChatResponse {
    fn text_only(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            thread: None,
        }
    }

    fn threaded(text: String, thread: Option<String>) -> Self {
        Self {
            text,
            thread: thread.map(|name| Thread { name }),
        }
    }
}

async fn health() -> &'static str {
    LIVENESS_TEXT
}

async fn receive_alert(
    State(state): State<AppState>,
    Json(alert): Json<ErrorAlert>,
) -> Json<AlertResponse> {
    let outcome = ingest_alert(&state, &alert).await;

    Json(AlertResponse {
        status: "processed",
        service: alert.service,
        notification_sent: outcome.notification_sent,
        bigquery_stored: outcome.stored,
        timestamp: Utc::now().to_rfc3339(),
    })
}

async fn chat(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(event): Json<Value>,
) -> Response {
    if !token_accepted(&state, &headers, &event) {
        return (StatusCode::UNAUTHORIZED, "Bad token").into_response();
    }

    let reply = match ChatEvent::classify(&event) {
        ChatEvent::AppCommand { text, thread } => {
            debug!("Processing slash command");
            if text.is_empty() {
                ChatResponse::text_only(SLASH_USAGE)
            } else {
                ChatResponse::threaded(answer_question(&state, &text).await, thread)
            }
        }
        ChatEvent::Mention { text, thread } => {
            debug!("Processing mention/message");
            if text.is_empty() {
                ChatResponse::text_only(MENTION_USAGE)
            } else {
                ChatResponse::threaded(answer_question(&state, &text).await, thread)
            }
        }
        ChatEvent::AddedToSpace => ChatResponse::text_only(GREETING),
        ChatEvent::Message { text, thread } => {
            if text.is_empty() {
                ChatResponse::text_only(SLASH_USAGE)
            } else {
                ChatResponse::threaded(answer_question(&state, &text).await, thread)
            }
        }
        ChatEvent::Unknown => {
            debug!("No matching event shape, sending default response");
            ChatResponse::text_only(FALLBACK_HELP)
        }
    };

    Json(reply).into_response()
}

/// Shared-secret check for inbound chat events. Inactive when no token is
/// configured; otherwise the header or the legacy body `token` must match.
fn token_accepted(state: &AppState, headers: &HeaderMap, event: &Value) -> bool {
    let expected = &state.config.verify_token;
    if expected.is_empty() {
        return true;
    }

    let header_token = headers.get(CHAT_TOKEN_HEADER).and_then(|v| v.to_str().ok());
    let body_token = event.get("token").and_then(Value::as_str);

    header_token == Some(expected.as_str()) || body_token == Some(expected.as_str())
}

/// Run the parse → fetch → compose pipeline for one question.
async fn answer_question(state: &AppState, text: &str) -> String {
    let command = parse_filters(text, state.config.ask_default_since_days);
    debug!(
        question = %command.question,
        service = ?command.service,
        since_days = command.since_days,
        "Parsed ask command"
    );

    let rows = state
        .fetcher
        .fetch(command.service.as_deref(), command.since_days)
        .await;
    info!(rows = rows.len(), "Fetched context for question");

    let answer = state.composer.compose(&command.question, &rows).await;

    let mut reply = format!("**Q:** {}\n**A:** {answer}", command.question);
    if !rows.is_empty() {
        reply.push_str(&format!("\n\n*Based on {} recent alerts*", rows.len()));
    }
    reply
}
