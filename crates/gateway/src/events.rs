//! Inbound chat event decoding.
//!
//! Chat pushes several payload shapes at the same endpoint: the
//! app-command format (`chat.appCommandPayload`), the mention/message
//! format (`chat.messagePayload`), and the legacy flat format keyed by
//! `type`. Rather than probing nested keys throughout the handlers, the
//! body is classified exactly once into this closed set of shapes.

use serde_json::Value;

/// A recognized inbound chat event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEvent {
    /// Slash command (`chat.appCommandPayload`).
    AppCommand {
        text: String,
        thread: Option<String>,
    },
    /// App mention or direct message (`chat.messagePayload`).
    Mention {
        text: String,
        thread: Option<String>,
    },
    /// The app was added to a space.
    AddedToSpace,
    /// Legacy flat message event (`type: "MESSAGE"`).
    Message {
        text: String,
        thread: Option<String>,
    },
    /// Anything else; answered with static help text.
    Unknown,
}

impl ChatEvent {
    /// Classify a raw event body. Total: unrecognized shapes become
    /// [`ChatEvent::Unknown`], never an error.
    #[must_use]
    pub fn classify(event: &Value) -> Self {
        if let Some(payload) = event.get("chat").and_then(|c| c.get("appCommandPayload")) {
            let message = payload.get("message");
            return Self::AppCommand {
                text: argument_text(message),
                thread: thread_name(message),
            };
        }

        if let Some(payload) = event.get("chat").and_then(|c| c.get("messagePayload")) {
            let message = payload.get("message");
            return Self::Mention {
                text: argument_text(message),
                thread: thread_name(message),
            };
        }

        match event.get("type").and_then(Value::as_str) {
            Some("ADDED_TO_SPACE") => Self::AddedToSpace,
            Some("MESSAGE") => {
                let message = event.get("message");
                // Slash commands put user text in argumentText; plain DMs
                // put it in text. An empty argumentText counts as absent.
                let text = message
                    .and_then(|m| m.get("argumentText"))
                    .and_then(Value::as_str)
                    .filter(|t| !t.is_empty())
                    .or_else(|| {
                        message
                            .and_then(|m| m.get("text"))
                            .and_then(Value::as_str)
                    })
                    .unwrap_or_default()
                    .trim()
                    .to_string();
                Self::Message {
                    text,
                    thread: thread_name(message),
                }
            }
            _ => Self::Unknown,
        }
    }
}

fn argument_text(message: Option<&Value>) -> String {
    message
        .and_then(|m| m.get("argumentText"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .trim()
        .to_string()
}

fn thread_name(message: Option<&Value>) -> Option<String> {
    message
        .and_then(|m| m.get("thread"))
        .and_then(|t| t.get("name"))
        .and_then(Value::as_str)
        .map(ToString::to_string)
}
