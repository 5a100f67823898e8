//! Chat webhook notification channel.
//!
//! Delivers rendered alert messages to a Google-Chat-style incoming webhook
//! as a single `{"text": ...}` POST.

use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::ChannelError;
use crate::NotifyChannel;

/// Delivery timeout for one webhook POST. Expiry counts as a failed send;
/// there are no retries.
const SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// Chat webhook notification channel.
pub struct ChatChannel {
    webhook_url: Option<String>,
    client: reqwest::Client,
}

/// Webhook payload: the chat API accepts a bare text message.
#[derive(Debug, Serialize)]
struct ChatPayload<'a> {
    text: &'a str,
}

impl ChatChannel {
    /// Create a chat channel for the given webhook URL. An empty URL leaves
    /// the channel disabled.
    #[must_use]
    pub fn new(webhook_url: &str) -> Self {
        let webhook_url = if webhook_url.is_empty() {
            debug!("Chat notifications disabled (no webhook URL)");
            None
        } else {
            debug!("Chat notifications enabled");
            Some(webhook_url.to_string())
        };

        let client = reqwest::Client::builder()
            .timeout(SEND_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            webhook_url,
            client,
        }
    }
}

#[async_trait]
impl NotifyChannel for ChatChannel {
    fn name(&self) -> &'static str {
        "chat"
    }

    fn enabled(&self) -> bool {
        self.webhook_url.is_some()
    }

    async fn send(&self, message: &str) -> Result<(), ChannelError> {
        let webhook_url = self
            .webhook_url
            .as_ref()
            .ok_or_else(|| ChannelError::NotConfigured("CHAT_WEBHOOK_URL".to_string()))?;

        debug!(channel = "chat", "Sending notification");

        let response = self
            .client
            .post(webhook_url)
            .json(&ChatPayload { text: message })
            .send()
            .await?;

        if response.status().is_success() {
            debug!(channel = "chat", "Notification sent successfully");
            Ok(())
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();

            warn!(
                channel = "chat",
                status = %status,
                body = %body,
                "Chat webhook request failed"
            );

            Err(ChannelError::Other(format!(
                "Chat webhook returned {status}: {body}"
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn empty_url_disables_the_channel() {
        let channel = ChatChannel::new("");
        assert!(!channel.enabled());
    }

    #[tokio::test]
    async fn send_without_url_reports_not_configured() {
        let channel = ChatChannel::new("");
        let err = channel.send("hello").await.unwrap_err();
        assert!(matches!(err, ChannelError::NotConfigured(_)));
    }

    #[tokio::test]
    async fn send_posts_text_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/hook"))
            .and(body_json(serde_json::json!({"text": "🚨 alert"})))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let channel = ChatChannel::new(&format!("{}/hook", server.uri()));
        channel.send("🚨 alert").await.unwrap();
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let channel = ChatChannel::new(&server.uri());
        let err = channel.send("hello").await.unwrap_err();
        assert!(err.to_string().contains("500"));
    }
}
