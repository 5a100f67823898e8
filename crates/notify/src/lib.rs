//! Alert model and chat notification delivery for the alert relay.
//!
//! This crate holds the inbound [`ErrorAlert`] model, the rendering of
//! alerts into chat messages, and delivery over webhook channels.
//!
//! # Usage
//!
//! ```no_run
//! use notify::{render_notification, ChatChannel, Notifier};
//! use std::sync::Arc;
//!
//! # async fn example(alert: notify::ErrorAlert) {
//! let notifier = Notifier::with_channels(vec![Arc::new(ChatChannel::new(
//!     "https://chat.example.com/hook",
//! ))]);
//!
//! let message = render_notification(&alert, chrono::Utc::now());
//! let delivered = notifier.send(&message).await;
//! # let _ = delivered;
//! # }
//! ```
//!
//! # Architecture
//!
//! The channel design is trait-based for extensibility:
//!
//! - [`NotifyChannel`] defines the interface for notification channels
//! - [`ChatChannel`] implements chat webhook delivery
//! - [`Notifier`] dispatches a message to all enabled channels and reports
//!   whether any of them delivered it

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod alert;
pub mod channels;
pub mod error;
pub mod format;

pub use alert::{ErrorAlert, Severity};
pub use channels::chat::ChatChannel;
pub use channels::NotifyChannel;
pub use error::ChannelError;
pub use format::render_notification;

use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Central notification dispatcher.
///
/// Delivery is best-effort: failures are logged and reported as a boolean,
/// never propagated.
pub struct Notifier {
    channels: Vec<Arc<dyn NotifyChannel>>,
    disabled: bool,
}

impl Notifier {
    /// Create a notifier with specific channels. Channels that report
    /// themselves disabled are skipped at send time.
    #[must_use]
    pub fn with_channels(channels: Vec<Arc<dyn NotifyChannel>>) -> Self {
        let enabled = channels.iter().filter(|c| c.enabled()).count();
        if enabled == 0 {
            warn!("No notification channels configured");
        } else {
            info!(channel_count = enabled, "Notification system initialized");
        }

        Self {
            channels,
            disabled: false,
        }
    }

    /// Create a disabled notifier (for testing or when notifications are off).
    #[must_use]
    pub const fn disabled() -> Self {
        Self {
            channels: vec![],
            disabled: true,
        }
    }

    /// Check if any notification channels are enabled.
    #[must_use]
    pub fn has_channels(&self) -> bool {
        !self.disabled && self.channels.iter().any(|c| c.enabled())
    }

    /// Send a message to all enabled channels and wait for the outcome.
    ///
    /// Returns `true` when at least one channel delivered the message.
    pub async fn send(&self, message: &str) -> bool {
        if self.disabled {
            debug!("Notifications disabled, skipping send");
            return false;
        }

        if !self.has_channels() {
            warn!("No notification channel configured, skipping notification");
            return false;
        }

        let mut delivered = false;
        for channel in &self.channels {
            if !channel.enabled() {
                debug!(channel = channel.name(), "Channel disabled, skipping");
                continue;
            }

            match channel.send(message).await {
                Ok(()) => {
                    debug!(channel = channel.name(), "Notification sent");
                    delivered = true;
                }
                Err(e) => {
                    error!(
                        channel = channel.name(),
                        error = %e,
                        "Failed to send notification"
                    );
                }
            }
        }

        delivered
    }
}
