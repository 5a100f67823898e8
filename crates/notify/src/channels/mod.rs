//! Notification channel implementations.

pub mod chat;

use async_trait::async_trait;

use crate::error::ChannelError;

/// Trait for notification channels.
#[async_trait]
pub trait NotifyChannel: Send + Sync {
    /// Get the name of this channel.
    fn name(&self) -> &'static str;

    /// Check if this channel is enabled/configured.
    fn enabled(&self) -> bool;

    /// Send a rendered notification message to this channel.
    async fn send(&self, message: &str) -> Result<(), ChannelError>;
}
