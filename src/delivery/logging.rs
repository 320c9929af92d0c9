//! A [`Delivery`] that writes every post to the log.

use std::collections::HashSet;
use std::convert::Infallible;

use tracing::info;

use super::Delivery;
use crate::types::ChannelId;

/// Logs posts instead of sending them. Used by the binary for dry runs.
#[derive(Debug, Clone, Default)]
pub struct LoggingDelivery {
    muted: HashSet<String>,
}

impl LoggingDelivery {
    pub fn new() -> Self {
        LoggingDelivery::default()
    }

    /// Treats `username` as having notifications turned off.
    pub fn with_muted(mut self, username: impl Into<String>) -> Self {
        self.muted.insert(username.into());
        self
    }
}

impl Delivery for LoggingDelivery {
    type Error = Infallible;

    async fn notifications_enabled(&self, username: &str) -> bool {
        !self.muted.contains(username)
    }

    async fn post_direct(&self, from: &str, to: &str, message: &str) -> Result<(), Infallible> {
        info!(from = %from, to = %to, message = %message, "direct message");
        Ok(())
    }

    async fn post_channel(&self, channel: &ChannelId, message: &str) -> Result<(), Infallible> {
        info!(channel = %channel, message = %message, "channel post");
        Ok(())
    }

    async fn refresh(&self, username: &str) -> Result<(), Infallible> {
        info!(username = %username, "refresh");
        Ok(())
    }
}
