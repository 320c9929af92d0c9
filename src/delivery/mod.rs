//! Delivery of notification intents to a chat host.
//!
//! Translators only describe notifications. Delivering them is the host's job,
//! expressed through the [`Delivery`] trait. [`deliver_batch`] applies the
//! fan-out rules shared by every host: one direct message per recipient, one
//! post per channel, then one refresh per identity the batch touched.

mod logging;

use std::fmt;
use std::future::Future;

use tracing::{debug, warn};

use crate::intent::{NotificationIntent, touched_identities};
use crate::types::ChannelId;

pub use logging::LoggingDelivery;

/// Sends messages through a chat host.
///
/// # Example (mock for testing)
///
/// ```ignore
/// struct DropAll;
///
/// impl Delivery for DropAll {
///     type Error = std::convert::Infallible;
///
///     async fn notifications_enabled(&self, _username: &str) -> bool {
///         false
///     }
///
///     async fn post_direct(&self, _from: &str, _to: &str, _msg: &str) -> Result<(), Self::Error> {
///         Ok(())
///     }
///
///     async fn post_channel(&self, _channel: &ChannelId, _msg: &str) -> Result<(), Self::Error> {
///         Ok(())
///     }
///
///     async fn refresh(&self, _username: &str) -> Result<(), Self::Error> {
///         Ok(())
///     }
/// }
/// ```
pub trait Delivery {
    /// The error type returned by this host.
    type Error: fmt::Display;

    /// Returns true if `username` wants direct-message notifications.
    fn notifications_enabled(&self, username: &str) -> impl Future<Output = bool> + Send;

    /// Sends a direct message from the bot to `to`, on behalf of `from`.
    ///
    /// `from` is empty for system notifications.
    fn post_direct(
        &self,
        from: &str,
        to: &str,
        message: &str,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Posts a message in a channel.
    fn post_channel(
        &self,
        channel: &ChannelId,
        message: &str,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Tells the host that a user's GitLab state may have changed.
    fn refresh(&self, username: &str) -> impl Future<Output = Result<(), Self::Error>> + Send;
}

/// Counts of what a batch delivery did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    pub direct_sent: usize,
    /// Recipients skipped because they turned notifications off.
    pub direct_skipped: usize,
    pub channel_posts: usize,
    pub refreshed: usize,
    pub failures: usize,
}

/// Delivers a batch of assembled intents.
///
/// Failures are logged and counted; they never stop the rest of the batch.
pub async fn deliver_batch<D: Delivery>(
    delivery: &D,
    intents: &[NotificationIntent],
) -> DeliveryReport {
    let mut report = DeliveryReport::default();

    for intent in intents {
        for to in &intent.to_users {
            if to == &intent.from {
                continue;
            }
            if !delivery.notifications_enabled(to).await {
                debug!(to = %to, "notifications disabled, skipping direct message");
                report.direct_skipped += 1;
                continue;
            }
            match delivery.post_direct(&intent.from, to, &intent.message).await {
                Ok(()) => report.direct_sent += 1,
                Err(e) => {
                    warn!(from = %intent.from, to = %to, error = %e, "direct message failed");
                    report.failures += 1;
                }
            }
        }

        for channel in &intent.to_channels {
            match delivery.post_channel(channel, &intent.message).await {
                Ok(()) => report.channel_posts += 1,
                Err(e) => {
                    warn!(channel = %channel, error = %e, "channel post failed");
                    report.failures += 1;
                }
            }
        }
    }

    for username in touched_identities(intents) {
        match delivery.refresh(&username).await {
            Ok(()) => report.refreshed += 1,
            Err(e) => {
                warn!(username = %username, error = %e, "refresh failed");
                report.failures += 1;
            }
        }
    }

    debug!(
        intents = intents.len(),
        direct_sent = report.direct_sent,
        channel_posts = report.channel_posts,
        failures = report.failures,
        "delivered batch"
    );

    report
}
