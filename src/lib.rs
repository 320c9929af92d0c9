//! GitLab Relay - turns GitLab webhook events into chat notifications.
//!
//! This library provides the event types, the subscription model and the pure
//! translators that decide who hears about an event. Delivery to a chat host
//! goes through the [`delivery::Delivery`] trait.

pub mod config;
pub mod delivery;
pub mod intent;
pub mod mentions;
pub mod routing;
pub mod subscription;
pub mod types;
pub mod webhooks;

#[cfg(test)]
mod test_utils;
