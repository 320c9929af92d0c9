//! The routing contract translators use to reach identity and subscription data.
//!
//! Translators are pure: everything they need from the host system goes
//! through [`Router`]. The host implements it over its own user directory and
//! subscription store; [`StaticRouter`] is an in-memory implementation used by
//! the binary and the tests.
//!
//! # Example (test double)
//!
//! ```ignore
//! struct FixedRouter {
//!     subscriptions: Vec<Subscription>,
//! }
//!
//! impl Router for FixedRouter {
//!     fn user_profile_url(&self, username: &str) -> String {
//!         format!("https://gitlab.example.com/{}", username)
//!     }
//!
//!     fn username_by_id(&self, _id: u64) -> String {
//!         String::new()
//!     }
//!
//!     fn subscriptions_for(&self, _ns: &str, _project: &str, _public: bool) -> Vec<Subscription> {
//!         self.subscriptions.clone()
//!     }
//! }
//! ```

mod static_router;

use std::collections::HashSet;

use crate::mentions;
use crate::subscription::Subscription;
use crate::types::ChannelId;

pub use static_router::StaticRouter;

/// Identity and subscription lookups available to translators.
pub trait Router {
    /// Returns the profile URL for a username.
    ///
    /// Never fails; without configuration the URL is a best guess.
    fn user_profile_url(&self, username: &str) -> String;

    /// Resolves a numeric GitLab user id to a username.
    ///
    /// Returns an empty string when the user is unknown. Empty recipients are
    /// removed during intent assembly.
    fn username_by_id(&self, id: u64) -> String;

    /// Extracts `@username` mentions from free text.
    fn extract_mentions(&self, text: &str) -> Vec<String> {
        mentions::extract_mentions(text)
    }

    /// Returns project-level then namespace-level subscriptions for a project.
    ///
    /// Results are concatenated as-is, so a channel subscribed at both levels
    /// appears twice. Visibility checks for private projects are the caller's
    /// responsibility and happen before translation.
    fn subscriptions_for(&self, namespace: &str, project: &str, is_public: bool)
    -> Vec<Subscription>;
}

/// Collects the channels of every subscription that passes `gate`.
///
/// This is the point where a channel subscribed at both project and namespace
/// level is collapsed: each channel appears once, at its first position.
pub fn subscribed_channels<F>(subscriptions: &[Subscription], gate: F) -> Vec<ChannelId>
where
    F: Fn(&Subscription) -> bool,
{
    let mut seen = HashSet::new();
    subscriptions
        .iter()
        .filter(|&sub| gate(sub))
        .filter(|&sub| seen.insert(&sub.channel_id))
        .map(|sub| sub.channel_id.clone())
        .collect()
}
