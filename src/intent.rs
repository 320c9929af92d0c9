//! Notification intents and the assembly rules shared by every translator.
//!
//! An intent describes a message and who should receive it: a list of users
//! for direct messages, a list of channels for broadcasts. Translators build
//! intents freely and then pass the whole batch through [`assemble`], which
//! applies the same cleanup everywhere.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::types::ChannelId;

/// One message and its recipients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationIntent {
    /// Rendered markdown.
    pub message: String,

    /// Username of the user whose action caused this notification.
    ///
    /// Empty for system notifications with no human author.
    pub from: String,

    /// Direct-message recipients, in order.
    pub to_users: Vec<String>,

    /// Broadcast channels, in order.
    pub to_channels: Vec<ChannelId>,
}

impl NotificationIntent {
    /// Creates a direct-message intent.
    pub fn direct(
        from: impl Into<String>,
        to_users: Vec<String>,
        message: impl Into<String>,
    ) -> Self {
        NotificationIntent {
            message: message.into(),
            from: from.into(),
            to_users,
            to_channels: Vec::new(),
        }
    }

    /// Creates a channel broadcast intent.
    pub fn broadcast(
        from: impl Into<String>,
        to_channels: Vec<ChannelId>,
        message: impl Into<String>,
    ) -> Self {
        NotificationIntent {
            message: message.into(),
            from: from.into(),
            to_users: Vec::new(),
            to_channels,
        }
    }

    /// Returns true if the intent has no recipient of either kind.
    pub fn is_unaddressed(&self) -> bool {
        self.to_users.is_empty() && self.to_channels.is_empty()
    }

    /// Returns true if the only recipient is the sender.
    pub fn is_self_notification(&self) -> bool {
        self.to_channels.is_empty() && self.to_users.len() == 1 && self.to_users[0] == self.from
    }
}

/// Applies the assembly rules to a translator's complete output.
///
/// In order:
/// 1. Empty usernames (unresolved identities) are removed from `to_users`
/// 2. Repeated users and channels within one intent are removed, first wins
/// 3. Intents left without any recipient are dropped
/// 4. Intents whose only recipient is their sender are dropped
///
/// Runs over the concatenation of all phases, so each intent is judged on its
/// own recipients.
pub fn assemble(intents: Vec<NotificationIntent>) -> Vec<NotificationIntent> {
    intents
        .into_iter()
        .map(|mut intent| {
            intent.to_users.retain(|user| !user.is_empty());
            dedup_in_order(&mut intent.to_users);
            dedup_in_order(&mut intent.to_channels);
            intent
        })
        .filter(|intent| !intent.is_unaddressed() && !intent.is_self_notification())
        .collect()
}

/// Returns every distinct non-empty username touched by the batch.
///
/// For each intent the sender comes first, then its recipients. Order is
/// first touch across the batch. The delivery layer sends one refresh signal
/// per entry.
pub fn touched_identities(intents: &[NotificationIntent]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut identities = Vec::new();
    for intent in intents {
        let users = std::iter::once(&intent.from).chain(intent.to_users.iter());
        for user in users {
            if !user.is_empty() && seen.insert(user.as_str()) {
                identities.push(user.clone());
            }
        }
    }
    identities
}

fn dedup_in_order<T: Clone + Eq + std::hash::Hash>(items: &mut Vec<T>) {
    let mut seen = HashSet::new();
    items.retain(|item| seen.insert(item.clone()));
}
