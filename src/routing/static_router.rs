//! In-memory [`Router`] backed by fixed tables.

use std::collections::HashMap;

use crate::config::RelayConfig;
use crate::subscription::Subscription;
use crate::types::ProjectPath;

use super::Router;

/// A router over a fixed user table and subscription list.
///
/// No authorization is performed: private-project events see the same
/// subscriptions as public ones.
#[derive(Debug, Clone, Default)]
pub struct StaticRouter {
    config: RelayConfig,
    users: HashMap<u64, String>,
    subscriptions: Vec<Subscription>,
}

impl StaticRouter {
    pub fn new(config: RelayConfig) -> Self {
        StaticRouter {
            config,
            users: HashMap::new(),
            subscriptions: Vec::new(),
        }
    }

    /// Adds or replaces a numeric id to username mapping.
    pub fn with_user(mut self, id: u64, username: impl Into<String>) -> Self {
        self.users.insert(id, username.into());
        self
    }

    pub fn with_users(mut self, users: impl IntoIterator<Item = (u64, String)>) -> Self {
        self.users.extend(users);
        self
    }

    /// Adds a subscription, replacing any existing one for the same
    /// repository and channel.
    pub fn with_subscription(mut self, subscription: Subscription) -> Self {
        self.upsert(subscription);
        self
    }

    pub fn with_subscriptions(
        mut self,
        subscriptions: impl IntoIterator<Item = Subscription>,
    ) -> Self {
        for subscription in subscriptions {
            self.upsert(subscription);
        }
        self
    }

    pub fn subscriptions(&self) -> &[Subscription] {
        &self.subscriptions
    }

    fn upsert(&mut self, subscription: Subscription) {
        match self.subscriptions.iter_mut().find(|existing| {
            existing.repository == subscription.repository
                && existing.channel_id == subscription.channel_id
        }) {
            Some(existing) => *existing = subscription,
            None => self.subscriptions.push(subscription),
        }
    }

    fn subscriptions_at(&self, key: &str) -> impl Iterator<Item = &Subscription> {
        self.subscriptions
            .iter()
            .filter(move |sub| sub.repository == key)
    }
}

impl Router for StaticRouter {
    fn user_profile_url(&self, username: &str) -> String {
        self.config.user_profile_url(username)
    }

    fn username_by_id(&self, id: u64) -> String {
        self.users.get(&id).cloned().unwrap_or_default()
    }

    fn subscriptions_for(
        &self,
        namespace: &str,
        project: &str,
        _is_public: bool,
    ) -> Vec<Subscription> {
        let path = ProjectPath::new(namespace, project);
        let project_key = path.project_key();
        let namespace_key = path.namespace_key();

        self.subscriptions_at(&project_key)
            .chain(self.subscriptions_at(&namespace_key))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ChannelId;

    fn sub(channel: &str, features: &str, repo: &str) -> Subscription {
        Subscription::new(channel, "creator", features, repo).unwrap()
    }

    fn channels(subs: &[Subscription]) -> Vec<&str> {
        subs.iter().map(|s| s.channel_id.as_str()).collect()
    }

    #[test]
    fn project_then_namespace_subscriptions() {
        let router = StaticRouter::default().with_subscriptions([
            sub("ns-level", "issues", "owner/"),
            sub("project-level", "issues", "owner/repo"),
            sub("other", "issues", "owner/other"),
            sub("other-ns", "issues", "someone/"),
        ]);

        let subs = router.subscriptions_for("owner", "repo", true);
        assert_eq!(channels(&subs), vec!["project-level", "ns-level"]);
    }

    #[test]
    fn same_channel_at_both_levels_returned_twice() {
        let router = StaticRouter::default().with_subscriptions([
            sub("town-square", "issues", "owner/repo"),
            sub("town-square", "merges", "owner/"),
        ]);

        let subs = router.subscriptions_for("owner", "repo", false);
        assert_eq!(channels(&subs), vec!["town-square", "town-square"]);
    }

    #[test]
    fn upsert_replaces_same_repository_and_channel() {
        let router = StaticRouter::default()
            .with_subscription(sub("c", "issues", "owner/repo"))
            .with_subscription(sub("c", "merges", "owner/repo"));

        assert_eq!(router.subscriptions().len(), 1);
        assert!(router.subscriptions()[0].merges());
        assert!(!router.subscriptions()[0].issues());
        assert_eq!(router.subscriptions()[0].channel_id, ChannelId::new("c"));
    }

    #[test]
    fn nested_namespaces_match_exactly() {
        let router = StaticRouter::default().with_subscriptions([
            sub("group", "issues", "group/"),
            sub("subgroup", "issues", "group/sub/"),
        ]);

        let subs = router.subscriptions_for("group/sub", "repo", true);
        assert_eq!(channels(&subs), vec!["subgroup"]);
    }

    #[test]
    fn unknown_user_resolves_to_empty() {
        let router = StaticRouter::default().with_user(1, "root");
        assert_eq!(router.username_by_id(1), "root");
        assert_eq!(router.username_by_id(2), "");
    }

    #[test]
    fn profile_url_uses_config() {
        let router = StaticRouter::new(RelayConfig::new("https://git.example.com"));
        assert_eq!(
            router.user_profile_url("manland"),
            "https://git.example.com/manland"
        );
    }
}
