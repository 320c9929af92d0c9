//! Shared test fixtures and arbitrary generators for property-based testing.

use proptest::prelude::*;

use crate::config::RelayConfig;
use crate::routing::{Router, StaticRouter};
use crate::subscription::Subscription;
use crate::types::ChannelId;
use crate::webhooks::events::{
    IssueAction, IssueEvent, MergeRequestAction, MergeRequestEvent, MergeRequestState, Project,
    User, Visibility,
};

pub const GITLAB_URL: &str = "https://gitlab.example.com";

pub const ROOT_ID: u64 = 1;
pub const MANLAND_ID: u64 = 2;
pub const ALICE_ID: u64 = 3;
pub const BOB_ID: u64 = 4;

/// A [`StaticRouter`] preloaded with four users, subscribing on `owner/repo`.
pub struct TestRouter {
    inner: StaticRouter,
}

impl TestRouter {
    pub fn new() -> Self {
        TestRouter {
            inner: StaticRouter::new(RelayConfig::new(GITLAB_URL))
                .with_user(ROOT_ID, "root")
                .with_user(MANLAND_ID, "manland")
                .with_user(ALICE_ID, "alice")
                .with_user(BOB_ID, "bob"),
        }
    }

    /// Subscribes `channel` to `owner/repo`.
    pub fn subscribe(self, channel: &str, features: &str) -> Self {
        self.subscribe_at(channel, features, "owner/repo")
    }

    pub fn subscribe_at(self, channel: &str, features: &str, repository: &str) -> Self {
        let sub = Subscription::new(channel, "creator", features, repository).unwrap();
        TestRouter {
            inner: self.inner.with_subscription(sub),
        }
    }
}

impl Router for TestRouter {
    fn user_profile_url(&self, username: &str) -> String {
        self.inner.user_profile_url(username)
    }

    fn username_by_id(&self, id: u64) -> String {
        self.inner.username_by_id(id)
    }

    fn subscriptions_for(
        &self,
        namespace: &str,
        project: &str,
        is_public: bool,
    ) -> Vec<Subscription> {
        self.inner.subscriptions_for(namespace, project, is_public)
    }
}

pub fn channel(id: &str) -> ChannelId {
    ChannelId::new(id)
}

pub fn user(id: u64, username: &str) -> User {
    User::new(id, username)
}

pub fn project() -> Project {
    Project {
        id: 42,
        path_with_namespace: "owner/repo".to_string(),
        web_url: format!("{}/owner/repo", GITLAB_URL),
        visibility: Visibility::Public,
    }
}

/// An issue authored by `root`, acted on by `root`.
pub fn issue_event(action: IssueAction) -> IssueEvent {
    IssueEvent {
        user: user(ROOT_ID, "root"),
        project: project(),
        action,
        iid: 12,
        title: "Crash on startup".to_string(),
        description: "It crashes.".to_string(),
        url: format!("{}/owner/repo/-/issues/12", GITLAB_URL),
        author_id: ROOT_ID,
        assignees: Vec::new(),
        labels: Vec::new(),
        label_changes: None,
        confidential: false,
    }
}

/// A merge request authored by `root`, acted on by `root`.
pub fn merge_request_event(
    action: MergeRequestAction,
    state: MergeRequestState,
) -> MergeRequestEvent {
    MergeRequestEvent {
        user: user(ROOT_ID, "root"),
        project: project(),
        action,
        state,
        iid: 4,
        title: "Add retries".to_string(),
        description: String::new(),
        url: format!("{}/owner/repo/-/merge_requests/4", GITLAB_URL),
        author_id: ROOT_ID,
        assignee_id: None,
        reviewers: Vec::new(),
        labels: Vec::new(),
    }
}

pub fn arb_labels() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(prop_oneof![Just("bug"), Just("feature"), Just("docs")], 0..3)
        .prop_map(|labels| labels.into_iter().map(String::from).collect())
}
