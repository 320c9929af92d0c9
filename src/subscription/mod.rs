//! Channel subscriptions.
//!
//! A subscription records one channel's interest in one repository path.
//! Project-level subscriptions use `namespace/project`; namespace-level ones use
//! `namespace/` and match every project directly under that namespace.
//!
//! Subscriptions are created and stored outside this crate. Here they are
//! immutable values with predicates the translators use to pick channels.

mod features;

use serde::{Deserialize, Serialize};

use crate::types::{ChannelId, normalize_repository};

pub use features::{Feature, Features, SubscriptionError};

/// One channel's subscription to a repository path.
///
/// Deserialization goes through [`Subscription::new`], so stored values are
/// re-validated and their repository path normalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSubscription")]
pub struct Subscription {
    /// Destination channel for broadcasts.
    pub channel_id: ChannelId,

    /// The user who created the subscription.
    ///
    /// Kept for permission checks on private projects, which happen before
    /// translation.
    pub creator_id: String,

    /// Subscribed event categories plus an optional label filter.
    pub features: Features,

    /// Normalized repository path (`namespace/project` or `namespace/`).
    pub repository: String,
}

/// Wire form of a [`Subscription`] before validation.
#[derive(Deserialize)]
struct RawSubscription {
    channel_id: ChannelId,
    creator_id: String,
    features: String,
    repository: String,
}

impl TryFrom<RawSubscription> for Subscription {
    type Error = SubscriptionError;

    fn try_from(raw: RawSubscription) -> Result<Self, Self::Error> {
        Subscription::new(raw.channel_id, raw.creator_id, &raw.features, &raw.repository)
    }
}

impl Subscription {
    /// Validates `features` and builds a subscription.
    ///
    /// # Errors
    ///
    /// Returns a [`SubscriptionError`] if the feature string contains unknown
    /// tags or an invalid or repeated label predicate.
    pub fn new(
        channel_id: impl Into<ChannelId>,
        creator_id: impl Into<String>,
        features: &str,
        repository: &str,
    ) -> Result<Self, SubscriptionError> {
        Ok(Subscription {
            channel_id: channel_id.into(),
            creator_id: creator_id.into(),
            features: Features::parse(features)?,
            repository: normalize_repository(repository),
        })
    }

    /// Returns true if the subscription covers a whole namespace.
    pub fn is_namespace_level(&self) -> bool {
        self.repository.ends_with('/')
    }

    pub fn has_feature(&self, feature: Feature) -> bool {
        self.features.contains(feature)
    }

    pub fn merges(&self) -> bool {
        self.has_feature(Feature::Merges)
    }

    pub fn jobs(&self) -> bool {
        self.has_feature(Feature::Jobs)
    }

    pub fn issues(&self) -> bool {
        self.has_feature(Feature::Issues)
    }

    pub fn confidential_issues(&self) -> bool {
        self.has_feature(Feature::ConfidentialIssues)
    }

    pub fn pushes(&self) -> bool {
        self.has_feature(Feature::Pushes)
    }

    pub fn issue_comments(&self) -> bool {
        self.has_feature(Feature::IssueComments)
    }

    pub fn merge_request_comments(&self) -> bool {
        self.has_feature(Feature::MergeRequestComments)
    }

    pub fn pipeline(&self) -> bool {
        self.has_feature(Feature::Pipeline)
    }

    pub fn tag(&self) -> bool {
        self.has_feature(Feature::Tag)
    }

    pub fn pull_reviews(&self) -> bool {
        self.has_feature(Feature::PullReviews)
    }

    pub fn deployments(&self) -> bool {
        self.has_feature(Feature::Deployments)
    }

    pub fn releases(&self) -> bool {
        self.has_feature(Feature::Releases)
    }

    /// Returns the label filter, or `""` when there is none.
    pub fn label(&self) -> &str {
        self.features.label().unwrap_or("")
    }

    /// Label gate: true when there is no label filter or `labels` contains it.
    pub fn accepts_labels<S: AsRef<str>>(&self, labels: &[S]) -> bool {
        match self.features.label() {
            None => true,
            Some(wanted) => labels.iter().any(|l| l.as_ref() == wanted),
        }
    }
}
