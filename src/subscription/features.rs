//! Feature vocabulary and the comma-separated feature string.
//!
//! The persisted form of a subscription's features is a comma-separated list
//! of tags with an optional label predicate, e.g. `issues,merges,label:"bug"`.
//! [`Features`] keeps that string verbatim so a store can write it back
//! byte-for-byte, and exposes the parsed tags alongside it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Prefix of the label predicate token.
const LABEL_PREFIX: &str = "label:";

/// Errors raised while validating a subscription.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubscriptionError {
    /// One or more tokens are not in the feature vocabulary.
    #[error("unknown features {}", .0.join(","))]
    UnknownFeatures(Vec<String>),

    /// More than one `label:` predicate was given.
    #[error("can't add multiple labels on the same subscription")]
    MultipleLabels,

    /// A `label:` token that is not of the form `label:"<name>"`.
    #[error("malformed label predicate {0}, expected label:\"<name>\"")]
    MalformedLabel(String),
}

/// A category of event a channel can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    Merges,
    Jobs,
    Issues,
    Pushes,
    IssueComments,
    MergeRequestComments,
    Pipeline,
    Tag,
    PullReviews,
    ConfidentialIssues,
    Deployments,
    Releases,
}

impl Feature {
    /// Every tag in the vocabulary, in wire order.
    pub const ALL: [Feature; 12] = [
        Feature::Merges,
        Feature::Jobs,
        Feature::Issues,
        Feature::Pushes,
        Feature::IssueComments,
        Feature::MergeRequestComments,
        Feature::Pipeline,
        Feature::Tag,
        Feature::PullReviews,
        Feature::ConfidentialIssues,
        Feature::Deployments,
        Feature::Releases,
    ];

    /// Returns the wire spelling of this tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            Feature::Merges => "merges",
            Feature::Jobs => "jobs",
            Feature::Issues => "issues",
            Feature::Pushes => "pushes",
            Feature::IssueComments => "issue_comments",
            Feature::MergeRequestComments => "merge_request_comments",
            Feature::Pipeline => "pipeline",
            Feature::Tag => "tag",
            Feature::PullReviews => "pull_reviews",
            Feature::ConfidentialIssues => "confidential_issues",
            Feature::Deployments => "deployments",
            Feature::Releases => "releases",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Feature {
    type Err = SubscriptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Feature::ALL
            .into_iter()
            .find(|feature| feature.as_str() == s)
            .ok_or_else(|| SubscriptionError::UnknownFeatures(vec![s.to_string()]))
    }
}

/// A validated feature string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Features {
    raw: String,
    tags: Vec<Feature>,
    label: Option<String>,
}

impl Features {
    /// Parses and validates a comma-separated feature string.
    ///
    /// # Errors
    ///
    /// - [`SubscriptionError::MultipleLabels`] if `label:` occurs more than once
    /// - [`SubscriptionError::MalformedLabel`] if the label is not a single
    ///   double-quoted, non-empty value
    /// - [`SubscriptionError::UnknownFeatures`] listing every token outside the
    ///   vocabulary, in input order
    pub fn parse(raw: &str) -> Result<Self, SubscriptionError> {
        if raw.matches(LABEL_PREFIX).count() > 1 {
            return Err(SubscriptionError::MultipleLabels);
        }

        let mut tags = Vec::new();
        let mut label = None;
        let mut unknown = Vec::new();

        for token in split_tokens(raw) {
            let token = token.trim();
            if token.is_empty() {
                continue;
            }
            if let Some(rest) = token.strip_prefix(LABEL_PREFIX) {
                label = Some(parse_label(rest).ok_or_else(|| {
                    SubscriptionError::MalformedLabel(token.to_string())
                })?);
                continue;
            }
            match token.parse::<Feature>() {
                Ok(tag) => {
                    if !tags.contains(&tag) {
                        tags.push(tag);
                    }
                }
                Err(_) => unknown.push(token.to_string()),
            }
        }

        if !unknown.is_empty() {
            return Err(SubscriptionError::UnknownFeatures(unknown));
        }

        Ok(Features {
            raw: raw.to_string(),
            tags,
            label,
        })
    }

    /// Returns true if the tag is present.
    pub fn contains(&self, feature: Feature) -> bool {
        self.tags.contains(&feature)
    }

    /// Returns the parsed tags in input order, without duplicates.
    pub fn tags(&self) -> &[Feature] {
        &self.tags
    }

    /// Returns the label predicate value, if any.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Returns the string exactly as it was given.
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl FromStr for Features {
    type Err = SubscriptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Features::parse(s)
    }
}

impl TryFrom<String> for Features {
    type Error = SubscriptionError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Features::parse(&raw)
    }
}

impl From<Features> for String {
    fn from(features: Features) -> Self {
        features.raw
    }
}

impl fmt::Display for Features {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Splits on commas that are not inside double quotes.
///
/// An unterminated quote swallows the rest of the string into one token, which
/// the label check then rejects.
fn split_tokens(raw: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut in_quotes = false;
    let mut start = 0;
    for (i, c) in raw.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                tokens.push(&raw[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    tokens.push(&raw[start..]);
    tokens
}

/// Extracts `<name>` from `"<name>"`.
fn parse_label(quoted: &str) -> Option<String> {
    let inner = quoted.strip_prefix('"')?.strip_suffix('"')?;
    if inner.is_empty() || inner.contains('"') {
        return None;
    }
    Some(inner.to_string())
}
