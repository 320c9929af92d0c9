//! Newtype wrappers for routing identifiers.
//!
//! Channel identifiers and repository paths are both plain strings on the wire.
//! Wrapping them keeps a channel id from being passed where a username or a
//! repository key is expected.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An opaque chat channel identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelId(pub String);

impl ChannelId {
    pub fn new(s: impl Into<String>) -> Self {
        ChannelId(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ChannelId {
    fn from(s: String) -> Self {
        ChannelId(s)
    }
}

impl From<&str> for ChannelId {
    fn from(s: &str) -> Self {
        ChannelId(s.to_string())
    }
}

/// A project path split into its namespace and project name.
///
/// GitLab namespaces may be nested (`group/subgroup`), so the project name is
/// always the last path segment and the namespace is everything before it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectPath {
    pub namespace: String,
    pub project: String,
}

impl ProjectPath {
    pub fn new(namespace: impl Into<String>, project: impl Into<String>) -> Self {
        ProjectPath {
            namespace: namespace.into(),
            project: project.into(),
        }
    }

    /// Splits a `path_with_namespace` value.
    ///
    /// A path without any `/` has an empty namespace.
    pub fn parse(path_with_namespace: &str) -> Self {
        let path = path_with_namespace.trim().trim_matches('/');
        match path.rsplit_once('/') {
            Some((namespace, project)) => ProjectPath::new(namespace, project),
            None => ProjectPath::new("", path),
        }
    }

    /// Returns the key project-level subscriptions are stored under.
    pub fn project_key(&self) -> String {
        format!("{}/{}", self.namespace, self.project)
    }

    /// Returns the key namespace-level subscriptions are stored under.
    pub fn namespace_key(&self) -> String {
        format!("{}/", self.namespace)
    }
}

impl fmt::Display for ProjectPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.project)
    }
}

/// Normalizes a repository path as written in a subscription.
///
/// Surrounding whitespace and leading slashes are removed. A trailing slash
/// marks a namespace-level subscription, so it is kept (collapsed to a single
/// slash) rather than stripped. Paths are case-sensitive.
pub fn normalize_repository(path: &str) -> String {
    let trimmed = path.trim().trim_start_matches('/');
    let without_trailing = trimmed.trim_end_matches('/');
    if without_trailing.len() != trimmed.len() && !without_trailing.is_empty() {
        format!("{}/", without_trailing)
    } else {
        without_trailing.to_string()
    }
}
