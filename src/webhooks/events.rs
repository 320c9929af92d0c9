//! GitLab webhook event types.
//!
//! This module defines typed representations of the GitLab webhook events the
//! relay translates. Payload decoding happens in the host; these types carry
//! only the fields the translators read.
//!
//! # Event Types
//!
//! - `Issue Hook` - opened, closed, reopened, updated (label changes)
//! - `Merge Request Hook` - opened, closed, reopened, updated, merged
//! - `Note Hook` on an issue or on a merge request
//! - `Push Hook`, `Tag Push Hook`
//! - `Pipeline Hook`, `Job Hook`
//! - `Release Hook`, `Deployment Hook`
//!
//! Action and status fields are open enums: values GitLab adds later decode into
//! an `Unknown` variant instead of failing, and the translators ignore them.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::ProjectPath;

/// Declares a string-valued enum with a catch-all `Unknown` variant.
macro_rules! open_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($(#[$vmeta:meta])* $variant:ident => $wire:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum $name {
            $($(#[$vmeta])* $variant,)+
            /// A value this crate does not handle.
            Unknown(String),
        }

        impl $name {
            /// Returns the wire spelling.
            pub fn as_str(&self) -> &str {
                match self {
                    $($name::$variant => $wire,)+
                    $name::Unknown(s) => s.as_str(),
                }
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                let known = match s.as_str() {
                    $($wire => Some($name::$variant),)+
                    _ => None,
                };
                known.unwrap_or_else(|| $name::Unknown(s))
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                $name::from(s.to_string())
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                match value {
                    $name::Unknown(s) => s,
                    known => known.as_str().to_string(),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

open_enum! {
    /// Project visibility level.
    Visibility {
        Public => "public",
        Internal => "internal",
        Private => "private",
    }
}

open_enum! {
    /// Action performed on an issue.
    IssueAction {
        Open => "open",
        Close => "close",
        Reopen => "reopen",
        Update => "update",
    }
}

open_enum! {
    /// Action performed on a merge request.
    MergeRequestAction {
        Open => "open",
        Close => "close",
        Reopen => "reopen",
        Update => "update",
        Merge => "merge",
        Approved => "approved",
        Unapproved => "unapproved",
    }
}

open_enum! {
    /// State of a merge request after the action.
    MergeRequestState {
        Opened => "opened",
        Closed => "closed",
        Merged => "merged",
        Locked => "locked",
    }
}

open_enum! {
    /// Status of a pipeline.
    PipelineStatus {
        Created => "created",
        Pending => "pending",
        Running => "running",
        Success => "success",
        Failed => "failed",
        Canceled => "canceled",
        Skipped => "skipped",
        Manual => "manual",
    }
}

open_enum! {
    /// Status of a CI job.
    JobStatus {
        Created => "created",
        Pending => "pending",
        Running => "running",
        Success => "success",
        Failed => "failed",
        Canceled => "canceled",
        Skipped => "skipped",
        Manual => "manual",
    }
}

open_enum! {
    /// Action performed on a release.
    ReleaseAction {
        Create => "create",
        Update => "update",
        Delete => "delete",
    }
}

open_enum! {
    /// Status of a deployment.
    DeploymentStatus {
        Created => "created",
        Running => "running",
        Success => "success",
        Failed => "failed",
        Canceled => "canceled",
    }
}

/// A GitLab user as embedded in webhook payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub username: String,
    #[serde(default)]
    pub name: String,
}

impl User {
    pub fn new(id: u64, username: impl Into<String>) -> Self {
        User {
            id,
            username: username.into(),
            name: String::new(),
        }
    }
}

/// The project an event belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: u64,
    /// Full path, e.g. `group/subgroup/project`.
    pub path_with_namespace: String,
    pub web_url: String,
    pub visibility: Visibility,
}

impl Project {
    pub fn path(&self) -> ProjectPath {
        ProjectPath::parse(&self.path_with_namespace)
    }

    pub fn is_public(&self) -> bool {
        self.visibility == Visibility::Public
    }
}

/// Previous and current label titles from an update's change set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelChange {
    pub previous: Vec<String>,
    pub current: Vec<String>,
}

impl LabelChange {
    /// Returns true if the label sets differ, ignoring order and repeats.
    pub fn differs(&self) -> bool {
        let previous: BTreeSet<&str> = self.previous.iter().map(String::as_str).collect();
        let current: BTreeSet<&str> = self.current.iter().map(String::as_str).collect();
        previous != current
    }
}

/// An issue was opened, closed, reopened or updated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueEvent {
    /// The user who performed the action.
    pub user: User,
    pub project: Project,
    pub action: IssueAction,

    /// Project-scoped issue number.
    pub iid: u64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub url: String,

    /// Numeric id of the issue author, resolved through the router.
    pub author_id: u64,
    #[serde(default)]
    pub assignees: Vec<User>,

    /// Current label titles.
    #[serde(default)]
    pub labels: Vec<String>,

    /// Label change set, present only when labels were touched by an update.
    #[serde(default)]
    pub label_changes: Option<LabelChange>,

    #[serde(default)]
    pub confidential: bool,
}

impl IssueEvent {
    /// Returns true if this update changed the issue's label set.
    pub fn labels_changed(&self) -> bool {
        self.label_changes
            .as_ref()
            .is_some_and(LabelChange::differs)
    }
}

/// A merge request changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeRequestEvent {
    pub user: User,
    pub project: Project,
    pub action: MergeRequestAction,
    pub state: MergeRequestState,

    pub iid: u64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub url: String,

    pub author_id: u64,
    #[serde(default)]
    pub assignee_id: Option<u64>,
    #[serde(default)]
    pub reviewers: Vec<User>,
    #[serde(default)]
    pub labels: Vec<String>,
}

/// A comment body and its permalink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub body: String,
    pub url: String,
}

/// The issue a comment was left on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentedIssue {
    pub iid: u64,
    pub title: String,
    pub author_id: u64,
    #[serde(default)]
    pub assignee_ids: Vec<u64>,
}

/// A comment on an issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueCommentEvent {
    pub user: User,
    pub project: Project,
    pub note: Note,
    pub issue: CommentedIssue,
}

/// The merge request a comment was left on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentedMergeRequest {
    pub iid: u64,
    pub title: String,
    pub author_id: u64,
    #[serde(default)]
    pub assignee_id: Option<u64>,
}

/// A comment on a merge request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeRequestCommentEvent {
    pub user: User,
    pub project: Project,
    pub note: Note,
    pub merge_request: CommentedMergeRequest,
}

/// A commit included in a push.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    pub id: String,
    pub message: String,
    pub url: String,
}

impl Commit {
    /// Returns the first eight characters of the commit id.
    pub fn short_id(&self) -> &str {
        self.id.get(..8).unwrap_or(&self.id)
    }

    /// Returns the first line of the commit message.
    pub fn summary(&self) -> &str {
        self.message.lines().next().unwrap_or("").trim()
    }
}

/// Commits were pushed to a branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushEvent {
    pub user: User,
    pub project: Project,
    /// Full ref, e.g. `refs/heads/main`.
    #[serde(rename = "ref")]
    pub git_ref: String,
    pub total_commits_count: u64,
    #[serde(default)]
    pub commits: Vec<Commit>,
}

impl PushEvent {
    /// Returns the branch name without the `refs/heads/` prefix.
    pub fn branch(&self) -> &str {
        self.git_ref
            .strip_prefix("refs/heads/")
            .unwrap_or(&self.git_ref)
    }
}

/// Pipeline attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pipeline {
    pub id: u64,
    pub status: PipelineStatus,
    #[serde(rename = "ref")]
    pub git_ref: String,
    pub url: String,
}

/// A pipeline changed status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineEvent {
    /// The user who triggered the pipeline.
    pub user: User,
    pub project: Project,
    pub pipeline: Pipeline,
}

/// Job attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub stage: String,
    pub status: JobStatus,
    #[serde(rename = "ref")]
    pub git_ref: String,
    pub url: String,
    #[serde(default)]
    pub failure_reason: Option<String>,
}

/// A CI job changed status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobEvent {
    pub user: User,
    pub project: Project,
    pub job: Job,
}

/// A tag was pushed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagEvent {
    pub user: User,
    pub project: Project,
    /// Full ref, e.g. `refs/tags/v1.0.0`.
    #[serde(rename = "ref")]
    pub git_ref: String,
    #[serde(default)]
    pub message: String,
}

impl TagEvent {
    /// Returns the tag name without the `refs/tags/` prefix.
    pub fn tag_name(&self) -> &str {
        self.git_ref
            .strip_prefix("refs/tags/")
            .unwrap_or(&self.git_ref)
    }

    /// Returns the tag's page in the project.
    pub fn tag_url(&self) -> String {
        format!("{}/-/tags/{}", self.project.web_url, self.tag_name())
    }
}

/// A release was created, updated or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseEvent {
    pub project: Project,
    pub action: ReleaseAction,
    pub name: String,
    pub tag: String,
    pub url: String,
    #[serde(default)]
    pub description: String,
    /// The acting user, when GitLab includes one.
    #[serde(default)]
    pub user: Option<User>,
}

/// A deployment changed status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentEvent {
    pub user: User,
    pub project: Project,
    pub deployment_id: u64,
    pub status: DeploymentStatus,
    pub environment: String,
    #[serde(default)]
    pub deployable_url: String,
    pub short_sha: String,
    pub commit_url: String,
    #[serde(default)]
    pub failure_reason: Option<String>,
}

/// A decoded GitLab webhook event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WebhookEvent {
    Issue(IssueEvent),
    MergeRequest(MergeRequestEvent),
    IssueComment(IssueCommentEvent),
    MergeRequestComment(MergeRequestCommentEvent),
    Push(PushEvent),
    Pipeline(PipelineEvent),
    Job(JobEvent),
    Tag(TagEvent),
    Release(ReleaseEvent),
    Deployment(DeploymentEvent),
}

impl WebhookEvent {
    /// Returns the event kind, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            WebhookEvent::Issue(_) => "issue",
            WebhookEvent::MergeRequest(_) => "merge_request",
            WebhookEvent::IssueComment(_) => "issue_comment",
            WebhookEvent::MergeRequestComment(_) => "merge_request_comment",
            WebhookEvent::Push(_) => "push",
            WebhookEvent::Pipeline(_) => "pipeline",
            WebhookEvent::Job(_) => "job",
            WebhookEvent::Tag(_) => "tag",
            WebhookEvent::Release(_) => "release",
            WebhookEvent::Deployment(_) => "deployment",
        }
    }

    /// Returns the project this event belongs to.
    pub fn project(&self) -> &Project {
        match self {
            WebhookEvent::Issue(e) => &e.project,
            WebhookEvent::MergeRequest(e) => &e.project,
            WebhookEvent::IssueComment(e) => &e.project,
            WebhookEvent::MergeRequestComment(e) => &e.project,
            WebhookEvent::Push(e) => &e.project,
            WebhookEvent::Pipeline(e) => &e.project,
            WebhookEvent::Job(e) => &e.project,
            WebhookEvent::Tag(e) => &e.project,
            WebhookEvent::Release(e) => &e.project,
            WebhookEvent::Deployment(e) => &e.project,
        }
    }
}
