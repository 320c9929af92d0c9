//! Translators from webhook events to notification intents.
//!
//! Each translator is a pure function of the event and a [`Router`]. None of
//! them performs I/O or keeps state, so the same event always yields the same
//! intents and the delivery layer may retry or fan out freely.
//!
//! # Shape
//!
//! Every translator has two phases whose output is concatenated and then passed
//! through [`assemble`](crate::intent::assemble):
//! - Direct messages to the people involved (author, assignees, reviewers),
//!   plus one direct message per `@mention` in the event's free text
//! - One broadcast to every subscribed channel whose features and label filter
//!   accept the event
//!
//! # Event Kinds
//!
//! | Event | Direct messages | Channel gate |
//! |-------|-----------------|--------------|
//! | Issue | open (with assignees), close, reopen | `issues` + label |
//! | Merge request | open, reopen, update, close, merge | `merges` + label |
//! | Issue comment | issue author, assignees | none |
//! | Merge request comment | author, assignee | none |
//! | Push | mentions in commit messages | `pushes` |
//! | Pipeline | triggering user on failure | `pipeline` |
//! | Job | none | `jobs` |
//! | Tag | mentions in tag message | `tag` |
//! | Release | none | `releases` |
//! | Deployment | none | `deployments` |
//!
//! Statuses and actions a translator does not list produce no intents. This
//! keeps the relay working when GitLab adds new values.

mod deployment;
mod issue;
mod issue_comment;
mod job;
mod merge_request;
mod merge_request_comment;
mod pipeline;
mod push;
mod release;
mod tag;

use crate::intent::NotificationIntent;
use crate::routing::Router;
use crate::subscription::Subscription;
use crate::webhooks::events::{Project, WebhookEvent};

pub use deployment::translate_deployment;
pub use issue::translate_issue;
pub use issue_comment::translate_issue_comment;
pub use job::translate_job;
pub use merge_request::translate_merge_request;
pub use merge_request_comment::translate_merge_request_comment;
pub use pipeline::translate_pipeline;
pub use push::translate_push;
pub use release::translate_release;
pub use tag::translate_tag;

/// Translates a webhook event into notification intents.
///
/// This is the main entry point. It dispatches to the translator for the
/// event's kind.
pub fn translate<R: Router + ?Sized>(
    event: &WebhookEvent,
    router: &R,
) -> Vec<NotificationIntent> {
    let intents = match event {
        WebhookEvent::Issue(e) => translate_issue(e, router),
        WebhookEvent::MergeRequest(e) => translate_merge_request(e, router),
        WebhookEvent::IssueComment(e) => translate_issue_comment(e, router),
        WebhookEvent::MergeRequestComment(e) => translate_merge_request_comment(e, router),
        WebhookEvent::Push(e) => translate_push(e, router),
        WebhookEvent::Pipeline(e) => translate_pipeline(e, router),
        WebhookEvent::Job(e) => translate_job(e, router),
        WebhookEvent::Tag(e) => translate_tag(e, router),
        WebhookEvent::Release(e) => translate_release(e, router),
        WebhookEvent::Deployment(e) => translate_deployment(e, router),
    };

    tracing::debug!(
        kind = event.kind(),
        project = %event.project().path_with_namespace,
        intents = intents.len(),
        "translated webhook event"
    );

    intents
}

/// Inputs for turning `@mentions` in free text into direct messages.
#[derive(Debug, Clone, Copy)]
pub struct MentionScan<'a> {
    /// Username of the author of the text.
    pub sender: &'a str,
    /// `path_with_namespace` of the project.
    pub project_path: &'a str,
    /// Reference appended to the path in the link text (`#12`, `!3`,
    /// `@1a2b3c4d`).
    pub reference: &'a str,
    pub url: &'a str,
    /// Text to scan.
    pub body: &'a str,
}

/// Builds one direct message per user mentioned in `scan.body`.
///
/// A user mentioning themselves is removed later by intent assembly.
pub(crate) fn mention_intents<R: Router + ?Sized>(
    router: &R,
    scan: &MentionScan<'_>,
) -> Vec<NotificationIntent> {
    let mentioned = router.extract_mentions(scan.body);
    if mentioned.is_empty() {
        return Vec::new();
    }

    let message = format!(
        "{} mentioned you on [{}{}]({}):\n{}",
        user_link(router, scan.sender),
        scan.project_path,
        scan.reference,
        scan.url,
        quote(scan.body)
    );

    mentioned
        .into_iter()
        .map(|username| NotificationIntent::direct(scan.sender, vec![username], message.clone()))
        .collect()
}

/// Looks up every subscription covering the event's project.
pub(crate) fn project_subscriptions<R: Router + ?Sized>(
    router: &R,
    project: &Project,
) -> Vec<Subscription> {
    let path = project.path();
    router.subscriptions_for(&path.namespace, &path.project, project.is_public())
}

/// Markdown link to a user's profile.
pub(crate) fn user_link<R: Router + ?Sized>(router: &R, username: &str) -> String {
    format!("[{}]({})", username, router.user_profile_url(username))
}

/// Markdown link to a project.
pub(crate) fn project_link(project: &Project) -> String {
    format!("[{}]({})", project.path_with_namespace, project.web_url)
}

/// Appends a body below a heading, separated by a blank line.
pub(crate) fn with_body(heading: String, body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        heading
    } else {
        format!("{}\n\n{}", heading, body)
    }
}

/// Renders text as a markdown block quote.
fn quote(text: &str) -> String {
    text.trim()
        .lines()
        .map(|line| format!(">{}", line))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{MANLAND_ID, TestRouter, channel, merge_request_event, project};
    use crate::webhooks::events::{MergeRequestAction, MergeRequestState};

    #[test]
    fn translate_dispatches_by_kind() {
        let router = TestRouter::new().subscribe("channel-id", "merges");
        let mut mr = merge_request_event(MergeRequestAction::Open, MergeRequestState::Opened);
        mr.assignee_id = Some(MANLAND_ID);
        let event = WebhookEvent::MergeRequest(mr.clone());

        let intents = translate(&event, &router);
        assert_eq!(intents, translate_merge_request(&mr, &router));
        assert_eq!(intents.len(), 2);
        assert_eq!(intents[1].to_channels, vec![channel("channel-id")]);
    }

    #[test]
    fn translate_decoded_job_with_unknown_status() {
        let router = TestRouter::new().subscribe("ci", "jobs");
        let json = r#"{
            "job": {
                "user": {"id": 1, "username": "root"},
                "project": {
                    "id": 42,
                    "path_with_namespace": "owner/repo",
                    "web_url": "https://gitlab.example.com/owner/repo",
                    "visibility": "public"
                },
                "job": {
                    "id": 9,
                    "name": "lint",
                    "status": "waiting_for_callback",
                    "ref": "main",
                    "url": "https://gitlab.example.com/owner/repo/-/jobs/9"
                }
            }
        }"#;
        let event: WebhookEvent = serde_json::from_str(json).unwrap();

        assert!(translate(&event, &router).is_empty());
    }

    #[test]
    fn mention_intents_one_per_user() {
        let router = TestRouter::new();
        let scan = MentionScan {
            sender: "root",
            project_path: "owner/repo",
            reference: "#7",
            url: "https://gitlab.example.com/owner/repo/-/issues/7",
            body: "@alice please look\n@bob too, @alice",
        };

        let intents = mention_intents(&router, &scan);
        assert_eq!(intents.len(), 2);
        assert_eq!(intents[0].to_users, vec!["alice"]);
        assert_eq!(intents[1].to_users, vec!["bob"]);
        assert!(intents.iter().all(|i| i.from == "root"));
        assert_eq!(
            intents[0].message,
            "[root](https://gitlab.example.com/root) mentioned you on \
             [owner/repo#7](https://gitlab.example.com/owner/repo/-/issues/7):\n\
             >@alice please look\n>@bob too, @alice"
        );
    }

    #[test]
    fn mention_intents_empty_without_mentions() {
        let router = TestRouter::new();
        let scan = MentionScan {
            sender: "root",
            project_path: "owner/repo",
            reference: "#7",
            url: "u",
            body: "no mentions here",
        };
        assert!(mention_intents(&router, &scan).is_empty());
    }

    #[test]
    fn with_body_skips_blank_body() {
        assert_eq!(with_body("heading".into(), "  \n"), "heading");
        assert_eq!(with_body("heading".into(), " body\n"), "heading\n\nbody");
    }

    #[test]
    fn links() {
        let router = TestRouter::new();
        assert_eq!(
            user_link(&router, "root"),
            "[root](https://gitlab.example.com/root)"
        );
        assert_eq!(
            project_link(&project()),
            "[owner/repo](https://gitlab.example.com/owner/repo)"
        );
    }
}
