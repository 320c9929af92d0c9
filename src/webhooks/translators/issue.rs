//! Translator for issue events.
//!
//! - `open` - direct messages to assignees and the author, mentions in the
//!   description, channel broadcast
//! - `close` / `reopen` - direct message to the author, channel broadcast
//! - `update` - channel broadcast only when the label set changed

use crate::intent::{NotificationIntent, assemble};
use crate::routing::{Router, subscribed_channels};
use crate::subscription::Subscription;
use crate::webhooks::events::{IssueAction, IssueEvent};

use super::{
    MentionScan, mention_intents, project_link, project_subscriptions, user_link, with_body,
};

/// Translates an issue event.
///
/// # Event Actions
///
/// | Action | Direct messages | Channels |
/// |--------|-----------------|----------|
/// | `open` | assignees and author, only if assigned | always |
/// | `close` | author | always |
/// | `reopen` | author | always |
/// | `update` | none | only if the label set changed |
pub fn translate_issue<R: Router + ?Sized>(
    event: &IssueEvent,
    router: &R,
) -> Vec<NotificationIntent> {
    let mut intents = direct_messages(event, router);
    intents.extend(channel_broadcast(event, router));
    assemble(intents)
}

fn direct_messages<R: Router + ?Sized>(event: &IssueEvent, router: &R) -> Vec<NotificationIntent> {
    let sender = event.user.username.as_str();
    let sender_link = user_link(router, sender);
    let issue_link = issue_link(event);
    let author = router.username_by_id(event.author_id);

    let mut intents = Vec::new();

    match &event.action {
        IssueAction::Open => {
            if !event.assignees.is_empty() {
                let assignees = event.assignees.iter().map(|u| u.username.clone()).collect();
                intents.push(NotificationIntent::direct(
                    sender,
                    assignees,
                    format!("{} assigned you to issue {}", sender_link, issue_link),
                ));
                intents.push(NotificationIntent::direct(
                    sender,
                    vec![author],
                    format!("{} opened your issue {}", sender_link, issue_link),
                ));
            }

            intents.extend(mention_intents(
                router,
                &MentionScan {
                    sender,
                    project_path: &event.project.path_with_namespace,
                    reference: &format!("#{}", event.iid),
                    url: &event.url,
                    body: &event.description,
                },
            ));
        }
        IssueAction::Close => intents.push(NotificationIntent::direct(
            sender,
            vec![author],
            format!("{} closed your issue {}", sender_link, issue_link),
        )),
        IssueAction::Reopen => intents.push(NotificationIntent::direct(
            sender,
            vec![author],
            format!("{} reopened your issue {}", sender_link, issue_link),
        )),
        IssueAction::Update | IssueAction::Unknown(_) => {}
    }

    intents
}

fn channel_broadcast<R: Router + ?Sized>(
    event: &IssueEvent,
    router: &R,
) -> Option<NotificationIntent> {
    let sender = event.user.username.as_str();
    let sender_link = user_link(router, sender);
    let path = &event.project.path_with_namespace;

    let message = match &event.action {
        IssueAction::Open => with_body(
            format!(
                "#### {}\n##### {}\n#new-issue by {} on {}",
                event.title,
                issue_link(event),
                sender_link,
                project_link(&event.project)
            ),
            &event.description,
        ),
        IssueAction::Close => format!(
            "[{}] Issue [{}]({}) closed by {}",
            path, event.title, event.url, sender_link
        ),
        IssueAction::Reopen => format!(
            "[{}] Issue [{}]({}) reopened by {}",
            path, event.title, event.url, sender_link
        ),
        IssueAction::Update if event.labels_changed() => format!(
            "#### {}\n##### {}\n{} by {} on {}",
            event.title,
            issue_link(event),
            label_tag(&event.labels),
            sender_link,
            project_link(&event.project)
        ),
        IssueAction::Update | IssueAction::Unknown(_) => return None,
    };

    let subscriptions = project_subscriptions(router, &event.project);
    let channels = subscribed_channels(&subscriptions, |sub| {
        accepts_issue(sub, event.confidential) && sub.accepts_labels(&event.labels)
    });

    Some(NotificationIntent::broadcast(sender, channels, message))
}

/// Confidential issues need the `confidential_issues` feature; all others
/// need `issues`.
fn accepts_issue(sub: &Subscription, confidential: bool) -> bool {
    if confidential {
        sub.confidential_issues()
    } else {
        sub.issues()
    }
}

/// `#issue-labeled` with the current labels, or `#issue-unlabeled` once the
/// last label is removed.
fn label_tag(labels: &[String]) -> String {
    if labels.is_empty() {
        "#issue-unlabeled".to_string()
    } else {
        format!("#issue-labeled `{}`", labels.join("`, `"))
    }
}

fn issue_link(event: &IssueEvent) -> String {
    format!(
        "[{}#{}]({})",
        event.project.path_with_namespace, event.iid, event.url
    )
}
