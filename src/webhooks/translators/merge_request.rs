//! Translator for merge request events.
//!
//! Direct messages depend on both the action and the resulting state. Channel
//! broadcasts cover open, reopen, merge and close; updates never reach channels.

use crate::intent::{NotificationIntent, assemble};
use crate::routing::{Router, subscribed_channels};
use crate::webhooks::events::{
    MergeRequestAction as Action, MergeRequestEvent, MergeRequestState as State,
};

use super::{
    MentionScan, mention_intents, project_link, project_subscriptions, user_link, with_body,
};

/// Translates a merge request event.
///
/// # Event Actions
///
/// | State / Action | Direct messages | Channels |
/// |----------------|-----------------|----------|
/// | `opened` / `open` | reviewers and assignee, author | new merge request |
/// | `opened` / `reopen` | author | reopened |
/// | `opened` / `update` | assignee, author | none |
/// | `closed` / `close` | author | closed |
/// | `merged` / `merge` | author | merged |
///
/// The channel label filter is checked against the merge request's labels for
/// every broadcast action.
pub fn translate_merge_request<R: Router + ?Sized>(
    event: &MergeRequestEvent,
    router: &R,
) -> Vec<NotificationIntent> {
    let mut intents = direct_messages(event, router);
    intents.extend(channel_broadcast(event, router));
    assemble(intents)
}

fn direct_messages<R: Router + ?Sized>(
    event: &MergeRequestEvent,
    router: &R,
) -> Vec<NotificationIntent> {
    let sender = event.user.username.as_str();
    let sender_link = user_link(router, sender);
    let mr_link = merge_request_link(event);
    let author = router.username_by_id(event.author_id);
    let to_author = |verb: &str| {
        NotificationIntent::direct(
            sender,
            vec![author.clone()],
            format!("{} {} your merge request {}", sender_link, verb, mr_link),
        )
    };

    let mut intents = Vec::new();

    match (&event.state, &event.action) {
        (State::Opened, Action::Open) => {
            intents.push(NotificationIntent::direct(
                sender,
                review_requested(event, router),
                format!("{} requested your review on {}", sender_link, mr_link),
            ));
            intents.push(to_author("opened"));
            intents.extend(mention_intents(
                router,
                &MentionScan {
                    sender,
                    project_path: &event.project.path_with_namespace,
                    reference: &format!("!{}", event.iid),
                    url: &event.url,
                    body: &event.description,
                },
            ));
        }
        (State::Opened, Action::Reopen) => intents.push(to_author("reopened")),
        (State::Opened, Action::Update) => {
            // An update on an open merge request is taken to be a new assignment.
            if let Some(assignee_id) = event.assignee_id {
                intents.push(NotificationIntent::direct(
                    sender,
                    vec![router.username_by_id(assignee_id)],
                    format!("{} assigned you to merge request {}", sender_link, mr_link),
                ));
            }
            intents.push(to_author("updated"));
        }
        (State::Closed, Action::Close) => intents.push(to_author("closed")),
        (State::Merged, Action::Merge) => intents.push(to_author("merged")),
        _ => {}
    }

    intents
}

fn channel_broadcast<R: Router + ?Sized>(
    event: &MergeRequestEvent,
    router: &R,
) -> Option<NotificationIntent> {
    let sender = event.user.username.as_str();
    let sender_link = user_link(router, sender);
    let summary = |verb: &str| {
        format!(
            "[{}] Merge request [!{} {}]({}) was {} by {}",
            event.project.path_with_namespace, event.iid, event.title, event.url, verb, sender_link
        )
    };

    let message = match (&event.state, &event.action) {
        (State::Opened, Action::Open) => with_body(
            format!(
                "#### {}\n##### {} new merge-request by {} on {}",
                event.title,
                merge_request_link(event),
                sender_link,
                project_link(&event.project)
            ),
            &event.description,
        ),
        (State::Opened, Action::Reopen) => summary("reopened"),
        (State::Merged, Action::Merge) => summary("merged"),
        (State::Closed, Action::Close) => summary("closed"),
        _ => return None,
    };

    let subscriptions = project_subscriptions(router, &event.project);
    let channels = subscribed_channels(&subscriptions, |sub| {
        sub.merges() && sub.accepts_labels(&event.labels)
    });

    Some(NotificationIntent::broadcast(sender, channels, message))
}

/// Reviewers followed by the assignee.
fn review_requested<R: Router + ?Sized>(event: &MergeRequestEvent, router: &R) -> Vec<String> {
    let mut users: Vec<String> = event.reviewers.iter().map(|u| u.username.clone()).collect();
    if let Some(assignee_id) = event.assignee_id {
        users.push(router.username_by_id(assignee_id));
    }
    users
}

fn merge_request_link(event: &MergeRequestEvent) -> String {
    format!(
        "[{}!{}]({})",
        event.project.path_with_namespace, event.iid, event.url
    )
}
