//! Translator for comments on merge requests.

use crate::intent::{NotificationIntent, assemble};
use crate::routing::Router;
use crate::webhooks::events::MergeRequestCommentEvent;

use super::{MentionScan, mention_intents, user_link};

/// Translates a comment on a merge request.
///
/// The author and the assignee each get a direct message, as does every user
/// mentioned in the note. Comments are never broadcast to channels.
pub fn translate_merge_request_comment<R: Router + ?Sized>(
    event: &MergeRequestCommentEvent,
    router: &R,
) -> Vec<NotificationIntent> {
    let sender = event.user.username.as_str();
    let sender_link = user_link(router, sender);
    let mr = &event.merge_request;
    let comment_link = format!(
        "[{}!{}]({})",
        event.project.path_with_namespace, mr.iid, event.note.url
    );

    let mut intents = vec![NotificationIntent::direct(
        sender,
        vec![router.username_by_id(mr.author_id)],
        format!(
            "{} commented on your merge request {}",
            sender_link, comment_link
        ),
    )];

    if let Some(assignee_id) = mr.assignee_id {
        intents.push(NotificationIntent::direct(
            sender,
            vec![router.username_by_id(assignee_id)],
            format!(
                "{} commented on merge request {} assigned to you",
                sender_link, comment_link
            ),
        ));
    }

    intents.extend(mention_intents(
        router,
        &MentionScan {
            sender,
            project_path: &event.project.path_with_namespace,
            reference: &format!("!{}", mr.iid),
            url: &event.note.url,
            body: &event.note.body,
        },
    ));

    assemble(intents)
}
