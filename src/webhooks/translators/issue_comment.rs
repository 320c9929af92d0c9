//! Translator for comments on issues.
//!
//! Comments only produce direct messages: to the issue's author, to its
//! assignees, and to anyone mentioned in the comment.

use crate::intent::{NotificationIntent, assemble};
use crate::routing::Router;
use crate::webhooks::events::IssueCommentEvent;

use super::{MentionScan, mention_intents, user_link};

/// Translates a comment on an issue.
pub fn translate_issue_comment<R: Router + ?Sized>(
    event: &IssueCommentEvent,
    router: &R,
) -> Vec<NotificationIntent> {
    let sender = event.user.username.as_str();
    let sender_link = user_link(router, sender);
    let issue = &event.issue;
    let comment_link = format!(
        "[{}#{}]({})",
        event.project.path_with_namespace, issue.iid, event.note.url
    );

    let assignees = issue
        .assignee_ids
        .iter()
        .map(|id| router.username_by_id(*id))
        .collect();

    let mut intents = vec![
        NotificationIntent::direct(
            sender,
            vec![router.username_by_id(issue.author_id)],
            format!(
                "{} commented on your issue {}",
                sender_link, comment_link
            ),
        ),
        NotificationIntent::direct(
            sender,
            assignees,
            format!(
                "{} commented on issue {} assigned to you",
                sender_link, comment_link
            ),
        ),
    ];

    intents.extend(mention_intents(
        router,
        &MentionScan {
            sender,
            project_path: &event.project.path_with_namespace,
            reference: &format!("#{}", issue.iid),
            url: &event.note.url,
            body: &event.note.body,
        },
    ));

    assemble(intents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{ALICE_ID, BOB_ID, MANLAND_ID, ROOT_ID, TestRouter, project, user};
    use crate::webhooks::events::{CommentedIssue, Note};

    fn comment_event(sender: (u64, &str), body: &str) -> IssueCommentEvent {
        IssueCommentEvent {
            user: user(sender.0, sender.1),
            project: project(),
            note: Note {
                body: body.to_string(),
                url: "https://gitlab.example.com/owner/repo/-/issues/12#note_99".to_string(),
            },
            issue: CommentedIssue {
                iid: 12,
                title: "Crash on startup".to_string(),
                author_id: ROOT_ID,
                assignee_ids: vec![MANLAND_ID, ALICE_ID],
            },
        }
    }

    #[test]
    fn messages_author_and_assignees() {
        let router = TestRouter::new().subscribe("town-square", "issues,issue_comments");
        let event = comment_event((BOB_ID, "bob"), "Same here.");

        let intents = translate_issue_comment(&event, &router);

        assert_eq!(intents.len(), 2);
        assert_eq!(intents[0].from, "bob");
        assert_eq!(intents[0].to_users, vec!["root"]);
        assert_eq!(
            intents[0].message,
            "[bob](https://gitlab.example.com/bob) commented on your issue \
             [owner/repo#12](https://gitlab.example.com/owner/repo/-/issues/12#note_99)"
        );
        assert_eq!(intents[1].to_users, vec!["manland", "alice"]);
        assert!(intents.iter().all(|i| i.to_channels.is_empty()));
    }

    #[test]
    fn author_commenting_on_own_issue_only_reaches_assignees() {
        let router = TestRouter::new();
        let event = comment_event((ROOT_ID, "root"), "Any news?");

        let intents = translate_issue_comment(&event, &router);
        assert_eq!(intents.len(), 1);
        assert_eq!(intents[0].to_users, vec!["manland", "alice"]);
    }

    #[test]
    fn mentions_add_direct_messages() {
        let router = TestRouter::new();
        let event = comment_event((MANLAND_ID, "manland"), "@bob can you reproduce?");

        let intents = translate_issue_comment(&event, &router);
        assert_eq!(intents.len(), 3);
        assert_eq!(intents[2].to_users, vec!["bob"]);
        assert!(intents[2].message.ends_with(":\n>@bob can you reproduce?"));
    }

    #[test]
    fn unknown_users_are_dropped() {
        let router = TestRouter::new();
        let mut event = comment_event((BOB_ID, "bob"), "hi");
        event.issue.author_id = 999;
        event.issue.assignee_ids = vec![998];

        assert!(translate_issue_comment(&event, &router).is_empty());
    }
}
