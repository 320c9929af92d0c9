//! Translator for push events.

use std::collections::HashSet;

use crate::intent::{NotificationIntent, assemble};
use crate::routing::{Router, subscribed_channels};
use crate::webhooks::events::PushEvent;

use super::{MentionScan, mention_intents, project_subscriptions, user_link};

/// Translates a push.
///
/// A push without commits (a branch deletion or an empty branch creation)
/// produces nothing. Otherwise every `pushes` channel receives a summary with
/// one line per commit. Users mentioned in commit messages get one direct
/// message, referencing the first commit that mentions them.
pub fn translate_push<R: Router + ?Sized>(
    event: &PushEvent,
    router: &R,
) -> Vec<NotificationIntent> {
    if event.total_commits_count == 0 {
        return Vec::new();
    }

    let sender = event.user.username.as_str();
    let mut intents = Vec::new();
    let mut mentioned = HashSet::new();

    for commit in &event.commits {
        let scan = MentionScan {
            sender,
            project_path: &event.project.path_with_namespace,
            reference: &format!("@{}", commit.short_id()),
            url: &commit.url,
            body: &commit.message,
        };
        // One direct message per user per push, pointing at the first commit
        // that mentions them.
        intents.extend(
            mention_intents(router, &scan)
                .into_iter()
                .filter(|intent| mentioned.insert(intent.to_users.clone())),
        );
    }

    let subscriptions = project_subscriptions(router, &event.project);
    let channels = subscribed_channels(&subscriptions, |sub| sub.pushes());
    intents.push(NotificationIntent::broadcast(
        sender,
        channels,
        summary(event, router),
    ));

    assemble(intents)
}

fn summary<R: Router + ?Sized>(event: &PushEvent, router: &R) -> String {
    let branch = event.branch();
    let commits = if event.total_commits_count == 1 {
        "1 commit".to_string()
    } else {
        format!("{} commits", event.total_commits_count)
    };

    let mut message = format!(
        "{} has pushed {} to [{}/{}]({}/-/tree/{})",
        user_link(router, &event.user.username),
        commits,
        event.project.path_with_namespace,
        branch,
        event.project.web_url,
        branch
    );
    for commit in &event.commits {
        message.push_str(&format!(
            "\n- [`{}`]({}) {}",
            commit.short_id(),
            commit.url,
            commit.summary()
        ));
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{ROOT_ID, TestRouter, channel, project, user};
    use crate::webhooks::events::Commit;

    fn commit(id: &str, message: &str) -> Commit {
        Commit {
            id: id.to_string(),
            message: message.to_string(),
            url: format!("https://gitlab.example.com/owner/repo/-/commit/{}", id),
        }
    }

    fn push_event(commits: Vec<Commit>) -> PushEvent {
        PushEvent {
            user: user(ROOT_ID, "root"),
            project: project(),
            git_ref: "refs/heads/main".to_string(),
            total_commits_count: commits.len() as u64,
            commits,
        }
    }

    #[test]
    fn push_without_commits_is_ignored() {
        let router = TestRouter::new().subscribe("channel-id", "pushes");
        let event = push_event(Vec::new());
        assert!(translate_push(&event, &router).is_empty());
    }

    #[test]
    fn single_commit_summary() {
        let router = TestRouter::new().subscribe("channel-id", "pushes");
        let event = push_event(vec![commit(
            "a1b2c3d4e5f60718",
            "Fix flaky retry test\n\nLonger explanation.",
        )]);

        let intents = translate_push(&event, &router);

        assert_eq!(intents.len(), 1);
        assert_eq!(intents[0].to_channels, vec![channel("channel-id")]);
        assert_eq!(
            intents[0].message,
            "[root](https://gitlab.example.com/root) has pushed 1 commit to \
             [owner/repo/main](https://gitlab.example.com/owner/repo/-/tree/main)\n\
             - [`a1b2c3d4`](https://gitlab.example.com/owner/repo/-/commit/a1b2c3d4e5f60718) \
             Fix flaky retry test"
        );
    }

    #[test]
    fn summary_uses_total_count() {
        let router = TestRouter::new().subscribe("channel-id", "pushes");
        let mut event = push_event(vec![commit("aaaaaaaaaa", "one"), commit("bbbbbbbbbb", "two")]);
        event.total_commits_count = 25;

        let intents = translate_push(&event, &router);
        assert!(intents[0].message.contains("has pushed 25 commits to"));
        assert_eq!(intents[0].message.lines().count(), 3);
    }

    #[test]
    fn commit_mentions_reference_the_commit() {
        let router = TestRouter::new();
        let event = push_event(vec![commit("0123456789ab", "Thanks @alice for the fix")]);

        let intents = translate_push(&event, &router);
        assert_eq!(intents.len(), 1);
        assert_eq!(intents[0].to_users, vec!["alice"]);
        assert!(
            intents[0]
                .message
                .contains("mentioned you on [owner/repo@01234567]")
        );
    }

    #[test]
    fn user_mentioned_in_several_commits_gets_one_message() {
        let router = TestRouter::new();
        let event = push_event(vec![
            commit("1111111111", "Start the fix, cc @alice"),
            commit("2222222222", "Finish the fix, thanks @alice and @bob"),
        ]);

        let intents = translate_push(&event, &router);

        assert_eq!(intents.len(), 2);
        assert_eq!(intents[0].to_users, vec!["alice"]);
        assert!(intents[0].message.contains("[owner/repo@11111111]"));
        assert_eq!(intents[1].to_users, vec!["bob"]);
        assert!(intents[1].message.contains("[owner/repo@22222222]"));
    }

    #[test]
    fn channels_without_pushes_are_skipped() {
        let router = TestRouter::new().subscribe("channel-id", "issues,merges");
        let event = push_event(vec![commit("0123456789ab", "chore")]);
        assert!(translate_push(&event, &router).is_empty());
    }
}
