//! Translator for release events.

use crate::intent::{NotificationIntent, assemble};
use crate::routing::{Router, subscribed_channels};
use crate::webhooks::events::{ReleaseAction, ReleaseEvent};

use super::{project_link, project_subscriptions, user_link, with_body};

/// Translates a release change into a broadcast to `releases` channels.
///
/// Release hooks do not always name the acting user; the intent then has an
/// empty sender and the message omits the actor.
pub fn translate_release<R: Router + ?Sized>(
    event: &ReleaseEvent,
    router: &R,
) -> Vec<NotificationIntent> {
    let verb = match &event.action {
        ReleaseAction::Create => "published",
        ReleaseAction::Update => "updated",
        ReleaseAction::Delete => "deleted",
        ReleaseAction::Unknown(_) => return Vec::new(),
    };

    let sender = event
        .user
        .as_ref()
        .map(|u| u.username.as_str())
        .unwrap_or_default();
    let actor = if sender.is_empty() {
        String::new()
    } else {
        format!(" by {}", user_link(router, sender))
    };

    let heading = format!(
        "Release [{}]({}) (`{}`) {} on {}{}",
        event.name,
        event.url,
        event.tag,
        verb,
        project_link(&event.project),
        actor
    );
    let message = if event.action == ReleaseAction::Create {
        with_body(heading, &event.description)
    } else {
        heading
    };

    let subscriptions = project_subscriptions(router, &event.project);
    let channels = subscribed_channels(&subscriptions, |sub| sub.releases());

    assemble(vec![NotificationIntent::broadcast(sender, channels, message)])
}
