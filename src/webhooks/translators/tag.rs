//! Translator for tag push events.

use crate::intent::{NotificationIntent, assemble};
use crate::routing::{Router, subscribed_channels};
use crate::webhooks::events::TagEvent;

use super::{
    MentionScan, mention_intents, project_link, project_subscriptions, user_link, with_body,
};

/// Translates a pushed tag.
///
/// `tag` channels get the announcement with the tag message as its body.
/// Users mentioned in the tag message get a direct message.
pub fn translate_tag<R: Router + ?Sized>(event: &TagEvent, router: &R) -> Vec<NotificationIntent> {
    let sender = event.user.username.as_str();
    let tag_url = event.tag_url();

    let mut intents = mention_intents(
        router,
        &MentionScan {
            sender,
            project_path: &event.project.path_with_namespace,
            reference: &format!(" {}", event.tag_name()),
            url: &tag_url,
            body: &event.message,
        },
    );

    let message = with_body(
        format!(
            "{} pushed tag [{}]({}) to {}",
            user_link(router, sender),
            event.tag_name(),
            tag_url,
            project_link(&event.project)
        ),
        &event.message,
    );
    let subscriptions = project_subscriptions(router, &event.project);
    let channels = subscribed_channels(&subscriptions, |sub| sub.tag());
    intents.push(NotificationIntent::broadcast(sender, channels, message));

    assemble(intents)
}
