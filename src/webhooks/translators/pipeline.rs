//! Translator for pipeline events.

use crate::intent::{NotificationIntent, assemble};
use crate::routing::{Router, subscribed_channels};
use crate::webhooks::events::{PipelineEvent, PipelineStatus};

use super::{project_link, project_subscriptions, user_link};

/// Translates a pipeline status change.
///
/// # Statuses
///
/// | Status | Direct messages | Channels |
/// |--------|-----------------|----------|
/// | `running` | none | started |
/// | `success` | none | succeeded |
/// | `failed` | triggering user | failed |
///
/// The failure direct message has no sender, so it is never suppressed as a
/// self-notification.
pub fn translate_pipeline<R: Router + ?Sized>(
    event: &PipelineEvent,
    router: &R,
) -> Vec<NotificationIntent> {
    let pipeline = &event.pipeline;
    let pipeline_link = format!("[#{}]({})", pipeline.id, pipeline.url);
    let mut intents = Vec::new();

    if pipeline.status == PipelineStatus::Failed {
        intents.push(NotificationIntent::direct(
            "",
            vec![event.user.username.clone()],
            format!(
                "Your pipeline has failed for {} on `{}`: {}",
                project_link(&event.project),
                pipeline.git_ref,
                pipeline_link
            ),
        ));
    }

    let summary = |emoji: &str, verb: &str| {
        format!(
            "{} [{}] Pipeline {} {} on `{}` (triggered by {})",
            emoji,
            event.project.path_with_namespace,
            pipeline_link,
            verb,
            pipeline.git_ref,
            user_link(router, &event.user.username)
        )
    };
    let message = match &pipeline.status {
        PipelineStatus::Running => Some(summary(":arrow_forward:", "started")),
        PipelineStatus::Success => Some(summary(":white_check_mark:", "succeeded")),
        PipelineStatus::Failed => Some(summary(":x:", "failed")),
        _ => None,
    };

    if let Some(message) = message {
        let subscriptions = project_subscriptions(router, &event.project);
        let channels = subscribed_channels(&subscriptions, |sub| sub.pipeline());
        intents.push(NotificationIntent::broadcast(
            event.user.username.as_str(),
            channels,
            message,
        ));
    }

    assemble(intents)
}
