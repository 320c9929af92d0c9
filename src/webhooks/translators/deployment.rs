//! Translator for deployment events.

use crate::intent::{NotificationIntent, assemble};
use crate::routing::{Router, subscribed_channels};
use crate::webhooks::events::{DeploymentEvent, DeploymentStatus};

use super::{project_subscriptions, user_link};

/// Translates a deployment status change into a broadcast to `deployments`
/// channels.
pub fn translate_deployment<R: Router + ?Sized>(
    event: &DeploymentEvent,
    router: &R,
) -> Vec<NotificationIntent> {
    let (emoji, verb) = match &event.status {
        DeploymentStatus::Created => (":new:", "was created"),
        DeploymentStatus::Running => (":arrow_forward:", "started"),
        DeploymentStatus::Success => (":white_check_mark:", "succeeded"),
        DeploymentStatus::Failed => (":x:", "failed"),
        DeploymentStatus::Canceled => (":no_entry_sign:", "was canceled"),
        DeploymentStatus::Unknown(_) => return Vec::new(),
    };

    let deployment = if event.deployable_url.is_empty() {
        format!("#{}", event.deployment_id)
    } else {
        format!("[#{}]({})", event.deployment_id, event.deployable_url)
    };
    let mut message = format!(
        "{} [{}] Deployment {} of [`{}`]({}) to **{}** {} (triggered by {})",
        emoji,
        event.project.path_with_namespace,
        deployment,
        event.short_sha,
        event.commit_url,
        event.environment,
        verb,
        user_link(router, &event.user.username)
    );
    if event.status == DeploymentStatus::Failed
        && let Some(reason) = event.failure_reason.as_deref().filter(|r| !r.is_empty())
    {
        message.push_str(&format!("\nReason: {}", reason));
    }

    let subscriptions = project_subscriptions(router, &event.project);
    let channels = subscribed_channels(&subscriptions, |sub| sub.deployments());

    assemble(vec![NotificationIntent::broadcast(
        event.user.username.as_str(),
        channels,
        message,
    )])
}
