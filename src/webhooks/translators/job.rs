//! Translator for CI job events.

use crate::intent::{NotificationIntent, assemble};
use crate::routing::{Router, subscribed_channels};
use crate::webhooks::events::{JobEvent, JobStatus};

use super::{project_subscriptions, user_link};

/// Translates a job status change into a broadcast to `jobs` channels.
///
/// Only `pending`, `running`, `success` and `failed` are reported. Failed jobs
/// carry their failure reason when GitLab supplies one.
pub fn translate_job<R: Router + ?Sized>(event: &JobEvent, router: &R) -> Vec<NotificationIntent> {
    let job = &event.job;
    let (emoji, verb) = match &job.status {
        JobStatus::Pending => (":hourglass_flowing_sand:", "is pending"),
        JobStatus::Running => (":arrow_forward:", "started"),
        JobStatus::Success => (":white_check_mark:", "succeeded"),
        JobStatus::Failed => (":x:", "failed"),
        _ => return Vec::new(),
    };

    let stage = if job.stage.is_empty() {
        String::new()
    } else {
        format!(" in stage `{}`", job.stage)
    };
    let mut message = format!(
        "{} [{}] Job [{}]({}){} {} on `{}` (triggered by {})",
        emoji,
        event.project.path_with_namespace,
        job.name,
        job.url,
        stage,
        verb,
        job.git_ref,
        user_link(router, &event.user.username)
    );
    if job.status == JobStatus::Failed
        && let Some(reason) = job.failure_reason.as_deref().filter(|r| !r.is_empty())
    {
        message.push_str(&format!("\nReason: {}", reason));
    }

    let subscriptions = project_subscriptions(router, &event.project);
    let channels = subscribed_channels(&subscriptions, |sub| sub.jobs());

    assemble(vec![NotificationIntent::broadcast(
        event.user.username.as_str(),
        channels,
        message,
    )])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{ROOT_ID, TestRouter, channel, project, user};
    use crate::webhooks::events::Job;

    fn job_event(status: JobStatus) -> JobEvent {
        JobEvent {
            user: user(ROOT_ID, "root"),
            project: project(),
            job: Job {
                id: 77,
                name: "test:unit".to_string(),
                stage: "test".to_string(),
                status,
                git_ref: "main".to_string(),
                url: "https://gitlab.example.com/owner/repo/-/jobs/77".to_string(),
                failure_reason: None,
            },
        }
    }

    #[test]
    fn success_broadcasts_to_jobs_channels() {
        let router = TestRouter::new()
            .subscribe("ci", "jobs")
            .subscribe("pipelines", "pipeline");

        let intents = translate_job(&job_event(JobStatus::Success), &router);

        assert_eq!(intents.len(), 1);
        assert_eq!(intents[0].to_channels, vec![channel("ci")]);
        assert_eq!(
            intents[0].message,
            ":white_check_mark: [owner/repo] Job \
             [test:unit](https://gitlab.example.com/owner/repo/-/jobs/77) in stage `test` \
             succeeded on `main` \
             (triggered by [root](https://gitlab.example.com/root))"
        );
    }

    #[test]
    fn failure_includes_reason() {
        let router = TestRouter::new().subscribe("ci", "jobs");
        let mut event = job_event(JobStatus::Failed);
        event.job.failure_reason = Some("script_failure".to_string());

        let intents = translate_job(&event, &router);
        assert!(intents[0].message.starts_with(":x: "));
        assert!(intents[0].message.ends_with("\nReason: script_failure"));

        event.job.failure_reason = Some(String::new());
        let intents = translate_job(&event, &router);
        assert!(!intents[0].message.contains("Reason"));
    }

    #[test]
    fn stage_is_omitted_when_missing() {
        let router = TestRouter::new().subscribe("ci", "jobs");
        let mut event = job_event(JobStatus::Running);
        event.job.stage = String::new();

        let intents = translate_job(&event, &router);
        assert!(intents[0].message.contains("/-/jobs/77) started on `main`"));
    }

    #[test]
    fn pending_and_running_are_reported() {
        let router = TestRouter::new().subscribe("ci", "jobs");
        let pending = translate_job(&job_event(JobStatus::Pending), &router);
        assert!(pending[0].message.contains("is pending on"));
        let running = translate_job(&job_event(JobStatus::Running), &router);
        assert!(running[0].message.contains("started on"));
    }

    #[test]
    fn unknown_status_is_ignored() {
        let router = TestRouter::new().subscribe("ci", "jobs");
        let event = job_event(JobStatus::Unknown("preparing".into()));
        assert!(translate_job(&event, &router).is_empty());
    }

    #[test]
    fn skipped_and_canceled_are_ignored() {
        let router = TestRouter::new().subscribe("ci", "jobs");
        assert!(translate_job(&job_event(JobStatus::Skipped), &router).is_empty());
        assert!(translate_job(&job_event(JobStatus::Canceled), &router).is_empty());
    }

    #[test]
    fn no_subscribers_no_intents() {
        let router = TestRouter::new();
        assert!(translate_job(&job_event(JobStatus::Failed), &router).is_empty());
    }
}
