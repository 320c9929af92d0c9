//! GitLab webhook events and their translation into notification intents.
//!
//! - [`events`] - typed event payloads
//! - [`translators`] - one pure translator per event kind, plus [`translate`]

pub mod events;
pub mod translators;

pub use events::{Project, User, WebhookEvent};
pub use translators::{
    translate, translate_deployment, translate_issue, translate_issue_comment, translate_job,
    translate_merge_request, translate_merge_request_comment, translate_pipeline, translate_push,
    translate_release, translate_tag,
};
