//! Core identifier types shared by subscriptions, events and intents.

pub mod ids;

pub use ids::{ChannelId, ProjectPath, normalize_repository};
