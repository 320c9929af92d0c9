use std::collections::HashMap;

use anyhow::{Context, bail};
use serde::Deserialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gitlab_relay::config::RelayConfig;
use gitlab_relay::delivery::{LoggingDelivery, deliver_batch};
use gitlab_relay::routing::StaticRouter;
use gitlab_relay::subscription::Subscription;
use gitlab_relay::webhooks::{WebhookEvent, translate};

/// A webhook event together with the routing tables it is translated against.
#[derive(Debug, Deserialize)]
struct Fixture {
    event: WebhookEvent,
    #[serde(default)]
    subscriptions: Vec<Subscription>,
    #[serde(default)]
    users: HashMap<u64, String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gitlab_relay=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let Some(path) = std::env::args().nth(1) else {
        bail!("usage: gitlab-relay <fixture.json>");
    };

    let raw = tokio::fs::read_to_string(&path)
        .await
        .with_context(|| format!("reading {}", path))?;
    let fixture: Fixture =
        serde_json::from_str(&raw).with_context(|| format!("parsing {}", path))?;

    let config = RelayConfig::from_env();
    tracing::info!(gitlab_url = %config.gitlab_url, event = fixture.event.kind(), "translating");

    let router = StaticRouter::new(config)
        .with_users(fixture.users)
        .with_subscriptions(fixture.subscriptions);
    let intents = translate(&fixture.event, &router);

    let report = deliver_batch(&LoggingDelivery::new(), &intents).await;
    tracing::info!(?report, "delivery finished");

    println!(
        "{}",
        serde_json::to_string_pretty(&intents).context("serializing intents")?
    );
    Ok(())
}
