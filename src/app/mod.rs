pub mod webhook;

use crate::adapters::HttpFeedClient;
use crate::core::engine::PruneEngine;
use crate::core::{ConfigProvider, PruneReport, PushMetadata};
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use std::time::Duration;

/// Validates the metadata, then runs one fetch/plan/delete pass against its feed.
pub async fn prune_from_metadata<C: ConfigProvider>(
    metadata: &PushMetadata,
    api_key: &str,
    timeout: Option<Duration>,
    config: C,
) -> Result<PruneReport> {
    metadata.validate()?;
    tracing::info!(
        "Feed: {} / package: {}",
        metadata.feed_url(),
        metadata.package_id()
    );

    let client = HttpFeedClient::with_timeout(metadata.feed_url(), api_key, timeout)?;
    let engine = PruneEngine::new(client, config, metadata.package_id());
    engine.run().await
}
