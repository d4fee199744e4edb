use crate::app::prune_from_metadata;
use crate::config::toml_config::WebhookConfig;
use crate::core::PushMetadata;
use crate::domain::model::PACKAGE_ADDED_PAYLOAD;
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use std::sync::Arc;

/// Reacts to an accepted "package added" push.
pub trait PruneTrigger: Send + Sync + 'static {
    fn trigger(&self, metadata: PushMetadata);
}

/// Runs each prune on its own tokio task so the webhook answers immediately.
pub struct SpawnPrune {
    config: Arc<WebhookConfig>,
}

impl SpawnPrune {
    pub fn new(config: WebhookConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

impl PruneTrigger for SpawnPrune {
    fn trigger(&self, metadata: PushMetadata) {
        let config = Arc::clone(&self.config);
        tokio::spawn(async move {
            let result = prune_from_metadata(
                &metadata,
                &config.feed.api_key,
                config.request_timeout(),
                config.as_ref().clone(),
            )
            .await;

            match result {
                Ok(report) => tracing::info!(
                    "Pruned {}: {} deleted, {} failed",
                    metadata.package_id(),
                    report.deleted(),
                    report.failed()
                ),
                Err(e) => tracing::error!(
                    "Prune of {} failed: {} ({})",
                    metadata.package_id(),
                    e,
                    e.recovery_suggestion()
                ),
            }
        });
    }
}

#[derive(Clone)]
struct WebhookState {
    trigger: Arc<dyn PruneTrigger>,
}

pub fn router(path: &str, trigger: Arc<dyn PruneTrigger>) -> Router {
    Router::new()
        .route(path, get(banner).post(receive))
        .with_state(WebhookState { trigger })
}

async fn banner() -> &'static str {
    "This is the feed-prune webhook listener"
}

// The feed posts `application/vnd.myget.webhooks.v1+json`, so the body is parsed by hand.
async fn receive(State(state): State<WebhookState>, body: Bytes) -> StatusCode {
    let value: serde_json::Value = match serde_json::from_slice(&body) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!("Rejected webhook body: {}", e);
            return StatusCode::BAD_REQUEST;
        }
    };

    let payload_type = value
        .get("PayloadType")
        .and_then(|v| v.as_str())
        .unwrap_or_default();
    tracing::info!("Webhook received, payload type: {}", payload_type);

    if payload_type != PACKAGE_ADDED_PAYLOAD {
        tracing::debug!("Ignoring payload type {}", payload_type);
        return StatusCode::OK;
    }

    let metadata = match serde_json::from_value::<PushMetadata>(value) {
        Ok(metadata) => metadata,
        Err(e) => {
            tracing::warn!("Package added payload is incomplete: {}", e);
            return StatusCode::BAD_REQUEST;
        }
    };
    if let Err(e) = metadata.validate() {
        tracing::warn!("Package added payload is invalid: {}", e);
        return StatusCode::BAD_REQUEST;
    }

    tracing::info!(
        "Scheduling prune of {} after push of {}",
        metadata.package_id(),
        metadata.payload.package_version.as_deref().unwrap_or("unknown version")
    );
    state.trigger.trigger(metadata);

    StatusCode::OK
}

pub async fn serve(config: WebhookConfig) -> Result<()> {
    let addr = config.bind_addr()?;
    let app = router(&config.server.path, Arc::new(SpawnPrune::new(config.clone())));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(
        "Webhook listener on http://{}{}",
        addr,
        config.server.path
    );

    axum::serve(listener, app).await?;
    Ok(())
}
