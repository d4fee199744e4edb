pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use crate::adapters::HttpFeedClient;
pub use crate::app::prune_from_metadata;
pub use crate::config::{toml_config::WebhookConfig, CliConfig};
pub use crate::core::engine::PruneEngine;
pub use crate::domain::model::{DeleteOutcome, PrunePlan, PruneReport, PushMetadata};
pub use crate::utils::error::{PruneError, Result};
