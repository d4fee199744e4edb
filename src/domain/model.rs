use crate::utils::error::{PruneError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_url, Validate};
use serde::Deserialize;
use std::path::Path;

pub const PACKAGE_ADDED_PAYLOAD: &str = "PackageAddedWebHookEventPayloadV1";

/// Push notification describing a package on a feed. The metadata file
/// handed to the CLI and the webhook body share this shape.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PushMetadata {
    #[serde(default)]
    pub payload_type: Option<String>,
    pub payload: PushPayload,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PushPayload {
    pub feed_url: String,
    pub package_identifier: String,
    #[serde(default)]
    pub package_version: Option<String>,
    #[serde(default)]
    pub package_type: Option<String>,
    #[serde(default)]
    pub feed_identifier: Option<String>,
}

impl PushMetadata {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| PruneError::MetadataError {
            message: e.to_string(),
        })
    }

    pub fn feed_url(&self) -> &str {
        &self.payload.feed_url
    }

    pub fn package_id(&self) -> &str {
        &self.payload.package_identifier
    }
}

impl Validate for PushMetadata {
    fn validate(&self) -> Result<()> {
        validate_url("Payload.FeedUrl", &self.payload.feed_url)?;
        validate_non_empty_string(
            "Payload.PackageIdentifier",
            &self.payload.package_identifier,
        )
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedState {
    #[serde(default)]
    pub packages: Vec<FeedPackage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeedPackage {
    pub id: String,
    #[serde(default)]
    pub versions: Vec<String>,
}

impl FeedState {
    pub fn versions_of(&self, package_id: &str) -> Option<&[String]> {
        self.packages
            .iter()
            .find(|p| p.id == package_id)
            .map(|p| p.versions.as_slice())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionGroup {
    pub label: String,
    /// Newest first.
    pub versions: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct PrunePlan {
    pub package_id: String,
    pub retain: usize,
    pub groups: Vec<VersionGroup>,
    pub to_delete: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    Failed { status: u16 },
    Skipped,
}

#[derive(Debug, Clone)]
pub struct PruneReport {
    pub plan: PrunePlan,
    pub outcomes: Vec<(String, DeleteOutcome)>,
}

impl PruneReport {
    /// One console line per selected version, in deletion order.
    pub fn outcome_lines(&self) -> Vec<String> {
        self.outcomes
            .iter()
            .map(|(version, outcome)| match outcome {
                DeleteOutcome::Deleted => format!("Deleted {}/{}", self.plan.package_id, version),
                DeleteOutcome::Failed { status } => format!("Delete Failure (code: {})", status),
                DeleteOutcome::Skipped => {
                    format!("Would delete {}/{}", self.plan.package_id, version)
                }
            })
            .collect()
    }

    fn count(&self, pred: impl Fn(&DeleteOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|(_, o)| pred(o)).count()
    }

    pub fn deleted(&self) -> usize {
        self.count(|o| *o == DeleteOutcome::Deleted)
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, DeleteOutcome::Failed { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| *o == DeleteOutcome::Skipped)
    }
}
