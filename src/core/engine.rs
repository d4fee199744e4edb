use crate::core::grouping::plan_deletions;
use crate::core::{ConfigProvider, DeleteOutcome, FeedClient, PrunePlan, PruneReport};
use crate::utils::error::Result;

pub struct PruneEngine<F: FeedClient, C: ConfigProvider> {
    client: F,
    config: C,
    package_id: String,
}

impl<F: FeedClient, C: ConfigProvider> PruneEngine<F, C> {
    pub fn new(client: F, config: C, package_id: impl Into<String>) -> Self {
        Self {
            client,
            config,
            package_id: package_id.into(),
        }
    }

    pub fn package_id(&self) -> &str {
        &self.package_id
    }

    pub async fn versions(&self) -> Result<Vec<String>> {
        let state = self.client.fetch_feed_state().await?;
        tracing::debug!("Feed state lists {} packages", state.packages.len());

        match state.versions_of(&self.package_id) {
            Some(versions) => {
                tracing::debug!("Versions of {}: {:?}", self.package_id, versions);
                Ok(versions.to_vec())
            }
            None => {
                tracing::warn!("Package {} not found in feed, nothing to prune", self.package_id);
                Ok(Vec::new())
            }
        }
    }

    pub fn plan(&self, versions: &[String]) -> PrunePlan {
        let plan = plan_deletions(&self.package_id, versions, self.config.retain_count());

        for group in &plan.groups {
            tracing::debug!("Group {}: {} versions", group.label, group.versions.len());
        }
        tracing::info!(
            "{} of {} versions exceed the retention of {} per group",
            plan.to_delete.len(),
            versions.len(),
            plan.retain
        );

        plan
    }

    pub async fn apply(&self, plan: PrunePlan) -> Result<PruneReport> {
        let mut outcomes = Vec::with_capacity(plan.to_delete.len());

        for version in &plan.to_delete {
            if self.config.dry_run() {
                tracing::info!("Would delete {}/{}", plan.package_id, version);
                outcomes.push((version.clone(), DeleteOutcome::Skipped));
                continue;
            }

            tracing::debug!("Deleting {}/{}", plan.package_id, version);
            let status = self.client.delete_version(&plan.package_id, version).await?;

            let outcome = if status == 200 {
                tracing::info!("Deleted {}/{}", plan.package_id, version);
                DeleteOutcome::Deleted
            } else {
                tracing::warn!("Delete of {}/{} rejected with {}", plan.package_id, version, status);
                DeleteOutcome::Failed { status }
            };
            outcomes.push((version.clone(), outcome));
        }

        Ok(PruneReport { plan, outcomes })
    }

    pub async fn run(&self) -> Result<PruneReport> {
        tracing::info!("Pruning old versions of {}", self.package_id);

        let versions = self.versions().await?;
        let plan = self.plan(&versions);
        let report = self.apply(plan).await?;

        tracing::info!(
            "Prune finished: {} deleted, {} failed, {} skipped",
            report.deleted(),
            report.failed(),
            report.skipped()
        );

        Ok(report)
    }
}
