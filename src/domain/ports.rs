use crate::domain::model::FeedState;
use crate::utils::error::Result;
use async_trait::async_trait;

#[async_trait]
pub trait FeedClient: Send + Sync {
    async fn fetch_feed_state(&self) -> Result<FeedState>;

    /// Returns the HTTP status of the delete request.
    async fn delete_version(&self, package_id: &str, version: &str) -> Result<u16>;
}

pub trait ConfigProvider: Send + Sync {
    fn retain_count(&self) -> usize;
    fn dry_run(&self) -> bool;
}
