pub mod engine;
pub mod grouping;

pub use crate::domain::model::{
    DeleteOutcome, FeedPackage, FeedState, PrunePlan, PruneReport, PushMetadata, VersionGroup,
};
pub use crate::domain::ports::{ConfigProvider, FeedClient};
pub use crate::utils::error::Result;
