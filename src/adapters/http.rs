use crate::domain::model::FeedState;
use crate::domain::ports::FeedClient;
use crate::utils::error::{PruneError, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::Client;
use std::time::Duration;
use url::Url;

pub const API_KEY_HEADER: HeaderName = HeaderName::from_static("x-nuget-apikey");

/// Talks to a NuGet v2 style feed.
pub struct HttpFeedClient {
    client: Client,
    base_url: Url,
}

impl HttpFeedClient {
    pub fn new(feed_url: &str, api_key: &str) -> Result<Self> {
        Self::with_timeout(feed_url, api_key, None)
    }

    pub fn with_timeout(feed_url: &str, api_key: &str, timeout: Option<Duration>) -> Result<Self> {
        let base_url = Url::parse(feed_url)?;
        if base_url.cannot_be_a_base() {
            return Err(PruneError::InvalidConfigValueError {
                field: "Payload.FeedUrl".to_string(),
                value: feed_url.to_string(),
                reason: "URL cannot carry a path".to_string(),
            });
        }

        let mut key = HeaderValue::from_str(api_key).map_err(|_| {
            PruneError::InvalidConfigValueError {
                field: "key".to_string(),
                value: "<redacted>".to_string(),
                reason: "API key contains characters not allowed in a header".to_string(),
            }
        })?;
        key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/json; charset=utf-8"),
        );
        headers.insert(API_KEY_HEADER, key);

        let mut builder = Client::builder().default_headers(headers);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // checked in the constructor
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    pub fn feed_state_url(&self) -> Url {
        self.endpoint(&["api", "v2", "feed-state"])
    }

    pub fn delete_url(&self, package_id: &str, version: &str) -> Url {
        let mut url = self.endpoint(&["api", "v2", "package", package_id, version]);
        url.query_pairs_mut().append_pair("hardDelete", "true");
        url
    }
}

#[async_trait]
impl FeedClient for HttpFeedClient {
    async fn fetch_feed_state(&self) -> Result<FeedState> {
        let url = self.feed_state_url();
        tracing::debug!("Making API request to: {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        tracing::debug!("API response status: {}", status);

        let body = response.text().await?;
        if !status.is_success() {
            return Err(PruneError::FeedStateError {
                status: status.as_u16(),
                body,
            });
        }

        tracing::trace!("Feed state: {}", body);
        Ok(serde_json::from_str(&body)?)
    }

    async fn delete_version(&self, package_id: &str, version: &str) -> Result<u16> {
        let url = self.delete_url(package_id, version);
        tracing::debug!("DELETE {}", url);

        let response = self.client.delete(url).send().await?;
        Ok(response.status().as_u16())
    }
}
