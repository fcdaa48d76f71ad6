//! Queries against the hosted icon index.
//!
//! [`HostedIndex`] speaks the index's JSON query protocol and leaves the
//! network to a [`Transport`], so the protocol can be exercised without
//! one.

use async_trait::async_trait;
use serde::Deserialize;

use super::{IconIndex, SearchError};
use crate::config::{HOSTED_APP_ID, HOSTED_HITS_PER_PAGE, HOSTED_INDEX_NAME, HOSTED_SEARCH_KEY};
use crate::icon::IconRecord;

/// One POST to the index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostedRequest {
    pub url: String,
    pub headers: Vec<(&'static str, String)>,
    pub body: String,
}

/// Sends a request and returns the response body.
///
/// Implementations report a non-success status as
/// [`SearchError::Unavailable`].
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post(&self, request: HostedRequest) -> Result<String, SearchError>;
}

/// Where and how to query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostedConfig {
    pub app_id: String,
    pub search_key: String,
    pub index_name: String,
    pub hits_per_page: usize,
}

impl Default for HostedConfig {
    fn default() -> Self {
        Self {
            app_id: HOSTED_APP_ID.to_string(),
            search_key: HOSTED_SEARCH_KEY.to_string(),
            index_name: HOSTED_INDEX_NAME.to_string(),
            hits_per_page: HOSTED_HITS_PER_PAGE,
        }
    }
}

#[derive(Deserialize)]
struct QueryResponse {
    hits: Vec<IconRecord>,
}

pub struct HostedIndex<T> {
    config: HostedConfig,
    transport: T,
}

impl<T: Transport> HostedIndex<T> {
    pub fn new(transport: T) -> Self {
        Self::with_config(HostedConfig::default(), transport)
    }

    pub fn with_config(config: HostedConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &HostedConfig {
        &self.config
    }

    /// Builds the request for `text`, asking for at most `limit` hits.
    pub fn request(&self, text: &str, limit: usize) -> HostedRequest {
        let body = serde_json::json!({
            "query": text,
            "hitsPerPage": limit.min(self.config.hits_per_page),
        });
        HostedRequest {
            url: format!(
                "https://{}-dsn.algolia.net/1/indexes/{}/query",
                self.config.app_id.to_lowercase(),
                self.config.index_name
            ),
            headers: vec![
                ("X-Algolia-Application-Id", self.config.app_id.clone()),
                ("X-Algolia-API-Key", self.config.search_key.clone()),
                ("Content-Type", "application/json".to_string()),
            ],
            body: body.to_string(),
        }
    }
}

#[async_trait]
impl<T: Transport> IconIndex for HostedIndex<T> {
    async fn query(&self, text: &str, limit: usize) -> Result<Vec<IconRecord>, SearchError> {
        let request = self.request(text, limit);
        log::debug!("querying {} for {text:?}", self.config.index_name);
        let raw = self.transport.post(request).await?;
        let response: QueryResponse =
            serde_json::from_str(&raw).map_err(SearchError::Response)?;
        Ok(response.hits)
    }
}
