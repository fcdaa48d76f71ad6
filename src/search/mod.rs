//! Debounced icon search.
//!
//! [`SearchGateway`] sits between keystrokes and an [`IconIndex`]. Every
//! query takes a new token; a query only reaches the index after surviving
//! the quiet window with its token still the latest, and its hits are only
//! committed if no newer query was issued meanwhile. Late responses to
//! superseded queries are dropped, whatever order they arrive in.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use thiserror::Error;
use tokio::task::JoinHandle;

use crate::config::{SEARCH_DEBOUNCE, SEARCH_PAGE_SIZE};
use crate::icon::IconRecord;

mod hosted;

pub use hosted::{HostedConfig, HostedIndex, HostedRequest, Transport};

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("catalog is not a list of icon records: {0}")]
    Catalog(#[from] serde_json::Error),

    #[error("index unavailable: {0}")]
    Unavailable(String),

    #[error("malformed index response: {0}")]
    Response(#[source] serde_json::Error),
}

/// A keyed lookup service returning icon records for free-text queries.
#[async_trait]
pub trait IconIndex: Send + Sync {
    async fn query(&self, text: &str, limit: usize) -> Result<Vec<IconRecord>, SearchError>;
}

// ============================================================================
// CatalogIndex
// ============================================================================

/// An index over a local catalog dump.
///
/// Matching is case-insensitive over name, label, keywords and categories.
/// Exact name matches come first, then name prefixes, then everything else,
/// each group in catalog order.
#[derive(Debug, Clone, Default)]
pub struct CatalogIndex {
    records: Vec<IconRecord>,
}

impl CatalogIndex {
    pub fn from_records(records: Vec<IconRecord>) -> Self {
        Self { records }
    }

    /// Loads a JSON array of icon records.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SearchError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| SearchError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let records: Vec<IconRecord> = serde_json::from_str(&raw)?;
        log::info!("loaded {} icons from {}", records.len(), path.display());
        Ok(Self::from_records(records))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Looks a record up by its object id.
    pub fn get(&self, object_id: &str) -> Option<&IconRecord> {
        self.records.iter().find(|r| r.object_id == object_id)
    }

    fn rank(record: &IconRecord, needle: &str) -> Option<u8> {
        let name = record.name.to_lowercase();
        if name == needle {
            return Some(0);
        }
        if name.starts_with(needle) {
            return Some(1);
        }
        let hit = name.contains(needle)
            || record.label.to_lowercase().contains(needle)
            || record
                .keywords
                .iter()
                .chain(&record.categories)
                .any(|term| term.to_lowercase().contains(needle));
        hit.then_some(2)
    }
}

#[async_trait]
impl IconIndex for CatalogIndex {
    async fn query(&self, text: &str, limit: usize) -> Result<Vec<IconRecord>, SearchError> {
        let needle = text.trim().to_lowercase();
        let mut ranked: Vec<(u8, &IconRecord)> = self
            .records
            .iter()
            .filter_map(|record| Self::rank(record, &needle).map(|rank| (rank, record)))
            .collect();
        // Stable, so catalog order survives within a rank.
        ranked.sort_by_key(|(rank, _)| *rank);
        Ok(ranked
            .into_iter()
            .take(limit)
            .map(|(_, record)| record.clone())
            .collect())
    }
}

// ============================================================================
// SearchGateway
// ============================================================================

/// What the search panel shows.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SearchState {
    #[default]
    Idle,
    Loading {
        query: String,
    },
    Ready {
        query: String,
        hits: Vec<IconRecord>,
    },
}

#[derive(Debug, Default)]
struct Inner {
    latest: u64,
    state: SearchState,
}

pub struct SearchGateway<I: ?Sized> {
    index: Arc<I>,
    inner: Arc<Mutex<Inner>>,
    debounce: Duration,
    page_size: usize,
}

impl<I: ?Sized> Clone for SearchGateway<I> {
    fn clone(&self) -> Self {
        Self {
            index: Arc::clone(&self.index),
            inner: Arc::clone(&self.inner),
            debounce: self.debounce,
            page_size: self.page_size,
        }
    }
}

impl<I: IconIndex + ?Sized + 'static> SearchGateway<I> {
    pub fn new(index: Arc<I>) -> Self {
        Self {
            index,
            inner: Arc::default(),
            debounce: SEARCH_DEBOUNCE,
            page_size: SEARCH_PAGE_SIZE,
        }
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn state(&self) -> SearchState {
        self.inner.lock().state.clone()
    }

    /// Runs one query to completion.
    ///
    /// Returns the hits if this query was still the latest when they
    /// arrived, `None` if it was superseded.
    pub async fn search(&self, query: &str) -> Option<Vec<IconRecord>> {
        let token = self.issue();
        self.run(token, query.to_string()).await
    }

    /// Feeds one keystroke's worth of query text, returning the pending
    /// search as a task.
    pub fn input(&self, query: impl Into<String>) -> JoinHandle<Option<Vec<IconRecord>>> {
        let token = self.issue();
        let gateway = self.clone();
        let query = query.into();
        tokio::spawn(async move { gateway.run(token, query).await })
    }

    fn issue(&self) -> u64 {
        let mut inner = self.inner.lock();
        inner.latest += 1;
        inner.latest
    }

    async fn run(&self, token: u64, query: String) -> Option<Vec<IconRecord>> {
        let query = query.trim().to_string();
        if query.is_empty() {
            let mut inner = self.inner.lock();
            if inner.latest != token {
                return None;
            }
            inner.state = SearchState::Idle;
            return Some(Vec::new());
        }

        tokio::time::sleep(self.debounce).await;
        {
            let mut inner = self.inner.lock();
            if inner.latest != token {
                log::trace!("search {query:?} superseded before sending");
                return None;
            }
            inner.state = SearchState::Loading {
                query: query.clone(),
            };
        }

        let hits = match self.index.query(&query, self.page_size).await {
            Ok(mut hits) => {
                // An index is free to ignore the limit; the page size is ours.
                hits.truncate(self.page_size);
                hits
            }
            Err(err) => {
                log::warn!("search {query:?} failed: {err}");
                Vec::new()
            }
        };

        let mut inner = self.inner.lock();
        if inner.latest != token {
            log::debug!("discarding stale results for {query:?}");
            return None;
        }
        log::debug!("search {query:?}: {} hits", hits.len());
        inner.state = SearchState::Ready {
            query,
            hits: hits.clone(),
        };
        Some(hits)
    }
}
