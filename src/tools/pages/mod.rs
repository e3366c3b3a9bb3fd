//! Page Content Tools
//!
//! Fetch-and-cache access to CMS pages with default-content fallback.

mod cache;
mod client;
mod source;
mod tests;
pub mod types;

pub use cache::PageCache;
pub use source::{page_query_url, pages_endpoint, PageSource, RestPageSource};
pub use types::*;

use log::{debug, warn};
use serde_json::Value;

/// Loads pages through a [`PageSource`], remembering every row it found.
pub struct PageLoader<S: PageSource> {
    source: S,
    cache: PageCache,
}

impl<S: PageSource> PageLoader<S> {
    pub fn new(source: S) -> Self {
        Self::with_cache(source, PageCache::new())
    }

    pub fn with_cache(source: S, cache: PageCache) -> Self {
        Self { source, cache }
    }

    /// Load the published page at `path`.
    ///
    /// A cached row is returned without a request. When the page does not
    /// exist or the request fails, `default` is returned and nothing is cached,
    /// so a later call retries.
    pub async fn load(&mut self, path: &str, default: &Value) -> LoadedPage {
        if let Some(row) = self.cache.get(path) {
            debug!("page cache hit for {path}");
            return LoadedPage::from_row(row, ContentSource::Cache);
        }

        match self.source.fetch_page(path).await {
            Ok(Some(row)) => {
                let page = LoadedPage::from_row(&row, ContentSource::Remote);
                self.cache.insert(path, row);
                page
            }
            Ok(None) => {
                warn!("no published page at {path}, using default content");
                LoadedPage::fallback(default)
            }
            Err(e) => {
                warn!("failed to load page {path}: {e}");
                LoadedPage::fallback(default)
            }
        }
    }

    pub fn cache(&self) -> &PageCache {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut PageCache {
        &mut self.cache
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}
