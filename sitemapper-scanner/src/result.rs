use crate::sitemap::SiteMapNode;
use serde::{Deserialize, Serialize};

/// Outcome of a completed crawl. Status and response time come from the
/// single probe of the seed URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlResult {
    pub status_code: u16,
    pub response_time_ms: u64,
    pub root: SiteMapNode,
}

impl CrawlResult {
    pub fn new(status_code: u16, response_time_ms: u64, root: SiteMapNode) -> Self {
        Self {
            status_code,
            response_time_ms,
            root,
        }
    }

    pub fn pages_found(&self) -> usize {
        self.root.node_count()
    }
}
