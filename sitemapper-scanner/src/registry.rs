use std::collections::HashSet;
use tokio::sync::Mutex;

/// The set of URLs already claimed during one crawl.
///
/// The underlying set is never handed out; `claim` is the only way in, so
/// every check-and-insert happens under the lock.
#[derive(Debug, Default)]
pub struct VisitedRegistry {
    visited: Mutex<HashSet<String>>,
}

impl VisitedRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` for the first caller to claim `url`, `false` for everyone after.
    pub async fn claim(&self, url: &str) -> bool {
        self.visited.lock().await.insert(url.to_string())
    }

    /// Claim a page's links under a single lock acquisition, returning the
    /// winners in the order they were given. Repeats within `urls` lose to
    /// their first occurrence.
    pub async fn claim_all(&self, urls: Vec<String>) -> Vec<String> {
        let mut visited = self.visited.lock().await;
        urls.into_iter()
            .filter(|url| visited.insert(url.clone()))
            .collect()
    }

    pub async fn len(&self) -> usize {
        self.visited.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.visited.lock().await.is_empty()
    }
}
