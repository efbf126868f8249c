use crate::error::{Result, ScanError};
use crate::fetch::HttpFetcher;
use crate::frontier::{Frontier, StopHandle, WorkItem};
use crate::links::{links_on_page, normalize_url};
use crate::registry::VisitedRegistry;
use crate::result::CrawlResult;
use crate::sitemap::{Expansion, SiteMapBuilder};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use url::Url;

pub type ProgressCallback = Arc<dyn Fn(usize, String) + Send + Sync>;

pub const DEFAULT_USER_AGENT: &str = "Sitemapper/0.1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
/// Upper bound on spawned workers; larger requests are clamped to it.
pub const MAX_WORKERS: usize = 256;

pub struct Crawler {
    user_agent: String,
    timeout: Duration,
    progress_callback: Option<ProgressCallback>,
    stop: StopHandle,
}

/// Everything a worker needs, shared behind one `Arc`.
struct WorkerContext {
    fetcher: HttpFetcher,
    registry: Arc<VisitedRegistry>,
    frontier: Arc<Frontier>,
    expansions: mpsc::UnboundedSender<Expansion>,
    progress_callback: Option<ProgressCallback>,
    max_depth: usize,
}

impl Crawler {
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_TIMEOUT_SECS)
    }

    pub fn with_timeout(timeout_secs: u64) -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(timeout_secs),
            progress_callback: None,
            stop: StopHandle::new(),
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    pub fn with_stop_handle(mut self, stop: StopHandle) -> Self {
        self.stop = stop;
        self
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Crawl `seed` breadth-first up to `max_depth` link hops with `workers`
    /// concurrent fetches, returning the seed's status and latency together
    /// with the site map.
    ///
    /// Fails only on a negative depth, an unusable seed URL, or a seed that
    /// cannot be fetched at all. Failures on any other page just make that
    /// page a leaf.
    pub async fn crawl(&self, seed: &str, max_depth: i64, workers: i64) -> Result<CrawlResult> {
        let max_depth = usize::try_from(max_depth)
            .map_err(|_| ScanError::InvalidArgument(format!("invalid depth: {}", max_depth)))?;
        let workers = usize::try_from(workers).unwrap_or(0).clamp(1, MAX_WORKERS);

        let seed_url = Url::parse(seed)
            .map_err(|e| ScanError::InvalidArgument(format!("invalid url {}: {}", seed, e)))?;
        let root_url = normalize_url(&seed_url);

        info!(
            "Starting crawl of {} (max depth {}, {} workers)",
            root_url, max_depth, workers
        );

        let fetcher = HttpFetcher::new(&self.user_agent, self.timeout)?;
        let registry = Arc::new(VisitedRegistry::new());
        registry.claim(&root_url).await;

        // The probe doubles as the seed's fetch.
        let probe = fetcher.fetch(seed_url.as_str()).await.map_err(|e| {
            warn!("Seed {} could not be fetched: {}", seed, e);
            ScanError::Unreachable(seed.to_string())
        })?;
        info!(
            "Seed responded with status {} in {}ms",
            probe.status_code, probe.elapsed_ms
        );

        let mut builder = SiteMapBuilder::new(root_url.clone());
        let mut initial = Vec::new();
        if max_depth > 0 {
            let children = claim_links(&registry, &seed_url, &probe.body).await;
            initial = children.iter().map(|url| WorkItem::new(url, 1)).collect();
            builder.attach(Expansion {
                parent: root_url.clone(),
                children,
            });
        }

        let frontier = Arc::new(Frontier::new(initial, self.stop.clone()));
        let (tx, mut rx) = mpsc::unbounded_channel();
        let context = Arc::new(WorkerContext {
            fetcher,
            registry: registry.clone(),
            frontier,
            expansions: tx,
            progress_callback: self.progress_callback.clone(),
            max_depth,
        });

        let worker_handles: Vec<_> = (0..workers)
            .map(|worker_id| tokio::spawn(Self::run_worker(worker_id, context.clone())))
            .collect();
        // Workers hold the only senders now; the channel closes when the last one exits.
        drop(context);

        while let Some(expansion) = rx.recv().await {
            builder.attach(expansion);
        }

        for result in futures::future::join_all(worker_handles).await {
            result?;
        }

        let root = builder.finish();
        info!(
            "Crawl complete. {} pages mapped ({} URLs claimed)",
            root.node_count(),
            registry.len().await
        );

        Ok(CrawlResult::new(
            probe.status_code,
            probe.elapsed_ms,
            root,
        ))
    }

    async fn run_worker(worker_id: usize, context: Arc<WorkerContext>) {
        debug!("Worker {} started", worker_id);

        while let Some(item) = context.frontier.pop().await {
            if let Some(ref callback) = context.progress_callback {
                callback(worker_id, item.url.clone());
            }

            let produced = Self::visit(&context, &item).await;
            context.frontier.complete(produced).await;
        }

        debug!("Worker {} finished", worker_id);
    }

    /// Fetch one page and, if it is above the depth limit, claim and report
    /// its new links. Returns the work those links produce.
    async fn visit(context: &WorkerContext, item: &WorkItem) -> Vec<WorkItem> {
        let page = match context.fetcher.fetch(&item.url).await {
            Ok(page) => page,
            Err(e) => {
                warn!("Fetch failed for {}: {}", item.url, e);
                return Vec::new();
            }
        };
        debug!(
            "Fetched {} (status {}, depth {})",
            item.url, page.status_code, item.depth
        );

        if item.depth >= context.max_depth {
            return Vec::new();
        }

        let base = match Url::parse(&item.url) {
            Ok(base) => base,
            Err(e) => {
                warn!("Cannot use {} as a base URL: {}", item.url, e);
                return Vec::new();
            }
        };

        let children = claim_links(&context.registry, &base, &page.body).await;
        if children.is_empty() {
            return Vec::new();
        }

        let produced = children
            .iter()
            .map(|url| WorkItem::new(url, item.depth + 1))
            .collect();

        let expansion = Expansion {
            parent: item.url.clone(),
            children,
        };
        if context.expansions.send(expansion).is_err() {
            warn!("Site map builder is gone; dropping links from {}", item.url);
        }

        produced
    }
}

impl Default for Crawler {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract a page's same-domain links and keep the ones this caller wins.
async fn claim_links(registry: &VisitedRegistry, base: &Url, body: &[u8]) -> Vec<String> {
    let links = links_on_page(body, base);
    debug!("Found {} same-domain links on {}", links.len(), base);
    registry.claim_all(links).await
}
