use indicatif::{ProgressBar, ProgressStyle};
use sitemapper_scanner::crawler::{DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT};
use sitemapper_scanner::{CrawlResult, Crawler, ScanError, StopHandle};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::report::debug_dump;

pub const DEFAULT_MAX_DEPTH: i64 = 10;
pub const DEFAULT_CONCURRENCY: i64 = 10;

/// Options for configuring a crawl operation
#[derive(Debug, Clone)]
pub struct CrawlOptions {
    pub url: String,
    pub max_depth: i64,
    pub concurrency: i64,
    pub timeout_secs: u64,
    pub user_agent: String,
    pub show_progress_bars: bool,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self {
            url: "https://example.com".to_string(),
            max_depth: DEFAULT_MAX_DEPTH,
            concurrency: DEFAULT_CONCURRENCY,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            show_progress_bars: false,
        }
    }
}

/// Callback for reporting each page as a worker picks it up
pub type CrawlProgressCallback = Arc<dyn Fn(String) + Send + Sync>;

/// Extract the path component from a URL
pub fn extract_url_path(url: &str) -> String {
    Url::parse(url)
        .ok()
        .map(|u| {
            let path = u.path().to_string();
            if path.is_empty() || path == "/" {
                "/".to_string()
            } else {
                path
            }
        })
        .unwrap_or_else(|| url.to_string())
}

/// Execute a crawl with the given options
/// Returns the seed's status, its response time and the site map
pub async fn execute_crawl(
    options: CrawlOptions,
    progress_callback: Option<CrawlProgressCallback>,
    stop: Option<StopHandle>,
) -> Result<CrawlResult, ScanError> {
    let CrawlOptions {
        url,
        max_depth,
        concurrency,
        timeout_secs,
        user_agent,
        show_progress_bars,
    } = options;

    // Set up single progress bar for overall crawl progress (only if enabled)
    let progress_bar = if show_progress_bars {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message("Starting crawl...");
        Some(pb)
    } else {
        None
    };

    // Counter for tracking visited pages
    let processed_count = Arc::new(AtomicUsize::new(0));

    let pb_clone = progress_bar.clone();
    let count_clone = processed_count.clone();
    let internal_progress_callback: sitemapper_scanner::ProgressCallback =
        Arc::new(move |_worker_id: usize, page_url: String| {
            let count = count_clone.fetch_add(1, Ordering::Relaxed) + 1;
            if let Some(ref pb) = pb_clone {
                pb.set_message(format!(
                    "Crawling... {} pages visited ({})",
                    count,
                    extract_url_path(&page_url)
                ));
            }
            if let Some(ref callback) = progress_callback {
                callback(page_url);
            }
        });

    let mut crawler = Crawler::new()
        .with_request_timeout(Duration::from_secs(timeout_secs))
        .with_user_agent(user_agent)
        .with_progress_callback(internal_progress_callback);
    if let Some(stop) = stop {
        crawler = crawler.with_stop_handle(stop);
    }

    let outcome = crawler.crawl(&url, max_depth, concurrency).await;

    // Finish progress bar (only if enabled)
    if let Some(ref pb) = progress_bar {
        match &outcome {
            Ok(result) => pb.finish_with_message(format!(
                "Crawl complete! {} pages mapped",
                result.pages_found()
            )),
            Err(_) => pb.finish_and_clear(),
        }
    }

    if let Ok(ref result) = outcome {
        debug!(
            "Visited {} pages after the seed",
            processed_count.load(Ordering::Relaxed)
        );
        debug!("Final site map: {}", debug_dump(&result.root));
    }

    outcome
}
