use crate::error::Result;
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::debug;

/// One HTTP response, as much of it as the crawl needs.
#[derive(Debug, Clone)]
pub struct Page {
    pub status_code: u16,
    pub body: Vec<u8>,
    /// Time until response headers arrived.
    pub elapsed_ms: u64,
}

/// GET-only HTTP transport with a per-request timeout.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .connect_timeout(timeout / 2)
            .pool_max_idle_per_host(50)
            .pool_idle_timeout(Duration::from_secs(90))
            .http2_adaptive_window(true)
            .tcp_keepalive(Duration::from_secs(60))
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(Self { client })
    }

    /// Any status code is a successful fetch; only transport failures are errors.
    pub async fn fetch(&self, url: &str) -> Result<Page> {
        debug!("Fetching {}", url);

        let start = Instant::now();
        let response = self.client.get(url).send().await?;
        let elapsed_ms = start.elapsed().as_millis() as u64;

        let status_code = response.status().as_u16();
        let body = response.bytes().await?.to_vec();

        Ok(Page {
            status_code,
            body,
            elapsed_ms,
        })
    }
}
