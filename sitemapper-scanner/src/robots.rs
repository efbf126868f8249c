use crate::fetch::HttpFetcher;
use tracing::debug;

/// robots.txt gate consulted before a crawl starts.
///
/// The file is fetched but its rules are not evaluated: every URL is allowed,
/// whether or not robots.txt could be retrieved. Callers must not rely on this
/// for policy enforcement.
#[derive(Debug, Clone)]
pub struct RobotsPolicy {
    fetcher: HttpFetcher,
}

impl RobotsPolicy {
    pub fn new(fetcher: HttpFetcher) -> Self {
        Self { fetcher }
    }

    pub fn robots_url(url: &str) -> String {
        format!("{}/robots.txt", url.trim_end_matches('/'))
    }

    pub async fn is_allowed(&self, url: &str, user_agent: &str) -> bool {
        let robots_url = Self::robots_url(url);
        match self.fetcher.fetch(&robots_url).await {
            Ok(page) => {
                debug!(
                    "Fetched {} (status {}, {} bytes) for {}; rules are not evaluated",
                    robots_url,
                    page.status_code,
                    page.body.len(),
                    user_agent
                );
            }
            Err(e) => {
                debug!("Could not fetch {}: {}; assuming allowed", robots_url, e);
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path},
    };

    #[test]
    fn test_robots_url() {
        assert_eq!(
            RobotsPolicy::robots_url("https://example.com/"),
            "https://example.com/robots.txt"
        );
        assert_eq!(
            RobotsPolicy::robots_url("https://example.com"),
            "https://example.com/robots.txt"
        );
    }

    #[tokio::test]
    async fn test_disallow_rules_are_not_enforced() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/robots.txt"))
            .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let fetcher = HttpFetcher::new("test-agent", Duration::from_secs(5)).unwrap();
        let policy = RobotsPolicy::new(fetcher);

        assert!(policy.is_allowed(&mock_server.uri(), "test-agent").await);
    }

    #[tokio::test]
    async fn test_unreachable_robots_is_allowed() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let fetcher = HttpFetcher::new("test-agent", Duration::from_secs(2)).unwrap();
        let policy = RobotsPolicy::new(fetcher);

        assert!(policy.is_allowed(&format!("http://{}", addr), "test-agent").await);
    }
}
