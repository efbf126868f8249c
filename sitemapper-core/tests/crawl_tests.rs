// Tests for crawl orchestration

use sitemapper_core::crawl::{CrawlOptions, execute_crawl, extract_url_path};
use sitemapper_scanner::{ScanError, StopHandle};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

// ============================================================================
// URL Path Extraction Tests
// ============================================================================

#[test]
fn test_extract_url_path_root() {
    assert_eq!(extract_url_path("http://example.com/"), "/");
    assert_eq!(extract_url_path("http://example.com"), "/");
}

#[test]
fn test_extract_url_path_nested() {
    assert_eq!(extract_url_path("http://example.com/api/v1/users"), "/api/v1/users");
}

#[test]
fn test_extract_url_path_drops_query_and_fragment() {
    assert_eq!(extract_url_path("http://example.com/api?key=value#top"), "/api");
}

#[test]
fn test_extract_url_path_invalid_url() {
    let url = "not a valid url";
    assert_eq!(extract_url_path(url), url);
}

// ============================================================================
// Options
// ============================================================================

#[test]
fn test_default_options() {
    let options = CrawlOptions::default();
    assert_eq!(options.max_depth, 10);
    assert_eq!(options.concurrency, 10);
    assert_eq!(options.timeout_secs, 10);
    assert!(!options.show_progress_bars);
}

// ============================================================================
// Crawl execution
// ============================================================================

async fn mount_html(server: &MockServer, route: &str, html: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html")
                .set_body_string(html.to_string()),
        )
        .mount(server)
        .await;
}

async fn small_site() -> MockServer {
    let server = MockServer::start().await;
    mount_html(&server, "/", r#"<a href="/about">About</a><a href="/blog">Blog</a>"#).await;
    mount_html(&server, "/about", r#"<a href="/contact">Contact</a><a href="/">Home</a>"#).await;
    mount_html(&server, "/blog", "<p>No links here</p>").await;
    mount_html(&server, "/contact", "<p>No links here</p>").await;
    server
}

#[tokio::test]
async fn test_execute_crawl_maps_site() {
    let server = small_site().await;
    let options = CrawlOptions {
        url: server.uri(),
        max_depth: 2,
        concurrency: 2,
        ..CrawlOptions::default()
    };

    let result = execute_crawl(options, None, None).await.unwrap();

    assert_eq!(result.status_code, 200);
    let urls: HashSet<String> = result.root.urls().into_iter().map(String::from).collect();
    let expected: HashSet<String> = ["/", "/about", "/blog", "/contact"]
        .iter()
        .map(|p| format!("{}{}", server.uri(), p))
        .collect();
    assert_eq!(urls, expected);
}

#[tokio::test]
async fn test_execute_crawl_reports_each_page() {
    let server = small_site().await;
    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_clone = seen.clone();

    let options = CrawlOptions {
        url: server.uri(),
        max_depth: 1,
        concurrency: 1,
        ..CrawlOptions::default()
    };
    execute_crawl(
        options,
        Some(Arc::new(move |url: String| seen_clone.lock().unwrap().push(url))),
        None,
    )
    .await
    .unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(
        *seen,
        vec![format!("{}/about", server.uri()), format!("{}/blog", server.uri())]
    );
}

#[tokio::test]
async fn test_execute_crawl_rejects_negative_depth() {
    let options = CrawlOptions {
        url: "http://127.0.0.1:9".to_string(),
        max_depth: -1,
        ..CrawlOptions::default()
    };

    let err = execute_crawl(options, None, None).await.unwrap_err();
    assert_eq!(err.to_string(), "invalid depth: -1");
}

#[tokio::test]
async fn test_execute_crawl_unreachable_seed() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let seed = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let options = CrawlOptions {
        url: seed.clone(),
        max_depth: 1,
        timeout_secs: 2,
        ..CrawlOptions::default()
    };

    let err = execute_crawl(options, None, None).await.unwrap_err();
    assert!(matches!(err, ScanError::Unreachable(_)));
    assert_eq!(err.to_string(), format!("site {} is unreachable", seed));
}

#[tokio::test]
async fn test_execute_crawl_honours_stop_handle() {
    let server = small_site().await;
    let stop = StopHandle::new();
    stop.stop();

    let options = CrawlOptions {
        url: server.uri(),
        max_depth: 5,
        ..CrawlOptions::default()
    };
    let result = execute_crawl(options, None, Some(stop)).await.unwrap();

    // Seed links are attached when the seed is expanded; nothing below them.
    assert_eq!(result.root.node_count(), 3);
    assert!(result.root.children.iter().all(|c| c.is_leaf()));
}
