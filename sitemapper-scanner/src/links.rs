//! Link extraction: turns a fetched page into the ordered list of same-domain
//! URLs it references.

use scraper::{Html, Selector};
use std::sync::LazyLock;
use tracing::debug;
use url::Url;

static LINK_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("static selector is valid"));

/// Canonical string form of a URL, used as the node identity in the site map.
/// Fragments never reach the server, so they are dropped.
pub fn normalize_url(url: &Url) -> String {
    let mut url = url.clone();
    url.set_fragment(None);
    url.to_string()
}

/// Resolve `href` against `base` following RFC 3986 reference resolution.
pub fn resolve_url(base: &Url, href: &str) -> Option<Url> {
    match base.join(href) {
        Ok(resolved) => Some(resolved),
        Err(e) => {
            debug!("Skipping malformed href {:?} on {}: {}", href, base, e);
            None
        }
    }
}

/// Host-exact comparison, including an explicit port. The scheme is not
/// part of the site: `https://host/x` on an `http://host/` page is the same
/// domain, while subdomains and `host:8080` are not.
pub fn is_same_domain(url: &Url, base: &Url) -> bool {
    match (url.host_str(), base.host_str()) {
        (Some(host), Some(base_host)) => host == base_host && url.port() == base.port(),
        _ => false,
    }
}

/// Parse any byte body as HTML. Invalid UTF-8 sequences (a Latin-1 page, a
/// binary asset) are replaced rather than rejected, so parsing never fails.
pub fn parse_document(body: &[u8]) -> Html {
    Html::parse_document(&String::from_utf8_lossy(body))
}

/// Walk every `<a href>` in document order and collect the same-domain
/// targets. Duplicates are kept; the visited registry decides what is new.
pub fn extract_links(document: &Html, base: &Url) -> Vec<String> {
    document
        .select(&LINK_SELECTOR)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| resolve_url(base, href))
        .filter(|resolved| is_same_domain(resolved, base))
        .map(|resolved| normalize_url(&resolved))
        .collect()
}

/// Parse `body` and extract its links in one step. The parsed document does
/// not outlive this call, which keeps callers' futures `Send`.
pub fn links_on_page(body: &[u8], base: &Url) -> Vec<String> {
    let document = parse_document(body);
    extract_links(&document, base)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("http://example.com/docs/index.html").unwrap()
    }

    fn links(html: &str) -> Vec<String> {
        links_on_page(html.as_bytes(), &base())
    }

    #[test]
    fn test_resolves_relative_forms() {
        let html = r#"<html><body>
            <a href="guide.html">relative</a>
            <a href="/about">absolute path</a>
            <a href="../up">dot segments</a>
            <a href="//example.com/proto">protocol relative</a>
            <a href="http://example.com/full">absolute</a>
            <a href="?page=2">query only</a>
        </body></html>"#;

        assert_eq!(
            links(html),
            vec![
                "http://example.com/docs/guide.html",
                "http://example.com/about",
                "http://example.com/up",
                "http://example.com/proto",
                "http://example.com/full",
                "http://example.com/docs/index.html?page=2",
            ]
        );
    }

    #[test]
    fn test_fragment_only_resolves_to_page_itself() {
        let found = links(r##"<a href="#section">jump</a>"##);
        assert_eq!(found, vec!["http://example.com/docs/index.html"]);
    }

    #[test]
    fn test_fragment_is_stripped() {
        let found = links(r#"<a href="/about#team">team</a>"#);
        assert_eq!(found, vec!["http://example.com/about"]);
    }

    #[test]
    fn test_filters_other_hosts() {
        let html = r#"
            <a href="https://other.com/x">other</a>
            <a href="http://sub.example.com/y">subdomain</a>
            <a href="http://example.com:8080/z">other port</a>
            <a href="mailto:someone@example.com">mail</a>
            <a href="javascript:void(0)">js</a>
            <a href="/kept">kept</a>
        "#;
        assert_eq!(links(html), vec!["http://example.com/kept"]);
    }

    #[test]
    fn test_scheme_change_on_same_host_is_same_domain() {
        let found = links(r#"<a href="https://example.com/secure">secure</a>"#);
        assert_eq!(found, vec!["https://example.com/secure"]);

        let secure = Url::parse("https://example.com/secure").unwrap();
        let plain = Url::parse("http://example.com/").unwrap();
        assert!(is_same_domain(&secure, &plain));
    }

    #[test]
    fn test_explicit_port_must_match() {
        let base = Url::parse("http://example.com:8080/").unwrap();
        let same = Url::parse("http://example.com:8080/a").unwrap();
        let default_port = Url::parse("http://example.com/a").unwrap();
        assert!(is_same_domain(&same, &base));
        assert!(!is_same_domain(&default_port, &base));
    }

    #[test]
    fn test_keeps_duplicates_in_document_order() {
        let html = r#"<a href="/a">1</a><a href="/b">2</a><a href="/a">3</a>"#;
        assert_eq!(
            links(html),
            vec![
                "http://example.com/a",
                "http://example.com/b",
                "http://example.com/a",
            ]
        );
    }

    #[test]
    fn test_malformed_href_is_skipped() {
        let html = r#"<a href="http://[broken">bad</a><a href="/good">good</a>"#;
        assert_eq!(links(html), vec!["http://example.com/good"]);
    }

    #[test]
    fn test_anchor_without_href_is_ignored() {
        let html = r#"<a name="top">anchor</a><a href="/x">x</a>"#;
        assert_eq!(links(html), vec!["http://example.com/x"]);
    }

    #[test]
    fn test_nested_anchors_are_found() {
        let html = r#"<div><ul><li><a href="/deep">deep</a></li></ul></div><p><a href="/p">p</a></p>"#;
        assert_eq!(
            links(html),
            vec!["http://example.com/deep", "http://example.com/p"]
        );
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let html = r#"<a href="/one">1</a><a href="two">2</a><a href="//example.com/three">3</a>"#;
        let document = parse_document(html.as_bytes());
        let first = extract_links(&document, &base());
        let second = extract_links(&document, &base());
        assert_eq!(first, second);
        assert_eq!(first.len(), 3);
    }

    #[test]
    fn test_latin1_page_still_yields_links() {
        let body = b"<p>caf\xe9</p><a href=\"/menu\">menu</a>";
        let base = Url::parse("http://example.com/").unwrap();
        assert_eq!(links_on_page(body, &base), vec!["http://example.com/menu"]);
    }

    #[test]
    fn test_binary_body_yields_no_links() {
        assert!(links_on_page(&[0x89, 0xff, 0xfe, 0x00, 0x80], &base()).is_empty());
    }

    #[test]
    fn test_normalize_url_adds_root_slash() {
        let url = Url::parse("http://Example.COM").unwrap();
        assert_eq!(normalize_url(&url), "http://example.com/");
    }
}
