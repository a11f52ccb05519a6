use crate::error::{Error, Result};
use reqwest::Client;
use select::document::Document;
use select::predicate::{Attr, Name, Predicate};
use std::time::Duration;
use url::Url;

/// What a discovered reference points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefKind {
    Page,
    Stylesheet,
    Script,
}

/// A reference extracted from a fetched page, already resolved to an
/// absolute URL against the page it was found on.
#[derive(Debug, Clone)]
pub struct DiscoveredRef {
    pub url: Url,
    pub kind: RefKind,
}

#[derive(Debug)]
pub struct FetchedResource {
    pub bytes: Vec<u8>,
    pub is_html: bool,
    pub refs: Vec<DiscoveredRef>,
}

/// Issues one GET per URL over a shared client with a fixed timeout.
/// No retries; every failure is a per-URL error the engine can skip.
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| Error::Internal(format!("building HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    pub async fn fetch(&self, url: &Url) -> Result<FetchedResource> {
        log::info!("fetching {}", url);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| Error::Fetch {
                url: url.to_string(),
                source: e,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpStatus {
                url: url.to_string(),
                status,
            });
        }

        let is_html = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.contains("html"))
            .unwrap_or(false);

        let bytes = response.bytes().await.map_err(|e| Error::Fetch {
            url: url.to_string(),
            source: e,
        })?;

        let refs = if is_html {
            extract_refs(&String::from_utf8_lossy(&bytes), url)
        } else {
            Vec::new()
        };

        log::debug!("{}: {} bytes, {} refs", url, bytes.len(), refs.len());

        Ok(FetchedResource {
            bytes: bytes.to_vec(),
            is_html,
            refs,
        })
    }
}

/// Extracts page, stylesheet and script references in document order per
/// kind: anchors first, then `link[rel=stylesheet]`, then `script[src]`.
pub fn extract_refs(html: &str, base: &Url) -> Vec<DiscoveredRef> {
    let document = Document::from(html);
    let mut refs = Vec::new();

    for node in document.find(Name("a")) {
        if let Some(href) = node.attr("href") {
            push_ref(&mut refs, base, href, RefKind::Page);
        }
    }
    for node in document.find(Name("link").and(Attr("rel", "stylesheet"))) {
        if let Some(href) = node.attr("href") {
            push_ref(&mut refs, base, href, RefKind::Stylesheet);
        }
    }
    for node in document.find(Name("script")) {
        if let Some(src) = node.attr("src") {
            push_ref(&mut refs, base, src, RefKind::Script);
        }
    }

    refs
}

fn push_ref(refs: &mut Vec<DiscoveredRef>, base: &Url, target: &str, kind: RefKind) {
    if let Some(url) = resolve(base, target) {
        refs.push(DiscoveredRef { url, kind });
    }
}

/// Resolves an href/src against the page URL. Only http(s) targets survive;
/// mailto:, javascript:, data: and unparseable links are discarded.
fn resolve(base: &Url, target: &str) -> Option<Url> {
    let url = base.join(target).ok()?;
    match url.scheme() {
        "http" | "https" => Some(url),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://example.com/docs/page.html").unwrap()
    }

    #[test]
    fn extracts_all_three_kinds_in_order() {
        let html = r#"
            <html><head>
            <link rel="stylesheet" href="/style.css">
            <script src="/app.js"></script>
            </head><body>
            <a href="/about">About</a>
            <a href="next">Next</a>
            </body></html>
        "#;

        let refs = extract_refs(html, &base());
        let urls: Vec<_> = refs.iter().map(|r| r.url.as_str()).collect();

        assert_eq!(
            urls,
            vec![
                "https://example.com/about",
                "https://example.com/docs/next",
                "https://example.com/style.css",
                "https://example.com/app.js",
            ]
        );
        assert_eq!(refs[0].kind, RefKind::Page);
        assert_eq!(refs[2].kind, RefKind::Stylesheet);
        assert_eq!(refs[3].kind, RefKind::Script);
    }

    #[test]
    fn relative_links_resolve_against_the_page_not_the_origin() {
        let refs = extract_refs(r#"<a href="sibling">x</a>"#, &base());
        assert_eq!(refs[0].url.as_str(), "https://example.com/docs/sibling");
    }

    #[test]
    fn non_http_schemes_are_discarded() {
        let html = r#"
            <a href="mailto:someone@example.com">mail</a>
            <a href="javascript:void(0)">js</a>
            <a href="tel:+123">tel</a>
            <a href="/kept">kept</a>
        "#;
        let refs = extract_refs(html, &base());
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].url.as_str(), "https://example.com/kept");
    }

    #[test]
    fn fragment_links_stay_distinct_urls() {
        let refs = extract_refs(r##"<a href="#section">x</a>"##, &base());
        assert_eq!(
            refs[0].url.as_str(),
            "https://example.com/docs/page.html#section"
        );
    }

    #[test]
    fn non_stylesheet_links_are_ignored() {
        let html = r#"<link rel="icon" href="/favicon.ico">"#;
        assert!(extract_refs(html, &base()).is_empty());
    }

    #[test]
    fn inline_scripts_are_ignored() {
        let html = r#"<script>console.log(1)</script>"#;
        assert!(extract_refs(html, &base()).is_empty());
    }
}
