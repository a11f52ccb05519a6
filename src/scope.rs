use crate::error::{Error, Result};
use url::Url;

/// Validates a seed URL, assuming `https://` when no scheme was given.
pub fn normalize_seed(raw: &str) -> Result<Url> {
    let trimmed = raw.trim();
    let candidate = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };

    let url = Url::parse(&candidate).map_err(|e| Error::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;

    if url.host_str().is_none() {
        return Err(Error::InvalidUrl {
            url: raw.to_string(),
            reason: "missing host".to_string(),
        });
    }

    Ok(url)
}

/// `scheme://host[:port]` of a URL; the port is omitted when it is the
/// scheme's default.
pub fn origin_of(url: &Url) -> String {
    let mut origin = format!("{}://{}", url.scheme(), url.host_str().unwrap_or_default());
    if let Some(port) = url.port() {
        origin.push_str(&format!(":{}", port));
    }
    origin
}

/// Whether a discovered URL belongs to the crawl.
///
/// Scope is an exact origin comparison, never a substring test, so
/// `https://example.com.evil.com` does not pass for `https://example.com`.
/// Fragments and query strings are not stripped; URLs differing only there
/// count as distinct targets.
pub fn in_scope(url: &Url, origin: &str, allow_external: bool) -> bool {
    allow_external || origin_of(url) == origin
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_without_scheme_gets_https() {
        let url = normalize_seed("example.com").unwrap();
        assert_eq!(url.as_str(), "https://example.com/");
    }

    #[test]
    fn seed_with_scheme_is_kept() {
        let url = normalize_seed("http://example.com/start").unwrap();
        assert_eq!(url.scheme(), "http");
        assert_eq!(url.path(), "/start");
    }

    #[test]
    fn empty_seed_is_rejected() {
        assert!(matches!(
            normalize_seed(""),
            Err(Error::InvalidUrl { .. })
        ));
    }

    #[test]
    fn origin_drops_default_port() {
        let url = Url::parse("https://example.com:443/a/b").unwrap();
        assert_eq!(origin_of(&url), "https://example.com");
    }

    #[test]
    fn origin_keeps_explicit_port() {
        let url = Url::parse("http://127.0.0.1:8080/a").unwrap();
        assert_eq!(origin_of(&url), "http://127.0.0.1:8080");
    }

    #[test]
    fn same_origin_is_in_scope() {
        let url = Url::parse("https://example.com/about").unwrap();
        assert!(in_scope(&url, "https://example.com", false));
    }

    #[test]
    fn lookalike_host_is_not_in_scope() {
        let url = Url::parse("https://example.com.evil.com/about").unwrap();
        assert!(!in_scope(&url, "https://example.com", false));
    }

    #[test]
    fn cross_origin_needs_the_external_flag() {
        let url = Url::parse("https://other.com/x").unwrap();
        assert!(!in_scope(&url, "https://example.com", false));
        assert!(in_scope(&url, "https://example.com", true));
    }

    #[test]
    fn port_mismatch_is_out_of_scope() {
        let url = Url::parse("http://127.0.0.1:9090/x").unwrap();
        assert!(!in_scope(&url, "http://127.0.0.1:8080", false));
    }
}
