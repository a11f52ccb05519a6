use url::Url;

/// Characters that are not legal in filenames on all supported platforms.
/// `/` is excluded on purpose: segments are sanitized individually so the
/// mirror keeps the site's directory structure instead of flattening it.
const ILLEGAL: &[char] = &['<', '>', ':', '"', '\\', '|', '?', '*'];

/// Maps an absolute URL to a relative path under the mirror root.
///
/// In-origin URLs keep their path below the origin; cross-origin URLs keep
/// the whole URL as the path, which puts each external host in its own
/// subtree. The mapping is deterministic but not injective: colliding URLs
/// overwrite each other.
pub fn local_path(url: &Url, origin: &str) -> String {
    let full = url.as_str();
    let mut remainder = full
        .strip_prefix(origin)
        .unwrap_or(full)
        .trim()
        .to_string();

    if remainder.is_empty() {
        return "index.html".to_string();
    }
    if remainder.ends_with('/') {
        remainder.push_str("index.html");
    }

    // Routes without an extension are saved as pages.
    let last = remainder.rsplit('/').next().unwrap_or(&remainder);
    if !last.contains('.') {
        remainder.push_str(".html");
    }

    remainder
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(sanitize_segment)
        .collect::<Vec<_>>()
        .join("/")
}

fn sanitize_segment(segment: &str) -> String {
    // Pure dot segments would climb out of the mirror root. They survive URL
    // normalization only inside query strings, since `Url` resolves them in
    // paths.
    if segment == "." || segment == ".." {
        return "_".repeat(segment.len());
    }
    segment
        .chars()
        .map(|c| if ILLEGAL.contains(&c) { '_' } else { c })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORIGIN: &str = "https://example.com";

    fn map(url: &str) -> String {
        local_path(&Url::parse(url).unwrap(), ORIGIN)
    }

    #[test]
    fn root_maps_to_index() {
        assert_eq!(map("https://example.com"), "index.html");
        assert_eq!(map("https://example.com/"), "index.html");
    }

    #[test]
    fn directory_url_gets_index() {
        assert_eq!(map("https://example.com/docs/"), "docs/index.html");
    }

    #[test]
    fn extensionless_route_becomes_page() {
        assert_eq!(map("https://example.com/app"), "app.html");
        assert_eq!(map("https://example.com/a/b/about"), "a/b/about.html");
    }

    #[test]
    fn files_with_extensions_are_untouched() {
        assert_eq!(map("https://example.com/style.css"), "style.css");
        assert_eq!(map("https://example.com/js/app.js"), "js/app.js");
        assert_eq!(map("https://example.com/logo.png"), "logo.png");
    }

    #[test]
    fn query_string_is_part_of_the_name() {
        assert_eq!(map("https://example.com/page?q=1"), "page_q=1.html");
    }

    #[test]
    fn illegal_characters_are_replaced_per_segment() {
        assert_eq!(
            map("https://example.com/a:b/c|d.css"),
            "a_b/c_d.css"
        );
    }

    #[test]
    fn cross_origin_url_lands_in_its_own_subtree() {
        assert_eq!(
            map("https://other.com/x"),
            "https_/other.com/x.html"
        );
    }

    #[test]
    fn dot_segments_cannot_escape_the_mirror_root() {
        assert_eq!(
            map("https://example.com/p?q=../../x"),
            "p_q=../__/x.html"
        );
    }

    #[test]
    fn mapping_is_deterministic() {
        assert_eq!(map("https://example.com/docs/guide"), map("https://example.com/docs/guide"));
    }
}
