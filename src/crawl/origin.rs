// src/crawl/origin.rs
// =============================================================================
// This module decides which hrefs the crawler follows.
//
// Every fetched page gets an "origin": the scheme and host of the URL we
// ended up at after redirects, e.g. "https://example.com". Hrefs found on
// the page are turned into absolute URLs and then kept only if they start
// with that origin.
//
// Two resolution policies exist:
// - Prefix (default): a deliberately small rule set. "/x" and "./x" are
//   glued onto the origin, "http..." is taken as-is, everything else is
//   dropped. "../x" and "page.html" are NOT followed.
// - Standard: real relative-URL resolution against the page URL (what a
//   browser does), using Url::join.
//
// The origin check is a plain string prefix test in both cases. That means
// "https://example.com.evil.net/" passes for origin "https://example.com",
// and "http://example.com/x" fails for origin "https://example.com".
// =============================================================================

use url::Url;

use crate::link::Link;

/// How raw hrefs are turned into absolute URLs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HrefPolicy {
    /// Only `/x`, `./x` and `http...` hrefs; see the module notes.
    #[default]
    Prefix,
    /// Resolve relative hrefs against the page URL.
    Standard,
}

// Returns "scheme://host[:port]" for a URL, without a trailing slash
//
// The port is only present when it isn't the scheme's default.
// Returns None for URLs without a host (mailto:, data:, ...).
pub fn origin_of(url: &Url) -> Option<String> {
    let host = url.host_str()?;

    let origin = match url.port() {
        Some(port) => format!("{}://{}:{}", url.scheme(), host, port),
        None => format!("{}://{}", url.scheme(), host),
    };
    Some(origin)
}

// Turns the links of one fetched page into same-origin absolute URLs
//
// Parameters:
//   links: what the extractor found on the page
//   final_url: where the fetch ended up after redirects
//   policy: how to resolve relative hrefs
//
// Duplicates are not removed here; the frontier takes care of that.
pub fn same_origin_urls(links: &[Link], final_url: &str, policy: HrefPolicy) -> Vec<String> {
    let page = match Url::parse(final_url) {
        Ok(url) => url,
        Err(_) => return Vec::new(),
    };
    let origin = match origin_of(&page) {
        Some(origin) => origin,
        None => return Vec::new(),
    };

    links
        .iter()
        .filter_map(|link| policy.resolve(&link.href, &origin, &page))
        .filter(|url| url.starts_with(&origin))
        .collect()
}

impl HrefPolicy {
    fn resolve(self, href: &str, origin: &str, page: &Url) -> Option<String> {
        match self {
            HrefPolicy::Prefix => resolve_prefix(href, origin),
            HrefPolicy::Standard => resolve_standard(href, page),
        }
    }
}

fn resolve_prefix(href: &str, origin: &str) -> Option<String> {
    if href.starts_with('/') {
        Some(format!("{}{}", origin, href))
    } else if let Some(rest) = href.strip_prefix('.') {
        // Only "./x"; the "/" after the dot is kept
        rest.starts_with('/').then(|| format!("{}{}", origin, rest))
    } else if href.starts_with("http") {
        Some(href.to_string())
    } else {
        None
    }
}

fn resolve_standard(href: &str, page: &Url) -> Option<String> {
    // Same-page anchors and empty hrefs point back at the page itself
    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let mut url = page.join(href).ok()?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return None;
    }
    url.set_fragment(None);

    Some(url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn links(hrefs: &[&str]) -> Vec<Link> {
        hrefs
            .iter()
            .map(|href| Link {
                href: href.to_string(),
                text: String::new(),
            })
            .collect()
    }

    #[rstest]
    #[case("https://example.com", "https://example.com")]
    #[case("https://example.com/a/b?q=1#frag", "https://example.com")]
    #[case("http://example.com:8080/x", "http://example.com:8080")]
    #[case("https://example.com:443/x", "https://example.com")]
    #[case("https://user:pw@example.com/x", "https://example.com")]
    fn test_origin_of(#[case] url: &str, #[case] expected: &str) {
        let url = Url::parse(url).unwrap();
        assert_eq!(origin_of(&url).as_deref(), Some(expected));
    }

    #[test]
    fn test_origin_of_url_without_host() {
        let url = Url::parse("mailto:someone@example.com").unwrap();
        assert_eq!(origin_of(&url), None);
    }

    #[rstest]
    #[case("/path", Some("https://example.com/path"))]
    #[case("/", Some("https://example.com/"))]
    #[case("./page", Some("https://example.com/page"))]
    #[case("https://example.com/x", Some("https://example.com/x"))]
    #[case("http://example.com/x", Some("http://example.com/x"))]
    #[case("https://other.com/x", Some("https://other.com/x"))]
    #[case("../up", None)]
    #[case(".hidden", None)]
    #[case("page.html", None)]
    #[case("#section", None)]
    #[case("?q=1", None)]
    #[case("mailto:me@example.com", None)]
    #[case("javascript:void(0)", None)]
    #[case("", None)]
    fn test_resolve_prefix(#[case] href: &str, #[case] expected: Option<&str>) {
        assert_eq!(resolve_prefix(href, "https://example.com").as_deref(), expected);
    }

    #[test]
    fn test_origin_filtering() {
        let found = links(&[
            "https://other.com/x",
            "http://example.com/x",
            "/path",
            "https://example.com/kept",
            "mailto:me@example.com",
        ]);
        let urls = same_origin_urls(&found, "https://example.com/index.html", HrefPolicy::Prefix);
        assert_eq!(
            urls,
            vec!["https://example.com/path", "https://example.com/kept"]
        );
    }

    #[test]
    fn test_prefix_check_is_textual() {
        let found = links(&["https://example.com.evil.net/x"]);
        let urls = same_origin_urls(&found, "https://example.com/", HrefPolicy::Prefix);
        assert_eq!(urls, vec!["https://example.com.evil.net/x"]);
    }

    #[test]
    fn test_origin_comes_from_final_url() {
        // Requested http://example.com, redirected to https://www.example.com/home
        let found = links(&["/about", "http://example.com/old"]);
        let urls = same_origin_urls(&found, "https://www.example.com/home", HrefPolicy::Prefix);
        assert_eq!(urls, vec!["https://www.example.com/about"]);
    }

    #[test]
    fn test_unparseable_final_url_yields_nothing() {
        let found = links(&["/about"]);
        assert!(same_origin_urls(&found, "not a url", HrefPolicy::Prefix).is_empty());
    }

    #[rstest]
    #[case("../up", Some("https://example.com/up"))]
    #[case("page.html", Some("https://example.com/docs/page.html"))]
    #[case("./page", Some("https://example.com/docs/page"))]
    #[case("/root#frag", Some("https://example.com/root"))]
    #[case("?q=1", Some("https://example.com/docs/guide?q=1"))]
    #[case("#section", None)]
    #[case("", None)]
    #[case("mailto:me@example.com", None)]
    fn test_resolve_standard(#[case] href: &str, #[case] expected: Option<&str>) {
        let page = Url::parse("https://example.com/docs/guide").unwrap();
        assert_eq!(resolve_standard(href, &page).as_deref(), expected);
    }

    #[test]
    fn test_standard_policy_still_filters_origin() {
        let found = links(&["sibling", "https://other.com/x", "http://example.com/y"]);
        let urls = same_origin_urls(&found, "https://example.com/dir/", HrefPolicy::Standard);
        assert_eq!(urls, vec!["https://example.com/dir/sibling"]);
    }
}
