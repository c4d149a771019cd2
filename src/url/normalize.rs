use url::Url;

/// Resolves an href found on a page into an absolute crawlable URL
///
/// Relative hrefs are joined against `base_url` and the fragment is
/// dropped, so `/a#top` and `/a` claim the same visited entry.
///
/// Returns None if the link should be excluded:
/// - `javascript:`, `mailto:`, `tel:` and `data:` hrefs
/// - fragment-only hrefs (same page anchors)
/// - hrefs that fail to resolve
/// - non-HTTP(S) URLs after resolution
///
/// # Examples
///
/// ```
/// use url::Url;
/// use orpheus_crawler::url::resolve_link;
///
/// let base = Url::parse("https://example.com/docs/intro").unwrap();
/// assert_eq!(
///     resolve_link("../about#team", &base),
///     Some("https://example.com/about".to_string())
/// );
/// assert_eq!(resolve_link("mailto:hi@example.com", &base), None);
/// ```
pub fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lowered = href.to_ascii_lowercase();
    if lowered.starts_with("javascript:")
        || lowered.starts_with("mailto:")
        || lowered.starts_with("tel:")
        || lowered.starts_with("data:")
    {
        return None;
    }

    let mut absolute = base_url.join(href).ok()?;
    if absolute.scheme() != "http" && absolute.scheme() != "https" {
        return None;
    }
    absolute.set_fragment(None);

    Some(absolute.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_url() -> Url {
        Url::parse("https://example.com/page").unwrap()
    }

    #[test]
    fn test_resolve_relative_link() {
        assert_eq!(
            resolve_link("/other", &base_url()),
            Some("https://example.com/other".to_string())
        );
        assert_eq!(
            resolve_link("other", &base_url()),
            Some("https://example.com/other".to_string())
        );
    }

    #[test]
    fn test_resolve_absolute_link_keeps_host() {
        assert_eq!(
            resolve_link("https://blog.example.com/post?id=1", &base_url()),
            Some("https://blog.example.com/post?id=1".to_string())
        );
    }

    #[test]
    fn test_resolve_strips_fragment() {
        assert_eq!(
            resolve_link("/other#section", &base_url()),
            Some("https://example.com/other".to_string())
        );
    }

    #[test]
    fn test_skip_special_schemes() {
        for href in [
            "javascript:void(0)",
            "JavaScript:alert(1)",
            "mailto:test@example.com",
            "tel:+1234567890",
            "data:text/html,<h1>x</h1>",
            "ftp://example.com/file",
        ] {
            assert_eq!(resolve_link(href, &base_url()), None, "{}", href);
        }
    }

    #[test]
    fn test_skip_fragment_only_and_empty() {
        assert_eq!(resolve_link("#top", &base_url()), None);
        assert_eq!(resolve_link("   ", &base_url()), None);
    }
}
