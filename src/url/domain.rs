use url::{Host, Url};

/// Returns the registrable domain (public suffix + 1 label) of a URL
///
/// IP literals and single-label hosts such as `localhost` have no public
/// suffix and are treated as their own registrable domain. A host that is
/// itself a public suffix (`co.uk`) has no registrable domain.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use orpheus_crawler::url::registrable_domain;
///
/// let url = Url::parse("https://api.v2.example.co.uk/x").unwrap();
/// assert_eq!(registrable_domain(&url), Some("example.co.uk".to_string()));
/// ```
pub fn registrable_domain(url: &Url) -> Option<String> {
    match url.host()? {
        Host::Ipv4(addr) => Some(addr.to_string()),
        Host::Ipv6(addr) => Some(addr.to_string()),
        Host::Domain(host) => {
            let host = host.trim_end_matches('.').to_lowercase();
            if !host.contains('.') {
                return Some(host);
            }
            psl::domain_str(&host).map(str::to_string)
        }
    }
}
