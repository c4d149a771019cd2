//! URL handling module
//!
//! This module provides link resolution, registrable-domain extraction and the
//! link filter that decides whether a discovered URL belongs to the crawl.

mod domain;
mod normalize;

use std::collections::{BTreeSet, HashSet};
use url::Url;

// Re-export main functions
pub use domain::registrable_domain;
pub use normalize::resolve_link;

/// The allow-list of registrable domains a crawl may visit
///
/// Built once from the domain registry; there is no way to add domains after
/// construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowedDomains {
    domains: BTreeSet<String>,
}

impl AllowedDomains {
    /// Creates an allow-list from apex domains (lowercased)
    pub fn new<I, S>(domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            domains: domains
                .into_iter()
                .map(|d| d.as_ref().trim().to_lowercase())
                .filter(|d| !d.is_empty())
                .collect(),
        }
    }

    /// Returns true if `domain` is on the allow-list
    pub fn contains(&self, domain: &str) -> bool {
        self.domains.contains(domain)
    }

    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    /// Iterates the allowed domains in sorted order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.domains.iter().map(String::as_str)
    }
}

/// Link filter: decides whether a discovered URL should be crawled
///
/// Returns true iff all of the following hold:
/// 1. The URL parses and its scheme is `http` or `https`
/// 2. Its registrable domain is in `allowed`
/// 3. It is not already in `visited`
///
/// `link` must already be absolute; see [`resolve_link`].
///
/// # Examples
///
/// ```
/// use std::collections::HashSet;
/// use orpheus_crawler::url::{is_in_scope, AllowedDomains};
///
/// let allowed = AllowedDomains::new(["example.com"]);
/// let visited = HashSet::new();
/// assert!(is_in_scope("https://blog.example.com/post", &allowed, &visited));
/// assert!(!is_in_scope("https://other.org/", &allowed, &visited));
/// ```
pub fn is_in_scope(link: &str, allowed: &AllowedDomains, visited: &HashSet<String>) -> bool {
    let Ok(url) = Url::parse(link) else {
        return false;
    };

    if url.scheme() != "http" && url.scheme() != "https" {
        return false;
    }

    match registrable_domain(&url) {
        Some(domain) if allowed.contains(&domain) => !visited.contains(link),
        _ => false,
    }
}
