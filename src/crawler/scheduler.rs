//! Crawl frontier
//!
//! This module handles:
//! - The FIFO queue of URLs waiting to be claimed (breadth-first order)
//! - The visited set of every URL claimed during the run
//! - Filtering discovered links before they are queued
//!
//! Pending and visited state share a single mutex, so claiming a URL is an
//! atomic check-and-set across concurrent pipelines.

use crate::url::{is_in_scope, AllowedDomains};
use std::collections::{HashSet, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};
use url::Url;

#[derive(Debug, Default)]
struct FrontierInner {
    /// URLs waiting to be claimed, oldest first
    pending: VecDeque<String>,

    /// Mirror of `pending` for duplicate checks
    queued: HashSet<String>,

    /// Every URL claimed so far
    visited: HashSet<String>,
}

/// Frontier owns the pending queue and the visited set
#[derive(Debug, Default)]
pub struct Frontier {
    inner: Mutex<FrontierInner>,
}

/// Serialized form used as the frontier key
///
/// Parsing and re-serializing makes `https://example.com` and
/// `https://example.com/` the same entry. Fragments are dropped.
fn frontier_key(link: &str) -> Option<String> {
    let mut url = Url::parse(link.trim()).ok()?;
    url.set_fragment(None);
    Some(url.into())
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, FrontierInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queues the registry seeds
    ///
    /// Seeds go through the same filter as discovered links.
    ///
    /// # Returns
    ///
    /// The number of seeds queued
    pub fn seed<I, S>(&self, seeds: I, allowed: &AllowedDomains) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.merge(seeds, allowed)
    }

    /// Queues discovered links that pass the link filter
    ///
    /// Links that are out of scope, already visited or already pending are
    /// skipped.
    ///
    /// # Returns
    ///
    /// The number of links queued
    pub fn merge<I, S>(&self, links: I, allowed: &AllowedDomains) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut guard = self.lock();
        let inner = &mut *guard;
        let mut added = 0;

        for link in links {
            let Some(key) = frontier_key(link.as_ref()) else {
                tracing::debug!("Skipping unparseable link {}", link.as_ref());
                continue;
            };

            if !is_in_scope(&key, allowed, &inner.visited) {
                tracing::debug!("Skipping {} (out of scope or visited)", key);
                continue;
            }

            if inner.queued.insert(key.clone()) {
                inner.pending.push_back(key);
                added += 1;
            }
        }

        added
    }

    /// Claims the oldest pending URL that has not been visited
    ///
    /// The returned URL is already in the visited set.
    pub fn claim_next(&self) -> Option<String> {
        let mut guard = self.lock();
        let inner = &mut *guard;

        while let Some(url) = inner.pending.pop_front() {
            inner.queued.remove(&url);
            if inner.visited.insert(url.clone()) {
                return Some(url);
            }
        }

        None
    }

    /// Claims an arbitrary URL
    ///
    /// # Returns
    ///
    /// `true` if the URL was not yet visited and is now claimed by the caller
    pub fn claim(&self, url: &str) -> bool {
        let key = frontier_key(url).unwrap_or_else(|| url.to_string());
        self.lock().visited.insert(key)
    }

    pub fn is_visited(&self, url: &str) -> bool {
        let key = frontier_key(url).unwrap_or_else(|| url.to_string());
        self.lock().visited.contains(&key)
    }

    /// Number of URLs waiting to be claimed
    pub fn pending_len(&self) -> usize {
        self.lock().pending.len()
    }

    /// Number of URLs claimed so far
    pub fn visited_len(&self) -> usize {
        self.lock().visited.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().pending.is_empty()
    }
}
