//! Shortlink expansion
//!
//! URLs on the shortlink domain are expanded with a HEAD request before they
//! are fetched. The redirect chain is followed by the client's redirect
//! policy; only a final 200 counts as resolved.

use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Expands a shortlink to the URL it redirects to
///
/// Returns `None` when the final status is not 200 or the request fails.
/// Failures are logged at warn level and are never retried.
pub async fn resolve_shortlink(client: &Client, url: &str, timeout: Duration) -> Option<String> {
    match client.head(url).timeout(timeout).send().await {
        Ok(response) if response.status() == StatusCode::OK => {
            let resolved = response.url().to_string();
            tracing::debug!("Expanded shortlink {} -> {}", url, resolved);
            Some(resolved)
        }
        Ok(response) => {
            tracing::warn!(
                "Shortlink {} resolved with status {}",
                url,
                response.status().as_u16()
            );
            None
        }
        Err(e) if e.is_timeout() => {
            tracing::warn!("Shortlink {} timed out", url);
            None
        }
        Err(e) => {
            tracing::warn!("Failed to expand shortlink {}: {}", url, e);
            None
        }
    }
}
