//! Outcome definitions for a single URL pipeline
//!
//! Every claimed URL ends in exactly one of these outcomes.

use std::fmt;

/// Terminal outcome of processing one claimed URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PageOutcome {
    // ===== Success =====
    /// Page was fetched, extracted and handed to the sinks
    Recorded,

    // ===== Skips =====
    /// Shortlink resolved to a URL already claimed by another pipeline
    Duplicate,

    /// Shortlink resolved outside the allow-list
    OutOfScope,

    // ===== Failures =====
    /// Shortlink HEAD request failed or returned a non-200 status
    ShortlinkUnresolved,

    /// GET failed with a transport error or a non-200 status
    FetchFailed,

    /// HTML could not be turned into a record
    ParseFailed,
}

impl PageOutcome {
    /// All outcomes, in reporting order
    pub const ALL: [PageOutcome; 6] = [
        Self::Recorded,
        Self::Duplicate,
        Self::OutOfScope,
        Self::ShortlinkUnresolved,
        Self::FetchFailed,
        Self::ParseFailed,
    ];

    /// Returns true if this represents a successful completion
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Recorded)
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Duplicate | Self::OutOfScope)
    }

    /// Returns true if this represents an error outcome
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            Self::ShortlinkUnresolved | Self::FetchFailed | Self::ParseFailed
        )
    }

    /// Short machine-readable label used in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Recorded => "recorded",
            Self::Duplicate => "duplicate",
            Self::OutOfScope => "out_of_scope",
            Self::ShortlinkUnresolved => "shortlink_unresolved",
            Self::FetchFailed => "fetch_failed",
            Self::ParseFailed => "parse_failed",
        }
    }
}

impl fmt::Display for PageOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_outcome_has_one_category() {
        for outcome in PageOutcome::ALL {
            let categories = [outcome.is_success(), outcome.is_skipped(), outcome.is_error()];
            assert_eq!(
                categories.iter().filter(|c| **c).count(),
                1,
                "{} must belong to exactly one category",
                outcome
            );
        }
    }

    #[test]
    fn test_labels_are_unique() {
        let mut labels: Vec<_> = PageOutcome::ALL.iter().map(|o| o.as_str()).collect();
        labels.sort();
        labels.dedup();
        assert_eq!(labels.len(), PageOutcome::ALL.len());
    }

    #[test]
    fn test_display_matches_label() {
        assert_eq!(PageOutcome::FetchFailed.to_string(), "fetch_failed");
    }
}
