//! Lifecycle phases of one crawl run

use std::fmt;

/// Phase of the coordinator's state machine
///
/// Transitions only move forward:
/// `Seeding → Draining → Drained`. `Seeding → Drained` is allowed when there
/// is nothing in scope to crawl.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CrawlPhase {
    /// Building the initial pending set from the registry
    Seeding,

    /// Claiming, dispatching and merging discovered links
    Draining,

    /// Pending set empty and nothing in flight
    Drained,
}

impl CrawlPhase {
    /// Returns true if the transition from self to `next` is valid
    pub fn can_transition_to(&self, next: CrawlPhase) -> bool {
        matches!(
            (self, next),
            (Self::Seeding, Self::Draining)
                | (Self::Seeding, Self::Drained)
                | (Self::Draining, Self::Drained)
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Drained)
    }
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Seeding => "seeding",
            Self::Draining => "draining",
            Self::Drained => "drained",
        };
        f.write_str(name)
    }
}
