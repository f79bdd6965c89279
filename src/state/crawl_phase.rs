/// Phase definitions for a single crawl run
use std::fmt;

/// Represents the current phase of a crawl run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlPhase {
    /// Configuration accepted, nothing fetched yet
    Configured,

    /// Number of index pages to visit is known
    PageCountResolved,

    /// All index pages visited and their listing URLs flattened
    UrlsCollected,

    /// All listing pages visited
    DetailsCollected,

    /// Final record collection handed back to the caller
    Done,
}

impl CrawlPhase {
    /// Returns the phase that must follow this one, if any
    pub fn next(&self) -> Option<Self> {
        match self {
            Self::Configured => Some(Self::PageCountResolved),
            Self::PageCountResolved => Some(Self::UrlsCollected),
            Self::UrlsCollected => Some(Self::DetailsCollected),
            Self::DetailsCollected => Some(Self::Done),
            Self::Done => None,
        }
    }

    /// Returns true if moving from this phase to `to` is allowed
    ///
    /// Phases only advance one step at a time.
    pub fn can_transition_to(&self, to: CrawlPhase) -> bool {
        self.next() == Some(to)
    }

    /// Returns true if this is the terminal phase
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Short lowercase name used in log lines
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Configured => "configured",
            Self::PageCountResolved => "page_count_resolved",
            Self::UrlsCollected => "urls_collected",
            Self::DetailsCollected => "details_collected",
            Self::Done => "done",
        }
    }

    /// Returns all phases in order
    pub fn all_phases() -> Vec<Self> {
        vec![
            Self::Configured,
            Self::PageCountResolved,
            Self::UrlsCollected,
            Self::DetailsCollected,
            Self::Done,
        ]
    }
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
