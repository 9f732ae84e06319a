//! Harvest configuration.

use std::time::Duration;

/// The OpenID specs index, sorted most-recent-first.
pub const OPENID_SPECS_URL: &str = "https://openid.net/specs/?C=M;O=D";

/// Marker that identifies candidate document links on the listing page.
pub const DEFAULT_LINK_MARKER: &str = ".html";

/// Configuration for one harvest run.
///
/// The two waits are ceilings on bounded polling, not blind sleeps: the
/// pipeline re-reads the page source until the awaited condition holds or
/// the ceiling lapses.
#[derive(Debug, Clone)]
pub struct HarvestConfig {
    /// Listing page to traverse
    pub listing_url: String,

    /// Visible-text marker for candidate links
    pub link_marker: String,

    /// Maximum number of documents to accumulate (0 = no cap)
    pub max_documents: usize,

    /// Ceiling for the renamed-specification redirect wait
    pub redirect_wait: Duration,

    /// Ceiling for the dynamic-content settle wait
    pub settle_wait: Duration,

    /// Interval between page-source polls
    pub poll_interval: Duration,
}

impl HarvestConfig {
    /// Create a config for a listing URL with the stock wait ceilings.
    pub fn new(listing_url: impl Into<String>) -> Self {
        Self {
            listing_url: listing_url.into(),
            link_marker: DEFAULT_LINK_MARKER.to_string(),
            max_documents: 0,
            redirect_wait: Duration::from_secs(7),
            settle_wait: Duration::from_secs(2),
            poll_interval: Duration::from_millis(250),
        }
    }

    /// Set the listing URL.
    pub fn with_listing_url(mut self, listing_url: impl Into<String>) -> Self {
        self.listing_url = listing_url.into();
        self
    }

    /// Set the candidate-link marker.
    pub fn with_link_marker(mut self, marker: impl Into<String>) -> Self {
        self.link_marker = marker.into();
        self
    }

    /// Set the document cap (0 disables it).
    pub fn with_max_documents(mut self, max_documents: usize) -> Self {
        self.max_documents = max_documents;
        self
    }

    /// Set the redirect wait ceiling.
    pub fn with_redirect_wait(mut self, redirect_wait: Duration) -> Self {
        self.redirect_wait = redirect_wait;
        self
    }

    /// Set the settle wait ceiling.
    pub fn with_settle_wait(mut self, settle_wait: Duration) -> Self {
        self.settle_wait = settle_wait;
        self
    }

    /// Set the poll interval.
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self::new(OPENID_SPECS_URL)
    }
}
