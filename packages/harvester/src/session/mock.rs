//! Mock browser session for tests.
//!
//! Serves canned page source keyed by URL and records every navigation.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::io;
use std::sync::{Arc, RwLock};

use crate::error::{SessionError, SessionResult};
use crate::session::BrowserSession;

/// Mock session with canned pages.
///
/// Navigating to a URL without a canned page, or to a URL marked with
/// [`MockSession::fail_on`], returns a navigation error - the same failure
/// mode a dead link produces on a live session.
///
/// `Clone` shares the underlying state, so a clone kept by a test observes
/// navigations made through the pipeline.
#[derive(Default)]
pub struct MockSession {
    pages: Arc<RwLock<HashMap<String, String>>>,
    failures: Arc<RwLock<HashSet<String>>>,
    current: Arc<RwLock<Option<String>>>,
    visits: Arc<RwLock<Vec<String>>>,
}

impl MockSession {
    /// Create an empty mock session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a canned page.
    pub fn add_page(&self, url: impl Into<String>, html: impl Into<String>) {
        self.pages.write().unwrap().insert(url.into(), html.into());
    }

    /// Add a canned page (builder form).
    pub fn with_page(self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.add_page(url, html);
        self
    }

    /// Make navigation to a URL fail.
    pub fn fail_on(&self, url: impl Into<String>) {
        self.failures.write().unwrap().insert(url.into());
    }

    /// URLs navigated to, in order.
    pub fn visits(&self) -> Vec<String> {
        self.visits.read().unwrap().clone()
    }
}

impl Clone for MockSession {
    fn clone(&self) -> Self {
        Self {
            pages: Arc::clone(&self.pages),
            failures: Arc::clone(&self.failures),
            current: Arc::clone(&self.current),
            visits: Arc::clone(&self.visits),
        }
    }
}

#[async_trait]
impl BrowserSession for MockSession {
    async fn goto(&self, url: &str) -> SessionResult<()> {
        self.visits.write().unwrap().push(url.to_string());

        if self.failures.read().unwrap().contains(url) {
            return Err(SessionError::Navigation {
                url: url.to_string(),
                source: Box::new(io::Error::new(io::ErrorKind::Other, "injected navigation failure")),
            });
        }
        if !self.pages.read().unwrap().contains_key(url) {
            return Err(SessionError::Navigation {
                url: url.to_string(),
                source: Box::new(io::Error::new(io::ErrorKind::Other, "no canned page for url")),
            });
        }

        *self.current.write().unwrap() = Some(url.to_string());
        Ok(())
    }

    async fn source(&self) -> SessionResult<String> {
        let current = self.current.read().unwrap().clone();
        let url = current.ok_or_else(|| {
            SessionError::Driver(Box::new(io::Error::new(io::ErrorKind::Other, "no page loaded")))
        })?;
        Ok(self
            .pages
            .read()
            .unwrap()
            .get(&url)
            .cloned()
            .unwrap_or_default())
    }

    fn name(&self) -> &str {
        "mock"
    }
}
