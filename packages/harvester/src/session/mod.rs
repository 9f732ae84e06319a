//! Browser session abstraction.
//!
//! The pipeline only needs two capabilities from the live browser:
//! navigate to a URL and read back the rendered DOM. Keeping the trait
//! this small makes every field-extraction rule a pure function over the
//! page source, independently testable without a browser.
//!
//! Implementations:
//! - [`WebDriverSession`] - thirtyfour-backed live session
//! - [`MockSession`] - canned pages for tests

pub mod mock;
pub mod webdriver;

pub use mock::MockSession;
pub use webdriver::WebDriverSession;

use async_trait::async_trait;

use crate::error::SessionResult;

/// A live, navigable browser-automation session.
///
/// The session is a single shared mutable resource: the harvester owns it
/// exclusively for the duration of a run, one navigation at a time.
#[async_trait]
pub trait BrowserSession: Send + Sync {
    /// Navigate the session to a URL.
    async fn goto(&self, url: &str) -> SessionResult<()>;

    /// Rendered DOM source of the current page.
    async fn source(&self) -> SessionResult<String>;

    /// Session name for logging.
    fn name(&self) -> &str {
        "unknown"
    }
}
