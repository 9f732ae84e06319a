//! WebDriver-backed browser session.

use async_trait::async_trait;
use thirtyfour::prelude::*;
use tracing::debug;

use crate::error::{SessionError, SessionResult};
use crate::session::BrowserSession;

/// A live Chrome session driven over the WebDriver protocol.
///
/// The browser window is fixed at 1920x1080 with GPU rendering disabled;
/// the harvester relies on a stable render, not on speed.
pub struct WebDriverSession {
    driver: WebDriver,
}

impl WebDriverSession {
    /// Attach to a WebDriver server (e.g. a local chromedriver) and start
    /// a configured Chrome session.
    pub async fn connect(server_url: &str, headless: bool) -> SessionResult<Self> {
        let mut caps = DesiredCapabilities::chrome();
        caps.add_arg("--window-size=1920,1080")
            .map_err(|e| SessionError::Driver(Box::new(e)))?;
        caps.add_arg("--disable-gpu")
            .map_err(|e| SessionError::Driver(Box::new(e)))?;
        if headless {
            caps.add_arg("--headless=new")
                .map_err(|e| SessionError::Driver(Box::new(e)))?;
        }

        let driver = WebDriver::new(server_url, caps)
            .await
            .map_err(|e| SessionError::Driver(Box::new(e)))?;

        debug!(server = %server_url, headless, "browser session started");
        Ok(Self { driver })
    }

    /// End the session and close the browser.
    pub async fn quit(self) -> SessionResult<()> {
        self.driver
            .quit()
            .await
            .map_err(|e| SessionError::Driver(Box::new(e)))
    }
}

#[async_trait]
impl BrowserSession for WebDriverSession {
    async fn goto(&self, url: &str) -> SessionResult<()> {
        debug!(url = %url, "navigating");
        self.driver
            .goto(url)
            .await
            .map_err(|e| SessionError::Navigation {
                url: url.to_string(),
                source: Box::new(e),
            })
    }

    async fn source(&self) -> SessionResult<String> {
        self.driver
            .source()
            .await
            .map_err(|e| SessionError::Driver(Box::new(e)))
    }

    fn name(&self) -> &str {
        "webdriver"
    }
}
