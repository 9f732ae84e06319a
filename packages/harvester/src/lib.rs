//! Specification-document harvesting library.
//!
//! Drives a browser-automation session over a standards-body listing page,
//! extracts one normalized [`DocumentRecord`] per document detail page via
//! per-field fallback chains, and accumulates records under two stop
//! conditions: a duplicate of the previous run's last-seen document, or a
//! configured cap. The single entry point, [`Harvester::content`], never
//! fails - a run that breaks mid-traversal returns the records built so
//! far.
//!
//! # Usage
//!
//! ```rust,ignore
//! use harvester::{Harvester, HarvestConfig, WebDriverSession};
//!
//! let session = WebDriverSession::connect("http://localhost:9515", true).await?;
//! let mut harvester = Harvester::new(&session, HarvestConfig::default().with_max_documents(50));
//! let documents = harvester.content().await;
//! session.quit().await?;
//! ```
//!
//! # Modules
//!
//! - [`types`] - document record and run configuration
//! - [`session`] - browser session trait plus WebDriver and mock backends
//! - [`extract`] - pure fallback-chain field extraction over page source
//! - [`pipeline`] - traversal loop and accumulation policy
//! - [`error`] - typed errors

pub mod error;
pub mod extract;
pub mod pipeline;
pub mod session;
pub mod types;

pub use error::{HarvestError, SessionError};
pub use pipeline::{Admission, Harvester};
pub use session::{BrowserSession, MockSession, WebDriverSession};
pub use types::{
    Author, DocumentRecord, HarvestConfig, MetaValue, Metadata, DEFAULT_LINK_MARKER,
    OPENID_SPECS_URL,
};
