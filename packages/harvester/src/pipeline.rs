//! Traversal pipeline: listing -> candidates -> per-page extraction ->
//! accumulation.
//!
//! The pipeline is fully sequential: one session, one page at a time,
//! records appended in listing order. Stop conditions are explicit
//! [`Admission`] values from the accumulation step, not errors; anything
//! else that goes wrong ends the run with whatever was accumulated, which
//! is the contract of [`Harvester::content`].

use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::{debug, info};

use crate::error::{HarvestError, Result};
use crate::extract;
use crate::session::BrowserSession;
use crate::types::{DocumentRecord, HarvestConfig, MetaValue};

/// Outcome of submitting one record to the accumulation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// Record appended; traversal continues
    Appended,
    /// Record matches the previous run's last-seen key; stop everything
    StopDuplicate,
    /// Configured cap already reached; stop everything
    StopCapReached,
}

/// One harvest run over a listing source.
///
/// Borrows the browser session for the duration of the run; no other
/// component may navigate it concurrently. Intended for a single
/// [`content`](Harvester::content) invocation per instance.
pub struct Harvester<'a, S: BrowserSession> {
    session: &'a S,
    config: HarvestConfig,
    last_seen_hash: Option<String>,
    documents: Vec<DocumentRecord>,
}

impl<'a, S: BrowserSession> Harvester<'a, S> {
    /// Create a harvester over a live session.
    pub fn new(session: &'a S, config: HarvestConfig) -> Self {
        debug!(session = session.name(), "harvester initialized");
        info!(source = %config.listing_url, "set source");
        Self {
            session,
            config,
            last_seen_hash: None,
            documents: Vec::new(),
        }
    }

    /// Seed the duplicate-stop marker from a prior run's last document.
    pub fn with_last_document(self, last: &DocumentRecord) -> Self {
        self.with_last_seen_hash(last.hash.clone())
    }

    /// Seed the duplicate-stop marker from a dedup key.
    pub fn with_last_seen_hash(mut self, hash: String) -> Self {
        self.last_seen_hash = Some(hash);
        self
    }

    /// Run the traversal and return everything accumulated.
    ///
    /// Never fails: any internal failure is logged and the records built
    /// before it are returned. Partial results are the normal behavior.
    pub async fn content(&mut self) -> Vec<DocumentRecord> {
        debug!("harvest starting");
        match self.run().await {
            Ok(()) => debug!(count = self.documents.len(), "harvest finished"),
            Err(e) => debug!(error = %e, count = self.documents.len(), "harvest stopped early"),
        }
        std::mem::take(&mut self.documents)
    }

    async fn run(&mut self) -> Result<()> {
        let listing_url = self.config.listing_url.clone();
        let base = url::Url::parse(&listing_url).map_err(|_| HarvestError::InvalidUrl {
            url: listing_url.clone(),
        })?;

        debug!(url = %listing_url, "loading listing page");
        self.session.goto(&listing_url).await?;
        let listing = self.session.source().await?;

        let candidates = extract::listing_links(&listing, &base, &self.config.link_marker);
        debug!(count = candidates.len(), "collected candidate links");

        for link in candidates {
            debug!(url = %link, "visiting candidate");
            self.session.goto(&link).await?;
            let mut html = self.session.source().await?;

            if extract::has_renamed_notice(&html) {
                // Slow server-side redirect in progress; wait for it to land
                debug!(url = %link, "renamed specification notice, awaiting redirect");
                html = self
                    .wait_until(html, self.config.redirect_wait, |h| {
                        !extract::has_renamed_notice(h)
                    })
                    .await?;
            }
            html = self
                .wait_until(html, self.config.settle_wait, extract::is_settled)
                .await?;

            let record = build_record(&link, &html)?;
            match self.admit(record) {
                Admission::Appended => {}
                Admission::StopDuplicate => {
                    debug!(url = %link, "already seen, stopping traversal");
                    break;
                }
                Admission::StopCapReached => {
                    debug!(max = self.config.max_documents, "max count reached, stopping traversal");
                    break;
                }
            }
        }

        Ok(())
    }

    /// Poll the page source until `done` holds or the ceiling lapses.
    /// Lapsing is not an error; the latest source falls through to
    /// extraction.
    async fn wait_until<F>(&self, mut html: String, ceiling: Duration, done: F) -> Result<String>
    where
        F: Fn(&str) -> bool,
    {
        let deadline = Instant::now() + ceiling;
        while !done(&html) && Instant::now() < deadline {
            sleep(self.config.poll_interval).await;
            html = self.session.source().await?;
        }
        Ok(html)
    }

    /// Accumulation step: duplicate check first, cap check before the
    /// append so the cap is never exceeded.
    fn admit(&mut self, record: DocumentRecord) -> Admission {
        if self
            .last_seen_hash
            .as_deref()
            .is_some_and(|last| last == record.hash)
        {
            return Admission::StopDuplicate;
        }

        if self.config.max_documents > 0 && self.documents.len() >= self.config.max_documents {
            return Admission::StopCapReached;
        }

        info!(
            title = %record.title,
            link = %record.web_link,
            pub_date = ?record.pub_date,
            "found document"
        );
        self.documents.push(record);
        Admission::Appended
    }
}

/// Build a record from a detail page. `web_link` is the candidate link
/// unchanged; `load_date` is the current instant.
fn build_record(link: &str, html: &str) -> Result<DocumentRecord> {
    let fields = extract::extract_fields(html);

    let title = fields.title.ok_or_else(|| HarvestError::MissingField {
        url: link.to_string(),
        field: "title",
    })?;
    let text = fields.body.ok_or_else(|| HarvestError::MissingField {
        url: link.to_string(),
        field: "text",
    })?;

    let mut record = DocumentRecord::new(title, text, link)
        .with_abstract(fields.abstract_text)
        .with_pub_date(fields.pub_date)
        .with_meta("authors", fields.authors);
    if let Some(workgroup) = fields.workgroup {
        record = record.with_meta("workgroup", MetaValue::Text(workgroup));
    }
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MockSession;

    fn harvester(session: &MockSession, max: usize) -> Harvester<'_, MockSession> {
        Harvester::new(
            session,
            HarvestConfig::new("https://specs.example.org/").with_max_documents(max),
        )
    }

    fn record(n: usize) -> DocumentRecord {
        DocumentRecord::new(
            format!("Spec {n}"),
            format!("Body {n}"),
            format!("https://specs.example.org/spec-{n}.html"),
        )
    }

    #[test]
    fn admit_appends_in_order() {
        let session = MockSession::new();
        let mut h = harvester(&session, 0);

        assert_eq!(h.admit(record(1)), Admission::Appended);
        assert_eq!(h.admit(record(2)), Admission::Appended);
        assert_eq!(h.documents.len(), 2);
        assert_eq!(h.documents[0].title, "Spec 1");
    }

    #[test]
    fn admit_stops_on_duplicate_before_cap() {
        let session = MockSession::new();
        let marker = record(1);
        let mut h = harvester(&session, 1).with_last_document(&marker);

        // Cap of 1 already reached after the first append, but the
        // duplicate check must win for a matching record
        assert_eq!(h.admit(record(2)), Admission::Appended);
        assert_eq!(h.admit(record(1)), Admission::StopDuplicate);
    }

    #[test]
    fn admit_enforces_cap_before_append() {
        let session = MockSession::new();
        let mut h = harvester(&session, 2);

        assert_eq!(h.admit(record(1)), Admission::Appended);
        assert_eq!(h.admit(record(2)), Admission::Appended);
        assert_eq!(h.admit(record(3)), Admission::StopCapReached);
        assert_eq!(h.documents.len(), 2);
    }

    #[test]
    fn zero_cap_means_uncapped() {
        let session = MockSession::new();
        let mut h = harvester(&session, 0);

        for n in 0..200 {
            assert_eq!(h.admit(record(n)), Admission::Appended);
        }
        assert_eq!(h.documents.len(), 200);
    }

    #[test]
    fn build_record_requires_title_and_body() {
        let err = build_record("https://x/spec.html", "<body></body>");
        assert!(matches!(err, Err(HarvestError::MissingField { .. })));

        let ok = build_record(
            "https://x/spec.html",
            "<body><h1>Spec</h1><p>Body.</p></body>",
        )
        .unwrap();
        assert_eq!(ok.title, "Spec");
        assert_eq!(ok.web_link, "https://x/spec.html");
    }
}
