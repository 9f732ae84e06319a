//! Document record - the normalized representation of one extracted
//! specification.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

/// One author entry parsed from a detail page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
    pub org: String,
}

/// A value in the open `other_data` mapping.
///
/// The mapping is source-specific; this run stores the working-group name
/// as `Text` and the author list as either `Authors` (structured parse) or
/// `List` (raw table-cell fallback).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MetaValue {
    Text(String),
    List(Vec<String>),
    Authors(Vec<Author>),
}

/// Open mapping of extraction-source-specific metadata.
pub type Metadata = BTreeMap<String, MetaValue>;

/// A discovered specification document.
///
/// Created once per detail page visited, immutable after construction,
/// owned by the accumulation list until handed to the caller. `title` and
/// `web_link` are always populated for an admitted record; `hash` is
/// computed at construction so the duplicate check can run before the
/// record is appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// Key assigned by a downstream store; unset at creation
    pub id: Option<String>,

    /// Display name of the document
    pub title: String,

    /// Abstract section text, when the document provides one
    pub abstract_text: Option<String>,

    /// Full extracted body text
    pub text: String,

    /// Canonical source URL, unique per document within a run
    pub web_link: String,

    /// Path to a local copy; filled by a downstream archiver
    pub local_link: Option<String>,

    /// Source-specific metadata (workgroup, authors, ...)
    pub other_data: Metadata,

    /// Parsed publication timestamp, absent if unparseable
    pub pub_date: Option<DateTime<Utc>>,

    /// When this record was extracted
    pub load_date: DateTime<Utc>,

    /// Deduplication key over (title, web_link, text)
    pub hash: String,
}

impl DocumentRecord {
    /// Create a record from the required fields and stamp it with the
    /// current instant. The dedup hash is derived immediately.
    pub fn new(
        title: impl Into<String>,
        text: impl Into<String>,
        web_link: impl Into<String>,
    ) -> Self {
        let title = title.into();
        let text = text.into();
        let web_link = web_link.into();
        let hash = Self::dedup_hash(&title, &web_link, &text);

        Self {
            id: None,
            title,
            abstract_text: None,
            text,
            web_link,
            local_link: None,
            other_data: Metadata::new(),
            pub_date: None,
            load_date: Utc::now(),
            hash,
        }
    }

    /// Hex SHA-256 over the stable identifying fields, NUL-separated to
    /// avoid boundary collisions. Deterministic across process runs.
    pub fn dedup_hash(title: &str, web_link: &str, text: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(title.as_bytes());
        hasher.update([0u8]);
        hasher.update(web_link.as_bytes());
        hasher.update([0u8]);
        hasher.update(text.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Set the abstract.
    pub fn with_abstract(mut self, abstract_text: Option<String>) -> Self {
        self.abstract_text = abstract_text;
        self
    }

    /// Set the publication date.
    pub fn with_pub_date(mut self, pub_date: Option<DateTime<Utc>>) -> Self {
        self.pub_date = pub_date;
        self
    }

    /// Replace the metadata mapping.
    pub fn with_other_data(mut self, other_data: Metadata) -> Self {
        self.other_data = other_data;
        self
    }

    /// Add a single metadata entry.
    pub fn with_meta(mut self, key: impl Into<String>, value: MetaValue) -> Self {
        self.other_data.insert(key.into(), value);
        self
    }
}
