//! Output sinks: binary snapshot and flattened tabular export.
//!
//! Both are best-effort consumers of the record collection; the caller
//! decides what a sink failure means (it never stops the other sink).

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use harvester::{DocumentRecord, MetaValue};

/// Write the full record collection as a binary snapshot.
pub fn write_snapshot(path: &Path, docs: &[DocumentRecord]) -> Result<()> {
    ensure_parent(path)?;
    let file = File::create(path)
        .with_context(|| format!("failed to create snapshot file {}", path.display()))?;
    bincode::serialize_into(BufWriter::new(file), docs).context("failed to encode snapshot")?;
    Ok(())
}

/// Read a previous run's snapshot.
pub fn read_snapshot(path: &Path) -> Result<Vec<DocumentRecord>> {
    let file = File::open(path)
        .with_context(|| format!("failed to open snapshot file {}", path.display()))?;
    bincode::deserialize_from(BufReader::new(file)).context("failed to decode snapshot")
}

/// Write the flattened CSV export.
pub fn write_export(path: &Path, docs: &[DocumentRecord]) -> Result<()> {
    ensure_parent(path)?;
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create export file {}", path.display()))?;
    for doc in docs {
        writer.serialize(flatten(doc)).context("failed to write export row")?;
    }
    writer.flush().context("failed to flush export")?;
    Ok(())
}

/// One flattened row: `other_data` reduced to its `category` entry (or
/// empty), timestamps as epoch seconds (or empty).
#[derive(Debug, Serialize, PartialEq, Eq)]
struct ExportRow {
    title: String,
    #[serde(rename = "abstract")]
    abstract_text: String,
    text: String,
    web_link: String,
    local_link: String,
    other_data: String,
    pub_date: String,
    load_date: String,
}

fn flatten(doc: &DocumentRecord) -> ExportRow {
    ExportRow {
        title: doc.title.clone(),
        abstract_text: doc.abstract_text.clone().unwrap_or_default(),
        text: doc.text.clone(),
        web_link: doc.web_link.clone(),
        local_link: doc.local_link.clone().unwrap_or_default(),
        other_data: match doc.other_data.get("category") {
            Some(MetaValue::Text(category)) => category.clone(),
            _ => String::new(),
        },
        pub_date: doc
            .pub_date
            .map(|t| t.timestamp().to_string())
            .unwrap_or_default(),
        load_date: doc.load_date.timestamp().to_string(),
    }
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir)
                .with_context(|| format!("failed to create directory {}", dir.display()))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DocumentRecord {
        DocumentRecord::new("Spec", "Body text", "https://specs.example.org/spec.html")
            .with_abstract(Some("An abstract".into()))
            .with_meta("category", MetaValue::Text("final".into()))
            .with_meta("workgroup", MetaValue::Text("AB WG".into()))
    }

    #[test]
    fn snapshot_round_trips() {
        let docs = vec![sample()];
        let bytes = bincode::serialize(&docs).unwrap();
        let restored: Vec<DocumentRecord> = bincode::deserialize(&bytes).unwrap();
        assert_eq!(restored, docs);
    }

    #[test]
    fn flatten_reduces_other_data_to_category() {
        let row = flatten(&sample());
        assert_eq!(row.other_data, "final");
        assert_eq!(row.abstract_text, "An abstract");
        assert_eq!(row.pub_date, ""); // absent date serializes empty
        assert!(!row.load_date.is_empty());
    }

    #[test]
    fn flatten_without_category_is_empty() {
        let doc = DocumentRecord::new("Spec", "Body", "https://x/spec.html");
        assert_eq!(flatten(&doc).other_data, "");
        assert_eq!(flatten(&doc).local_link, "");
    }
}
