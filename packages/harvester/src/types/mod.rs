//! Core data types for the harvesting pipeline.

pub mod config;
pub mod document;

pub use config::{HarvestConfig, DEFAULT_LINK_MARKER, OPENID_SPECS_URL};
pub use document::{Author, DocumentRecord, MetaValue, Metadata};
