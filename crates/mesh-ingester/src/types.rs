//! Error and option types shared by the stores and ingesters.

use mesh_loader::MeshError;
use thiserror::Error;

/// Errors raised by a [`MeshStore`](crate::store::MeshStore) implementation.
#[derive(Error, Debug)]
pub enum StoreError {
    /// SQLite error.
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// A lookup on a supposedly unique attribute matched more than one row.
    #[error("Multiple rows found in {table} for {key}")]
    MultipleRowsFound {
        /// Table that was queried.
        table: String,
        /// Lookup key.
        key: String,
    },

    /// Commit or rollback without an open transaction.
    #[error("No open transaction")]
    NoTransaction,

    /// A row or link did not match the shape its table expects.
    #[error("Integrity error: {0}")]
    Integrity(String),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised while ingesting parsed documents.
#[derive(Error, Debug)]
pub enum IngestError {
    /// Persistence failure.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Failure reading an input file.
    #[error("Parse error: {0}")]
    Parse(#[from] MeshError),

    /// A top-level record carried no UI.
    #[error("{record} has no UI")]
    MissingUi {
        /// Record tag name.
        record: &'static str,
    },

    /// A UMLS entry keyed by a UI whose prefix names no known entity.
    #[error("Unsupported UI prefix: {ui}")]
    UnsupportedUiPrefix {
        /// The offending UI.
        ui: String,
    },
}

/// Result type for ingestion.
pub type IngestResult<T> = Result<T, IngestError>;

/// Options shared by the MeSH record ingesters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestOptions {
    /// Resolve and store links to other top-level records.
    ///
    /// Off for the first pass over a dump, when the records a link points
    /// at may not have been ingested yet.
    pub ingest_links: bool,
}

impl IngestOptions {
    /// Options for a pass that only stores records and their own children.
    pub fn records_only() -> Self {
        Self {
            ingest_links: false,
        }
    }

    /// Options for a pass that also resolves cross-record links.
    pub fn with_links() -> Self {
        Self { ingest_links: true }
    }
}

/// Counts from a synonym or definition ingestion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UmlsIngestStats {
    /// UIs whose owning record was found.
    pub owners_matched: usize,
    /// UIs with no stored record.
    pub owners_missing: usize,
    /// Rows newly inserted.
    pub rows_inserted: usize,
}
