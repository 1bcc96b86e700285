//! # mesh-ingester
//!
//! Idempotent ingestion of MeSH records and UMLS synonyms and definitions
//! into a relational store.
//!
//! Records parsed by `mesh-loader` are written through the [`MeshStore`]
//! trait. Every write is an upsert, so ingesting the same release twice
//! leaves the store unchanged. A release is normally loaded in two passes
//! (see [`Pipeline`]): the first stores records, the second resolves the
//! references between them.
//!
//! ## Usage
//!
//! ```ignore
//! use mesh_ingester::{Pipeline, SqliteStore};
//!
//! let mut store = SqliteStore::open("mesh.db")?;
//! let stats = Pipeline::discover("/data/mesh/2024")?.run(&mut store)?;
//! println!("{} records", stats.records_pass.records);
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod ingest;
pub mod pipeline;
pub mod store;
pub mod types;

pub use config::{ConfigError, ConfigResult, IngesterConfig};
pub use ingest::{
    DefinitionIngester, DescriptorIngester, QualifierIngester, RecordIngester,
    SupplementalIngester, SynonymIngester,
};
pub use pipeline::{ingest_file, PassStats, Pipeline, PipelineStats};
pub use store::{MemoryStore, MeshStore, SqliteStore};
pub use types::{
    IngestError, IngestOptions, IngestResult, StoreError, StoreResult, UmlsIngestStats,
};
