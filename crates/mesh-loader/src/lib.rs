//! # mesh-loader
//!
//! Streaming parsers for MeSH XML dumps and UMLS RRF files.
//!
//! MeSH descriptor, qualifier and supplemental files are read one record at
//! a time: only the element tree of the record currently being built is held
//! in memory, so multi-gigabyte dumps parse in bounded space. Files ending in
//! `.gz` are decompressed on the fly.
//!
//! The UMLS side maps CUIs to MeSH descriptor UIs through `MRSAT.RRF` and uses
//! that map to collect synonyms from `MRCONSO.RRF` and per-source definitions
//! from `MRDEF.RRF`.
//!
//! ## Usage
//!
//! ```ignore
//! use mesh_loader::{parse_conso, MeshParser};
//! use mesh_types::QualifierRecord;
//!
//! for record in MeshParser::<_, QualifierRecord>::from_path("qual2024.xml")? {
//!     let record = record?;
//!     println!("{:?}: {} concepts", record.ui, record.concepts.len());
//! }
//!
//! let synonyms = parse_conso("MRSAT.RRF", "MRCONSO.RRF")?;
//! ```

#![warn(missing_docs)]

pub mod element;
pub mod extract;
pub mod mesh;
pub mod stream;
pub mod types;
pub mod umls;

pub use element::Element;
pub use mesh::{
    parse_descriptor_record, parse_qualifier_record, parse_supplemental_record, MeshParser,
    MeshRecord,
};
pub use stream::{open_xml, ElementStream};
pub use types::{DefinitionFilter, MeshError, MeshResult};
#[cfg(feature = "parallel")]
pub use umls::parse_conso_parallel;
pub use umls::{
    build_cui_ui_map, build_definition_map, build_synonym_map, parse_conso, parse_conso_with_map,
    parse_def, parse_def_with_map, parse_sat, UmlsParser, UmlsRecord,
};

// Re-export mesh-types for convenience
pub use mesh_types;
