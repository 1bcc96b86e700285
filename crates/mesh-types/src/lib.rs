//! # mesh-types
//!
//! Type definitions for the MeSH (Medical Subject Headings) thesaurus and the
//! UMLS flat files that cross-reference it.
//!
//! This crate provides typed documents for the three MeSH XML record
//! families (descriptors, qualifiers and supplemental concept records), the
//! concepts and terms nested inside them, and row types for the UMLS
//! `MRSAT`, `MRCONSO` and `MRDEF` files. Every optional XML element maps to an
//! `Option` field and every list wrapper to a `Vec`, so a parsed document
//! never has to be probed for missing keys.
//!
//! ## Features
//!
//! - `serde` (default): Enables serialization/deserialization support via serde.
//!
//! ## Usage
//!
//! ```rust
//! use mesh_types::{Concept, DescriptorClass, DescriptorRecord, UiKind};
//!
//! let record = DescriptorRecord {
//!     descriptor_class: DescriptorClass::from_code("1"),
//!     ui: Some("D000001".to_string()),
//!     name: Some("Calcimycin".to_string()),
//!     concepts: vec![Concept {
//!         ui: Some("M0000001".to_string()),
//!         is_preferred: Some(true),
//!         ..Default::default()
//!     }],
//!     ..Default::default()
//! };
//!
//! assert_eq!(record.descriptor_class, Some(DescriptorClass::Topical));
//! assert_eq!(UiKind::from_ui("D000001"), Some(UiKind::Descriptor));
//! ```

#![warn(missing_docs)]

mod concept;
mod descriptor;
mod enums;
mod qualifier;
mod reference;
mod supplemental;
mod ui;
pub mod umls;

// Re-export all public types at crate root
pub use concept::{Concept, ConceptRelation, Term};
pub use descriptor::DescriptorRecord;
pub use enums::{
    DescriptorClass, EntryCombinationType, LexicalTag, RelationName, SupplementalClass,
};
pub use qualifier::QualifierRecord;
pub use reference::{
    AllowableQualifier, DescriptorReference, EntryCombination, HeadingPair, QualifierReference,
};
pub use supplemental::SupplementalRecord;
pub use ui::UiKind;
pub use umls::{
    CuiUiMap, DefinitionMap, MrconsoRow, MrdefRow, MrsatRow, SourceDefinitions, SynonymMap,
};
