//! MeSH supplemental concept record type.

use chrono::NaiveDate;

use crate::{Concept, DescriptorReference, HeadingPair, SupplementalClass};

/// A supplemental concept record (SCR), one `<SupplementalRecord>` element.
///
/// Supplemental records describe chemicals, protocols, rare diseases and
/// organisms that are not descriptors themselves but map to one or more
/// descriptor headings.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SupplementalRecord {
    /// `SCRClass` attribute.
    pub supplemental_class: Option<SupplementalClass>,
    /// `SupplementalRecordUI`.
    pub ui: Option<String>,
    /// `SupplementalRecordName`.
    pub name: Option<String>,
    /// `DateCreated`.
    pub date_created: Option<NaiveDate>,
    /// `DateRevised`.
    pub date_revised: Option<NaiveDate>,
    /// `Note`.
    pub note: Option<String>,
    /// `Frequency`.
    pub frequency: Option<String>,
    /// `PreviousIndexingList` entries.
    pub previous_indexings: Vec<String>,
    /// `HeadingMappedToList` entries.
    pub headings_mapped_to: Vec<HeadingPair>,
    /// `IndexingInformationList` entries.
    pub indexing_information: Vec<HeadingPair>,
    /// `PharmacologicalActionList` entries.
    pub pharmacological_actions: Vec<DescriptorReference>,
    /// `SourceList` entries.
    pub sources: Vec<String>,
    /// `ConceptList` entries.
    pub concepts: Vec<Concept>,
}

impl SupplementalRecord {
    /// Returns true if no field of the record was populated.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
