//! MeSH descriptor record type.
//!
//! This module provides the `DescriptorRecord` struct representing one
//! `<DescriptorRecord>` element of a `desc*.xml` dump.

use chrono::NaiveDate;

use crate::{
    AllowableQualifier, Concept, DescriptorClass, DescriptorReference, EntryCombination,
};

/// A MeSH descriptor (main heading).
///
/// # Examples
///
/// ```
/// use mesh_types::{DescriptorClass, DescriptorRecord};
///
/// let record = DescriptorRecord {
///     descriptor_class: Some(DescriptorClass::Topical),
///     ui: Some("D000001".to_string()),
///     name: Some("Calcimycin".to_string()),
///     tree_numbers: vec!["D03.633.100.221.173".to_string()],
///     ..Default::default()
/// };
///
/// assert!(!record.is_empty());
/// assert!(DescriptorRecord::default().is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DescriptorRecord {
    /// `DescriptorClass` attribute.
    pub descriptor_class: Option<DescriptorClass>,
    /// `DescriptorUI`.
    pub ui: Option<String>,
    /// `DescriptorName`.
    pub name: Option<String>,
    /// `DateCreated`.
    pub date_created: Option<NaiveDate>,
    /// `DateRevised`.
    pub date_revised: Option<NaiveDate>,
    /// `DateEstablished`.
    pub date_established: Option<NaiveDate>,
    /// `AllowableQualifiersList` entries.
    pub allowable_qualifiers: Vec<AllowableQualifier>,
    /// `Annotation`.
    pub annotation: Option<String>,
    /// `HistoryNote`.
    pub history_note: Option<String>,
    /// `NLMClassificationNumber`.
    pub nlm_classification_number: Option<String>,
    /// `OnlineNote`.
    pub online_note: Option<String>,
    /// `PublicMeSHNote`.
    pub public_mesh_note: Option<String>,
    /// `PreviousIndexingList` entries.
    pub previous_indexings: Vec<String>,
    /// `EntryCombinationList` entries.
    pub entry_combinations: Vec<EntryCombination>,
    /// `SeeRelatedList` entries.
    pub see_related: Vec<DescriptorReference>,
    /// `ConsiderAlso`.
    pub consider_also: Option<String>,
    /// `PharmacologicalActionList` entries.
    pub pharmacological_actions: Vec<DescriptorReference>,
    /// `TreeNumberList` entries.
    pub tree_numbers: Vec<String>,
    /// `ConceptList` entries.
    pub concepts: Vec<Concept>,
}

impl DescriptorRecord {
    /// Returns true if no field of the record was populated.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
