//! MeSH qualifier record type.

use chrono::NaiveDate;

use crate::Concept;

/// A MeSH qualifier (subheading), one `<QualifierRecord>` element.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QualifierRecord {
    /// `QualifierUI`.
    pub ui: Option<String>,
    /// `QualifierName`.
    pub name: Option<String>,
    /// `DateCreated`.
    pub date_created: Option<NaiveDate>,
    /// `DateRevised`.
    pub date_revised: Option<NaiveDate>,
    /// `DateEstablished`.
    pub date_established: Option<NaiveDate>,
    /// `Annotation`.
    pub annotation: Option<String>,
    /// `HistoryNote`.
    pub history_note: Option<String>,
    /// `OnlineNote`.
    pub online_note: Option<String>,
    /// `TreeNumberList` entries.
    pub tree_numbers: Vec<String>,
    /// `ConceptList` entries.
    pub concepts: Vec<Concept>,
}

impl QualifierRecord {
    /// Returns true if no field of the record was populated.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
