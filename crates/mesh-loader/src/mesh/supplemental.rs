//! MeSH supplemental concept record parser.

use mesh_types::{SupplementalClass, SupplementalRecord};

use super::common::{
    parse_concept_list, parse_heading_mapped_to_list, parse_indexing_information_list,
    parse_pharmacological_action_list, parse_previous_indexing_list, parse_source_list,
};
use super::MeshRecord;
use crate::element::Element;
use crate::extract::{attribute, child_text, date, string_child};

/// Builds a supplemental document from a `<SupplementalRecord>` element.
pub fn parse_supplemental_record(element: &Element) -> SupplementalRecord {
    SupplementalRecord {
        supplemental_class: attribute(Some(element), "SCRClass")
            .and_then(|code| SupplementalClass::from_code(&code)),
        ui: child_text(Some(element), "SupplementalRecordUI"),
        name: string_child(element.child("SupplementalRecordName")),
        date_created: date(element.child("DateCreated")),
        date_revised: date(element.child("DateRevised")),
        note: child_text(Some(element), "Note"),
        frequency: child_text(Some(element), "Frequency"),
        previous_indexings: parse_previous_indexing_list(element.child("PreviousIndexingList")),
        headings_mapped_to: parse_heading_mapped_to_list(element.child("HeadingMappedToList")),
        indexing_information: parse_indexing_information_list(
            element.child("IndexingInformationList"),
        ),
        pharmacological_actions: parse_pharmacological_action_list(
            element.child("PharmacologicalActionList"),
        ),
        sources: parse_source_list(element.child("SourceList")),
        concepts: parse_concept_list(element.child("ConceptList")),
    }
}

impl MeshRecord for SupplementalRecord {
    const RECORD_TAG: &'static str = "SupplementalRecord";

    fn from_element(element: &Element) -> Self {
        parse_supplemental_record(element)
    }

    fn is_empty(&self) -> bool {
        SupplementalRecord::is_empty(self)
    }

    fn ui(&self) -> Option<&str> {
        self.ui.as_deref()
    }
}
