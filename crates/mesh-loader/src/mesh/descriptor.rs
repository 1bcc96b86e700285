//! MeSH descriptor record parser.
//!
//! Parses `<DescriptorRecord>` elements of `desc*.xml` dumps.

use mesh_types::{DescriptorClass, DescriptorRecord};

use super::common::{
    parse_allowable_qualifier_list, parse_concept_list, parse_entry_combination_list,
    parse_pharmacological_action_list, parse_previous_indexing_list, parse_see_related_list,
    parse_tree_number_list,
};
use super::MeshRecord;
use crate::element::Element;
use crate::extract::{attribute, child_text, date, string_child};

/// Builds a descriptor document from a `<DescriptorRecord>` element.
pub fn parse_descriptor_record(element: &Element) -> DescriptorRecord {
    DescriptorRecord {
        descriptor_class: attribute(Some(element), "DescriptorClass")
            .and_then(|code| DescriptorClass::from_code(&code)),
        ui: child_text(Some(element), "DescriptorUI"),
        name: string_child(element.child("DescriptorName")),
        date_created: date(element.child("DateCreated")),
        date_revised: date(element.child("DateRevised")),
        date_established: date(element.child("DateEstablished")),
        allowable_qualifiers: parse_allowable_qualifier_list(
            element.child("AllowableQualifiersList"),
        ),
        annotation: child_text(Some(element), "Annotation"),
        history_note: child_text(Some(element), "HistoryNote"),
        nlm_classification_number: child_text(Some(element), "NLMClassificationNumber"),
        online_note: child_text(Some(element), "OnlineNote"),
        public_mesh_note: child_text(Some(element), "PublicMeSHNote"),
        previous_indexings: parse_previous_indexing_list(element.child("PreviousIndexingList")),
        entry_combinations: parse_entry_combination_list(element.child("EntryCombinationList")),
        see_related: parse_see_related_list(element.child("SeeRelatedList")),
        consider_also: child_text(Some(element), "ConsiderAlso"),
        pharmacological_actions: parse_pharmacological_action_list(
            element.child("PharmacologicalActionList"),
        ),
        tree_numbers: parse_tree_number_list(element.child("TreeNumberList")),
        concepts: parse_concept_list(element.child("ConceptList")),
    }
}

impl MeshRecord for DescriptorRecord {
    const RECORD_TAG: &'static str = "DescriptorRecord";

    fn from_element(element: &Element) -> Self {
        parse_descriptor_record(element)
    }

    fn is_empty(&self) -> bool {
        DescriptorRecord::is_empty(self)
    }

    fn ui(&self) -> Option<&str> {
        self.ui.as_deref()
    }
}
