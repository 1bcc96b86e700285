//! Sub-structure parsers shared by the three MeSH record families.
//!
//! Each function maps one nested element shape to its typed value. A missing
//! element maps to `Default` or to an empty `Vec`; list wrappers (`...List`)
//! map to a `Vec` of their entries.

use mesh_types::{
    AllowableQualifier, Concept, ConceptRelation, DescriptorReference, EntryCombination,
    HeadingPair, LexicalTag, QualifierReference, RelationName, Term,
};

use crate::element::Element;
use crate::extract::{attribute, child_text, date, string_child, strip_marker, text, yes_no};

/// Parses a `DescriptorReferredTo` element.
pub fn parse_descriptor_reference(element: Option<&Element>) -> DescriptorReference {
    let Some(element) = element else {
        return DescriptorReference::default();
    };

    DescriptorReference {
        ui: reference_ui(element, "DescriptorUI"),
        name: string_child(element.child("DescriptorName")),
    }
}

/// Parses a `QualifierReferredTo` element.
pub fn parse_qualifier_reference(element: Option<&Element>) -> QualifierReference {
    let Some(element) = element else {
        return QualifierReference::default();
    };

    QualifierReference {
        ui: reference_ui(element, "QualifierUI"),
        name: string_child(element.child("QualifierName")),
    }
}

/// Parses an element holding a `DescriptorReferredTo` and an optional
/// `QualifierReferredTo` (`ECIN`, `ECOUT`, `HeadingMappedTo`,
/// `IndexingInformation`).
pub fn parse_heading_pair(element: Option<&Element>) -> HeadingPair {
    let Some(element) = element else {
        return HeadingPair::default();
    };

    HeadingPair {
        descriptor: parse_descriptor_reference(element.child("DescriptorReferredTo")),
        qualifier: parse_qualifier_reference(element.child("QualifierReferredTo")),
    }
}

/// Parses an `EntryCombination` element.
pub fn parse_entry_combination(element: Option<&Element>) -> EntryCombination {
    let Some(element) = element else {
        return EntryCombination::default();
    };

    EntryCombination {
        entry_in: parse_heading_pair(element.child("ECIN")),
        entry_out: parse_heading_pair(element.child("ECOUT")),
    }
}

/// Parses an `EntryCombinationList` element.
pub fn parse_entry_combination_list(element: Option<&Element>) -> Vec<EntryCombination> {
    entries(element, "EntryCombination", parse_entry_combination)
}

/// Parses an `AllowableQualifier` element.
pub fn parse_allowable_qualifier(element: Option<&Element>) -> AllowableQualifier {
    let Some(element) = element else {
        return AllowableQualifier::default();
    };

    AllowableQualifier {
        qualifier: parse_qualifier_reference(element.child("QualifierReferredTo")),
        abbreviation: child_text(Some(element), "Abbreviation"),
    }
}

/// Parses an `AllowableQualifiersList` element.
pub fn parse_allowable_qualifier_list(element: Option<&Element>) -> Vec<AllowableQualifier> {
    entries(element, "AllowableQualifier", parse_allowable_qualifier)
}

/// Parses a `SeeRelatedList` element.
pub fn parse_see_related_list(element: Option<&Element>) -> Vec<DescriptorReference> {
    entries(element, "SeeRelatedDescriptor", |entry| {
        parse_descriptor_reference(entry.and_then(|e| e.child("DescriptorReferredTo")))
    })
}

/// Parses a `PharmacologicalActionList` element.
pub fn parse_pharmacological_action_list(element: Option<&Element>) -> Vec<DescriptorReference> {
    entries(element, "PharmacologicalAction", |entry| {
        parse_descriptor_reference(entry.and_then(|e| e.child("DescriptorReferredTo")))
    })
}

/// Parses a `HeadingMappedToList` element.
pub fn parse_heading_mapped_to_list(element: Option<&Element>) -> Vec<HeadingPair> {
    entries(element, "HeadingMappedTo", parse_heading_pair)
}

/// Parses an `IndexingInformationList` element.
pub fn parse_indexing_information_list(element: Option<&Element>) -> Vec<HeadingPair> {
    entries(element, "IndexingInformation", parse_heading_pair)
}

/// Parses a `TreeNumberList` element.
pub fn parse_tree_number_list(element: Option<&Element>) -> Vec<String> {
    values(element, "TreeNumber")
}

/// Parses a `PreviousIndexingList` element.
pub fn parse_previous_indexing_list(element: Option<&Element>) -> Vec<String> {
    values(element, "PreviousIndexing")
}

/// Parses a `SourceList` element.
pub fn parse_source_list(element: Option<&Element>) -> Vec<String> {
    values(element, "Source")
}

/// Parses a `ThesaurusIDlist` element.
pub fn parse_thesaurus_id_list(element: Option<&Element>) -> Vec<String> {
    values(element, "ThesaurusID")
}

/// Parses a `RelatedRegistryNumberList` element.
pub fn parse_related_registry_number_list(element: Option<&Element>) -> Vec<String> {
    values(element, "RelatedRegistryNumber")
}

/// Parses a `ConceptRelation` element.
pub fn parse_concept_relation(element: Option<&Element>) -> ConceptRelation {
    let Some(element) = element else {
        return ConceptRelation::default();
    };

    ConceptRelation {
        relation_name: attribute(Some(element), "RelationName")
            .and_then(|code| RelationName::from_code(&code)),
        concept1_ui: child_text(Some(element), "Concept1UI"),
        concept2_ui: child_text(Some(element), "Concept2UI"),
    }
}

/// Parses a `ConceptRelationList` element.
pub fn parse_concept_relation_list(element: Option<&Element>) -> Vec<ConceptRelation> {
    entries(element, "ConceptRelation", parse_concept_relation)
}

/// Parses a `Term` element.
pub fn parse_term(element: Option<&Element>) -> Term {
    let Some(element) = element else {
        return Term::default();
    };

    Term {
        is_concept_preferred_term: flag(element, "ConceptPreferredTermYN"),
        is_permuted_term: flag(element, "IsPermutedTermYN"),
        lexical_tag: attribute(Some(element), "LexicalTag")
            .and_then(|code| LexicalTag::from_code(&code)),
        is_record_preferred_term: flag(element, "RecordPreferredTermYN"),
        ui: child_text(Some(element), "TermUI"),
        string: child_text(Some(element), "String"),
        date_created: date(element.child("DateCreated")),
        abbreviation: child_text(Some(element), "Abbreviation"),
        sort_version: child_text(Some(element), "SortVersion"),
        entry_version: child_text(Some(element), "EntryVersion"),
        thesaurus_ids: parse_thesaurus_id_list(element.child("ThesaurusIDlist")),
        note: child_text(Some(element), "TermNote"),
    }
}

/// Parses a `TermList` element.
pub fn parse_term_list(element: Option<&Element>) -> Vec<Term> {
    entries(element, "Term", parse_term)
}

/// Parses a `Concept` element.
pub fn parse_concept(element: Option<&Element>) -> Concept {
    let Some(element) = element else {
        return Concept::default();
    };

    Concept {
        is_preferred: flag(element, "PreferredConceptYN"),
        ui: child_text(Some(element), "ConceptUI"),
        name: string_child(element.child("ConceptName")),
        casn1_name: child_text(Some(element), "CASN1Name"),
        registry_number: child_text(Some(element), "RegistryNumber"),
        scope_note: child_text(Some(element), "ScopeNote"),
        translators_english_scope_note: child_text(Some(element), "TranslatorsEnglishScopeNote"),
        translators_scope_note: child_text(Some(element), "TranslatorsScopeNote"),
        related_registry_numbers: parse_related_registry_number_list(
            element.child("RelatedRegistryNumberList"),
        ),
        relations: parse_concept_relation_list(element.child("ConceptRelationList")),
        terms: parse_term_list(element.child("TermList")),
    }
}

/// Parses a `ConceptList` element.
pub fn parse_concept_list(element: Option<&Element>) -> Vec<Concept> {
    entries(element, "Concept", parse_concept)
}

fn reference_ui(element: &Element, name: &str) -> Option<String> {
    let ui = child_text(Some(element), name)?;
    let stripped = strip_marker(&ui);
    if stripped.is_empty() {
        None
    } else {
        Some(stripped.to_string())
    }
}

fn flag(element: &Element, name: &str) -> Option<bool> {
    yes_no(attribute(Some(element), name).as_deref())
}

fn entries<T, F>(element: Option<&Element>, name: &str, parse: F) -> Vec<T>
where
    F: Fn(Option<&Element>) -> T,
{
    match element {
        Some(element) => element
            .children_named(name)
            .map(|entry| parse(Some(entry)))
            .collect(),
        None => Vec::new(),
    }
}

fn values(element: Option<&Element>, name: &str) -> Vec<String> {
    match element {
        Some(element) => element
            .children_named(name)
            .filter_map(|entry| text(Some(entry)))
            .collect(),
        None => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn make_string(tag: &str, value: &str) -> Element {
        Element::new(tag).with_child(Element::new("String").with_text(value))
    }

    fn make_descriptor_reference(ui: &str, name: &str) -> Element {
        Element::new("DescriptorReferredTo")
            .with_child(Element::new("DescriptorUI").with_text(ui))
            .with_child(make_string("DescriptorName", name))
    }

    fn make_qualifier_reference(ui: &str, name: &str) -> Element {
        Element::new("QualifierReferredTo")
            .with_child(Element::new("QualifierUI").with_text(ui))
            .with_child(make_string("QualifierName", name))
    }

    fn make_term() -> Element {
        Element::new("Term")
            .with_attribute("ConceptPreferredTermYN", "Y")
            .with_attribute("IsPermutedTermYN", "N")
            .with_attribute("LexicalTag", "NON")
            .with_attribute("RecordPreferredTermYN", "Y")
            .with_child(Element::new("TermUI").with_text("T000002"))
            .with_child(Element::new("String").with_text("Calcimycin"))
            .with_child(
                Element::new("DateCreated")
                    .with_child(Element::new("Year").with_text("1999"))
                    .with_child(Element::new("Month").with_text("01"))
                    .with_child(Element::new("Day").with_text("01")),
            )
            .with_child(Element::new("SortVersion").with_text("AMPHETAMINE A D"))
            .with_child(Element::new("EntryVersion").with_text("ABDOMINAL INJ"))
            .with_child(Element::new("Abbreviation").with_text("BS"))
            .with_child(
                Element::new("ThesaurusIDlist")
                    .with_child(Element::new("ThesaurusID").with_text("FDA SRS (2014)"))
                    .with_child(Element::new("ThesaurusID").with_text("NLM (1975)")),
            )
    }

    #[test]
    fn test_reference_strips_marker() {
        let reference = parse_descriptor_reference(Some(&make_descriptor_reference(
            "*D001561",
            "Benzilates",
        )));
        assert_eq!(reference.ui.as_deref(), Some("D001561"));
        assert_eq!(reference.name.as_deref(), Some("Benzilates"));

        let qualifier = parse_qualifier_reference(Some(&make_qualifier_reference(
            "*Q000031",
            "analogs & derivatives",
        )));
        assert_eq!(qualifier.ui.as_deref(), Some("Q000031"));
    }

    #[test]
    fn test_absent_reference_is_default() {
        assert_eq!(parse_descriptor_reference(None), DescriptorReference::default());
        assert_eq!(parse_qualifier_reference(None), QualifierReference::default());

        let marker_only = Element::new("QualifierReferredTo")
            .with_child(Element::new("QualifierUI").with_text("*"));
        assert_eq!(parse_qualifier_reference(Some(&marker_only)).ui, None);
    }

    #[test]
    fn test_heading_pair_without_qualifier() {
        let heading = Element::new("HeadingMappedTo")
            .with_child(make_descriptor_reference("*D001561", "Benzilates"));
        let pair = parse_heading_pair(Some(&heading));

        assert_eq!(pair.descriptor.ui.as_deref(), Some("D001561"));
        assert!(!pair.has_qualifier());
        assert_eq!(pair.qualifier, QualifierReference::default());
    }

    #[test]
    fn test_entry_combination() {
        let combination = Element::new("EntryCombination")
            .with_child(
                Element::new("ECIN")
                    .with_child(make_descriptor_reference("D000022", "Abortion, Spontaneous"))
                    .with_child(make_qualifier_reference("Q000662", "veterinary")),
            )
            .with_child(
                Element::new("ECOUT")
                    .with_child(make_descriptor_reference("D000034", "Abortion, Veterinary")),
            );
        let list = Element::new("EntryCombinationList").with_child(combination);

        let parsed = parse_entry_combination_list(Some(&list));
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].entry_in.descriptor.ui.as_deref(), Some("D000022"));
        assert_eq!(parsed[0].entry_in.qualifier.ui.as_deref(), Some("Q000662"));
        assert_eq!(parsed[0].entry_out.descriptor.ui.as_deref(), Some("D000034"));
        assert_eq!(parsed[0].entry_out.qualifier.ui, None);
    }

    #[test]
    fn test_allowable_qualifier_list() {
        let list = Element::new("AllowableQualifiersList").with_child(
            Element::new("AllowableQualifier")
                .with_child(make_qualifier_reference("Q000302", "isolation & purification"))
                .with_child(Element::new("Abbreviation").with_text("IP")),
        );

        let parsed = parse_allowable_qualifier_list(Some(&list));
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].qualifier.ui.as_deref(), Some("Q000302"));
        assert_eq!(
            parsed[0].qualifier.name.as_deref(),
            Some("isolation & purification")
        );
        assert_eq!(parsed[0].abbreviation.as_deref(), Some("IP"));
    }

    #[test]
    fn test_simple_lists_skip_blank_entries() {
        let list = Element::new("TreeNumberList")
            .with_child(Element::new("TreeNumber").with_text("Y04.010"))
            .with_child(Element::new("TreeNumber").with_text("  "))
            .with_child(Element::new("TreeNumber").with_text("Y04.011"));

        assert_eq!(parse_tree_number_list(Some(&list)), vec!["Y04.010", "Y04.011"]);
        assert!(parse_tree_number_list(None).is_empty());
        assert!(parse_source_list(None).is_empty());
    }

    #[test]
    fn test_concept_relation_unknown_name() {
        let relation = Element::new("ConceptRelation")
            .with_attribute("RelationName", "XYZ")
            .with_child(Element::new("Concept1UI").with_text("M0000002"))
            .with_child(Element::new("Concept2UI").with_text("M0352201"));

        let parsed = parse_concept_relation(Some(&relation));
        assert_eq!(parsed.relation_name, None);
        assert_eq!(parsed.concept1_ui.as_deref(), Some("M0000002"));
        assert_eq!(parsed.concept2_ui.as_deref(), Some("M0352201"));
    }

    #[test]
    fn test_term() {
        let term = parse_term(Some(&make_term()));

        assert_eq!(term.is_concept_preferred_term, Some(true));
        assert_eq!(term.is_permuted_term, Some(false));
        assert_eq!(term.lexical_tag, Some(LexicalTag::None));
        assert_eq!(term.is_record_preferred_term, Some(true));
        assert_eq!(term.ui.as_deref(), Some("T000002"));
        assert_eq!(term.string.as_deref(), Some("Calcimycin"));
        assert_eq!(term.date_created, NaiveDate::from_ymd_opt(1999, 1, 1));
        assert_eq!(term.sort_version.as_deref(), Some("AMPHETAMINE A D"));
        assert_eq!(term.entry_version.as_deref(), Some("ABDOMINAL INJ"));
        assert_eq!(term.abbreviation.as_deref(), Some("BS"));
        assert_eq!(term.thesaurus_ids, vec!["FDA SRS (2014)", "NLM (1975)"]);
        assert_eq!(term.note, None);
    }

    #[test]
    fn test_concept() {
        let concept = Element::new("Concept")
            .with_attribute("PreferredConceptYN", "N")
            .with_child(Element::new("ConceptUI").with_text("M0353609"))
            .with_child(make_string("ConceptName", "A-23187"))
            .with_child(Element::new("RegistryNumber").with_text("0"))
            .with_child(
                Element::new("ConceptRelationList").with_child(
                    Element::new("ConceptRelation")
                        .with_attribute("RelationName", "NRW")
                        .with_child(Element::new("Concept1UI").with_text("M0000001"))
                        .with_child(Element::new("Concept2UI").with_text("M0353609")),
                ),
            )
            .with_child(Element::new("TermList").with_child(make_term()));

        let parsed = parse_concept(Some(&concept));
        assert_eq!(parsed.is_preferred, Some(false));
        assert_eq!(parsed.ui.as_deref(), Some("M0353609"));
        assert_eq!(parsed.name.as_deref(), Some("A-23187"));
        assert_eq!(parsed.registry_number.as_deref(), Some("0"));
        assert_eq!(parsed.casn1_name, None);
        assert_eq!(parsed.relations.len(), 1);
        assert_eq!(parsed.relations[0].relation_name, Some(RelationName::Narrower));
        assert_eq!(parsed.terms.len(), 1);
        assert!(parsed.related_registry_numbers.is_empty());
    }

    #[test]
    fn test_absent_concept_list() {
        assert!(parse_concept_list(None).is_empty());
        assert_eq!(parse_concept(None), Concept::default());
        assert_eq!(parse_term(None), Term::default());
    }
}
