//! MeSH concepts and terms.
//!
//! Every descriptor, qualifier and supplemental record carries a
//! `ConceptList`; each concept carries a `TermList`.

use chrono::NaiveDate;

use crate::{LexicalTag, RelationName};

/// A `Term` of a concept.
///
/// # Examples
///
/// ```
/// use mesh_types::{LexicalTag, Term};
///
/// let term = Term {
///     ui: Some("T000002".to_string()),
///     string: Some("Calcimycin".to_string()),
///     lexical_tag: Some(LexicalTag::None),
///     is_record_preferred_term: Some(true),
///     ..Default::default()
/// };
///
/// assert!(term.is_record_preferred());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Term {
    /// `ConceptPreferredTermYN`.
    pub is_concept_preferred_term: Option<bool>,
    /// `IsPermutedTermYN`.
    pub is_permuted_term: Option<bool>,
    /// `LexicalTag`.
    pub lexical_tag: Option<LexicalTag>,
    /// `RecordPreferredTermYN`.
    pub is_record_preferred_term: Option<bool>,
    /// `TermUI`.
    pub ui: Option<String>,
    /// The term text (`String`).
    pub string: Option<String>,
    /// `DateCreated`.
    pub date_created: Option<NaiveDate>,
    /// `Abbreviation`.
    pub abbreviation: Option<String>,
    /// `SortVersion`.
    pub sort_version: Option<String>,
    /// `EntryVersion`.
    pub entry_version: Option<String>,
    /// `ThesaurusIDlist` entries.
    pub thesaurus_ids: Vec<String>,
    /// `TermNote`.
    pub note: Option<String>,
}

impl Term {
    /// Returns true if this term is the preferred term of the whole record.
    pub fn is_record_preferred(&self) -> bool {
        self.is_record_preferred_term == Some(true)
    }
}

/// A `ConceptRelation` between two concepts of the same record.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConceptRelation {
    /// `RelationName` attribute.
    pub relation_name: Option<RelationName>,
    /// `Concept1UI`.
    pub concept1_ui: Option<String>,
    /// `Concept2UI`.
    pub concept2_ui: Option<String>,
}

/// A `Concept` of a record.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Concept {
    /// `PreferredConceptYN`.
    pub is_preferred: Option<bool>,
    /// `ConceptUI`.
    pub ui: Option<String>,
    /// `ConceptName`.
    pub name: Option<String>,
    /// `CASN1Name`.
    pub casn1_name: Option<String>,
    /// `RegistryNumber`.
    pub registry_number: Option<String>,
    /// `ScopeNote`.
    pub scope_note: Option<String>,
    /// `TranslatorsEnglishScopeNote`.
    pub translators_english_scope_note: Option<String>,
    /// `TranslatorsScopeNote`.
    pub translators_scope_note: Option<String>,
    /// `RelatedRegistryNumberList` entries.
    pub related_registry_numbers: Vec<String>,
    /// `ConceptRelationList` entries.
    pub relations: Vec<ConceptRelation>,
    /// `TermList` entries.
    pub terms: Vec<Term>,
}

impl Concept {
    /// Returns the record-preferred term of this concept, if any.
    pub fn record_preferred_term(&self) -> Option<&Term> {
        self.terms.iter().find(|term| term.is_record_preferred())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_term(ui: &str, record_preferred: Option<bool>) -> Term {
        Term {
            ui: Some(ui.to_string()),
            is_record_preferred_term: record_preferred,
            ..Default::default()
        }
    }

    #[test]
    fn test_record_preferred_term() {
        let concept = Concept {
            ui: Some("M0000001".to_string()),
            terms: vec![
                make_term("T000001", Some(false)),
                make_term("T000002", Some(true)),
                make_term("T000003", None),
            ],
            ..Default::default()
        };

        let preferred = concept.record_preferred_term().unwrap();
        assert_eq!(preferred.ui.as_deref(), Some("T000002"));
    }

    #[test]
    fn test_default_concept_is_empty() {
        let concept = Concept::default();
        assert!(concept.record_preferred_term().is_none());
        assert!(concept.terms.is_empty());
        assert!(concept.relations.is_empty());
    }
}
