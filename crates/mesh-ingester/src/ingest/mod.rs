//! Ingestion of parsed MeSH records and UMLS maps into a [`MeshStore`].
//!
//! Each record is stored root first, then its children in a fixed order.
//! Links to other top-level records are only resolved when
//! [`IngestOptions::ingest_links`] is set; a reference whose target is not
//! stored yet is kept as a link with no child.

mod descriptor;
mod qualifier;
mod supplemental;
mod umls;

pub use descriptor::DescriptorIngester;
pub use qualifier::QualifierIngester;
pub use supplemental::SupplementalIngester;
pub use umls::{DefinitionIngester, SynonymIngester};

use mesh_loader::MeshRecord;
use mesh_types::{Concept, DescriptorReference, HeadingPair, QualifierReference, Term};
use tracing::{debug, warn};

use crate::store::{
    ConceptRelationRow, ConceptRow, Entity, EntryCombinationRow, Link, LinkAttrs, LinkKind,
    MeshStore, RowId, TermRow, ValueKind,
};
use crate::types::{IngestOptions, IngestResult};

/// An ingester for one MeSH record family.
pub trait RecordIngester {
    /// Parsed document type.
    type Record: MeshRecord;

    /// Stores one record and returns the key of its root row.
    ///
    /// Empty records are skipped and return `None`.
    fn ingest(&mut self, record: &Self::Record) -> IngestResult<Option<RowId>>;
}

/// Resolves a descriptor reference to a stored row.
pub(crate) fn resolve_descriptor<S: MeshStore>(
    store: &S,
    reference: &DescriptorReference,
) -> IngestResult<Option<RowId>> {
    resolve(store, Entity::Descriptor, reference.ui.as_deref())
}

/// Resolves a qualifier reference to a stored row.
pub(crate) fn resolve_qualifier<S: MeshStore>(
    store: &S,
    reference: &QualifierReference,
) -> IngestResult<Option<RowId>> {
    resolve(store, Entity::Qualifier, reference.ui.as_deref())
}

fn resolve<S: MeshStore>(store: &S, entity: Entity, ui: Option<&str>) -> IngestResult<Option<RowId>> {
    let Some(ui) = ui else {
        return Ok(None);
    };
    let id = store.find_by_ui(entity, ui)?;
    if id.is_none() {
        debug!("Unresolved {:?} reference {}", entity, ui);
    }
    Ok(id)
}

/// Stores a descriptor/qualifier pairing and returns its key.
pub(crate) fn ingest_heading_pair<S: MeshStore>(
    store: &mut S,
    pair: &HeadingPair,
    combination_type: Option<mesh_types::EntryCombinationType>,
) -> IngestResult<RowId> {
    let row = EntryCombinationRow {
        descriptor: resolve_descriptor(store, &pair.descriptor)?,
        qualifier: resolve_qualifier(store, &pair.qualifier)?,
        combination_type,
    };
    Ok(store.upsert_entry_combination(&row)?)
}

/// Stores each value and links it to `parent`.
pub(crate) fn ingest_values<S: MeshStore>(
    store: &mut S,
    kind: ValueKind,
    link: LinkKind,
    parent: RowId,
    values: &[String],
) -> IngestResult<()> {
    for value in values {
        let id = store.upsert_value(kind, value)?;
        store.upsert_link(&Link::new(link, parent, Some(id)))?;
    }
    Ok(())
}

/// Stores a term and its thesaurus IDs.
pub(crate) fn ingest_term<S: MeshStore>(store: &mut S, term: &Term) -> IngestResult<Option<RowId>> {
    let Some(ui) = term.ui.as_deref() else {
        warn!("Skipping term without UI: {:?}", term.string);
        return Ok(None);
    };
    debug!("Ingesting term {}", ui);

    let term_id = store.upsert_term(&TermRow {
        ui: ui.to_string(),
        name: term.string.clone(),
        created: term.date_created,
        abbreviation: term.abbreviation.clone(),
        sort_version: term.sort_version.clone(),
        entry_version: term.entry_version.clone(),
        note: term.note.clone(),
    })?;

    ingest_values(
        store,
        ValueKind::ThesaurusId,
        LinkKind::TermThesaurusId,
        term_id,
        &term.thesaurus_ids,
    )?;

    Ok(Some(term_id))
}

/// Stores a concept, its relations and its terms.
pub(crate) fn ingest_concept<S: MeshStore>(
    store: &mut S,
    concept: &Concept,
    options: IngestOptions,
) -> IngestResult<Option<RowId>> {
    let Some(ui) = concept.ui.as_deref() else {
        warn!("Skipping concept without UI: {:?}", concept.name);
        return Ok(None);
    };
    debug!("Ingesting concept {}", ui);

    let concept_id = store.upsert_concept(&ConceptRow {
        ui: ui.to_string(),
        name: concept.name.clone(),
        casn1_name: concept.casn1_name.clone(),
        registry_number: concept.registry_number.clone(),
        scope_note: concept.scope_note.clone(),
        translators_english_scope_note: concept.translators_english_scope_note.clone(),
        translators_scope_note: concept.translators_scope_note.clone(),
    })?;

    if options.ingest_links {
        for relation in &concept.relations {
            let row = ConceptRelationRow {
                concept: resolve(store, Entity::Concept, relation.concept1_ui.as_deref())?,
                related: resolve(store, Entity::Concept, relation.concept2_ui.as_deref())?,
                relation_name: relation.relation_name,
            };
            store.upsert_concept_relation(&row)?;
        }
    }

    for term in &concept.terms {
        let Some(term_id) = ingest_term(store, term)? else {
            continue;
        };
        let link = Link::new(LinkKind::ConceptTerm, concept_id, Some(term_id)).with_attrs(
            LinkAttrs::ConceptTerm {
                is_concept_preferred_term: term.is_concept_preferred_term,
                is_permuted_term: term.is_permuted_term,
                lexical_tag: term.lexical_tag,
                is_record_preferred_term: term.is_record_preferred_term,
            },
        );
        store.upsert_link(&link)?;
    }

    Ok(Some(concept_id))
}

/// Stores each concept and links it to `parent` with its preferred flag.
pub(crate) fn ingest_concepts<S: MeshStore>(
    store: &mut S,
    link: LinkKind,
    parent: RowId,
    concepts: &[Concept],
    options: IngestOptions,
) -> IngestResult<()> {
    for concept in concepts {
        let Some(concept_id) = ingest_concept(store, concept, options)? else {
            continue;
        };
        let attrs = LinkAttrs::Preferred {
            is_preferred: concept.is_preferred,
        };
        store.upsert_link(&Link::new(link, parent, Some(concept_id)).with_attrs(attrs))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use mesh_types::{ConceptRelation, LexicalTag, RelationName};

    fn make_concept(ui: &str) -> Concept {
        Concept {
            is_preferred: Some(true),
            ui: Some(ui.to_string()),
            name: Some("Calcimycin".to_string()),
            terms: vec![Term {
                is_concept_preferred_term: Some(true),
                is_permuted_term: Some(false),
                lexical_tag: Some(LexicalTag::None),
                is_record_preferred_term: Some(true),
                ui: Some("T000002".to_string()),
                string: Some("Calcimycin".to_string()),
                thesaurus_ids: vec!["FDA SRS (2014)".to_string(), "NLM (1975)".to_string()],
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_ingest_concept_with_terms() {
        let mut store = MemoryStore::new();
        let id = ingest_concept(&mut store, &make_concept("M0000001"), IngestOptions::default())
            .unwrap()
            .unwrap();

        assert_eq!(store.concept(id).unwrap().ui, "M0000001");
        assert_eq!(store.record_count(Entity::Term), 1);
        assert_eq!(store.value_count(ValueKind::ThesaurusId), 2);
        assert_eq!(store.link_count(LinkKind::TermThesaurusId), 2);

        let links = store.links_from(LinkKind::ConceptTerm, id);
        assert_eq!(links.len(), 1);
        assert!(matches!(
            links[0].attrs,
            LinkAttrs::ConceptTerm {
                is_record_preferred_term: Some(true),
                ..
            }
        ));
    }

    #[test]
    fn test_nested_records_without_ui_are_skipped() {
        let mut store = MemoryStore::new();
        let mut concept = make_concept("M0000001");
        concept.terms[0].ui = None;

        let id = ingest_concept(&mut store, &concept, IngestOptions::default())
            .unwrap()
            .unwrap();
        assert_eq!(store.record_count(Entity::Term), 0);
        assert!(store.links_from(LinkKind::ConceptTerm, id).is_empty());

        concept.ui = None;
        assert_eq!(
            ingest_concept(&mut store, &concept, IngestOptions::default()).unwrap(),
            None
        );
    }

    #[test]
    fn test_concept_relations_follow_link_option() {
        let mut store = MemoryStore::new();
        let mut concept = make_concept("M0000001");
        concept.relations = vec![ConceptRelation {
            relation_name: Some(RelationName::Narrower),
            concept1_ui: Some("M0000001".to_string()),
            concept2_ui: Some("M0353609".to_string()),
        }];

        ingest_concept(&mut store, &concept, IngestOptions::records_only()).unwrap();
        assert_eq!(store.concept_relations().count(), 0);

        let id = ingest_concept(&mut store, &concept, IngestOptions::with_links())
            .unwrap()
            .unwrap();
        let relations: Vec<_> = store.concept_relations().collect();
        assert_eq!(relations.len(), 1);
        assert_eq!(relations[0].concept, Some(id));
        assert_eq!(relations[0].related, None);
        assert_eq!(relations[0].relation_name, Some(RelationName::Narrower));
    }

    #[test]
    fn test_heading_pair_with_missing_references() {
        let mut store = MemoryStore::new();
        let pair = HeadingPair {
            descriptor: DescriptorReference {
                ui: Some("D001561".to_string()),
                name: Some("Benzilates".to_string()),
            },
            qualifier: QualifierReference::default(),
        };

        let id = ingest_heading_pair(&mut store, &pair, None).unwrap();
        let row = store.entry_combination(id).unwrap();
        assert_eq!(row.descriptor, None);
        assert_eq!(row.qualifier, None);
    }
}
