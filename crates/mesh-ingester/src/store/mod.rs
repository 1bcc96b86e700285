//! Persistence contract for ingested MeSH data.
//!
//! Rows fall into four groups:
//!
//! - **Records** (descriptors, qualifiers, supplementals, concepts, terms)
//!   are keyed by UI and updated in place when ingested again.
//! - **Values** (tree numbers, thesaurus IDs, previous indexings, sources)
//!   are keyed by the MD5 of their text and never change once stored.
//! - **Links** join a parent row to a child row. Links that carry mutable
//!   attributes are updated on conflict; bare links are left alone.
//! - **Synonyms and definitions** hang off a record and are keyed by owner
//!   and MD5 of their text.
//!
//! Every upsert returns the surrogate key of the stored row whether it was
//! inserted by this call or already present.

mod memory;
mod sqlite;

pub use memory::{LinkRow, MemoryStore, TextRow};
pub use sqlite::SqliteStore;

use std::fmt;

use chrono::NaiveDate;
use mesh_types::{
    DescriptorClass, EntryCombinationType, LexicalTag, RelationName, SupplementalClass, UiKind,
};

use crate::types::{StoreError, StoreResult};

/// Surrogate key of a stored row.
pub type RowId = i64;

/// Hex-encoded MD5 digest of a stored value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentHash(String);

impl ContentHash {
    /// Hashes a value.
    pub fn of(value: &str) -> Self {
        Self(format!("{:x}", md5::compute(value.as_bytes())))
    }

    /// Returns the hex digest.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Record tables keyed by UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Entity {
    /// Descriptors (`D` UIs).
    Descriptor,
    /// Qualifiers (`Q` UIs).
    Qualifier,
    /// Supplemental concept records (`C` UIs).
    Supplemental,
    /// Concepts (`M` UIs).
    Concept,
    /// Terms (`T` UIs).
    Term,
}

impl Entity {
    /// Returns the table name.
    pub fn table(self) -> &'static str {
        match self {
            Entity::Descriptor => "descriptors",
            Entity::Qualifier => "qualifiers",
            Entity::Supplemental => "supplementals",
            Entity::Concept => "concepts",
            Entity::Term => "terms",
        }
    }
}

impl From<UiKind> for Entity {
    fn from(kind: UiKind) -> Self {
        match kind {
            UiKind::Descriptor => Entity::Descriptor,
            UiKind::Supplemental => Entity::Supplemental,
            UiKind::Concept => Entity::Concept,
            UiKind::Qualifier => Entity::Qualifier,
        }
    }
}

/// Append-only value tables keyed by content hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// Tree numbers.
    TreeNumber,
    /// Thesaurus IDs.
    ThesaurusId,
    /// Previous indexings.
    PreviousIndexing,
    /// Literature sources.
    Source,
}

impl ValueKind {
    /// Returns the table name.
    pub fn table(self) -> &'static str {
        match self {
            ValueKind::TreeNumber => "tree_numbers",
            ValueKind::ThesaurusId => "thesaurus_ids",
            ValueKind::PreviousIndexing => "previous_indexings",
            ValueKind::Source => "sources",
        }
    }

    /// Returns the column holding the value text.
    pub fn column(self) -> &'static str {
        match self {
            ValueKind::TreeNumber => "tree_number",
            ValueKind::ThesaurusId => "thesaurus_id",
            ValueKind::PreviousIndexing => "previous_indexing",
            ValueKind::Source => "source",
        }
    }
}

/// Conflict handling for an upsert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertPolicy {
    /// Keep the stored row untouched (IODI).
    DoNothing,
    /// Overwrite the stored row's attributes (IODU).
    DoUpdate,
}

/// Join tables between a parent row and a child row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkKind {
    /// Term → thesaurus ID.
    TermThesaurusId,
    /// Concept → term, with term flags.
    ConceptTerm,
    /// Qualifier → tree number.
    QualifierTreeNumber,
    /// Qualifier → concept, with preferred flag.
    QualifierConcept,
    /// Descriptor → tree number.
    DescriptorTreeNumber,
    /// Descriptor → concept, with preferred flag.
    DescriptorConcept,
    /// Descriptor → previous indexing.
    DescriptorPreviousIndexing,
    /// Descriptor → qualifier, with abbreviation.
    DescriptorAllowableQualifier,
    /// Descriptor → entry combination.
    DescriptorEntryCombination,
    /// Descriptor → pharmacological action descriptor.
    DescriptorPharmacologicalAction,
    /// Descriptor → see-related descriptor.
    DescriptorRelatedDescriptor,
    /// Supplemental → concept, with preferred flag.
    SupplementalConcept,
    /// Supplemental → previous indexing.
    SupplementalPreviousIndexing,
    /// Supplemental → heading-mapped-to entry combination.
    SupplementalHeadingMappedTo,
    /// Supplemental → indexing-information entry combination.
    SupplementalIndexingInformation,
    /// Supplemental → pharmacological action descriptor.
    SupplementalPharmacologicalAction,
    /// Supplemental → source.
    SupplementalSource,
}

impl LinkKind {
    /// All link kinds.
    pub const ALL: [LinkKind; 17] = [
        LinkKind::TermThesaurusId,
        LinkKind::ConceptTerm,
        LinkKind::QualifierTreeNumber,
        LinkKind::QualifierConcept,
        LinkKind::DescriptorTreeNumber,
        LinkKind::DescriptorConcept,
        LinkKind::DescriptorPreviousIndexing,
        LinkKind::DescriptorAllowableQualifier,
        LinkKind::DescriptorEntryCombination,
        LinkKind::DescriptorPharmacologicalAction,
        LinkKind::DescriptorRelatedDescriptor,
        LinkKind::SupplementalConcept,
        LinkKind::SupplementalPreviousIndexing,
        LinkKind::SupplementalHeadingMappedTo,
        LinkKind::SupplementalIndexingInformation,
        LinkKind::SupplementalPharmacologicalAction,
        LinkKind::SupplementalSource,
    ];

    /// Returns the conflict policy: links with attributes are updated.
    pub fn policy(self) -> UpsertPolicy {
        match self {
            LinkKind::ConceptTerm
            | LinkKind::QualifierConcept
            | LinkKind::DescriptorConcept
            | LinkKind::SupplementalConcept
            | LinkKind::DescriptorAllowableQualifier => UpsertPolicy::DoUpdate,
            _ => UpsertPolicy::DoNothing,
        }
    }

    /// Returns true if `attrs` has the shape this link stores.
    pub fn accepts(self, attrs: &LinkAttrs) -> bool {
        matches!(
            (self, attrs),
            (LinkKind::ConceptTerm, LinkAttrs::ConceptTerm { .. })
                | (
                    LinkKind::QualifierConcept
                        | LinkKind::DescriptorConcept
                        | LinkKind::SupplementalConcept,
                    LinkAttrs::Preferred { .. }
                )
                | (LinkKind::DescriptorAllowableQualifier, LinkAttrs::Abbreviation(_))
        ) || (self.policy() == UpsertPolicy::DoNothing && *attrs == LinkAttrs::None)
    }
}

/// Mutable attributes carried by a link.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LinkAttrs {
    /// Bare link.
    #[default]
    None,
    /// Record → concept link.
    Preferred {
        /// Preferred concept of the record.
        is_preferred: Option<bool>,
    },
    /// Allowable qualifier abbreviation.
    Abbreviation(Option<String>),
    /// Concept → term link.
    ConceptTerm {
        /// Preferred term of the concept.
        is_concept_preferred_term: Option<bool>,
        /// Permuted form of another term.
        is_permuted_term: Option<bool>,
        /// Lexical category.
        lexical_tag: Option<LexicalTag>,
        /// Preferred term of the whole record.
        is_record_preferred_term: Option<bool>,
    },
}

/// A parent → child link.
///
/// The child is `None` when its reference could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    /// Join table.
    pub kind: LinkKind,
    /// Parent row.
    pub parent: RowId,
    /// Child row.
    pub child: Option<RowId>,
    /// Mutable attributes.
    pub attrs: LinkAttrs,
}

impl Link {
    /// Creates a bare link.
    pub fn new(kind: LinkKind, parent: RowId, child: Option<RowId>) -> Self {
        Self {
            kind,
            parent,
            child,
            attrs: LinkAttrs::None,
        }
    }

    /// Sets the link attributes.
    pub fn with_attrs(mut self, attrs: LinkAttrs) -> Self {
        self.attrs = attrs;
        self
    }

    /// Checks that the attributes fit the link kind.
    pub fn validate(&self) -> StoreResult<()> {
        if self.kind.accepts(&self.attrs) {
            Ok(())
        } else {
            Err(StoreError::Integrity(format!(
                "{:?} link cannot carry {:?}",
                self.kind, self.attrs
            )))
        }
    }
}

/// Owner of a synonym or definition row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Owner {
    /// Owning table.
    pub entity: Entity,
    /// Owning row.
    pub id: RowId,
}

// ═══════════════════════════════════════════════════════════════════════════
// Row types
// ═══════════════════════════════════════════════════════════════════════════

/// Stored descriptor attributes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DescriptorRow {
    /// Descriptor UI (`D...`).
    pub ui: String,
    /// Descriptor class code.
    pub descriptor_class: Option<DescriptorClass>,
    /// Descriptor name.
    pub name: Option<String>,
    /// Date the record was created.
    pub created: Option<NaiveDate>,
    /// Date the record was last revised.
    pub revised: Option<NaiveDate>,
    /// Date the record was established.
    pub established: Option<NaiveDate>,
    /// Indexer annotation.
    pub annotation: Option<String>,
    /// History note.
    pub history_note: Option<String>,
    /// NLM classification number.
    pub nlm_classification_number: Option<String>,
    /// Online search note.
    pub online_note: Option<String>,
    /// Public MeSH note.
    pub public_mesh_note: Option<String>,
    /// Consider-also cross reference text.
    pub consider_also: Option<String>,
}

/// Stored qualifier attributes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QualifierRow {
    /// Qualifier UI (`Q...`).
    pub ui: String,
    /// Qualifier name.
    pub name: Option<String>,
    /// Date the record was created.
    pub created: Option<NaiveDate>,
    /// Date the record was last revised.
    pub revised: Option<NaiveDate>,
    /// Date the record was established.
    pub established: Option<NaiveDate>,
    /// Indexer annotation.
    pub annotation: Option<String>,
    /// History note.
    pub history_note: Option<String>,
    /// Online search note.
    pub online_note: Option<String>,
}

/// Stored supplemental attributes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SupplementalRow {
    /// Supplemental record UI (`C...`).
    pub ui: String,
    /// Supplemental class code.
    pub supplemental_class: Option<SupplementalClass>,
    /// Supplemental record name.
    pub name: Option<String>,
    /// Date the record was created.
    pub created: Option<NaiveDate>,
    /// Date the record was last revised.
    pub revised: Option<NaiveDate>,
    /// Free-text note.
    pub note: Option<String>,
    /// Citation frequency.
    pub frequency: Option<String>,
}

/// Stored concept attributes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConceptRow {
    /// Concept UI (`M...`).
    pub ui: String,
    /// Concept name.
    pub name: Option<String>,
    /// Chemical Abstracts type N1 name.
    pub casn1_name: Option<String>,
    /// CAS or EC registry number.
    pub registry_number: Option<String>,
    /// Scope note.
    pub scope_note: Option<String>,
    /// Translators' English scope note.
    pub translators_english_scope_note: Option<String>,
    /// Translators' scope note.
    pub translators_scope_note: Option<String>,
}

/// Stored term attributes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TermRow {
    /// Term UI (`T...`).
    pub ui: String,
    /// Term string.
    pub name: Option<String>,
    /// Date the term was created.
    pub created: Option<NaiveDate>,
    /// Abbreviation.
    pub abbreviation: Option<String>,
    /// Sort version of the string.
    pub sort_version: Option<String>,
    /// Entry version of the string.
    pub entry_version: Option<String>,
    /// Thesaurus note.
    pub note: Option<String>,
}

/// Descriptor/qualifier pairing, unique on the pair.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EntryCombinationRow {
    /// Descriptor row, if resolved.
    pub descriptor: Option<RowId>,
    /// Qualifier row, if resolved.
    pub qualifier: Option<RowId>,
    /// `ECIN` or `ECOUT`.
    pub combination_type: Option<EntryCombinationType>,
}

/// Concept → concept relation, unique on the pair.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConceptRelationRow {
    /// First concept row, if resolved.
    pub concept: Option<RowId>,
    /// Second concept row, if resolved.
    pub related: Option<RowId>,
    /// Relation between the two concepts.
    pub relation_name: Option<RelationName>,
}

// ═══════════════════════════════════════════════════════════════════════════
// Store trait
// ═══════════════════════════════════════════════════════════════════════════

/// Idempotent persistence operations used by the ingesters.
pub trait MeshStore {
    /// Inserts or updates a descriptor by UI.
    fn upsert_descriptor(&mut self, row: &DescriptorRow) -> StoreResult<RowId>;

    /// Inserts or updates a qualifier by UI.
    fn upsert_qualifier(&mut self, row: &QualifierRow) -> StoreResult<RowId>;

    /// Inserts or updates a supplemental record by UI.
    fn upsert_supplemental(&mut self, row: &SupplementalRow) -> StoreResult<RowId>;

    /// Inserts or updates a concept by UI.
    fn upsert_concept(&mut self, row: &ConceptRow) -> StoreResult<RowId>;

    /// Inserts or updates a term by UI.
    fn upsert_term(&mut self, row: &TermRow) -> StoreResult<RowId>;

    /// Inserts a value unless one with the same hash exists.
    fn upsert_value(&mut self, kind: ValueKind, value: &str) -> StoreResult<RowId>;

    /// Inserts an entry combination or updates its type.
    fn upsert_entry_combination(&mut self, row: &EntryCombinationRow) -> StoreResult<RowId>;

    /// Inserts a concept relation or updates its name.
    fn upsert_concept_relation(&mut self, row: &ConceptRelationRow) -> StoreResult<RowId>;

    /// Inserts a link, applying the kind's conflict policy.
    fn upsert_link(&mut self, link: &Link) -> StoreResult<RowId>;

    /// Looks up a record by UI.
    fn find_by_ui(&self, entity: Entity, ui: &str) -> StoreResult<Option<RowId>>;

    /// Looks up a value by content hash.
    fn find_by_hash(&self, kind: ValueKind, hash: &ContentHash) -> StoreResult<Option<RowId>>;

    /// Adds synonyms to a record, skipping ones already stored.
    ///
    /// Returns the number of rows inserted.
    fn insert_synonyms(&mut self, owner: Owner, synonyms: &[String]) -> StoreResult<usize>;

    /// Adds definitions from one source to a record, skipping ones already
    /// stored.
    ///
    /// Returns the number of rows inserted.
    fn insert_definitions(
        &mut self,
        owner: Owner,
        source: &str,
        definitions: &[String],
    ) -> StoreResult<usize>;

    /// Opens a transaction.
    fn begin(&mut self) -> StoreResult<()>;

    /// Commits the open transaction.
    fn commit(&mut self) -> StoreResult<()>;

    /// Discards the open transaction.
    fn rollback(&mut self) -> StoreResult<()>;

    /// Runs `f` inside a transaction, committing on success and rolling
    /// back on error.
    fn with_transaction<T, E, F>(&mut self, f: F) -> Result<T, E>
    where
        Self: Sized,
        E: From<StoreError>,
        F: FnOnce(&mut Self) -> Result<T, E>,
    {
        self.begin()?;
        match f(self) {
            Ok(value) => {
                self.commit()?;
                Ok(value)
            }
            Err(e) => {
                if let Err(rollback_error) = self.rollback() {
                    tracing::error!("Rollback failed: {}", rollback_error);
                }
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_hash() {
        let hash = ContentHash::of("A11.284.180.290");
        assert_eq!(hash.as_str().len(), 32);
        assert_eq!(hash, ContentHash::of("A11.284.180.290"));
        assert_ne!(hash, ContentHash::of("A11.284.180"));
        assert_eq!(
            ContentHash::of("").as_str(),
            "d41d8cd98f00b204e9800998ecf8427e"
        );
    }

    #[test]
    fn test_link_policies() {
        assert_eq!(LinkKind::ConceptTerm.policy(), UpsertPolicy::DoUpdate);
        assert_eq!(
            LinkKind::DescriptorAllowableQualifier.policy(),
            UpsertPolicy::DoUpdate
        );
        assert_eq!(LinkKind::TermThesaurusId.policy(), UpsertPolicy::DoNothing);
        assert_eq!(
            LinkKind::SupplementalHeadingMappedTo.policy(),
            UpsertPolicy::DoNothing
        );
    }

    #[test]
    fn test_link_validation() {
        let bare = Link::new(LinkKind::QualifierTreeNumber, 1, Some(2));
        assert!(bare.validate().is_ok());

        let preferred = Link::new(LinkKind::QualifierConcept, 1, Some(2))
            .with_attrs(LinkAttrs::Preferred {
                is_preferred: Some(true),
            });
        assert!(preferred.validate().is_ok());

        let mismatched = Link::new(LinkKind::QualifierTreeNumber, 1, Some(2))
            .with_attrs(LinkAttrs::Abbreviation(Some("AA".to_string())));
        assert!(matches!(
            mismatched.validate(),
            Err(StoreError::Integrity(_))
        ));

        let missing = Link::new(LinkKind::ConceptTerm, 1, Some(2));
        assert!(missing.validate().is_err());
    }

    #[test]
    fn test_entity_from_ui_kind() {
        assert_eq!(Entity::from(UiKind::Concept), Entity::Concept);
        assert_eq!(Entity::from(UiKind::Supplemental).table(), "supplementals");
    }
}
