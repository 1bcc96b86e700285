//! In-memory [`MeshStore`] implementation.
//!
//! Backs the unit tests. Transactions snapshot every table on `begin` and
//! restore the snapshot on `rollback`, so each transaction costs a copy of
//! the whole store; use [`SqliteStore`](super::SqliteStore) for full releases.

use std::collections::{BTreeMap, HashMap, HashSet};

use super::{
    ConceptRelationRow, ConceptRow, ContentHash, DescriptorRow, Entity, EntryCombinationRow,
    Link, LinkAttrs, LinkKind, MeshStore, Owner, QualifierRow, RowId, SupplementalRow, TermRow,
    UpsertPolicy, ValueKind,
};
use crate::types::{StoreError, StoreResult};

/// Rows keyed by UI.
#[derive(Debug, Clone)]
struct RecordTable<R> {
    rows: BTreeMap<RowId, R>,
    by_ui: HashMap<String, RowId>,
}

impl<R> Default for RecordTable<R> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            by_ui: HashMap::new(),
        }
    }
}

impl<R> RecordTable<R> {
    fn upsert(&mut self, next_id: &mut RowId, ui: &str, row: R) -> RowId {
        if let Some(&id) = self.by_ui.get(ui) {
            self.rows.insert(id, row);
            return id;
        }
        *next_id += 1;
        let id = *next_id;
        self.by_ui.insert(ui.to_string(), id);
        self.rows.insert(id, row);
        id
    }
}

/// Values keyed by content hash.
#[derive(Debug, Clone, Default)]
struct ValueTable {
    rows: BTreeMap<RowId, String>,
    by_hash: HashMap<ContentHash, RowId>,
}

/// Rows keyed by a pair of nullable foreign keys.
#[derive(Debug, Clone)]
struct PairTable<R> {
    rows: BTreeMap<RowId, R>,
    by_pair: HashMap<(Option<RowId>, Option<RowId>), RowId>,
}

impl<R> Default for PairTable<R> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            by_pair: HashMap::new(),
        }
    }
}

impl<R> PairTable<R> {
    fn upsert(&mut self, next_id: &mut RowId, pair: (Option<RowId>, Option<RowId>), row: R) -> RowId {
        if let Some(&id) = self.by_pair.get(&pair) {
            self.rows.insert(id, row);
            return id;
        }
        *next_id += 1;
        let id = *next_id;
        self.by_pair.insert(pair, id);
        self.rows.insert(id, row);
        id
    }
}

/// A stored link row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRow {
    /// Surrogate key.
    pub id: RowId,
    /// Parent row.
    pub parent: RowId,
    /// Child row.
    pub child: Option<RowId>,
    /// Stored attributes.
    pub attrs: LinkAttrs,
}

/// A stored synonym or definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRow {
    /// Owning record.
    pub owner: Owner,
    /// Definition source, `None` for synonyms.
    pub source: Option<String>,
    /// Text.
    pub text: String,
}

#[derive(Debug, Clone, Default)]
struct Tables {
    next_id: RowId,
    descriptors: RecordTable<DescriptorRow>,
    qualifiers: RecordTable<QualifierRow>,
    supplementals: RecordTable<SupplementalRow>,
    concepts: RecordTable<ConceptRow>,
    terms: RecordTable<TermRow>,
    values: HashMap<ValueKind, ValueTable>,
    entry_combinations: PairTable<EntryCombinationRow>,
    concept_relations: PairTable<ConceptRelationRow>,
    links: HashMap<(LinkKind, RowId, Option<RowId>), LinkRow>,
    synonyms: Vec<TextRow>,
    synonym_keys: HashSet<(Owner, ContentHash)>,
    definitions: Vec<TextRow>,
    definition_keys: HashSet<(Owner, String, ContentHash)>,
}

/// In-memory store with snapshot transactions.
#[derive(Default)]
pub struct MemoryStore {
    tables: Tables,
    snapshot: Option<Tables>,
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("descriptors", &self.tables.descriptors.rows.len())
            .field("qualifiers", &self.tables.qualifiers.rows.len())
            .field("supplementals", &self.tables.supplementals.rows.len())
            .field("concepts", &self.tables.concepts.rows.len())
            .field("terms", &self.tables.terms.rows.len())
            .field("entry_combinations", &self.tables.entry_combinations.rows.len())
            .field("concept_relations", &self.tables.concept_relations.rows.len())
            .field("links", &self.tables.links.len())
            .field("synonyms", &self.tables.synonyms.len())
            .field("definitions", &self.tables.definitions.len())
            .field("in_transaction", &self.snapshot.is_some())
            .finish()
    }
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Queries
    // ═══════════════════════════════════════════════════════════════════════════

    /// Returns the number of rows in a record table.
    pub fn record_count(&self, entity: Entity) -> usize {
        match entity {
            Entity::Descriptor => self.tables.descriptors.rows.len(),
            Entity::Qualifier => self.tables.qualifiers.rows.len(),
            Entity::Supplemental => self.tables.supplementals.rows.len(),
            Entity::Concept => self.tables.concepts.rows.len(),
            Entity::Term => self.tables.terms.rows.len(),
        }
    }

    /// Returns the number of rows in a value table.
    pub fn value_count(&self, kind: ValueKind) -> usize {
        self.tables.values.get(&kind).map_or(0, |t| t.rows.len())
    }

    /// Returns the stored text of a value.
    pub fn value(&self, kind: ValueKind, id: RowId) -> Option<&str> {
        self.tables
            .values
            .get(&kind)
            .and_then(|t| t.rows.get(&id))
            .map(String::as_str)
    }

    /// Returns the number of rows in a join table.
    pub fn link_count(&self, kind: LinkKind) -> usize {
        self.tables.links.keys().filter(|(k, _, _)| *k == kind).count()
    }

    /// Returns the links of one kind leaving `parent`, in insertion order.
    pub fn links_from(&self, kind: LinkKind, parent: RowId) -> Vec<&LinkRow> {
        let mut links: Vec<&LinkRow> = self
            .tables
            .links
            .iter()
            .filter(|((k, p, _), _)| *k == kind && *p == parent)
            .map(|(_, row)| row)
            .collect();
        links.sort_by_key(|row| row.id);
        links
    }

    /// Returns a stored descriptor.
    pub fn descriptor(&self, id: RowId) -> Option<&DescriptorRow> {
        self.tables.descriptors.rows.get(&id)
    }

    /// Returns a stored qualifier.
    pub fn qualifier(&self, id: RowId) -> Option<&QualifierRow> {
        self.tables.qualifiers.rows.get(&id)
    }

    /// Returns a stored supplemental record.
    pub fn supplemental(&self, id: RowId) -> Option<&SupplementalRow> {
        self.tables.supplementals.rows.get(&id)
    }

    /// Returns a stored concept.
    pub fn concept(&self, id: RowId) -> Option<&ConceptRow> {
        self.tables.concepts.rows.get(&id)
    }

    /// Returns a stored term.
    pub fn term(&self, id: RowId) -> Option<&TermRow> {
        self.tables.terms.rows.get(&id)
    }

    /// Returns a stored entry combination.
    pub fn entry_combination(&self, id: RowId) -> Option<&EntryCombinationRow> {
        self.tables.entry_combinations.rows.get(&id)
    }

    /// Returns the number of stored entry combinations.
    pub fn entry_combination_count(&self) -> usize {
        self.tables.entry_combinations.rows.len()
    }

    /// Returns the stored concept relations.
    pub fn concept_relations(&self) -> impl Iterator<Item = &ConceptRelationRow> {
        self.tables.concept_relations.rows.values()
    }

    /// Returns the synonyms stored for an owner.
    pub fn synonyms(&self, owner: Owner) -> Vec<&str> {
        self.tables
            .synonyms
            .iter()
            .filter(|row| row.owner == owner)
            .map(|row| row.text.as_str())
            .collect()
    }

    /// Returns the definitions stored for an owner as `(source, text)`.
    pub fn definitions(&self, owner: Owner) -> Vec<(&str, &str)> {
        self.tables
            .definitions
            .iter()
            .filter(|row| row.owner == owner)
            .map(|row| (row.source.as_deref().unwrap_or(""), row.text.as_str()))
            .collect()
    }
}

impl MeshStore for MemoryStore {
    fn upsert_descriptor(&mut self, row: &DescriptorRow) -> StoreResult<RowId> {
        let t = &mut self.tables;
        Ok(t.descriptors.upsert(&mut t.next_id, &row.ui, row.clone()))
    }

    fn upsert_qualifier(&mut self, row: &QualifierRow) -> StoreResult<RowId> {
        let t = &mut self.tables;
        Ok(t.qualifiers.upsert(&mut t.next_id, &row.ui, row.clone()))
    }

    fn upsert_supplemental(&mut self, row: &SupplementalRow) -> StoreResult<RowId> {
        let t = &mut self.tables;
        Ok(t.supplementals.upsert(&mut t.next_id, &row.ui, row.clone()))
    }

    fn upsert_concept(&mut self, row: &ConceptRow) -> StoreResult<RowId> {
        let t = &mut self.tables;
        Ok(t.concepts.upsert(&mut t.next_id, &row.ui, row.clone()))
    }

    fn upsert_term(&mut self, row: &TermRow) -> StoreResult<RowId> {
        let t = &mut self.tables;
        Ok(t.terms.upsert(&mut t.next_id, &row.ui, row.clone()))
    }

    fn upsert_value(&mut self, kind: ValueKind, value: &str) -> StoreResult<RowId> {
        let t = &mut self.tables;
        let table = t.values.entry(kind).or_default();
        let hash = ContentHash::of(value);
        if let Some(&id) = table.by_hash.get(&hash) {
            return Ok(id);
        }
        t.next_id += 1;
        let id = t.next_id;
        table.by_hash.insert(hash, id);
        table.rows.insert(id, value.to_string());
        Ok(id)
    }

    fn upsert_entry_combination(&mut self, row: &EntryCombinationRow) -> StoreResult<RowId> {
        let t = &mut self.tables;
        let pair = (row.descriptor, row.qualifier);
        Ok(t.entry_combinations.upsert(&mut t.next_id, pair, row.clone()))
    }

    fn upsert_concept_relation(&mut self, row: &ConceptRelationRow) -> StoreResult<RowId> {
        let t = &mut self.tables;
        let pair = (row.concept, row.related);
        Ok(t.concept_relations.upsert(&mut t.next_id, pair, row.clone()))
    }

    fn upsert_link(&mut self, link: &Link) -> StoreResult<RowId> {
        link.validate()?;
        let t = &mut self.tables;
        let key = (link.kind, link.parent, link.child);

        if let Some(existing) = t.links.get_mut(&key) {
            if link.kind.policy() == UpsertPolicy::DoUpdate {
                existing.attrs = link.attrs.clone();
            }
            return Ok(existing.id);
        }

        t.next_id += 1;
        let id = t.next_id;
        t.links.insert(
            key,
            LinkRow {
                id,
                parent: link.parent,
                child: link.child,
                attrs: link.attrs.clone(),
            },
        );
        Ok(id)
    }

    fn find_by_ui(&self, entity: Entity, ui: &str) -> StoreResult<Option<RowId>> {
        let t = &self.tables;
        let index = match entity {
            Entity::Descriptor => &t.descriptors.by_ui,
            Entity::Qualifier => &t.qualifiers.by_ui,
            Entity::Supplemental => &t.supplementals.by_ui,
            Entity::Concept => &t.concepts.by_ui,
            Entity::Term => &t.terms.by_ui,
        };
        Ok(index.get(ui).copied())
    }

    fn find_by_hash(&self, kind: ValueKind, hash: &ContentHash) -> StoreResult<Option<RowId>> {
        Ok(self
            .tables
            .values
            .get(&kind)
            .and_then(|t| t.by_hash.get(hash))
            .copied())
    }

    fn insert_synonyms(&mut self, owner: Owner, synonyms: &[String]) -> StoreResult<usize> {
        let t = &mut self.tables;
        let mut inserted = 0;
        for synonym in synonyms {
            if t.synonym_keys.insert((owner, ContentHash::of(synonym))) {
                t.synonyms.push(TextRow {
                    owner,
                    source: None,
                    text: synonym.clone(),
                });
                inserted += 1;
            }
        }
        Ok(inserted)
    }

    fn insert_definitions(
        &mut self,
        owner: Owner,
        source: &str,
        definitions: &[String],
    ) -> StoreResult<usize> {
        let t = &mut self.tables;
        let mut inserted = 0;
        for definition in definitions {
            let key = (owner, source.to_string(), ContentHash::of(definition));
            if t.definition_keys.insert(key) {
                t.definitions.push(TextRow {
                    owner,
                    source: Some(source.to_string()),
                    text: definition.clone(),
                });
                inserted += 1;
            }
        }
        Ok(inserted)
    }

    fn begin(&mut self) -> StoreResult<()> {
        if self.snapshot.is_some() {
            return Err(StoreError::Integrity(
                "transaction already open".to_string(),
            ));
        }
        self.snapshot = Some(self.tables.clone());
        Ok(())
    }

    fn commit(&mut self) -> StoreResult<()> {
        self.snapshot.take().ok_or(StoreError::NoTransaction)?;
        Ok(())
    }

    fn rollback(&mut self) -> StoreResult<()> {
        self.tables = self.snapshot.take().ok_or(StoreError::NoTransaction)?;
        Ok(())
    }
}
