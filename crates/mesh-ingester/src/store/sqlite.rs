//! SQLite [`MeshStore`] implementation.
//!
//! Record and value tables rely on `INSERT ... ON CONFLICT` for their
//! upserts. Links and pairings may carry a NULL key when a reference did not
//! resolve, and SQLite treats NULLs as distinct in unique constraints, so
//! those rows are matched with `IS` before inserting.

use std::path::Path;

use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Params};

use super::{
    ConceptRelationRow, ConceptRow, ContentHash, DescriptorRow, Entity, EntryCombinationRow,
    Link, LinkAttrs, LinkKind, MeshStore, Owner, QualifierRow, RowId, SupplementalRow, TermRow,
    UpsertPolicy, ValueKind,
};
use crate::types::{StoreError, StoreResult};

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS descriptors (
      id INTEGER PRIMARY KEY,
      ui TEXT NOT NULL UNIQUE,
      class TEXT,
      name TEXT,
      created DATE,
      revised DATE,
      established DATE,
      annotation TEXT,
      history_note TEXT,
      nlm_classification_number TEXT,
      online_note TEXT,
      public_mesh_note TEXT,
      consider_also TEXT
    );

    CREATE TABLE IF NOT EXISTS qualifiers (
      id INTEGER PRIMARY KEY,
      ui TEXT NOT NULL UNIQUE,
      name TEXT,
      created DATE,
      revised DATE,
      established DATE,
      annotation TEXT,
      history_note TEXT,
      online_note TEXT
    );

    CREATE TABLE IF NOT EXISTS supplementals (
      id INTEGER PRIMARY KEY,
      ui TEXT NOT NULL UNIQUE,
      class TEXT,
      name TEXT,
      created DATE,
      revised DATE,
      note TEXT,
      frequency TEXT
    );

    CREATE TABLE IF NOT EXISTS concepts (
      id INTEGER PRIMARY KEY,
      ui TEXT NOT NULL UNIQUE,
      name TEXT,
      casn1_name TEXT,
      registry_number TEXT,
      scope_note TEXT,
      translators_english_scope_note TEXT,
      translators_scope_note TEXT
    );

    CREATE TABLE IF NOT EXISTS terms (
      id INTEGER PRIMARY KEY,
      ui TEXT NOT NULL UNIQUE,
      name TEXT,
      created DATE,
      abbreviation TEXT,
      sort_version TEXT,
      entry_version TEXT,
      note TEXT
    );

    CREATE TABLE IF NOT EXISTS tree_numbers (
      id INTEGER PRIMARY KEY,
      tree_number TEXT NOT NULL,
      md5 TEXT NOT NULL UNIQUE
    );

    CREATE TABLE IF NOT EXISTS thesaurus_ids (
      id INTEGER PRIMARY KEY,
      thesaurus_id TEXT NOT NULL,
      md5 TEXT NOT NULL UNIQUE
    );

    CREATE TABLE IF NOT EXISTS previous_indexings (
      id INTEGER PRIMARY KEY,
      previous_indexing TEXT NOT NULL,
      md5 TEXT NOT NULL UNIQUE
    );

    CREATE TABLE IF NOT EXISTS sources (
      id INTEGER PRIMARY KEY,
      source TEXT NOT NULL,
      md5 TEXT NOT NULL UNIQUE
    );

    CREATE TABLE IF NOT EXISTS entry_combinations (
      id INTEGER PRIMARY KEY,
      descriptor_id INTEGER,
      qualifier_id INTEGER,
      type TEXT
    );
    CREATE INDEX IF NOT EXISTS idx_entry_combinations_pair
      ON entry_combinations(descriptor_id, qualifier_id);

    CREATE TABLE IF NOT EXISTS concept_related_concepts (
      id INTEGER PRIMARY KEY,
      concept_id INTEGER,
      related_concept_id INTEGER,
      relation_name TEXT
    );
    CREATE INDEX IF NOT EXISTS idx_concept_related_concepts_pair
      ON concept_related_concepts(concept_id, related_concept_id);
";

/// Layout of a join table.
struct LinkTable {
    table: &'static str,
    parent: &'static str,
    child: &'static str,
    /// Attribute columns with their SQL types.
    attributes: &'static [(&'static str, &'static str)],
}

const BARE: &[(&str, &str)] = &[];
const PREFERRED: &[(&str, &str)] = &[("is_preferred", "BOOLEAN")];
const ABBREVIATION: &[(&str, &str)] = &[("abbreviation", "TEXT")];
const CONCEPT_TERM: &[(&str, &str)] = &[
    ("is_concept_preferred_term", "BOOLEAN"),
    ("is_permuted_term", "BOOLEAN"),
    ("lexical_tag", "TEXT"),
    ("is_record_preferred_term", "BOOLEAN"),
];

fn link_table(kind: LinkKind) -> LinkTable {
    let (table, parent, child, attributes) = match kind {
        LinkKind::TermThesaurusId => ("term_thesaurus_ids", "term_id", "thesaurus_id_id", BARE),
        LinkKind::ConceptTerm => ("concept_terms", "concept_id", "term_id", CONCEPT_TERM),
        LinkKind::QualifierTreeNumber => {
            ("qualifier_tree_numbers", "qualifier_id", "tree_number_id", BARE)
        }
        LinkKind::QualifierConcept => ("qualifier_concepts", "qualifier_id", "concept_id", PREFERRED),
        LinkKind::DescriptorTreeNumber => {
            ("descriptor_tree_numbers", "descriptor_id", "tree_number_id", BARE)
        }
        LinkKind::DescriptorConcept => {
            ("descriptor_concepts", "descriptor_id", "concept_id", PREFERRED)
        }
        LinkKind::DescriptorPreviousIndexing => (
            "descriptor_previous_indexings",
            "descriptor_id",
            "previous_indexing_id",
            BARE,
        ),
        LinkKind::DescriptorAllowableQualifier => (
            "descriptor_allowable_qualifiers",
            "descriptor_id",
            "qualifier_id",
            ABBREVIATION,
        ),
        LinkKind::DescriptorEntryCombination => (
            "descriptor_entry_combinations",
            "descriptor_id",
            "entry_combination_id",
            BARE,
        ),
        LinkKind::DescriptorPharmacologicalAction => (
            "descriptor_pharmacological_action_descriptors",
            "descriptor_id",
            "pharmacological_action_descriptor_id",
            BARE,
        ),
        LinkKind::DescriptorRelatedDescriptor => (
            "descriptor_related_descriptors",
            "descriptor_id",
            "related_descriptor_id",
            BARE,
        ),
        LinkKind::SupplementalConcept => {
            ("supplemental_concepts", "supplemental_id", "concept_id", PREFERRED)
        }
        LinkKind::SupplementalPreviousIndexing => (
            "supplemental_previous_indexings",
            "supplemental_id",
            "previous_indexing_id",
            BARE,
        ),
        LinkKind::SupplementalHeadingMappedTo => (
            "supplemental_heading_mapped_tos",
            "supplemental_id",
            "entry_combination_id",
            BARE,
        ),
        LinkKind::SupplementalIndexingInformation => (
            "supplemental_indexing_informations",
            "supplemental_id",
            "entry_combination_id",
            BARE,
        ),
        LinkKind::SupplementalPharmacologicalAction => (
            "supplemental_pharmacological_action_descriptors",
            "supplemental_id",
            "pharmacological_action_descriptor_id",
            BARE,
        ),
        LinkKind::SupplementalSource => ("supplemental_sources", "supplemental_id", "source_id", BARE),
    };
    LinkTable {
        table,
        parent,
        child,
        attributes,
    }
}

fn link_values(attrs: &LinkAttrs) -> Vec<Value> {
    match attrs {
        LinkAttrs::None => Vec::new(),
        LinkAttrs::Preferred { is_preferred } => vec![Value::from(*is_preferred)],
        LinkAttrs::Abbreviation(abbreviation) => vec![Value::from(abbreviation.clone())],
        LinkAttrs::ConceptTerm {
            is_concept_preferred_term,
            is_permuted_term,
            lexical_tag,
            is_record_preferred_term,
        } => vec![
            Value::from(*is_concept_preferred_term),
            Value::from(*is_permuted_term),
            Value::from(lexical_tag.map(|tag| tag.to_code().to_string())),
            Value::from(*is_record_preferred_term),
        ],
    }
}

/// Synonym table, definition table and owner column for a record table.
fn text_tables(entity: Entity) -> StoreResult<(&'static str, &'static str, &'static str)> {
    match entity {
        Entity::Descriptor => Ok(("descriptor_synonyms", "descriptor_definitions", "descriptor_id")),
        Entity::Qualifier => Ok(("qualifier_synonyms", "qualifier_definitions", "qualifier_id")),
        Entity::Supplemental => Ok((
            "supplemental_synonyms",
            "supplemental_definitions",
            "supplemental_id",
        )),
        Entity::Concept => Ok(("concept_synonyms", "concept_definitions", "concept_id")),
        Entity::Term => Err(StoreError::Integrity(
            "terms carry no synonyms or definitions".to_string(),
        )),
    }
}

/// Runs a lookup that must match at most one row.
fn lookup_unique<P: Params>(
    connection: &Connection,
    table: &str,
    key: &str,
    sql: &str,
    params: P,
) -> StoreResult<Option<RowId>> {
    let mut statement = connection.prepare_cached(sql)?;
    let ids = statement
        .query_map(params, |row| row.get::<_, RowId>(0))?
        .take(2)
        .collect::<Result<Vec<_>, _>>()?;

    match ids.as_slice() {
        [] => Ok(None),
        [id] => Ok(Some(*id)),
        _ => Err(StoreError::MultipleRowsFound {
            table: table.to_string(),
            key: key.to_string(),
        }),
    }
}

/// SQLite-backed store.
pub struct SqliteStore {
    connection: Connection,
    in_transaction: bool,
}

impl std::fmt::Debug for SqliteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStore")
            .field("path", &self.connection.path())
            .field("in_transaction", &self.in_transaction)
            .finish()
    }
}

impl SqliteStore {
    /// Opens (or creates) a database file and ensures the schema exists.
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let path = path.as_ref();
        tracing::info!("Opening SQLite database at {}", path.display());
        let connection = Connection::open(path)?;
        connection.pragma_update(None, "journal_mode", "WAL")?;
        connection.pragma_update(None, "synchronous", "NORMAL")?;
        Self::new(connection)
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::new(Connection::open_in_memory()?)
    }

    /// Wraps an open connection and ensures the schema exists.
    pub fn new(connection: Connection) -> StoreResult<Self> {
        ensure_schema(&connection)?;
        Ok(Self {
            connection,
            in_transaction: false,
        })
    }

    /// Returns the underlying connection.
    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    /// Returns the number of rows in a table.
    pub fn row_count(&self, table: &str) -> StoreResult<i64> {
        let sql = format!("SELECT COUNT(*) FROM {}", table);
        Ok(self.connection.query_row(&sql, [], |row| row.get(0))?)
    }

    /// Returns the table name backing a link kind.
    pub fn link_table_name(kind: LinkKind) -> &'static str {
        link_table(kind).table
    }
}

fn ensure_schema(connection: &Connection) -> StoreResult<()> {
    connection.execute_batch(SCHEMA)?;

    for kind in LinkKind::ALL {
        let layout = link_table(kind);
        let mut columns = format!(
            "id INTEGER PRIMARY KEY, {} INTEGER NOT NULL, {} INTEGER",
            layout.parent, layout.child
        );
        for (name, sql_type) in layout.attributes {
            columns.push_str(&format!(", {} {}", name, sql_type));
        }
        connection.execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS {table} ({columns});
             CREATE INDEX IF NOT EXISTS idx_{table}_pair ON {table}({parent}, {child});",
            table = layout.table,
            columns = columns,
            parent = layout.parent,
            child = layout.child,
        ))?;
    }

    for entity in [
        Entity::Descriptor,
        Entity::Qualifier,
        Entity::Supplemental,
        Entity::Concept,
    ] {
        let (synonyms, definitions, owner) = text_tables(entity)?;
        connection.execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS {synonyms} (
               id INTEGER PRIMARY KEY,
               {owner} INTEGER NOT NULL,
               synonym TEXT NOT NULL,
               md5 TEXT NOT NULL,
               UNIQUE({owner}, md5)
             );
             CREATE TABLE IF NOT EXISTS {definitions} (
               id INTEGER PRIMARY KEY,
               {owner} INTEGER NOT NULL,
               source TEXT NOT NULL,
               definition TEXT NOT NULL,
               md5 TEXT NOT NULL,
               UNIQUE({owner}, source, md5)
             );",
        ))?;
    }

    Ok(())
}

impl MeshStore for SqliteStore {
    fn upsert_descriptor(&mut self, row: &DescriptorRow) -> StoreResult<RowId> {
        let id = self.connection.query_row(
            "
            INSERT INTO descriptors(
              ui, class, name, created, revised, established, annotation, history_note,
              nlm_classification_number, online_note, public_mesh_note, consider_also
            )
            VALUES(?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            ON CONFLICT(ui) DO UPDATE SET
              class=excluded.class,
              name=excluded.name,
              created=excluded.created,
              revised=excluded.revised,
              established=excluded.established,
              annotation=excluded.annotation,
              history_note=excluded.history_note,
              nlm_classification_number=excluded.nlm_classification_number,
              online_note=excluded.online_note,
              public_mesh_note=excluded.public_mesh_note,
              consider_also=excluded.consider_also
            RETURNING id
            ",
            params![
                row.ui,
                row.descriptor_class.map(|c| c.to_code()),
                row.name,
                row.created,
                row.revised,
                row.established,
                row.annotation,
                row.history_note,
                row.nlm_classification_number,
                row.online_note,
                row.public_mesh_note,
                row.consider_also,
            ],
            |r| r.get(0),
        )?;
        Ok(id)
    }

    fn upsert_qualifier(&mut self, row: &QualifierRow) -> StoreResult<RowId> {
        let id = self.connection.query_row(
            "
            INSERT INTO qualifiers(
              ui, name, created, revised, established, annotation, history_note, online_note
            )
            VALUES(?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            ON CONFLICT(ui) DO UPDATE SET
              name=excluded.name,
              created=excluded.created,
              revised=excluded.revised,
              established=excluded.established,
              annotation=excluded.annotation,
              history_note=excluded.history_note,
              online_note=excluded.online_note
            RETURNING id
            ",
            params![
                row.ui,
                row.name,
                row.created,
                row.revised,
                row.established,
                row.annotation,
                row.history_note,
                row.online_note,
            ],
            |r| r.get(0),
        )?;
        Ok(id)
    }

    fn upsert_supplemental(&mut self, row: &SupplementalRow) -> StoreResult<RowId> {
        let id = self.connection.query_row(
            "
            INSERT INTO supplementals(ui, class, name, created, revised, note, frequency)
            VALUES(?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ON CONFLICT(ui) DO UPDATE SET
              class=excluded.class,
              name=excluded.name,
              created=excluded.created,
              revised=excluded.revised,
              note=excluded.note,
              frequency=excluded.frequency
            RETURNING id
            ",
            params![
                row.ui,
                row.supplemental_class.map(|c| c.to_code()),
                row.name,
                row.created,
                row.revised,
                row.note,
                row.frequency,
            ],
            |r| r.get(0),
        )?;
        Ok(id)
    }

    fn upsert_concept(&mut self, row: &ConceptRow) -> StoreResult<RowId> {
        let id = self.connection.query_row(
            "
            INSERT INTO concepts(
              ui, name, casn1_name, registry_number, scope_note,
              translators_english_scope_note, translators_scope_note
            )
            VALUES(?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ON CONFLICT(ui) DO UPDATE SET
              name=excluded.name,
              casn1_name=excluded.casn1_name,
              registry_number=excluded.registry_number,
              scope_note=excluded.scope_note,
              translators_english_scope_note=excluded.translators_english_scope_note,
              translators_scope_note=excluded.translators_scope_note
            RETURNING id
            ",
            params![
                row.ui,
                row.name,
                row.casn1_name,
                row.registry_number,
                row.scope_note,
                row.translators_english_scope_note,
                row.translators_scope_note,
            ],
            |r| r.get(0),
        )?;
        Ok(id)
    }

    fn upsert_term(&mut self, row: &TermRow) -> StoreResult<RowId> {
        let id = self.connection.query_row(
            "
            INSERT INTO terms(
              ui, name, created, abbreviation, sort_version, entry_version, note
            )
            VALUES(?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ON CONFLICT(ui) DO UPDATE SET
              name=excluded.name,
              created=excluded.created,
              abbreviation=excluded.abbreviation,
              sort_version=excluded.sort_version,
              entry_version=excluded.entry_version,
              note=excluded.note
            RETURNING id
            ",
            params![
                row.ui,
                row.name,
                row.created,
                row.abbreviation,
                row.sort_version,
                row.entry_version,
                row.note,
            ],
            |r| r.get(0),
        )?;
        Ok(id)
    }

    fn upsert_value(&mut self, kind: ValueKind, value: &str) -> StoreResult<RowId> {
        let hash = ContentHash::of(value);
        let sql = format!(
            "INSERT INTO {}({}, md5) VALUES(?1, ?2) ON CONFLICT(md5) DO NOTHING RETURNING id",
            kind.table(),
            kind.column()
        );
        let inserted = self
            .connection
            .query_row(&sql, params![value, hash.as_str()], |r| r.get(0))
            .optional()?;

        match inserted {
            Some(id) => Ok(id),
            // Conflicting insert returns no row
            None => self.find_by_hash(kind, &hash)?.ok_or_else(|| {
                StoreError::Integrity(format!("{} row for {} vanished", kind.table(), hash))
            }),
        }
    }

    fn upsert_entry_combination(&mut self, row: &EntryCombinationRow) -> StoreResult<RowId> {
        let combination_type = row.combination_type.map(|t| t.to_code());
        let existing = lookup_unique(
            &self.connection,
            "entry_combinations",
            &format!("({:?}, {:?})", row.descriptor, row.qualifier),
            "SELECT id FROM entry_combinations WHERE descriptor_id IS ?1 AND qualifier_id IS ?2",
            params![row.descriptor, row.qualifier],
        )?;

        if let Some(id) = existing {
            self.connection.execute(
                "UPDATE entry_combinations SET type = ?1 WHERE id = ?2",
                params![combination_type, id],
            )?;
            return Ok(id);
        }

        self.connection.execute(
            "INSERT INTO entry_combinations(descriptor_id, qualifier_id, type) VALUES(?1, ?2, ?3)",
            params![row.descriptor, row.qualifier, combination_type],
        )?;
        Ok(self.connection.last_insert_rowid())
    }

    fn upsert_concept_relation(&mut self, row: &ConceptRelationRow) -> StoreResult<RowId> {
        let relation_name = row.relation_name.map(|n| n.to_code());
        let existing = lookup_unique(
            &self.connection,
            "concept_related_concepts",
            &format!("({:?}, {:?})", row.concept, row.related),
            "SELECT id FROM concept_related_concepts
             WHERE concept_id IS ?1 AND related_concept_id IS ?2",
            params![row.concept, row.related],
        )?;

        if let Some(id) = existing {
            self.connection.execute(
                "UPDATE concept_related_concepts SET relation_name = ?1 WHERE id = ?2",
                params![relation_name, id],
            )?;
            return Ok(id);
        }

        self.connection.execute(
            "INSERT INTO concept_related_concepts(concept_id, related_concept_id, relation_name)
             VALUES(?1, ?2, ?3)",
            params![row.concept, row.related, relation_name],
        )?;
        Ok(self.connection.last_insert_rowid())
    }

    fn upsert_link(&mut self, link: &Link) -> StoreResult<RowId> {
        link.validate()?;
        let layout = link_table(link.kind);
        let values = link_values(&link.attrs);

        let existing = lookup_unique(
            &self.connection,
            layout.table,
            &format!("({}, {:?})", link.parent, link.child),
            &format!(
                "SELECT id FROM {} WHERE {} = ?1 AND {} IS ?2",
                layout.table, layout.parent, layout.child
            ),
            params![link.parent, link.child],
        )?;

        if let Some(id) = existing {
            if link.kind.policy() == UpsertPolicy::DoUpdate && !layout.attributes.is_empty() {
                let assignments = layout
                    .attributes
                    .iter()
                    .enumerate()
                    .map(|(i, (name, _))| format!("{} = ?{}", name, i + 1))
                    .collect::<Vec<_>>()
                    .join(", ");
                let sql = format!(
                    "UPDATE {} SET {} WHERE id = ?{}",
                    layout.table,
                    assignments,
                    values.len() + 1
                );
                let mut update_params = values;
                update_params.push(Value::Integer(id));
                self.connection
                    .execute(&sql, params_from_iter(update_params))?;
            }
            return Ok(id);
        }

        let mut columns = vec![layout.parent, layout.child];
        columns.extend(layout.attributes.iter().map(|(name, _)| *name));
        let placeholders = (1..=columns.len())
            .map(|i| format!("?{}", i))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "INSERT INTO {}({}) VALUES({})",
            layout.table,
            columns.join(", "),
            placeholders
        );

        let mut insert_params = vec![Value::Integer(link.parent), Value::from(link.child)];
        insert_params.extend(values);
        self.connection
            .execute(&sql, params_from_iter(insert_params))?;
        Ok(self.connection.last_insert_rowid())
    }

    fn find_by_ui(&self, entity: Entity, ui: &str) -> StoreResult<Option<RowId>> {
        lookup_unique(
            &self.connection,
            entity.table(),
            ui,
            &format!("SELECT id FROM {} WHERE ui = ?1", entity.table()),
            [ui],
        )
    }

    fn find_by_hash(&self, kind: ValueKind, hash: &ContentHash) -> StoreResult<Option<RowId>> {
        lookup_unique(
            &self.connection,
            kind.table(),
            hash.as_str(),
            &format!("SELECT id FROM {} WHERE md5 = ?1", kind.table()),
            [hash.as_str()],
        )
    }

    fn insert_synonyms(&mut self, owner: Owner, synonyms: &[String]) -> StoreResult<usize> {
        let (table, _, column) = text_tables(owner.entity)?;
        let mut statement = self.connection.prepare_cached(&format!(
            "INSERT INTO {}({}, synonym, md5) VALUES(?1, ?2, ?3) ON CONFLICT DO NOTHING",
            table, column
        ))?;

        let mut inserted = 0;
        for synonym in synonyms {
            let hash = ContentHash::of(synonym);
            inserted += statement.execute(params![owner.id, synonym, hash.as_str()])?;
        }
        Ok(inserted)
    }

    fn insert_definitions(
        &mut self,
        owner: Owner,
        source: &str,
        definitions: &[String],
    ) -> StoreResult<usize> {
        let (_, table, column) = text_tables(owner.entity)?;
        let mut statement = self.connection.prepare_cached(&format!(
            "INSERT INTO {}({}, source, definition, md5) VALUES(?1, ?2, ?3, ?4)
             ON CONFLICT DO NOTHING",
            table, column
        ))?;

        let mut inserted = 0;
        for definition in definitions {
            let hash = ContentHash::of(definition);
            inserted += statement.execute(params![owner.id, source, definition, hash.as_str()])?;
        }
        Ok(inserted)
    }

    fn begin(&mut self) -> StoreResult<()> {
        if self.in_transaction {
            return Err(StoreError::Integrity(
                "transaction already open".to_string(),
            ));
        }
        self.connection.execute_batch("BEGIN")?;
        self.in_transaction = true;
        Ok(())
    }

    fn commit(&mut self) -> StoreResult<()> {
        if !self.in_transaction {
            return Err(StoreError::NoTransaction);
        }
        self.connection.execute_batch("COMMIT")?;
        self.in_transaction = false;
        Ok(())
    }

    fn rollback(&mut self) -> StoreResult<()> {
        if !self.in_transaction {
            return Err(StoreError::NoTransaction);
        }
        self.in_transaction = false;
        self.connection.execute_batch("ROLLBACK")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use mesh_types::{DescriptorClass, EntryCombinationType, LexicalTag};

    fn make_store() -> SqliteStore {
        SqliteStore::open_in_memory().unwrap()
    }

    fn make_descriptor(name: &str) -> DescriptorRow {
        DescriptorRow {
            ui: "D000001".to_string(),
            descriptor_class: Some(DescriptorClass::Topical),
            name: Some(name.to_string()),
            created: NaiveDate::from_ymd_opt(1974, 11, 19),
            ..Default::default()
        }
    }

    #[test]
    fn test_schema_is_reentrant() {
        let store = make_store();
        ensure_schema(store.connection()).unwrap();
        assert_eq!(store.row_count("descriptors").unwrap(), 0);
        assert_eq!(
            store
                .row_count(SqliteStore::link_table_name(LinkKind::ConceptTerm))
                .unwrap(),
            0
        );
    }

    #[test]
    fn test_record_upsert_returns_same_key() {
        let mut store = make_store();
        let first = store.upsert_descriptor(&make_descriptor("Calcimycin")).unwrap();
        let second = store.upsert_descriptor(&make_descriptor("Calcimycin A")).unwrap();

        assert_eq!(first, second);
        assert_eq!(store.row_count("descriptors").unwrap(), 1);

        let (name, class, created): (String, String, NaiveDate) = store
            .connection()
            .query_row(
                "SELECT name, class, created FROM descriptors WHERE id = ?1",
                [first],
                |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
            )
            .unwrap();
        assert_eq!(name, "Calcimycin A");
        assert_eq!(class, "1");
        assert_eq!(created, NaiveDate::from_ymd_opt(1974, 11, 19).unwrap());
    }

    #[test]
    fn test_value_upsert_falls_back_to_lookup() {
        let mut store = make_store();
        let first = store.upsert_value(ValueKind::TreeNumber, "D03.633.100.221.173").unwrap();
        let second = store.upsert_value(ValueKind::TreeNumber, "D03.633.100.221.173").unwrap();

        assert_eq!(first, second);
        assert_eq!(store.row_count("tree_numbers").unwrap(), 1);
        assert_eq!(
            store
                .find_by_hash(ValueKind::TreeNumber, &ContentHash::of("D03.633.100.221.173"))
                .unwrap(),
            Some(first)
        );
    }

    #[test]
    fn test_entry_combination_with_null_qualifier() {
        let mut store = make_store();
        let row = EntryCombinationRow {
            descriptor: Some(1),
            qualifier: None,
            combination_type: Some(EntryCombinationType::In),
        };
        let first = store.upsert_entry_combination(&row).unwrap();
        let second = store
            .upsert_entry_combination(&EntryCombinationRow {
                combination_type: Some(EntryCombinationType::Out),
                ..row
            })
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(store.row_count("entry_combinations").unwrap(), 1);

        let (qualifier, kind): (Option<i64>, String) = store
            .connection()
            .query_row(
                "SELECT qualifier_id, type FROM entry_combinations WHERE id = ?1",
                [first],
                |r| Ok((r.get(0)?, r.get(1)?)),
            )
            .unwrap();
        assert_eq!(qualifier, None);
        assert_eq!(kind, "ECOUT");
    }

    #[test]
    fn test_link_upserts() {
        let mut store = make_store();
        let attrs = |tag| LinkAttrs::ConceptTerm {
            is_concept_preferred_term: Some(true),
            is_permuted_term: Some(false),
            lexical_tag: Some(tag),
            is_record_preferred_term: Some(true),
        };

        let first = store
            .upsert_link(&Link::new(LinkKind::ConceptTerm, 1, Some(2)).with_attrs(attrs(LexicalTag::None)))
            .unwrap();
        let second = store
            .upsert_link(&Link::new(LinkKind::ConceptTerm, 1, Some(2)).with_attrs(attrs(LexicalTag::TradeName)))
            .unwrap();
        assert_eq!(first, second);

        let tag: String = store
            .connection()
            .query_row("SELECT lexical_tag FROM concept_terms WHERE id = ?1", [first], |r| r.get(0))
            .unwrap();
        assert_eq!(tag, "TRD");

        let dangling = Link::new(LinkKind::DescriptorPharmacologicalAction, 1, None);
        assert_eq!(
            store.upsert_link(&dangling).unwrap(),
            store.upsert_link(&dangling).unwrap()
        );
        assert_eq!(
            store
                .row_count("descriptor_pharmacological_action_descriptors")
                .unwrap(),
            1
        );
    }

    #[test]
    fn test_lookup_with_duplicate_rows_fails() {
        let store = make_store();
        store
            .connection()
            .execute_batch(
                "CREATE TABLE legacy_terms (id INTEGER PRIMARY KEY, ui TEXT);
                 INSERT INTO legacy_terms(ui) VALUES('T000001'), ('T000001');",
            )
            .unwrap();

        let result = lookup_unique(
            store.connection(),
            "legacy_terms",
            "T000001",
            "SELECT id FROM legacy_terms WHERE ui = ?1",
            ["T000001"],
        );
        assert!(matches!(result, Err(StoreError::MultipleRowsFound { .. })));
    }

    #[test]
    fn test_text_rows() {
        let mut store = make_store();
        let owner = Owner {
            entity: Entity::Concept,
            id: 7,
        };
        let synonyms = vec!["brain tumors".to_string(), "neoplasm, brain".to_string()];

        assert_eq!(store.insert_synonyms(owner, &synonyms).unwrap(), 2);
        assert_eq!(store.insert_synonyms(owner, &synonyms).unwrap(), 0);
        assert_eq!(store.row_count("concept_synonyms").unwrap(), 2);

        let definitions = vec!["An abnormal intracranial solid mass or growth.".to_string()];
        assert_eq!(store.insert_definitions(owner, "NCI_NICHD", &definitions).unwrap(), 1);
        assert_eq!(store.insert_definitions(owner, "NCI", &definitions).unwrap(), 1);
        assert_eq!(store.row_count("concept_definitions").unwrap(), 2);

        let term = Owner {
            entity: Entity::Term,
            id: 1,
        };
        assert!(store.insert_synonyms(term, &synonyms).is_err());
    }

    #[test]
    fn test_rollback_discards_writes() {
        let mut store = make_store();
        let result = store.with_transaction(|store| -> StoreResult<()> {
            store.upsert_descriptor(&make_descriptor("Calcimycin"))?;
            Err(StoreError::Integrity("abort".to_string()))
        });

        assert!(result.is_err());
        assert_eq!(store.row_count("descriptors").unwrap(), 0);
        assert_eq!(store.find_by_ui(Entity::Descriptor, "D000001").unwrap(), None);
    }

    #[test]
    fn test_open_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mesh.db");

        {
            let mut store = SqliteStore::open(&path).unwrap();
            store.upsert_descriptor(&make_descriptor("Calcimycin")).unwrap();
        }

        let store = SqliteStore::open(&path).unwrap();
        assert!(store.find_by_ui(Entity::Descriptor, "D000001").unwrap().is_some());
    }
}
