//! UMLS synonym and definition ingestion.

use mesh_types::{DefinitionMap, SourceDefinitions, SynonymMap, UiKind};
use tracing::{debug, info};

use crate::store::{Entity, MeshStore, Owner};
use crate::types::{IngestError, IngestResult, UmlsIngestStats};

/// Resolves the record that owns `ui`.
///
/// Fails on a UI prefix that names no record family.
fn resolve_owner<S: MeshStore>(store: &S, ui: &str) -> IngestResult<Option<Owner>> {
    let kind = UiKind::from_ui(ui).ok_or_else(|| IngestError::UnsupportedUiPrefix {
        ui: ui.to_string(),
    })?;
    let entity = Entity::from(kind);
    Ok(store
        .find_by_ui(entity, ui)?
        .map(|id| Owner { entity, id }))
}

/// Walks `entries` in UI order inside one transaction, calling `insert` for
/// every entry whose owner is stored.
fn ingest_entries<'m, S, V, F>(
    store: &mut S,
    entries: impl IntoIterator<Item = (&'m String, &'m V)>,
    mut insert: F,
) -> IngestResult<UmlsIngestStats>
where
    S: MeshStore,
    V: 'm,
    F: FnMut(&mut S, Owner, &V) -> IngestResult<usize>,
{
    let mut entries: Vec<_> = entries.into_iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));

    store.with_transaction(|store| -> IngestResult<UmlsIngestStats> {
        let mut stats = UmlsIngestStats::default();
        for (ui, value) in entries {
            let Some(owner) = resolve_owner(store, ui)? else {
                debug!("No stored record for {}", ui);
                stats.owners_missing += 1;
                continue;
            };
            stats.owners_matched += 1;
            stats.rows_inserted += insert(store, owner, value)?;
        }
        Ok(stats)
    })
}

/// Stores UMLS synonyms against the records they describe.
pub struct SynonymIngester<'s, S: MeshStore> {
    store: &'s mut S,
}

impl<'s, S: MeshStore> SynonymIngester<'s, S> {
    /// Creates an ingester writing to `store`.
    pub fn new(store: &'s mut S) -> Self {
        Self { store }
    }

    /// Adds every synonym list to its owning record.
    ///
    /// UIs with no stored record are counted and skipped. Synonyms already
    /// stored for a record are left alone, so repeated runs insert nothing.
    pub fn ingest(&mut self, synonyms: &SynonymMap) -> IngestResult<UmlsIngestStats> {
        debug!("Ingesting synonyms for {} UIs", synonyms.len());

        let stats = ingest_entries(self.store, synonyms, |store, owner, values: &Vec<String>| {
            Ok(store.insert_synonyms(owner, values)?)
        })?;

        info!(
            "Stored {} synonyms for {} records ({} UIs without a record)",
            stats.rows_inserted, stats.owners_matched, stats.owners_missing
        );
        Ok(stats)
    }
}

/// Stores UMLS definitions against the records they describe.
pub struct DefinitionIngester<'s, S: MeshStore> {
    store: &'s mut S,
}

impl<'s, S: MeshStore> DefinitionIngester<'s, S> {
    /// Creates an ingester writing to `store`.
    pub fn new(store: &'s mut S) -> Self {
        Self { store }
    }

    /// Adds every definition to its owning record, keeping the source each
    /// one came from.
    pub fn ingest(&mut self, definitions: &DefinitionMap) -> IngestResult<UmlsIngestStats> {
        debug!("Ingesting definitions for {} UIs", definitions.len());

        let stats = ingest_entries(
            self.store,
            definitions,
            |store, owner, by_source: &SourceDefinitions| {
                let mut inserted = 0;
                for (source, texts) in by_source.iter() {
                    inserted += store.insert_definitions(owner, source, texts)?;
                }
                Ok(inserted)
            },
        )?;

        info!(
            "Stored {} definitions for {} records ({} UIs without a record)",
            stats.rows_inserted, stats.owners_matched, stats.owners_missing
        );
        Ok(stats)
    }
}
