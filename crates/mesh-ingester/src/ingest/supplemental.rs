//! Supplemental concept record ingestion.

use mesh_types::SupplementalRecord;
use tracing::debug;

use super::{ingest_concepts, ingest_heading_pair, ingest_values, resolve_descriptor, RecordIngester};
use crate::store::{Link, LinkKind, MeshStore, RowId, SupplementalRow, ValueKind};
use crate::types::{IngestError, IngestOptions, IngestResult};

/// Stores `<SupplementalRecord>` documents.
pub struct SupplementalIngester<'s, S: MeshStore> {
    store: &'s mut S,
    options: IngestOptions,
}

impl<'s, S: MeshStore> SupplementalIngester<'s, S> {
    /// Creates an ingester writing to `store`.
    pub fn new(store: &'s mut S, options: IngestOptions) -> Self {
        Self { store, options }
    }

    /// Stores a supplemental record and everything nested in it in one
    /// transaction.
    ///
    /// Headings mapped to and indexing information become entry combinations
    /// without a combination type.
    pub fn ingest(&mut self, record: &SupplementalRecord) -> IngestResult<Option<RowId>> {
        debug!("Ingesting supplemental record {:?}", record.ui);

        if record.is_empty() {
            return Ok(None);
        }
        let ui = record.ui.as_deref().ok_or(IngestError::MissingUi {
            record: "SupplementalRecord",
        })?;

        let options = self.options;
        self.store.with_transaction(|store| -> IngestResult<Option<RowId>> {
            let supplemental_id = store.upsert_supplemental(&SupplementalRow {
                ui: ui.to_string(),
                supplemental_class: record.supplemental_class,
                name: record.name.clone(),
                created: record.date_created,
                revised: record.date_revised,
                note: record.note.clone(),
                frequency: record.frequency.clone(),
            })?;

            ingest_values(
                store,
                ValueKind::PreviousIndexing,
                LinkKind::SupplementalPreviousIndexing,
                supplemental_id,
                &record.previous_indexings,
            )?;

            if options.ingest_links {
                let pairs = record
                    .headings_mapped_to
                    .iter()
                    .map(|pair| (pair, LinkKind::SupplementalHeadingMappedTo))
                    .chain(
                        record
                            .indexing_information
                            .iter()
                            .map(|pair| (pair, LinkKind::SupplementalIndexingInformation)),
                    );
                for (pair, kind) in pairs {
                    let id = ingest_heading_pair(store, pair, None)?;
                    store.upsert_link(&Link::new(kind, supplemental_id, Some(id)))?;
                }

                for action in &record.pharmacological_actions {
                    let action_id = resolve_descriptor(store, action)?;
                    store.upsert_link(&Link::new(
                        LinkKind::SupplementalPharmacologicalAction,
                        supplemental_id,
                        action_id,
                    ))?;
                }
            }

            ingest_values(
                store,
                ValueKind::Source,
                LinkKind::SupplementalSource,
                supplemental_id,
                &record.sources,
            )?;

            ingest_concepts(
                store,
                LinkKind::SupplementalConcept,
                supplemental_id,
                &record.concepts,
                options,
            )?;

            Ok(Some(supplemental_id))
        })
    }
}

impl<S: MeshStore> RecordIngester for SupplementalIngester<'_, S> {
    type Record = SupplementalRecord;

    fn ingest(&mut self, record: &SupplementalRecord) -> IngestResult<Option<RowId>> {
        SupplementalIngester::ingest(self, record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mesh_loader::MeshParser;
    use mesh_types::{SupplementalClass, UiKind};

    use crate::store::{DescriptorRow, Entity, MemoryStore};

    const SAMPLE: &str = include_str!("../../../../testdata/supp_sample.xml");

    fn make_record() -> SupplementalRecord {
        MeshParser::<_, SupplementalRecord>::from_reader(SAMPLE.as_bytes())
            .next()
            .unwrap()
            .unwrap()
    }

    fn make_descriptor(store: &mut MemoryStore, ui: &str) -> RowId {
        store
            .upsert_descriptor(&DescriptorRow {
                ui: ui.to_string(),
                ..Default::default()
            })
            .unwrap()
    }

    #[test]
    fn test_ingest_root_and_values() {
        let mut store = MemoryStore::new();
        let id = SupplementalIngester::new(&mut store, IngestOptions::records_only())
            .ingest(&make_record())
            .unwrap()
            .unwrap();

        let stored = store.supplemental(id).unwrap();
        assert_eq!(stored.ui, "C000002");
        assert_eq!(UiKind::from_ui(&stored.ui), Some(UiKind::Supplemental));
        assert_eq!(stored.supplemental_class, Some(SupplementalClass::Chemical));
        assert_eq!(store.links_from(LinkKind::SupplementalSource, id).len(), 2);
        assert_eq!(store.links_from(LinkKind::SupplementalPreviousIndexing, id).len(), 1);
        assert_eq!(store.links_from(LinkKind::SupplementalConcept, id).len(), 2);
        assert_eq!(store.entry_combination_count(), 0);
    }

    #[test]
    fn test_heading_with_dangling_qualifier() {
        let mut store = MemoryStore::new();
        let benzilates = make_descriptor(&mut store, "D001561");
        let benzene = make_descriptor(&mut store, "D000117");

        let id = SupplementalIngester::new(&mut store, IngestOptions::with_links())
            .ingest(&make_record())
            .unwrap()
            .unwrap();

        let headings = store.links_from(LinkKind::SupplementalHeadingMappedTo, id);
        assert_eq!(headings.len(), 2);

        let first = store.entry_combination(headings[0].child.unwrap()).unwrap();
        assert_eq!(first.descriptor, Some(benzilates));
        assert_eq!(first.qualifier, None);
        assert_eq!(first.combination_type, None);

        // Q000031 was never ingested, so its key is stored as absent
        let second = store.entry_combination(headings[1].child.unwrap()).unwrap();
        assert_eq!(second.descriptor, Some(benzene));
        assert_eq!(second.qualifier, None);

        assert_eq!(
            store
                .links_from(LinkKind::SupplementalIndexingInformation, id)
                .len(),
            2
        );
        assert_eq!(
            store
                .links_from(LinkKind::SupplementalPharmacologicalAction, id)
                .len(),
            1
        );
        assert_eq!(store.record_count(Entity::Qualifier), 0);
    }
}
