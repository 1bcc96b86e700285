//! Descriptor record ingestion.

use mesh_types::{DescriptorRecord, EntryCombinationType};
use tracing::debug;

use super::{
    ingest_concepts, ingest_heading_pair, ingest_values, resolve_descriptor, resolve_qualifier,
    RecordIngester,
};
use crate::store::{DescriptorRow, Link, LinkAttrs, LinkKind, MeshStore, RowId, ValueKind};
use crate::types::{IngestError, IngestOptions, IngestResult};

/// Stores `<DescriptorRecord>` documents.
pub struct DescriptorIngester<'s, S: MeshStore> {
    store: &'s mut S,
    options: IngestOptions,
}

impl<'s, S: MeshStore> DescriptorIngester<'s, S> {
    /// Creates an ingester writing to `store`.
    pub fn new(store: &'s mut S, options: IngestOptions) -> Self {
        Self { store, options }
    }

    /// Stores a descriptor and everything nested in it in one transaction.
    ///
    /// Allowable qualifiers, entry combinations, see-related descriptors,
    /// pharmacological actions and concept relations point at other records
    /// and are only stored when links are enabled.
    pub fn ingest(&mut self, record: &DescriptorRecord) -> IngestResult<Option<RowId>> {
        debug!("Ingesting descriptor {:?}", record.ui);

        if record.is_empty() {
            return Ok(None);
        }
        let ui = record.ui.as_deref().ok_or(IngestError::MissingUi {
            record: "DescriptorRecord",
        })?;

        let options = self.options;
        self.store.with_transaction(|store| -> IngestResult<Option<RowId>> {
            let descriptor_id = store.upsert_descriptor(&DescriptorRow {
                ui: ui.to_string(),
                descriptor_class: record.descriptor_class,
                name: record.name.clone(),
                created: record.date_created,
                revised: record.date_revised,
                established: record.date_established,
                annotation: record.annotation.clone(),
                history_note: record.history_note.clone(),
                nlm_classification_number: record.nlm_classification_number.clone(),
                online_note: record.online_note.clone(),
                public_mesh_note: record.public_mesh_note.clone(),
                consider_also: record.consider_also.clone(),
            })?;

            if options.ingest_links {
                for allowable in &record.allowable_qualifiers {
                    let qualifier_id = resolve_qualifier(store, &allowable.qualifier)?;
                    let link = Link::new(
                        LinkKind::DescriptorAllowableQualifier,
                        descriptor_id,
                        qualifier_id,
                    )
                    .with_attrs(LinkAttrs::Abbreviation(allowable.abbreviation.clone()));
                    store.upsert_link(&link)?;
                }
            }

            ingest_values(
                store,
                ValueKind::PreviousIndexing,
                LinkKind::DescriptorPreviousIndexing,
                descriptor_id,
                &record.previous_indexings,
            )?;

            if options.ingest_links {
                for combination in &record.entry_combinations {
                    let sides = [
                        (&combination.entry_in, EntryCombinationType::In),
                        (&combination.entry_out, EntryCombinationType::Out),
                    ];
                    for (pair, combination_type) in sides {
                        let id = ingest_heading_pair(store, pair, Some(combination_type))?;
                        store.upsert_link(&Link::new(
                            LinkKind::DescriptorEntryCombination,
                            descriptor_id,
                            Some(id),
                        ))?;
                    }
                }

                for related in &record.see_related {
                    let related_id = resolve_descriptor(store, related)?;
                    store.upsert_link(&Link::new(
                        LinkKind::DescriptorRelatedDescriptor,
                        descriptor_id,
                        related_id,
                    ))?;
                }

                for action in &record.pharmacological_actions {
                    let action_id = resolve_descriptor(store, action)?;
                    store.upsert_link(&Link::new(
                        LinkKind::DescriptorPharmacologicalAction,
                        descriptor_id,
                        action_id,
                    ))?;
                }
            }

            ingest_values(
                store,
                ValueKind::TreeNumber,
                LinkKind::DescriptorTreeNumber,
                descriptor_id,
                &record.tree_numbers,
            )?;

            ingest_concepts(
                store,
                LinkKind::DescriptorConcept,
                descriptor_id,
                &record.concepts,
                options,
            )?;

            Ok(Some(descriptor_id))
        })
    }
}

impl<S: MeshStore> RecordIngester for DescriptorIngester<'_, S> {
    type Record = DescriptorRecord;

    fn ingest(&mut self, record: &DescriptorRecord) -> IngestResult<Option<RowId>> {
        DescriptorIngester::ingest(self, record)
    }
}
