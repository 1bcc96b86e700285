//! Qualifier record ingestion.

use mesh_types::QualifierRecord;
use tracing::debug;

use super::{ingest_concepts, ingest_values, RecordIngester};
use crate::store::{LinkKind, MeshStore, QualifierRow, RowId, ValueKind};
use crate::types::{IngestError, IngestOptions, IngestResult};

/// Stores `<QualifierRecord>` documents.
pub struct QualifierIngester<'s, S: MeshStore> {
    store: &'s mut S,
    options: IngestOptions,
}

impl<'s, S: MeshStore> QualifierIngester<'s, S> {
    /// Creates an ingester writing to `store`.
    pub fn new(store: &'s mut S, options: IngestOptions) -> Self {
        Self { store, options }
    }

    /// Stores a qualifier, its tree numbers and its concepts in one
    /// transaction.
    pub fn ingest(&mut self, record: &QualifierRecord) -> IngestResult<Option<RowId>> {
        debug!("Ingesting qualifier {:?}", record.ui);

        if record.is_empty() {
            return Ok(None);
        }
        let ui = record.ui.as_deref().ok_or(IngestError::MissingUi {
            record: "QualifierRecord",
        })?;

        let options = self.options;
        self.store.with_transaction(|store| -> IngestResult<Option<RowId>> {
            let qualifier_id = store.upsert_qualifier(&QualifierRow {
                ui: ui.to_string(),
                name: record.name.clone(),
                created: record.date_created,
                revised: record.date_revised,
                established: record.date_established,
                annotation: record.annotation.clone(),
                history_note: record.history_note.clone(),
                online_note: record.online_note.clone(),
            })?;

            ingest_values(
                store,
                ValueKind::TreeNumber,
                LinkKind::QualifierTreeNumber,
                qualifier_id,
                &record.tree_numbers,
            )?;

            ingest_concepts(
                store,
                LinkKind::QualifierConcept,
                qualifier_id,
                &record.concepts,
                options,
            )?;

            Ok(Some(qualifier_id))
        })
    }
}

impl<S: MeshStore> RecordIngester for QualifierIngester<'_, S> {
    type Record = QualifierRecord;

    fn ingest(&mut self, record: &QualifierRecord) -> IngestResult<Option<RowId>> {
        QualifierIngester::ingest(self, record)
    }
}
