//! Two-pass ingestion of a MeSH release.
//!
//! The first pass stores every record with links turned off so that all
//! descriptors, qualifiers and concepts exist. The second pass goes over the
//! same files again with links on and resolves references between records.

use std::fs;
use std::path::{Path, PathBuf};

use mesh_loader::{MeshError, MeshParser};
use tracing::{debug, info};

use crate::ingest::{DescriptorIngester, QualifierIngester, RecordIngester, SupplementalIngester};
use crate::store::MeshStore;
use crate::types::{IngestOptions, IngestResult};

/// Number of records between progress messages.
pub const PROGRESS_INTERVAL: usize = 10_000;

/// Streams every record in `path` through `ingester`.
///
/// Returns the number of records stored.
pub fn ingest_file<I: RecordIngester>(ingester: &mut I, path: &Path) -> IngestResult<usize> {
    debug!("Ingesting {}", path.display());

    let mut stored = 0;
    for record in MeshParser::<_, I::Record>::from_path(path)? {
        if ingester.ingest(&record?)?.is_some() {
            stored += 1;
            if stored % PROGRESS_INTERVAL == 0 {
                info!("{}: {} records stored", path.display(), stored);
            }
        }
    }

    info!("Finished {}: {} records stored", path.display(), stored);
    Ok(stored)
}

/// Counts for one pass over the input files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassStats {
    /// Files read.
    pub files: usize,
    /// Records stored.
    pub records: usize,
}

/// Counts returned by [`Pipeline::run`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineStats {
    /// Pass without links.
    pub records_pass: PassStats,
    /// Pass resolving links.
    pub links_pass: PassStats,
}

/// The MeSH XML files of one release, grouped by record family.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    qualifiers: Vec<PathBuf>,
    descriptors: Vec<PathBuf>,
    supplementals: Vec<PathBuf>,
}

impl Pipeline {
    /// Creates an empty pipeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Finds `qual*`, `desc*` and `supp*` XML files in a release directory.
    ///
    /// Both plain and gzipped files are picked up.
    pub fn discover<P: AsRef<Path>>(dir: P) -> IngestResult<Self> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(MeshError::FileNotFound {
                path: dir.display().to_string(),
            }
            .into());
        }

        let mut pipeline = Self::new();
        let mut entries = fs::read_dir(dir)
            .and_then(|entries| entries.collect::<Result<Vec<_>, _>>())
            .map_err(MeshError::from)?;
        entries.sort_by_key(|entry| entry.file_name());

        for entry in entries {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if !(name.ends_with(".xml") || name.ends_with(".xml.gz")) {
                continue;
            }

            if name.starts_with("qual") {
                pipeline.qualifiers.push(entry.path());
            } else if name.starts_with("desc") {
                pipeline.descriptors.push(entry.path());
            } else if name.starts_with("supp") {
                pipeline.supplementals.push(entry.path());
            }
        }

        info!(
            "Discovered {} qualifier, {} descriptor and {} supplemental files in {}",
            pipeline.qualifiers.len(),
            pipeline.descriptors.len(),
            pipeline.supplementals.len(),
            dir.display()
        );
        Ok(pipeline)
    }

    /// Adds a qualifier file.
    pub fn qualifiers<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.qualifiers.push(path.into());
        self
    }

    /// Adds a descriptor file.
    pub fn descriptors<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.descriptors.push(path.into());
        self
    }

    /// Adds a supplemental record file.
    pub fn supplementals<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.supplementals.push(path.into());
        self
    }

    /// Returns true if no file was added.
    pub fn is_empty(&self) -> bool {
        self.qualifiers.is_empty() && self.descriptors.is_empty() && self.supplementals.is_empty()
    }

    /// Runs both passes. The links pass only starts once every file went
    /// through the records pass.
    pub fn run<S: MeshStore>(&self, store: &mut S) -> IngestResult<PipelineStats> {
        info!("Storing records");
        let records_pass = self.pass(store, IngestOptions::records_only())?;

        info!("Resolving links");
        let links_pass = self.pass(store, IngestOptions::with_links())?;

        Ok(PipelineStats {
            records_pass,
            links_pass,
        })
    }

    fn pass<S: MeshStore>(&self, store: &mut S, options: IngestOptions) -> IngestResult<PassStats> {
        let mut stats = PassStats::default();

        for path in &self.qualifiers {
            stats.records += ingest_file(&mut QualifierIngester::new(store, options), path)?;
            stats.files += 1;
        }
        for path in &self.descriptors {
            stats.records += ingest_file(&mut DescriptorIngester::new(store, options), path)?;
            stats.files += 1;
        }
        for path in &self.supplementals {
            stats.records += ingest_file(&mut SupplementalIngester::new(store, options), path)?;
            stats.files += 1;
        }

        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;

    use flate2::write::GzEncoder;
    use flate2::Compression;
    use tempfile::TempDir;

    use crate::store::{Entity, LinkKind, MemoryStore};
    use crate::types::IngestError;

    const DESCRIPTORS: &str = include_str!("../../../testdata/desc_sample.xml");
    const QUALIFIERS: &str = include_str!("../../../testdata/qual_sample.xml");
    const SUPPLEMENTALS: &str = include_str!("../../../testdata/supp_sample.xml");

    fn make_release() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("desc2024.xml"), DESCRIPTORS).unwrap();
        fs::write(dir.path().join("supp2024.xml"), SUPPLEMENTALS).unwrap();
        fs::write(dir.path().join("README.txt"), "not a record file").unwrap();

        let file = File::create(dir.path().join("qual2024.xml.gz")).unwrap();
        let mut encoder = GzEncoder::new(file, Compression::default());
        encoder.write_all(QUALIFIERS.as_bytes()).unwrap();
        encoder.finish().unwrap();
        dir
    }

    #[test]
    fn test_discover() {
        let dir = make_release();
        let pipeline = Pipeline::discover(dir.path()).unwrap();

        assert_eq!(pipeline.qualifiers.len(), 1);
        assert_eq!(pipeline.descriptors.len(), 1);
        assert_eq!(pipeline.supplementals.len(), 1);
        assert!(pipeline.qualifiers[0].to_string_lossy().ends_with(".gz"));
    }

    #[test]
    fn test_discover_missing_dir() {
        let result = Pipeline::discover("/nonexistent/mesh/release");
        assert!(matches!(
            result,
            Err(IngestError::Parse(MeshError::FileNotFound { .. }))
        ));
    }

    #[test]
    fn test_run_two_passes() {
        let dir = make_release();
        let pipeline = Pipeline::discover(dir.path()).unwrap();
        let mut store = MemoryStore::new();

        let stats = pipeline.run(&mut store).unwrap();
        assert_eq!(stats.records_pass, PassStats { files: 3, records: 3 });
        assert_eq!(stats.links_pass, stats.records_pass);

        assert_eq!(store.record_count(Entity::Qualifier), 1);
        assert_eq!(store.record_count(Entity::Descriptor), 1);
        assert_eq!(store.record_count(Entity::Supplemental), 1);
        assert!(store.link_count(LinkKind::DescriptorAllowableQualifier) > 0);
        assert!(store.link_count(LinkKind::SupplementalHeadingMappedTo) > 0);

        // Both ends of M0000001 -> M0353609 exist once the records pass is done
        let first = store.find_by_ui(Entity::Concept, "M0000001").unwrap();
        let second = store.find_by_ui(Entity::Concept, "M0353609").unwrap();
        assert!(store
            .concept_relations()
            .any(|row| row.concept == first && row.related == second));
    }

    #[test]
    fn test_ingest_file_counts_records() {
        let dir = make_release();
        let mut store = MemoryStore::new();
        let mut ingester = QualifierIngester::new(&mut store, IngestOptions::records_only());

        let count = ingest_file(&mut ingester, &dir.path().join("qual2024.xml.gz")).unwrap();
        assert_eq!(count, 1);

        // A descriptor file read as qualifiers holds no matching records
        let count = ingest_file(&mut ingester, &dir.path().join("desc2024.xml")).unwrap();
        assert_eq!(count, 0);
        assert!(store.find_by_ui(Entity::Qualifier, "Q000000981").unwrap().is_some());
    }

    #[test]
    fn test_empty_pipeline() {
        let pipeline = Pipeline::new();
        assert!(pipeline.is_empty());

        let pipeline = pipeline.descriptors("desc2024.xml");
        assert!(!pipeline.is_empty());
    }
}
