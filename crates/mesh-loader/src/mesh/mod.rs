//! Generic MeSH XML record parser.
//!
//! Provides a streaming parser that turns the top-level records of a MeSH
//! XML dump into typed documents, one record at a time.

pub mod common;
mod descriptor;
mod qualifier;
mod supplemental;

use std::io::BufRead;
use std::marker::PhantomData;
use std::path::Path;

use crate::element::Element;
use crate::stream::ElementStream;
use crate::types::MeshResult;

pub use descriptor::parse_descriptor_record;
pub use qualifier::parse_qualifier_record;
pub use supplemental::parse_supplemental_record;

/// Trait for typed documents built from one top-level MeSH XML element.
pub trait MeshRecord: Sized {
    /// Tag name of the top-level record element.
    const RECORD_TAG: &'static str;

    /// Builds the document from its element.
    fn from_element(element: &Element) -> Self;

    /// Returns true if no field was populated.
    fn is_empty(&self) -> bool;

    /// Returns the record UI, if present.
    fn ui(&self) -> Option<&str>;
}

/// A streaming parser for MeSH XML files.
///
/// Yields one document per record element and skips documents that come
/// out completely empty. The sequence is forward-only; parsing the same
/// file again requires a new parser.
///
/// # Example
///
/// ```ignore
/// use mesh_loader::MeshParser;
/// use mesh_types::DescriptorRecord;
///
/// for record in MeshParser::<_, DescriptorRecord>::from_path("desc2024.xml.gz")? {
///     let record = record?;
///     println!("{:?} {:?}", record.ui, record.name);
/// }
/// ```
pub struct MeshParser<R: BufRead, T: MeshRecord> {
    elements: ElementStream<R>,
    records_read: usize,
    _marker: PhantomData<T>,
}

impl<T: MeshRecord> MeshParser<Box<dyn BufRead>, T> {
    /// Creates a parser from a file path (`.gz` files are decompressed).
    ///
    /// # Errors
    /// Returns an error if the file does not exist or cannot be opened.
    pub fn from_path<P: AsRef<Path>>(path: P) -> MeshResult<Self> {
        let path = path.as_ref();
        tracing::info!("Parsing <{}> elements from {}", T::RECORD_TAG, path.display());
        Ok(Self::from_stream(ElementStream::from_path(path, T::RECORD_TAG)?))
    }
}

impl<R: BufRead, T: MeshRecord> MeshParser<R, T> {
    /// Creates a parser from a buffered reader.
    pub fn from_reader(reader: R) -> Self {
        Self::from_stream(ElementStream::new(reader, T::RECORD_TAG))
    }

    fn from_stream(elements: ElementStream<R>) -> Self {
        Self {
            elements,
            records_read: 0,
            _marker: PhantomData,
        }
    }

    /// Returns the number of record elements read so far, empty ones included.
    pub fn records_read(&self) -> usize {
        self.records_read
    }

    /// Parses all records into a Vec.
    ///
    /// Note: This loads every record into memory.
    pub fn parse_all(self) -> MeshResult<Vec<T>> {
        self.collect()
    }
}

impl<R: BufRead, T: MeshRecord> Iterator for MeshParser<R, T> {
    type Item = MeshResult<T>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let element = match self.elements.next()? {
                Ok(element) => element,
                Err(e) => return Some(Err(e)),
            };
            self.records_read += 1;

            let record = T::from_element(&element);
            if record.is_empty() {
                tracing::debug!("Skipping empty <{}> element", T::RECORD_TAG);
                continue;
            }
            return Some(Ok(record));
        }
    }
}
