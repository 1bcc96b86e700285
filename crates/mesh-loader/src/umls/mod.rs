//! Generic UMLS RRF file parser.
//!
//! RRF files are pipe-delimited, have no header row and terminate every
//! line with a trailing `|`. Fields are never quoted.

mod conso;
mod def;
mod sat;

use std::fs::File;
use std::io::{BufReader, Read};
use std::marker::PhantomData;
use std::path::Path;

use csv::{Reader, ReaderBuilder, StringRecord};

use crate::types::{MeshError, MeshResult};

#[cfg(feature = "parallel")]
pub use conso::parse_conso_parallel;
pub use conso::{build_synonym_map, parse_conso, parse_conso_with_map};
pub use def::{build_definition_map, parse_def, parse_def_with_map};
pub use sat::{build_cui_ui_map, parse_sat};

/// Trait for row types of a UMLS RRF file.
pub trait UmlsRecord: Sized {
    /// Column names, in file order.
    const COLUMNS: &'static [&'static str];

    /// Builds a row from a pipe-delimited record.
    ///
    /// Missing trailing columns are read as empty strings.
    fn from_record(record: &StringRecord) -> Self;
}

/// A streaming parser for RRF files.
pub struct UmlsParser<R: Read, T: UmlsRecord> {
    reader: Reader<R>,
    rows_read: usize,
    _marker: PhantomData<T>,
}

impl<T: UmlsRecord> UmlsParser<BufReader<File>, T> {
    /// Creates a parser from a file path.
    ///
    /// # Errors
    /// Returns an error if the file does not exist or cannot be opened.
    pub fn from_path<P: AsRef<Path>>(path: P) -> MeshResult<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(MeshError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let file = File::open(path)?;
        Ok(Self::from_reader(BufReader::new(file)))
    }
}

impl<R: Read, T: UmlsRecord> UmlsParser<R, T> {
    /// Creates a parser from a reader.
    pub fn from_reader(reader: R) -> Self {
        let reader = ReaderBuilder::new()
            .delimiter(b'|')
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .trim(csv::Trim::None)
            .from_reader(reader);

        Self {
            reader,
            rows_read: 0,
            _marker: PhantomData,
        }
    }

    /// Returns the number of rows read so far.
    pub fn rows_read(&self) -> usize {
        self.rows_read
    }
}

impl<R: Read, T: UmlsRecord> Iterator for UmlsParser<R, T> {
    type Item = MeshResult<T>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let mut record = StringRecord::new();
            match self.reader.read_record(&mut record) {
                Ok(true) => {
                    self.rows_read += 1;

                    // Skip blank lines
                    if record.iter().all(|f| f.trim().is_empty()) {
                        continue;
                    }

                    return Some(Ok(T::from_record(&record)));
                }
                Ok(false) => return None,
                Err(e) => return Some(Err(e.into())),
            }
        }
    }
}

/// Returns a column value, or an empty string past the end of the row.
pub(crate) fn field(record: &StringRecord, index: usize) -> String {
    record.get(index).unwrap_or("").to_string()
}
