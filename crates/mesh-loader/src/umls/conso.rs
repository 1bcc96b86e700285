//! UMLS `MRCONSO.RRF` parser.
//!
//! Collects the English names UMLS records for each MeSH entity. Synonyms
//! are lowercased and deduplicated, keeping the first occurrence of each.

use std::collections::HashSet;
#[cfg(feature = "parallel")]
use std::fs::File;
#[cfg(feature = "parallel")]
use std::io::{BufRead, BufReader};
use std::path::Path;

use csv::StringRecord;
use mesh_types::{CuiUiMap, MrconsoRow, SynonymMap};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::sat::parse_sat;
use super::{field, UmlsParser, UmlsRecord};
use crate::types::MeshResult;
#[cfg(feature = "parallel")]
use crate::types::MeshError;

/// Columns of an MRCONSO file.
const MRCONSO_COLUMNS: &[&str] = &[
    "CUI", "LAT", "TS", "LUI", "STT", "SUI", "ISPREF", "AUI", "SAUI", "SCUI", "SDUI", "SAB",
    "TTY", "CODE", "STR", "SRL", "SUPPRESS", "CVF",
];

impl UmlsRecord for MrconsoRow {
    const COLUMNS: &'static [&'static str] = MRCONSO_COLUMNS;

    fn from_record(record: &StringRecord) -> Self {
        MrconsoRow {
            cui: field(record, 0),
            lat: field(record, 1),
            ts: field(record, 2),
            lui: field(record, 3),
            stt: field(record, 4),
            sui: field(record, 5),
            ispref: field(record, 6),
            aui: field(record, 7),
            saui: field(record, 8),
            scui: field(record, 9),
            sdui: field(record, 10),
            sab: field(record, 11),
            tty: field(record, 12),
            code: field(record, 13),
            string: field(record, 14),
            srl: field(record, 15),
            suppress: field(record, 16),
            cvf: field(record, 17),
        }
    }
}

/// Parses MRSAT and MRCONSO files into a MeSH UI → synonyms map.
pub fn parse_conso<P, Q>(mrsat_path: P, mrconso_path: Q) -> MeshResult<SynonymMap>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let cui_ui = parse_sat(mrsat_path)?;
    parse_conso_with_map(mrconso_path, &cui_ui)
}

/// Parses an MRCONSO file using an already built CUI → UI map.
pub fn parse_conso_with_map<P: AsRef<Path>>(path: P, cui_ui: &CuiUiMap) -> MeshResult<SynonymMap> {
    let path = path.as_ref();
    let synonyms = build_synonym_map(UmlsParser::<_, MrconsoRow>::from_path(path)?, cui_ui)?;
    tracing::info!(
        "Parsed synonyms for {} entities from {}",
        synonyms.len(),
        path.display()
    );
    Ok(synonyms)
}

/// Builds a MeSH UI → synonyms map from MRCONSO rows.
///
/// Keeps English rows that carry a source descriptor UI and whose CUI is
/// mapped. Synonyms are grouped under the mapped UI.
pub fn build_synonym_map<I>(rows: I, cui_ui: &CuiUiMap) -> MeshResult<SynonymMap>
where
    I: IntoIterator<Item = MeshResult<MrconsoRow>>,
{
    let mut synonyms = SynonymMap::new();
    for row in rows {
        let row = row?;
        if !row.is_english_descriptor_atom() {
            continue;
        }
        if let Some(ui) = cui_ui.get(&row.cui) {
            synonyms.entry(ui.clone()).or_default().push(row.string);
        }
    }
    Ok(normalize(synonyms))
}

/// Parses an MRCONSO file with rows split across the rayon thread pool.
///
/// Produces the same map as [`parse_conso_with_map`].
#[cfg(feature = "parallel")]
pub fn parse_conso_parallel<P: AsRef<Path>>(path: P, cui_ui: &CuiUiMap) -> MeshResult<SynonymMap> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(MeshError::FileNotFound {
            path: path.display().to_string(),
        });
    }

    let reader = BufReader::new(File::open(path)?);
    let lines = reader.lines().collect::<Result<Vec<String>, _>>()?;

    let pairs: Vec<(&String, String)> = lines
        .par_iter()
        .filter_map(|line| parse_conso_line(line, cui_ui))
        .collect();

    let mut synonyms = SynonymMap::new();
    for (ui, string) in pairs {
        synonyms.entry(ui.clone()).or_default().push(string);
    }

    tracing::info!(
        "Parsed synonyms for {} entities from {}",
        synonyms.len(),
        path.display()
    );
    Ok(normalize(synonyms))
}

/// Parses a single MRCONSO line into `(mapped UI, string)`.
#[cfg(feature = "parallel")]
fn parse_conso_line<'a>(line: &str, cui_ui: &'a CuiUiMap) -> Option<(&'a String, String)> {
    let fields: Vec<&str> = line.split('|').collect();
    if fields.len() < 15 {
        return None;
    }

    if fields[1] != mesh_types::umls::ENGLISH || fields[10].is_empty() {
        return None;
    }

    let ui = cui_ui.get(fields[0])?;
    Some((ui, fields[14].to_string()))
}

/// Lowercases every synonym and drops repeats, keeping first occurrences.
fn normalize(mut synonyms: SynonymMap) -> SynonymMap {
    for values in synonyms.values_mut() {
        let mut seen = HashSet::new();
        values.retain_mut(|value| {
            *value = value.to_lowercase();
            seen.insert(value.clone())
        });
    }
    synonyms
}
