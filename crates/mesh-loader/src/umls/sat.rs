//! UMLS `MRSAT.RRF` parser.
//!
//! MRSAT rows with the `MESH_DUI` attribute tie a UMLS CUI to the MeSH
//! descriptor UI it describes; the resulting map drives the MRCONSO and
//! MRDEF parsers.

use std::path::Path;

use csv::StringRecord;
use mesh_types::{CuiUiMap, MrsatRow};

use super::{field, UmlsParser, UmlsRecord};
use crate::types::MeshResult;

/// Columns of an MRSAT file.
const MRSAT_COLUMNS: &[&str] = &[
    "CUI", "LUI", "SUI", "METAUI", "STYPE", "CODE", "ATUI", "SATUI", "ATN", "SAB", "ATV",
    "SUPPRESS", "CVF",
];

impl UmlsRecord for MrsatRow {
    const COLUMNS: &'static [&'static str] = MRSAT_COLUMNS;

    fn from_record(record: &StringRecord) -> Self {
        MrsatRow {
            cui: field(record, 0),
            lui: field(record, 1),
            sui: field(record, 2),
            metaui: field(record, 3),
            stype: field(record, 4),
            code: field(record, 5),
            atui: field(record, 6),
            satui: field(record, 7),
            atn: field(record, 8),
            sab: field(record, 9),
            atv: field(record, 10),
            suppress: field(record, 11),
            cvf: field(record, 12),
        }
    }
}

/// Parses an MRSAT file into a CUI → MeSH UI map.
pub fn parse_sat<P: AsRef<Path>>(path: P) -> MeshResult<CuiUiMap> {
    let path = path.as_ref();
    let map = build_cui_ui_map(UmlsParser::<_, MrsatRow>::from_path(path)?)?;
    tracing::info!("Parsed {} CUI mappings from {}", map.len(), path.display());
    Ok(map)
}

/// Builds a CUI → MeSH UI map from MRSAT rows.
///
/// Only `MESH_DUI` rows with both a CUI and a value count. When a CUI
/// appears more than once the last row wins.
pub fn build_cui_ui_map<I>(rows: I) -> MeshResult<CuiUiMap>
where
    I: IntoIterator<Item = MeshResult<MrsatRow>>,
{
    let mut map = CuiUiMap::new();
    for row in rows {
        let row = row?;
        if let Some((cui, ui)) = row.mesh_dui() {
            map.insert(cui.to_string(), ui.to_string());
        }
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_path() -> std::path::PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("../../testdata/MRSAT.RRF")
    }

    #[test]
    fn test_parse_sat() {
        let map = parse_sat(make_path()).unwrap();

        assert_eq!(map.len(), 4);
        assert_eq!(map["C0024537"], "D016780");
        assert_eq!(map["C0006118"], "D001932");
        assert_eq!(map["C0005999"], "D001932");
        assert_eq!(map["C0001175"], "D000163");
        assert!(!map.contains_key("C0009999"));
    }

    #[test]
    fn test_last_write_wins() {
        let data = "C1||||||||MESH_DUI|MSH|D000001|N||\nC1||||||||MESH_DUI|MSH|D000002|N||\n";
        let map = build_cui_ui_map(UmlsParser::<_, MrsatRow>::from_reader(data.as_bytes())).unwrap();

        assert_eq!(map.len(), 1);
        assert_eq!(map["C1"], "D000002");
    }

    #[test]
    fn test_columns() {
        assert_eq!(MrsatRow::COLUMNS.len(), 13);
        assert_eq!(MrsatRow::COLUMNS[8], "ATN");
        assert_eq!(MrsatRow::COLUMNS[10], "ATV");
    }
}
