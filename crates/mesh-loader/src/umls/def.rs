//! UMLS `MRDEF.RRF` parser.

use std::path::Path;

use csv::StringRecord;
use mesh_types::{CuiUiMap, DefinitionMap, MrdefRow};

use super::sat::parse_sat;
use super::{field, UmlsParser, UmlsRecord};
use crate::types::{DefinitionFilter, MeshResult};

/// Columns of an MRDEF file.
const MRDEF_COLUMNS: &[&str] = &["CUI", "AUI", "ATUI", "SATUI", "SAB", "DEF", "SUPPRESS", "CVF"];

impl UmlsRecord for MrdefRow {
    const COLUMNS: &'static [&'static str] = MRDEF_COLUMNS;

    fn from_record(record: &StringRecord) -> Self {
        MrdefRow {
            cui: field(record, 0),
            aui: field(record, 1),
            atui: field(record, 2),
            satui: field(record, 3),
            sab: field(record, 4),
            def: field(record, 5),
            suppress: field(record, 6),
            cvf: field(record, 7),
        }
    }
}

/// Parses MRSAT and MRDEF files into a MeSH UI → source → definitions map.
pub fn parse_def<P, Q>(mrsat_path: P, mrdef_path: Q, filter: &DefinitionFilter) -> MeshResult<DefinitionMap>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let cui_ui = parse_sat(mrsat_path)?;
    parse_def_with_map(mrdef_path, &cui_ui, filter)
}

/// Parses an MRDEF file using an already built CUI → UI map.
pub fn parse_def_with_map<P: AsRef<Path>>(
    path: P,
    cui_ui: &CuiUiMap,
    filter: &DefinitionFilter,
) -> MeshResult<DefinitionMap> {
    let path = path.as_ref();
    let definitions =
        build_definition_map(UmlsParser::<_, MrdefRow>::from_path(path)?, cui_ui, filter)?;
    tracing::info!(
        "Parsed definitions for {} entities from {}",
        definitions.len(),
        path.display()
    );
    Ok(definitions)
}

/// Builds a MeSH UI → source → definitions map from MRDEF rows.
///
/// Rows need a mapped CUI, a source and a definition, and the source must
/// pass `filter`. A definition repeated under the same source is kept once.
pub fn build_definition_map<I>(
    rows: I,
    cui_ui: &CuiUiMap,
    filter: &DefinitionFilter,
) -> MeshResult<DefinitionMap>
where
    I: IntoIterator<Item = MeshResult<MrdefRow>>,
{
    let mut definitions = DefinitionMap::new();
    for row in rows {
        let row = row?;
        if row.sab.is_empty() || row.def.is_empty() || !filter.accepts(&row.sab) {
            continue;
        }
        if let Some(ui) = cui_ui.get(&row.cui) {
            definitions
                .entry(ui.clone())
                .or_default()
                .push(&row.sab, &row.def);
        }
    }
    Ok(definitions)
}
