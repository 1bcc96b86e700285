//! UMLS Rich Release Format (RRF) row types and lookup maps.
//!
//! RRF files are pipe-delimited with no header row. Blank columns are kept
//! as empty strings; filters treat an empty string as an absent value.

use std::collections::HashMap;

/// Attribute name of MRSAT rows that link a CUI to a MeSH descriptor UI.
pub const MESH_DUI_ATTRIBUTE: &str = "MESH_DUI";

/// Language code of English MRCONSO rows.
pub const ENGLISH: &str = "ENG";

/// A row of `MRSAT.RRF` (simple concept, term and string attributes).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MrsatRow {
    /// Concept unique identifier.
    pub cui: String,
    /// Lexical unique identifier.
    pub lui: String,
    /// String unique identifier.
    pub sui: String,
    /// Metathesaurus atom, relationship or concept identifier.
    pub metaui: String,
    /// The name of the column `metaui` refers to.
    pub stype: String,
    /// Source asserted code.
    pub code: String,
    /// Attribute identifier.
    pub atui: String,
    /// Source asserted attribute identifier.
    pub satui: String,
    /// Attribute name.
    pub atn: String,
    /// Source abbreviation.
    pub sab: String,
    /// Attribute value.
    pub atv: String,
    /// Suppressible flag.
    pub suppress: String,
    /// Content view flag.
    pub cvf: String,
}

impl MrsatRow {
    /// Returns `(cui, descriptor_ui)` if this row maps a CUI to a MeSH UI.
    pub fn mesh_dui(&self) -> Option<(&str, &str)> {
        if self.atn != MESH_DUI_ATTRIBUTE || self.cui.is_empty() || self.atv.is_empty() {
            return None;
        }
        Some((&self.cui, &self.atv))
    }
}

/// A row of `MRCONSO.RRF` (concept names and sources).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MrconsoRow {
    /// Concept unique identifier.
    pub cui: String,
    /// Language of the term.
    pub lat: String,
    /// Term status.
    pub ts: String,
    /// Lexical unique identifier.
    pub lui: String,
    /// String type.
    pub stt: String,
    /// String unique identifier.
    pub sui: String,
    /// Atom status, preferred (`Y`) or not (`N`).
    pub ispref: String,
    /// Atom unique identifier.
    pub aui: String,
    /// Source asserted atom identifier.
    pub saui: String,
    /// Source asserted concept identifier.
    pub scui: String,
    /// Source asserted descriptor identifier.
    pub sdui: String,
    /// Source abbreviation.
    pub sab: String,
    /// Term type in source.
    pub tty: String,
    /// Most useful source asserted identifier.
    pub code: String,
    /// The string itself.
    pub string: String,
    /// Source restriction level.
    pub srl: String,
    /// Suppressible flag.
    pub suppress: String,
    /// Content view flag.
    pub cvf: String,
}

impl MrconsoRow {
    /// Returns true for English rows that carry a source descriptor UI.
    pub fn is_english_descriptor_atom(&self) -> bool {
        self.lat == ENGLISH && !self.sdui.is_empty()
    }
}

/// A row of `MRDEF.RRF` (definitions).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MrdefRow {
    /// Concept unique identifier.
    pub cui: String,
    /// Atom unique identifier.
    pub aui: String,
    /// Attribute identifier.
    pub atui: String,
    /// Source asserted attribute identifier.
    pub satui: String,
    /// Source abbreviation.
    pub sab: String,
    /// Definition text.
    pub def: String,
    /// Suppressible flag.
    pub suppress: String,
    /// Content view flag.
    pub cvf: String,
}

/// Maps a UMLS CUI to the MeSH UI it describes.
pub type CuiUiMap = HashMap<String, String>;

/// Maps a MeSH UI to its lowercase, deduplicated synonyms.
pub type SynonymMap = HashMap<String, Vec<String>>;

/// Maps a MeSH UI to its definitions grouped by source.
pub type DefinitionMap = HashMap<String, SourceDefinitions>;

/// Definitions of one entity, grouped by source abbreviation.
///
/// Sources keep the order in which they were first seen; definitions are
/// unique within a source but may repeat across sources.
///
/// # Examples
///
/// ```
/// use mesh_types::SourceDefinitions;
///
/// let mut definitions = SourceDefinitions::default();
/// assert!(definitions.push("NCI", "A neoplasm."));
/// assert!(!definitions.push("NCI", "A neoplasm."));
/// assert!(definitions.push("MSH", "A neoplasm."));
///
/// assert_eq!(definitions.sources().collect::<Vec<_>>(), vec!["NCI", "MSH"]);
/// assert_eq!(definitions.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SourceDefinitions {
    entries: Vec<(String, Vec<String>)>,
}

impl SourceDefinitions {
    /// Adds a definition under a source.
    ///
    /// Returns false if the source already holds the exact same text.
    pub fn push(&mut self, source: &str, definition: &str) -> bool {
        let position = match self.entries.iter().position(|(name, _)| name == source) {
            Some(position) => position,
            None => {
                self.entries.push((source.to_string(), Vec::new()));
                self.entries.len() - 1
            }
        };

        let definitions = &mut self.entries[position].1;
        if definitions.iter().any(|existing| existing == definition) {
            return false;
        }
        definitions.push(definition.to_string());
        true
    }

    /// Returns the definitions recorded for a source.
    pub fn get(&self, source: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(name, _)| name == source)
            .map(|(_, definitions)| definitions.as_slice())
    }

    /// Iterates over source names in first-seen order.
    pub fn sources(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Iterates over `(source, definitions)` pairs in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(name, definitions)| (name.as_str(), definitions.as_slice()))
    }

    /// Returns the total number of definitions across all sources.
    pub fn len(&self) -> usize {
        self.entries.iter().map(|(_, definitions)| definitions.len()).sum()
    }

    /// Returns true if no definition has been recorded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mesh_dui_filter() {
        let row = MrsatRow {
            cui: "C0024537".to_string(),
            atn: "MESH_DUI".to_string(),
            sab: "NDFRT".to_string(),
            atv: "D016780".to_string(),
            ..Default::default()
        };
        assert_eq!(row.mesh_dui(), Some(("C0024537", "D016780")));

        let other = MrsatRow {
            atn: "NDFRT_KIND".to_string(),
            ..row.clone()
        };
        assert_eq!(other.mesh_dui(), None);

        let blank_value = MrsatRow {
            atv: String::new(),
            ..row
        };
        assert_eq!(blank_value.mesh_dui(), None);
    }

    #[test]
    fn test_english_descriptor_atom() {
        let row = MrconsoRow {
            cui: "C0024537".to_string(),
            lat: "ENG".to_string(),
            sdui: "D016780".to_string(),
            string: "Vivax Malaria".to_string(),
            ..Default::default()
        };
        assert!(row.is_english_descriptor_atom());

        let french = MrconsoRow {
            lat: "FRE".to_string(),
            ..row.clone()
        };
        assert!(!french.is_english_descriptor_atom());

        let no_descriptor = MrconsoRow {
            sdui: String::new(),
            ..row
        };
        assert!(!no_descriptor.is_english_descriptor_atom());
    }

    #[test]
    fn test_source_definitions_dedup_per_source() {
        let mut definitions = SourceDefinitions::default();
        assert!(definitions.push("NCI", "first"));
        assert!(definitions.push("NCI", "second"));
        assert!(!definitions.push("NCI", "first"));
        assert!(definitions.push("NCI_NICHD", "first"));

        assert_eq!(definitions.get("NCI").unwrap(), ["first", "second"]);
        assert_eq!(definitions.get("NCI_NICHD").unwrap(), ["first"]);
        assert!(definitions.get("MSH").is_none());
        assert_eq!(definitions.len(), 3);
    }
}
