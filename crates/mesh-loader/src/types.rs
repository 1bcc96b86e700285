//! Parser-specific types for MeSH XML and UMLS RRF processing.

use thiserror::Error;

/// Errors that can occur while reading MeSH or UMLS files.
#[derive(Error, Debug)]
pub enum MeshError {
    /// I/O error reading an input file.
    #[error("IO error reading input file: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed XML.
    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Malformed XML attribute.
    #[error("XML attribute error: {0}")]
    XmlAttribute(#[from] quick_xml::events::attributes::AttrError),

    /// Pipe-delimited record error.
    #[error("RRF parsing error: {0}")]
    Csv(#[from] csv::Error),

    /// File not found.
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was not found.
        path: String,
    },

    /// The document ended inside an open element.
    #[error("Unexpected end of XML document inside <{tag}>")]
    UnexpectedEof {
        /// The innermost element left open.
        tag: String,
    },
}

/// Result type for MeSH and UMLS parsing operations.
pub type MeshResult<T> = Result<T, MeshError>;

/// Source filter applied while parsing `MRDEF.RRF`.
///
/// An empty `include` list admits every source. `exclude` always applies.
/// Supplying both lists is not rejected; a source must then be included and
/// not excluded.
#[derive(Debug, Clone, Default)]
pub struct DefinitionFilter {
    /// Source abbreviations to keep (empty = all sources).
    pub include: Vec<String>,
    /// Source abbreviations to drop.
    pub exclude: Vec<String>,
}

impl DefinitionFilter {
    /// Creates a filter that keeps only the given sources.
    pub fn only<I, S>(sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            include: sources.into_iter().map(Into::into).collect(),
            exclude: Vec::new(),
        }
    }

    /// Creates a filter that drops the given sources.
    pub fn excluding<I, S>(sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            include: Vec::new(),
            exclude: sources.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns true if definitions from this source should be kept.
    pub fn accepts(&self, source: &str) -> bool {
        if !self.include.is_empty() && !self.include.iter().any(|s| s == source) {
            return false;
        }
        !self.exclude.iter().any(|s| s == source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_definition_filter_default_accepts_all() {
        let filter = DefinitionFilter::default();
        assert!(filter.accepts("MSH"));
        assert!(filter.accepts("NCI"));
    }

    #[test]
    fn test_definition_filter_only() {
        let filter = DefinitionFilter::only(["MSH", "NCI"]);
        assert!(filter.accepts("MSH"));
        assert!(filter.accepts("NCI"));
        assert!(!filter.accepts("CSP"));
    }

    #[test]
    fn test_definition_filter_excluding() {
        let filter = DefinitionFilter::excluding(["NCI_NICHD"]);
        assert!(filter.accepts("MSH"));
        assert!(!filter.accepts("NCI_NICHD"));
    }

    #[test]
    fn test_file_not_found_message() {
        let err = MeshError::FileNotFound {
            path: "desc2024.xml".to_string(),
        };
        assert_eq!(err.to_string(), "File not found: desc2024.xml");
    }
}
