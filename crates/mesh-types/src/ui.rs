//! MeSH unique identifier (UI) classification.
//!
//! MeSH assigns every record a string UI whose first character tells the
//! record family apart: `D` for descriptors, `Q` for qualifiers, `C` for
//! supplemental concept records and `M` for concepts.

/// The record family a MeSH UI belongs to.
///
/// # Examples
///
/// ```
/// use mesh_types::UiKind;
///
/// assert_eq!(UiKind::from_ui("D000001"), Some(UiKind::Descriptor));
/// assert_eq!(UiKind::from_ui("M0000001"), Some(UiKind::Concept));
/// assert_eq!(UiKind::from_ui("T000001"), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UiKind {
    /// Descriptor (main heading), prefix `D`.
    Descriptor,
    /// Supplemental concept record, prefix `C`.
    Supplemental,
    /// Concept, prefix `M`.
    Concept,
    /// Qualifier (subheading), prefix `Q`.
    Qualifier,
}

impl UiKind {
    /// Classifies a UI by its prefix character.
    ///
    /// Returns `None` for an empty UI or an unknown prefix.
    pub fn from_ui(ui: &str) -> Option<Self> {
        match ui.chars().next()? {
            'D' => Some(Self::Descriptor),
            'C' => Some(Self::Supplemental),
            'M' => Some(Self::Concept),
            'Q' => Some(Self::Qualifier),
            _ => None,
        }
    }

    /// Returns the prefix character for this kind.
    pub fn prefix(self) -> char {
        match self {
            Self::Descriptor => 'D',
            Self::Supplemental => 'C',
            Self::Concept => 'M',
            Self::Qualifier => 'Q',
        }
    }
}

impl std::fmt::Display for UiKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Descriptor => "descriptor",
            Self::Supplemental => "supplemental",
            Self::Concept => "concept",
            Self::Qualifier => "qualifier",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_ui() {
        assert_eq!(UiKind::from_ui("D016780"), Some(UiKind::Descriptor));
        assert_eq!(UiKind::from_ui("C000002"), Some(UiKind::Supplemental));
        assert_eq!(UiKind::from_ui("M0353609"), Some(UiKind::Concept));
        assert_eq!(UiKind::from_ui("Q000000981"), Some(UiKind::Qualifier));
        assert_eq!(UiKind::from_ui("T000001"), None);
        assert_eq!(UiKind::from_ui(""), None);
    }

    #[test]
    fn test_prefix_matches_classification() {
        for kind in [
            UiKind::Descriptor,
            UiKind::Supplemental,
            UiKind::Concept,
            UiKind::Qualifier,
        ] {
            let ui = format!("{}000001", kind.prefix());
            assert_eq!(UiKind::from_ui(&ui), Some(kind));
        }
    }
}
