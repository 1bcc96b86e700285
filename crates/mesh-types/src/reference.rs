//! Cross-record references.
//!
//! A reference points at another MeSH record by UI. References are resolved
//! to storage keys only at ingestion time; the target may not exist yet.

/// Pointer to a descriptor (`DescriptorReferredTo`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DescriptorReference {
    /// UI of the referenced descriptor, without any `*` marker.
    pub ui: Option<String>,
    /// Name of the referenced descriptor.
    pub name: Option<String>,
}

/// Pointer to a qualifier (`QualifierReferredTo`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QualifierReference {
    /// UI of the referenced qualifier, without any `*` marker.
    pub ui: Option<String>,
    /// Name of the referenced qualifier.
    pub name: Option<String>,
}

/// A descriptor/qualifier pairing.
///
/// Used for both sides of an entry combination as well as for the
/// `HeadingMappedTo` and `IndexingInformation` entries of supplemental
/// records. The qualifier is frequently absent.
///
/// # Examples
///
/// ```
/// use mesh_types::{DescriptorReference, HeadingPair};
///
/// let pair = HeadingPair {
///     descriptor: DescriptorReference {
///         ui: Some("D001561".to_string()),
///         name: Some("Benzilates".to_string()),
///     },
///     ..Default::default()
/// };
///
/// assert!(!pair.has_qualifier());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HeadingPair {
    /// The descriptor side of the pair.
    pub descriptor: DescriptorReference,
    /// The qualifier side of the pair.
    pub qualifier: QualifierReference,
}

impl HeadingPair {
    /// Returns true if the pair names a qualifier.
    pub fn has_qualifier(&self) -> bool {
        self.qualifier.ui.is_some()
    }
}

/// One `EntryCombination`: the `ECIN` pair and its `ECOUT` replacement.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntryCombination {
    /// The combination that should not be used.
    pub entry_in: HeadingPair,
    /// The heading to use instead.
    pub entry_out: HeadingPair,
}

/// One `AllowableQualifier` of a descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AllowableQualifier {
    /// The qualifier that may be combined with the descriptor.
    pub qualifier: QualifierReference,
    /// Two-letter abbreviation of the qualifier.
    pub abbreviation: Option<String>,
}
