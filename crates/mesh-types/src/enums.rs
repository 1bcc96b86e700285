//! MeSH enumeration types.
//!
//! This module provides enum representations for the coded attribute values
//! found in MeSH XML records: record classes, concept relation names, term
//! lexical tags and entry combination types.
//!
//! Every enumeration parses through `from_code`, which returns `None` for a
//! missing or unknown code instead of failing, so optional attributes that
//! drift between MeSH releases never abort a parse.

/// Class of a descriptor record (`DescriptorClass` attribute).
///
/// # Examples
///
/// ```
/// use mesh_types::DescriptorClass;
///
/// assert_eq!(DescriptorClass::from_code("1"), Some(DescriptorClass::Topical));
/// assert_eq!(DescriptorClass::from_code("9"), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DescriptorClass {
    /// Topical descriptor (class 1).
    Topical,
    /// Publication type (class 2).
    PublicationType,
    /// Check tag (class 3).
    CheckTag,
    /// Geographic descriptor (class 4).
    Geographic,
}

impl DescriptorClass {
    /// Creates a DescriptorClass from its attribute code.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "1" => Some(Self::Topical),
            "2" => Some(Self::PublicationType),
            "3" => Some(Self::CheckTag),
            "4" => Some(Self::Geographic),
            _ => None,
        }
    }

    /// Returns the attribute code for this class.
    pub fn to_code(self) -> &'static str {
        match self {
            Self::Topical => "1",
            Self::PublicationType => "2",
            Self::CheckTag => "3",
            Self::Geographic => "4",
        }
    }
}

/// Class of a supplemental concept record (`SCRClass` attribute).
///
/// # Examples
///
/// ```
/// use mesh_types::SupplementalClass;
///
/// assert_eq!(SupplementalClass::from_code("1"), Some(SupplementalClass::Chemical));
/// assert_eq!(SupplementalClass::Disease.to_code(), "3");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SupplementalClass {
    /// Chemical or drug (class 1).
    Chemical,
    /// Protocol (class 2).
    Protocol,
    /// Rare disease (class 3).
    Disease,
    /// Organism (class 4).
    Organism,
}

impl SupplementalClass {
    /// Creates a SupplementalClass from its attribute code.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "1" => Some(Self::Chemical),
            "2" => Some(Self::Protocol),
            "3" => Some(Self::Disease),
            "4" => Some(Self::Organism),
            _ => None,
        }
    }

    /// Returns the attribute code for this class.
    pub fn to_code(self) -> &'static str {
        match self {
            Self::Chemical => "1",
            Self::Protocol => "2",
            Self::Disease => "3",
            Self::Organism => "4",
        }
    }
}

/// Relation between two concepts of the same record (`RelationName`).
///
/// # Examples
///
/// ```
/// use mesh_types::RelationName;
///
/// assert_eq!(RelationName::from_code("NRW"), Some(RelationName::Narrower));
/// assert_eq!(RelationName::from_code(""), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RelationName {
    /// Concept 2 is narrower than concept 1.
    Narrower,
    /// Concept 2 is broader than concept 1.
    Broader,
    /// Concepts are related but neither broader nor narrower.
    Related,
}

impl RelationName {
    /// Creates a RelationName from its attribute code.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "NRW" => Some(Self::Narrower),
            "BRD" => Some(Self::Broader),
            "REL" => Some(Self::Related),
            _ => None,
        }
    }

    /// Returns the attribute code for this relation.
    pub fn to_code(self) -> &'static str {
        match self {
            Self::Narrower => "NRW",
            Self::Broader => "BRD",
            Self::Related => "REL",
        }
    }
}

/// Lexical category of a term (`LexicalTag` attribute).
///
/// # Examples
///
/// ```
/// use mesh_types::LexicalTag;
///
/// assert_eq!(LexicalTag::from_code("NON"), Some(LexicalTag::None));
/// assert_eq!(LexicalTag::from_code("Frelex"), Some(LexicalTag::Frelex));
/// assert_eq!(LexicalTag::from_code("XYZ"), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LexicalTag {
    /// Abbreviation.
    Abbreviation,
    /// Embedded abbreviation.
    EmbeddedAbbreviation,
    /// Acronym.
    Acronym,
    /// Embedded acronym.
    EmbeddedAcronym,
    /// Eponym.
    Eponym,
    /// Lab number.
    LabNumber,
    /// Proper name.
    ProperName,
    /// No lexical tag applies.
    None,
    /// Trade name.
    TradeName,
    /// Foreign-language term imported from a translation.
    Frelex,
}

impl LexicalTag {
    /// Creates a LexicalTag from its attribute code.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "ABB" => Some(Self::Abbreviation),
            "ABX" => Some(Self::EmbeddedAbbreviation),
            "ACR" => Some(Self::Acronym),
            "ACX" => Some(Self::EmbeddedAcronym),
            "EPO" => Some(Self::Eponym),
            "LAB" => Some(Self::LabNumber),
            "NAM" => Some(Self::ProperName),
            "NON" => Some(Self::None),
            "TRD" => Some(Self::TradeName),
            "Frelex" => Some(Self::Frelex),
            _ => None,
        }
    }

    /// Returns the attribute code for this tag.
    pub fn to_code(self) -> &'static str {
        match self {
            Self::Abbreviation => "ABB",
            Self::EmbeddedAbbreviation => "ABX",
            Self::Acronym => "ACR",
            Self::EmbeddedAcronym => "ACX",
            Self::Eponym => "EPO",
            Self::LabNumber => "LAB",
            Self::ProperName => "NAM",
            Self::None => "NON",
            Self::TradeName => "TRD",
            Self::Frelex => "Frelex",
        }
    }
}

/// Side of a descriptor entry combination.
///
/// `ECIN` is the descriptor/qualifier pair that must not be used; `ECOUT`
/// is the heading to use in its place.
///
/// # Examples
///
/// ```
/// use mesh_types::EntryCombinationType;
///
/// assert_eq!(EntryCombinationType::from_code("ECOUT"), Some(EntryCombinationType::Out));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EntryCombinationType {
    /// The combination being replaced (`ECIN`).
    In,
    /// The replacement heading (`ECOUT`).
    Out,
}

impl EntryCombinationType {
    /// Creates an EntryCombinationType from its element name.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "ECIN" => Some(Self::In),
            "ECOUT" => Some(Self::Out),
            _ => None,
        }
    }

    /// Returns the element name for this side.
    pub fn to_code(self) -> &'static str {
        match self {
            Self::In => "ECIN",
            Self::Out => "ECOUT",
        }
    }
}
