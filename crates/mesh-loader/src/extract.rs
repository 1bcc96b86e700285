//! Text and attribute extractors.
//!
//! All extractors take an optional node and never fail: a missing node,
//! unset attribute or whitespace-only content is simply `None`.

use chrono::NaiveDate;

use crate::element::Element;

/// Returns the trimmed text of an element.
pub fn text(element: Option<&Element>) -> Option<String> {
    non_empty(element?.text())
}

/// Returns the trimmed value of an attribute.
pub fn attribute(element: Option<&Element>, name: &str) -> Option<String> {
    non_empty(element?.attribute(name)?)
}

/// Returns the trimmed text of the `<String>` child of an element.
///
/// MeSH wraps every name (`DescriptorName`, `ConceptName`, ...) this way.
pub fn string_child(element: Option<&Element>) -> Option<String> {
    text(element?.child("String"))
}

/// Returns the text of a named child element.
pub fn child_text(element: Option<&Element>, name: &str) -> Option<String> {
    text(element?.child(name))
}

/// Parses a `Year`/`Month`/`Day` triple.
///
/// All three parts must be present, consist of ASCII digits only and form
/// a valid calendar date.
pub fn date(element: Option<&Element>) -> Option<NaiveDate> {
    let element = element?;
    let year = digits(element.child("Year"))?;
    let month = digits(element.child("Month"))?;
    let day = digits(element.child("Day"))?;

    NaiveDate::from_ymd_opt(
        year.parse().ok()?,
        month.parse().ok()?,
        day.parse().ok()?,
    )
}

/// Normalizes a `Y`/`N` flag.
pub fn yes_no(value: Option<&str>) -> Option<bool> {
    match value? {
        "Y" => Some(true),
        "N" => Some(false),
        _ => None,
    }
}

/// Removes the `*` markers MeSH puts around non-current reference UIs.
pub fn strip_marker(ui: &str) -> &str {
    ui.trim_matches('*')
}

fn digits(element: Option<&Element>) -> Option<String> {
    let value = text(element)?;
    value.bytes().all(|b| b.is_ascii_digit()).then_some(value)
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
