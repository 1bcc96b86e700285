//! Owned XML element tree.
//!
//! The streaming generator materializes one record at a time into this
//! minimal tree; the sub-structure parsers read from it.

/// An XML element with its attributes, direct text and child elements.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    text: String,
    children: Vec<Element>,
}

impl Element {
    /// Creates an element with the given tag name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Adds an attribute.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Appends text content.
    pub fn with_text(mut self, text: &str) -> Self {
        self.text.push_str(text);
        self
    }

    /// Appends a child element.
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub(crate) fn push_attribute(&mut self, name: String, value: String) {
        self.attributes.push((name, value));
    }

    pub(crate) fn push_text(&mut self, text: &str) {
        self.text.push_str(text);
    }

    pub(crate) fn push_child(&mut self, child: Element) {
        self.children.push(child);
    }

    /// Returns the tag name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the raw text directly inside this element.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the value of an attribute, if set.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Returns the first child with the given tag name.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|child| child.name == name)
    }

    /// Iterates over children with the given tag name.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.children.iter().filter(move |child| child.name == name)
    }

    /// Returns all child elements.
    pub fn children(&self) -> &[Element] {
        &self.children
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_reference() -> Element {
        Element::new("DescriptorReferredTo")
            .with_child(Element::new("DescriptorUI").with_text("D000900"))
            .with_child(
                Element::new("DescriptorName")
                    .with_child(Element::new("String").with_text("Anti-Bacterial Agents")),
            )
    }

    #[test]
    fn test_child_lookup() {
        let element = make_reference();
        assert_eq!(element.child("DescriptorUI").unwrap().text(), "D000900");
        assert!(element.child("QualifierUI").is_none());
        assert_eq!(element.children().len(), 2);
    }

    #[test]
    fn test_children_named() {
        let list = Element::new("TreeNumberList")
            .with_child(Element::new("TreeNumber").with_text("Y04.010"))
            .with_child(Element::new("Other"))
            .with_child(Element::new("TreeNumber").with_text("Y04.011"));

        let texts: Vec<&str> = list.children_named("TreeNumber").map(Element::text).collect();
        assert_eq!(texts, vec!["Y04.010", "Y04.011"]);
    }

    #[test]
    fn test_attribute() {
        let element = Element::new("Concept").with_attribute("PreferredConceptYN", "Y");
        assert_eq!(element.attribute("PreferredConceptYN"), Some("Y"));
        assert_eq!(element.attribute("Missing"), None);
    }
}
