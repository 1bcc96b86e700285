//! Streaming XML element generator.
//!
//! MeSH dumps are several hundred megabytes of XML, so records are pulled
//! from a `quick_xml` event reader one at a time. Only the subtree of the
//! record currently being read is materialized; it is handed to the caller
//! when its end tag arrives and nothing of it is kept afterwards.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use flate2::read::GzDecoder;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::element::Element;
use crate::types::{MeshError, MeshResult};

/// Opens an XML file for streaming, decompressing `.gz` files on the fly.
///
/// # Errors
/// Returns `MeshError::FileNotFound` if the path does not exist.
pub fn open_xml<P: AsRef<Path>>(path: P) -> MeshResult<Box<dyn BufRead>> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(MeshError::FileNotFound {
            path: path.display().to_string(),
        });
    }

    let file = File::open(path)?;
    let is_gzip = path
        .extension()
        .is_some_and(|extension| extension.eq_ignore_ascii_case("gz"));

    if is_gzip {
        tracing::debug!("Opening gzip-compressed XML file {}", path.display());
        Ok(Box::new(BufReader::new(GzDecoder::new(file))))
    } else {
        tracing::debug!("Opening XML file {}", path.display());
        Ok(Box::new(BufReader::new(file)))
    }
}

/// A lazy, forward-only sequence of elements with a given tag name.
///
/// The document root is never yielded, even when it carries the target tag.
/// Elements with the target tag nested inside a match belong to that match.
/// After an error the stream is exhausted.
///
/// # Example
///
/// ```
/// use mesh_loader::ElementStream;
///
/// let xml = "<Set><Record><UI>D1</UI></Record><Record><UI>D2</UI></Record></Set>";
/// let uis: Vec<String> = ElementStream::new(xml.as_bytes(), "Record")
///     .map(|element| element.unwrap().child("UI").unwrap().text().to_string())
///     .collect();
///
/// assert_eq!(uis, vec!["D1", "D2"]);
/// ```
pub struct ElementStream<R: BufRead> {
    reader: Reader<R>,
    tag: String,
    buf: Vec<u8>,
    open_tags: Vec<String>,
    partial: Vec<Element>,
    elements_read: usize,
    finished: bool,
}

impl ElementStream<Box<dyn BufRead>> {
    /// Creates a stream over the elements of an XML file.
    pub fn from_path<P: AsRef<Path>>(path: P, tag: &str) -> MeshResult<Self> {
        let reader = open_xml(path)?;
        Ok(Self::new(reader, tag))
    }
}

impl<R: BufRead> ElementStream<R> {
    /// Creates a stream over the elements of a buffered reader.
    pub fn new(reader: R, tag: &str) -> Self {
        Self {
            reader: Reader::from_reader(reader),
            tag: tag.to_string(),
            buf: Vec::new(),
            open_tags: Vec::new(),
            partial: Vec::new(),
            elements_read: 0,
            finished: false,
        }
    }

    /// Returns the number of elements yielded so far.
    pub fn elements_read(&self) -> usize {
        self.elements_read
    }

    /// Returns the number of elements currently held in memory that belong
    /// to a record not yet yielded.
    ///
    /// This is zero between yields.
    pub fn open_elements(&self) -> usize {
        self.partial.len()
    }

    fn read_next(&mut self) -> MeshResult<Option<Element>> {
        loop {
            self.buf.clear();
            match self.reader.read_event_into(&mut self.buf)? {
                Event::Start(start) => {
                    let name = tag_name(&start);
                    let in_root = !self.open_tags.is_empty();
                    if !self.partial.is_empty() || (in_root && name == self.tag) {
                        self.partial.push(build_element(&start)?);
                    }
                    self.open_tags.push(name);
                }
                Event::Empty(start) => {
                    let element = if let Some(parent) = self.partial.last_mut() {
                        parent.push_child(build_element(&start)?);
                        None
                    } else if !self.open_tags.is_empty() && tag_name(&start) == self.tag {
                        Some(build_element(&start)?)
                    } else {
                        None
                    };

                    if element.is_some() {
                        self.elements_read += 1;
                        return Ok(element);
                    }
                }
                Event::End(_) => {
                    self.open_tags.pop();
                    if let Some(element) = self.partial.pop() {
                        match self.partial.last_mut() {
                            Some(parent) => parent.push_child(element),
                            None => {
                                self.elements_read += 1;
                                return Ok(Some(element));
                            }
                        }
                    }
                }
                Event::Text(text) => {
                    if let Some(current) = self.partial.last_mut() {
                        current.push_text(&text.unescape()?);
                    }
                }
                Event::CData(data) => {
                    if let Some(current) = self.partial.last_mut() {
                        let data = data.decode().map_err(quick_xml::Error::from)?;
                        current.push_text(&data);
                    }
                }
                Event::Eof => {
                    if let Some(tag) = self.open_tags.pop() {
                        return Err(MeshError::UnexpectedEof { tag });
                    }
                    return Ok(None);
                }
                _ => {}
            }
        }
    }
}

impl<R: BufRead> Iterator for ElementStream<R> {
    type Item = MeshResult<Element>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        match self.read_next() {
            Ok(Some(element)) => Some(Ok(element)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(e) => {
                self.finished = true;
                self.partial.clear();
                Some(Err(e))
            }
        }
    }
}

fn tag_name(start: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(start.name().as_ref()).into_owned()
}

fn build_element(start: &BytesStart<'_>) -> MeshResult<Element> {
    let mut element = Element::new(tag_name(start));
    for attribute in start.attributes() {
        let attribute = attribute?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = attribute.unescape_value()?.into_owned();
        element.push_attribute(key, value);
    }
    Ok(element)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use flate2::write::GzEncoder;
    use flate2::Compression;

    fn make_document(count: usize) -> String {
        let mut xml = String::from("<?xml version=\"1.0\"?>\n<RecordSet LanguageCode=\"eng\">\n");
        for i in 0..count {
            xml.push_str(&format!(
                "  <Record Class=\"1\">\n    <UI>D{:06}</UI>\n    <Name><String>Name {}</String></Name>\n  </Record>\n",
                i, i
            ));
        }
        xml.push_str("</RecordSet>\n");
        xml
    }

    #[test]
    fn test_yields_records_in_order() {
        let xml = make_document(3);
        let elements: Vec<Element> = ElementStream::new(xml.as_bytes(), "Record")
            .collect::<MeshResult<_>>()
            .unwrap();

        assert_eq!(elements.len(), 3);
        assert_eq!(elements[0].child("UI").unwrap().text(), "D000000");
        assert_eq!(elements[2].child("UI").unwrap().text(), "D000002");
        assert_eq!(elements[1].attribute("Class"), Some("1"));
        assert_eq!(
            elements[1]
                .child("Name")
                .and_then(|name| name.child("String"))
                .unwrap()
                .text(),
            "Name 1"
        );
    }

    #[test]
    fn test_no_partial_subtree_between_yields() {
        let xml = make_document(50);
        let mut stream = ElementStream::new(xml.as_bytes(), "Record");

        let mut count = 0;
        while let Some(element) = stream.next() {
            element.unwrap();
            assert_eq!(stream.open_elements(), 0);
            count += 1;
            assert_eq!(stream.elements_read(), count);
        }
        assert_eq!(count, 50);
    }

    #[test]
    fn test_root_is_never_yielded() {
        let xml = make_document(2);
        let mut stream = ElementStream::new(xml.as_bytes(), "RecordSet");
        assert!(stream.next().is_none());
    }

    #[test]
    fn test_nested_same_tag_belongs_to_match() {
        let xml = "<Set><Item><Item><UI>inner</UI></Item><UI>outer</UI></Item></Set>";
        let elements: Vec<Element> = ElementStream::new(xml.as_bytes(), "Item")
            .collect::<MeshResult<_>>()
            .unwrap();

        assert_eq!(elements.len(), 1);
        assert_eq!(elements[0].child("UI").unwrap().text(), "outer");
        assert_eq!(
            elements[0].child("Item").unwrap().child("UI").unwrap().text(),
            "inner"
        );
    }

    #[test]
    fn test_self_closing_elements() {
        let xml = "<Set><Record/><Record><ECOUT/></Record></Set>";
        let elements: Vec<Element> = ElementStream::new(xml.as_bytes(), "Record")
            .collect::<MeshResult<_>>()
            .unwrap();

        assert_eq!(elements.len(), 2);
        assert!(elements[0].children().is_empty());
        assert!(elements[1].child("ECOUT").is_some());
    }

    #[test]
    fn test_entities_are_unescaped() {
        let xml = "<Set><Record Note=\"a &amp; b\"><String>isolation &amp; purification</String></Record></Set>";
        let element = ElementStream::new(xml.as_bytes(), "Record")
            .next()
            .unwrap()
            .unwrap();

        assert_eq!(element.attribute("Note"), Some("a & b"));
        assert_eq!(
            element.child("String").unwrap().text(),
            "isolation & purification"
        );
    }

    #[test]
    fn test_cdata_is_text() {
        let xml = "<Set><Record><String><![CDATA[Na+ & K+ <ATPase>]]></String></Record></Set>";
        let element = ElementStream::new(xml.as_bytes(), "Record")
            .next()
            .unwrap()
            .unwrap();

        assert_eq!(element.child("String").unwrap().text(), "Na+ & K+ <ATPase>");
    }

    #[test]
    fn test_invalid_utf8_in_cdata_fails() {
        let xml: &[u8] = b"<Set><Record><String><![CDATA[caf\xff]]></String></Record></Set>";
        let mut stream = ElementStream::new(xml, "Record");

        assert!(matches!(stream.next(), Some(Err(MeshError::Xml(_)))));
        assert!(stream.next().is_none());
    }

    #[test]
    fn test_doctype_is_ignored() {
        let xml = "<?xml version=\"1.0\"?>\n<!DOCTYPE Set SYSTEM \"https://example.org/set.dtd\">\n<Set><Record><UI>Q1</UI></Record></Set>";
        let elements: Vec<Element> = ElementStream::new(xml.as_bytes(), "Record")
            .collect::<MeshResult<_>>()
            .unwrap();
        assert_eq!(elements.len(), 1);
    }

    #[test]
    fn test_mismatched_tags_fail() {
        let xml = "<Set><Record><UI>D1</Name></Record></Set>";
        let mut stream = ElementStream::new(xml.as_bytes(), "Record");
        assert!(stream.next().unwrap().is_err());
        assert!(stream.next().is_none());
    }

    #[test]
    fn test_truncated_document_fails() {
        let xml = "<Set><Record><UI>D1</UI></Record><Record><UI>D2</UI>";
        let results: Vec<MeshResult<Element>> =
            ElementStream::new(xml.as_bytes(), "Record").collect();

        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        assert!(results[1].is_err());
    }

    #[test]
    fn test_from_path_reads_gzip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("desc.xml.gz");

        let file = File::create(&path).unwrap();
        let mut encoder = GzEncoder::new(file, Compression::default());
        encoder.write_all(make_document(4).as_bytes()).unwrap();
        encoder.finish().unwrap();

        let count = ElementStream::from_path(&path, "Record")
            .unwrap()
            .filter(Result::is_ok)
            .count();
        assert_eq!(count, 4);
    }

    #[test]
    fn test_from_path_missing_file() {
        let result = ElementStream::from_path("/nonexistent/desc.xml", "Record");
        assert!(matches!(result, Err(MeshError::FileNotFound { .. })));
    }
}
