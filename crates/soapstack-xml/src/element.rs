//! The parsed XML element tree the engine operates on.
//!
//! The engine is not a general XML library: namespaces are handled only
//! to the extent of stripping prefixes so children and attributes can be
//! located by local name.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::error::DecodeError;

/// A parsed XML element: name, text content, ordered children, and
/// attributes in document order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct XmlElement {
    /// Local tag name (namespace prefix stripped).
    pub name: String,
    /// Concatenated, unescaped text content.
    pub text: String,
    /// Child elements in document order.
    pub children: Vec<XmlElement>,
    /// Attributes as (qualified name, unescaped value) pairs.
    pub attributes: Vec<(String, String)>,
}

impl XmlElement {
    /// An empty element with the given tag name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Parse an XML document (or fragment with a single root) into an
    /// element tree. Skips any declaration, comments, and processing
    /// instructions before the root.
    pub fn parse(xml: &str) -> Result<Self, DecodeError> {
        let mut reader = Reader::from_reader(xml.as_bytes());

        loop {
            match reader.read_event()? {
                Event::Start(start) => return read_element(&mut reader, &start),
                Event::Empty(start) => return element_from_start(&start),
                Event::Eof => {
                    return Err(DecodeError::Malformed("missing root element".to_owned()));
                }
                _ => {}
            }
        }
    }

    /// Look an attribute up by local name, so `type` matches both
    /// `type="T"` and `xsi:type="T"`.
    #[must_use]
    pub fn attribute(&self, local: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| local_name(key) == local)
            .map(|(_, value)| value.as_str())
    }

    /// Deterministic compact string form of the element, used as a cache
    /// key component for memoized decoding.
    #[must_use]
    pub fn canonical(&self) -> String {
        let mut out = String::new();
        self.write_canonical(&mut out);
        out
    }

    fn write_canonical(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.name);
        for (key, value) in &self.attributes {
            out.push(' ');
            out.push_str(key);
            out.push_str("=\"");
            out.push_str(value);
            out.push('"');
        }
        out.push('>');
        out.push_str(&self.text);
        for child in &self.children {
            child.write_canonical(out);
        }
        out.push_str("</");
        out.push_str(&self.name);
        out.push('>');
    }
}

/// Strip a namespace prefix from a qualified name.
fn local_name(qualified: &str) -> &str {
    qualified.rsplit(':').next().unwrap_or(qualified)
}

fn element_from_start(start: &BytesStart<'_>) -> Result<XmlElement, DecodeError> {
    let name = start.name();
    let qualified = std::str::from_utf8(name.as_ref())
        .map_err(|e| DecodeError::Malformed(e.to_string()))?;
    let mut element = XmlElement::new(local_name(qualified));

    for attribute in start.attributes() {
        let attribute = attribute.map_err(|e| DecodeError::Malformed(e.to_string()))?;
        let key = std::str::from_utf8(attribute.key.as_ref())
            .map_err(|e| DecodeError::Malformed(e.to_string()))?;
        let raw = std::str::from_utf8(&attribute.value)
            .map_err(|e| DecodeError::Malformed(e.to_string()))?;
        let value = quick_xml::escape::unescape(raw)
            .map_err(|e| DecodeError::Malformed(e.to_string()))?;
        element
            .attributes
            .push((key.to_owned(), value.into_owned()));
    }

    Ok(element)
}

fn read_element(
    reader: &mut Reader<&[u8]>,
    start: &BytesStart<'_>,
) -> Result<XmlElement, DecodeError> {
    let mut element = element_from_start(start)?;

    loop {
        match reader.read_event()? {
            Event::Start(child) => {
                let child = read_element(reader, &child)?;
                element.children.push(child);
            }
            Event::Empty(child) => {
                element.children.push(element_from_start(&child)?);
            }
            Event::Text(text) => {
                let decoded = text
                    .decode()
                    .map_err(|e| DecodeError::Malformed(e.to_string()))?;
                let unescaped = quick_xml::escape::unescape(&decoded)
                    .map_err(|e| DecodeError::Malformed(e.to_string()))?;
                element.text.push_str(&unescaped);
            }
            Event::GeneralRef(reference) => {
                // quick-xml emits entity/character references as their own
                // events; reassemble `&name;` and unescape so the text stays
                // a single concatenated, unescaped run.
                let name = reference
                    .decode()
                    .map_err(|e| DecodeError::Malformed(e.to_string()))?;
                let reference = format!("&{name};");
                let unescaped = quick_xml::escape::unescape(&reference)
                    .map_err(|e| DecodeError::Malformed(e.to_string()))?;
                element.text.push_str(&unescaped);
            }
            Event::End(_) => {
                let trimmed = element.text.trim();
                if trimmed.len() != element.text.len() {
                    element.text = trimmed.to_owned();
                }
                return Ok(element);
            }
            Event::Eof => {
                return Err(DecodeError::Malformed(format!(
                    "unexpected EOF inside element {}",
                    element.name
                )));
            }
            _ => {}
        }
    }
}
