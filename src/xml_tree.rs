//! Generic XML-to-tree decoding.
//!
//! Produces the loosely-typed tree the extractor consumes, following the
//! usual "explicit arrays off" conventions:
//!
//! - the root element becomes the single top-level key
//! - an element with no attributes and no child elements becomes its text
//! - otherwise it becomes a mapping with attributes under `"$"`, non-blank
//!   text under `"_"`, and children under their names
//! - a child name seen more than once becomes a sequence in document order
//!
//! A child element named `$` or `_` shares its key with the attributes or
//! text of its parent. When both are present the attributes or text win and
//! the child is dropped.
//!
//! Nothing here knows about credit reports.

use crate::errors::XmlDecodeError;
use crate::tree::{ATTRIBUTES_KEY, TEXT_KEY};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde_json::{Map, Value};

/// An element whose end tag has not been seen yet.
struct OpenElement {
    name: String,
    attributes: Map<String, Value>,
    children: Map<String, Value>,
    text: String,
}

impl OpenElement {
    fn start(start: &BytesStart<'_>) -> Result<Self, XmlDecodeError> {
        let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();

        let mut attributes = Map::new();
        for attribute in start.attributes() {
            let attribute = attribute.map_err(|e| XmlDecodeError::Malformed(e.to_string()))?;
            let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
            let value = attribute
                .unescape_value()
                .map_err(|e| XmlDecodeError::Malformed(e.to_string()))?
                .into_owned();
            attributes.insert(key, Value::String(value));
        }

        Ok(Self {
            name,
            attributes,
            children: Map::new(),
            text: String::new(),
        })
    }

    fn add_child(&mut self, name: String, value: Value) {
        match self.children.get_mut(&name) {
            Some(Value::Array(repeated)) => repeated.push(value),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, value]);
            }
            None => {
                self.children.insert(name, value);
            }
        }
    }

    fn finish(self) -> (String, Value) {
        if self.attributes.is_empty() && self.children.is_empty() {
            return (self.name, Value::String(self.text));
        }

        let mut node = self.children;
        if !self.attributes.is_empty() {
            reserve(&mut node, &self.name, ATTRIBUTES_KEY, Value::Object(self.attributes));
        }
        if !self.text.trim().is_empty() {
            reserve(&mut node, &self.name, TEXT_KEY, Value::String(self.text));
        }
        (self.name, Value::Object(node))
    }
}

fn reserve(node: &mut Map<String, Value>, element: &str, key: &str, value: Value) {
    if node.insert(key.to_string(), value).is_some() {
        tracing::debug!(
            "Dropped child `{}` of `{}`: the key holds the element's own data",
            key,
            element
        );
    }
}

/// Decodes `bytes` into a document tree.
pub fn decode(bytes: &[u8]) -> Result<Value, XmlDecodeError> {
    let xml = std::str::from_utf8(bytes).map_err(|_| XmlDecodeError::Encoding)?;
    let xml = xml.trim_start_matches('\u{feff}');
    if xml.trim().is_empty() {
        return Err(XmlDecodeError::Empty);
    }

    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<OpenElement> = Vec::new();
    let mut root: Option<(String, Value)> = None;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| XmlDecodeError::Malformed(e.to_string()))?;

        match event {
            Event::Start(start) => {
                if root.is_some() && stack.is_empty() {
                    return Err(XmlDecodeError::Malformed(
                        "more than one root element".to_string(),
                    ));
                }
                stack.push(OpenElement::start(&start)?);
            }
            Event::Empty(start) => {
                if root.is_some() && stack.is_empty() {
                    return Err(XmlDecodeError::Malformed(
                        "more than one root element".to_string(),
                    ));
                }
                let element = OpenElement::start(&start)?;
                close(element, &mut stack, &mut root);
            }
            Event::End(_) => {
                let element = stack.pop().ok_or_else(|| {
                    XmlDecodeError::Malformed("closing tag without an open element".to_string())
                })?;
                close(element, &mut stack, &mut root);
            }
            Event::Text(text) => {
                if let Some(open) = stack.last_mut() {
                    let unescaped = text
                        .unescape()
                        .map_err(|e| XmlDecodeError::Malformed(e.to_string()))?;
                    open.text.push_str(&unescaped);
                }
            }
            Event::CData(data) => {
                if let Some(open) = stack.last_mut() {
                    open.text.push_str(&String::from_utf8_lossy(&data.into_inner()));
                }
            }
            Event::Eof => break,
            // Declarations, comments, processing instructions and doctypes
            // carry no document data.
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(XmlDecodeError::Malformed(format!(
            "element `{}` is never closed",
            open.name
        )));
    }

    let (name, value) = root
        .ok_or_else(|| XmlDecodeError::Malformed("no root element".to_string()))?;
    let mut document = Map::new();
    document.insert(name, value);
    Ok(Value::Object(document))
}

fn close(element: OpenElement, stack: &mut [OpenElement], root: &mut Option<(String, Value)>) {
    let (name, value) = element.finish();
    match stack.last_mut() {
        Some(parent) => parent.add_child(name, value),
        None => *root = Some((name, value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plain_elements_become_text() {
        let tree = decode(b"<Root><Name>Asha</Name><Empty/><Blank></Blank></Root>").unwrap();

        assert_eq!(tree, json!({"Root": {"Name": "Asha", "Empty": "", "Blank": ""}}));
    }

    #[test]
    fn test_repeated_children_become_sequences() {
        let tree = decode(b"<R><A>1</A><B>x</B><A>2</A><A>3</A></R>").unwrap();

        assert_eq!(tree["R"]["A"], json!(["1", "2", "3"]));
        assert_eq!(tree["R"]["B"], json!("x"));
    }

    #[test]
    fn test_attributes_and_text() {
        let tree = decode(br#"<R><Amt currency="INR">1250</Amt><Flag on="1"/></R>"#).unwrap();

        assert_eq!(tree["R"]["Amt"], json!({"$": {"currency": "INR"}, "_": "1250"}));
        assert_eq!(tree["R"]["Flag"], json!({"$": {"on": "1"}}));
    }

    #[test]
    fn test_reserved_child_names() {
        let tree = decode(br#"<R a="1">t<_>child</_><B/></R>"#).unwrap();
        assert_eq!(tree["R"], json!({"$": {"a": "1"}, "_": "t", "B": ""}));

        let tree = decode(b"<R><_>child</_><B/></R>").unwrap();
        assert_eq!(tree["R"], json!({"_": "child", "B": ""}));
    }

    #[test]
    fn test_entities_and_cdata() {
        let tree = decode(b"<R><N>A &amp; B</N><C><![CDATA[<raw>]]></C></R>").unwrap();

        assert_eq!(tree["R"]["N"], json!("A & B"));
        assert_eq!(tree["R"]["C"], json!("<raw>"));
    }

    #[test]
    fn test_declaration_and_comments_ignored() {
        let xml = b"<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<!-- bureau export -->\n<R><A>1</A></R>\n";
        let tree = decode(xml).unwrap();

        assert_eq!(tree, json!({"R": {"A": "1"}}));
    }

    #[test]
    fn test_rejects_broken_documents() {
        assert_eq!(decode(b""), Err(XmlDecodeError::Empty));
        assert_eq!(decode(b"   \n"), Err(XmlDecodeError::Empty));
        assert_eq!(decode(&[0x3c, 0xff, 0xfe]), Err(XmlDecodeError::Encoding));
        assert!(matches!(decode(b"<R><A>1</A>"), Err(XmlDecodeError::Malformed(_))));
        assert!(matches!(decode(b"<R></S>"), Err(XmlDecodeError::Malformed(_))));
        assert!(matches!(decode(b"<R/><S/>"), Err(XmlDecodeError::Malformed(_))));
        assert!(matches!(decode(b"just text"), Err(XmlDecodeError::Malformed(_))));
    }
}
