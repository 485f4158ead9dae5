//! Minimal XML plumbing: an owned element tree for reading, and indented
//! element writers.

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::{ProtocolError, ProtocolResult};

/// An element with its text content and child elements. Attributes are
/// not used by the model's documents and are dropped.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Element {
    pub name: String,
    pub text: String,
    pub children: Vec<Element>,
}

impl Element {
    fn new(name: String) -> Self {
        Self {
            name,
            text: String::new(),
            children: Vec::new(),
        }
    }

    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn required_child(&self, name: &str) -> ProtocolResult<&Element> {
        self.child(name).ok_or_else(|| {
            ProtocolError::MalformedDocument(format!("<{}> lacks <{}>", self.name, name))
        })
    }

    pub fn text(&self) -> &str {
        self.text.trim()
    }
}

/// Parse a document into its root element.
pub(crate) fn parse_tree(xml: &str) -> ProtocolResult<Element> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut buf = Vec::new();
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                stack.push(Element::new(String::from_utf8_lossy(e.name().as_ref()).into_owned()));
            }
            Ok(Event::Empty(e)) => {
                let element = Element::new(String::from_utf8_lossy(e.name().as_ref()).into_owned());
                attach(element, &mut stack, &mut root)?;
            }
            Ok(Event::Text(t)) => {
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&t.unescape()?);
                }
            }
            Ok(Event::CData(c)) => {
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&String::from_utf8_lossy(&c.into_inner()));
                }
            }
            Ok(Event::End(_)) => {
                let element = stack.pop().ok_or_else(|| {
                    ProtocolError::MalformedDocument("unbalanced closing tag".to_string())
                })?;
                attach(element, &mut stack, &mut root)?;
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(ProtocolError::Xml(format!(
                    "at position {}: {}",
                    reader.buffer_position(),
                    e
                )))
            }
        }
        buf.clear();
    }

    if let Some(open) = stack.last() {
        return Err(ProtocolError::MalformedDocument(format!(
            "unclosed element <{}>",
            open.name
        )));
    }
    root.ok_or_else(|| ProtocolError::MalformedDocument("no root element".to_string()))
}

fn attach(
    element: Element,
    stack: &mut [Element],
    root: &mut Option<Element>,
) -> ProtocolResult<()> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(element);
        return Ok(());
    }
    if root.is_some() {
        return Err(ProtocolError::MalformedDocument(
            "more than one root element".to_string(),
        ));
    }
    *root = Some(element);
    Ok(())
}

pub(crate) const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";

/// Write `<name>text</name>` on its own line.
pub(crate) fn push_element(xml: &mut String, depth: usize, name: &str, text: &str) {
    xml.push_str(&format!(
        "{}<{}>{}</{}>\n",
        "  ".repeat(depth),
        name,
        quick_xml::escape::escape(text),
        name
    ));
}

pub(crate) fn open(xml: &mut String, depth: usize, name: &str) {
    xml.push_str(&format!("{}<{}>\n", "  ".repeat(depth), name));
}

pub(crate) fn close(xml: &mut String, depth: usize, name: &str) {
    xml.push_str(&format!("{}</{}>\n", "  ".repeat(depth), name));
}

/// Values are written with two decimals, enough for every model unit.
pub(crate) fn format_value(value: f64) -> String {
    format!("{:.2}", value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tree() {
        let root = parse_tree("<?xml version=\"1.0\"?><a><b>1 &amp; 2</b><c/><b>3</b></a>").unwrap();
        assert_eq!(root.name, "a");
        assert_eq!(root.children.len(), 3);
        assert_eq!(root.child("b").map(|b| b.text()), Some("1 & 2"));
        assert!(root.required_child("d").is_err());
    }

    #[test]
    fn test_unbalanced_documents() {
        assert!(parse_tree("<a><b></a>").is_err());
        assert!(matches!(
            parse_tree("<a><b>"),
            Err(ProtocolError::MalformedDocument(_))
        ));
        assert!(matches!(
            parse_tree("<a/><b/>"),
            Err(ProtocolError::MalformedDocument(_))
        ));
        assert!(matches!(
            parse_tree(""),
            Err(ProtocolError::MalformedDocument(_))
        ));
    }

    #[test]
    fn test_push_element_escapes() {
        let mut xml = String::new();
        push_element(&mut xml, 1, "road-station", "a<b");
        assert_eq!(xml, "  <road-station>a&lt;b</road-station>\n");
    }
}
