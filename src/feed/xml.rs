//! Minimal XML element tree built on quick-xml.
//!
//! Feeds differ in which elements carry attributes, text or children, so the
//! parser works on a generic tree and decides per field what shape it got.

use quick_xml::escape::{resolve_html5_entity, unescape_with};
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::{NewsError, Result};

/// One XML element with its attributes, text content and child elements.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlElement {
    /// Qualified name, prefix included (e.g. `media:content`).
    pub name: String,
    pub attributes: Vec<(String, String)>,
    /// Concatenated text and CDATA content, trimmed.
    pub text: String,
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    /// Value of the attribute `key`, if present.
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// First child named `name`.
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.name == name)
    }

    /// All children named `name`, in document order.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Text of the first child named `name`.
    pub fn child_text(&self, name: &str) -> Option<String> {
        self.child(name).map(|c| c.text.clone())
    }

    pub fn has_attributes(&self) -> bool {
        !self.attributes.is_empty()
    }
}

/// Deepest element nesting accepted. RSS needs four levels
/// (`rss/channel/item/field`); the rest is headroom for embedded markup.
pub const MAX_DEPTH: usize = 64;

/// Parse a document and return its root element.
///
/// Documents nested deeper than [`MAX_DEPTH`] are rejected.
pub fn parse_document(bytes: &[u8]) -> Result<XmlElement> {
    let mut reader = Reader::from_reader(bytes);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                if stack.len() >= MAX_DEPTH {
                    return Err(NewsError::Parse(format!(
                        "nesting too deep at position {} (max {MAX_DEPTH})",
                        reader.buffer_position()
                    )));
                }
                stack.push(start_element(&e)?);
            }
            Ok(Event::Empty(e)) => {
                let element = start_element(&e)?;
                attach(&mut stack, &mut root, element);
            }
            Ok(Event::End(_)) => {
                // quick-xml rejects mismatched end tags itself
                if let Some(element) = stack.pop() {
                    attach(&mut stack, &mut root, element);
                }
            }
            Ok(Event::Text(e)) => {
                if let Some(current) = stack.last_mut() {
                    let text = e
                        .unescape_with(resolve_html5_entity)
                        .map(|t| t.into_owned())
                        .unwrap_or_else(|_| unescape_lenient(&String::from_utf8_lossy(&e)));
                    push_text(&mut current.text, text.trim());
                }
            }
            Ok(Event::CData(e)) => {
                if let Some(current) = stack.last_mut() {
                    let text = String::from_utf8_lossy(&e).into_owned();
                    push_text(&mut current.text, text.trim());
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(NewsError::Parse(format!(
                    "XML error at position {}: {}",
                    reader.buffer_position(),
                    e
                )))
            }
            _ => {}
        }
        buf.clear();
    }

    if let Some(open) = stack.last() {
        return Err(NewsError::Parse(format!(
            "unexpected end of document inside <{}>",
            open.name
        )));
    }

    root.ok_or_else(|| NewsError::Parse("document has no root element".to_string()))
}

fn start_element(e: &BytesStart<'_>) -> Result<XmlElement> {
    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();

    let mut attributes = Vec::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|err| NewsError::Parse(format!("bad attribute in <{name}>: {err}")))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value_with(resolve_html5_entity)
            .map(|v| v.into_owned())
            .unwrap_or_else(|_| unescape_lenient(&String::from_utf8_lossy(&attr.value)));
        attributes.push((key, value));
    }

    Ok(XmlElement {
        name,
        attributes,
        ..Default::default()
    })
}

fn attach(stack: &mut [XmlElement], root: &mut Option<XmlElement>, element: XmlElement) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None => {
            if root.is_none() {
                *root = Some(element);
            }
        }
    }
}

fn push_text(target: &mut String, text: &str) {
    if text.is_empty() {
        return;
    }
    if !target.is_empty() {
        target.push(' ');
    }
    target.push_str(text);
}

/// Resolve each `&...;` reference on its own, keeping the ones that do not
/// resolve as literal text.
fn unescape_lenient(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(start) = rest.find('&') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];

        let reference = tail
            .find(';')
            .map(|end| &tail[..=end])
            .filter(|r| !r[1..].contains('&') && !r.contains(char::is_whitespace));

        match reference {
            Some(reference) => {
                match unescape_with(reference, resolve_html5_entity) {
                    Ok(resolved) => out.push_str(&resolved),
                    Err(_) => out.push_str(reference),
                }
                rest = &tail[reference.len()..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    out
}
