//! Owned element tree over a quick-xml event stream.
//!
//! OOXML element order is schema-significant, so mutations are expressed as
//! splices against named sentinel elements on this tree rather than as raw
//! text edits. Whitespace text nodes are preserved so untouched regions of a
//! part serialize back close to their original form.

use crate::error::{Error, Result};
use quick_xml::Reader;
use quick_xml::events::{BytesRef, BytesStart, Event};
use std::fmt::Write as FmtWrite;

/// Standard OOXML part declaration.
pub const XML_DECLARATION: &str =
    "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n";

/// One node of a parsed part: an element or a run of character data.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
}

/// An XML element with its qualified name, attributes in document order, and
/// child nodes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    pub name: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
}

/// A parsed XML part. Serialization always re-emits the standard declaration.
#[derive(Debug, Clone)]
pub struct Document {
    pub root: Element,
}

impl Element {
    /// Create an empty element with the given qualified name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Get an attribute value by qualified name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Set an attribute, replacing an existing value or appending.
    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attrs.iter_mut().find(|(k, _)| k == name) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((name.to_string(), value)),
        }
    }

    /// Iterate over direct child elements.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|n| match n {
            Node::Element(el) => Some(el),
            Node::Text(_) => None,
        })
    }

    /// Iterate over direct child elements with the given qualified name.
    pub fn elements_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.elements().filter(move |el| el.name == name)
    }

    /// Iterate mutably over direct child elements.
    pub fn elements_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.children.iter_mut().filter_map(|n| match n {
            Node::Element(el) => Some(el),
            Node::Text(_) => None,
        })
    }

    /// First direct child element with the given name.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.elements().find(|el| el.name == name)
    }

    /// Mutable first direct child element with the given name.
    pub fn child_mut(&mut self, name: &str) -> Option<&mut Element> {
        self.elements_mut().find(|el| el.name == name)
    }

    /// Visit this element and every descendant element in document order.
    pub fn visit<'a>(&'a self, f: &mut dyn FnMut(&'a Element)) {
        f(self);
        for node in &self.children {
            if let Node::Element(el) = node {
                el.visit(f);
            }
        }
    }

    /// Visit this element and every descendant element mutably.
    pub fn visit_mut(&mut self, f: &mut dyn FnMut(&mut Element)) {
        f(self);
        for node in &mut self.children {
            if let Node::Element(el) = node {
                el.visit_mut(f);
            }
        }
    }

    /// First element (self included) satisfying the predicate, in document
    /// order.
    pub fn find(&self, pred: &dyn Fn(&Element) -> bool) -> Option<&Element> {
        if pred(self) {
            return Some(self);
        }
        for node in &self.children {
            if let Node::Element(el) = node
                && let Some(found) = el.find(pred)
            {
                return Some(found);
            }
        }
        None
    }

    /// Mutable variant of [`Element::find`].
    pub fn find_mut(&mut self, pred: &dyn Fn(&Element) -> bool) -> Option<&mut Element> {
        if pred(self) {
            return Some(self);
        }
        for node in &mut self.children {
            if let Node::Element(el) = node
                && el.find(pred).is_some()
            {
                return el.find_mut(pred);
            }
        }
        None
    }

    /// First descendant (self included) with the given qualified name.
    pub fn descendant(&self, name: &str) -> Option<&Element> {
        self.find(&|el| el.name == name)
    }

    /// Mutable first descendant (self included) with the given name.
    pub fn descendant_mut(&mut self, name: &str) -> Option<&mut Element> {
        self.find_mut(&|el| el.name == name)
    }

    /// Append a child element.
    pub fn push_element(&mut self, el: Element) {
        self.children.push(Node::Element(el));
    }

    /// Insert a child element immediately before the `index`-th element child
    /// (0-based among element children). Appends when out of range.
    pub fn insert_element_before(&mut self, index: usize, el: Element) {
        let mut seen = 0usize;
        for (node_idx, node) in self.children.iter().enumerate() {
            if matches!(node, Node::Element(_)) {
                if seen == index {
                    self.children.insert(node_idx, Node::Element(el));
                    return;
                }
                seen += 1;
            }
        }
        self.children.push(Node::Element(el));
    }

    /// Remove every direct child element satisfying the predicate. Returns
    /// the number removed.
    pub fn remove_elements_where(&mut self, pred: &dyn Fn(&Element) -> bool) -> usize {
        let before = self.children.len();
        self.children.retain(|node| match node {
            Node::Element(el) => !pred(el),
            Node::Text(_) => true,
        });
        before - self.children.len()
    }

    /// Concatenated text of every `a:t` run under this element.
    pub fn gather_text(&self, into: &mut Vec<String>) {
        self.visit(&mut |el| {
            if el.name == "a:t" {
                let mut run = String::new();
                for node in &el.children {
                    if let Node::Text(t) = node {
                        run.push_str(t);
                    }
                }
                into.push(run);
            }
        });
    }

    fn write(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.name);
        for (key, value) in &self.attrs {
            let _ = write!(out, " {}=\"{}\"", key, escape_xml(value));
        }
        if self.children.is_empty() {
            out.push_str("/>");
            return;
        }
        out.push('>');
        for node in &self.children {
            match node {
                Node::Element(el) => el.write(out),
                Node::Text(text) => out.push_str(&escape_text(text)),
            }
        }
        out.push_str("</");
        out.push_str(&self.name);
        out.push('>');
    }
}

impl Document {
    /// Parse a part into an element tree.
    ///
    /// The declaration, comments, and processing instructions are dropped;
    /// the standard OOXML declaration is re-emitted on serialization.
    pub fn parse(xml: &str) -> Result<Document> {
        let mut reader = Reader::from_str(xml);
        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            match reader.read_event() {
                Ok(Event::Start(ref e)) => {
                    stack.push(element_from(e)?);
                },
                Ok(Event::Empty(ref e)) => {
                    let el = element_from(e)?;
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(Node::Element(el)),
                        None if root.is_none() => root = Some(el),
                        None => return Err(Error::Xml("multiple root elements".to_string())),
                    }
                },
                Ok(Event::End(_)) => {
                    let el = stack
                        .pop()
                        .ok_or_else(|| Error::Xml("unbalanced end tag".to_string()))?;
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(Node::Element(el)),
                        None if root.is_none() => root = Some(el),
                        None => return Err(Error::Xml("multiple root elements".to_string())),
                    }
                },
                Ok(Event::Text(ref t)) => {
                    if let Some(parent) = stack.last_mut() {
                        let text = t.xml_content().map_err(|e| Error::Xml(e.to_string()))?;
                        push_text(parent, &text);
                    }
                    // Whitespace outside the root is not significant.
                },
                Ok(Event::CData(ref t)) => {
                    if let Some(parent) = stack.last_mut() {
                        let text = String::from_utf8_lossy(t).into_owned();
                        push_text(parent, &text);
                    }
                },
                Ok(Event::GeneralRef(ref r)) => {
                    // Entity references arrive as their own events; fold
                    // them back into the surrounding character data.
                    if let Some(parent) = stack.last_mut() {
                        let resolved = resolve_reference(r)?;
                        push_text(parent, &resolved);
                    }
                },
                Ok(Event::Decl(_))
                | Ok(Event::Comment(_))
                | Ok(Event::PI(_))
                | Ok(Event::DocType(_)) => {},
                Ok(Event::Eof) => break,
                Err(e) => return Err(Error::Xml(e.to_string())),
            }
        }

        root.map(|root| Document { root })
            .ok_or_else(|| Error::Xml("document has no root element".to_string()))
    }

    /// Serialize back to part markup with the standard declaration.
    pub fn to_xml(&self) -> String {
        let mut out = String::with_capacity(1024);
        out.push_str(XML_DECLARATION);
        self.root.write(&mut out);
        out
    }
}

/// Append character data, merging into a trailing text node so a run split
/// across several reader events stays a single [`Node::Text`].
fn push_text(parent: &mut Element, text: &str) {
    match parent.children.last_mut() {
        Some(Node::Text(existing)) => existing.push_str(text),
        _ => parent.children.push(Node::Text(text.to_string())),
    }
}

/// Resolve a general entity reference to its character data. The five
/// predefined XML entities and numeric character references are supported;
/// anything else is an error rather than silently dropped text.
fn resolve_reference(r: &BytesRef<'_>) -> Result<String> {
    if let Some(ch) = r
        .resolve_char_ref()
        .map_err(|e| Error::Xml(e.to_string()))?
    {
        return Ok(ch.to_string());
    }
    let name = r.decode().map_err(|e| Error::Xml(e.to_string()))?;
    match name.as_ref() {
        "amp" => Ok("&".to_string()),
        "lt" => Ok("<".to_string()),
        "gt" => Ok(">".to_string()),
        "apos" => Ok("'".to_string()),
        "quot" => Ok("\"".to_string()),
        other => Err(Error::Xml(format!("unresolvable entity reference '&{};'", other))),
    }
}

fn element_from(e: &BytesStart<'_>) -> Result<Element> {
    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
    let mut attrs = Vec::new();
    for attr in e.attributes() {
        let attr = attr?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value()?.into_owned();
        attrs.push((key, value));
    }
    Ok(Element {
        name,
        attrs,
        children: Vec::new(),
    })
}

/// Escape XML special characters for attribute values.
pub fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sld xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main">
  <p:cSld>
    <p:spTree>
      <p:sp><p:cNvPr id="2" name="Title 1"/></p:sp>
    </p:spTree>
  </p:cSld>
</p:sld>"#;

    #[test]
    fn test_parse_and_navigate() {
        let doc = Document::parse(SAMPLE).unwrap();
        assert_eq!(doc.root.name, "p:sld");
        let sp = doc.root.descendant("p:sp").unwrap();
        let cnvpr = sp.descendant("p:cNvPr").unwrap();
        assert_eq!(cnvpr.attr("id"), Some("2"));
        assert_eq!(cnvpr.attr("name"), Some("Title 1"));
    }

    #[test]
    fn test_round_trip_preserves_structure() {
        let doc = Document::parse(SAMPLE).unwrap();
        let out = doc.to_xml();
        let again = Document::parse(&out).unwrap();
        assert_eq!(doc.root, again.root);
        // Indentation between elements survives the round trip.
        assert!(out.contains("  <p:cSld>"));
    }

    #[test]
    fn test_escaping() {
        let mut el = Element::new("a:t");
        el.children.push(Node::Text("a < b & \"c\"".to_string()));
        let doc = Document { root: el };
        let out = doc.to_xml();
        assert!(out.contains("a &lt; b &amp; \"c\""));
        let again = Document::parse(&out).unwrap();
        assert_eq!(again.root.children, vec![Node::Text("a < b & \"c\"".to_string())]);
    }

    #[test]
    fn test_entity_references_stay_in_one_text_node() {
        let doc = Document::parse(
            r#"<a:t xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main">Q&amp;A &lt;draft&gt; &#169; &#x41;</a:t>"#,
        )
        .unwrap();
        assert_eq!(
            doc.root.children,
            vec![Node::Text("Q&A <draft> \u{a9} A".to_string())]
        );
    }

    #[test]
    fn test_unresolvable_entity_is_an_error() {
        assert!(Document::parse("<a:t>&nbsp;</a:t>").is_err());
    }

    #[test]
    fn test_insert_element_before() {
        let mut list = Element::new("p:sldIdLst");
        for id in ["256", "257"] {
            let mut e = Element::new("p:sldId");
            e.set_attr("id", id);
            list.push_element(e);
        }
        let mut inserted = Element::new("p:sldId");
        inserted.set_attr("id", "258");
        list.insert_element_before(1, inserted);
        let ids: Vec<_> = list.elements().map(|e| e.attr("id").unwrap()).collect();
        assert_eq!(ids, ["256", "258", "257"]);
    }

    #[test]
    fn test_remove_elements_where() {
        let mut list = Element::new("p:sldIdLst");
        for id in ["256", "257", "258"] {
            let mut e = Element::new("p:sldId");
            e.set_attr("id", id);
            list.push_element(e);
        }
        let removed = list.remove_elements_where(&|el| el.attr("id") == Some("257"));
        assert_eq!(removed, 1);
        assert_eq!(list.elements().count(), 2);
    }
}
