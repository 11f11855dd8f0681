//! Owned, mutable SVG tree.
//!
//! Markup is parsed with `roxmltree` and copied into plain [`Element`] /
//! [`Node`] values that the pipeline stages edit in place. Serialization goes
//! through `quick-xml`'s writer and produces compact markup with no XML
//! declaration.
//!
//! Namespaced names keep their original prefix (`xlink:href`, `xml:space`)
//! and `xmlns` declarations are re-emitted where they were introduced.

use std::io::{Cursor, Write};

use quick_xml::Writer;
use quick_xml::escape::partial_escape;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use roxmltree::ParsingOptions;

use crate::error::{Error, Result};

/// A child of an element (or of the document prolog).
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
    Comment(String),
    ProcessingInstruction { target: String, data: Option<String> },
}

impl Node {
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Node::Element(element) => Some(element),
            _ => None,
        }
    }
}

/// An element with ordered attributes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    /// Qualified name, e.g. `path` or `svg:path`.
    pub name: String,
    /// Attributes in document order, including `xmlns` declarations.
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Name without its namespace prefix.
    pub fn local_name(&self) -> &str {
        self.name.rsplit(':').next().unwrap_or(&self.name)
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attr(name).is_some()
    }

    /// Sets `name`, replacing an existing value in place or appending.
    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attributes.iter_mut().find(|(key, _)| key == name) {
            Some((_, existing)) => *existing = value,
            None => self.attributes.push((name.to_string(), value)),
        }
    }

    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        let index = self.attributes.iter().position(|(key, _)| key == name)?;
        Some(self.attributes.remove(index).1)
    }

    pub fn retain_attrs(&mut self, mut keep: impl FnMut(&str, &str) -> bool) {
        self.attributes.retain(|(key, value)| keep(key, value));
    }

    /// Child elements, skipping text and comments.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    pub fn elements_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.children.iter_mut().filter_map(Node::as_element_mut)
    }

    pub fn retain_children(&mut self, keep: impl FnMut(&Node) -> bool) {
        self.children.retain(keep);
    }

    /// Visits this element and every descendant element, parents first.
    pub fn walk(&self, visit: &mut impl FnMut(&Element)) {
        visit(self);
        for child in self.elements() {
            child.walk(visit);
        }
    }

    /// Mutable counterpart of [`walk`](Self::walk).
    pub fn walk_mut(&mut self, visit: &mut impl FnMut(&mut Element)) {
        visit(self);
        for child in self.elements_mut() {
            child.walk_mut(visit);
        }
    }

    /// First element, `self` included, matching `predicate` in document order.
    pub fn find(&self, predicate: &impl Fn(&Element) -> bool) -> Option<&Element> {
        if predicate(self) {
            return Some(self);
        }
        self.elements().find_map(|child| child.find(predicate))
    }

    /// True if any descendant element (not `self`) matches.
    pub fn any_descendant(&self, predicate: &impl Fn(&Element) -> bool) -> bool {
        self.elements()
            .any(|child| predicate(child) || child.any_descendant(predicate))
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text_content(&self) -> String {
        let mut text = String::new();
        collect_text(self, &mut text);
        text
    }
}

fn collect_text(element: &Element, out: &mut String) {
    for child in &element.children {
        match child {
            Node::Text(text) => out.push_str(text),
            Node::Element(inner) => collect_text(inner, out),
            _ => {}
        }
    }
}

/// A parsed SVG document: the root `<svg>` plus any comments or processing
/// instructions that preceded it.
#[derive(Debug, Clone, PartialEq)]
pub struct SvgDocument {
    pub prolog: Vec<Node>,
    pub root: Element,
}

impl SvgDocument {
    /// Parses markup. Fails if it is not well-formed or the root is not `<svg>`.
    pub fn parse(text: &str) -> Result<Self> {
        let options = ParsingOptions {
            allow_dtd: true,
            ..ParsingOptions::default()
        };
        let document = roxmltree::Document::parse_with_options(text, options)?;
        let root_node = document.root_element();
        if root_node.tag_name().name() != "svg" {
            return Err(Error::MissingRoot);
        }

        let prolog = document
            .root()
            .children()
            .take_while(|child| *child != root_node)
            .filter_map(|child| convert_node(child, false))
            .collect();

        Ok(Self {
            prolog,
            root: convert_element(root_node),
        })
    }

    /// Writes the document as compact markup.
    pub fn serialize(&self) -> Result<String> {
        let mut writer = Writer::new(Cursor::new(Vec::new()));
        for node in &self.prolog {
            write_node(&mut writer, node)?;
        }
        write_element(&mut writer, &self.root)?;

        let bytes = writer.into_inner().into_inner();
        String::from_utf8(bytes).map_err(|e| Error::Serialize(e.to_string()))
    }
}

// ============================================================================
// roxmltree -> owned tree
// ============================================================================

fn convert_node(node: roxmltree::Node<'_, '_>, preserve_space: bool) -> Option<Node> {
    if node.is_element() {
        return Some(Node::Element(convert_element(node)));
    }
    if node.is_comment() {
        return node.text().map(|text| Node::Comment(text.to_string()));
    }
    if let Some(pi) = node.pi() {
        return Some(Node::ProcessingInstruction {
            target: pi.target.to_string(),
            data: pi.value.map(str::to_string),
        });
    }
    if node.is_text() {
        let text = node.text()?;
        if text.trim().is_empty() && !preserve_space {
            return None;
        }
        return Some(Node::Text(text.to_string()));
    }
    None
}

fn convert_element(node: roxmltree::Node<'_, '_>) -> Element {
    let mut attributes = Vec::new();

    let parent = node.parent_element();
    for namespace in node.namespaces() {
        if namespace.name() == Some("xml") {
            continue;
        }
        let inherited = parent.is_some_and(|parent| {
            parent
                .namespaces()
                .any(|p| p.name() == namespace.name() && p.uri() == namespace.uri())
        });
        if inherited {
            continue;
        }
        let key = match namespace.name() {
            Some(prefix) => format!("xmlns:{prefix}"),
            None => "xmlns".to_string(),
        };
        attributes.push((key, namespace.uri().to_string()));
    }

    for attribute in node.attributes() {
        let key = qualified_name(node, attribute.namespace(), attribute.name());
        attributes.push((key, attribute.value().to_string()));
    }

    let tag = node.tag_name();
    let name = qualified_name(node, tag.namespace(), tag.name());
    let preserve_space = matches!(tag.name(), "text" | "tspan" | "textPath");

    let children = node
        .children()
        .filter_map(|child| convert_node(child, preserve_space))
        .collect();

    Element {
        name,
        attributes,
        children,
    }
}

fn qualified_name(node: roxmltree::Node<'_, '_>, namespace: Option<&str>, local: &str) -> String {
    match namespace.and_then(|uri| node.lookup_prefix(uri)) {
        Some(prefix) => format!("{prefix}:{local}"),
        None => local.to_string(),
    }
}

// ============================================================================
// owned tree -> markup
// ============================================================================

fn write_node(writer: &mut Writer<Cursor<Vec<u8>>>, node: &Node) -> Result<()> {
    match node {
        Node::Element(element) => write_element(writer, element),
        Node::Text(text) => writer
            .write_event(Event::Text(BytesText::from_escaped(partial_escape(text))))
            .map_err(|e| Error::Serialize(e.to_string())),
        Node::Comment(text) => writer
            .write_event(Event::Comment(BytesText::from_escaped(text.as_str())))
            .map_err(|e| Error::Serialize(e.to_string())),
        Node::ProcessingInstruction { target, data } => {
            let raw = match data {
                Some(data) => format!("<?{target} {data}?>"),
                None => format!("<?{target}?>"),
            };
            writer.get_mut().write_all(raw.as_bytes())?;
            Ok(())
        }
    }
}

fn write_element(writer: &mut Writer<Cursor<Vec<u8>>>, element: &Element) -> Result<()> {
    let mut start = BytesStart::new(element.name.as_str());
    for (key, value) in &element.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if element.children.is_empty() {
        return writer
            .write_event(Event::Empty(start))
            .map_err(|e| Error::Serialize(e.to_string()));
    }

    writer
        .write_event(Event::Start(start))
        .map_err(|e| Error::Serialize(e.to_string()))?;
    for child in &element.children {
        write_node(writer, child)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new(element.name.as_str())))
        .map_err(|e| Error::Serialize(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOGO: &str = r##"<?xml version="1.0" encoding="UTF-8"?>
<!-- brand asset -->
<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" viewBox="0 0 24 24">
  <defs>
    <linearGradient id="g"><stop offset="0" stop-color="#fff"/></linearGradient>
  </defs>
  <use xlink:href="#shape"/>
  <path id="shape" d="M0 0h24v24H0z" fill="url(#g)"/>
  <text x="1"> A &amp; B </text>
</svg>"##;

    #[test]
    fn parses_root_and_children() {
        let doc = SvgDocument::parse(LOGO).unwrap();
        assert_eq!(doc.root.local_name(), "svg");
        assert_eq!(doc.root.attr("viewBox"), Some("0 0 24 24"));
        let names: Vec<_> = doc.root.elements().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["defs", "use", "path", "text"]);
    }

    #[test]
    fn keeps_namespace_prefixes() {
        let doc = SvgDocument::parse(LOGO).unwrap();
        assert_eq!(doc.root.attr("xmlns"), Some("http://www.w3.org/2000/svg"));
        assert_eq!(doc.root.attr("xmlns:xlink"), Some("http://www.w3.org/1999/xlink"));
        let use_element = doc.root.elements().find(|e| e.name == "use").unwrap();
        assert_eq!(use_element.attr("xlink:href"), Some("#shape"));
        assert!(!use_element.has_attr("xmlns"));
    }

    #[test]
    fn prolog_keeps_comments_and_declaration() {
        let doc = SvgDocument::parse(LOGO).unwrap();
        assert!(
            doc.prolog
                .iter()
                .any(|node| matches!(node, Node::Comment(text) if text.contains("brand asset")))
        );
    }

    #[test]
    fn rejects_non_svg_root() {
        assert!(matches!(SvgDocument::parse("<html/>"), Err(Error::MissingRoot)));
        assert!(matches!(SvgDocument::parse("<svg><path></svg>"), Err(Error::Parse(_))));
    }

    #[test]
    fn serializes_compactly_and_escapes_text() {
        let doc = SvgDocument::parse(LOGO).unwrap();
        let out = doc.serialize().unwrap();
        assert!(out.contains("<!-- brand asset -->"));
        assert!(out.contains(r##"<stop offset="0" stop-color="#fff"/>"##));
        assert!(out.contains("<text x=\"1\"> A &amp; B </text>"));
        assert!(out.ends_with("</svg>"));
        assert!(!out.contains("\n  <path"));

        let again = SvgDocument::parse(&out).unwrap();
        assert_eq!(again.root, doc.root);
    }

    #[test]
    fn attribute_editing() {
        let mut element = Element::new("path");
        element.set_attr("fill", "red");
        element.set_attr("d", "M0 0");
        element.set_attr("fill", "blue");
        assert_eq!(element.attributes[0], ("fill".to_string(), "blue".to_string()));
        assert_eq!(element.remove_attr("fill").as_deref(), Some("blue"));
        assert_eq!(element.remove_attr("fill"), None);
        assert_eq!(element.attributes.len(), 1);
    }

    #[test]
    fn walk_visits_every_element() {
        let doc = SvgDocument::parse(LOGO).unwrap();
        let mut count = 0;
        doc.root.walk(&mut |_| count += 1);
        assert_eq!(count, 7);
    }
}
