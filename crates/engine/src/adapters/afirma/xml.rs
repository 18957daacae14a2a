//! Owned XML element tree used for DSS messages and SOAP envelopes.
//!
//! Parsing goes through `roxmltree` (DTDs rejected). Serialization emits the
//! exclusive-C14N form directly: namespace declarations sorted by prefix,
//! attributes sorted by namespace URI then local name, no self-closing tags,
//! and the C14N escaping rules for text and attribute values. A subtree
//! serialized on its own is therefore its own canonical form, which is what
//! the WS-Security signer digests.

use std::borrow::Cow;
use std::io;

use quick_xml::escape::partial_escape;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use super::constants::{KNOWN_PREFIXES, NS_XML};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlAttribute {
  pub namespace: Option<String>,
  pub name: String,
  pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlNode {
  Element(XmlElement),
  Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
  pub namespace: Option<String>,
  pub name: String,
  /// Explicit `xmlns:prefix` declarations, emitted even when already in scope.
  pub declarations: Vec<(String, String)>,
  pub attributes: Vec<XmlAttribute>,
  pub children: Vec<XmlNode>,
}

impl XmlElement {
  pub fn new(namespace: Option<&str>, name: &str) -> Self {
    Self {
      namespace: namespace.map(str::to_string),
      name: name.to_string(),
      declarations: Vec::new(),
      attributes: Vec::new(),
      children: Vec::new(),
    }
  }

  pub fn with_attr(mut self, name: &str, value: impl Into<String>) -> Self {
    self.set_attr(None, name, value);
    self
  }

  pub fn with_ns_attr(mut self, namespace: &str, name: &str, value: impl Into<String>) -> Self {
    self.set_attr(Some(namespace), name, value);
    self
  }

  pub fn with_child(mut self, child: XmlElement) -> Self {
    self.children.push(XmlNode::Element(child));
    self
  }

  pub fn with_text(mut self, text: impl Into<String>) -> Self {
    self.children.push(XmlNode::Text(text.into()));
    self
  }

  pub fn declare(mut self, prefix: &str, namespace: &str) -> Self {
    self.add_declaration(prefix, namespace);
    self
  }

  pub fn add_declaration(&mut self, prefix: &str, namespace: &str) {
    self.declarations.retain(|(p, _)| p != prefix);
    self.declarations.push((prefix.to_string(), namespace.to_string()));
  }

  pub fn set_attr(&mut self, namespace: Option<&str>, name: &str, value: impl Into<String>) {
    let value = value.into();
    match self
      .attributes
      .iter_mut()
      .find(|a| a.namespace.as_deref() == namespace && a.name == name)
    {
      Some(existing) => existing.value = value,
      None => self.attributes.push(XmlAttribute {
        namespace: namespace.map(str::to_string),
        name: name.to_string(),
        value,
      }),
    }
  }

  pub fn push_child(&mut self, child: XmlElement) {
    self.children.push(XmlNode::Element(child));
  }

  pub fn local_name(&self) -> &str {
    &self.name
  }

  pub fn is(&self, namespace: &str, name: &str) -> bool {
    self.namespace.as_deref() == Some(namespace) && self.name == name
  }

  /// Unqualified attribute lookup.
  pub fn attr(&self, name: &str) -> Option<&str> {
    self.attr_ns(None, name)
  }

  pub fn attr_ns(&self, namespace: Option<&str>, name: &str) -> Option<&str> {
    self
      .attributes
      .iter()
      .find(|a| a.namespace.as_deref() == namespace && a.name == name)
      .map(|a| a.value.as_str())
  }

  pub fn elements(&self) -> impl Iterator<Item = &XmlElement> {
    self.children.iter().filter_map(|c| match c {
      XmlNode::Element(e) => Some(e),
      XmlNode::Text(_) => None,
    })
  }

  pub fn elements_mut(&mut self) -> impl Iterator<Item = &mut XmlElement> {
    self.children.iter_mut().filter_map(|c| match c {
      XmlNode::Element(e) => Some(e),
      XmlNode::Text(_) => None,
    })
  }

  pub fn child(&self, namespace: &str, name: &str) -> Option<&XmlElement> {
    self.elements().find(|e| e.is(namespace, name))
  }

  /// Direct text children, concatenated verbatim.
  pub fn text(&self) -> String {
    self
      .children
      .iter()
      .filter_map(|c| match c {
        XmlNode::Text(t) => Some(t.as_str()),
        XmlNode::Element(_) => None,
      })
      .collect()
  }

  pub fn has_text(&self) -> bool {
    self.children.iter().any(|c| matches!(c, XmlNode::Text(t) if !t.trim().is_empty()))
  }

  /// Depth-first search over this element and its descendants.
  pub fn find<P>(&self, pred: P) -> Option<&XmlElement>
  where
    P: Fn(&XmlElement) -> bool + Copy,
  {
    if pred(self) {
      return Some(self);
    }
    self.elements().find_map(|e| e.find(pred))
  }

  /// Parse a document and return its root element.
  pub fn parse(xml: &str) -> Result<Self, roxmltree::Error> {
    let doc = roxmltree::Document::parse(xml)?;
    Ok(Self::from_node(doc.root_element()))
  }

  fn from_node(node: roxmltree::Node<'_, '_>) -> Self {
    let tag = node.tag_name();
    let mut element = XmlElement::new(tag.namespace(), tag.name());
    for attr in node.attributes() {
      element.attributes.push(XmlAttribute {
        namespace: attr.namespace().map(str::to_string),
        name: attr.name().to_string(),
        value: attr.value().to_string(),
      });
    }
    for child in node.children() {
      if child.is_element() {
        element.children.push(XmlNode::Element(Self::from_node(child)));
      } else if child.is_text() {
        if let Some(text) = child.text() {
          element.children.push(XmlNode::Text(text.to_string()));
        }
      }
    }
    element
  }

  /// Serialize this element as a standalone document (no XML declaration).
  pub fn to_xml(&self) -> io::Result<String> {
    let mut writer = Writer::new(Vec::new());
    let mut scopes: Vec<Vec<(String, String)>> = Vec::new();
    write_element(&mut writer, self, &mut scopes)?;
    String::from_utf8(writer.into_inner()).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
  }
}

fn write_element(
  writer: &mut Writer<Vec<u8>>,
  element: &XmlElement,
  scopes: &mut Vec<Vec<(String, String)>>,
) -> io::Result<()> {
  let mut decls = element.declarations.clone();

  let qname = match &element.namespace {
    Some(ns) => format!("{}:{}", resolve_prefix(ns, &mut decls, scopes), element.name),
    None => element.name.clone(),
  };

  let mut attrs: Vec<(&XmlAttribute, String)> = Vec::with_capacity(element.attributes.len());
  for attr in &element.attributes {
    let key = match attr.namespace.as_deref() {
      None => attr.name.clone(),
      Some(NS_XML) => format!("xml:{}", attr.name),
      Some(ns) => format!("{}:{}", resolve_prefix(ns, &mut decls, scopes), attr.name),
    };
    attrs.push((attr, key));
  }
  attrs.sort_by(|(a, _), (b, _)| {
    (a.namespace.as_deref().unwrap_or(""), a.name.as_str())
      .cmp(&(b.namespace.as_deref().unwrap_or(""), b.name.as_str()))
  });
  decls.sort_by(|a, b| a.0.cmp(&b.0));

  let mut start = BytesStart::new(qname.as_str());
  for (prefix, uri) in &decls {
    let key = format!("xmlns:{prefix}");
    let value = escape_attr(uri);
    start.push_attribute((key.as_bytes(), value.as_bytes()));
  }
  for (attr, key) in &attrs {
    let value = escape_attr(&attr.value);
    start.push_attribute((key.as_bytes(), value.as_bytes()));
  }
  emit(writer, Event::Start(start))?;

  scopes.push(decls);
  for child in &element.children {
    match child {
      XmlNode::Element(e) => write_element(writer, e, scopes)?,
      XmlNode::Text(t) => emit(writer, Event::Text(BytesText::from_escaped(escape_text(t))))?,
    }
  }
  scopes.pop();

  emit(writer, Event::End(BytesEnd::new(qname.as_str())))
}

fn emit(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> io::Result<()> {
  writer
    .write_event(event)
    .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))
}

/// Find the prefix bound to `ns`, declaring one on the current element if needed.
fn resolve_prefix(
  ns: &str,
  decls: &mut Vec<(String, String)>,
  scopes: &[Vec<(String, String)>],
) -> String {
  if let Some((p, _)) = decls.iter().find(|(_, u)| u == ns) {
    return p.clone();
  }
  if let Some((p, _)) = scopes.iter().rev().flat_map(|s| s.iter()).find(|(_, u)| u == ns) {
    let shadowed = scopes
      .iter()
      .rev()
      .flat_map(|s| s.iter())
      .chain(decls.iter())
      .any(|(q, u)| q == p && u != ns);
    if !shadowed {
      return p.clone();
    }
  }

  let taken = |p: &str| {
    decls.iter().any(|(q, _)| q == p) || scopes.iter().flat_map(|s| s.iter()).any(|(q, _)| q == p)
  };
  let prefix = match KNOWN_PREFIXES.iter().find(|(u, _)| *u == ns) {
    Some((_, p)) if !taken(p) => p.to_string(),
    _ => (0..)
      .map(|n| format!("ns{n}"))
      .find(|p| !taken(p))
      .unwrap_or_else(|| "ns".to_string()),
  };
  decls.push((prefix.clone(), ns.to_string()));
  prefix
}

fn escape_text(text: &str) -> Cow<'_, str> {
  let escaped = partial_escape(text);
  if escaped.contains('\r') {
    Cow::Owned(escaped.replace('\r', "&#xD;"))
  } else {
    escaped
  }
}

fn escape_attr(value: &str) -> Cow<'_, str> {
  if !value.contains(['&', '<', '"', '\t', '\n', '\r']) {
    return Cow::Borrowed(value);
  }
  let mut out = String::with_capacity(value.len() + 8);
  for c in value.chars() {
    match c {
      '&' => out.push_str("&amp;"),
      '<' => out.push_str("&lt;"),
      '"' => out.push_str("&quot;"),
      '\t' => out.push_str("&#x9;"),
      '\n' => out.push_str("&#xA;"),
      '\r' => out.push_str("&#xD;"),
      _ => out.push(c),
    }
  }
  Cow::Owned(out)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::adapters::afirma::constants::{NS_DSS, NS_WSU};

  #[test]
  fn serializes_in_canonical_form() {
    let el = XmlElement::new(Some(NS_DSS), "Document")
      .with_attr("ID", "a\"b")
      .with_ns_attr(NS_WSU, "Id", "x")
      .with_child(XmlElement::new(None, "empty"))
      .with_text("1 < 2 & \"q\"");
    let xml = el.to_xml().unwrap();
    assert_eq!(
      xml,
      format!(
        "<dss:Document xmlns:dss=\"{NS_DSS}\" xmlns:wsu=\"{NS_WSU}\" ID=\"a&quot;b\" wsu:Id=\"x\">\
         <empty></empty>1 &lt; 2 &amp; \"q\"</dss:Document>"
      )
    );
  }

  #[test]
  fn nested_elements_reuse_prefix_in_scope() {
    let el = XmlElement::new(Some(NS_DSS), "A").with_child(XmlElement::new(Some(NS_DSS), "B"));
    let xml = el.to_xml().unwrap();
    assert_eq!(xml, format!("<dss:A xmlns:dss=\"{NS_DSS}\"><dss:B></dss:B></dss:A>"));
  }

  #[test]
  fn parse_keeps_whitespace_and_namespaces() {
    let xml = format!("<d:A xmlns:d=\"{NS_DSS}\" T=\"1\">\n  <d:B>  x  </d:B>\n</d:A>");
    let el = XmlElement::parse(&xml).unwrap();
    assert!(el.is(NS_DSS, "A"));
    assert_eq!(el.attr("T"), Some("1"));
    let b = el.child(NS_DSS, "B").unwrap();
    assert_eq!(b.text(), "  x  ");
    assert_eq!(el.text(), "\n  \n");
  }

  #[test]
  fn parse_rejects_dtd() {
    let xml = "<!DOCTYPE a [<!ENTITY x SYSTEM \"file:///etc/passwd\">]><a>&x;</a>";
    assert!(XmlElement::parse(xml).is_err());
  }

  #[test]
  fn roundtrip_through_parse() {
    let el = XmlElement::new(Some(NS_DSS), "A")
      .with_attr("k", "v")
      .with_child(XmlElement::new(None, "plain").with_text("t&t"));
    let back = XmlElement::parse(&el.to_xml().unwrap()).unwrap();
    assert_eq!(back, el);
  }
}
