//! Parsed XML document with path-based accessors.

use std::io::BufReader;

use xmltree::{Element, EmitterConfig, XMLNode};

use crate::error::{Result, XmlError};
use crate::path::{Anchor, Query, Step};

/// An owned XML document with query accessors.
///
/// Query expressions support three anchors:
///
/// - `//step/...` searches the whole document regardless of any context
///   node (matching the DOM XPath behavior the wire protocol was written
///   against),
/// - `/step/...` is absolute; the first step must match the document
///   element,
/// - an unanchored expression starts at the children of the context node
///   (or of the document element when no context is given).
///
/// Steps are element names, optionally `prefix:`-qualified; a final step
/// may be `@attribute`. Matching is literal: a prefixed step matches only
/// elements carrying that prefix, an unprefixed step only elements with
/// neither prefix nor namespace. Documents flattened with
/// [`XmlDocument::without_namespaces`] therefore answer unprefixed
/// queries regardless of how the sender namespaced its payload.
#[derive(Debug, Clone)]
pub struct XmlDocument {
    root: Element,
}

impl XmlDocument {
    /// Parses an XML string into a document.
    pub fn parse(content: &str) -> Result<Self> {
        let root = Element::parse(BufReader::new(content.as_bytes()))?;
        Ok(XmlDocument { root })
    }

    /// The document element.
    pub fn root(&self) -> &Element {
        &self.root
    }

    /// All elements matched by `expr`, in document order. Zero matches is
    /// an empty vector, not an error.
    pub fn query_nodes<'a>(
        &'a self,
        expr: &str,
        context: Option<&'a Element>,
    ) -> Result<Vec<&'a Element>> {
        let query = Query::parse(expr)?;
        if query.attribute.is_some() {
            return Ok(Vec::new());
        }
        Ok(self.select(&query, context))
    }

    /// First element matched by `expr`, or `None`.
    pub fn find_node<'a>(
        &'a self,
        expr: &str,
        context: Option<&'a Element>,
    ) -> Result<Option<&'a Element>> {
        Ok(self.query_nodes(expr, context)?.into_iter().next())
    }

    /// First element matched by `expr`; missing element is an error.
    pub fn require_node<'a>(
        &'a self,
        expr: &str,
        context: Option<&'a Element>,
    ) -> Result<&'a Element> {
        self.find_node(expr, context)?
            .ok_or_else(|| XmlError::NodeNotFound {
                expr: expr.to_string(),
            })
    }

    /// Text content of the first element matched by `expr`; missing
    /// element is an error. Attribute expressions never match an element.
    pub fn require_node_text(&self, expr: &str, context: Option<&Element>) -> Result<String> {
        self.find_node_text(expr, context)?
            .ok_or_else(|| XmlError::NodeNotFound {
                expr: expr.to_string(),
            })
    }

    /// Text content of the first element matched by `expr`, or `None`.
    pub fn find_node_text(&self, expr: &str, context: Option<&Element>) -> Result<Option<String>> {
        Ok(self.find_node(expr, context)?.map(text_content))
    }

    /// Value of the first matched attribute; a missing attribute is an
    /// error. An attribute that is present but empty yields `Ok("")`.
    pub fn require_attribute(&self, expr: &str, context: Option<&Element>) -> Result<String> {
        self.find_attribute_value(expr, context)?
            .ok_or_else(|| XmlError::AttributeNotFound {
                expr: expr.to_string(),
            })
    }

    /// Value of the first matched attribute, or `None`. Expressions
    /// without a final `@attribute` step never match.
    pub fn find_attribute_value(
        &self,
        expr: &str,
        context: Option<&Element>,
    ) -> Result<Option<String>> {
        let query = Query::parse(expr)?;
        let Some(attribute) = &query.attribute else {
            return Ok(None);
        };
        for elem in self.select(&query, context) {
            if let Some(value) = attribute_of(elem, attribute) {
                return Ok(Some(value.clone()));
            }
        }
        Ok(None)
    }

    /// A deep copy of the document with every namespace removed: element
    /// prefixes dropped, `xmlns` declarations discarded, attributes
    /// re-keyed to their local names. Idempotent; the source document is
    /// left untouched.
    pub fn without_namespaces(&self) -> XmlDocument {
        XmlDocument {
            root: strip_element(&self.root),
        }
    }

    /// Whether `prefix` is declared as a namespace prefix anywhere in the
    /// document. The reserved name `xmlns` asks whether a *default*
    /// namespace is declared anywhere. The built-in `xml` binding does
    /// not count as a declaration.
    pub fn namespace_declared(&self, prefix: &str) -> bool {
        element_declares(&self.root, prefix)
    }

    /// Serializes the document, XML declaration included.
    pub fn to_xml(&self) -> String {
        let mut buf = Vec::new();
        let config = EmitterConfig::new()
            .write_document_declaration(true)
            .perform_indent(true)
            .indent_string("  ");
        if self.root.write_with_config(&mut buf, config).is_err() {
            return String::new();
        }
        String::from_utf8(buf).unwrap_or_default()
    }

    fn select<'a>(&'a self, query: &Query, context: Option<&'a Element>) -> Vec<&'a Element> {
        let mut set: Vec<&'a Element> = Vec::new();
        match query.anchor {
            Anchor::Descendant => match query.steps.first() {
                Some(first) => collect_matching_descendants(&self.root, first, &mut set),
                // Attribute-only query: every element is a candidate.
                None => collect_all(&self.root, &mut set),
            },
            Anchor::Root => match query.steps.first() {
                Some(first) => {
                    if step_matches(&self.root, first) {
                        set.push(&self.root);
                    }
                }
                None => set.push(&self.root),
            },
            Anchor::Relative => {
                let start = context.unwrap_or(&self.root);
                match query.steps.first() {
                    Some(first) => {
                        set.extend(child_elements(start).filter(|c| step_matches(c, first)));
                    }
                    None => set.push(start),
                }
            }
        }

        for step in query.steps.iter().skip(1) {
            let mut next = Vec::new();
            for elem in set {
                next.extend(child_elements(elem).filter(|c| step_matches(c, step)));
            }
            set = next;
        }
        set
    }
}

/// Recursive text content of an element, child elements included.
pub fn text_content(elem: &Element) -> String {
    let mut out = String::new();
    push_text(elem, &mut out);
    out
}

fn push_text(elem: &Element, out: &mut String) {
    for node in &elem.children {
        match node {
            XMLNode::Text(text) => out.push_str(text),
            XMLNode::CData(text) => out.push_str(text),
            XMLNode::Element(child) => push_text(child, out),
            _ => {}
        }
    }
}

fn child_elements(elem: &Element) -> impl Iterator<Item = &Element> {
    elem.children.iter().filter_map(|node| node.as_element())
}

fn step_matches(elem: &Element, step: &Step) -> bool {
    if elem.name != step.name {
        return false;
    }
    match &step.prefix {
        Some(prefix) => elem.prefix.as_deref() == Some(prefix.as_str()),
        None => elem.prefix.is_none() && elem.namespace.is_none(),
    }
}

fn attribute_of<'a>(elem: &'a Element, step: &Step) -> Option<&'a String> {
    if let Some(prefix) = &step.prefix {
        let qualified = format!("{}:{}", prefix, step.name);
        if let Some(value) = elem.attributes.get(&qualified) {
            return Some(value);
        }
    }
    elem.attributes.get(&step.name)
}

fn collect_matching_descendants<'a>(elem: &'a Element, step: &Step, out: &mut Vec<&'a Element>) {
    if step_matches(elem, step) {
        out.push(elem);
    }
    for child in child_elements(elem) {
        collect_matching_descendants(child, step, out);
    }
}

fn collect_all<'a>(elem: &'a Element, out: &mut Vec<&'a Element>) {
    out.push(elem);
    for child in child_elements(elem) {
        collect_all(child, out);
    }
}

fn strip_element(elem: &Element) -> Element {
    let mut stripped = Element::new(&elem.name);
    stripped.prefix = None;
    stripped.namespace = None;
    stripped.namespaces = None;
    for (key, value) in elem.attributes.iter() {
        if key == "xmlns" || key.starts_with("xmlns:") {
            continue;
        }
        let local = match key.rsplit_once(':') {
            Some((_, local)) => local,
            None => key.as_str(),
        };
        stripped.attributes.insert(local.to_string(), value.clone());
    }
    for node in &elem.children {
        match node {
            XMLNode::Element(child) => stripped
                .children
                .push(XMLNode::Element(strip_element(child))),
            other => stripped.children.push(other.clone()),
        }
    }
    stripped
}

fn element_declares(elem: &Element, prefix: &str) -> bool {
    if let Some(namespaces) = &elem.namespaces {
        for (declared, uri) in namespaces.0.iter() {
            if uri.is_empty() {
                continue;
            }
            if prefix == "xmlns" {
                if declared.is_empty() {
                    return true;
                }
            } else if declared == prefix && prefix != "xml" && prefix != "xmlns" {
                return true;
            }
        }
    }
    child_elements(elem).any(|child| element_declares(child, prefix))
}
