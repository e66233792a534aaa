//! Path-expression parser for document queries.
//!
//! Supports the small subset of XPath the SOAP payloads actually use: an
//! anchor (`//`, `/` or none), element steps separated by `/`, and an
//! optional `@attribute` step in final position. A step may carry a
//! namespace prefix, matched literally against the element's prefix.

use crate::error::{Result, XmlError};

/// How a query chooses its starting node set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Anchor {
    /// `/...` - starts at the document element, which must match the first step.
    Root,
    /// `//...` - searches the whole document, ignoring any context node.
    Descendant,
    /// Unanchored - starts at the children of the context node.
    Relative,
}

/// One element or attribute step of a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Step {
    pub prefix: Option<String>,
    pub name: String,
}

impl Step {
    fn parse(raw: &str, expr: &str) -> Result<Self> {
        if raw.is_empty() {
            return Err(XmlError::MalformedQuery {
                expr: expr.to_string(),
            });
        }
        match raw.split_once(':') {
            Some((prefix, name)) => {
                if prefix.is_empty() || name.is_empty() {
                    return Err(XmlError::MalformedQuery {
                        expr: expr.to_string(),
                    });
                }
                Ok(Step {
                    prefix: Some(prefix.to_string()),
                    name: name.to_string(),
                })
            }
            None => Ok(Step {
                prefix: None,
                name: raw.to_string(),
            }),
        }
    }
}

/// A parsed query expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Query {
    pub anchor: Anchor,
    pub steps: Vec<Step>,
    pub attribute: Option<Step>,
}

impl Query {
    /// Parses `expr`, rejecting anything outside the supported subset.
    pub fn parse(expr: &str) -> Result<Query> {
        let (anchor, rest) = if let Some(rest) = expr.strip_prefix("//") {
            (Anchor::Descendant, rest)
        } else if let Some(rest) = expr.strip_prefix('/') {
            (Anchor::Root, rest)
        } else {
            (Anchor::Relative, expr)
        };
        if rest.is_empty() {
            return Err(XmlError::MalformedQuery {
                expr: expr.to_string(),
            });
        }

        let raw_steps: Vec<&str> = rest.split('/').collect();
        let last = raw_steps.len() - 1;
        let mut steps = Vec::new();
        let mut attribute = None;
        for (i, raw) in raw_steps.iter().enumerate() {
            if let Some(name) = raw.strip_prefix('@') {
                // An attribute step is only valid in final position.
                if i != last {
                    return Err(XmlError::MalformedQuery {
                        expr: expr.to_string(),
                    });
                }
                attribute = Some(Step::parse(name, expr)?);
            } else {
                steps.push(Step::parse(raw, expr)?);
            }
        }
        Ok(Query {
            anchor,
            steps,
            attribute,
        })
    }
}
