//! # novaxml - DOM-style XML accessor layer
//!
//! A small query layer over [`xmltree`] built for SOAP payload handling.
//! It offers the two access families SOAP response mapping needs:
//!
//! - **require** accessors that fail with a typed error when the target
//!   element or attribute is missing,
//! - **find** accessors that yield `None` instead.
//!
//! Queries use a compact path syntax (anchors `//` and `/`, element steps,
//! an optional final `@attribute` step) documented on [`XmlDocument`].
//! Namespace-heavy documents can be flattened with
//! [`XmlDocument::without_namespaces`] before structural queries.
//!
//! ## Quick Start
//!
//! ```
//! use novaxml::XmlDocument;
//!
//! let doc = XmlDocument::parse("<root><item id=\"a1\">first</item></root>")?;
//! assert_eq!(doc.require_node_text("//item", None)?, "first");
//! assert_eq!(doc.find_attribute_value("item/@id", None)?.as_deref(), Some("a1"));
//! # Ok::<(), novaxml::XmlError>(())
//! ```

pub mod datetime;
pub mod document;
pub mod error;

mod path;

// Re-exports for convenience
pub use document::{text_content, XmlDocument};
pub use error::{Result, XmlError};
