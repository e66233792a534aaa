//! Error types for XML document access

/// Result type alias for XML document operations
pub type Result<T> = std::result::Result<T, XmlError>;

/// Errors that can occur while parsing or querying an XML document
#[derive(Debug, thiserror::Error)]
pub enum XmlError {
    /// The input could not be parsed
    #[error("The XML content is not well-formed: {0}")]
    NotWellFormed(#[from] xmltree::ParseError),

    /// The query expression is outside the supported path subset
    #[error("Invalid path expression: {expr}")]
    MalformedQuery { expr: String },

    /// A required element was not found
    #[error("XML node [{expr}] not found")]
    NodeNotFound { expr: String },

    /// A required attribute was not found
    #[error("XML attribute [{expr}] not found")]
    AttributeNotFound { expr: String },

    /// A date or timestamp value could not be parsed
    #[error("Invalid xs:dateTime value: {value}")]
    InvalidDateTime { value: String },
}
