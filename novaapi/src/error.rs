use thiserror::Error;

/// Result type alias for NOVA client operations.
pub type Result<T> = std::result::Result<T, NovaError>;

/// Errors raised by the NOVA client.
#[derive(Error, Debug)]
pub enum NovaError {
    /// Request or response XML could not be parsed or queried.
    #[error(transparent)]
    Xml(#[from] novaxml::XmlError),

    /// A response did not carry the identifier the caller asked for.
    #[error("{message}")]
    MissingIdentifier { message: String },

    /// A request parameter failed validation before anything was sent.
    #[error("{message}")]
    InvalidParameter { message: String },

    /// The configuration could not be resolved into usable endpoints.
    #[error("{message}")]
    Config { message: String },

    /// The OAuth2 token endpoint did not yield a usable access token.
    #[error("{message}")]
    Authentication { message: String },

    /// NOVA rejected the session credentials (HTTP 401).
    #[error("{message}")]
    Unauthorized { message: String },

    /// A remote operation failed; the message lists the collected error records.
    #[error("{message}")]
    RemoteOperation { status: u16, message: String },

    /// Transport-level HTTP failure (connect, timeout, body read).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// A configured or joined URL is invalid.
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl NovaError {
    /// A `MissingIdentifier` error from a message string.
    pub fn missing_identifier<S: Into<String>>(message: S) -> Self {
        NovaError::MissingIdentifier {
            message: message.into(),
        }
    }

    /// An `InvalidParameter` error from a message string.
    pub fn invalid_parameter<S: Into<String>>(message: S) -> Self {
        NovaError::InvalidParameter {
            message: message.into(),
        }
    }

    /// A `Config` error from a message string.
    pub fn config<S: Into<String>>(message: S) -> Self {
        NovaError::Config {
            message: message.into(),
        }
    }
}
