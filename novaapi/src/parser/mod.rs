//! Response parsing: business messages, SOAP faults and the
//! normalization of transport failures into readable error lists.

pub mod fault;
pub mod messages;
pub mod normalize;

use indexmap::IndexMap;

/// One collected error with its NOVA code and optional detail fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorRecord {
    pub code: String,
    pub message: String,
    pub details: Option<IndexMap<String, String>>,
}

/// Ordered list of error records collected while explaining a failed
/// request.
#[derive(Debug, Clone, Default)]
pub struct ErrorList {
    records: Vec<ErrorRecord>,
}

impl ErrorList {
    pub fn new() -> Self {
        ErrorList::default()
    }

    pub fn push<C: Into<String>, M: Into<String>>(&mut self, code: C, message: M) {
        self.records.push(ErrorRecord {
            code: code.into(),
            message: message.into(),
            details: None,
        });
    }

    pub fn push_with_details<C: Into<String>, M: Into<String>>(
        &mut self,
        code: C,
        message: M,
        details: IndexMap<String, String>,
    ) {
        self.records.push(ErrorRecord {
            code: code.into(),
            message: message.into(),
            details: Some(details),
        });
    }

    pub fn records(&self) -> &[ErrorRecord] {
        &self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Renders the records as a numbered list, one message per line.
    pub fn render(&self) -> String {
        let mut message = String::new();
        for (index, record) in self.records.iter().enumerate() {
            message.push_str(&format!("{}. {}\n", index + 1, record.message));
        }
        message.trim().to_string()
    }
}
