//! Live value errors

/// Result type for live value operations
pub type LiveResult<T> = Result<T, LiveError>;

/// Grammar-level failure while tokenizing an attribute string
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message} at offset {offset}")]
pub struct ParseError {
    /// Byte offset into the attribute string
    pub offset: usize,
    pub message: String,
}

impl ParseError {
    pub fn new(offset: usize, message: impl Into<String>) -> Self {
        Self { offset, message: message.into() }
    }
}

/// Live value error
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LiveError {
    #[error("Malformed value '{value}': {source}")]
    Parse {
        value: String,
        #[source]
        source: ParseError,
    },

    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("Unsupported trait: {0}")]
    UnsupportedTrait(String),

    #[error("Invalid value {code} for enumeration '{name}'")]
    InvalidEnumerationValue { name: &'static str, code: u16 },

    #[error("Index {index} out of bounds for list of length {len}")]
    IndexSize { index: usize, len: usize },

    #[error("Owning element has been dropped")]
    Detached,
}

impl LiveError {
    /// Wrap a grammar error with the offending string
    pub fn parse(value: &str, source: ParseError) -> Self {
        Self::Parse { value: value.to_string(), source }
    }
}
