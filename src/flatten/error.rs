use std::fmt;
use thiserror::Error;

/// Coarse JSON type of a fragment, used to report shape mismatches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonKind {
    Object,
    Array,
    String,
    Number,
    Bool,
    Null,
}

impl JsonKind {
    /// Classify a JSON text by its first significant byte.
    ///
    /// The text is assumed to be valid JSON; anything not recognised is a number.
    pub fn of(json: &str) -> Self {
        match json.trim_start().as_bytes().first() {
            Some(b'{') => JsonKind::Object,
            Some(b'[') => JsonKind::Array,
            Some(b'"') => JsonKind::String,
            Some(b't') | Some(b'f') => JsonKind::Bool,
            Some(b'n') => JsonKind::Null,
            _ => JsonKind::Number,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            JsonKind::Object => "object",
            JsonKind::Array => "array",
            JsonKind::String => "string",
            JsonKind::Number => "number",
            JsonKind::Bool => "boolean",
            JsonKind::Null => "null",
        }
    }
}

impl fmt::Display for JsonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a fragment could not be decoded into the shape a path requires
#[derive(Debug, Error)]
pub enum DecodeCause {
    #[error("invalid JSON: {0}")]
    Syntax(#[from] serde_json::Error),

    #[error("expected {expected}, found {found}")]
    Shape { expected: JsonKind, found: JsonKind },
}

/// The only error produced while resolving descriptors against a document.
///
/// Carries the output identifier of the descriptor active when decoding failed.
#[derive(Debug, Error)]
#[error("failed to decode value for '{output_id}': {cause}")]
pub struct UnmarshalError {
    output_id: String,
    #[source]
    cause: DecodeCause,
}

impl UnmarshalError {
    pub fn new(output_id: impl Into<String>, cause: impl Into<DecodeCause>) -> Self {
        UnmarshalError {
            output_id: output_id.into(),
            cause: cause.into(),
        }
    }

    pub(crate) fn shape(output_id: &str, expected: JsonKind, found: JsonKind) -> Self {
        Self::new(output_id, DecodeCause::Shape { expected, found })
    }

    pub fn output_id(&self) -> &str {
        &self.output_id
    }

    pub fn cause(&self) -> &DecodeCause {
        &self.cause
    }
}
