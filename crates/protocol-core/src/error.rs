use thiserror::Error;

/// A type alias for handling `Result`s with `ProtocolError`
pub type ProtocolResult<T> = std::result::Result<T, ProtocolError>;

/// Errors raised while encoding or decoding signaling messages
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// The frame was not valid JSON
    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    /// The frame was JSON but not an object
    #[error("Message is not a JSON object")]
    NotAnObject,

    /// The object has no string `id` field
    #[error("Message has no string 'id' field")]
    MissingId,

    /// The id is known but its fields do not match
    #[error("Invalid fields for message '{id}': {reason}")]
    InvalidFields {
        /// Message id
        id: String,
        /// Decoder diagnostic
        reason: String,
    },

    /// A message could not be serialized
    #[error("Failed to serialize message '{id}': {reason}")]
    Serialization {
        /// Message id
        id: String,
        /// Encoder diagnostic
        reason: String,
    },
}

impl ProtocolError {
    /// Create an invalid-fields error
    pub fn invalid_fields(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidFields {
            id: id.into(),
            reason: reason.into(),
        }
    }

    /// Whether the error came from a malformed inbound frame
    pub fn is_decode_error(&self) -> bool {
        !matches!(self, ProtocolError::Serialization { .. })
    }
}

impl From<serde_json::Error> for ProtocolError {
    fn from(err: serde_json::Error) -> Self {
        ProtocolError::InvalidJson(err.to_string())
    }
}
