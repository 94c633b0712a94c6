//! Error types for encoding and decoding wire messages.
//!
//! Uses `thiserror` so callers can match on the failure kind instead of
//! parsing messages.

use thiserror::Error;

/// Errors raised by the message envelope codec.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The input is not a well-formed envelope.
    #[error("malformed message envelope: {0}")]
    Malformed(String),

    /// The `msg_type` string is not part of the wire vocabulary.
    #[error("unknown message type: {0}")]
    UnknownMessageType(String),

    /// The `detail_level` integer has no matching level.
    #[error("unknown details level: {0}")]
    UnknownDetailLevel(i64),

    /// The shape only supports the opposite direction.
    #[error("{direction} is not implemented for {shape}")]
    UnsupportedDirection {
        /// The content shape or field codec.
        shape: &'static str,
        /// The direction that was attempted.
        direction: CodecDirection,
    },

    /// The content does not match the shape dictated by `msg_type`.
    #[error("content does not match shape for '{msg_type}': {reason}")]
    ContentShape {
        /// The wire type the content was decoded against.
        msg_type: String,
        /// Description of the mismatch.
        reason: String,
    },

    /// JSON (de)serialisation failed outside of content decoding.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl CodecError {
    /// Creates a malformed-envelope error.
    #[must_use]
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::Malformed(reason.into())
    }

    /// Creates an error for a shape that cannot be decoded.
    #[must_use]
    pub const fn decode_unsupported(shape: &'static str) -> Self {
        Self::UnsupportedDirection {
            shape,
            direction: CodecDirection::Decode,
        }
    }

    /// Returns `true` when the failure is an unsupported-direction report.
    #[must_use]
    pub const fn is_unsupported_direction(&self) -> bool {
        matches!(self, Self::UnsupportedDirection { .. })
    }
}

/// Direction of a codec operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecDirection {
    /// Wire form to typed value.
    Decode,
    /// Typed value to wire form.
    Encode,
}

impl std::fmt::Display for CodecDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Decode => f.write_str("decoding"),
            Self::Encode => f.write_str("encoding"),
        }
    }
}
