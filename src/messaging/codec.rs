//! Envelope codec: JSON text or bytes to [`MessageEnvelope`] and back.
//!
//! Decoding reads the header first and resolves the content shape strictly
//! from `header.msg_type`. Without a header the content is left undecoded.
//! Parent header and metadata are independently optional; a parent header
//! sent as `{}` means "no parent". Metadata of any JSON shape is carried
//! through as is.
//!
//! # Examples
//!
//! ```
//! use kernel_results::messaging::codec::EnvelopeCodec;
//! use kernel_results::messaging::domain::{MessageContent, MessageType};
//!
//! let wire = r#"{
//!     "header": {"msg_id": "1", "msg_type": "is_complete_request"},
//!     "content": {"code": "val x ="}
//! }"#;
//! let envelope = EnvelopeCodec::decode(wire).expect("valid envelope");
//! assert_eq!(envelope.msg_type(), Some(MessageType::IsCompleteRequest));
//! assert!(matches!(envelope.content, Some(MessageContent::IsCompleteRequest(_))));
//! ```

use serde_json::{Map, Value};

use super::domain::{MessageContent, MessageEnvelope, MessageHeader, MessageType};
use super::error::CodecError;

const HEADER: &str = "header";
const PARENT_HEADER: &str = "parent_header";
const METADATA: &str = "metadata";
const CONTENT: &str = "content";

/// Stateless codec for message envelopes.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvelopeCodec;

impl EnvelopeCodec {
    /// Decodes an envelope from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError`] when the text is not a well-formed envelope, the
    /// header names an unknown `msg_type`, or the content does not match the
    /// shape for that type.
    pub fn decode(text: &str) -> Result<MessageEnvelope, CodecError> {
        let value: Value = serde_json::from_str(text)
            .map_err(|error| CodecError::malformed(error.to_string()))?;
        Self::decode_value(value)
    }

    /// Decodes an envelope from JSON bytes.
    ///
    /// # Errors
    ///
    /// See [`EnvelopeCodec::decode`].
    pub fn decode_slice(bytes: &[u8]) -> Result<MessageEnvelope, CodecError> {
        let value: Value = serde_json::from_slice(bytes)
            .map_err(|error| CodecError::malformed(error.to_string()))?;
        Self::decode_value(value)
    }

    /// Decodes an envelope from a parsed JSON value.
    ///
    /// # Errors
    ///
    /// See [`EnvelopeCodec::decode`].
    pub fn decode_value(value: Value) -> Result<MessageEnvelope, CodecError> {
        let Value::Object(mut element) = value else {
            return Err(CodecError::malformed("envelope must be a JSON object"));
        };

        let header = decode_header(element.remove(HEADER), HEADER)?;
        let parent_header = decode_header(element.remove(PARENT_HEADER), PARENT_HEADER)?;
        let metadata = element.remove(METADATA).filter(|raw| !raw.is_null());

        let content = match (&header, element.remove(CONTENT)) {
            (Some(present), Some(raw)) if !raw.is_null() => {
                let msg_type = present.msg_type;
                Some(MessageContent::decode(msg_type, raw).inspect_err(|error| {
                    tracing::debug!(%msg_type, %error, "content decode failed");
                })?)
            }
            _ => None,
        };

        Ok(MessageEnvelope {
            header,
            parent_header,
            metadata,
            content,
        })
    }

    /// Encodes an envelope as JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Json`] if any part fails to serialise.
    pub fn encode(envelope: &MessageEnvelope) -> Result<String, CodecError> {
        Ok(serde_json::to_string(&Self::encode_value(envelope)?)?)
    }

    /// Encodes an envelope as JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Json`] if any part fails to serialise.
    pub fn encode_to_vec(envelope: &MessageEnvelope) -> Result<Vec<u8>, CodecError> {
        Ok(serde_json::to_vec(&Self::encode_value(envelope)?)?)
    }

    /// Encodes an envelope as a JSON value.
    ///
    /// The header is always emitted (`{}` when absent); parent header,
    /// metadata and content only when present. Content is serialised through
    /// its own shape rather than the header type.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Json`] if any part fails to serialise.
    pub fn encode_value(envelope: &MessageEnvelope) -> Result<Value, CodecError> {
        let mut element = Map::new();
        let header = match &envelope.header {
            Some(header) => serde_json::to_value(header)?,
            None => Value::Object(Map::new()),
        };
        element.insert(HEADER.to_owned(), header);
        if let Some(parent) = &envelope.parent_header {
            element.insert(PARENT_HEADER.to_owned(), serde_json::to_value(parent)?);
        }
        if let Some(metadata) = &envelope.metadata {
            element.insert(METADATA.to_owned(), metadata.clone());
        }
        if let Some(content) = &envelope.content {
            element.insert(CONTENT.to_owned(), content.encode()?);
        }
        Ok(Value::Object(element))
    }
}

fn decode_header(raw: Option<Value>, field: &str) -> Result<Option<MessageHeader>, CodecError> {
    let object = match raw {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Object(object)) if object.is_empty() => return Ok(None),
        Some(Value::Object(object)) => object,
        Some(_) => return Err(CodecError::malformed(format!("{field} must be an object"))),
    };

    // Resolve the type first so an unknown identifier surfaces as such rather
    // than as a generic malformed header.
    match object.get("msg_type") {
        Some(Value::String(msg_type)) => {
            MessageType::from_wire(msg_type)?;
        }
        Some(_) => {
            return Err(CodecError::malformed(format!(
                "{field}.msg_type must be a string"
            )));
        }
        None => {
            return Err(CodecError::malformed(format!("{field}.msg_type is required")));
        }
    }

    serde_json::from_value(Value::Object(object))
        .map(Some)
        .map_err(|error| CodecError::malformed(format!("{field}: {error}")))
}
