//! The message envelope aggregate.

use mockable::Clock;
use serde_json::Value;

use super::{MessageContent, MessageHeader, MessageType};

/// Wire-level wrapper around a message.
///
/// # Invariants
///
/// - `content`, when present, matches the shape dictated by the header type
///   (or is an encode-only reply shape sent under that header)
/// - an envelope without a header never carries decoded content
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessageEnvelope {
    /// Identifies the message; required for correlation.
    pub header: Option<MessageHeader>,
    /// Header of the request this message answers.
    pub parent_header: Option<MessageHeader>,
    /// Opaque metadata passed through untouched, whatever its JSON shape.
    pub metadata: Option<Value>,
    /// Typed payload.
    pub content: Option<MessageContent>,
}

impl MessageEnvelope {
    /// Creates an envelope with a header and content.
    #[must_use]
    pub fn new(header: MessageHeader, content: impl Into<MessageContent>) -> Self {
        Self {
            header: Some(header),
            parent_header: None,
            metadata: None,
            content: Some(content.into()),
        }
    }

    /// Builds a reply threaded to `request`.
    ///
    /// The new header copies the request's session, username and protocol
    /// version; the request header becomes the parent header.
    #[must_use]
    pub fn reply_to(
        request: &Self,
        msg_type: MessageType,
        content: impl Into<MessageContent>,
        clock: &impl Clock,
    ) -> Self {
        let mut header = MessageHeader::new(msg_type, clock);
        if let Some(parent) = &request.header {
            header.session.clone_from(&parent.session);
            header.username.clone_from(&parent.username);
            header.version.clone_from(&parent.version);
        }
        Self {
            header: Some(header),
            parent_header: request.header.clone(),
            metadata: None,
            content: Some(content.into()),
        }
    }

    /// Sets the parent header.
    #[must_use]
    pub fn with_parent_header(mut self, parent_header: MessageHeader) -> Self {
        self.parent_header = Some(parent_header);
        self
    }

    /// Sets the metadata.
    #[must_use]
    pub fn with_metadata(mut self, metadata: impl Into<Value>) -> Self {
        self.metadata = Some(metadata.into());
        self
    }

    /// Returns the message type from the header, if any.
    #[must_use]
    pub fn msg_type(&self) -> Option<MessageType> {
        self.header.as_ref().map(|header| header.msg_type)
    }
}
