//! Message headers used for correlation and reply threading.

use chrono::SecondsFormat;
use mockable::Clock;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::MessageType;

/// Header identifying a message and its type.
///
/// # Examples
///
/// ```
/// use kernel_results::messaging::domain::{MessageHeader, MessageType};
/// use mockable::DefaultClock;
///
/// let header = MessageHeader::new(MessageType::KernelInfoRequest, &DefaultClock)
///     .with_session("session-1");
/// assert_eq!(header.msg_type, MessageType::KernelInfoRequest);
/// assert!(header.date.is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageHeader {
    /// Unique message identifier.
    pub msg_id: String,
    /// Type of the message; dictates the content shape.
    pub msg_type: MessageType,
    /// Client session identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session: Option<String>,
    /// User that sent the message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Protocol version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// RFC 3339 creation timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl MessageHeader {
    /// Creates a header with a fresh identifier stamped with the clock's time.
    #[must_use]
    pub fn new(msg_type: MessageType, clock: &impl Clock) -> Self {
        Self {
            msg_id: Uuid::new_v4().to_string(),
            msg_type,
            session: None,
            username: None,
            version: None,
            date: Some(clock.utc().to_rfc3339_opts(SecondsFormat::Micros, true)),
        }
    }

    /// Creates a header with only the required fields.
    #[must_use]
    pub fn bare(msg_id: impl Into<String>, msg_type: MessageType) -> Self {
        Self {
            msg_id: msg_id.into(),
            msg_type,
            session: None,
            username: None,
            version: None,
            date: None,
        }
    }

    /// Sets the session identifier.
    #[must_use]
    pub fn with_session(mut self, session: impl Into<String>) -> Self {
        self.session = Some(session.into());
        self
    }

    /// Sets the username.
    #[must_use]
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Sets the protocol version.
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }
}
