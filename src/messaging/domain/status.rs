//! Reply and kernel status enumerations.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome status carried by reply content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageStatus {
    /// The request succeeded.
    #[default]
    Ok,
    /// The request failed.
    Error,
    /// The request was aborted before running.
    Abort,
}

impl MessageStatus {
    /// Returns the wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Error => "error",
            Self::Abort => "abort",
        }
    }
}

impl fmt::Display for MessageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Execution state broadcast on `status` messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KernelStatus {
    /// The kernel is executing a request.
    Busy,
    /// The kernel is waiting for requests.
    Idle,
    /// The kernel is starting up.
    Starting,
}
