//! The closed wire vocabulary of message types.
//!
//! Each [`MessageType`] maps to exactly one content shape. The wire form is
//! the variant name in lower snake case (`execute_request`, `comm_open`).
//! Decoding a wire string goes through a process-wide cache so repeated
//! lookups of the same string skip the linear scan.

use dashmap::DashMap;
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;

use crate::messaging::error::CodecError;

/// Kind of request, reply or event carried by a message envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageType {
    /// Placeholder type whose content is an abort reply.
    None,
    /// Request to execute a code fragment.
    ExecuteRequest,
    /// Reply to an execute request.
    ExecuteReply,
    /// Broadcast of the code being executed.
    ExecuteInput,
    /// Broadcast of an execution result.
    ExecuteResult,
    /// Request for object introspection.
    InspectRequest,
    /// Reply to an inspect request.
    InspectReply,
    /// Request for code completion.
    CompleteRequest,
    /// Reply to a completion request.
    CompleteReply,
    /// Request to check whether code is complete.
    IsCompleteRequest,
    /// Reply to an is-complete request.
    IsCompleteReply,
    /// Request for kernel information.
    KernelInfoRequest,
    /// Reply carrying kernel information.
    KernelInfoReply,
    /// Request to shut the kernel down.
    ShutdownRequest,
    /// Reply to a shutdown request.
    ShutdownReply,
    /// Request to interrupt execution.
    InterruptRequest,
    /// Reply to an interrupt request.
    InterruptReply,
    /// Debugger request.
    DebugRequest,
    /// Debugger reply.
    DebugReply,
    /// Output stream chunk (stdout/stderr).
    Stream,
    /// Rich display output.
    DisplayData,
    /// Update of a previously displayed output.
    UpdateDisplayData,
    /// Kernel status change.
    Status,
    /// Request to clear cell output.
    ClearOutput,
    /// Debugger event.
    DebugEvent,
    /// Kernel asks the client for input.
    InputRequest,
    /// Client provides requested input.
    InputReply,
    /// Request for execution history.
    HistoryRequest,
    /// Reply carrying execution history.
    HistoryReply,
    /// Request for connection information.
    ConnectRequest,
    /// Reply carrying connection ports.
    ConnectReply,
    /// Request for open comms.
    CommInfoRequest,
    /// Reply listing open comms.
    CommInfoReply,
    /// Opens a comm channel.
    CommOpen,
    /// Message on a comm channel.
    CommMsg,
    /// Closes a comm channel.
    CommClose,
    /// Request for compilation diagnostics.
    ListErrorsRequest,
    /// Reply carrying compilation diagnostics.
    ListErrorsReply,
}

static MESSAGE_TYPE_CACHE: LazyLock<DashMap<String, MessageType>> = LazyLock::new(DashMap::new);

impl MessageType {
    /// Every message type, in declaration order.
    pub const ALL: [Self; 38] = [
        Self::None,
        Self::ExecuteRequest,
        Self::ExecuteReply,
        Self::ExecuteInput,
        Self::ExecuteResult,
        Self::InspectRequest,
        Self::InspectReply,
        Self::CompleteRequest,
        Self::CompleteReply,
        Self::IsCompleteRequest,
        Self::IsCompleteReply,
        Self::KernelInfoRequest,
        Self::KernelInfoReply,
        Self::ShutdownRequest,
        Self::ShutdownReply,
        Self::InterruptRequest,
        Self::InterruptReply,
        Self::DebugRequest,
        Self::DebugReply,
        Self::Stream,
        Self::DisplayData,
        Self::UpdateDisplayData,
        Self::Status,
        Self::ClearOutput,
        Self::DebugEvent,
        Self::InputRequest,
        Self::InputReply,
        Self::HistoryRequest,
        Self::HistoryReply,
        Self::ConnectRequest,
        Self::ConnectReply,
        Self::CommInfoRequest,
        Self::CommInfoReply,
        Self::CommOpen,
        Self::CommMsg,
        Self::CommClose,
        Self::ListErrorsRequest,
        Self::ListErrorsReply,
    ];

    /// Returns the wire identifier of this type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::ExecuteRequest => "execute_request",
            Self::ExecuteReply => "execute_reply",
            Self::ExecuteInput => "execute_input",
            Self::ExecuteResult => "execute_result",
            Self::InspectRequest => "inspect_request",
            Self::InspectReply => "inspect_reply",
            Self::CompleteRequest => "complete_request",
            Self::CompleteReply => "complete_reply",
            Self::IsCompleteRequest => "is_complete_request",
            Self::IsCompleteReply => "is_complete_reply",
            Self::KernelInfoRequest => "kernel_info_request",
            Self::KernelInfoReply => "kernel_info_reply",
            Self::ShutdownRequest => "shutdown_request",
            Self::ShutdownReply => "shutdown_reply",
            Self::InterruptRequest => "interrupt_request",
            Self::InterruptReply => "interrupt_reply",
            Self::DebugRequest => "debug_request",
            Self::DebugReply => "debug_reply",
            Self::Stream => "stream",
            Self::DisplayData => "display_data",
            Self::UpdateDisplayData => "update_display_data",
            Self::Status => "status",
            Self::ClearOutput => "clear_output",
            Self::DebugEvent => "debug_event",
            Self::InputRequest => "input_request",
            Self::InputReply => "input_reply",
            Self::HistoryRequest => "history_request",
            Self::HistoryReply => "history_reply",
            Self::ConnectRequest => "connect_request",
            Self::ConnectReply => "connect_reply",
            Self::CommInfoRequest => "comm_info_request",
            Self::CommInfoReply => "comm_info_reply",
            Self::CommOpen => "comm_open",
            Self::CommMsg => "comm_msg",
            Self::CommClose => "comm_close",
            Self::ListErrorsRequest => "list_errors_request",
            Self::ListErrorsReply => "list_errors_reply",
        }
    }

    /// Resolves a wire identifier, populating the shared cache on success.
    ///
    /// Unknown identifiers are never cached.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::UnknownMessageType`] when no variant has the
    /// given wire identifier.
    pub fn from_wire(value: &str) -> Result<Self, CodecError> {
        if let Some(cached) = MESSAGE_TYPE_CACHE.get(value) {
            return Ok(*cached);
        }
        let resolved = Self::ALL
            .iter()
            .copied()
            .find(|candidate| candidate.as_str() == value)
            .ok_or_else(|| CodecError::UnknownMessageType(value.to_owned()))?;
        Ok(*MESSAGE_TYPE_CACHE
            .entry(value.to_owned())
            .or_insert(resolved)
            .value())
    }

    /// Returns `true` for request types sent by the client.
    #[must_use]
    pub fn is_request(self) -> bool {
        self.as_str().ends_with("_request")
    }

    /// Returns `true` for reply types sent by the kernel.
    #[must_use]
    pub fn is_reply(self) -> bool {
        self.as_str().ends_with("_reply")
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for MessageType {
    type Error = CodecError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::from_wire(value)
    }
}

impl Serialize for MessageType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for MessageType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct MessageTypeVisitor;

        impl Visitor<'_> for MessageTypeVisitor {
            type Value = MessageType;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a message type identifier")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
                MessageType::from_wire(value).map_err(E::custom)
            }
        }

        deserializer.deserialize_str(MessageTypeVisitor)
    }
}
