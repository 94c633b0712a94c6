//! Domain types for the wire protocol.
//!
//! Pure data with serde mappings; the envelope-level codec lives in
//! [`crate::messaging::codec`].

mod content;
mod detail_level;
mod diagnostic;
mod envelope;
mod header;
mod message_type;
mod status;

pub use content::{
    AbortReply, ClearOutput, Comm, CommClose, CommInfoReply, CommInfoRequest, CommMsg, CommOpen,
    CompleteReply, CompleteRequest, ConnectReply, ConnectRequest, DebugEvent, DebugReply,
    DebugRequest, DisplayData, ErrorReply, ExecuteErrorReply, ExecuteInput, ExecuteReply,
    ExecuteRequest, ExecuteResult, HelpLink, HistoryReply, HistoryRequest, InputReply,
    InputRequest, InspectReply, InspectRequest, InterruptReply, InterruptRequest,
    IsCompleteReply, IsCompleteRequest, JsonObject, KernelInfoReply, KernelInfoRequest,
    LanguageInfo, ListErrorsReply, ListErrorsRequest, MessageContent, Payload, ShutdownReply,
    ShutdownRequest, StatusUpdate, StreamOutput,
};
pub use detail_level::DetailLevel;
pub use diagnostic::{ScriptDiagnostic, Severity, SourceLocation, SourcePosition};
pub use envelope::MessageEnvelope;
pub use header::MessageHeader;
pub use message_type::MessageType;
pub use status::{KernelStatus, MessageStatus};
