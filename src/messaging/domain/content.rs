//! Content payload shapes carried inside message envelopes.
//!
//! Every [`MessageType`] dictates exactly one shape. Field names on the wire
//! follow the protocol's snake case (`execution_count`, `cursor_pos`) and
//! are mapped with serde attributes where the Rust names differ.
//!
//! [`MessageContent`] is the closed sum of all shapes. Encoding dispatches on
//! the variant itself, so replies such as [`ExecuteErrorReply`] can be sent
//! under an `execute_reply` header without a type token of their own.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use super::{DetailLevel, KernelStatus, MessageStatus, MessageType, ScriptDiagnostic};
use crate::messaging::error::CodecError;

/// Structured JSON object passed through untouched.
pub type JsonObject = Map<String, Value>;

const fn yes() -> bool {
    true
}

const fn abort_status() -> MessageStatus {
    MessageStatus::Abort
}

const fn error_status() -> MessageStatus {
    MessageStatus::Error
}

/// Keeps an explicit `null` as `Some(Value::Null)`; only a missing field is
/// `None`.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// Reply sent when a request was aborted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbortReply {
    /// Always `abort`.
    #[serde(default = "abort_status")]
    pub status: MessageStatus,
}

impl Default for AbortReply {
    fn default() -> Self {
        Self {
            status: MessageStatus::Abort,
        }
    }
}

/// Generic error reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorReply {
    /// Always `error`.
    #[serde(default = "error_status")]
    pub status: MessageStatus,
    /// Error type name.
    pub ename: String,
    /// Error message.
    pub evalue: String,
    /// Rendered stack trace lines.
    pub traceback: Vec<String>,
}

impl ErrorReply {
    /// Creates an error reply.
    #[must_use]
    pub fn new(ename: impl Into<String>, evalue: impl Into<String>, traceback: Vec<String>) -> Self {
        Self {
            status: MessageStatus::Error,
            ename: ename.into(),
            evalue: evalue.into(),
            traceback,
        }
    }
}

/// Error reply to an execute request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecuteErrorReply {
    /// Always `error`.
    #[serde(default = "error_status")]
    pub status: MessageStatus,
    /// Execution counter of the failed cell.
    pub execution_count: u64,
    /// Error type name.
    pub ename: String,
    /// Rendered error value.
    pub evalue: String,
    /// Rendered stack trace lines.
    pub traceback: Vec<String>,
    /// Extra structured information about the failure.
    #[serde(rename = "additionalInfo")]
    pub additional_info: JsonObject,
}

/// Request to execute a code fragment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecuteRequest {
    /// Source code to execute.
    pub code: String,
    /// Run without broadcasting output or incrementing the counter.
    #[serde(default)]
    pub silent: bool,
    /// Record the fragment in history.
    #[serde(default = "yes")]
    pub store_history: bool,
    /// Expressions to evaluate after execution.
    #[serde(default)]
    pub user_expressions: BTreeMap<String, String>,
    /// Whether the code may request stdin.
    #[serde(default = "yes")]
    pub allow_stdin: bool,
    /// Abort queued requests when this one fails.
    #[serde(default = "yes")]
    pub stop_on_error: bool,
}

impl ExecuteRequest {
    /// Creates a request with protocol defaults for all flags.
    #[must_use]
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            silent: false,
            store_history: true,
            user_expressions: BTreeMap::new(),
            allow_stdin: true,
            stop_on_error: true,
        }
    }
}

/// Payload entry attached to an execute reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payload {
    /// Payload source identifier.
    pub source: String,
}

/// Reply to an execute request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecuteReply {
    /// Outcome of the execution.
    pub status: MessageStatus,
    /// Execution counter.
    pub execution_count: u64,
    /// Extra payloads.
    #[serde(default)]
    pub payload: Vec<Payload>,
    /// Results of the requested user expressions.
    #[serde(default)]
    pub user_expressions: BTreeMap<String, Value>,
    /// Error type name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ename: Option<String>,
    /// Error value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evalue: Option<String>,
    /// Error stack trace.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub traceback: Option<Vec<String>>,
    /// Extra structured information.
    #[serde(
        rename = "additionalInfo",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub additional_info: Option<JsonObject>,
}

impl ExecuteReply {
    /// Creates a reply with no error fields set.
    #[must_use]
    pub const fn new(status: MessageStatus, execution_count: u64) -> Self {
        Self {
            status,
            execution_count,
            payload: Vec::new(),
            user_expressions: BTreeMap::new(),
            ename: None,
            evalue: None,
            traceback: None,
            additional_info: None,
        }
    }
}

/// Request for introspection of the code under the cursor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InspectRequest {
    /// Code containing the cursor.
    pub code: String,
    /// Cursor offset.
    pub cursor_pos: u32,
    /// Requested level of detail.
    pub detail_level: DetailLevel,
}

/// Reply to an inspect request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InspectReply {
    /// Always `ok`.
    #[serde(default)]
    pub status: MessageStatus,
    /// Whether anything was found.
    pub found: bool,
    /// MIME bundle describing the object.
    #[serde(default)]
    pub data: JsonObject,
    /// Metadata for the bundle.
    #[serde(default)]
    pub metadata: JsonObject,
}

/// Request for completions at the cursor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompleteRequest {
    /// Code containing the cursor.
    pub code: String,
    /// Cursor offset.
    pub cursor_pos: u32,
}

/// Reply carrying completion candidates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompleteReply {
    /// Always `ok`.
    #[serde(default)]
    pub status: MessageStatus,
    /// Completion candidates.
    pub matches: Vec<String>,
    /// Start of the replaced range.
    pub cursor_start: u32,
    /// End of the replaced range.
    pub cursor_end: u32,
    /// Extra completion metadata.
    #[serde(default)]
    pub metadata: JsonObject,
}

/// Request to check whether code is complete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IsCompleteRequest {
    /// Code to check.
    pub code: String,
}

/// Reply to an is-complete request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IsCompleteReply {
    /// One of `complete`, `incomplete`, `invalid` or `unknown`.
    pub status: String,
    /// Indentation hint for incomplete code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indent: Option<String>,
}

/// Request for kernel information.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KernelInfoRequest {}

/// Link shown in the client's help menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelpLink {
    /// Link text.
    pub text: String,
    /// Link target.
    pub url: String,
}

/// Language the kernel executes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageInfo {
    /// Language name.
    pub name: String,
    /// Language version.
    pub version: String,
    /// MIME type of source files.
    pub mimetype: String,
    /// Source file extension.
    pub file_extension: String,
    /// Pygments lexer name.
    pub pygments_lexer: String,
    /// `CodeMirror` mode name.
    pub codemirror_mode: String,
    /// Exporter used by nbconvert.
    pub nbconvert_exporter: String,
}

/// Reply carrying kernel information.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KernelInfoReply {
    /// Always `ok`.
    #[serde(default)]
    pub status: MessageStatus,
    /// Protocol version implemented by the kernel.
    pub protocol_version: String,
    /// Kernel implementation name.
    pub implementation: String,
    /// Kernel implementation version.
    pub implementation_version: String,
    /// Banner shown on startup.
    pub banner: String,
    /// Language description.
    pub language_info: LanguageInfo,
    /// Help menu links.
    pub help_links: Vec<HelpLink>,
}

/// Request to shut the kernel down.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShutdownRequest {
    /// Whether the kernel will be restarted.
    pub restart: bool,
}

/// Reply to a shutdown request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShutdownReply {
    /// Whether the kernel will be restarted.
    pub restart: bool,
}

/// Request to interrupt execution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterruptRequest {}

/// Reply to an interrupt request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterruptReply {}

/// Debugger request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebugRequest {}

/// Debugger reply.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebugReply {}

/// Chunk of an output stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamOutput {
    /// Stream name (`stdout` or `stderr`).
    pub name: String,
    /// Text written to the stream.
    pub text: String,
}

/// Rich display output; used for both display and update messages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DisplayData {
    /// MIME bundle.
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "present")]
    pub data: Option<Value>,
    /// Metadata for the bundle.
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "present")]
    pub metadata: Option<Value>,
    /// Transient data such as the display id.
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "present")]
    pub transient: Option<Value>,
}

/// Broadcast of the code being executed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecuteInput {
    /// Code being executed.
    pub code: String,
    /// Execution counter.
    pub execution_count: u64,
}

/// Broadcast of an execution result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecuteResult {
    /// MIME bundle of the result.
    pub data: Value,
    /// Metadata for the bundle.
    pub metadata: Value,
    /// Execution counter.
    pub execution_count: u64,
}

/// Kernel status broadcast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdate {
    /// Current execution state.
    pub execution_state: KernelStatus,
}

/// Request to clear the output area.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearOutput {
    /// Wait for new output before clearing.
    pub wait: bool,
}

/// Debugger event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebugEvent {}

/// Kernel asks the client for a line of input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputRequest {
    /// Prompt to display.
    pub prompt: String,
    /// Hide the typed characters.
    #[serde(default)]
    pub password: bool,
}

/// Client answer to an input request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputReply {
    /// Text entered by the user.
    pub value: String,
}

/// Request for execution history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRequest {
    /// Include outputs.
    pub output: bool,
    /// Return raw input.
    pub raw: bool,
    /// One of `range`, `tail` or `search`.
    pub hist_access_type: String,
    /// Session for `range` access.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session: Option<i64>,
    /// First cell for `range` access.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<i64>,
    /// Last cell for `range` access.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop: Option<i64>,
    /// Number of entries for `tail` and `search` access.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n: Option<i64>,
    /// Glob pattern for `search` access.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    /// Drop duplicates for `search` access.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unique: Option<bool>,
}

/// Reply carrying execution history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryReply {
    /// History entries.
    pub history: Vec<String>,
}

/// Request for connection information.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectRequest {}

/// Reply carrying the port mapping; serialised as the mapping itself.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectReply {
    /// Channel name to port mapping, passed through opaquely.
    pub ports: JsonObject,
}

/// Request for the list of open comms.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommInfoRequest {
    /// Restrict the listing to one target.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_name: Option<String>,
}

/// Description of an open comm.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comm {
    /// Target the comm was opened for.
    pub target_name: String,
}

/// Reply listing open comms by id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommInfoReply {
    /// Open comms keyed by comm id.
    pub comms: BTreeMap<String, Comm>,
}

/// Opens a comm channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommOpen {
    /// Comm identifier.
    pub comm_id: String,
    /// Target handler name.
    pub target_name: String,
    /// Initial data.
    #[serde(default)]
    pub data: JsonObject,
}

/// Message on an open comm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommMsg {
    /// Comm identifier.
    pub comm_id: String,
    /// Message data.
    #[serde(default)]
    pub data: JsonObject,
}

/// Closes a comm channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommClose {
    /// Comm identifier.
    pub comm_id: String,
    /// Final data.
    #[serde(default)]
    pub data: JsonObject,
}

/// Request for compiler diagnostics of a fragment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListErrorsRequest {
    /// Code to analyse.
    pub code: String,
}

/// Reply carrying compiler diagnostics. Encode-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListErrorsReply {
    /// Analysed code.
    pub code: String,
    /// Diagnostics found.
    pub errors: Vec<ScriptDiagnostic>,
}

macro_rules! content_shapes {
    ($($variant:ident($shape:ident) => $name:literal),+ $(,)?) => {
        /// Typed content of a message envelope.
        #[derive(Debug, Clone, PartialEq)]
        pub enum MessageContent {
            $(
                #[doc = concat!("`", $name, "` content.")]
                $variant($shape),
            )+
        }

        impl MessageContent {
            /// Returns the name of the concrete shape.
            #[must_use]
            pub const fn shape_name(&self) -> &'static str {
                match self {
                    $(Self::$variant(_) => $name,)+
                }
            }

            /// Serialises the content through its own shape.
            ///
            /// # Errors
            ///
            /// Returns [`CodecError::Json`] if serialisation fails.
            pub fn encode(&self) -> Result<Value, CodecError> {
                match self {
                    $(Self::$variant(inner) => Ok(serde_json::to_value(inner)?),)+
                }
            }
        }

        $(
            impl From<$shape> for MessageContent {
                fn from(value: $shape) -> Self {
                    Self::$variant(value)
                }
            }
        )+
    };
}

content_shapes! {
    Abort(AbortReply) => "abort_reply",
    Error(ErrorReply) => "error_reply",
    ExecuteError(ExecuteErrorReply) => "execute_error_reply",
    ExecuteRequest(ExecuteRequest) => "execute_request",
    ExecuteReply(ExecuteReply) => "execute_reply",
    ExecuteInput(ExecuteInput) => "execute_input",
    ExecuteResult(ExecuteResult) => "execute_result",
    InspectRequest(InspectRequest) => "inspect_request",
    InspectReply(InspectReply) => "inspect_reply",
    CompleteRequest(CompleteRequest) => "complete_request",
    CompleteReply(CompleteReply) => "complete_reply",
    IsCompleteRequest(IsCompleteRequest) => "is_complete_request",
    IsCompleteReply(IsCompleteReply) => "is_complete_reply",
    KernelInfoRequest(KernelInfoRequest) => "kernel_info_request",
    KernelInfoReply(KernelInfoReply) => "kernel_info_reply",
    ShutdownRequest(ShutdownRequest) => "shutdown_request",
    ShutdownReply(ShutdownReply) => "shutdown_reply",
    InterruptRequest(InterruptRequest) => "interrupt_request",
    InterruptReply(InterruptReply) => "interrupt_reply",
    DebugRequest(DebugRequest) => "debug_request",
    DebugReply(DebugReply) => "debug_reply",
    Stream(StreamOutput) => "stream",
    DisplayData(DisplayData) => "display_data",
    Status(StatusUpdate) => "status",
    ClearOutput(ClearOutput) => "clear_output",
    DebugEvent(DebugEvent) => "debug_event",
    InputRequest(InputRequest) => "input_request",
    InputReply(InputReply) => "input_reply",
    HistoryRequest(HistoryRequest) => "history_request",
    HistoryReply(HistoryReply) => "history_reply",
    ConnectRequest(ConnectRequest) => "connect_request",
    ConnectReply(ConnectReply) => "connect_reply",
    CommInfoRequest(CommInfoRequest) => "comm_info_request",
    CommInfoReply(CommInfoReply) => "comm_info_reply",
    CommOpen(CommOpen) => "comm_open",
    CommMsg(CommMsg) => "comm_msg",
    CommClose(CommClose) => "comm_close",
    ListErrorsRequest(ListErrorsRequest) => "list_errors_request",
    ListErrorsReply(ListErrorsReply) => "list_errors_reply",
}

impl MessageContent {
    /// Decodes `value` strictly as the shape dictated by `msg_type`.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::ContentShape`] when the value does not match the
    /// shape and [`CodecError::UnsupportedDirection`] for encode-only shapes.
    pub fn decode(msg_type: MessageType, value: Value) -> Result<Self, CodecError> {
        let content = match msg_type {
            MessageType::None => Self::Abort(shape(msg_type, value)?),
            MessageType::ExecuteRequest => Self::ExecuteRequest(shape(msg_type, value)?),
            MessageType::ExecuteReply => Self::ExecuteReply(shape(msg_type, value)?),
            MessageType::ExecuteInput => Self::ExecuteInput(shape(msg_type, value)?),
            MessageType::ExecuteResult => Self::ExecuteResult(shape(msg_type, value)?),
            MessageType::InspectRequest => Self::InspectRequest(shape(msg_type, value)?),
            MessageType::InspectReply => Self::InspectReply(shape(msg_type, value)?),
            MessageType::CompleteRequest => Self::CompleteRequest(shape(msg_type, value)?),
            MessageType::CompleteReply => Self::CompleteReply(shape(msg_type, value)?),
            MessageType::IsCompleteRequest => Self::IsCompleteRequest(shape(msg_type, value)?),
            MessageType::IsCompleteReply => Self::IsCompleteReply(shape(msg_type, value)?),
            MessageType::KernelInfoRequest => Self::KernelInfoRequest(shape(msg_type, value)?),
            MessageType::KernelInfoReply => Self::KernelInfoReply(shape(msg_type, value)?),
            MessageType::ShutdownRequest => Self::ShutdownRequest(shape(msg_type, value)?),
            MessageType::ShutdownReply => Self::ShutdownReply(shape(msg_type, value)?),
            MessageType::InterruptRequest => Self::InterruptRequest(shape(msg_type, value)?),
            MessageType::InterruptReply => Self::InterruptReply(shape(msg_type, value)?),
            MessageType::DebugRequest => Self::DebugRequest(shape(msg_type, value)?),
            MessageType::DebugReply => Self::DebugReply(shape(msg_type, value)?),
            MessageType::Stream => Self::Stream(shape(msg_type, value)?),
            MessageType::DisplayData | MessageType::UpdateDisplayData => {
                Self::DisplayData(shape(msg_type, value)?)
            }
            MessageType::Status => Self::Status(shape(msg_type, value)?),
            MessageType::ClearOutput => Self::ClearOutput(shape(msg_type, value)?),
            MessageType::DebugEvent => Self::DebugEvent(shape(msg_type, value)?),
            MessageType::InputRequest => Self::InputRequest(shape(msg_type, value)?),
            MessageType::InputReply => Self::InputReply(shape(msg_type, value)?),
            MessageType::HistoryRequest => Self::HistoryRequest(shape(msg_type, value)?),
            MessageType::HistoryReply => Self::HistoryReply(shape(msg_type, value)?),
            MessageType::ConnectRequest => Self::ConnectRequest(shape(msg_type, value)?),
            MessageType::ConnectReply => Self::ConnectReply(shape(msg_type, value)?),
            MessageType::CommInfoRequest => Self::CommInfoRequest(shape(msg_type, value)?),
            MessageType::CommInfoReply => Self::CommInfoReply(shape(msg_type, value)?),
            MessageType::CommOpen => Self::CommOpen(shape(msg_type, value)?),
            MessageType::CommMsg => Self::CommMsg(shape(msg_type, value)?),
            MessageType::CommClose => Self::CommClose(shape(msg_type, value)?),
            MessageType::ListErrorsRequest => Self::ListErrorsRequest(shape(msg_type, value)?),
            MessageType::ListErrorsReply => {
                return Err(CodecError::decode_unsupported("list_errors_reply"));
            }
        };
        Ok(content)
    }
}

fn shape<T>(msg_type: MessageType, value: Value) -> Result<T, CodecError>
where
    T: serde::de::DeserializeOwned,
{
    serde_json::from_value(value).map_err(|error| CodecError::ContentShape {
        msg_type: msg_type.as_str().to_owned(),
        reason: error.to_string(),
    })
}
