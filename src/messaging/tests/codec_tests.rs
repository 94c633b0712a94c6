//! Unit tests for envelope encoding and decoding.

use crate::messaging::codec::EnvelopeCodec;
use std::collections::BTreeMap;

use crate::messaging::domain::{
    AbortReply, Comm, CommInfoReply, CommOpen, ConnectReply, DetailLevel, DisplayData,
    ExecuteErrorReply, ExecuteReply, ExecuteRequest, ExecuteResult, HelpLink, HistoryRequest,
    InspectRequest, KernelInfoReply, KernelInfoRequest, KernelStatus, LanguageInfo,
    ListErrorsReply, MessageContent, MessageEnvelope, MessageHeader, MessageStatus, MessageType,
    ScriptDiagnostic, Severity, SourcePosition, StatusUpdate,
};
use crate::messaging::error::CodecError;
use eyre::OptionExt;
use mockable::DefaultClock;
use rstest::{fixture, rstest};
use serde_json::{Map, Value, json};

#[fixture]
fn request_header() -> MessageHeader {
    MessageHeader::bare("req-1", MessageType::ExecuteRequest)
        .with_session("session-1")
        .with_username("alice")
        .with_version("5.3")
}

fn round_trip(envelope: &MessageEnvelope) -> eyre::Result<MessageEnvelope> {
    let text = EnvelopeCodec::encode(envelope)?;
    Ok(EnvelopeCodec::decode(&text)?)
}

// ============================================================================
// Decoding
// ============================================================================

#[test]
fn decode_execute_request_applies_protocol_defaults() -> eyre::Result<()> {
    let wire = json!({
        "header": {"msg_id": "1", "msg_type": "execute_request", "session": "s"},
        "parent_header": {},
        "metadata": {},
        "content": {"code": "1 + 1"}
    });

    let envelope = EnvelopeCodec::decode_value(wire)?;

    let Some(MessageContent::ExecuteRequest(request)) = envelope.content else {
        panic!("expected execute request content");
    };
    assert_eq!(request, ExecuteRequest::new("1 + 1"));
    assert!(envelope.parent_header.is_none());
    assert_eq!(envelope.metadata, Some(json!({})));
    Ok(())
}

#[test]
fn decode_without_header_omits_content() -> eyre::Result<()> {
    let wire = json!({"content": {"code": "1"}});

    let envelope = EnvelopeCodec::decode_value(wire)?;

    assert!(envelope.header.is_none());
    assert!(envelope.content.is_none());
    Ok(())
}

#[test]
fn decode_unknown_message_type_is_an_error() {
    let wire = r#"{"header": {"msg_id": "1", "msg_type": "teleport_request"}, "content": {}}"#;

    let result = EnvelopeCodec::decode(wire);

    assert!(matches!(
        result,
        Err(CodecError::UnknownMessageType(ref name)) if name == "teleport_request"
    ));
}

#[test]
fn decode_unknown_message_type_without_content_is_still_an_error() {
    let wire = r#"{"header": {"msg_id": "1", "msg_type": "teleport_request"}}"#;
    assert!(EnvelopeCodec::decode(wire).is_err());
}

#[rstest]
#[case(r#"[]"#)]
#[case(r#"{"header": 3}"#)]
#[case(r#"{"header": {"msg_type": "status"}}"#)]
#[case(r#"{"header": {"msg_id": "1"}}"#)]
#[case(r#"{"header": {"msg_id": "1", "msg_type": 7}}"#)]
#[case("not json")]
fn decode_malformed_envelopes_fail(#[case] wire: &str) {
    let result = EnvelopeCodec::decode(wire);
    assert!(
        matches!(result, Err(CodecError::Malformed(_))),
        "expected malformed error for {wire}, got {result:?}"
    );
}

#[rstest]
#[case(json!([1, 2]))]
#[case(json!("cell-4"))]
#[case(json!({"cell": {"id": 4}}))]
fn decode_carries_metadata_of_any_shape(#[case] metadata: Value) -> eyre::Result<()> {
    let wire = json!({
        "header": {"msg_id": "1", "msg_type": "status"},
        "metadata": metadata.clone()
    });

    let envelope = EnvelopeCodec::decode_value(wire)?;

    assert_eq!(envelope.metadata, Some(metadata.clone()));
    assert_eq!(EnvelopeCodec::encode_value(&envelope)?["metadata"], metadata);
    Ok(())
}

#[test]
fn decode_treats_null_metadata_as_absent() -> eyre::Result<()> {
    let wire = json!({"header": {"msg_id": "1", "msg_type": "status"}, "metadata": null});
    assert!(EnvelopeCodec::decode_value(wire)?.metadata.is_none());
    Ok(())
}

#[test]
fn decode_content_that_does_not_match_shape_fails() {
    let wire = json!({
        "header": {"msg_id": "1", "msg_type": "inspect_request"},
        "content": {"code": "x"}
    });

    let result = EnvelopeCodec::decode_value(wire);

    assert!(matches!(
        result,
        Err(CodecError::ContentShape { ref msg_type, .. }) if msg_type == "inspect_request"
    ));
}

#[test]
fn decode_inspect_request_rejects_unknown_detail_level() {
    let wire = json!({
        "header": {"msg_id": "1", "msg_type": "inspect_request"},
        "content": {"code": "x", "cursor_pos": 1, "detail_level": 5}
    });

    assert!(EnvelopeCodec::decode_value(wire).is_err());
}

#[test]
fn decode_list_errors_reply_reports_unsupported_direction() {
    let wire = json!({
        "header": {"msg_id": "1", "msg_type": "list_errors_reply"},
        "content": {"code": "x", "errors": []}
    });

    let error = EnvelopeCodec::decode_value(wire).expect_err("decode is not implemented");

    assert!(error.is_unsupported_direction());
    assert!(error.to_string().contains("not implemented"));
}

#[test]
fn decode_slice_matches_decode_str() -> eyre::Result<()> {
    let wire = r#"{"header": {"msg_id": "1", "msg_type": "kernel_info_request"}, "content": {}}"#;

    let from_bytes = EnvelopeCodec::decode_slice(wire.as_bytes())?;
    let from_text = EnvelopeCodec::decode(wire)?;

    assert_eq!(from_bytes, from_text);
    Ok(())
}

// ============================================================================
// Encoding
// ============================================================================

#[test]
fn encode_emits_only_present_sections() -> eyre::Result<()> {
    let envelope = MessageEnvelope {
        header: Some(MessageHeader::bare("1", MessageType::Status)),
        ..MessageEnvelope::default()
    };

    let value = EnvelopeCodec::encode_value(&envelope)?;

    assert_eq!(value, json!({"header": {"msg_id": "1", "msg_type": "status"}}));
    Ok(())
}

#[test]
fn encode_without_header_emits_empty_header() -> eyre::Result<()> {
    let value = EnvelopeCodec::encode_value(&MessageEnvelope::default())?;
    assert_eq!(value, json!({"header": {}}));
    Ok(())
}

#[test]
fn encode_uses_content_identity_not_header_type() -> eyre::Result<()> {
    let reply = ExecuteErrorReply {
        status: MessageStatus::Error,
        execution_count: 3,
        ename: "IllegalState".to_owned(),
        evalue: "boom".to_owned(),
        traceback: vec!["at line 1".to_owned()],
        additional_info: Map::new(),
    };
    let envelope = MessageEnvelope::new(MessageHeader::bare("r", MessageType::ExecuteReply), reply);

    let value = EnvelopeCodec::encode_value(&envelope)?;

    assert_eq!(value["header"]["msg_type"], "execute_reply");
    assert_eq!(value["content"]["status"], "error");
    assert_eq!(value["content"]["ename"], "IllegalState");
    assert_eq!(value["content"]["additionalInfo"], json!({}));
    Ok(())
}

#[test]
fn encode_list_errors_reply_serialises_diagnostics() -> eyre::Result<()> {
    let reply = ListErrorsReply {
        code: "val x: Int = \"\"".to_owned(),
        errors: vec![
            ScriptDiagnostic::new("type mismatch", Severity::Error).at(
                SourcePosition::new(1, 14),
                Some(SourcePosition::new(1, 16)),
            ),
            ScriptDiagnostic::new("unused", Severity::Warning)
                .at(SourcePosition::new(1, 5), None),
            ScriptDiagnostic::new("no location", Severity::Info),
        ],
    };
    let envelope =
        MessageEnvelope::new(MessageHeader::bare("d", MessageType::ListErrorsReply), reply);

    let value = EnvelopeCodec::encode_value(&envelope)?;

    assert_eq!(
        value["content"]["errors"],
        json!([
            {"message": "type mismatch", "severity": "ERROR",
             "start": {"line": 1, "col": 14}, "end": {"line": 1, "col": 16}},
            {"message": "unused", "severity": "WARNING", "start": {"line": 1, "col": 5}},
            {"message": "no location", "severity": "INFO"}
        ])
    );
    Ok(())
}

#[test]
fn script_diagnostic_decode_is_not_implemented() {
    let result = serde_json::from_value::<ScriptDiagnostic>(json!({"message": "m"}));
    let error = result.expect_err("decode is encode-only");
    assert!(error.to_string().contains("not implemented"));
}

// ============================================================================
// Round trips
// ============================================================================

#[rstest]
fn round_trip_preserves_all_sections(request_header: MessageHeader) -> eyre::Result<()> {
    let envelope = MessageEnvelope::new(
        MessageHeader::bare("rep-1", MessageType::ExecuteReply),
        ExecuteReply::new(MessageStatus::Ok, 4),
    )
    .with_parent_header(request_header)
    .with_metadata(json!({"cell": {"id": 4}}));

    assert_eq!(round_trip(&envelope)?, envelope);
    Ok(())
}

#[test]
fn round_trip_preserves_absent_optional_sections() -> eyre::Result<()> {
    let envelope = MessageEnvelope::new(
        MessageHeader::bare("k", MessageType::KernelInfoRequest),
        KernelInfoRequest {},
    );

    let decoded = round_trip(&envelope)?;

    assert_eq!(decoded, envelope);
    assert!(decoded.parent_header.is_none());
    assert!(decoded.metadata.is_none());
    Ok(())
}

#[test]
fn round_trip_without_content() -> eyre::Result<()> {
    let envelope = MessageEnvelope {
        header: Some(MessageHeader::bare("k", MessageType::ShutdownRequest)),
        ..MessageEnvelope::default()
    };
    assert_eq!(round_trip(&envelope)?, envelope);
    Ok(())
}

fn failed_execute_reply() -> MessageContent {
    let mut additional_info = Map::new();
    additional_info.insert("lineStart".to_owned(), json!(2));
    MessageContent::ExecuteReply(ExecuteReply {
        ename: Some("java.lang.IllegalStateException".to_owned()),
        evalue: Some("boom".to_owned()),
        traceback: Some(vec!["\tat Line_3.main(Line_3.kts:2)".to_owned()]),
        additional_info: Some(additional_info),
        ..ExecuteReply::new(MessageStatus::Error, 3)
    })
}

fn kernel_info_reply() -> MessageContent {
    MessageContent::KernelInfoReply(KernelInfoReply {
        status: MessageStatus::Ok,
        protocol_version: "5.3".to_owned(),
        implementation: "kernel".to_owned(),
        implementation_version: "0.12.0".to_owned(),
        banner: "Interactive kernel".to_owned(),
        language_info: LanguageInfo {
            name: "kotlin".to_owned(),
            version: "2.0".to_owned(),
            mimetype: "text/x-kotlin".to_owned(),
            file_extension: ".kt".to_owned(),
            pygments_lexer: "kotlin".to_owned(),
            codemirror_mode: "text/x-kotlin".to_owned(),
            nbconvert_exporter: String::new(),
        },
        help_links: vec![HelpLink {
            text: "Docs".to_owned(),
            url: "https://docs.example".to_owned(),
        }],
    })
}

fn ranged_history_request() -> MessageContent {
    MessageContent::HistoryRequest(HistoryRequest {
        output: true,
        raw: false,
        hist_access_type: "search".to_owned(),
        session: Some(1),
        start: Some(2),
        stop: Some(8),
        n: Some(5),
        pattern: Some("plot*".to_owned()),
        unique: Some(true),
    })
}

fn connect_reply() -> MessageContent {
    let mut ports = Map::new();
    ports.insert("shell_port".to_owned(), json!(5000));
    ports.insert("iopub_port".to_owned(), json!(5001));
    MessageContent::ConnectReply(ConnectReply { ports })
}

fn comm_info_reply() -> MessageContent {
    MessageContent::CommInfoReply(CommInfoReply {
        comms: BTreeMap::from([(
            "c1".to_owned(),
            Comm {
                target_name: "widgets".to_owned(),
            },
        )]),
    })
}

fn execute_result() -> MessageContent {
    MessageContent::ExecuteResult(ExecuteResult {
        data: json!({"text/plain": "ListOf[1]", "text/html": "<ul><li>1</li></ul>"}),
        metadata: json!({}),
        execution_count: 7,
    })
}

fn display_with_null_data() -> MessageContent {
    MessageContent::DisplayData(DisplayData {
        data: Some(Value::Null),
        metadata: None,
        transient: Some(json!({"display_id": "d1"})),
    })
}

#[rstest]
#[case(MessageType::InspectRequest, MessageContent::InspectRequest(InspectRequest {
    code: "foo.".to_owned(),
    cursor_pos: 4,
    detail_level: DetailLevel::Detailed,
}))]
#[case(MessageType::Status, MessageContent::Status(StatusUpdate {
    execution_state: KernelStatus::Busy,
}))]
#[case(MessageType::CommOpen, MessageContent::CommOpen(CommOpen {
    comm_id: "c1".to_owned(),
    target_name: "widgets".to_owned(),
    data: Map::new(),
}))]
#[case(MessageType::ExecuteReply, failed_execute_reply())]
#[case(MessageType::KernelInfoReply, kernel_info_reply())]
#[case(MessageType::HistoryRequest, ranged_history_request())]
#[case(MessageType::ConnectReply, connect_reply())]
#[case(MessageType::CommInfoReply, comm_info_reply())]
#[case(MessageType::ExecuteResult, execute_result())]
#[case(MessageType::None, MessageContent::Abort(AbortReply::default()))]
#[case(MessageType::UpdateDisplayData, display_with_null_data())]
fn round_trip_preserves_typed_content(
    #[case] msg_type: MessageType,
    #[case] content: MessageContent,
) -> eyre::Result<()> {
    let envelope = MessageEnvelope::new(MessageHeader::bare("m", msg_type), content);
    assert_eq!(round_trip(&envelope)?, envelope);
    Ok(())
}

#[rstest]
fn reply_to_threads_parent_header(request_header: MessageHeader) -> eyre::Result<()> {
    let request = MessageEnvelope::new(request_header.clone(), ExecuteRequest::new("1"));

    let reply = MessageEnvelope::reply_to(
        &request,
        MessageType::ExecuteReply,
        ExecuteReply::new(MessageStatus::Ok, 1),
        &DefaultClock,
    );

    let header = reply.header.as_ref().ok_or_eyre("reply header")?;
    assert_eq!(reply.parent_header, Some(request_header));
    assert_eq!(header.msg_type, MessageType::ExecuteReply);
    assert_eq!(header.session.as_deref(), Some("session-1"));
    assert_eq!(header.username.as_deref(), Some("alice"));
    assert_ne!(header.msg_id, "req-1");
    assert_eq!(round_trip(&reply)?, reply);
    Ok(())
}

#[test]
fn encoded_bytes_decode_back() -> eyre::Result<()> {
    let envelope = MessageEnvelope::new(
        MessageHeader::bare("b", MessageType::ExecuteRequest),
        ExecuteRequest::new("println(1)"),
    );
    let bytes = EnvelopeCodec::encode_to_vec(&envelope)?;
    let decoded = EnvelopeCodec::decode_slice(&bytes)?;
    assert_eq!(decoded, envelope);
    assert!(matches!(
        serde_json::from_slice::<Value>(&bytes),
        Ok(Value::Object(_))
    ));
    Ok(())
}
