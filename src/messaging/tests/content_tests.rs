//! Unit tests for individual content shapes.

use crate::messaging::domain::{
    AbortReply, CommMsg, ConnectReply, HistoryRequest, InputRequest, InspectReply,
    MessageContent, MessageStatus, MessageType,
};
use crate::messaging::error::CodecError;
use serde_json::{Map, json};

#[test]
fn none_type_decodes_to_abort_reply() -> eyre::Result<()> {
    let content = MessageContent::decode(MessageType::None, json!({}))?;
    assert_eq!(content, MessageContent::Abort(AbortReply::default()));
    assert_eq!(content.encode()?, json!({"status": "abort"}));
    Ok(())
}

#[test]
fn display_and_update_display_share_one_shape() -> eyre::Result<()> {
    let raw = json!({"data": {"text/plain": "1"}, "metadata": {}});

    let display = MessageContent::decode(MessageType::DisplayData, raw.clone())?;
    let update = MessageContent::decode(MessageType::UpdateDisplayData, raw)?;

    assert_eq!(display, update);
    assert_eq!(display.shape_name(), "display_data");
    Ok(())
}

#[test]
fn connect_reply_is_the_port_mapping_itself() -> eyre::Result<()> {
    let raw = json!({"shell_port": 5000, "iopub_port": 5001});

    let content = MessageContent::decode(MessageType::ConnectReply, raw.clone())?;

    let MessageContent::ConnectReply(ConnectReply { ports }) = &content else {
        panic!("expected connect reply");
    };
    assert_eq!(ports.get("shell_port"), Some(&json!(5000)));
    assert_eq!(content.encode()?, raw);
    Ok(())
}

#[test]
fn input_request_password_defaults_to_false() -> eyre::Result<()> {
    let content = MessageContent::decode(MessageType::InputRequest, json!({"prompt": "> "}))?;
    assert_eq!(
        content,
        MessageContent::InputRequest(InputRequest {
            prompt: "> ".to_owned(),
            password: false,
        })
    );
    Ok(())
}

#[test]
fn comm_msg_data_defaults_to_empty_object() -> eyre::Result<()> {
    let content = MessageContent::decode(MessageType::CommMsg, json!({"comm_id": "c"}))?;
    assert_eq!(
        content,
        MessageContent::CommMsg(CommMsg {
            comm_id: "c".to_owned(),
            data: Map::new(),
        })
    );
    Ok(())
}

#[test]
fn inspect_reply_emits_ok_status() -> eyre::Result<()> {
    let reply = InspectReply {
        found: true,
        ..InspectReply::default()
    };
    let value = MessageContent::from(reply).encode()?;
    assert_eq!(
        value,
        json!({"status": "ok", "found": true, "data": {}, "metadata": {}})
    );
    Ok(())
}

#[test]
fn history_request_skips_unset_access_fields() -> eyre::Result<()> {
    let request = HistoryRequest {
        output: false,
        raw: true,
        hist_access_type: "tail".to_owned(),
        session: None,
        start: None,
        stop: None,
        n: Some(10),
        pattern: None,
        unique: None,
    };
    let value = MessageContent::from(request.clone()).encode()?;
    assert_eq!(
        value,
        json!({"output": false, "raw": true, "hist_access_type": "tail", "n": 10})
    );
    let decoded = MessageContent::decode(MessageType::HistoryRequest, value)?;
    assert_eq!(decoded, MessageContent::HistoryRequest(request));
    Ok(())
}

#[test]
fn execute_reply_status_is_required() {
    let result = MessageContent::decode(MessageType::ExecuteReply, json!({"execution_count": 1}));
    assert!(matches!(result, Err(CodecError::ContentShape { .. })));
}

#[test]
fn message_status_wire_names() -> eyre::Result<()> {
    assert_eq!(MessageStatus::Abort.to_string(), "abort");
    assert_eq!(serde_json::to_value(MessageStatus::Error)?, json!("error"));
    Ok(())
}
