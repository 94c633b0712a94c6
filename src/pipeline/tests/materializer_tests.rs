//! Tests for `ResultMaterializer`.

use std::sync::Arc;

use rstest::{fixture, rstest};
use serde_json::json;

use crate::messaging::domain::MessageStatus;
use crate::pipeline::ResultMaterializer;
use crate::rendering::config::TextRenderingConfig;
use crate::rendering::domain::{
    ExactRendererHandler, ExecutionError, FieldValue, MimeBundle, Priority,
    SubtypeThrowableRenderer, TypeDescriptor, Value,
};
use crate::rendering::error::RenderError;
use crate::rendering::ports::{HostError, MockExecutionHost};
use crate::rendering::services::{
    RenderersProcessor, TextRenderersProcessor, ThrowableRenderersProcessor,
};

struct Engines {
    renderers: Arc<RenderersProcessor>,
    throwables: Arc<ThrowableRenderersProcessor>,
    materializer: ResultMaterializer,
}

#[fixture]
fn engines() -> Engines {
    let renderers = Arc::new(RenderersProcessor::new());
    let throwables = Arc::new(ThrowableRenderersProcessor::new());
    let materializer = ResultMaterializer::new(
        Arc::clone(&renderers),
        Arc::new(TextRenderersProcessor::with_default_renderers(
            TextRenderingConfig::default(),
        )),
        Arc::clone(&throwables),
    );
    Engines {
        renderers,
        throwables,
        materializer,
    }
}

fn figure_type() -> Arc<TypeDescriptor> {
    TypeDescriptor::new("plots.Figure").into_shared()
}

#[rstest]
fn plain_values_become_text(engines: Engines) {
    let host = MockExecutionHost::new();

    let result = engines
        .materializer
        .materialize(&host, FieldValue::named(Value::Int(42), "res0"), 3);

    assert_eq!(result.data, json!({"text/plain": "42"}));
    assert_eq!(result.metadata, json!({}));
    assert_eq!(result.execution_count, 3);
}

#[rstest]
fn renderer_bundles_are_used_verbatim(engines: Engines) {
    let mut host = MockExecutionHost::new();
    host.expect_execute()
        .withf(|code| code.starts_with("HTML(res1"))
        .times(1)
        .returning(|_| {
            Ok(FieldValue::unnamed(Value::Mime(
                MimeBundle::html("<svg/>").with("text/plain", "Figure"),
            )))
        });
    engines.renderers.register_without_optimizing(
        Arc::new(ExactRendererHandler::new("plots.Figure", "HTML($it.toSvg())")),
        Priority::DEFAULT,
    );
    let figure = Value::opaque(figure_type(), "Figure@1a2b");

    let result = engines
        .materializer
        .materialize(&host, FieldValue::named(figure, "res1"), 4);

    assert_eq!(
        result.data,
        json!({"text/html": "<svg/>", "text/plain": "Figure"})
    );
}

#[rstest]
fn failing_renderer_degrades_to_text(engines: Engines) {
    let mut host = MockExecutionHost::new();
    host.expect_execute()
        .returning(|_| Err(HostError::new("no toSvg")));
    engines.renderers.register_without_optimizing(
        Arc::new(ExactRendererHandler::new("plots.Figure", "HTML($it.toSvg())")),
        Priority::DEFAULT,
    );

    let display = engines.materializer.display(
        &host,
        FieldValue::named(Value::opaque(figure_type(), "Figure@1a2b"), "fig"),
    );

    assert_eq!(display.data, Some(json!({"text/plain": "Figure@1a2b"})));
    assert_eq!(display.transient, None);
}

#[rstest]
fn error_reply_uses_message_without_throwable_renderer(engines: Engines) {
    let error = ExecutionError::new(TypeDescriptor::new("errors.IllegalState").into_shared())
        .with_message("not ready")
        .with_frame("Line_3.run(Line_3.kts:1)")
        .with_info("lineStart", 1);

    let reply = engines.materializer.error_reply(&error, 5);

    assert_eq!(reply.status, MessageStatus::Error);
    assert_eq!(reply.execution_count, 5);
    assert_eq!(reply.ename, "errors.IllegalState");
    assert_eq!(reply.evalue, "not ready");
    assert_eq!(
        reply.traceback,
        [
            "errors.IllegalState: not ready",
            "\tat Line_3.run(Line_3.kts:1)"
        ]
    );
    assert_eq!(reply.additional_info.get("lineStart"), Some(&json!(1)));
}

#[rstest]
fn error_reply_uses_throwable_renderer_output(engines: Engines) {
    let validation = TypeDescriptor::new("errors.Validation").into_shared();
    engines.throwables.register(
        Arc::new(SubtypeThrowableRenderer::new(Arc::clone(&validation), |error| {
            Ok(Value::str(format!(
                "invalid input: {}",
                error.message().unwrap_or_default()
            )))
        })),
        Priority::DEFAULT,
    );

    let reply = engines.materializer.error_reply(
        &ExecutionError::new(validation).with_message("age < 0"),
        6,
    );

    assert_eq!(reply.evalue, "invalid input: age < 0");
}

#[rstest]
fn failing_throwable_renderer_still_produces_a_reply(engines: Engines) {
    let broken = TypeDescriptor::new("errors.Broken").into_shared();
    engines.throwables.register(
        Arc::new(SubtypeThrowableRenderer::new(Arc::clone(&broken), |_| {
            Err(RenderError::execution("renderer", "cannot render"))
        })),
        Priority::DEFAULT,
    );

    let reply = engines
        .materializer
        .error_reply(&ExecutionError::new(broken), 7);

    assert_eq!(reply.ename, "errors.Broken");
    assert_eq!(reply.evalue, "");
    assert_eq!(reply.traceback, ["errors.Broken"]);
}
