//! Unit tests for execution errors and the throwable rendering engine.

use std::sync::Arc;

use eyre::OptionExt;
use rstest::{fixture, rstest};

use crate::rendering::domain::{
    ExecutionError, MimeBundle, Priority, SubtypeThrowableRenderer, ThrowableRenderer,
    TypeDescriptor, Value,
};
use crate::rendering::error::RenderError;
use crate::rendering::services::ThrowableRenderersProcessor;

struct Errors {
    throwable: Arc<TypeDescriptor>,
    runtime: Arc<TypeDescriptor>,
    state: Arc<TypeDescriptor>,
}

#[fixture]
fn errors() -> Errors {
    let throwable = TypeDescriptor::new("java.lang.Throwable").into_shared();
    let runtime = TypeDescriptor::new("java.lang.RuntimeException")
        .with_supertype(Arc::clone(&throwable))
        .into_shared();
    let state = TypeDescriptor::new("java.lang.IllegalStateException")
        .with_supertype(Arc::clone(&runtime))
        .into_shared();
    Errors {
        throwable,
        runtime,
        state,
    }
}

fn html_renderer(ty: Arc<TypeDescriptor>, label: &'static str) -> Arc<dyn ThrowableRenderer> {
    Arc::new(SubtypeThrowableRenderer::new(ty, move |error| {
        Ok(Value::Mime(MimeBundle::html(format!(
            "<b>{label}</b>: {}",
            error.message().unwrap_or_default()
        ))))
    }))
}

// ============================================================================
// Execution errors
// ============================================================================

#[rstest]
fn traceback_lists_frames_and_causes(errors: Errors) {
    let error = ExecutionError::new(errors.runtime)
        .with_message("wrapper")
        .with_frame("Line_4.run(Line_4.kts:3)")
        .with_cause(
            ExecutionError::new(errors.state)
                .with_message("not ready")
                .with_frame("Service.start(Service.kt:12)"),
        );

    assert_eq!(
        error.traceback(),
        vec![
            "java.lang.RuntimeException: wrapper",
            "\tat Line_4.run(Line_4.kts:3)",
            "Caused by: java.lang.IllegalStateException: not ready",
            "\tat Service.start(Service.kt:12)",
        ]
    );
}

#[rstest]
fn summary_without_message_is_the_type_name(errors: Errors) {
    assert_eq!(
        ExecutionError::new(errors.throwable).summary(),
        "java.lang.Throwable"
    );
}

// ============================================================================
// Throwable renderers
// ============================================================================

#[rstest]
fn subtype_renderer_matches_declared_type_and_descendants(errors: Errors) {
    let renderer = SubtypeThrowableRenderer::new(Arc::clone(&errors.runtime), |_| Ok(Value::Null));

    assert!(renderer.accepts(&ExecutionError::new(Arc::clone(&errors.runtime))));
    assert!(renderer.accepts(&ExecutionError::new(errors.state)));
    assert!(!renderer.accepts(&ExecutionError::new(errors.throwable)));
}

#[rstest]
fn unresolved_error_types_do_not_match(errors: Errors) {
    let renderer = SubtypeThrowableRenderer::new(errors.throwable, |_| Ok(Value::Null));
    let broken = TypeDescriptor::unresolved("plugin.BrokenError", "missing class").into_shared();

    assert!(!renderer.accepts(&ExecutionError::new(broken)));
}

#[rstest]
fn highest_priority_accepting_renderer_wins(errors: Errors) -> eyre::Result<()> {
    let processor = ThrowableRenderersProcessor::new();
    processor.register(
        html_renderer(Arc::clone(&errors.throwable), "generic"),
        Priority::DEFAULT,
    );
    processor.register(
        html_renderer(Arc::clone(&errors.runtime), "runtime"),
        Priority::HIGH,
    );

    let rendered = processor
        .render_throwable(&ExecutionError::new(errors.state).with_message("boom"))
        .ok_or_eyre("a renderer accepts the error")?;

    assert_eq!(
        rendered,
        Value::Mime(MimeBundle::html("<b>runtime</b>: boom"))
    );
    Ok(())
}

#[rstest]
fn unmatched_error_is_not_rendered(errors: Errors) {
    let processor = ThrowableRenderersProcessor::new();
    processor.register(html_renderer(errors.state, "state"), Priority::DEFAULT);

    assert!(
        processor
            .render_throwable(&ExecutionError::new(errors.throwable))
            .is_none()
    );
}

#[rstest]
fn failing_renderer_degrades_to_no_rendering(errors: Errors) {
    let processor = ThrowableRenderersProcessor::new();
    processor.register(
        Arc::new(SubtypeThrowableRenderer::new(errors.throwable, |_| {
            Err(RenderError::execution("throwable", "renderer bug"))
        })),
        Priority::DEFAULT,
    );

    assert!(
        processor
            .render_throwable(&ExecutionError::new(errors.state))
            .is_none()
    );
}

#[rstest]
fn unregister_removes_by_identity(errors: Errors) {
    let processor = ThrowableRenderersProcessor::new();
    let renderer = html_renderer(errors.throwable, "generic");
    processor.register(Arc::clone(&renderer), Priority::DEFAULT);

    assert!(processor.unregister(renderer.as_ref()));
    assert!(!processor.unregister(renderer.as_ref()));
    assert!(processor.registered_renderers().is_empty());
}
