//! Conversion of results and errors into message content.

use std::sync::Arc;

use crate::library::services::KernelRegistries;
use crate::messaging::domain::{
    DisplayData, ExecuteErrorReply, ExecuteResult, JsonObject, MessageStatus,
};
use crate::rendering::domain::{ExecutionError, FieldValue, MimeBundle, Value};
use crate::rendering::ports::ExecutionHost;
use crate::rendering::services::{
    RenderersProcessor, TextRenderersProcessor, ThrowableRenderersProcessor,
};

/// Resolves representations for cell results and execution errors.
///
/// Rendering never fails from the caller's point of view: handler failures
/// degrade to the unrendered value and a reply is always produced.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use kernel_results::pipeline::ResultMaterializer;
/// use kernel_results::rendering::config::TextRenderingConfig;
/// use kernel_results::rendering::domain::{ExecutionError, TypeDescriptor};
/// use kernel_results::rendering::services::{
///     RenderersProcessor, TextRenderersProcessor, ThrowableRenderersProcessor,
/// };
///
/// let materializer = ResultMaterializer::new(
///     Arc::new(RenderersProcessor::new()),
///     Arc::new(TextRenderersProcessor::with_default_renderers(TextRenderingConfig::default())),
///     Arc::new(ThrowableRenderersProcessor::new()),
/// );
/// let error = ExecutionError::new(TypeDescriptor::new("errors.Boom").into_shared())
///     .with_message("it broke");
/// let reply = materializer.error_reply(&error, 7);
/// assert_eq!(reply.ename, "errors.Boom");
/// assert_eq!(reply.evalue, "it broke");
/// ```
#[derive(Debug, Clone)]
pub struct ResultMaterializer {
    renderers: Arc<RenderersProcessor>,
    text_renderers: Arc<TextRenderersProcessor>,
    throwable_renderers: Arc<ThrowableRenderersProcessor>,
}

impl ResultMaterializer {
    /// Creates a materialiser over the given engines.
    #[must_use]
    pub const fn new(
        renderers: Arc<RenderersProcessor>,
        text_renderers: Arc<TextRenderersProcessor>,
        throwable_renderers: Arc<ThrowableRenderersProcessor>,
    ) -> Self {
        Self {
            renderers,
            text_renderers,
            throwable_renderers,
        }
    }

    /// Creates a materialiser sharing the engines of `registries`.
    #[must_use]
    pub fn from_registries(registries: &KernelRegistries) -> Self {
        Self::new(
            Arc::clone(registries.renderers()),
            Arc::clone(registries.text_renderers()),
            Arc::clone(registries.throwable_renderers()),
        )
    }

    /// Resolves the MIME bundle displayed for `field`.
    ///
    /// A renderer producing a bundle supplies it as-is; any other value is
    /// rendered as `text/plain` by the text engine.
    #[must_use]
    pub fn render_bundle(&self, host: &dyn ExecutionHost, field: FieldValue) -> MimeBundle {
        match self.renderers.render_value(host, field).into_field().value {
            Value::Mime(bundle) => bundle,
            other => MimeBundle::text(self.text_renderers.render(&other)),
        }
    }

    /// Builds the `execute_result` content for a cell result.
    #[must_use]
    pub fn materialize(
        &self,
        host: &dyn ExecutionHost,
        field: FieldValue,
        execution_count: u64,
    ) -> ExecuteResult {
        ExecuteResult {
            data: self.render_bundle(host, field).into_json(),
            metadata: serde_json::Value::Object(JsonObject::new()),
            execution_count,
        }
    }

    /// Builds `display_data` content for a value displayed mid-cell.
    #[must_use]
    pub fn display(&self, host: &dyn ExecutionHost, field: FieldValue) -> DisplayData {
        DisplayData {
            data: Some(self.render_bundle(host, field).into_json()),
            metadata: Some(serde_json::Value::Object(JsonObject::new())),
            transient: None,
        }
    }

    /// Builds the error reply for a failed cell.
    ///
    /// A matching throwable renderer supplies the displayed error value;
    /// otherwise the error message is used.
    #[must_use]
    pub fn error_reply(&self, error: &ExecutionError, execution_count: u64) -> ExecuteErrorReply {
        let evalue = self.throwable_renderers.render_throwable(error).map_or_else(
            || error.message().unwrap_or_default().to_owned(),
            |rendered| self.text_renderers.render(&rendered),
        );
        ExecuteErrorReply {
            status: MessageStatus::Error,
            execution_count,
            ename: error.ty().name().to_owned(),
            evalue,
            traceback: error.traceback(),
            additional_info: error.additional_info().clone(),
        }
    }
}
