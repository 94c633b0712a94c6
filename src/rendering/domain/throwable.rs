//! Errors raised by user code during cell execution, and their renderers.

use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value as JsonValue};

use super::type_descriptor::TypeDescriptor;
use super::value::Value;
use crate::rendering::error::RenderError;

/// An error raised by the execution host, with its cause chain.
///
/// # Examples
///
/// ```
/// use kernel_results::rendering::domain::{ExecutionError, TypeDescriptor};
///
/// let error = ExecutionError::new(TypeDescriptor::new("java.lang.IllegalStateException").into_shared())
///     .with_message("boom")
///     .with_frame("Line_3.main(Line_3.kts:2)");
/// assert_eq!(
///     error.traceback(),
///     vec![
///         "java.lang.IllegalStateException: boom".to_owned(),
///         "\tat Line_3.main(Line_3.kts:2)".to_owned(),
///     ],
/// );
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionError {
    ty: Arc<TypeDescriptor>,
    message: Option<String>,
    stack_trace: Vec<String>,
    cause: Option<Box<Self>>,
    additional_info: Map<String, JsonValue>,
}

impl ExecutionError {
    /// Creates an error of the given type.
    #[must_use]
    pub fn new(ty: Arc<TypeDescriptor>) -> Self {
        Self {
            ty,
            message: None,
            stack_trace: Vec::new(),
            cause: None,
            additional_info: Map::new(),
        }
    }

    /// Sets the message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Appends a stack frame.
    #[must_use]
    pub fn with_frame(mut self, frame: impl Into<String>) -> Self {
        self.stack_trace.push(frame.into());
        self
    }

    /// Sets the cause.
    #[must_use]
    pub fn with_cause(mut self, cause: Self) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }

    /// Adds structured information forwarded to the client.
    #[must_use]
    pub fn with_info(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.additional_info.insert(key.into(), value.into());
        self
    }

    /// Returns the error type.
    #[must_use]
    pub const fn ty(&self) -> &Arc<TypeDescriptor> {
        &self.ty
    }

    /// Returns the message.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Returns the stack frames, innermost first.
    #[must_use]
    pub fn stack_trace(&self) -> &[String] {
        &self.stack_trace
    }

    /// Returns the cause.
    #[must_use]
    pub fn cause(&self) -> Option<&Self> {
        self.cause.as_deref()
    }

    /// Returns the structured information.
    #[must_use]
    pub const fn additional_info(&self) -> &Map<String, JsonValue> {
        &self.additional_info
    }

    /// Returns `type: message`, or the type name alone.
    #[must_use]
    pub fn summary(&self) -> String {
        self.message.as_ref().map_or_else(
            || self.ty.name().to_owned(),
            |message| format!("{}: {message}", self.ty.name()),
        )
    }

    /// Renders the error and its causes as traceback lines.
    #[must_use]
    pub fn traceback(&self) -> Vec<String> {
        let mut lines = Vec::new();
        let mut current = Some(self);
        let mut prefix = "";
        while let Some(error) = current {
            lines.push(format!("{prefix}{}", error.summary()));
            lines.extend(error.stack_trace.iter().map(|frame| format!("\tat {frame}")));
            prefix = "Caused by: ";
            current = error.cause();
        }
        lines
    }
}

/// Signature of throwable renderer bodies.
pub type ThrowableRenderFn = dyn Fn(&ExecutionError) -> Result<Value, RenderError> + Send + Sync;

/// A renderer that replaces the displayed value of an execution error.
pub trait ThrowableRenderer: Send + Sync + fmt::Debug + fmt::Display {
    /// Returns `true` when this renderer handles `error`.
    fn accepts(&self, error: &ExecutionError) -> bool;

    /// Produces the value shown in place of the error.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] when the body fails.
    fn render(&self, error: &ExecutionError) -> Result<Value, RenderError>;
}

/// Renders errors whose type is a given type or descends from it.
#[derive(Clone)]
pub struct SubtypeThrowableRenderer {
    super_type: Arc<TypeDescriptor>,
    body: Arc<ThrowableRenderFn>,
}

impl SubtypeThrowableRenderer {
    /// Creates the renderer.
    #[must_use]
    pub fn new<F>(super_type: Arc<TypeDescriptor>, body: F) -> Self
    where
        F: Fn(&ExecutionError) -> Result<Value, RenderError> + Send + Sync + 'static,
    {
        Self {
            super_type,
            body: Arc::new(body),
        }
    }

    /// Returns the accepted supertype.
    #[must_use]
    pub const fn super_type(&self) -> &Arc<TypeDescriptor> {
        &self.super_type
    }
}

impl fmt::Debug for SubtypeThrowableRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubtypeThrowableRenderer")
            .field("super_type", &self.super_type.name())
            .finish_non_exhaustive()
    }
}

impl fmt::Display for SubtypeThrowableRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "throwable renderer of subtypes of {}", self.super_type.name())
    }
}

impl ThrowableRenderer for SubtypeThrowableRenderer {
    fn accepts(&self, error: &ExecutionError) -> bool {
        error
            .ty()
            .is_subtype_of(&self.super_type)
            .unwrap_or_else(|resolution| {
                tracing::debug!(
                    error = %resolution,
                    renderer = %self,
                    "treating unresolved type as non-match"
                );
                false
            })
    }

    fn render(&self, error: &ExecutionError) -> Result<Value, RenderError> {
        (self.body)(error)
    }
}
