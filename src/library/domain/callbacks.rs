//! Callbacks and hooks a library contributes to the kernel.
//!
//! Callbacks receive the execution host so they can run code or declare
//! variables. They report failures as [`CallbackError`] instead of panicking.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::library::error::CallbackError;
use crate::rendering::domain::{FieldValue, TypeDescriptor, TypeName};
use crate::rendering::ports::ExecutionHost;

/// Runs against the host at a lifecycle point (load, shutdown, before a cell).
pub type ExecutionCallback =
    Arc<dyn Fn(&dyn ExecutionHost) -> Result<(), CallbackError> + Send + Sync>;

/// Runs after each cell with the cell's result.
pub type AfterCellExecutionCallback =
    Arc<dyn Fn(&dyn ExecutionHost, &FieldValue) -> Result<(), CallbackError> + Send + Sync>;

/// Runs when the user interrupts execution.
pub type InterruptionCallback = Arc<dyn Fn() + Send + Sync>;

/// Runs when the client switches colour scheme.
pub type ColorSchemeChangedCallback = Arc<dyn Fn(ColorScheme) + Send + Sync>;

/// Returns `true` for variables hidden from the user.
pub type InternalVariablesMarker = Arc<dyn Fn(&FieldValue) -> bool + Send + Sync>;

/// Signature of variable converters.
pub type FieldCallback = dyn Fn(&dyn ExecutionHost, &FieldValue) -> Result<Option<FieldValue>, CallbackError>
    + Send
    + Sync;

/// Signature of annotation callbacks; receives the annotated names.
pub type AnnotationCallback =
    dyn Fn(&dyn ExecutionHost, &[TypeName]) -> Result<(), CallbackError> + Send + Sync;

/// Signature of code rewriting callbacks.
pub type CodeRewriteFn =
    dyn Fn(&dyn ExecutionHost, &str) -> Result<PreprocessedCode, CallbackError> + Send + Sync;

/// Client colour scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorScheme {
    /// Light background.
    Light,
    /// Dark background.
    Dark,
}

/// Converts or reacts to variables produced by a cell.
pub trait FieldHandler: Send + Sync + fmt::Debug {
    /// Returns `true` when this handler applies to `field`.
    fn accepts(&self, field: &FieldValue) -> bool;

    /// Handles the variable, optionally replacing it.
    ///
    /// # Errors
    ///
    /// Returns [`CallbackError`] when the handler fails.
    fn execute(
        &self,
        host: &dyn ExecutionHost,
        field: &FieldValue,
    ) -> Result<Option<FieldValue>, CallbackError>;
}

/// Handles variables whose runtime type descends from a given type.
#[derive(Clone)]
pub struct SubtypeFieldHandler {
    super_type: Arc<TypeDescriptor>,
    callback: Arc<FieldCallback>,
}

impl SubtypeFieldHandler {
    /// Creates the handler.
    #[must_use]
    pub fn new<F>(super_type: Arc<TypeDescriptor>, callback: F) -> Self
    where
        F: Fn(&dyn ExecutionHost, &FieldValue) -> Result<Option<FieldValue>, CallbackError>
            + Send
            + Sync
            + 'static,
    {
        Self {
            super_type,
            callback: Arc::new(callback),
        }
    }
}

impl fmt::Debug for SubtypeFieldHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubtypeFieldHandler")
            .field("super_type", &self.super_type.name())
            .finish_non_exhaustive()
    }
}

impl FieldHandler for SubtypeFieldHandler {
    fn accepts(&self, field: &FieldValue) -> bool {
        field
            .value
            .runtime_type()
            .is_some_and(|ty| ty.is_subtype_of(&self.super_type).unwrap_or(false))
    }

    fn execute(
        &self,
        host: &dyn ExecutionHost,
        field: &FieldValue,
    ) -> Result<Option<FieldValue>, CallbackError> {
        (self.callback)(host, field)
    }
}

/// Runs a callback for declarations carrying a given annotation.
#[derive(Clone)]
pub struct AnnotationHandler {
    annotation: TypeName,
    callback: Arc<AnnotationCallback>,
}

impl AnnotationHandler {
    /// Creates the handler.
    #[must_use]
    pub fn new<F>(annotation: impl Into<TypeName>, callback: F) -> Self
    where
        F: Fn(&dyn ExecutionHost, &[TypeName]) -> Result<(), CallbackError>
            + Send
            + Sync
            + 'static,
    {
        Self {
            annotation: annotation.into(),
            callback: Arc::new(callback),
        }
    }

    /// Returns the annotation type name.
    #[must_use]
    pub fn annotation(&self) -> &str {
        &self.annotation
    }

    /// Runs the callback for the annotated declarations.
    ///
    /// # Errors
    ///
    /// Returns [`CallbackError`] when the callback fails.
    pub fn handle(
        &self,
        host: &dyn ExecutionHost,
        declarations: &[TypeName],
    ) -> Result<(), CallbackError> {
        (self.callback)(host, declarations)
    }
}

impl fmt::Debug for AnnotationHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnnotationHandler")
            .field("annotation", &self.annotation)
            .finish_non_exhaustive()
    }
}

/// Code after preprocessing, with libraries it asks to load.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PreprocessedCode {
    /// Rewritten code.
    pub code: String,
    /// Library references discovered in the code.
    pub libraries: Vec<String>,
}

impl PreprocessedCode {
    /// Wraps code with no library references.
    #[must_use]
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            libraries: Vec::new(),
        }
    }
}

/// Rewrites cell code before it is compiled.
pub trait CodePreprocessor: Send + Sync + fmt::Debug {
    /// Processes `code`.
    ///
    /// # Errors
    ///
    /// Returns [`CallbackError`] when the code cannot be processed.
    fn process(
        &self,
        code: &str,
        host: &dyn ExecutionHost,
    ) -> Result<PreprocessedCode, CallbackError>;
}

/// A [`CodePreprocessor`] built from a closure.
#[derive(Clone)]
pub struct FnCodePreprocessor {
    body: Arc<CodeRewriteFn>,
}

impl FnCodePreprocessor {
    /// Creates the preprocessor.
    #[must_use]
    pub fn new<F>(body: F) -> Self
    where
        F: Fn(&dyn ExecutionHost, &str) -> Result<PreprocessedCode, CallbackError>
            + Send
            + Sync
            + 'static,
    {
        Self {
            body: Arc::new(body),
        }
    }
}

impl fmt::Debug for FnCodePreprocessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnCodePreprocessor").finish_non_exhaustive()
    }
}

impl CodePreprocessor for FnCodePreprocessor {
    fn process(
        &self,
        code: &str,
        host: &dyn ExecutionHost,
    ) -> Result<PreprocessedCode, CallbackError> {
        (self.body)(host, code)
    }
}
