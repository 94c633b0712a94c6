//! Immutable library definitions.

use std::fmt;
use std::sync::Arc;

use super::acceptance::NameAcceptanceRule;
use super::callbacks::{
    AfterCellExecutionCallback, AnnotationHandler, CodePreprocessor, ColorSchemeChangedCallback,
    ExecutionCallback, FieldHandler, InternalVariablesMarker, InterruptionCallback,
};
use super::resources::{KernelRepository, LibraryResource};
use super::version::KernelVersion;
use crate::rendering::domain::ThrowableRenderer;
use crate::rendering::services::{RendererHandlerWithPriority, TextRendererWithPriority};

/// Everything one library contributes to the kernel.
///
/// Built once by [`super::LibraryDefinitionBuilder`] and consumed when
/// merged into the live registries.
#[derive(Clone, Default)]
pub struct LibraryDefinition {
    pub(crate) renderers: Vec<RendererHandlerWithPriority>,
    pub(crate) text_renderers: Vec<TextRendererWithPriority>,
    pub(crate) throwable_renderers: Vec<Arc<dyn ThrowableRenderer>>,
    pub(crate) converters: Vec<Arc<dyn FieldHandler>>,
    pub(crate) class_annotations: Vec<AnnotationHandler>,
    pub(crate) file_annotations: Vec<AnnotationHandler>,
    pub(crate) code_preprocessors: Vec<Arc<dyn CodePreprocessor>>,
    pub(crate) internal_variables_markers: Vec<InternalVariablesMarker>,
    pub(crate) resources: Vec<LibraryResource>,
    pub(crate) imports: Vec<String>,
    pub(crate) dependencies: Vec<String>,
    pub(crate) repositories: Vec<KernelRepository>,
    pub(crate) init: Vec<ExecutionCallback>,
    pub(crate) shutdown: Vec<ExecutionCallback>,
    pub(crate) before_cell_execution: Vec<ExecutionCallback>,
    pub(crate) after_cell_execution: Vec<AfterCellExecutionCallback>,
    pub(crate) interruption_callbacks: Vec<InterruptionCallback>,
    pub(crate) color_scheme_callbacks: Vec<ColorSchemeChangedCallback>,
    pub(crate) minimal_kernel_version: Option<KernelVersion>,
    pub(crate) integration_type_name_rules: Vec<NameAcceptanceRule>,
}

impl LibraryDefinition {
    /// Value renderers with their priorities, in registration order.
    #[must_use]
    pub fn renderers(&self) -> &[RendererHandlerWithPriority] {
        &self.renderers
    }

    /// Text renderers with their priorities, in registration order.
    #[must_use]
    pub fn text_renderers(&self) -> &[TextRendererWithPriority] {
        &self.text_renderers
    }

    /// Throwable renderers, in registration order.
    #[must_use]
    pub fn throwable_renderers(&self) -> &[Arc<dyn ThrowableRenderer>] {
        &self.throwable_renderers
    }

    /// Variable converters.
    #[must_use]
    pub fn converters(&self) -> &[Arc<dyn FieldHandler>] {
        &self.converters
    }

    /// Handlers for annotated classes.
    #[must_use]
    pub fn class_annotations(&self) -> &[AnnotationHandler] {
        &self.class_annotations
    }

    /// Handlers for file-level annotations.
    #[must_use]
    pub fn file_annotations(&self) -> &[AnnotationHandler] {
        &self.file_annotations
    }

    /// Code preprocessors.
    #[must_use]
    pub fn code_preprocessors(&self) -> &[Arc<dyn CodePreprocessor>] {
        &self.code_preprocessors
    }

    /// Markers for variables hidden from the user.
    #[must_use]
    pub fn internal_variables_markers(&self) -> &[InternalVariablesMarker] {
        &self.internal_variables_markers
    }

    /// Front-end resources.
    #[must_use]
    pub fn resources(&self) -> &[LibraryResource] {
        &self.resources
    }

    /// Default imports.
    #[must_use]
    pub fn imports(&self) -> &[String] {
        &self.imports
    }

    /// Dependency coordinates.
    #[must_use]
    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    /// Repositories consulted for dependencies.
    #[must_use]
    pub fn repositories(&self) -> &[KernelRepository] {
        &self.repositories
    }

    /// Callbacks run when the library is loaded.
    #[must_use]
    pub fn init(&self) -> &[ExecutionCallback] {
        &self.init
    }

    /// Callbacks run when the kernel shuts down.
    #[must_use]
    pub fn shutdown(&self) -> &[ExecutionCallback] {
        &self.shutdown
    }

    /// Callbacks run before each cell.
    #[must_use]
    pub fn before_cell_execution(&self) -> &[ExecutionCallback] {
        &self.before_cell_execution
    }

    /// Callbacks run after each cell.
    #[must_use]
    pub fn after_cell_execution(&self) -> &[AfterCellExecutionCallback] {
        &self.after_cell_execution
    }

    /// Callbacks run on interruption.
    #[must_use]
    pub fn interruption_callbacks(&self) -> &[InterruptionCallback] {
        &self.interruption_callbacks
    }

    /// Callbacks run when the colour scheme changes.
    #[must_use]
    pub fn color_scheme_callbacks(&self) -> &[ColorSchemeChangedCallback] {
        &self.color_scheme_callbacks
    }

    /// Oldest kernel able to load the library.
    #[must_use]
    pub const fn minimal_kernel_version(&self) -> Option<&KernelVersion> {
        self.minimal_kernel_version.as_ref()
    }

    /// Rules for loading integrations discovered transitively.
    #[must_use]
    pub fn integration_type_name_rules(&self) -> &[NameAcceptanceRule] {
        &self.integration_type_name_rules
    }
}

impl fmt::Debug for LibraryDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LibraryDefinition")
            .field("renderers", &self.renderers.len())
            .field("text_renderers", &self.text_renderers.len())
            .field("throwable_renderers", &self.throwable_renderers.len())
            .field("imports", &self.imports)
            .field("dependencies", &self.dependencies)
            .field("repositories", &self.repositories)
            .field("resources", &self.resources)
            .field("minimal_kernel_version", &self.minimal_kernel_version)
            .finish_non_exhaustive()
    }
}
