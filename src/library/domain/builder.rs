//! Accumulating builder for [`LibraryDefinition`].

use std::sync::Arc;

use super::acceptance::NameAcceptanceRule;
use super::callbacks::{
    AnnotationHandler, CodePreprocessor, ColorScheme, FieldHandler, FnCodePreprocessor,
    PreprocessedCode,
};
use super::definition::LibraryDefinition;
use super::resources::{KernelRepository, LibraryResource};
use super::version::KernelVersion;
use crate::library::error::{CallbackError, LibraryError};
use crate::rendering::domain::{FieldValue, Priority, RendererHandler, ThrowableRenderer};
use crate::rendering::ports::ExecutionHost;
use crate::rendering::services::TextRenderer;
use crate::rendering::services::registry::Prioritized;

/// Collects the registrations of one library.
///
/// Every `add_*` call appends to its category in call order. [`build`]
/// consumes the builder and snapshots the lists.
///
/// [`build`]: LibraryDefinitionBuilder::build
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use kernel_results::library::domain::LibraryDefinitionBuilder;
/// use kernel_results::rendering::domain::ExactRendererHandler;
///
/// let definition = LibraryDefinitionBuilder::new()
///     .add_import("org.example.plots.*")
///     .add_dependency("org.example:plots:1.0")
///     .add_renderer(Arc::new(ExactRendererHandler::new(
///         "org.example.plots.Figure",
///         "HTML($it.toHtml())",
///     )))
///     .build();
/// assert_eq!(definition.imports(), ["org.example.plots.*"]);
/// assert_eq!(definition.renderers().len(), 1);
/// ```
#[derive(Debug, Default)]
#[must_use]
pub struct LibraryDefinitionBuilder {
    definition: LibraryDefinition,
}

impl LibraryDefinitionBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a value renderer at [`Priority::DEFAULT`].
    pub fn add_renderer(self, handler: Arc<dyn RendererHandler>) -> Self {
        self.add_renderer_with_priority(handler, Priority::DEFAULT)
    }

    /// Adds a value renderer at `priority`.
    pub fn add_renderer_with_priority(
        mut self,
        handler: Arc<dyn RendererHandler>,
        priority: Priority,
    ) -> Self {
        self.definition.renderers.push(Prioritized {
            item: handler,
            priority,
        });
        self
    }

    /// Adds a text renderer at `priority`.
    pub fn add_text_renderer(mut self, renderer: Arc<dyn TextRenderer>, priority: Priority) -> Self {
        self.definition.text_renderers.push(Prioritized {
            item: renderer,
            priority,
        });
        self
    }

    /// Adds a throwable renderer.
    pub fn add_throwable_renderer(mut self, renderer: Arc<dyn ThrowableRenderer>) -> Self {
        self.definition.throwable_renderers.push(renderer);
        self
    }

    /// Adds a variable converter.
    pub fn add_converter(mut self, converter: Arc<dyn FieldHandler>) -> Self {
        self.definition.converters.push(converter);
        self
    }

    /// Adds a handler for annotated classes.
    pub fn add_class_annotation(mut self, handler: AnnotationHandler) -> Self {
        self.definition.class_annotations.push(handler);
        self
    }

    /// Adds a handler for file-level annotations.
    pub fn add_file_annotation(mut self, handler: AnnotationHandler) -> Self {
        self.definition.file_annotations.push(handler);
        self
    }

    /// Adds a code preprocessor.
    pub fn add_code_preprocessor(mut self, preprocessor: Arc<dyn CodePreprocessor>) -> Self {
        self.definition.code_preprocessors.push(preprocessor);
        self
    }

    /// Adds a preprocessor that only rewrites code.
    pub fn preprocess_code<F>(self, rewrite: F) -> Self
    where
        F: Fn(&dyn ExecutionHost, &str) -> String + Send + Sync + 'static,
    {
        self.add_code_preprocessor(Arc::new(FnCodePreprocessor::new(move |host, code| {
            Ok(PreprocessedCode::new(rewrite(host, code)))
        })))
    }

    /// Adds a preprocessor that may also request libraries.
    pub fn preprocess_code_with_libraries<F>(self, rewrite: F) -> Self
    where
        F: Fn(&dyn ExecutionHost, &str) -> Result<PreprocessedCode, CallbackError>
            + Send
            + Sync
            + 'static,
    {
        self.add_code_preprocessor(Arc::new(FnCodePreprocessor::new(rewrite)))
    }

    /// Marks matching variables as internal.
    pub fn add_internal_variables_marker<F>(mut self, marker: F) -> Self
    where
        F: Fn(&FieldValue) -> bool + Send + Sync + 'static,
    {
        self.definition
            .internal_variables_markers
            .push(Arc::new(marker));
        self
    }

    /// Adds a front-end resource.
    pub fn add_resource(mut self, resource: LibraryResource) -> Self {
        self.definition.resources.push(resource);
        self
    }

    /// Adds a default import.
    pub fn add_import(mut self, import: impl Into<String>) -> Self {
        self.definition.imports.push(import.into());
        self
    }

    /// Imports every member of the package declaring `type_name`.
    pub fn import_package(self, type_name: &str) -> Self {
        let package = type_name
            .rsplit_once('.')
            .map_or(type_name, |(prefix, _)| prefix);
        self.add_import(format!("{package}.*"))
    }

    /// Adds a dependency coordinate.
    pub fn add_dependency(mut self, dependency: impl Into<String>) -> Self {
        self.definition.dependencies.push(dependency.into());
        self
    }

    /// Adds a repository.
    pub fn add_repository(mut self, repository: impl Into<KernelRepository>) -> Self {
        self.definition.repositories.push(repository.into());
        self
    }

    /// Adds several anonymous repositories.
    pub fn add_repositories<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.definition
            .repositories
            .extend(paths.into_iter().map(KernelRepository::new));
        self
    }

    /// Runs `callback` when the library is loaded.
    pub fn on_loaded<F>(mut self, callback: F) -> Self
    where
        F: Fn(&dyn ExecutionHost) -> Result<(), CallbackError> + Send + Sync + 'static,
    {
        self.definition.init.push(Arc::new(callback));
        self
    }

    /// Runs `callback` when the kernel shuts down.
    pub fn on_shutdown<F>(mut self, callback: F) -> Self
    where
        F: Fn(&dyn ExecutionHost) -> Result<(), CallbackError> + Send + Sync + 'static,
    {
        self.definition.shutdown.push(Arc::new(callback));
        self
    }

    /// Runs `callback` before each cell.
    pub fn before_cell_execution<F>(mut self, callback: F) -> Self
    where
        F: Fn(&dyn ExecutionHost) -> Result<(), CallbackError> + Send + Sync + 'static,
    {
        self.definition.before_cell_execution.push(Arc::new(callback));
        self
    }

    /// Runs `callback` after each cell with its result.
    pub fn after_cell_execution<F>(mut self, callback: F) -> Self
    where
        F: Fn(&dyn ExecutionHost, &FieldValue) -> Result<(), CallbackError>
            + Send
            + Sync
            + 'static,
    {
        self.definition.after_cell_execution.push(Arc::new(callback));
        self
    }

    /// Runs `callback` when execution is interrupted.
    pub fn on_interrupt<F>(mut self, callback: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.definition.interruption_callbacks.push(Arc::new(callback));
        self
    }

    /// Runs `callback` when the client colour scheme changes.
    pub fn on_color_scheme_change<F>(mut self, callback: F) -> Self
    where
        F: Fn(ColorScheme) + Send + Sync + 'static,
    {
        self.definition.color_scheme_callbacks.push(Arc::new(callback));
        self
    }

    /// Requires at least `version` of the kernel.
    pub fn set_minimal_kernel_version(mut self, version: KernelVersion) -> Self {
        self.definition.minimal_kernel_version = Some(version);
        self
    }

    /// Requires at least the kernel version written in `version`.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::InvalidKernelVersion`] when `version` does
    /// not parse.
    pub fn set_minimal_kernel_version_str(self, version: &str) -> Result<Self, LibraryError> {
        Ok(self.set_minimal_kernel_version(KernelVersion::parse(version)?))
    }

    /// Adds a rule for transitively discovered integrations.
    pub fn add_integration_type_name_rule(mut self, rule: NameAcceptanceRule) -> Self {
        self.definition.integration_type_name_rules.push(rule);
        self
    }

    /// Allows integrations whose type name matches `predicate`.
    pub fn accept_integration_type_name_if<F>(self, predicate: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.add_integration_type_name_rule(NameAcceptanceRule::new(true, predicate))
    }

    /// Rejects integrations whose type name matches `predicate`.
    pub fn discard_integration_type_name_if<F>(self, predicate: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.add_integration_type_name_rule(NameAcceptanceRule::new(false, predicate))
    }

    /// Snapshots the registrations.
    #[must_use]
    pub fn build(self) -> LibraryDefinition {
        self.definition
    }
}
