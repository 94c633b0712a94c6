//! Live registries that merged library definitions feed.
//!
//! Merging is append-only: handlers from earlier definitions keep their
//! positions and new ones are inserted at their declared priority.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::library::domain::{
    AcceptanceRule, AfterCellExecutionCallback, AnnotationHandler, CodePreprocessor, ColorScheme,
    ColorSchemeChangedCallback, ExecutionCallback, FieldHandler, InternalVariablesMarker,
    InterruptionCallback, KernelRepository, KernelVersion, LibraryDefinition, LibraryResource,
    PreprocessedCode, unite_acceptance_rules,
};
use crate::library::error::{CallbackError, LibraryError};
use crate::rendering::config::TextRenderingConfig;
use crate::rendering::domain::{FieldValue, Priority};
use crate::rendering::ports::ExecutionHost;
use crate::rendering::services::{
    RenderersProcessor, TextRenderersProcessor, ThrowableRenderersProcessor,
};

/// Non-renderer registrations accumulated across merged definitions.
#[derive(Default)]
struct Contributions {
    converters: Vec<Arc<dyn FieldHandler>>,
    class_annotations: Vec<AnnotationHandler>,
    file_annotations: Vec<AnnotationHandler>,
    code_preprocessors: Vec<Arc<dyn CodePreprocessor>>,
    internal_variables_markers: Vec<InternalVariablesMarker>,
    resources: Vec<LibraryResource>,
    imports: Vec<String>,
    dependencies: Vec<String>,
    repositories: Vec<KernelRepository>,
    shutdown: Vec<ExecutionCallback>,
    before_cell_execution: Vec<ExecutionCallback>,
    after_cell_execution: Vec<AfterCellExecutionCallback>,
    interruption_callbacks: Vec<InterruptionCallback>,
    color_scheme_callbacks: Vec<ColorSchemeChangedCallback>,
    integration_type_name_rules: Vec<Arc<dyn AcceptanceRule<str>>>,
}

/// The kernel's renderer engines plus everything else libraries contribute.
///
/// # Examples
///
/// ```
/// use kernel_results::library::domain::{KernelVersion, LibraryDefinitionBuilder};
/// use kernel_results::library::services::KernelRegistries;
/// # use kernel_results::rendering::domain::{FieldValue, Value};
/// # use kernel_results::rendering::ports::{ExecutionHost, HostError, HostResult};
/// # struct NoHost;
/// # impl ExecutionHost for NoHost {
/// #     fn execute(&self, _code: &str) -> HostResult<FieldValue> {
/// #         Err(HostError::new("no host"))
/// #     }
/// #     fn declare(&self, _name: &str, _value: Value) -> HostResult<()> {
/// #         Ok(())
/// #     }
/// # }
///
/// let registries = KernelRegistries::new(KernelVersion::parse("0.12.0").expect("valid"));
/// let definition = LibraryDefinitionBuilder::new()
///     .discard_integration_type_name_if(|name| name.starts_with("org.legacy."))
///     .build();
/// registries.merge(&NoHost, definition).expect("merge succeeds");
/// assert!(!registries.is_integration_allowed("org.legacy.Plots"));
/// assert!(registries.is_integration_allowed("org.modern.Plots"));
/// ```
pub struct KernelRegistries {
    renderers: Arc<RenderersProcessor>,
    text_renderers: Arc<TextRenderersProcessor>,
    throwable_renderers: Arc<ThrowableRenderersProcessor>,
    running_version: KernelVersion,
    contributions: RwLock<Contributions>,
}

impl KernelRegistries {
    /// Creates registries with the default text renderers installed.
    #[must_use]
    pub fn new(running_version: KernelVersion) -> Self {
        Self::with_engines(
            running_version,
            Arc::new(RenderersProcessor::new()),
            Arc::new(TextRenderersProcessor::with_default_renderers(
                TextRenderingConfig::default(),
            )),
            Arc::new(ThrowableRenderersProcessor::new()),
        )
    }

    /// Creates registries around existing engines.
    #[must_use]
    pub fn with_engines(
        running_version: KernelVersion,
        renderers: Arc<RenderersProcessor>,
        text_renderers: Arc<TextRenderersProcessor>,
        throwable_renderers: Arc<ThrowableRenderersProcessor>,
    ) -> Self {
        Self {
            renderers,
            text_renderers,
            throwable_renderers,
            running_version,
            contributions: RwLock::new(Contributions::default()),
        }
    }

    /// Returns the value renderer engine.
    #[must_use]
    pub const fn renderers(&self) -> &Arc<RenderersProcessor> {
        &self.renderers
    }

    /// Returns the text renderer engine.
    #[must_use]
    pub const fn text_renderers(&self) -> &Arc<TextRenderersProcessor> {
        &self.text_renderers
    }

    /// Returns the throwable renderer engine.
    #[must_use]
    pub const fn throwable_renderers(&self) -> &Arc<ThrowableRenderersProcessor> {
        &self.throwable_renderers
    }

    /// Returns the running kernel version.
    #[must_use]
    pub const fn running_version(&self) -> &KernelVersion {
        &self.running_version
    }

    /// Applies `definition` to the live registries and runs its init callbacks.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::KernelVersionTooLow`] without touching any
    /// registry when the definition needs a newer kernel, or
    /// [`LibraryError::Callback`] when an init callback fails. Registrations
    /// are kept when a callback fails.
    pub fn merge(
        &self,
        host: &dyn ExecutionHost,
        definition: LibraryDefinition,
    ) -> Result<(), LibraryError> {
        if let Some(required) = definition
            .minimal_kernel_version()
            .filter(|version| **version > self.running_version)
        {
            return Err(LibraryError::KernelVersionTooLow {
                required: required.clone(),
                running: self.running_version.clone(),
            });
        }

        let LibraryDefinition {
            renderers,
            text_renderers,
            throwable_renderers,
            converters,
            class_annotations,
            file_annotations,
            code_preprocessors,
            internal_variables_markers,
            resources,
            imports,
            dependencies,
            repositories,
            init,
            shutdown,
            before_cell_execution,
            after_cell_execution,
            interruption_callbacks,
            color_scheme_callbacks,
            integration_type_name_rules,
            ..
        } = definition;

        tracing::debug!(
            renderers = renderers.len(),
            text_renderers = text_renderers.len(),
            throwable_renderers = throwable_renderers.len(),
            "merging library definition"
        );
        for entry in renderers {
            self.renderers
                .register_without_optimizing(entry.item, entry.priority);
        }
        for entry in text_renderers {
            self.text_renderers.register(entry.item, entry.priority);
        }
        for renderer in throwable_renderers {
            self.throwable_renderers
                .register(renderer, Priority::DEFAULT);
        }

        {
            let mut contributions = self.write();
            contributions.converters.extend(converters);
            contributions.class_annotations.extend(class_annotations);
            contributions.file_annotations.extend(file_annotations);
            contributions.code_preprocessors.extend(code_preprocessors);
            contributions
                .internal_variables_markers
                .extend(internal_variables_markers);
            contributions.resources.extend(resources);
            contributions.imports.extend(imports);
            contributions.dependencies.extend(dependencies);
            contributions.repositories.extend(repositories);
            contributions.shutdown.extend(shutdown);
            contributions
                .before_cell_execution
                .extend(before_cell_execution);
            contributions
                .after_cell_execution
                .extend(after_cell_execution);
            contributions
                .interruption_callbacks
                .extend(interruption_callbacks);
            contributions
                .color_scheme_callbacks
                .extend(color_scheme_callbacks);
            contributions.integration_type_name_rules.extend(
                integration_type_name_rules
                    .into_iter()
                    .map(|rule| Arc::new(rule) as Arc<dyn AcceptanceRule<str>>),
            );
        }

        for callback in &init {
            callback(host)?;
        }
        Ok(())
    }

    /// Checks a transitively discovered integration against merged rules.
    ///
    /// The last applicable rule decides; with none applicable the integration
    /// is allowed.
    #[must_use]
    pub fn is_integration_allowed(&self, type_name: &str) -> bool {
        let rules = self.read().integration_type_name_rules.clone();
        let allowed = unite_acceptance_rules(&rules, type_name);
        if !allowed {
            tracing::warn!(type_name, "integration rejected by library rules");
        }
        allowed
    }

    /// Runs every preprocessor over `code` in merge order.
    ///
    /// # Errors
    ///
    /// Returns the first preprocessor failure.
    pub fn preprocess(
        &self,
        host: &dyn ExecutionHost,
        code: &str,
    ) -> Result<PreprocessedCode, CallbackError> {
        let preprocessors = self.read().code_preprocessors.clone();
        preprocessors
            .iter()
            .try_fold(PreprocessedCode::new(code), |mut processed, preprocessor| {
                let step = preprocessor.process(&processed.code, host)?;
                processed.code = step.code;
                processed.libraries.extend(step.libraries);
                Ok(processed)
            })
    }

    /// Runs the before-cell callbacks.
    ///
    /// # Errors
    ///
    /// Returns the first callback failure.
    pub fn run_before_cell(&self, host: &dyn ExecutionHost) -> Result<(), CallbackError> {
        let callbacks = self.read().before_cell_execution.clone();
        callbacks.iter().try_for_each(|callback| callback(host))
    }

    /// Runs the after-cell callbacks with the cell result.
    ///
    /// # Errors
    ///
    /// Returns the first callback failure.
    pub fn run_after_cell(
        &self,
        host: &dyn ExecutionHost,
        result: &FieldValue,
    ) -> Result<(), CallbackError> {
        let callbacks = self.read().after_cell_execution.clone();
        callbacks.iter().try_for_each(|callback| callback(host, result))
    }

    /// Runs every shutdown callback, collecting failures.
    ///
    /// All callbacks run even when some fail.
    #[must_use]
    pub fn run_shutdown(&self, host: &dyn ExecutionHost) -> Vec<CallbackError> {
        let callbacks = self.read().shutdown.clone();
        callbacks
            .iter()
            .filter_map(|callback| callback(host).err())
            .inspect(|error| tracing::warn!(%error, "shutdown callback failed"))
            .collect()
    }

    /// Notifies libraries that execution was interrupted.
    pub fn notify_interrupted(&self) {
        let callbacks = self.read().interruption_callbacks.clone();
        for callback in &callbacks {
            callback();
        }
    }

    /// Notifies libraries of a colour scheme change.
    pub fn notify_color_scheme(&self, scheme: ColorScheme) {
        let callbacks = self.read().color_scheme_callbacks.clone();
        for callback in &callbacks {
            callback(scheme);
        }
    }

    /// Applies the first accepting converter to `field`.
    ///
    /// Returns the field unchanged when no converter accepts it or the
    /// accepting converter declines to replace it.
    ///
    /// # Errors
    ///
    /// Returns the converter's failure.
    pub fn convert_field(
        &self,
        host: &dyn ExecutionHost,
        field: FieldValue,
    ) -> Result<FieldValue, CallbackError> {
        let converters = self.read().converters.clone();
        let Some(converter) = converters.iter().find(|converter| converter.accepts(&field)) else {
            return Ok(field);
        };
        Ok(converter.execute(host, &field)?.unwrap_or(field))
    }

    /// Runs the class annotation handlers registered for `annotation`.
    ///
    /// # Errors
    ///
    /// Returns the first handler failure.
    pub fn handle_class_annotation(
        &self,
        host: &dyn ExecutionHost,
        annotation: &str,
        declarations: &[String],
    ) -> Result<(), CallbackError> {
        let handlers = self.read().class_annotations.clone();
        Self::dispatch_annotation(&handlers, host, annotation, declarations)
    }

    /// Runs the file annotation handlers registered for `annotation`.
    ///
    /// # Errors
    ///
    /// Returns the first handler failure.
    pub fn handle_file_annotation(
        &self,
        host: &dyn ExecutionHost,
        annotation: &str,
        declarations: &[String],
    ) -> Result<(), CallbackError> {
        let handlers = self.read().file_annotations.clone();
        Self::dispatch_annotation(&handlers, host, annotation, declarations)
    }

    fn dispatch_annotation(
        handlers: &[AnnotationHandler],
        host: &dyn ExecutionHost,
        annotation: &str,
        declarations: &[String],
    ) -> Result<(), CallbackError> {
        handlers
            .iter()
            .filter(|handler| handler.annotation() == annotation)
            .try_for_each(|handler| handler.handle(host, declarations))
    }

    /// Returns `true` when any marker hides `field` from the user.
    #[must_use]
    pub fn is_internal_variable(&self, field: &FieldValue) -> bool {
        let markers = self.read().internal_variables_markers.clone();
        markers.iter().any(|marker| marker(field))
    }

    /// Returns the imports of all merged libraries, in merge order.
    #[must_use]
    pub fn imports(&self) -> Vec<String> {
        self.read().imports.clone()
    }

    /// Returns the dependencies of all merged libraries, in merge order.
    #[must_use]
    pub fn dependencies(&self) -> Vec<String> {
        self.read().dependencies.clone()
    }

    /// Returns the repositories of all merged libraries, in merge order.
    #[must_use]
    pub fn repositories(&self) -> Vec<KernelRepository> {
        self.read().repositories.clone()
    }

    /// Returns the resources of all merged libraries, in merge order.
    #[must_use]
    pub fn resources(&self) -> Vec<LibraryResource> {
        self.read().resources.clone()
    }

    fn read(&self) -> RwLockReadGuard<'_, Contributions> {
        self.contributions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Contributions> {
        self.contributions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for KernelRegistries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KernelRegistries")
            .field("renderers", &self.renderers)
            .field("text_renderers", &self.text_renderers)
            .field("throwable_renderers", &self.throwable_renderers)
            .field("running_version", &self.running_version)
            .finish_non_exhaustive()
    }
}
