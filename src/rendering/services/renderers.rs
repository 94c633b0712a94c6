//! Renderer resolution engine.
//!
//! Picks the first accepting handler in priority order and runs it. Handler
//! failures degrade to the unrendered value; they never abort the pipeline.

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use super::registry::{Prioritized, PriorityRegistry};
use crate::rendering::config::PrecompileConfig;
use crate::rendering::domain::{CodeExecution, FieldValue, Priority, RendererHandler, Value};
use crate::rendering::error::RenderError;
use crate::rendering::ports::ExecutionHost;

/// A registered value renderer with its priority.
pub type RendererHandlerWithPriority = Prioritized<Arc<dyn RendererHandler>>;

/// Parameter name used in specialised methods.
const SPECIALISED_PARAMETER: &str = "value";

/// Result of [`RenderersProcessor::render_value`].
#[derive(Debug, Clone, PartialEq)]
pub enum RenderOutcome {
    /// A handler produced a replacement value.
    Rendered(FieldValue),
    /// No handler accepted the value; it is returned unchanged.
    NoRendererFound(FieldValue),
    /// The accepting handler failed; the value is returned unchanged.
    Degraded {
        /// The unrendered value.
        field: FieldValue,
        /// The handler failure.
        error: RenderError,
    },
}

impl RenderOutcome {
    /// Returns the value to display: the representation, or the original.
    #[must_use]
    pub fn into_field(self) -> FieldValue {
        match self {
            Self::Rendered(field) | Self::NoRendererFound(field) | Self::Degraded { field, .. } => {
                field
            }
        }
    }

    /// Returns `true` when a handler produced the value.
    #[must_use]
    pub const fn is_rendered(&self) -> bool {
        matches!(self, Self::Rendered(_))
    }
}

/// How [`RenderersProcessor::register`] installed a handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registration {
    /// The handler was compiled into the named host method.
    Specialised {
        /// Name of the generated method.
        method_name: String,
    },
    /// The handler was registered as given.
    Generic,
}

/// Ordered registry of value renderers.
///
/// Safe to query while another thread registers handlers.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use kernel_results::rendering::domain::{ExactRendererHandler, Priority};
/// use kernel_results::rendering::services::RenderersProcessor;
///
/// let processor = RenderersProcessor::new();
/// processor.register_without_optimizing(
///     Arc::new(ExactRendererHandler::new("org.example.Frame", "HTML($it.toHtml())")),
///     Priority::DEFAULT,
/// );
/// assert_eq!(processor.registered_renderers().len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct RenderersProcessor {
    registry: PriorityRegistry<Arc<dyn RendererHandler>>,
    precompile: PrecompileConfig,
    methods: AtomicU64,
}

impl RenderersProcessor {
    /// Creates an empty engine.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty engine with custom method naming.
    #[must_use]
    pub fn with_precompile_config(precompile: PrecompileConfig) -> Self {
        Self {
            precompile,
            ..Self::default()
        }
    }

    /// Registers `handler` as given.
    pub fn register_without_optimizing(
        &self,
        handler: Arc<dyn RendererHandler>,
        priority: Priority,
    ) {
        tracing::debug!(%handler, %priority, "registering renderer");
        self.registry.register(handler, priority);
    }

    /// Registers `handler`, specialising it into a host method when eligible.
    ///
    /// Returns how the handler was installed.
    ///
    /// The specialised handler accepts exactly what `handler` accepts and
    /// calls the generated method instead of the generic body. When the host
    /// rejects the generated method the handler is registered unchanged.
    #[must_use]
    pub fn register(
        &self,
        host: &dyn ExecutionHost,
        handler: Arc<dyn RendererHandler>,
        priority: Priority,
    ) -> Registration {
        let method_name = format!(
            "{}{}",
            self.precompile.method_prefix,
            self.methods.fetch_add(1, Ordering::Relaxed)
        );
        let Some(code) = handler.as_precompilable().and_then(|precompilable| {
            precompilable.precompile(&method_name, SPECIALISED_PARAMETER)
        }) else {
            self.register_without_optimizing(handler, priority);
            return Registration::Generic;
        };

        if let Err(error) = host.execute(&code) {
            tracing::debug!(%error, %handler, "specialised method rejected by host");
            self.register_without_optimizing(handler, priority);
            return Registration::Generic;
        }

        tracing::debug!(%handler, %method_name, "registered specialised renderer");
        let call = CodeExecution::new(format!("{method_name}($it)"));
        self.register_without_optimizing(
            Arc::new(SpecialisedRendererHandler {
                inner: handler,
                call,
            }),
            priority,
        );
        Registration::Specialised { method_name }
    }

    /// Removes the first registration of `handler`.
    ///
    /// Returns `false` when it was not registered.
    #[must_use = "unregistering an absent handler is a no-op"]
    pub fn unregister(&self, handler: &dyn RendererHandler) -> bool {
        let removed = self.registry.remove_first(|registered| {
            registered.same_as(handler) || handler.same_as(registered.as_ref())
        });
        if removed {
            tracing::debug!(%handler, "unregistered renderer");
        }
        removed
    }

    /// Returns the handlers in dispatch order.
    #[must_use]
    pub fn registered_renderers(&self) -> Vec<RendererHandlerWithPriority> {
        self.registry.snapshot().to_vec()
    }

    /// Renders `field` with the first accepting handler.
    #[must_use]
    pub fn render_value(&self, host: &dyn ExecutionHost, field: FieldValue) -> RenderOutcome {
        let renderers = self.registry.snapshot();
        let Some(entry) = renderers
            .iter()
            .find(|entry| entry.item.accepts(&field.value))
        else {
            return RenderOutcome::NoRendererFound(field);
        };

        match entry.item.execute(host, &field) {
            Ok(rendered) => RenderOutcome::Rendered(rendered),
            Err(error) => {
                tracing::warn!(
                    handler = %entry.item,
                    %error,
                    "renderer failed on a value it accepted; displaying value as-is"
                );
                RenderOutcome::Degraded { field, error }
            }
        }
    }

    /// Renders `value` and returns the value to display.
    #[must_use]
    pub fn render(&self, host: &dyn ExecutionHost, value: Value) -> Value {
        self.render_value(host, FieldValue::unnamed(value))
            .into_field()
            .value
    }
}

/// A handler whose body was replaced by a call to a generated host method.
#[derive(Debug)]
struct SpecialisedRendererHandler {
    inner: Arc<dyn RendererHandler>,
    call: CodeExecution,
}

impl fmt::Display for SpecialisedRendererHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (specialised as `{}`)", self.inner, self.call)
    }
}

impl RendererHandler for SpecialisedRendererHandler {
    fn accepts(&self, value: &Value) -> bool {
        self.inner.accepts(value)
    }

    fn execute(
        &self,
        host: &dyn ExecutionHost,
        field: &FieldValue,
    ) -> Result<FieldValue, RenderError> {
        self.call.execute(host, field)
    }

    fn substitute_variables(
        &self,
        mapping: &BTreeMap<String, String>,
    ) -> Arc<dyn RendererHandler> {
        self.inner.substitute_variables(mapping)
    }

    fn same_as(&self, other: &dyn RendererHandler) -> bool {
        self.inner.same_as(other)
            || other
                .as_any()
                .downcast_ref::<Self>()
                .is_some_and(|specialised| Arc::ptr_eq(&self.inner, &specialised.inner))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
