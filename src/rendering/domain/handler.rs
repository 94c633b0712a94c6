//! Value renderer handlers.
//!
//! A handler pairs an acceptance test on the runtime value with an execution
//! body producing the replacement value. Handlers are immutable once built
//! and shared between registries as `Arc<dyn RendererHandler>`.

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::ptr;
use std::sync::Arc;

use minijinja::Environment;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use super::execution::{CodeExecution, HandlerExecution};
use super::type_descriptor::TypeDescriptor;
use super::value::{FieldValue, Value};
use crate::rendering::config::PrecompileConfig;
use crate::rendering::error::RenderError;
use crate::rendering::ports::ExecutionHost;

/// A renderer that may replace a value before display.
///
/// `execute` is only called with values for which `accepts` returned `true`;
/// failing in that situation is a contract violation that the engine reports
/// and degrades from.
pub trait RendererHandler: Send + Sync + fmt::Debug + fmt::Display {
    /// Returns `true` when this handler renders `value`.
    fn accepts(&self, value: &Value) -> bool;

    /// Produces the replacement value.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] when the body fails.
    fn execute(
        &self,
        host: &dyn ExecutionHost,
        field: &FieldValue,
    ) -> Result<FieldValue, RenderError>;

    /// Returns a copy with `$name` references replaced from `mapping`.
    fn substitute_variables(&self, mapping: &BTreeMap<String, String>)
    -> Arc<dyn RendererHandler>;

    /// Returns the specialisation capability, if the handler has one.
    fn as_precompilable(&self) -> Option<&dyn PrecompilableHandler> {
        None
    }

    /// Returns `true` when `other` designates the same handler.
    ///
    /// Defaults to identity.
    fn same_as(&self, other: &dyn RendererHandler) -> bool {
        ptr::addr_eq(ptr::from_ref(self), ptr::from_ref(other))
    }

    /// Upcast for structural comparison.
    fn as_any(&self) -> &dyn Any;
}

/// Handlers that can be specialised into a concretely typed host method.
pub trait PrecompilableHandler {
    /// Emits the method text, or `None` when the handler is not eligible.
    fn precompile(&self, method_name: &str, param_name: &str) -> Option<String>;
}

/// Accepts every value.
#[derive(Debug, Clone)]
pub struct AlwaysRendererHandler {
    execution: HandlerExecution,
}

impl AlwaysRendererHandler {
    /// Creates the handler.
    #[must_use]
    pub const fn new(execution: HandlerExecution) -> Self {
        Self { execution }
    }
}

impl fmt::Display for AlwaysRendererHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "renderer of any value with {}", self.execution)
    }
}

impl RendererHandler for AlwaysRendererHandler {
    fn accepts(&self, _value: &Value) -> bool {
        true
    }

    fn execute(
        &self,
        host: &dyn ExecutionHost,
        field: &FieldValue,
    ) -> Result<FieldValue, RenderError> {
        self.execution.execute(host, field)
    }

    fn substitute_variables(
        &self,
        mapping: &BTreeMap<String, String>,
    ) -> Arc<dyn RendererHandler> {
        Arc::new(Self::new(self.execution.substitute_variables(mapping)))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Accepts values whose runtime type name equals a given name.
///
/// Serialisable so library descriptors can declare it as data.
///
/// # Examples
///
/// ```
/// use kernel_results::rendering::domain::ExactRendererHandler;
///
/// let handler: ExactRendererHandler = serde_json::from_str(
///     r#"{"class": "org.example.Frame", "execution": "HTML($it.toHtml())"}"#,
/// ).expect("valid handler");
/// assert_eq!(handler.class_name(), "org.example.Frame");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExactRendererHandler {
    #[serde(rename = "class")]
    class_name: String,
    execution: CodeExecution,
}

impl ExactRendererHandler {
    /// Creates the handler.
    #[must_use]
    pub fn new(class_name: impl Into<String>, execution: impl Into<CodeExecution>) -> Self {
        Self {
            class_name: class_name.into(),
            execution: execution.into(),
        }
    }

    /// Returns the matched type name.
    #[must_use]
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Returns the code template.
    #[must_use]
    pub const fn execution(&self) -> &CodeExecution {
        &self.execution
    }
}

impl fmt::Display for ExactRendererHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "exact renderer of {} with code `{}`",
            self.class_name, self.execution
        )
    }
}

impl RendererHandler for ExactRendererHandler {
    fn accepts(&self, value: &Value) -> bool {
        value
            .runtime_type()
            .is_some_and(|ty| ty.name() == self.class_name)
    }

    fn execute(
        &self,
        host: &dyn ExecutionHost,
        field: &FieldValue,
    ) -> Result<FieldValue, RenderError> {
        self.execution.execute(host, field)
    }

    fn substitute_variables(
        &self,
        mapping: &BTreeMap<String, String>,
    ) -> Arc<dyn RendererHandler> {
        Arc::new(Self {
            class_name: self.class_name.clone(),
            execution: self.execution.substitute_variables(mapping),
        })
    }

    fn same_as(&self, other: &dyn RendererHandler) -> bool {
        other
            .as_any()
            .downcast_ref::<Self>()
            .is_some_and(|exact| exact == self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Accepts values whose runtime type is a given type or descends from it.
///
/// Values whose ancestry cannot be resolved are not accepted.
#[derive(Debug, Clone)]
pub struct SubtypeRendererHandler {
    super_type: Arc<TypeDescriptor>,
    execution: HandlerExecution,
    precompile: PrecompileConfig,
}

impl SubtypeRendererHandler {
    /// Creates the handler with the default method template.
    #[must_use]
    pub fn new(super_type: Arc<TypeDescriptor>, execution: HandlerExecution) -> Self {
        Self {
            super_type,
            execution,
            precompile: PrecompileConfig::default(),
        }
    }

    /// Overrides the method template used by [`PrecompilableHandler`].
    #[must_use]
    pub fn with_precompile_config(mut self, config: PrecompileConfig) -> Self {
        self.precompile = config;
        self
    }

    /// Returns the accepted supertype.
    #[must_use]
    pub const fn super_type(&self) -> &Arc<TypeDescriptor> {
        &self.super_type
    }

    /// Returns the execution body.
    #[must_use]
    pub const fn execution(&self) -> &HandlerExecution {
        &self.execution
    }

    fn parameter_type(&self) -> String {
        let arity = self.super_type.type_parameters();
        if arity == 0 {
            return self.super_type.name().to_owned();
        }
        let stars = vec!["*"; arity].join(", ");
        format!("{}<{stars}>", self.super_type.name())
    }

    fn render_method(
        &self,
        method_name: &str,
        param_name: &str,
        body: String,
    ) -> Result<String, RenderError> {
        let mut context = Map::new();
        context.insert("method_name".to_owned(), JsonValue::from(method_name));
        context.insert("param_name".to_owned(), JsonValue::from(param_name));
        context.insert("type_name".to_owned(), JsonValue::from(self.parameter_type()));
        context.insert("body".to_owned(), JsonValue::from(body));
        Environment::new()
            .render_str(&self.precompile.method_template, context)
            .map_err(|error| RenderError::Precompile(error.to_string()))
    }
}

impl fmt::Display for SubtypeRendererHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "renderer of subtypes of {} with {}",
            self.super_type.name(),
            self.execution
        )
    }
}

impl RendererHandler for SubtypeRendererHandler {
    fn accepts(&self, value: &Value) -> bool {
        let Some(ty) = value.runtime_type() else {
            return false;
        };
        match ty.is_subtype_of(&self.super_type) {
            Ok(accepted) => accepted,
            Err(error) => {
                tracing::debug!(%error, handler = %self, "treating unresolved type as non-match");
                false
            }
        }
    }

    fn execute(
        &self,
        host: &dyn ExecutionHost,
        field: &FieldValue,
    ) -> Result<FieldValue, RenderError> {
        self.execution.execute(host, field)
    }

    fn substitute_variables(
        &self,
        mapping: &BTreeMap<String, String>,
    ) -> Arc<dyn RendererHandler> {
        Arc::new(Self {
            super_type: Arc::clone(&self.super_type),
            execution: self.execution.substitute_variables(mapping),
            precompile: self.precompile.clone(),
        })
    }

    fn as_precompilable(&self) -> Option<&dyn PrecompilableHandler> {
        Some(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl PrecompilableHandler for SubtypeRendererHandler {
    fn precompile(&self, method_name: &str, param_name: &str) -> Option<String> {
        let code = self.execution.as_code()?;
        let body = code.with_argument(param_name);
        self.render_method(method_name, param_name, body)
            .inspect_err(|error| {
                tracing::warn!(%error, handler = %self, "falling back to generic dispatch");
            })
            .ok()
    }
}
