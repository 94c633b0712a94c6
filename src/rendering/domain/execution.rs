//! Handler execution bodies.
//!
//! A body is either a literal code template run by the host or a native
//! function. Only code templates can be specialised into host methods.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::value::FieldValue;
use super::variables::{references_variable, substitute_variables};
use crate::rendering::error::RenderError;
use crate::rendering::ports::ExecutionHost;

/// Name of the variable standing for the rendered value in code templates.
pub const RESULT_ARGUMENT: &str = "it";

/// Host variable that receives an unnamed value before a template runs.
pub const TEMPORARY_RESULT_NAME: &str = "___myRes";

/// Signature of native handler bodies.
pub type NativeRenderFn =
    dyn Fn(&dyn ExecutionHost, &FieldValue) -> Result<FieldValue, RenderError> + Send + Sync;

/// A code template executed by the host.
///
/// `$it` and `${it}` are replaced by the name of the variable holding the
/// value. Serialises as the bare code string.
///
/// # Examples
///
/// ```
/// use kernel_results::rendering::domain::CodeExecution;
///
/// let execution = CodeExecution::new("HTML($it.toHtml())");
/// assert_eq!(execution.with_argument("p"), "HTML(p.toHtml())");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CodeExecution {
    code: String,
}

impl CodeExecution {
    /// Creates an execution from a code template.
    #[must_use]
    pub fn new(code: impl Into<String>) -> Self {
        Self { code: code.into() }
    }

    /// Returns the raw template.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Returns the template with the value argument replaced by `argument`.
    #[must_use]
    pub fn with_argument(&self, argument: &str) -> String {
        let mapping = BTreeMap::from([(RESULT_ARGUMENT.to_owned(), argument.to_owned())]);
        substitute_variables(&self.code, &mapping)
    }

    /// Returns a copy with `$name` references replaced from `mapping`.
    #[must_use]
    pub fn substitute_variables(&self, mapping: &BTreeMap<String, String>) -> Self {
        Self::new(substitute_variables(&self.code, mapping))
    }

    /// Runs the template against `field`.
    ///
    /// An unnamed value is first declared under [`TEMPORARY_RESULT_NAME`] so
    /// the template can refer to it.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Host`] when declaring or executing fails.
    pub fn execute(
        &self,
        host: &dyn ExecutionHost,
        field: &FieldValue,
    ) -> Result<FieldValue, RenderError> {
        if !references_variable(&self.code, RESULT_ARGUMENT) {
            return Ok(host.execute(&self.code)?);
        }
        let argument = match &field.name {
            Some(name) => name.clone(),
            None => {
                host.declare(TEMPORARY_RESULT_NAME, field.value.clone())?;
                TEMPORARY_RESULT_NAME.to_owned()
            }
        };
        Ok(host.execute(&self.with_argument(&argument))?)
    }
}

impl From<&str> for CodeExecution {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

impl From<String> for CodeExecution {
    fn from(code: String) -> Self {
        Self { code }
    }
}

impl fmt::Display for CodeExecution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code)
    }
}

/// Body of a renderer handler.
#[derive(Clone)]
pub enum HandlerExecution {
    /// A literal code template.
    Code(CodeExecution),
    /// A native function.
    Native(Arc<NativeRenderFn>),
}

impl HandlerExecution {
    /// Creates a code-template body.
    #[must_use]
    pub fn code(code: impl Into<String>) -> Self {
        Self::Code(CodeExecution::new(code))
    }

    /// Creates a native body.
    #[must_use]
    pub fn native<F>(function: F) -> Self
    where
        F: Fn(&dyn ExecutionHost, &FieldValue) -> Result<FieldValue, RenderError>
            + Send
            + Sync
            + 'static,
    {
        Self::Native(Arc::new(function))
    }

    /// Returns the code template, if this body is one.
    #[must_use]
    pub const fn as_code(&self) -> Option<&CodeExecution> {
        match self {
            Self::Code(code) => Some(code),
            Self::Native(_) => None,
        }
    }

    /// Runs the body.
    ///
    /// # Errors
    ///
    /// Propagates host failures and errors returned by native bodies.
    pub fn execute(
        &self,
        host: &dyn ExecutionHost,
        field: &FieldValue,
    ) -> Result<FieldValue, RenderError> {
        match self {
            Self::Code(code) => code.execute(host, field),
            Self::Native(function) => function(host, field),
        }
    }

    /// Returns a copy with variables substituted; native bodies are shared.
    #[must_use]
    pub fn substitute_variables(&self, mapping: &BTreeMap<String, String>) -> Self {
        match self {
            Self::Code(code) => Self::Code(code.substitute_variables(mapping)),
            Self::Native(function) => Self::Native(Arc::clone(function)),
        }
    }
}

impl fmt::Debug for HandlerExecution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Code(code) => f.debug_tuple("Code").field(&code.code).finish(),
            Self::Native(_) => f.write_str("Native(..)"),
        }
    }
}

impl fmt::Display for HandlerExecution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Code(code) => write!(f, "code `{code}`"),
            Self::Native(_) => f.write_str("native function"),
        }
    }
}

impl From<CodeExecution> for HandlerExecution {
    fn from(code: CodeExecution) -> Self {
        Self::Code(code)
    }
}
