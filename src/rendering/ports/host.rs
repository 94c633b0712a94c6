//! Port for the code-execution host.

use thiserror::Error;

use crate::rendering::domain::{FieldValue, Value};

/// Result type for host operations.
pub type HostResult<T> = Result<T, HostError>;

/// Failure reported by the execution host.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("execution host error: {0}")]
pub struct HostError(pub String);

impl HostError {
    /// Creates a host error from any message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Runs code on behalf of renderers and library callbacks.
///
/// Implementations must be callable from any thread; the engines hold no lock
/// while calling into the host.
#[cfg_attr(test, mockall::automock)]
pub trait ExecutionHost: Send + Sync {
    /// Executes a snippet and returns its result.
    ///
    /// # Errors
    ///
    /// Returns [`HostError`] when compilation or evaluation fails.
    fn execute(&self, code: &str) -> HostResult<FieldValue>;

    /// Binds `value` to a fresh variable visible to later snippets.
    ///
    /// # Errors
    ///
    /// Returns [`HostError`] when the variable cannot be declared.
    fn declare(&self, name: &str, value: Value) -> HostResult<()>;
}
