//! Error types for result rendering.
//!
//! Rendering failures never abort a cell: the engines degrade to the
//! unrendered value and surface the error alongside it.

use thiserror::Error;

use super::ports::HostError;

/// Errors raised while resolving or running renderers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// The execution host failed to run a snippet.
    #[error(transparent)]
    Host(#[from] HostError),

    /// A handler raised an error while producing its replacement value.
    #[error("renderer {handler} failed: {reason}")]
    Execution {
        /// Description of the failing handler.
        handler: String,
        /// Failure detail.
        reason: String,
    },

    /// Ancestry of a runtime type could not be determined.
    #[error("cannot resolve ancestry of {type_name}: {reason}")]
    TypeResolution {
        /// Fully qualified type name.
        type_name: String,
        /// Failure detail.
        reason: String,
    },

    /// A handler could not be turned into a host function.
    #[error("precompilation failed: {0}")]
    Precompile(String),
}

impl RenderError {
    /// Creates an execution error for the named handler.
    #[must_use]
    pub fn execution(handler: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Execution {
            handler: handler.into(),
            reason: reason.into(),
        }
    }
}
