//! Error types for library definitions and their merge into the kernel.

use thiserror::Error;

use super::domain::KernelVersion;
use crate::rendering::ports::HostError;

/// Failure raised by a library callback.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("library callback failed: {0}")]
pub struct CallbackError(pub String);

impl CallbackError {
    /// Creates a callback error from any message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl From<HostError> for CallbackError {
    fn from(error: HostError) -> Self {
        Self(error.to_string())
    }
}

/// Errors raised while building or merging library definitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LibraryError {
    /// A kernel version string could not be parsed.
    #[error("invalid kernel version '{0}'")]
    InvalidKernelVersion(String),

    /// The definition needs a newer kernel than the one running.
    #[error("library requires kernel {required} or newer; running {running}")]
    KernelVersionTooLow {
        /// Minimum version declared by the library.
        required: KernelVersion,
        /// Version of the running kernel.
        running: KernelVersion,
    },

    /// A lifecycle callback failed.
    #[error(transparent)]
    Callback(#[from] CallbackError),
}
