//! Ports for rendering.
//!
//! The execution host is the only outward dependency of the engines: it runs
//! code snippets and declares temporary variables.

mod host;

pub use host::{ExecutionHost, HostError, HostResult};

#[cfg(test)]
pub use host::MockExecutionHost;
