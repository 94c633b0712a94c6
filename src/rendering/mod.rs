//! Result rendering: from a runtime value to something displayable.
//!
//! - **Domain**: the runtime value model, type descriptors, renderer handlers
//!   and execution errors ([`domain::Value`], [`domain::RendererHandler`])
//! - **Ports**: the execution host used by code-template handlers
//!   ([`ports::ExecutionHost`])
//! - **Services**: the value, text and throwable rendering engines
//!   ([`services::RenderersProcessor`], [`services::TextRenderersProcessor`],
//!   [`services::ThrowableRenderersProcessor`])
//! - **Configuration**: text layout and method specialisation settings
//!   ([`config::TextRenderingConfig`], [`config::PrecompileConfig`])

pub mod config;
pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
