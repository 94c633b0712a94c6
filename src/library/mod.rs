//! Library definitions: what an extension contributes to the kernel.
//!
//! - **Domain**: the accumulating [`domain::LibraryDefinitionBuilder`], the
//!   immutable [`domain::LibraryDefinition`] it produces, integration
//!   acceptance rules and [`domain::KernelVersion`]
//! - **Services**: [`services::KernelRegistries`], which merges definitions
//!   into the live renderer engines and dispatches library callbacks

pub mod domain;
pub mod error;
pub mod services;

#[cfg(test)]
mod tests;
