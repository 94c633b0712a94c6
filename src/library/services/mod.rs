//! Services applying library definitions to a running kernel.

mod registries;

pub use registries::KernelRegistries;
