//! Kernel results: turning execution outcomes into client messages.
//!
//! This crate provides the result-materialisation pipeline of an interactive
//! computation kernel: extensible renderer resolution for produced values,
//! recursive text rendering as the fallback representation, rendering of
//! execution errors, library definitions that contribute handlers at
//! runtime, and the wire envelope codec that carries the results.
//!
//! # Architecture
//!
//! Each subsystem follows hexagonal architecture principles:
//!
//! - **Domain**: Pure data and handler types with no host dependencies
//! - **Ports**: Trait interfaces for the execution host collaborator
//! - **Services**: Engines and registries orchestrating the domain
//!
//! # Modules
//!
//! - [`messaging`]: Wire envelope, message types and content codec
//! - [`rendering`]: Value, text and throwable rendering engines
//! - [`library`]: Library definitions and their merge into the kernel
//! - [`pipeline`]: Result and error materialisation into message content

pub mod library;
pub mod messaging;
pub mod pipeline;
pub mod rendering;
