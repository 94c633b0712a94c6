//! Rendering engines.
//!
//! Each engine owns a copy-on-write priority registry
//! ([`registry::PriorityRegistry`]) and is safe to query while handlers are
//! being registered from another thread.

pub mod registry;
mod renderers;
mod text;
mod throwables;

pub use renderers::{RenderOutcome, Registration, RendererHandlerWithPriority, RenderersProcessor};
pub use text::{
    AVOID, CLASS, FAILED_FIELD, INACCESSIBLE_FIELD, ITERABLES, MAPS, NULL, OBJECT, PRIMITIVES,
    TextRenderFn, TextRenderSession, TextRenderer, TextRendererWithDescription,
    TextRendererWithPriority, TextRenderersProcessor, register_default_renderers,
};
pub use throwables::{ThrowableRendererWithPriority, ThrowableRenderersProcessor};
