//! Domain types for result rendering.
//!
//! The runtime value model, renderer handlers and their execution bodies.
//! Registries and dispatch live in [`crate::rendering::services`].

mod execution;
mod handler;
mod priority;
mod throwable;
mod type_descriptor;
mod value;
mod variables;

pub use execution::{
    CodeExecution, HandlerExecution, NativeRenderFn, RESULT_ARGUMENT, TEMPORARY_RESULT_NAME,
};
pub use handler::{
    AlwaysRendererHandler, ExactRendererHandler, PrecompilableHandler, RendererHandler,
    SubtypeRendererHandler,
};
pub use priority::Priority;
pub use throwable::{
    ExecutionError, SubtypeThrowableRenderer, ThrowableRenderFn, ThrowableRenderer,
};
pub use type_descriptor::{Ancestry, TypeDescriptor, TypeName, builtin};
pub use value::{
    FieldOrigin, FieldSlot, FieldValue, ListValue, MapValue, MimeBundle, ObjectField,
    ObjectValue, ObjectValueBuilder, OpaqueValue, TEXT_HTML, TEXT_PLAIN, Value,
};
pub use variables::{references_variable, substitute_variables};
