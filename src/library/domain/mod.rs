//! Library definitions and the values they carry.

mod acceptance;
mod builder;
mod callbacks;
mod definition;
mod resources;
mod version;

pub use acceptance::{AcceptanceRule, NameAcceptanceRule, NamePredicate, unite_acceptance_rules};
pub use builder::LibraryDefinitionBuilder;
pub use callbacks::{
    AfterCellExecutionCallback, AnnotationCallback, AnnotationHandler, CodePreprocessor,
    CodeRewriteFn, ColorScheme, ColorSchemeChangedCallback, ExecutionCallback, FieldCallback,
    FieldHandler, FnCodePreprocessor, InternalVariablesMarker, InterruptionCallback,
    PreprocessedCode, SubtypeFieldHandler,
};
pub use definition::LibraryDefinition;
pub use resources::{
    KernelRepository, LibraryResource, ResourceLocation, ResourcePathType, ResourceType,
};
pub use version::KernelVersion;
