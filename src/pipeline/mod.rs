//! Result materialisation: turns execution outcomes into wire content.
//!
//! The execution collaborator hands over either a produced value or an
//! execution error; [`ResultMaterializer`] resolves a representation through
//! the rendering engines and wraps it in the matching message content.

mod materializer;

pub use materializer::ResultMaterializer;

#[cfg(test)]
mod tests;
