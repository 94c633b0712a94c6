//! Unit tests for the rendering module.

mod support;
mod throwable_tests;
