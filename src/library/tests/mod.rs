//! Unit tests for the library module.

mod acceptance_tests;
mod version_tests;
