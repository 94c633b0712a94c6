//! Unit tests for the messaging module.

mod codec_tests;
mod content_tests;
