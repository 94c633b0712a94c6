//! Unit tests for result materialisation.

mod materializer_tests;
