//! Unit tests for the definition renderers
//!
//! These tests build metadata graphs by hand and check the exact script text.

mod column_tests;
mod index_tests;
mod schema_tests;
mod type_tests;
