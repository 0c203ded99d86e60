//! Unit tests for the application context.

mod support;
