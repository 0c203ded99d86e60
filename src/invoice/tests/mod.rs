//! Unit tests for the invoice context.
