//! Unit tests for the capability core.

mod support;
