//! Unit tests for the host model and its configuration.

mod config_tests;
