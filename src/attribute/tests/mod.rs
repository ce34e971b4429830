//! Unit tests for the attribute kind and its data store.
