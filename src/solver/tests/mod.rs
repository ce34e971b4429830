//! Unit tests for the solver kind.
