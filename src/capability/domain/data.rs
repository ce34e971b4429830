//! The host model's domain data graph.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Opaque, mutable data graph shared by every capability of one host model.
///
/// The graph is a set of named JSON sections (`climate`, `envelope`,
/// `rooms`, ...). This crate never interprets section contents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelData {
    sections: Map<String, Value>,
}

impl ModelData {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a section by name.
    #[must_use]
    pub fn section(&self, name: &str) -> Option<&Value> {
        self.sections.get(name)
    }

    /// Returns a mutable section by name.
    pub fn section_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.sections.get_mut(name)
    }

    /// Inserts or replaces a section, returning the previous value.
    pub fn insert_section(&mut self, name: impl Into<String>, value: Value) -> Option<Value> {
        self.sections.insert(name.into(), value)
    }

    /// Removes a section.
    pub fn remove_section(&mut self, name: &str) -> Option<Value> {
        self.sections.remove(name)
    }

    /// Returns whether a section exists.
    #[must_use]
    pub fn contains_section(&self, name: &str) -> bool {
        self.sections.contains_key(name)
    }

    /// Iterates section names.
    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }

    /// Returns the required section names that are absent.
    #[must_use]
    pub fn missing_sections<'a>(&self, required: &'a [String]) -> Vec<&'a str> {
        required
            .iter()
            .map(String::as_str)
            .filter(|name| !self.contains_section(name))
            .collect()
    }
}
