//! Format registry
//!
//! Maps attribute names to the [`FormatDescriptor`] that applies them. The registry is
//! caller-supplied configuration: the converter ships no built-in formats.

use crate::format::FormatDescriptor;
use std::collections::HashMap;

/// Registry of attribute formats
///
/// # Examples
///
/// ```ignore
/// let registry = FormatRegistry::new()
///     .with("bold", FormatDescriptor::tag("b"))
///     .with("list", FormatDescriptor::tag("li").line().with_parent_tag("ol"));
///
/// assert!(registry.has("bold"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct FormatRegistry {
    formats: HashMap<String, FormatDescriptor>,
}

impl FormatRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        FormatRegistry {
            formats: HashMap::new(),
        }
    }

    /// Register a format
    ///
    /// If a format with the same name already exists, it will be replaced.
    pub fn register(&mut self, name: impl Into<String>, format: FormatDescriptor) {
        self.formats.insert(name.into(), format);
    }

    /// Builder form of [`FormatRegistry::register`]
    pub fn with(mut self, name: impl Into<String>, format: FormatDescriptor) -> Self {
        self.register(name, format);
        self
    }

    /// Get a format by attribute name
    pub fn get(&self, name: &str) -> Option<&FormatDescriptor> {
        self.formats.get(name)
    }

    /// Check if a format exists
    pub fn has(&self, name: &str) -> bool {
        self.formats.contains_key(name)
    }

    /// List all registered attribute names (sorted)
    pub fn list_formats(&self) -> Vec<String> {
        let mut names: Vec<_> = self.formats.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.formats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formats.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, FormatDescriptor)> for FormatRegistry {
    fn from_iter<I: IntoIterator<Item = (K, FormatDescriptor)>>(iter: I) -> Self {
        let mut registry = FormatRegistry::new();
        registry.extend(iter);
        registry
    }
}

impl<K: Into<String>> Extend<(K, FormatDescriptor)> for FormatRegistry {
    fn extend<I: IntoIterator<Item = (K, FormatDescriptor)>>(&mut self, iter: I) {
        for (name, format) in iter {
            self.register(name, format);
        }
    }
}
