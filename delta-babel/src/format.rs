//! Format descriptors
//!
//! A format descriptor tells the converter how one attribute name transforms the markup
//! tree. Descriptors are plain data with an optional callback. The converter dispatches on
//! which fields are present, always in the same order:
//!
//! 1. `tag`: rename the line (line formats), replace with a void element, or wrap the node
//! 2. `parent_tag`: merge into the preceding sibling with that name, or wrap in a new one
//! 3. `attribute` / `class_prefix` / `style`: set or append attribute values
//! 4. `mutate`: custom callback, its result replaces the node
//!
//! Descriptors without a callback can be read from configuration files. The historical
//! field names `type`, `class` and `parentTag` are accepted as aliases.

use markup5ever_rcdom::Handle;
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Element names that cannot hold children
pub const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "command", "embed", "hr", "iframe", "img", "input", "keygen",
    "link", "meta", "param", "source", "track", "wbr",
];

/// Check whether `name` is a void element (ASCII case-insensitive)
pub fn is_void_tag(name: &str) -> bool {
    VOID_TAGS.iter().any(|tag| tag.eq_ignore_ascii_case(name))
}

/// Error type returned by custom format callbacks
pub type CallbackError = Box<dyn std::error::Error + Send + Sync>;

type MutateFn = dyn Fn(&Handle, &Value) -> Result<Handle, CallbackError> + Send + Sync;

/// Custom format callback: receives the current node and the raw attribute value and
/// returns the node that continues through the conversion.
#[derive(Clone)]
pub struct Mutator(Arc<MutateFn>);

impl Mutator {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Handle, &Value) -> Result<Handle, CallbackError> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn call(&self, node: &Handle, value: &Value) -> Result<Handle, CallbackError> {
        (self.0)(node, value)
    }
}

impl fmt::Debug for Mutator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Mutator(..)")
    }
}

/// Where a format applies
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Applies to the content just inserted
    #[default]
    Inline,
    /// Applies to the whole block element when its line break is consumed
    Line,
    /// Applies to embedded content; handled like [`Category::Inline`]
    Embed,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Inline => "inline",
            Category::Line => "line",
            Category::Embed => "embed",
        }
    }
}

/// How one attribute name transforms the tree
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FormatDescriptor {
    pub tag: Option<String>,
    #[serde(alias = "type")]
    pub category: Category,
    #[serde(alias = "parentTag")]
    pub parent_tag: Option<String>,
    pub attribute: Option<String>,
    #[serde(alias = "class", alias = "classPrefix")]
    pub class_prefix: Option<String>,
    pub style: Option<String>,
    #[serde(skip)]
    pub mutate: Option<Mutator>,
}

impl FormatDescriptor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Descriptor that wraps (or, for line formats, renames) with `tag`
    pub fn tag(tag: impl Into<String>) -> Self {
        Self {
            tag: Some(tag.into()),
            ..Self::default()
        }
    }

    /// Mark the descriptor as a line format
    pub fn line(mut self) -> Self {
        self.category = Category::Line;
        self
    }

    /// Mark the descriptor as an embed format
    pub fn embed(mut self) -> Self {
        self.category = Category::Embed;
        self
    }

    pub fn with_parent_tag(mut self, tag: impl Into<String>) -> Self {
        self.parent_tag = Some(tag.into());
        self
    }

    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attribute = Some(attribute.into());
        self
    }

    pub fn with_class_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.class_prefix = Some(prefix.into());
        self
    }

    pub fn with_style(mut self, property: impl Into<String>) -> Self {
        self.style = Some(property.into());
        self
    }

    pub fn with_mutate<F>(mut self, f: F) -> Self
    where
        F: Fn(&Handle, &Value) -> Result<Handle, CallbackError> + Send + Sync + 'static,
    {
        self.mutate = Some(Mutator::new(f));
        self
    }

    pub fn is_line(&self) -> bool {
        self.category == Category::Line
    }

    /// True when any of `attribute`, `class_prefix` or `style` is set
    pub(crate) fn sets_attributes(&self) -> bool {
        self.attribute.is_some() || self.class_prefix.is_some() || self.style.is_some()
    }
}

/// Render an attribute value as attribute text.
///
/// Strings are used verbatim, `null` is empty, everything else is compact JSON.
pub fn render_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
