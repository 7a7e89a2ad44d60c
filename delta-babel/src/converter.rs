//! Delta → markup conversion engine
//!
//! The converter walks the operations in order and keeps one open block element, the
//! current line. Text is appended to the current line with inline formats applied as it
//! goes; every `\n` finalizes the line (line formats are applied to the block element
//! itself) and the next write opens a new one.
//!
//! Formats can relocate or replace the block element (renaming it to `h1`, grouping it
//! into a `ul`, swapping it for a callback-built wrapper), so after every inline write the
//! current line is re-read from the last top-level child of the tree instead of being
//! trusted as a stable reference.
//!
//! A converter instance holds mutable state for exactly one conversion. Use one instance
//! per delta.

use crate::delta::{Attributes, Delta, Insert, Operation};
use crate::dom;
use crate::error::ConvertError;
use crate::format::{self, FormatDescriptor};
use crate::registry::FormatRegistry;
use crate::serializer::serialize_children;
use markup5ever_rcdom::Handle;
use serde::Deserialize;
use serde_json::Value;
use std::rc::Rc;
use tracing::{debug, trace};

/// Policy for attributes without a registry entry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownAttributes {
    /// Skip the attribute
    #[default]
    Ignore,
    /// Fail the conversion with [`ConvertError::UnknownAttribute`]
    Reject,
}

/// Options for a conversion
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Element used for new lines
    pub block_tag: String,
    /// Element used to wrap bare text that receives attributes
    pub inline_tag: String,
    /// Text rendered for embed inserts. `None` renders embeds as empty atomic content;
    /// `Some("!")` reproduces the classic placeholder output.
    pub embed_placeholder: Option<String>,
    /// What to do with attributes that have no registry entry
    pub unknown_attributes: UnknownAttributes,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            block_tag: "div".to_string(),
            inline_tag: "span".to_string(),
            embed_placeholder: None,
            unknown_attributes: UnknownAttributes::Ignore,
        }
    }
}

impl ConvertOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_block_tag(mut self, tag: impl Into<String>) -> Self {
        self.block_tag = tag.into();
        self
    }

    pub fn with_inline_tag(mut self, tag: impl Into<String>) -> Self {
        self.inline_tag = tag.into();
        self
    }

    pub fn with_embed_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.embed_placeholder = Some(placeholder.into());
        self
    }

    pub fn with_unknown_attributes(mut self, policy: UnknownAttributes) -> Self {
        self.unknown_attributes = policy;
        self
    }
}

/// Content written to the current line
enum Content<'t> {
    Text(&'t str),
    Embed,
}

/// Converts operations into a markup tree, one operation at a time
pub struct Converter<'r> {
    registry: &'r FormatRegistry,
    options: ConvertOptions,
    root: Handle,
    line: Option<Handle>,
    /// Temporary parent for nodes that have no place in the tree yet: bare text handed
    /// to a callback, or a group element built by `parent_tag`. Structure built around
    /// such a node survives until the engine has placed it.
    staging: Handle,
    position: usize,
}

impl<'r> Converter<'r> {
    pub fn new(registry: &'r FormatRegistry, options: ConvertOptions) -> Self {
        Self {
            registry,
            options,
            root: dom::create_element("root", vec![]),
            line: None,
            staging: dom::create_element("staging", vec![]),
            position: 0,
        }
    }

    /// Root container of the tree built so far; its children are the lines
    pub fn root(&self) -> &Handle {
        &self.root
    }

    /// Feed one operation
    pub fn write_op(&mut self, op: &Operation) -> Result<(), ConvertError> {
        let index = self.position;
        self.position += 1;

        let insert = op
            .insert
            .as_ref()
            .ok_or(ConvertError::InvalidOperation { index })?;
        let attrs = &op.attributes;

        match insert {
            Insert::Text(text) => {
                let text = text.replace("\r\n", "\n");
                let mut rest = text.as_str();
                while let Some(newline) = rest.find('\n') {
                    self.write_text(Content::Text(&rest[..newline]), attrs)?;
                    self.format_line(attrs)?;
                    self.line = None;
                    rest = &rest[newline + 1..];
                }
                if !rest.is_empty() {
                    self.write_text(Content::Text(rest), attrs)?;
                }
            }
            Insert::Embed(_) => self.write_text(Content::Embed, attrs)?,
        }

        Ok(())
    }

    /// Serialize the tree built so far
    pub fn finish(self) -> Result<String, ConvertError> {
        serialize_children(&self.root)
    }

    fn current_line(&mut self) -> Handle {
        if let Some(line) = &self.line {
            return line.clone();
        }
        let line = dom::create_element(&self.options.block_tag, vec![]);
        dom::append(&self.root, &line);
        self.line = Some(line.clone());
        line
    }

    fn write_text(
        &mut self,
        content: Content<'_>,
        attrs: &Attributes,
    ) -> Result<(), ConvertError> {
        let mut line = self.current_line();

        let mut node = match content {
            Content::Text("") => return Ok(()),
            Content::Text(text) => dom::create_text(text),
            Content::Embed => {
                dom::create_text(self.options.embed_placeholder.as_deref().unwrap_or(""))
            }
        };

        let mut applied = false;
        for (name, value) in attrs.iter() {
            let Some(format) = self.lookup(name)? else {
                continue;
            };
            if format.is_line() {
                continue;
            }
            applied = true;
            trace!(format = name, "applying inline format");
            node = self.apply_format(name, node, format, value)?;

            match self.attached_parent(&node) {
                // The format built a holder around bare text: it takes the line's place
                Some(parent) if dom::is_text(&node) => {
                    if !Rc::ptr_eq(&parent, &line) {
                        dom::replace(&line, &parent);
                        line = parent;
                    }
                }
                _ => self.place(&line, &node),
            }
            self.release_staging();
        }

        if !applied {
            dom::append(&line, &node);
        }

        self.line = dom::last_child(&self.root);
        Ok(())
    }

    fn format_line(&mut self, attrs: &Attributes) -> Result<(), ConvertError> {
        let Some(mut line) = self.line.clone() else {
            return Ok(());
        };

        for (name, value) in attrs.iter() {
            let Some(format) = self.lookup(name)? else {
                continue;
            };
            if !format.is_line() {
                continue;
            }
            trace!(format = name, "applying line format");
            line = self.apply_format(name, line, format, value)?;
            self.release_staging();
        }

        self.line = Some(line);
        Ok(())
    }

    fn lookup(&self, name: &str) -> Result<Option<&'r FormatDescriptor>, ConvertError> {
        let registry: &'r FormatRegistry = self.registry;
        match registry.get(name) {
            Some(format) => Ok(Some(format)),
            None => match self.options.unknown_attributes {
                UnknownAttributes::Ignore => {
                    trace!(attribute = name, "no format registered, skipping");
                    Ok(None)
                }
                UnknownAttributes::Reject => Err(ConvertError::UnknownAttribute {
                    name: name.to_string(),
                }),
            },
        }
    }

    fn apply_format(
        &self,
        name: &str,
        node: Handle,
        format: &FormatDescriptor,
        value: &Value,
    ) -> Result<Handle, ConvertError> {
        let mut node = node;

        if let Some(tag) = &format.tag {
            node = if format.is_line() && dom::is_element(&node) {
                dom::rename(&node, tag)
            } else if format::is_void_tag(tag) {
                let void = dom::create_element(tag, vec![]);
                dom::replace(&node, &void);
                void
            } else {
                let wrapper = dom::create_element(tag, vec![]);
                dom::wrap(&node, &wrapper);
                wrapper
            };
        }

        if let Some(parent_tag) = &format.parent_tag {
            match dom::previous_sibling(&node) {
                Some(group) if dom::has_name(&group, parent_tag) => dom::append(&group, &node),
                _ => {
                    let wrapper = dom::create_element(parent_tag, vec![]);
                    if dom::parent_of(&node).is_none() {
                        dom::append(&self.staging, &wrapper);
                    }
                    dom::wrap(&node, &wrapper);
                }
            }
        }

        if format.sets_attributes() {
            if dom::is_text(&node) {
                let inline = dom::create_element(&self.options.inline_tag, vec![]);
                dom::wrap(&node, &inline);
                node = inline;
            }

            let value_text = format::render_value(value);
            if let Some(attribute) = &format.attribute {
                dom::set_attribute(&node, attribute, &value_text);
            }
            if let Some(prefix) = &format.class_prefix {
                dom::append_attribute(&node, "class", &format!("{prefix}{value_text}"));
            }
            if let Some(property) = &format.style {
                dom::append_attribute(&node, "style", &format!("{property}: {value_text}; "));
            }
        }

        if let Some(mutate) = &format.mutate {
            if dom::parent_of(&node).is_none() {
                dom::append(&self.staging, &node);
            }
            node = mutate
                .call(&node, value)
                .map_err(|source| ConvertError::FormatCallback {
                    format: name.to_string(),
                    source,
                })?;
        }

        Ok(node)
    }

    /// Append `node` to `line`. A node still parked in staging brings along the
    /// siblings a callback added next to it, in order.
    fn place(&self, line: &Handle, node: &Handle) {
        match dom::parent_of(node) {
            Some(parent) if Rc::ptr_eq(&parent, &self.staging) => {
                for child in dom::children_of(&self.staging) {
                    dom::append(line, &child);
                }
            }
            _ => dom::append(line, node),
        }
    }

    /// Parent of `node`, unless it is only parked in the staging container
    fn attached_parent(&self, node: &Handle) -> Option<Handle> {
        dom::parent_of(node).filter(|parent| !Rc::ptr_eq(parent, &self.staging))
    }

    fn release_staging(&self) {
        for leftover in dom::children_of(&self.staging) {
            dom::detach(&leftover);
        }
    }
}

/// Convert operations to an HTML string
///
/// # Errors
///
/// Fails on the first operation without an insert, on unknown attributes when they are
/// rejected, and when a format callback fails. No partial output is returned.
pub fn convert(
    ops: &[Operation],
    registry: &FormatRegistry,
    options: &ConvertOptions,
) -> Result<String, ConvertError> {
    debug!(operations = ops.len(), formats = registry.len(), "converting delta");
    let mut converter = Converter::new(registry, options.clone());
    for op in ops {
        converter.write_op(op)?;
    }
    converter.finish()
}

/// Convert a [`Delta`] to an HTML string
pub fn convert_delta(
    delta: &Delta,
    registry: &FormatRegistry,
    options: &ConvertOptions,
) -> Result<String, ConvertError> {
    convert(&delta.ops, registry, options)
}
