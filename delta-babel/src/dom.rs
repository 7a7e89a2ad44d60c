//! Markup tree helpers
//!
//! The converter builds its output on `markup5ever_rcdom` nodes. Children are held by
//! strong references and parents by weak ones, so a subtree stays alive only while
//! something holds its root. These helpers keep both directions consistent and are
//! public so that custom format callbacks can restructure the tree.
//!
//! Note that dropping the last handle to an element also empties the children of its
//! descendants (rcdom tears trees down iteratively). Always move nodes out of an
//! element before letting it go if they are still needed.

use html5ever::tendril::TendrilSink;
use html5ever::{ns, parse_document, Attribute, LocalName, QualName};
use markup5ever_rcdom::{Handle, Node, NodeData, RcDom};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Create an HTML element with attributes
pub fn create_element(tag: &str, attrs: Vec<(&str, &str)>) -> Handle {
    let attributes = attrs
        .into_iter()
        .map(|(name, value)| Attribute {
            name: QualName::new(None, ns!(), LocalName::from(name)),
            value: value.to_string().into(),
        })
        .collect();
    element_with_attributes(QualName::new(None, ns!(html), LocalName::from(tag)), attributes)
}

fn element_with_attributes(name: QualName, attributes: Vec<Attribute>) -> Handle {
    Rc::new(Node {
        parent: Cell::new(None),
        children: RefCell::new(Vec::new()),
        data: NodeData::Element {
            name,
            attrs: RefCell::new(attributes),
            template_contents: Default::default(),
            mathml_annotation_xml_integration_point: false,
        },
    })
}

/// Create a text node
pub fn create_text(text: &str) -> Handle {
    Rc::new(Node {
        parent: Cell::new(None),
        children: RefCell::new(Vec::new()),
        data: NodeData::Text {
            contents: RefCell::new(text.to_string().into()),
        },
    })
}

fn create_comment(text: &str) -> Handle {
    Rc::new(Node {
        parent: Cell::new(None),
        children: RefCell::new(Vec::new()),
        data: NodeData::Comment {
            contents: text.to_string().into(),
        },
    })
}

pub fn is_text(node: &Handle) -> bool {
    matches!(node.data, NodeData::Text { .. })
}

pub fn is_element(node: &Handle) -> bool {
    matches!(node.data, NodeData::Element { .. })
}

/// Local name of an element, `None` for other node kinds
pub fn element_name(node: &Handle) -> Option<String> {
    match &node.data {
        NodeData::Element { name, .. } => Some(name.local.to_string()),
        _ => None,
    }
}

/// Check whether `node` is an element named `tag` (ASCII case-insensitive)
pub fn has_name(node: &Handle, tag: &str) -> bool {
    match &node.data {
        NodeData::Element { name, .. } => (*name.local).eq_ignore_ascii_case(tag),
        _ => false,
    }
}

pub fn parent_of(node: &Handle) -> Option<Handle> {
    let weak = node.parent.take();
    let parent = weak.as_ref().and_then(|weak| weak.upgrade());
    node.parent.set(weak);
    parent
}

pub fn children_of(node: &Handle) -> Vec<Handle> {
    node.children.borrow().clone()
}

pub fn last_child(node: &Handle) -> Option<Handle> {
    node.children.borrow().last().cloned()
}

fn index_in(parent: &Handle, node: &Handle) -> Option<usize> {
    parent
        .children
        .borrow()
        .iter()
        .position(|child| Rc::ptr_eq(child, node))
}

/// The sibling immediately before `node` in its parent
pub fn previous_sibling(node: &Handle) -> Option<Handle> {
    let parent = parent_of(node)?;
    let index = index_in(&parent, node)?;
    if index == 0 {
        return None;
    }
    let children = parent.children.borrow();
    children.get(index - 1).cloned()
}

/// Remove `node` from its parent. No-op for detached nodes.
pub fn detach(node: &Handle) {
    if let Some(weak) = node.parent.take() {
        if let Some(parent) = weak.upgrade() {
            parent
                .children
                .borrow_mut()
                .retain(|child| !Rc::ptr_eq(child, node));
        }
    }
}

/// Append `child` as the last child of `parent`, moving it from any previous parent
pub fn append(parent: &Handle, child: &Handle) {
    if Rc::ptr_eq(parent, child) {
        return;
    }
    detach(child);
    child.parent.set(Some(Rc::downgrade(parent)));
    parent.children.borrow_mut().push(child.clone());
}

/// Put `new` at the position of `old`, which becomes detached.
///
/// Does nothing when `old` has no parent.
pub fn replace(old: &Handle, new: &Handle) {
    if Rc::ptr_eq(old, new) {
        return;
    }
    let Some(parent) = parent_of(old) else {
        return;
    };
    detach(new);
    let Some(index) = index_in(&parent, old) else {
        return;
    };
    old.parent.set(None);
    new.parent.set(Some(Rc::downgrade(&parent)));
    parent.children.borrow_mut()[index] = new.clone();
}

/// Wrap `node` in `wrapper`. The wrapper takes the node's position if it had one.
pub fn wrap(node: &Handle, wrapper: &Handle) {
    replace(node, wrapper);
    append(wrapper, node);
}

/// Rename an element.
///
/// rcdom element names are immutable, so this builds a new element with the same
/// attributes, moves the children over and puts it at the old position. The returned
/// handle is the renamed element; keep it when the original was detached.
pub fn rename(node: &Handle, tag: &str) -> Handle {
    let attributes = match &node.data {
        NodeData::Element { attrs, .. } => attrs.borrow().clone(),
        _ => Vec::new(),
    };
    let renamed = element_with_attributes(
        QualName::new(None, ns!(html), LocalName::from(tag)),
        attributes,
    );
    replace(node, &renamed);
    for child in children_of(node) {
        append(&renamed, &child);
    }
    renamed
}

/// Value of an element attribute
pub fn get_attribute(node: &Handle, name: &str) -> Option<String> {
    match &node.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|attr| &*attr.name.local == name)
            .map(|attr| attr.value.to_string()),
        _ => None,
    }
}

/// Set an element attribute, replacing any previous value. Ignored for non-elements.
pub fn set_attribute(node: &Handle, name: &str, value: &str) {
    if let NodeData::Element { attrs, .. } = &node.data {
        let mut attrs = attrs.borrow_mut();
        match attrs.iter_mut().find(|attr| &*attr.name.local == name) {
            Some(attr) => attr.value = value.to_string().into(),
            None => attrs.push(Attribute {
                name: QualName::new(None, ns!(), LocalName::from(name)),
                value: value.to_string().into(),
            }),
        }
    }
}

/// Append `suffix` to an attribute value, creating the attribute if needed.
///
/// Plain concatenation: no separator is inserted.
pub fn append_attribute(node: &Handle, name: &str, suffix: &str) {
    let current = get_attribute(node, name).unwrap_or_default();
    set_attribute(node, name, &format!("{current}{suffix}"));
}

/// Concatenated text of a node and its descendants
pub fn text_content(node: &Handle) -> String {
    let mut text = String::new();
    collect_text(node, &mut text);
    text
}

fn collect_text(node: &Handle, out: &mut String) {
    if let NodeData::Text { contents } = &node.data {
        out.push_str(&contents.borrow());
    }
    for child in node.children.borrow().iter() {
        collect_text(child, out);
    }
}

/// Replace the text of a node.
///
/// Text nodes get new contents; elements lose all children and receive a single text
/// node (none when `text` is empty).
pub fn set_text(node: &Handle, text: &str) {
    match &node.data {
        NodeData::Text { contents } => {
            *contents.borrow_mut() = text.to_string().into();
        }
        NodeData::Element { .. } => {
            for child in children_of(node) {
                detach(&child);
            }
            if !text.is_empty() {
                append(node, &create_text(text));
            }
        }
        _ => {}
    }
}

/// Copy a node and its subtree. Only elements, text and comments are copied; other
/// node kinds become empty text.
pub fn deep_clone(node: &Handle) -> Handle {
    let copy = match &node.data {
        NodeData::Element { name, attrs, .. } => {
            element_with_attributes(name.clone(), attrs.borrow().clone())
        }
        NodeData::Text { contents } => create_text(&contents.borrow()),
        NodeData::Comment { contents } => create_comment(contents),
        _ => return create_text(""),
    };
    for child in node.children.borrow().iter() {
        append(&copy, &deep_clone(child));
    }
    copy
}

/// Parse an HTML fragment into detached nodes, in document order
pub fn parse_fragment(html: &str) -> Vec<Handle> {
    let dom = parse_document(RcDom::default(), Default::default()).one(html);
    let Some(body) = find_element(&dom.document, "body") else {
        return Vec::new();
    };
    let nodes = children_of(&body);
    for node in &nodes {
        detach(node);
    }
    nodes
}

fn find_element(node: &Handle, tag: &str) -> Option<Handle> {
    if has_name(node, tag) {
        return Some(node.clone());
    }
    node.children
        .borrow()
        .iter()
        .find_map(|child| find_element(child, tag))
}
