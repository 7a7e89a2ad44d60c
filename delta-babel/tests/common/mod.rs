//! Shared format catalogs and helpers for the conversion suites.

use delta_babel::dom;
use delta_babel::format::render_value;
use delta_babel::{convert_delta, ConvertOptions, Delta, FormatDescriptor, FormatRegistry};
use serde_json::Value;

/// Build a delta from a `json!` literal, exactly as it would arrive over the wire
pub fn delta(value: Value) -> Delta {
    serde_json::from_value(value).expect("fixture delta to deserialize")
}

pub fn to_html(delta: &Delta, registry: &FormatRegistry, options: &ConvertOptions) -> String {
    convert_delta(delta, registry, options).expect("conversion to succeed")
}

/// Wraps bare text in an element named by the value, or renames the node's parent
pub fn parent_format() -> FormatDescriptor {
    FormatDescriptor::new().embed().with_mutate(|node, value| {
        let tag = value.as_str().unwrap_or("div");
        if dom::is_text(node) {
            dom::wrap(node, &dom::create_element(tag, vec![]));
        } else if let Some(parent) = dom::parent_of(node) {
            dom::rename(&parent, tag);
        }
        Ok(node.clone())
    })
}

pub fn reverse_format() -> FormatDescriptor {
    FormatDescriptor::new().with_mutate(|node, _| {
        let reversed: String = dom::text_content(node).chars().rev().collect();
        dom::set_text(node, &reversed);
        Ok(node.clone())
    })
}

/// Appends `value - 1` copies of the node to its parent
pub fn repeat_format() -> FormatDescriptor {
    FormatDescriptor::new().with_mutate(|node, value| {
        let times = value.as_u64().unwrap_or(1);
        if let Some(parent) = dom::parent_of(node) {
            for _ in 1..times {
                dom::append(&parent, &dom::deep_clone(node));
            }
        }
        Ok(node.clone())
    })
}

/// Line format turning an object value into `data-*` attributes
pub fn data_format() -> FormatDescriptor {
    FormatDescriptor::new().line().with_mutate(|node, value| {
        if let Some(fields) = value.as_object() {
            for (key, field) in fields {
                dom::set_attribute(node, &format!("data-{key}"), &render_value(field));
            }
        }
        Ok(node.clone())
    })
}

/// Replaces an embed with an asset block: image plus optional HTML caption
pub fn asset_format() -> FormatDescriptor {
    FormatDescriptor::new().embed().with_mutate(|node, value| {
        let holder = if dom::is_text(node) {
            let holder = dom::create_element("div", vec![]);
            dom::wrap(node, &holder);
            holder
        } else {
            let parent = dom::parent_of(node).ok_or("asset node has no parent")?;
            dom::rename(&parent, "div")
        };

        dom::set_text(node, "");
        dom::set_attribute(&holder, "data-chorus-asset-id", &render_value(&value["id"]));

        let img = dom::create_element("img", vec![]);
        dom::set_attribute(&img, "src", &render_value(&value["src"]));
        dom::append(&holder, &img);

        if let Some(caption) = value.get("caption").and_then(Value::as_str) {
            let caption_div = dom::create_element("div", vec![("class", "caption")]);
            for child in dom::parse_fragment(caption) {
                dom::append(&caption_div, &child);
            }
            dom::append(&holder, &caption_div);
        }

        Ok(node.clone())
    })
}

pub fn basic_formats() -> FormatRegistry {
    FormatRegistry::new()
        .with("bold", FormatDescriptor::tag("b"))
        .with("color", FormatDescriptor::new().with_style("color"))
        .with("user", FormatDescriptor::new().with_class_prefix("user-"))
        .with("firstheader", FormatDescriptor::tag("h1").line())
        .with("image", FormatDescriptor::tag("img").embed().with_attribute("src"))
        .with("link", FormatDescriptor::tag("a").with_attribute("href"))
        .with("class_name", FormatDescriptor::new().with_attribute("class"))
        .with("bullet", FormatDescriptor::tag("li").line().with_parent_tag("ul"))
        .with("list", FormatDescriptor::tag("li").line().with_parent_tag("ol"))
        .with("parent", parent_format())
        .with("reverse", reverse_format())
        .with("repeat", repeat_format())
        .with("data", data_format())
}

pub fn anthem_formats() -> FormatRegistry {
    let mut registry = basic_formats();
    registry.extend([
        ("bold", FormatDescriptor::tag("strong")),
        ("italic", FormatDescriptor::tag("em")),
        ("strike", FormatDescriptor::tag("s")),
        ("link", FormatDescriptor::tag("a").with_attribute("href")),
        ("firstheader", FormatDescriptor::tag("h1").line()),
        ("secondheader", FormatDescriptor::tag("h2").line()),
        ("thirdheader", FormatDescriptor::tag("h3").line()),
        ("bullet", FormatDescriptor::tag("li").line().with_parent_tag("ul")),
        ("list", FormatDescriptor::tag("li").line().with_parent_tag("ol")),
        ("blockquote", FormatDescriptor::new().line().with_parent_tag("blockquote")),
        ("image", asset_format()),
    ]);
    registry
}

pub fn anthem_options() -> ConvertOptions {
    ConvertOptions::new().with_block_tag("p")
}
