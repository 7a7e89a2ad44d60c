//! HTML serialization of the markup tree
//!
//! Uses the html5ever serializer: attributes in insertion order, void elements without
//! end tags, text escaped. Sibling elements are concatenated without separators and
//! newlines are stripped from the result.

use crate::error::ConvertError;
use html5ever::{serialize, serialize::SerializeOpts, serialize::TraversalScope};
use markup5ever_rcdom::{Handle, SerializableHandle};

/// Serialize the children of `root` (not `root` itself) to an HTML string
pub fn serialize_children(root: &Handle) -> Result<String, ConvertError> {
    let mut output = Vec::new();

    // IncludeNode serializes each child element together with its subtree
    let opts = SerializeOpts {
        traversal_scope: TraversalScope::IncludeNode,
        ..Default::default()
    };

    for child in root.children.borrow().iter() {
        let serializable = SerializableHandle::from(child.clone());
        serialize(&mut output, &serializable, opts.clone()).map_err(|e| {
            ConvertError::Serialization(format!("HTML serialization failed: {e}"))
        })?;
    }

    let html = String::from_utf8(output)
        .map_err(|e| ConvertError::Serialization(format!("UTF-8 conversion failed: {e}")))?;
    Ok(html.replace('\n', ""))
}
