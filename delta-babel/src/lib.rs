//! Rich text delta to markup conversion
//!
//!     This crate converts a delta, a flat list of insert operations carrying formatting
//!     attributes, into a nested markup tree and serializes it to HTML.
//!
//!     TLDR:
//!         - Input is an ordered list of inserts: text (possibly with line breaks) or embeds.
//!         - Every `\n` closes one block element ("line"); text in between becomes its inline content.
//!         - What an attribute does is decided by the caller's FormatRegistry, never by this crate.
//!         - Conversion is one-way: markup is never parsed back into operations.
//!
//! Architecture
//!
//!     Two parts, evaluated in this order:
//!
//!     - Format registry (./registry.rs, ./format.rs): caller-supplied mapping from attribute
//!       name to a format descriptor. Pure data plus an optional callback.
//!     - Converter (./converter.rs): walks the operations, keeps the current line, applies
//!       inline formats as text is written and line formats when a line is finalized.
//!
//!     The markup tree is a `markup5ever_rcdom` tree (./dom.rs) and is written out with the
//!     html5ever serializer (./serializer.rs).
//!
//!     This is a pure lib: no code here prints, reads files or looks at the environment.
//!
//!     The file structure :
//!     .
//!     ├── error.rs
//!     ├── delta.rs                # Operation, Insert, Attributes, Delta
//!     ├── format.rs               # FormatDescriptor, Category, void tags
//!     ├── registry.rs             # FormatRegistry
//!     ├── dom.rs                  # markup tree helpers (also for callbacks)
//!     ├── converter.rs            # conversion engine
//!     ├── serializer.rs           # tree → HTML string
//!     └── lib.rs
//!
//! Testing
//!     tests
//!     └── convert
//!         ├── <suite>.rs
//!         └── mod.rs
//!
//!     Note that rust does not by default discover tests in subdirectories, so we need to include these
//!     in the mod.
//!
//! Format Application
//!
//!     A descriptor is applied by checking its fields in a fixed order: tag, parent tag,
//!     attribute / class prefix / style, then the custom callback. Line formats act on the
//!     block element, everything else on the node just written. Class and style values
//!     accumulate by plain concatenation.
//!
//!     Custom callbacks get the live node and the raw attribute value. They may restructure
//!     the tree freely with the helpers in dom.rs; the converter picks up where the node ended.
//!     A callback that returns a text node sitting inside a new element hands that element
//!     the place of the current line. An inline `parent_tag` does the same with its group
//!     element. Text not yet on a line reaches callbacks inside a holding parent; nodes the
//!     callback adds next to it are placed on the line with it.
//!
pub mod converter;
pub mod delta;
pub mod dom;
pub mod error;
pub mod format;
pub mod registry;
pub mod serializer;

pub use converter::{convert, convert_delta, ConvertOptions, Converter, UnknownAttributes};
pub use delta::{Attributes, Delta, Insert, Operation};
pub use error::ConvertError;
pub use format::{CallbackError, Category, FormatDescriptor, Mutator};
pub use registry::FormatRegistry;

/// Re-exported so callbacks can name node handles without depending on rcdom directly
pub use markup5ever_rcdom::Handle;
