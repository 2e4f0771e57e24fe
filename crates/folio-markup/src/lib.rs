//! Owned markup tree shared by the folio document transforms.
//!
//! Hypertext fragments and SVG payloads are both parsed into the same
//! [`TreeNode`] structure, transformed in place, and serialized back to text.
//!
//! The tree follows the element/text/tail model: a node's `text` is the
//! character data before its first child, and each child's `tail` is the
//! character data that follows that child inside the parent. Document order
//! is therefore `text, child[0], child[0].tail, child[1], ...`.
//!
//! # Example
//!
//! ```
//! use folio_markup::{parse_fragment, to_html_fragment};
//!
//! let mut root = parse_fragment("<p>Hello <em>world</em>!</p>").unwrap();
//! let replaced = root.replace_descendants(
//!     &|n| n.tag == "em",
//!     &mut |em| Some(folio_markup::TreeNode::new("strong").with_text(em.text_content())),
//! );
//! assert_eq!(replaced, 1);
//! assert_eq!(to_html_fragment(&root), "<p>Hello <strong>world</strong>!</p>");
//! ```

mod entities;
mod error;
mod parser;
mod serializer;
mod tree;

pub use entities::convert_html_entities;
pub use error::ParseError;
pub use parser::{parse_document, parse_fragment};
pub use serializer::{escape_attr, escape_html, to_html, to_html_fragment, to_xml};
pub use tree::TreeNode;
