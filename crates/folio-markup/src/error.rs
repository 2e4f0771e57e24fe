//! Error types for markup parsing.

use std::str::Utf8Error;

/// Error while parsing markup into a [`TreeNode`](crate::TreeNode).
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ParseError {
    /// XML parsing error.
    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// UTF-8 decoding error.
    #[error("UTF-8 error")]
    Utf8(#[from] Utf8Error),

    /// Encoding error during XML parsing.
    #[error("encoding error")]
    Encoding(#[from] quick_xml::encoding::EncodingError),

    /// The payload contains no element at all.
    #[error("document has no root element")]
    NoRootElement,
}
