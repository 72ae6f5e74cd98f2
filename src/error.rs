//! Error types for 3MF scene decoding and encoding
//!
//! Decoding is permissive: absent attributes and optional
//! elements are not errors. The variants below cover what remains, which is
//! unreadable XML, broken packages and failures while writing output.
//!
//! # Error Codes
//!
//! Error codes follow the pattern: `E<category><number>`
//!
//! Categories:
//! - **E1xxx**: I/O and archive errors
//! - **E2xxx**: XML parsing, structure and writing errors
//!
//! ## Error Codes
//!
//! - `E1001`: I/O error reading or writing a file
//! - `E1002`: ZIP archive format error
//! - `E1003`: Missing required file in archive
//! - `E2001`: XML parsing error
//! - `E2002`: XML attribute error
//! - `E2003`: Invalid XML structure
//! - `E2004`: Invalid 3MF package format
//! - `E2005`: XML writing error

use std::io;
use thiserror::Error;

/// Result type for 3MF scene operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when reading or writing 3MF scenes
#[derive(Error, Debug)]
pub enum Error {
    /// IO error occurred while reading or writing
    ///
    /// **Error Code**: E1001
    #[error("[E1001] I/O error: {0}")]
    Io(#[from] io::Error),

    /// ZIP archive error
    ///
    /// **Error Code**: E1002
    ///
    /// **Common Causes**:
    /// - Corrupted ZIP file
    /// - Unsupported compression method
    /// - Truncated archive
    #[error("[E1002] ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Missing required file in the 3MF archive
    ///
    /// **Error Code**: E1003
    ///
    /// **Suggestions**:
    /// - Check for `[Content_Types].xml`, `_rels/.rels` and the model part
    #[error("[E1003] Missing required file: {0}")]
    MissingFile(String),

    /// XML tokenizer error
    ///
    /// **Error Code**: E2001
    ///
    /// **Common Causes**:
    /// - Malformed XML syntax
    /// - Unclosed or mismatched tags
    #[error("[E2001] XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// XML attribute error
    ///
    /// **Error Code**: E2002
    ///
    /// **Common Causes**:
    /// - Duplicate attribute
    /// - Attribute without a quoted value
    #[error("[E2002] XML attribute error: {0}")]
    XmlAttr(String),

    /// Invalid XML structure
    ///
    /// **Error Code**: E2003
    ///
    /// **Common Causes**:
    /// - Text that is not valid UTF-8
    /// - Unknown entity references
    #[error("[E2003] Invalid XML structure: {0}")]
    InvalidXml(String),

    /// Invalid 3MF package format
    ///
    /// **Error Code**: E2004
    ///
    /// **Common Causes**:
    /// - Missing OPC relationships
    /// - No 3D model relationship in `_rels/.rels`
    #[error("[E2004] Invalid 3MF format: {0}")]
    InvalidFormat(String),

    /// XML writing error
    ///
    /// **Error Code**: E2005
    ///
    /// **Common Causes**:
    /// - Output stream not writable
    /// - Serialized output that is not valid UTF-8
    #[error("[E2005] XML writing error: {0}")]
    XmlWrite(String),
}

impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Error::XmlAttr(format!("Attribute parsing failed: {}", err))
    }
}

impl Error {
    /// Create an InvalidFormat error with context about what file/structure is invalid
    ///
    /// # Arguments
    /// * `context` - What part of the format is invalid (e.g., "OPC structure")
    /// * `message` - Description of the error
    pub fn invalid_format_context(context: &str, message: &str) -> Self {
        Error::InvalidFormat(format!("{}: {}", context, message))
    }

    /// Create an XmlWrite error
    pub fn xml_write(message: String) -> Self {
        Error::XmlWrite(message)
    }
}
