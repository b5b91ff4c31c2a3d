//! Error types for RDA encoding, decoding and object restoration.
//!
//! ## Error Categories
//!
//! - **Parse errors**: malformed text or binary input. Covers syntax errors,
//!   invalid headers, truncated input, malformed binary frames and checksum
//!   failures. Use [`Error::is_parse_error`] to test for the whole family.
//! - **Type mismatches**: a strict scalar read on a node that carries no scalar,
//!   or a scalar that does not convert to the requested type.
//! - **Index errors**: negative or non-numeric components in a slot address.
//! - **I/O errors**: storage failures while saving or loading.
//!
//! ## Examples
//!
//! ```rust
//! use rda::Rda;
//!
//! let result = Rda::parse("[]|=\\[=unbalanced");
//! assert!(result.is_err());
//!
//! if let Err(err) = result {
//!     assert!(err.is_parse_error());
//!     eprintln!("Parse error: {}", err);
//! }
//! ```

use std::fmt;
use std::io;
use thiserror::Error;

/// Represents all possible errors produced by this crate.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// IO error during reading or writing
    #[error("IO error: {0}")]
    Io(String),

    /// Malformed text encoding
    #[error("Syntax error at offset {offset}: {msg}")]
    Syntax { offset: usize, msg: String },

    /// Text header is missing or declares an unusable delimiter set
    #[error("Invalid header: {msg}")]
    InvalidHeader { msg: String },

    /// Input ended in the middle of a structure
    #[error("Unexpected end of input at offset {offset}: expected {expected}")]
    UnexpectedEof { offset: usize, expected: String },

    /// Malformed binary frame
    #[error("Invalid frame at byte {offset}: {msg}")]
    InvalidFrame { offset: u64, msg: String },

    /// Binary body does not match its trailing checksum
    #[error("Checksum mismatch: expected {expected:#010x}, found {found:#010x}")]
    ChecksumMismatch { expected: u32, found: u32 },

    /// Tree nesting exceeds the configured limit
    #[error("Nesting depth exceeds limit of {limit}")]
    DepthLimitExceeded { limit: usize },

    /// Scalar read on a node that cannot provide it
    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    /// Rejected slot index
    #[error("Invalid index {index:?}: {msg}")]
    Index { index: String, msg: String },

    /// Custom error
    #[error("Error: {0}")]
    Custom(String),
}

impl Error {
    /// Creates a syntax error at the given character offset.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rda::Error;
    ///
    /// let err = Error::syntax(10, "unexpected character");
    /// assert!(err.to_string().contains("offset 10"));
    /// ```
    pub fn syntax(offset: usize, msg: &str) -> Self {
        Error::Syntax {
            offset,
            msg: msg.to_string(),
        }
    }

    pub fn invalid_header(msg: &str) -> Self {
        Error::InvalidHeader {
            msg: msg.to_string(),
        }
    }

    /// Creates an unexpected end-of-input error.
    pub fn unexpected_eof(offset: usize, expected: &str) -> Self {
        Error::UnexpectedEof {
            offset,
            expected: expected.to_string(),
        }
    }

    /// Creates a binary framing error at the given byte offset.
    pub fn invalid_frame(offset: u64, msg: &str) -> Self {
        Error::InvalidFrame {
            offset,
            msg: msg.to_string(),
        }
    }

    pub fn depth_limit(limit: usize) -> Self {
        Error::DepthLimitExceeded { limit }
    }

    /// Creates a type mismatch error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rda::Error;
    ///
    /// let err = Error::type_mismatch("scalar value", "node with 2 children");
    /// assert!(err.to_string().contains("expected scalar value"));
    /// ```
    pub fn type_mismatch(expected: &str, found: &str) -> Self {
        Error::TypeMismatch {
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    pub fn index(index: &str, msg: &str) -> Self {
        Error::Index {
            index: index.to_string(),
            msg: msg.to_string(),
        }
    }

    /// Creates a custom error with a display message.
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Creates an I/O error for file reading/writing failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }

    /// Returns `true` for every error caused by malformed input.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rda::Error;
    ///
    /// assert!(Error::unexpected_eof(3, "']'").is_parse_error());
    /// assert!(!Error::io("disk full").is_parse_error());
    /// ```
    #[must_use]
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            Error::Syntax { .. }
                | Error::InvalidHeader { .. }
                | Error::UnexpectedEof { .. }
                | Error::InvalidFrame { .. }
                | Error::ChecksumMismatch { .. }
                | Error::DepthLimitExceeded { .. }
        )
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::UnexpectedEof => Error::UnexpectedEof {
                offset: 0,
                expected: "more bytes in stream".to_string(),
            },
            io::ErrorKind::InvalidData => Error::InvalidFrame {
                offset: 0,
                msg: err.to_string(),
            },
            _ => Error::Io(err.to_string()),
        }
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_family() {
        assert!(Error::syntax(0, "x").is_parse_error());
        assert!(Error::invalid_header("short").is_parse_error());
        assert!(Error::invalid_frame(4, "bad tag").is_parse_error());
        assert!(Error::depth_limit(8).is_parse_error());
        assert!(Error::ChecksumMismatch {
            expected: 1,
            found: 2
        }
        .is_parse_error());

        assert!(!Error::type_mismatch("scalar", "empty node").is_parse_error());
        assert!(!Error::index("-1", "negative").is_parse_error());
        assert!(!Error::custom("boom").is_parse_error());
    }

    #[test]
    fn test_io_error_conversion() {
        let eof = io::Error::new(io::ErrorKind::UnexpectedEof, "short read");
        assert!(matches!(Error::from(eof), Error::UnexpectedEof { .. }));

        let denied = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        match Error::from(denied) {
            Error::Io(msg) => assert!(msg.contains("denied")),
            other => panic!("Expected Io, got {:?}", other),
        }
    }

    #[test]
    fn test_display_messages() {
        let err = Error::ChecksumMismatch {
            expected: 0xdead_beef,
            found: 0x1,
        };
        assert!(err.to_string().contains("0xdeadbeef"));

        let err = Error::index("-2", "negative slot");
        assert!(err.to_string().contains("\"-2\""));
    }
}
