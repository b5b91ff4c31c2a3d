//! Configuration options for RDA encoding and decoding.
//!
//! - [`RdaOptions`]: Main configuration struct
//! - [`Delimiters`]: The five structural characters of the text encoding
//! - [`Compression`]: Body compression for the binary encoding
//!
//! ## Examples
//!
//! ```rust
//! use rda::{Compression, Delimiters, Rda, RdaOptions};
//!
//! let mut rda = Rda::new();
//! rda[0].set_value("John");
//!
//! // Use angle brackets and a semicolon separator
//! let options = RdaOptions::new().with_delimiters(Delimiters::new('<', '>', ';', ':', '^'));
//! let text = rda.to_text_with_options(&options).unwrap();
//! assert_eq!(text, "<>;:^<:John>");
//!
//! // Compress binary output
//! let options = RdaOptions::new().with_compression(Compression::Lz4);
//! let bytes = rda.to_bytes_with_options(&options).unwrap();
//! ```

use crate::{Error, Result};

/// Default nesting limit applied by both codecs.
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Structural characters of the text encoding.
///
/// Every encoded document starts with these five characters in the order
/// `open`, `close`, `separator`, `value`, `escape`, so a reader never needs to
/// know which set the writer used.
///
/// # Examples
///
/// ```rust
/// use rda::Delimiters;
///
/// let d = Delimiters::default();
/// assert_eq!(d.header(), "[]|=\\");
/// assert!(d.validate().is_ok());
/// assert!(Delimiters::new('[', '[', '|', '=', '\\').validate().is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Delimiters {
    /// Opens a child list
    pub open: char,
    /// Closes a child list
    pub close: char,
    /// Separates sibling children
    pub separator: char,
    /// Introduces a scalar value
    pub value: char,
    /// Escapes a structural character inside a scalar
    pub escape: char,
}

impl Default for Delimiters {
    fn default() -> Self {
        Delimiters {
            open: '[',
            close: ']',
            separator: '|',
            value: '=',
            escape: '\\',
        }
    }
}

impl Delimiters {
    #[must_use]
    pub const fn new(open: char, close: char, separator: char, value: char, escape: char) -> Self {
        Delimiters {
            open,
            close,
            separator,
            value,
            escape,
        }
    }

    /// Returns the characters in header order.
    #[must_use]
    pub const fn as_array(&self) -> [char; 5] {
        [
            self.open,
            self.close,
            self.separator,
            self.value,
            self.escape,
        ]
    }

    /// Returns the header string written in front of every text document.
    #[must_use]
    pub fn header(&self) -> String {
        self.as_array().iter().collect()
    }

    /// Checks that the set can encode every tree unambiguously.
    ///
    /// The characters must be pairwise distinct, and none may be alphanumeric,
    /// whitespace or a control character: escape sequences use the letters
    /// `n`, `r`, `t`, and the encoded form is kept on one line.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidHeader`] describing the first offending character.
    pub fn validate(&self) -> Result<()> {
        let chars = self.as_array();
        for (i, ch) in chars.iter().enumerate() {
            if ch.is_alphanumeric() || ch.is_whitespace() || ch.is_control() {
                return Err(Error::invalid_header(&format!(
                    "delimiter {:?} must be a printable non-alphanumeric character",
                    ch
                )));
            }
            if chars[..i].contains(ch) {
                return Err(Error::invalid_header(&format!(
                    "delimiter {:?} is declared twice",
                    ch
                )));
            }
        }
        Ok(())
    }

    /// Returns `true` if `ch` must be escaped inside a scalar.
    #[inline]
    #[must_use]
    pub fn is_reserved(&self, ch: char) -> bool {
        ch == self.open || ch == self.close || ch == self.separator || ch == self.escape
    }
}

/// Compression applied to the body of a binary stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Compression {
    #[default]
    None,
    /// LZ4 frame format
    Lz4,
}

impl Compression {
    pub(crate) const fn flag(self) -> u8 {
        match self {
            Compression::None => 0,
            Compression::Lz4 => 1,
        }
    }
}

/// Configuration options for both codecs.
///
/// # Examples
///
/// ```rust
/// use rda::{Compression, RdaOptions};
///
/// let options = RdaOptions::new()
///     .with_max_depth(64)
///     .with_compression(Compression::Lz4);
/// assert_eq!(options.max_depth, 64);
/// ```
#[derive(Clone, Debug)]
pub struct RdaOptions {
    /// Characters used by the text encoder (the parser reads them from the header)
    pub delimiters: Delimiters,
    /// Maximum nesting depth accepted on encode and decode
    pub max_depth: usize,
    /// Binary body compression
    pub compression: Compression,
}

impl Default for RdaOptions {
    fn default() -> Self {
        RdaOptions {
            delimiters: Delimiters::default(),
            max_depth: DEFAULT_MAX_DEPTH,
            compression: Compression::default(),
        }
    }
}

impl RdaOptions {
    /// Creates default options (`[]|=\` delimiters, depth 512, no compression).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_delimiters(mut self, delimiters: Delimiters) -> Self {
        self.delimiters = delimiters;
        self
    }

    /// Sets the nesting limit.
    ///
    /// A childless root has depth 0; each level of children adds one.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    #[must_use]
    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }
}
