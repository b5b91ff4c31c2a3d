//! Text encoding.
//!
//! This module provides the [`Encoder`] that turns an [`Rda`] tree into its
//! canonical single-line text form. The grammar is documented in
//! [`crate::format`].
//!
//! ## Overview
//!
//! - **Self-describing header**: the five structural characters come first
//! - **Escaping**: structural characters and line breaks inside scalars are
//!   escaped, so the output is always one line
//! - **No recursion**: the tree is walked with an explicit stack, so encoding
//!   depth is bounded only by `max_depth`
//!
//! ## Usage
//!
//! Most users should call [`Rda::to_text`] or the crate-level
//! [`to_string`](crate::to_string):
//!
//! ```rust
//! use rda::{Encoder, Rda, RdaOptions};
//!
//! let mut rda = Rda::new();
//! rda[0].set_value("a|b");
//!
//! let mut encoder = Encoder::new(&RdaOptions::new());
//! encoder.encode(&rda).unwrap();
//! assert_eq!(encoder.into_inner(), "[]|=\\[=a\\|b]");
//! ```

use crate::{Delimiters, Error, Rda, RdaOptions, Result};
use tracing::trace;

/// The text encoder.
///
/// Created via [`Encoder::new`]; call [`Encoder::encode`] once per document
/// and take the output with [`Encoder::into_inner`].
pub struct Encoder {
    output: String,
    delimiters: Delimiters,
    max_depth: usize,
}

enum Step<'a> {
    Node(&'a Rda, usize),
    Separator,
    Close,
}

impl Encoder {
    pub fn new(options: &RdaOptions) -> Self {
        Encoder {
            output: String::with_capacity(64),
            delimiters: options.delimiters,
            max_depth: options.max_depth,
        }
    }

    pub fn into_inner(self) -> String {
        self.output
    }

    /// Appends the header and the encoding of `rda`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidHeader`] for an unusable delimiter set and
    /// [`Error::DepthLimitExceeded`] if `rda` is nested too deeply.
    pub fn encode(&mut self, rda: &Rda) -> Result<()> {
        self.delimiters.validate()?;

        let start = self.output.len();
        self.output.push_str(&self.delimiters.header());

        let d = self.delimiters;
        let mut stack = vec![Step::Node(rda, 0)];
        while let Some(step) = stack.pop() {
            match step {
                Step::Separator => self.output.push(d.separator),
                Step::Close => self.output.push(d.close),
                Step::Node(node, depth) => {
                    if let Some(value) = &node.value {
                        self.output.push(d.value);
                        self.write_scalar(value);
                    }
                    if node.children.is_empty() {
                        continue;
                    }
                    if depth >= self.max_depth {
                        self.output.truncate(start);
                        return Err(Error::depth_limit(self.max_depth));
                    }

                    self.output.push(d.open);
                    stack.push(Step::Close);
                    for (i, child) in node.children.iter().enumerate().rev() {
                        stack.push(Step::Node(child, depth + 1));
                        if i > 0 {
                            stack.push(Step::Separator);
                        }
                    }
                }
            }
        }

        trace!(chars = self.output.len() - start, "encoded rda text");
        Ok(())
    }

    #[inline]
    fn write_scalar(&mut self, s: &str) {
        let d = self.delimiters;
        for ch in s.chars() {
            match ch {
                '\n' => {
                    self.output.push(d.escape);
                    self.output.push('n');
                }
                '\r' => {
                    self.output.push(d.escape);
                    self.output.push('r');
                }
                '\t' => {
                    self.output.push(d.escape);
                    self.output.push('t');
                }
                _ if d.is_reserved(ch) => {
                    self.output.push(d.escape);
                    self.output.push(ch);
                }
                _ => self.output.push(ch),
            }
        }
    }
}
