//! Text decoding.
//!
//! This module provides the [`Parser`] that reads the text form produced by
//! [`Encoder`](crate::Encoder) back into an [`Rda`] tree.
//!
//! ## Overview
//!
//! - **Header-driven**: the delimiter set is taken from the first five
//!   characters of the input, not from the options
//! - **Single pass**: O(n) parsing with no backtracking
//! - **Strict**: anything that does not re-split into exactly one tree is
//!   rejected with a parse error carrying the character offset
//!
//! ## Usage
//!
//! ```rust
//! use rda::Rda;
//!
//! let rda = Rda::parse("[]|=\\[=John|=Smith]").unwrap();
//! assert_eq!(rda.value_at(1).unwrap(), "Smith");
//!
//! assert!(Rda::parse("[]|=\\[=John|=Smith").is_err());
//! ```

use crate::{Delimiters, Error, Rda, RdaOptions, Result};
use tracing::{debug, warn};

/// The text parser.
pub struct Parser<'de> {
    input: &'de str,
    position: usize, // byte position in `input`
    offset: usize,   // character offset, for error reporting
    delimiters: Delimiters,
    max_depth: usize,
}

impl<'de> Parser<'de> {
    pub fn new(input: &'de str, options: &RdaOptions) -> Self {
        Parser {
            input,
            position: 0,
            offset: 0,
            delimiters: options.delimiters,
            max_depth: options.max_depth,
        }
    }

    /// Parses the whole input as one document.
    ///
    /// # Errors
    ///
    /// Returns a parse error for a missing or invalid header, malformed escape
    /// sequences, unbalanced child lists, nesting beyond `max_depth` or any
    /// content after the root node.
    pub fn parse(&mut self) -> Result<Rda> {
        let result = self.parse_document();
        match &result {
            Ok(_) => debug!(chars = self.offset, "parsed rda text"),
            Err(e) => warn!(error = %e, "rejected rda text"),
        }
        result
    }

    fn parse_document(&mut self) -> Result<Rda> {
        self.parse_header()?;
        let root = self.parse_node(0)?;

        match self.peek_char() {
            None => Ok(root),
            Some(ch) if ch == self.delimiters.close => Err(Error::syntax(
                self.offset,
                "unbalanced close delimiter at top level",
            )),
            Some(ch) if ch == self.delimiters.separator => Err(Error::syntax(
                self.offset,
                "separator outside of a child list",
            )),
            Some(ch) => Err(Error::syntax(
                self.offset,
                &format!("unexpected {:?} after root node", ch),
            )),
        }
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    fn next_char(&mut self) -> Option<char> {
        let ch = self.peek_char()?;
        self.position += ch.len_utf8();
        self.offset += 1;
        Some(ch)
    }

    fn parse_header(&mut self) -> Result<()> {
        let mut header = ['\0'; 5];
        for (i, slot) in header.iter_mut().enumerate() {
            *slot = self.next_char().ok_or_else(|| {
                Error::invalid_header(&format!(
                    "expected 5 delimiter characters, found {}",
                    i
                ))
            })?;
        }

        let [open, close, separator, value, escape] = header;
        let delimiters = Delimiters::new(open, close, separator, value, escape);
        delimiters.validate()?;
        self.delimiters = delimiters;
        Ok(())
    }

    fn parse_node(&mut self, depth: usize) -> Result<Rda> {
        let d = self.delimiters;
        let mut node = Rda::new();

        if self.peek_char() == Some(d.value) {
            self.next_char();
            node.value = Some(self.parse_scalar()?);
        }

        if self.peek_char() == Some(d.open) {
            if depth >= self.max_depth {
                return Err(Error::depth_limit(self.max_depth));
            }
            self.next_char();

            loop {
                let child = self.parse_node(depth + 1)?;
                node.children.push(child);

                match self.next_char() {
                    Some(ch) if ch == d.separator => continue,
                    Some(ch) if ch == d.close => break,
                    Some(ch) => {
                        return Err(Error::syntax(
                            self.offset - 1,
                            &format!(
                                "unexpected {:?}, expected {:?} or {:?}",
                                ch, d.separator, d.close
                            ),
                        ))
                    }
                    None => {
                        return Err(Error::unexpected_eof(
                            self.offset,
                            &format!("{:?} or {:?}", d.separator, d.close),
                        ))
                    }
                }
            }
        }

        Ok(node)
    }

    fn parse_scalar(&mut self) -> Result<String> {
        let d = self.delimiters;
        let mut result = String::new();

        while let Some(ch) = self.peek_char() {
            if ch == d.open || ch == d.close || ch == d.separator {
                break;
            }
            self.next_char();

            match ch {
                _ if ch == d.escape => match self.next_char() {
                    Some('n') => result.push('\n'),
                    Some('r') => result.push('\r'),
                    Some('t') => result.push('\t'),
                    Some(other) if d.is_reserved(other) => result.push(other),
                    Some(other) => {
                        return Err(Error::syntax(
                            self.offset - 2,
                            &format!("invalid escape sequence {:?}{:?}", d.escape, other),
                        ))
                    }
                    None => {
                        return Err(Error::unexpected_eof(
                            self.offset,
                            "character after escape",
                        ))
                    }
                },
                '\n' | '\r' | '\t' => {
                    return Err(Error::syntax(
                        self.offset - 1,
                        "unescaped line break or tab in scalar",
                    ))
                }
                other => result.push(other),
            }
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Result<Rda> {
        Rda::parse(input)
    }

    #[test]
    fn test_header_only_is_empty_root() {
        assert_eq!(parse("[]|=\\").unwrap(), Rda::new());
    }

    #[test]
    fn test_leaf_roots() {
        assert_eq!(parse("[]|=\\=John").unwrap(), Rda::leaf("John"));
        assert_eq!(parse("[]|=\\=").unwrap(), Rda::leaf(""));
    }

    #[test]
    fn test_empty_children() {
        let one = parse("[]|=\\[]").unwrap();
        assert_eq!(one.len(), 1);
        assert!(one[0].is_empty());

        let three = parse("[]|=\\[||]").unwrap();
        assert_eq!(three.len(), 3);
    }

    #[test]
    fn test_nested() {
        let rda = parse("[]|=\\[=John|=Smith|[=1, 2, 3|=12345]]").unwrap();
        assert_eq!(rda[2][1].value().unwrap(), "12345");
        assert_eq!(rda[2][0].value().unwrap(), "1, 2, 3");
    }

    #[test]
    fn test_value_char_inside_scalar() {
        let rda = parse("[]|=\\=a=b==").unwrap();
        assert_eq!(rda.value().unwrap(), "a=b==");
    }

    #[test]
    fn test_escapes() {
        let rda = parse("[]|=\\=\\[\\]\\|\\\\\\n\\r\\t").unwrap();
        assert_eq!(rda.value().unwrap(), "[]|\\\n\r\t");
    }

    #[test]
    fn test_header_from_input_not_options() {
        let rda = parse("<>;:^<:a|b^;c>").unwrap();
        assert_eq!(rda.value_at(0).unwrap(), "a|b;c");
    }

    #[test]
    fn test_rejects_bad_header() {
        assert!(matches!(parse(""), Err(Error::InvalidHeader { .. })));
        assert!(matches!(parse("[]|"), Err(Error::InvalidHeader { .. })));
        assert!(matches!(parse("[]||\\"), Err(Error::InvalidHeader { .. })));
        assert!(matches!(parse("ab|=\\"), Err(Error::InvalidHeader { .. })));
    }

    #[test]
    fn test_rejects_unbalanced() {
        assert!(matches!(
            parse("[]|=\\[=a|=b"),
            Err(Error::UnexpectedEof { .. })
        ));
        assert!(matches!(parse("[]|=\\=a]"), Err(Error::Syntax { .. })));
        assert!(matches!(parse("[]|=\\=a|=b"), Err(Error::Syntax { .. })));
        assert!(matches!(parse("[]|=\\[=a]]"), Err(Error::Syntax { .. })));
    }

    #[test]
    fn test_rejects_bad_escapes() {
        assert!(matches!(parse("[]|=\\=abc\\"), Err(Error::UnexpectedEof { .. })));
        assert!(matches!(parse("[]|=\\=a\\qb"), Err(Error::Syntax { .. })));
        assert!(matches!(parse("[]|=\\=a\\=b"), Err(Error::Syntax { .. })));
    }

    #[test]
    fn test_rejects_stray_content() {
        assert!(matches!(parse("[]|=\\x"), Err(Error::Syntax { .. })));
        assert!(matches!(parse("[]|=\\[x]"), Err(Error::Syntax { .. })));
        assert!(matches!(parse("[]|=\\[[]=x]"), Err(Error::Syntax { .. })));
        assert!(matches!(parse("[]|=\\[=a]=b"), Err(Error::Syntax { .. })));
        assert!(matches!(parse("[]|=\\=line\nbreak"), Err(Error::Syntax { .. })));
    }

    #[test]
    fn test_depth_limit() {
        let options = RdaOptions::new().with_max_depth(2);
        assert!(Rda::parse_with_options("[]|=\\[[=x]]", &options).is_ok());
        assert!(matches!(
            Rda::parse_with_options("[]|=\\[[[=x]]]", &options),
            Err(Error::DepthLimitExceeded { limit: 2 })
        ));
    }

    #[test]
    fn test_deeply_nested_hostile_input_is_rejected() {
        let input = format!("[]|=\\{}", "[".repeat(100_000));
        assert!(matches!(
            parse(&input),
            Err(Error::DepthLimitExceeded { .. })
        ));
    }

    #[test]
    fn test_error_offsets() {
        match parse("[]|=\\=a\\qb") {
            Err(Error::Syntax { offset, .. }) => assert_eq!(offset, 7),
            other => panic!("Expected syntax error, got {:?}", other),
        }
    }
}
