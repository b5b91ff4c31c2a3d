//! RDA Wire Formats
//!
//! This module documents the two encodings of an [`Rda`](crate::Rda) tree as
//! implemented by this library. It contains no code.
//!
//! # Data Model
//!
//! A node has an optional scalar string and an ordered list of children.
//! Both encodings distinguish:
//!
//! - an absent scalar from an empty one (`None` vs `Some("")`)
//! - a node without children from a node whose children are all empty
//!
//! so decoding is the exact inverse of encoding for every tree the API can
//! build.
//!
//! # Text Encoding
//!
//! A single line of text. The first five characters declare the structural
//! characters of the document, in this order:
//!
//! | Position | Role | Default |
//! |----------|------|---------|
//! | 1 | open child list | `[` |
//! | 2 | close child list | `]` |
//! | 3 | separate siblings | `\|` |
//! | 4 | introduce a scalar | `=` |
//! | 5 | escape | `\` |
//!
//! The characters must be pairwise distinct and must not be alphanumeric,
//! whitespace or control characters.
//!
//! ## Grammar
//!
//! ```text
//! document := header node
//! header   := OPEN CLOSE SEP VALUE ESC
//! node     := [ VALUE scalar ] [ OPEN node ( SEP node )* CLOSE ]
//! scalar   := ( plain | ESC OPEN | ESC CLOSE | ESC SEP | ESC ESC
//!             | ESC 'n' | ESC 'r' | ESC 't' )*
//! ```
//!
//! `plain` is any character other than OPEN, CLOSE, SEP, ESC, line feed,
//! carriage return and tab. The VALUE character may appear unescaped inside a
//! scalar, because a scalar only ends at OPEN, CLOSE, SEP or end of input.
//!
//! ## Examples
//!
//! ```text
//! []|=\                          empty root
//! []|=\=                         root holding the empty string
//! []|=\=John                     root holding "John"
//! []|=\[]                        root with one empty child
//! []|=\[||=c]                    three children, only the last has a value
//! []|=\[=John|=Smith]            two leaf children
//! []|=\=a\|b\nc                  root holding "a|b" + newline + "c"
//! []|=\=hdr[=x]                  scalar and children on the same node
//! <>;:^<:John;:Smith>            same two leaves with another header
//! ```
//!
//! A person with two nested addresses:
//!
//! ```text
//! []|=\[=John|=Smith|[=1, 2, 3|=12345]|[=a, b, c|=23456]]
//! ```
//!
//! ## Rejected Input
//!
//! - empty input or fewer than five header characters
//! - a header with duplicate, alphanumeric, whitespace or control characters
//! - an escape followed by anything other than a structural character or
//!   `n`, `r`, `t`, or an escape at end of input
//! - raw line feed, carriage return or tab inside a scalar
//! - an unterminated child list
//! - a CLOSE or SEP outside of a child list, or any content after the root
//! - a scalar introduced after the node's children
//! - nesting deeper than the configured `max_depth`
//!
//! # Binary Encoding
//!
//! ```text
//! stream := magic version flags body
//! magic  := "RDA"
//! version:= 0x01
//! flags  := u8        bit 0: body is an LZ4 frame; other bits must be zero
//! body   := node crc32
//! node   := tag [ len bytes ] [ count node{count} ]
//! tag    := u8        bit 0: scalar present, bit 1: children present
//! len    := u32 LE    scalar length in bytes, followed by UTF-8 bytes
//! count  := u32 LE    number of children, at least one
//! crc32  := u32 LE    CRC-32 (IEEE) of the uncompressed node bytes
//! ```
//!
//! The encoded size grows linearly with content: five bytes of preamble, four
//! bytes of checksum, one tag byte per node, four length bytes per scalar and
//! four count bytes per parent.
//!
//! ## Rejected Input
//!
//! - wrong magic, unknown version or unknown flag bits
//! - unknown tag bits, or a children flag with a zero count
//! - any truncation, including inside the checksum
//! - scalar bytes that are not valid UTF-8
//! - a checksum that does not match the node bytes
//! - nesting deeper than the configured `max_depth`
//! - when decoding from a byte slice, bytes after the end of the stream
