//! # rda
//!
//! A recursive, positionally-indexed data container with a lossless text
//! encoding and a compact binary encoding.
//!
//! ## What is an RDA?
//!
//! An [`Rda`] is a node that holds an optional scalar string and an ordered
//! list of child nodes addressed by position. Objects serialize themselves by
//! writing their fields into numbered slots and placing the nodes of nested
//! objects into further slots. No schema, reflection or code generation is
//! involved: the shape of the tree is the only type information there is.
//!
//! ## Key Features
//!
//! - **Positional slots**: writing to any slot grows the node as needed
//! - **Text encoding**: single-line, self-describing, escape-safe for any
//!   scalar content and any nesting depth
//! - **Binary encoding**: length-prefixed frames, CRC-32 checked, optional LZ4
//!   compression, streamed over `io::Read` / `io::Write`
//! - **Strict decoding**: malformed input is always rejected, never repaired
//! - **No Unsafe Code**
//!
//! ## Quick Start
//!
//! ```rust
//! use rda::{from_str, to_string, Rda, RdaSerializable, Result};
//!
//! #[derive(Default, Debug, PartialEq)]
//! struct Person {
//!     first_name: String,
//!     last_name: String,
//! }
//!
//! impl RdaSerializable for Person {
//!     fn write_slots(&self, rda: &mut Rda, offset: usize) -> usize {
//!         rda.set_value_at(offset, self.first_name.as_str());
//!         rda.set_value_at(offset + 1, self.last_name.as_str());
//!         offset + 2
//!     }
//!
//!     fn read_slots(&mut self, rda: &Rda, offset: usize) -> Result<usize> {
//!         self.first_name = rda.value_at(offset)?.to_string();
//!         self.last_name = rda.value_at(offset + 1)?.to_string();
//!         Ok(offset + 2)
//!     }
//! }
//!
//! let person = Person { first_name: "John".into(), last_name: "Smith".into() };
//!
//! let text = to_string(&person).unwrap();
//! assert_eq!(text, "[]|=\\[=John|=Smith]");
//!
//! let back: Person = from_str(&text).unwrap();
//! assert_eq!(back, person);
//! ```
//!
//! ### Working with Nodes Directly
//!
//! ```rust
//! use rda::Rda;
//!
//! let mut rda = Rda::new();
//! rda[0].set_value("John");
//! rda[2][1].set_value("12345");
//!
//! let bytes = rda.to_bytes().unwrap();
//! let back = Rda::from_bytes(&bytes).unwrap();
//! assert_eq!(back[2][1].value().unwrap(), "12345");
//! ```
//!
//! ## Wire Formats
//!
//! Both encodings are described in [`format`].
//!
//! ## Examples
//!
//! See the `demos/` directory:
//!
//! - **`simple.rs`** - one object through the text encoding
//! - **`nested_objects.rs`** - composition and nested objects saved to a file
//! - **`binary_stream.rs`** - streaming and compressed binary output
//!
//! Run any example with: `cargo run --example <name>`

pub mod binary;
pub mod de;
pub mod error;
pub mod format;
pub mod macros;
pub mod options;
pub mod persist;
pub mod rda;
pub mod ser;
pub mod serializable;

pub use binary::{BinaryReader, BinaryWriter};
pub use de::Parser;
pub use error::{Error, Result};
pub use options::{Compression, Delimiters, RdaOptions};
pub use persist::{load, load_binary, save, save_binary};
pub use rda::Rda;
pub use ser::Encoder;
pub use serializable::RdaSerializable;

use std::io;

/// Exports `obj` and encodes it as text.
///
/// # Errors
///
/// Returns [`Error::DepthLimitExceeded`] if the exported tree is nested deeper
/// than the default limit.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string<T>(obj: &T) -> Result<String>
where
    T: RdaSerializable,
{
    to_string_with_options(obj, &RdaOptions::default())
}

/// Exports `obj` and encodes it as text with custom options.
///
/// # Examples
///
/// ```rust
/// use rda::{to_string_with_options, Delimiters, Rda, RdaOptions, RdaSerializable, Result};
///
/// #[derive(Default)]
/// struct Label(String);
///
/// impl RdaSerializable for Label {
///     fn write_slots(&self, rda: &mut Rda, offset: usize) -> usize {
///         rda.set_value_at(offset, self.0.as_str());
///         offset + 1
///     }
///
///     fn read_slots(&mut self, rda: &Rda, offset: usize) -> Result<usize> {
///         self.0 = rda.value_at(offset)?.to_string();
///         Ok(offset + 1)
///     }
/// }
///
/// let options = RdaOptions::new().with_delimiters(Delimiters::new('(', ')', ',', ':', '~'));
/// let text = to_string_with_options(&Label("a,b".into()), &options).unwrap();
/// assert_eq!(text, "(),:~(:a~,b)");
/// ```
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_with_options<T>(obj: &T, options: &RdaOptions) -> Result<String>
where
    T: RdaSerializable,
{
    obj.to_rda().to_text_with_options(options)
}

/// Parses text and restores a `T` from it.
///
/// # Errors
///
/// Returns a parse error for malformed input, or the first error raised by
/// `T`'s restore.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str<T>(s: &str) -> Result<T>
where
    T: RdaSerializable + Default,
{
    from_str_with_options(s, &RdaOptions::default())
}

#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str_with_options<T>(s: &str, options: &RdaOptions) -> Result<T>
where
    T: RdaSerializable + Default,
{
    let rda = Rda::parse_with_options(s, options)?;
    T::default().from_rda(&rda)
}

/// Exports `obj` and encodes it as a binary stream.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_vec<T>(obj: &T) -> Result<Vec<u8>>
where
    T: RdaSerializable,
{
    to_vec_with_options(obj, &RdaOptions::default())
}

#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_vec_with_options<T>(obj: &T, options: &RdaOptions) -> Result<Vec<u8>>
where
    T: RdaSerializable,
{
    obj.to_rda().to_bytes_with_options(options)
}

/// Decodes a binary stream held in memory and restores a `T` from it.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice<T>(bytes: &[u8]) -> Result<T>
where
    T: RdaSerializable + Default,
{
    from_slice_with_options(bytes, &RdaOptions::default())
}

#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice_with_options<T>(bytes: &[u8], options: &RdaOptions) -> Result<T>
where
    T: RdaSerializable + Default,
{
    let rda = Rda::from_bytes_with_options(bytes, options)?;
    T::default().from_rda(&rda)
}

/// Exports `obj` and writes it to `writer` as a binary stream.
///
/// # Errors
///
/// Returns an error if encoding fails or writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W, T>(writer: W, obj: &T) -> Result<()>
where
    W: io::Write,
    T: RdaSerializable,
{
    to_writer_with_options(writer, obj, &RdaOptions::default())
}

#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer_with_options<W, T>(writer: W, obj: &T, options: &RdaOptions) -> Result<()>
where
    W: io::Write,
    T: RdaSerializable,
{
    obj.to_rda().write_stream_with_options(writer, options)
}

/// Reads one binary stream from `reader` and restores a `T` from it.
///
/// # Errors
///
/// Returns an error if reading fails, the stream is malformed, or `T`'s
/// restore fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R, T>(reader: R) -> Result<T>
where
    R: io::Read,
    T: RdaSerializable + Default,
{
    from_reader_with_options(reader, &RdaOptions::default())
}

#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader_with_options<R, T>(reader: R, options: &RdaOptions) -> Result<T>
where
    R: io::Read,
    T: RdaSerializable + Default,
{
    let rda = Rda::read_stream_with_options(reader, options)?;
    T::default().from_rda(&rda)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, PartialEq)]
    struct Point {
        x: i32,
        y: i32,
    }

    impl RdaSerializable for Point {
        fn write_slots(&self, rda: &mut Rda, offset: usize) -> usize {
            rda.child_mut(offset).set_display(&self.x);
            rda.child_mut(offset + 1).set_display(&self.y);
            offset + 2
        }

        fn read_slots(&mut self, rda: &Rda, offset: usize) -> Result<usize> {
            self.x = rda[offset].parse_value()?;
            self.y = rda[offset + 1].parse_value()?;
            Ok(offset + 2)
        }
    }

    #[test]
    fn test_text_roundtrip_point() {
        let point = Point { x: 1, y: -2 };
        let text = to_string(&point).unwrap();
        assert_eq!(text, "[]|=\\[=1|=-2]");

        let back: Point = from_str(&text).unwrap();
        assert_eq!(back, point);
    }

    #[test]
    fn test_binary_roundtrip_point() {
        let point = Point { x: 7, y: 8 };
        let bytes = to_vec(&point).unwrap();
        let back: Point = from_slice(&bytes).unwrap();
        assert_eq!(back, point);
    }

    #[test]
    fn test_writer_reader_roundtrip() {
        let points = vec![Point { x: 1, y: 2 }, Point { x: 3, y: 4 }];
        let mut buffer = Vec::new();
        to_writer(&mut buffer, &points).unwrap();

        let back: Vec<Point> = from_reader(buffer.as_slice()).unwrap();
        assert_eq!(back, points);
    }

    #[test]
    fn test_custom_options() {
        let options = RdaOptions::new()
            .with_delimiters(Delimiters::new('(', ')', ',', ':', '~'))
            .with_compression(Compression::Lz4);
        let point = Point { x: 10, y: 20 };

        let text = to_string_with_options(&point, &options).unwrap();
        assert_eq!(text, "(),:~(:10,:20)");
        // Parsing reads the header, so default options work too.
        assert_eq!(from_str::<Point>(&text).unwrap(), point);

        let bytes = to_vec_with_options(&point, &options).unwrap();
        assert_eq!(from_slice_with_options::<Point>(&bytes, &options).unwrap(), point);
    }

    #[test]
    fn test_restore_type_mismatch() {
        let result: Result<Point> = from_str("[]|=\\[=1|=two]");
        assert!(matches!(result, Err(Error::TypeMismatch { .. })));
    }
}
