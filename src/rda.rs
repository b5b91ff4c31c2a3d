//! The recursive data container.
//!
//! This module provides [`Rda`], a node that is at the same time a scalar
//! holder and an ordered, positionally-indexed list of child nodes. Trees of
//! `Rda` nodes are the unit of serialization for both codecs.
//!
//! ## Slots
//!
//! Children are addressed by position. Writing to a slot past the end grows the
//! child list with empty nodes, so client code can fill slots in any order
//! without sizing the node first:
//!
//! ```rust
//! use rda::Rda;
//!
//! let mut rda = Rda::new();
//! rda[1].set_value("Smith");
//! rda[0].set_value("John");
//!
//! assert_eq!(rda.len(), 2);
//! assert_eq!(rda.value_at(0).unwrap(), "John");
//! ```
//!
//! ## Reading Values
//!
//! [`Rda::value`] is strict: it fails with [`Error::TypeMismatch`] when the
//! node carries no scalar, whether or not it has children. Reading a slot that
//! was never written is not an error; it yields an empty node.
//!
//! ```rust
//! use rda::{Error, Rda};
//!
//! let rda = Rda::new();
//! assert!(matches!(rda.value(), Err(Error::TypeMismatch { .. })));
//! assert_eq!(rda.value_or_empty(), "");
//! assert!(rda[7].is_empty());
//! ```

use crate::binary::{BinaryReader, BinaryWriter};
use crate::de::Parser;
use crate::ser::Encoder;
use crate::{Error, RdaOptions, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::io;
use std::ops::{Index, IndexMut};
use std::str::FromStr;

static EMPTY: Rda = Rda {
    value: None,
    children: Vec::new(),
};

/// A recursive, positionally-indexed data container.
///
/// A node owns an optional scalar string and an ordered list of child nodes.
/// Both may be present at once. Children are exclusively owned, so a tree can
/// never contain shared sub-nodes or cycles; use [`Clone`] to keep an
/// independent copy of a node before moving it into another slot.
///
/// # Examples
///
/// ```rust
/// use rda::Rda;
///
/// let mut address = Rda::new();
/// address[0].set_value("1, 2, 3");
/// address[1].set_value("12345");
///
/// let mut person = Rda::new();
/// person[0].set_value("John");
/// person[1].set_value("Smith");
/// person.set_child(2, address);
///
/// assert_eq!(person[2][1].value().unwrap(), "12345");
/// assert_eq!(person.depth(), 2);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct Rda {
    pub(crate) value: Option<String>,
    pub(crate) children: Vec<Rda>,
}

impl Rda {
    /// Creates an empty node: no scalar, no children.
    #[must_use]
    pub const fn new() -> Self {
        Rda {
            value: None,
            children: Vec::new(),
        }
    }

    /// Creates a leaf node holding `value`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rda::Rda;
    ///
    /// let leaf = Rda::leaf("NY 21540");
    /// assert!(leaf.is_leaf());
    /// assert_eq!(leaf.value().unwrap(), "NY 21540");
    /// ```
    #[must_use]
    pub fn leaf(value: impl Into<String>) -> Self {
        Rda {
            value: Some(value.into()),
            children: Vec::new(),
        }
    }

    /// Returns the scalar value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] if no scalar has been set.
    pub fn value(&self) -> Result<&str> {
        self.value
            .as_deref()
            .ok_or_else(|| Error::type_mismatch("scalar value", &self.describe()))
    }

    /// Returns the scalar value, or `""` if none has been set.
    #[inline]
    #[must_use]
    pub fn value_or_empty(&self) -> &str {
        self.value.as_deref().unwrap_or_default()
    }

    /// Stores a scalar value. Existing children are kept.
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = Some(value.into());
    }

    /// Stores the `Display` rendering of `value` as the scalar.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rda::Rda;
    ///
    /// let mut rda = Rda::new();
    /// rda.set_display(&42u32);
    /// assert_eq!(rda.parse_value::<u32>().unwrap(), 42);
    /// ```
    pub fn set_display<T: fmt::Display + ?Sized>(&mut self, value: &T) {
        self.value = Some(value.to_string());
    }

    /// Parses the scalar value into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] if there is no scalar or it does not
    /// parse as `T`.
    pub fn parse_value<T>(&self) -> Result<T>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        let raw = self.value()?;
        raw.parse::<T>().map_err(|e| {
            Error::type_mismatch(
                std::any::type_name::<T>(),
                &format!("{:?} ({})", raw, e),
            )
        })
    }

    /// Removes and returns the scalar value, leaving children untouched.
    pub fn take_value(&mut self) -> Option<String> {
        self.value.take()
    }

    #[inline]
    #[must_use]
    pub fn has_value(&self) -> bool {
        self.value.is_some()
    }

    /// Returns `true` if the node holds a scalar and no children.
    #[inline]
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.value.is_some() && self.children.is_empty()
    }

    /// Returns `true` if the node holds neither a scalar nor children.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.value.is_none() && self.children.is_empty()
    }

    /// Returns the number of child slots.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.children.len()
    }

    #[inline]
    #[must_use]
    pub fn children(&self) -> &[Rda] {
        &self.children
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Rda> {
        self.children.iter()
    }

    /// Returns the child at `index`, or `None` if the slot does not exist.
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Rda> {
        self.children.get(index)
    }

    /// Returns a mutable reference to the child at `index`, growing the child
    /// list with empty nodes first if needed.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rda::Rda;
    ///
    /// let mut rda = Rda::new();
    /// rda.child_mut(5).set_value("x");
    /// assert_eq!(rda.len(), 6);
    /// assert!(rda[4].is_empty());
    /// ```
    pub fn child_mut(&mut self, index: usize) -> &mut Rda {
        if index >= self.children.len() {
            self.children.resize_with(index + 1, Rda::new);
        }
        &mut self.children[index]
    }

    /// Places `node` at `index`, growing the child list if needed. The node
    /// previously held by the slot is dropped.
    pub fn set_child(&mut self, index: usize, node: Rda) {
        *self.child_mut(index) = node;
    }

    /// Appends `node` after the last slot.
    pub fn push(&mut self, node: Rda) {
        self.children.push(node);
    }

    /// Returns the scalar of the child at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] if the slot is missing or holds no scalar.
    pub fn value_at(&self, index: usize) -> Result<&str> {
        self[index].value()
    }

    /// Sets the scalar of the child at `index`, growing the child list if needed.
    pub fn set_value_at(&mut self, index: usize, value: impl Into<String>) {
        self.child_mut(index).set_value(value);
    }

    /// Returns the scalar of every child, `""` for children without one.
    #[must_use]
    pub fn child_values(&self) -> Vec<&str> {
        self.children.iter().map(Rda::value_or_empty).collect()
    }

    /// Follows `path` through nested slots.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rda::Rda;
    ///
    /// let mut rda = Rda::new();
    /// rda.at_path_mut(&[2, 1]).set_value("12345");
    /// assert_eq!(rda.at_path(&[2, 1]).and_then(|n| n.value().ok()), Some("12345"));
    /// assert!(rda.at_path(&[3]).is_none());
    /// ```
    #[must_use]
    pub fn at_path(&self, path: &[usize]) -> Option<&Rda> {
        path.iter().try_fold(self, |node, &index| node.get(index))
    }

    /// Follows `path` through nested slots, growing every level as needed.
    pub fn at_path_mut(&mut self, path: &[usize]) -> &mut Rda {
        path.iter()
            .fold(self, |node, &index| node.child_mut(index))
    }

    /// Resolves a dotted slot address such as `"2.1"`.
    ///
    /// The empty address names the node itself. Slots that were never written
    /// resolve to an empty node.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Index`] for negative or non-numeric components.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rda::{Error, Rda};
    ///
    /// let mut rda = Rda::new();
    /// rda.at_path_mut(&[2, 1]).set_value("12345");
    ///
    /// assert_eq!(rda.locate("2.1").unwrap().value().unwrap(), "12345");
    /// assert!(matches!(rda.locate("2.-1"), Err(Error::Index { .. })));
    /// ```
    pub fn locate(&self, address: &str) -> Result<&Rda> {
        let address = address.trim();
        if address.is_empty() {
            return Ok(self);
        }

        let mut node = self;
        for component in address.split('.') {
            let component = component.trim();
            let index: i64 = component
                .parse()
                .map_err(|_| Error::index(component, "slot index must be an integer"))?;
            if index < 0 {
                return Err(Error::index(component, "slot index must not be negative"));
            }
            node = match usize::try_from(index) {
                Ok(index) => &node[index],
                Err(_) => &EMPTY,
            };
        }
        Ok(node)
    }

    /// Returns the nesting depth: 0 for a node without children, one more than
    /// the deepest child otherwise.
    #[must_use]
    pub fn depth(&self) -> usize {
        let mut max = 0;
        let mut stack = vec![(self, 0usize)];
        while let Some((node, depth)) = stack.pop() {
            if node.children.is_empty() {
                max = max.max(depth);
            } else {
                stack.extend(node.children.iter().map(|child| (child, depth + 1)));
            }
        }
        max
    }

    /// Removes the scalar and every child.
    pub fn clear(&mut self) {
        self.value = None;
        self.children.clear();
    }

    /// Encodes this tree as text with default options.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DepthLimitExceeded`] if the tree is nested deeper than
    /// the default limit.
    pub fn to_text(&self) -> Result<String> {
        self.to_text_with_options(&RdaOptions::default())
    }

    /// Encodes this tree as text.
    ///
    /// # Errors
    ///
    /// Returns an error if the delimiter set is invalid or the tree exceeds
    /// `options.max_depth`.
    pub fn to_text_with_options(&self, options: &RdaOptions) -> Result<String> {
        let mut encoder = Encoder::new(options);
        encoder.encode(self)?;
        Ok(encoder.into_inner())
    }

    /// Parses a text encoding.
    ///
    /// # Errors
    ///
    /// Returns a parse error (see [`Error::is_parse_error`]) if `input` is not
    /// a well-formed document.
    pub fn parse(input: &str) -> Result<Rda> {
        Self::parse_with_options(input, &RdaOptions::default())
    }

    pub fn parse_with_options(input: &str, options: &RdaOptions) -> Result<Rda> {
        Parser::new(input, options).parse()
    }

    /// Encodes this tree as a binary stream in memory.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        self.to_bytes_with_options(&RdaOptions::default())
    }

    pub fn to_bytes_with_options(&self, options: &RdaOptions) -> Result<Vec<u8>> {
        let mut writer = BinaryWriter::new(Vec::with_capacity(64), options.clone());
        writer.write(self)?;
        Ok(writer.into_inner())
    }

    /// Decodes a binary stream held in memory. Trailing bytes are rejected.
    pub fn from_bytes(bytes: &[u8]) -> Result<Rda> {
        Self::from_bytes_with_options(bytes, &RdaOptions::default())
    }

    pub fn from_bytes_with_options(bytes: &[u8], options: &RdaOptions) -> Result<Rda> {
        let mut reader = BinaryReader::new(bytes, options.clone());
        let rda = reader.read()?;
        let rest = reader.into_inner();
        if !rest.is_empty() {
            return Err(Error::invalid_frame(
                (bytes.len() - rest.len()) as u64,
                &format!("{} trailing bytes after stream", rest.len()),
            ));
        }
        Ok(rda)
    }

    /// Writes this tree to `writer` as a binary stream.
    pub fn write_stream<W: io::Write>(&self, writer: W) -> Result<()> {
        self.write_stream_with_options(writer, &RdaOptions::default())
    }

    pub fn write_stream_with_options<W: io::Write>(
        &self,
        writer: W,
        options: &RdaOptions,
    ) -> Result<()> {
        BinaryWriter::new(writer, options.clone()).write(self)
    }

    /// Reads one binary stream from `reader`.
    ///
    /// Bytes following the stream are left unread, so several streams can be
    /// stored back to back.
    pub fn read_stream<R: io::Read>(reader: R) -> Result<Rda> {
        Self::read_stream_with_options(reader, &RdaOptions::default())
    }

    pub fn read_stream_with_options<R: io::Read>(reader: R, options: &RdaOptions) -> Result<Rda> {
        BinaryReader::new(reader, options.clone()).read()
    }

    fn describe(&self) -> String {
        match (self.value.is_some(), self.children.len()) {
            (false, 0) => "empty node".to_string(),
            (true, 0) => "leaf node".to_string(),
            (_, 1) => "node with 1 child".to_string(),
            (_, n) => format!("node with {} children", n),
        }
    }
}

impl Index<usize> for Rda {
    type Output = Rda;

    /// Out-of-range slots read as an empty node.
    fn index(&self, index: usize) -> &Rda {
        self.children.get(index).unwrap_or(&EMPTY)
    }
}

impl IndexMut<usize> for Rda {
    fn index_mut(&mut self, index: usize) -> &mut Rda {
        self.child_mut(index)
    }
}

/// Writes the canonical text encoding with default delimiters.
///
/// Unlike [`Rda::to_text`] no depth limit is applied.
impl fmt::Display for Rda {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let options = RdaOptions::default().with_max_depth(usize::MAX);
        let mut encoder = Encoder::new(&options);
        encoder.encode(self).map_err(|_| fmt::Error)?;
        f.write_str(&encoder.into_inner())
    }
}

impl FromStr for Rda {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Rda::parse(s)
    }
}

impl From<&str> for Rda {
    fn from(value: &str) -> Self {
        Rda::leaf(value)
    }
}

impl From<String> for Rda {
    fn from(value: String) -> Self {
        Rda::leaf(value)
    }
}

impl From<Vec<Rda>> for Rda {
    fn from(children: Vec<Rda>) -> Self {
        Rda {
            value: None,
            children,
        }
    }
}

impl FromIterator<Rda> for Rda {
    fn from_iter<T: IntoIterator<Item = Rda>>(iter: T) -> Self {
        Rda::from(iter.into_iter().collect::<Vec<_>>())
    }
}

impl IntoIterator for Rda {
    type Item = Rda;
    type IntoIter = std::vec::IntoIter<Rda>;

    fn into_iter(self) -> Self::IntoIter {
        self.children.into_iter()
    }
}

impl<'a> IntoIterator for &'a Rda {
    type Item = &'a Rda;
    type IntoIter = std::slice::Iter<'a, Rda>;

    fn into_iter(self) -> Self::IntoIter {
        self.children.iter()
    }
}

// Leaf <-> string, parent <-> sequence, both <-> {value, children}, empty <-> unit.
impl Serialize for Rda {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match (&self.value, self.children.is_empty()) {
            (None, true) => serializer.serialize_unit(),
            (Some(value), true) => serializer.serialize_str(value),
            (None, false) => {
                use serde::ser::SerializeSeq;
                let mut seq = serializer.serialize_seq(Some(self.children.len()))?;
                for child in &self.children {
                    seq.serialize_element(child)?;
                }
                seq.end()
            }
            (Some(value), false) => {
                use serde::ser::SerializeMap;
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("value", value)?;
                map.serialize_entry("children", &self.children)?;
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Rda {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct RdaVisitor;

        impl<'de> Visitor<'de> for RdaVisitor {
            type Value = Rda;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a string, a sequence of nodes, a {value, children} map or unit")
            }

            fn visit_bool<E>(self, value: bool) -> std::result::Result<Rda, E> {
                Ok(Rda::leaf(value.to_string()))
            }

            fn visit_i64<E>(self, value: i64) -> std::result::Result<Rda, E> {
                Ok(Rda::leaf(value.to_string()))
            }

            fn visit_u64<E>(self, value: u64) -> std::result::Result<Rda, E> {
                Ok(Rda::leaf(value.to_string()))
            }

            fn visit_f64<E>(self, value: f64) -> std::result::Result<Rda, E> {
                Ok(Rda::leaf(value.to_string()))
            }

            fn visit_str<E>(self, value: &str) -> std::result::Result<Rda, E> {
                Ok(Rda::leaf(value))
            }

            fn visit_string<E>(self, value: String) -> std::result::Result<Rda, E> {
                Ok(Rda::leaf(value))
            }

            fn visit_unit<E>(self) -> std::result::Result<Rda, E> {
                Ok(Rda::new())
            }

            fn visit_none<E>(self) -> std::result::Result<Rda, E> {
                Ok(Rda::new())
            }

            fn visit_some<D>(self, deserializer: D) -> std::result::Result<Rda, D::Error>
            where
                D: Deserializer<'de>,
            {
                Deserialize::deserialize(deserializer)
            }

            fn visit_seq<A>(self, mut seq: A) -> std::result::Result<Rda, A::Error>
            where
                A: de::SeqAccess<'de>,
            {
                let mut children = Vec::new();
                while let Some(child) = seq.next_element()? {
                    children.push(child);
                }
                Ok(Rda::from(children))
            }

            fn visit_map<A>(self, mut map: A) -> std::result::Result<Rda, A::Error>
            where
                A: de::MapAccess<'de>,
            {
                let mut rda = Rda::new();
                while let Some(key) = map.next_key::<String>()? {
                    match key.as_str() {
                        "value" => rda.value = Some(map.next_value()?),
                        "children" => rda.children = map.next_value()?,
                        other => {
                            return Err(de::Error::unknown_field(other, &["value", "children"]))
                        }
                    }
                }
                Ok(rda)
            }
        }

        deserializer.deserialize_any(RdaVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_empty() {
        let rda = Rda::new();
        assert!(rda.is_empty());
        assert!(!rda.is_leaf());
        assert_eq!(rda.len(), 0);
        assert_eq!(rda, Rda::default());
    }

    #[test]
    fn test_auto_growth() {
        let mut rda = Rda::new();
        rda.set_child(5, Rda::leaf("five"));

        assert_eq!(rda.len(), 6);
        for i in 0..5 {
            assert!(rda[i].is_empty());
        }
        assert_eq!(rda[5].value().unwrap(), "five");
    }

    #[test]
    fn test_growth_keeps_existing_slots() {
        let mut rda = Rda::new();
        rda[0].set_value("a");
        rda[1].set_value("b");
        rda[4].set_value("e");

        assert_eq!(rda.child_values(), vec!["a", "b", "", "", "e"]);
    }

    #[test]
    fn test_set_child_replaces() {
        let mut rda = Rda::new();
        rda.set_child(0, Rda::leaf("old"));
        rda.set_child(0, Rda::leaf("new"));
        assert_eq!(rda.len(), 1);
        assert_eq!(rda.value_at(0).unwrap(), "new");
    }

    #[test]
    fn test_value_and_children_coexist() {
        let mut rda = Rda::leaf("header");
        rda[0].set_value("child");
        assert_eq!(rda.value().unwrap(), "header");
        assert_eq!(rda.len(), 1);

        rda.set_value("renamed");
        assert_eq!(rda.len(), 1);
    }

    #[test]
    fn test_strict_value_read() {
        let mut rda = Rda::new();
        rda[0].set_value("x");

        match rda.value() {
            Err(Error::TypeMismatch { found, .. }) => assert_eq!(found, "node with 1 child"),
            other => panic!("Expected TypeMismatch, got {:?}", other),
        }
        assert_eq!(rda.value_or_empty(), "");
        assert!(rda.value_at(3).is_err());
    }

    #[test]
    fn test_index_out_of_range_does_not_grow() {
        let rda = Rda::new();
        assert!(rda[10].is_empty());
        assert_eq!(rda.len(), 0);
        assert!(rda.get(10).is_none());
    }

    #[test]
    fn test_clone_independence() {
        let mut original = Rda::new();
        original[0].set_value("John");
        original[1][0].set_value("nested");

        let mut copy = original.clone();
        copy.set_value_at(0, "x");
        copy[1][0].set_value("changed");

        assert_eq!(original.value_at(0).unwrap(), "John");
        assert_eq!(original[1].value_at(0).unwrap(), "nested");
        assert_eq!(copy.value_at(0).unwrap(), "x");
    }

    #[test]
    fn test_parse_value() {
        let mut rda = Rda::new();
        rda.set_display(&3.5f64);
        assert_eq!(rda.parse_value::<f64>().unwrap(), 3.5);

        rda.set_value("abc");
        assert!(matches!(
            rda.parse_value::<i32>(),
            Err(Error::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_take_value_and_clear() {
        let mut rda = Rda::leaf("v");
        rda[2].set_value("c");
        assert_eq!(rda.take_value(), Some("v".to_string()));
        assert_eq!(rda.len(), 3);

        rda.clear();
        assert!(rda.is_empty());
    }

    #[test]
    fn test_locate() {
        let mut rda = Rda::new();
        rda.at_path_mut(&[1, 0, 2]).set_value("deep");

        assert_eq!(rda.locate("1.0.2").unwrap().value().unwrap(), "deep");
        assert!(std::ptr::eq(rda.locate("").unwrap(), &rda));
        assert!(rda.locate("9.9").unwrap().is_empty());
        assert!(matches!(rda.locate("-1"), Err(Error::Index { .. })));
        assert!(matches!(rda.locate("1.x"), Err(Error::Index { .. })));
    }

    #[test]
    fn test_depth() {
        assert_eq!(Rda::leaf("x").depth(), 0);

        let mut rda = Rda::new();
        rda[0].set_value("a");
        assert_eq!(rda.depth(), 1);

        rda.at_path_mut(&[3, 1, 0]).set_value("b");
        assert_eq!(rda.depth(), 3);
    }

    #[test]
    fn test_from_conversions() {
        assert_eq!(Rda::from("x"), Rda::leaf("x"));
        assert_eq!(Rda::from("x".to_string()), Rda::leaf("x"));

        let rda: Rda = vec!["a", "b"].into_iter().map(Rda::from).collect();
        assert_eq!(rda.child_values(), vec!["a", "b"]);

        let values: Vec<String> = rda
            .into_iter()
            .map(|child| child.value_or_empty().to_string())
            .collect();
        assert_eq!(values, vec!["a", "b"]);
    }

    #[test]
    fn test_display_and_from_str() {
        let mut rda = Rda::new();
        rda[0].set_value("John");
        rda[1].set_value("Smith");

        let text = rda.to_string();
        assert_eq!(text, "[]|=\\[=John|=Smith]");
        assert_eq!(text.parse::<Rda>().unwrap(), rda);
    }
}
