//! Mapping client objects to and from [`Rda`] trees.
//!
//! A type opts in by implementing [`RdaSerializable`]: it writes its fields
//! into consecutive slots starting at an offset, and reads them back from the
//! same slots. The offset makes composition explicit. A type that extends
//! another embeds it and lets it fill the first slots, then continues at the
//! offset the embedded type returns:
//!
//! ```rust
//! use rda::{Rda, RdaSerializable, Result};
//!
//! #[derive(Default)]
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
//! #[derive(Default)]
//! struct Employee {
//!     person: Person,
//!     title: String,
//! }
//!
//! impl RdaSerializable for Employee {
//!     fn write_slots(&self, rda: &mut Rda, offset: usize) -> usize {
//!         let next = self.person.write_slots(rda, offset);
//!         rda.set_value_at(next, self.title.as_str());
//!         next + 1
//!     }
//!
//!     fn read_slots(&mut self, rda: &Rda, offset: usize) -> Result<usize> {
//!         let next = self.person.read_slots(rda, offset)?;
//!         self.title = rda.value_at(next)?.to_string();
//!         Ok(next + 1)
//!     }
//! }
//!
//! let employee = Employee {
//!     person: Person { first_name: "John".into(), last_name: "Smith".into() },
//!     title: "Engineer".into(),
//! };
//!
//! let rda = employee.to_rda();
//! assert_eq!(rda.value_at(2).unwrap(), "Engineer");
//!
//! let back = Employee::default().from_rda(&rda).unwrap();
//! assert_eq!(back.person.last_name, "Smith");
//! ```

use crate::{Error, Rda, Result};

/// The two-way contract between a client type and the container.
pub trait RdaSerializable: Sized {
    /// Writes this object's fields into `rda` starting at slot `offset`.
    ///
    /// Returns the first slot after the ones written.
    fn write_slots(&self, rda: &mut Rda, offset: usize) -> usize;

    /// Restores this object's fields from `rda` starting at slot `offset`.
    ///
    /// Returns the first slot after the ones read.
    ///
    /// # Errors
    ///
    /// Implementations propagate any failure reading a slot; the object may be
    /// partially updated when this returns an error. Use [`from_rda`] to avoid
    /// observing such a state.
    ///
    /// [`from_rda`]: RdaSerializable::from_rda
    fn read_slots(&mut self, rda: &Rda, offset: usize) -> Result<usize>;

    /// Exports this object into a fresh root node.
    fn to_rda(&self) -> Rda {
        let mut rda = Rda::new();
        self.write_slots(&mut rda, 0);
        rda
    }

    /// Restores this object from a root node and returns it.
    ///
    /// The object is consumed, so on error it is dropped rather than left
    /// half-populated.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by [`read_slots`](RdaSerializable::read_slots).
    fn from_rda(mut self, rda: &Rda) -> Result<Self> {
        self.read_slots(rda, 0)?;
        Ok(self)
    }
}

/// Occupies one slot holding a node with one child per element.
impl<T> RdaSerializable for Vec<T>
where
    T: RdaSerializable + Default,
{
    fn write_slots(&self, rda: &mut Rda, offset: usize) -> usize {
        let list: Rda = self.iter().map(RdaSerializable::to_rda).collect();
        rda.set_child(offset, list);
        offset + 1
    }

    fn read_slots(&mut self, rda: &Rda, offset: usize) -> Result<usize> {
        *self = rda[offset]
            .iter()
            .map(|child| T::default().from_rda(child))
            .collect::<Result<Vec<_>>>()?;
        Ok(offset + 1)
    }
}

/// Occupies one slot: an empty node for `None`, a node whose only child is the
/// exported value for `Some`.
impl<T> RdaSerializable for Option<T>
where
    T: RdaSerializable + Default,
{
    fn write_slots(&self, rda: &mut Rda, offset: usize) -> usize {
        let slot = match self {
            Some(item) => Rda::from(vec![item.to_rda()]),
            None => Rda::new(),
        };
        rda.set_child(offset, slot);
        offset + 1
    }

    fn read_slots(&mut self, rda: &Rda, offset: usize) -> Result<usize> {
        let slot = &rda[offset];
        *self = match slot.len() {
            0 => None,
            1 => Some(T::default().from_rda(&slot[0])?),
            n => {
                return Err(Error::type_mismatch(
                    "optional slot with at most 1 child",
                    &format!("{} children", n),
                ))
            }
        };
        Ok(offset + 1)
    }
}
