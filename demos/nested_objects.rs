//! Object composition and file persistence.
//!
//! A `Customer` reuses the slots of its embedded `Person` and stores each
//! address as a nested node.
//!
//! Run with: cargo run --example nested_objects

use rda::{load, save, Rda, RdaSerializable, Result};
use std::error::Error;

#[derive(Debug, Default, Clone, PartialEq)]
struct Person {
    first_name: String,
    last_name: String,
}

impl RdaSerializable for Person {
    fn write_slots(&self, rda: &mut Rda, offset: usize) -> usize {
        rda.set_value_at(offset, self.first_name.as_str());
        rda.set_value_at(offset + 1, self.last_name.as_str());
        offset + 2
    }

    fn read_slots(&mut self, rda: &Rda, offset: usize) -> Result<usize> {
        self.first_name = rda.value_at(offset)?.to_string();
        self.last_name = rda.value_at(offset + 1)?.to_string();
        Ok(offset + 2)
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
struct Address {
    lines: String,
    zip: String,
}

impl RdaSerializable for Address {
    fn write_slots(&self, rda: &mut Rda, offset: usize) -> usize {
        rda.set_value_at(offset, self.lines.as_str());
        rda.set_value_at(offset + 1, self.zip.as_str());
        offset + 2
    }

    fn read_slots(&mut self, rda: &Rda, offset: usize) -> Result<usize> {
        self.lines = rda.value_at(offset)?.to_string();
        self.zip = rda.value_at(offset + 1)?.to_string();
        Ok(offset + 2)
    }
}

#[derive(Debug, Default, PartialEq)]
struct Customer {
    person: Person,
    residential: Address,
    postal: Option<Address>,
}

impl RdaSerializable for Customer {
    fn write_slots(&self, rda: &mut Rda, offset: usize) -> usize {
        let next = self.person.write_slots(rda, offset);
        rda.set_child(next, self.residential.to_rda());
        self.postal.write_slots(rda, next + 1)
    }

    fn read_slots(&mut self, rda: &Rda, offset: usize) -> Result<usize> {
        let next = self.person.read_slots(rda, offset)?;
        self.residential = Address::default().from_rda(&rda[next])?;
        self.postal.read_slots(rda, next + 1)
    }
}

fn main() -> std::result::Result<(), Box<dyn Error>> {
    let customer = Customer {
        person: Person {
            first_name: "John".to_string(),
            last_name: "Smith".to_string(),
        },
        residential: Address {
            lines: "Line 1\nLine 2\nLine 3".to_string(),
            zip: "NY 21540".to_string(),
        },
        postal: None,
    };

    let rda = customer.to_rda();
    println!("Tree depth: {}", rda.depth());
    println!("Encoded:    {}\n", rda);

    let path = std::env::temp_dir().join("rda-nested-objects-demo.rda");
    save(&customer, &path)?;
    println!("Saved to {}", path.display());

    let loaded: Customer = load(&path)?;
    assert_eq!(loaded, customer);
    println!("✓ Loaded customer matches");

    // Nodes can be edited directly and restored again.
    let mut edited = rda.clone();
    Some(customer.residential.clone()).write_slots(&mut edited, 3);
    edited[3][0].set_value_at(1, "PO 99");
    let with_postal = Customer::default().from_rda(&edited)?;
    println!("Postal zip: {:?}", with_postal.postal.map(|a| a.zip));

    std::fs::remove_file(&path)?;
    Ok(())
}
