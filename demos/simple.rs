//! Basic RDA text encoding and decoding.
//!
//! Run with: cargo run --example simple

use rda::{from_str, to_string, Rda, RdaSerializable, Result};
use std::error::Error;

#[derive(Debug, Default, PartialEq)]
struct User {
    id: u32,
    name: String,
    email: String,
}

impl RdaSerializable for User {
    fn write_slots(&self, rda: &mut Rda, offset: usize) -> usize {
        rda.child_mut(offset).set_display(&self.id);
        rda.set_value_at(offset + 1, self.name.as_str());
        rda.set_value_at(offset + 2, self.email.as_str());
        offset + 3
    }

    fn read_slots(&mut self, rda: &Rda, offset: usize) -> Result<usize> {
        self.id = rda[offset].parse_value()?;
        self.name = rda.value_at(offset + 1)?.to_string();
        self.email = rda.value_at(offset + 2)?.to_string();
        Ok(offset + 3)
    }
}

fn main() -> std::result::Result<(), Box<dyn Error>> {
    let users = vec![
        User {
            id: 42,
            name: "Alice Johnson".to_string(),
            email: "alice@example.com".to_string(),
        },
        User {
            id: 43,
            name: "Bob [the builder] Smith".to_string(),
            email: "bob@example.com".to_string(),
        },
    ];

    // Encode to text
    let text = to_string(&users)?;
    println!("RDA output:\n{}\n", text);

    // Decode back to structs
    let users_back: Vec<User> = from_str(&text)?;
    assert_eq!(users, users_back);
    println!("✓ Round-trip successful");

    // The same document, read as a plain tree: the list sits in slot 0
    let tree = Rda::parse(&text)?;
    println!("Second user's name: {}", tree[0][1][1].value()?);

    Ok(())
}
