//! Streaming binary encoding, with and without LZ4 compression.
//!
//! Run with: cargo run --example binary_stream

use ::rda::{rda, BinaryReader, BinaryWriter, Compression, Rda, RdaOptions};
use std::error::Error;
use std::io::Cursor;

fn main() -> Result<(), Box<dyn Error>> {
    let mut table = Rda::leaf("inventory");
    for row in 0..200 {
        table[row] = rda!([(format!("SKU{}", row)), "widget", (row * 3)]);
    }

    let text = table.to_text()?;
    let plain = table.to_bytes()?;
    let lz4 = RdaOptions::new().with_compression(Compression::Lz4);
    let compressed = table.to_bytes_with_options(&lz4)?;

    println!("Text:        {} bytes", text.len());
    println!("Binary:      {} bytes", plain.len());
    println!("Binary+LZ4:  {} bytes", compressed.len());

    // Several trees written back to back on one stream.
    let mut writer = BinaryWriter::new(Vec::new(), lz4.clone());
    writer.write(&table)?;
    writer.write(&rda!(["trailer", 200]))?;
    let stream = writer.into_inner();

    let mut reader = BinaryReader::new(Cursor::new(stream), lz4);
    let first = reader.read()?;
    let second = reader.read()?;
    assert_eq!(first, table);
    println!("✓ Read {} rows, then {:?}", first.len(), second.child_values());

    assert_eq!(Rda::from_bytes(&compressed)?, table);
    println!("✓ Compressed copy decodes to the same tree");

    Ok(())
}
