//! Builds a small player-data-shaped document from scratch and writes it out
//! in all three forms this crate understands.
//!
//! ```sh
//! cargo run --example build-player-data
//! ```

use cursornbt::writer::{PrettyPrint, Writer};

fn main() -> cursornbt::error::Result<()> {
    let mut w = Writer::new();
    w.begin("")?;
    w.write_string("Name", "Steve")?;
    w.write_double("Health", 20.0)?;
    w.write_int_array("Pos", &[0, 64, 0])?;

    w.begin_list("Inventory")?;
    for (slot, item) in ["minecraft:diamond_pickaxe", "minecraft:torch"]
        .iter()
        .enumerate()
    {
        w.begin_compound("")?;
        w.write_string("id", item)?;
        w.write_byte("Slot", slot as i8)?;
        w.end_compound()?;
    }
    w.end_list()?;

    println!("{}", w.export_text_string(PrettyPrint::Enabled)?);

    let compact = w.export_text_string(PrettyPrint::Disabled)?;
    println!("\n{} bytes of compact SNBT", compact.len());

    let binary = w.export_binary_buffer()?;
    println!("{} bytes of uncompressed binary NBT", binary.len());

    Ok(())
}
