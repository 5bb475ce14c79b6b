//! Dumps an NBT file (gzip binary, plain binary, or SNBT text, whichever it
//! turns out to be) as pretty-printed SNBT.
//!
//! ```sh
//! cargo run --example nbt-dump -- level.dat
//! ```

use std::env;
use std::process;

use cursornbt::error::Error;
use cursornbt::reader::Reader;
use cursornbt::tag::Tag;
use cursornbt::writer::{PrettyPrint, Writer};

fn main() {
    let path = match env::args().nth(1) {
        Some(p) => p,
        None => {
            eprintln!("usage: nbt-dump <path>");
            process::exit(1);
        }
    };

    if let Err(e) = dump(&path) {
        eprintln!("nbt-dump: {}", e);
        process::exit(1);
    }
}

fn dump(path: &str) -> cursornbt::error::Result<()> {
    let mut reader = Reader::import(path)?;
    let mut writer = Writer::new();
    writer.begin("")?;
    copy_compound(&mut reader, &mut writer)?;
    print!("{}", writer.export_text_string(PrettyPrint::Enabled)?);
    Ok(())
}

/// Walks the reader's current compound, re-emitting every child into the
/// writer's currently open compound. Each child's kind is looked up once
/// via `tag_kind` and dispatched on directly, rather than guessed at by
/// trying every `read_*` in turn — `TypeMismatch` is a real error here,
/// not a signal to try the next kind.
fn copy_compound(r: &mut Reader, w: &mut Writer) -> cursornbt::error::Result<()> {
    let names: Vec<String> = r.names().map(str::to_owned).collect();
    for name in names {
        let kind = r
            .tag_kind(&name)
            .ok_or_else(|| Error::StructureViolation(format!("child {:?} vanished mid-dump", name)))?;
        copy_value(r, w, kind, &name)?;
    }
    Ok(())
}

fn copy_list(r: &mut Reader, w: &mut Writer) -> cursornbt::error::Result<()> {
    let len = r.list_size()?;
    let kind = r.list_element_kind().unwrap_or(Tag::End);
    for _ in 0..len {
        copy_value(r, w, kind, "")?;
    }
    Ok(())
}

fn copy_value(r: &mut Reader, w: &mut Writer, kind: Tag, name: &str) -> cursornbt::error::Result<()> {
    match kind {
        Tag::Compound => {
            let opened = r.open_compound(name);
            debug_assert!(opened);
            w.begin_compound(name)?;
            copy_compound(r, w)?;
            w.end_compound()?;
            r.close_compound()?;
        }
        Tag::List => {
            let opened = r.open_list(name);
            debug_assert!(opened);
            w.begin_list(name)?;
            copy_list(r, w)?;
            w.end_list()?;
            r.close_list()?;
        }
        Tag::Byte => w.write_byte(name, r.read_byte(name)?)?,
        Tag::Short => w.write_short(name, r.read_short(name)?)?,
        Tag::Int => w.write_int(name, r.read_int(name)?)?,
        Tag::Long => w.write_long(name, r.read_long(name)?)?,
        Tag::Float => w.write_float(name, r.read_float(name)?)?,
        Tag::Double => w.write_double(name, r.read_double(name)?)?,
        Tag::String => w.write_string(name, &r.read_string(name)?)?,
        Tag::ByteArray => w.write_byte_array(name, &r.read_byte_array(name)?)?,
        Tag::IntArray => w.write_int_array(name, &r.read_int_array(name)?)?,
        Tag::LongArray => w.write_long_array(name, &r.read_long_array(name)?)?,
        Tag::End => {}
    }
    Ok(())
}
