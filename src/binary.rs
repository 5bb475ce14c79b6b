//! The binary wire format (C7): big-endian named tags, exactly as they
//! appear inside an uncompressed `.nbt` file.
//!
//! Decoding drives a [`Builder`] through the same validated entry points a
//! hand-written caller would use, so a successfully parsed document upholds
//! every invariant in [`crate::store`] regardless of where its bytes came
//! from. Encoding is the mirror: a plain recursive walk of the finished
//! store, writing kind + name + payload for compound children and bare
//! payloads for list elements.

use std::io::Write;

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

use crate::builder::Builder;
use crate::error::{Error, Result};
use crate::store::{DataStore, ListBody, NamedTagIndex, Payload};
use crate::tag::Tag;

fn io_err(e: std::io::Error) -> Error {
    if e.kind() == std::io::ErrorKind::UnexpectedEof {
        Error::UnexpectedEnd
    } else {
        Error::Io(e)
    }
}

fn read_u8(data: &mut &[u8]) -> Result<u8> {
    data.read_u8().map_err(io_err)
}
fn read_i8(data: &mut &[u8]) -> Result<i8> {
    data.read_i8().map_err(io_err)
}
fn read_u16(data: &mut &[u8]) -> Result<u16> {
    data.read_u16::<BigEndian>().map_err(io_err)
}
fn read_i16(data: &mut &[u8]) -> Result<i16> {
    data.read_i16::<BigEndian>().map_err(io_err)
}
fn read_i32(data: &mut &[u8]) -> Result<i32> {
    data.read_i32::<BigEndian>().map_err(io_err)
}
fn read_i64(data: &mut &[u8]) -> Result<i64> {
    data.read_i64::<BigEndian>().map_err(io_err)
}
fn read_f32(data: &mut &[u8]) -> Result<f32> {
    data.read_f32::<BigEndian>().map_err(io_err)
}
fn read_f64(data: &mut &[u8]) -> Result<f64> {
    data.read_f64::<BigEndian>().map_err(io_err)
}

fn read_tag(data: &mut &[u8]) -> Result<Tag> {
    let b = read_u8(data)?;
    Tag::from_u8(b).ok_or_else(|| Error::structure(format!("invalid tag byte {}", b)))
}

fn read_modified_utf8(data: &mut &[u8]) -> Result<String> {
    let len = read_u16(data)? as usize;
    if len > data.len() {
        return Err(Error::UnexpectedEnd);
    }
    let (bytes, rest) = data.split_at(len);
    *data = rest;
    cesu8::from_java_cesu8(bytes)
        .map(|cow| cow.into_owned())
        .map_err(|_| Error::malformed("a tag name or string is not valid modified UTF-8"))
}

fn read_array_len(data: &mut &[u8]) -> Result<usize> {
    let count = read_i32(data)?;
    usize::try_from(count).map_err(|_| Error::structure("array length must not be negative"))
}

/// Parses a complete binary NBT document and returns its store and root
/// index. The root tag must be a `Compound`.
pub(crate) fn decode(mut data: &[u8]) -> Result<(DataStore, NamedTagIndex)> {
    let tag = read_tag(&mut data)?;
    if tag != Tag::Compound {
        return Err(Error::structure(
            "a binary NBT document's root tag must be a compound",
        ));
    }
    let name = read_modified_utf8(&mut data)?;
    let mut builder = Builder::new();
    builder.begin(name)?;
    decode_compound_body(&mut data, &mut builder)?;
    builder.finalize()?;
    builder.into_parts()
}

fn decode_compound_body(data: &mut &[u8], b: &mut Builder) -> Result<()> {
    loop {
        let tag = read_tag(data)?;
        if tag == Tag::End {
            b.end_compound()?;
            return Ok(());
        }
        let name = read_modified_utf8(data)?;
        decode_value(data, b, tag, &name)?;
    }
}

fn decode_value(data: &mut &[u8], b: &mut Builder, kind: Tag, name: &str) -> Result<()> {
    match kind {
        Tag::Byte => b.write_byte(name, read_i8(data)?)?,
        Tag::Short => b.write_short(name, read_i16(data)?)?,
        Tag::Int => b.write_int(name, read_i32(data)?)?,
        Tag::Long => b.write_long(name, read_i64(data)?)?,
        Tag::Float => b.write_float(name, read_f32(data)?)?,
        Tag::Double => b.write_double(name, read_f64(data)?)?,
        Tag::String => {
            let value = read_modified_utf8(data)?;
            b.write_string(name, &value)?;
        }
        Tag::ByteArray => {
            let count = read_array_len(data)?;
            let mut values = Vec::with_capacity(count);
            for _ in 0..count {
                values.push(read_i8(data)?);
            }
            b.write_byte_array(name, &values)?;
        }
        Tag::IntArray => {
            let count = read_array_len(data)?;
            let mut values = Vec::with_capacity(count);
            for _ in 0..count {
                values.push(read_i32(data)?);
            }
            b.write_int_array(name, &values)?;
        }
        Tag::LongArray => {
            let count = read_array_len(data)?;
            let mut values = Vec::with_capacity(count);
            for _ in 0..count {
                values.push(read_i64(data)?);
            }
            b.write_long_array(name, &values)?;
        }
        Tag::List => {
            let elem_byte = read_u8(data)?;
            let elem_kind = Tag::from_u8(elem_byte)
                .ok_or_else(|| Error::structure(format!("invalid list element tag byte {}", elem_byte)))?;
            let count = read_array_len(data)?;
            b.begin_list(name)?;
            for _ in 0..count {
                decode_value(data, b, elem_kind, "")?;
            }
            b.end_list()?;
        }
        Tag::Compound => {
            b.begin_compound(name)?;
            decode_compound_body(data, b)?;
        }
        Tag::End => unreachable!("End is only handled by decode_compound_body"),
    }
    Ok(())
}

fn write_modified_utf8<W: Write>(name: &str, out: &mut W) -> Result<()> {
    let bytes = cesu8::to_java_cesu8(name);
    let len = u16::try_from(bytes.len())
        .map_err(|_| Error::structure("a tag name is too long to encode (max 65535 bytes)"))?;
    out.write_u16::<BigEndian>(len)?;
    out.write_all(&bytes)?;
    Ok(())
}

/// Encodes a finished store as a single binary named tag, starting at
/// `root`.
pub(crate) fn encode<W: Write>(store: &DataStore, root: NamedTagIndex, out: &mut W) -> Result<()> {
    write_named_tag(store, root, out)
}

fn write_named_tag<W: Write>(store: &DataStore, idx: NamedTagIndex, out: &mut W) -> Result<()> {
    let tag = &store.named_tags[idx];
    out.write_u8(tag.kind as u8)?;
    write_modified_utf8(&tag.name, out)?;
    write_payload(store, idx, out)
}

fn write_payload<W: Write>(store: &DataStore, idx: NamedTagIndex, out: &mut W) -> Result<()> {
    match &store.named_tags[idx].payload {
        Payload::Byte(v) => out.write_i8(*v).map_err(Error::from),
        Payload::Short(v) => out.write_i16::<BigEndian>(*v).map_err(Error::from),
        Payload::Int(v) => out.write_i32::<BigEndian>(*v).map_err(Error::from),
        Payload::Long(v) => out.write_i64::<BigEndian>(*v).map_err(Error::from),
        Payload::Float(v) => out.write_f32::<BigEndian>(*v).map_err(Error::from),
        Payload::Double(v) => out.write_f64::<BigEndian>(*v).map_err(Error::from),
        Payload::String { pool_index, len } => {
            let bytes = &store.string_pool[*pool_index..*pool_index + *len as usize];
            out.write_u16::<BigEndian>(*len)?;
            out.write_all(bytes)?;
            Ok(())
        }
        Payload::ByteArray { pool_index, count } => {
            out.write_i32::<BigEndian>(*count)?;
            let values = &store.byte_array_pool[*pool_index..*pool_index + *count as usize];
            for v in values {
                out.write_i8(*v)?;
            }
            Ok(())
        }
        Payload::IntArray { pool_index, count } => {
            out.write_i32::<BigEndian>(*count)?;
            let values = &store.int_array_pool[*pool_index..*pool_index + *count as usize];
            for v in values {
                out.write_i32::<BigEndian>(*v)?;
            }
            Ok(())
        }
        Payload::LongArray { pool_index, count } => {
            out.write_i32::<BigEndian>(*count)?;
            let values = &store.long_array_pool[*pool_index..*pool_index + *count as usize];
            for v in values {
                out.write_i64::<BigEndian>(*v)?;
            }
            Ok(())
        }
        Payload::List {
            element_kind,
            count,
            body,
        } => {
            out.write_u8(*element_kind as u8)?;
            out.write_i32::<BigEndian>(*count)?;
            write_list_elements(store, *element_kind, *count, body, out)
        }
        Payload::Compound { storage_index } => {
            for &child in &store.compound_storage[*storage_index] {
                write_named_tag(store, child, out)?;
            }
            out.write_u8(Tag::End as u8).map_err(Error::from)
        }
    }
}

fn write_list_elements<W: Write>(
    store: &DataStore,
    element_kind: Tag,
    count: i32,
    body: &ListBody,
    out: &mut W,
) -> Result<()> {
    match body {
        ListBody::Empty => Ok(()),
        ListBody::Primitive { pool_index } => {
            let base = *pool_index;
            let n = count as usize;
            match element_kind {
                Tag::Byte => {
                    for v in &store.byte_pool[base..base + n] {
                        out.write_i8(*v)?;
                    }
                }
                Tag::Short => {
                    for v in &store.short_pool[base..base + n] {
                        out.write_i16::<BigEndian>(*v)?;
                    }
                }
                Tag::Int => {
                    for v in &store.int_pool[base..base + n] {
                        out.write_i32::<BigEndian>(*v)?;
                    }
                }
                Tag::Long => {
                    for v in &store.long_pool[base..base + n] {
                        out.write_i64::<BigEndian>(*v)?;
                    }
                }
                Tag::Float => {
                    for v in &store.float_pool[base..base + n] {
                        out.write_f32::<BigEndian>(*v)?;
                    }
                }
                Tag::Double => {
                    for v in &store.double_pool[base..base + n] {
                        out.write_f64::<BigEndian>(*v)?;
                    }
                }
                other => unreachable!("{:?} cannot have a primitive list body", other),
            }
            Ok(())
        }
        ListBody::Indirect { storage_index } => {
            for &child in &store.list_storage[*storage_index] {
                write_payload(store, child, out)?;
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::reader::Reader;

    fn sample_bytes() -> Vec<u8> {
        let mut b = Builder::new();
        b.begin("hello world").unwrap();
        b.write_string("name", "Bananrama").unwrap();
        b.finalize().unwrap();
        let (store, root) = b.into_parts().unwrap();
        let mut out = Vec::new();
        encode(&store, root, &mut out).unwrap();
        out
    }

    #[test]
    fn round_trips_a_simple_document() {
        let bytes = sample_bytes();
        let (store, root) = decode(&bytes).unwrap();
        let mut reader = Reader::new(store, root);
        assert_eq!(reader.read_string("name").unwrap(), "Bananrama");
    }

    #[test]
    fn round_trips_lists_and_nested_compounds() {
        let mut b = Builder::new();
        b.begin("").unwrap();
        b.begin_list("numbers").unwrap();
        for v in [1, 2, 3, 4] {
            b.write_int("", v).unwrap();
        }
        b.end_list().unwrap();
        b.begin_list("rows").unwrap();
        b.begin_compound("").unwrap();
        b.write_byte_array("payload", &[1, 2, 3]).unwrap();
        b.end_compound().unwrap();
        b.begin_compound("").unwrap();
        b.write_byte_array("payload", &[4, 5]).unwrap();
        b.end_compound().unwrap();
        b.end_list().unwrap();
        b.finalize().unwrap();
        let (store, root) = b.into_parts().unwrap();

        let mut out = Vec::new();
        encode(&store, root, &mut out).unwrap();

        let (store2, root2) = decode(&out).unwrap();
        let mut r = Reader::new(store2, root2);
        assert!(r.open_list("numbers"));
        assert_eq!(r.list_size().unwrap(), 4);
        assert_eq!(r.read_int("").unwrap(), 1);
        assert_eq!(r.read_int("").unwrap(), 4);
        r.close_list().unwrap();

        assert!(r.open_list("rows"));
        assert!(r.open_compound(""));
        assert_eq!(r.read_byte_array("payload").unwrap(), vec![1, 2, 3]);
        r.close_compound().unwrap();
        assert!(r.open_compound(""));
        assert_eq!(r.read_byte_array("payload").unwrap(), vec![4, 5]);
        r.close_compound().unwrap();
        r.close_list().unwrap();
    }

    #[test]
    fn rejects_a_non_compound_root() {
        let mut out = Vec::new();
        out.write_u8(Tag::Int as u8).unwrap();
        write_modified_utf8("", &mut out).unwrap();
        out.write_i32::<BigEndian>(1).unwrap();
        let err = decode(&out).unwrap_err();
        assert!(matches!(err, Error::StructureViolation(_)));
    }

    #[test]
    fn truncated_input_is_unexpected_end() {
        let bytes = sample_bytes();
        let truncated = &bytes[..bytes.len() - 3];
        let err = decode(truncated).unwrap_err();
        assert!(matches!(err, Error::UnexpectedEnd));
    }
}
