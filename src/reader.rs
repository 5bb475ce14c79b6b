//! Cursor-driven navigation over an already-built document.
//!
//! A `Reader` owns a finished [`crate::store::DataStore`] (handed to it by
//! [`crate::binary`], [`crate::text`], or a finalized [`crate::builder::Builder`])
//! and walks it with the same [`ContainerFrame`] stack discipline the
//! builder uses to create it, just in the opposite direction.

use std::path::Path;

use crate::cursor::ContainerFrame;
use crate::error::{Error, Result};
use crate::store::{DataStore, ListBody, NamedTagIndex, Payload, Pool};
use crate::tag::Tag;
use crate::{binary, text, transport};

#[derive(Debug)]
pub struct Reader {
    store: DataStore,
    stack: Vec<ContainerFrame>,
}

impl Reader {
    /// Wraps a finished store, cursor positioned at its root compound.
    pub(crate) fn new(store: DataStore, root_index: NamedTagIndex) -> Self {
        Reader {
            store,
            stack: vec![ContainerFrame::new(root_index)],
        }
    }

    /// Parses a buffer of uncompressed binary NBT.
    pub fn import_binary_uncompressed_buffer(bytes: &[u8]) -> Result<Reader> {
        let (store, root) = binary::decode(bytes)?;
        Ok(Reader::new(store, root))
    }

    /// Parses a buffer that may or may not be gzip-framed binary NBT.
    pub fn import_binary_buffer(bytes: &[u8]) -> Result<Reader> {
        let inflated = transport::maybe_gunzip(bytes)?;
        Self::import_binary_uncompressed_buffer(&inflated)
    }

    /// Parses a buffer of SNBT text.
    pub fn import_text_buffer(input: &str) -> Result<Reader> {
        let (store, root) = text::parse(input)?;
        Ok(Reader::new(store, root))
    }

    /// Reads `path` and parses it as uncompressed binary NBT.
    pub fn import_binary_uncompressed(path: impl AsRef<Path>) -> Result<Reader> {
        let bytes = transport::read_file(path)?;
        Self::import_binary_uncompressed_buffer(&bytes)
    }

    /// Reads `path`, transparently inflating it if gzip-framed, and parses
    /// it as binary NBT.
    pub fn import_binary(path: impl AsRef<Path>) -> Result<Reader> {
        let bytes = transport::read_file_maybe_gzip(path)?;
        Self::import_binary_uncompressed_buffer(&bytes)
    }

    /// Reads `path` and parses it as SNBT text.
    pub fn import_text(path: impl AsRef<Path>) -> Result<Reader> {
        let bytes = transport::read_file(path)?;
        let input = String::from_utf8(bytes)
            .map_err(|_| Error::malformed("text NBT file is not valid UTF-8"))?;
        Self::import_text_buffer(&input)
    }

    /// Reads `path` and classifies it before parsing: a leading compound
    /// tag byte (`0x0A`) means uncompressed binary, a gzip magic number
    /// means gzip-framed binary, and anything else is tried as SNBT text.
    pub fn import(path: impl AsRef<Path>) -> Result<Reader> {
        let bytes = transport::read_file(path)?;
        Self::import_bytes(&bytes)
    }

    /// The in-memory equivalent of [`Reader::import`].
    pub fn import_bytes(bytes: &[u8]) -> Result<Reader> {
        if transport::is_gzip(bytes) {
            let inflated = transport::maybe_gunzip(bytes)?;
            return Self::import_binary_uncompressed_buffer(&inflated);
        }
        if bytes.first() == Some(&(Tag::Compound as u8)) {
            return Self::import_binary_uncompressed_buffer(bytes);
        }
        let input = std::str::from_utf8(bytes)
            .map_err(|_| Error::malformed("input is neither binary NBT nor valid UTF-8 text"))?;
        Self::import_text_buffer(input)
    }

    fn current(&self) -> Result<ContainerFrame> {
        self.stack
            .last()
            .copied()
            .ok_or_else(|| Error::structure("no container is open"))
    }

    fn advance_current_index(&mut self) {
        self.stack.last_mut().expect("checked by caller").current_index += 1;
    }

    /// Linear scan for a named child of the current compound. Fails with a
    /// [`Error::TypeMismatch`] if the name exists under a different kind.
    fn find_in_compound(
        &self,
        frame: &ContainerFrame,
        name: &str,
        expected_kind: Tag,
    ) -> Result<Option<NamedTagIndex>> {
        let storage_index = frame.storage_index(&self.store);
        for &idx in &self.store.compound_storage[storage_index] {
            if self.store.named_tags[idx].name == name {
                let found_kind = self.store.named_tags[idx].kind;
                if found_kind != expected_kind {
                    return Err(Error::TypeMismatch {
                        expected: expected_kind,
                        found: found_kind,
                    });
                }
                return Ok(Some(idx));
            }
        }
        Ok(None)
    }

    fn open_container(&mut self, name: &str, kind: Tag) -> bool {
        let frame = match self.current() {
            Ok(f) => f,
            Err(_) => return false,
        };
        match frame.kind(&self.store) {
            Tag::Compound => match self.find_in_compound(&frame, name, kind) {
                Ok(Some(idx)) => {
                    self.stack.push(ContainerFrame::new(idx));
                    true
                }
                _ => false,
            },
            Tag::List => {
                if !name.is_empty() || frame.current_index >= frame.count(&self.store) {
                    return false;
                }
                if frame.element_kind(&self.store) != kind {
                    return false;
                }
                let storage_index = match frame.list_body(&self.store) {
                    ListBody::Indirect { storage_index } => storage_index,
                    _ => return false,
                };
                let idx = self.store.list_storage[storage_index][frame.current_index as usize];
                self.advance_current_index();
                self.stack.push(ContainerFrame::new(idx));
                true
            }
            _ => false,
        }
    }

    pub fn open_compound(&mut self, name: &str) -> bool {
        self.open_container(name, Tag::Compound)
    }

    pub fn open_list(&mut self, name: &str) -> bool {
        self.open_container(name, Tag::List)
    }

    fn close(&mut self, expected: Tag) -> Result<()> {
        let frame = self
            .stack
            .last()
            .copied()
            .ok_or_else(|| Error::structure("no open container to close"))?;
        let found = frame.kind(&self.store);
        if found != expected {
            return Err(Error::structure(format!(
                "expected to close a {} but the open container is a {}",
                expected, found
            )));
        }
        self.stack.pop();
        Ok(())
    }

    pub fn close_compound(&mut self) -> Result<()> {
        self.close(Tag::Compound)
    }

    pub fn close_list(&mut self) -> Result<()> {
        self.close(Tag::List)
    }

    /// Children of the current compound, or elements of the current list.
    pub fn count(&self) -> Result<i32> {
        let frame = self.current()?;
        Ok(frame.count(&self.store))
    }

    /// Alias for [`Reader::count`], read more naturally after `open_list`.
    pub fn list_size(&self) -> Result<i32> {
        self.count()
    }

    /// The tag kind of the current compound's child named `name`, without
    /// reading its payload. `None` if no such child exists. Lets a caller
    /// that doesn't know a document's shape in advance (e.g. a generic
    /// dumper) dispatch to the right `read_*`/`open_*` call instead of
    /// guessing and relying on `Error::TypeMismatch` as control flow —
    /// `maybe_read_*` deliberately does not swallow that error.
    pub fn tag_kind(&self, name: &str) -> Option<Tag> {
        let frame = self.current().ok()?;
        if frame.kind(&self.store) != Tag::Compound {
            return None;
        }
        let storage_index = frame.storage_index(&self.store);
        self.store.compound_storage[storage_index]
            .iter()
            .find(|&&idx| self.store.named_tags[idx].name == name)
            .map(|&idx| self.store.named_tags[idx].kind)
    }

    /// The element kind of the currently open list, or `None` if the
    /// current container is a compound (or nothing is open). Every element
    /// of a list shares this kind, so a caller that doesn't know a
    /// document's shape in advance can read this once per list instead of
    /// guessing per element.
    pub fn list_element_kind(&self) -> Option<Tag> {
        let frame = self.current().ok()?;
        if frame.kind(&self.store) != Tag::List {
            return None;
        }
        Some(frame.element_kind(&self.store))
    }

    /// Names of the current compound's children, in storage order. Empty
    /// when the current container is a list.
    pub fn names(&self) -> Names<'_> {
        let indices: &[NamedTagIndex] = match self.current() {
            Ok(frame) if frame.kind(&self.store) == Tag::Compound => {
                &self.store.compound_storage[frame.storage_index(&self.store)]
            }
            _ => &[],
        };
        Names {
            store: &self.store,
            indices: indices.iter(),
        }
    }

    fn decode_string(&self, idx: NamedTagIndex) -> Result<String> {
        match self.store.named_tags[idx].payload {
            Payload::String { pool_index, len } => {
                let bytes = &self.store.string_pool[pool_index..pool_index + len as usize];
                cesu8::from_java_cesu8(bytes)
                    .map(|cow| cow.into_owned())
                    .map_err(|_| Error::structure("string payload is not valid modified UTF-8"))
            }
            _ => unreachable!("decode_string called on a non-String payload"),
        }
    }

    pub fn read_string(&mut self, name: &str) -> Result<String> {
        let frame = self.current()?;
        match frame.kind(&self.store) {
            Tag::Compound => {
                let idx = self
                    .find_in_compound(&frame, name, Tag::String)?
                    .ok_or_else(|| Error::name_not_found(name))?;
                self.decode_string(idx)
            }
            Tag::List => {
                if frame.current_index >= frame.count(&self.store) {
                    return Err(Error::ListOverread);
                }
                let elem_kind = frame.element_kind(&self.store);
                if elem_kind != Tag::String {
                    return Err(Error::TypeMismatch {
                        expected: elem_kind,
                        found: Tag::String,
                    });
                }
                let storage_index = match frame.list_body(&self.store) {
                    ListBody::Indirect { storage_index } => storage_index,
                    _ => unreachable!(),
                };
                let idx = self.store.list_storage[storage_index][frame.current_index as usize];
                self.advance_current_index();
                self.decode_string(idx)
            }
            other => Err(Error::structure(format!(
                "no compound or list is open (found {})",
                other
            ))),
        }
    }

    pub fn maybe_read_string(&mut self, name: &str) -> Result<Option<String>> {
        match self.read_string(name) {
            Ok(v) => Ok(Some(v)),
            Err(Error::NameNotFound(_)) | Err(Error::ListOverread) => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn array_slice<'a, T: Copy>(
        &'a self,
        idx: NamedTagIndex,
        kind: Tag,
        extract: impl Fn(&Payload) -> (usize, i32),
        pool: impl Fn(&'a DataStore) -> &'a [T],
    ) -> Vec<T> {
        debug_assert_eq!(self.store.named_tags[idx].kind, kind);
        let (pool_index, count) = extract(&self.store.named_tags[idx].payload);
        pool(&self.store)[pool_index..pool_index + count as usize].to_vec()
    }
}

macro_rules! scalar_read {
    ($read:ident, $maybe:ident, $kind:expr, $ty:ty, $variant:ident) => {
        impl Reader {
            pub fn $read(&mut self, name: &str) -> Result<$ty> {
                let frame = self.current()?;
                match frame.kind(&self.store) {
                    Tag::Compound => {
                        let idx = self
                            .find_in_compound(&frame, name, $kind)?
                            .ok_or_else(|| Error::name_not_found(name))?;
                        match self.store.named_tags[idx].payload {
                            Payload::$variant(v) => Ok(v),
                            _ => unreachable!("kind already checked by find_in_compound"),
                        }
                    }
                    Tag::List => {
                        if frame.current_index >= frame.count(&self.store) {
                            return Err(Error::ListOverread);
                        }
                        let elem_kind = frame.element_kind(&self.store);
                        if elem_kind != $kind {
                            return Err(Error::TypeMismatch {
                                expected: elem_kind,
                                found: $kind,
                            });
                        }
                        let base = frame.pool_index(&self.store);
                        let value =
                            Pool::<$ty>::pool(&self.store)[base + frame.current_index as usize];
                        self.advance_current_index();
                        Ok(value)
                    }
                    other => Err(Error::structure(format!(
                        "no compound or list is open (found {})",
                        other
                    ))),
                }
            }

            pub fn $maybe(&mut self, name: &str) -> Result<Option<$ty>> {
                match self.$read(name) {
                    Ok(v) => Ok(Some(v)),
                    Err(Error::NameNotFound(_)) | Err(Error::ListOverread) => Ok(None),
                    Err(e) => Err(e),
                }
            }
        }
    };
}

scalar_read!(read_byte, maybe_read_byte, Tag::Byte, i8, Byte);
scalar_read!(read_short, maybe_read_short, Tag::Short, i16, Short);
scalar_read!(read_int, maybe_read_int, Tag::Int, i32, Int);
scalar_read!(read_long, maybe_read_long, Tag::Long, i64, Long);
scalar_read!(read_float, maybe_read_float, Tag::Float, f32, Float);
scalar_read!(read_double, maybe_read_double, Tag::Double, f64, Double);

macro_rules! array_read {
    ($read:ident, $maybe:ident, $kind:expr, $ty:ty, $variant:ident, $pool:ident) => {
        impl Reader {
            pub fn $read(&mut self, name: &str) -> Result<Vec<$ty>> {
                let frame = self.current()?;
                let idx = match frame.kind(&self.store) {
                    Tag::Compound => self
                        .find_in_compound(&frame, name, $kind)?
                        .ok_or_else(|| Error::name_not_found(name))?,
                    Tag::List => {
                        if frame.current_index >= frame.count(&self.store) {
                            return Err(Error::ListOverread);
                        }
                        let elem_kind = frame.element_kind(&self.store);
                        if elem_kind != $kind {
                            return Err(Error::TypeMismatch {
                                expected: elem_kind,
                                found: $kind,
                            });
                        }
                        let storage_index = match frame.list_body(&self.store) {
                            ListBody::Indirect { storage_index } => storage_index,
                            _ => unreachable!(),
                        };
                        let idx =
                            self.store.list_storage[storage_index][frame.current_index as usize];
                        self.advance_current_index();
                        idx
                    }
                    other => {
                        return Err(Error::structure(format!(
                            "no compound or list is open (found {})",
                            other
                        )))
                    }
                };
                Ok(self.array_slice(
                    idx,
                    $kind,
                    |p| match p {
                        Payload::$variant { pool_index, count } => (*pool_index, *count),
                        _ => unreachable!("kind already checked"),
                    },
                    |store| &store.$pool,
                ))
            }

            pub fn $maybe(&mut self, name: &str) -> Result<Option<Vec<$ty>>> {
                match self.$read(name) {
                    Ok(v) => Ok(Some(v)),
                    Err(Error::NameNotFound(_)) | Err(Error::ListOverread) => Ok(None),
                    Err(e) => Err(e),
                }
            }
        }
    };
}

array_read!(
    read_byte_array,
    maybe_read_byte_array,
    Tag::ByteArray,
    i8,
    ByteArray,
    byte_array_pool
);
array_read!(
    read_int_array,
    maybe_read_int_array,
    Tag::IntArray,
    i32,
    IntArray,
    int_array_pool
);
array_read!(
    read_long_array,
    maybe_read_long_array,
    Tag::LongArray,
    i64,
    LongArray,
    long_array_pool
);

/// Iterator over the names of a compound's children, in storage order.
pub struct Names<'a> {
    store: &'a DataStore,
    indices: std::slice::Iter<'a, NamedTagIndex>,
}

impl<'a> Iterator for Names<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        self.indices
            .next()
            .map(|&idx| self.store.named_tags[idx].name.as_str())
    }
}
