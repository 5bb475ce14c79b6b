//! Append-only construction of an NBT document.
//!
//! `Builder` is the only way to populate a [`crate::store::DataStore`]; every
//! other entry point (the binary parser, the SNBT parser) builds a document
//! by driving one of these, so the invariants enforced here hold for any
//! successfully constructed store regardless of where it came from.

use crate::cursor::{ContainerFrame, MAX_DEPTH};
use crate::error::{Error, Result};
use crate::store::{DataStore, ListBody, NamedTagIndex, Payload, Pool};
use crate::tag::Tag;

/// A cursor over an in-progress document. Holds its own [`DataStore`] and a
/// stack of open containers; [`Builder::finalize`] hands both off to a
/// [`crate::writer::Writer`] or [`crate::reader::Reader`].
#[derive(Debug)]
pub struct Builder {
    store: DataStore,
    stack: Vec<ContainerFrame>,
    root_index: Option<NamedTagIndex>,
    finalized: bool,
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

impl Builder {
    pub fn new() -> Self {
        Builder {
            store: DataStore::new(),
            stack: Vec::new(),
            root_index: None,
            finalized: false,
        }
    }

    /// Opens the document's root compound. Must be called exactly once,
    /// before any other operation.
    pub fn begin(&mut self, root_name: impl Into<String>) -> Result<()> {
        if self.root_index.is_some() {
            return Err(Error::structure("begin() called more than once"));
        }
        let storage_index = self.store.new_compound_storage();
        let idx = self.store.add_named_tag(Tag::Compound, root_name);
        self.store.named_tags[idx].payload = Payload::Compound { storage_index };
        self.stack.push(ContainerFrame::new(idx));
        self.root_index = Some(idx);
        Ok(())
    }

    pub fn finalized(&self) -> bool {
        self.finalized
    }

    /// Closes every still-open container, including the root compound.
    /// Idempotent: calling it again once finalized is a no-op.
    pub fn finalize(&mut self) -> Result<()> {
        if self.finalized {
            return Ok(());
        }
        if self.root_index.is_none() {
            return Err(Error::structure("finalize() called before begin()"));
        }
        while let Some(frame) = self.stack.last().copied() {
            match frame.kind(&self.store) {
                Tag::Compound => self.end_compound()?,
                Tag::List => self.end_list()?,
                other => unreachable!("open frame holds non-container kind {:?}", other),
            }
        }
        self.finalized = true;
        Ok(())
    }

    /// Hands ownership of the finished store and its root index to a reader.
    pub(crate) fn into_parts(self) -> Result<(DataStore, NamedTagIndex)> {
        if !self.finalized {
            return Err(Error::structure("builder was not finalized"));
        }
        Ok((self.store, self.root_index.expect("finalized implies begun")))
    }

    /// Like [`Builder::into_parts`], but clones instead of consuming —
    /// `Writer::export_*` may be called more than once on the same
    /// document.
    pub(crate) fn snapshot(&self) -> Result<(DataStore, NamedTagIndex)> {
        if !self.finalized {
            return Err(Error::structure("builder was not finalized"));
        }
        Ok((self.store.clone(), self.root_index.expect("finalized implies begun")))
    }

    fn top(&self) -> Result<ContainerFrame> {
        if self.finalized {
            return Err(Error::structure("builder is already finalized"));
        }
        self.stack
            .last()
            .copied()
            .ok_or_else(|| Error::structure("begin() must be called before writing"))
    }

    fn commit_element_kind(&mut self, frame: &ContainerFrame, kind: Tag) -> Result<()> {
        let existing = frame.element_kind(&self.store);
        if existing == Tag::End {
            frame.set_element_kind(&mut self.store, kind);
        } else if existing != kind {
            return Err(Error::TypeMismatch {
                expected: existing,
                found: kind,
            });
        }
        Ok(())
    }

    /// Writes a fixed-width scalar: a compound child gets a plain `Payload`,
    /// a list element is packed into the pool matching `kind`.
    fn write_scalar<T: Copy>(
        &mut self,
        kind: Tag,
        name: &str,
        value: T,
        make_payload: impl FnOnce(T) -> Payload,
    ) -> Result<()>
    where
        DataStore: Pool<T>,
    {
        let frame = self.top()?;
        match frame.kind(&self.store) {
            Tag::Compound => {
                if name.is_empty() {
                    return Err(Error::structure("a compound child tag must be named"));
                }
                let idx = self.store.add_named_tag(kind, name);
                self.store.named_tags[idx].payload = make_payload(value);
                let storage_index = frame.storage_index(&self.store);
                self.store.compound_storage[storage_index].push(idx);
                Ok(())
            }
            Tag::List => {
                if !name.is_empty() {
                    return Err(Error::structure("a list element must not be named"));
                }
                self.commit_element_kind(&frame, kind)?;
                let pool_index = Pool::<T>::pool(&self.store).len();
                Pool::<T>::pool_mut(&mut self.store).push(value);
                if frame.count(&self.store) == 0 {
                    frame.set_list_body(&mut self.store, ListBody::Primitive { pool_index });
                }
                frame.increment_count(&mut self.store);
                Ok(())
            }
            other => unreachable!("open frame holds non-container kind {:?}", other),
        }
    }

    /// Writes a tag whose payload has variable width (strings, arrays,
    /// nested lists/compounds). Returns the `named_tags` slot it landed in,
    /// so container-opening callers can push a frame over it.
    fn write_indirect(&mut self, kind: Tag, name: &str, payload: Payload) -> Result<NamedTagIndex> {
        let frame = self.top()?;
        match frame.kind(&self.store) {
            Tag::Compound => {
                if name.is_empty() {
                    return Err(Error::structure("a compound child tag must be named"));
                }
                let idx = self.store.add_named_tag(kind, name);
                self.store.named_tags[idx].payload = payload;
                let storage_index = frame.storage_index(&self.store);
                self.store.compound_storage[storage_index].push(idx);
                Ok(idx)
            }
            Tag::List => {
                if !name.is_empty() {
                    return Err(Error::structure("a list element must not be named"));
                }
                self.commit_element_kind(&frame, kind)?;
                let idx = self.store.add_named_tag(kind, String::new());
                self.store.named_tags[idx].payload = payload;
                let storage_index = frame.indirect_storage(&mut self.store);
                self.store.list_storage[storage_index].push(idx);
                frame.increment_count(&mut self.store);
                Ok(idx)
            }
            other => unreachable!("open frame holds non-container kind {:?}", other),
        }
    }

    fn pop_frame(&mut self, expected: Tag) -> Result<()> {
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
        if expected == Tag::Compound && frame.count(&self.store) == 0 {
            let name = &self.store.named_tags[frame.tag_index()].name;
            eprintln!("cursornbt: compound {:?} closed with no children", name);
        }
        self.stack.pop();
        Ok(())
    }

    pub fn begin_compound(&mut self, name: &str) -> Result<()> {
        if self.stack.len() >= MAX_DEPTH {
            return Err(Error::DepthExceeded);
        }
        let storage_index = self.store.new_compound_storage();
        let idx = self.write_indirect(Tag::Compound, name, Payload::Compound { storage_index })?;
        self.stack.push(ContainerFrame::new(idx));
        Ok(())
    }

    pub fn end_compound(&mut self) -> Result<()> {
        self.pop_frame(Tag::Compound)
    }

    pub fn begin_list(&mut self, name: &str) -> Result<()> {
        if self.stack.len() >= MAX_DEPTH {
            return Err(Error::DepthExceeded);
        }
        let idx = self.write_indirect(
            Tag::List,
            name,
            Payload::List {
                element_kind: Tag::End,
                count: 0,
                body: ListBody::Empty,
            },
        )?;
        self.stack.push(ContainerFrame::new(idx));
        Ok(())
    }

    pub fn end_list(&mut self) -> Result<()> {
        self.pop_frame(Tag::List)
    }

    pub fn write_byte(&mut self, name: &str, value: i8) -> Result<()> {
        self.write_scalar(Tag::Byte, name, value, Payload::Byte)
    }

    pub fn write_short(&mut self, name: &str, value: i16) -> Result<()> {
        self.write_scalar(Tag::Short, name, value, Payload::Short)
    }

    pub fn write_int(&mut self, name: &str, value: i32) -> Result<()> {
        self.write_scalar(Tag::Int, name, value, Payload::Int)
    }

    pub fn write_long(&mut self, name: &str, value: i64) -> Result<()> {
        self.write_scalar(Tag::Long, name, value, Payload::Long)
    }

    pub fn write_float(&mut self, name: &str, value: f32) -> Result<()> {
        self.write_scalar(Tag::Float, name, value, Payload::Float)
    }

    pub fn write_double(&mut self, name: &str, value: f64) -> Result<()> {
        self.write_scalar(Tag::Double, name, value, Payload::Double)
    }

    pub fn write_string(&mut self, name: &str, value: &str) -> Result<()> {
        let bytes = cesu8::to_java_cesu8(value);
        let len = u16::try_from(bytes.len())
            .map_err(|_| Error::structure("string is too long to encode (max 65535 bytes)"))?;
        let pool_index = self.store.string_pool.len();
        self.store.string_pool.extend_from_slice(&bytes);
        self.write_indirect(Tag::String, name, Payload::String { pool_index, len })?;
        Ok(())
    }

    pub fn write_byte_array(&mut self, name: &str, values: &[i8]) -> Result<()> {
        let count = i32::try_from(values.len())
            .map_err(|_| Error::structure("byte array is too long to encode"))?;
        let pool_index = self.store.byte_array_pool.len();
        self.store.byte_array_pool.extend_from_slice(values);
        self.write_indirect(Tag::ByteArray, name, Payload::ByteArray { pool_index, count })?;
        Ok(())
    }

    pub fn write_int_array(&mut self, name: &str, values: &[i32]) -> Result<()> {
        let count = i32::try_from(values.len())
            .map_err(|_| Error::structure("int array is too long to encode"))?;
        let pool_index = self.store.int_array_pool.len();
        self.store.int_array_pool.extend_from_slice(values);
        self.write_indirect(Tag::IntArray, name, Payload::IntArray { pool_index, count })?;
        Ok(())
    }

    pub fn write_long_array(&mut self, name: &str, values: &[i64]) -> Result<()> {
        let count = i32::try_from(values.len())
            .map_err(|_| Error::structure("long array is too long to encode"))?;
        let pool_index = self.store.long_array_pool.len();
        self.store.long_array_pool.extend_from_slice(values);
        self.write_indirect(Tag::LongArray, name, Payload::LongArray { pool_index, count })?;
        Ok(())
    }
}
