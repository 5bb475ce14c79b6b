//! The container-nesting stack shared by [`crate::builder::Builder`] and
//! [`crate::reader::Reader`].
//!
//! The reference implementation's `ContainerInfo` is a tagged union that
//! distinguishes a "named" frame (reached through a compound, and backed by
//! a `NamedDataTagIndex`) from an "anonymous" frame (reached as a list
//! element, and backed by a raw pool index). This crate's [`store`][crate::store]
//! gives every container tag — named or anonymous — a slot in
//! `named_tags` (anonymous list elements just carry an empty name), so a
//! frame only ever needs to remember one thing: which `named_tags` slot it
//! is. That collapses the union into a single `NamedTagIndex`.

use crate::store::{DataStore, ListBody, NamedTagIndex, Payload, StorageIndex};
use crate::tag::Tag;

/// One open container on the builder's or reader's cursor stack.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ContainerFrame {
    /// The `named_tags` slot holding this container's own tag record.
    tag_index: NamedTagIndex,
    /// Read-side-only: position of the next element to read out of a list.
    /// Always 0 for a frame used purely for building.
    pub current_index: i32,
}

impl ContainerFrame {
    pub fn new(tag_index: NamedTagIndex) -> Self {
        ContainerFrame {
            tag_index,
            current_index: 0,
        }
    }

    pub fn tag_index(&self) -> NamedTagIndex {
        self.tag_index
    }

    pub fn kind(&self, store: &DataStore) -> Tag {
        store.named_tags[self.tag_index].kind
    }

    /// The element kind of a List frame. Panics if this frame isn't a List;
    /// callers are expected to have checked `kind()` first.
    pub fn element_kind(&self, store: &DataStore) -> Tag {
        match &store.named_tags[self.tag_index].payload {
            Payload::List { element_kind, .. } => *element_kind,
            _ => unreachable!("element_kind() called on a non-List frame"),
        }
    }

    pub fn set_element_kind(&self, store: &mut DataStore, kind: Tag) {
        match &mut store.named_tags[self.tag_index].payload {
            Payload::List { element_kind, .. } => *element_kind = kind,
            _ => unreachable!("set_element_kind() called on a non-List frame"),
        }
    }

    /// Number of elements (List) or children (Compound) currently held.
    pub fn count(&self, store: &DataStore) -> i32 {
        match &store.named_tags[self.tag_index].payload {
            Payload::List { count, .. } => *count,
            Payload::Compound { storage_index } => {
                store.compound_storage[*storage_index].len() as i32
            }
            _ => unreachable!("count() called on a non-container frame"),
        }
    }

    pub fn increment_count(&self, store: &mut DataStore) {
        match &mut store.named_tags[self.tag_index].payload {
            Payload::List { count, .. } => *count += 1,
            _ => unreachable!("increment_count() called on a non-List frame"),
        }
    }

    /// The compound's child-list index into `compound_storage`. Panics if
    /// this frame isn't a Compound.
    pub fn storage_index(&self, store: &DataStore) -> StorageIndex {
        match &store.named_tags[self.tag_index].payload {
            Payload::Compound { storage_index } => *storage_index,
            _ => unreachable!("storage_index() called on a non-Compound frame"),
        }
    }

    pub fn list_body(&self, store: &DataStore) -> ListBody {
        match &store.named_tags[self.tag_index].payload {
            Payload::List { body, .. } => *body,
            _ => unreachable!("list_body() called on a non-List frame"),
        }
    }

    pub fn set_list_body(&self, store: &mut DataStore, body: ListBody) {
        match &mut store.named_tags[self.tag_index].payload {
            Payload::List { body: slot, .. } => *slot = body,
            _ => unreachable!("set_list_body() called on a non-List frame"),
        }
    }

    /// The base pool index of a primitive-bodied list. Panics if the list
    /// hasn't committed to a primitive element kind yet.
    pub fn pool_index(&self, store: &DataStore) -> crate::store::PoolIndex {
        match self.list_body(store) {
            ListBody::Primitive { pool_index } => pool_index,
            _ => unreachable!("pool_index() called on a non-primitive list body"),
        }
    }

    /// The `list_storage` slot of an indirect-bodied list, allocating one on
    /// first use.
    pub fn indirect_storage(&self, store: &mut DataStore) -> StorageIndex {
        match self.list_body(store) {
            ListBody::Indirect { storage_index } => storage_index,
            ListBody::Empty => {
                let storage_index = store.new_list_storage();
                self.set_list_body(store, ListBody::Indirect { storage_index });
                storage_index
            }
            ListBody::Primitive { .. } => {
                unreachable!("indirect_storage() called on a primitive list body")
            }
        }
    }
}

/// Nesting beyond this many open containers is rejected.
pub(crate) const MAX_DEPTH: usize = 512;
