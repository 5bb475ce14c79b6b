//! The pooled, index-based backing store for an NBT document.
//!
//! This is a direct generalization of the reference implementation's
//! `DataStore`: one growable pool per primitive payload kind, a single
//! global vector of named-tag records, and a vector-of-vectors holding each
//! compound's ordered child indices. Every tag and array byte the document
//! contains lives in exactly one of these vectors; nothing is boxed or
//! reference-counted.
//!
//! List elements with a variable-width payload (strings, the three array
//! kinds, and nested lists/compounds) are the one place this store departs
//! from the reference implementation: rather than splicing a temporary
//! per-list buffer into a single shared descriptor pool at close time (which
//! the reference implementation needs to keep those pools contiguous even
//! when construction of nested lists interleaves), each such element is
//! stored as an ordinary entry in `named_tags` (with an empty name, same as
//! any other anonymous tag) and grouped per owning list by `list_storage`,
//! exactly mirroring how `compound_storage` groups a compound's named
//! children. See DESIGN.md for the full rationale.

use crate::tag::Tag;

pub(crate) type NamedTagIndex = usize;
pub(crate) type StorageIndex = usize;
pub(crate) type PoolIndex = usize;

/// How a list's element bodies are stored, depending on the list's element
/// kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ListBody {
    /// No elements have been written yet; element kind is still `End`.
    Empty,
    /// Elements are fixed-width scalars (Byte/Short/Int/Long/Float/Double),
    /// packed contiguously starting at `pool_index` in the pool matching the
    /// list's element kind.
    Primitive { pool_index: PoolIndex },
    /// Elements have a variable-width payload (String, the three array
    /// kinds, or a nested List/Compound) and so cannot be packed
    /// contiguously; each one gets its own entry in `named_tags` (with an
    /// empty name) and this list's elements, in order, live in
    /// `list_storage[storage_index]`.
    Indirect { storage_index: StorageIndex },
}

#[derive(Debug, Clone)]
pub(crate) enum Payload {
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String {
        pool_index: PoolIndex,
        len: u16,
    },
    ByteArray {
        pool_index: PoolIndex,
        count: i32,
    },
    IntArray {
        pool_index: PoolIndex,
        count: i32,
    },
    LongArray {
        pool_index: PoolIndex,
        count: i32,
    },
    List {
        element_kind: Tag,
        count: i32,
        body: ListBody,
    },
    Compound {
        storage_index: StorageIndex,
    },
}

/// A `(name, kind, payload)` triple. Used both for genuinely named tags
/// (compound children) and for anonymous container elements (list
/// elements whose own kind is `List` or `Compound`), in which case `name`
/// is empty.
#[derive(Debug, Clone)]
pub(crate) struct NamedTag {
    pub name: String,
    pub kind: Tag,
    pub payload: Payload,
}

/// The pooled backing store. Owns every tag, array byte, and child-list in
/// the document.
#[derive(Debug, Default, Clone)]
pub(crate) struct DataStore {
    pub named_tags: Vec<NamedTag>,
    pub compound_storage: Vec<Vec<NamedTagIndex>>,
    pub list_storage: Vec<Vec<NamedTagIndex>>,

    pub byte_pool: Vec<i8>,
    pub short_pool: Vec<i16>,
    pub int_pool: Vec<i32>,
    pub long_pool: Vec<i64>,
    pub float_pool: Vec<f32>,
    pub double_pool: Vec<f64>,
    pub string_pool: Vec<u8>,
    pub byte_array_pool: Vec<i8>,
    pub int_array_pool: Vec<i32>,
    pub long_array_pool: Vec<i64>,
}

impl DataStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a new named-tag record with the given kind and name. The
    /// caller must immediately set its payload; the returned index is
    /// stable until the next `clear()`.
    pub fn add_named_tag(&mut self, kind: Tag, name: impl Into<String>) -> NamedTagIndex {
        self.named_tags.push(NamedTag {
            name: name.into(),
            kind,
            // Placeholder; every call site overwrites this before anyone
            // else can observe it.
            payload: Payload::Int(0),
        });
        self.named_tags.len() - 1
    }

    /// Reserves a fresh, empty child-list slot in `compound_storage` and
    /// returns its index.
    pub fn new_compound_storage(&mut self) -> StorageIndex {
        self.compound_storage.push(Vec::new());
        self.compound_storage.len() - 1
    }

    /// Reserves a fresh, empty element-list slot in `list_storage` and
    /// returns its index.
    pub fn new_list_storage(&mut self) -> StorageIndex {
        self.list_storage.push(Vec::new());
        self.list_storage.len() - 1
    }

    /// Truncates every pool and vector, invalidating all indices handed out
    /// so far.
    pub fn clear(&mut self) {
        self.named_tags.clear();
        self.compound_storage.clear();
        self.list_storage.clear();
        self.byte_pool.clear();
        self.short_pool.clear();
        self.int_pool.clear();
        self.long_pool.clear();
        self.float_pool.clear();
        self.double_pool.clear();
        self.string_pool.clear();
        self.byte_array_pool.clear();
        self.int_array_pool.clear();
        self.long_array_pool.clear();
    }
}

/// Typed pool access, generalizing the reference implementation's
/// `Pool<T>()` template accessor to a trait implemented once per scalar
/// type the document can hold in a contiguous list body.
pub(crate) trait Pool<T> {
    fn pool(&self) -> &Vec<T>;
    fn pool_mut(&mut self) -> &mut Vec<T>;
}

macro_rules! impl_pool {
    ($t:ty, $field:ident) => {
        impl Pool<$t> for DataStore {
            fn pool(&self) -> &Vec<$t> {
                &self.$field
            }
            fn pool_mut(&mut self) -> &mut Vec<$t> {
                &mut self.$field
            }
        }
    };
}

impl_pool!(i8, byte_pool);
impl_pool!(i16, short_pool);
impl_pool!(i32, int_pool);
impl_pool!(i64, long_pool);
impl_pool!(f32, float_pool);
impl_pool!(f64, double_pool);

pub(crate) fn is_container(kind: Tag) -> bool {
    kind.is_container()
}
