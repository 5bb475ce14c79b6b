//! A cursor-driven reader/writer for Minecraft's Named Binary Tag (NBT)
//! format.
//!
//! Documents are built and read through a [`writer::Writer`] and a
//! [`reader::Reader`], each holding a cursor ([`builder::Builder`] /
//! `Reader`'s own stack) over a pooled, index-based in-memory tree
//! ([`store::DataStore`]). Three things can produce or consume that tree:
//! the big-endian binary codec (`binary`), the SNBT text codec (`text`),
//! and a hand-written `Builder` caller. Because all three funnel through
//! `Builder`'s validated entry points, every document this crate hands you
//! a `Reader` for upholds the same structural invariants regardless of
//! where its bytes came from.
//!
//! ```
//! use cursornbt::writer::{Writer, PrettyPrint};
//!
//! let mut w = Writer::new();
//! w.begin("").unwrap();
//! w.write_string("name", "steve").unwrap();
//! w.write_int("health", 20).unwrap();
//! let text = w.export_text_string(PrettyPrint::Disabled).unwrap();
//! assert_eq!(text, r#"{"name":"steve","health":20}"#);
//! ```

pub mod builder;
pub mod error;
pub mod reader;
pub mod tag;
pub mod writer;

mod binary;
mod cursor;
mod store;
mod stream;
mod swap;
mod text;
mod transport;

#[cfg(test)]
mod test;
