//! The public write-side handle.
//!
//! `Writer` wraps a [`Builder`] by composition and exposes its methods
//! directly through `Deref`/`DerefMut` — the idiomatic stand-in for the
//! source library's `class Writer : public Builder` inheritance — and adds
//! the `export_*` entry points that hand a finished document to the binary
//! or text codec and on to [`crate::transport`].

use std::ops::{Deref, DerefMut};
use std::path::Path;

use crate::builder::Builder;
use crate::error::Result;
use crate::{binary, text, transport};

/// Whether SNBT text export inserts newlines and indentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrettyPrint {
    Enabled,
    Disabled,
}

/// A cursor for building a document, plus the ability to serialize it once
/// finished. Every [`Builder`] method is reachable directly on a `Writer`
/// through deref coercion.
#[derive(Debug, Default)]
pub struct Writer {
    builder: Builder,
}

impl Writer {
    pub fn new() -> Self {
        Writer {
            builder: Builder::new(),
        }
    }

    /// Writes the document to `path` as gzip-compressed binary NBT — the
    /// conventional `.nbt`/`level.dat` on-disk format.
    pub fn export_binary(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let bytes = self.encode_binary_bytes()?;
        transport::write_file_gzip(path, &bytes)
    }

    /// Writes the document to `path` as plain (uncompressed) binary NBT.
    pub fn export_binary_uncompressed(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let bytes = self.encode_binary_bytes()?;
        transport::write_file(path, &bytes)
    }

    /// Writes the document to `path` as SNBT text.
    pub fn export_text(&mut self, path: impl AsRef<Path>, pretty_print: PrettyPrint) -> Result<()> {
        let text = self.encode_text_string(pretty_print)?;
        transport::write_file(path, text.as_bytes())
    }

    /// Encodes the document as binary NBT into an in-memory buffer, without
    /// gzip framing.
    pub fn export_binary_buffer(&mut self) -> Result<Vec<u8>> {
        self.encode_binary_bytes()
    }

    /// Encodes the document as SNBT text into an in-memory `String`.
    pub fn export_text_string(&mut self, pretty_print: PrettyPrint) -> Result<String> {
        self.encode_text_string(pretty_print)
    }

    fn encode_binary_bytes(&mut self) -> Result<Vec<u8>> {
        self.builder.finalize()?;
        let (store, root) = self.builder.snapshot()?;
        let mut out = Vec::new();
        binary::encode(&store, root, &mut out)?;
        Ok(out)
    }

    fn encode_text_string(&mut self, pretty_print: PrettyPrint) -> Result<String> {
        self.builder.finalize()?;
        let (store, root) = self.builder.snapshot()?;
        Ok(match pretty_print {
            PrettyPrint::Enabled => text::print_pretty(&store, root),
            PrettyPrint::Disabled => text::print_compact(&store, root),
        })
    }
}

impl Deref for Writer {
    type Target = Builder;

    fn deref(&self) -> &Builder {
        &self.builder
    }
}

impl DerefMut for Writer {
    fn deref_mut(&mut self) -> &mut Builder {
        &mut self.builder
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn sample() -> Writer {
        let mut w = Writer::new();
        w.begin("").unwrap();
        w.write_int("health", 20).unwrap();
        w.write_string("name", "steve").unwrap();
        w
    }

    #[test]
    fn exports_binary_and_text_from_the_same_document() {
        let mut w = sample();
        let bytes = w.export_binary_buffer().unwrap();
        assert!(!bytes.is_empty());
        let text = w.export_text_string(PrettyPrint::Disabled).unwrap();
        assert_eq!(text, r#"{"health":20,"name":"steve"}"#);
    }

    #[test]
    fn builder_methods_are_reachable_through_deref() {
        let mut w = Writer::new();
        w.begin("").unwrap();
        assert!(!w.finalized());
    }
}
