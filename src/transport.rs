//! The transport shim (C9): getting bytes in and out of files, with
//! transparent gzip framing.
//!
//! `flate2`'s `GzDecoder`/`GzEncoder` handle a real RFC-1952 gzip container
//! (header, deflate stream, CRC trailer), matching how this corpus's own
//! tools load a gzip-framed `level.dat` — see
//! `app/src-tauri/src/leveldat.rs`'s `GzDecoder::new(BufReader::new(file))`
//! pattern, which this module generalizes into a reusable read/write shim
//! instead of a one-off loader.

use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::Path;

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;

use crate::error::Result;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// How a loaded byte buffer should be classified: the first two bytes tell
/// a gzip-framed buffer apart from a plain one; the caller still has to try
/// binary vs. text on whatever comes out of `strip_gzip`.
pub(crate) fn is_gzip(bytes: &[u8]) -> bool {
    bytes.len() >= 2 && bytes[0..2] == GZIP_MAGIC
}

/// Reads an entire file into memory, unchanged.
pub(crate) fn read_file(path: impl AsRef<Path>) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    File::open(path)?.read_to_end(&mut buf)?;
    Ok(buf)
}

/// Reads an entire file into memory, inflating it first if it is
/// gzip-framed.
pub(crate) fn read_file_maybe_gzip(path: impl AsRef<Path>) -> Result<Vec<u8>> {
    let file = BufReader::new(File::open(path)?);
    decompress_if_gzip(file)
}

/// Inflates `bytes` if they are gzip-framed; returns them unchanged
/// otherwise.
pub(crate) fn maybe_gunzip(bytes: &[u8]) -> Result<Vec<u8>> {
    if is_gzip(bytes) {
        decompress_if_gzip(bytes)
    } else {
        Ok(bytes.to_vec())
    }
}

fn decompress_if_gzip(mut reader: impl Read) -> Result<Vec<u8>> {
    let mut header = [0u8; 2];
    let mut peeked = 0;
    while peeked < 2 {
        match reader.read(&mut header[peeked..])? {
            0 => break,
            n => peeked += n,
        }
    }
    let rest = header[..peeked].to_vec();
    if peeked == 2 && header == GZIP_MAGIC {
        let mut decoder = GzDecoder::new(std::io::Cursor::new(rest).chain(reader));
        let mut out = Vec::new();
        decoder.read_to_end(&mut out)?;
        Ok(out)
    } else {
        let mut out = rest;
        reader.read_to_end(&mut out)?;
        Ok(out)
    }
}

/// Writes `bytes` to a file as-is.
pub(crate) fn write_file(path: impl AsRef<Path>, bytes: &[u8]) -> Result<()> {
    File::create(path)?.write_all(bytes)
}

/// Writes `bytes` to a file, gzip-compressing them first.
pub(crate) fn write_file_gzip(path: impl AsRef<Path>, bytes: &[u8]) -> Result<()> {
    write_file(path, &gzip_buffer(bytes)?)
}

/// Gzip-compresses `bytes` into a fresh in-memory buffer.
pub(crate) fn gzip_buffer(bytes: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(bytes)?;
    Ok(encoder.finish()?)
}
