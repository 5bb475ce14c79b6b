//! The [`Error`] and [`Result`] types shared by every module in this crate.

use std::fmt::Display;

use crate::tag::Tag;

/// Everything that can go wrong while building, reading, or transcoding an
/// NBT document.
#[derive(Debug)]
pub enum Error {
    /// A structural rule of NBT itself was broken: an unnamed tag inside a
    /// compound, a named tag inside a list, a list that received an element
    /// of a different kind than it already committed to, or a close call
    /// that doesn't match the open container.
    StructureViolation(String),
    /// Compound/list nesting went deeper than 512 levels.
    DepthExceeded,
    /// The byte stream ran out while a payload was still being read.
    UnexpectedEnd,
    /// The SNBT tokenizer or parser could not make sense of the input.
    MalformedText(String),
    /// A reader found a tag under the requested name, but of the wrong kind.
    TypeMismatch { expected: Tag, found: Tag },
    /// A reader could not find a tag under the requested name.
    NameNotFound(String),
    /// A reader tried to pull more elements out of a list than it has.
    ListOverread,
    /// A file could not be opened, read from, or written to, or the gzip
    /// stream could not be inflated/deflated.
    Io(std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl std::error::Error for Error {}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::StructureViolation(msg) => f.write_str(msg),
            Error::DepthExceeded => {
                f.write_str("nesting depth exceeded the maximum of 512 containers")
            }
            Error::UnexpectedEnd => f.write_str("unexpected end of input while reading a tag"),
            Error::MalformedText(msg) => write!(f, "malformed SNBT text: {}", msg),
            Error::TypeMismatch { expected, found } => write!(
                f,
                "expected a tag of kind {:?}, found {:?}",
                expected, found
            ),
            Error::NameNotFound(name) => write!(f, "no tag named {:?} in current compound", name),
            Error::ListOverread => f.write_str("read past the end of the current list"),
            Error::Io(e) => write!(f, "io error: {}", e),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl Error {
    pub(crate) fn structure(msg: impl Into<String>) -> Error {
        Error::StructureViolation(msg.into())
    }

    pub(crate) fn malformed(msg: impl Into<String>) -> Error {
        Error::MalformedText(msg.into())
    }

    pub(crate) fn name_not_found(name: impl Into<String>) -> Error {
        Error::NameNotFound(name.into())
    }
}
