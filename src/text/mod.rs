//! The SNBT ("stringified NBT") text codec (C8): a tokenizer, a
//! recursive-descent parser that drives a [`crate::builder::Builder`], and a
//! pretty-printer that walks a finished [`crate::store::DataStore`].
//!
//! This mirrors how [`crate::binary`] is split between decoding (drives a
//! `Builder`) and encoding (walks a `DataStore`), just over a `char` stream
//! instead of a byte stream, using the leaf-literal grammar in
//! [`literal`] the way this corpus's own SNBT parser builds one.

mod literal;
mod parser;
mod printer;

use std::borrow::Cow;

use crate::error::{Error, Result};
use crate::stream::Stream;
use crate::tag::Tag;

pub(crate) use parser::parse;
pub(crate) use printer::{print_compact, print_pretty};

/// A single lexical unit of SNBT. Punctuation tokens carry no data; literal
/// tokens carry the already-decoded value (quoted-string unescaping and
/// numeric-suffix dispatch both happen during tokenization, not in the
/// parser).
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Token<'a> {
    CompoundBegin,
    CompoundEnd,
    ListBegin,
    ListEnd,
    NameDelim,
    ContainerDelim,
    String(Cow<'a, str>),
    Number(NumberLiteral),
}

/// A numeric literal, already resolved to the tag kind its suffix (or lack
/// of one) selects.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum NumberLiteral {
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
}

impl NumberLiteral {
    pub(crate) fn tag(self) -> Tag {
        match self {
            NumberLiteral::Byte(_) => Tag::Byte,
            NumberLiteral::Short(_) => Tag::Short,
            NumberLiteral::Int(_) => Tag::Int,
            NumberLiteral::Long(_) => Tag::Long,
            NumberLiteral::Float(_) => Tag::Float,
            NumberLiteral::Double(_) => Tag::Double,
        }
    }
}

fn is_bareword_start(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | '+')
}

/// Turns a `&str` of SNBT source into a stream of [`Token`]s. Holds only a
/// [`Stream`], so it is cheap to clone for one-token lookahead.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Tokenizer<'a> {
    stream: Stream<'a>,
}

impl<'a> Tokenizer<'a> {
    pub(crate) fn new(input: &'a str) -> Self {
        Tokenizer {
            stream: Stream::new(input),
        }
    }

    pub(crate) fn is_at_end(&self) -> bool {
        let mut s = self.stream;
        s.skip_whitespace();
        s.is_empty()
    }

    /// Consumes and returns the next token.
    pub(crate) fn next_token(&mut self) -> Result<Token<'a>> {
        self.stream.skip_whitespace();
        let c = self
            .stream
            .peek()
            .ok_or_else(|| Error::malformed("unexpected end of input"))?;
        match c {
            '{' => {
                self.stream.matches('{');
                Ok(Token::CompoundBegin)
            }
            '}' => {
                self.stream.matches('}');
                Ok(Token::CompoundEnd)
            }
            '[' => {
                self.stream.matches('[');
                Ok(Token::ListBegin)
            }
            ']' => {
                self.stream.matches(']');
                Ok(Token::ListEnd)
            }
            ':' => {
                self.stream.matches(':');
                Ok(Token::NameDelim)
            }
            ',' => {
                self.stream.matches(',');
                Ok(Token::ContainerDelim)
            }
            '"' | '\'' => {
                let (rest, s) = literal::parse_str(self.stream.rest())
                    .map_err(|_| Error::malformed("unterminated quoted string"))?;
                self.stream.set_rest(rest);
                Ok(Token::String(s))
            }
            _ => self.read_number_or_bareword(),
        }
    }

    /// Peeks the next token without consuming it.
    pub(crate) fn peek_token(&self) -> Result<Token<'a>> {
        let mut clone = *self;
        clone.next_token()
    }

    /// Called right after a `[` has been consumed: if the remaining input
    /// starts with `B;`, `I;`, or `L;`, consumes it and returns the array's
    /// element kind. Otherwise leaves the stream untouched.
    pub(crate) fn try_array_prefix(&mut self) -> Option<Tag> {
        let mut probe = self.stream;
        probe.skip_whitespace();
        for (prefix, kind) in [("B;", Tag::Byte), ("I;", Tag::Int), ("L;", Tag::Long)] {
            if probe.matches_str(prefix) {
                self.stream = probe;
                return Some(kind);
            }
        }
        None
    }

    /// A compound key or any other bare/quoted name. Unlike a value
    /// position, a name is always text, even when every character in it is
    /// a digit.
    pub(crate) fn read_name(&mut self) -> Result<Cow<'a, str>> {
        self.stream.skip_whitespace();
        match self.stream.peek() {
            Some('"') | Some('\'') => {
                let (rest, s) = literal::parse_str(self.stream.rest())
                    .map_err(|_| Error::malformed("unterminated quoted name"))?;
                self.stream.set_rest(rest);
                Ok(s)
            }
            Some(c) if is_bareword_start(c) => {
                let (rest, word) = literal::parse_bare_word(self.stream.rest())
                    .map_err(|_| Error::malformed("expected a tag name"))?;
                self.stream.set_rest(rest);
                Ok(Cow::from(word))
            }
            _ => Err(Error::malformed("expected a tag name")),
        }
    }

    fn read_number_or_bareword(&mut self) -> Result<Token<'a>> {
        let (rest, word) = literal::parse_bare_word(self.stream.rest())
            .map_err(|_| Error::malformed("unexpected character in SNBT input"))?;
        self.stream.set_rest(rest);

        if let Ok((leftover, b)) = literal::parse_bool(word) {
            if leftover.is_empty() {
                return Ok(Token::Number(NumberLiteral::Byte(b as i8)));
            }
        }

        macro_rules! try_numeric {
            ($parser:path, $variant:ident) => {
                if let Ok((leftover, v)) = $parser(word) {
                    if leftover.is_empty() {
                        return Ok(Token::Number(NumberLiteral::$variant(v)));
                    }
                }
            };
        }
        try_numeric!(literal::parse_i8, Byte);
        try_numeric!(literal::parse_i16, Short);
        try_numeric!(literal::parse_i64, Long);
        try_numeric!(literal::parse_f32, Float);
        try_numeric!(literal::parse_f64, Double);
        try_numeric!(literal::parse_i32, Int);
        Ok(Token::String(Cow::from(word)))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn tokens(input: &str) -> Vec<Token<'_>> {
        let mut t = Tokenizer::new(input);
        let mut out = Vec::new();
        while !t.is_at_end() {
            out.push(t.next_token().unwrap());
        }
        out
    }

    #[test]
    fn tokenizes_punctuation() {
        assert_eq!(
            tokens("{}[]:,"),
            vec![
                Token::CompoundBegin,
                Token::CompoundEnd,
                Token::ListBegin,
                Token::ListEnd,
                Token::NameDelim,
                Token::ContainerDelim,
            ]
        );
    }

    #[test]
    fn tokenizes_suffixed_numbers() {
        assert_eq!(
            tokens("5b, 5s, 5, 5l, 5.0f, 5.0"),
            vec![
                Token::Number(NumberLiteral::Byte(5)),
                Token::ContainerDelim,
                Token::Number(NumberLiteral::Short(5)),
                Token::ContainerDelim,
                Token::Number(NumberLiteral::Int(5)),
                Token::ContainerDelim,
                Token::Number(NumberLiteral::Long(5)),
                Token::ContainerDelim,
                Token::Number(NumberLiteral::Float(5.0)),
                Token::ContainerDelim,
                Token::Number(NumberLiteral::Double(5.0)),
            ]
        );
    }

    #[test]
    fn a_pure_digit_bareword_tokenizes_as_a_number_but_reads_as_a_name() {
        let mut t = Tokenizer::new("123: 1");
        assert_eq!(t.read_name().unwrap(), "123");
        assert_eq!(t.next_token().unwrap(), Token::NameDelim);
        assert_eq!(t.next_token().unwrap(), Token::Number(NumberLiteral::Int(1)));
    }

    #[test]
    fn array_prefix_is_detected_only_with_the_semicolon() {
        let mut t = Tokenizer::new("[B;1b,2b]");
        assert_eq!(t.next_token().unwrap(), Token::ListBegin);
        assert_eq!(t.try_array_prefix(), Some(Tag::Byte));

        let mut t2 = Tokenizer::new("[Banana]");
        assert_eq!(t2.next_token().unwrap(), Token::ListBegin);
        assert_eq!(t2.try_array_prefix(), None);
    }
}
