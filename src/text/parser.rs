//! Recursive-descent parsing of SNBT source into a finished document.
//!
//! Grammar (informally):
//!
//! ```text
//! document := compound
//! compound := '{' (entry (',' entry)*)? '}'
//! entry    := name ':' value
//! value    := compound | list | string | number
//! list     := '[' (value (',' value)*)? ']'
//!           | '[B;' (byte (',' byte)*)? ']'
//!           | '[I;' (int (',' int)*)? ']'
//!           | '[L;' (long (',' long)*)? ']'
//! ```
//!
//! Every `value` production is dispatched straight into the matching
//! [`Builder`] call, the same way [`crate::binary::decode_value`] dispatches
//! off a tag byte instead of a token.

use crate::builder::Builder;
use crate::error::{Error, Result};
use crate::store::{DataStore, NamedTagIndex};
use crate::tag::Tag;

use super::{NumberLiteral, Token, Tokenizer};

pub(crate) fn parse(input: &str) -> Result<(DataStore, NamedTagIndex)> {
    let mut parser = Parser {
        tokenizer: Tokenizer::new(input),
    };
    let mut builder = Builder::new();
    parser.parse_document(&mut builder)?;
    builder.finalize()?;
    builder.into_parts()
}

struct Parser<'a> {
    tokenizer: Tokenizer<'a>,
}

impl<'a> Parser<'a> {
    fn parse_document(&mut self, b: &mut Builder) -> Result<()> {
        match self.tokenizer.next_token()? {
            Token::CompoundBegin => {}
            other => {
                return Err(Error::malformed(format!(
                    "a document must start with a compound, found {:?}",
                    other
                )))
            }
        }
        b.begin("")?;
        self.parse_compound_body(b)?;
        if !self.tokenizer.is_at_end() {
            return Err(Error::malformed("trailing characters after the root compound"));
        }
        Ok(())
    }

    /// Called with the opening `{` already consumed and the matching
    /// container frame already open on `b`.
    fn parse_compound_body(&mut self, b: &mut Builder) -> Result<()> {
        if self.tokenizer.peek_token()? == Token::CompoundEnd {
            self.tokenizer.next_token()?;
            b.end_compound()?;
            return Ok(());
        }
        loop {
            let name = self.tokenizer.read_name()?;
            self.expect(Token::NameDelim)?;
            self.parse_value(b, &name)?;
            match self.tokenizer.next_token()? {
                Token::ContainerDelim => continue,
                Token::CompoundEnd => {
                    b.end_compound()?;
                    return Ok(());
                }
                other => {
                    return Err(Error::malformed(format!(
                        "expected ',' or '}}' in a compound, found {:?}",
                        other
                    )))
                }
            }
        }
    }

    /// Called with the opening `[` already consumed, after the caller has
    /// ruled out a typed array prefix, and with the matching list frame
    /// already open on `b`.
    fn parse_list_body(&mut self, b: &mut Builder) -> Result<()> {
        if self.tokenizer.peek_token()? == Token::ListEnd {
            self.tokenizer.next_token()?;
            b.end_list()?;
            return Ok(());
        }
        loop {
            self.parse_value(b, "")?;
            match self.tokenizer.next_token()? {
                Token::ContainerDelim => continue,
                Token::ListEnd => {
                    b.end_list()?;
                    return Ok(());
                }
                other => {
                    return Err(Error::malformed(format!(
                        "expected ',' or ']' in a list, found {:?}",
                        other
                    )))
                }
            }
        }
    }

    fn parse_value(&mut self, b: &mut Builder, name: &str) -> Result<()> {
        match self.tokenizer.next_token()? {
            Token::CompoundBegin => {
                b.begin_compound(name)?;
                self.parse_compound_body(b)
            }
            Token::ListBegin => self.parse_list_or_array(b, name),
            Token::String(s) => b.write_string(name, &s),
            Token::Number(n) => self.write_number(b, name, n),
            other => Err(Error::malformed(format!("expected a value, found {:?}", other))),
        }
    }

    fn parse_list_or_array(&mut self, b: &mut Builder, name: &str) -> Result<()> {
        match self.tokenizer.try_array_prefix() {
            Some(Tag::Byte) => {
                let values = self.parse_typed_array(literal_i8)?;
                b.write_byte_array(name, &values)
            }
            Some(Tag::Int) => {
                let values = self.parse_typed_array(literal_i32)?;
                b.write_int_array(name, &values)
            }
            Some(Tag::Long) => {
                let values = self.parse_typed_array(literal_i64)?;
                b.write_long_array(name, &values)
            }
            Some(other) => unreachable!("array prefix resolved to non-array kind {:?}", other),
            None => {
                b.begin_list(name)?;
                self.parse_list_body(b)
            }
        }
    }

    fn parse_typed_array<T>(&mut self, extract: impl Fn(NumberLiteral) -> Result<T>) -> Result<Vec<T>> {
        let mut values = Vec::new();
        if self.tokenizer.peek_token()? == Token::ListEnd {
            self.tokenizer.next_token()?;
            return Ok(values);
        }
        loop {
            match self.tokenizer.next_token()? {
                Token::Number(n) => values.push(extract(n)?),
                other => {
                    return Err(Error::malformed(format!(
                        "expected a numeric array element, found {:?}",
                        other
                    )))
                }
            }
            match self.tokenizer.next_token()? {
                Token::ContainerDelim => continue,
                Token::ListEnd => return Ok(values),
                other => {
                    return Err(Error::malformed(format!(
                        "expected ',' or ']' in an array, found {:?}",
                        other
                    )))
                }
            }
        }
    }

    fn write_number(&mut self, b: &mut Builder, name: &str, n: NumberLiteral) -> Result<()> {
        match n {
            NumberLiteral::Byte(v) => b.write_byte(name, v),
            NumberLiteral::Short(v) => b.write_short(name, v),
            NumberLiteral::Int(v) => b.write_int(name, v),
            NumberLiteral::Long(v) => b.write_long(name, v),
            NumberLiteral::Float(v) => b.write_float(name, v),
            NumberLiteral::Double(v) => b.write_double(name, v),
        }
    }

    fn expect(&mut self, want: Token<'static>) -> Result<()> {
        let found = self.tokenizer.next_token()?;
        if found == want {
            Ok(())
        } else {
            Err(Error::malformed(format!("expected {:?}, found {:?}", want, found)))
        }
    }
}

/// `[B;` and `[L;` packed arrays require every element to carry the
/// matching `b`/`l` suffix; `[I;` requires the bare, unsuffixed form. Any
/// other suffix on an array element is a parse error, not a coercion.
fn literal_i8(n: NumberLiteral) -> Result<i8> {
    match n {
        NumberLiteral::Byte(v) => Ok(v),
        _ => Err(Error::malformed(
            "a byte array element must carry the 'b' suffix",
        )),
    }
}

fn literal_i32(n: NumberLiteral) -> Result<i32> {
    match n {
        NumberLiteral::Int(v) => Ok(v),
        _ => Err(Error::malformed(
            "an int array element must not carry a numeric suffix",
        )),
    }
}

fn literal_i64(n: NumberLiteral) -> Result<i64> {
    match n {
        NumberLiteral::Long(v) => Ok(v),
        _ => Err(Error::malformed(
            "a long array element must carry the 'l' suffix",
        )),
    }
}
