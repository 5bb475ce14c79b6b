//! Rendering a finished [`DataStore`] back to SNBT text.
//!
//! This is a plain recursive walk over the store, mirroring how
//! [`crate::binary::encode`] walks the same structure to produce bytes
//! instead of text. Two entry points cover the "Enabled"/"Disabled"
//! pretty-printing modes: [`print_compact`] emits the smallest valid text,
//! [`print_pretty`] indents nested containers one level per depth.

use crate::store::{DataStore, ListBody, NamedTagIndex, Payload, Pool};
use crate::tag::Tag;

pub(crate) fn print_compact(store: &DataStore, root: NamedTagIndex) -> String {
    let mut p = Printer {
        store,
        pretty: false,
        depth: 0,
        out: String::new(),
    };
    p.write_value(root);
    p.out
}

pub(crate) fn print_pretty(store: &DataStore, root: NamedTagIndex) -> String {
    let mut p = Printer {
        store,
        pretty: true,
        depth: 0,
        out: String::new(),
    };
    p.write_value(root);
    p.out
}

struct Printer<'a> {
    store: &'a DataStore,
    pretty: bool,
    depth: usize,
    out: String,
}

impl<'a> Printer<'a> {
    fn newline_indent(&mut self) {
        if self.pretty {
            self.out.push('\n');
            for _ in 0..self.depth {
                self.out.push_str("  ");
            }
        }
    }

    fn write_value(&mut self, idx: NamedTagIndex) {
        match &self.store.named_tags[idx].payload {
            Payload::Byte(v) => write_scalar_suffixed(&mut self.out, *v, 'b'),
            Payload::Short(v) => write_scalar_suffixed(&mut self.out, *v, 's'),
            Payload::Int(v) => write_scalar(&mut self.out, *v),
            Payload::Long(v) => write_scalar_suffixed(&mut self.out, *v, 'l'),
            Payload::Float(v) => {
                write_float32(&mut self.out, *v);
                self.out.push('f');
            }
            Payload::Double(v) => write_float64(&mut self.out, *v),
            Payload::String { pool_index, len } => {
                let bytes = &self.store.string_pool[*pool_index..*pool_index + *len as usize];
                let text = cesu8::from_java_cesu8(bytes).unwrap_or_default();
                write_quoted(&mut self.out, &text);
            }
            Payload::ByteArray { pool_index, count } => {
                let values = &self.store.byte_array_pool[*pool_index..*pool_index + *count as usize];
                self.write_typed_array("B;", values, |out, v| write_scalar_suffixed(out, *v, 'b'));
            }
            Payload::IntArray { pool_index, count } => {
                let values = &self.store.int_array_pool[*pool_index..*pool_index + *count as usize];
                self.write_typed_array("I;", values, |out, v| write_scalar(out, *v));
            }
            Payload::LongArray { pool_index, count } => {
                let values = &self.store.long_array_pool[*pool_index..*pool_index + *count as usize];
                self.write_typed_array("L;", values, |out, v| write_scalar_suffixed(out, *v, 'l'));
            }
            Payload::List {
                element_kind,
                count,
                body,
            } => self.write_list(*element_kind, *count, body),
            Payload::Compound { storage_index } => self.write_compound(*storage_index),
        }
    }

    fn write_typed_array<T: Copy>(
        &mut self,
        prefix: &str,
        values: &[T],
        mut fmt: impl FnMut(&mut String, &T),
    ) {
        self.out.push('[');
        self.out.push_str(prefix);
        for (i, v) in values.iter().enumerate() {
            if i > 0 {
                self.out.push(',');
            }
            fmt(&mut self.out, v);
        }
        self.out.push(']');
    }

    /// Writes the `i`th primitive element of a list whose element kind is a
    /// fixed-width scalar, using the same suffix convention a named tag of
    /// that kind would get.
    fn write_primitive_element(&mut self, kind: Tag, pool_index: usize, i: usize) {
        match kind {
            Tag::Byte => write_scalar_suffixed(&mut self.out, Pool::<i8>::pool(self.store)[pool_index + i], 'b'),
            Tag::Short => write_scalar_suffixed(&mut self.out, Pool::<i16>::pool(self.store)[pool_index + i], 's'),
            Tag::Int => write_scalar(&mut self.out, Pool::<i32>::pool(self.store)[pool_index + i]),
            Tag::Long => write_scalar_suffixed(&mut self.out, Pool::<i64>::pool(self.store)[pool_index + i], 'l'),
            Tag::Float => {
                write_float32(&mut self.out, Pool::<f32>::pool(self.store)[pool_index + i]);
                self.out.push('f');
            }
            Tag::Double => write_float64(&mut self.out, Pool::<f64>::pool(self.store)[pool_index + i]),
            other => unreachable!("{:?} cannot have a primitive list body", other),
        }
    }

    fn write_list(&mut self, element_kind: Tag, count: i32, body: &ListBody) {
        if count == 0 {
            self.out.push_str("[]");
            return;
        }
        self.out.push('[');
        self.depth += 1;
        match body {
            ListBody::Empty => unreachable!("a non-empty list must have a populated body"),
            ListBody::Primitive { pool_index } => {
                for i in 0..count as usize {
                    if i > 0 {
                        self.out.push(',');
                    }
                    self.newline_indent();
                    self.write_primitive_element(element_kind, *pool_index, i);
                }
            }
            ListBody::Indirect { storage_index } => {
                let children = self.store.list_storage[*storage_index].clone();
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        self.out.push(',');
                    }
                    self.newline_indent();
                    self.write_value(*child);
                }
            }
        }
        self.depth -= 1;
        self.newline_indent();
        self.out.push(']');
    }

    fn write_compound(&mut self, storage_index: usize) {
        let children = &self.store.compound_storage[storage_index];
        if children.is_empty() {
            self.out.push_str("{}");
            return;
        }
        self.out.push('{');
        self.depth += 1;
        for (i, &child) in children.iter().enumerate() {
            if i > 0 {
                self.out.push(',');
            }
            self.newline_indent();
            write_quoted(&mut self.out, &self.store.named_tags[child].name);
            self.out.push(':');
            if self.pretty {
                self.out.push(' ');
            }
            self.write_value(child);
        }
        self.depth -= 1;
        self.newline_indent();
        self.out.push('}');
    }
}

fn write_quoted(out: &mut String, s: &str) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            _ => out.push(c),
        }
    }
    out.push('"');
}

fn write_scalar<T: itoa::Integer>(out: &mut String, v: T) {
    let mut buf = itoa::Buffer::new();
    out.push_str(buf.format(v));
}

fn write_scalar_suffixed<T: itoa::Integer>(out: &mut String, v: T, suffix: char) {
    write_scalar(out, v);
    out.push(suffix);
}

/// Rounds `v` to at most `digits` significant decimal digits so that the
/// `ryu` formatting that follows doesn't print more precision than Minecraft's
/// own text writer would (7 for Float, 15 for Double).
fn round_to_significant_digits(v: f64, digits: i32) -> f64 {
    if v == 0.0 || !v.is_finite() {
        return v;
    }
    let magnitude = v.abs().log10().floor();
    let factor = 10f64.powf((digits - 1) as f64 - magnitude);
    (v * factor).round() / factor
}

fn write_float32(out: &mut String, v: f32) {
    if v.is_nan() {
        out.push_str("NaN");
    } else if v.is_infinite() {
        out.push_str(if v > 0.0 { "Infinity" } else { "-Infinity" });
    } else {
        let rounded = round_to_significant_digits(v as f64, 7) as f32;
        let mut buf = ryu::Buffer::new();
        out.push_str(buf.format(rounded));
    }
}

fn write_float64(out: &mut String, v: f64) {
    if v.is_nan() {
        out.push_str("NaN");
    } else if v.is_infinite() {
        out.push_str(if v > 0.0 { "Infinity" } else { "-Infinity" });
    } else {
        let rounded = round_to_significant_digits(v, 15);
        let mut buf = ryu::Buffer::new();
        out.push_str(buf.format(rounded));
    }
}
