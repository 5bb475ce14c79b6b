//! End-to-end scenarios exercising more than one component at once: a
//! "bigtest"-shaped document round-tripped through every encoding, and a
//! few structural edge cases that only show up once lists, compounds, and
//! both codecs are wired together.

use crate::builder::Builder;
use crate::error::Error;
use crate::reader::Reader;
use crate::store::{DataStore, NamedTagIndex};
use crate::writer::{PrettyPrint, Writer};

/// Builds the canonical NBT "bigtest" document shape: a flat mix of every
/// scalar kind, a nested compound, three list shapes (primitive, compound,
/// and the empty list), and all three array kinds, one of them at a size
/// (1000 bytes) large enough to exercise pool growth.
fn build_bigtest() -> Writer {
    let mut w = Writer::new();
    w.begin("Level").unwrap();
    w.write_long("longTest", 9223372036854775807).unwrap();
    w.write_short("shortTest", 32767).unwrap();
    w.write_string("stringTest", "HELLO WORLD THIS IS A TEST STRING \u{c5}\u{c4}\u{d6}!")
        .unwrap();
    w.write_float("floatTest", 0.4982315).unwrap();
    w.write_int("intTest", 2147483647).unwrap();

    w.begin_compound("nested compound test").unwrap();
    w.begin_compound("ham").unwrap();
    w.write_string("name", "Hampus").unwrap();
    w.write_float("value", 0.75).unwrap();
    w.end_compound().unwrap();
    w.begin_compound("egg").unwrap();
    w.write_string("name", "Eggbert").unwrap();
    w.write_float("value", 0.5).unwrap();
    w.end_compound().unwrap();
    w.end_compound().unwrap();

    w.begin_list("listTest (long)").unwrap();
    for v in [11i64, 12, 13, 14, 15] {
        w.write_long("", v).unwrap();
    }
    w.end_list().unwrap();

    w.begin_list("listTest (compound)").unwrap();
    for i in 0..2 {
        w.begin_compound("").unwrap();
        w.write_string("name", &format!("Compound tag #{}", i)).unwrap();
        w.write_long("created-on", 1264099775885).unwrap();
        w.end_compound().unwrap();
    }
    w.end_list().unwrap();

    w.begin_list("listTest (end)").unwrap();
    w.end_list().unwrap();

    w.write_byte("byteTest", 127).unwrap();

    let byte_array: Vec<i8> = (0..1000)
        .map(|n: i64| (((n * n * 255 + n * 7) % 100) as i8))
        .collect();
    w.write_byte_array(
        "byteArrayTest (the first 1000 values of (n*n*255+n*7)%100, starting with n=0 (0, 62, 34, 16, 8, ...))",
        &byte_array,
    )
    .unwrap();

    w.write_double("doubleTest", 0.493128713218231).unwrap();
    w.write_int_array("intArrayTest", &[66051, 67438087, 134810123, 202182159])
        .unwrap();
    w.write_long_array(
        "longArrayTest",
        &[1003370060459195070, -2401053089480183795],
    )
    .unwrap();

    w
}

/// `exact_floats` is false for the text-encoding round trip: SNBT prints
/// floats and doubles rounded to 7/15 significant digits, so a value
/// re-parsed from text is only guaranteed to match closely, not bit-for-bit,
/// whereas the binary codec never touches the bit pattern.
fn assert_bigtest_contents(r: &mut Reader, exact_floats: bool) {
    assert_eq!(r.read_long("longTest").unwrap(), 9223372036854775807);
    assert_eq!(r.read_short("shortTest").unwrap(), 32767);
    assert_eq!(
        r.read_string("stringTest").unwrap(),
        "HELLO WORLD THIS IS A TEST STRING \u{c5}\u{c4}\u{d6}!"
    );
    let float_test = r.read_float("floatTest").unwrap();
    if exact_floats {
        assert_eq!(float_test, 0.4982315);
    } else {
        assert!((float_test - 0.4982315).abs() < 1e-6);
    }
    assert_eq!(r.read_int("intTest").unwrap(), 2147483647);

    assert!(r.open_compound("nested compound test"));
    assert!(r.open_compound("ham"));
    assert_eq!(r.read_string("name").unwrap(), "Hampus");
    assert_eq!(r.read_float("value").unwrap(), 0.75);
    r.close_compound().unwrap();
    assert!(r.open_compound("egg"));
    assert_eq!(r.read_string("name").unwrap(), "Eggbert");
    assert_eq!(r.read_float("value").unwrap(), 0.5);
    r.close_compound().unwrap();
    r.close_compound().unwrap();

    assert!(r.open_list("listTest (long)"));
    assert_eq!(r.list_size().unwrap(), 5);
    for v in [11i64, 12, 13, 14, 15] {
        assert_eq!(r.read_long("").unwrap(), v);
    }
    r.close_list().unwrap();

    assert!(r.open_list("listTest (compound)"));
    assert_eq!(r.list_size().unwrap(), 2);
    for i in 0..2 {
        assert!(r.open_compound(""));
        assert_eq!(r.read_string("name").unwrap(), format!("Compound tag #{}", i));
        assert_eq!(r.read_long("created-on").unwrap(), 1264099775885);
        r.close_compound().unwrap();
    }
    r.close_list().unwrap();

    assert!(r.open_list("listTest (end)"));
    assert_eq!(r.list_size().unwrap(), 0);
    r.close_list().unwrap();

    assert_eq!(r.read_byte("byteTest").unwrap(), 127);

    let expected_byte_array: Vec<i8> = (0..1000)
        .map(|n: i64| (((n * n * 255 + n * 7) % 100) as i8))
        .collect();
    assert_eq!(
        r.read_byte_array(
            "byteArrayTest (the first 1000 values of (n*n*255+n*7)%100, starting with n=0 (0, 62, 34, 16, 8, ...))"
        )
        .unwrap(),
        expected_byte_array
    );

    let double_test = r.read_double("doubleTest").unwrap();
    if exact_floats {
        assert_eq!(double_test, 0.493128713218231);
    } else {
        assert!((double_test - 0.493128713218231).abs() < 1e-12);
    }
    assert_eq!(
        r.read_int_array("intArrayTest").unwrap(),
        vec![66051, 67438087, 134810123, 202182159]
    );
    assert_eq!(
        r.read_long_array("longArrayTest").unwrap(),
        vec![1003370060459195070, -2401053089480183795]
    );
}

#[test]
fn bigtest_round_trips_through_uncompressed_binary() {
    let mut w = build_bigtest();
    let bytes = w.export_binary_buffer().unwrap();
    let mut r = Reader::import_binary_uncompressed_buffer(&bytes).unwrap();
    assert_bigtest_contents(&mut r, true);
}

#[test]
fn bigtest_round_trips_through_gzip_binary() {
    let mut w = build_bigtest();
    let bytes = w.export_binary_buffer().unwrap();
    let gzipped = crate::transport::gzip_buffer(&bytes).unwrap();
    assert!(crate::transport::is_gzip(&gzipped));
    let mut r = Reader::import_binary_buffer(&gzipped).unwrap();
    assert_bigtest_contents(&mut r, true);
}

#[test]
fn bigtest_round_trips_through_pretty_printed_text() {
    let mut w = build_bigtest();
    let text = w.export_text_string(PrettyPrint::Enabled).unwrap();
    let mut r = Reader::import_text_buffer(&text).unwrap();
    assert_bigtest_contents(&mut r, false);
}

/// A list of lists of lists of ints, five elements deep at every level.
/// Exercises `list_storage`'s indirection for container-kind list elements
/// nested more than one level, not just the two-level case covered
/// elsewhere.
#[test]
fn triple_nested_list_round_trips_through_text() {
    let mut w = Writer::new();
    w.begin("").unwrap();
    w.begin_list("base").unwrap();
    for i in 0..5 {
        w.begin_list("").unwrap();
        for j in 0..5 {
            w.begin_list("").unwrap();
            for k in 0..5 {
                w.write_int("", 100 * i + 10 * j + k).unwrap();
            }
            w.end_list().unwrap();
        }
        w.end_list().unwrap();
    }
    w.end_list().unwrap();

    let text = w.export_text_string(PrettyPrint::Disabled).unwrap();
    let mut r = Reader::import_text_buffer(&text).unwrap();
    assert!(r.open_list("base"));
    assert_eq!(r.list_size().unwrap(), 5);
    for i in 0..5 {
        assert!(r.open_list(""));
        assert_eq!(r.list_size().unwrap(), 5);
        for j in 0..5 {
            assert!(r.open_list(""));
            assert_eq!(r.list_size().unwrap(), 5);
            for k in 0..5 {
                assert_eq!(r.read_int("").unwrap(), 100 * i + 10 * j + k);
            }
            r.close_list().unwrap();
        }
        r.close_list().unwrap();
    }
    r.close_list().unwrap();
}

/// Suffix discipline across every numeric kind, read back through the
/// reader rather than just inspected at the token level (covered
/// separately in `text::mod`'s tokenizer tests).
#[test]
fn suffix_discipline_selects_the_right_tag_kind() {
    let mut r = Reader::import_text_buffer("{x:10b,y:10s,z:10,w:10l,f:1.5f,d:1.5}").unwrap();
    assert_eq!(r.read_byte("x").unwrap(), 10);
    assert_eq!(r.read_short("y").unwrap(), 10);
    assert_eq!(r.read_int("z").unwrap(), 10);
    assert_eq!(r.read_long("w").unwrap(), 10);
    assert_eq!(r.read_float("f").unwrap(), 1.5);
    assert_eq!(r.read_double("d").unwrap(), 1.5);
}

/// Nesting to exactly the depth limit succeeds; one level deeper fails.
#[test]
fn depth_exactly_512_succeeds_and_513_fails() {
    let mut w = Writer::new();
    w.begin("").unwrap();
    for _ in 0..511 {
        w.begin_compound("c").unwrap();
    }
    // 512 frames open: the root plus 511 nested compounds.
    w.finalize().unwrap();
    assert!(w.finalized());

    let mut w2 = Writer::new();
    w2.begin("").unwrap();
    for _ in 0..511 {
        w2.begin_compound("c").unwrap();
    }
    let err = w2.begin_compound("one_too_many").unwrap_err();
    assert!(matches!(err, Error::DepthExceeded));
}

/// A negative array length in a binary document is rejected rather than
/// panicking on the subsequent slice arithmetic.
#[test]
fn negative_array_length_is_a_structure_violation() {
    let bytes = crate::test::raw_builder::RawBuilder::new()
        .start_compound("")
        .tag(crate::tag::Tag::IntArray)
        .name("bad")
        .int_payload(-1)
        .end_compound()
        .build();
    let err = Reader::import_binary_uncompressed_buffer(&bytes).unwrap_err();
    assert!(matches!(err, Error::StructureViolation(_)));
}

/// An invalid tag byte in the stream is a structure violation, not a panic.
#[test]
fn invalid_tag_byte_is_a_structure_violation() {
    let bytes = crate::test::raw_builder::RawBuilder::new()
        .start_compound("")
        .raw_bytes(&[99])
        .build();
    let err = Reader::import_binary_uncompressed_buffer(&bytes).unwrap_err();
    assert!(matches!(err, Error::StructureViolation(_)));
}

/// A store built directly (bypassing `Writer`/`Builder`'s own round-trip
/// tests) for a document containing every tag kind at least once, confirming
/// binary and text encodings agree on the same logical tree.
#[test]
fn binary_and_text_encodings_agree_on_the_same_document() {
    let (store, root) = one_of_everything();
    let mut bin = Vec::new();
    crate::binary::encode(&store, root, &mut bin).unwrap();
    let mut r1 = Reader::import_binary_uncompressed_buffer(&bin).unwrap();

    let text = crate::text::print_compact(&store, root);
    let mut r2 = Reader::import_text_buffer(&text).unwrap();

    for r in [&mut r1, &mut r2] {
        assert_eq!(r.read_byte("b").unwrap(), -5);
        assert_eq!(r.read_short("s").unwrap(), -500);
        assert_eq!(r.read_int("i").unwrap(), -50000);
        assert_eq!(r.read_long("l").unwrap(), -5000000000);
        assert_eq!(r.read_float("f").unwrap(), 1.25);
        assert_eq!(r.read_double("d").unwrap(), 2.5);
        assert_eq!(r.read_string("str").unwrap(), "hi");
        assert_eq!(r.read_byte_array("ba").unwrap(), vec![1, -2, 3]);
        assert_eq!(r.read_int_array("ia").unwrap(), vec![1, -2, 3]);
        assert_eq!(r.read_long_array("la").unwrap(), vec![1, -2, 3]);
    }
}

fn one_of_everything() -> (DataStore, NamedTagIndex) {
    let mut b = Builder::new();
    b.begin("").unwrap();
    b.write_byte("b", -5).unwrap();
    b.write_short("s", -500).unwrap();
    b.write_int("i", -50000).unwrap();
    b.write_long("l", -5000000000).unwrap();
    b.write_float("f", 1.25).unwrap();
    b.write_double("d", 2.5).unwrap();
    b.write_string("str", "hi").unwrap();
    b.write_byte_array("ba", &[1, -2, 3]).unwrap();
    b.write_int_array("ia", &[1, -2, 3]).unwrap();
    b.write_long_array("la", &[1, -2, 3]).unwrap();
    b.finalize().unwrap();
    b.into_parts().unwrap()
}
