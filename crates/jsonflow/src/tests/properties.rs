use alloc::string::{String, ToString};
use alloc::vec::Vec;

use quickcheck::{Arbitrary, Gen, QuickCheck};

use crate::{decode_chunked, decode_strict, Decoded, Map, ParseError, Value};

/// Generator for float-free values, so the `Display` encoding is canonical
/// and `decode(encode(v)) == v` holds exactly.
fn arbitrary_value(g: &mut Gen, depth: usize) -> Value {
    let variants = if depth == 0 { 4 } else { 6 };
    match u8::arbitrary(g) % variants {
        0 => Value::Null,
        1 => Value::Boolean(bool::arbitrary(g)),
        2 => Value::Integer(i64::arbitrary(g)),
        3 => Value::String(String::arbitrary(g)),
        4 => {
            let len = usize::arbitrary(g) % 4;
            Value::Array((0..len).map(|_| arbitrary_value(g, depth - 1)).collect())
        }
        _ => {
            let len = usize::arbitrary(g) % 4;
            let mut map = Map::new();
            for _ in 0..len {
                let key = String::arbitrary(g);
                map.insert(key.into(), arbitrary_value(g, depth - 1));
            }
            Value::Object(map)
        }
    }
}

impl Arbitrary for Value {
    fn arbitrary(g: &mut Gen) -> Self {
        arbitrary_value(g, 3)
    }
}

/// Split `payload` into chunks whose sizes are derived from `splits`,
/// covering the whole input.
fn partition<'a>(payload: &'a [u8], splits: &[usize]) -> Vec<&'a [u8]> {
    let mut chunks = Vec::new();
    let mut start = 0;
    for &s in splits {
        let remaining = payload.len() - start;
        if remaining == 0 {
            break;
        }
        let size = 1 + s % remaining;
        chunks.push(&payload[start..start + size]);
        start += size;
    }
    if start < payload.len() {
        chunks.push(&payload[start..]);
    }
    chunks
}

/// Chunked decoding finalized the way a caller with a finite stream would.
fn chunked_strict(chunks: &[&[u8]]) -> Result<Value, ParseError> {
    match decode_chunked(chunks.iter().copied())? {
        Decoded::Complete(value) => Ok(value),
        Decoded::WithTrailing { trailing, .. } => Err(ParseError::TrailingData {
            extra: trailing.into_owned(),
        }),
        Decoded::Suspended(resume) => resume.finish(),
    }
}

/// Property: `decode(encode(v)) == v` for float-free values.
#[test]
fn roundtrip_through_encoder_quickcheck() {
    fn prop(value: Value) -> bool {
        let encoded = value.to_string();
        decode_strict(encoded.as_bytes()) == Ok(value)
    }

    QuickCheck::new()
        .tests(500)
        .quickcheck(prop as fn(Value) -> bool);
}

/// Property: decoding a document in arbitrary chunk sizes yields the same
/// value as decoding it in one buffer.
#[test]
fn partition_equivalence_quickcheck() {
    fn prop(value: Value, splits: Vec<usize>) -> bool {
        let encoded = value.to_string();
        let payload = encoded.as_bytes();
        let chunks = partition(payload, &splits);
        chunked_strict(&chunks) == Ok(value)
    }

    QuickCheck::new()
        .tests(500)
        .quickcheck(prop as fn(Value, Vec<usize>) -> bool);
}

/// Property: for *arbitrary* bytes — valid or not — chunked decoding agrees
/// with single-buffer decoding, including the error fields and positions.
#[test]
fn chunked_errors_match_single_buffer_quickcheck() {
    fn prop(bytes: Vec<u8>, splits: Vec<usize>) -> bool {
        let single = decode_strict(&bytes);
        let chunks = partition(&bytes, &splits);
        chunked_strict(&chunks) == single
    }

    QuickCheck::new()
        .tests(500)
        .quickcheck(prop as fn(Vec<u8>, Vec<usize>) -> bool);
}

/// Property: two independent parses of the same input produce identical
/// results.
#[test]
fn determinism_quickcheck() {
    fn prop(bytes: Vec<u8>) -> bool {
        decode_strict(&bytes) == decode_strict(&bytes)
    }

    QuickCheck::new()
        .tests(200)
        .quickcheck(prop as fn(Vec<u8>) -> bool);
}

/// Property: padding a document with whitespace around the root leaves the
/// decoded value unchanged.
#[test]
fn whitespace_padding_quickcheck() {
    fn prop(value: Value, pad: (u8, u8)) -> bool {
        let ws = [b' ', b'\t', b'\n', b'\r'];
        let mut padded = Vec::new();
        for _ in 0..usize::from(pad.0 % 4) {
            padded.push(ws[usize::from(pad.0) % ws.len()]);
        }
        padded.extend_from_slice(value.to_string().as_bytes());
        for _ in 0..usize::from(pad.1 % 4) {
            padded.push(ws[usize::from(pad.1) % ws.len()]);
        }
        decode_strict(&padded) == Ok(value)
    }

    QuickCheck::new()
        .tests(300)
        .quickcheck(prop as fn(Value, (u8, u8)) -> bool);
}

/// Every decoded string is well-formed UTF-8 by construction (`String`), but
/// make sure raw multi-byte input survives a chunk split at every offset.
#[test]
fn multibyte_content_survives_every_split() {
    let payload = "\"π ☃ 😀 déjà\"".as_bytes();
    let expected = decode_strict(payload).unwrap();
    for cut in 1..payload.len() {
        let chunks = [&payload[..cut], &payload[cut..]];
        assert_eq!(chunked_strict(&chunks).unwrap(), expected, "cut at {cut}");
    }
}
