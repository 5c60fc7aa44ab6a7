use alloc::vec;

use crate::{produce_chunks, produce_prefixes};

#[test]
fn produce_helpers_example() {
    let payload = b"[\"foo\",\"bar\"]";
    let chunks = produce_chunks(payload, 5);
    assert_eq!(
        chunks,
        vec![
            b"[\"f".as_slice(),
            b"oo\"",
            b",\"b",
            b"ar\"",
            b"]",
        ]
    );
    let prefixes = produce_prefixes(payload, 5);
    assert_eq!(
        prefixes,
        vec![
            b"[\"f".as_slice(),
            b"[\"foo\"",
            b"[\"foo\",\"b",
            b"[\"foo\",\"bar\"",
            b"[\"foo\",\"bar\"]",
        ]
    );
}

#[test]
fn produce_chunks_cover_the_payload() {
    let payload = "[\"f\u{1F60A}o\",\"b\u{1F680}r\"]".as_bytes();
    for parts in 1..=payload.len() {
        let chunks = produce_chunks(payload, parts);
        let mut rebuilt = alloc::vec::Vec::new();
        for chunk in &chunks {
            rebuilt.extend_from_slice(chunk);
        }
        assert_eq!(rebuilt, payload);
    }
}

#[test]
fn produce_prefixes_converge() {
    let payload = b"{\"a\":[1,2,3]}";
    let prefixes = produce_prefixes(payload, 4);
    for prefix in &prefixes {
        assert_eq!(&payload[..prefix.len()], *prefix);
    }
    assert_eq!(*prefixes.last().unwrap(), payload.as_slice());
}
