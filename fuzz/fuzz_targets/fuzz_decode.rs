#![no_main]

use jsonflow::{decode_chunked, decode_strict, Decoded, ParseError, Value};
use libfuzzer_sys::fuzz_target;

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

fuzz_target!(|data: &[u8]| {
    let single = decode_strict(data);

    // Any partition of the input must agree with the single-buffer result,
    // including error fields and positions. Derive two cut points from the
    // input itself so the corpus explores boundary placements.
    if data.len() >= 2 {
        let a = usize::from(data[0]) % data.len();
        let b = a + usize::from(data[data.len() - 1]) % (data.len() - a).max(1);
        let chunks = [&data[..a], &data[a..b], &data[b..]];
        assert_eq!(chunked_strict(&chunks), single);
    }

    // Single-byte chunks exercise every suspension point.
    if data.len() <= 64 {
        let chunks: Vec<&[u8]> = data.chunks(1).collect();
        assert_eq!(chunked_strict(&chunks), single);
    }
});
