//! Decode entry points: single-buffer, strict single-shot, and chunked.

use alloc::borrow::Cow;
use alloc::vec::Vec;
use core::fmt;

use crate::decoder::dispatch::is_ws;
use crate::decoder::{Decoder, Step};
use crate::{DecodeOptions, ParseError, Value};

/// Outcome of a (possibly partial) decode.
#[derive(Debug)]
pub enum Decoded<'a> {
    /// A complete value with no input left over.
    Complete(Value),
    /// A complete value followed by non-whitespace input. The strict entry
    /// points turn this into a [`ParseError::TrailingData`] error.
    WithTrailing {
        value: Value,
        /// The unconsumed bytes, starting at the first non-whitespace one.
        trailing: Cow<'a, [u8]>,
    },
    /// Input ended mid-parse; feed more bytes into the [`Resume`] handle or
    /// call [`Resume::finish`] to declare end of input.
    Suspended(Resume),
}

impl Decoded<'_> {
    /// Unwraps a [`Complete`](Decoded::Complete) result.
    pub fn into_value(self) -> Option<Value> {
        match self {
            Decoded::Complete(value) => Some(value),
            _ => None,
        }
    }
}

/// A suspended parse, ready to consume the next input fragment.
///
/// Dropping the handle abandons the parse and releases all partial state.
/// Resumption is forward-only; there is no rewind.
///
/// # Examples
///
/// ```
/// use jsonflow::{decode, Decoded, Value};
///
/// let Ok(Decoded::Suspended(resume)) = decode(b"[1, 2,") else {
///     panic!("expected a continuation");
/// };
/// assert_eq!(resume.consumed(), 6);
/// let Ok(Decoded::Complete(value)) = resume.feed(b" 3]") else {
///     panic!("expected completion");
/// };
/// assert_eq!(
///     value,
///     Value::Array(vec![
///         Value::Integer(1),
///         Value::Integer(2),
///         Value::Integer(3),
///     ])
/// );
/// ```
pub struct Resume {
    decoder: Decoder,
}

impl Resume {
    /// Total bytes consumed so far. Error positions raised after a resume
    /// are offset by this automatically.
    #[must_use]
    pub fn consumed(&self) -> usize {
        self.decoder.consumed()
    }

    /// Continues the parse with the next input fragment.
    pub fn feed(self, chunk: &[u8]) -> Result<Decoded<'_>, ParseError> {
        run(self.decoder, chunk)
    }

    /// Declares end of input. A number token that may legally end here is
    /// finalized; any other in-flight token or open structure is an EOF
    /// error at the current position.
    pub fn finish(self) -> Result<Value, ParseError> {
        self.decoder.finish()
    }
}

impl fmt::Debug for Resume {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resume")
            .field("consumed", &self.consumed())
            .finish_non_exhaustive()
    }
}

fn run(mut decoder: Decoder, buf: &[u8]) -> Result<Decoded<'_>, ParseError> {
    match decoder.step(buf)? {
        Step::Done { value, rest: None } => Ok(Decoded::Complete(value)),
        Step::Done {
            value,
            rest: Some(idx),
        } => Ok(Decoded::WithTrailing {
            value,
            trailing: Cow::Borrowed(&buf[idx..]),
        }),
        Step::NeedMore => Ok(Decoded::Suspended(Resume { decoder })),
    }
}

/// Decodes a single buffer with default options.
///
/// Returns [`Decoded::Suspended`] when the buffer ends mid-parse; use
/// [`decode_strict`] when the buffer is known to hold the whole document.
///
/// # Errors
///
/// Returns a [`ParseError`] on the first byte not admitted by RFC 8259.
///
/// # Examples
///
/// ```
/// use jsonflow::{decode, Decoded, Value};
///
/// let Ok(Decoded::Complete(value)) = decode(b"[null, true]") else {
///     panic!("expected completion");
/// };
/// assert_eq!(
///     value,
///     Value::Array(vec![Value::Null, Value::Boolean(true)])
/// );
/// ```
pub fn decode(input: &[u8]) -> Result<Decoded<'_>, ParseError> {
    decode_with(input, DecodeOptions::default())
}

/// Decodes a single buffer.
///
/// # Errors
///
/// Returns a [`ParseError`] on the first byte not admitted by RFC 8259.
pub fn decode_with(input: &[u8], options: DecodeOptions) -> Result<Decoded<'_>, ParseError> {
    run(Decoder::new(options), input)
}

/// Decodes a buffer holding exactly one complete JSON document.
///
/// Trailing non-whitespace input and truncated documents become errors.
///
/// # Errors
///
/// Returns a [`ParseError`] for invalid, truncated, or trailing input.
///
/// # Examples
///
/// ```
/// use jsonflow::{decode_strict, Value};
///
/// assert_eq!(decode_strict(b"42").unwrap(), Value::Integer(42));
/// assert!(decode_strict(b"42 extra").is_err());
/// ```
pub fn decode_strict(input: &[u8]) -> Result<Value, ParseError> {
    decode_strict_with(input, DecodeOptions::default())
}

/// Decodes a buffer holding exactly one complete JSON document.
///
/// # Errors
///
/// Returns a [`ParseError`] for invalid, truncated, or trailing input.
pub fn decode_strict_with(input: &[u8], options: DecodeOptions) -> Result<Value, ParseError> {
    match decode_with(input, options)? {
        Decoded::Complete(value) => Ok(value),
        Decoded::WithTrailing { trailing, .. } => Err(ParseError::TrailingData {
            extra: trailing.into_owned(),
        }),
        Decoded::Suspended(resume) => resume.finish(),
    }
}

/// Decodes an iterable of input fragments with default options.
///
/// # Errors
///
/// Returns a [`ParseError`] on the first byte not admitted by RFC 8259;
/// positions are absolute across fragments.
///
/// # Examples
///
/// ```
/// use jsonflow::{decode_chunked, Decoded, Value};
///
/// let Ok(Decoded::Complete(value)) = decode_chunked(["[1, 2,", " 3]"]) else {
///     panic!("expected completion");
/// };
/// assert_eq!(
///     value,
///     Value::Array(vec![
///         Value::Integer(1),
///         Value::Integer(2),
///         Value::Integer(3),
///     ])
/// );
/// ```
pub fn decode_chunked<I>(chunks: I) -> Result<Decoded<'static>, ParseError>
where
    I: IntoIterator,
    I::Item: AsRef<[u8]>,
{
    decode_chunked_with(chunks, DecodeOptions::default())
}

/// Decodes an iterable of input fragments.
///
/// Empty fragments are skipped. Once the root value completes, anything
/// non-whitespace across the remaining fragments is reported as trailing
/// input; if the iterable ends mid-parse the final continuation is handed
/// back as [`Decoded::Suspended`].
///
/// # Errors
///
/// Returns a [`ParseError`] on the first byte not admitted by RFC 8259;
/// positions are absolute across fragments.
pub fn decode_chunked_with<I>(
    chunks: I,
    options: DecodeOptions,
) -> Result<Decoded<'static>, ParseError>
where
    I: IntoIterator,
    I::Item: AsRef<[u8]>,
{
    let mut decoder = Decoder::new(options);
    let mut it = chunks.into_iter();
    loop {
        let Some(chunk) = it.next() else {
            return Ok(Decoded::Suspended(Resume { decoder }));
        };
        let buf = chunk.as_ref();
        if buf.is_empty() {
            continue;
        }
        match decoder.step(buf)? {
            Step::NeedMore => {}
            Step::Done { value, rest } => {
                let mut extra: Vec<u8> = Vec::new();
                if let Some(idx) = rest {
                    extra.extend_from_slice(&buf[idx..]);
                }
                for later in it {
                    extra.extend_from_slice(later.as_ref());
                }
                return Ok(match extra.iter().position(|&b| !is_ws(b)) {
                    None => Decoded::Complete(value),
                    Some(p) => Decoded::WithTrailing {
                        value,
                        trailing: Cow::Owned(extra.split_off(p)),
                    },
                });
            }
        }
    }
}
