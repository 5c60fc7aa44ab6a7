//! A streaming, allocation-aware JSON decoder.
//!
//! `jsonflow` turns a UTF-8 encoded JSON text ([RFC 8259]) into a [`Value`]
//! tree. Input may arrive as one buffer or as arbitrary fragments — splits
//! may fall anywhere, including inside a multi-byte UTF-8 sequence or a
//! `\uXXXX` escape — and every error carries the exact byte offset into the
//! logical input.
//!
//! # Examples
//!
//! Single-shot decoding:
//!
//! ```rust
//! use jsonflow::{decode_strict, Value};
//!
//! let value = decode_strict(br#"{"answer": 42}"#).unwrap();
//! if let Value::Object(map) = value {
//!     assert_eq!(map.get("answer"), Some(&Value::Integer(42)));
//! }
//! ```
//!
//! Incremental decoding:
//!
//! ```rust
//! use jsonflow::{decode_chunked, Decoded};
//!
//! match decode_chunked(["[1, 2,", " 3]"]).unwrap() {
//!     Decoded::Complete(value) => println!("{value}"),
//!     _ => unreachable!(),
//! }
//! ```
//!
//! [RFC 8259]: https://datatracker.ietf.org/doc/html/rfc8259

#![no_std]
extern crate alloc;

#[cfg(test)]
extern crate std;

mod chunk_utils;
mod decode;
mod decoder;
mod keys;
mod value;

pub use chunk_utils::{produce_chunks, produce_prefixes};
pub use decode::{
    decode, decode_chunked, decode_chunked_with, decode_strict, decode_strict_with, decode_with,
    Decoded, Resume,
};
pub use decoder::{DecodeOptions, ParseError};
pub use keys::{KeyMode, KeySet};
pub use value::{Array, Key, Map, Value};

#[cfg(test)]
mod tests;
