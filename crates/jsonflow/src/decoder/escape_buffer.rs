//! Buffering and decoding of `\uXXXX` escape sequences.
//!
//! The [`UnicodeEscapeBuffer`] collects the four hex digits of an escape one
//! byte at a time (so escapes may be split across input chunks), pairs UTF-16
//! surrogate halves into supplementary code points, and keeps the raw source
//! bytes of everything it has consumed so token errors can quote the literal
//! `\uXXXX` (or `\uXXXX\uYYYY`) slice.

use alloc::string::String;

use crate::decoder::dispatch::HEX_LUT;

/// Progress after feeding one byte into the escape buffer.
pub(crate) enum EscapeStep {
    /// Byte consumed, escape not finished yet.
    NeedMore,
    /// Escape complete; append `char` to the string.
    Done(char),
    /// Malformed or orphaned escape. `position` is the offset of the
    /// backslash the token is anchored to, `token` the literal source slice.
    Invalid { position: usize, token: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Collecting the four hex bytes of the current escape.
    Hex,
    /// A high surrogate is pending; the next byte must be `\`.
    PairBackslash,
    /// A high surrogate is pending; the next byte must be `u`.
    PairU,
}

/// State of an in-flight `\u` escape, including a pending surrogate pair.
#[derive(Debug, Clone)]
pub(crate) struct UnicodeEscapeBuffer {
    /// Source bytes consumed so far: at most `\uXXXX\uYYYY`.
    raw: [u8; 12],
    raw_len: u8,
    /// Hex bytes collected for the current escape (validated only once all
    /// four are present, so the error token always spans the full escape).
    hex_len: u8,
    high: Option<u16>,
    phase: Phase,
    /// Offset of the first backslash of the (pair of) escape(s).
    pair_start: usize,
    /// Offset of the current escape's backslash.
    cur_start: usize,
}

impl UnicodeEscapeBuffer {
    pub(crate) fn new() -> Self {
        Self {
            raw: [0; 12],
            raw_len: 0,
            hex_len: 0,
            high: None,
            phase: Phase::Hex,
            pair_start: 0,
            cur_start: 0,
        }
    }

    /// Starts a fresh escape whose backslash sits at absolute offset
    /// `backslash_pos`. The `\` and `u` bytes are recorded as already
    /// consumed by the string lexer.
    pub(crate) fn begin(&mut self, backslash_pos: usize) {
        self.raw = [0; 12];
        self.raw[0] = b'\\';
        self.raw[1] = b'u';
        self.raw_len = 2;
        self.hex_len = 0;
        self.high = None;
        self.phase = Phase::Hex;
        self.pair_start = backslash_pos;
        self.cur_start = backslash_pos;
    }

    fn push_raw(&mut self, b: u8) {
        if (self.raw_len as usize) < self.raw.len() {
            self.raw[self.raw_len as usize] = b;
            self.raw_len += 1;
        }
    }

    fn raw_token(&self, from: usize) -> String {
        String::from_utf8_lossy(&self.raw[from..self.raw_len as usize]).into_owned()
    }

    /// Feeds one source byte at absolute offset `pos`.
    pub(crate) fn feed(&mut self, b: u8, pos: usize) -> EscapeStep {
        match self.phase {
            Phase::Hex => {
                self.push_raw(b);
                self.hex_len += 1;
                if self.hex_len < 4 {
                    return EscapeStep::NeedMore;
                }
                self.finish_escape()
            }
            Phase::PairBackslash => {
                if b != b'\\' {
                    // Orphan high surrogate; quote only its own escape.
                    return EscapeStep::Invalid {
                        position: self.pair_start,
                        token: self.raw_token(0),
                    };
                }
                self.push_raw(b);
                self.cur_start = pos;
                self.phase = Phase::PairU;
                EscapeStep::NeedMore
            }
            Phase::PairU => {
                if b != b'u' {
                    let token = self.raw_token(0).trim_end_matches('\\').into();
                    return EscapeStep::Invalid {
                        position: self.pair_start,
                        token,
                    };
                }
                self.push_raw(b);
                self.hex_len = 0;
                self.phase = Phase::Hex;
                EscapeStep::NeedMore
            }
        }
    }

    /// Validates the four collected hex bytes and classifies the code unit.
    fn finish_escape(&mut self) -> EscapeStep {
        let start = self.raw_len as usize - 6;
        let mut code: u16 = 0;
        for &h in &self.raw[start + 2..self.raw_len as usize] {
            let v = HEX_LUT[h as usize];
            if v == 0xFF {
                return EscapeStep::Invalid {
                    position: self.cur_start,
                    token: self.raw_token(start),
                };
            }
            code = (code << 4) | u16::from(v);
        }

        match (self.high, code) {
            (None, 0xD800..=0xDBFF) => {
                self.high = Some(code);
                self.phase = Phase::PairBackslash;
                EscapeStep::NeedMore
            }
            (None, 0xDC00..=0xDFFF) => EscapeStep::Invalid {
                position: self.cur_start,
                token: self.raw_token(start),
            },
            (None, _) => match char::from_u32(u32::from(code)) {
                Some(c) => EscapeStep::Done(c),
                None => EscapeStep::Invalid {
                    position: self.cur_start,
                    token: self.raw_token(start),
                },
            },
            (Some(hi), 0xDC00..=0xDFFF) => {
                let cp = 0x10000
                    + (u32::from(hi) - 0xD800) * 0x400
                    + (u32::from(code) - 0xDC00);
                match char::from_u32(cp) {
                    Some(c) => EscapeStep::Done(c),
                    None => EscapeStep::Invalid {
                        position: self.pair_start,
                        token: self.raw_token(0),
                    },
                }
            }
            (Some(_), _) => EscapeStep::Invalid {
                position: self.pair_start,
                token: self.raw_token(0),
            },
        }
    }
}
