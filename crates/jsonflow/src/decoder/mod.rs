//! The decoding state machine.
//!
//! The core is an explicit [`Decoder`] struct driven by a single
//! [`Decoder::step`] function: feed it a buffer and it either completes the
//! root value, reports an error, or suspends with every piece of in-flight
//! token state (number text, string scratch, split UTF-8 sequence, keyword
//! progress, escape digits) saved for the next buffer. Positions are absolute
//! byte offsets into the logical input; `base` carries the byte count of
//! previously consumed buffers so resumed errors need no adjustment.

pub(crate) mod dispatch;
mod error;
mod escape_buffer;
mod keywords;
mod numbers;
mod options;

use alloc::{string::String, vec::Vec};
use core::mem;

pub use error::ParseError;
pub use options::DecodeOptions;

use dispatch::{
    first_cont_range, is_continuation, is_ws, utf8_seq_len, StrClass, ValueClass, STR_CLASS,
    VALUE_CLASS,
};
use escape_buffer::{EscapeStep, UnicodeEscapeBuffer};
use keywords::{KeywordMatcher, KeywordStep};
use numbers::convert_number;

use crate::keys::KeyDecoder;
use crate::value::{Key, Map, Value};

// ------------------------------------------------------------------------------------------------
// States & frames
// ------------------------------------------------------------------------------------------------

/// Structural context: what the next significant byte is allowed to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    /// Expecting a value (root, after `[`, after `,` in an array, after `:`).
    BeforeValue,
    /// Expecting a key string or `}` inside an object.
    BeforeKey,
    /// Expecting `:` after a key.
    AfterKey,
    /// Expecting `,` or `}` after an object member value.
    AfterObjectValue,
    /// Expecting `,` or `]` after an array element.
    AfterArrayValue,
    /// Root value complete; only whitespace may remain.
    End,
}

/// Sub-token lexer state, for tokens that may suspend mid-way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LexState {
    Default,
    Sign,
    Zero,
    DecimalInteger,
    DecimalPoint,
    DecimalFraction,
    DecimalExponent,
    DecimalExponentSign,
    DecimalExponentInteger,
    String,
    StringEscape,
    StringEscapeUnicode,
    Keyword,
}

/// Stack entry – one per open container.
#[derive(Debug)]
enum Frame {
    Array(Vec<Value>),
    Object { pending: Option<Key>, map: Map },
}

/// Outcome of driving the decoder over one buffer.
pub(crate) enum Step {
    /// The root value is complete. `rest` is the offset of the first
    /// unconsumed non-whitespace byte, or `None` when the buffer was fully
    /// consumed.
    Done { value: Value, rest: Option<usize> },
    /// Buffer exhausted mid-parse; call `step` again with more input or
    /// `finish` to declare end of input.
    NeedMore,
}

// ------------------------------------------------------------------------------------------------
// Decoder
// ------------------------------------------------------------------------------------------------

pub(crate) struct Decoder {
    stack: Vec<Frame>,
    parse_state: ParseState,
    lex_state: LexState,

    /// Reusable token accumulator: number text and slow-path string bytes.
    scratch: Vec<u8>,
    /// Absolute offset of the current token's first byte.
    token_start: usize,
    /// The current number token carries a fraction or exponent.
    num_float: bool,

    keyword: KeywordMatcher,
    escape: UnicodeEscapeBuffer,

    /// Leading bytes of a UTF-8 sequence split at a buffer boundary.
    utf8_pending: [u8; 4],
    utf8_have: u8,
    utf8_need: u8,
    utf8_lead_pos: usize,

    keys: KeyDecoder,

    /// Bytes consumed in previous buffers; local offsets are shifted by this
    /// before they surface anywhere.
    base: usize,
    root: Option<Value>,
}

impl Decoder {
    pub(crate) fn new(options: DecodeOptions) -> Self {
        Self {
            stack: Vec::with_capacity(16),
            parse_state: ParseState::BeforeValue,
            lex_state: LexState::Default,
            scratch: Vec::new(),
            token_start: 0,
            num_float: false,
            keyword: KeywordMatcher::default(),
            escape: UnicodeEscapeBuffer::new(),
            utf8_pending: [0; 4],
            utf8_have: 0,
            utf8_need: 0,
            utf8_lead_pos: 0,
            keys: KeyDecoder::new(options.keys),
            base: 0,
            root: None,
        }
    }

    /// Total bytes consumed so far across every buffer.
    pub(crate) fn consumed(&self) -> usize {
        self.base
    }

    // --------------------------------------------------------------------------------------------
    // Drive
    // --------------------------------------------------------------------------------------------

    /// Consumes one buffer, resuming wherever the previous call left off.
    #[allow(clippy::too_many_lines)]
    pub(crate) fn step(&mut self, buf: &[u8]) -> Result<Step, ParseError> {
        let n = buf.len();
        let mut i = 0usize;

        loop {
            match self.lex_state {
                // ------------------------- structural -------------------------
                LexState::Default => {
                    while i < n && is_ws(buf[i]) {
                        i += 1;
                    }
                    if self.parse_state == ParseState::End {
                        let value = match self.root.take() {
                            Some(v) => v,
                            None => unreachable!("terminal state without a root value"),
                        };
                        let rest = if i < n { Some(i) } else { None };
                        return Ok(Step::Done { value, rest });
                    }
                    if i == n {
                        return self.need_more(n);
                    }
                    let b = buf[i];
                    let pos = self.base + i;
                    match self.parse_state {
                        ParseState::BeforeValue => match VALUE_CLASS[b as usize] {
                            ValueClass::ObjectOpen => {
                                i += 1;
                                self.stack.push(Frame::Object {
                                    pending: None,
                                    map: Map::new(),
                                });
                                self.parse_state = ParseState::BeforeKey;
                            }
                            ValueClass::ArrayOpen => {
                                i += 1;
                                self.stack.push(Frame::Array(Vec::new()));
                            }
                            ValueClass::ArrayClose => {
                                // Only legal directly after `[`.
                                let empty = matches!(
                                    self.stack.last(),
                                    Some(Frame::Array(items)) if items.is_empty()
                                );
                                if !empty {
                                    return Err(ParseError::UnexpectedByte {
                                        position: pos,
                                        byte: b,
                                    });
                                }
                                i += 1;
                                self.close_container();
                            }
                            ValueClass::Quote => {
                                i += 1;
                                self.token_start = pos;
                                self.scratch.clear();
                                self.lex_state = LexState::String;
                            }
                            ValueClass::Minus => {
                                i += 1;
                                self.begin_number(pos);
                                self.lex_state = LexState::Sign;
                            }
                            ValueClass::Zero => {
                                i += 1;
                                self.begin_number(pos);
                                self.lex_state = LexState::Zero;
                            }
                            ValueClass::Digit => {
                                i += 1;
                                self.begin_number(pos);
                                self.lex_state = LexState::DecimalInteger;
                            }
                            ValueClass::Keyword => {
                                i += 1;
                                self.token_start = pos;
                                self.keyword = KeywordMatcher::start(b);
                                self.lex_state = LexState::Keyword;
                            }
                            ValueClass::Ws => unreachable!("whitespace consumed above"),
                            ValueClass::Bad => {
                                return Err(ParseError::UnexpectedByte {
                                    position: pos,
                                    byte: b,
                                });
                            }
                        },

                        ParseState::BeforeKey => match b {
                            b'"' => {
                                i += 1;
                                self.token_start = pos;
                                self.scratch.clear();
                                self.lex_state = LexState::String;
                            }
                            b'}' => {
                                // Only legal directly after `{`.
                                let empty = matches!(
                                    self.stack.last(),
                                    Some(Frame::Object { pending: None, map }) if map.is_empty()
                                );
                                if !empty {
                                    return Err(ParseError::UnexpectedByte {
                                        position: pos,
                                        byte: b,
                                    });
                                }
                                i += 1;
                                self.close_container();
                            }
                            _ => {
                                return Err(ParseError::UnexpectedByte {
                                    position: pos,
                                    byte: b,
                                });
                            }
                        },

                        ParseState::AfterKey => match b {
                            b':' => {
                                i += 1;
                                self.parse_state = ParseState::BeforeValue;
                            }
                            _ => {
                                return Err(ParseError::UnexpectedByte {
                                    position: pos,
                                    byte: b,
                                });
                            }
                        },

                        ParseState::AfterObjectValue => match b {
                            b',' => {
                                i += 1;
                                self.parse_state = ParseState::BeforeKey;
                            }
                            b'}' => {
                                i += 1;
                                self.close_container();
                            }
                            _ => {
                                return Err(ParseError::UnexpectedByte {
                                    position: pos,
                                    byte: b,
                                });
                            }
                        },

                        ParseState::AfterArrayValue => match b {
                            b',' => {
                                i += 1;
                                self.parse_state = ParseState::BeforeValue;
                            }
                            b']' => {
                                i += 1;
                                self.close_container();
                            }
                            _ => {
                                return Err(ParseError::UnexpectedByte {
                                    position: pos,
                                    byte: b,
                                });
                            }
                        },

                        ParseState::End => unreachable!("handled before dispatch"),
                    }
                }

                // -------------------------- numbers ---------------------------
                LexState::Sign => {
                    if i == n {
                        return self.suspend_number(buf, n);
                    }
                    let b = buf[i];
                    match b {
                        b'0' => {
                            i += 1;
                            self.lex_state = LexState::Zero;
                        }
                        b'1'..=b'9' => {
                            i += 1;
                            self.lex_state = LexState::DecimalInteger;
                        }
                        _ => {
                            return Err(ParseError::UnexpectedByte {
                                position: self.base + i,
                                byte: b,
                            });
                        }
                    }
                }

                LexState::Zero => {
                    if i == n {
                        return self.suspend_number(buf, n);
                    }
                    match buf[i] {
                        b'.' => {
                            i += 1;
                            self.num_float = true;
                            self.lex_state = LexState::DecimalPoint;
                        }
                        b'e' | b'E' => {
                            i += 1;
                            self.num_float = true;
                            self.lex_state = LexState::DecimalExponent;
                        }
                        // A digit after `0` ends the number; the structural
                        // context then reports it (trailing data at the root,
                        // unexpected byte inside a container).
                        _ => self.finalize_number(buf, i)?,
                    }
                }

                LexState::DecimalInteger => {
                    while i < n && buf[i].is_ascii_digit() {
                        i += 1;
                    }
                    if i == n {
                        return self.suspend_number(buf, n);
                    }
                    match buf[i] {
                        b'.' => {
                            i += 1;
                            self.num_float = true;
                            self.lex_state = LexState::DecimalPoint;
                        }
                        b'e' | b'E' => {
                            i += 1;
                            self.num_float = true;
                            self.lex_state = LexState::DecimalExponent;
                        }
                        _ => self.finalize_number(buf, i)?,
                    }
                }

                LexState::DecimalPoint => {
                    if i == n {
                        return self.suspend_number(buf, n);
                    }
                    let b = buf[i];
                    if b.is_ascii_digit() {
                        i += 1;
                        self.lex_state = LexState::DecimalFraction;
                    } else {
                        return Err(ParseError::UnexpectedByte {
                            position: self.base + i,
                            byte: b,
                        });
                    }
                }

                LexState::DecimalFraction => {
                    while i < n && buf[i].is_ascii_digit() {
                        i += 1;
                    }
                    if i == n {
                        return self.suspend_number(buf, n);
                    }
                    match buf[i] {
                        b'e' | b'E' => {
                            i += 1;
                            self.lex_state = LexState::DecimalExponent;
                        }
                        _ => self.finalize_number(buf, i)?,
                    }
                }

                LexState::DecimalExponent => {
                    if i == n {
                        return self.suspend_number(buf, n);
                    }
                    let b = buf[i];
                    match b {
                        b'+' | b'-' => {
                            i += 1;
                            self.lex_state = LexState::DecimalExponentSign;
                        }
                        b'0'..=b'9' => {
                            i += 1;
                            self.lex_state = LexState::DecimalExponentInteger;
                        }
                        _ => {
                            return Err(ParseError::UnexpectedByte {
                                position: self.base + i,
                                byte: b,
                            });
                        }
                    }
                }

                LexState::DecimalExponentSign => {
                    if i == n {
                        return self.suspend_number(buf, n);
                    }
                    let b = buf[i];
                    if b.is_ascii_digit() {
                        i += 1;
                        self.lex_state = LexState::DecimalExponentInteger;
                    } else {
                        return Err(ParseError::UnexpectedByte {
                            position: self.base + i,
                            byte: b,
                        });
                    }
                }

                LexState::DecimalExponentInteger => {
                    while i < n && buf[i].is_ascii_digit() {
                        i += 1;
                    }
                    if i == n {
                        return self.suspend_number(buf, n);
                    }
                    self.finalize_number(buf, i)?;
                }

                // -------------------------- keywords --------------------------
                LexState::Keyword => loop {
                    if i == n {
                        return self.need_more(n);
                    }
                    match self.keyword.step(buf[i]) {
                        KeywordStep::Partial => i += 1,
                        KeywordStep::Complete(value) => {
                            i += 1;
                            self.complete_value(value);
                            self.lex_state = LexState::Default;
                            break;
                        }
                        KeywordStep::Mismatch => {
                            return Err(ParseError::UnexpectedByte {
                                position: self.base + i,
                                byte: buf[i],
                            });
                        }
                    }
                },

                // -------------------------- strings ---------------------------
                LexState::String => {
                    // Finish a UTF-8 sequence split at the previous buffer
                    // boundary before the run scan resumes.
                    if self.utf8_need > 0 {
                        while self.utf8_need > 0 && i < n {
                            let b = buf[i];
                            let ok = if self.utf8_have == 1 {
                                let (lo, hi) = first_cont_range(self.utf8_pending[0]);
                                b >= lo && b <= hi
                            } else {
                                is_continuation(b)
                            };
                            if !ok {
                                return Err(ParseError::UnexpectedByte {
                                    position: self.utf8_lead_pos,
                                    byte: self.utf8_pending[0],
                                });
                            }
                            self.utf8_pending[self.utf8_have as usize] = b;
                            self.utf8_have += 1;
                            self.utf8_need -= 1;
                            i += 1;
                        }
                        if self.utf8_need > 0 {
                            return self.need_more(n);
                        }
                        let have = self.utf8_have as usize;
                        let pending = self.utf8_pending;
                        self.scratch.extend_from_slice(&pending[..have]);
                        self.utf8_have = 0;
                    }

                    let run = i;
                    loop {
                        if i == n {
                            // Promote the pending run; the next buffer
                            // continues in owned mode.
                            self.scratch.extend_from_slice(&buf[run..i]);
                            return self.need_more(n);
                        }
                        let b = buf[i];
                        match STR_CLASS[b as usize] {
                            StrClass::Plain => i += 1,
                            StrClass::Quote => {
                                let tail = &buf[run..i];
                                i += 1;
                                let text = if self.scratch.is_empty() {
                                    // Fast path: the whole string is one
                                    // unescaped run in this buffer.
                                    // SAFETY: the run scan admits only ASCII
                                    // and fully validated multi-byte
                                    // sequences.
                                    String::from(unsafe {
                                        core::str::from_utf8_unchecked(tail)
                                    })
                                } else {
                                    self.scratch.extend_from_slice(tail);
                                    let bytes = mem::take(&mut self.scratch);
                                    // SAFETY: scratch only ever receives
                                    // validated runs, decoded escapes and
                                    // completed multi-byte sequences.
                                    unsafe { String::from_utf8_unchecked(bytes) }
                                };
                                self.finish_string(text)?;
                                self.lex_state = LexState::Default;
                                break;
                            }
                            StrClass::Backslash => {
                                self.scratch.extend_from_slice(&buf[run..i]);
                                i += 1;
                                self.lex_state = LexState::StringEscape;
                                break;
                            }
                            StrClass::Control | StrClass::Bad => {
                                return Err(ParseError::UnexpectedByte {
                                    position: self.base + i,
                                    byte: b,
                                });
                            }
                            StrClass::Lead2 | StrClass::Lead3 | StrClass::Lead4 => {
                                let len = utf8_seq_len(b);
                                let have = n - i;
                                if have >= len {
                                    let (lo, hi) = first_cont_range(b);
                                    let b1 = buf[i + 1];
                                    let mut ok = b1 >= lo && b1 <= hi;
                                    let mut k = 2;
                                    while k < len {
                                        ok &= is_continuation(buf[i + k]);
                                        k += 1;
                                    }
                                    if !ok {
                                        return Err(ParseError::UnexpectedByte {
                                            position: self.base + i,
                                            byte: b,
                                        });
                                    }
                                    i += len;
                                } else {
                                    // The sequence crosses the buffer end:
                                    // validate what is here, stash it, and
                                    // suspend.
                                    if have >= 2 {
                                        let (lo, hi) = first_cont_range(b);
                                        if buf[i + 1] < lo || buf[i + 1] > hi {
                                            return Err(ParseError::UnexpectedByte {
                                                position: self.base + i,
                                                byte: b,
                                            });
                                        }
                                    }
                                    if have >= 3 && !is_continuation(buf[i + 2]) {
                                        return Err(ParseError::UnexpectedByte {
                                            position: self.base + i,
                                            byte: b,
                                        });
                                    }
                                    self.scratch.extend_from_slice(&buf[run..i]);
                                    self.utf8_pending[..have].copy_from_slice(&buf[i..n]);
                                    self.utf8_have = have as u8;
                                    self.utf8_need = (len - have) as u8;
                                    self.utf8_lead_pos = self.base + i;
                                    return self.need_more(n);
                                }
                            }
                        }
                    }
                }

                LexState::StringEscape => {
                    if i == n {
                        return self.need_more(n);
                    }
                    let b = buf[i];
                    let pos = self.base + i;
                    let mapped = match b {
                        b'"' | b'\\' | b'/' => Some(b),
                        b'b' => Some(0x08),
                        b'f' => Some(0x0C),
                        b'n' => Some(b'\n'),
                        b'r' => Some(b'\r'),
                        b't' => Some(b'\t'),
                        b'u' => None,
                        _ => {
                            return Err(ParseError::UnexpectedByte {
                                position: pos,
                                byte: b,
                            });
                        }
                    };
                    i += 1;
                    match mapped {
                        Some(byte) => {
                            self.scratch.push(byte);
                            self.lex_state = LexState::String;
                        }
                        None => {
                            // The backslash is the immediately preceding
                            // consumed byte, possibly in a prior buffer.
                            self.escape.begin(pos - 1);
                            self.lex_state = LexState::StringEscapeUnicode;
                        }
                    }
                }

                LexState::StringEscapeUnicode => {
                    if i == n {
                        return self.need_more(n);
                    }
                    let pos = self.base + i;
                    match self.escape.feed(buf[i], pos) {
                        EscapeStep::NeedMore => i += 1,
                        EscapeStep::Done(c) => {
                            i += 1;
                            let mut tmp = [0u8; 4];
                            self.scratch
                                .extend_from_slice(c.encode_utf8(&mut tmp).as_bytes());
                            self.lex_state = LexState::String;
                        }
                        EscapeStep::Invalid { position, token } => {
                            return Err(ParseError::InvalidToken { position, token });
                        }
                    }
                }
            }
        }
    }

    /// Declares end of input. Number tokens in a state where the grammar may
    /// legally end are finalized; anything else still in flight is an EOF
    /// error at the current position.
    pub(crate) fn finish(mut self) -> Result<Value, ParseError> {
        match self.lex_state {
            LexState::Default => {}
            LexState::Zero
            | LexState::DecimalInteger
            | LexState::DecimalFraction
            | LexState::DecimalExponentInteger => {
                let value = convert_number(&self.scratch, self.token_start, self.num_float)?;
                self.scratch.clear();
                self.complete_value(value);
            }
            _ => return Err(ParseError::UnexpectedEof(self.base)),
        }
        if self.parse_state == ParseState::End {
            if let Some(value) = self.root.take() {
                return Ok(value);
            }
        }
        Err(ParseError::UnexpectedEof(self.base))
    }

    // --------------------------------------------------------------------------------------------
    // Completion
    // --------------------------------------------------------------------------------------------

    /// A value has finished; the top stack frame decides what that means.
    fn complete_value(&mut self, value: Value) {
        match self.stack.last_mut() {
            None => {
                self.root = Some(value);
                self.parse_state = ParseState::End;
            }
            Some(Frame::Array(items)) => {
                items.push(value);
                self.parse_state = ParseState::AfterArrayValue;
            }
            Some(Frame::Object { pending, map }) => {
                match pending.take() {
                    Some(key) => {
                        // Duplicate keys collapse to the last value written.
                        map.insert(key, value);
                    }
                    None => unreachable!("object value without a pending key"),
                }
                self.parse_state = ParseState::AfterObjectValue;
            }
        }
    }

    fn close_container(&mut self) {
        match self.stack.pop() {
            Some(Frame::Array(items)) => self.complete_value(Value::Array(items)),
            Some(Frame::Object { map, .. }) => self.complete_value(Value::Object(map)),
            None => unreachable!("close without an open container"),
        }
    }

    /// Routes a completed string to the key or value path.
    fn finish_string(&mut self, text: String) -> Result<(), ParseError> {
        if self.parse_state == ParseState::BeforeKey {
            match self.keys.decode(&text) {
                Some(key) => {
                    match self.stack.last_mut() {
                        Some(Frame::Object { pending, .. }) => *pending = Some(key),
                        _ => unreachable!("key outside an object frame"),
                    }
                    self.parse_state = ParseState::AfterKey;
                    Ok(())
                }
                None => Err(ParseError::InvalidToken {
                    position: self.token_start,
                    token: text,
                }),
            }
        } else {
            self.complete_value(Value::String(text));
            Ok(())
        }
    }

    // --------------------------------------------------------------------------------------------
    // Suspension helpers
    // --------------------------------------------------------------------------------------------

    fn begin_number(&mut self, pos: usize) {
        self.token_start = pos;
        self.scratch.clear();
        self.num_float = false;
    }

    fn need_more(&mut self, n: usize) -> Result<Step, ParseError> {
        self.base += n;
        Ok(Step::NeedMore)
    }

    /// Buffer ended inside a number token: move the pending text into the
    /// scratch so the next buffer (or `finish`) can pick it back up.
    fn suspend_number(&mut self, buf: &[u8], n: usize) -> Result<Step, ParseError> {
        let local = self.token_start.saturating_sub(self.base).min(n);
        self.scratch.extend_from_slice(&buf[local..n]);
        self.need_more(n)
    }

    /// Number token ended at `buf[end]` (exclusive) without consuming the
    /// terminating byte.
    fn finalize_number(&mut self, buf: &[u8], end: usize) -> Result<(), ParseError> {
        let local = self.token_start.saturating_sub(self.base).min(end);
        let value = if self.scratch.is_empty() {
            convert_number(&buf[local..end], self.token_start, self.num_float)?
        } else {
            self.scratch.extend_from_slice(&buf[..end]);
            let value = convert_number(&self.scratch, self.token_start, self.num_float)?;
            self.scratch.clear();
            value
        };
        self.complete_value(value);
        self.lex_state = LexState::Default;
        Ok(())
    }
}
