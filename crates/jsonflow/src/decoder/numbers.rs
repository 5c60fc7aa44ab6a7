//! Number token finalization.

use alloc::string::String;

use crate::decoder::error::ParseError;
use crate::value::Value;

/// Converts a complete number token into a [`Value`].
///
/// `float` is true when the token carried a fraction or exponent; those
/// tokens always convert to [`Value::Float`]. Integer-shaped tokens convert
/// to [`Value::Integer`], widening to a float when the magnitude exceeds
/// `i64`. A token whose value overflows the `f64` range (the parse yields an
/// infinity) is reported as a token error carrying the exact source slice,
/// anchored at the number's first byte.
pub(crate) fn convert_number(token: &[u8], start: usize, float: bool) -> Result<Value, ParseError> {
    // SAFETY: the number lexer admits only ASCII bytes (digits, '-', '+',
    // '.', 'e', 'E'), so the token is valid UTF-8.
    let text = unsafe { core::str::from_utf8_unchecked(token) };

    if !float {
        if let Ok(v) = text.parse::<i64>() {
            return Ok(Value::Integer(v));
        }
    }

    match text.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(Value::Float(v)),
        _ => Err(ParseError::InvalidToken {
            position: start,
            token: String::from(text),
        }),
    }
}
