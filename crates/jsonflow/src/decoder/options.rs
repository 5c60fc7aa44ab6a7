use crate::keys::KeyMode;

/// Configuration options for a decode call.
///
/// # Default
///
/// Keys pass through as plain strings.
///
/// # Examples
///
/// ```
/// use jsonflow::{DecodeOptions, KeyMode};
///
/// let options = DecodeOptions {
///     keys: KeyMode::Intern,
/// };
/// let _ = jsonflow::decode_with(br#"{"a":1}"#, options);
/// ```
#[derive(Clone, Debug, Default)]
pub struct DecodeOptions {
    /// How object keys are materialized.
    ///
    /// One of: pass-through strings (default), per-parse interning,
    /// admit-only-known-keys, or a caller-supplied transform. See
    /// [`KeyMode`].
    pub keys: KeyMode,
}
