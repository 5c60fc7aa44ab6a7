//! Object key decoding policies.
//!
//! The decoder treats key handling as an injected, pure transform from the
//! decoded key text to a [`Key`]; it is applied exactly once per object key,
//! in source order, and never to non-key strings.

use alloc::{collections::BTreeSet, sync::Arc};
use core::fmt;

use crate::value::Key;

/// How object keys are turned into [`Key`] values.
#[derive(Clone, Default)]
pub enum KeyMode {
    /// Pass each key through as-is. One allocation per key occurrence.
    #[default]
    Strings,
    /// Intern keys for the duration of the parse: every occurrence of the
    /// same key text shares a single allocation. Useful for documents with
    /// many small objects repeating the same short keys.
    Intern,
    /// Admit only keys present in the given [`KeySet`]; any other key fails
    /// the parse with a token error at the key's opening quote.
    InternExisting(KeySet),
    /// A caller-supplied transform. Must be pure: the decoder may assume the
    /// result depends only on the key text.
    Custom(Arc<dyn Fn(&str) -> Key>),
}

impl fmt::Debug for KeyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyMode::Strings => f.write_str("Strings"),
            KeyMode::Intern => f.write_str("Intern"),
            KeyMode::InternExisting(set) => f.debug_tuple("InternExisting").field(set).finish(),
            KeyMode::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// A reusable set of admissible keys for [`KeyMode::InternExisting`].
///
/// # Examples
///
/// ```
/// use jsonflow::KeySet;
///
/// let set: KeySet = ["id", "name"].into_iter().collect();
/// assert!(set.contains("id"));
/// assert!(!set.contains("address"));
/// ```
#[derive(Clone, Debug, Default)]
pub struct KeySet {
    set: BTreeSet<Key>,
}

impl KeySet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a key, returning `false` if it was already present.
    pub fn insert(&mut self, key: &str) -> bool {
        if self.set.contains(key) {
            return false;
        }
        self.set.insert(Arc::from(key))
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.set.contains(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.set.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    fn get(&self, key: &str) -> Option<Key> {
        self.set.get(key).cloned()
    }
}

impl<S: AsRef<str>> FromIterator<S> for KeySet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = BTreeSet::new();
        for s in iter {
            set.insert(Arc::from(s.as_ref()));
        }
        KeySet { set }
    }
}

/// Per-parse key transform state. The cache backs [`KeyMode::Intern`] and
/// lives exactly as long as the parse.
pub(crate) struct KeyDecoder {
    mode: KeyMode,
    cache: BTreeSet<Key>,
}

impl KeyDecoder {
    pub(crate) fn new(mode: KeyMode) -> Self {
        Self {
            mode,
            cache: BTreeSet::new(),
        }
    }

    /// Transforms decoded key text into a [`Key`], or `None` when the key is
    /// not admissible under [`KeyMode::InternExisting`].
    pub(crate) fn decode(&mut self, text: &str) -> Option<Key> {
        match &self.mode {
            KeyMode::Strings => Some(Arc::from(text)),
            KeyMode::Intern => {
                if let Some(k) = self.cache.get(text) {
                    return Some(k.clone());
                }
                let k: Key = Arc::from(text);
                self.cache.insert(k.clone());
                Some(k)
            }
            KeyMode::InternExisting(set) => set.get(text),
            KeyMode::Custom(f) => Some(f(text)),
        }
    }
}
