//! Route parameters.
//!
//! - [`ParamKey`]: how a parameter slot is addressed: by name for `:name`
//!   segments, by position for wildcards and bare capture groups.
//! - [`ParamSpec`]: one slot of a compiled pattern's extraction plan.
//! - [`Params`]: the values bound to those slots by a match, kept in
//!   declaration order.
//!
//! # Example
//!
//! ```
//! use waypoint_router::compile;
//!
//! let pattern = compile("/files/:owner/*", false, false).unwrap();
//! let request = pattern.parse("/files/ada/notes/today.md");
//!
//! assert_eq!(request.params.get("owner"), Some("ada"));
//! assert_eq!(request.params.get_index(0), Some("notes/today.md"));
//! ```

use std::fmt;

/// Address of a parameter slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParamKey {
    /// A `:name` segment.
    Name(String),
    /// An unnamed slot, numbered among the unnamed slots of its pattern.
    Index(usize),
}

impl ParamKey {
    /// The name, if this slot is named.
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Self::Name(name) => Some(name),
            Self::Index(_) => None,
        }
    }

    /// The position, if this slot is unnamed.
    pub fn as_index(&self) -> Option<usize> {
        match self {
            Self::Name(_) => None,
            Self::Index(index) => Some(*index),
        }
    }
}

impl fmt::Display for ParamKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamKey::Name(name) => f.write_str(name),
            ParamKey::Index(index) => write!(f, "{}", index),
        }
    }
}

impl From<&str> for ParamKey {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<usize> for ParamKey {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

/// One entry of a pattern's parameter plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamSpec {
    pub key: ParamKey,
    /// Whether the slot may be absent from a matching path.
    pub optional: bool,
}

impl ParamSpec {
    pub(crate) fn named(name: impl Into<String>, optional: bool) -> Self {
        Self {
            key: ParamKey::Name(name.into()),
            optional,
        }
    }

    pub(crate) fn positional(index: usize) -> Self {
        Self {
            key: ParamKey::Index(index),
            optional: false,
        }
    }
}

/// Parameter values bound by a successful match.
///
/// Holds exactly one entry per slot of the pattern, in declaration order.
/// A slot that did not take part in the match (an optional segment that was
/// left out) is present with no value, which is distinct from a slot that
/// captured an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    entries: Vec<(ParamKey, Option<String>)>,
}

impl Params {
    /// Create an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `value` to `key`, replacing an earlier binding of the same key
    /// in place so declaration order is kept.
    pub fn insert(&mut self, key: ParamKey, value: Option<String>) {
        if let Some(slot) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            self.entries.push((key, value));
        }
    }

    /// Value of a named parameter. `None` when the name is unknown or the
    /// slot did not participate.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.lookup(|key| key.as_name() == Some(name))
    }

    /// Value of an unnamed slot.
    pub fn get_index(&self, index: usize) -> Option<&str> {
        self.lookup(|key| key.as_index() == Some(index))
    }

    /// Value of any slot.
    pub fn get_key(&self, key: &ParamKey) -> Option<&str> {
        self.lookup(|k| k == key)
    }

    /// Parse a named parameter as `T`.
    ///
    /// Returns `None` if the parameter is missing, absent, or unparsable.
    pub fn get_as<T>(&self, name: &str) -> Option<T>
    where
        T: std::str::FromStr,
    {
        self.get(name)?.parse().ok()
    }

    /// Return `true` if a slot with this name exists, whether or not it
    /// captured a value.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(k, _)| k.as_name() == Some(name))
    }

    /// Iterate over `(key, value)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&ParamKey, Option<&str>)> {
        self.entries.iter().map(|(k, v)| (k, v.as_deref()))
    }

    /// Keys in declaration order.
    pub fn keys(&self) -> impl Iterator<Item = &ParamKey> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of slots, including absent ones.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    fn lookup(&self, pred: impl Fn(&ParamKey) -> bool) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| pred(k))
            .and_then(|(_, v)| v.as_deref())
    }
}
