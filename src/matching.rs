//! Path matching against compiled patterns.
//!
//! [`CompiledPattern::parse`] applies a pattern to a candidate path and
//! produces a [`Request`]: whether the whole path matched, the raw captures,
//! and the decoded parameters keyed by name or position.
//!
//! # Design
//!
//! - The pattern is anchored, so a match always covers the whole path
//! - Captures are percent-decoded; a capture that does not decode to UTF-8
//!   keeps its raw text
//! - A capture that did not take part in the match stays `None`
//! - The candidate path is used as given (the router normalises it first)

use crate::params::{ParamKey, ParamSpec, Params};
use crate::pattern::{slot_group, CompiledPattern, SlotLayout};
use crate::warn_log;
use std::borrow::Cow;

/// Result of matching a path against a pattern.
///
/// # Example
///
/// ```
/// use waypoint_router::compile;
///
/// let pattern = compile("/user/:id", false, false).unwrap();
///
/// let request = pattern.parse("/user/42");
/// assert!(request.matched);
/// assert_eq!(request.params.get("id"), Some("42"));
///
/// let request = pattern.parse("/user/");
/// assert!(!request.matched);
/// assert!(request.params.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// The path the pattern was applied to.
    pub path: String,
    /// Whether the whole path matched.
    pub matched: bool,
    /// Raw (undecoded) captures, one per slot.
    pub captures: Vec<Option<String>>,
    /// Decoded parameters, one per slot, in declaration order.
    pub params: Params,
    /// The parameter plan of the pattern that produced this request.
    pub keys: Vec<ParamSpec>,
}

impl Request {
    fn unmatched(path: &str, keys: &[ParamSpec]) -> Self {
        Self {
            path: path.to_string(),
            matched: false,
            captures: Vec::new(),
            params: Params::new(),
            keys: keys.to_vec(),
        }
    }

    /// Value of a named parameter.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name)
    }
}

impl CompiledPattern {
    /// Match `path` against this pattern.
    ///
    /// Matching the same path twice yields equal requests.
    pub fn parse(&self, path: &str) -> Request {
        let Some(caps) = self.regex().captures(path) else {
            return Request::unmatched(path, self.keys());
        };

        let captures: Vec<Option<String>> = match self.layout {
            SlotLayout::Named => (0..self.keys().len())
                .map(|i| caps.name(&slot_group(i)).map(|m| m.as_str().to_string()))
                .collect(),
            SlotLayout::Positional => caps
                .iter()
                .skip(1)
                .map(|m| m.map(|m| m.as_str().to_string()))
                .collect(),
        };

        let mut params = Params::new();
        for (i, raw) in captures.iter().enumerate() {
            let key = self
                .keys()
                .get(i)
                .map_or(ParamKey::Index(i), |spec| spec.key.clone());
            let value = raw
                .as_deref()
                .filter(|raw| !raw.is_empty())
                .map(|raw| decode_param(&key, raw))
                .or_else(|| raw.clone());
            params.insert(key, value);
        }

        Request {
            path: path.to_string(),
            matched: true,
            captures,
            params,
            keys: self.keys().to_vec(),
        }
    }
}

/// Percent-decode one captured value, keeping the raw text if the escapes
/// do not form valid UTF-8.
fn decode_param(key: &ParamKey, raw: &str) -> String {
    match urlencoding::decode(raw) {
        Ok(Cow::Borrowed(_)) => raw.to_string(),
        Ok(Cow::Owned(decoded)) => decoded,
        Err(err) => {
            warn_log!("Parameter '{}' left undecoded ('{}'): {}", key, raw, err);
            raw.to_string()
        }
    }
}
