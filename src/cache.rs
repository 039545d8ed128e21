//! Compiled pattern caching.
//!
//! [`PatternCache`] keeps recently compiled patterns in an LRU keyed by the
//! pattern text and the compile flags, so registering the same pattern again
//! (from another [`Scope`](crate::Scope), or another router sharing the
//! cache) skips recompilation. It is gated behind the `cache` feature and
//! uses the [`lru`] crate internally.
//!
//! Pre-built regex patterns are never cached; they need no compilation.
//!
//! # Examples
//!
//! ```
//! use waypoint_router::cache::PatternCache;
//!
//! let mut cache = PatternCache::new();
//! cache.compile("/users/:id", false, false).unwrap();
//! cache.compile("/users/:id", false, false).unwrap();
//!
//! assert_eq!(cache.stats().misses, 1);
//! assert_eq!(cache.stats().hits, 1);
//! ```

use crate::error::Result;
use crate::pattern::{compile, CompiledPattern, Pattern};
use crate::{debug_log, trace_log};
use lru::LruCache;
use std::num::NonZeroUsize;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    text: String,
    alternatives: bool,
    case_sensitive: bool,
    strict: bool,
}

/// Counters tracking cache effectiveness.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
    /// Number of full invalidations (via [`PatternCache::clear`]).
    pub invalidations: usize,
}

impl CacheStats {
    /// Hit rate as a value in `0.0..=1.0`; `0.0` before any lookup.
    #[allow(clippy::cast_precision_loss)]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// LRU cache of compiled patterns. Default capacity is 256 entries.
#[derive(Debug)]
pub struct PatternCache {
    entries: LruCache<CacheKey, CompiledPattern>,
    stats: CacheStats,
}

impl PatternCache {
    const DEFAULT_CAPACITY: usize = 256;

    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Create a cache holding at most `capacity` patterns. A capacity of
    /// zero is raised to one.
    pub fn with_capacity(capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(cap),
            stats: CacheStats::default(),
        }
    }

    /// Compile `pattern`, reusing a cached result for the same text and
    /// flags.
    pub fn compile(
        &mut self,
        pattern: impl Into<Pattern>,
        case_sensitive: bool,
        strict: bool,
    ) -> Result<CompiledPattern> {
        let pattern = pattern.into();
        let key = match &pattern {
            Pattern::Regex(_) => return compile(pattern, case_sensitive, strict),
            Pattern::Path(text) => CacheKey {
                text: text.clone(),
                alternatives: false,
                case_sensitive,
                strict,
            },
            Pattern::Alternatives(items) => CacheKey {
                text: items.join("|"),
                alternatives: true,
                case_sensitive,
                strict,
            },
        };

        if let Some(compiled) = self.entries.get(&key) {
            self.stats.hits += 1;
            trace_log!("Pattern cache hit for '{}'", key.text);
            return Ok(compiled.clone());
        }

        self.stats.misses += 1;
        trace_log!("Pattern cache miss for '{}'", key.text);
        let compiled = compile(pattern, case_sensitive, strict)?;
        self.entries.push(key, compiled.clone());
        Ok(compiled)
    }

    /// Drop every entry and count an invalidation.
    pub fn clear(&mut self) {
        let removed = self.entries.len();
        self.entries.clear();
        self.stats.invalidations += 1;
        debug_log!(
            "Pattern cache cleared: {} entries removed ({} total invalidations, hit rate: {:.1}%)",
            removed,
            self.stats.invalidations,
            self.stats.hit_rate() * 100.0
        );
    }

    pub const fn stats(&self) -> &CacheStats {
        &self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = CacheStats::default();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for PatternCache {
    fn default() -> Self {
        Self::new()
    }
}
