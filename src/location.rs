//! Navigation substrate boundary.
//!
//! The router never talks to a browser (or any other host) directly. It reads
//! and writes the current location through the [`Location`] trait and is told
//! about externally caused changes through [`Router::handle_change`] with a
//! [`NavigationSignal`].
//!
//! Writes made by the router are never reported back as signals: only changes
//! the host did not ask the router to make (a user editing the fragment, a
//! history pop) re-trigger matching.
//!
//! [`MemoryLocation`] is an in-memory host: a pathname, a fragment and a
//! session history with [`back`](MemoryLocation::back) /
//! [`forward`](MemoryLocation::forward). It serves headless hosts, servers
//! and tests.
//!
//! [`Router::handle_change`]: crate::Router::handle_change

use crate::trace_log;

/// Change notifications a host reports to the router.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavigationSignal {
    /// The fragment changed (hash routing).
    HashChange,
    /// A history entry was popped (back/forward).
    PopState,
}

/// Read and write access to the host's current location.
pub trait Location {
    /// The path part of the current address, e.g. `/app/users`.
    fn pathname(&self) -> String;

    /// The fragment including its leading `#`, or an empty string.
    fn hash(&self) -> String;

    /// Replace the fragment. `fragment` excludes the leading `#`.
    fn set_hash(&mut self, fragment: &str);

    /// Push a new history entry with the given pathname.
    fn push_state(&mut self, url: &str);
}

impl<L: Location + ?Sized> Location for Box<L> {
    fn pathname(&self) -> String {
        (**self).pathname()
    }

    fn hash(&self) -> String {
        (**self).hash()
    }

    fn set_hash(&mut self, fragment: &str) {
        (**self).set_hash(fragment);
    }

    fn push_state(&mut self, url: &str) {
        (**self).push_state(url);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    pathname: String,
    hash: String,
}

/// In-memory [`Location`] with a browser-like session history.
///
/// # Example
///
/// ```
/// use waypoint_router::{Location, MemoryLocation};
///
/// let mut location = MemoryLocation::new();
/// location.push_state("/users");
/// location.set_hash("/tab");
/// assert_eq!(location.pathname(), "/users");
/// assert_eq!(location.hash(), "#/tab");
///
/// assert!(location.back());
/// assert_eq!(location.hash(), "");
/// ```
#[derive(Debug, Clone)]
pub struct MemoryLocation {
    entries: Vec<Entry>,
    current: usize,
}

impl MemoryLocation {
    /// Start at `/` with no fragment.
    pub fn new() -> Self {
        Self::at("/")
    }

    /// Start at the given pathname.
    pub fn at(pathname: impl Into<String>) -> Self {
        Self {
            entries: vec![Entry {
                pathname: pathname.into(),
                hash: String::new(),
            }],
            current: 0,
        }
    }

    fn entry(&self) -> &Entry {
        &self.entries[self.current]
    }

    fn push(&mut self, entry: Entry) {
        self.entries.truncate(self.current + 1);
        self.entries.push(entry);
        self.current += 1;
    }

    /// Step back in history. Returns `false` at the first entry.
    ///
    /// The host is expected to follow a successful step with
    /// [`NavigationSignal::PopState`].
    pub fn back(&mut self) -> bool {
        if self.current > 0 {
            self.current -= 1;
            trace_log!("Memory history back to {:?}", self.entry());
            true
        } else {
            false
        }
    }

    /// Step forward in history. Returns `false` at the last entry.
    pub fn forward(&mut self) -> bool {
        if self.current + 1 < self.entries.len() {
            self.current += 1;
            trace_log!("Memory history forward to {:?}", self.entry());
            true
        } else {
            false
        }
    }

    /// Number of history entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for MemoryLocation {
    fn default() -> Self {
        Self::new()
    }
}

impl Location for MemoryLocation {
    fn pathname(&self) -> String {
        self.entry().pathname.clone()
    }

    fn hash(&self) -> String {
        let hash = &self.entry().hash;
        if hash.is_empty() {
            String::new()
        } else {
            format!("#{}", hash)
        }
    }

    fn set_hash(&mut self, fragment: &str) {
        let fragment = fragment.strip_prefix('#').unwrap_or(fragment);
        let pathname = self.entry().pathname.clone();
        self.push(Entry {
            pathname,
            hash: fragment.to_string(),
        });
    }

    fn push_state(&mut self, url: &str) {
        self.push(Entry {
            pathname: url.to_string(),
            hash: String::new(),
        });
    }
}
