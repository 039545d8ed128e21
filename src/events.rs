//! Router events.
//!
//! Listeners registered with [`Router::on`](crate::Router::on) observe what
//! the router does:
//!
//! - [`EventKind::Match`] fires for every route that matched, before its
//!   chain runs. A listener may call [`Chain::prevent_default`] to cancel the
//!   dispatch of that route entirely.
//! - [`EventKind::Navigate`] fires when the application navigates or the
//!   host reports a history pop.
//! - [`EventKind::HashChange`] fires when the host reports a fragment change.

use crate::chain::Chain;
use crate::matching::Request;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Event names a listener can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Match,
    Navigate,
    HashChange,
}

/// An event delivered to listeners.
#[derive(Debug, Clone, Copy)]
pub enum RouterEvent<'a> {
    /// A route matched and its chain is about to run.
    Match {
        chain: &'a Chain,
        request: &'a Request,
    },
    /// The path changed through navigation.
    Navigate { path: &'a str },
    /// The fragment changed.
    HashChange { path: &'a str },
}

impl RouterEvent<'_> {
    pub fn kind(&self) -> EventKind {
        match self {
            RouterEvent::Match { .. } => EventKind::Match,
            RouterEvent::Navigate { .. } => EventKind::Navigate,
            RouterEvent::HashChange { .. } => EventKind::HashChange,
        }
    }
}

/// Callback invoked with each event of the kind it subscribed to.
pub type Listener = Rc<dyn Fn(&RouterEvent<'_>)>;

/// Create a [`Listener`] from a closure.
pub fn listener<F>(f: F) -> Listener
where
    F: Fn(&RouterEvent<'_>) + 'static,
{
    Rc::new(f)
}

/// Listener registry, in subscription order per kind.
#[derive(Clone, Default)]
pub(crate) struct Listeners {
    by_kind: HashMap<EventKind, Vec<Listener>>,
}

impl Listeners {
    pub(crate) fn add(&mut self, kind: EventKind, listener: Listener) {
        self.by_kind.entry(kind).or_default().push(listener);
    }

    pub(crate) fn emit(&self, event: &RouterEvent<'_>) {
        if let Some(listeners) = self.by_kind.get(&event.kind()) {
            for listener in listeners {
                listener(event);
            }
        }
    }

    pub(crate) fn count(&self, kind: EventKind) -> usize {
        self.by_kind.get(&kind).map_or(0, Vec::len)
    }
}

impl fmt::Debug for Listeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.by_kind.iter().map(|(kind, list)| (kind, list.len())))
            .finish()
    }
}
