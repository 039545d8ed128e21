//! Handler chains.
//!
//! Every successful match produces one [`Chain`]: a queue of [`Handler`]s
//! (the router's global handlers, then the route's middleware, then its
//! terminal handler) executed one after another in continuation style.
//!
//! A handler receives the [`Request`], the chain itself and a [`Next`]
//! continuation. Calling [`Next::call`] runs the next pending handler.
//! Not calling it halts the chain; keeping it and calling it later resumes
//! the chain from where it stopped, which is how a handler waits for
//! something outside the router before letting the rest of the chain run.
//!
//! # Control flags
//!
//! | Method                                        | Effect                                    |
//! |-----------------------------------------------|-------------------------------------------|
//! | [`prevent_default`](Chain::prevent_default)   | clears `runs_default`; the chain runs on  |
//! | [`stop_propagation`](Chain::stop_propagation) | vetoes later same-path routes             |
//! | [`navigate`](Chain::navigate)                 | the router navigates once the run returns |
//!
//! # Parent linkage
//!
//! The router keeps the chain it created before this one. [`Chain::parent`]
//! returns it only when both were created for the same, non-empty path
//! value, i.e. when this chain belongs to the same navigation as its
//! predecessor. Chains created on an empty path (an empty fragment at
//! startup) never have a parent.
//!
//! # Platform notes
//!
//! [`Chain::run`] stamps the start time with [`std::time::Instant`], which
//! panics on `wasm32-unknown-unknown`. Browser hosts must target a platform
//! with a clock (e.g. `wasm32-wasi`) or run the router on the host side.
//!
//! # Example
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use waypoint_router::{compile, handler, Chain, RouteContext};
//!
//! let pattern = compile("/user/:id", false, false).unwrap();
//! let context = RouteContext::new(&pattern, pattern.parse("/user/7"));
//! let seen = Rc::new(RefCell::new(Vec::new()));
//!
//! let log = seen.clone();
//! let auth = handler(move |_req, _chain, next| {
//!     log.borrow_mut().push("auth".to_string());
//!     next.call()
//! });
//! let log = seen.clone();
//! let show = handler(move |req, _chain, _next| {
//!     log.borrow_mut().push(format!("show {}", req.param("id").unwrap_or("?")));
//!     Ok(())
//! });
//!
//! let chain = Chain::new("/user/7", context, &[]);
//! chain.enqueue([auth, show]);
//! chain.run().unwrap();
//!
//! assert_eq!(*seen.borrow(), vec!["auth", "show 7"]);
//! ```

use crate::error::HandlerResult;
use crate::matching::Request;
use crate::params::Params;
use crate::pattern::CompiledPattern;
use crate::trace_log;
use regex::Regex;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;
use std::time::Instant;

/// A step of a handler chain.
///
/// Handlers are reference-counted so the same handler can sit in the
/// router's global list, in several routes and in several queued chains.
pub type Handler = Rc<dyn Fn(&Request, &Chain, Next) -> HandlerResult>;

/// Create a [`Handler`] from a closure.
pub fn handler<F>(f: F) -> Handler
where
    F: Fn(&Request, &Chain, Next) -> HandlerResult + 'static,
{
    Rc::new(f)
}

/// What a chain knows about the route that produced it.
#[derive(Debug, Clone)]
pub struct RouteContext {
    /// The route pattern as registered.
    pub route: String,
    /// The match that triggered the chain.
    pub request: Request,
    /// The matcher the route was compiled to.
    pub regex: Regex,
}

impl RouteContext {
    /// Build a context from a compiled pattern and one of its matches.
    pub fn new(pattern: &CompiledPattern, request: Request) -> Self {
        Self {
            route: pattern.source().to_string(),
            request,
            regex: pattern.regex().clone(),
        }
    }
}

struct ChainInner {
    queue: RefCell<VecDeque<Handler>>,
    run_default: Cell<bool>,
    propagate: Cell<bool>,
    started_at: Cell<Option<Instant>>,
    value: String,
    context: RouteContext,
    previous: RefCell<Option<Chain>>,
    redirect: RefCell<Option<String>>,
}

/// One execution of a matched route.
///
/// `Chain` is a shared handle: clones refer to the same instance, so a
/// handler can keep one (or its [`Next`]) beyond its own invocation.
#[derive(Clone)]
pub struct Chain {
    inner: Rc<ChainInner>,
}

impl Chain {
    /// Create a chain for `value` (the path at creation time), seeded with a
    /// copy of `globals`.
    pub fn new(value: impl Into<String>, context: RouteContext, globals: &[Handler]) -> Self {
        Self {
            inner: Rc::new(ChainInner {
                queue: RefCell::new(globals.iter().cloned().collect()),
                run_default: Cell::new(true),
                propagate: Cell::new(true),
                started_at: Cell::new(None),
                value: value.into(),
                context,
                previous: RefCell::new(None),
                redirect: RefCell::new(None),
            }),
        }
    }

    /// Append handlers to the end of the queue.
    pub fn enqueue<I>(&self, handlers: I) -> &Self
    where
        I: IntoIterator<Item = Handler>,
    {
        let mut queue = self.inner.queue.borrow_mut();
        let before = queue.len();
        queue.extend(handlers);
        trace_log!(
            "Enqueued {} handler(s) on chain for '{}'",
            queue.len() - before,
            self.inner.value
        );
        self
    }

    /// Insert handlers at `index` of the pending queue, keeping their
    /// relative order. An index past the end appends.
    ///
    /// Index 0 is the handler that would run next.
    pub fn enqueue_at<I>(&self, handlers: I, index: usize) -> &Self
    where
        I: IntoIterator<Item = Handler>,
    {
        let mut queue = self.inner.queue.borrow_mut();
        let start = index.min(queue.len());
        let mut inserted = 0;
        for handler in handlers {
            queue.insert(start + inserted, handler);
            inserted += 1;
        }
        trace_log!(
            "Inserted {} handler(s) at {} on chain for '{}'",
            inserted,
            start,
            self.inner.value
        );
        self
    }

    /// Start the chain: record the start time and invoke the first handler.
    ///
    /// Panics on targets without a clock (see the module docs).
    pub fn run(&self) -> HandlerResult {
        self.inner.started_at.set(Some(Instant::now()));
        self.advance()
    }

    /// Invoke the next pending handler. Advancing an exhausted chain does
    /// nothing.
    pub(crate) fn advance(&self) -> HandlerResult {
        let next = self.inner.queue.borrow_mut().pop_front();
        match next {
            Some(handler) => handler(
                &self.inner.context.request,
                self,
                Next {
                    chain: self.clone(),
                },
            ),
            None => {
                trace_log!("Chain for '{}' is exhausted", self.inner.value);
                Ok(())
            }
        }
    }

    /// Mark that the router should skip its default action for this match.
    ///
    /// Handlers queued after the caller still run.
    pub fn prevent_default(&self) {
        self.inner.run_default.set(false);
    }

    /// Veto routes registered later that match the same path in this cycle.
    pub fn stop_propagation(&self) {
        self.inner.propagate.set(false);
    }

    /// `false` once [`prevent_default`](Self::prevent_default) was called.
    pub fn runs_default(&self) -> bool {
        self.inner.run_default.get()
    }

    /// `false` once [`stop_propagation`](Self::stop_propagation) was called.
    pub fn propagates(&self) -> bool {
        self.inner.propagate.get()
    }

    pub(crate) fn set_propagates(&self, propagate: bool) {
        self.inner.propagate.set(propagate);
    }

    /// Whether [`run`](Self::run) was called.
    pub fn has_started(&self) -> bool {
        self.inner.started_at.get().is_some()
    }

    /// When [`run`](Self::run) was called.
    pub fn started_at(&self) -> Option<Instant> {
        self.inner.started_at.get()
    }

    /// The path value this chain was created for.
    pub fn value(&self) -> &str {
        &self.inner.value
    }

    pub fn context(&self) -> &RouteContext {
        &self.inner.context
    }

    pub fn request(&self) -> &Request {
        &self.inner.context.request
    }

    pub fn params(&self) -> &Params {
        &self.inner.context.request.params
    }

    /// The route pattern as registered.
    pub fn route(&self) -> &str {
        &self.inner.context.route
    }

    /// Number of handlers still waiting to run.
    pub fn pending(&self) -> usize {
        self.inner.queue.borrow().len()
    }

    /// The chain created before this one by the same router, whatever its
    /// path.
    pub fn previous(&self) -> Option<Chain> {
        self.inner.previous.borrow().clone()
    }

    /// The previous chain, if it was created for the same non-empty path
    /// value.
    pub fn parent(&self) -> Option<Chain> {
        self.inner
            .previous
            .borrow()
            .as_ref()
            .filter(|previous| !previous.value().is_empty() && previous.value() == self.value())
            .cloned()
    }

    /// Ask the router to navigate to `path` once this chain's synchronous
    /// run returns. The remaining routes of the current cycle are skipped.
    ///
    /// A later call replaces an earlier one. A request made after the run
    /// returned (from a stored [`Next`]) is not picked up by the router.
    pub fn navigate(&self, path: impl Into<String>) {
        let path = path.into();
        trace_log!("Chain for '{}' requests navigation to '{}'", self.inner.value, path);
        *self.inner.redirect.borrow_mut() = Some(path);
    }

    /// The pending navigation request, if any.
    pub fn redirect_target(&self) -> Option<String> {
        self.inner.redirect.borrow().clone()
    }

    pub(crate) fn take_redirect(&self) -> Option<String> {
        self.inner.redirect.borrow_mut().take()
    }

    /// Link `previous` as this chain's predecessor. The predecessor drops
    /// its own back-reference, so only one level is ever retained.
    pub(crate) fn link_previous(&self, previous: Option<Chain>) {
        if let Some(previous) = &previous {
            previous.inner.previous.borrow_mut().take();
        }
        *self.inner.previous.borrow_mut() = previous;
    }

    /// Whether two handles refer to the same chain instance.
    pub fn ptr_eq(&self, other: &Chain) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chain")
            .field("value", &self.inner.value)
            .field("route", &self.inner.context.route)
            .field("pending", &self.pending())
            .field("run_default", &self.runs_default())
            .field("propagate", &self.propagates())
            .field("started", &self.has_started())
            .field("redirect", &self.inner.redirect.borrow())
            .finish_non_exhaustive()
    }
}

/// Continuation handed to each handler.
///
/// Consumed by [`call`](Self::call), so a handler can continue its chain at
/// most once. Dropping it without calling halts the chain.
pub struct Next {
    chain: Chain,
}

impl Next {
    /// Run the next pending handler and return its result.
    pub fn call(self) -> HandlerResult {
        self.chain.advance()
    }

    /// The chain this continuation belongs to.
    pub fn chain(&self) -> &Chain {
        &self.chain
    }
}

impl fmt::Debug for Next {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Next")
            .field("value", &self.chain.value())
            .field("pending", &self.chain.pending())
            .finish()
    }
}
