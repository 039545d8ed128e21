//! The router.
//!
//! [`Router`] owns the registered routes and runs one dispatch cycle per
//! trigger:
//!
//! 1. read the current path from the [`Location`] (per routing mode)
//! 2. for every route, in registration order, match the path
//! 3. on a match, build a [`Chain`] (global handlers, route middleware,
//!    terminal handler) and emit [`EventKind::Match`]
//! 4. skip the route if a match listener called
//!    [`prevent_default`](Chain::prevent_default)
//! 5. make the chain current, linking the previous one
//! 6. skip the route if the previous chain was created for the same path and
//!    stopped propagation; otherwise run the chain
//!
//! A cycle runs when a route is registered (for that route only), when the
//! application calls [`navigate`](Router::navigate), and when the host
//! reports a change with [`handle_change`](Router::handle_change) that
//! matches the configured [`Trigger`].
//!
//! A handler redirects with [`Chain::navigate`]. Once the chain's
//! synchronous run returns, the router abandons the rest of the cycle and
//! navigates to the requested path. Redirects nest at most
//! [`MAX_REDIRECT_DEPTH`] deep; a deeper request is logged and dropped.
//!
//! # Example
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use waypoint_router::{handler, Router, RouterOptions};
//!
//! let seen = Rc::new(RefCell::new(Vec::new()));
//! let mut router = Router::in_memory(RouterOptions::new());
//!
//! let log = seen.clone();
//! router
//!     .add("/books/:id", handler(move |req, _chain, _next| {
//!         log.borrow_mut().push(req.param("id").unwrap_or_default().to_string());
//!         Ok(())
//!     }))
//!     .unwrap();
//!
//! router.navigate("/books/dune").unwrap();
//! assert_eq!(router.path(), "/books/dune");
//! assert_eq!(*seen.borrow(), vec!["dune"]);
//! ```

#[cfg(feature = "cache")]
use crate::cache::{CacheStats, PatternCache};
use crate::chain::{Chain, Handler, RouteContext};
use crate::error::{HandlerResult, Result};
use crate::events::{EventKind, Listener, Listeners, RouterEvent};
use crate::location::{Location, MemoryLocation, NavigationSignal};
use crate::options::{RouterOptions, Trigger};
#[cfg(not(feature = "cache"))]
use crate::pattern::compile;
use crate::pattern::{CompiledPattern, Pattern};
use crate::{debug_log, error_log, info_log, trace_log, warn_log};
use std::fmt;
use std::iter;
use std::rc::Rc;

/// Maximum redirect depth to prevent infinite redirect loops.
pub const MAX_REDIRECT_DEPTH: usize = 5;

// ============================================================================
// RouteBinding
// ============================================================================

/// A registered route: its matcher, middleware and terminal handler.
pub struct RouteBinding {
    pattern: CompiledPattern,
    middleware: Vec<Handler>,
    handler: Handler,
}

impl RouteBinding {
    pub fn pattern(&self) -> &CompiledPattern {
        &self.pattern
    }

    /// Number of middleware handlers ahead of the terminal handler.
    pub fn middleware_len(&self) -> usize {
        self.middleware.len()
    }

    fn handlers(&self) -> impl Iterator<Item = Handler> + '_ {
        self.middleware
            .iter()
            .cloned()
            .chain(iter::once(self.handler.clone()))
    }
}

impl fmt::Debug for RouteBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteBinding")
            .field("pattern", &self.pattern.source())
            .field("middleware", &self.middleware.len())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Router
// ============================================================================

/// Path-pattern router over a [`Location`].
pub struct Router<L: Location = MemoryLocation> {
    options: RouterOptions,
    location: L,
    globals: Vec<Handler>,
    routes: Vec<Rc<RouteBinding>>,
    listeners: Listeners,
    /// The most recently created chain.
    state: Option<Chain>,
    /// Redirects currently being followed.
    redirect_depth: usize,
    #[cfg(feature = "cache")]
    cache: PatternCache,
}

impl Router<MemoryLocation> {
    /// Create a router over a fresh [`MemoryLocation`].
    pub fn in_memory(options: RouterOptions) -> Self {
        Self::new(options, MemoryLocation::new())
    }

    /// Create an in-memory router and register a flat table of
    /// `(pattern, handler)` routes, in order.
    pub fn listen<P, I>(options: RouterOptions, routes: I) -> Result<Self>
    where
        P: Into<Pattern>,
        I: IntoIterator<Item = (P, Handler)>,
    {
        let mut router = Self::in_memory(options);
        for (pattern, handler) in routes {
            router.add(pattern, handler)?;
        }
        Ok(router)
    }
}

impl<L: Location> Router<L> {
    /// Create a router over `location`. Routing mode and trigger are fixed
    /// by `options` for the router's lifetime.
    pub fn new(options: RouterOptions, location: L) -> Self {
        debug_log!(
            "Router created (push_state: {}, trigger: {:?})",
            options.push_state,
            options.trigger()
        );
        Self {
            options,
            location,
            globals: Vec::new(),
            routes: Vec::new(),
            listeners: Listeners::default(),
            state: None,
            redirect_depth: 0,
            #[cfg(feature = "cache")]
            cache: PatternCache::new(),
        }
    }

    // ========================================================================
    // Registration
    // ========================================================================

    /// Add a handler that runs first in every chain this router creates
    /// from now on.
    pub fn use_global(&mut self, handler: Handler) -> &mut Self {
        self.globals.push(handler);
        self
    }

    /// Register a route with middleware and a terminal handler, then
    /// evaluate it against the current path.
    pub fn register<P, I>(
        &mut self,
        pattern: P,
        middleware: I,
        handler: Handler,
    ) -> Result<&mut Self>
    where
        P: Into<Pattern>,
        I: IntoIterator<Item = Handler>,
    {
        let compiled = self.compile(pattern.into())?;
        let binding = Rc::new(RouteBinding {
            pattern: compiled,
            middleware: middleware.into_iter().collect(),
            handler,
        });
        info_log!(
            "Registered route '{}' ({} middleware)",
            binding.pattern.source(),
            binding.middleware.len()
        );
        self.routes.push(Rc::clone(&binding));
        if let Some(target) = self.invoke(&binding)? {
            self.follow_redirect(&target)?;
        }
        Ok(self)
    }

    /// Register a route with a terminal handler only.
    pub fn add<P>(&mut self, pattern: P, handler: Handler) -> Result<&mut Self>
    where
        P: Into<Pattern>,
    {
        self.register(pattern, iter::empty(), handler)
    }

    /// Alias for [`add`](Self::add).
    pub fn get<P>(&mut self, pattern: P, handler: Handler) -> Result<&mut Self>
    where
        P: Into<Pattern>,
    {
        self.add(pattern, handler)
    }

    /// Open a scope that registers routes under `prefix`, each preceded by
    /// `middleware`.
    pub fn context<I>(&mut self, prefix: impl Into<String>, middleware: I) -> Scope<'_, L>
    where
        I: IntoIterator<Item = Handler>,
    {
        Scope {
            router: self,
            prefix: prefix.into(),
            middleware: middleware.into_iter().collect(),
        }
    }

    #[cfg(feature = "cache")]
    fn compile(&mut self, pattern: Pattern) -> Result<CompiledPattern> {
        self.cache
            .compile(pattern, self.options.case_sensitive, self.options.strict)
    }

    #[cfg(not(feature = "cache"))]
    fn compile(&mut self, pattern: Pattern) -> Result<CompiledPattern> {
        compile(pattern, self.options.case_sensitive, self.options.strict)
    }

    // ========================================================================
    // Events
    // ========================================================================

    /// Subscribe to a router event.
    pub fn on<F>(&mut self, kind: EventKind, listener: F) -> &mut Self
    where
        F: Fn(&RouterEvent<'_>) + 'static,
    {
        let listener: Listener = Rc::new(listener);
        self.listeners.add(kind, listener);
        self
    }

    /// Alias for [`on`](Self::on).
    pub fn bind<F>(&mut self, kind: EventKind, listener: F) -> &mut Self
    where
        F: Fn(&RouterEvent<'_>) + 'static,
    {
        self.on(kind, listener)
    }

    /// Notify listeners of `kind` with the current path and, when `kind` is
    /// this router's trigger, run a dispatch cycle.
    ///
    /// [`EventKind::Match`] cannot be emitted from outside; it is ignored.
    pub fn emit(&mut self, kind: EventKind) -> HandlerResult {
        let path = self.path();
        let event = match kind {
            EventKind::Navigate => RouterEvent::Navigate { path: &path },
            EventKind::HashChange => RouterEvent::HashChange { path: &path },
            EventKind::Match => {
                trace_log!("Ignoring external emit of a match event");
                return Ok(());
            }
        };
        self.listeners.emit(&event);

        if self.triggers_on(kind) {
            self.dispatch()
        } else {
            Ok(())
        }
    }

    /// Alias for [`emit`](Self::emit).
    pub fn trigger(&mut self, kind: EventKind) -> HandlerResult {
        self.emit(kind)
    }

    /// Report a change the host observed on its own.
    pub fn handle_change(&mut self, signal: NavigationSignal) -> HandlerResult {
        trace_log!("Navigation signal {:?}", signal);
        match signal {
            NavigationSignal::HashChange => self.emit(EventKind::HashChange),
            NavigationSignal::PopState => self.emit(EventKind::Navigate),
        }
    }

    fn triggers_on(&self, kind: EventKind) -> bool {
        matches!(
            (self.options.trigger(), kind),
            (Trigger::HashChange, EventKind::HashChange)
                | (Trigger::Navigate, EventKind::Navigate)
        )
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    /// Write `path` and dispatch it.
    ///
    /// The write is not echoed back by the host, so the router raises the
    /// events a host-driven change would have raised: `navigate`, then
    /// `hashchange` in fragment mode.
    pub fn navigate(&mut self, path: &str) -> HandlerResult {
        debug_log!("Navigating to '{}'", path);
        self.set_path(path);
        self.emit(EventKind::Navigate)?;
        if self.options.trigger() == Trigger::HashChange {
            self.emit(EventKind::HashChange)?;
        }
        Ok(())
    }

    /// Run every route against the current path, in registration order.
    ///
    /// The first handler error ends the cycle and is returned; routes after
    /// the failing one are not evaluated. A redirect requested by a chain
    /// also ends the cycle, which continues on the target path.
    pub fn dispatch(&mut self) -> HandlerResult {
        let routes = self.routes.clone();
        for binding in &routes {
            if let Some(target) = self.invoke(binding)? {
                return self.follow_redirect(&target);
            }
        }
        Ok(())
    }

    fn follow_redirect(&mut self, target: &str) -> HandlerResult {
        if self.redirect_depth >= MAX_REDIRECT_DEPTH {
            warn_log!(
                "Redirect loop detected (depth {}): target '{}'",
                self.redirect_depth,
                target
            );
            return Ok(());
        }
        debug_log!("Redirecting from '{}' to '{}'", self.path(), target);

        self.redirect_depth += 1;
        let result = self.navigate(target);
        self.redirect_depth -= 1;
        result
    }

    /// Evaluate one route. Returns the redirect target if the chain asked
    /// for one during its run.
    fn invoke(&mut self, binding: &RouteBinding) -> Result<Option<String>> {
        let path = self.path();
        let request = binding.pattern.parse(&path);
        if !request.matched {
            return Ok(None);
        }
        debug_log!("Route '{}' matched '{}'", binding.pattern.source(), path);

        let chain = Chain::new(
            path.clone(),
            RouteContext::new(&binding.pattern, request.clone()),
            &self.globals,
        );
        chain.enqueue(binding.handlers());

        self.listeners.emit(&RouterEvent::Match {
            chain: &chain,
            request: &request,
        });
        if !chain.runs_default() {
            debug_log!(
                "Dispatch of '{}' cancelled by a match listener",
                binding.pattern.source()
            );
            return Ok(None);
        }

        chain.link_previous(self.state.take());
        self.state = Some(chain.clone());

        if chain.parent().is_some_and(|parent| !parent.propagates()) {
            chain.set_propagates(false);
            debug_log!(
                "Route '{}' vetoed by an earlier route on '{}'",
                binding.pattern.source(),
                path
            );
            return Ok(None);
        }

        chain.run().map_err(|err| {
            error_log!(
                "Route '{}' failed on '{}': {}",
                binding.pattern.source(),
                path,
                err
            );
            err
        })?;
        Ok(chain.take_redirect())
    }

    // ========================================================================
    // Path access
    // ========================================================================

    /// The current path, per routing mode.
    ///
    /// History mode reads the pathname without the root prefix; fragment
    /// mode reads the text after `#` (or `#!`).
    pub fn path(&self) -> String {
        if self.options.push_state {
            let pathname = self.location.pathname();
            if self.options.root.is_empty() {
                pathname
            } else {
                pathname.replacen(&self.options.root, "", 1)
            }
        } else {
            self.location
                .hash()
                .split(self.options.hash_marker())
                .nth(1)
                .unwrap_or_default()
                .to_string()
        }
    }

    /// Write `path` to the location without dispatching.
    pub fn set_path(&mut self, path: &str) -> &mut Self {
        if self.options.push_state {
            let url = format!("{}{}", self.options.root, path);
            self.location.push_state(&url);
        } else if self.options.hash_bang {
            self.location.set_hash(&format!("!{}", path));
        } else {
            self.location.set_hash(path);
        }
        self
    }

    /// Reset the location to the root (history mode) or an empty fragment.
    pub fn clear_path(&mut self) -> &mut Self {
        if self.options.push_state {
            let root = if self.options.root.is_empty() {
                "/".to_string()
            } else {
                self.options.root.clone()
            };
            self.location.push_state(&root);
        } else if self.options.hash_bang {
            self.location.set_hash("!");
        } else {
            self.location.set_hash("");
        }
        self
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn options(&self) -> &RouterOptions {
        &self.options
    }

    pub fn location(&self) -> &L {
        &self.location
    }

    /// Mutable access for hosts that drive the location directly (follow a
    /// change with [`handle_change`](Self::handle_change)).
    pub fn location_mut(&mut self) -> &mut L {
        &mut self.location
    }

    /// Registered routes, in registration order.
    pub fn routes(&self) -> &[Rc<RouteBinding>] {
        &self.routes
    }

    /// The most recently created chain.
    pub fn current_chain(&self) -> Option<&Chain> {
        self.state.as_ref()
    }

    /// Number of listeners subscribed to `kind`.
    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.listeners.count(kind)
    }

    #[cfg(feature = "cache")]
    pub fn cache_stats(&self) -> &CacheStats {
        self.cache.stats()
    }
}

impl<L: Location> fmt::Debug for Router<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("options", &self.options)
            .field("routes", &self.routes)
            .field("globals", &self.globals.len())
            .field("listeners", &self.listeners)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Scope
// ============================================================================

/// Registers routes under a common prefix with shared middleware.
///
/// Returned by [`Router::context`].
///
/// # Example
///
/// ```
/// use waypoint_router::{handler, Router, RouterOptions};
///
/// let mut router = Router::in_memory(RouterOptions::new());
/// let noop = handler(|_req, _chain, next| next.call());
/// let mut users = router.context("/users", [noop.clone()]);
/// users.add(":id", noop.clone()).unwrap();
/// users.add("/", noop).unwrap();
///
/// let patterns: Vec<_> = router
///     .routes()
///     .iter()
///     .map(|r| r.pattern().source().to_string())
///     .collect();
/// assert_eq!(patterns, vec!["/users/:id", "/users"]);
/// ```
pub struct Scope<'r, L: Location> {
    router: &'r mut Router<L>,
    prefix: String,
    middleware: Vec<Handler>,
}

impl<L: Location> Scope<'_, L> {
    /// The full pattern for `value` under this scope's prefix.
    pub fn pattern_for(&self, value: &str) -> String {
        let needs_separator = !self.prefix.ends_with('/') && value != "/" && !value.is_empty();
        let path = value.strip_prefix('/').unwrap_or(value);
        if needs_separator {
            format!("{}/{}", self.prefix, path)
        } else {
            format!("{}{}", self.prefix, path)
        }
    }

    /// Register `value` under the prefix with the scope middleware followed
    /// by `middleware`.
    pub fn register<I>(&mut self, value: &str, middleware: I, handler: Handler) -> Result<&mut Self>
    where
        I: IntoIterator<Item = Handler>,
    {
        let pattern = self.pattern_for(value);
        let handlers: Vec<Handler> = self.middleware.iter().cloned().chain(middleware).collect();
        trace_log!("Scope '{}' registering '{}'", self.prefix, pattern);
        self.router.register(pattern, handlers, handler)?;
        Ok(self)
    }

    /// Register `value` under the prefix with the scope middleware only.
    pub fn add(&mut self, value: &str, handler: Handler) -> Result<&mut Self> {
        self.register(value, iter::empty(), handler)
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}
