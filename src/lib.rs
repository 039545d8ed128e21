//! # waypoint-router
//!
//! A path-pattern router. Routes are registered as patterns with handler
//! chains; on every navigation the current path is matched against each
//! route in registration order and the chains of the matching routes run.
//!
//! ## Features
//!
//! - Express-style patterns: `:name`, optional `:name?`, custom captures
//!   `:name(\d+)`, wildcards `*`, alternatives and raw regular expressions
//! - Continuation-style handler chains with global handlers, per-route
//!   middleware and late insertion
//! - Cancellation (`prevent_default`) and cross-route vetoes
//!   (`stop_propagation`) between routes matching the same path
//! - Fragment (`#/path`, `#!/path`) and history (`pushState`) routing over a
//!   pluggable [`Location`]
//! - Router events for `match`, `navigate` and `hashchange`
//! - Optional LRU cache of compiled patterns (`cache` feature)
//!
//! ## Quick Start
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use waypoint_router::{handler, Router, RouterOptions};
//!
//! let visits = Rc::new(RefCell::new(Vec::new()));
//! let mut router = Router::in_memory(RouterOptions::new());
//!
//! // Runs first in every chain
//! router.use_global(handler(|_req, _chain, next| next.call()));
//!
//! let log = visits.clone();
//! router
//!     .add("/store/:category/:item?", handler(move |req, _chain, _next| {
//!         log.borrow_mut().push(format!(
//!             "{}:{}",
//!             req.param("category").unwrap_or_default(),
//!             req.param("item").unwrap_or("-"),
//!         ));
//!         Ok(())
//!     }))
//!     .unwrap();
//!
//! router.navigate("/store/books").unwrap();
//! router.navigate("/store/books/dune").unwrap();
//! assert_eq!(*visits.borrow(), vec!["books:-", "books:dune"]);
//! ```
//!
//! ## Modules
//!
//! | Module       | Contents                                             |
//! |--------------|------------------------------------------------------|
//! | [`pattern`]  | pattern text to anchored regex compilation           |
//! | [`matching`] | applying a compiled pattern to a path                |
//! | [`params`]   | parameter keys and extracted values                  |
//! | [`chain`]    | handler chains and continuations                     |
//! | [`router`]   | registration, dispatch and path access               |
//! | [`location`] | host location boundary and an in-memory host         |
//! | [`options`]  | router configuration                                 |
//! | [`events`]   | router events and listeners                          |
//! | [`error`]    | error type                                           |
//! | `cache`      | compiled pattern LRU (feature `cache`)               |
//!
//! ## Logging
//!
//! The crate logs through `log` (default) or `tracing` (feature) under the
//! `waypoint_router` target. See [`logging`].

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod logging;

#[cfg(feature = "cache")]
#[cfg_attr(docsrs, doc(cfg(feature = "cache")))]
pub mod cache;
pub mod chain;
pub mod error;
pub mod events;
pub mod location;
pub mod matching;
pub mod options;
pub mod params;
pub mod pattern;
pub mod router;

pub use chain::{handler, Chain, Handler, Next, RouteContext};
pub use error::{HandlerResult, Result, RouterError};
pub use events::{listener, EventKind, Listener, RouterEvent};
pub use location::{Location, MemoryLocation, NavigationSignal};
pub use matching::Request;
pub use options::{Environment, RouterOptions, Trigger};
pub use params::{ParamKey, ParamSpec, Params};
pub use pattern::{compile, CompiledPattern, Pattern};
pub use router::{RouteBinding, Router, Scope, MAX_REDIRECT_DEPTH};
