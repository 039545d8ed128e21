//! Logging facade.
//!
//! Routing diagnostics go through the macros below, which forward to either
//! [`log`](https://docs.rs/log) or [`tracing`](https://docs.rs/tracing)
//! depending on the enabled feature. Enable at most one of the two; with
//! neither enabled the macros compile to nothing.
//!
//! | Feature    | Backend         | Default |
//! |------------|-----------------|---------|
//! | `log`      | `log` crate     | yes     |
//! | `tracing`  | `tracing` crate | no      |
//!
//! Every record is emitted under the `waypoint_router` target so hosts can
//! filter router output independently of their own:
//!
//! ```ignore
//! use waypoint_router::{debug_log, trace_log};
//!
//! trace_log!("Advancing chain for '{}'", path);
//! debug_log!("Route '{}' matched '{}'", pattern, path);
//! ```
//!
//! Levels used by the crate:
//!
//! - `trace`: queue operations, cache lookups, ignored signals
//! - `debug`: matches, vetoes, cancelled dispatches
//! - `info`: route registration
//! - `warn`: recoverable oddities (undecodable parameters)
//! - `error`: handler failures surfaced to the caller

/// Log target shared by every record the router emits.
pub const TARGET: &str = "waypoint_router";

#[doc(hidden)]
#[macro_export]
macro_rules! __router_log {
    ($level:ident, $($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::$level!(target: $crate::logging::TARGET, $($arg)*);
        #[cfg(feature = "log")]
        ::log::$level!(target: $crate::logging::TARGET, $($arg)*);
    };
}

/// Emit a **trace**-level record. Accepts `format!`-style arguments.
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => { $crate::__router_log!(trace, $($arg)*) };
}

/// Emit a **debug**-level record. Accepts `format!`-style arguments.
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => { $crate::__router_log!(debug, $($arg)*) };
}

/// Emit an **info**-level record.
#[macro_export]
macro_rules! info_log {
    ($($arg:tt)*) => { $crate::__router_log!(info, $($arg)*) };
}

/// Emit a **warn**-level record.
#[macro_export]
macro_rules! warn_log {
    ($($arg:tt)*) => { $crate::__router_log!(warn, $($arg)*) };
}

/// Emit an **error**-level record.
#[macro_export]
macro_rules! error_log {
    ($($arg:tt)*) => { $crate::__router_log!(error, $($arg)*) };
}
