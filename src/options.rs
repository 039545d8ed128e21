//! Router configuration.
//!
//! [`RouterOptions`] is built fluently and handed to the router once; the
//! trigger strategy it implies ([`Trigger`]) cannot change afterwards.
//!
//! | Option           | Default  | Effect                                                  |
//! |------------------|----------|---------------------------------------------------------|
//! | `env`            | `Client` | `Server` routes on `navigate` events only               |
//! | `push_state`     | `false`  | history routing instead of fragment routing             |
//! | `root`           | `""`     | prefix stripped from / prepended to pathnames           |
//! | `hash_bang`      | `false`  | fragments are written and read as `#!/path`             |
//! | `case_sensitive` | `false`  | patterns match case-sensitively                         |
//! | `strict`         | `false`  | no implicit optional trailing slash                     |
//!
//! # Example
//!
//! ```
//! use waypoint_router::{RouterOptions, Trigger};
//!
//! let options = RouterOptions::new().push_state(true).root("/app");
//! assert_eq!(options.trigger(), Trigger::Navigate);
//! assert_eq!(RouterOptions::default().trigger(), Trigger::HashChange);
//! ```

/// Where the router runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Environment {
    #[default]
    Client,
    Server,
}

/// Which router event re-runs route matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    /// Fragment routing on a client.
    HashChange,
    /// History routing, or any server-side router.
    Navigate,
}

/// Router option set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouterOptions {
    pub env: Environment,
    pub push_state: bool,
    pub root: String,
    pub hash_bang: bool,
    pub case_sensitive: bool,
    pub strict: bool,
}

impl RouterOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn env(mut self, env: Environment) -> Self {
        self.env = env;
        self
    }

    /// Route on the path part of the address instead of the fragment.
    #[must_use]
    pub fn push_state(mut self, enabled: bool) -> Self {
        self.push_state = enabled;
        self
    }

    /// Prefix under which the application is mounted (history routing).
    #[must_use]
    pub fn root(mut self, root: impl Into<String>) -> Self {
        self.root = root.into();
        self
    }

    #[must_use]
    pub fn hash_bang(mut self, enabled: bool) -> Self {
        self.hash_bang = enabled;
        self
    }

    #[must_use]
    pub fn case_sensitive(mut self, enabled: bool) -> Self {
        self.case_sensitive = enabled;
        self
    }

    #[must_use]
    pub fn strict(mut self, enabled: bool) -> Self {
        self.strict = enabled;
        self
    }

    /// The event that re-runs matching for these options.
    pub fn trigger(&self) -> Trigger {
        if !self.push_state && self.env != Environment::Server {
            Trigger::HashChange
        } else {
            Trigger::Navigate
        }
    }

    /// Fragment marker used in hash routing.
    pub(crate) fn hash_marker(&self) -> &'static str {
        if self.hash_bang {
            "#!"
        } else {
            "#"
        }
    }
}
