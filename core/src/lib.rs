//! pathmux - radix-tree HTTP path router
//!
//! Finds the handler for an HTTP verb and request path, and extracts named
//! path parameters, in time proportional to the number of path segments
//! rather than the number of registered routes.
//!
//! # Architecture
//!
//! - [`RouterBuilder<H>`]: Registration phase. Inserts patterns into a
//!   compressed prefix tree, splitting shared prefixes, and fills the per-node
//!   [`HandlerTable<H>`]. Needs `&mut self`, so registration is exclusive.
//! - [`Router<H>`]: Serving phase. Immutable, lock-free lookups, `Send + Sync`
//!   whenever `H` is.
//! - [`Group`]: Path-prefix and middleware scoping on top of the builder.
//!
//! # Pattern syntax
//!
//! | Pattern | Matches |
//! |---------|---------|
//! | `/about` | the literal path |
//! | `/post/:id` | one segment, bound to `id` |
//! | `/files/*path` | the rest of the path, bound to `path` (must be last) |
//! | `/\:literal`, `/\*literal`, `/\\x` | a segment starting with `:`, `*` or `\` |
//!
//! # Precedence
//!
//! Static segments beat wildcards, wildcards beat catch-alls. The search
//! backtracks: if the static branch has no handler for the verb, the wildcard
//! is tried, then the catch-all.
//!
//! # Example
//!
//! ```
//! use pathmux::prelude::*;
//!
//! let mut builder = RouterBuilder::new();
//! builder.get("/:page", "page").unwrap();
//! builder.get("/favicon.ico", "favicon").unwrap();
//! builder.get("/images/*path", "images").unwrap();
//! let router = builder.build();
//!
//! let m = router.search("GET", "/favicon.ico");
//! assert_eq!(m.handler(), Some(&"favicon"));
//!
//! let m = router.search("GET", "/images/2014/may.jpg");
//! assert_eq!(m.params().text("path"), "2014/may.jpg");
//!
//! // HEAD is served by the GET handler unless registered explicitly.
//! assert_eq!(router.search("HEAD", "/about").handler(), Some(&"page"));
//! ```

// ═══════════════════════════════════════════════════════════════════════════════
// Modules
// ═══════════════════════════════════════════════════════════════════════════════

mod group;
mod handler_table;
mod params;
mod radix_tree;
mod router;
mod search;

#[cfg(feature = "config")]
mod config;

// ═══════════════════════════════════════════════════════════════════════════════
// Public API
// ═══════════════════════════════════════════════════════════════════════════════

pub use group::{Group, Middleware};
pub use handler_table::HandlerTable;
pub use params::{Param, ParamError, Params};
pub use router::{Lookup, RouteMatch, Router, RouterBuilder, RouterSettings};

#[cfg(feature = "config")]
pub use config::{RouteConfig, RouteTableConfig};

// ═══════════════════════════════════════════════════════════════════════════════
// Prelude
// ═══════════════════════════════════════════════════════════════════════════════

/// Prelude module for convenient imports.
///
/// ```
/// use pathmux::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        Group, Lookup, Middleware, Param, ParamError, Params, RouteError, RouteMatch, Router,
        RouterBuilder, RouterSettings,
    };
}

// ═══════════════════════════════════════════════════════════════════════════════
// Verbs
// ═══════════════════════════════════════════════════════════════════════════════

/// `GET` request method.
pub const GET: &str = "GET";
/// `HEAD` request method. Implicitly served by `GET` handlers by default.
pub const HEAD: &str = "HEAD";
/// `POST` request method.
pub const POST: &str = "POST";
/// `PUT` request method.
pub const PUT: &str = "PUT";
/// `PATCH` request method.
pub const PATCH: &str = "PATCH";
/// `DELETE` request method.
pub const DELETE: &str = "DELETE";
/// `OPTIONS` request method.
pub const OPTIONS: &str = "OPTIONS";

// ═══════════════════════════════════════════════════════════════════════════════
// Errors
// ═══════════════════════════════════════════════════════════════════════════════

/// Errors from route registration.
///
/// These are programmer mistakes in a route table. They surface at the
/// registration call that introduces the conflict, and the tree is left
/// usable for the routes registered before it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    /// The pattern (after joining any group prefix) is empty.
    #[error("cannot register an empty pattern")]
    EmptyPattern,

    /// The pattern is malformed.
    #[error("invalid pattern \"{pattern}\": {reason}")]
    InvalidPattern {
        /// The offending pattern.
        pattern: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A `/` follows a catch-all marker.
    #[error("catch-all in \"{pattern}\" must be the last segment")]
    CatchAllNotTerminal {
        /// The offending pattern.
        pattern: String,
    },

    /// Two catch-alls with different names at the same position.
    #[error("catch-all \"*{new}\" overlaps existing catch-all \"*{existing}\"")]
    CatchAllConflict {
        /// Name already in the tree.
        existing: String,
        /// Name in the rejected pattern.
        new: String,
    },

    /// The same route shape was registered with different parameter names.
    #[error("wildcards {new:?} are ambiguous with wildcards {existing:?}")]
    AmbiguousWildcards {
        /// Names already recorded at the leaf.
        existing: Vec<String>,
        /// Names in the rejected pattern.
        new: Vec<String>,
    },

    /// Two distinct pattern strings resolve to the same leaf.
    #[error("pattern \"{new}\" resolves to the same route as \"{existing}\"")]
    AmbiguousRoute {
        /// Pattern already registered at the leaf.
        existing: String,
        /// The rejected pattern.
        new: String,
    },

    /// The verb already has a handler for this route.
    #[error("{route} already handles {method}")]
    DuplicateHandler {
        /// The route pattern.
        route: String,
        /// The duplicated verb.
        method: String,
    },
}
