//! Router: registration builder and the frozen, shareable router.
//!
//! # Two phases
//!
//! Routes are registered on a [`RouterBuilder`] and then frozen with
//! [`RouterBuilder::build`]. Registration takes `&mut self`, so one
//! registration runs at a time and a prefix split can never be observed
//! half-done. The resulting [`Router`] has no mutating methods: every lookup
//! is a plain read of the tree, with no locking.

use tracing::{debug, trace, warn};

use crate::radix_tree::Node;
use crate::{
    HandlerTable, Params, RouteError, DELETE, GET, HEAD, OPTIONS, PATCH, POST, PUT,
};

/// Behavior switches shared by the builder and the router.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(serde::Deserialize))]
#[cfg_attr(feature = "config", serde(default, deny_unknown_fields))]
pub struct RouterSettings {
    /// Store `/x/` as `/x` with a trailing-slash flag, and have
    /// [`Router::lookup`] redirect requests that disagree with the flag.
    pub redirect_trailing_slash: bool,
    /// Also apply trailing-slash redirects to catch-all routes.
    pub remove_catch_all_trailing_slash: bool,
    /// Serve `HEAD` with the `GET` handler when no `HEAD` handler is registered.
    pub head_can_use_get: bool,
}

impl Default for RouterSettings {
    fn default() -> Self {
        Self {
            redirect_trailing_slash: true,
            remove_catch_all_trailing_slash: false,
            head_can_use_get: true,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Builder
// ═══════════════════════════════════════════════════════════════════════════════

/// Collects routes into a route tree.
///
/// A failed registration returns its error and leaves every earlier route
/// intact, so a route table can be validated in one pass.
#[derive(Debug, Clone)]
pub struct RouterBuilder<H> {
    root: Node<H>,
    settings: RouterSettings,
    routes: usize,
}

impl<H: Clone> Default for RouterBuilder<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: Clone> RouterBuilder<H> {
    /// Create an empty builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::with_settings(RouterSettings::default())
    }

    /// Create an empty builder with the given settings.
    #[must_use]
    pub fn with_settings(settings: RouterSettings) -> Self {
        Self {
            root: Node::root(),
            settings,
            routes: 0,
        }
    }

    /// The settings this builder registers with.
    #[must_use]
    pub fn settings(&self) -> &RouterSettings {
        &self.settings
    }

    /// Register `handler` for `method` requests matching `pattern`.
    ///
    /// # Errors
    ///
    /// - [`RouteError::EmptyPattern`] / [`RouteError::InvalidPattern`]: malformed pattern
    /// - [`RouteError::CatchAllNotTerminal`]: `/` after a catch-all
    /// - [`RouteError::CatchAllConflict`]: different catch-all name at the same position
    /// - [`RouteError::AmbiguousWildcards`]: same route shape, different parameter names
    /// - [`RouteError::AmbiguousRoute`]: another pattern string owns this leaf
    /// - [`RouteError::DuplicateHandler`]: `method` is already handled here
    pub fn handle(&mut self, method: &str, pattern: &str, handler: H) -> Result<(), RouteError> {
        match self.insert(method, pattern, handler) {
            Ok(implicit_head) => {
                self.routes += 1;
                debug!(method, pattern, implicit_head, "route registered");
                Ok(())
            }
            Err(error) => {
                warn!(method, pattern, %error, "route rejected");
                Err(error)
            }
        }
    }

    /// Returns whether a `HEAD` handler was derived from this registration.
    fn insert(&mut self, method: &str, pattern: &str, handler: H) -> Result<bool, RouteError> {
        let mut path = pattern;
        let mut add_slash = false;
        if path.len() > 1 && path.ends_with('/') && self.settings.redirect_trailing_slash {
            add_slash = true;
            path = &path[..path.len() - 1];
        }
        validate_pattern(path)?;

        let leaf = self
            .root
            .add_path(path, &path.as_bytes()[1..], Vec::new(), false)?;
        if leaf.route.is_empty() {
            leaf.route = path.to_owned();
        } else if leaf.route != path {
            return Err(RouteError::AmbiguousRoute {
                existing: leaf.route.clone(),
                new: path.to_owned(),
            });
        }

        let table = leaf.handlers.get_or_insert_with(HandlerTable::new);
        let implicit_head = self.settings.head_can_use_get && method == GET && !table.contains(HEAD);
        if implicit_head {
            table.set(path, method, handler.clone(), false)?;
            table.set(path, HEAD, handler, true)?;
        } else {
            table.set(path, method, handler, false)?;
        }
        // Only a registration that succeeded may set the flag.
        if add_slash {
            leaf.add_slash = true;
        }
        Ok(implicit_head)
    }

    /// Shorthand for `handle("GET", ..)`.
    ///
    /// # Errors
    ///
    /// See [`handle`](Self::handle).
    pub fn get(&mut self, pattern: &str, handler: H) -> Result<(), RouteError> {
        self.handle(GET, pattern, handler)
    }

    /// Shorthand for `handle("POST", ..)`.
    ///
    /// # Errors
    ///
    /// See [`handle`](Self::handle).
    pub fn post(&mut self, pattern: &str, handler: H) -> Result<(), RouteError> {
        self.handle(POST, pattern, handler)
    }

    /// Shorthand for `handle("PUT", ..)`.
    ///
    /// # Errors
    ///
    /// See [`handle`](Self::handle).
    pub fn put(&mut self, pattern: &str, handler: H) -> Result<(), RouteError> {
        self.handle(PUT, pattern, handler)
    }

    /// Shorthand for `handle("PATCH", ..)`.
    ///
    /// # Errors
    ///
    /// See [`handle`](Self::handle).
    pub fn patch(&mut self, pattern: &str, handler: H) -> Result<(), RouteError> {
        self.handle(PATCH, pattern, handler)
    }

    /// Shorthand for `handle("DELETE", ..)`.
    ///
    /// # Errors
    ///
    /// See [`handle`](Self::handle).
    pub fn delete(&mut self, pattern: &str, handler: H) -> Result<(), RouteError> {
        self.handle(DELETE, pattern, handler)
    }

    /// Shorthand for `handle("HEAD", ..)`.
    ///
    /// # Errors
    ///
    /// See [`handle`](Self::handle).
    pub fn head(&mut self, pattern: &str, handler: H) -> Result<(), RouteError> {
        self.handle(HEAD, pattern, handler)
    }

    /// Shorthand for `handle("OPTIONS", ..)`.
    ///
    /// # Errors
    ///
    /// See [`handle`](Self::handle).
    pub fn options(&mut self, pattern: &str, handler: H) -> Result<(), RouteError> {
        self.handle(OPTIONS, pattern, handler)
    }

    /// Freeze the tree. No further registration is possible.
    #[must_use]
    pub fn build(self) -> Router<H> {
        debug!(routes = self.routes, "router built");
        Router {
            root: self.root,
            settings: self.settings,
            routes: self.routes,
        }
    }
}

/// Reject patterns that can never build an unambiguous tree, before the
/// tree is touched.
fn validate_pattern(pattern: &str) -> Result<(), RouteError> {
    if pattern.is_empty() {
        return Err(RouteError::EmptyPattern);
    }
    if !pattern.starts_with('/') {
        return Err(RouteError::InvalidPattern {
            pattern: pattern.to_owned(),
            reason: "must start with '/'".into(),
        });
    }
    let mut segments = pattern.split('/').peekable();
    while let Some(segment) = segments.next() {
        if segment.starts_with('*') && segments.peek().is_some() {
            return Err(RouteError::CatchAllNotTerminal {
                pattern: pattern.to_owned(),
            });
        }
    }
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════════════
// Router
// ═══════════════════════════════════════════════════════════════════════════════

/// Immutable route tree produced by [`RouterBuilder::build`].
#[derive(Debug, Clone)]
pub struct Router<H> {
    root: Node<H>,
    settings: RouterSettings,
    routes: usize,
}

impl<H> Router<H> {
    /// Find the handler for `method` at `path`.
    ///
    /// `path` is matched as given: no trailing-slash handling. A path that
    /// does not start with `/` never matches.
    #[must_use]
    pub fn search(&self, method: &str, path: &str) -> RouteMatch<'_, H> {
        let Some(rest) = path.as_bytes().strip_prefix(b"/") else {
            return RouteMatch::none();
        };
        let found = self.root.search(method, rest);
        let mut params = found.params;
        params.reverse();
        RouteMatch {
            node: found.node,
            handler: found.handler,
            params: Params::from(params),
        }
    }

    /// Resolve a request the way an HTTP front end should answer it.
    ///
    /// Unlike [`search`](Self::search) this applies the trailing-slash
    /// convention from [`RouterSettings`].
    #[must_use]
    pub fn lookup(&self, method: &str, path: &str) -> Lookup<'_, H> {
        let redirect = self.settings.redirect_trailing_slash;
        let trailing_slash = path.len() > 1 && path.ends_with('/');
        let search_path = if trailing_slash && redirect {
            &path[..path.len() - 1]
        } else {
            path
        };

        let mut found = self.search(method, search_path);
        let Some(node) = found.node else {
            trace!(method, path, "no route");
            return Lookup::NotFound;
        };

        if found.handler.is_none() {
            let allowed: Vec<String> = found
                .allowed_methods()
                .into_iter()
                .map(str::to_owned)
                .collect();
            trace!(method, path, ?allowed, "method not allowed");
            return Lookup::MethodNotAllowed { allowed };
        }

        if redirect && trailing_slash != node.add_slash {
            if !node.is_catch_all || self.settings.remove_catch_all_trailing_slash {
                let location = if trailing_slash {
                    search_path.to_owned()
                } else {
                    format!("{path}/")
                };
                trace!(method, path, %location, "trailing slash redirect");
                return Lookup::Redirect { location };
            }
            if trailing_slash {
                // The slash belongs to the catch-all value.
                if let Some(last) = found.params.last_mut() {
                    last.value.push('/');
                }
            }
        }

        trace!(method, path, route = %node.route, "route matched");
        Lookup::Found(found)
    }

    /// Settings the router was built with.
    #[must_use]
    pub fn settings(&self) -> &RouterSettings {
        &self.settings
    }

    /// Number of successful registrations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes
    }

    /// Returns `true` if nothing was registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes == 0
    }

    /// Human-readable dump of the route tree, one node per line:
    /// priority, kind (`:` wildcard, `*` catch-all), segment, static child
    /// count, verbs and wildcard names.
    #[must_use]
    pub fn dump(&self) -> String {
        let mut out = String::new();
        self.root.dump(&mut out, "", "");
        out
    }
}

/// Result of [`Router::search`].
#[derive(Debug)]
pub struct RouteMatch<'r, H> {
    node: Option<&'r Node<H>>,
    handler: Option<&'r H>,
    params: Params,
}

impl<'r, H> RouteMatch<'r, H> {
    fn none() -> Self {
        Self {
            node: None,
            handler: None,
            params: Params::new(),
        }
    }

    /// `true` if some route exists at this path, for any verb.
    #[must_use]
    pub fn node_exists(&self) -> bool {
        self.node.is_some()
    }

    /// Handler for the requested verb. `None` with [`node_exists`](Self::node_exists)
    /// means the verb is not allowed here.
    #[must_use]
    pub fn handler(&self) -> Option<&'r H> {
        self.handler
    }

    /// Captured parameters, outermost first.
    #[must_use]
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Take the captured parameters.
    #[must_use]
    pub fn into_params(self) -> Params {
        self.params
    }

    /// The registered pattern of the matched node.
    #[must_use]
    pub fn route(&self) -> Option<&'r str> {
        self.node.map(|n| n.route.as_str())
    }

    /// Verbs registered at the matched node, sorted.
    #[must_use]
    pub fn allowed_methods(&self) -> Vec<&'r str> {
        self.node
            .and_then(|n| n.handlers.as_ref())
            .map(HandlerTable::methods)
            .unwrap_or_default()
    }
}

/// Result of [`Router::lookup`].
#[derive(Debug)]
pub enum Lookup<'r, H> {
    /// A handler for the verb was found.
    Found(RouteMatch<'r, H>),
    /// The route exists with the other trailing-slash form.
    Redirect {
        /// Path to redirect to.
        location: String,
    },
    /// The path exists but not for this verb.
    MethodNotAllowed {
        /// Verbs the path does accept, sorted.
        allowed: Vec<String>,
    },
    /// No route at this path.
    NotFound,
}
