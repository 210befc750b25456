//! Route groups: shared path prefix and middleware stack.
//!
//! A [`Group`] borrows the [`RouterBuilder`] mutably, so groups can only be
//! used during registration and never outlive it.
//!
//! ```
//! use std::sync::Arc;
//! use pathmux::prelude::*;
//!
//! let mut builder: RouterBuilder<String> = RouterBuilder::new();
//! {
//!     let mut api = builder.group("/api").unwrap();
//!     api.use_middleware(Arc::new(|h: String| format!("auth({h})")));
//!     api.get("/users", "users".to_string()).unwrap();
//! }
//! let router = builder.build();
//! assert_eq!(
//!     router.search("GET", "/api/users").handler().map(String::as_str),
//!     Some("auth(users)"),
//! );
//! ```

use std::sync::Arc;

use crate::{RouteError, RouterBuilder, DELETE, GET, HEAD, OPTIONS, PATCH, POST, PUT};

/// Wraps a handler, returning the handler that runs in its place.
pub type Middleware<H> = Arc<dyn Fn(H) -> H + Send + Sync>;

/// A path prefix plus a middleware stack over a [`RouterBuilder`].
pub struct Group<'b, H> {
    path: String,
    builder: &'b mut RouterBuilder<H>,
    stack: Vec<Middleware<H>>,
}

impl<H: Clone> RouterBuilder<H> {
    /// Open a group rooted at `prefix`.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::InvalidPattern`] if a non-empty `prefix` does
    /// not start with `/`.
    pub fn group(&mut self, prefix: &str) -> Result<Group<'_, H>, RouteError> {
        Ok(Group {
            path: join_path("", prefix)?,
            builder: self,
            stack: Vec::new(),
        })
    }
}

impl<'b, H: Clone> Group<'b, H> {
    /// The joined prefix of this group (never ends with `/`).
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Open a sub-group. It starts with a copy of this group's middleware;
    /// middleware added to it later does not affect this group.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::InvalidPattern`] if a non-empty `prefix` does
    /// not start with `/`.
    pub fn new_group(&mut self, prefix: &str) -> Result<Group<'_, H>, RouteError> {
        Ok(Group {
            path: join_path(&self.path, prefix)?,
            builder: &mut *self.builder,
            stack: self.stack.clone(),
        })
    }

    /// Open a sub-group and hand it to `f`.
    ///
    /// # Errors
    ///
    /// Returns the prefix error or the first error `f` returns.
    pub fn with_group<F>(&mut self, prefix: &str, f: F) -> Result<(), RouteError>
    where
        F: FnOnce(&mut Group<'_, H>) -> Result<(), RouteError>,
    {
        let mut group = self.new_group(prefix)?;
        f(&mut group)
    }

    /// Append middleware. The first middleware added is the outermost.
    pub fn use_middleware(&mut self, middleware: Middleware<H>) {
        self.stack.push(middleware);
    }

    /// Register `handler`, wrapped in this group's middleware, at the
    /// group prefix followed by `pattern`.
    ///
    /// # Errors
    ///
    /// [`RouteError::InvalidPattern`] if a non-empty `pattern` does not start
    /// with `/`, otherwise whatever [`RouterBuilder::handle`] returns.
    pub fn handle(&mut self, method: &str, pattern: &str, handler: H) -> Result<(), RouteError> {
        check_path(pattern)?;
        let full = format!("{}{pattern}", self.path);
        let handler = self
            .stack
            .iter()
            .rev()
            .fold(handler, |handler, middleware| middleware(handler));
        self.builder.handle(method, &full, handler)
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
}

impl<H> std::fmt::Debug for Group<'_, H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Group")
            .field("path", &self.path)
            .field("middleware", &self.stack.len())
            .finish_non_exhaustive()
    }
}

/// Append `path` to `base`, dropping a trailing `/`.
fn join_path(base: &str, path: &str) -> Result<String, RouteError> {
    check_path(path)?;
    let mut joined = format!("{base}{path}");
    if joined.ends_with('/') {
        joined.pop();
    }
    Ok(joined)
}

fn check_path(path: &str) -> Result<(), RouteError> {
    if !path.is_empty() && !path.starts_with('/') {
        return Err(RouteError::InvalidPattern {
            pattern: path.to_owned(),
            reason: "must start with '/'".into(),
        });
    }
    Ok(())
}
