//! Per-node verb → handler table.

use std::collections::BTreeMap;

use crate::{RouteError, HEAD};

/// Maps HTTP verbs to handlers for one route terminus.
///
/// Verbs are stored verbatim (case-sensitive, as they appear on the request
/// line). Iteration order is sorted by verb so `Allow` lists are stable.
///
/// # INV: implicit HEAD
///
/// `implicit_head` is `true` only while the `HEAD` entry is a copy of the
/// `GET` handler made at registration time. Such an entry may be replaced by
/// an explicit `HEAD` registration; every other entry is write-once.
#[derive(Debug, Clone)]
pub struct HandlerTable<H> {
    handlers: BTreeMap<String, H>,
    implicit_head: bool,
}

impl<H> Default for HandlerTable<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> HandlerTable<H> {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlers: BTreeMap::new(),
            implicit_head: false,
        }
    }

    /// Handler registered for `verb`, if any.
    #[must_use]
    pub fn get(&self, verb: &str) -> Option<&H> {
        self.handlers.get(verb)
    }

    /// Returns `true` if `verb` has a handler.
    #[must_use]
    pub fn contains(&self, verb: &str) -> bool {
        self.handlers.contains_key(verb)
    }

    /// Returns `true` if the `HEAD` entry was derived from `GET`.
    #[must_use]
    pub fn implicit_head(&self) -> bool {
        self.implicit_head
    }

    /// Store `handler` under `verb`.
    ///
    /// `route` is only used to build the conflict message.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::DuplicateHandler`] if `verb` already has a
    /// handler, unless it is an implicitly derived `HEAD`.
    pub fn set(
        &mut self,
        route: &str,
        verb: &str,
        handler: H,
        implicit_head: bool,
    ) -> Result<(), RouteError> {
        if self.handlers.contains_key(verb) && (verb != HEAD || !self.implicit_head) {
            return Err(RouteError::DuplicateHandler {
                route: route.to_owned(),
                method: verb.to_owned(),
            });
        }
        self.handlers.insert(verb.to_owned(), handler);
        if verb == HEAD {
            self.implicit_head = implicit_head;
        }
        Ok(())
    }

    /// Verbs with a registered handler, sorted.
    #[must_use]
    pub fn methods(&self) -> Vec<&str> {
        self.handlers.keys().map(String::as_str).collect()
    }

    /// Number of registered verbs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Returns `true` if no verb is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}
