//! Config types for data-driven route tables.
//!
//! These types are serde-deserializable and turn into a [`Router`] via
//! [`RouteTableConfig::build`].
//!
//! ```json
//! {
//!   "settings": { "head_can_use_get": false },
//!   "routes": [
//!     { "method": "GET", "pattern": "/post/:id", "handler": "show_post" },
//!     { "method": "GET", "pattern": "/images/*path", "handler": "static" }
//!   ]
//! }
//! ```

use serde::Deserialize;

use crate::{RouteError, Router, RouterBuilder, RouterSettings};

/// A full route table: settings plus routes in registration order.
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "A: Deserialize<'de>"))]
pub struct RouteTableConfig<A> {
    /// Router behavior switches. Omitted fields keep their defaults.
    #[serde(default)]
    pub settings: RouterSettings,

    /// Routes, registered in order.
    pub routes: Vec<RouteConfig<A>>,
}

/// One registration.
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "A: Deserialize<'de>"))]
pub struct RouteConfig<A> {
    /// HTTP verb, case-sensitive.
    pub method: String,
    /// Route pattern.
    pub pattern: String,
    /// Handler value stored for the route.
    pub handler: A,
}

impl<A: Clone> RouteTableConfig<A> {
    /// Register every route and freeze the router.
    ///
    /// # Errors
    ///
    /// Returns the first [`RouteError`] raised by a registration.
    pub fn build(self) -> Result<Router<A>, RouteError> {
        let mut builder = RouterBuilder::with_settings(self.settings);
        for route in self.routes {
            builder.handle(&route.method, &route.pattern, route.handler)?;
        }
        Ok(builder.build())
    }
}
