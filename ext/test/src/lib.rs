//! pathmux-test: outcome helpers for conformance testing
//!
//! Flattens a [`Lookup`] into an owned, comparable [`Outcome`] so route
//! tables can be checked against expectations written as data.
//!
//! # Example
//!
//! ```
//! use pathmux_test::prelude::*;
//!
//! let mut builder = RouterBuilder::new();
//! builder.get("/post/:id", "show".to_string()).unwrap();
//! let router = builder.build();
//!
//! let outcome = resolve(&router, "GET", "/post/7");
//! assert_eq!(
//!     outcome,
//!     Outcome::Found {
//!         handler: "show".into(),
//!         route: "/post/:id".into(),
//!         params: vec![("id".into(), "7".into())],
//!     }
//! );
//! ```

use pathmux::{Lookup, RouteError, Router};

#[cfg(feature = "fixtures")]
pub mod fixture;

/// Owned result of [`Router::lookup`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A handler was found.
    Found {
        /// Handler value.
        handler: String,
        /// Registered pattern of the matched node.
        route: String,
        /// Captured parameters, outermost first.
        params: Vec<(String, String)>,
    },
    /// Trailing-slash redirect.
    Redirect(String),
    /// Path exists, verb does not.
    MethodNotAllowed(Vec<String>),
    /// No route.
    NotFound,
}

impl Outcome {
    /// Convert a borrowed lookup result.
    #[must_use]
    pub fn from_lookup(lookup: Lookup<'_, String>) -> Self {
        match lookup {
            Lookup::Found(m) => Outcome::Found {
                handler: m.handler().cloned().unwrap_or_default(),
                route: m.route().unwrap_or_default().to_string(),
                params: m
                    .params()
                    .iter()
                    .map(|p| (p.name.clone(), p.value.clone()))
                    .collect(),
            },
            Lookup::Redirect { location } => Outcome::Redirect(location),
            Lookup::MethodNotAllowed { allowed } => Outcome::MethodNotAllowed(allowed),
            Lookup::NotFound => Outcome::NotFound,
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Found {
                handler,
                route,
                params,
            } => {
                write!(f, "{handler} route={route}")?;
                for (name, value) in params {
                    write!(f, " {name}={value}")?;
                }
                Ok(())
            }
            Outcome::Redirect(location) => write!(f, "redirect {location}"),
            Outcome::MethodNotAllowed(allowed) => {
                write!(f, "method not allowed (allow: {})", allowed.join(", "))
            }
            Outcome::NotFound => write!(f, "not found"),
        }
    }
}

/// Look up `method` and `path` and flatten the result.
#[must_use]
pub fn resolve(router: &Router<String>, method: &str, path: &str) -> Outcome {
    Outcome::from_lookup(router.lookup(method, path))
}

/// Stable snake_case name of a registration error, used by fixtures.
#[must_use]
pub fn error_kind(error: &RouteError) -> &'static str {
    match error {
        RouteError::EmptyPattern => "empty_pattern",
        RouteError::InvalidPattern { .. } => "invalid_pattern",
        RouteError::CatchAllNotTerminal { .. } => "catch_all_not_terminal",
        RouteError::CatchAllConflict { .. } => "catch_all_conflict",
        RouteError::AmbiguousWildcards { .. } => "ambiguous_wildcards",
        RouteError::AmbiguousRoute { .. } => "ambiguous_route",
        RouteError::DuplicateHandler { .. } => "duplicate_handler",
    }
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use super::{error_kind, resolve, Outcome};
    pub use pathmux::prelude::*;
}

#[cfg(test)]
mod tests {
    use super::*;
    use pathmux::RouterBuilder;

    fn router() -> Router<String> {
        let mut builder = RouterBuilder::new();
        builder.get("/about", "about".to_string()).unwrap();
        builder.get("/files/*path", "files".to_string()).unwrap();
        builder.build()
    }

    #[test]
    fn test_outcomes() {
        let router = router();

        assert_eq!(
            resolve(&router, "GET", "/files/a/b"),
            Outcome::Found {
                handler: "files".into(),
                route: "/files/*path".into(),
                params: vec![("path".into(), "a/b".into())],
            }
        );
        assert_eq!(
            resolve(&router, "GET", "/about/"),
            Outcome::Redirect("/about".into())
        );
        assert_eq!(
            resolve(&router, "POST", "/about"),
            Outcome::MethodNotAllowed(vec!["GET".into(), "HEAD".into()])
        );
        assert_eq!(resolve(&router, "GET", "/missing"), Outcome::NotFound);
    }

    #[test]
    fn test_outcome_display() {
        let router = router();
        assert_eq!(
            resolve(&router, "GET", "/files/x").to_string(),
            "files route=/files/*path path=x"
        );
        assert_eq!(
            resolve(&router, "DELETE", "/about").to_string(),
            "method not allowed (allow: GET, HEAD)"
        );
        assert_eq!(Outcome::NotFound.to_string(), "not found");
    }

    #[test]
    fn test_error_kind() {
        let mut builder: RouterBuilder<String> = RouterBuilder::new();
        let err = builder.get("", String::new()).unwrap_err();
        assert_eq!(error_kind(&err), "empty_pattern");

        builder.get("/x", String::new()).unwrap();
        let err = builder.get("/x", String::new()).unwrap_err();
        assert_eq!(error_kind(&err), "duplicate_handler");
    }
}
