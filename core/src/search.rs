//! Matcher: precedence search over the route tree.
//!
//! # Precedence (evaluated per level, with backtracking)
//!
//! 1. Static child whose segment prefixes the remaining path
//! 2. Wildcard child consuming one non-empty segment
//! 3. Catch-all child consuming everything left
//!
//! A lower tier is only tried when the higher tiers produced no handler for
//! the requested verb. A node that exists but lacks the verb is remembered so
//! callers can tell "method not allowed" from "not found".

use std::borrow::Cow;

use percent_encoding::percent_decode;

use crate::radix_tree::Node;
use crate::Param;

/// Raw outcome of a tree search.
///
/// `params` are in collection order: innermost first.
pub(crate) struct Found<'t, H> {
    pub(crate) node: Option<&'t Node<H>>,
    pub(crate) handler: Option<&'t H>,
    pub(crate) params: Vec<Param>,
}

impl<H> Found<'_, H> {
    fn none() -> Self {
        Self {
            node: None,
            handler: None,
            params: Vec::new(),
        }
    }
}

impl<H> Node<H> {
    /// Find the best node for `method` below this node.
    ///
    /// `path` excludes the bytes already consumed by this node's segment.
    pub(crate) fn search(&self, method: &str, path: &[u8]) -> Found<'_, H> {
        let Some(&first) = path.first() else {
            return match &self.handlers {
                None => Found::none(),
                Some(table) => Found {
                    node: Some(self),
                    handler: table.get(method),
                    params: Vec::new(),
                },
            };
        };

        let mut found = Found::none();

        // At most one static child can share the first byte.
        if let Some(i) = self.static_indices.iter().position(|&b| b == first) {
            let child = &self.static_children[i];
            if let Some(rest) = path.strip_prefix(child.segment.as_slice()) {
                found = child.search(method, rest);
            }
        }

        if found.handler.is_some() {
            return found;
        }

        if let Some(wildcard) = &self.wildcard_child {
            let end = path.iter().position(|&b| b == b'/').unwrap_or(path.len());
            let (token, rest) = path.split_at(end);

            // Empty segments never bind a wildcard.
            if !token.is_empty() {
                let mut sub = wildcard.search(method, rest);
                if let Some(node) = sub.node {
                    if sub.handler.is_some() || found.node.is_none() {
                        let name = node.param_name(sub.params.len());
                        sub.params.push(Param::new(name, unescape(token)));
                        if sub.handler.is_some() {
                            return sub;
                        }
                        // Exists without the verb; the catch-all may still do better.
                        found = sub;
                    }
                }
            }
        }

        if let Some(catch_all) = &self.catch_all_child {
            if let Some(table) = &catch_all.handlers {
                let handler = table.get(method);
                if handler.is_some() || found.node.is_none() {
                    return Found {
                        node: Some(catch_all.as_ref()),
                        handler,
                        params: vec![Param::new(catch_all.param_name(0), unescape(path))],
                    };
                }
            }
        }

        found
    }
}

/// Percent-decode a captured path segment.
///
/// A malformed escape or a non-UTF-8 result yields the raw text unchanged.
pub(crate) fn unescape(raw: &[u8]) -> String {
    if has_malformed_escape(raw) {
        return String::from_utf8_lossy(raw).into_owned();
    }
    match percent_decode(raw).decode_utf8() {
        Ok(Cow::Borrowed(s)) => s.to_owned(),
        Ok(Cow::Owned(s)) => s,
        Err(_) => String::from_utf8_lossy(raw).into_owned(),
    }
}

/// `true` if some `%` is not followed by two hex digits.
fn has_malformed_escape(raw: &[u8]) -> bool {
    raw.iter().enumerate().any(|(i, &b)| {
        b == b'%'
            && !matches!(
                (raw.get(i + 1), raw.get(i + 2)),
                (Some(h), Some(l)) if h.is_ascii_hexdigit() && l.is_ascii_hexdigit()
            )
    })
}
