//! Route tree: a compressed trie of path segments.
//!
//! Edges are stored as raw bytes. A prefix split may land inside a
//! multi-byte character; the halves are only ever compared against request
//! bytes, never re-read as `str`.
//!
//! # Structure
//!
//! ```text
//! "/" ─┬─ "app" ─┬─ "le"            (static children, unique first byte)
//!      │         └─ "ly"
//!      ├─ :wildcard ── "/" ── ...    (at most one per node)
//!      └─ *catch-all                 (at most one per node, always a leaf)
//! ```
//!
//! # Performance
//!
//! - Insert: O(k) in pattern length, plus a linear scan of static siblings
//! - Sibling order is kept by descending priority so hot prefixes are found first

use std::fmt::Write as _;

use crate::{HandlerTable, RouteError};

/// A vertex of the route tree.
#[derive(Debug, Clone)]
pub(crate) struct Node<H> {
    /// Full pattern registered at this terminus (empty for inner nodes).
    pub(crate) route: String,
    /// Edge label leading into this node. For a catch-all node this is its name.
    pub(crate) segment: Vec<u8>,
    /// Number of insertions that passed through this node.
    pub(crate) priority: u32,

    /// First byte of each static child, parallel to `static_children`.
    pub(crate) static_indices: Vec<u8>,
    pub(crate) static_children: Vec<Node<H>>,
    pub(crate) wildcard_child: Option<Box<Node<H>>>,
    pub(crate) catch_all_child: Option<Box<Node<H>>>,

    /// The route was registered with a trailing slash.
    pub(crate) add_slash: bool,
    pub(crate) is_catch_all: bool,

    pub(crate) handlers: Option<HandlerTable<H>>,
    /// Parameter names collected from root to this leaf, innermost last.
    pub(crate) wildcard_names: Vec<String>,
}

impl<H> Node<H> {
    pub(crate) fn new(segment: impl Into<Vec<u8>>) -> Self {
        Self {
            route: String::new(),
            segment: segment.into(),
            priority: 0,
            static_indices: Vec::new(),
            static_children: Vec::new(),
            wildcard_child: None,
            catch_all_child: None,
            add_slash: false,
            is_catch_all: false,
            handlers: None,
            wildcard_names: Vec::new(),
        }
    }

    /// The tree root, standing for the leading `/` of every pattern.
    pub(crate) fn root() -> Self {
        Self::new("/")
    }

    fn catch_all(name: &[u8]) -> Self {
        Self {
            is_catch_all: true,
            ..Self::new(name)
        }
    }

    /// Name of the `i`-th parameter collected while unwinding a search.
    ///
    /// Parameters are gathered innermost first, so index 0 is the last name.
    pub(crate) fn param_name(&self, i: usize) -> &str {
        self.wildcard_names
            .len()
            .checked_sub(i + 1)
            .and_then(|idx| self.wildcard_names.get(idx))
            .map_or("", String::as_str)
    }

    /// Insert the rest of a pattern below this node and return its leaf.
    ///
    /// `pattern` is the full pattern (for error messages), `path` the part not
    /// yet consumed. `in_static_token` is set while inside a literal token so a
    /// `*` or `:` exposed by a prefix split is not read as a marker.
    pub(crate) fn add_path(
        &mut self,
        pattern: &str,
        path: &[u8],
        mut wildcards: Vec<String>,
        in_static_token: bool,
    ) -> Result<&mut Node<H>, RouteError> {
        let Some(&first) = path.first() else {
            self.record_wildcards(wildcards)?;
            return Ok(self);
        };

        let next_slash = path.iter().position(|&b| b == b'/');
        let token_end = if first == b'/' {
            1
        } else {
            next_slash.unwrap_or(path.len())
        };
        let mut token = &path[..token_end];
        let remaining = &path[token_end..];

        if first == b'*' && !in_static_token {
            if next_slash.is_some() {
                return Err(RouteError::CatchAllNotTerminal {
                    pattern: pattern.to_owned(),
                });
            }
            let name = &token[1..];
            let child = self
                .catch_all_child
                .get_or_insert_with(|| Box::new(Node::catch_all(name)));
            if child.segment != name {
                return Err(RouteError::CatchAllConflict {
                    existing: String::from_utf8_lossy(&child.segment).into_owned(),
                    new: String::from_utf8_lossy(name).into_owned(),
                });
            }
            wildcards.push(String::from_utf8_lossy(name).into_owned());
            child.record_wildcards(wildcards)?;
            return Ok(child.as_mut());
        }

        if first == b':' && !in_static_token {
            wildcards.push(String::from_utf8_lossy(&token[1..]).into_owned());
            let child = self
                .wildcard_child
                .get_or_insert_with(|| Box::new(Node::new("wildcard")));
            return child.add_path(pattern, remaining, wildcards, false);
        }

        let mut lead = first;
        let mut unescaped = false;
        if token.len() >= 2
            && !in_static_token
            && token[0] == b'\\'
            && matches!(token[1], b'*' | b':' | b'\\')
        {
            lead = token[1];
            token = &token[1..];
            unescaped = true;
        }

        let in_static_token = lead != b'/';

        if let Some(i) = self.static_indices.iter().position(|&b| b == lead) {
            let mut consumed = self.split_common_prefix(i, token);
            self.static_children[i].priority += 1;
            let i = self.sort_static_child(i);
            if unescaped {
                // The dropped backslash still occupies a byte of `path`.
                consumed += 1;
            }
            return self.static_children[i].add_path(
                pattern,
                &path[consumed..],
                wildcards,
                in_static_token,
            );
        }

        let i = self.static_children.len();
        self.static_indices.push(lead);
        self.static_children.push(Node::new(token));
        self.static_children[i].add_path(pattern, remaining, wildcards, in_static_token)
    }

    /// Record the wildcard names of a leaf, or check them against the names
    /// recorded by an earlier registration.
    fn record_wildcards(&mut self, names: Vec<String>) -> Result<(), RouteError> {
        if names.is_empty() {
            return Ok(());
        }
        if self.wildcard_names.is_empty() {
            self.wildcard_names = names;
            return Ok(());
        }
        if self.wildcard_names != names {
            return Err(RouteError::AmbiguousWildcards {
                existing: self.wildcard_names.clone(),
                new: names,
            });
        }
        Ok(())
    }

    /// Make the static child at `index` share exactly the common prefix with
    /// `token`, inserting an intermediary node if needed.
    ///
    /// Returns the number of bytes of `token` consumed by that child.
    fn split_common_prefix(&mut self, index: usize, token: &[u8]) -> usize {
        let child = &mut self.static_children[index];
        if token.starts_with(&child.segment) {
            return child.segment.len();
        }

        let common = common_prefix_len(&child.segment, token);
        let intermediary = Node::new(&token[..common]);
        let mut existing = std::mem::replace(child, intermediary);
        existing.segment = existing.segment.split_off(common);

        let intermediary = &mut self.static_children[index];
        intermediary.priority = existing.priority;
        intermediary.static_indices.push(existing.segment[0]);
        intermediary.static_children.push(existing);
        common
    }

    /// Bubble the static child at `i` toward the front past lower-priority
    /// siblings. Returns its new index.
    fn sort_static_child(&mut self, mut i: usize) -> usize {
        while i > 0 && self.static_children[i].priority > self.static_children[i - 1].priority {
            self.static_children.swap(i, i - 1);
            self.static_indices.swap(i, i - 1);
            i -= 1;
        }
        i
    }

    /// Render the subtree, one node per line.
    pub(crate) fn dump(&self, out: &mut String, prefix: &str, kind: &str) {
        let methods = self
            .handlers
            .as_ref()
            .map(HandlerTable::methods)
            .unwrap_or_default();
        let _ = writeln!(
            out,
            "{prefix} {:02} {kind}{} [{}] {methods:?} wildcards {:?}",
            self.priority,
            String::from_utf8_lossy(&self.segment),
            self.static_children.len(),
            self.wildcard_names,
        );

        let prefix = format!("{prefix}  ");
        for child in &self.static_children {
            child.dump(out, &prefix, "");
        }
        if let Some(child) = &self.wildcard_child {
            child.dump(out, &prefix, ":");
        }
        if let Some(child) = &self.catch_all_child {
            child.dump(out, &prefix, "*");
        }
    }
}

/// Length of the common byte prefix of two slices.
#[inline]
fn common_prefix_len(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}
