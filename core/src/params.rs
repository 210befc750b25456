//! Path parameters captured by a route match.

use std::collections::HashMap;
use std::num::ParseIntError;

use thiserror::Error;

/// One captured `(name, value)` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    /// Wildcard or catch-all name from the route pattern.
    pub name: String,
    /// Percent-decoded path text bound to the name.
    pub value: String,
}

impl Param {
    /// Create a parameter.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Error from a typed parameter accessor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParamError {
    /// The value is absent, has a non-digit after the first byte, or is out
    /// of range.
    #[error("parameter \"{name}\" value \"{value}\" is not a valid integer: {source}")]
    Parse {
        /// Parameter name that was requested.
        name: String,
        /// Text that failed to parse (empty when absent).
        value: String,
        /// Underlying parse failure.
        #[source]
        source: ParseIntError,
    },

    /// The value starts with something other than an ASCII digit, such as a sign.
    #[error("parameter \"{name}\" value \"{value}\" is not an unsigned base-10 integer")]
    NotDigits {
        /// Parameter name that was requested.
        name: String,
        /// Text that was rejected.
        value: String,
    },
}

/// Ordered parameters of one match, outermost pattern segment first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(Vec<Param>);

impl Params {
    /// Empty parameter list.
    #[must_use]
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Value of the first parameter called `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.value.as_str())
    }

    /// Value of `name`, or `""` when absent.
    #[must_use]
    pub fn text(&self, name: &str) -> &str {
        self.get(name).unwrap_or_default()
    }

    /// Parse `name` as an unsigned base-10 `u32`.
    ///
    /// # Errors
    ///
    /// Returns [`ParamError::NotDigits`] when the value does not start with a
    /// digit, and [`ParamError::Parse`] when it is absent, non-numeric or
    /// larger than `u32::MAX`.
    pub fn uint32(&self, name: &str) -> Result<u32, ParamError> {
        self.parse(name)
    }

    /// Parse `name` as an unsigned base-10 `u64`.
    ///
    /// # Errors
    ///
    /// Returns [`ParamError::NotDigits`] when the value does not start with a
    /// digit, and [`ParamError::Parse`] when it is absent or non-numeric.
    pub fn uint64(&self, name: &str) -> Result<u64, ParamError> {
        self.parse(name)
    }

    fn parse<T>(&self, name: &str) -> Result<T, ParamError>
    where
        T: std::str::FromStr<Err = ParseIntError>,
    {
        let value = self.text(name);
        // `str::parse` takes a leading '+'.
        if value.starts_with(|c: char| !c.is_ascii_digit()) {
            return Err(ParamError::NotDigits {
                name: name.to_owned(),
                value: value.to_owned(),
            });
        }
        value.parse::<T>().map_err(|source| ParamError::Parse {
            name: name.to_owned(),
            value: value.to_owned(),
            source,
        })
    }

    /// Materialize as a name → value map.
    #[must_use]
    pub fn to_map(&self) -> HashMap<String, String> {
        self.0
            .iter()
            .map(|p| (p.name.clone(), p.value.clone()))
            .collect()
    }

    /// Iterate in pattern order.
    pub fn iter(&self) -> std::slice::Iter<'_, Param> {
        self.0.iter()
    }

    /// Number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` for a match without wildcards.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrow as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[Param] {
        &self.0
    }

    pub(crate) fn last_mut(&mut self) -> Option<&mut Param> {
        self.0.last_mut()
    }
}

impl From<Vec<Param>> for Params {
    fn from(params: Vec<Param>) -> Self {
        Self(params)
    }
}

impl<'a> IntoIterator for &'a Params {
    type Item = &'a Param;
    type IntoIter = std::slice::Iter<'a, Param>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
