//! Source locations used to attribute failures.

use std::fmt;
use std::panic::Location;

use serde::{Deserialize, Serialize};

/// An immutable `(file, line)` pair identifying where a failure belongs.
///
/// # Example
///
/// ```
/// use sprout::Callsite;
///
/// let site = Callsite::new("calc_spec", 12);
/// assert_eq!(site.file(), "calc_spec");
/// assert_eq!(site.line(), 12);
/// assert_eq!(site.to_string(), "calc_spec:12");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Callsite {
    file: String,
    line: u32,
}

impl Callsite {
    /// Creates a callsite from an explicit file and line.
    #[must_use]
    pub fn new(file: impl Into<String>, line: u32) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }

    /// Captures the location of the caller.
    ///
    /// Functions marked `#[track_caller]` forward their own caller, so a DSL
    /// call such as `it(...)` records the line in the spec file rather than
    /// the line inside this crate.
    #[must_use]
    #[track_caller]
    pub fn caller() -> Self {
        Self::from(Location::caller())
    }

    /// File the callsite points into.
    #[must_use]
    pub fn file(&self) -> &str {
        &self.file
    }

    /// One-based line number.
    #[must_use]
    pub const fn line(&self) -> u32 {
        self.line
    }
}

impl From<&Location<'_>> for Callsite {
    fn from(location: &Location<'_>) -> Self {
        Self::new(location.file(), location.line())
    }
}

impl fmt::Display for Callsite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}
