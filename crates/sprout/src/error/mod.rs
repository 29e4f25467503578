//! Errors raised while compiling, running, and reporting examples.
//!
//! [`ExampleError`] is what an example body hands back when it fails; the
//! execution wrapper converts it into a [`Failure`](crate::Failure).
//! [`SpecError`] covers everything the bridge itself cannot recover from.
//! [`ReportError`] is produced by host runners whose recording channel fails.

use std::borrow::Cow;

use thiserror::Error;

use crate::callsite::Callsite;

/// Failure raised by an example body, hook, or the panic it converted from.
///
/// The optional location is set by matcher libraries that know exactly which
/// line produced the failure. When absent, the failure is attributed to the
/// example's definition callsite.
///
/// # Example
///
/// ```
/// use sprout::{Callsite, ExampleError};
///
/// let bare = ExampleError::new("expected 4, got 5");
/// assert!(bare.location().is_none());
///
/// let located = ExampleError::at("expected 4, got 5", Callsite::new("calc_spec", 14));
/// assert_eq!(located.location().map(Callsite::line), Some(14));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ExampleError {
    message: String,
    location: Option<Callsite>,
}

impl ExampleError {
    /// Creates an error without location metadata.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            location: None,
        }
    }

    /// Creates an error attributed to an explicit location.
    #[must_use]
    pub fn at(message: impl Into<String>, location: Callsite) -> Self {
        Self {
            message: message.into(),
            location: Some(location),
        }
    }

    /// Creates an error attributed to the caller's location.
    #[must_use]
    #[track_caller]
    pub fn here(message: impl Into<String>) -> Self {
        Self::at(message, Callsite::caller())
    }

    /// Human-readable failure description.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Location attached by whoever raised the error, if any.
    #[must_use]
    pub const fn location(&self) -> Option<&Callsite> {
        self.location.as_ref()
    }
}

impl From<&str> for ExampleError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

impl From<String> for ExampleError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

/// Raised by a host runner when it cannot record a failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to record failure: {message}")]
pub struct ReportError {
    message: Cow<'static, str>,
}

impl ReportError {
    /// Creates a report error with the given description.
    #[must_use]
    pub fn new(message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Description of the recording failure.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Unrecoverable errors surfaced by the world and the bridge.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpecError {
    /// The spec-building closure panicked while the example tree was built.
    #[error(
        "{spec}: an error was raised while building the example tree: {message}. \
         An expectation was most likely evaluated outside of an `it` block; \
         move it into an example body"
    )]
    Compilation {
        /// Name of the spec whose tree could not be built.
        spec: &'static str,
        /// Message carried by the raised error.
        message: String,
    },

    /// An invocation was executed or named without an example bound to it.
    #[error("{spec}: invocation '{invocation}' has no bound example")]
    UnboundInvocation {
        /// Name of the spec the bridge serves.
        spec: &'static str,
        /// Identifier that failed to resolve.
        invocation: String,
    },

    /// A display name was requested before any invocation was made current.
    #[error("{spec}: no invocation is currently executing")]
    NoCurrentInvocation {
        /// Name of the spec the bridge serves.
        spec: &'static str,
    },

    /// The host runner failed to record a failure.
    #[error(transparent)]
    Report(#[from] ReportError),
}
