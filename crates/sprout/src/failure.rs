//! A raised example error paired with the location it is attributed to.

use crate::callsite::Callsite;
use crate::error::ExampleError;

/// Failure of a single example, ready to be reported to the host runner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    error: ExampleError,
    callsite: Callsite,
}

impl Failure {
    /// Pairs an error with an explicit callsite.
    #[must_use]
    pub const fn new(error: ExampleError, callsite: Callsite) -> Self {
        Self { error, callsite }
    }

    /// Builds a failure, preferring the location attached to the error and
    /// falling back to `definition` when the error carries none.
    ///
    /// # Example
    ///
    /// ```
    /// use sprout::{Callsite, ExampleError, Failure};
    ///
    /// let definition = Callsite::new("calc_spec", 12);
    /// let failure = Failure::resolve(ExampleError::new("expected 4, got 5"), &definition);
    /// assert_eq!(failure.callsite(), &definition);
    /// ```
    #[must_use]
    pub fn resolve(error: ExampleError, definition: &Callsite) -> Self {
        let callsite = error.location().unwrap_or(definition).clone();
        Self::new(error, callsite)
    }

    /// The error raised by the example.
    #[must_use]
    pub const fn error(&self) -> &ExampleError {
        &self.error
    }

    /// Where the failure is attributed.
    #[must_use]
    pub const fn callsite(&self) -> &Callsite {
        &self.callsite
    }

    /// Message reported to the host runner.
    #[must_use]
    pub fn message(&self) -> &str {
        self.error.message()
    }
}
