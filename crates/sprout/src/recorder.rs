//! The channel through which failures reach the host test runner.

use crate::error::ReportError;

/// Host-runner side of failure reporting.
///
/// The bridge calls [`record_failure`](Self::record_failure) once per
/// failing example, always with `expected` set to `false`. Implementations
/// that cannot record the failure return a [`ReportError`], which the bridge
/// propagates instead of swallowing.
///
/// # Example
///
/// ```
/// use sprout::{FailureRecorder, ReportError};
///
/// #[derive(Default)]
/// struct Lines(Vec<String>);
///
/// impl FailureRecorder for Lines {
///     fn record_failure(
///         &mut self,
///         message: &str,
///         file: &str,
///         line: u32,
///         _expected: bool,
///     ) -> Result<(), ReportError> {
///         self.0.push(format!("{file}:{line}: {message}"));
///         Ok(())
///     }
/// }
/// ```
pub trait FailureRecorder {
    /// Records a failure at `file:line`.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError`] when the host cannot accept the failure.
    fn record_failure(
        &mut self,
        message: &str,
        file: &str,
        line: u32,
        expected: bool,
    ) -> Result<(), ReportError>;
}

impl<T> FailureRecorder for &mut T
where
    T: FailureRecorder + ?Sized,
{
    fn record_failure(
        &mut self,
        message: &str,
        file: &str,
        line: u32,
        expected: bool,
    ) -> Result<(), ReportError> {
        (**self).record_failure(message, file, line, expected)
    }
}
