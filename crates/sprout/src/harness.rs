//! A minimal in-process host runner.
//!
//! [`run_spec`] plays the part of an external test runner: it triggers
//! first use, enumerates invocations, makes each current, asks for its
//! display name, runs it, and collects a [`RunSummary`].
//! [`run_spec_from_env`] wraps it for spec binaries, loading configuration
//! and installing telemetry first.

use std::fmt;

use serde::Serialize;
use sprout_config::{Config, ConfigError};
use tracing::{debug, info};

use crate::bridge::{InvocationId, Outcome, SpecBridge};
use crate::error::{ReportError, SpecError};
use crate::failure::Failure;
use crate::recorder::FailureRecorder;
use crate::spec::Spec;
use crate::telemetry::{self, TelemetryError};
use crate::world::World;

/// Tracing target for harness events.
const HARNESS_TARGET: &str = "sprout::harness";

/// A failure as the host runner received it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordedFailure {
    message: String,
    file: String,
    line: u32,
    expected: bool,
}

impl RecordedFailure {
    /// Failure message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// File the failure is attributed to.
    #[must_use]
    pub fn file(&self) -> &str {
        &self.file
    }

    /// Line the failure is attributed to.
    #[must_use]
    pub const fn line(&self) -> u32 {
        self.line
    }

    /// Whether the failure was flagged as expected.
    #[must_use]
    pub const fn expected(&self) -> bool {
        self.expected
    }
}

impl From<&Failure> for RecordedFailure {
    fn from(failure: &Failure) -> Self {
        Self {
            message: failure.message().to_owned(),
            file: failure.callsite().file().to_owned(),
            line: failure.callsite().line(),
            expected: false,
        }
    }
}

/// Recorder that keeps every failure in memory.
#[derive(Debug, Default)]
pub struct CollectingRecorder {
    failures: Vec<RecordedFailure>,
}

impl CollectingRecorder {
    /// Failures recorded so far, in report order.
    #[must_use]
    pub fn failures(&self) -> &[RecordedFailure] {
        &self.failures
    }

    /// Consumes the recorder, returning its failures.
    #[must_use]
    pub fn into_failures(self) -> Vec<RecordedFailure> {
        self.failures
    }
}

impl FailureRecorder for CollectingRecorder {
    fn record_failure(
        &mut self,
        message: &str,
        file: &str,
        line: u32,
        expected: bool,
    ) -> Result<(), ReportError> {
        debug!(target: HARNESS_TARGET, file, line, expected, "recording failure");
        self.failures.push(RecordedFailure {
            message: message.to_owned(),
            file: file.to_owned(),
            line,
            expected,
        });
        Ok(())
    }
}

/// Final state of one example.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// Completed without error.
    Passed,
    /// Raised an error.
    Failed,
    /// Declared without a body.
    Pending,
}

/// Report for one executed invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExampleReport {
    name: String,
    invocation: String,
    status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    failure: Option<RecordedFailure>,
}

impl ExampleReport {
    fn new(name: String, id: &InvocationId, outcome: &Outcome) -> Self {
        let (status, failure) = match outcome {
            Outcome::Passed => (Status::Passed, None),
            Outcome::Failed(failure) => (Status::Failed, Some(RecordedFailure::from(failure))),
            Outcome::Pending => (Status::Pending, None),
        };
        Self {
            name,
            invocation: id.to_string(),
            status,
            failure,
        }
    }

    /// Display name reported by the bridge.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Identifier of the invocation.
    #[must_use]
    pub fn invocation(&self) -> &str {
        &self.invocation
    }

    /// Final status.
    #[must_use]
    pub const fn status(&self) -> Status {
        self.status
    }

    /// The failure, when the example failed.
    #[must_use]
    pub const fn failure(&self) -> Option<&RecordedFailure> {
        self.failure.as_ref()
    }
}

impl fmt::Display for ExampleReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.status, &self.failure) {
            (Status::Failed, Some(failure)) => write!(
                f,
                "  ✗ {} ({}:{}: {})",
                self.name, failure.file, failure.line, failure.message
            ),
            (Status::Failed, None) => write!(f, "  ✗ {}", self.name),
            (Status::Passed, _) => write!(f, "  ✓ {}", self.name),
            (Status::Pending, _) => write!(f, "  - {} (pending)", self.name),
        }
    }
}

/// Reports for every invocation of one spec, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    spec: String,
    reports: Vec<ExampleReport>,
    passed: usize,
    failed: usize,
    pending: usize,
}

impl RunSummary {
    fn new(spec: &str) -> Self {
        Self {
            spec: spec.to_owned(),
            reports: Vec::new(),
            passed: 0,
            failed: 0,
            pending: 0,
        }
    }

    fn push(&mut self, report: ExampleReport) {
        match report.status {
            Status::Passed => self.passed += 1,
            Status::Failed => self.failed += 1,
            Status::Pending => self.pending += 1,
        }
        self.reports.push(report);
    }

    /// Name of the spec that ran.
    #[must_use]
    pub fn spec(&self) -> &str {
        &self.spec
    }

    /// Per-example reports in execution order.
    #[must_use]
    pub fn reports(&self) -> &[ExampleReport] {
        &self.reports
    }

    /// Number of passing examples.
    #[must_use]
    pub const fn passed(&self) -> usize {
        self.passed
    }

    /// Number of failing examples.
    #[must_use]
    pub const fn failed(&self) -> usize {
        self.failed
    }

    /// Number of pending examples.
    #[must_use]
    pub const fn pending(&self) -> usize {
        self.pending
    }

    /// Returns `true` when no example failed.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.failed == 0
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.spec)?;
        for report in &self.reports {
            writeln!(f, "{report}")?;
        }
        writeln!(
            f,
            "\n{} passed, {} failed, {} pending",
            self.passed, self.failed, self.pending
        )
    }
}

/// Errors raised by [`run_spec_from_env`] before or while running a spec.
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    /// The configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The tracing subscriber could not be installed.
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
    /// The spec could not be compiled or run.
    #[error(transparent)]
    Spec(#[from] SpecError),
}

/// Entry point for a spec binary: loads [`Config`] from the environment,
/// installs the tracing subscriber, and runs `S` against the shared
/// [`World`].
///
/// # Errors
///
/// Returns [`HarnessError`] when configuration, telemetry, or the run
/// itself fails. Example failures are reported in the summary, not here.
pub fn run_spec_from_env<S: Spec>() -> Result<RunSummary, HarnessError> {
    let config = Config::from_env()?;
    let format = telemetry::initialise(&config)?;
    debug!(target: HARNESS_TARGET, spec = S::name(), %format, "telemetry ready");
    Ok(run_spec::<S>(World::shared(), &config)?)
}

/// Runs every example of `S`, recording failures in memory.
///
/// # Errors
///
/// Returns [`SpecError::Compilation`] when `S` cannot be compiled, or any
/// bridge contract violation raised while running.
pub fn run_spec<S: Spec>(world: &World, config: &Config) -> Result<RunSummary, SpecError> {
    let mut recorder = CollectingRecorder::default();
    run_spec_with::<S, _>(world, config, &mut recorder)
}

/// Runs every example of `S`, reporting failures through `recorder`.
///
/// # Errors
///
/// Returns [`SpecError::Compilation`] when `S` cannot be compiled,
/// [`SpecError::Report`] when `recorder` fails, or a bridge contract
/// violation.
pub fn run_spec_with<S, R>(
    world: &World,
    config: &Config,
    recorder: &mut R,
) -> Result<RunSummary, SpecError>
where
    S: Spec,
    R: FailureRecorder + ?Sized,
{
    let mut bridge = SpecBridge::for_spec::<S>(world, config)?;
    let ids: Vec<InvocationId> = bridge
        .invocations()
        .iter()
        .map(|invocation| invocation.id().clone())
        .collect();

    let mut summary = RunSummary::new(bridge.spec());
    for id in ids {
        bridge.set_current_invocation(&id);
        let name = bridge.display_name()?;
        let outcome = bridge.run_current(recorder)?;
        summary.push(ExampleReport::new(name, &id, &outcome));
    }

    info!(
        target: HARNESS_TARGET,
        spec = summary.spec(),
        passed = summary.passed(),
        failed = summary.failed(),
        pending = summary.pending(),
        "spec run finished"
    );
    Ok(summary)
}
