//! Bridge between a compiled example tree and a host test runner.
//!
//! A [`SpecBridge`] is built once per spec type. It triggers the spec's
//! one-time compilation, flattens the tree, and generates one
//! [`Invocation`] per example. The runner discovers the invocations, tells
//! the bridge which one is current, asks for its display name, and has the
//! bridge run it. The association between an invocation and its example
//! lives in a side-table owned by the bridge, keyed by [`InvocationId`].

mod naming;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use sprout_config::Config;
use tracing::{debug, info, warn};

use crate::error::SpecError;
use crate::example::Example;
use crate::failure::Failure;
use crate::group::{ExampleGroup, Scheduled};
use crate::recorder::FailureRecorder;
use crate::spec::Spec;
use crate::world::World;

use self::naming::IdentifierAllocator;

/// Tracing target for invocation generation and execution.
const BRIDGE_TARGET: &str = "sprout::bridge";

/// Failures raised by examples are never expected failures.
const EXPECTED_FAILURE: bool = false;

/// Stable identifier of a generated invocation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InvocationId(String);

impl InvocationId {
    /// Wraps a raw identifier, e.g. one echoed back by a host runner.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A runner-discoverable unit of work bound to one example.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    id: InvocationId,
    spec: &'static str,
    index: usize,
}

impl Invocation {
    /// Identifier the runner uses to refer back to this invocation.
    #[must_use]
    pub const fn id(&self) -> &InvocationId {
        &self.id
    }

    /// Name of the spec the invocation belongs to.
    #[must_use]
    pub const fn spec(&self) -> &'static str {
        self.spec
    }

    /// Position in declaration order.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }
}

/// Result of executing one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The example and its hooks completed without error.
    Passed,
    /// The example raised; the failure has been reported.
    Failed(Failure),
    /// The example has no body and was not run.
    Pending,
}

impl Outcome {
    /// Returns `true` for [`Outcome::Passed`].
    #[must_use]
    pub const fn is_passed(&self) -> bool {
        matches!(self, Self::Passed)
    }

    /// The reported failure, if any.
    #[must_use]
    pub const fn failure(&self) -> Option<&Failure> {
        match self {
            Self::Failed(failure) => Some(failure),
            Self::Passed | Self::Pending => None,
        }
    }
}

/// Compiles a spec type into invocations and runs them on behalf of a host.
///
/// # Example
///
/// ```
/// use sprout::{Config, ExampleError, Outcome, Spec, SpecBridge, SpecBuilder, World};
/// use sprout::harness::CollectingRecorder;
///
/// struct CalculatorSpec;
///
/// impl Spec for CalculatorSpec {
///     fn spec(s: &mut SpecBuilder) {
///         s.describe("Calculator", |s| {
///             s.it("adds", || Err(ExampleError::new("expected 4, got 5")));
///         });
///     }
/// }
///
/// let world = World::new();
/// let mut bridge = SpecBridge::for_spec::<CalculatorSpec>(&world, &Config::default()).unwrap();
/// let id = bridge.invocations()[0].id().clone();
/// bridge.set_current_invocation(&id);
/// assert_eq!(bridge.display_name().unwrap(), "CalculatorSpec: Calculator adds");
///
/// let mut recorder = CollectingRecorder::default();
/// let outcome = bridge.run_current(&mut recorder).unwrap();
/// assert!(matches!(outcome, Outcome::Failed(_)));
/// assert_eq!(recorder.failures()[0].message(), "expected 4, got 5");
/// ```
pub struct SpecBridge {
    spec: &'static str,
    separator: String,
    invocations: Vec<Invocation>,
    bindings: HashMap<InvocationId, Scheduled>,
    current: Option<InvocationId>,
}

impl SpecBridge {
    /// First-use hook: compiles `S`'s example tree if it has not been
    /// compiled yet and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`SpecError::Compilation`] when the spec-building closure
    /// raised. The condition is fatal for the spec type.
    pub fn first_use<S: Spec>(world: &World) -> Result<Arc<ExampleGroup>, SpecError> {
        world.root_for::<S>().compile()
    }

    /// Compiles `S` (once per process) and generates its invocations.
    ///
    /// # Errors
    ///
    /// Returns [`SpecError::Compilation`] when the spec's tree cannot be
    /// built; no invocations exist in that case.
    pub fn for_spec<S: Spec>(world: &World, config: &Config) -> Result<Self, SpecError> {
        let root = Self::first_use::<S>(world)?;
        Ok(Self::from_tree(S::name(), &root, config.name_separator()))
    }

    /// Generates invocations for an already compiled tree.
    #[must_use]
    pub fn from_tree(
        spec: &'static str,
        root: &ExampleGroup,
        separator: impl Into<String>,
    ) -> Self {
        let mut names = IdentifierAllocator::default();
        let scheduled = root.schedule();
        let mut invocations = Vec::with_capacity(scheduled.len());
        let mut bindings = HashMap::with_capacity(scheduled.len());

        for (index, entry) in scheduled.into_iter().enumerate() {
            let allocated = names.allocate(entry.example());
            let id = InvocationId::new(entry.example().assign_name(allocated));
            debug!(
                target: BRIDGE_TARGET,
                spec,
                invocation = %id,
                index,
                "generated invocation"
            );
            invocations.push(Invocation {
                id: id.clone(),
                spec,
                index,
            });
            bindings.insert(id, entry);
        }

        debug!(
            target: BRIDGE_TARGET,
            spec,
            invocations = invocations.len(),
            "invocation list ready"
        );
        Self {
            spec,
            separator: separator.into(),
            invocations,
            bindings,
            current: None,
        }
    }

    /// Name of the spec this bridge serves.
    #[must_use]
    pub const fn spec(&self) -> &'static str {
        self.spec
    }

    /// Invocations in declaration order.
    #[must_use]
    pub fn invocations(&self) -> &[Invocation] {
        &self.invocations
    }

    /// The example bound to `id`.
    ///
    /// # Errors
    ///
    /// Returns [`SpecError::UnboundInvocation`] when `id` was not generated
    /// by this bridge.
    pub fn example(&self, id: &InvocationId) -> Result<&Arc<Example>, SpecError> {
        self.resolve(id).map(Scheduled::example)
    }

    /// Records which invocation the host is about to run.
    pub fn set_current_invocation(&mut self, id: &InvocationId) {
        self.current = Some(id.clone());
    }

    /// The invocation most recently made current.
    #[must_use]
    pub const fn current_invocation(&self) -> Option<&InvocationId> {
        self.current.as_ref()
    }

    /// Display name of the current invocation.
    ///
    /// # Errors
    ///
    /// Returns [`SpecError::NoCurrentInvocation`] before any invocation was
    /// made current, or [`SpecError::UnboundInvocation`] when the current
    /// identifier has no example bound to it.
    pub fn display_name(&self) -> Result<String, SpecError> {
        let id = self.current_id()?;
        self.display_name_of(id)
    }

    /// Display name of `id`: `"<spec>: <groups...> <description>"`.
    ///
    /// # Errors
    ///
    /// Returns [`SpecError::UnboundInvocation`] when `id` has no example bound
    /// to it.
    pub fn display_name_of(&self, id: &InvocationId) -> Result<String, SpecError> {
        let example = self.example(id)?;
        Ok(format!(
            "{}: {}",
            self.spec,
            example.full_description(&self.separator)
        ))
    }

    /// Runs the current invocation.
    ///
    /// # Errors
    ///
    /// See [`run`](Self::run); additionally returns
    /// [`SpecError::NoCurrentInvocation`] when nothing is current.
    pub fn run_current<R>(&self, recorder: &mut R) -> Result<Outcome, SpecError>
    where
        R: FailureRecorder + ?Sized,
    {
        let id = self.current_id()?;
        self.run(id, recorder)
    }

    /// Runs the example bound to `id`, reporting a failure through
    /// `recorder` when it raises.
    ///
    /// The failure is attributed to the location attached to the raised
    /// error, or to the example's definition when none is attached.
    ///
    /// # Errors
    ///
    /// Returns [`SpecError::UnboundInvocation`] when `id` has no bound
    /// example, or [`SpecError::Report`] when the recorder fails. Example
    /// failures themselves are not errors; they yield [`Outcome::Failed`].
    pub fn run<R>(&self, id: &InvocationId, recorder: &mut R) -> Result<Outcome, SpecError>
    where
        R: FailureRecorder + ?Sized,
    {
        let scheduled = self.resolve(id)?;
        let example = scheduled.example();
        if example.is_pending() {
            info!(
                target: BRIDGE_TARGET,
                spec = self.spec,
                invocation = %id,
                "example pending"
            );
            return Ok(Outcome::Pending);
        }

        debug!(target: BRIDGE_TARGET, spec = self.spec, invocation = %id, "running example");
        let Err(error) = scheduled.run() else {
            debug!(target: BRIDGE_TARGET, spec = self.spec, invocation = %id, "example passed");
            return Ok(Outcome::Passed);
        };

        let failure = Failure::resolve(error, example.callsite());
        warn!(
            target: BRIDGE_TARGET,
            spec = self.spec,
            invocation = %id,
            callsite = %failure.callsite(),
            reason = failure.message(),
            "example failed"
        );
        recorder.record_failure(
            failure.message(),
            failure.callsite().file(),
            failure.callsite().line(),
            EXPECTED_FAILURE,
        )?;
        Ok(Outcome::Failed(failure))
    }

    fn current_id(&self) -> Result<&InvocationId, SpecError> {
        self.current
            .as_ref()
            .ok_or(SpecError::NoCurrentInvocation { spec: self.spec })
    }

    fn resolve(&self, id: &InvocationId) -> Result<&Scheduled, SpecError> {
        self.bindings
            .get(id)
            .ok_or_else(|| SpecError::UnboundInvocation {
                spec: self.spec,
                invocation: id.to_string(),
            })
    }
}

impl fmt::Debug for SpecBridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpecBridge")
            .field("spec", &self.spec)
            .field("separator", &self.separator)
            .field("invocations", &self.invocations)
            .field("current", &self.current)
            .finish_non_exhaustive()
    }
}
