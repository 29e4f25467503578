//! Leaf nodes of the example tree.

use std::fmt;
use std::sync::{Arc, OnceLock};

use crate::callsite::Callsite;
use crate::error::ExampleError;
use crate::unwind;

/// Outcome of an example body or hook.
pub type ExampleResult = Result<(), ExampleError>;

/// Shared, thread-safe closure used for example bodies and hooks.
pub(crate) type Body = Arc<dyn Fn() -> ExampleResult + Send + Sync>;

/// A single example registered with `it`.
///
/// Examples are immutable once registered, apart from the generated
/// invocation name which the bridge assigns exactly once.
pub struct Example {
    description: String,
    ancestry: Vec<String>,
    callsite: Callsite,
    body: Option<Body>,
    generated_name: OnceLock<String>,
}

impl Example {
    pub(crate) fn new(
        description: String,
        ancestry: Vec<String>,
        callsite: Callsite,
        body: Option<Body>,
    ) -> Self {
        Self {
            description,
            ancestry,
            callsite,
            body,
            generated_name: OnceLock::new(),
        }
    }

    /// The example's own description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Descriptions of the enclosing groups, outermost first.
    #[must_use]
    pub fn ancestry(&self) -> &[String] {
        &self.ancestry
    }

    /// Ancestor descriptions followed by the example description, joined by
    /// `separator`.
    ///
    /// ```
    /// use sprout::{Spec, SpecBuilder, World};
    ///
    /// struct CalculatorSpec;
    /// impl Spec for CalculatorSpec {
    ///     fn spec(s: &mut SpecBuilder) {
    ///         s.describe("Calculator", |s| {
    ///             s.describe("Addition", |s| s.it("adds two positives", || Ok(())));
    ///         });
    ///     }
    /// }
    ///
    /// let world = World::new();
    /// let root = world.root_for::<CalculatorSpec>().compile().unwrap();
    /// let examples = root.flatten();
    /// assert_eq!(
    ///     examples[0].full_description(" "),
    ///     "Calculator Addition adds two positives"
    /// );
    /// ```
    #[must_use]
    pub fn full_description(&self, separator: &str) -> String {
        self.ancestry
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(self.description.as_str()))
            .collect::<Vec<_>>()
            .join(separator)
    }

    /// Where the example was defined.
    #[must_use]
    pub const fn callsite(&self) -> &Callsite {
        &self.callsite
    }

    /// Whether the example was registered without a body.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.body.is_none()
    }

    /// Invocation identifier assigned during invocation generation.
    #[must_use]
    pub fn generated_name(&self) -> Option<&str> {
        self.generated_name.get().map(String::as_str)
    }

    /// Assigns the generated name, returning the name that ends up stored.
    ///
    /// The first assignment wins; generation is deterministic, so later
    /// attempts compute the same name.
    pub(crate) fn assign_name(&self, name: String) -> &str {
        self.generated_name.get_or_init(|| name)
    }

    /// Runs the body, converting panics into errors. Pending examples pass.
    pub(crate) fn run(&self) -> ExampleResult {
        match &self.body {
            Some(body) => unwind::guarded(|| body()),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for Example {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Example")
            .field("description", &self.description)
            .field("ancestry", &self.ancestry)
            .field("callsite", &self.callsite)
            .field("pending", &self.is_pending())
            .field("generated_name", &self.generated_name.get())
            .finish_non_exhaustive()
    }
}
