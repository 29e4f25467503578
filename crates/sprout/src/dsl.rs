//! The builder threaded through spec-building closures.
//!
//! [`SpecBuilder`] owns the "current group": registering a group pushes a new
//! scope, runs its build closure, then pops the scope back into its parent.
//! Examples and hooks always attach to whichever scope is open.

use std::sync::Arc;

use crate::callsite::Callsite;
use crate::example::{Example, ExampleResult};
use crate::group::ExampleGroup;

/// Collects groups, examples, and hooks while a spec's tree is built.
///
/// # Example
///
/// ```
/// use sprout::{ExampleError, Spec, SpecBuilder};
///
/// struct StackSpec;
///
/// impl Spec for StackSpec {
///     fn spec(s: &mut SpecBuilder) {
///         s.describe("Stack", |s| {
///             s.context("when empty", |s| {
///                 s.it("has no top", || Ok(()));
///                 s.pending("pops to None");
///             });
///             s.it("pushes", || Err(ExampleError::new("not implemented")));
///         });
///     }
/// }
/// ```
#[derive(Debug)]
pub struct SpecBuilder {
    root: ExampleGroup,
    open: Vec<ExampleGroup>,
}

impl SpecBuilder {
    pub(crate) const fn new(root: ExampleGroup) -> Self {
        Self {
            root,
            open: Vec::new(),
        }
    }

    /// Opens a nested group for the duration of `build`.
    pub fn register_group<F>(&mut self, description: impl Into<String>, build: F)
    where
        F: FnOnce(&mut Self),
    {
        self.open.push(ExampleGroup::new(description.into()));
        build(self);
        if let Some(group) = self.open.pop() {
            self.current().push_group(group);
        }
    }

    /// Registers an example under the current group.
    pub fn register_example<F>(
        &mut self,
        description: impl Into<String>,
        callsite: Callsite,
        body: F,
    )
    where
        F: Fn() -> ExampleResult + Send + Sync + 'static,
    {
        let example = Example::new(
            description.into(),
            self.ancestry(),
            callsite,
            Some(Arc::new(body)),
        );
        self.current().push_example(example);
    }

    /// Alias for [`register_group`](Self::register_group).
    pub fn describe<F>(&mut self, description: impl Into<String>, build: F)
    where
        F: FnOnce(&mut Self),
    {
        self.register_group(description, build);
    }

    /// Alias for [`register_group`](Self::register_group), read as a
    /// condition.
    pub fn context<F>(&mut self, description: impl Into<String>, build: F)
    where
        F: FnOnce(&mut Self),
    {
        self.register_group(description, build);
    }

    /// Registers an example defined at the caller's location.
    #[track_caller]
    pub fn it<F>(&mut self, description: impl Into<String>, body: F)
    where
        F: Fn() -> ExampleResult + Send + Sync + 'static,
    {
        let callsite = Callsite::caller();
        self.register_example(description, callsite, body);
    }

    /// Registers an example that is discovered but never run.
    #[track_caller]
    pub fn pending(&mut self, description: impl Into<String>) {
        let example = Example::new(description.into(), self.ancestry(), Callsite::caller(), None);
        self.current().push_example(example);
    }

    /// Adds a hook run before every example beneath the current group.
    pub fn before_each<F>(&mut self, hook: F)
    where
        F: Fn() -> ExampleResult + Send + Sync + 'static,
    {
        self.current().push_before_each(Arc::new(hook));
    }

    /// Adds a hook run after every example beneath the current group.
    pub fn after_each<F>(&mut self, hook: F)
    where
        F: Fn() -> ExampleResult + Send + Sync + 'static,
    {
        self.current().push_after_each(Arc::new(hook));
    }

    /// Closes any scopes left open and returns the finished root group.
    pub(crate) fn finish(mut self) -> ExampleGroup {
        while let Some(group) = self.open.pop() {
            self.current().push_group(group);
        }
        self.root
    }

    fn current(&mut self) -> &mut ExampleGroup {
        self.open.last_mut().unwrap_or(&mut self.root)
    }

    fn ancestry(&self) -> Vec<String> {
        self.open
            .iter()
            .map(|group| group.description().to_owned())
            .collect()
    }
}
