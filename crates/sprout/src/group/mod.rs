//! Tree nodes holding nested groups, examples, and per-example hooks.
//!
//! Children keep their declaration order with groups and examples
//! interleaved, so a pre-order walk yields examples exactly in the order the
//! spec declared them.

use std::fmt;
use std::sync::Arc;

use crate::example::{Body, Example, ExampleResult};
use crate::unwind;

enum Node {
    Group(ExampleGroup),
    Example(Arc<Example>),
}

/// A `describe` or `context` scope.
///
/// The root group of every spec has an empty description and does not
/// contribute to example names.
pub struct ExampleGroup {
    description: String,
    children: Vec<Node>,
    before_each: Vec<Body>,
    after_each: Vec<Body>,
}

impl ExampleGroup {
    pub(crate) const fn new(description: String) -> Self {
        Self {
            description,
            children: Vec::new(),
            before_each: Vec::new(),
            after_each: Vec::new(),
        }
    }

    pub(crate) const fn root() -> Self {
        Self::new(String::new())
    }

    /// The group's description; empty for a root group.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Direct child groups in declaration order.
    pub fn groups(&self) -> impl Iterator<Item = &Self> {
        self.children.iter().filter_map(|node| match node {
            Node::Group(group) => Some(group),
            Node::Example(_) => None,
        })
    }

    /// Direct child examples in declaration order.
    pub fn examples(&self) -> impl Iterator<Item = &Arc<Example>> {
        self.children.iter().filter_map(|node| match node {
            Node::Example(example) => Some(example),
            Node::Group(_) => None,
        })
    }

    /// Every example beneath this group, depth first, in declaration order.
    #[must_use]
    pub fn flatten(&self) -> Vec<Arc<Example>> {
        let mut out = Vec::new();
        self.collect_examples(&mut out);
        out
    }

    /// Number of examples beneath this group.
    #[must_use]
    pub fn example_count(&self) -> usize {
        self.children
            .iter()
            .map(|node| match node {
                Node::Group(group) => group.example_count(),
                Node::Example(_) => 1,
            })
            .sum()
    }

    /// Flattens the tree, pairing each example with the hooks that wrap it.
    pub(crate) fn schedule(&self) -> Vec<Scheduled> {
        let mut out = Vec::new();
        self.schedule_into(&[], &[], &mut out);
        out
    }

    pub(crate) fn push_group(&mut self, group: Self) {
        self.children.push(Node::Group(group));
    }

    pub(crate) fn push_example(&mut self, example: Example) {
        self.children.push(Node::Example(Arc::new(example)));
    }

    pub(crate) fn push_before_each(&mut self, hook: Body) {
        self.before_each.push(hook);
    }

    pub(crate) fn push_after_each(&mut self, hook: Body) {
        self.after_each.push(hook);
    }

    fn collect_examples(&self, out: &mut Vec<Arc<Example>>) {
        for node in &self.children {
            match node {
                Node::Group(group) => group.collect_examples(out),
                Node::Example(example) => out.push(Arc::clone(example)),
            }
        }
    }

    fn schedule_into(&self, outer_before: &[Body], outer_after: &[Body], out: &mut Vec<Scheduled>) {
        let before: Vec<Body> = outer_before
            .iter()
            .chain(&self.before_each)
            .cloned()
            .collect();
        let after: Vec<Body> = self
            .after_each
            .iter()
            .chain(outer_after)
            .cloned()
            .collect();

        for node in &self.children {
            match node {
                Node::Group(group) => group.schedule_into(&before, &after, out),
                Node::Example(example) => out.push(Scheduled {
                    example: Arc::clone(example),
                    before: before.clone(),
                    after: after.clone(),
                }),
            }
        }
    }
}

impl fmt::Debug for ExampleGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExampleGroup")
            .field("description", &self.description)
            .field("groups", &self.groups().collect::<Vec<_>>())
            .field("examples", &self.examples().collect::<Vec<_>>())
            .field("before_each", &self.before_each.len())
            .field("after_each", &self.after_each.len())
            .finish()
    }
}

/// An example together with the hooks that run around it.
///
/// `before` runs outermost group first; `after` runs innermost first.
pub(crate) struct Scheduled {
    example: Arc<Example>,
    before: Vec<Body>,
    after: Vec<Body>,
}

impl Scheduled {
    pub(crate) const fn example(&self) -> &Arc<Example> {
        &self.example
    }

    /// Runs hooks and body. After-hooks still run when the body fails; the
    /// first error is the one returned.
    pub(crate) fn run(&self) -> ExampleResult {
        let mut outcome = self
            .before
            .iter()
            .try_for_each(|hook| unwind::guarded(|| hook()));
        if outcome.is_ok() {
            outcome = self.example.run();
        }
        for hook in &self.after {
            let result = unwind::guarded(|| hook());
            if outcome.is_ok() {
                outcome = result;
            }
        }
        outcome
    }
}

#[cfg(test)]
mod tests;
