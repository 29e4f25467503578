//! Unit tests for tree construction and flattening.

use rstest::{fixture, rstest};

use super::*;
use crate::callsite::Callsite;
use crate::dsl::SpecBuilder;
use crate::error::ExampleError;

fn build(declare: impl FnOnce(&mut SpecBuilder)) -> ExampleGroup {
    let mut builder = SpecBuilder::new(ExampleGroup::root());
    declare(&mut builder);
    builder.finish()
}

fn descriptions(group: &ExampleGroup) -> Vec<String> {
    group
        .flatten()
        .iter()
        .map(|example| example.description().to_owned())
        .collect()
}

#[fixture]
fn nested() -> ExampleGroup {
    build(|s| {
        s.it("1", || Ok(()));
        s.describe("A", |s| {
            s.it("2", || Ok(()));
            s.context("B", |s| {
                s.it("3", || Ok(()));
                s.it("4", || Ok(()));
            });
            s.it("5", || Ok(()));
            s.describe("C", |s| s.it("6", || Ok(())));
        });
        s.describe("D", |_| {});
        s.it("7", || Ok(()));
    })
}

#[test]
fn root_group_is_unnamed_and_empty() {
    let root = build(|_| {});
    assert_eq!(root.description(), "");
    assert!(root.flatten().is_empty());
    assert_eq!(root.example_count(), 0);
}

#[rstest]
fn flatten_is_pre_order_in_declaration_order(nested: ExampleGroup) {
    assert_eq!(descriptions(&nested), ["1", "2", "3", "4", "5", "6", "7"]);
}

#[rstest]
fn flatten_is_deterministic(nested: ExampleGroup) {
    assert_eq!(descriptions(&nested), descriptions(&nested));
}

#[rstest]
fn example_count_matches_flatten(nested: ExampleGroup) {
    assert_eq!(nested.example_count(), nested.flatten().len());
}

#[rstest]
fn direct_children_keep_their_order(nested: ExampleGroup) {
    let groups: Vec<&str> = nested.groups().map(ExampleGroup::description).collect();
    assert_eq!(groups, ["A", "D"]);
    let examples: Vec<&str> = nested.examples().map(|e| e.description()).collect();
    assert_eq!(examples, ["1", "7"]);
}

#[rstest]
fn examples_record_their_ancestry(nested: ExampleGroup) {
    let flattened = nested.flatten();
    let third = flattened.get(2).expect("third example");
    assert_eq!(third.ancestry(), ["A", "B"]);
    assert_eq!(third.full_description(" "), "A B 3");
    let first = flattened.first().expect("first example");
    assert!(first.ancestry().is_empty());
    assert_eq!(first.full_description(" "), "1");
}

#[test]
fn it_records_the_caller_location() {
    let line = line!() + 2;
    let root = build(|s| {
        s.it("located", || Ok(()));
    });
    let flattened = root.flatten();
    let example = flattened.first().expect("one example");
    assert_eq!(example.callsite().line(), line);
    assert_eq!(example.callsite().file(), file!());
}

#[test]
fn register_example_keeps_explicit_callsite() {
    let root = build(|s| {
        s.register_example("explicit", Callsite::new("calc_spec", 12), || Ok(()));
    });
    let flattened = root.flatten();
    let example = flattened.first().expect("one example");
    assert_eq!(example.callsite(), &Callsite::new("calc_spec", 12));
    assert!(!example.is_pending());
}

#[test]
fn pending_examples_have_no_body() {
    let root = build(|s| s.pending("later"));
    let flattened = root.flatten();
    let example = flattened.first().expect("one example");
    assert!(example.is_pending());
    assert_eq!(example.run(), Ok(()));
}

#[test]
fn hooks_apply_regardless_of_declaration_position() {
    let root = build(|s| {
        s.it("declared first", || Ok(()));
        s.before_each(|| Err(ExampleError::new("hook ran")));
    });
    let scheduled = root.schedule();
    let only = scheduled.first().expect("one scheduled example");
    assert_eq!(only.run(), Err(ExampleError::new("hook ran")));
}

#[test]
fn after_hook_errors_surface_when_body_passes() {
    let root = build(|s| {
        s.after_each(|| Err(ExampleError::new("teardown failed")));
        s.it("passes", || Ok(()));
    });
    let scheduled = root.schedule();
    let only = scheduled.first().expect("one scheduled example");
    assert_eq!(only.run(), Err(ExampleError::new("teardown failed")));
}

#[test]
fn body_errors_win_over_after_hook_errors() {
    let root = build(|s| {
        s.after_each(|| Err(ExampleError::new("teardown failed")));
        s.it("fails", || Err(ExampleError::new("body failed")));
    });
    let scheduled = root.schedule();
    let only = scheduled.first().expect("one scheduled example");
    assert_eq!(only.run(), Err(ExampleError::new("body failed")));
}

#[test]
fn sibling_hooks_do_not_leak_between_groups() {
    let root = build(|s| {
        s.describe("with hook", |s| {
            s.before_each(|| Err(ExampleError::new("scoped")));
            s.it("affected", || Ok(()));
        });
        s.describe("without hook", |s| s.it("unaffected", || Ok(())));
    });
    let outcomes: Vec<_> = root.schedule().iter().map(Scheduled::run).collect();
    assert_eq!(outcomes, [Err(ExampleError::new("scoped")), Ok(())]);
}
