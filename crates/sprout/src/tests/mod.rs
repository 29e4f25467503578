//! Crate-level integration and BDD tests.

use crate::harness::{CollectingRecorder, run_spec_with};
use crate::{Config, ExampleError, Spec, SpecBuilder, World};


struct ShoppingCartSpec;

impl Spec for ShoppingCartSpec {
    fn spec(s: &mut SpecBuilder) {
        s.describe("ShoppingCart", |s| {
            s.context("when empty", |s| {
                s.it("has a zero total", || Ok(()));
            });
            s.context("with one item", |s| {
                s.it("totals the item price", || {
                    Err(ExampleError::new("expected 10, got 12"))
                });
            });
        });
    }
}

#[test]
fn end_to_end_run_through_shared_world() {
    let mut recorder = CollectingRecorder::default();
    let summary =
        run_spec_with::<ShoppingCartSpec, _>(World::shared(), &Config::default(), &mut recorder)
            .expect("spec runs");

    let names: Vec<&str> = summary.reports().iter().map(|r| r.name()).collect();
    assert_eq!(
        names,
        [
            "ShoppingCartSpec: ShoppingCart when empty has a zero total",
            "ShoppingCartSpec: ShoppingCart with one item totals the item price",
        ]
    );
    assert_eq!(summary.failed(), 1);

    let [failure] = recorder.failures() else {
        panic!("expected one failure, got {:?}", recorder.failures());
    };
    assert_eq!(failure.message(), "expected 10, got 12");
    assert!(failure.file().ends_with("tests/mod.rs"), "file: {}", failure.file());
    assert!(!failure.expected());
    assert!(World::shared().root_for::<ShoppingCartSpec>().is_compiled());
}
