//! Example registration and invocation compilation for behaviour-driven
//! specs.
//!
//! A spec type implements [`Spec`] and declares nested groups of examples
//! through a [`SpecBuilder`]. The first time the spec is used, its tree is
//! compiled exactly once into the process-wide [`World`]. A [`SpecBridge`]
//! then flattens the tree into an ordered list of [`Invocation`]s that a host
//! test runner can discover, run, and name.
//!
//! # Architecture
//!
//! ```text
//! Spec::spec ──builds──▶ SpecBuilder ──finish──▶ ExampleGroup (World slot, once)
//!                                                     │ flatten
//!                                                     ▼
//! host runner ◀──invocations── SpecBridge ──side-table──▶ Example
//!      │                             │
//!      └──set current / run ────────▶│──Failure──▶ FailureRecorder
//! ```
//!
//! Example bodies return [`ExampleResult`]. Both returned errors and panics
//! become a [`Failure`], attributed to the location attached to the error
//! when there is one and to the example's definition otherwise. A panic from
//! `assert!` or `assert_eq!` carries the line of the assertion.
//!
//! # Example
//!
//! ```
//! use sprout::{Config, ExampleError, Spec, SpecBuilder, World};
//! use sprout::harness::run_spec;
//!
//! struct CalculatorSpec;
//!
//! impl Spec for CalculatorSpec {
//!     fn spec(s: &mut SpecBuilder) {
//!         s.describe("Calculator", |s| {
//!             s.describe("Addition", |s| {
//!                 s.it("adds two positives", || {
//!                     let sum = 2 + 2;
//!                     if sum == 4 { Ok(()) } else { Err(ExampleError::here("bad sum")) }
//!                 });
//!             });
//!         });
//!     }
//! }
//!
//! let summary = run_spec::<CalculatorSpec>(World::shared(), &Config::default()).unwrap();
//! assert!(summary.is_success());
//! assert_eq!(
//!     summary.reports()[0].name(),
//!     "CalculatorSpec: Calculator Addition adds two positives"
//! );
//! ```

pub mod bridge;
mod callsite;
mod dsl;
pub mod error;
mod example;
mod failure;
mod group;
pub mod harness;
mod recorder;
mod spec;
pub mod telemetry;
mod unwind;
mod world;

#[cfg(test)]
mod tests;

pub use self::bridge::{Invocation, InvocationId, Outcome, SpecBridge};
pub use self::callsite::Callsite;
pub use self::dsl::SpecBuilder;
pub use self::error::{ExampleError, ReportError, SpecError};
pub use self::example::{Example, ExampleResult};
pub use self::failure::Failure;
pub use self::group::ExampleGroup;
pub use self::recorder::FailureRecorder;
pub use self::spec::Spec;
pub use self::world::{SpecRoot, World};
pub use sprout_config::{Config, ConfigError, LogFormat};
