//! The trait implemented by every spec type.

use crate::dsl::SpecBuilder;

/// A spec type: a named collection of example groups.
///
/// `spec` is the spec-building closure. It runs at most once per process,
/// on first use, and must only declare groups, examples, and hooks; any
/// expectation evaluated here instead of inside an example body aborts the
/// compilation of the whole spec.
pub trait Spec: 'static {
    /// Name shown in front of every example's display name.
    ///
    /// Defaults to the unqualified type name.
    #[must_use]
    fn name() -> &'static str
    where
        Self: Sized,
    {
        short_type_name(std::any::type_name::<Self>())
    }

    /// Declares the example tree.
    fn spec(s: &mut SpecBuilder);
}

/// Strips the module path (and any generic arguments) from a type name.
fn short_type_name(full: &'static str) -> &'static str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    struct CalculatorSpec;

    impl Spec for CalculatorSpec {
        fn spec(_: &mut SpecBuilder) {}
    }

    struct Renamed;

    impl Spec for Renamed {
        fn name() -> &'static str {
            "Custom name"
        }

        fn spec(_: &mut SpecBuilder) {}
    }

    #[test]
    fn default_name_is_unqualified_type_name() {
        assert_eq!(CalculatorSpec::name(), "CalculatorSpec");
    }

    #[test]
    fn name_can_be_overridden() {
        assert_eq!(Renamed::name(), "Custom name");
    }

    #[rstest]
    #[case::plain("Spec", "Spec")]
    #[case::pathed("crate::specs::MathSpec", "MathSpec")]
    #[case::generic("crate::specs::Wrapper<crate::inner::Thing>", "Wrapper")]
    fn short_type_name_strips_paths(#[case] full: &'static str, #[case] expected: &str) {
        assert_eq!(short_type_name(full), expected);
    }
}
