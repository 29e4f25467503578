//! Invocation identifiers derived from example descriptions.

use std::collections::HashSet;

use crate::example::Example;

/// Identifier used when a description chain holds no alphanumerics.
const FALLBACK_IDENTIFIER: &str = "example";

/// Hands out identifiers that are unique within one spec.
///
/// The first example with a given base identifier keeps it; later ones get
/// `_2`, `_3`, … appended, skipping any suffixed form another description
/// already produced.
#[derive(Debug, Default)]
pub(crate) struct IdentifierAllocator {
    taken: HashSet<String>,
}

impl IdentifierAllocator {
    pub(crate) fn allocate(&mut self, example: &Example) -> String {
        let base = identifier_for(
            example
                .ancestry()
                .iter()
                .map(String::as_str)
                .chain(std::iter::once(example.description())),
        );
        if self.taken.insert(base.clone()) {
            return base;
        }
        let mut suffix: u64 = 2;
        loop {
            let candidate = format!("{base}_{suffix}");
            if self.taken.insert(candidate.clone()) {
                return candidate;
            }
            suffix += 1;
        }
    }
}

/// Lower-cases `parts` and joins their alphanumeric runs with `_`.
pub(crate) fn identifier_for<'a>(parts: impl IntoIterator<Item = &'a str>) -> String {
    let mut out = String::new();
    let mut separate = false;
    for part in parts {
        for ch in part.chars() {
            if ch.is_alphanumeric() {
                if separate && !out.is_empty() {
                    out.push('_');
                }
                separate = false;
                out.extend(ch.to_lowercase());
            } else {
                separate = true;
            }
        }
        separate = true;
    }
    if out.is_empty() {
        FALLBACK_IDENTIFIER.to_owned()
    } else {
        out
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::callsite::Callsite;

    fn example(ancestry: &[&str], description: &str) -> Example {
        Example::new(
            description.to_owned(),
            ancestry.iter().map(|part| (*part).to_owned()).collect(),
            Callsite::new("naming.rs", 1),
            None,
        )
    }

    #[rstest]
    #[case::words(
        &["Calculator", "Addition", "adds two positives"],
        "calculator_addition_adds_two_positives"
    )]
    #[case::punctuation(&["returns 4 (not 5)!"], "returns_4_not_5")]
    #[case::mixed_case(&["HTTP Client"], "http_client")]
    #[case::unicode(&["größe prüfen"], "größe_prüfen")]
    #[case::empty(&[""], FALLBACK_IDENTIFIER)]
    #[case::symbols_only(&["--", "!!"], FALLBACK_IDENTIFIER)]
    fn identifiers_are_normalised(#[case] parts: &[&str], #[case] expected: &str) {
        assert_eq!(identifier_for(parts.iter().copied()), expected);
    }

    #[test]
    fn duplicates_receive_numeric_suffixes() {
        let mut names = IdentifierAllocator::default();
        let same = example(&["Group"], "does a thing");
        assert_eq!(names.allocate(&same), "group_does_a_thing");
        assert_eq!(names.allocate(&same), "group_does_a_thing_2");
        assert_eq!(names.allocate(&same), "group_does_a_thing_3");
    }

    #[test]
    fn suffixes_skip_identifiers_taken_by_other_descriptions() {
        let mut names = IdentifierAllocator::default();
        let adversarial = example(&[], "case 2");
        let plain = example(&[], "case");
        assert_eq!(names.allocate(&adversarial), "case_2");
        assert_eq!(names.allocate(&plain), "case");
        assert_eq!(names.allocate(&plain), "case_3");
    }
}
