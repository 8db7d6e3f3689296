//! Bracketed identifier extraction from calculation and filter expressions.

use std::sync::LazyLock;

use regex::Regex;

static BRACKETED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\[\]]+)\]").expect("bracketed identifier pattern"));

/// Identifiers written as `[identifier]` in `text`, in order of appearance.
///
/// Brackets do not nest: in `[[a]]` only `a` is found. Repeated identifiers
/// are returned each time they appear.
pub fn extract(text: &str) -> Vec<&str> {
    BRACKETED
        .captures_iter(text)
        .filter_map(|captures| captures.get(1))
        .map(|token| token.as_str())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("[revenue] - [cost]", vec!["revenue", "cost"])]
    #[case("SUM([a]) / SUM([a])", vec!["a", "a"])]
    #[case("[[nested]]", vec!["nested"])]
    #[case("no tokens here", vec![])]
    #[case("[] [open", vec![])]
    #[case("[with space]", vec!["with space"])]
    fn test_extract(#[case] text: &str, #[case] expected: Vec<&str>) {
        assert_eq!(extract(text), expected);
    }
}
