//! Separator-aware joins. An empty operand is invisible in the output, so
//! any mix of empty and non-empty pieces never yields a leading, trailing
//! or doubled separator.

/// Operator chaining two Finch endpoints.
pub const CHAIN_OP: &str = " :: ";

/// Separator of argument and declaration lists.
pub const LIST_SEP: &str = ", ";

fn join_with(a: &str, b: &str, sep: &str) -> String {
    match (a.is_empty(), b.is_empty()) {
        (true, _) => b.to_owned(),
        (_, true) => a.to_owned(),
        _ => format!("{a}{sep}{b}"),
    }
}

/// `a, b`
pub fn list_join(a: &str, b: &str) -> String {
    join_with(a, b, LIST_SEP)
}

/// `a :: b`
pub fn chain_join(a: &str, b: &str) -> String {
    join_with(a, b, CHAIN_OP)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_is_identity_on_both_sides() {
        for x in ["", "a", "\"foo\" :: long"] {
            assert_eq!(list_join(x, ""), x);
            assert_eq!(list_join("", x), x);
            assert_eq!(chain_join(x, ""), x);
            assert_eq!(chain_join("", x), x);
        }
    }

    #[test]
    fn joins_non_empty_operands() {
        assert_eq!(list_join("id", "name"), "id, name");
        assert_eq!(chain_join("\"foo\"", "long"), "\"foo\" :: long");
    }

    #[test]
    fn no_stray_separators_for_sparse_sequences() {
        let pieces = ["", "a", "", "", "b", ""];
        let list = pieces.iter().fold(String::new(), |acc, p| list_join(&acc, p));
        let chain = pieces.iter().fold(String::new(), |acc, p| chain_join(&acc, p));
        assert_eq!(list, "a, b");
        assert_eq!(chain, "a :: b");

        let all_empty = ["", "", ""].iter().fold(String::new(), |acc, p| chain_join(&acc, p));
        assert!(all_empty.is_empty());
    }
}
