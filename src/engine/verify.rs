const STRIPPED: [char; 5] = ['.', ',', '!', '?', ';'];

/// Compares the player's order with the true one, index by index.
///
/// Units are always compared without their edge whitespace, which the board
/// never shows. With `normalize`, each unit is also lower-cased and has
/// `. , ! ? ;` removed. Inner spacing and inner punctuation still count.
pub fn verify<L, T>(live: &[L], truth: &[T], normalize: bool) -> bool
where
    L: AsRef<str>,
    T: AsRef<str>,
{
    if live.len() != truth.len() {
        return false;
    }
    live.iter()
        .zip(truth)
        .all(|(l, t)| same_unit(l.as_ref(), t.as_ref(), normalize))
}

/// Whether two units count as the same piece when checking an order.
pub fn same_unit(a: &str, b: &str, normalize: bool) -> bool {
    if normalize {
        normalize_unit(a) == normalize_unit(b)
    } else {
        a.trim() == b.trim()
    }
}

pub fn normalize_unit(unit: &str) -> String {
    unit.trim()
        .to_lowercase()
        .chars()
        .filter(|c| !STRIPPED.contains(c))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_is_correct() {
        let truth = ["One.", "Two!", "Three?"];
        assert!(verify(&truth, &truth, false));
        assert!(verify(&truth, &truth, true));
    }

    #[test]
    fn test_normalization_ignores_case_and_terminal_punctuation() {
        assert!(verify(&["Hello.", "World"], &["hello", "world"], true));
        assert!(!verify(&["Hello.", "World"], &["hello", "world"], false));
    }

    #[test]
    fn test_normalization_trims_attached_whitespace() {
        assert!(verify(&["the", "cat ", "the "], &["the ", "cat ", "the"], true));
    }

    #[test]
    fn test_exact_comparison_ignores_attached_whitespace() {
        let truth = ["the ", "cat ", "and ", "the ", "dog ", "saw ", "the"];
        let arranged = ["the ", "cat ", "and ", "the", "dog ", "saw ", "the "];
        assert!(verify(&arranged, &truth, false));
        assert!(!verify(&["The ", "cat"], &["the ", "cat"], false));
        assert!(!verify(&["cat.", "the"], &["cat", "the"], false));
    }

    #[test]
    fn test_same_unit() {
        assert!(same_unit("go ", "go", false));
        assert!(same_unit("Go.", "go ", true));
        assert!(!same_unit("Go.", "go ", false));
    }

    #[test]
    fn test_normalization_keeps_inner_differences() {
        assert!(!verify(&["it's"], &["its"], true));
        assert!(!verify(&["new  york"], &["new york"], true));
        assert!(!verify(&["well-known"], &["wellknown"], true));
    }

    #[test]
    fn test_wrong_order_fails() {
        assert!(!verify(&["b", "a"], &["a", "b"], true));
    }

    #[test]
    fn test_length_mismatch_fails() {
        assert!(!verify(&["a"], &["a", "b"], false));
        assert!(!verify(&["a", "b"], &["a"], true));
        let empty: [&str; 0] = [];
        assert!(verify(&empty, &empty, false));
    }

    #[test]
    fn test_normalize_unit() {
        assert_eq!(normalize_unit("  Olá, Mundo!; "), "olá mundo");
    }
}
