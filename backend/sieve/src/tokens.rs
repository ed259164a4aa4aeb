use std::sync::LazyLock;

use regex::Regex;

static DELIMITER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[,/]").expect("valid regex"));

/// Splits a compound field ("Italian, French/Spanish") into trimmed, non-empty tokens.
///
/// Order is preserved and repeats are kept.
pub fn split_tokens(field: &str) -> Vec<String> {
    DELIMITER_RE
        .split(field)
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::split_tokens;

    #[test]
    fn test_basic() {
        assert_eq!(
            split_tokens("Italian, French/Spanish"),
            vec!["Italian", "French", "Spanish"]
        );
        assert_eq!(split_tokens("Manhattan, Chinatown/SoHo"), vec!["Manhattan", "Chinatown", "SoHo"]);
    }

    #[test]
    fn test_keeps_duplicates_and_order() {
        assert_eq!(split_tokens("Thai/Thai, Lao"), vec!["Thai", "Thai", "Lao"]);
    }

    #[test]
    fn test_empty_pieces_dropped() {
        assert_eq!(split_tokens(" , / ,"), Vec::<String>::new());
        assert_eq!(split_tokens("Mission,,"), vec!["Mission"]);
        assert_eq!(split_tokens(""), Vec::<String>::new());
    }
}
