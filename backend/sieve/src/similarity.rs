//! # String Similarity
//!
//! Typo and variant detection for spreadsheet-entered text ("SoHo" vs "Soho",
//! "Italian" vs "Itallian").
//!
//! ## Policy
//! - Comparison happens on trimmed, lowercased text
//! - Anything of 3 characters or fewer must match exactly ("BBQ", "NY")
//! - Up to 5 characters: at most 2 edits
//! - Longer: at most 2 edits, or at least 85% similar by edit ratio
//!
//! The thresholds are a heuristic, not a guarantee against false positives.

const SHORT_TOKEN_LEN: usize = 3;
const SMALL_TOKEN_LEN: usize = 5;
const MAX_EDITS: usize = 2;
const MIN_RATIO: f64 = 0.85;

/// Levenshtein edit distance (insert, delete, substitute each cost 1) over chars.
pub fn distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, a_char) in a.iter().enumerate() {
        curr[0] = i + 1;

        for (j, b_char) in b.iter().enumerate() {
            let cost = usize::from(a_char != b_char);

            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }

        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

pub fn normalize_for_comparison(input: &str) -> String {
    input.trim().to_lowercase()
}

pub fn are_similar(a: &str, b: &str) -> bool {
    let a = normalize_for_comparison(a);
    let b = normalize_for_comparison(b);

    if a == b {
        return true;
    }

    let a_len = a.chars().count();
    let b_len = b.chars().count();

    if a_len <= SHORT_TOKEN_LEN || b_len <= SHORT_TOKEN_LEN {
        return false;
    }

    let edits = distance(&a, &b);
    let max_len = a_len.max(b_len);

    if max_len <= SMALL_TOKEN_LEN {
        return edits <= MAX_EDITS;
    }

    let ratio = 1.0 - edits as f64 / max_len as f64;
    edits <= MAX_EDITS || ratio >= MIN_RATIO
}
