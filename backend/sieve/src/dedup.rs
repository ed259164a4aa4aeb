//! # Similarity Deduplication
//!
//! Turns the raw neighborhood or cuisine tokens of a restaurant set into one label
//! per cluster of near-duplicates.
//!
//! ## Algorithm
//! 1. Count tokens by their trimmed, lowercased form and remember the first spelling seen
//! 2. Walk the distinct forms in first-seen order. Each unclustered form seeds a
//!    cluster and pulls in every remaining form similar to the seed
//! 3. Each cluster is represented by its most frequent form, shorter forms winning ties
//! 4. Representatives come back sorted
//!
//! Clustering compares against the seed only. A chain `A ~ B ~ C` with `A !~ C`
//! can land in one or two clusters depending on which form was seen first.
use std::collections::HashMap;

use crate::similarity::normalize_for_comparison;

pub use crate::similarity::are_similar;

struct Variant {
    normalized: String,
    original: String,
    count: usize,
}

pub fn deduplicate<I, S>(tokens: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut variants: Vec<Variant> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for token in tokens {
        let token = token.as_ref();
        let normalized = normalize_for_comparison(token);

        if normalized.is_empty() {
            continue;
        }

        match index.get(&normalized) {
            Some(&i) => variants[i].count += 1,
            None => {
                index.insert(normalized.clone(), variants.len());
                variants.push(Variant {
                    normalized,
                    original: token.trim().to_string(),
                    count: 1,
                });
            }
        }
    }

    let mut clustered = vec![false; variants.len()];
    let mut representatives = Vec::new();

    for seed in 0..variants.len() {
        if clustered[seed] {
            continue;
        }
        clustered[seed] = true;

        let mut cluster = vec![seed];
        for other in seed + 1..variants.len() {
            if !clustered[other] && are_similar(&variants[seed].normalized, &variants[other].normalized) {
                clustered[other] = true;
                cluster.push(other);
            }
        }

        // stable: equal count and length keeps first-seen order
        cluster.sort_by(|&a, &b| {
            variants[b].count.cmp(&variants[a].count).then_with(|| {
                variants[a]
                    .normalized
                    .chars()
                    .count()
                    .cmp(&variants[b].normalized.chars().count())
            })
        });

        representatives.push(variants[cluster[0]].original.clone());
    }

    representatives.sort();
    representatives
}

#[cfg(test)]
mod tests {
    use super::deduplicate;

    #[test]
    fn test_most_frequent_spelling_wins() {
        let result = deduplicate(["Italian", "Itallian", "Italian", "French"]);

        assert_eq!(result, vec!["French", "Italian"]);
    }

    #[test]
    fn test_case_insensitive_keeps_first_casing() {
        let result = deduplicate(["SoHo", "Soho", "soho"]);

        assert_eq!(result, vec!["SoHo"]);
    }

    #[test]
    fn test_shorter_variant_breaks_ties() {
        let result = deduplicate(["Temescall", "Temescal"]);

        assert_eq!(result, vec!["Temescal"]);
    }

    #[test]
    fn test_frequency_beats_length() {
        let result = deduplicate(["Mission", "The Mission", "Missionn", "Missionn"]);

        assert!(result.contains(&"Missionn".to_string()));
        assert!(!result.contains(&"Mission".to_string()));
    }

    #[test]
    fn test_short_tokens_never_merge() {
        let result = deduplicate(["BBQ", "BBQ2", "Bbq"]);

        assert_eq!(result, vec!["BBQ", "BBQ2"]);
    }

    #[test]
    fn test_seed_only_clustering() {
        // "abcdefgh" ~ "abcdefxy" (2 edits) and "abcdefxy" ~ "abcdwzxy" (2 edits),
        // but the seed "abcdefgh" is 4 edits from "abcdwzxy".
        let result = deduplicate(["abcdefgh", "abcdefxy", "abcdwzxy"]);
        assert_eq!(result, vec!["abcdefgh", "abcdwzxy"]);

        let result = deduplicate(["abcdefxy", "abcdefgh", "abcdwzxy"]);
        assert_eq!(result, vec!["abcdefxy"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(deduplicate(Vec::<String>::new()).is_empty());
        assert!(deduplicate(["", "   "]).is_empty());
    }

    #[test]
    fn test_output_sorted() {
        let result = deduplicate(["Thai", "Burmese", "Mexican", "Ethiopian"]);

        assert_eq!(result, vec!["Burmese", "Ethiopian", "Mexican", "Thai"]);
    }
}
