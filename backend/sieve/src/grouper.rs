use std::collections::HashMap;

use crate::models::{RestaurantGroup, RestaurantRecord};

/// Grouping key for a restaurant name: trimmed, lowercased, single-spaced.
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Groups recommendations of the same restaurant, in order of first appearance.
///
/// Names must match exactly after [`normalize_name`]; near-spellings stay separate.
/// Records without a name are dropped.
pub fn group(records: &[RestaurantRecord]) -> Vec<RestaurantGroup> {
    let mut groups: Vec<RestaurantGroup> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for record in records {
        let id = normalize_name(&record.name);

        if id.is_empty() {
            continue;
        }

        let slot = *index.entry(id.clone()).or_insert_with(|| {
            groups.push(RestaurantGroup {
                id,
                name: record.name.clone(),
                recommendations: Vec::new(),
            });
            groups.len() - 1
        });

        groups[slot].recommendations.push(record.clone());
    }

    groups
}
