use std::cmp::Ordering;

use crate::{models::RestaurantGroup, tokens::split_tokens};

pub fn compare_ignore_case(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Alphabetically first cuisine token across every recommendation of a group.
///
/// Empty when no recommendation lists a cuisine, which sorts such groups first.
pub fn first_alphabetical_cuisine(group: &RestaurantGroup) -> String {
    group
        .recommendations
        .iter()
        .flat_map(|record| split_tokens(&record.cuisine_type))
        .min_by(|a, b| compare_ignore_case(a, b))
        .unwrap_or_default()
}

/// Reorders the parts of a compound cuisine field alphabetically.
///
/// "Vietnamese, Taiwanese" becomes "Taiwanese, Vietnamese" and "Italian/Californian"
/// becomes "Californian/Italian". A comma wins over a slash when both appear.
pub fn sort_cuisine_type(cuisine_type: &str) -> String {
    let (separator, joiner) = if cuisine_type.contains(',') {
        (',', ", ")
    } else if cuisine_type.contains('/') {
        ('/', "/")
    } else {
        return cuisine_type.to_string();
    };

    let mut parts: Vec<&str> = cuisine_type
        .split(separator)
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect();
    parts.sort_by(|a, b| compare_ignore_case(a, b));

    parts.join(joiner)
}

#[cfg(test)]
mod tests {
    use super::{first_alphabetical_cuisine, sort_cuisine_type};
    use crate::models::{RestaurantGroup, RestaurantRecord};

    fn group_with(cuisines: &[&str]) -> RestaurantGroup {
        RestaurantGroup {
            id: "x".to_string(),
            name: "X".to_string(),
            recommendations: cuisines
                .iter()
                .map(|cuisine| RestaurantRecord {
                    cuisine_type: cuisine.to_string(),
                    ..RestaurantRecord::named("X")
                })
                .collect(),
        }
    }

    #[test]
    fn test_first_alphabetical_across_recommendations() {
        assert_eq!(first_alphabetical_cuisine(&group_with(&["Thai/Lao", "burmese"])), "burmese");
        assert_eq!(first_alphabetical_cuisine(&group_with(&["Italian, californian"])), "californian");
    }

    #[test]
    fn test_first_alphabetical_empty() {
        assert_eq!(first_alphabetical_cuisine(&group_with(&[])), "");
        assert_eq!(first_alphabetical_cuisine(&group_with(&["", " / "])), "");
    }

    #[test]
    fn test_sort_cuisine_type() {
        assert_eq!(sort_cuisine_type("Vietnamese, Taiwanese"), "Taiwanese, Vietnamese");
        assert_eq!(sort_cuisine_type("Italian/Californian"), "Californian/Italian");
        assert_eq!(sort_cuisine_type("mexican,Cuban"), "Cuban, mexican");
        assert_eq!(sort_cuisine_type("Thai"), "Thai");
        assert_eq!(sort_cuisine_type(""), "");
    }

    #[test]
    fn test_sort_cuisine_type_comma_wins() {
        assert_eq!(sort_cuisine_type("Sushi/Ramen, Izakaya"), "Izakaya, Sushi/Ramen");
    }
}
