use sieve::{RestaurantGroup, cuisine::sort_cuisine_type};

/// One line per restaurant: name, city and neighborhoods, then cuisines.
pub fn format_group(group: &RestaurantGroup) -> String {
    let mut places: Vec<String> = Vec::new();
    let mut cuisines: Vec<String> = Vec::new();

    for record in &group.recommendations {
        let place = match (record.city.as_str(), record.neighborhood.as_str()) {
            ("", "") => continue,
            (city, "") => city.to_string(),
            ("", neighborhood) => neighborhood.to_string(),
            (city, neighborhood) => format!("{neighborhood}, {city}"),
        };
        push_unique(&mut places, place);

        let cuisine = sort_cuisine_type(&record.cuisine_type);
        if !cuisine.is_empty() {
            push_unique(&mut cuisines, cuisine);
        }
    }

    let mut line = group.name.clone();
    if !places.is_empty() {
        line.push_str(&format!(" ({})", places.join("; ")));
    }
    if !cuisines.is_empty() {
        line.push_str(&format!(" [{}]", cuisines.join("; ")));
    }
    if group.recommendations.len() > 1 {
        line.push_str(&format!(" x{}", group.recommendations.len()));
    }

    line
}

pub fn format_facet(title: &str, options: &[String]) -> String {
    if options.is_empty() {
        return format!("{title}: (none)");
    }

    format!("{title} ({}): {}", options.len(), options.join(", "))
}

fn push_unique(values: &mut Vec<String>, value: String) {
    if !values.contains(&value) {
        values.push(value);
    }
}

#[cfg(test)]
mod tests {
    use sieve::{RestaurantRecord, grouper::group};

    use super::{format_facet, format_group};

    fn record(city: &str, neighborhood: &str, cuisine: &str) -> RestaurantRecord {
        RestaurantRecord {
            city: city.to_string(),
            neighborhood: neighborhood.to_string(),
            cuisine_type: cuisine.to_string(),
            ..RestaurantRecord::named("Pho Huynh")
        }
    }

    #[test]
    fn test_format_group() {
        let groups = group(&[
            record("San Francisco", "Tenderloin", "Vietnamese, Taiwanese"),
            record("San Francisco", "Tenderloin", "Taiwanese, Vietnamese"),
        ]);

        assert_eq!(
            format_group(&groups[0]),
            "Pho Huynh (Tenderloin, San Francisco) [Taiwanese, Vietnamese] x2"
        );
    }

    #[test]
    fn test_format_group_sparse() {
        let groups = group(&[record("", "", "")]);

        assert_eq!(format_group(&groups[0]), "Pho Huynh");
    }

    #[test]
    fn test_format_facet() {
        assert_eq!(format_facet("Cities", &[]), "Cities: (none)");
        assert_eq!(
            format_facet("Cities", &["Oakland".to_string(), "San Francisco".to_string()]),
            "Cities (2): Oakland, San Francisco"
        );
    }
}
