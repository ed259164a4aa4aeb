use sieve::{
    FilterEngine, FilterState, FilterValue, RestaurantRecord,
    facets::{cuisine_types, neighborhoods},
    filters::apply_filters,
    grouper::group,
};

fn record(name: &str, city: &str, neighborhood: &str, cuisine: &str) -> RestaurantRecord {
    RestaurantRecord {
        city: city.to_string(),
        neighborhood: neighborhood.to_string(),
        cuisine_type: cuisine.to_string(),
        ..RestaurantRecord::named(name)
    }
}

fn records() -> Vec<RestaurantRecord> {
    vec![
        record("Mumbai Masala", "Oakland", "Temescal", "Indian"),
        record("The Italian Place", "San Francisco", "Mission", "Italian"),
    ]
}

#[test]
fn test_unmatched_cuisine_empties_results() {
    let mut engine = FilterEngine::new(&records());

    engine.set_filter(FilterValue::City(vec!["Oakland".to_string()]));
    assert_eq!(engine.facets().neighborhoods, vec!["Temescal"]);

    let cascade = engine.set_filter(FilterValue::CuisineType(vec!["Mexican".to_string()]));
    assert!(engine.filtered().is_empty());
    assert_eq!(cascade.dropped_neighborhoods, Vec::<String>::new());

    // the cuisine selection narrows the neighborhood options, the city alone does not
    assert!(engine.facets().neighborhoods.is_empty());
    let city_only = FilterState {
        cuisine_type: Vec::new(),
        ..engine.state().clone()
    };
    assert_eq!(neighborhoods(engine.groups(), &city_only), vec!["Temescal"]);
    assert_eq!(engine.facets().cities, vec!["Oakland", "San Francisco"]);
}

#[test]
fn test_city_clear_is_not_diffed() {
    let mut engine = FilterEngine::new(&records());

    engine.set_filter(FilterValue::Neighborhood(vec!["Temescal".to_string()]));
    engine.set_filter(FilterValue::City(vec!["Oakland".to_string()]));
    assert!(engine.state().neighborhood.is_empty());

    engine.set_filter(FilterValue::CuisineType(vec!["Indian".to_string()]));
    engine.set_filter(FilterValue::City(vec!["Oakland".to_string()]));
    assert!(engine.state().cuisine_type.is_empty());
    assert!(engine.state().neighborhood.is_empty());
}

#[test]
fn test_default_state_round_trip() {
    let groups = group(&records());
    let filtered = apply_filters(&groups, &FilterState::default());

    assert_eq!(filtered.len(), groups.len());
    assert_eq!(filtered[0].name, "Mumbai Masala");
    assert_eq!(filtered[1].name, "The Italian Place");
}

#[test]
fn test_typo_selection_still_matches() {
    let mut all = records();
    all.push(record("Pasta Bar", "SF", "North Beach", "Itallian"));
    let mut engine = FilterEngine::new(&all);

    engine.set_filter(FilterValue::City(vec!["sf".to_string()]));
    assert_eq!(cuisine_types(engine.groups(), engine.state()), vec!["Italian"]);

    engine.set_filter(FilterValue::CuisineType(vec!["Italian".to_string()]));
    let names: Vec<_> = engine.filtered().into_iter().map(|g| g.name).collect();
    assert_eq!(names, vec!["The Italian Place", "Pasta Bar"]);
}
