//! Built-in restaurants shown when nothing was uploaded and no export is on disk.
use sieve::RestaurantRecord;

struct Sample {
    name: &'static str,
    slug: &'static str,
    city: &'static str,
    neighborhood: &'static str,
    cuisine_type: &'static str,
    what_you_love: &'static str,
    must_have: &'static str,
    reservation_needed: &'static str,
    planning_timeframe: &'static str,
}

const SAMPLES: [Sample; 8] = [
    Sample {
        name: "The Italian Place",
        slug: "italian",
        city: "San Francisco",
        neighborhood: "North Beach",
        cuisine_type: "Italian",
        what_you_love: "Authentic pasta and cozy atmosphere. The homemade tiramisu is incredible!",
        must_have: "Carbonara, Truffle Risotto",
        reservation_needed: "Yes",
        planning_timeframe: "1 week in advance",
    },
    Sample {
        name: "Sakura Sushi",
        slug: "sakura",
        city: "San Francisco",
        neighborhood: "Japantown",
        cuisine_type: "Japanese",
        what_you_love: "Freshest fish in the city. The chef is a true master of the craft.",
        must_have: "Omakase, Salmon Belly",
        reservation_needed: "Yes",
        planning_timeframe: "2 weeks in advance",
    },
    Sample {
        name: "Taco Loco",
        slug: "tacoloco",
        city: "Oakland",
        neighborhood: "Fruitvale",
        cuisine_type: "Mexican",
        what_you_love: "Best street tacos outside of Mexico. Amazing salsa bar!",
        must_have: "Al Pastor Tacos, Horchata",
        reservation_needed: "No",
        planning_timeframe: "Walk-in friendly",
    },
    Sample {
        name: "Le Petit Bistro",
        slug: "lepetit",
        city: "San Francisco",
        neighborhood: "Hayes Valley",
        cuisine_type: "French",
        what_you_love: "Romantic setting with classic French cuisine. Perfect for date night.",
        must_have: "Duck Confit, Crème Brûlée",
        reservation_needed: "Yes",
        planning_timeframe: "3-5 days in advance",
    },
    Sample {
        name: "Golden Dragon",
        slug: "goldendragon",
        city: "San Francisco",
        neighborhood: "Chinatown",
        cuisine_type: "Chinese",
        what_you_love: "Dim sum that rivals Hong Kong. Weekend brunch is a must!",
        must_have: "Har Gow, Char Siu Bao",
        reservation_needed: "No",
        planning_timeframe: "Walk-in (expect a wait on weekends)",
    },
    Sample {
        name: "Mumbai Masala",
        slug: "mumbai",
        city: "Oakland",
        neighborhood: "Temescal",
        cuisine_type: "Indian",
        what_you_love: "Authentic flavors with the perfect level of spice. Great vegetarian options.",
        must_have: "Butter Chicken, Garlic Naan",
        reservation_needed: "No",
        planning_timeframe: "Walk-in friendly",
    },
    Sample {
        name: "The Smokehouse",
        slug: "smokehouse",
        city: "Berkeley",
        neighborhood: "Downtown",
        cuisine_type: "BBQ",
        what_you_love: "Low and slow smoked meats. The brisket melts in your mouth.",
        must_have: "Brisket, Mac and Cheese",
        reservation_needed: "No",
        planning_timeframe: "Walk-in (get there early, they sell out!)",
    },
    Sample {
        name: "Olive & Thyme",
        slug: "olivethyme",
        city: "San Francisco",
        neighborhood: "Mission",
        cuisine_type: "Mediterranean",
        what_you_love: "Fresh ingredients and beautiful presentation. Great for groups.",
        must_have: "Mezze Platter, Lamb Kebabs",
        reservation_needed: "Yes",
        planning_timeframe: "2-3 days in advance",
    },
];

pub fn restaurants() -> Vec<RestaurantRecord> {
    SAMPLES
        .iter()
        .enumerate()
        .map(|(i, sample)| RestaurantRecord {
            id: Some((i + 1).to_string()),
            website: format!("https://example.com/{}", sample.slug),
            city: sample.city.to_string(),
            neighborhood: sample.neighborhood.to_string(),
            cuisine_type: sample.cuisine_type.to_string(),
            what_you_love: sample.what_you_love.to_string(),
            must_have: sample.must_have.to_string(),
            reservation_needed: sample.reservation_needed.to_string(),
            planning_timeframe: sample.planning_timeframe.to_string(),
            ..RestaurantRecord::named(sample.name)
        })
        .collect()
}
