//! Destination shortlist for requests that name no destinations.

use voyager_domain::{BudgetLevel, TravelPreferences};

const FALLBACK: [&str; 3] = ["Paris, France", "Tokyo, Japan", "Barcelona, Spain"];

fn interest_destinations(interest: &str) -> &'static [&'static str] {
    match interest {
        "beach" | "beaches" => &[
            "Bali, Indonesia",
            "Maldives",
            "Phuket, Thailand",
            "Santorini, Greece",
            "Maui, Hawaii",
        ],
        "mountain" | "mountains" => &[
            "Swiss Alps, Switzerland",
            "Banff, Canada",
            "Queenstown, New Zealand",
            "Chamonix, France",
            "Kathmandu, Nepal",
        ],
        "city" => &[
            "Tokyo, Japan",
            "Paris, France",
            "New York, USA",
            "Barcelona, Spain",
            "Singapore",
        ],
        "history" => &[
            "Rome, Italy",
            "Athens, Greece",
            "Cairo, Egypt",
            "Kyoto, Japan",
            "Machu Picchu, Peru",
        ],
        "nature" => &["Costa Rica", "Iceland", "Patagonia, Chile", "Kenya", "Norway"],
        "adventure" => &[
            "Queenstown, New Zealand",
            "Interlaken, Switzerland",
            "Moab, USA",
            "Cape Town, South Africa",
            "Reykjavik, Iceland",
        ],
        "food" => &[
            "Tokyo, Japan",
            "Bangkok, Thailand",
            "Barcelona, Spain",
            "Mexico City, Mexico",
            "Lyon, France",
        ],
        "culture" => &[
            "Marrakech, Morocco",
            "Istanbul, Turkey",
            "Varanasi, India",
            "Havana, Cuba",
            "Prague, Czech Republic",
        ],
        "relaxation" => &[
            "Bali, Indonesia",
            "Tulum, Mexico",
            "Seychelles",
            "Fiji",
            "Santorini, Greece",
        ],
        "nightlife" => &[
            "Berlin, Germany",
            "Amsterdam, Netherlands",
            "Las Vegas, USA",
            "Rio de Janeiro, Brazil",
            "Bangkok, Thailand",
        ],
        _ => &[],
    }
}

fn budget_destinations(level: BudgetLevel) -> &'static [&'static str] {
    match level {
        BudgetLevel::Low => &[
            "Vietnam",
            "Thailand",
            "Mexico",
            "Portugal",
            "Colombia",
            "Indonesia",
            "India",
        ],
        BudgetLevel::Moderate => &[
            "Spain",
            "Greece",
            "Turkey",
            "Malaysia",
            "Czech Republic",
            "Poland",
            "Argentina",
        ],
        BudgetLevel::High => &[
            "Japan",
            "France",
            "Italy",
            "Australia",
            "UAE",
            "Singapore",
            "South Korea",
        ],
        BudgetLevel::Luxury => &[
            "Switzerland",
            "Maldives",
            "Monaco",
            "Bora Bora",
            "Seychelles",
            "Dubai, UAE",
        ],
    }
}

/// Shortlists up to `limit` candidate destinations from the interest and
/// budget tables, in a stable order (interests first, budget picks after,
/// duplicates removed). The fallback trio covers preferences that match
/// nothing.
pub fn suggest_destinations(prefs: &TravelPreferences, limit: usize) -> Vec<String> {
    let mut suggestions: Vec<String> = Vec::new();
    let mut push = |candidate: &str| {
        if !suggestions.iter().any(|s| s == candidate) {
            suggestions.push(candidate.to_string());
        }
    };

    for interest in &prefs.interests {
        for destination in interest_destinations(&interest.to_lowercase()) {
            push(destination);
        }
    }
    for destination in budget_destinations(prefs.budget_level) {
        push(destination);
    }

    if suggestions.is_empty() {
        suggestions = FALLBACK.iter().map(|d| d.to_string()).collect();
    }
    suggestions.truncate(limit);
    suggestions
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interests_drive_the_shortlist() {
        let prefs = TravelPreferences {
            interests: vec!["beach".to_string()],
            budget_level: BudgetLevel::Low,
            ..Default::default()
        };
        let suggestions = suggest_destinations(&prefs, 8);
        assert_eq!(suggestions.len(), 8);
        assert_eq!(suggestions[0], "Bali, Indonesia");
        // Budget picks fill the remaining slots.
        assert!(suggestions.contains(&"Vietnam".to_string()));
    }

    #[test]
    fn configured_limit_caps_the_shortlist() {
        let prefs = TravelPreferences {
            interests: vec!["beach".to_string(), "city".to_string()],
            ..Default::default()
        };
        let suggestions = suggest_destinations(&prefs, 3);
        assert_eq!(
            suggestions,
            vec!["Bali, Indonesia", "Maldives", "Phuket, Thailand"]
        );
    }

    #[test]
    fn duplicates_are_collapsed() {
        let prefs = TravelPreferences {
            interests: vec!["beach".to_string(), "relaxation".to_string()],
            ..Default::default()
        };
        let suggestions = suggest_destinations(&prefs, 8);
        let bali_count = suggestions.iter().filter(|s| *s == "Bali, Indonesia").count();
        assert_eq!(bali_count, 1);
        assert!(suggestions.len() <= 8);
    }

    #[test]
    fn budget_level_alone_still_suggests() {
        let prefs = TravelPreferences {
            budget_level: BudgetLevel::Luxury,
            ..Default::default()
        };
        let suggestions = suggest_destinations(&prefs, 8);
        assert!(suggestions.contains(&"Maldives".to_string()));
    }

    #[test]
    fn unknown_interests_contribute_nothing() {
        let prefs = TravelPreferences {
            interests: vec!["spelunking".to_string()],
            ..Default::default()
        };
        let suggestions = suggest_destinations(&prefs, 8);
        // Only the moderate budget picks remain.
        assert_eq!(suggestions.len(), 7);
        assert_eq!(suggestions[0], "Spain");
    }
}
