//! Destination scoring.
//!
//! Pure functions over researched category data. Every sub-score lands in
//! 0-100; a category with no data scores the neutral 50 except events, which
//! take a mild penalty at 30.

use voyager_domain::{
    AffordabilityReport, Attraction, CategoryData, CostLevel, EventEntry, ScoreBreakdown,
    TravelPreferences, VisaPreference, VisaRequirements, WeatherPreference, WeatherReport,
};

const NEUTRAL: f64 = 50.0;
const NO_EVENTS: f64 = 30.0;

/// Scores one destination's research data against the traveler's preferences.
pub fn score_destination(data: &CategoryData, prefs: &TravelPreferences) -> ScoreBreakdown {
    let weather = data
        .weather
        .as_ref()
        .map_or(NEUTRAL, |w| weather_score(w, prefs.weather_preference));
    let affordability = data.affordability.as_ref().map_or(NEUTRAL, |a| {
        affordability_score(a, prefs.daily_budget(), prefs.budget_level.travel_style())
    });
    let visa = data
        .visa
        .as_ref()
        .map_or(NEUTRAL, |v| visa_score(v, prefs.visa_preference));
    let attractions = data
        .attractions
        .as_ref()
        .map_or(NEUTRAL, |a| attractions_score(a, &prefs.interests));
    let events = data.events.as_ref().map_or(NO_EVENTS, |e| events_score(e));
    let interest_alignment = interest_alignment_score(data, &prefs.interests);

    let mut breakdown = ScoreBreakdown {
        weather,
        affordability,
        visa,
        attractions,
        events,
        interest_alignment,
        overall: 0.0,
    };
    breakdown.overall = (breakdown.weighted_overall() * 10.0).round() / 10.0;
    breakdown
}

/// Weather desirability: temperature band plus condition adjustment plus a
/// bonus when the forecast matches the stated preference.
pub fn weather_score(weather: &WeatherReport, preference: WeatherPreference) -> f64 {
    let mut score: f64 = 50.0;
    let temp = weather.temperature_c;

    score += if (20.0..=28.0).contains(&temp) {
        25.0
    } else if (15.0..20.0).contains(&temp) || (28.0 < temp && temp <= 32.0) {
        10.0
    } else if (5.0..15.0).contains(&temp) || (32.0 < temp && temp <= 35.0) {
        -10.0
    } else {
        -25.0
    };

    score += match weather.condition.as_str() {
        "Clear" => 15.0,
        "Clouds" => 5.0,
        "Rain" => -15.0,
        "Snow" => -5.0,
        "Thunderstorm" => -25.0,
        "Drizzle" => -10.0,
        "Mist" => -5.0,
        _ => 0.0,
    };

    let matches_preference = match preference {
        WeatherPreference::Hot => temp > 30.0,
        WeatherPreference::Warm => (25.0..=30.0).contains(&temp),
        WeatherPreference::Mild => (15.0..25.0).contains(&temp),
        WeatherPreference::Cold => (5.0..15.0).contains(&temp),
        WeatherPreference::Snowy => weather.condition == "Snow",
    };
    if matches_preference {
        score += 10.0;
    }

    score.clamp(0.0, 100.0)
}

/// Visa convenience: visa-free is a flat 100, otherwise built up from eVisa
/// availability, processing time and cost, with a preference adjustment.
pub fn visa_score(visa: &VisaRequirements, preference: VisaPreference) -> f64 {
    if !visa.required {
        return 100.0;
    }

    let mut score = 30.0;
    if visa.evisa_available {
        score += 30.0;
    }
    if let Some(days) = visa.processing_days {
        score += match days {
            0..=1 => 20.0,
            2..=3 => 10.0,
            4..=7 => 5.0,
            _ => 0.0,
        };
    }
    if let Some(cost) = visa.cost_usd {
        score += ((200.0 - cost) / 200.0 * 20.0).max(0.0);
    }

    score += match preference {
        VisaPreference::EvisaOk if visa.evisa_available => 10.0,
        VisaPreference::EvisaOk => -10.0,
        _ => 0.0,
    };

    score.clamp(0.0, 100.0)
}

/// Budget fit from the daily-cost ratio, adjusted by how well the
/// destination's cost level matches the travel style.
pub fn affordability_score(
    affordability: &AffordabilityReport,
    daily_budget: f64,
    travel_style: &str,
) -> f64 {
    let cost = affordability.daily_cost_estimate;
    let budget_score = if daily_budget <= 0.0 {
        NEUTRAL
    } else if cost <= daily_budget * 0.8 {
        90.0 + ((daily_budget - cost) / daily_budget * 10.0).min(10.0)
    } else if cost <= daily_budget {
        80.0
    } else if cost <= daily_budget * 1.2 {
        60.0
    } else if cost <= daily_budget * 1.5 {
        40.0
    } else {
        20.0
    };

    let style_score = style_alignment(travel_style, affordability.cost_level);
    (budget_score + style_score).clamp(0.0, 100.0)
}

fn style_alignment(travel_style: &str, cost_level: CostLevel) -> f64 {
    use CostLevel::*;
    match (travel_style, cost_level) {
        ("budget", Budget) => 20.0,
        ("budget", Moderate) => 5.0,
        ("budget", Comfort) => -10.0,
        ("budget", Luxury) => -20.0,
        ("moderate", Budget) => 5.0,
        ("moderate", Moderate) => 20.0,
        ("moderate", Comfort) => 10.0,
        ("moderate", Luxury) => -10.0,
        ("comfort", Budget) => -10.0,
        ("comfort", Moderate) => 10.0,
        ("comfort", Comfort) => 20.0,
        ("comfort", Luxury) => 5.0,
        ("luxury", Budget) => -20.0,
        ("luxury", Moderate) => -10.0,
        ("luxury", Comfort) => 10.0,
        ("luxury", Luxury) => 20.0,
        _ => 0.0,
    }
}

/// Attractions quality: quantity (up to 20), average rating (up to 30), and
/// natural/cultural share matched against interests (up to 50).
pub fn attractions_score(attractions: &[Attraction], interests: &[String]) -> f64 {
    if attractions.is_empty() {
        return 20.0;
    }

    let quantity = (attractions.len() as f64 * 4.0).min(20.0);
    let avg_rating = attractions.iter().map(|a| a.rating).sum::<f64>() / attractions.len() as f64;
    let quality = avg_rating / 5.0 * 30.0;

    let interest_score = if interests.is_empty() {
        40.0
    } else {
        const NATURAL: [&str; 5] = ["nature", "beaches", "mountains", "wildlife", "adventure"];
        const CULTURAL: [&str; 3] = ["culture", "history", "art"];

        let natural_count = attractions.iter().filter(|a| a.natural_feature).count() as f64;
        let cultural_count = attractions.len() as f64 - natural_count;
        let total = attractions.len() as f64;

        let wants = |table: &[&str]| {
            interests
                .iter()
                .any(|i| table.iter().any(|t| i.eq_ignore_ascii_case(t)))
        };

        let mut score = 0.0;
        if wants(&NATURAL) {
            score += natural_count / total * 25.0;
        }
        if wants(&CULTURAL) {
            score += cultural_count / total * 25.0;
        }
        score.min(50.0)
    };

    (quantity + quality + interest_score).clamp(0.0, 100.0)
}

/// Ten points per event, capped at 100.
pub fn events_score(events: &[EventEntry]) -> f64 {
    (events.len() as f64 * 10.0).min(100.0)
}

/// How well the researched data matches each stated interest: a strong match
/// (3+ supporting items) earns 20 of 20, a weak one (1+) earns 10, then the
/// total is normalized across interests.
pub fn interest_alignment_score(data: &CategoryData, interests: &[String]) -> f64 {
    if interests.is_empty() {
        return NEUTRAL;
    }

    let attractions = data.attractions.as_deref().unwrap_or(&[]);
    let events = data.events.as_deref().unwrap_or(&[]);

    let mut score: f64 = 0.0;
    let mut max_possible: f64 = 0.0;
    for interest in interests {
        max_possible += 20.0;
        let strength = interest_match_strength(interest, attractions, events, data);
        if strength >= 3 {
            score += 20.0;
        } else if strength >= 1 {
            score += 10.0;
        }
    }

    if max_possible == 0.0 {
        return NEUTRAL;
    }
    (score / max_possible * 100.0).min(100.0)
}

fn interest_match_strength(
    interest: &str,
    attractions: &[Attraction],
    events: &[EventEntry],
    data: &CategoryData,
) -> usize {
    let category_count =
        |pred: &dyn Fn(&Attraction) -> bool| attractions.iter().filter(|a| pred(a)).count();

    match interest.to_lowercase().as_str() {
        "nature" => category_count(&|a| a.natural_feature),
        "beaches" => category_count(&|a| a.category.to_lowercase().contains("beach")),
        "mountains" => category_count(&|a| {
            let c = a.category.to_lowercase();
            c.contains("mountain") || c.contains("hiking")
        }),
        "culture" => category_count(&|a| !a.natural_feature),
        "history" => category_count(&|a| matches!(a.category.as_str(), "landmark" | "museum")),
        "art" => category_count(&|a| a.category == "museum"),
        "adventure" => category_count(&|a| {
            matches!(
                a.category.as_str(),
                "hiking_area" | "waterfall" | "national_park"
            )
        }),
        "relaxation" => data
            .affordability
            .as_ref()
            .map_or(0, |a| match a.cost_level {
                CostLevel::Budget | CostLevel::Moderate => 1,
                _ => 0,
            }),
        "wildlife" => category_count(&|a| {
            a.description.to_lowercase().contains("wildlife")
                || a.category.to_lowercase().contains("nature")
        }),
        "nightlife" => events.iter().filter(|e| e.event_type == "music").count(),
        // Food and shopping are assumed everywhere.
        "food" | "shopping" => 1,
        _ => 0,
    }
}
