use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::preferences::{PacePreference, TravelParty, TravelPreferences};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherReport {
    pub temperature_c: f64,
    pub condition: String,
    pub humidity: Option<u32>,
    pub best_time: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisaRequirements {
    pub required: bool,
    pub visa_free_days: Option<u32>,
    pub evisa_available: bool,
    pub visa_on_arrival: bool,
    pub processing_days: Option<u32>,
    pub cost_usd: Option<f64>,
    pub visa_type: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attraction {
    pub name: String,
    /// Place type, e.g. "museum", "beach", "national_park".
    pub category: String,
    pub rating: f64,
    pub description: String,
    pub natural_feature: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kid_friendly: Option<bool>,
}

impl Attraction {
    /// Place types that work for travelers with children.
    pub fn is_kid_friendly(&self) -> bool {
        const KID_FRIENDLY: [&str; 8] = [
            "park", "museum", "zoo", "beach", "attraction", "theme", "nature", "garden",
        ];
        let category = self.category.to_lowercase();
        KID_FRIENDLY.iter().any(|kw| category.contains(kw))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEntry {
    pub name: String,
    pub event_type: String,
    pub venue: String,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CostLevel {
    Budget,
    Moderate,
    Comfort,
    Luxury,
}

impl CostLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            CostLevel::Budget => "budget",
            CostLevel::Moderate => "moderate",
            CostLevel::Comfort => "comfort",
            CostLevel::Luxury => "luxury",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffordabilityReport {
    pub cost_level: CostLevel,
    pub daily_cost_estimate: f64,
    pub accommodation_avg: f64,
    pub food_avg: f64,
    pub transport_avg: f64,
    pub activities_avg: f64,
    pub cost_index: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlightOption {
    pub airline: String,
    pub departure: DateTime<Utc>,
    pub arrival: DateTime<Utc>,
    pub duration_minutes: u32,
    pub price: f64,
    pub currency: String,
    pub stops: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HotelOption {
    pub name: String,
    pub address: String,
    pub rating: f64,
    pub price_per_night: f64,
    pub currency: String,
    pub amenities: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accessibility_note: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Restaurant {
    pub name: String,
    pub cuisine: String,
    pub style: String,
    pub rating: f64,
    /// "$" through "$$$$"
    pub price_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiningGuide {
    pub restaurants: Vec<Restaurant>,
    pub top_picks: Vec<Restaurant>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dietary_notes: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportGuide {
    pub overview: String,
    pub options: Vec<String>,
    pub daily_cost_estimate: f64,
    pub recommended_apps: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accessibility_note: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NightlifeGuide {
    pub famous_for: String,
    pub venues: Vec<String>,
    pub typical_night_out: String,
    pub safety_tips: Vec<String>,
}

/// Per-category research results for one destination.
///
/// A field is `Some` only when its adapter call was attempted and succeeded;
/// absent categories never serialize, so consumers cannot read data that was
/// never populated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weather: Option<WeatherReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visa: Option<VisaRequirements>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attractions: Option<Vec<Attraction>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub events: Option<Vec<EventEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub affordability: Option<AffordabilityReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flights: Option<Vec<FlightOption>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hotels: Option<Vec<HotelOption>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dining: Option<DiningGuide>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transport: Option<TransportGuide>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nightlife: Option<NightlifeGuide>,
}

impl CategoryData {
    pub fn present_categories(&self) -> Vec<&'static str> {
        let mut present = Vec::new();
        if self.weather.is_some() {
            present.push("weather");
        }
        if self.visa.is_some() {
            present.push("visa");
        }
        if self.attractions.is_some() {
            present.push("attractions");
        }
        if self.events.is_some() {
            present.push("events");
        }
        if self.affordability.is_some() {
            present.push("affordability");
        }
        if self.flights.is_some() {
            present.push("flights");
        }
        if self.hotels.is_some() {
            present.push("hotels");
        }
        if self.dining.is_some() {
            present.push("dining");
        }
        if self.transport.is_some() {
            present.push("transport");
        }
        if self.nightlife.is_some() {
            present.push("nightlife");
        }
        present
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DestinationStatus {
    Researching,
    Completed,
    Partial,
    Failed,
}

/// Contextual metadata carried through research so that recommendation text
/// can reference the traveler's situation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TravelContext {
    pub traveling_with: TravelParty,
    pub has_kids: bool,
    pub kids_ages: Vec<String>,
    pub pace_preference: PacePreference,
    pub accessibility_needs: Vec<String>,
    pub dietary_restrictions: Vec<String>,
}

impl TravelContext {
    pub fn from_preferences(prefs: &TravelPreferences) -> Self {
        Self {
            traveling_with: prefs.traveling_with,
            has_kids: prefs.has_kids,
            kids_ages: prefs.kids_ages.clone(),
            pace_preference: prefs.pace_preference,
            accessibility_needs: prefs.accessibility_needs.clone(),
            dietary_restrictions: prefs.dietary_restrictions.clone(),
        }
    }
}

/// Six named sub-scores plus their fixed-weight combination, all 0-100.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub weather: f64,
    pub affordability: f64,
    pub visa: f64,
    pub attractions: f64,
    pub events: f64,
    pub interest_alignment: f64,
    pub overall: f64,
}

impl ScoreBreakdown {
    pub const WEATHER_WEIGHT: f64 = 0.20;
    pub const AFFORDABILITY_WEIGHT: f64 = 0.25;
    pub const VISA_WEIGHT: f64 = 0.15;
    pub const ATTRACTIONS_WEIGHT: f64 = 0.20;
    pub const EVENTS_WEIGHT: f64 = 0.10;
    pub const INTEREST_WEIGHT: f64 = 0.10;

    pub fn weighted_overall(&self) -> f64 {
        self.weather * Self::WEATHER_WEIGHT
            + self.affordability * Self::AFFORDABILITY_WEIGHT
            + self.visa * Self::VISA_WEIGHT
            + self.attractions * Self::ATTRACTIONS_WEIGHT
            + self.events * Self::EVENTS_WEIGHT
            + self.interest_alignment * Self::INTEREST_WEIGHT
    }

}

/// Research outcome for one candidate destination.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DestinationResearch {
    pub name: String,
    pub status: DestinationStatus,
    pub data: CategoryData,
    pub context: TravelContext,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scores: Option<ScoreBreakdown>,
    pub overall_score: f64,
    /// Categories whose lookups failed and were swallowed.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failed_categories: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub name: String,
    pub overall_score: f64,
    pub temperature_c: Option<f64>,
    pub visa_required: Option<bool>,
    pub attractions_count: usize,
    pub daily_cost: Option<f64>,
    pub events_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comparison {
    pub categories: Vec<String>,
    /// Sorted by overall score, best first.
    pub rows: Vec<ComparisonRow>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Highlights {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub top_attractions: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub top_events: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hotel_from: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flight_from: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dining_pick: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nightlife: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub rank: u32,
    pub destination: String,
    pub score: f64,
    pub reasons: Vec<String>,
    pub highlights: Highlights,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_daily_cost: Option<f64>,
}

/// Full output of one research job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchReport {
    pub preferences: TravelPreferences,
    pub research_timestamp: DateTime<Utc>,
    pub destinations: Vec<DestinationResearch>,
    pub comparison: Comparison,
    pub recommendations: Vec<Recommendation>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_categories_do_not_serialize() {
        let data = CategoryData {
            weather: Some(WeatherReport {
                temperature_c: 24.0,
                condition: "Clear".to_string(),
                humidity: Some(60),
                best_time: None,
                notes: None,
            }),
            ..Default::default()
        };
        let json = serde_json::to_value(&data).unwrap();
        let obj = json.as_object().unwrap();
        assert!(obj.contains_key("weather"));
        assert!(!obj.contains_key("visa"));
        assert_eq!(data.present_categories(), vec!["weather"]);
    }

    #[test]
    fn score_weights_sum_to_one() {
        let total = ScoreBreakdown::WEATHER_WEIGHT
            + ScoreBreakdown::AFFORDABILITY_WEIGHT
            + ScoreBreakdown::VISA_WEIGHT
            + ScoreBreakdown::ATTRACTIONS_WEIGHT
            + ScoreBreakdown::EVENTS_WEIGHT
            + ScoreBreakdown::INTEREST_WEIGHT;
        assert!((total - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn kid_friendly_matches_on_place_type() {
        let museum = Attraction {
            name: "Central Museum".to_string(),
            category: "museum".to_string(),
            rating: 4.6,
            description: String::new(),
            natural_feature: false,
            kid_friendly: None,
        };
        assert!(museum.is_kid_friendly());

        let bar = Attraction {
            name: "Rooftop Bar".to_string(),
            category: "bar".to_string(),
            rating: 4.2,
            description: String::new(),
            natural_feature: false,
            kid_friendly: None,
        };
        assert!(!bar.is_kid_friendly());
    }
}
