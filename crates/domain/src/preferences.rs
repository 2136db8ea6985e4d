use serde::{Deserialize, Serialize};

/// User travel preferences, as collected by the questionnaire flow.
///
/// Every field is optional on the wire; defaults mirror the submission
/// endpoint's contract so that a bare `{}` payload is still a valid request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TravelPreferences {
    pub origin: String,
    pub destinations: Vec<String>,
    /// YYYY-MM-DD
    pub travel_start: Option<chrono::NaiveDate>,
    /// YYYY-MM-DD
    pub travel_end: Option<chrono::NaiveDate>,
    pub budget_level: BudgetLevel,
    /// Explicit daily budget in USD; overrides the budget-level default.
    pub budget_daily: Option<f64>,
    pub interests: Vec<String>,
    pub traveling_with: TravelParty,
    pub passport_country: String,
    pub visa_preference: VisaPreference,
    pub weather_preference: WeatherPreference,
    pub max_flight_duration_hours: Option<u32>,
    pub accessibility_needs: Vec<String>,
    pub dietary_restrictions: Vec<String>,
    pub has_kids: bool,
    pub kids_ages: Vec<String>,
    pub trip_type: TripType,
    pub pace_preference: PacePreference,
    pub notes: String,
}

impl Default for TravelPreferences {
    fn default() -> Self {
        Self {
            origin: String::new(),
            destinations: Vec::new(),
            travel_start: None,
            travel_end: None,
            budget_level: BudgetLevel::Moderate,
            budget_daily: None,
            interests: Vec::new(),
            traveling_with: TravelParty::Solo,
            passport_country: "US".to_string(),
            visa_preference: VisaPreference::VisaFree,
            weather_preference: WeatherPreference::Warm,
            max_flight_duration_hours: None,
            accessibility_needs: Vec::new(),
            dietary_restrictions: Vec::new(),
            has_kids: false,
            kids_ages: Vec::new(),
            trip_type: TripType::Leisure,
            pace_preference: PacePreference::Moderate,
            notes: String::new(),
        }
    }
}

impl TravelPreferences {
    /// Daily budget in USD, explicit or derived from the budget level.
    pub fn daily_budget(&self) -> f64 {
        self.budget_daily
            .unwrap_or_else(|| self.budget_level.default_daily_budget())
    }

    pub fn has_interest(&self, interest: &str) -> bool {
        self.interests.iter().any(|i| i.eq_ignore_ascii_case(interest))
    }

    /// Meaningful entries only: a literal "none" answer counts as empty.
    pub fn active_dietary_restrictions(&self) -> Vec<&str> {
        filter_none(&self.dietary_restrictions)
    }

    pub fn active_accessibility_needs(&self) -> Vec<&str> {
        filter_none(&self.accessibility_needs)
    }
}

fn filter_none(values: &[String]) -> Vec<&str> {
    values
        .iter()
        .map(String::as_str)
        .filter(|v| !v.eq_ignore_ascii_case("none"))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BudgetLevel {
    Low,
    #[default]
    Moderate,
    High,
    Luxury,
}

impl BudgetLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            BudgetLevel::Low => "low",
            BudgetLevel::Moderate => "moderate",
            BudgetLevel::High => "high",
            BudgetLevel::Luxury => "luxury",
        }
    }

    /// Travel-style key used by the affordability cost-index table.
    pub fn travel_style(&self) -> &'static str {
        match self {
            BudgetLevel::Low => "budget",
            BudgetLevel::Moderate => "moderate",
            BudgetLevel::High => "comfort",
            BudgetLevel::Luxury => "luxury",
        }
    }

    pub fn default_daily_budget(&self) -> f64 {
        match self {
            BudgetLevel::Low => 60.0,
            BudgetLevel::Moderate => 120.0,
            BudgetLevel::High => 250.0,
            BudgetLevel::Luxury => 500.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TravelParty {
    #[default]
    Solo,
    Couple,
    Family,
    Group,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum VisaPreference {
    #[default]
    VisaFree,
    VisaOnArrival,
    EvisaOk,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WeatherPreference {
    Hot,
    #[default]
    Warm,
    Mild,
    Cold,
    Snowy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TripType {
    #[default]
    Leisure,
    Adventure,
    Cultural,
    Romantic,
    Family,
    Business,
    Food,
    Wellness,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PacePreference {
    Relaxed,
    #[default]
    Moderate,
    Busy,
}
