//! Built-in destination datasets.
//!
//! Deterministic stand-in for the external travel APIs: the same inputs
//! always produce the same answers, which keeps research output and tests
//! stable. Coverage mirrors the curated tables of the production data feeds;
//! unknown destinations get conservative fallbacks instead of errors.

use async_trait::async_trait;
use chrono::{Datelike, Duration, NaiveDate, TimeZone, Utc};

use super::{destination_country, DataAdapters};
use voyager_domain::{
    AdapterError, AdapterResult, AffordabilityReport, Attraction, BudgetLevel, CostLevel,
    DiningGuide, EventEntry, FlightOption, HotelOption, NightlifeGuide, Restaurant,
    TransportGuide, VisaRequirements, WeatherReport,
};

pub struct StaticDataAdapters;

impl StaticDataAdapters {
    pub fn new() -> Self {
        Self
    }
}

impl Default for StaticDataAdapters {
    fn default() -> Self {
        Self::new()
    }
}

/// Stable small hash used to vary prices and temperatures per destination.
fn seed(destination: &str) -> u64 {
    destination
        .to_lowercase()
        .bytes()
        .fold(0u64, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u64))
}

fn country_code(country: &str) -> Option<&'static str> {
    let code = match country.to_lowercase().as_str() {
        "usa" | "united states" => "US",
        "france" => "FR",
        "japan" => "JP",
        "indonesia" => "ID",
        "uk" | "united kingdom" | "england" => "GB",
        "uae" | "united arab emirates" | "dubai" => "AE",
        "singapore" => "SG",
        "australia" => "AU",
        "italy" => "IT",
        "spain" => "ES",
        "south africa" => "ZA",
        "morocco" => "MA",
        "thailand" => "TH",
        "turkey" => "TR",
        "iceland" => "IS",
        "brazil" => "BR",
        "egypt" => "EG",
        "czech republic" | "czechia" => "CZ",
        "new zealand" => "NZ",
        "india" => "IN",
        "vietnam" => "VN",
        "philippines" => "PH",
        "mexico" => "MX",
        "greece" => "GR",
        "portugal" => "PT",
        "netherlands" => "NL",
        "germany" => "DE",
        "switzerland" => "CH",
        "sweden" => "SE",
        "norway" => "NO",
        "denmark" => "DK",
        "finland" => "FI",
        "south korea" => "KR",
        "china" => "CN",
        "malaysia" => "MY",
        "cambodia" => "KH",
        "peru" => "PE",
        "chile" => "CL",
        "argentina" => "AR",
        "colombia" => "CO",
        _ => return None,
    };
    Some(code)
}

struct VisaRule {
    required: bool,
    visa_free_days: Option<u32>,
    evisa: bool,
    processing_days: Option<u32>,
    cost_usd: Option<f64>,
    visa_type: Option<&'static str>,
    notes: &'static str,
}

/// Visa rules for the supported passport/destination pairs. Entries are keyed
/// by ISO country codes.
fn visa_rule(passport: &str, country: &str) -> Option<VisaRule> {
    let free = |days: u32, visa_type: Option<&'static str>, notes: &'static str| VisaRule {
        required: false,
        visa_free_days: Some(days),
        evisa: false,
        processing_days: None,
        cost_usd: None,
        visa_type,
        notes,
    };
    let evisa = |days: u32, cost: f64, visa_type: &'static str, notes: &'static str| VisaRule {
        required: true,
        visa_free_days: None,
        evisa: true,
        processing_days: Some(days),
        cost_usd: Some(cost),
        visa_type: Some(visa_type),
        notes,
    };

    let rule = match (passport, country) {
        ("US", "FR") | ("US", "IT") | ("US", "ES") | ("US", "CZ") | ("US", "IS")
        | ("US", "GR") | ("US", "PT") | ("US", "NL") | ("US", "DE") | ("US", "CH") => {
            free(90, Some("Schengen"), "90 days within 180-day period")
        }
        ("US", "JP") => free(90, None, "Tourist stay up to 90 days"),
        ("US", "GB") => free(180, None, "Up to 6 months as tourist"),
        ("US", "AE") => free(30, None, "Visa on arrival, extendable"),
        ("US", "SG") | ("US", "ZA") | ("US", "MA") => free(90, None, "Up to 90 days"),
        ("US", "TH") => free(30, None, "Visa exemption for tourism"),
        ("US", "MX") => free(180, None, "Up to 180 days as tourist"),
        ("US", "ID") => evisa(3, 35.0, "e-VOA", "Visa on arrival or e-VOA available"),
        ("US", "AU") => evisa(1, 20.0, "ETA", "Electronic Travel Authority"),
        ("US", "TR") => evisa(1, 50.0, "e-Visa", "Apply online before travel"),
        ("US", "BR") => evisa(5, 44.0, "e-Visa", "Apply online before travel"),
        ("US", "EG") => evisa(3, 25.0, "e-Visa", "Single entry, valid for 3 months"),
        ("US", "NZ") => evisa(3, 12.0, "NZeTA", "NZ Electronic Travel Authority"),
        ("US", "VN") => evisa(3, 25.0, "e-Visa", "Single entry, 30 days"),
        ("US", "IN") => evisa(4, 40.0, "e-Visa", "Apply online before travel"),
        ("FR", "US") | ("GB", "US") | ("DE", "US") | ("JP", "US") => {
            free(90, Some("ESTA"), "ESTA required for visa waiver")
        }
        ("JP", "FR") => free(90, Some("Schengen"), "90 days within 180-day period"),
        _ => return None,
    };
    Some(rule)
}

struct CostEntry {
    index: u32,
    daily: [f64; 4], // budget, moderate, comfort, luxury
}

/// Cost-of-living index by country code, 100 = New York baseline.
fn cost_entry(code: &str) -> CostEntry {
    let (index, daily) = match code {
        "US" => (100, [80.0, 150.0, 250.0, 500.0]),
        "FR" => (85, [70.0, 140.0, 220.0, 450.0]),
        "JP" => (90, [75.0, 150.0, 250.0, 500.0]),
        "ID" | "MA" => (35, [25.0, 50.0, 100.0, 250.0]),
        "GB" => (90, [80.0, 160.0, 280.0, 550.0]),
        "AE" => (80, [60.0, 120.0, 220.0, 500.0]),
        "SG" => (95, [70.0, 140.0, 250.0, 550.0]),
        "AU" => (85, [75.0, 150.0, 250.0, 500.0]),
        "IT" => (75, [60.0, 120.0, 200.0, 400.0]),
        "ES" => (70, [55.0, 110.0, 180.0, 380.0]),
        "ZA" => (45, [35.0, 70.0, 120.0, 280.0]),
        "TH" => (40, [30.0, 60.0, 120.0, 280.0]),
        "TR" => (35, [25.0, 55.0, 110.0, 250.0]),
        "IS" | "NO" => (110, [100.0, 200.0, 350.0, 700.0]),
        "BR" => (40, [35.0, 70.0, 130.0, 300.0]),
        "EG" => (25, [20.0, 40.0, 80.0, 200.0]),
        "CZ" => (55, [40.0, 80.0, 150.0, 320.0]),
        "NZ" => (85, [75.0, 150.0, 260.0, 520.0]),
        "IN" => (25, [20.0, 45.0, 90.0, 220.0]),
        "VN" | "KH" => (30, [20.0, 45.0, 90.0, 200.0]),
        "PH" => (35, [25.0, 50.0, 100.0, 250.0]),
        "MX" => (45, [35.0, 70.0, 130.0, 300.0]),
        "GR" | "PT" => (65, [50.0, 100.0, 170.0, 350.0]),
        "NL" => (88, [75.0, 150.0, 260.0, 520.0]),
        "DE" => (82, [70.0, 140.0, 230.0, 480.0]),
        "CH" => (130, [120.0, 240.0, 400.0, 800.0]),
        "SE" => (95, [85.0, 170.0, 280.0, 550.0]),
        "DK" => (100, [90.0, 180.0, 300.0, 600.0]),
        "FI" => (90, [80.0, 160.0, 270.0, 540.0]),
        "KR" => (80, [60.0, 120.0, 200.0, 450.0]),
        "CN" | "MY" => (45, [35.0, 70.0, 130.0, 300.0]),
        "PE" | "CO" => (35, [25.0, 55.0, 110.0, 260.0]),
        "CL" => (55, [45.0, 90.0, 160.0, 350.0]),
        "AR" => (40, [30.0, 65.0, 120.0, 280.0]),
        // Unknown countries fall back to the baseline.
        _ => (100, [80.0, 150.0, 250.0, 500.0]),
    };
    CostEntry { index, daily }
}

/// Tropical destinations stay warm year round; the rest get a seasonal curve
/// for the northern hemisphere.
fn climate(destination: &str, month: u32, seed: u64) -> (f64, &'static str) {
    const TROPICAL: [&str; 8] = [
        "bali", "phuket", "maldives", "singapore", "bangkok", "fiji", "seychelles", "hawaii",
    ];
    let lower = destination.to_lowercase();
    let jitter = (seed % 5) as f64 - 2.0;

    if TROPICAL.iter().any(|t| lower.contains(t)) {
        let condition = if month >= 11 || month <= 3 { "Rain" } else { "Clear" };
        return (29.0 + jitter, condition);
    }

    // Rough seasonal curve peaking in July.
    let seasonal = 18.0 - 12.0 * ((month as f64 - 7.0).abs() / 6.0);
    let temp = seasonal + 8.0 + jitter;
    let condition = match month {
        12 | 1 | 2 => "Clouds",
        _ => "Clear",
    };
    (temp, condition)
}

#[async_trait]
impl DataAdapters for StaticDataAdapters {
    async fn weather(
        &self,
        destination: &str,
        month: Option<u32>,
    ) -> AdapterResult<WeatherReport> {
        let month = month.unwrap_or_else(|| Utc::now().month());
        let (temperature_c, condition) = climate(destination, month, seed(destination));
        Ok(WeatherReport {
            temperature_c: (temperature_c * 10.0).round() / 10.0,
            condition: condition.to_string(),
            humidity: Some(50 + (seed(destination) % 30) as u32),
            best_time: Some("April to October".to_string()),
            notes: None,
        })
    }

    async fn visa(&self, passport: &str, country: &str) -> AdapterResult<VisaRequirements> {
        let passport = passport.to_uppercase();
        let code = country_code(country).unwrap_or("");
        let requirements = match visa_rule(&passport, code) {
            Some(rule) => VisaRequirements {
                required: rule.required,
                visa_free_days: rule.visa_free_days,
                evisa_available: rule.evisa,
                visa_on_arrival: rule.visa_type == Some("e-VOA"),
                processing_days: rule.processing_days,
                cost_usd: rule.cost_usd,
                visa_type: rule.visa_type.map(str::to_string),
                notes: Some(rule.notes.to_string()),
            },
            // Conservative default: assume a visa is needed.
            None => VisaRequirements {
                required: true,
                visa_free_days: None,
                evisa_available: false,
                visa_on_arrival: false,
                processing_days: None,
                cost_usd: None,
                visa_type: None,
                notes: Some("Please check with the embassy for current requirements".to_string()),
            },
        };
        Ok(requirements)
    }

    async fn attractions(
        &self,
        _destination: &str,
        _interests: &[String],
    ) -> AdapterResult<Vec<Attraction>> {
        let templates: [(&str, &str, f64, bool, &str); 8] = [
            (
                "Central Museum",
                "museum",
                4.6,
                false,
                "World-class art and history collections",
            ),
            (
                "Historic Old Town",
                "landmark",
                4.5,
                false,
                "Charming historic district with cobblestone streets",
            ),
            (
                "Royal Palace",
                "tourist_attraction",
                4.7,
                false,
                "Magnificent palace with guided tours",
            ),
            (
                "Crystal Lake National Park",
                "national_park",
                4.8,
                true,
                "Breathtaking mountain scenery",
            ),
            (
                "Sunset Beach",
                "beach",
                4.5,
                true,
                "Pristine sandy beach with stunning sunsets",
            ),
            (
                "Modern Art Gallery",
                "museum",
                4.3,
                false,
                "Contemporary art exhibitions",
            ),
            (
                "Ancient Temple",
                "tourist_attraction",
                4.8,
                false,
                "Sacred temple with centuries of history",
            ),
            (
                "City Botanical Gardens",
                "garden",
                4.4,
                true,
                "Lush gardens in the heart of the city",
            ),
        ];

        Ok(templates
            .iter()
            .map(|(name, category, rating, natural, desc)| Attraction {
                name: name.to_string(),
                category: category.to_string(),
                rating: *rating,
                description: desc.to_string(),
                natural_feature: *natural,
                kid_friendly: None,
            })
            .collect())
    }

    async fn events(
        &self,
        destination: &str,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> AdapterResult<Vec<EventEntry>> {
        let city = destination.split(',').next().unwrap_or(destination).trim();
        let start = start.unwrap_or_else(|| Utc::now().date_naive());
        let end = end.unwrap_or(start + Duration::days(7));
        let span_days = (end - start).num_days().max(1);

        let templates: [(&str, &str, &str); 6] = [
            ("Live Music Night", "music", "City Concert Hall"),
            ("Cultural Festival", "cultural", "Central Plaza"),
            ("Street Food Market", "food", "Riverside Park"),
            ("Art Exhibition Opening", "art", "Modern Art Gallery"),
            ("Jazz in the Park", "music", "Central Gardens"),
            ("Summer Carnival", "festival", "Fairgrounds"),
        ];

        let mut events: Vec<EventEntry> = templates
            .iter()
            .enumerate()
            .map(|(i, (name, event_type, venue))| {
                let offset = (i as i64 * 2 + (seed(destination) % 3) as i64) % span_days;
                let name = if *event_type == "cultural" {
                    format!("{city} {name}")
                } else {
                    name.to_string()
                };
                EventEntry {
                    name,
                    event_type: event_type.to_string(),
                    venue: venue.to_string(),
                    date: start + Duration::days(offset),
                }
            })
            .collect();
        events.sort_by_key(|e| e.date);
        Ok(events)
    }

    async fn affordability(
        &self,
        country: &str,
        budget_level: BudgetLevel,
    ) -> AdapterResult<AffordabilityReport> {
        let entry = cost_entry(country_code(country).unwrap_or("US"));
        let style = budget_level.travel_style();
        let daily = match budget_level {
            BudgetLevel::Low => entry.daily[0],
            BudgetLevel::Moderate => entry.daily[1],
            BudgetLevel::High => entry.daily[2],
            BudgetLevel::Luxury => entry.daily[3],
        };

        let (accommodation, food, transport, activities) = match style {
            "budget" => (0.30, 0.30, 0.20, 0.20),
            "luxury" => (0.50, 0.20, 0.10, 0.20),
            _ => (0.40, 0.25, 0.15, 0.20),
        };

        let cost_level = match entry.index {
            0..=39 => CostLevel::Budget,
            40..=59 => CostLevel::Moderate,
            60..=84 => CostLevel::Comfort,
            _ => CostLevel::Luxury,
        };

        Ok(AffordabilityReport {
            cost_level,
            daily_cost_estimate: daily,
            accommodation_avg: daily * accommodation,
            food_avg: daily * food,
            transport_avg: daily * transport,
            activities_avg: daily * activities,
            cost_index: entry.index,
        })
    }

    async fn flights(
        &self,
        origin: &str,
        destination: &str,
        depart: Option<NaiveDate>,
    ) -> AdapterResult<Vec<FlightOption>> {
        if origin.trim().is_empty() {
            return Err(AdapterError::NoData { category: "flights" });
        }
        let date = depart.unwrap_or_else(|| Utc::now().date_naive());
        let route_seed = seed(&format!("{origin}->{destination}"));

        let airlines = ["Pacific Air", "Atlantic Airways", "Global Wings", "Skyline", "Meridian"];
        let flights = (0..5u32)
            .map(|i| {
                let departure = Utc
                    .from_utc_datetime(&date.and_hms_opt(6 + i * 3, 30, 0).unwrap_or_default());
                let duration_minutes = 300 + ((route_seed.wrapping_add(i as u64 * 97)) % 600) as u32;
                let stops = if duration_minutes > 600 { 1 } else { 0 };
                FlightOption {
                    airline: airlines[i as usize % airlines.len()].to_string(),
                    departure,
                    arrival: departure + Duration::minutes(duration_minutes as i64),
                    duration_minutes,
                    price: 250.0 + ((route_seed.wrapping_mul(i as u64 + 1)) % 900) as f64,
                    currency: "USD".to_string(),
                    stops,
                }
            })
            .collect();
        Ok(flights)
    }

    async fn hotels(
        &self,
        destination: &str,
        _check_in: Option<NaiveDate>,
        _check_out: Option<NaiveDate>,
    ) -> AdapterResult<Vec<HotelOption>> {
        let city = destination.split(',').next().unwrap_or(destination).trim();
        let base = 60.0 + (seed(destination) % 120) as f64;

        let templates: [(&str, f64, f64, &[&str]); 6] = [
            ("Grand Hotel", 4.7, 3.2, &["wifi", "pool", "spa", "restaurant"]),
            ("Boutique Stay", 4.5, 2.1, &["wifi", "breakfast", "bar"]),
            ("City Center Inn", 4.2, 1.4, &["wifi", "breakfast"]),
            ("Riverside Resort", 4.6, 2.8, &["wifi", "pool", "gym"]),
            ("Backpacker Lodge", 4.0, 0.6, &["wifi", "shared kitchen"]),
            ("Skyline Suites", 4.4, 2.4, &["wifi", "gym", "rooftop bar"]),
        ];

        Ok(templates
            .iter()
            .enumerate()
            .map(|(i, (name, rating, multiplier, amenities))| HotelOption {
                name: format!("{city} {name}"),
                address: format!("{} Main Street, {city}", 12 + i * 31),
                rating: *rating,
                price_per_night: (base * multiplier).round(),
                currency: "USD".to_string(),
                amenities: amenities.iter().map(|a| a.to_string()).collect(),
                accessibility_note: None,
            })
            .collect())
    }

    async fn dining(&self, destination: &str, dietary: &[String]) -> AdapterResult<DiningGuide> {
        let city = destination.split(',').next().unwrap_or(destination).trim();
        let restaurants = vec![
            Restaurant {
                name: format!("{city} Market Kitchen"),
                cuisine: "local".to_string(),
                style: "casual".to_string(),
                rating: 4.6,
                price_level: "$$".to_string(),
            },
            Restaurant {
                name: "The Terrace".to_string(),
                cuisine: "international".to_string(),
                style: "fine dining".to_string(),
                rating: 4.8,
                price_level: "$$$$".to_string(),
            },
            Restaurant {
                name: "Street Eats Corner".to_string(),
                cuisine: "street food".to_string(),
                style: "casual".to_string(),
                rating: 4.4,
                price_level: "$".to_string(),
            },
            Restaurant {
                name: "Garden Bistro".to_string(),
                cuisine: "vegetarian".to_string(),
                style: "casual".to_string(),
                rating: 4.5,
                price_level: "$$".to_string(),
            },
        ];

        let dietary_notes = dietary
            .iter()
            .filter(|d| !d.eq_ignore_ascii_case("none"))
            .map(|d| format!("{d} options available at most listed restaurants"))
            .collect();

        let mut top_picks: Vec<Restaurant> = restaurants.clone();
        top_picks.sort_by(|a, b| b.rating.total_cmp(&a.rating));
        top_picks.truncate(2);

        Ok(DiningGuide {
            restaurants,
            top_picks,
            dietary_notes,
        })
    }

    async fn transport(&self, destination: &str) -> AdapterResult<TransportGuide> {
        let city = destination.split(',').next().unwrap_or(destination).trim();
        let entry = cost_entry(country_code(destination_country(destination)).unwrap_or("US"));
        Ok(TransportGuide {
            overview: format!(
                "{city} is well served by public transport; day passes are the best value for sightseeing."
            ),
            options: vec![
                "metro / light rail".to_string(),
                "public buses".to_string(),
                "taxis and rideshare".to_string(),
                "bike rental".to_string(),
            ],
            daily_cost_estimate: (entry.index as f64 * 0.15).max(3.0).round(),
            recommended_apps: vec!["Google Maps".to_string(), "Citymapper".to_string()],
            accessibility_note: None,
        })
    }

    async fn nightlife(&self, destination: &str) -> AdapterResult<NightlifeGuide> {
        let lower = destination.to_lowercase();
        let guide = if lower.contains("tokyo") {
            NightlifeGuide {
                famous_for: "Tiny bars in Golden Gai, karaoke everywhere".to_string(),
                venues: vec![
                    "Shibuya".to_string(),
                    "Shinjuku".to_string(),
                    "Roppongi".to_string(),
                    "Golden Gai".to_string(),
                ],
                typical_night_out: "Izakaya dinner, karaoke, then a tiny bar until late".to_string(),
                safety_tips: vec!["Very safe, even at night".to_string(),
                    "Last trains leave around midnight".to_string()],
            }
        } else if lower.contains("bangkok") {
            NightlifeGuide {
                famous_for: "Rooftop bars and street-level nightlife".to_string(),
                venues: vec![
                    "Khao San Road".to_string(),
                    "Sukhumvit".to_string(),
                    "Thonglor".to_string(),
                ],
                typical_night_out: "Street food, rooftop cocktails, then a club".to_string(),
                safety_tips: vec!["Generally safe, watch your drinks".to_string()],
            }
        } else if lower.contains("berlin") {
            NightlifeGuide {
                famous_for: "Legendary techno clubs and warehouse parties".to_string(),
                venues: vec![
                    "Kreuzberg".to_string(),
                    "Friedrichshain".to_string(),
                    "Mitte".to_string(),
                ],
                typical_night_out: "Late dinner, bar hopping, clubs from 1 AM onwards".to_string(),
                safety_tips: vec!["Very safe".to_string(), "Clubs are selective at the door".to_string()],
            }
        } else if lower.contains("london") {
            NightlifeGuide {
                famous_for: "Historic pubs and a diverse music scene".to_string(),
                venues: vec!["Soho".to_string(), "Shoreditch".to_string(), "Camden".to_string()],
                typical_night_out: "Pub session early, clubs or live music after 11 PM".to_string(),
                safety_tips: vec!["Very safe".to_string(), "Pubs close early, plan accordingly".to_string()],
            }
        } else {
            let city = destination.split(',').next().unwrap_or(destination).trim();
            NightlifeGuide {
                famous_for: format!("A lively mix of bars and live music in central {city}"),
                venues: vec!["Old Town".to_string(), "Waterfront district".to_string()],
                typical_night_out: "Dinner out, cocktail bars, live music venues".to_string(),
                safety_tips: vec!["Stick to well-lit central areas at night".to_string()],
            }
        };
        Ok(guide)
    }
}
