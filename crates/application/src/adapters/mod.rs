//! Destination data sources.
//!
//! Each method covers one research category and fails independently with an
//! [`AdapterError`]; the orchestrator treats any failure as a missing
//! category, never as a fatal error.

pub mod cached;
pub mod static_data;

use async_trait::async_trait;
use chrono::NaiveDate;

pub use cached::CachedAdapters;
pub use static_data::StaticDataAdapters;

use voyager_domain::{
    AdapterResult, AffordabilityReport, Attraction, BudgetLevel, DiningGuide, EventEntry,
    FlightOption, HotelOption, NightlifeGuide, TransportGuide, VisaRequirements, WeatherReport,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DataAdapters: Send + Sync {
    /// Forecast or climate snapshot for the destination; `month` selects the
    /// travel month when dates are known.
    async fn weather(&self, destination: &str, month: Option<u32>)
        -> AdapterResult<WeatherReport>;

    async fn visa(&self, passport: &str, country: &str) -> AdapterResult<VisaRequirements>;

    async fn attractions(
        &self,
        destination: &str,
        interests: &[String],
    ) -> AdapterResult<Vec<Attraction>>;

    async fn events(
        &self,
        destination: &str,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> AdapterResult<Vec<EventEntry>>;

    async fn affordability(
        &self,
        country: &str,
        budget_level: BudgetLevel,
    ) -> AdapterResult<AffordabilityReport>;

    async fn flights(
        &self,
        origin: &str,
        destination: &str,
        depart: Option<NaiveDate>,
    ) -> AdapterResult<Vec<FlightOption>>;

    async fn hotels(
        &self,
        destination: &str,
        check_in: Option<NaiveDate>,
        check_out: Option<NaiveDate>,
    ) -> AdapterResult<Vec<HotelOption>>;

    async fn dining(&self, destination: &str, dietary: &[String]) -> AdapterResult<DiningGuide>;

    async fn transport(&self, destination: &str) -> AdapterResult<TransportGuide>;

    async fn nightlife(&self, destination: &str) -> AdapterResult<NightlifeGuide>;
}

/// Extracts the country from a "City, Country" label; the whole label when
/// there is no comma.
pub fn destination_country(destination: &str) -> &str {
    destination
        .rsplit_once(',')
        .map(|(_, country)| country.trim())
        .unwrap_or_else(|| destination.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn country_extraction_handles_both_label_shapes() {
        assert_eq!(destination_country("Bali, Indonesia"), "Indonesia");
        assert_eq!(destination_country("Singapore"), "Singapore");
        assert_eq!(destination_country("Queenstown, New Zealand"), "New Zealand");
    }
}
