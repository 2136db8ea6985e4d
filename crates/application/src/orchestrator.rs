//! Multi-destination research orchestrator.
//!
//! Runs every candidate destination concurrently, phase by phase, reporting
//! one progress step per completed phase. Category lookups fail soft: a
//! timeout or upstream error leaves that category absent and degrades the
//! destination to `partial` instead of failing the job.

use std::future::Future;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{Datelike, Utc};
use tracing::{info, warn};

use crate::adapters::{destination_country, DataAdapters};
use crate::scoring::score_destination;
use crate::suggestions::suggest_destinations;
use voyager_config::ResearchConfig;
use voyager_domain::{
    AdapterError, AdapterResult, CategoryData, Comparison, ComparisonRow, DestinationResearch,
    DestinationStatus, Highlights, ProgressSink, ProgressUpdate, Recommendation, ResearchReport,
    ResearchResult, TravelContext, TravelParty, TravelPreferences, TripType,
};

const BASE_PHASES_PER_DESTINATION: u32 = 7;
const TOP_RECOMMENDATIONS: usize = 3;

#[derive(Debug, Clone)]
pub struct ResearchOptions {
    /// Destinations beyond this cap are dropped before fan-out.
    pub max_destinations: usize,
    /// Upper bound on the derived destination shortlist.
    pub shortlist_limit: usize,
    /// Per-category lookup timeout.
    pub adapter_timeout: Duration,
}

impl Default for ResearchOptions {
    fn default() -> Self {
        Self {
            max_destinations: 3,
            shortlist_limit: 8,
            adapter_timeout: Duration::from_secs(20),
        }
    }
}

impl ResearchOptions {
    pub fn from_config(config: &ResearchConfig) -> Self {
        Self {
            max_destinations: config.max_destinations,
            shortlist_limit: config.shortlist_limit,
            adapter_timeout: Duration::from_secs(config.adapter_timeout_seconds),
        }
    }
}

/// Resolved inputs for one run: enriched preferences, the destination set and
/// the exact number of progress steps the run will emit.
#[derive(Debug, Clone)]
pub struct ResearchPlan {
    pub preferences: TravelPreferences,
    pub destinations: Vec<String>,
    pub suggested: bool,
    pub include_nightlife: bool,
    pub total_steps: u32,
}

pub struct ResearchOrchestrator {
    adapters: Arc<dyn DataAdapters>,
    options: ResearchOptions,
}

impl ResearchOrchestrator {
    pub fn new(adapters: Arc<dyn DataAdapters>, options: ResearchOptions) -> Self {
        Self { adapters, options }
    }

    /// Resolves destinations and the step budget before anything runs, so the
    /// job row can record `total_steps` up front.
    pub fn plan(&self, preferences: &TravelPreferences) -> ResearchPlan {
        let mut preferences = preferences.clone();
        enrich_interests(&mut preferences);

        let suggested = preferences.destinations.is_empty();
        let mut destinations = if suggested {
            suggest_destinations(&preferences, self.options.shortlist_limit)
        } else {
            preferences.destinations.clone()
        };
        destinations.truncate(self.options.max_destinations);
        // Suggestion output feeds back so the stored preferences show what
        // was actually researched.
        preferences.destinations = destinations.clone();

        let include_nightlife = nightlife_triggered(&preferences);
        let phases = BASE_PHASES_PER_DESTINATION + u32::from(include_nightlife);
        let total_steps = 1 + u32::from(suggested) + destinations.len() as u32 * phases + 1;

        ResearchPlan {
            preferences,
            destinations,
            suggested,
            include_nightlife,
            total_steps,
        }
    }

    pub async fn run(
        &self,
        job_id: Option<&str>,
        plan: &ResearchPlan,
        sink: &dyn ProgressSink,
    ) -> ResearchResult<ResearchReport> {
        let tracker = ProgressTracker::new(job_id, plan.total_steps);
        info!(
            destinations = plan.destinations.len(),
            total_steps = plan.total_steps,
            "starting destination research"
        );

        tracker
            .step(sink, "initializing", "Starting destination research".to_string())
            .await;
        if plan.suggested {
            tracker
                .step(
                    sink,
                    "suggesting_destinations",
                    format!(
                        "Selected {} candidate destinations: {}",
                        plan.destinations.len(),
                        plan.destinations.join(", ")
                    ),
                )
                .await;
        }

        let destinations = futures::future::join_all(plan.destinations.iter().map(|name| {
            self.research_destination(name, &plan.preferences, plan.include_nightlife, &tracker, sink)
        }))
        .await;

        let comparison = build_comparison(&destinations);
        let recommendations = build_recommendations(&destinations, &plan.preferences);
        tracker
            .step(
                sink,
                "compiling_results",
                "Comparing destinations and building recommendations".to_string(),
            )
            .await;

        Ok(ResearchReport {
            preferences: plan.preferences.clone(),
            research_timestamp: Utc::now(),
            destinations,
            comparison,
            recommendations,
        })
    }

    async fn research_destination(
        &self,
        destination: &str,
        prefs: &TravelPreferences,
        include_nightlife: bool,
        tracker: &ProgressTracker,
        sink: &dyn ProgressSink,
    ) -> DestinationResearch {
        let mut data = CategoryData::default();
        let mut failed: Vec<String> = Vec::new();

        let country = destination_country(destination).to_string();
        let month = prefs.travel_start.map(|d| d.month());

        match self
            .call("weather", self.adapters.weather(destination, month))
            .await
        {
            Ok(weather) => data.weather = Some(weather),
            Err(e) => record_failure(destination, &mut failed, e),
        }
        tracker
            .step(
                sink,
                "researching_weather",
                format!("Checking weather for {destination}"),
            )
            .await;

        match self
            .call("visa", self.adapters.visa(&prefs.passport_country, &country))
            .await
        {
            Ok(visa) => data.visa = Some(visa),
            Err(e) => record_failure(destination, &mut failed, e),
        }
        tracker
            .step(
                sink,
                "researching_visa",
                format!("Checking visa requirements for {country}"),
            )
            .await;

        let (attractions, events) = tokio::join!(
            self.call(
                "attractions",
                self.adapters.attractions(destination, &prefs.interests),
            ),
            self.call(
                "events",
                self.adapters
                    .events(destination, prefs.travel_start, prefs.travel_end),
            ),
        );
        match attractions {
            Ok(mut attractions) => {
                if prefs.traveling_with == TravelParty::Family && prefs.has_kids {
                    for attraction in &mut attractions {
                        attraction.kid_friendly = Some(attraction.is_kid_friendly());
                    }
                }
                data.attractions = Some(attractions);
            }
            Err(e) => record_failure(destination, &mut failed, e),
        }
        match events {
            Ok(events) => data.events = Some(events),
            Err(e) => record_failure(destination, &mut failed, e),
        }
        tracker
            .step(
                sink,
                "researching_attractions_and_events",
                format!("Finding attractions and events in {destination}"),
            )
            .await;

        match self
            .call(
                "affordability",
                self.adapters.affordability(&country, prefs.budget_level),
            )
            .await
        {
            Ok(affordability) => data.affordability = Some(affordability),
            Err(e) => record_failure(destination, &mut failed, e),
        }
        tracker
            .step(
                sink,
                "researching_affordability",
                format!("Estimating daily costs for {destination}"),
            )
            .await;

        let has_origin = !prefs.origin.trim().is_empty();
        let accessibility = prefs.active_accessibility_needs();
        if has_origin {
            let (flights, hotels) = tokio::join!(
                self.call(
                    "flights",
                    self.adapters
                        .flights(&prefs.origin, destination, prefs.travel_start),
                ),
                self.call(
                    "hotels",
                    self.adapters
                        .hotels(destination, prefs.travel_start, prefs.travel_end),
                ),
            );
            match flights {
                Ok(flights) => data.flights = Some(flights),
                Err(e) => record_failure(destination, &mut failed, e),
            }
            match hotels {
                Ok(hotels) => data.hotels = Some(hotels),
                Err(e) => record_failure(destination, &mut failed, e),
            }
        } else {
            // No origin, so flights are skipped rather than failed.
            match self
                .call(
                    "hotels",
                    self.adapters
                        .hotels(destination, prefs.travel_start, prefs.travel_end),
                )
                .await
            {
                Ok(hotels) => data.hotels = Some(hotels),
                Err(e) => record_failure(destination, &mut failed, e),
            }
        }
        if !accessibility.is_empty() {
            if let Some(hotels) = &mut data.hotels {
                for hotel in hotels {
                    hotel.accessibility_note =
                        Some("Confirm step-free access with the property before booking".to_string());
                }
            }
        }
        tracker
            .step(
                sink,
                if has_origin {
                    "searching_flights_and_hotels"
                } else {
                    "searching_hotels"
                },
                format!("Searching stays for {destination}"),
            )
            .await;

        match self
            .call(
                "dining",
                self.adapters.dining(destination, &prefs.dietary_restrictions),
            )
            .await
        {
            Ok(dining) => data.dining = Some(dining),
            Err(e) => record_failure(destination, &mut failed, e),
        }
        tracker
            .step(
                sink,
                "researching_dining",
                format!("Collecting dining picks for {destination}"),
            )
            .await;

        match self.call("transport", self.adapters.transport(destination)).await {
            Ok(mut transport) => {
                if !accessibility.is_empty() {
                    transport.accessibility_note = Some(
                        "Check station and vehicle accessibility on official transit sites"
                            .to_string(),
                    );
                }
                data.transport = Some(transport);
            }
            Err(e) => record_failure(destination, &mut failed, e),
        }
        tracker
            .step(
                sink,
                "researching_transport",
                format!("Mapping out local transport in {destination}"),
            )
            .await;

        if include_nightlife {
            match self
                .call("nightlife", self.adapters.nightlife(destination))
                .await
            {
                Ok(nightlife) => data.nightlife = Some(nightlife),
                Err(e) => record_failure(destination, &mut failed, e),
            }
            tracker
                .step(
                    sink,
                    "researching_nightlife",
                    format!("Scouting nightlife in {destination}"),
                )
                .await;
        }

        let status = if failed.is_empty() {
            DestinationStatus::Completed
        } else if data.present_categories().is_empty() {
            DestinationStatus::Failed
        } else {
            DestinationStatus::Partial
        };

        let (scores, overall_score, error) = if status == DestinationStatus::Failed {
            (
                None,
                0.0,
                Some(format!("all category lookups failed: {}", failed.join(", "))),
            )
        } else {
            let breakdown = score_destination(&data, prefs);
            (Some(breakdown), breakdown.overall, None)
        };

        DestinationResearch {
            name: destination.to_string(),
            status,
            data,
            context: TravelContext::from_preferences(prefs),
            scores,
            overall_score,
            failed_categories: failed,
            error,
        }
    }

    async fn call<T>(
        &self,
        category: &'static str,
        fut: impl Future<Output = AdapterResult<T>> + Send,
    ) -> AdapterResult<T> {
        match tokio::time::timeout(self.options.adapter_timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(AdapterError::Timeout {
                category,
                seconds: self.options.adapter_timeout.as_secs(),
            }),
        }
    }
}

/// Shared step counter; increments are atomic so concurrent destinations
/// never report the same step number twice or go backwards.
struct ProgressTracker {
    job_id: Option<String>,
    total: u32,
    done: AtomicU32,
}

impl ProgressTracker {
    fn new(job_id: Option<&str>, total: u32) -> Self {
        Self {
            job_id: job_id.map(str::to_string),
            total,
            done: AtomicU32::new(0),
        }
    }

    async fn step(&self, sink: &dyn ProgressSink, step: &str, message: String) {
        let done = self.done.fetch_add(1, Ordering::SeqCst) + 1;
        let percentage = if self.total == 0 {
            100
        } else {
            (done * 100 / self.total).min(100) as u8
        };
        sink.report(&ProgressUpdate {
            job_id: self.job_id.clone(),
            step: step.to_string(),
            message,
            completed_steps: done,
            total_steps: self.total,
            percentage,
        })
        .await;
    }
}

fn record_failure(destination: &str, failed: &mut Vec<String>, err: AdapterError) {
    warn!(destination, category = err.category(), error = %err, "category lookup failed");
    failed.push(err.category().to_string());
}

fn enrich_interests(prefs: &mut TravelPreferences) {
    fn inject(prefs: &mut TravelPreferences, interest: &str) {
        if !prefs.has_interest(interest) {
            prefs.interests.push(interest.to_string());
        }
    }
    if prefs.traveling_with == TravelParty::Group {
        inject(prefs, "nightlife");
    }
    if prefs.traveling_with == TravelParty::Couple && prefs.trip_type == TripType::Romantic {
        inject(prefs, "relaxation");
    }
}

fn nightlife_triggered(prefs: &TravelPreferences) -> bool {
    prefs.has_interest("nightlife") || prefs.traveling_with == TravelParty::Group
}

fn build_comparison(destinations: &[DestinationResearch]) -> Comparison {
    let mut rows: Vec<ComparisonRow> = destinations
        .iter()
        .filter(|d| d.status != DestinationStatus::Failed)
        .map(|d| ComparisonRow {
            name: d.name.clone(),
            overall_score: d.overall_score,
            temperature_c: d.data.weather.as_ref().map(|w| w.temperature_c),
            visa_required: d.data.visa.as_ref().map(|v| v.required),
            attractions_count: d.data.attractions.as_ref().map_or(0, Vec::len),
            daily_cost: d.data.affordability.as_ref().map(|a| a.daily_cost_estimate),
            events_count: d.data.events.as_ref().map_or(0, Vec::len),
        })
        .collect();
    rows.sort_by(|a, b| b.overall_score.total_cmp(&a.overall_score));

    Comparison {
        categories: [
            "overall_score",
            "temperature_c",
            "visa_required",
            "attractions_count",
            "daily_cost",
            "events_count",
        ]
        .iter()
        .map(|c| c.to_string())
        .collect(),
        rows,
    }
}

fn build_recommendations(
    destinations: &[DestinationResearch],
    prefs: &TravelPreferences,
) -> Vec<Recommendation> {
    let mut ranked: Vec<&DestinationResearch> = destinations
        .iter()
        .filter(|d| d.status != DestinationStatus::Failed)
        .collect();
    ranked.sort_by(|a, b| b.overall_score.total_cmp(&a.overall_score));

    ranked
        .iter()
        .take(TOP_RECOMMENDATIONS)
        .enumerate()
        .map(|(i, dest)| Recommendation {
            rank: i as u32 + 1,
            destination: dest.name.clone(),
            score: dest.overall_score,
            reasons: recommendation_reasons(dest, prefs),
            highlights: extract_highlights(&dest.data),
            estimated_daily_cost: dest
                .data
                .affordability
                .as_ref()
                .map(|a| a.daily_cost_estimate),
        })
        .collect()
}

fn recommendation_reasons(dest: &DestinationResearch, prefs: &TravelPreferences) -> Vec<String> {
    let mut reasons = Vec::new();
    let data = &dest.data;

    if dest.overall_score > 80.0 {
        reasons.push("Excellent overall match for your preferences".to_string());
    }
    if let Some(visa) = &data.visa {
        if !visa.required {
            reasons.push("No visa required".to_string());
        }
    }
    if let Some(weather) = &data.weather {
        if (20.0..=30.0).contains(&weather.temperature_c) {
            reasons.push(format!("Great weather ({}\u{b0}C)", weather.temperature_c));
        }
    }
    if let Some(affordability) = &data.affordability {
        if affordability.daily_cost_estimate <= prefs.daily_budget() {
            reasons.push("Fits your budget".to_string());
        }
    }
    if let Some(events) = &data.events {
        if !events.is_empty() {
            reasons.push(format!("{} events during your stay", events.len()));
        }
    }

    match prefs.traveling_with {
        TravelParty::Family if prefs.has_kids => {
            let kid_friendly = data
                .attractions
                .as_ref()
                .map_or(0, |a| a.iter().filter(|a| a.kid_friendly == Some(true)).count());
            if kid_friendly > 0 {
                reasons.push(format!("{kid_friendly} kid-friendly attractions found"));
            }
        }
        TravelParty::Couple => {
            reasons.push("Great romantic getaway destination".to_string());
        }
        TravelParty::Group if data.nightlife.is_some() => {
            reasons.push("Excellent nightlife scene for groups".to_string());
        }
        _ => {}
    }

    let dietary = prefs.active_dietary_restrictions();
    if !dietary.is_empty() {
        reasons.push(format!("Accommodates {} dietary needs", dietary.join(", ")));
    }
    if !prefs.active_accessibility_needs().is_empty() {
        reasons.push("Accessibility information included".to_string());
    }

    match prefs.pace_preference {
        voyager_domain::PacePreference::Relaxed => {
            reasons.push("Ideal for a relaxed, unhurried pace".to_string());
        }
        voyager_domain::PacePreference::Busy => {
            reasons.push("Packed with activities to keep you busy".to_string());
        }
        voyager_domain::PacePreference::Moderate => {}
    }

    reasons
}

fn extract_highlights(data: &CategoryData) -> Highlights {
    let mut highlights = Highlights::default();

    if let Some(attractions) = &data.attractions {
        highlights.top_attractions = attractions.iter().take(3).map(|a| a.name.clone()).collect();
    }
    if let Some(events) = &data.events {
        highlights.top_events = events.iter().take(2).map(|e| e.name.clone()).collect();
    }
    if let Some(hotels) = &data.hotels {
        highlights.hotel_from = hotels
            .iter()
            .map(|h| h.price_per_night)
            .min_by(f64::total_cmp);
    }
    if let Some(flights) = &data.flights {
        highlights.flight_from = flights.iter().map(|f| f.price).min_by(f64::total_cmp);
    }
    if let Some(dining) = &data.dining {
        highlights.dining_pick = dining.top_picks.first().map(|r| r.name.clone());
    }
    if let Some(nightlife) = &data.nightlife {
        highlights.nightlife = Some(nightlife.famous_for.clone());
    }

    highlights
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::StaticDataAdapters;
    use std::sync::Mutex;
    use voyager_domain::{BudgetLevel, VisaRequirements, WeatherPreference};

    /// Delegates to the static datasets but fails chosen categories, so
    /// partial-result behavior can be exercised deterministically.
    struct FlakyAdapters {
        inner: StaticDataAdapters,
        fail: Vec<&'static str>,
    }

    impl FlakyAdapters {
        fn failing(categories: &[&'static str]) -> Self {
            Self {
                inner: StaticDataAdapters::new(),
                fail: categories.to_vec(),
            }
        }

        fn check(&self, category: &'static str) -> AdapterResult<()> {
            if self.fail.contains(&category) {
                Err(AdapterError::upstream(category, "simulated outage"))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait::async_trait]
    impl DataAdapters for FlakyAdapters {
        async fn weather(
            &self,
            destination: &str,
            month: Option<u32>,
        ) -> AdapterResult<voyager_domain::WeatherReport> {
            self.check("weather")?;
            self.inner.weather(destination, month).await
        }

        async fn visa(&self, passport: &str, country: &str) -> AdapterResult<VisaRequirements> {
            self.check("visa")?;
            self.inner.visa(passport, country).await
        }

        async fn attractions(
            &self,
            destination: &str,
            interests: &[String],
        ) -> AdapterResult<Vec<voyager_domain::Attraction>> {
            self.check("attractions")?;
            self.inner.attractions(destination, interests).await
        }

        async fn events(
            &self,
            destination: &str,
            start: Option<chrono::NaiveDate>,
            end: Option<chrono::NaiveDate>,
        ) -> AdapterResult<Vec<voyager_domain::EventEntry>> {
            self.check("events")?;
            self.inner.events(destination, start, end).await
        }

        async fn affordability(
            &self,
            country: &str,
            budget_level: BudgetLevel,
        ) -> AdapterResult<voyager_domain::AffordabilityReport> {
            self.check("affordability")?;
            self.inner.affordability(country, budget_level).await
        }

        async fn flights(
            &self,
            origin: &str,
            destination: &str,
            depart: Option<chrono::NaiveDate>,
        ) -> AdapterResult<Vec<voyager_domain::FlightOption>> {
            self.check("flights")?;
            self.inner.flights(origin, destination, depart).await
        }

        async fn hotels(
            &self,
            destination: &str,
            check_in: Option<chrono::NaiveDate>,
            check_out: Option<chrono::NaiveDate>,
        ) -> AdapterResult<Vec<voyager_domain::HotelOption>> {
            self.check("hotels")?;
            self.inner.hotels(destination, check_in, check_out).await
        }

        async fn dining(
            &self,
            destination: &str,
            dietary: &[String],
        ) -> AdapterResult<voyager_domain::DiningGuide> {
            self.check("dining")?;
            self.inner.dining(destination, dietary).await
        }

        async fn transport(
            &self,
            destination: &str,
        ) -> AdapterResult<voyager_domain::TransportGuide> {
            self.check("transport")?;
            self.inner.transport(destination).await
        }

        async fn nightlife(
            &self,
            destination: &str,
        ) -> AdapterResult<voyager_domain::NightlifeGuide> {
            self.check("nightlife")?;
            self.inner.nightlife(destination).await
        }
    }

    struct RecordingSink {
        updates: Mutex<Vec<ProgressUpdate>>,
    }

    impl RecordingSink {
        fn new() -> Self {
            Self {
                updates: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait::async_trait]
    impl ProgressSink for RecordingSink {
        async fn report(&self, update: &ProgressUpdate) {
            self.updates.lock().unwrap().push(update.clone());
        }
    }

    fn orchestrator(adapters: impl DataAdapters + 'static) -> ResearchOrchestrator {
        ResearchOrchestrator::new(Arc::new(adapters), ResearchOptions::default())
    }

    fn bali_preferences() -> TravelPreferences {
        TravelPreferences {
            origin: "New York, USA".to_string(),
            destinations: vec!["Bali, Indonesia".to_string()],
            budget_level: BudgetLevel::Moderate,
            interests: vec!["beaches".to_string(), "nature".to_string()],
            weather_preference: WeatherPreference::Warm,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn full_run_produces_a_complete_report() {
        let orchestrator = orchestrator(StaticDataAdapters::new());
        let prefs = bali_preferences();
        let plan = orchestrator.plan(&prefs);
        assert_eq!(plan.total_steps, 9); // 1 + 7 + 1, no suggestions, no nightlife

        let sink = RecordingSink::new();
        let report = orchestrator.run(Some("job-1"), &plan, &sink).await.unwrap();

        assert_eq!(report.destinations.len(), 1);
        let bali = &report.destinations[0];
        assert_eq!(bali.status, DestinationStatus::Completed);
        assert!(bali.failed_categories.is_empty());
        assert!(bali.data.weather.is_some());
        assert!(bali.data.visa.is_some());
        assert!(bali.data.flights.is_some());
        assert!(bali.scores.is_some());
        assert!(bali.overall_score > 0.0);

        assert_eq!(report.comparison.rows.len(), 1);
        assert_eq!(report.recommendations.len(), 1);
        assert_eq!(report.recommendations[0].rank, 1);
        assert!(!report.recommendations[0].highlights.top_attractions.is_empty());

        let updates = sink.updates.lock().unwrap();
        assert_eq!(updates.len(), 9);
        assert_eq!(updates.last().unwrap().percentage, 100);
        // Steps advance monotonically.
        for pair in updates.windows(2) {
            assert!(pair[1].completed_steps > pair[0].completed_steps);
        }
    }

    #[tokio::test]
    async fn failing_category_degrades_to_partial() {
        let orchestrator = orchestrator(FlakyAdapters::failing(&["visa"]));
        let prefs = bali_preferences();
        let plan = orchestrator.plan(&prefs);
        let report = orchestrator
            .run(None, &plan, &voyager_domain::NullSink)
            .await
            .unwrap();

        let bali = &report.destinations[0];
        assert_eq!(bali.status, DestinationStatus::Partial);
        assert_eq!(bali.failed_categories, vec!["visa"]);
        assert!(bali.data.visa.is_none());
        assert!(bali.data.weather.is_some());
        // Missing visa data scores the neutral default.
        assert_eq!(bali.scores.unwrap().visa, 50.0);
        // Partial destinations still appear in comparison and recommendations.
        assert_eq!(report.comparison.rows.len(), 1);
        assert_eq!(report.recommendations.len(), 1);
    }

    #[tokio::test]
    async fn everything_failing_marks_the_destination_failed() {
        let all = [
            "weather",
            "visa",
            "attractions",
            "events",
            "affordability",
            "flights",
            "hotels",
            "dining",
            "transport",
            "nightlife",
        ];
        let orchestrator = orchestrator(FlakyAdapters::failing(&all));
        let plan = orchestrator.plan(&bali_preferences());
        let report = orchestrator
            .run(None, &plan, &voyager_domain::NullSink)
            .await
            .unwrap();

        let bali = &report.destinations[0];
        assert_eq!(bali.status, DestinationStatus::Failed);
        assert!(bali.scores.is_none());
        assert!(bali.error.is_some());
        assert!(report.comparison.rows.is_empty());
        assert!(report.recommendations.is_empty());
    }

    #[tokio::test]
    async fn no_destinations_triggers_suggestions() {
        let orchestrator = orchestrator(StaticDataAdapters::new());
        let prefs = TravelPreferences {
            interests: vec!["beach".to_string()],
            ..Default::default()
        };
        let plan = orchestrator.plan(&prefs);
        assert!(plan.suggested);
        assert_eq!(plan.destinations.len(), 3); // capped from the shortlist
        assert_eq!(plan.total_steps, 1 + 1 + 3 * 7 + 1);
        assert_eq!(plan.destinations[0], "Bali, Indonesia");

        let sink = RecordingSink::new();
        let report = orchestrator.run(None, &plan, &sink).await.unwrap();
        assert_eq!(report.destinations.len(), 3);
        assert_eq!(report.preferences.destinations.len(), 3);

        let updates = sink.updates.lock().unwrap();
        assert_eq!(updates.len(), plan.total_steps as usize);
        assert_eq!(updates[1].step, "suggesting_destinations");
    }

    #[test]
    fn configured_shortlist_limit_reaches_the_plan() {
        let config = ResearchConfig {
            max_destinations: 3,
            shortlist_limit: 2,
            adapter_timeout_seconds: 20,
        };
        let options = ResearchOptions::from_config(&config);
        assert_eq!(options.shortlist_limit, 2);

        let orchestrator =
            ResearchOrchestrator::new(Arc::new(StaticDataAdapters::new()), options);
        let prefs = TravelPreferences {
            interests: vec!["beach".to_string()],
            ..Default::default()
        };
        let plan = orchestrator.plan(&prefs);
        assert!(plan.suggested);
        // Shortlist of 2 is below the fan-out cap of 3.
        assert_eq!(plan.destinations.len(), 2);
        assert_eq!(plan.total_steps, 1 + 1 + 2 * 7 + 1);
    }

    #[tokio::test]
    async fn group_travel_injects_nightlife() {
        let orchestrator = orchestrator(StaticDataAdapters::new());
        let prefs = TravelPreferences {
            destinations: vec!["Berlin, Germany".to_string()],
            traveling_with: TravelParty::Group,
            ..Default::default()
        };
        let plan = orchestrator.plan(&prefs);
        assert!(plan.include_nightlife);
        assert!(plan.preferences.has_interest("nightlife"));
        assert_eq!(plan.total_steps, 1 + 8 + 1);

        let report = orchestrator
            .run(None, &plan, &voyager_domain::NullSink)
            .await
            .unwrap();
        assert!(report.destinations[0].data.nightlife.is_some());
        let reasons = &report.recommendations[0].reasons;
        assert!(reasons.iter().any(|r| r.contains("nightlife scene")));
    }

    #[tokio::test]
    async fn family_trips_tag_kid_friendly_attractions() {
        let orchestrator = orchestrator(StaticDataAdapters::new());
        let prefs = TravelPreferences {
            destinations: vec!["Lisbon, Portugal".to_string()],
            traveling_with: TravelParty::Family,
            has_kids: true,
            kids_ages: vec!["6".to_string()],
            ..Default::default()
        };
        let plan = orchestrator.plan(&prefs);
        let report = orchestrator
            .run(None, &plan, &voyager_domain::NullSink)
            .await
            .unwrap();

        let attractions = report.destinations[0].data.attractions.as_ref().unwrap();
        assert!(attractions.iter().all(|a| a.kid_friendly.is_some()));
        assert!(attractions.iter().any(|a| a.kid_friendly == Some(true)));
        let reasons = &report.recommendations[0].reasons;
        assert!(reasons.iter().any(|r| r.contains("kid-friendly")));
    }

    #[tokio::test]
    async fn fan_out_is_capped() {
        let orchestrator = orchestrator(StaticDataAdapters::new());
        let prefs = TravelPreferences {
            destinations: vec![
                "Paris, France".to_string(),
                "Rome, Italy".to_string(),
                "Athens, Greece".to_string(),
                "Madrid, Spain".to_string(),
                "Lisbon, Portugal".to_string(),
            ],
            ..Default::default()
        };
        let plan = orchestrator.plan(&prefs);
        assert_eq!(plan.destinations.len(), 3);

        let report = orchestrator
            .run(None, &plan, &voyager_domain::NullSink)
            .await
            .unwrap();
        assert_eq!(report.destinations.len(), 3);
        // Comparison is sorted best first.
        let rows = &report.comparison.rows;
        for pair in rows.windows(2) {
            assert!(pair[0].overall_score >= pair[1].overall_score);
        }
    }

    #[tokio::test]
    async fn missing_origin_skips_flights_without_failing() {
        let orchestrator = orchestrator(StaticDataAdapters::new());
        let prefs = TravelPreferences {
            destinations: vec!["Tokyo, Japan".to_string()],
            ..Default::default()
        };
        let plan = orchestrator.plan(&prefs);
        // The flights+hotels phase is still counted.
        assert_eq!(plan.total_steps, 9);

        let sink = RecordingSink::new();
        let report = orchestrator.run(None, &plan, &sink).await.unwrap();
        let tokyo = &report.destinations[0];
        assert_eq!(tokyo.status, DestinationStatus::Completed);
        assert!(tokyo.data.flights.is_none());
        assert!(tokyo.data.hotels.is_some());
        assert!(!tokyo.failed_categories.contains(&"flights".to_string()));

        let updates = sink.updates.lock().unwrap();
        assert!(updates.iter().any(|u| u.step == "searching_hotels"));
    }
}
