use std::str::FromStr;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{error, info};

use crate::{
    error::{ApiError, ApiResult},
    response::{accepted, success, ApiResponse},
    routes::AppState,
};
use voyager_domain::{
    JobFilter, JobStatus, ResearchError, ResearchJob, ResearchReport, TravelPreferences,
};

#[derive(Debug, Deserialize)]
pub struct StartResearchRequest {
    #[serde(default)]
    pub user_id: Option<String>,
    pub preferences: Value,
}

#[derive(Debug, Deserialize)]
pub struct JobQueryParams {
    pub user_id: Option<String>,
    pub status: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct JobStatusResponse {
    pub job_id: String,
    pub status: JobStatus,
    pub progress_percentage: u8,
    pub current_step: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub started_at: Option<chrono::DateTime<chrono::Utc>>,
    pub completed_at: Option<chrono::DateTime<chrono::Utc>>,
    pub results_available: bool,
}

impl From<&ResearchJob> for JobStatusResponse {
    fn from(job: &ResearchJob) -> Self {
        Self {
            job_id: job.id.clone(),
            status: job.status,
            progress_percentage: job.progress_percentage(),
            current_step: job
                .current_step
                .clone()
                .unwrap_or_else(|| "initializing".to_string()),
            created_at: job.created_at,
            started_at: job.started_at,
            completed_at: job.completed_at,
            results_available: job.results_available(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ResearchResultsResponse {
    pub job_id: String,
    pub status: JobStatus,
    pub results: ResearchReport,
}

/// Validates the preferences, stores the job as `pending` and spawns the
/// research in the background. The response never waits for any lookup.
pub async fn start_research(
    State(state): State<AppState>,
    Json(request): Json<StartResearchRequest>,
) -> ApiResult<impl axum::response::IntoResponse> {
    if let Err(e) = serde_json::from_value::<TravelPreferences>(request.preferences.clone()) {
        return Err(ApiError::Research(ResearchError::InvalidPreferences(
            e.to_string(),
        )));
    }

    let job = ResearchJob::new(request.user_id, request.preferences);
    state.jobs.create(&job).await.map_err(ApiError::Research)?;
    info!(job_id = %job.id, "research job submitted");

    let runner = state.runner.clone();
    let background = job.clone();
    tokio::spawn(async move {
        if let Err(e) = runner.execute(&background).await {
            error!(job_id = %background.id, error = %e, "research job aborted");
        }
    });

    Ok(accepted(JobStatusResponse::from(&job)))
}

pub async fn get_research_status(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> ApiResult<impl axum::response::IntoResponse> {
    let job = state
        .jobs
        .find_by_id(&job_id)
        .await
        .map_err(ApiError::Research)?
        .ok_or_else(|| ApiError::Research(ResearchError::job_not_found(&job_id)))?;
    Ok(success(JobStatusResponse::from(&job)))
}

/// Full report of a completed job. Incomplete jobs are a client error; a
/// completed job whose payload no longer decodes is a server error.
pub async fn get_research_results(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> ApiResult<impl axum::response::IntoResponse> {
    let job = state
        .jobs
        .find_by_id(&job_id)
        .await
        .map_err(ApiError::Research)?
        .ok_or_else(|| ApiError::Research(ResearchError::job_not_found(&job_id)))?;

    if job.status != JobStatus::Completed {
        return Err(ApiError::Research(ResearchError::JobNotCompleted {
            id: job.id,
            status: job.status.to_string(),
        }));
    }

    let raw = job.results.ok_or_else(|| {
        ApiError::Research(ResearchError::ResultsUnavailable {
            id: job_id.clone(),
            message: "result payload is missing".to_string(),
        })
    })?;
    let results: ResearchReport = serde_json::from_value(raw).map_err(|e| {
        ApiError::Research(ResearchError::ResultsUnavailable {
            id: job_id.clone(),
            message: e.to_string(),
        })
    })?;

    Ok(success(ResearchResultsResponse {
        job_id,
        status: JobStatus::Completed,
        results,
    }))
}

pub async fn list_research_jobs(
    State(state): State<AppState>,
    Query(params): Query<JobQueryParams>,
) -> ApiResult<impl axum::response::IntoResponse> {
    let status = params
        .status
        .as_deref()
        .map(JobStatus::from_str)
        .transpose()
        .map_err(ApiError::BadRequest)?;

    let filter = JobFilter {
        user_id: params.user_id,
        status,
        limit: params.limit,
    };
    let jobs = state.jobs.list(&filter).await.map_err(ApiError::Research)?;
    let jobs: Vec<JobStatusResponse> = jobs.iter().map(JobStatusResponse::from).collect();
    Ok(success(jobs))
}

pub async fn delete_research_job(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> ApiResult<impl axum::response::IntoResponse> {
    let deleted = state.jobs.delete(&job_id).await.map_err(ApiError::Research)?;
    if !deleted {
        return Err(ApiError::Research(ResearchError::job_not_found(&job_id)));
    }
    info!(job_id = %job_id, "research job deleted");
    Ok(ApiResponse::success_empty_with_message(
        "research job deleted".to_string(),
    ))
}

/// Accepted values for every enumerated preference field.
pub async fn get_research_config() -> Json<Value> {
    Json(json!({
        "budget_levels": ["low", "moderate", "high", "luxury"],
        "travel_parties": ["solo", "couple", "family", "group"],
        "visa_preferences": ["visa_free", "visa_on_arrival", "evisa_ok"],
        "weather_preferences": ["hot", "warm", "mild", "cold", "snowy"],
        "trip_types": ["leisure", "adventure", "cultural", "romantic", "family", "business", "food", "wellness"],
        "pace_preferences": ["relaxed", "moderate", "busy"],
        "interests": [
            "beach", "mountain", "city", "history", "nature",
            "adventure", "food", "culture", "relaxation", "nightlife",
            "shopping", "art", "music", "sports", "photography",
            "wildlife", "architecture", "wine", "spa", "hiking"
        ],
        "max_flight_duration_options": [3, 5, 8, 12, 16, 24]
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use std::sync::Arc;
    use voyager_application::{
        ResearchOptions, ResearchOrchestrator, ResearchRunner, StaticDataAdapters,
    };
    use voyager_infrastructure::{ConnectionRegistry, MemoryJobRepository};

    fn state() -> AppState {
        let jobs = Arc::new(MemoryJobRepository::new());
        let registry = Arc::new(ConnectionRegistry::new());
        let runner = ResearchRunner::new(
            ResearchOrchestrator::new(
                Arc::new(StaticDataAdapters::new()),
                ResearchOptions::default(),
            ),
            jobs.clone(),
            registry.clone(),
        );
        AppState {
            jobs,
            registry,
            runner: Arc::new(runner),
        }
    }

    #[tokio::test]
    async fn malformed_preferences_are_rejected_up_front() {
        let request = StartResearchRequest {
            user_id: None,
            preferences: json!({"budget_level": 42}),
        };
        let response = start_research(State(state()), Json(request)).await;
        let status = match response {
            Ok(_) => panic!("expected a rejection"),
            Err(e) => e.into_response().status(),
        };
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn results_of_a_pending_job_are_a_client_error() {
        let state = state();
        let job = ResearchJob::new(None, json!({}));
        state.jobs.create(&job).await.unwrap();

        let response = get_research_results(State(state), Path(job.id)).await;
        let status = response.err().unwrap().into_response().status();
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unknown_job_is_not_found() {
        let response = get_research_status(State(state()), Path("missing".to_string())).await;
        let status = response.err().unwrap().into_response().status();
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn invalid_status_filter_is_rejected() {
        let params = JobQueryParams {
            user_id: None,
            status: Some("running".to_string()),
            limit: None,
        };
        let response = list_research_jobs(State(state()), Query(params)).await;
        let status = response.err().unwrap().into_response().status();
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn delete_reports_whether_the_job_existed() {
        let state = state();
        let job = ResearchJob::new(None, json!({}));
        state.jobs.create(&job).await.unwrap();

        assert!(
            delete_research_job(State(state.clone()), Path(job.id.clone()))
                .await
                .is_ok()
        );
        let second = delete_research_job(State(state), Path(job.id)).await;
        let status = second.err().unwrap().into_response().status();
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
