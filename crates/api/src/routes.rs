use axum::{
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;

use crate::handlers::{
    health::health_check,
    live::{global_websocket, job_websocket, user_websocket},
    research::{
        delete_research_job, get_research_config, get_research_results, get_research_status,
        list_research_jobs, start_research,
    },
};
use voyager_application::ResearchRunner;
use voyager_domain::JobRepository;
use voyager_infrastructure::ConnectionRegistry;

#[derive(Clone)]
pub struct AppState {
    pub jobs: Arc<dyn JobRepository>,
    pub registry: Arc<ConnectionRegistry>,
    pub runner: Arc<ResearchRunner>,
}

pub fn create_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        // research jobs
        .route("/api/v1/research/start", post(start_research))
        .route("/api/v1/research/status/{job_id}", get(get_research_status))
        .route(
            "/api/v1/research/results/{job_id}",
            get(get_research_results),
        )
        .route("/api/v1/research/jobs", get(list_research_jobs))
        .route(
            "/api/v1/research/jobs/{job_id}",
            delete(delete_research_job),
        )
        .route("/api/v1/research/config", get(get_research_config))
        // live updates
        .route("/api/v1/ws/research/{job_id}", get(job_websocket))
        .route("/api/v1/ws/user/{user_id}", get(user_websocket))
        .route("/api/v1/ws/global", get(global_websocket))
        .with_state(state)
}
