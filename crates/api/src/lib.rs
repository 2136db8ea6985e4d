//! HTTP surface of the research service.
//!
//! Built on Axum: REST endpoints for submitting and polling research jobs,
//! WebSocket channels for live progress, and a shared [`routes::AppState`]
//! holding the job store, the connection registry and the research runner.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use tower::ServiceBuilder;

use middleware::{cors_layer, request_logging, trace_layer};
use routes::{create_routes, AppState};
use voyager_application::ResearchRunner;
use voyager_domain::JobRepository;
use voyager_infrastructure::ConnectionRegistry;

/// Assembles the full application router with tracing, CORS and request
/// logging applied.
pub fn create_app(
    jobs: Arc<dyn JobRepository>,
    registry: Arc<ConnectionRegistry>,
    runner: Arc<ResearchRunner>,
    cors_enabled: bool,
) -> Router {
    let state = AppState {
        jobs,
        registry,
        runner,
    };

    let router = create_routes(state).layer(
        ServiceBuilder::new()
            .layer(trace_layer())
            .layer(axum::middleware::from_fn(request_logging)),
    );
    if cors_enabled {
        router.layer(cors_layer())
    } else {
        router
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;
    use voyager_application::{ResearchOptions, ResearchOrchestrator, StaticDataAdapters};
    use voyager_infrastructure::MemoryJobRepository;

    fn test_app() -> Router {
        let jobs = Arc::new(MemoryJobRepository::new());
        let registry = Arc::new(ConnectionRegistry::new());
        let runner = Arc::new(ResearchRunner::new(
            ResearchOrchestrator::new(
                Arc::new(StaticDataAdapters::new()),
                ResearchOptions::default(),
            ),
            jobs.clone(),
            registry.clone(),
        ));
        create_app(jobs, registry, runner, true)
    }

    #[tokio::test]
    async fn health_endpoint_responds() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn submission_returns_a_pollable_job() {
        let app = test_app();

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/research/start")
                    .method("POST")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        r#"{"preferences": {"destinations": ["Bali, Indonesia"]}}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);

        let raw = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&raw).unwrap();
        assert_eq!(body["success"], true);
        let job_id = body["data"]["job_id"].as_str().unwrap().to_string();
        assert_eq!(body["data"]["progress_percentage"], 0);

        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/api/v1/research/status/{job_id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn results_of_an_unknown_job_are_not_found() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/research/results/nope")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn config_lists_the_preference_options() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/research/config")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let raw = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&raw).unwrap();
        assert!(body["budget_levels"]
            .as_array()
            .unwrap()
            .contains(&serde_json::json!("moderate")));
    }
}
