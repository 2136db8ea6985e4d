use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use voyager_errors::ResearchError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("research error: {0}")]
    Research(#[from] ResearchError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("bad request: {0}")]
    BadRequest(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message, error_type, suggestions) = match &self {
            ApiError::Research(ResearchError::JobNotFound { id }) => (
                StatusCode::NOT_FOUND,
                format!("research job {id} does not exist"),
                "JOB_NOT_FOUND".to_string(),
                vec![
                    "check that the job id is correct".to_string(),
                    "use GET /api/v1/research/jobs to list known jobs".to_string(),
                ],
            ),
            ApiError::Research(ResearchError::JobNotCompleted { id, status }) => (
                StatusCode::BAD_REQUEST,
                format!("research job {id} is not completed yet (status: {status})"),
                "JOB_NOT_COMPLETED".to_string(),
                vec![
                    "poll GET /api/v1/research/status/{job_id} until status is completed"
                        .to_string(),
                    "subscribe to the job's WebSocket channel for live updates".to_string(),
                ],
            ),
            ApiError::Research(ResearchError::ResultsUnavailable { id, .. }) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("research job {id} completed but its results could not be read"),
                "RESULTS_UNAVAILABLE".to_string(),
                vec!["resubmit the research request".to_string()],
            ),
            ApiError::Research(ResearchError::InvalidPreferences(msg)) => (
                StatusCode::BAD_REQUEST,
                format!("invalid preferences: {msg}"),
                "INVALID_PREFERENCES".to_string(),
                vec![
                    "check the preferences payload against GET /api/v1/research/config"
                        .to_string(),
                ],
            ),
            ApiError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                msg.clone(),
                "BAD_REQUEST".to_string(),
                vec!["check the request parameters".to_string()],
            ),
            ApiError::Research(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                e.to_string(),
                "INTERNAL_ERROR".to_string(),
                vec!["retry later; contact the operator if the problem persists".to_string()],
            ),
            ApiError::Serialization(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("serialization failed: {e}"),
                "SERIALIZATION_ERROR".to_string(),
                vec![],
            ),
        };

        let body = Json(json!({
            "error": {
                "message": error_message,
                "type": error_type,
                "code": status.as_u16(),
                "suggestions": suggestions,
                "timestamp": chrono::Utc::now().to_rfc3339(),
            }
        }));

        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_job_maps_to_not_found() {
        let response =
            ApiError::Research(ResearchError::job_not_found("abc")).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn incomplete_job_maps_to_bad_request() {
        let response = ApiError::Research(ResearchError::JobNotCompleted {
            id: "abc".to_string(),
            status: "in_progress".to_string(),
        })
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn undecodable_results_map_to_internal_error() {
        let response = ApiError::Research(ResearchError::ResultsUnavailable {
            id: "abc".to_string(),
            message: "missing field".to_string(),
        })
        .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
