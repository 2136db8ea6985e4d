use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle of a research job.
///
/// `pending` is the only initial state; `completed` and `failed` are terminal
/// and freeze every progress field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    InProgress,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::InProgress => "in_progress",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

impl std::str::FromStr for JobStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(JobStatus::Pending),
            "in_progress" => Ok(JobStatus::InProgress),
            "completed" => Ok(JobStatus::Completed),
            "failed" => Ok(JobStatus::Failed),
            _ => Err(format!("invalid job status: {s}")),
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Durable record of one research job.
///
/// Mutated exclusively through the repository's row-scoped update operations;
/// `results` and `errors` are mutually exclusive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchJob {
    pub id: String,
    pub user_id: Option<String>,
    pub job_type: String,
    pub status: JobStatus,
    /// Input preferences, stored as submitted.
    pub preferences: serde_json::Value,
    pub total_steps: i64,
    pub completed_steps: i64,
    pub current_step: Option<String>,
    pub results: Option<serde_json::Value>,
    pub errors: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl ResearchJob {
    pub fn new(user_id: Option<String>, preferences: serde_json::Value) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id,
            job_type: "destination_research".to_string(),
            status: JobStatus::Pending,
            preferences,
            total_steps: 0,
            completed_steps: 0,
            current_step: None,
            results: None,
            errors: None,
            created_at: Utc::now(),
            started_at: None,
            completed_at: None,
        }
    }

    pub fn progress_percentage(&self) -> u8 {
        if self.total_steps <= 0 {
            return 0;
        }
        std::cmp::min(100, (self.completed_steps * 100 / self.total_steps) as u8)
    }

    pub fn results_available(&self) -> bool {
        self.status == JobStatus::Completed && self.results.is_some()
    }
}
