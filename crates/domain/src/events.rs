//! Research events delivered to live subscribers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One progress callback payload, emitted once per completed phase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressUpdate {
    pub job_id: Option<String>,
    pub step: String,
    pub message: String,
    pub completed_steps: u32,
    pub total_steps: u32,
    pub percentage: u8,
}

/// Compact completion summary carried by the `completed` event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchSummary {
    pub destinations_count: usize,
    pub top_destination: Option<String>,
    pub top_score: f64,
}

/// Events published to the connection registry. Delivery is best-effort.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResearchEvent {
    Started {
        job_id: String,
        preferences: serde_json::Value,
        timestamp: DateTime<Utc>,
    },
    Progress {
        job_id: String,
        step: String,
        percentage: u8,
        message: String,
        timestamp: DateTime<Utc>,
    },
    Completed {
        job_id: String,
        summary: ResearchSummary,
        timestamp: DateTime<Utc>,
    },
    Error {
        job_id: String,
        error: String,
        timestamp: DateTime<Utc>,
    },
}

impl ResearchEvent {
    pub fn started(job_id: &str, preferences: serde_json::Value) -> Self {
        Self::Started {
            job_id: job_id.to_string(),
            preferences,
            timestamp: Utc::now(),
        }
    }

    pub fn progress(update: &ProgressUpdate) -> Option<Self> {
        let job_id = update.job_id.clone()?;
        Some(Self::Progress {
            job_id,
            step: update.step.clone(),
            percentage: update.percentage,
            message: update.message.clone(),
            timestamp: Utc::now(),
        })
    }

    pub fn completed(job_id: &str, summary: ResearchSummary) -> Self {
        Self::Completed {
            job_id: job_id.to_string(),
            summary,
            timestamp: Utc::now(),
        }
    }

    pub fn error(job_id: &str, error: impl Into<String>) -> Self {
        Self::Error {
            job_id: job_id.to_string(),
            error: error.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn job_id(&self) -> &str {
        match self {
            Self::Started { job_id, .. } => job_id,
            Self::Progress { job_id, .. } => job_id,
            Self::Completed { job_id, .. } => job_id,
            Self::Error { job_id, .. } => job_id,
        }
    }

    pub fn event_type(&self) -> &'static str {
        match self {
            Self::Started { .. } => "started",
            Self::Progress { .. } => "progress",
            Self::Completed { .. } => "completed",
            Self::Error { .. } => "error",
        }
    }
}
