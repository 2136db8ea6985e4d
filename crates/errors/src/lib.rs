use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResearchError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("database operation error: {0}")]
    DatabaseOperation(String),
    #[error("research job not found: {id}")]
    JobNotFound { id: String },
    #[error("research job {id} is not completed (status: {status})")]
    JobNotCompleted { id: String, status: String },
    #[error("research job {id} completed but its results could not be decoded: {message}")]
    ResultsUnavailable { id: String, message: String },
    #[error("invalid preferences: {0}")]
    InvalidPreferences(String),
    #[error("cache error: {0}")]
    Cache(String),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("configuration error: {0}")]
    Configuration(String),
}

pub type ResearchResult<T> = Result<T, ResearchError>;

impl ResearchError {
    pub fn job_not_found<S: Into<String>>(id: S) -> Self {
        Self::JobNotFound { id: id.into() }
    }

    pub fn cache_error<S: Into<String>>(msg: S) -> Self {
        Self::Cache(msg.into())
    }
}

/// Failure of a single category lookup. Always recoverable: the orchestrator
/// converts it into an absent category, never into a job failure.
#[derive(Debug, Clone, Error)]
pub enum AdapterError {
    #[error("{category} lookup timed out after {seconds}s")]
    Timeout { category: &'static str, seconds: u64 },
    #[error("{category} upstream error: {message}")]
    Upstream {
        category: &'static str,
        message: String,
    },
    #[error("{category} returned no usable data")]
    NoData { category: &'static str },
}

pub type AdapterResult<T> = Result<T, AdapterError>;

impl AdapterError {
    pub fn upstream<S: Into<String>>(category: &'static str, message: S) -> Self {
        Self::Upstream {
            category,
            message: message.into(),
        }
    }

    pub fn category(&self) -> &'static str {
        match self {
            Self::Timeout { category, .. } => category,
            Self::Upstream { category, .. } => category,
            Self::NoData { category } => category,
        }
    }
}
