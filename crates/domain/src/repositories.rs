//! Abstract ports for persistence, event delivery and progress reporting.

use async_trait::async_trait;

use crate::entities::{JobStatus, ResearchJob};
use crate::events::{ProgressUpdate, ResearchEvent};
use voyager_errors::ResearchResult;

#[derive(Debug, Clone, Default)]
pub struct JobFilter {
    pub user_id: Option<String>,
    pub status: Option<JobStatus>,
    pub limit: Option<i64>,
}

/// Durable job store contract. Updates are row-scoped by job id so that
/// concurrent jobs never interfere.
#[async_trait]
pub trait JobRepository: Send + Sync {
    async fn create(&self, job: &ResearchJob) -> ResearchResult<()>;
    async fn find_by_id(&self, id: &str) -> ResearchResult<Option<ResearchJob>>;
    async fn list(&self, filter: &JobFilter) -> ResearchResult<Vec<ResearchJob>>;
    /// `pending` -> `in_progress`, records `started_at` and the step budget.
    async fn mark_started(&self, id: &str, total_steps: i64) -> ResearchResult<()>;
    async fn update_progress(&self, id: &str, update: &ProgressUpdate) -> ResearchResult<()>;
    /// Terminal transition; stores the result payload.
    async fn mark_completed(&self, id: &str, results: &serde_json::Value) -> ResearchResult<()>;
    /// Terminal transition; stores the error payload.
    async fn mark_failed(&self, id: &str, error: &serde_json::Value) -> ResearchResult<()>;
    async fn delete(&self, id: &str) -> ResearchResult<bool>;
}

/// Subscription scopes of the event channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventScope {
    Job,
    User,
    Global,
}

/// Best-effort event delivery to live subscribers. Implementations must never
/// let a broken subscriber surface an error to the publisher.
pub trait EventPublisher: Send + Sync {
    /// Delivers to every subscriber of `(scope, id)`. The id is ignored for
    /// the global scope.
    fn publish(&self, scope: EventScope, id: &str, event: &ResearchEvent);
}

/// Typed progress sink injected into the orchestrator. Implementations handle
/// their own delivery failures; reporting never fails the research.
#[async_trait]
pub trait ProgressSink: Send + Sync {
    async fn report(&self, update: &ProgressUpdate);
}

/// No-op sink for callers that do not track progress.
pub struct NullSink;

#[async_trait]
impl ProgressSink for NullSink {
    async fn report(&self, _update: &ProgressUpdate) {}
}
