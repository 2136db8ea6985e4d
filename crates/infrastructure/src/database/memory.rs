//! In-memory job repository, used in tests and as a dependency-free fallback.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;

use voyager_domain::{JobFilter, JobRepository, JobStatus, ProgressUpdate, ResearchJob};
use voyager_errors::{ResearchError, ResearchResult};

#[derive(Default)]
pub struct MemoryJobRepository {
    jobs: RwLock<HashMap<String, ResearchJob>>,
}

impl MemoryJobRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl JobRepository for MemoryJobRepository {
    async fn create(&self, job: &ResearchJob) -> ResearchResult<()> {
        let mut jobs = self.jobs.write().await;
        if jobs.contains_key(&job.id) {
            return Err(ResearchError::DatabaseOperation(format!(
                "job {} already exists",
                job.id
            )));
        }
        jobs.insert(job.id.clone(), job.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> ResearchResult<Option<ResearchJob>> {
        Ok(self.jobs.read().await.get(id).cloned())
    }

    async fn list(&self, filter: &JobFilter) -> ResearchResult<Vec<ResearchJob>> {
        let jobs = self.jobs.read().await;
        let mut matched: Vec<ResearchJob> = jobs
            .values()
            .filter(|job| {
                filter
                    .user_id
                    .as_ref()
                    .is_none_or(|user| job.user_id.as_ref() == Some(user))
            })
            .filter(|job| filter.status.is_none_or(|status| job.status == status))
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        matched.truncate(filter.limit.unwrap_or(10) as usize);
        Ok(matched)
    }

    async fn mark_started(&self, id: &str, total_steps: i64) -> ResearchResult<()> {
        let mut jobs = self.jobs.write().await;
        let job = jobs
            .get_mut(id)
            .ok_or_else(|| ResearchError::job_not_found(id))?;
        if job.status != JobStatus::Pending {
            return Err(ResearchError::DatabaseOperation(format!(
                "job {id} is not pending"
            )));
        }
        job.status = JobStatus::InProgress;
        job.started_at = Some(Utc::now());
        job.total_steps = total_steps;
        Ok(())
    }

    async fn update_progress(&self, id: &str, update: &ProgressUpdate) -> ResearchResult<()> {
        let mut jobs = self.jobs.write().await;
        if let Some(job) = jobs.get_mut(id) {
            if job.status == JobStatus::InProgress {
                job.current_step = Some(update.step.clone());
                job.completed_steps = job.completed_steps.max(update.completed_steps as i64);
            }
        }
        Ok(())
    }

    async fn mark_completed(&self, id: &str, results: &serde_json::Value) -> ResearchResult<()> {
        let mut jobs = self.jobs.write().await;
        if let Some(job) = jobs.get_mut(id) {
            if job.status == JobStatus::InProgress {
                job.status = JobStatus::Completed;
                job.completed_at = Some(Utc::now());
                job.completed_steps = job.total_steps;
                job.results = Some(results.clone());
                job.errors = None;
            }
        }
        Ok(())
    }

    async fn mark_failed(&self, id: &str, error: &serde_json::Value) -> ResearchResult<()> {
        let mut jobs = self.jobs.write().await;
        if let Some(job) = jobs.get_mut(id) {
            if !job.status.is_terminal() {
                job.status = JobStatus::Failed;
                job.completed_at = Some(Utc::now());
                job.errors = Some(error.clone());
                job.results = None;
            }
        }
        Ok(())
    }

    async fn delete(&self, id: &str) -> ResearchResult<bool> {
        Ok(self.jobs.write().await.remove(id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn duplicate_create_is_rejected() {
        let repo = MemoryJobRepository::new();
        let job = ResearchJob::new(None, serde_json::json!({}));
        repo.create(&job).await.unwrap();
        assert!(repo.create(&job).await.is_err());
    }

    #[tokio::test]
    async fn failed_job_keeps_errors_and_drops_results() {
        let repo = MemoryJobRepository::new();
        let job = ResearchJob::new(None, serde_json::json!({}));
        repo.create(&job).await.unwrap();
        repo.mark_started(&job.id, 4).await.unwrap();
        repo.mark_failed(&job.id, &serde_json::json!({"error": "boom"}))
            .await
            .unwrap();

        let failed = repo.find_by_id(&job.id).await.unwrap().unwrap();
        assert_eq!(failed.status, JobStatus::Failed);
        assert!(failed.results.is_none());
        assert_eq!(failed.errors.unwrap()["error"], "boom");

        // Terminal status is final.
        repo.mark_completed(&job.id, &serde_json::json!({}))
            .await
            .unwrap();
        let still_failed = repo.find_by_id(&job.id).await.unwrap().unwrap();
        assert_eq!(still_failed.status, JobStatus::Failed);
    }

    #[tokio::test]
    async fn list_respects_limit() {
        let repo = MemoryJobRepository::new();
        for _ in 0..5 {
            repo.create(&ResearchJob::new(None, serde_json::json!({})))
                .await
                .unwrap();
        }
        let jobs = repo
            .list(&JobFilter {
                limit: Some(3),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(jobs.len(), 3);
    }
}
