//! SQLite-backed job repository.
//!
//! All mutations are row-scoped by job id and guarded by status predicates so
//! that terminal jobs are frozen and progress can only advance.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use std::str::FromStr;

use voyager_domain::{JobFilter, JobRepository, JobStatus, ProgressUpdate, ResearchJob};
use voyager_errors::{ResearchError, ResearchResult};

pub struct SqliteJobRepository {
    pool: SqlitePool,
}

impl SqliteJobRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create the schema if it does not exist yet.
    pub async fn migrate(&self) -> ResearchResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS research_jobs (
                id              TEXT PRIMARY KEY,
                user_id         TEXT,
                job_type        TEXT NOT NULL,
                status          TEXT NOT NULL,
                preferences     TEXT NOT NULL,
                total_steps     INTEGER NOT NULL DEFAULT 0,
                completed_steps INTEGER NOT NULL DEFAULT 0,
                current_step    TEXT,
                results         TEXT,
                errors          TEXT,
                created_at      TEXT NOT NULL,
                started_at      TEXT,
                completed_at    TEXT
            )
            "#,
        )
        .execute(&self.pool)
        .await?;
        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_research_jobs_status ON research_jobs (status)",
        )
        .execute(&self.pool)
        .await?;
        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_research_jobs_user ON research_jobs (user_id)",
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    fn map_row(row: &SqliteRow) -> ResearchResult<ResearchJob> {
        let status_raw: String = row.try_get("status")?;
        let status = JobStatus::from_str(&status_raw).map_err(ResearchError::DatabaseOperation)?;

        let preferences_raw: String = row.try_get("preferences")?;
        let preferences = serde_json::from_str(&preferences_raw)?;

        let results = row
            .try_get::<Option<String>, _>("results")?
            .map(|raw| serde_json::from_str(&raw))
            .transpose()?;
        let errors = row
            .try_get::<Option<String>, _>("errors")?
            .map(|raw| serde_json::from_str(&raw))
            .transpose()?;

        Ok(ResearchJob {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            job_type: row.try_get("job_type")?,
            status,
            preferences,
            total_steps: row.try_get("total_steps")?,
            completed_steps: row.try_get("completed_steps")?,
            current_step: row.try_get("current_step")?,
            results,
            errors,
            created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
            started_at: row.try_get::<Option<DateTime<Utc>>, _>("started_at")?,
            completed_at: row.try_get::<Option<DateTime<Utc>>, _>("completed_at")?,
        })
    }
}

#[async_trait]
impl JobRepository for SqliteJobRepository {
    async fn create(&self, job: &ResearchJob) -> ResearchResult<()> {
        sqlx::query(
            r#"
            INSERT INTO research_jobs
                (id, user_id, job_type, status, preferences, total_steps,
                 completed_steps, current_step, results, errors, created_at,
                 started_at, completed_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&job.id)
        .bind(&job.user_id)
        .bind(&job.job_type)
        .bind(job.status.as_str())
        .bind(serde_json::to_string(&job.preferences)?)
        .bind(job.total_steps)
        .bind(job.completed_steps)
        .bind(&job.current_step)
        .bind(
            job.results
                .as_ref()
                .map(serde_json::to_string)
                .transpose()?,
        )
        .bind(job.errors.as_ref().map(serde_json::to_string).transpose()?)
        .bind(job.created_at)
        .bind(job.started_at)
        .bind(job.completed_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> ResearchResult<Option<ResearchJob>> {
        let row = sqlx::query("SELECT * FROM research_jobs WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(Self::map_row).transpose()
    }

    async fn list(&self, filter: &JobFilter) -> ResearchResult<Vec<ResearchJob>> {
        let mut sql = String::from("SELECT * FROM research_jobs WHERE 1 = 1");
        if filter.user_id.is_some() {
            sql.push_str(" AND user_id = ?");
        }
        if filter.status.is_some() {
            sql.push_str(" AND status = ?");
        }
        sql.push_str(" ORDER BY created_at DESC LIMIT ?");

        let mut query = sqlx::query(&sql);
        if let Some(user_id) = &filter.user_id {
            query = query.bind(user_id);
        }
        if let Some(status) = &filter.status {
            query = query.bind(status.as_str());
        }
        query = query.bind(filter.limit.unwrap_or(10));

        let rows = query.fetch_all(&self.pool).await?;
        rows.iter().map(Self::map_row).collect()
    }

    async fn mark_started(&self, id: &str, total_steps: i64) -> ResearchResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE research_jobs
            SET status = 'in_progress', started_at = ?, total_steps = ?
            WHERE id = ? AND status = 'pending'
            "#,
        )
        .bind(Utc::now())
        .bind(total_steps)
        .bind(id)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(ResearchError::DatabaseOperation(format!(
                "job {id} is not pending"
            )));
        }
        Ok(())
    }

    async fn update_progress(&self, id: &str, update: &ProgressUpdate) -> ResearchResult<()> {
        // max() keeps completed_steps monotonic even if updates land out of
        // order; terminal jobs are excluded by the status predicate.
        sqlx::query(
            r#"
            UPDATE research_jobs
            SET current_step = ?,
                completed_steps = max(completed_steps, ?)
            WHERE id = ? AND status = 'in_progress'
            "#,
        )
        .bind(&update.step)
        .bind(update.completed_steps as i64)
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn mark_completed(&self, id: &str, results: &serde_json::Value) -> ResearchResult<()> {
        sqlx::query(
            r#"
            UPDATE research_jobs
            SET status = 'completed', completed_at = ?, results = ?, errors = NULL,
                completed_steps = total_steps
            WHERE id = ? AND status = 'in_progress'
            "#,
        )
        .bind(Utc::now())
        .bind(serde_json::to_string(results)?)
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn mark_failed(&self, id: &str, error: &serde_json::Value) -> ResearchResult<()> {
        sqlx::query(
            r#"
            UPDATE research_jobs
            SET status = 'failed', completed_at = ?, errors = ?, results = NULL
            WHERE id = ? AND status IN ('pending', 'in_progress')
            "#,
        )
        .bind(Utc::now())
        .bind(serde_json::to_string(error)?)
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> ResearchResult<bool> {
        let result = sqlx::query("DELETE FROM research_jobs WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
