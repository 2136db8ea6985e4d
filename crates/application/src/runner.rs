//! Job-level wrapper around the orchestrator: owns the lifecycle transitions
//! and the started/completed/error events of one research job.

use std::sync::Arc;

use tracing::{error, info};

use crate::orchestrator::ResearchOrchestrator;
use crate::progress::{ChannelSink, CompositeSink, RepositorySink};
use voyager_domain::{
    EventPublisher, JobRepository, ProgressSink, ResearchEvent, ResearchJob, ResearchReport,
    ResearchResult, ResearchSummary, TravelPreferences,
};

pub struct ResearchRunner {
    orchestrator: ResearchOrchestrator,
    repository: Arc<dyn JobRepository>,
    publisher: Arc<dyn EventPublisher>,
}

impl ResearchRunner {
    pub fn new(
        orchestrator: ResearchOrchestrator,
        repository: Arc<dyn JobRepository>,
        publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            orchestrator,
            repository,
            publisher,
        }
    }

    /// Runs one pending job to a terminal state. The job row and subscribers
    /// always learn the outcome; only repository failures propagate.
    pub async fn execute(&self, job: &ResearchJob) -> ResearchResult<()> {
        let lifecycle = ChannelSink::new(
            self.publisher.clone(),
            &job.id,
            job.user_id.clone(),
        );

        let preferences: TravelPreferences = match serde_json::from_value(job.preferences.clone())
        {
            Ok(preferences) => preferences,
            Err(e) => {
                let message = format!("invalid preferences: {e}");
                self.fail(job, &lifecycle, &message).await?;
                return Ok(());
            }
        };

        let plan = self.orchestrator.plan(&preferences);
        self.repository
            .mark_started(&job.id, plan.total_steps as i64)
            .await?;
        lifecycle.emit(&ResearchEvent::started(&job.id, job.preferences.clone()));

        let sink = CompositeSink::new(vec![
            Box::new(RepositorySink::new(self.repository.clone(), &job.id)),
            Box::new(ChannelSink::new(
                self.publisher.clone(),
                &job.id,
                job.user_id.clone(),
            )) as Box<dyn ProgressSink>,
        ]);

        match self.orchestrator.run(Some(&job.id), &plan, &sink).await {
            Ok(report) => {
                let results = serde_json::to_value(&report)?;
                self.repository.mark_completed(&job.id, &results).await?;
                lifecycle.emit(&ResearchEvent::completed(&job.id, summarize(&report)));
                info!(job_id = %job.id, destinations = report.destinations.len(), "research job completed");
                Ok(())
            }
            Err(e) => {
                self.fail(job, &lifecycle, &e.to_string()).await?;
                Ok(())
            }
        }
    }

    async fn fail(
        &self,
        job: &ResearchJob,
        lifecycle: &ChannelSink,
        message: &str,
    ) -> ResearchResult<()> {
        error!(job_id = %job.id, error = message, "research job failed");
        self.repository
            .mark_failed(&job.id, &serde_json::json!({ "error": message }))
            .await?;
        lifecycle.emit(&ResearchEvent::error(&job.id, message));
        Ok(())
    }
}

fn summarize(report: &ResearchReport) -> ResearchSummary {
    let top = report.recommendations.first();
    ResearchSummary {
        destinations_count: report.destinations.len(),
        top_destination: top.map(|r| r.destination.clone()),
        top_score: top.map_or(0.0, |r| r.score),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::StaticDataAdapters;
    use crate::orchestrator::ResearchOptions;
    use voyager_domain::{EventScope, JobStatus};
    use voyager_infrastructure::{ConnectionRegistry, MemoryJobRepository};

    fn runner(
        repository: Arc<MemoryJobRepository>,
        registry: Arc<ConnectionRegistry>,
    ) -> ResearchRunner {
        ResearchRunner::new(
            ResearchOrchestrator::new(
                Arc::new(StaticDataAdapters::new()),
                ResearchOptions::default(),
            ),
            repository,
            registry,
        )
    }

    #[tokio::test]
    async fn execute_drives_the_job_to_completed() {
        let repository = Arc::new(MemoryJobRepository::new());
        let registry = Arc::new(ConnectionRegistry::new());

        let job = ResearchJob::new(
            Some("user-1".to_string()),
            serde_json::json!({
                "origin": "New York, USA",
                "destinations": ["Bali, Indonesia"],
                "interests": ["beaches"]
            }),
        );
        repository.create(&job).await.unwrap();

        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let conn = registry.connect(tx);
        registry.subscribe(conn, EventScope::Job, &job.id);

        runner(repository.clone(), registry.clone())
            .execute(&job)
            .await
            .unwrap();

        let done = repository.find_by_id(&job.id).await.unwrap().unwrap();
        assert_eq!(done.status, JobStatus::Completed);
        assert_eq!(done.completed_steps, done.total_steps);
        assert!(done.results_available());
        let report: ResearchReport =
            serde_json::from_value(done.results.unwrap()).unwrap();
        assert_eq!(report.destinations.len(), 1);

        // started, 9 progress updates, completed.
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event.event_type());
        }
        assert_eq!(events.first(), Some(&"started"));
        assert_eq!(events.last(), Some(&"completed"));
        assert_eq!(events.iter().filter(|e| **e == "progress").count(), 9);
    }

    #[tokio::test]
    async fn concurrent_jobs_keep_their_event_streams_apart_and_ordered() {
        let repository = Arc::new(MemoryJobRepository::new());
        let registry = Arc::new(ConnectionRegistry::new());
        let runner = runner(repository.clone(), registry.clone());

        let job_a = ResearchJob::new(
            None,
            serde_json::json!({"destinations": ["Bali, Indonesia"], "interests": ["beaches"]}),
        );
        let job_b = ResearchJob::new(
            None,
            serde_json::json!({"destinations": ["Tokyo, Japan"], "interests": ["city"]}),
        );
        repository.create(&job_a).await.unwrap();
        repository.create(&job_b).await.unwrap();

        let (tx_a, mut rx_a) = tokio::sync::mpsc::unbounded_channel();
        let conn_a = registry.connect(tx_a);
        registry.subscribe(conn_a, EventScope::Job, &job_a.id);

        let (tx_b, mut rx_b) = tokio::sync::mpsc::unbounded_channel();
        let conn_b = registry.connect(tx_b);
        registry.subscribe(conn_b, EventScope::Job, &job_b.id);

        let (first, second) = tokio::join!(runner.execute(&job_a), runner.execute(&job_b));
        first.unwrap();
        second.unwrap();

        for (job, rx) in [(&job_a, &mut rx_a), (&job_b, &mut rx_b)] {
            let mut events = Vec::new();
            while let Ok(event) = rx.try_recv() {
                events.push(event);
            }

            // Each subscriber only ever hears about its own job.
            assert!(events.iter().all(|e| e.job_id() == job.id));
            assert_eq!(events.first().map(ResearchEvent::event_type), Some("started"));
            assert_eq!(
                events.last().map(ResearchEvent::event_type),
                Some("completed")
            );

            let percentages: Vec<u8> = events
                .iter()
                .filter_map(|e| match e {
                    ResearchEvent::Progress { percentage, .. } => Some(*percentage),
                    _ => None,
                })
                .collect();
            assert!(!percentages.is_empty());
            assert!(percentages.windows(2).all(|w| w[0] <= w[1]));
        }
    }

    #[tokio::test]
    async fn malformed_preferences_fail_the_job() {
        let repository = Arc::new(MemoryJobRepository::new());
        let registry = Arc::new(ConnectionRegistry::new());

        let job = ResearchJob::new(None, serde_json::json!({"budget_level": 42}));
        repository.create(&job).await.unwrap();

        runner(repository.clone(), registry)
            .execute(&job)
            .await
            .unwrap();

        let failed = repository.find_by_id(&job.id).await.unwrap().unwrap();
        assert_eq!(failed.status, JobStatus::Failed);
        assert!(failed.errors.unwrap()["error"]
            .as_str()
            .unwrap()
            .contains("invalid preferences"));
    }
}
