//! Progress sinks: how orchestrator step callbacks reach the outside world.
//!
//! Every sink swallows its own delivery failures; progress reporting must
//! never fail or stall the research itself.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use voyager_domain::{
    EventPublisher, EventScope, JobRepository, ProgressSink, ProgressUpdate, ResearchEvent,
};

/// Persists each update on the job row.
pub struct RepositorySink {
    repository: Arc<dyn JobRepository>,
    job_id: String,
}

impl RepositorySink {
    pub fn new(repository: Arc<dyn JobRepository>, job_id: &str) -> Self {
        Self {
            repository,
            job_id: job_id.to_string(),
        }
    }
}

#[async_trait]
impl ProgressSink for RepositorySink {
    async fn report(&self, update: &ProgressUpdate) {
        if let Err(e) = self.repository.update_progress(&self.job_id, update).await {
            warn!(job_id = %self.job_id, error = %e, "failed to persist progress");
        }
    }
}

/// Publishes each update as a `progress` event to job and user subscribers.
pub struct ChannelSink {
    publisher: Arc<dyn EventPublisher>,
    job_id: String,
    user_id: Option<String>,
}

impl ChannelSink {
    pub fn new(
        publisher: Arc<dyn EventPublisher>,
        job_id: &str,
        user_id: Option<String>,
    ) -> Self {
        Self {
            publisher,
            job_id: job_id.to_string(),
            user_id,
        }
    }

    /// Sends a non-progress lifecycle event over the same scopes.
    pub fn emit(&self, event: &ResearchEvent) {
        self.publisher.publish(EventScope::Job, &self.job_id, event);
        if let Some(user_id) = &self.user_id {
            self.publisher.publish(EventScope::User, user_id, event);
        }
        self.publisher.publish(EventScope::Global, "", event);
    }
}

#[async_trait]
impl ProgressSink for ChannelSink {
    async fn report(&self, update: &ProgressUpdate) {
        if let Some(event) = ResearchEvent::progress(update) {
            self.emit(&event);
        }
    }
}

/// Fans one update out to several sinks in order.
pub struct CompositeSink {
    sinks: Vec<Box<dyn ProgressSink>>,
}

impl CompositeSink {
    pub fn new(sinks: Vec<Box<dyn ProgressSink>>) -> Self {
        Self { sinks }
    }
}

#[async_trait]
impl ProgressSink for CompositeSink {
    async fn report(&self, update: &ProgressUpdate) {
        for sink in &self.sinks {
            sink.report(update).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct RecordingPublisher {
        published: Mutex<Vec<(EventScope, String, String)>>,
    }

    impl EventPublisher for RecordingPublisher {
        fn publish(&self, scope: EventScope, id: &str, event: &ResearchEvent) {
            self.published.lock().unwrap().push((
                scope,
                id.to_string(),
                event.event_type().to_string(),
            ));
        }
    }

    fn update(job_id: Option<&str>) -> ProgressUpdate {
        ProgressUpdate {
            job_id: job_id.map(str::to_string),
            step: "researching_weather".to_string(),
            message: "Checking weather".to_string(),
            completed_steps: 1,
            total_steps: 9,
            percentage: 11,
        }
    }

    #[tokio::test]
    async fn channel_sink_publishes_to_all_scopes() {
        let publisher = Arc::new(RecordingPublisher {
            published: Mutex::new(Vec::new()),
        });
        let sink = ChannelSink::new(publisher.clone(), "job-1", Some("user-1".to_string()));
        sink.report(&update(Some("job-1"))).await;

        let published = publisher.published.lock().unwrap();
        assert_eq!(published.len(), 3);
        assert_eq!(published[0], (EventScope::Job, "job-1".to_string(), "progress".to_string()));
        assert_eq!(published[1].0, EventScope::User);
        assert_eq!(published[2].0, EventScope::Global);
    }

    #[tokio::test]
    async fn updates_without_a_job_id_are_not_published() {
        let publisher = Arc::new(RecordingPublisher {
            published: Mutex::new(Vec::new()),
        });
        let sink = ChannelSink::new(publisher.clone(), "job-1", None);
        sink.report(&update(None)).await;
        assert!(publisher.published.lock().unwrap().is_empty());
    }
}
