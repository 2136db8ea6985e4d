//! Research use cases: adapters, scoring, suggestions and the orchestrator.

pub mod adapters;
pub mod orchestrator;
pub mod progress;
pub mod runner;
pub mod scoring;
pub mod suggestions;

pub use adapters::{CachedAdapters, DataAdapters, StaticDataAdapters};
pub use orchestrator::{ResearchOrchestrator, ResearchOptions};
pub use progress::{ChannelSink, CompositeSink, RepositorySink};
pub use runner::ResearchRunner;
pub use scoring::score_destination;
pub use suggestions::suggest_destinations;
