pub mod entities;
pub mod events;
pub mod preferences;
pub mod repositories;
pub mod research;

pub use entities::*;
pub use events::*;
pub use preferences::*;
pub use repositories::*;
pub use research::*;
pub use voyager_errors::{AdapterError, AdapterResult, ResearchError, ResearchResult};
