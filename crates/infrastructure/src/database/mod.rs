//! Job store implementations.

pub mod memory;
pub mod sqlite;

pub use memory::MemoryJobRepository;
pub use sqlite::SqliteJobRepository;
