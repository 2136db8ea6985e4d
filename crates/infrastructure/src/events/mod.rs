//! Live event fan-out to WebSocket subscribers.

pub mod registry;

pub use registry::{ConnectionId, ConnectionRegistry, EventSender};
