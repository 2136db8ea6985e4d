//! Connection registry for live research updates.
//!
//! Tracks every open WebSocket as an unbounded channel sender and fans events
//! out per scope. Delivery is best-effort: a subscriber whose channel is gone
//! is evicted during publish and the remaining subscribers still receive the
//! event.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use tokio::sync::mpsc;
use tracing::{debug, warn};
use uuid::Uuid;

use voyager_domain::{EventPublisher, EventScope, ResearchEvent};

pub type EventSender = mpsc::UnboundedSender<ResearchEvent>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

#[derive(Default)]
struct Inner {
    connections: HashMap<ConnectionId, EventSender>,
    job_subscribers: HashMap<String, HashSet<ConnectionId>>,
    user_subscribers: HashMap<String, HashSet<ConnectionId>>,
    global_subscribers: HashSet<ConnectionId>,
}

impl Inner {
    fn remove_everywhere(&mut self, id: ConnectionId) {
        self.connections.remove(&id);
        self.job_subscribers.retain(|_, subs| {
            subs.remove(&id);
            !subs.is_empty()
        });
        self.user_subscribers.retain(|_, subs| {
            subs.remove(&id);
            !subs.is_empty()
        });
        self.global_subscribers.remove(&id);
    }
}

/// Shared registry of live connections, keyed by scope. All operations are
/// synchronous; the mutex is only held for map bookkeeping and unbounded
/// sends, which never block.
#[derive(Default)]
pub struct ConnectionRegistry {
    inner: Mutex<Inner>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a connection and returns its handle. The connection receives
    /// nothing until it subscribes to a scope.
    pub fn connect(&self, sender: EventSender) -> ConnectionId {
        let id = ConnectionId(Uuid::new_v4());
        let mut inner = self.lock();
        inner.connections.insert(id, sender);
        debug!(connection = %id.0, "websocket connected");
        id
    }

    /// Subscribes `id` to `(scope, key)`. A job subscription replaces any
    /// previous job subscription of the same connection, so a client can
    /// switch jobs over one socket.
    pub fn subscribe(&self, id: ConnectionId, scope: EventScope, key: &str) {
        let mut inner = self.lock();
        if !inner.connections.contains_key(&id) {
            return;
        }
        match scope {
            EventScope::Job => {
                inner.job_subscribers.retain(|_, subs| {
                    subs.remove(&id);
                    !subs.is_empty()
                });
                inner
                    .job_subscribers
                    .entry(key.to_string())
                    .or_default()
                    .insert(id);
            }
            EventScope::User => {
                inner
                    .user_subscribers
                    .entry(key.to_string())
                    .or_default()
                    .insert(id);
            }
            EventScope::Global => {
                inner.global_subscribers.insert(id);
            }
        }
    }

    /// Removes `id` from `(scope, key)` without closing the connection.
    pub fn unsubscribe(&self, id: ConnectionId, scope: EventScope, key: &str) {
        let mut inner = self.lock();
        match scope {
            EventScope::Job => {
                if let Some(subs) = inner.job_subscribers.get_mut(key) {
                    subs.remove(&id);
                    if subs.is_empty() {
                        inner.job_subscribers.remove(key);
                    }
                }
            }
            EventScope::User => {
                if let Some(subs) = inner.user_subscribers.get_mut(key) {
                    subs.remove(&id);
                    if subs.is_empty() {
                        inner.user_subscribers.remove(key);
                    }
                }
            }
            EventScope::Global => {
                inner.global_subscribers.remove(&id);
            }
        }
    }

    /// Drops the connection from the registry and every subscription set.
    pub fn disconnect(&self, id: ConnectionId) {
        let mut inner = self.lock();
        inner.remove_everywhere(id);
        debug!(connection = %id.0, "websocket disconnected");
    }

    pub fn connection_count(&self) -> usize {
        self.lock().connections.len()
    }

    pub fn subscriber_count(&self, scope: EventScope, key: &str) -> usize {
        let inner = self.lock();
        match scope {
            EventScope::Job => inner.job_subscribers.get(key).map_or(0, HashSet::len),
            EventScope::User => inner.user_subscribers.get(key).map_or(0, HashSet::len),
            EventScope::Global => inner.global_subscribers.len(),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // Inner holds no user code, so the lock cannot be poisoned in
        // practice; recover rather than propagate if it ever is.
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl EventPublisher for ConnectionRegistry {
    fn publish(&self, scope: EventScope, key: &str, event: &ResearchEvent) {
        let mut inner = self.lock();
        let targets: Vec<ConnectionId> = match scope {
            EventScope::Job => inner
                .job_subscribers
                .get(key)
                .map(|subs| subs.iter().copied().collect())
                .unwrap_or_default(),
            EventScope::User => inner
                .user_subscribers
                .get(key)
                .map(|subs| subs.iter().copied().collect())
                .unwrap_or_default(),
            EventScope::Global => inner.global_subscribers.iter().copied().collect(),
        };

        let mut broken = Vec::new();
        for id in targets {
            let delivered = inner
                .connections
                .get(&id)
                .is_some_and(|sender| sender.send(event.clone()).is_ok());
            if !delivered {
                broken.push(id);
            }
        }
        for id in broken {
            warn!(connection = %id.0, "evicting unreachable subscriber");
            inner.remove_everywhere(id);
        }
    }
}
