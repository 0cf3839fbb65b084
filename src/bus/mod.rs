//! In-memory publish/subscribe bus with a bounded, newest-first history.
//!
//! The bus is an explicit instance owned by a session and shared as
//! `Arc<EventBus>`; nothing here is process-global. Dispatch is synchronous
//! and happens on the emitting thread. Async observers can additionally
//! [`watch`](EventBus::watch) a broadcast channel.

mod feed;

pub use feed::summarize;

use crate::contracts::{BusEvent, EventType};
use crate::utils::ids::{now_iso, short_id};
use serde_json::{Map, Value};
use std::collections::VecDeque;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use tokio::sync::broadcast;
use tracing::debug;

/// Number of events retained for display.
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

const WATCH_CAPACITY: usize = 256;

pub type Callback = Arc<dyn Fn(&BusEvent) + Send + Sync>;

/// Subscription key: one event type, or every type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    Type(EventType),
    All,
}

impl From<EventType> for Topic {
    fn from(kind: EventType) -> Self {
        Self::Type(kind)
    }
}

impl FromStr for Topic {
    type Err = strum::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            return Ok(Self::All);
        }
        EventType::from_str(s).map(Self::Type)
    }
}

struct Listener {
    id: u64,
    topic: Topic,
    callback: Callback,
}

#[derive(Default)]
struct Inner {
    listeners: Vec<Listener>,
    history: VecDeque<BusEvent>,
}

pub struct EventBus {
    inner: Mutex<Inner>,
    next_id: AtomicU64,
    history_limit: usize,
    tx: broadcast::Sender<BusEvent>,
}

impl EventBus {
    pub fn new() -> Arc<Self> {
        Self::with_capacity(DEFAULT_HISTORY_LIMIT)
    }

    /// Bus retaining at most `history_limit` events.
    pub fn with_capacity(history_limit: usize) -> Arc<Self> {
        let (tx, _) = broadcast::channel(WATCH_CAPACITY);
        Arc::new(Self {
            inner: Mutex::new(Inner::default()),
            next_id: AtomicU64::new(0),
            history_limit,
            tx,
        })
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // A panicking callback never runs under the lock, so the data is intact.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register `callback` for `topic`. The returned handle removes exactly
    /// this registration.
    pub fn subscribe<F>(self: &Arc<Self>, topic: impl Into<Topic>, callback: F) -> Subscription
    where
        F: Fn(&BusEvent) + Send + Sync + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let topic = topic.into();
        self.lock().listeners.push(Listener {
            id,
            topic,
            callback: Arc::new(callback),
        });
        debug!(listener = id, topic = ?topic, "bus.subscribe");
        Subscription {
            bus: Arc::downgrade(self),
            id,
        }
    }

    /// Record an event and deliver it: listeners for `kind` first, then `All`
    /// listeners, each group in registration order.
    pub fn emit(&self, kind: EventType, payload: Map<String, Value>) -> BusEvent {
        let event = BusEvent {
            id: short_id(),
            timestamp: now_iso(),
            kind,
            payload,
        };

        let (exact, wildcard): (Vec<Callback>, Vec<Callback>) = {
            let mut inner = self.lock();
            inner.history.push_front(event.clone());
            inner.history.truncate(self.history_limit);

            let pick = |topic: Topic| -> Vec<Callback> {
                inner
                    .listeners
                    .iter()
                    .filter(|l| l.topic == topic)
                    .map(|l| Arc::clone(&l.callback))
                    .collect()
            };
            (pick(Topic::Type(kind)), pick(Topic::All))
        };

        debug!(
            event = %event.id,
            kind = %kind,
            listeners = exact.len() + wildcard.len(),
            "bus.emit"
        );
        for callback in exact.iter().chain(wildcard.iter()) {
            callback(&event);
        }

        // No watchers is not an error.
        let _ = self.tx.send(event.clone());
        event
    }

    /// Snapshot of the retained history, newest first.
    pub fn events(&self) -> Vec<BusEvent> {
        self.lock().history.iter().cloned().collect()
    }

    /// Drop the retained history. Subscriptions are kept.
    pub fn clear(&self) {
        self.lock().history.clear();
    }

    pub fn listener_count(&self) -> usize {
        self.lock().listeners.len()
    }

    /// Receiver for every event emitted after this call. Slow receivers lag
    /// rather than block emitters.
    pub fn watch(&self) -> broadcast::Receiver<BusEvent> {
        self.tx.subscribe()
    }

    fn remove(&self, id: u64) -> bool {
        let mut inner = self.lock();
        let before = inner.listeners.len();
        inner.listeners.retain(|l| l.id != id);
        before != inner.listeners.len()
    }
}

/// Handle returned by [`EventBus::subscribe`].
///
/// Dropping the handle keeps the registration alive; call
/// [`unsubscribe`](Subscription::unsubscribe) to remove it.
#[must_use = "keep the subscription to be able to unsubscribe"]
pub struct Subscription {
    bus: Weak<EventBus>,
    id: u64,
}

impl Subscription {
    /// Returns `false` when the registration was already gone.
    pub fn unsubscribe(self) -> bool {
        self.bus.upgrade().is_some_and(|bus| bus.remove(self.id))
    }
}
