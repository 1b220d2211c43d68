//! Instance-scoped event bus.
//!
//! Every driver owns one `EventBus`. The driver declares its event kinds at
//! construction and publishes payloads from its polling loop; consumers
//! subscribe per kind (or to everything) and receive payloads in publish
//! order on their own channel or listener thread.
//!
//! Publishing never blocks and never fails: with no listeners the payload is
//! simply dropped, and listeners whose receiving side went away are pruned.
//! Dropping the bus closes every channel, which ends the listener threads.

use crate::hal::driver::AdaptorError;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use thiserror::Error;
use tracing::trace;

/// Payload carried by an event.
#[derive(Debug, Clone, PartialEq)]
pub enum EventData {
    /// No payload.
    Empty,
    /// Raw reading.
    Value(i32),
    /// Scaled reading in engineering units.
    Scaled(f64),
    /// Adaptor failure observed by a polling loop.
    Error(AdaptorError),
}

impl EventData {
    /// Raw reading, if this payload carries one.
    pub fn as_value(&self) -> Option<i32> {
        match self {
            EventData::Value(v) => Some(*v),
            _ => None,
        }
    }

    /// Scaled reading, if this payload carries one.
    pub fn as_scaled(&self) -> Option<f64> {
        match self {
            EventData::Scaled(v) => Some(*v),
            _ => None,
        }
    }

    /// Adaptor error, if this payload carries one.
    pub fn as_error(&self) -> Option<&AdaptorError> {
        match self {
            EventData::Error(e) => Some(e),
            _ => None,
        }
    }
}

/// A named event as seen by bus-wide subscribers.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    /// Event kind
    pub name: String,
    /// Payload
    pub data: EventData,
}

/// Errors raised when subscribing.
#[derive(Debug, Error)]
pub enum EventError {
    /// The event kind was never declared on this bus.
    #[error("Unknown event '{0}'")]
    UnknownEvent(String),

    /// The listener thread could not be spawned.
    #[error("Failed to spawn listener thread: {0}")]
    Spawn(String),
}

#[derive(Default)]
struct Listeners {
    /// Declaration order of event kinds
    names: Vec<String>,
    /// Per-kind listener channels
    by_name: HashMap<String, Vec<Sender<EventData>>>,
    /// Bus-wide listener channels
    all: Vec<Sender<Event>>,
}

/// Named-event registry and listener list of one driver.
#[derive(Default)]
pub struct EventBus {
    inner: Mutex<Listeners>,
}

impl EventBus {
    /// Create an empty bus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare an event kind. Declaring the same kind twice is harmless.
    pub fn add_event(&self, name: &str) {
        let mut inner = self.inner.lock();
        if !inner.by_name.contains_key(name) {
            inner.names.push(name.to_string());
            inner.by_name.insert(name.to_string(), Vec::new());
        }
    }

    /// Declared event kinds, in declaration order.
    pub fn event_names(&self) -> Vec<String> {
        self.inner.lock().names.clone()
    }

    /// Whether `name` was declared.
    pub fn has_event(&self, name: &str) -> bool {
        self.inner.lock().by_name.contains_key(name)
    }

    /// Publish `data` to every listener of `name` and every bus-wide listener.
    pub fn publish(&self, name: &str, data: EventData) {
        let mut inner = self.inner.lock();
        if let Some(listeners) = inner.by_name.get_mut(name) {
            listeners.retain(|tx| tx.send(data.clone()).is_ok());
        }
        inner.all.retain(|tx| {
            tx.send(Event {
                name: name.to_string(),
                data: data.clone(),
            })
            .is_ok()
        });
        trace!("published '{}'", name);
    }

    /// Receive every event published on this bus.
    pub fn subscribe(&self) -> Receiver<Event> {
        let (tx, rx) = mpsc::channel();
        self.inner.lock().all.push(tx);
        rx
    }

    /// Receive the payloads published to `name`.
    pub fn subscribe_to(&self, name: &str) -> Result<Receiver<EventData>, EventError> {
        let mut inner = self.inner.lock();
        let listeners = inner
            .by_name
            .get_mut(name)
            .ok_or_else(|| EventError::UnknownEvent(name.to_string()))?;
        let (tx, rx) = mpsc::channel();
        listeners.push(tx);
        Ok(rx)
    }

    /// Run `handler` on a listener thread for every payload published to `name`.
    pub fn on<F>(&self, name: &str, mut handler: F) -> Result<(), EventError>
    where
        F: FnMut(EventData) + Send + 'static,
    {
        let rx = self.subscribe_to(name)?;
        spawn_listener(name, move || {
            for data in rx {
                handler(data);
            }
        })
    }

    /// Run `handler` on a listener thread for the first payload published to `name`.
    pub fn once<F>(&self, name: &str, handler: F) -> Result<(), EventError>
    where
        F: FnOnce(EventData) + Send + 'static,
    {
        let rx = self.subscribe_to(name)?;
        spawn_listener(name, move || {
            if let Ok(data) = rx.recv() {
                handler(data);
            }
        })
    }
}

fn spawn_listener<F>(name: &str, body: F) -> Result<(), EventError>
where
    F: FnOnce() + Send + 'static,
{
    thread::Builder::new()
        .name(format!("grove-event-{name}"))
        .spawn(body)
        .map(|_| ())
        .map_err(|e| EventError::Spawn(e.to_string()))
}
