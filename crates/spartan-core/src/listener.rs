//! Lifecycle events and the sinks that observe them
//!
//! Listeners are side-effect only: they see events, they never see the
//! tree or the driver state. An [`EventSink`] fans each event out to its
//! subscribers and stamps it with an id from a counter owned by that sink.

use parking_lot::Mutex;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::node::NodeId;

/// Unique, increasing identifier of a fired event
pub type EventId = u64;

#[derive(Debug, Clone, PartialEq)]
pub enum Event<'a> {
    RunStarted { units: usize, pass_ceiling: usize },
    PassStarted { pass: usize, live_units: usize },
    EditCommitted { unit: &'a str, tipper: &'a str, target: NodeId, message: &'a str },
    EditSkipped { unit: &'a str, tipper: &'a str, target: NodeId, reason: String },
    UnitExhausted { unit: &'a str, pass: usize, edits: usize },
    PassFinished { pass: usize, edits: usize },
    Cancelled { pass: usize },
    RunFinished { passes: usize, edits: usize },
}

impl fmt::Display for Event<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::RunStarted { units, pass_ceiling } => {
                write!(f, "run started: {} unit(s), at most {} pass(es)", units, pass_ceiling)
            }
            Event::PassStarted { pass, live_units } => {
                write!(f, "pass {} started: {} live unit(s)", pass, live_units)
            }
            Event::EditCommitted {
                unit,
                tipper,
                target,
                message,
            } => write!(f, "{}: {} at {}: {}", unit, tipper, target, message),
            Event::EditSkipped {
                unit,
                tipper,
                target,
                reason,
            } => write!(f, "{}: skipped {} at {}: {}", unit, tipper, target, reason),
            Event::UnitExhausted { unit, pass, edits } => {
                write!(f, "{}: fixed point in pass {} after {} edit(s)", unit, pass, edits)
            }
            Event::PassFinished { pass, edits } => write!(f, "pass {} finished: {} edit(s)", pass, edits),
            Event::Cancelled { pass } => write!(f, "cancelled during pass {}", pass),
            Event::RunFinished { passes, edits } => {
                write!(f, "run finished: {} pass(es), {} edit(s)", passes, edits)
            }
        }
    }
}

/// An observer of lifecycle events
pub trait Listener: Send + Sync {
    fn notify(&self, id: EventId, event: &Event<'_>);
}

/// Composite sink: subscribers plus the event-id counter
#[derive(Default)]
pub struct EventSink {
    listeners: Vec<Arc<dyn Listener>>,
    last_id: AtomicU64,
}

impl EventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink with one subscriber
    pub fn with(listener: Arc<dyn Listener>) -> Self {
        let mut sink = Self::new();
        sink.subscribe(listener);
        sink
    }

    pub fn subscribe(&mut self, listener: Arc<dyn Listener>) {
        self.listeners.push(listener);
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Stamp `event` with the next id and hand it to every subscriber
    pub fn fire(&self, event: Event<'_>) -> EventId {
        let id = self.last_id.fetch_add(1, Ordering::Relaxed) + 1;
        for listener in &self.listeners {
            listener.notify(id, &event);
        }
        id
    }
}

impl fmt::Debug for EventSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventSink")
            .field("listeners", &self.listeners.len())
            .field("last_id", &self.last_id.load(Ordering::Relaxed))
            .finish()
    }
}

/// Forwards events to `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingListener;

impl Listener for TracingListener {
    fn notify(&self, id: EventId, event: &Event<'_>) {
        match event {
            Event::EditCommitted { .. } | Event::EditSkipped { .. } => {
                tracing::debug!(event_id = id, "{}", event);
            }
            _ => tracing::info!(event_id = id, "{}", event),
        }
    }
}

/// Keeps one `id: description` line per event
#[derive(Debug, Default)]
pub struct RecordingListener {
    lines: Mutex<Vec<String>>,
}

impl RecordingListener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }

    pub fn transcript(&self) -> String {
        self.lines.lock().join("\n")
    }
}

impl Listener for RecordingListener {
    fn notify(&self, id: EventId, event: &Event<'_>) {
        self.lines.lock().push(format!("{}: {}", id, event));
    }
}
