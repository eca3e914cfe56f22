//! Registrar notification capability.
//!
//! # Responsibility
//! - Define the `NotificationSink` seam the enrollment sync publishes
//!   grade-change events through.
//! - Provide no-op and recording sinks, and the queue-backed outbox used in
//!   production wiring.
//!
//! # Invariants
//! - `notify` never blocks on delivery.
//! - A sink failure is reported to the caller, which logs and drops it; it
//!   never rolls back the committed update.

mod outbox;

pub use outbox::{LogTransport, RegistrarMessage, RegistrarOutbox, RegistrarTransport};

use crate::model::records::EnrollmentRecord;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::{Arc, Mutex};

/// Kind of outbound registrar event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A final letter grade on an enrollment changed.
    UpdateEnrollment,
}

impl EventKind {
    /// Wire spelling used as the message prefix.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::UpdateEnrollment => "updateEnrollment",
        }
    }
}

impl Display for EventKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One grade-change event for the registrar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrarEvent {
    pub kind: EventKind,
    pub payload: EnrollmentRecord,
}

impl RegistrarEvent {
    pub fn update_enrollment(payload: EnrollmentRecord) -> Self {
        Self {
            kind: EventKind::UpdateEnrollment,
            payload,
        }
    }
}

#[derive(Debug)]
pub enum NotifyError {
    /// Payload could not be serialized.
    Encode(serde_json::Error),
    /// Outbox queue is at capacity; the event was dropped.
    QueueFull { queue: String },
    /// Outbox worker is gone.
    Closed { queue: String },
    /// Transport refused the message.
    Transport(String),
    /// Outbox worker thread could not be started.
    Worker(std::io::Error),
}

impl Display for NotifyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Encode(err) => write!(f, "failed to encode registrar payload: {err}"),
            Self::QueueFull { queue } => write!(f, "registrar outbox `{queue}` is full"),
            Self::Closed { queue } => write!(f, "registrar outbox `{queue}` is closed"),
            Self::Transport(message) => write!(f, "registrar transport error: {message}"),
            Self::Worker(err) => write!(f, "failed to start registrar outbox worker: {err}"),
        }
    }
}

impl Error for NotifyError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Encode(err) => Some(err),
            Self::Worker(err) => Some(err),
            _ => None,
        }
    }
}

/// Outbound sink for registrar events.
pub trait NotificationSink {
    fn notify(&self, event: &RegistrarEvent) -> Result<(), NotifyError>;
}

impl<T: NotificationSink + ?Sized> NotificationSink for Arc<T> {
    fn notify(&self, event: &RegistrarEvent) -> Result<(), NotifyError> {
        (**self).notify(event)
    }
}

impl<T: NotificationSink + ?Sized> NotificationSink for &T {
    fn notify(&self, event: &RegistrarEvent) -> Result<(), NotifyError> {
        (**self).notify(event)
    }
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl NotificationSink for NoopSink {
    fn notify(&self, _event: &RegistrarEvent) -> Result<(), NotifyError> {
        Ok(())
    }
}

/// Keeps every event in memory. Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<RegistrarEvent>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of recorded events in emission order.
    pub fn events(&self) -> Vec<RegistrarEvent> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn len(&self) -> usize {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl NotificationSink for RecordingSink {
    fn notify(&self, event: &RegistrarEvent) -> Result<(), NotifyError> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(event.clone());
        Ok(())
    }
}
