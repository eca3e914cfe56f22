//! Queue-backed registrar outbox.
//!
//! Events are encoded on the caller's thread and handed to a bounded channel
//! with `try_send`; one worker thread drains the channel into a
//! `RegistrarTransport`. Enqueue happens after the owning write committed, so
//! a dropped or failed message never affects the committed grade.

use super::{NotificationSink, NotifyError, RegistrarEvent};
use crate::config::RegistrarConfig;
use log::{info, warn};
use std::sync::mpsc::{sync_channel, Receiver, SyncSender, TrySendError};
use std::thread::JoinHandle;
use uuid::Uuid;

/// Encoded message as handed to the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrarMessage {
    /// Unique per enqueue; lets an at-least-once consumer drop duplicates.
    pub message_id: Uuid,
    pub queue: String,
    /// `"<eventKind> <json payload>"`.
    pub body: String,
}

impl RegistrarMessage {
    pub fn encode(queue: &str, event: &RegistrarEvent) -> Result<Self, NotifyError> {
        let payload = serde_json::to_string(&event.payload).map_err(NotifyError::Encode)?;
        Ok(Self {
            message_id: Uuid::new_v4(),
            queue: queue.to_string(),
            body: format!("{} {}", event.kind.as_str(), payload),
        })
    }
}

/// Delivery backend driven by the outbox worker.
pub trait RegistrarTransport: Send + 'static {
    fn deliver(&mut self, message: &RegistrarMessage) -> Result<(), NotifyError>;
}

/// Transport that records deliveries in the log. Used when no broker is
/// configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogTransport;

impl RegistrarTransport for LogTransport {
    fn deliver(&mut self, message: &RegistrarMessage) -> Result<(), NotifyError> {
        info!(
            "event=registrar_deliver module=registrar status=ok queue={} message_id={} bytes={}",
            message.queue,
            message.message_id,
            message.body.len()
        );
        Ok(())
    }
}

/// Bounded, non-blocking registrar outbox with one delivery worker.
pub struct RegistrarOutbox {
    queue: String,
    sender: Option<SyncSender<RegistrarMessage>>,
    worker: Option<JoinHandle<usize>>,
}

impl RegistrarOutbox {
    /// Spawns the delivery worker.
    pub fn start(
        config: &RegistrarConfig,
        transport: impl RegistrarTransport,
    ) -> Result<Self, NotifyError> {
        let (sender, receiver) = sync_channel(config.outbox_capacity);
        let worker = std::thread::Builder::new()
            .name("registrar-outbox".to_string())
            .spawn(move || drain(receiver, transport))
            .map_err(NotifyError::Worker)?;
        info!(
            "event=registrar_outbox_start module=registrar status=ok queue={} capacity={}",
            config.queue, config.outbox_capacity
        );
        Ok(Self {
            queue: config.queue.clone(),
            sender: Some(sender),
            worker: Some(worker),
        })
    }

    pub fn queue(&self) -> &str {
        &self.queue
    }

    /// Closes the queue, waits for queued messages to be delivered, and
    /// returns how many the transport accepted.
    pub fn shutdown(mut self) -> usize {
        self.close()
    }

    fn close(&mut self) -> usize {
        self.sender.take();
        let delivered = match self.worker.take() {
            Some(worker) => worker.join().unwrap_or_else(|_| {
                warn!(
                    "event=registrar_outbox_stop module=registrar status=error queue={} error_code=worker_panicked",
                    self.queue
                );
                0
            }),
            None => return 0,
        };
        info!(
            "event=registrar_outbox_stop module=registrar status=ok queue={} delivered={}",
            self.queue, delivered
        );
        delivered
    }
}

impl NotificationSink for RegistrarOutbox {
    fn notify(&self, event: &RegistrarEvent) -> Result<(), NotifyError> {
        let sender = self.sender.as_ref().ok_or_else(|| NotifyError::Closed {
            queue: self.queue.clone(),
        })?;
        let message = RegistrarMessage::encode(&self.queue, event)?;
        sender.try_send(message).map_err(|err| match err {
            TrySendError::Full(_) => NotifyError::QueueFull {
                queue: self.queue.clone(),
            },
            TrySendError::Disconnected(_) => NotifyError::Closed {
                queue: self.queue.clone(),
            },
        })
    }
}

impl Drop for RegistrarOutbox {
    fn drop(&mut self) {
        self.close();
    }
}

fn drain(receiver: Receiver<RegistrarMessage>, mut transport: impl RegistrarTransport) -> usize {
    let mut delivered = 0;
    for message in receiver {
        match transport.deliver(&message) {
            Ok(()) => delivered += 1,
            Err(err) => warn!(
                "event=registrar_deliver module=registrar status=error queue={} message_id={} error={}",
                message.queue, message.message_id, err
            ),
        }
    }
    delivered
}

#[cfg(test)]
mod tests {
    use super::{RegistrarMessage, RegistrarOutbox, RegistrarTransport};
    use crate::config::RegistrarConfig;
    use crate::model::records::EnrollmentRecord;
    use crate::registrar::{NotificationSink, NotifyError, RegistrarEvent};
    use std::sync::mpsc::{channel, Receiver, Sender};

    fn record(enrollment_id: i64, grade: &str) -> EnrollmentRecord {
        EnrollmentRecord {
            enrollment_id,
            grade: Some(grade.to_string()),
            student_id: 3,
            student_name: "sam".to_string(),
            student_email: "sam@csumb.edu".to_string(),
            course_id: "cst438".to_string(),
            course_title: "Software Engineering".to_string(),
            section_id: 1,
            section_no: 1,
            building: "052".to_string(),
            room: "104".to_string(),
            times: "M W 10:00-11:50".to_string(),
            credits: 4,
            year: 2025,
            semester: "Fall".to_string(),
        }
    }

    struct ChannelTransport(Sender<RegistrarMessage>);

    impl RegistrarTransport for ChannelTransport {
        fn deliver(&mut self, message: &RegistrarMessage) -> Result<(), NotifyError> {
            self.0
                .send(message.clone())
                .map_err(|err| NotifyError::Transport(err.to_string()))
        }
    }

    /// Blocks every delivery until the gate sender is dropped.
    struct GatedTransport(Receiver<()>);

    impl RegistrarTransport for GatedTransport {
        fn deliver(&mut self, _message: &RegistrarMessage) -> Result<(), NotifyError> {
            let _ = self.0.recv();
            Ok(())
        }
    }

    fn config(capacity: usize) -> RegistrarConfig {
        RegistrarConfig {
            queue: "registrar_service".to_string(),
            outbox_capacity: capacity,
        }
    }

    #[test]
    fn message_body_is_event_kind_then_json_payload() {
        let event = RegistrarEvent::update_enrollment(record(5, "A"));
        let message = RegistrarMessage::encode("registrar_service", &event).unwrap();
        let (kind, json) = message.body.split_once(' ').unwrap();
        assert_eq!(kind, "updateEnrollment");
        let payload: EnrollmentRecord = serde_json::from_str(json).unwrap();
        assert_eq!(payload, record(5, "A"));
        assert!(json.contains("\"enrollmentId\":5"));
    }

    #[test]
    fn outbox_delivers_in_order_and_reports_count_on_shutdown() {
        let (tx, rx): (Sender<RegistrarMessage>, Receiver<RegistrarMessage>) = channel();
        let outbox = RegistrarOutbox::start(&config(8), ChannelTransport(tx)).unwrap();
        outbox
            .notify(&RegistrarEvent::update_enrollment(record(1, "A")))
            .unwrap();
        outbox
            .notify(&RegistrarEvent::update_enrollment(record(2, "B")))
            .unwrap();
        assert_eq!(outbox.shutdown(), 2);

        let delivered: Vec<RegistrarMessage> = rx.try_iter().collect();
        assert_eq!(delivered.len(), 2);
        assert!(delivered[0].body.contains("\"enrollmentId\":1"));
        assert!(delivered[1].body.contains("\"enrollmentId\":2"));
        assert_ne!(delivered[0].message_id, delivered[1].message_id);
    }

    #[test]
    fn full_outbox_rejects_without_blocking() {
        let (gate, gate_rx) = channel::<()>();
        let outbox = RegistrarOutbox::start(&config(1), GatedTransport(gate_rx)).unwrap();

        // The worker parks on the first message it takes; the queue slot fills.
        outbox
            .notify(&RegistrarEvent::update_enrollment(record(1, "A")))
            .unwrap();
        let mut saw_full = false;
        for id in 2..10 {
            if let Err(err) = outbox.notify(&RegistrarEvent::update_enrollment(record(id, "B"))) {
                assert!(matches!(err, NotifyError::QueueFull { .. }));
                saw_full = true;
                break;
            }
        }
        assert!(saw_full);

        drop(gate);
        assert!(outbox.shutdown() >= 1);
    }
}
