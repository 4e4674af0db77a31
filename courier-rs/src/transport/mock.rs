//! Mock transport for testing
//!
//! Records every attempted send and answers with scripted replies. By
//! default each send is accepted for all `to` recipients. A gated mock
//! pauses inside `send` until the test releases it, which makes the
//! dispatcher's mid-drain state observable.

use crate::error::{CourierError, Result};
use crate::transport::{MailTransport, OutgoingMail, SendReport};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::{mpsc, Semaphore};
use tracing::debug;

/// In-memory transport
#[derive(Default)]
pub struct MockTransport {
    attempts: Mutex<Vec<OutgoingMail>>,
    replies: Mutex<VecDeque<Result<SendReport>>>,
    gate: Option<Gate>,
}

struct Gate {
    entered: mpsc::UnboundedSender<String>,
    permits: Arc<Semaphore>,
}

/// Test-side handle of a gated [`MockTransport`]
pub struct SendGate {
    entered: mpsc::UnboundedReceiver<String>,
    permits: Arc<Semaphore>,
}

impl SendGate {
    /// Wait until a send is in flight and return its subject
    pub async fn entered(&mut self) -> Option<String> {
        self.entered.recv().await
    }

    /// Let `count` paused sends complete
    pub fn release(&self, count: usize) {
        self.permits.add_permits(count);
    }
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// A transport whose sends wait for [`SendGate::release`]
    pub fn gated() -> (Self, SendGate) {
        let (entered_tx, entered_rx) = mpsc::unbounded_channel();
        let permits = Arc::new(Semaphore::new(0));

        let transport = Self {
            gate: Some(Gate {
                entered: entered_tx,
                permits: Arc::clone(&permits),
            }),
            ..Self::default()
        };

        (
            transport,
            SendGate {
                entered: entered_rx,
                permits,
            },
        )
    }

    /// Queue the reply for the next send; unscripted sends are accepted
    pub fn push_reply(&self, reply: Result<SendReport>) {
        lock(&self.replies).push_back(reply);
    }

    /// Every send attempted so far, failed ones included
    pub fn attempts(&self) -> Vec<OutgoingMail> {
        lock(&self.attempts).clone()
    }

    pub fn attempted_subjects(&self) -> Vec<String> {
        lock(&self.attempts)
            .iter()
            .map(|mail| mail.subject.clone())
            .collect()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl MailTransport for MockTransport {
    async fn send(&self, mail: &OutgoingMail) -> Result<SendReport> {
        debug!("MockTransport: sending '{}' to {}", mail.subject, mail.to);

        if let Some(gate) = &self.gate {
            // A closed receiver only means the test stopped watching.
            let _ = gate.entered.send(mail.subject.clone());
            gate.permits
                .acquire()
                .await
                .map_err(|e| CourierError::Transport(e.to_string()))?
                .forget();
        }

        lock(&self.attempts).push(mail.clone());

        let scripted = lock(&self.replies).pop_front();
        scripted.unwrap_or_else(|| {
            Ok(SendReport::accepted(
                mail.to.split(',').map(str::to_string).collect(),
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::Body;

    fn mail(subject: &str) -> OutgoingMail {
        OutgoingMail {
            from: "noreply@example.com".to_string(),
            to: "a@example.com,b@example.com".to_string(),
            cc: None,
            bcc: None,
            subject: subject.to_string(),
            body: Body::Text("Hi".to_string()),
        }
    }

    #[tokio::test]
    async fn test_accepts_by_default() {
        let transport = MockTransport::new();
        let report = transport.send(&mail("one")).await.unwrap();

        assert_eq!(report.accepted, ["a@example.com", "b@example.com"]);
        assert_eq!(transport.attempted_subjects(), ["one"]);
    }

    #[tokio::test]
    async fn test_scripted_replies_in_order() {
        let transport = MockTransport::new();
        transport.push_reply(Err(CourierError::Transport("auth failed".to_string())));
        transport.push_reply(Ok(SendReport::default()));

        assert!(transport.send(&mail("one")).await.is_err());
        assert_eq!(transport.send(&mail("two")).await.unwrap(), SendReport::default());
        assert!(!transport.send(&mail("three")).await.unwrap().accepted.is_empty());
        assert_eq!(transport.attempts().len(), 3);
    }

    #[tokio::test]
    async fn test_gated_send_waits_for_release() {
        let (transport, mut gate) = MockTransport::gated();
        let transport = Arc::new(transport);

        let sender = Arc::clone(&transport);
        let handle = tokio::spawn(async move { sender.send(&mail("held")).await });

        assert_eq!(gate.entered().await.as_deref(), Some("held"));
        assert!(transport.attempts().is_empty());

        gate.release(1);
        handle.await.unwrap().unwrap();
        assert_eq!(transport.attempted_subjects(), ["held"]);
    }
}
