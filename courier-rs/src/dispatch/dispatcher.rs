//! Queue dispatcher
//!
//! Drains the message queue through the mail transport, one message at a
//! time and in enqueue order.
//!
//! # Architecture
//! ```text
//! ┌─────────┐                 ┌──────────┐
//! │ Enqueue │ → [Queue] ←pop─ │  drain   │ → resolve → send → record outcome
//! └─────────┘       ↑         └──────────┘                 ↓
//!     trigger ──────┴── schedule tick            X failed: log, keep going
//! ```
//!
//! Any number of triggers may arrive while a drain runs; they collapse into
//! no-ops and the running loop picks up whatever was pushed meanwhile.

use crate::dispatch::{DispatchState, DrainSchedule, LastStatus, Outcome, QueueStatus};
use crate::error::Result;
use crate::message::{Message, Recipients, TemplateRef};
use crate::queue::MessageQueue;
use crate::template::TemplateResolver;
use crate::transport::{MailTransport, OutgoingMail};
use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Single-consumer dispatcher owning the queue and its state
pub struct Dispatcher {
    queue: MessageQueue,
    state: DispatchState,
    resolver: TemplateResolver,
    transport: Arc<dyn MailTransport>,
    sender: String,
}

/// Releases the drain claim even if a send panics
struct DrainClaim<'a>(&'a DispatchState);

impl Drop for DrainClaim<'_> {
    fn drop(&mut self) {
        self.0.finish();
    }
}

impl Dispatcher {
    /// Create a dispatcher sending as `sender`
    pub fn new(
        sender: impl Into<String>,
        resolver: TemplateResolver,
        transport: Arc<dyn MailTransport>,
    ) -> Self {
        Self {
            queue: MessageQueue::new(),
            state: DispatchState::new(),
            resolver,
            transport,
            sender: sender.into(),
        }
    }

    pub fn queue(&self) -> &MessageQueue {
        &self.queue
    }

    pub fn state(&self) -> &DispatchState {
        &self.state
    }

    /// Append a message and trigger a drain without waiting for it
    pub fn enqueue(self: &Arc<Self>, message: Message) {
        info!(
            "Enqueuing email {}: '{}' -> {}",
            message.id(),
            message.subject(),
            message.to()
        );
        self.queue.push(message);
        self.trigger();
    }

    /// Build a message from request fields and enqueue it
    ///
    /// # Errors
    /// [`crate::CourierError::MissingTemplate`] when `template` yields
    /// neither content nor URL; nothing is enqueued in that case.
    pub fn submit(
        self: &Arc<Self>,
        subject: impl Into<String>,
        to: impl Into<Recipients>,
        cc: Option<Recipients>,
        bcc: Option<Recipients>,
        payload: Value,
        template: TemplateRef,
    ) -> Result<Uuid> {
        let message = Message::new(subject, to, cc, bcc, payload, template)?;
        let id = message.id();
        self.enqueue(message);
        Ok(id)
    }

    /// Request a drain on a background task
    pub fn trigger(self: &Arc<Self>) {
        let dispatcher = Arc::clone(self);
        tokio::spawn(async move {
            dispatcher.drain().await;
        });
    }

    /// Trigger a drain on every firing of `schedule`
    pub fn start_periodic(self: &Arc<Self>, schedule: DrainSchedule) -> JoinHandle<()> {
        info!("Starting periodic drain: '{}'", schedule.expression());

        let dispatcher = Arc::clone(self);
        tokio::spawn(async move {
            while let Some(delay) = schedule.delay_until_next(Utc::now()) {
                sleep(delay).await;
                debug!("Periodic drain tick");
                dispatcher.trigger();
            }
            warn!(
                "Schedule '{}' has no upcoming firing, periodic drain stopped",
                schedule.expression()
            );
        })
    }

    /// Send everything currently queued
    ///
    /// Returns immediately if another drain is running. Otherwise pops and
    /// dispatches messages until the queue is observed empty, and returns
    /// how many were processed.
    pub async fn drain(&self) -> usize {
        let mut processed = 0;

        loop {
            if !self.state.try_begin() {
                debug!("Drain already in progress");
                break;
            }

            {
                let _claim = DrainClaim(&self.state);
                while let Some(message) = self.queue.pop() {
                    self.dispatch_one(message).await;
                    processed += 1;
                }
            }

            // A push can land between the last empty pop and the release.
            if self.queue.is_empty() {
                break;
            }
        }

        if processed > 0 {
            info!("Processed {} emails from queue", processed);
        }

        processed
    }

    /// Resolve, send and record one message. Failures are logged and
    /// leave the last outcome untouched.
    async fn dispatch_one(&self, message: Message) {
        debug!("Processing email {}", message.id());

        match self.send(&message).await {
            Ok(outcome) => {
                self.state.record(outcome);
                info!("Email {} sent: {}", message.id(), outcome);
            }
            Err(e) => {
                warn!("Failed to send email | {} | {}", message, e);
            }
        }
    }

    async fn send(&self, message: &Message) -> Result<Outcome> {
        let body = self.resolver.resolve(message).await?;
        let mail = OutgoingMail::new(self.sender.as_str(), message, body);
        let report = self.transport.send(&mail).await?;
        Ok(report.outcome())
    }

    /// Current queue depth and drain flag
    pub fn queue_status(&self) -> QueueStatus {
        QueueStatus {
            length: self.queue.len(),
            in_progress: self.state.in_progress(),
        }
    }

    /// Outcome of the last completed send
    pub fn last_status(&self) -> LastStatus {
        LastStatus {
            status: self.state.last_outcome(),
        }
    }
}
