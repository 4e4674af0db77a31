//! Outgoing mail transport
//!
//! - [`smtp`]: SMTP relay transport built on lettre
//! - [`mock`]: in-memory transport for tests

pub mod mock;
pub mod smtp;

pub use mock::{MockTransport, SendGate};
pub use smtp::SmtpTransport;

use crate::dispatch::Outcome;
use crate::error::Result;
use crate::message::Message;
use crate::template::Body;
use async_trait::async_trait;

/// Parameters of one outgoing email
///
/// Recipient lists are comma-joined. `cc` and `bcc` are `None` when the
/// message had no such field, which is not the same as an empty list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub from: String,
    pub to: String,
    pub cc: Option<String>,
    pub bcc: Option<String>,
    pub subject: String,
    pub body: Body,
}

impl OutgoingMail {
    /// Build the transport parameters for `message` with its resolved body
    pub fn new(from: impl Into<String>, message: &Message, body: Body) -> Self {
        Self {
            from: from.into(),
            to: message.to().joined(),
            cc: message.cc().map(|cc| cc.joined()),
            bcc: message.bcc().map(|bcc| bcc.joined()),
            subject: message.subject().to_string(),
            body,
        }
    }
}

/// Per-recipient result reported by a transport
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SendReport {
    pub accepted: Vec<String>,
    pub rejected: Vec<String>,
}

impl SendReport {
    pub fn accepted(addresses: Vec<String>) -> Self {
        Self {
            accepted: addresses,
            rejected: Vec::new(),
        }
    }

    pub fn rejected(addresses: Vec<String>) -> Self {
        Self {
            accepted: Vec::new(),
            rejected: addresses,
        }
    }

    /// Classify the report: any accepted recipient wins over rejections,
    /// and a report with neither is still pending.
    pub fn outcome(&self) -> Outcome {
        if !self.accepted.is_empty() {
            Outcome::Accepted
        } else if !self.rejected.is_empty() {
            Outcome::Rejected
        } else {
            Outcome::Pending
        }
    }
}

/// Delivers outgoing mail
#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Send one email
    ///
    /// Fails with [`crate::CourierError::Transport`] on connection,
    /// authentication or protocol failure.
    async fn send(&self, mail: &OutgoingMail) -> Result<SendReport>;
}
