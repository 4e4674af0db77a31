//! SMTP relay transport
//!
//! Sends through a configured relay with lettre's async SMTP client.
//!
//! # Reporting
//! SMTP answers the whole transaction with a single reply, so per-recipient
//! results are approximated: a positive reply marks every envelope
//! recipient accepted, a negative one marks them rejected. Hard failures
//! (connection, authentication, refused recipients) surface as
//! [`CourierError::Transport`].

use crate::config::{SmtpConfig, TlsMode};
use crate::error::{CourierError, Result};
use crate::template::Body;
use crate::transport::{MailTransport, OutgoingMail, SendReport};
use async_trait::async_trait;
use lettre::message::{Mailbox, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::time::Duration;
use tracing::{debug, info};

/// Transport sending through an SMTP relay
#[derive(Clone)]
pub struct SmtpTransport {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    host: String,
}

impl SmtpTransport {
    /// Create a transport from configuration
    ///
    /// # Errors
    /// Fails when the host is empty, the sender address does not parse, or
    /// the TLS relay cannot be set up.
    pub fn from_config(config: &SmtpConfig) -> Result<Self> {
        if config.host.trim().is_empty() {
            return Err(CourierError::Transport("SMTP host is not configured".to_string()));
        }

        config
            .from
            .parse::<Mailbox>()
            .map_err(|_| CourierError::InvalidAddress(config.from.clone()))?;

        let mut builder = match config.tls {
            TlsMode::None => AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host),
            TlsMode::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)?,
            TlsMode::Starttls => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?,
        };

        builder = builder
            .port(config.port)
            .timeout(Some(Duration::from_secs(config.timeout_secs)));

        if let Some((username, password)) = config.credentials() {
            builder = builder.credentials(Credentials::new(username, password));
        }

        info!(
            "SMTP transport configured for {}:{} ({:?})",
            config.host, config.port, config.tls
        );

        Ok(Self {
            transport: builder.build(),
            host: config.host.clone(),
        })
    }

    /// Build the lettre message for an outgoing mail
    fn build_message(mail: &OutgoingMail) -> Result<Message> {
        let from: Mailbox = mail
            .from
            .parse()
            .map_err(|_| CourierError::InvalidAddress(mail.from.clone()))?;

        let mut builder = Message::builder().from(from).subject(mail.subject.clone());

        for mailbox in parse_mailboxes(&mail.to)? {
            builder = builder.to(mailbox);
        }

        if let Some(cc) = &mail.cc {
            for mailbox in parse_mailboxes(cc)? {
                builder = builder.cc(mailbox);
            }
        }

        if let Some(bcc) = &mail.bcc {
            for mailbox in parse_mailboxes(bcc)? {
                builder = builder.bcc(mailbox);
            }
        }

        let message = match &mail.body {
            Body::Html(html) => builder.singlepart(SinglePart::html(html.clone())),
            Body::Text(text) => builder.body(text.clone()),
        };

        message.map_err(|e| CourierError::Transport(e.to_string()))
    }
}

/// Parse a comma-joined address list, skipping blank entries
fn parse_mailboxes(list: &str) -> Result<Vec<Mailbox>> {
    list.split(',')
        .map(str::trim)
        .filter(|address| !address.is_empty())
        .map(|address| {
            address
                .parse::<Mailbox>()
                .map_err(|_| CourierError::InvalidAddress(address.to_string()))
        })
        .collect()
}

#[async_trait]
impl MailTransport for SmtpTransport {
    async fn send(&self, mail: &OutgoingMail) -> Result<SendReport> {
        let message = Self::build_message(mail)?;
        let recipients: Vec<String> = message
            .envelope()
            .to()
            .iter()
            .map(ToString::to_string)
            .collect();

        debug!("Relaying '{}' to {} via {}", mail.subject, mail.to, self.host);

        let response = self.transport.send(message).await?;
        debug!("Relay answered {}", response.code());

        if response.is_positive() {
            Ok(SendReport::accepted(recipients))
        } else {
            Ok(SendReport::rejected(recipients))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SmtpConfig {
        SmtpConfig {
            host: "localhost".to_string(),
            port: 2525,
            username: None,
            password: None,
            from: "noreply@example.com".to_string(),
            tls: TlsMode::None,
            timeout_secs: 5,
            interval: "*/10 * * * * *".to_string(),
        }
    }

    fn mail(body: Body) -> OutgoingMail {
        OutgoingMail {
            from: "noreply@example.com".to_string(),
            to: "a@example.com,b@example.com".to_string(),
            cc: Some("c@example.com".to_string()),
            bcc: None,
            subject: "Hello".to_string(),
            body,
        }
    }

    #[tokio::test]
    async fn test_transport_creation() {
        assert!(SmtpTransport::from_config(&config()).is_ok());
    }

    #[tokio::test]
    async fn test_empty_host_is_rejected() {
        let mut config = config();
        config.host = " ".to_string();
        assert!(matches!(
            SmtpTransport::from_config(&config),
            Err(CourierError::Transport(_))
        ));
    }

    #[tokio::test]
    async fn test_invalid_sender_is_rejected() {
        let mut config = config();
        config.from = "not an address".to_string();
        assert!(matches!(
            SmtpTransport::from_config(&config),
            Err(CourierError::InvalidAddress(_))
        ));
    }

    #[test]
    fn test_build_message_envelope() {
        let message = SmtpTransport::build_message(&mail(Body::Text("Hi".into()))).unwrap();
        let recipients: Vec<String> = message
            .envelope()
            .to()
            .iter()
            .map(ToString::to_string)
            .collect();

        assert_eq!(recipients, ["a@example.com", "b@example.com", "c@example.com"]);
    }

    #[test]
    fn test_build_html_message() {
        let message =
            SmtpTransport::build_message(&mail(Body::Html("<p>Hi</p>".into()))).unwrap();
        let formatted = String::from_utf8(message.formatted()).unwrap();

        assert!(formatted.contains("Content-Type: text/html"));
        assert!(formatted.contains("Subject: Hello"));
    }

    #[test]
    fn test_invalid_recipient() {
        let mut outgoing = mail(Body::Text("Hi".into()));
        outgoing.to = "a@example.com,not an address".to_string();

        assert!(matches!(
            SmtpTransport::build_message(&outgoing),
            Err(CourierError::InvalidAddress(address)) if address == "not an address"
        ));
    }

    #[test]
    fn test_parse_mailboxes_skips_blanks() {
        assert!(parse_mailboxes("").unwrap().is_empty());
        assert_eq!(parse_mailboxes("a@example.com, ,b@example.com").unwrap().len(), 2);
    }
}
