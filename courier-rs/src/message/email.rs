//! The email message entity

use crate::error::{CourierError, Result};
use crate::message::Recipients;
use regex::Regex;
use serde_json::Value;
use std::fmt;
use std::sync::OnceLock;
use uuid::Uuid;

/// Raw template reference as supplied by a producer
///
/// Either field may be empty. [`Message::new`] decides which one is used.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateRef {
    pub content: Option<String>,
    pub url: Option<String>,
}

impl TemplateRef {
    pub fn inline(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            url: None,
        }
    }

    pub fn remote(url: impl Into<String>) -> Self {
        Self {
            content: None,
            url: Some(url.into()),
        }
    }

    /// Classify a single template string
    ///
    /// Strings that look like an `http(s)://` URL without spaces or quotes are
    /// remote references, everything else is inline content.
    pub fn parse(raw: &str) -> Self {
        static URL_PATTERN: OnceLock<Regex> = OnceLock::new();
        let pattern = URL_PATTERN
            .get_or_init(|| Regex::new(r#"^(http|https)://[^ "]+$"#).expect("valid URL pattern"));

        if pattern.is_match(raw) {
            Self::remote(raw)
        } else {
            Self::inline(raw)
        }
    }
}

/// Where the message body comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    /// Body text supplied with the request
    Inline(String),
    /// Body text fetched from this URL at dispatch time
    Remote(String),
}

impl fmt::Display for TemplateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateSource::Inline(content) => write!(f, "inline({})", content),
            TemplateSource::Remote(url) => write!(f, "{}", url),
        }
    }
}

/// One email to send
///
/// Immutable once built: fields are private and only exposed through
/// accessors.
#[derive(Debug, Clone)]
pub struct Message {
    id: Uuid,
    subject: String,
    to: Recipients,
    cc: Option<Recipients>,
    bcc: Option<Recipients>,
    payload: Value,
    template: TemplateSource,
}

impl Message {
    /// Build a message
    ///
    /// # Errors
    /// Returns [`CourierError::MissingTemplate`] when `template` carries
    /// neither inline content nor a URL. Empty strings count as missing.
    /// When both are present the inline content wins.
    pub fn new(
        subject: impl Into<String>,
        to: impl Into<Recipients>,
        cc: Option<Recipients>,
        bcc: Option<Recipients>,
        payload: Value,
        template: TemplateRef,
    ) -> Result<Self> {
        let content = template.content.filter(|c| !c.is_empty());
        let url = template.url.filter(|u| !u.is_empty());

        let template = match (content, url) {
            (Some(content), _) => TemplateSource::Inline(content),
            (None, Some(url)) => TemplateSource::Remote(url),
            (None, None) => return Err(CourierError::MissingTemplate),
        };

        Ok(Self {
            id: Uuid::new_v4(),
            subject: subject.into(),
            to: to.into(),
            cc,
            bcc,
            payload,
            template,
        })
    }

    /// Identifier used to correlate log lines
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn to(&self) -> &Recipients {
        &self.to
    }

    pub fn cc(&self) -> Option<&Recipients> {
        self.cc.as_ref()
    }

    pub fn bcc(&self) -> Option<&Recipients> {
        self.bcc.as_ref()
    }

    pub fn payload(&self) -> &Value {
        &self.payload
    }

    pub fn template(&self) -> &TemplateSource {
        &self.template
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn optional(recipients: Option<&Recipients>) -> String {
            recipients.map_or_else(|| "null".to_string(), Recipients::joined)
        }

        write!(
            f,
            "Email{{subject: {}, to: {}, cc: {}, bcc: {}, payload: {}, template: {}}}",
            self.subject,
            self.to,
            optional(self.cc()),
            optional(self.bcc()),
            self.payload,
            self.template,
        )
    }
}
