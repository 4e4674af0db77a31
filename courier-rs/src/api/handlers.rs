//! API request handlers

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::warn;

use crate::dispatch::{Dispatcher, LastStatus, QueueStatus};
use crate::error::CourierError;
use crate::message::{Recipients, TemplateRef};

/// Shared application state
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
}

/// Send request body
///
/// `to`, `cc` and `bcc` take a single address or a list. `template` is
/// either an `http(s)://` URL or the template content itself.
#[derive(Debug, Deserialize)]
pub struct SendEmailRequest {
    pub subject: Option<String>,
    pub to: Option<Recipients>,
    pub cc: Option<Recipients>,
    pub bcc: Option<Recipients>,
    pub payload: Option<Value>,
    pub template: Option<String>,
}

/// Status response body
#[derive(Debug, Serialize)]
pub struct ApiStatus {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ApiStatus {
    pub fn new(status: &str) -> Self {
        Self {
            status: status.to_string(),
            message: None,
        }
    }

    pub fn error(message: &str) -> Self {
        Self {
            status: "error".to_string(),
            message: Some(message.to_string()),
        }
    }
}

/// The fields a request must carry before it can be queued
struct ValidRequest {
    subject: String,
    to: Recipients,
    cc: Option<Recipients>,
    bcc: Option<Recipients>,
    payload: Value,
    template: String,
}

impl SendEmailRequest {
    fn validate(self) -> Option<ValidRequest> {
        let subject = self.subject.filter(|s| !s.is_empty())?;
        let to = self
            .to
            .filter(|to| to.iter().any(|address| !address.trim().is_empty()))?;
        let payload = self.payload.filter(is_present)?;
        let template = self.template.filter(|t| !t.is_empty())?;

        Some(ValidRequest {
            subject,
            to,
            cc: self.cc,
            bcc: self.bcc,
            payload,
            template,
        })
    }
}

/// `null`, `false`, zero and `""` count as a missing payload
fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// POST /email/send - Queue an email for sending
pub async fn send_email(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SendEmailRequest>,
) -> impl IntoResponse {
    let Some(valid) = req.validate() else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiStatus::error("Missing required fields")),
        );
    };

    let template = TemplateRef::parse(&valid.template);

    match state
        .dispatcher
        .submit(
            valid.subject,
            valid.to,
            valid.cc,
            valid.bcc,
            valid.payload,
            template,
        )
    {
        Ok(_) => (StatusCode::ACCEPTED, Json(ApiStatus::new("Accepted"))),
        Err(CourierError::MissingTemplate) => (
            StatusCode::BAD_REQUEST,
            Json(ApiStatus::error("Missing template")),
        ),
        Err(e) => {
            warn!("Failed to queue email: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiStatus::error(&e.to_string())),
            )
        }
    }
}

/// GET /email/queue/status - Queue length and drain flag
pub async fn queue_status(State(state): State<Arc<AppState>>) -> Json<QueueStatus> {
    Json(state.dispatcher.queue_status())
}

/// GET /email/last/status - Outcome of the last completed send
pub async fn last_status(State(state): State<Arc<AppState>>) -> Json<LastStatus> {
    Json(state.dispatcher.last_status())
}

/// GET /ping - Liveness check
pub async fn ping() -> Json<ApiStatus> {
    Json(ApiStatus::new("ok"))
}
