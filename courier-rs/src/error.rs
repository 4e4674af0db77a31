use thiserror::Error;

#[derive(Error, Debug)]
pub enum CourierError {
    #[error("Missing template: neither inline content nor a template URL was supplied")]
    MissingTemplate,

    #[error("Template fetch failed: {0}")]
    Fetch(String),

    #[error("Template render failed: {0}")]
    Render(String),

    #[error("Mail transport error: {0}")]
    Transport(String),

    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    #[error("Invalid schedule expression: {0}")]
    InvalidSchedule(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<reqwest::Error> for CourierError {
    fn from(e: reqwest::Error) -> Self {
        CourierError::Fetch(e.to_string())
    }
}

impl From<handlebars::RenderError> for CourierError {
    fn from(e: handlebars::RenderError) -> Self {
        CourierError::Render(e.to_string())
    }
}

impl From<lettre::transport::smtp::Error> for CourierError {
    fn from(e: lettre::transport::smtp::Error) -> Self {
        CourierError::Transport(e.to_string())
    }
}

impl From<config::ConfigError> for CourierError {
    fn from(e: config::ConfigError) -> Self {
        CourierError::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CourierError>;
