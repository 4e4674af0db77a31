use crate::dispatch::{DrainSchedule, DEFAULT_SCHEDULE};
use crate::error::{CourierError, Result};
use crate::template::AllowedKinds;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default configuration file, overridable with `COURIER_CONFIG`
pub const DEFAULT_CONFIG_PATH: &str = "courier.toml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub smtp: SmtpConfig,
    #[serde(default)]
    pub templates: TemplatesConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    /// Body kinds among `html`, `text`, `handlebars`
    #[serde(default = "default_allowed_types")]
    pub allowed_types: Vec<String>,
    /// CORS origins; empty disables CORS
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SmtpConfig {
    #[serde(default = "default_smtp_host")]
    pub host: String,
    #[serde(default = "default_smtp_port")]
    pub port: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Sender address for every outgoing email
    #[serde(default = "default_from")]
    pub from: String,
    #[serde(default)]
    pub tls: TlsMode,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Cron expression for the periodic drain
    #[serde(default = "default_interval")]
    pub interval: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TlsMode {
    #[default]
    Starttls,
    Tls,
    None,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TemplatesConfig {
    #[serde(default = "default_timeout_secs")]
    pub fetch_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// `pretty`, `compact` or `json`
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_listen_addr() -> String {
    "0.0.0.0:3000".to_string()
}

fn default_allowed_types() -> Vec<String> {
    vec!["html".to_string(), "text".to_string(), "handlebars".to_string()]
}

fn default_smtp_host() -> String {
    "localhost".to_string()
}

fn default_smtp_port() -> u16 {
    587
}

fn default_from() -> String {
    "noreply@localhost".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_interval() -> String {
    DEFAULT_SCHEDULE.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            allowed_types: default_allowed_types(),
            allowed_origins: Vec::new(),
        }
    }
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: default_smtp_host(),
            port: default_smtp_port(),
            username: None,
            password: None,
            from: default_from(),
            tls: TlsMode::default(),
            timeout_secs: default_timeout_secs(),
            interval: default_interval(),
        }
    }
}

impl Default for TemplatesConfig {
    fn default() -> Self {
        Self {
            fetch_timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl SmtpConfig {
    /// Username and password, when both are set and non-empty
    pub fn credentials(&self) -> Option<(String, String)> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) if !user.is_empty() && !pass.is_empty() => {
                Some((user.clone(), pass.clone()))
            }
            _ => None,
        }
    }
}

impl Config {
    /// Read a TOML file; missing keys take their defaults
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| CourierError::Config(e.to_string()))?;

        toml::from_str(&content).map_err(|e| CourierError::Config(e.to_string()))
    }

    /// Load from `COURIER_CONFIG` (or `courier.toml`) and the environment
    pub fn load() -> Result<Self> {
        let path =
            std::env::var("COURIER_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(&path)
    }

    /// Layer `COURIER_*` environment variables over an optional TOML file
    ///
    /// Nested keys use `__`, e.g. `COURIER_SMTP__HOST`. List keys accept
    /// comma-separated values.
    pub fn load_from(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::new(path, config::FileFormat::Toml).required(false))
            .add_source(
                config::Environment::with_prefix("COURIER")
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("server.allowed_types")
                    .with_list_parse_key("server.allowed_origins")
                    .try_parsing(true),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    pub fn allowed_kinds(&self) -> AllowedKinds {
        AllowedKinds::from_names(&self.server.allowed_types)
    }

    /// The drain schedule; invalid expressions fall back to the default
    pub fn drain_schedule(&self) -> DrainSchedule {
        DrainSchedule::parse_or_default(&self.smtp.interval)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.templates.fetch_timeout_secs)
    }
}
