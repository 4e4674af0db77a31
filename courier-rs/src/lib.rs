//! courier-rs: Queued email dispatch service
//!
//! Accepts send requests over HTTP, queues them in memory and delivers them
//! one at a time through an SMTP relay.
//!
//! # Features
//!
//! - **Ordered delivery**: a single drain loop sends in enqueue order
//! - **Single-flight**: concurrent drain triggers collapse into one loop
//! - **Failure isolation**: a failed message is logged and skipped
//! - **Templates**: inline bodies or remote templates, with optional
//!   Handlebars rendering of HTML documents
//! - **Live status**: queue depth, drain flag and last send outcome
//!
//! # Example
//!
//! ```no_run
//! use courier_rs::config::Config;
//! use courier_rs::dispatch::Dispatcher;
//! use courier_rs::template::{HandlebarsRenderer, HttpTemplateFetcher, TemplateResolver};
//! use courier_rs::transport::SmtpTransport;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!     let resolver = TemplateResolver::new(
//!         Arc::new(HttpTemplateFetcher::new(config.fetch_timeout())?),
//!         Arc::new(HandlebarsRenderer::new()),
//!         config.allowed_kinds(),
//!     );
//!     let transport = Arc::new(SmtpTransport::from_config(&config.smtp)?);
//!     let dispatcher = Arc::new(Dispatcher::new(config.smtp.from.clone(), resolver, transport));
//!
//!     dispatcher.start_periodic(config.drain_schedule());
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! - [`config`]: Configuration management
//! - [`error`]: Error types and handling
//! - [`message`]: The email message entity
//! - [`queue`]: In-memory FIFO queue
//! - [`template`]: Body resolution (fetch and render)
//! - [`transport`]: Outgoing mail transports
//! - [`dispatch`]: Drain loop, schedule and status
//! - [`api`]: HTTP endpoints

pub mod api;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod message;
pub mod queue;
pub mod template;
pub mod transport;

// Re-export commonly used types
pub use config::Config;
pub use error::{CourierError, Result};
