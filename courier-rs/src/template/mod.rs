//! Message body templates
//!
//! Bodies come either inline with the request or from a remote URL, and
//! HTML documents may be rendered with Handlebars against the message
//! payload.
//!
//! - [`fetcher`]: remote template retrieval over HTTP
//! - [`renderer`]: Handlebars rendering
//! - [`resolver`]: the decision table turning a message into a body
//! - [`types`]: allowed content kinds and the resolved [`Body`]

pub mod fetcher;
pub mod renderer;
pub mod resolver;
pub mod types;

pub use fetcher::{HttpTemplateFetcher, TemplateFetcher};
pub use renderer::{HandlebarsRenderer, TemplateRenderer};
pub use resolver::TemplateResolver;
pub use types::{is_html_document, AllowedKinds, Body, ContentKind};
