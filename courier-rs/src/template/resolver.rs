//! Message body resolution
//!
//! Turns a [`Message`] into the body handed to the mail transport:
//!
//! ```text
//! inline content ──┐
//!                  ├─→ HTML document + render allowed? ──yes─→ render → Body::Html
//! fetch(url) ──────┘                                   └─no──→ verbatim → Body::Text
//! ```
//!
//! Plain-text bodies are always sent literally, even when they contain
//! `{{` placeholders.

use crate::error::Result;
use crate::message::{Message, TemplateSource};
use crate::template::{is_html_document, AllowedKinds, Body, TemplateFetcher, TemplateRenderer};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::debug;

/// Resolves message bodies from inline content or remote templates
#[derive(Clone)]
pub struct TemplateResolver {
    fetcher: Arc<dyn TemplateFetcher>,
    renderer: Arc<dyn TemplateRenderer>,
    allowed: AllowedKinds,
}

impl TemplateResolver {
    pub fn new(
        fetcher: Arc<dyn TemplateFetcher>,
        renderer: Arc<dyn TemplateRenderer>,
        allowed: AllowedKinds,
    ) -> Self {
        Self {
            fetcher,
            renderer,
            allowed,
        }
    }

    /// Produce the final body for `message`
    ///
    /// # Errors
    /// - [`crate::CourierError::Fetch`] if the remote template cannot be retrieved
    /// - [`crate::CourierError::Render`] if the template is malformed
    pub async fn resolve(&self, message: &Message) -> Result<Body> {
        let text = match message.template() {
            TemplateSource::Inline(content) => content.clone(),
            TemplateSource::Remote(url) => self.fetcher.fetch(url).await?,
        };

        if !(is_html_document(&text) && self.allowed.permits_render(&text)) {
            debug!("Email {} resolved as plain text", message.id());
            return Ok(Body::Text(text));
        }

        let empty = Value::Object(Map::new());
        let data = if self.allowed.exposes_payload() {
            message.payload()
        } else {
            &empty
        };

        let html = self.renderer.render(&text, data)?;
        debug!("Email {} rendered as HTML", message.id());
        Ok(Body::Html(html))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CourierError;
    use crate::message::TemplateRef;
    use crate::template::{ContentKind, HandlebarsRenderer};
    use async_trait::async_trait;
    use mockall::mock;
    use serde_json::json;

    mock! {
        pub Fetcher {}

        #[async_trait]
        impl TemplateFetcher for Fetcher {
            async fn fetch(&self, url: &str) -> Result<String>;
        }
    }

    fn resolver(fetcher: MockFetcher, allowed: AllowedKinds) -> TemplateResolver {
        TemplateResolver::new(
            Arc::new(fetcher),
            Arc::new(HandlebarsRenderer::new()),
            allowed,
        )
    }

    fn message(template: TemplateRef) -> Message {
        Message::new(
            "Hello",
            "ada@example.com",
            None,
            None,
            json!({"name": "Ada"}),
            template,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_inline_content_never_fetches() {
        let mut fetcher = MockFetcher::new();
        fetcher.expect_fetch().times(0);

        let template = TemplateRef {
            content: Some("Hi there".to_string()),
            url: Some("https://templates.example.com/welcome.html".to_string()),
        };

        let body = resolver(fetcher, AllowedKinds::all())
            .resolve(&message(template))
            .await
            .unwrap();

        assert_eq!(body, Body::Text("Hi there".to_string()));
    }

    #[tokio::test]
    async fn test_remote_template_is_fetched() {
        let mut fetcher = MockFetcher::new();
        fetcher
            .expect_fetch()
            .withf(|url| url.ends_with("templates.example.com/welcome.html"))
            .times(1)
            .returning(|_| Ok("<html><p>Welcome {{name}}</p></html>".to_string()));

        let body = resolver(fetcher, AllowedKinds::all())
            .resolve(&message(TemplateRef::remote(
                "https://templates.example.com/welcome.html",
            )))
            .await
            .unwrap();

        assert_eq!(body, Body::Html("<html><p>Welcome Ada</p></html>".to_string()));
    }

    #[tokio::test]
    async fn test_fetch_error_propagates() {
        let mut fetcher = MockFetcher::new();
        fetcher
            .expect_fetch()
            .returning(|_| Err(CourierError::Fetch("connection refused".to_string())));

        let result = resolver(fetcher, AllowedKinds::all())
            .resolve(&message(TemplateRef::remote("https://down.example.com/t.html")))
            .await;

        assert!(matches!(result, Err(CourierError::Fetch(_))));
    }

    #[tokio::test]
    async fn test_plain_text_is_never_rendered() {
        let body = resolver(MockFetcher::new(), AllowedKinds::all())
            .resolve(&message(TemplateRef::inline("Hello {{name}}")))
            .await
            .unwrap();

        assert_eq!(body, Body::Text("Hello {{name}}".to_string()));
    }

    #[tokio::test]
    async fn test_html_rendered_with_payload_when_handlebars_allowed() {
        let allowed = AllowedKinds::from_kinds([ContentKind::Handlebars]);
        let body = resolver(MockFetcher::new(), allowed)
            .resolve(&message(TemplateRef::inline(
                "<!DOCTYPE html><p>Hello {{name}}</p>",
            )))
            .await
            .unwrap();

        assert!(body.is_html());
        assert!(body.as_str().contains("Ada"));
    }

    #[tokio::test]
    async fn test_html_sent_verbatim_when_handlebars_not_allowed() {
        let allowed = AllowedKinds::from_kinds([ContentKind::Text]);
        let body = resolver(MockFetcher::new(), allowed)
            .resolve(&message(TemplateRef::inline("<html>Hello {{name}}</html>")))
            .await
            .unwrap();

        assert_eq!(body, Body::Text("<html>Hello {{name}}</html>".to_string()));
    }

    #[tokio::test]
    async fn test_html_only_renders_with_empty_context() {
        let allowed = AllowedKinds::from_kinds([ContentKind::Html]);
        let body = resolver(MockFetcher::new(), allowed)
            .resolve(&message(TemplateRef::inline("<html>Hello {{name}}!</html>")))
            .await
            .unwrap();

        assert_eq!(body, Body::Html("<html>Hello !</html>".to_string()));
    }

    #[tokio::test]
    async fn test_handlebars_only_skips_static_html() {
        let allowed = AllowedKinds::from_kinds([ContentKind::Handlebars]);
        let body = resolver(MockFetcher::new(), allowed)
            .resolve(&message(TemplateRef::inline("<html>static</html>")))
            .await
            .unwrap();

        assert_eq!(body, Body::Text("<html>static</html>".to_string()));
    }

    #[tokio::test]
    async fn test_render_error_propagates() {
        let result = resolver(MockFetcher::new(), AllowedKinds::all())
            .resolve(&message(TemplateRef::inline("<html>{{#if ready}}</html>")))
            .await;

        assert!(matches!(result, Err(CourierError::Render(_))));
    }
}
