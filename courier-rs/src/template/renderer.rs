//! Template rendering with Handlebars

use crate::error::Result;
use handlebars::Handlebars;
use serde_json::Value;

/// Renders a template string against a data context
pub trait TemplateRenderer: Send + Sync {
    /// Substitute `data` into `template`
    ///
    /// Fails with [`crate::CourierError::Render`] on malformed template
    /// syntax.
    fn render(&self, template: &str, data: &Value) -> Result<String>;
}

/// Logic-less renderer backed by the `handlebars` crate
///
/// Missing variables render as empty strings and values are HTML-escaped.
pub struct HandlebarsRenderer {
    registry: Handlebars<'static>,
}

impl HandlebarsRenderer {
    pub fn new() -> Self {
        Self {
            registry: Handlebars::new(),
        }
    }
}

impl Default for HandlebarsRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRenderer for HandlebarsRenderer {
    fn render(&self, template: &str, data: &Value) -> Result<String> {
        Ok(self.registry.render_template(template, data)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CourierError;
    use serde_json::json;

    #[test]
    fn test_render_basic_variables() {
        let renderer = HandlebarsRenderer::new();
        let rendered = renderer
            .render(
                "Hello {{name}} from {{company}}!",
                &json!({"name": "John Doe", "company": "Acme Inc"}),
            )
            .unwrap();

        assert_eq!(rendered, "Hello John Doe from Acme Inc!");
    }

    #[test]
    fn test_render_nested_values() {
        let renderer = HandlebarsRenderer::new();
        let rendered = renderer
            .render(
                "<p>{{user.name}} has {{#each items}}[{{this}}]{{/each}}</p>",
                &json!({"user": {"name": "Ada"}, "items": ["a", "b"]}),
            )
            .unwrap();

        assert_eq!(rendered, "<p>Ada has [a][b]</p>");
    }

    #[test]
    fn test_missing_variables_render_empty() {
        let renderer = HandlebarsRenderer::new();
        let rendered = renderer.render("Hello {{name}}!", &json!({})).unwrap();
        assert_eq!(rendered, "Hello !");
    }

    #[test]
    fn test_values_are_html_escaped() {
        let renderer = HandlebarsRenderer::new();
        let rendered = renderer
            .render("<p>{{name}}</p>", &json!({"name": "<b>Ada</b>"}))
            .unwrap();
        assert_eq!(rendered, "<p>&lt;b&gt;Ada&lt;/b&gt;</p>");
    }

    #[test]
    fn test_malformed_template() {
        let renderer = HandlebarsRenderer::new();
        let result = renderer.render("{{#if ready}}unclosed", &json!({}));
        assert!(matches!(result, Err(CourierError::Render(_))));
    }
}
