//! Template resolution types

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// Body content kinds an operator can allow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Html,
    Text,
    Handlebars,
}

impl FromStr for ContentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "html" => Ok(ContentKind::Html),
            "text" => Ok(ContentKind::Text),
            "handlebars" => Ok(ContentKind::Handlebars),
            other => Err(format!("unknown content kind: {}", other)),
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ContentKind::Html => "html",
            ContentKind::Text => "text",
            ContentKind::Handlebars => "handlebars",
        };
        f.write_str(name)
    }
}

/// Set of content kinds permitted by configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowedKinds(HashSet<ContentKind>);

impl AllowedKinds {
    /// Every kind allowed
    pub fn all() -> Self {
        Self::from_kinds([ContentKind::Html, ContentKind::Text, ContentKind::Handlebars])
    }

    pub fn from_kinds(kinds: impl IntoIterator<Item = ContentKind>) -> Self {
        Self(kinds.into_iter().collect())
    }

    /// Parse configured names, skipping the ones that are not recognized
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let kinds = names.into_iter().filter_map(|name| {
            let name = name.as_ref();
            match name.parse::<ContentKind>() {
                Ok(kind) => Some(kind),
                Err(e) => {
                    warn!("Ignoring allowed type '{}': {}", name, e);
                    None
                }
            }
        });
        Self::from_kinds(kinds)
    }

    pub fn contains(&self, kind: ContentKind) -> bool {
        self.0.contains(&kind)
    }

    /// Whether an HTML document may be rendered as a template
    ///
    /// Plain HTML rendering is allowed outright by `html`; `handlebars`
    /// alone only allows it when the document actually carries a `{{`
    /// placeholder.
    pub fn permits_render(&self, document: &str) -> bool {
        self.contains(ContentKind::Html)
            || (self.contains(ContentKind::Handlebars) && document.contains("{{"))
    }

    /// Whether the payload is exposed to the renderer
    pub fn exposes_payload(&self) -> bool {
        self.contains(ContentKind::Handlebars)
    }
}

impl fmt::Display for AllowedKinds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        names.sort();
        f.write_str(&names.join(","))
    }
}

/// Resolved message body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    Html(String),
    Text(String),
}

impl Body {
    pub fn as_str(&self) -> &str {
        match self {
            Body::Html(s) | Body::Text(s) => s,
        }
    }

    pub fn is_html(&self) -> bool {
        matches!(self, Body::Html(_))
    }
}

/// Whether the text starts like an HTML document
pub fn is_html_document(text: &str) -> bool {
    text.starts_with("<!DOCTYPE html>") || text.starts_with("<html")
}
