//! Embedded component directive extraction.
//!
//! Content authors embed rich widgets with an inline bracketed directive:
//!
//! ```text
//! [[youtube id="dQw4w9WgXcQ" title="Demo"]]
//! [[gallery src="shots/" columns="3"]]
//! ```
//!
//! The parser replaces each directive with an HTML-comment placeholder the
//! markdown renderer passes through untouched (`<!--embed:0-->`), and
//! returns the descriptors in document order. Resolving a component name to
//! a renderable widget happens in the UI layer; unknown names travel through
//! as opaque descriptors rather than failing the parse.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static DIRECTIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\[\[([A-Za-z][A-Za-z0-9_-]*)((?:\s+[A-Za-z][A-Za-z0-9_-]*="[^"]*")*)\s*\]\]"#)
        .expect("valid regex")
});

static ATTRIBUTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"([A-Za-z][A-Za-z0-9_-]*)="([^"]*)""#).expect("valid regex"));

/// One embedded component occurrence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbeddedComponent {
    /// Directive name as written (`youtube`, `gallery`, ...).
    pub name: String,
    pub attributes: BTreeMap<String, String>,
    /// Directory of the owning content file, assigned by the caller so the
    /// component can resolve relative asset references.
    #[serde(default)]
    pub base_path: String,
}

/// Result of scanning one markdown body.
#[derive(Debug, Clone)]
pub struct Extraction {
    /// Body with every directive replaced by its placeholder.
    pub body: String,
    /// Descriptors in document order; index N matches `<!--embed:N-->`.
    pub components: Vec<EmbeddedComponent>,
}

/// Placeholder token for the Nth component.
pub fn placeholder(index: usize) -> String {
    format!("<!--embed:{index}-->")
}

/// Replace component directives with placeholders and collect descriptors.
pub fn extract(body: &str) -> Extraction {
    let mut components = Vec::new();
    let replaced = DIRECTIVE.replace_all(body, |caps: &regex::Captures| {
        let attributes = ATTRIBUTE
            .captures_iter(caps.get(2).map_or("", |m| m.as_str()))
            .map(|attr| (attr[1].to_string(), attr[2].to_string()))
            .collect();
        components.push(EmbeddedComponent {
            name: caps[1].to_string(),
            attributes,
            base_path: String::new(),
        });
        placeholder(components.len() - 1)
    });
    Extraction {
        body: replaced.into_owned(),
        components,
    }
}
