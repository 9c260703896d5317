//! YAML frontmatter extraction.
//!
//! Content files may open with a metadata block delimited by `---` marker
//! lines:
//!
//! ```text
//! ---
//! title: Shipping the rewrite
//! publishDate: 2024-01-15
//! tags:
//!   - rust
//! ---
//!
//! Body starts here.
//! ```
//!
//! Extraction is best-effort by contract: a missing block yields default
//! metadata, and a block that fails to parse as YAML is swallowed with a
//! warning rather than raised — the outcome records that a block was present
//! so callers can drop the file with a diagnostic instead of rendering it
//! with silently-wrong metadata. Unknown YAML keys are ignored.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Frontmatter block anchored at the very start of the file: a `---` marker
/// line, the YAML document, and a closing `---` marker line.
static FRONTMATTER_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\A---[ \t]*\r?\n(?:(.*?)\r?\n)?---[ \t]*(?:\r?\n|\z)").expect("valid regex")
});

fn default_true() -> bool {
    true
}

/// Metadata carried by a content file's frontmatter block.
///
/// Every field is optional in the source; absent fields take type defaults
/// (`showInMenu` defaults to true). Keys are camelCase as authored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Frontmatter {
    pub title: Option<String>,
    pub description: Option<String>,
    pub summary: Option<String>,
    pub tags: Vec<String>,
    pub publish_date: Option<NaiveDate>,
    pub author: Option<String>,
    pub url: Option<String>,
    /// Featured image path, relative to the content file.
    pub image: Option<String>,
    /// Short title used in navigation menus instead of `title`.
    pub menu_title: Option<String>,
    #[serde(default = "default_true")]
    pub show_in_menu: bool,
    pub show_in_header: bool,
    pub is_first_project: bool,
    /// Parent doc page slug for hierarchical docs.
    pub parent: Option<String>,
    pub icon: Option<String>,
    pub icon_svg: Option<String>,
    /// Per-file override for the table-of-contents depth cutoff.
    pub toc_depth: Option<u8>,
}

impl Default for Frontmatter {
    fn default() -> Self {
        Self {
            title: None,
            description: None,
            summary: None,
            tags: Vec::new(),
            publish_date: None,
            author: None,
            url: None,
            image: None,
            menu_title: None,
            show_in_menu: true,
            show_in_header: false,
            is_first_project: false,
            parent: None,
            icon: None,
            icon_svg: None,
            toc_depth: None,
        }
    }
}

/// Outcome of frontmatter extraction for one file.
#[derive(Debug, Clone)]
pub struct Extracted<'a> {
    /// Parsed metadata; `None` when a block was present but unparseable.
    pub meta: Option<Frontmatter>,
    /// Whether a delimited block was found at all (even if parsing failed).
    pub had_block: bool,
    /// Body text after the block, leading whitespace trimmed.
    pub body: &'a str,
}

impl Extracted<'_> {
    /// The metadata, substituting defaults when none parsed.
    pub fn meta_or_default(&self) -> Frontmatter {
        self.meta.clone().unwrap_or_default()
    }
}

/// Split raw file text into frontmatter metadata and markdown body.
///
/// Never fails: a missing block produces default metadata with the full
/// text as body; a malformed YAML block logs a warning and produces
/// `meta: None, had_block: true` with the remaining body intact.
pub fn extract(raw: &str) -> Extracted<'_> {
    let Some(captures) = FRONTMATTER_BLOCK.captures(raw) else {
        return Extracted {
            meta: Some(Frontmatter::default()),
            had_block: false,
            body: raw.trim_start(),
        };
    };

    let yaml = captures.get(1).map_or("", |m| m.as_str());
    let body = raw[captures.get(0).expect("whole match").end()..].trim_start();

    // An empty block is valid frontmatter carrying no fields.
    if yaml.trim().is_empty() {
        return Extracted {
            meta: Some(Frontmatter::default()),
            had_block: true,
            body,
        };
    }

    match serde_yaml::from_str::<Frontmatter>(yaml) {
        Ok(meta) => Extracted {
            meta: Some(meta),
            had_block: true,
            body,
        },
        Err(err) => {
            log::warn!("malformed frontmatter YAML: {err}");
            Extracted {
                meta: None,
                had_block: true,
                body,
            }
        }
    }
}

/// Body text with any frontmatter block removed.
pub fn strip(raw: &str) -> &str {
    extract(raw).body
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_metadata_and_body() {
        let raw = "---\ntitle: Test Post\nauthor: Jo\n---\n\n# Heading\n";
        let out = extract(raw);
        assert!(out.had_block);
        let meta = out.meta.unwrap();
        assert_eq!(meta.title.as_deref(), Some("Test Post"));
        assert_eq!(meta.author.as_deref(), Some("Jo"));
        assert_eq!(out.body, "# Heading\n");
    }

    #[test]
    fn missing_block_yields_defaults() {
        let out = extract("# Just Markdown\n");
        assert!(!out.had_block);
        assert_eq!(out.meta, Some(Frontmatter::default()));
        assert_eq!(out.body, "# Just Markdown\n");
    }

    #[test]
    fn block_must_start_at_first_line() {
        let raw = "\n---\ntitle: Late\n---\nBody";
        let out = extract(raw);
        assert!(!out.had_block);
    }

    #[test]
    fn malformed_yaml_is_swallowed() {
        let raw = "---\ntitle: [unterminated\n---\n\nBody text";
        let out = extract(raw);
        assert!(out.had_block);
        assert!(out.meta.is_none());
        assert_eq!(out.body, "Body text");
    }

    #[test]
    fn unclosed_block_treated_as_body() {
        let raw = "---\ntitle: Incomplete\n\nno closing marker";
        let out = extract(raw);
        assert!(!out.had_block);
        assert_eq!(out.meta, Some(Frontmatter::default()));
    }

    #[test]
    fn unknown_keys_ignored() {
        let raw = "---\ntitle: T\nnotAField: whatever\n---\nBody";
        let out = extract(raw);
        assert_eq!(out.meta.unwrap().title.as_deref(), Some("T"));
    }

    #[test]
    fn show_in_menu_defaults_true() {
        let out = extract("---\ntitle: T\n---\nBody");
        assert!(out.meta.unwrap().show_in_menu);

        let out = extract("---\nshowInMenu: false\n---\nBody");
        assert!(!out.meta.unwrap().show_in_menu);
    }

    #[test]
    fn publish_date_parses() {
        let out = extract("---\npublishDate: 2024-01-15\n---\nBody");
        assert_eq!(
            out.meta.unwrap().publish_date,
            NaiveDate::from_ymd_opt(2024, 1, 15)
        );
    }

    #[test]
    fn tags_parse_as_list() {
        let out = extract("---\ntags:\n  - rust\n  - web\n---\nBody");
        assert_eq!(out.meta.unwrap().tags, vec!["rust", "web"]);
    }

    #[test]
    fn body_dashes_not_confused_with_delimiters() {
        let raw = "---\ntitle: T\n---\n\nText with --- dashes inline";
        let out = extract(raw);
        assert!(out.body.contains("--- dashes"));
    }

    #[test]
    fn empty_block_yields_defaults() {
        let out = extract("---\n---\nBody");
        assert!(out.had_block);
        assert_eq!(out.meta, Some(Frontmatter::default()));
        assert_eq!(out.body, "Body");
    }

    #[test]
    fn strip_removes_block() {
        assert_eq!(strip("---\ntitle: T\n---\n\n# H"), "# H");
        assert_eq!(strip("no block"), "no block");
    }
}
