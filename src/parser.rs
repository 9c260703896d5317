//! ContentParser: one raw content file → one structured [`Document`].
//!
//! Combines frontmatter extraction, embedded-component extraction, markdown
//! rendering, table-of-contents building, and reading-time estimation. The
//! only hard failure for a single file is a frontmatter block that exists
//! but cannot be parsed — everything else degrades per the extractors'
//! own contracts. Callers treat the `Err` as "drop this file, log, keep
//! going"; it never aborts a collection load.

use thiserror::Error;

use crate::components::{self, EmbeddedComponent};
use crate::frontmatter::{self, Frontmatter};
use crate::markdown;
use crate::slug;
use crate::toc::{self, TocEntry};

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("frontmatter block present but unparseable")]
    Frontmatter,
}

/// Knobs the site config feeds into parsing.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    pub toc_depth: u8,
    pub words_per_minute: u32,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            toc_depth: toc::DEFAULT_MAX_DEPTH,
            words_per_minute: markdown::DEFAULT_WORDS_PER_MINUTE,
        }
    }
}

/// A fully parsed content file, category-agnostic.
///
/// Entity constructors ([`crate::types::ContentEntity::from_document`])
/// project this into the category-specific shapes.
#[derive(Debug, Clone)]
pub struct Document {
    /// Path the file was fetched from, relative to the site root.
    pub path: String,
    /// Slug derived from the filename (or folder, for `dir/index.md`).
    pub slug: String,
    /// Numeric order prefix, 0 when absent.
    pub order: u32,
    /// Directory of the file; components resolve relative assets here.
    pub base_path: String,
    pub front: Frontmatter,
    /// Markdown body after frontmatter and directive extraction.
    pub body: String,
    pub html: String,
    pub toc: Vec<TocEntry>,
    pub components: Vec<EmbeddedComponent>,
    /// Estimated minutes, always ≥ 1.
    pub reading_time: u32,
}

impl Document {
    /// Frontmatter title, falling back to the slug with dashes as spaces.
    pub fn title(&self) -> String {
        self.front
            .title
            .clone()
            .unwrap_or_else(|| self.slug.replace('-', " "))
    }
}

/// Parse one raw file into a [`Document`].
///
/// `path` is the site-root-relative location the file was read from; it
/// determines the slug, the order, and the component base path.
pub fn parse_document(path: &str, raw: &str, opts: &ParseOptions) -> Result<Document, ParseError> {
    let extracted = frontmatter::extract(raw);
    let front = match extracted.meta {
        Some(front) => front,
        None => return Err(ParseError::Frontmatter),
    };

    let (order, slug) = slug::order_and_slug_from_filename(path);
    let base_path = path.rfind('/').map_or("", |pos| &path[..pos]).to_string();

    let mut extraction = components::extract(extracted.body);
    for component in &mut extraction.components {
        component.base_path = base_path.clone();
    }

    let toc_depth = front.toc_depth.unwrap_or(opts.toc_depth).clamp(1, 6);
    let toc = toc::build(&extraction.body, toc_depth);
    let html = markdown::to_html(&extraction.body);
    let reading_time = markdown::reading_time(&extraction.body, opts.words_per_minute);

    Ok(Document {
        path: path.to_string(),
        slug,
        order,
        base_path,
        front,
        body: extraction.body,
        html,
        toc,
        components: extraction.components,
        reading_time,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(path: &str, raw: &str) -> Document {
        parse_document(path, raw, &ParseOptions::default()).unwrap()
    }

    #[test]
    fn combines_all_stages() {
        let raw = "---\ntitle: Guide\ntags: [rust]\n---\n\n# Guide\n\n[[youtube id=\"abc\"]]\n\n## Setup\n";
        let doc = parse("content/docs/02-guide.md", raw);

        assert_eq!(doc.slug, "guide");
        assert_eq!(doc.order, 2);
        assert_eq!(doc.front.title.as_deref(), Some("Guide"));
        assert!(doc.html.contains(r#"<h1 id="guide">"#));
        assert!(doc.body.contains("<!--embed:0-->"));
        assert_eq!(doc.components[0].name, "youtube");
        assert_eq!(doc.toc[0].children[0].id, "setup");
        assert_eq!(doc.reading_time, 1);
    }

    #[test]
    fn components_get_base_path_from_file_location() {
        let doc = parse("content/blog/2024-01-01-post.md", "[[gallery src=\"pics/\"]]\n");
        assert_eq!(doc.components[0].base_path, "content/blog");
    }

    #[test]
    fn folder_based_file_uses_folder_slug() {
        let doc = parse("content/docs/01-intro/index.md", "# Intro\n");
        assert_eq!(doc.slug, "intro");
        assert_eq!(doc.order, 1);
        assert_eq!(doc.base_path, "content/docs/01-intro");
    }

    #[test]
    fn unparseable_frontmatter_is_the_only_hard_error() {
        let err = parse_document(
            "content/blog/x.md",
            "---\ntitle: [broken\n---\nBody",
            &ParseOptions::default(),
        );
        assert!(matches!(err, Err(ParseError::Frontmatter)));

        // No frontmatter at all is fine
        assert!(parse_document("content/blog/x.md", "just text", &ParseOptions::default()).is_ok());
    }

    #[test]
    fn title_falls_back_to_slug() {
        let doc = parse("content/docs/getting-started.md", "body\n");
        assert_eq!(doc.title(), "getting started");
    }

    #[test]
    fn toc_depth_override_from_frontmatter() {
        let raw = "---\ntocDepth: 1\n---\n# A\n## B\n";
        let doc = parse("content/docs/a.md", raw);
        assert_eq!(doc.toc.len(), 1);
        assert!(doc.toc[0].children.is_empty());
    }
}
