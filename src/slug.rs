//! Slug generation and filename-convention parsing.
//!
//! All content entry types (posts, cards, doc pages, headings) share one
//! URL-safe identifier scheme. Filenames additionally carry ordering and
//! dating conventions that this module extracts:
//!
//! - `02-guide.md` → order 2, slug `guide` (numeric order prefix)
//! - `2024-01-15-my-post.md` → slug `my-post` (date prefix, blog convention)
//! - `getting-started/index.md` → slug `getting-started` (folder-based content)
//!
//! Heading anchors use the same slugs, disambiguated per document through
//! [`SlugCounter`] so that the renderer's anchor ids and the extracted table
//! of contents always agree.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

/// `YYYY-MM-DD-` prefix used by dated (blog) filenames.
static DATE_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}-").expect("valid regex"));

/// Turn arbitrary text into a URL-safe slug.
///
/// Lowercases, replaces every run of non-alphanumeric characters with a
/// single hyphen, and trims leading/trailing hyphens. Idempotent:
/// `generate_slug(generate_slug(x)) == generate_slug(x)`.
///
/// Text that is empty after stripping yields an empty string; callers that
/// need a non-empty anchor decide whether to skip the entry.
pub fn generate_slug(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut prev_hyphen = true; // suppresses a leading hyphen
    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            prev_hyphen = false;
        } else if !prev_hyphen {
            slug.push('-');
            prev_hyphen = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// Derive a slug from a content filename.
///
/// For folder-based content (`folder/index.md`) the folder name is used
/// instead of the leaf filename. The extension, a `YYYY-MM-DD-` date prefix,
/// and a `NN-` numeric order prefix are all stripped before slugifying.
pub fn slug_from_filename(filename: &str) -> String {
    order_and_slug_from_filename(filename).1
}

/// Derive `(order, slug)` from a content filename.
///
/// The order is a leading integer run before the first hyphen (after any
/// date prefix has been stripped); a missing numeric prefix yields order 0.
/// A pure-number stem parses as `(N, "")` — the empty slug is valid and the
/// caller decides whether to keep the entry.
pub fn order_and_slug_from_filename(filename: &str) -> (u32, String) {
    let stem = content_stem(filename);

    // Date prefixes are a dating convention, not an ordering one.
    let stem = DATE_PREFIX.replace(stem, "");

    if let Some(dash) = stem.find('-') {
        if let Ok(order) = stem[..dash].parse::<u32>() {
            return (order, generate_slug(&stem[dash + 1..]));
        }
    } else if let Ok(order) = stem.parse::<u32>() {
        return (order, String::new());
    }
    (0, generate_slug(&stem))
}

/// The portion of a content path that names the entry: the parent folder for
/// `folder/index.md(x)`, otherwise the filename without its extension.
fn content_stem(filename: &str) -> &str {
    let normalized = filename.trim_end_matches('/');
    let (dir, leaf) = match normalized.rfind('/') {
        Some(pos) => (Some(&normalized[..pos]), &normalized[pos + 1..]),
        None => (None, normalized),
    };

    let leaf_stem = leaf.rsplit_once('.').map_or(leaf, |(stem, _)| stem);

    if leaf_stem.eq_ignore_ascii_case("index")
        && let Some(dir) = dir
    {
        // Use the last path component of the directory
        return dir.rsplit('/').next().unwrap_or(dir);
    }
    leaf_stem
}

/// Per-document anchor disambiguator.
///
/// The first occurrence of a base slug keeps the bare slug; the Nth repeat
/// (1-based) becomes `base-N`, matching the anchor convention of common
/// markdown renderers.
#[derive(Debug, Default)]
pub struct SlugCounter {
    seen: HashMap<String, u32>,
}

impl SlugCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the disambiguated anchor id for `base`.
    pub fn disambiguate(&mut self, base: &str) -> String {
        let count = self.seen.entry(base.to_string()).or_insert(0);
        let id = if *count == 0 {
            base.to_string()
        } else {
            format!("{}-{}", base, count)
        };
        *count += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // generate_slug
    // =========================================================================

    #[test]
    fn slug_lowercases_and_hyphenates() {
        assert_eq!(generate_slug("Hello, World!"), "hello-world");
    }

    #[test]
    fn slug_collapses_symbol_runs() {
        assert_eq!(generate_slug("a --- b???c"), "a-b-c");
    }

    #[test]
    fn slug_trims_edge_hyphens() {
        assert_eq!(generate_slug("--edge case--"), "edge-case");
    }

    #[test]
    fn slug_is_idempotent() {
        let once = generate_slug("Some Title: With *Markup*");
        assert_eq!(generate_slug(&once), once);
    }

    #[test]
    fn slug_of_symbols_only_is_empty() {
        assert_eq!(generate_slug("!!!"), "");
        assert_eq!(generate_slug(""), "");
    }

    #[test]
    fn slug_charset_for_ascii_input() {
        let slug = generate_slug("Mixed CASE & punct. 42!");
        assert!(slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
        assert!(!slug.contains("--"));
        assert!(!slug.starts_with('-') && !slug.ends_with('-'));
    }

    // =========================================================================
    // Filename parsing
    // =========================================================================

    #[test]
    fn order_prefix_extracted() {
        assert_eq!(order_and_slug_from_filename("02-guide.md"), (2, "guide".into()));
    }

    #[test]
    fn missing_prefix_yields_order_zero() {
        assert_eq!(order_and_slug_from_filename("guide.md"), (0, "guide".into()));
    }

    #[test]
    fn date_prefix_stripped() {
        assert_eq!(slug_from_filename("2024-01-15-my-post.md"), "my-post");
    }

    #[test]
    fn date_prefix_does_not_become_order() {
        assert_eq!(order_and_slug_from_filename("2024-01-15-my-post.md"), (0, "my-post".into()));
    }

    #[test]
    fn folder_based_content_uses_folder_name() {
        assert_eq!(slug_from_filename("getting-started/index.md"), "getting-started");
        assert_eq!(order_and_slug_from_filename("01-intro/index.mdx"), (1, "intro".into()));
    }

    #[test]
    fn pure_number_stem() {
        assert_eq!(order_and_slug_from_filename("42.md"), (42, "".into()));
    }

    #[test]
    fn no_separators_at_all() {
        assert_eq!(order_and_slug_from_filename("readme"), (0, "readme".into()));
    }

    #[test]
    fn mdx_extension_stripped() {
        assert_eq!(slug_from_filename("03-Deep-Dive.mdx"), "deep-dive");
    }

    // =========================================================================
    // SlugCounter
    // =========================================================================

    #[test]
    fn first_occurrence_keeps_bare_slug() {
        let mut c = SlugCounter::new();
        assert_eq!(c.disambiguate("intro"), "intro");
    }

    #[test]
    fn repeats_get_numeric_suffix() {
        let mut c = SlugCounter::new();
        assert_eq!(c.disambiguate("intro"), "intro");
        assert_eq!(c.disambiguate("intro"), "intro-1");
        assert_eq!(c.disambiguate("intro"), "intro-2");
    }

    #[test]
    fn distinct_slugs_do_not_interfere() {
        let mut c = SlugCounter::new();
        assert_eq!(c.disambiguate("a"), "a");
        assert_eq!(c.disambiguate("b"), "b");
        assert_eq!(c.disambiguate("a"), "a-1");
    }
}
