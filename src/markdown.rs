//! Markdown rendering built on pulldown-cmark.
//!
//! Wraps the engine with the site's conventions:
//!
//! - **Anchored headings**: every heading gets a deterministic `id`
//!   attribute derived from its text via [`crate::slug`], disambiguated in
//!   document order. The table-of-contents extractor ([`crate::toc`]) uses
//!   the same scheme, so TOC links and rendered anchors always agree.
//! - **Extensions**: tables, task lists, strikethrough, footnotes, and a
//!   small `:shorthand:` emoji table.
//! - **Inline rendering**: descriptions and summaries render without a
//!   wrapping `<p>` so they can sit inside existing block elements.
//! - **Plain text**: syntax-stripped text for search indexing and reading
//!   time, with code-block contents excluded.

use std::sync::LazyLock;

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd, html};
use regex::Regex;

use crate::frontmatter;
use crate::slug::{SlugCounter, generate_slug};

/// Words-per-minute default for reading time estimates.
pub const DEFAULT_WORDS_PER_MINUTE: u32 = 200;

/// `:name:` emoji shorthand. Unknown names are left untouched.
static EMOJI_SHORTHAND: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r":([a-z0-9_+-]+):").expect("valid regex"));

const EMOJI: &[(&str, &str)] = &[
    ("smile", "😄"),
    ("grin", "😁"),
    ("wink", "😉"),
    ("heart", "❤️"),
    ("thumbsup", "👍"),
    ("thumbsdown", "👎"),
    ("+1", "👍"),
    ("-1", "👎"),
    ("fire", "🔥"),
    ("rocket", "🚀"),
    ("star", "⭐"),
    ("tada", "🎉"),
    ("warning", "⚠️"),
    ("bulb", "💡"),
    ("check", "✅"),
    ("x", "❌"),
    ("eyes", "👀"),
    ("wave", "👋"),
    ("sparkles", "✨"),
    ("memo", "📝"),
];

fn options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_FOOTNOTES
}

/// Render markdown to block-level HTML with anchored headings.
pub fn to_html(markdown: &str) -> String {
    let source = replace_emoji(markdown);
    let events = events_with_heading_ids(&source);
    let mut out = String::with_capacity(source.len() * 2);
    html::push_html(&mut out, events.into_iter());
    out
}

/// Render markdown and strip a single wrapping paragraph tag.
///
/// Used for descriptions and summaries that must not introduce block-level
/// wrapping. Output that is more than one paragraph is returned as-is.
pub fn to_html_inline(markdown: &str) -> String {
    let rendered = to_html(markdown);
    let trimmed = rendered.trim_end();
    if let Some(inner) = trimmed
        .strip_prefix("<p>")
        .and_then(|s| s.strip_suffix("</p>"))
        && !inner.contains("<p>")
    {
        return inner.to_string();
    }
    rendered
}

/// Syntax-stripped plain text for search indexing.
///
/// Strips any frontmatter block, drops code-block contents, removes all
/// markdown syntax, and collapses whitespace runs to single spaces.
pub fn plain_text(markdown: &str) -> String {
    let body = frontmatter::strip(markdown);
    let mut text = String::with_capacity(body.len());
    let mut in_code_block = false;

    for event in Parser::new_ext(body, options()) {
        match event {
            Event::Start(Tag::CodeBlock(_)) => in_code_block = true,
            Event::End(TagEnd::CodeBlock) => in_code_block = false,
            Event::Text(t) | Event::Code(t) if !in_code_block => {
                text.push_str(&t);
                text.push(' ');
            }
            Event::SoftBreak | Event::HardBreak => text.push(' '),
            Event::End(TagEnd::Paragraph | TagEnd::Heading(_) | TagEnd::Item) => text.push(' '),
            _ => {}
        }
    }

    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Estimated reading time in whole minutes, never below 1.
pub fn reading_time(markdown: &str, words_per_minute: u32) -> u32 {
    let words = plain_text(markdown).split_whitespace().count() as u32;
    let wpm = words_per_minute.max(1);
    (words.div_ceil(wpm)).max(1)
}

/// Substitute `:name:` shorthand outside fenced code blocks.
fn replace_emoji(markdown: &str) -> String {
    let mut out = String::with_capacity(markdown.len());
    let mut in_fence = false;
    for line in markdown.split_inclusive('\n') {
        if line.trim_start().starts_with("```") {
            in_fence = !in_fence;
            out.push_str(line);
            continue;
        }
        if in_fence {
            out.push_str(line);
            continue;
        }
        out.push_str(&EMOJI_SHORTHAND.replace_all(line, |caps: &regex::Captures| {
            let name = &caps[1];
            match EMOJI.iter().find(|(n, _)| *n == name) {
                Some((_, glyph)) => (*glyph).to_string(),
                None => caps[0].to_string(),
            }
        }));
    }
    out
}

/// Parse into an event list with anchor ids assigned to headings that lack
/// an explicit one. Ids share the TOC's slug-and-counter scheme.
fn events_with_heading_ids(markdown: &str) -> Vec<Event<'_>> {
    let mut events: Vec<Event> = Parser::new_ext(markdown, options()).collect();
    let mut counter = SlugCounter::new();

    let mut i = 0;
    while i < events.len() {
        if let Event::Start(Tag::Heading { id: None, .. }) = &events[i] {
            let mut text = String::new();
            let mut j = i + 1;
            while j < events.len() {
                match &events[j] {
                    Event::End(TagEnd::Heading(_)) => break,
                    Event::Text(t) | Event::Code(t) => text.push_str(t),
                    Event::SoftBreak | Event::HardBreak => text.push(' '),
                    _ => {}
                }
                j += 1;
            }
            let anchor = counter.disambiguate(&generate_slug(&text));
            if !anchor.is_empty()
                && let Event::Start(Tag::Heading { id, .. }) = &mut events[i]
            {
                *id = Some(anchor.into());
            }
            i = j;
        }
        i += 1;
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // to_html
    // =========================================================================

    #[test]
    fn headings_get_anchor_ids() {
        let html = to_html("# My Title\n\ntext");
        assert!(html.contains(r#"<h1 id="my-title">My Title</h1>"#));
    }

    #[test]
    fn duplicate_headings_disambiguated() {
        let html = to_html("## Intro\n\n## Intro\n");
        assert!(html.contains(r#"id="intro""#));
        assert!(html.contains(r#"id="intro-1""#));
    }

    #[test]
    fn tables_render() {
        let html = to_html("| a | b |\n|---|---|\n| 1 | 2 |\n");
        assert!(html.contains("<table>"));
    }

    #[test]
    fn task_lists_render() {
        let html = to_html("- [x] done\n- [ ] open\n");
        assert!(html.contains("checkbox"));
    }

    #[test]
    fn fenced_code_renders() {
        let html = to_html("```rust\nfn main() {}\n```\n");
        assert!(html.contains("<pre><code"));
        assert!(html.contains("fn main"));
    }

    #[test]
    fn emoji_shorthand_substituted() {
        let html = to_html("Ship it :rocket:");
        assert!(html.contains("🚀"));
        assert!(!html.contains(":rocket:"));
    }

    #[test]
    fn unknown_emoji_left_alone() {
        let html = to_html("strange :notanemoji: token");
        assert!(html.contains(":notanemoji:"));
    }

    #[test]
    fn emoji_untouched_inside_fences() {
        let html = to_html("```\n:rocket:\n```\n");
        assert!(html.contains(":rocket:"));
    }

    // =========================================================================
    // to_html_inline
    // =========================================================================

    #[test]
    fn inline_strips_single_paragraph() {
        assert_eq!(to_html_inline("Some *emphasis* here"), "Some <em>emphasis</em> here");
    }

    #[test]
    fn inline_keeps_multiple_paragraphs() {
        let html = to_html_inline("one\n\ntwo");
        assert!(html.contains("<p>one</p>"));
        assert!(html.contains("<p>two</p>"));
    }

    // =========================================================================
    // plain_text / reading_time
    // =========================================================================

    #[test]
    fn plain_text_strips_syntax() {
        let text = plain_text("# Title\n\nSome **bold** and [a link](https://x.y).");
        assert_eq!(text, "Title Some bold and a link .");
    }

    #[test]
    fn plain_text_skips_frontmatter_and_code() {
        let text = plain_text("---\ntitle: T\n---\n\nwords here\n\n```\nnot counted\n```\n");
        assert!(text.contains("words here"));
        assert!(!text.contains("not counted"));
        assert!(!text.contains("title"));
    }

    #[test]
    fn plain_text_collapses_whitespace() {
        let text = plain_text("a   b\n\n\nc");
        assert_eq!(text, "a b c");
    }

    #[test]
    fn reading_time_rounds_up() {
        let doc = ["word"; 400].join(" ");
        assert_eq!(reading_time(&doc, 200), 2);

        let doc = ["word"; 201].join(" ");
        assert_eq!(reading_time(&doc, 200), 2);
    }

    #[test]
    fn reading_time_floors_at_one() {
        assert_eq!(reading_time("word", 200), 1);
        assert_eq!(reading_time("", 200), 1);
    }
}
