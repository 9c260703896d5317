//! Table-of-contents extraction and hierarchy building.
//!
//! Two passes over the markdown body:
//!
//! 1. **Flat extraction** walks lines with a fenced-code toggle, recording
//!    `(level, text)` for every real heading. Headings deeper than the depth
//!    cutoff are dropped entirely, not just hidden. A `#` not followed by a
//!    space is not a heading, which keeps directive-like lines out.
//! 2. **Hierarchy fold** turns the flat list into a forest: a stack of open
//!    nodes is popped down to the nearest shallower heading, so every node's
//!    children have strictly greater level and siblings keep document order.
//!
//! Anchor ids come from [`crate::slug`] with the same duplicate-suffix rule
//! the renderer uses, so `#intro` / `#intro-1` links resolve in both.

use serde::{Deserialize, Serialize};

use crate::slug::{SlugCounter, generate_slug};

/// Depth cutoff applied when neither the site config nor the file's
/// frontmatter overrides it.
pub const DEFAULT_MAX_DEPTH: u8 = 3;

/// One node of the heading tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TocEntry {
    /// 1-based heading depth (`#` count).
    pub level: u8,
    /// Anchor id, disambiguated within the document.
    pub id: String,
    /// Display text as written.
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TocEntry>,
}

/// Extract the heading forest for one markdown body.
pub fn build(markdown: &str, max_depth: u8) -> Vec<TocEntry> {
    fold(extract_headings(markdown, max_depth))
}

/// Pass 1: flat, document-ordered `(level, text)` pairs.
///
/// Lines inside fenced code blocks are skipped; the fence markers themselves
/// flip the toggle and are never headings. Headings deeper than `max_depth`
/// are dropped here so they never reach the tree.
pub fn extract_headings(markdown: &str, max_depth: u8) -> Vec<(u8, String)> {
    let mut headings = Vec::new();
    let mut in_fence = false;

    for line in markdown.lines() {
        if line.trim_start().starts_with("```") {
            in_fence = !in_fence;
            continue;
        }
        if in_fence {
            continue;
        }

        let hashes = line.chars().take_while(|&c| c == '#').count();
        if hashes == 0 || hashes > max_depth as usize {
            continue;
        }
        // A '#' run must be followed by exactly one space and non-empty text.
        let rest = &line[hashes..];
        let Some(text) = rest.strip_prefix(' ') else {
            continue;
        };
        let text = text.trim();
        if text.is_empty() {
            continue;
        }
        headings.push((hashes as u8, text.to_string()));
    }
    headings
}

/// Pass 2: fold the flat list into a forest.
fn fold(flat: Vec<(u8, String)>) -> Vec<TocEntry> {
    let mut counter = SlugCounter::new();
    let mut roots: Vec<TocEntry> = Vec::new();
    let mut stack: Vec<TocEntry> = Vec::new();

    for (level, text) in flat {
        let entry = TocEntry {
            level,
            id: counter.disambiguate(&generate_slug(&text)),
            text,
            children: Vec::new(),
        };

        // Entries at the same or deeper level cannot be ancestors.
        while stack.last().is_some_and(|top| top.level >= level) {
            let done = stack.pop().expect("non-empty stack");
            attach(&mut roots, &mut stack, done);
        }
        stack.push(entry);
    }

    while let Some(done) = stack.pop() {
        attach(&mut roots, &mut stack, done);
    }
    roots
}

fn attach(roots: &mut Vec<TocEntry>, stack: &mut [TocEntry], done: TocEntry) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(done),
        None => roots.push(done),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat(pairs: &[(u8, &str)]) -> Vec<(u8, String)> {
        pairs.iter().map(|(l, t)| (*l, t.to_string())).collect()
    }

    // =========================================================================
    // Hierarchy fold
    // =========================================================================

    #[test]
    fn siblings_nest_under_parent() {
        let tree = fold(flat(&[(1, "A"), (2, "B"), (2, "C"), (1, "D")]));
        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0].text, "A");
        let kids: Vec<&str> = tree[0].children.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(kids, vec!["B", "C"]);
        assert_eq!(tree[1].text, "D");
        assert!(tree[1].children.is_empty());
    }

    #[test]
    fn deep_chain_nests_transitively() {
        let tree = fold(flat(&[(1, "A"), (2, "B"), (3, "C")]));
        assert_eq!(tree[0].children[0].children[0].text, "C");
    }

    #[test]
    fn skipped_level_still_becomes_child() {
        // H3 directly under H1 with no intervening H2
        let tree = fold(flat(&[(1, "A"), (3, "C")]));
        assert_eq!(tree[0].children[0].text, "C");
        assert_eq!(tree[0].children[0].level, 3);
    }

    #[test]
    fn document_starting_deep_is_a_root() {
        let tree = fold(flat(&[(2, "B"), (1, "A")]));
        assert_eq!(tree[0].text, "B");
        assert_eq!(tree[0].level, 2);
        assert_eq!(tree[1].text, "A");
    }

    #[test]
    fn children_have_strictly_greater_level() {
        fn check(node: &TocEntry) {
            for child in &node.children {
                assert!(child.level > node.level);
                check(child);
            }
        }
        let tree = fold(flat(&[(1, "A"), (2, "B"), (3, "C"), (2, "D"), (1, "E"), (3, "F")]));
        for root in &tree {
            check(root);
        }
    }

    #[test]
    fn duplicate_headings_get_suffixed_ids() {
        let tree = fold(flat(&[(1, "Intro"), (1, "Intro")]));
        assert_eq!(tree[0].id, "intro");
        assert_eq!(tree[1].id, "intro-1");
    }

    // =========================================================================
    // Flat extraction
    // =========================================================================

    #[test]
    fn extracts_levels_and_text() {
        let md = "# One\n\nbody\n\n## Two\n";
        assert_eq!(extract_headings(md, 6), flat(&[(1, "One"), (2, "Two")]));
    }

    #[test]
    fn code_fences_excluded() {
        let md = "```\n# not a heading\n```\n# Real\n";
        assert_eq!(extract_headings(md, 6), flat(&[(1, "Real")]));
    }

    #[test]
    fn hash_without_space_is_not_a_heading() {
        let md = "#include <stdio.h>\n#!shebang\n# Yes\n";
        assert_eq!(extract_headings(md, 6), flat(&[(1, "Yes")]));
    }

    #[test]
    fn empty_heading_text_skipped() {
        assert!(extract_headings("# \n##  \n", 6).is_empty());
    }

    #[test]
    fn max_depth_drops_deeper_headings() {
        let md = "# A\n## B\n### C\n";
        assert_eq!(extract_headings(md, 2), flat(&[(1, "A"), (2, "B")]));
    }

    #[test]
    fn max_depth_removes_node_from_tree_entirely() {
        let tree = build("# A\n## B\n### C\n", 2);
        fn contains(nodes: &[TocEntry], text: &str) -> bool {
            nodes.iter().any(|n| n.text == text || contains(&n.children, text))
        }
        assert!(contains(&tree, "B"));
        assert!(!contains(&tree, "C"));
    }

    #[test]
    fn build_end_to_end() {
        let md = "# Guide\n\n## Setup\n\n```sh\n# comment, not heading\n```\n\n## Usage\n";
        let tree = build(md, DEFAULT_MAX_DEPTH);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].id, "guide");
        let kids: Vec<&str> = tree[0].children.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(kids, vec!["setup", "usage"]);
    }
}
