//! CLI output formatting for the pipeline stages.
//!
//! Output is information-centric: the primary display for every category is
//! its name and entry count, with file paths as indented context lines.
//!
//! ```text
//! Content
//! blog (2 entries)
//!     2024-03-02-update.md
//!     2024-01-15-launch.md
//! docs (3 entries)
//!     01-getting-started.md
//!     02-concepts/index.md
//!     03-deploys.md
//!
//! Indexed 5 files in 2 categories
//! ```
//!
//! Each stage has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure — no I/O, no side effects.

use crate::generate::CheckReport;
use crate::types::ContentIndex;

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Format the scan stage summary: per-category entry listings.
pub fn format_scan_output(index: &ContentIndex) -> Vec<String> {
    let mut lines = vec!["Content".to_string()];
    let mut files = 0;
    let mut categories = 0;

    for category in index.categories() {
        let entries = index.files(&category);
        if entries.is_empty() {
            continue;
        }
        categories += 1;
        files += entries.len();
        lines.push(format!("{} ({} entries)", category, entries.len()));
        for entry in entries {
            lines.push(format!("{}{}", indent(1), entry));
        }
    }

    if categories == 0 {
        lines.push("(no content found)".to_string());
    }
    lines.push(String::new());
    lines.push(format!("Indexed {files} files in {categories} categories"));
    lines
}

pub fn print_scan_output(index: &ContentIndex) {
    for line in format_scan_output(index) {
        println!("{line}");
    }
}

/// Format the index-generation summary.
pub fn format_index_output(nav_items: usize, metadata_records: usize, copied: usize) -> Vec<String> {
    vec![format!(
        "Generated {nav_items} menu items, {metadata_records} metadata records, copied {copied} entries"
    )]
}

pub fn print_index_output(nav_items: usize, metadata_records: usize, copied: usize) {
    for line in format_index_output(nav_items, metadata_records, copied) {
        println!("{line}");
    }
}

/// Format a check report: per-file errors, duplicate slugs, verdict.
pub fn format_check_output(report: &CheckReport) -> Vec<String> {
    let mut lines = Vec::new();
    for error in &report.errors {
        lines.push(format!("error: {error}"));
    }
    for dup in &report.duplicate_slugs {
        lines.push(format!("warning: duplicate slug {dup}"));
    }
    if report.is_clean() {
        lines.push(format!("{} files OK", report.files));
    } else {
        lines.push(format!(
            "{} files checked, {} errors, {} duplicate slugs",
            report.files,
            report.errors.len(),
            report.duplicate_slugs.len()
        ));
    }
    lines
}

pub fn print_check_output(report: &CheckReport) {
    for line in format_check_output(report) {
        println!("{line}");
    }
}
