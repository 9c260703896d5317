//! Build-time index generation.
//!
//! Stage 2 of the build pipeline. Takes the [`ContentIndex`] from the scan
//! stage and derives the pre-built JSON artifacts the runtime prefers over
//! re-parsing source files:
//!
//! | Artifact | Path | Contents |
//! |----------|------|----------|
//! | content index | `content/index.json` | per-category file lists |
//! | navigation index | `navigation-index.json` | menu items per category |
//! | metadata index | `content-metadata.json` | lightweight per-entry records |
//!
//! Generators parse **frontmatter only** — bodies are never rendered to
//! HTML here (reading time comes from plain text). One bad file never fails
//! a run: it is skipped with a diagnostic and the remaining files continue.
//!
//! ## Atomicity and cancellation
//!
//! Every artifact is written in full to a temp file and renamed into place —
//! never incrementally. Long iterations check a cancellation flag at each
//! per-file boundary and bail with [`GenerateError::Cancelled`] before any
//! partial output is written.

use std::fs;
use std::io;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;
use thiserror::Error;

use crate::frontmatter::{self, Frontmatter};
use crate::markdown;
use crate::scan::entry_path;
use crate::slug;
use crate::types::{Category, ContentIndex, ContentSummary, MenuItem, MetadataIndex, NavigationIndex};

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("generation cancelled")]
    Cancelled,
}

/// Artifact locations relative to the output root.
pub const CONTENT_INDEX_FILE: &str = "content/index.json";
pub const NAVIGATION_INDEX_FILE: &str = "navigation-index.json";
pub const METADATA_INDEX_FILE: &str = "content-metadata.json";

/// Write a JSON artifact atomically: full temp-file write, then rename.
fn write_json_atomic<T: Serialize>(value: &T, path: &Path) -> Result<(), GenerateError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(value)?;
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, json)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

/// Persist the content index to `<output_root>/content/index.json`.
pub fn write_content_index(index: &ContentIndex, output_root: &Path) -> Result<(), GenerateError> {
    write_json_atomic(index, &output_root.join(CONTENT_INDEX_FILE))
}

/// Frontmatter-only read of one indexed file.
///
/// Returns `None` — after logging — for unreadable files and files whose
/// frontmatter block exists but cannot be parsed. The body is returned
/// untouched for reading-time estimation.
fn read_front(content_root: &Path, category: &Category, file: &str) -> Option<(Frontmatter, String)> {
    let path = entry_path(content_root, category, file);
    let raw = match fs::read_to_string(&path) {
        Ok(raw) => raw,
        Err(err) => {
            log::warn!("{category}/{file}: skipping unreadable file: {err}");
            return None;
        }
    };
    let extracted = frontmatter::extract(&raw);
    match extracted.meta {
        Some(front) => Some((front, extracted.body.to_string())),
        None => {
            log::warn!("{category}/{file}: skipping file with malformed frontmatter");
            None
        }
    }
}

/// Build the navigation index from frontmatter alone.
///
/// Covers projects, articles, docs, and dynamic sections — blog posts and
/// feature cards carry no navigation entries.
pub fn generate_navigation_index(
    content_root: &Path,
    index: &ContentIndex,
    cancel: &AtomicBool,
) -> Result<NavigationIndex, GenerateError> {
    let mut nav = NavigationIndex::default();

    for category in index.categories() {
        if matches!(category, Category::Blog | Category::Features) {
            continue;
        }
        let mut items = Vec::new();
        for file in index.files(&category) {
            if cancel.load(Ordering::Relaxed) {
                return Err(GenerateError::Cancelled);
            }
            let Some((front, _body)) = read_front(content_root, &category, file) else {
                continue;
            };
            let (order, slug) = slug::order_and_slug_from_filename(file);
            items.push(MenuItem::from_front(&slug, order, &front));
        }
        items.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.slug.cmp(&b.slug)));
        nav.set_menu(&category, items);
    }
    Ok(nav)
}

/// Build the metadata index from frontmatter plus plain-text word counts.
pub fn generate_metadata_index(
    content_root: &Path,
    index: &ContentIndex,
    words_per_minute: u32,
    cancel: &AtomicBool,
) -> Result<MetadataIndex, GenerateError> {
    let mut metadata = MetadataIndex::default();

    for category in index.categories() {
        let mut records = Vec::new();
        for file in index.files(&category) {
            if cancel.load(Ordering::Relaxed) {
                return Err(GenerateError::Cancelled);
            }
            let Some((front, body)) = read_front(content_root, &category, file) else {
                continue;
            };
            let (order, slug) = slug::order_and_slug_from_filename(file);
            let reading_time = markdown::reading_time(&body, words_per_minute);
            records.push(ContentSummary::from_front(&slug, order, &front, reading_time));
        }
        dedup_by_slug(&mut records);
        sort_records(&category, &mut records);
        metadata.set_records(&category, records);
    }
    Ok(metadata)
}

/// First occurrence per slug wins, in index order — the same rule the
/// runtime applies on full-collection loads.
fn dedup_by_slug(records: &mut Vec<ContentSummary>) {
    let mut seen = std::collections::HashSet::new();
    records.retain(|r| seen.insert(r.slug.to_lowercase()));
}

fn sort_records(category: &Category, records: &mut [ContentSummary]) {
    if category.descending_by_filename() {
        records.sort_by(|a, b| b.publish_date.cmp(&a.publish_date));
    } else {
        records.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.slug.cmp(&b.slug)));
    }
}

/// Persist a navigation index to `<output_root>/navigation-index.json`.
pub fn write_navigation_index(nav: &NavigationIndex, output_root: &Path) -> Result<(), GenerateError> {
    write_json_atomic(nav, &output_root.join(NAVIGATION_INDEX_FILE))
}

/// Persist a metadata index to `<output_root>/content-metadata.json`.
pub fn write_metadata_index(metadata: &MetadataIndex, output_root: &Path) -> Result<(), GenerateError> {
    write_json_atomic(metadata, &output_root.join(METADATA_INDEX_FILE))
}

/// Copy every indexed content file into `<output_root>/content/` so the
/// output tree is self-servable.
///
/// Folder-based entries copy their whole folder (colocated assets travel
/// with the page). Per-file failures log and continue.
pub fn copy_content(
    content_root: &Path,
    index: &ContentIndex,
    output_root: &Path,
    cancel: &AtomicBool,
) -> Result<usize, GenerateError> {
    let mut copied = 0;
    for category in index.categories() {
        for file in index.files(&category) {
            if cancel.load(Ordering::Relaxed) {
                return Err(GenerateError::Cancelled);
            }
            let result = match file.split_once('/') {
                Some((folder, _)) => copy_dir(
                    &content_root.join(category.dir()).join(folder),
                    &output_root.join("content").join(category.dir()).join(folder),
                ),
                None => {
                    let dest = output_root.join("content").join(category.dir()).join(file);
                    fs::create_dir_all(dest.parent().expect("entry path has a parent"))
                        .and_then(|_| fs::copy(entry_path(content_root, &category, file), &dest))
                        .map(|_| ())
                }
            };
            match result {
                Ok(()) => copied += 1,
                Err(err) => log::warn!("{category}/{file}: copy failed: {err}"),
            }
        }
    }
    Ok(copied)
}

fn copy_dir(src: &Path, dst: &Path) -> io::Result<()> {
    fs::create_dir_all(dst)?;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let from = entry.path();
        let to = dst.join(entry.file_name());
        if from.is_dir() {
            copy_dir(&from, &to)?;
        } else {
            fs::copy(&from, &to)?;
        }
    }
    Ok(())
}

/// Result of a full-content validation pass (`mdsite check`).
#[derive(Debug, Default)]
pub struct CheckReport {
    pub files: usize,
    /// `"<category>/<file>: <error>"` lines.
    pub errors: Vec<String>,
    /// Slugs that resolve to more than one file within a category.
    pub duplicate_slugs: Vec<String>,
}

impl CheckReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.duplicate_slugs.is_empty()
    }
}

/// Fully parse every indexed file and report problems without writing
/// anything. Duplicate slugs are warnings, not errors — the runtime
/// resolves them first-occurrence-wins.
pub fn check(
    content_root: &Path,
    index: &ContentIndex,
    options: &crate::parser::ParseOptions,
) -> CheckReport {
    let mut report = CheckReport::default();

    for category in index.categories() {
        let mut seen = std::collections::HashSet::new();
        for file in index.files(&category) {
            report.files += 1;
            let path = entry_path(content_root, &category, file);
            let raw = match fs::read_to_string(&path) {
                Ok(raw) => raw,
                Err(err) => {
                    report.errors.push(format!("{category}/{file}: {err}"));
                    continue;
                }
            };
            match crate::parser::parse_document(&format!("content/{category}/{file}"), &raw, options) {
                Ok(doc) => {
                    if !seen.insert(doc.slug.to_lowercase()) {
                        report.duplicate_slugs.push(format!("{category}/{}", doc.slug));
                    }
                }
                Err(err) => report.errors.push(format!("{category}/{file}: {err}")),
            }
        }
    }
    report
}
