//! Filesystem scanning and content-index generation.
//!
//! Stage 1 of the build pipeline. Scans the content root to discover content
//! files per category, producing the [`ContentIndex`] manifest that every
//! derived artifact (navigation index, metadata index) and the runtime's
//! on-demand fetch path consume.
//!
//! ## Directory Structure
//!
//! ```text
//! content/                         # Content root
//! ├── site.toml                    # Site configuration (optional)
//! ├── blog/
//! │   ├── 2024-01-15-launch.md     # Date prefix = publish order
//! │   └── 2024-03-02-update.md
//! ├── docs/
//! │   ├── 01-getting-started.md    # Number prefix = menu order
//! │   └── 02-concepts/             # Folder-based page
//! │       ├── index.md             #   (colocated assets live alongside)
//! │       └── diagram.png
//! ├── projects/
//! │   └── 01-first-project.md
//! └── guides/                      # Dynamic section (from site.toml)
//!     └── 01-deploys.md
//! ```
//!
//! ## Listing Rules
//!
//! Per category folder, direct children only:
//!
//! - `.md` / `.mdx` files are included by filename
//! - a subdirectory with `index.md` or `index.mdx` is included as
//!   `"<dirname>/index.md"` (folder-based content)
//! - a subdirectory without an index file is silently skipped
//! - everything else — including compressed sidecars like `post.md.gz` —
//!   is excluded
//!
//! Blog entries sort descending by filename so date-prefixed names list
//! newest-first; all other categories sort ascending so numeric prefixes
//! order naturally. A missing category folder yields an empty list.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::SiteConfig;
use crate::types::{Category, ContentIndex};

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

const CONTENT_EXTENSIONS: &[&str] = &["md", "mdx"];

/// Scan the content root into a [`ContentIndex`].
///
/// Covers the five fixed categories plus every section configured in
/// `site.toml`. A section whose name collides with a fixed category is
/// skipped — fixed categories take precedence.
pub fn scan(content_root: &Path, config: &SiteConfig) -> Result<ContentIndex, ScanError> {
    let mut index = ContentIndex::default();

    for category in categories(config) {
        let dir = content_root.join(category.dir());
        let mut files = list_entries(&dir)?;
        if category.descending_by_filename() {
            files.reverse();
        }
        index.set_files(&category, files);
    }
    Ok(index)
}

/// The categories a config implies: fixed ones, then valid dynamic sections.
pub fn categories(config: &SiteConfig) -> Vec<Category> {
    let mut cats = vec![
        Category::Blog,
        Category::Projects,
        Category::Articles,
        Category::Docs,
        Category::Features,
    ];
    for name in &config.sections {
        if Category::FIXED_DIRS.contains(&name.as_str()) {
            log::warn!("section '{name}' collides with a fixed category, skipping");
            continue;
        }
        cats.push(Category::Section(name.clone()));
    }
    cats
}

/// List the content entries directly under one category folder, ascending
/// by filename. A missing folder is an empty listing, not an error.
pub fn list_entries(dir: &Path) -> Result<Vec<String>, ScanError> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut entries = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().to_string();
        if name.starts_with('.') {
            continue;
        }

        if path.is_dir() {
            if let Some(index_name) = find_index_file(&path) {
                entries.push(format!("{name}/{index_name}"));
            }
            // Directories without an index file are silently skipped
        } else if is_content_file(&path) {
            entries.push(name);
        }
    }

    entries.sort();
    Ok(entries)
}

/// True for `.md`/`.mdx` files. A compound extension like `.md.gz` has the
/// final extension `gz` and is excluded.
fn is_content_file(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| CONTENT_EXTENSIONS.contains(&ext.as_str()))
}

/// The index file of a folder-based entry, if one exists.
fn find_index_file(dir: &Path) -> Option<String> {
    for candidate in ["index.md", "index.mdx"] {
        if dir.join(candidate).is_file() {
            return Some(candidate.to_string());
        }
    }
    None
}

/// Resolve the on-disk path of an indexed file.
pub fn entry_path(content_root: &Path, category: &Category, file: &str) -> PathBuf {
    content_root.join(category.dir()).join(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn config_with_sections(sections: &[&str]) -> SiteConfig {
        SiteConfig {
            sections: sections.iter().map(|s| s.to_string()).collect(),
            ..SiteConfig::default()
        }
    }

    #[test]
    fn folders_and_files_sort_ascending_together() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("docs/01-a/index.md"), "# a");
        touch(&tmp.path().join("docs/02-b.md"), "# b");

        let index = scan(tmp.path(), &SiteConfig::default()).unwrap();
        assert_eq!(index.docs, vec!["01-a/index.md", "02-b.md"]);
    }

    #[test]
    fn blog_sorts_descending_by_filename() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("blog/2024-01-01-a.md"), "a");
        touch(&tmp.path().join("blog/2024-01-10-b.md"), "b");

        let index = scan(tmp.path(), &SiteConfig::default()).unwrap();
        assert_eq!(index.blog, vec!["2024-01-10-b.md", "2024-01-01-a.md"]);
    }

    #[test]
    fn compressed_sidecar_excluded() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("docs/guide.md"), "g");
        touch(&tmp.path().join("docs/guide.md.gz"), "zzz");

        let index = scan(tmp.path(), &SiteConfig::default()).unwrap();
        assert_eq!(index.docs, vec!["guide.md"]);
    }

    #[test]
    fn non_content_extensions_excluded() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("docs/guide.md"), "g");
        touch(&tmp.path().join("docs/notes.txt"), "t");
        touch(&tmp.path().join("docs/image.png"), "p");

        let index = scan(tmp.path(), &SiteConfig::default()).unwrap();
        assert_eq!(index.docs, vec!["guide.md"]);
    }

    #[test]
    fn mdx_files_included() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("articles/deep-dive.mdx"), "d");

        let index = scan(tmp.path(), &SiteConfig::default()).unwrap();
        assert_eq!(index.articles, vec!["deep-dive.mdx"]);
    }

    #[test]
    fn folder_without_index_skipped() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("docs/assets/logo.svg"), "s");
        touch(&tmp.path().join("docs/01-real.md"), "r");

        let index = scan(tmp.path(), &SiteConfig::default()).unwrap();
        assert_eq!(index.docs, vec!["01-real.md"]);
    }

    #[test]
    fn folder_with_index_mdx_records_actual_name() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("docs/02-concepts/index.mdx"), "c");

        let index = scan(tmp.path(), &SiteConfig::default()).unwrap();
        assert_eq!(index.docs, vec!["02-concepts/index.mdx"]);
    }

    #[test]
    fn missing_category_folder_is_empty_not_error() {
        let tmp = TempDir::new().unwrap();
        let index = scan(tmp.path(), &SiteConfig::default()).unwrap();
        assert!(index.is_empty());
    }

    #[test]
    fn dynamic_sections_scanned() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("guides/01-deploys.md"), "d");

        let index = scan(tmp.path(), &config_with_sections(&["guides"])).unwrap();
        assert_eq!(
            index.sections.get("guides").unwrap(),
            &vec!["01-deploys.md".to_string()]
        );
    }

    #[test]
    fn section_colliding_with_fixed_category_skipped() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("docs/01-a.md"), "a");

        let index = scan(tmp.path(), &config_with_sections(&["docs"])).unwrap();
        assert!(index.sections.is_empty());
        assert_eq!(index.docs, vec!["01-a.md"]);
    }

    #[test]
    fn hidden_files_skipped() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("docs/.draft.md"), "d");
        touch(&tmp.path().join("docs/real.md"), "r");

        let index = scan(tmp.path(), &SiteConfig::default()).unwrap();
        assert_eq!(index.docs, vec!["real.md"]);
    }
}
