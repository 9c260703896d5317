//! Async content transport.
//!
//! The retrieval services are transport-agnostic: anything that can serve
//! text by site-root-relative path (`content/index.json`,
//! `content/blog/2024-01-15-launch.md`) can back them. [`FileFetcher`]
//! serves a generated output tree straight from disk; an HTTP transport
//! lives outside this crate.
//!
//! `list` exists only for the last fallback tier — reconstructing a
//! category with no usable content index. Transports that cannot enumerate
//! (HTTP) keep the default [`FetchError::Unsupported`] and the services
//! degrade to an empty collection.

use std::io;
use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

use crate::scan;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("listing not supported by this transport")]
    Unsupported,
}

/// Read-only access to a published site tree.
#[async_trait]
pub trait ContentFetcher: Send + Sync {
    /// Fetch one text resource by site-root-relative path.
    async fn fetch(&self, path: &str) -> Result<String, FetchError>;

    /// Enumerate content entries under a directory, ascending by filename,
    /// applying the scanner's listing rules.
    async fn list(&self, dir: &str) -> Result<Vec<String>, FetchError> {
        let _ = dir;
        Err(FetchError::Unsupported)
    }
}

/// Filesystem-backed fetcher rooted at a site output directory.
pub struct FileFetcher {
    root: PathBuf,
}

impl FileFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl ContentFetcher for FileFetcher {
    async fn fetch(&self, path: &str) -> Result<String, FetchError> {
        match tokio::fs::read_to_string(self.root.join(path)).await {
            Ok(text) => Ok(text),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                Err(FetchError::NotFound(path.to_string()))
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn list(&self, dir: &str) -> Result<Vec<String>, FetchError> {
        Ok(scan::list_entries(&self.root.join(dir)).map_err(|scan::ScanError::Io(err)| err)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn fetches_relative_paths() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("content/blog")).unwrap();
        fs::write(tmp.path().join("content/blog/a.md"), "hello").unwrap();

        let fetcher = FileFetcher::new(tmp.path());
        assert_eq!(fetcher.fetch("content/blog/a.md").await.unwrap(), "hello");
    }

    #[tokio::test]
    async fn missing_file_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let fetcher = FileFetcher::new(tmp.path());
        assert!(matches!(
            fetcher.fetch("content/index.json").await,
            Err(FetchError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn list_applies_scanner_rules() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("content/docs");
        fs::create_dir_all(dir.join("01-a")).unwrap();
        fs::write(dir.join("01-a/index.md"), "a").unwrap();
        fs::write(dir.join("02-b.md"), "b").unwrap();
        fs::write(dir.join("02-b.md.gz"), "z").unwrap();

        let fetcher = FileFetcher::new(tmp.path());
        let entries = fetcher.list("content/docs").await.unwrap();
        assert_eq!(entries, vec!["01-a/index.md", "02-b.md"]);
    }

    #[tokio::test]
    async fn list_of_missing_dir_is_empty() {
        let tmp = TempDir::new().unwrap();
        let fetcher = FileFetcher::new(tmp.path());
        assert!(fetcher.list("content/blog").await.unwrap().is_empty());
    }
}
