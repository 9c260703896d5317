//! Site configuration module.
//!
//! Handles loading and validating `site.toml` from the content root. The
//! config names the site, registers dynamic content sections beyond the
//! five fixed categories, and tunes parsing defaults.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! site_name = "My Site"
//! site_url = "https://example.com"
//!
//! # Extra content categories served from folders of the same name.
//! # Names colliding with blog/projects/articles/docs/features are skipped.
//! sections = []
//!
//! [content]
//! toc_depth = 3             # Max heading depth in tables of contents (1-6)
//! words_per_minute = 200    # Reading-time estimate speed
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse — override just the values you want. Unknown
//! keys are rejected to catch typos early.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::parser::ParseOptions;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `site.toml`.
///
/// All fields have sensible defaults. User config files need only specify
/// the values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    pub site_name: String,
    pub site_url: String,
    /// Dynamic section names served alongside the fixed categories.
    pub sections: Vec<String>,
    /// Parsing defaults.
    pub content: ContentConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContentConfig {
    pub toc_depth: u8,
    pub words_per_minute: u32,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site_name: String::new(),
            site_url: String::new(),
            sections: Vec::new(),
            content: ContentConfig::default(),
        }
    }
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            toc_depth: 3,
            words_per_minute: 200,
        }
    }
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=6).contains(&self.content.toc_depth) {
            return Err(ConfigError::Validation("content.toc_depth must be 1-6".into()));
        }
        if self.content.words_per_minute == 0 {
            return Err(ConfigError::Validation(
                "content.words_per_minute must be non-zero".into(),
            ));
        }
        Ok(())
    }

    /// Parse options derived from this config.
    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            toc_depth: self.content.toc_depth,
            words_per_minute: self.content.words_per_minute,
        }
    }
}

const CONFIG_FILENAME: &str = "site.toml";

/// Load `site.toml` from the content root, falling back to defaults when
/// the file doesn't exist.
pub fn load_config(content_root: &Path) -> Result<SiteConfig, ConfigError> {
    let path = content_root.join(CONFIG_FILENAME);
    if !path.exists() {
        return Ok(SiteConfig::default());
    }
    let raw = fs::read_to_string(&path)?;
    let config: SiteConfig = toml::from_str(&raw)?;
    config.validate()?;
    Ok(config)
}

/// Stock `site.toml` with all options documented, for `gen-config`.
pub fn stock_config_text() -> &'static str {
    r#"# mdsite configuration. All options are optional; defaults shown.

# Used by downstream generators (sitemap, RSS) and page templates.
site_name = ""
site_url = ""

# Extra content categories beyond blog/projects/articles/docs/features.
# Each name maps to a folder of the same name under the content root.
sections = []

[content]
# Max heading depth included in tables of contents (1-6).
toc_depth = 3
# Reading-time estimates assume this many words per minute.
words_per_minute = 200
"#
}
