//! quire: loads a directory of Markdown/MDX posts into a validated,
//! queryable collection
//!
//! Each post starts with a front-matter block (`title`, `description`,
//! `pubDate`, `tags`, `draft`). Files are parsed and checked strictly; the
//! ones that pass form an immutable [`content::Collection`] that renderers
//! query for published listings, tag pages and single posts.

pub mod commands;
pub mod config;
pub mod content;

use anyhow::Result;
use std::path::{Path, PathBuf};

use content::{Collection, CollectionLoader, LoadReport};

/// A content site rooted at a base directory
#[derive(Debug, Clone)]
pub struct Quire {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
}

impl Quire {
    /// Open a site, reading `_config.yml` from the base directory when present
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    pub fn with_config<P: AsRef<Path>>(base_dir: P, config: config::SiteConfig) -> Self {
        Self {
            config,
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    /// Directory the posts are loaded from
    pub fn content_dir(&self) -> PathBuf {
        self.base_dir.join(&self.config.content_dir)
    }

    /// Loader configured from the site settings
    pub fn loader(&self) -> CollectionLoader {
        CollectionLoader::new(self.content_dir())
            .extensions(self.config.extensions.iter().cloned())
            .recursive(self.config.recursive)
    }

    /// Load every post, keeping failures separate
    pub fn load(&self) -> LoadReport {
        self.loader().load()
    }

    /// Load and apply the configured failure policy
    pub fn collection(&self) -> Result<Collection> {
        Ok(self.load().resolve(self.config.load_mode)?)
    }
}
