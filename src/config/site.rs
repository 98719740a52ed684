//! Site configuration (_config.yml)

use anyhow::{Context, Result};
use chrono::format::{Item, StrftimeItems};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use std::fs;
use std::path::Path;

use crate::content::loader::DEFAULT_EXTENSIONS;
use crate::content::LoadMode;

/// Main site configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Directory holding the posts, relative to the base directory
    pub content_dir: String,

    /// File extensions treated as content
    pub extensions: Vec<String>,

    /// Descend into subdirectories of `content_dir`
    pub recursive: bool,

    /// What a failing file does to a load
    pub load_mode: LoadMode,

    /// chrono format used when printing dates
    pub date_format: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            content_dir: "content".to_string(),
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            recursive: false,
            load_mode: LoadMode::Strict,
            date_format: "%Y-%m-%d".to_string(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let config: SiteConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Invalid configuration in {:?}", path))?;
        config
            .validate()
            .with_context(|| format!("Invalid configuration in {:?}", path))?;
        tracing::debug!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Reject settings that would only fail once content is printed
    pub fn validate(&self) -> Result<()> {
        check_date_format(&self.date_format)
    }
}

/// `date_format` must be a strftime pattern a calendar date can fill in:
/// no unknown specifiers and no time-of-day fields
fn check_date_format(format: &str) -> Result<()> {
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        anyhow::bail!("date_format {:?} is not a valid strftime pattern", format);
    }

    let sample = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap_or_default();
    let mut out = String::new();
    if write!(out, "{}", sample.format(format)).is_err() {
        anyhow::bail!(
            "date_format {:?} cannot be used for dates (time-of-day fields are not available)",
            format
        );
    }
    Ok(())
}
