//! Content entry model

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Validated front-matter of a post
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    /// Post title, never blank
    pub title: String,

    /// Short summary, never blank
    pub description: String,

    /// Publication date (calendar date only)
    pub pub_date: NaiveDate,

    /// Lowercase tags in source order
    pub tags: Vec<String>,

    /// Drafts are left out of published listings
    pub draft: bool,

    /// Front-matter keys this crate does not interpret, in source order
    #[serde(flatten)]
    pub extra: IndexMap<String, serde_yaml::Value>,
}

impl Metadata {
    /// Whether the post carries `tag`, ignoring case
    pub fn has_tag(&self, tag: &str) -> bool {
        let wanted = tag.to_lowercase();
        self.tags.iter().any(|t| t.to_lowercase() == wanted)
    }
}

/// A single post, immutable once loaded
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentEntry {
    id: String,
    #[serde(flatten)]
    metadata: Metadata,
    body: String,
    #[serde(skip)]
    source: PathBuf,
}

impl ContentEntry {
    pub fn new(id: String, metadata: Metadata, body: String, source: PathBuf) -> Self {
        Self {
            id,
            metadata,
            body,
            source,
        }
    }

    /// Slug derived from the file name
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Raw text after the front-matter block
    pub fn body(&self) -> &str {
        &self.body
    }

    /// File the entry was loaded from
    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn is_draft(&self) -> bool {
        self.metadata.draft
    }

    pub fn pub_date(&self) -> NaiveDate {
        self.metadata.pub_date
    }
}

#[cfg(test)]
pub(crate) fn sample(id: &str, date: &str, tags: &[&str], draft: bool) -> ContentEntry {
    let metadata = Metadata {
        title: format!("Post {}", id),
        description: format!("About {}", id),
        pub_date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        draft,
        extra: IndexMap::new(),
    };
    ContentEntry::new(
        id.to_string(),
        metadata,
        format!("Body of {}", id),
        PathBuf::from(format!("content/{}.md", id)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_tag_ignores_case() {
        let entry = sample("a", "2024-01-15", &["go", "redis"], false);
        assert!(entry.metadata().has_tag("Go"));
        assert!(entry.metadata().has_tag("REDIS"));
        assert!(!entry.metadata().has_tag(" go "));
        assert!(!entry.metadata().has_tag("python"));
    }

    #[test]
    fn test_serialize_entry() {
        let mut entry = sample("pooling", "2024-03-02", &["databases"], false);
        entry
            .metadata
            .extra
            .insert("heroImage".to_string(), serde_yaml::Value::from("/pool.png"));

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["id"], "pooling");
        assert_eq!(json["pubDate"], "2024-03-02");
        assert_eq!(json["tags"][0], "databases");
        assert_eq!(json["draft"], false);
        assert_eq!(json["heroImage"], "/pool.png");
        assert_eq!(json["body"], "Body of pooling");
        assert!(json.get("source").is_none());
    }
}
