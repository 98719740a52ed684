//! Export the published collection as JSON for renderers

use anyhow::Result;
use serde::Serialize;
use std::fs;
use std::path::Path;

use crate::content::{Collection, ContentEntry, TagCount};
use crate::Quire;

/// JSON document handed to renderers
#[derive(Debug, Serialize)]
pub struct ExportIndex<'a> {
    /// Stable hash of the whole collection, drafts included
    pub fingerprint: String,
    /// Published entries, newest first
    pub entries: Vec<&'a ContentEntry>,
    pub tags: Vec<TagCount>,
}

impl<'a> ExportIndex<'a> {
    pub fn new(collection: &'a Collection) -> Self {
        Self {
            fingerprint: format!("{:016x}", collection.fingerprint()),
            entries: collection.list_published(),
            tags: collection.tags(),
        }
    }
}

/// Serialize the published part of a collection
pub fn to_json(collection: &Collection) -> Result<String> {
    Ok(serde_json::to_string_pretty(&ExportIndex::new(collection))?)
}

/// Write the export to `output`, or stdout when absent
pub fn run(quire: &Quire, output: Option<&Path>) -> Result<()> {
    let collection = quire.collection()?;
    let json = to_json(&collection)?;

    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, json)?;
            tracing::info!(
                "Exported {} published entries to {:?}",
                collection.list_published().len(),
                path
            );
        }
        None => println!("{}", json),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::loader::parse_entry;
    use std::path::PathBuf;

    fn entry(id: &str, date: &str, extra: &str) -> ContentEntry {
        let content =
            format!("---\ntitle: {id}\ndescription: d\npubDate: {date}\n{extra}---\nBody\n");
        parse_entry(id.to_string(), &content, PathBuf::from(format!("{id}.md"))).unwrap()
    }

    #[test]
    fn test_export_skips_drafts() {
        let collection = Collection::from_entries(vec![
            entry("old", "2023-01-01", "tags: [docker]\n"),
            entry("new", "2024-01-01", "tags: [Docker, ci]\n"),
            entry("wip", "2025-01-01", "draft: true\n"),
        ])
        .unwrap();

        let json: serde_json::Value = serde_json::from_str(&to_json(&collection).unwrap()).unwrap();
        let entries = json["entries"].as_array().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["id"], "new");
        assert_eq!(entries[1]["id"], "old");
        assert_eq!(json["tags"][0]["name"], "docker");
        assert_eq!(json["tags"][0]["count"], 2);
        assert_eq!(json["fingerprint"].as_str().unwrap().len(), 16);
    }

    #[test]
    fn test_export_keeps_file_id_and_body() {
        let collection = Collection::from_entries(vec![entry(
            "real-id",
            "2024-01-01",
            "id: legacy-42\nbody: teaser\nsource: old.md\n",
        )])
        .unwrap();

        let text = to_json(&collection).unwrap();
        assert_eq!(text.matches("\"id\":").count(), 1);
        assert_eq!(text.matches("\"body\":").count(), 1);

        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(json["entries"][0]["id"], "real-id");
        assert_eq!(json["entries"][0]["body"], "Body\n");
        assert!(json["entries"][0].get("source").is_none());
    }

    #[test]
    fn test_export_to_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let content = dir.path().join("content");
        fs::create_dir_all(&content).unwrap();
        fs::write(
            content.join("post.md"),
            "---\ntitle: t\ndescription: d\npubDate: 2024-01-01\n---\nhi\n",
        )
        .unwrap();

        let quire = Quire::new(dir.path()).unwrap();
        let out = dir.path().join("dist/index.json");
        run(&quire, Some(&out)).unwrap();

        let written = fs::read_to_string(out).unwrap();
        assert!(written.contains("\"id\": \"post\""));
    }
}
