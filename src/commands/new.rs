//! Create a new draft post

use anyhow::Result;
use chrono::NaiveDate;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

use crate::Quire;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Scaffold<'a> {
    title: &'a str,
    description: &'a str,
    pub_date: String,
    tags: Vec<String>,
    draft: bool,
}

/// Render the front-matter and empty body of a new post
pub fn scaffold(title: &str, description: &str, date: NaiveDate, tags: &[String]) -> Result<String> {
    let front = Scaffold {
        title,
        description,
        pub_date: date.format("%Y-%m-%d").to_string(),
        tags: tags
            .iter()
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect(),
        draft: true,
    };
    let yaml = serde_yaml::to_string(&front)?;
    Ok(format!("---\n{}---\n\n", yaml))
}

/// Create a draft post named after the slug of its title
pub fn create_post(
    quire: &Quire,
    title: &str,
    description: Option<&str>,
    tags: &[String],
) -> Result<PathBuf> {
    let slug = slug::slugify(title);
    if slug.is_empty() {
        anyhow::bail!("Cannot derive a file name from title {:?}", title);
    }

    let target_dir = quire.content_dir();
    fs::create_dir_all(&target_dir)?;

    let extension = quire
        .config
        .extensions
        .first()
        .map(String::as_str)
        .unwrap_or("md");
    let file_path = target_dir.join(format!("{}.{}", slug, extension));

    // Check if file already exists
    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    let today = chrono::Local::now().date_naive();
    let content = scaffold(title, description.unwrap_or(title), today, tags)?;
    fs::write(&file_path, content)?;

    tracing::info!("Created draft {:?}", file_path);
    Ok(file_path)
}
