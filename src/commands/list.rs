//! List and show site content

use anyhow::Result;
use chrono::NaiveDate;
use std::fmt::Write;

use crate::content::{Collection, ContentEntry};
use crate::Quire;

/// List published posts, optionally filtered by tag, or the drafts
pub fn posts(quire: &Quire, tag: Option<&str>, drafts: bool) -> Result<()> {
    let collection = quire.collection()?;

    let (heading, entries) = match (tag, drafts) {
        (_, true) => ("Drafts".to_string(), collection.list_drafts()),
        (Some(tag), false) => (format!("Posts tagged {:?}", tag), collection.list_by_tag(tag)),
        (None, false) => ("Posts".to_string(), collection.list_published()),
    };

    println!("{} ({}):", heading, entries.len());
    for entry in entries {
        println!("  {}", summary_line(quire, entry));
    }

    Ok(())
}

/// List tags with the number of published posts using them
pub fn tags(quire: &Quire) -> Result<()> {
    let collection = quire.collection()?;
    let tags = collection.tags();

    println!("Tags ({}):", tags.len());
    for tag in tags {
        println!("  {} ({})", tag.name, tag.count);
    }

    Ok(())
}

/// Print one post: metadata, neighbours and body
pub fn show(quire: &Quire, id: &str) -> Result<()> {
    let collection = quire.collection()?;
    print!("{}", describe(quire, &collection, id)?);
    Ok(())
}

/// Date in the configured format, ISO-8601 if the format cannot print it
fn format_date(quire: &Quire, date: NaiveDate) -> String {
    let mut out = String::new();
    if write!(out, "{}", date.format(&quire.config.date_format)).is_err() {
        return date.format("%Y-%m-%d").to_string();
    }
    out
}

fn summary_line(quire: &Quire, entry: &ContentEntry) -> String {
    let meta = entry.metadata();
    let mut line = format!(
        "{} - {} [{}]",
        format_date(quire, meta.pub_date),
        meta.title,
        entry.id()
    );
    if !meta.tags.is_empty() {
        line.push_str(&format!(" #{}", meta.tags.join(" #")));
    }
    line
}

fn describe(quire: &Quire, collection: &Collection, id: &str) -> Result<String> {
    let entry = collection.require(id)?;
    let meta = entry.metadata();

    let mut out = String::new();
    out.push_str(&format!("id:          {}\n", entry.id()));
    out.push_str(&format!("source:      {}\n", entry.source().display()));
    out.push_str(&format!("title:       {}\n", meta.title));
    out.push_str(&format!("description: {}\n", meta.description));
    out.push_str(&format!(
        "pubDate:     {}\n",
        format_date(quire, meta.pub_date)
    ));
    out.push_str(&format!("tags:        {}\n", meta.tags.join(", ")));
    out.push_str(&format!("draft:       {}\n", meta.draft));
    for key in meta.extra.keys() {
        out.push_str(&format!("extra:       {}\n", key));
    }

    if let Some(adjacent) = collection.adjacent(id) {
        if let Some(newer) = adjacent.newer {
            out.push_str(&format!("newer:       {}\n", newer.id()));
        }
        if let Some(older) = adjacent.older {
            out.push_str(&format!("older:       {}\n", older.id()));
        }
    }

    out.push('\n');
    out.push_str(entry.body());
    Ok(out)
}
