//! Collection of loaded entries and the read-only queries over it

use serde::Serialize;
use std::cmp::Ordering;
use std::collections::hash_map::DefaultHasher;
use std::collections::{BTreeMap, BTreeSet};
use std::hash::{Hash, Hasher};

use super::{ContentEntry, ContentError};

/// All entries of one load, keyed by id.
///
/// A collection is never mutated after construction; reloading content
/// builds a new one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Collection {
    entries: BTreeMap<String, ContentEntry>,
}

/// Usage count of a tag across published entries
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagCount {
    pub name: String,
    pub count: usize,
}

/// Published neighbours of an entry in listing order
#[derive(Debug, Clone, Copy)]
pub struct Adjacent<'a> {
    /// Next entry towards the top of the listing (more recent)
    pub newer: Option<&'a ContentEntry>,
    /// Next entry towards the bottom of the listing (older)
    pub older: Option<&'a ContentEntry>,
}

impl Collection {
    /// Build a collection, rejecting duplicate ids
    pub fn from_entries<I>(entries: I) -> Result<Self, ContentError>
    where
        I: IntoIterator<Item = ContentEntry>,
    {
        let mut map = BTreeMap::new();
        for entry in entries {
            let id = entry.id().to_string();
            if map.insert(id.clone(), entry).is_some() {
                return Err(ContentError::DuplicateId(id));
            }
        }
        Ok(Self { entries: map })
    }

    /// Wrap entries whose ids were already checked for collisions
    pub(crate) fn from_unique(entries: BTreeMap<String, ContentEntry>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries, drafts included, in id order
    pub fn iter(&self) -> impl Iterator<Item = &ContentEntry> {
        self.entries.values()
    }

    /// Look up an entry by id
    pub fn get(&self, id: &str) -> Option<&ContentEntry> {
        self.entries.get(id)
    }

    /// Like [`Collection::get`], but reports a missing id as an error
    pub fn require(&self, id: &str) -> Result<&ContentEntry, ContentError> {
        self.get(id)
            .ok_or_else(|| ContentError::NotFound(id.to_string()))
    }

    /// Non-draft entries, newest first, ties broken by id
    pub fn list_published(&self) -> Vec<&ContentEntry> {
        sorted(self.iter().filter(|e| !e.is_draft()))
    }

    /// Published entries carrying `tag`, compared case-insensitively
    pub fn list_by_tag(&self, tag: &str) -> Vec<&ContentEntry> {
        sorted(
            self.iter()
                .filter(|e| !e.is_draft() && e.metadata().has_tag(tag)),
        )
    }

    /// Draft entries in listing order
    pub fn list_drafts(&self) -> Vec<&ContentEntry> {
        sorted(self.iter().filter(|e| e.is_draft()))
    }

    /// Tags of published entries, most used first.
    ///
    /// A tag repeated inside one entry counts once for that entry.
    pub fn tags(&self) -> Vec<TagCount> {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for entry in self.iter().filter(|e| !e.is_draft()) {
            let unique: BTreeSet<&str> = entry.metadata().tags.iter().map(String::as_str).collect();
            for tag in unique {
                *counts.entry(tag).or_insert(0) += 1;
            }
        }

        let mut tags: Vec<TagCount> = counts
            .into_iter()
            .map(|(name, count)| TagCount {
                name: name.to_string(),
                count,
            })
            .collect();
        tags.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
        tags
    }

    /// Neighbours of a published entry, `None` if `id` is not published
    pub fn adjacent(&self, id: &str) -> Option<Adjacent<'_>> {
        let published = self.list_published();
        let pos = published.iter().position(|e| e.id() == id)?;
        Some(Adjacent {
            newer: pos.checked_sub(1).map(|i| published[i]),
            older: published.get(pos + 1).copied(),
        })
    }

    /// Hash over every entry's id, metadata and body.
    ///
    /// Two loads of unchanged files produce the same value.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        for entry in self.iter() {
            let meta = entry.metadata();
            entry.id().hash(&mut hasher);
            meta.title.hash(&mut hasher);
            meta.description.hash(&mut hasher);
            meta.pub_date.hash(&mut hasher);
            meta.tags.hash(&mut hasher);
            meta.draft.hash(&mut hasher);
            for (key, value) in &meta.extra {
                key.hash(&mut hasher);
                value.hash(&mut hasher);
            }
            entry.body().hash(&mut hasher);
        }
        hasher.finish()
    }
}

fn listing_order(a: &ContentEntry, b: &ContentEntry) -> Ordering {
    b.pub_date()
        .cmp(&a.pub_date())
        .then_with(|| a.id().cmp(b.id()))
}

fn sorted<'a>(entries: impl Iterator<Item = &'a ContentEntry>) -> Vec<&'a ContentEntry> {
    let mut entries: Vec<_> = entries.collect();
    entries.sort_by(|a, b| listing_order(a, b));
    entries
}
