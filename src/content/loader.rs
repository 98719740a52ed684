//! Content loader - discovers, parses and validates a directory of posts

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use super::{frontmatter, schema, Collection, ContentEntry, ContentError, LoadErrors, LoadFailure};

/// Default file extensions treated as content
pub const DEFAULT_EXTENSIONS: [&str; 2] = ["md", "mdx"];

/// How load failures are handled once a load has finished
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadMode {
    /// Any failure aborts with the full list of offending files
    #[default]
    Strict,
    /// Failing files are logged and left out of the collection
    Permissive,
}

/// Outcome of a load: the entries that made it and the files that did not
#[derive(Debug, Default)]
pub struct LoadReport {
    pub collection: Collection,
    pub failures: Vec<LoadFailure>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Apply the given failure policy
    pub fn resolve(self, mode: LoadMode) -> Result<Collection, LoadErrors> {
        match mode {
            LoadMode::Strict => self.into_strict(),
            LoadMode::Permissive => Ok(self.into_permissive()),
        }
    }

    /// Fail if any file failed
    pub fn into_strict(self) -> Result<Collection, LoadErrors> {
        if self.failures.is_empty() {
            Ok(self.collection)
        } else {
            Err(LoadErrors {
                failures: self.failures,
            })
        }
    }

    /// Log every failure and keep whatever loaded
    pub fn into_permissive(self) -> Collection {
        for failure in &self.failures {
            if failure.is_duplicate() {
                tracing::error!("{}", failure);
            } else {
                tracing::warn!("Skipping {}", failure);
            }
        }
        self.collection
    }
}

/// Loads every content file of one directory into a [`Collection`]
#[derive(Debug, Clone)]
pub struct CollectionLoader {
    root: PathBuf,
    extensions: Vec<String>,
    recursive: bool,
}

impl CollectionLoader {
    /// Loader for `root` with the default extensions, not descending into
    /// subdirectories
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            recursive: false,
        }
    }

    pub fn extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions
            .into_iter()
            .map(|e| e.into().trim_start_matches('.').to_lowercase())
            .collect();
        self
    }

    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Load the directory.
    ///
    /// Never fails as a whole: files that cannot be read, parsed or validated
    /// are returned as failures next to the collection of the rest.
    pub fn load(&self) -> LoadReport {
        if !self.root.is_dir() {
            tracing::warn!("Content directory {:?} does not exist", self.root);
            return LoadReport::default();
        }

        let mut failures = Vec::new();
        let mut by_id: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();

        for path in self.discover() {
            match self.derive_id(&path) {
                Ok(id) => by_id.entry(id).or_default().push(path),
                Err(error) => failures.push(LoadFailure {
                    id: path.to_string_lossy().to_string(),
                    path,
                    error,
                }),
            }
        }

        let mut entries = BTreeMap::new();
        for (id, mut paths) in by_id {
            if paths.len() > 1 {
                for path in paths {
                    failures.push(LoadFailure {
                        id: id.clone(),
                        path,
                        error: ContentError::DuplicateId(id.clone()),
                    });
                }
                continue;
            }

            let Some(path) = paths.pop() else { continue };
            match load_entry(id.clone(), &path) {
                Ok(entry) => {
                    tracing::debug!("Loaded {} from {:?}", id, path);
                    entries.insert(id, entry);
                }
                Err(error) => failures.push(LoadFailure { id, path, error }),
            }
        }

        tracing::info!(
            "Loaded {} entries from {:?} ({} failed)",
            entries.len(),
            self.root,
            failures.len()
        );

        LoadReport {
            collection: Collection::from_unique(entries),
            failures,
        }
    }

    /// Content files under the root in path order
    fn discover(&self) -> Vec<PathBuf> {
        let max_depth = if self.recursive { usize::MAX } else { 1 };

        let mut files = Vec::new();
        for entry in WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(max_depth)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(e))
        {
            match entry {
                Ok(entry) if entry.file_type().is_file() && self.is_content_file(entry.path()) => {
                    files.push(entry.into_path());
                }
                Ok(_) => {}
                Err(e) => tracing::warn!("Failed to read directory entry: {}", e),
            }
        }
        files
    }

    fn is_content_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| self.extensions.iter().any(|x| x.eq_ignore_ascii_case(e)))
            .unwrap_or(false)
    }

    /// Id of a file: its stem, prefixed by its subdirectories in recursive
    /// mode (`go/channels`)
    fn derive_id(&self, path: &Path) -> Result<String, ContentError> {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        let invalid = || ContentError::InvalidFileName(path.to_path_buf());

        let stem = relative
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(invalid)?;

        let mut parts = Vec::new();
        if let Some(parent) = relative.parent() {
            for component in parent.components() {
                parts.push(component.as_os_str().to_str().ok_or_else(invalid)?);
            }
        }
        parts.push(stem);
        Ok(parts.join("/"))
    }
}

/// Read, split and validate a single file
pub fn load_entry(id: String, path: &Path) -> Result<ContentEntry, ContentError> {
    let content = fs::read_to_string(path)?;
    parse_entry(id, &content, path.to_path_buf())
}

/// Build an entry from file content already in memory
pub fn parse_entry(id: String, content: &str, source: PathBuf) -> Result<ContentEntry, ContentError> {
    let (raw, body) = frontmatter::split(content)?;
    let metadata = schema::validate(&raw)?;
    Ok(ContentEntry::new(id, metadata, body.to_string(), source))
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|s| s.starts_with('.'))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn post(title: &str, date: &str, extra: &str) -> String {
        format!(
            "---\ntitle: {}\ndescription: About {}\npubDate: {}\n{}---\n\nBody of {}.\n",
            title, title, date, extra, title
        )
    }

    fn write(dir: &Path, name: &str, content: &str) {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    fn failure_for<'a>(report: &'a LoadReport, id: &str) -> Vec<&'a LoadFailure> {
        report.failures.iter().filter(|f| f.id == id).collect()
    }

    #[test]
    fn test_load_valid_directory() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "go-channels.md", &post("Go Channels", "2024-02-01", "tags: [go]\n"));
        write(dir.path(), "asyncio.mdx", &post("Asyncio", "2024-03-10", ""));
        write(dir.path(), "notes.txt", "not content");
        write(dir.path(), ".hidden.md", &post("Hidden", "2024-03-10", ""));

        let report = CollectionLoader::new(dir.path()).load();
        assert!(report.is_clean(), "{:?}", report.failures);

        let collection = report.collection;
        assert_eq!(collection.len(), 2);
        let entry = collection.get("go-channels").unwrap();
        assert_eq!(entry.id(), "go-channels");
        assert_eq!(entry.metadata().title, "Go Channels");
        assert_eq!(entry.metadata().tags, vec!["go"]);
        assert_eq!(entry.body(), "Body of Go Channels.\n");
        assert_eq!(entry.source(), dir.path().join("go-channels.md"));
        assert!(collection.get("asyncio").is_some());
    }

    #[test]
    fn test_bad_file_does_not_abort_load() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "good.md", &post("Good", "2024-01-01", ""));
        write(dir.path(), "no-date.md", "---\ntitle: t\ndescription: d\n---\nbody\n");
        write(dir.path(), "plain.md", "# no frontmatter\n");

        let report = CollectionLoader::new(dir.path()).load();
        assert_eq!(report.collection.len(), 1);
        assert!(report.collection.get("good").is_some());
        assert_eq!(report.failures.len(), 2);

        let no_date = failure_for(&report, "no-date");
        assert!(matches!(
            &no_date[0].error,
            ContentError::MissingRequiredField(f) if f == "pubDate"
        ));
        let plain = failure_for(&report, "plain");
        assert!(matches!(plain[0].error, ContentError::MissingFrontmatter));
    }

    #[test]
    fn test_strict_and_permissive() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "good.md", &post("Good", "2024-01-01", ""));
        write(dir.path(), "no-date.md", "---\ntitle: t\ndescription: d\n---\n");

        let loader = CollectionLoader::new(dir.path());

        let err = loader.load().into_strict().unwrap_err();
        assert_eq!(err.failures.len(), 1);
        assert_eq!(err.failures[0].id, "no-date");

        let collection = loader.load().into_permissive();
        assert_eq!(collection.len(), 1);
        assert!(collection.get("no-date").is_none());

        assert!(loader.load().resolve(LoadMode::Strict).is_err());
        assert!(loader.load().resolve(LoadMode::Permissive).is_ok());
    }

    #[test]
    fn test_duplicate_ids_reject_both_files() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a.md", &post("A", "2024-01-01", ""));
        write(dir.path(), "a.mdx", &post("A again", "2024-01-02", ""));
        write(dir.path(), "b.md", &post("B", "2024-01-03", ""));

        let report = CollectionLoader::new(dir.path()).load();
        assert!(report.collection.get("a").is_none());
        assert!(report.collection.get("b").is_some());

        let dups = failure_for(&report, "a");
        assert_eq!(dups.len(), 2);
        for failure in dups {
            assert!(matches!(&failure.error, ContentError::DuplicateId(id) if id == "a"));
        }
    }

    #[test]
    fn test_non_recursive_by_default() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "top.md", &post("Top", "2024-01-01", ""));
        write(dir.path(), "go/channels.md", &post("Channels", "2024-01-02", ""));

        let flat = CollectionLoader::new(dir.path()).load().collection;
        assert_eq!(flat.len(), 1);

        let deep = CollectionLoader::new(dir.path())
            .recursive(true)
            .load()
            .collection;
        assert_eq!(deep.len(), 2);
        assert!(deep.get("go/channels").is_some());
    }

    #[test]
    fn test_custom_extensions() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a.md", &post("A", "2024-01-01", ""));
        write(dir.path(), "b.markdown", &post("B", "2024-01-01", ""));

        let collection = CollectionLoader::new(dir.path())
            .extensions([".markdown"])
            .load()
            .collection;
        assert_eq!(collection.len(), 1);
        assert!(collection.get("b").is_some());
    }

    #[test]
    fn test_missing_directory_is_empty() {
        let dir = TempDir::new().unwrap();
        let report = CollectionLoader::new(dir.path().join("nope")).load();
        assert!(report.is_clean());
        assert!(report.collection.is_empty());
    }

    #[test]
    fn test_loading_twice_is_identical() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "one.md", &post("One", "2024-01-01", "tags: [a, b]\nhero: x.png\n"));
        write(dir.path(), "two.md", &post("Two", "2024-01-01", "draft: true\n"));

        let loader = CollectionLoader::new(dir.path());
        let first = loader.load().into_strict().unwrap();
        let second = loader.load().into_strict().unwrap();
        assert_eq!(first, second);
        assert_eq!(first.fingerprint(), second.fingerprint());
    }

    #[test]
    fn test_parse_entry_id_matches_stem() {
        let entry = parse_entry(
            "pooling".to_string(),
            &post("Pooling", "2024-05-05", ""),
            PathBuf::from("content/pooling.md"),
        )
        .unwrap();
        assert_eq!(entry.id(), "pooling");
        assert_eq!(entry.pub_date().to_string(), "2024-05-05");
    }
}
