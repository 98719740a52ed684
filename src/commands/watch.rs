//! Watch the content directory and reload the collection on change

use anyhow::Result;
use notify_debouncer_mini::{new_debouncer, notify::RecursiveMode, DebounceEventResult};
use std::path::Path;
use std::time::Duration;
use tokio::sync::mpsc;

use crate::content::Collection;
use crate::Quire;

/// Reload the whole collection in permissive mode.
///
/// Runs on the blocking pool; the previous collection is left untouched and
/// replaced by the caller.
pub async fn reload(quire: &Quire) -> Result<Collection> {
    let quire = quire.clone();
    let collection = tokio::task::spawn_blocking(move || quire.load().into_permissive()).await?;
    Ok(collection)
}

/// Watch for file changes until Ctrl+C
pub async fn watch(quire: &Quire) -> Result<()> {
    let content_dir = quire.content_dir();
    if !content_dir.is_dir() {
        anyhow::bail!("Content directory {:?} does not exist", content_dir);
    }

    let (tx, mut rx) = mpsc::unbounded_channel::<DebounceEventResult>();
    let mut debouncer = new_debouncer(Duration::from_millis(300), move |res: DebounceEventResult| {
        let _ = tx.send(res);
    })?;

    let mode = if quire.config.recursive {
        RecursiveMode::Recursive
    } else {
        RecursiveMode::NonRecursive
    };
    debouncer.watcher().watch(&content_dir, mode)?;

    let mut current = reload(quire).await?;
    print_status(&current);
    tracing::info!("Watching {:?} for changes. Press Ctrl+C to stop.", content_dir);

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Stopping watcher");
                break;
            }
            event = rx.recv() => {
                let Some(result) = event else { break };
                let events = match result {
                    Ok(events) => events,
                    Err(e) => {
                        tracing::error!("Watch error: {:?}", e);
                        continue;
                    }
                };

                let changed: Vec<_> = events
                    .iter()
                    .filter(|e| is_relevant(quire, &e.path))
                    .collect();
                if changed.is_empty() {
                    continue;
                }
                for event in &changed {
                    tracing::debug!("File changed: {}", event.path.display());
                }

                let next = reload(quire).await?;
                if next.fingerprint() != current.fingerprint() {
                    print_status(&next);
                }
                current = next;
            }
        }
    }

    Ok(())
}

/// Content files only; editor swap files and hidden files are ignored
fn is_relevant(quire: &Quire, path: &Path) -> bool {
    let hidden = path
        .file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.starts_with('.') || n.ends_with('~'))
        .unwrap_or(true);
    if hidden {
        return false;
    }
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            quire
                .config
                .extensions
                .iter()
                .any(|x| x.trim_start_matches('.').eq_ignore_ascii_case(e))
        })
        .unwrap_or(false)
}

fn print_status(collection: &Collection) {
    println!(
        "🔄 {} entries ({} published, {} drafts)",
        collection.len(),
        collection.list_published().len(),
        collection.list_drafts().len()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_is_relevant() {
        let quire = Quire::with_config(".", Default::default());
        assert!(is_relevant(&quire, Path::new("content/a.md")));
        assert!(is_relevant(&quire, Path::new("content/a.MDX")));
        assert!(!is_relevant(&quire, Path::new("content/.a.md.swp")));
        assert!(!is_relevant(&quire, Path::new("content/a.md~")));
        assert!(!is_relevant(&quire, Path::new("content/image.png")));
    }

    #[tokio::test]
    async fn test_reload_builds_fresh_collection() {
        let dir = TempDir::new().unwrap();
        let content = dir.path().join("content");
        fs::create_dir_all(&content).unwrap();
        fs::write(
            content.join("a.md"),
            "---\ntitle: a\ndescription: d\npubDate: 2024-01-01\n---\n",
        )
        .unwrap();

        let quire = Quire::new(dir.path()).unwrap();
        let first = reload(&quire).await.unwrap();
        assert_eq!(first.len(), 1);

        fs::write(content.join("b.md"), "broken").unwrap();
        fs::write(
            content.join("c.md"),
            "---\ntitle: c\ndescription: d\npubDate: 2024-01-02\n---\n",
        )
        .unwrap();

        let second = reload(&quire).await.unwrap();
        assert_eq!(second.len(), 2);
        assert_eq!(first.len(), 1);
        assert_ne!(first.fingerprint(), second.fingerprint());
    }
}
