//! Filesystem event subscription
//!
//! Wraps a recursive `notify` watcher and forwards candidate Markdown paths
//! over a bounded channel to a single-consumer ingest loop. Delivery is
//! serialized and at-least-once; duplicated events are harmless because
//! insertion is idempotent.

use std::path::{Path, PathBuf};

use crossbeam_channel::{bounded, Receiver, Sender};
use notify::event::{ModifyKind, RenameMode};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::warn;

use crate::error::NoteResult;
use crate::ingest::has_markdown_extension;

/// Messages delivered to the ingest loop
#[derive(Debug, Clone)]
pub enum WatchMessage {
    /// A path that may need linking into today's daily note
    Candidate(PathBuf),
    /// Stop the ingest loop
    Shutdown,
}

/// Watches a directory tree and forwards Markdown file events
pub struct VaultWatcher {
    _watcher: RecommendedWatcher,
    pub receiver: Receiver<WatchMessage>,
    sender: Sender<WatchMessage>,
}

impl VaultWatcher {
    /// Start watching `root` recursively
    ///
    /// Only paths carrying one of `extensions` are forwarded; everything
    /// else is filtered at the subscription boundary.
    pub fn new(root: &Path, extensions: &[String]) -> NoteResult<Self> {
        let (tx, rx) = bounded::<WatchMessage>(256);

        let watcher = create_watcher(tx.clone(), root, extensions.to_vec())?;

        Ok(VaultWatcher {
            _watcher: watcher,
            receiver: rx,
            sender: tx,
        })
    }

    /// Sender handle for injecting messages from outside the watcher
    ///
    /// Used by the signal handler to push [`WatchMessage::Shutdown`].
    pub fn shutdown_handle(&self) -> Sender<WatchMessage> {
        self.sender.clone()
    }
}

fn create_watcher(
    tx: Sender<WatchMessage>,
    root: &Path,
    extensions: Vec<String>,
) -> NoteResult<RecommendedWatcher> {
    let mut watcher = notify::recommended_watcher(move |res: Result<Event, notify::Error>| {
        match res {
            Ok(event) => {
                // Creations, modifications, and renames; for a rename pair
                // only the destination path is of interest.
                let candidates: Vec<PathBuf> = match event.kind {
                    EventKind::Create(_) => event.paths,
                    EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => {
                        event.paths.into_iter().last().into_iter().collect()
                    }
                    EventKind::Modify(_) => event.paths,
                    _ => return,
                };

                for path in candidates {
                    if has_markdown_extension(&path, &extensions) {
                        let _ = tx.send(WatchMessage::Candidate(path));
                    }
                }
            }
            Err(e) => warn!("watch error: {e}"),
        }
    })?;

    watcher.watch(root, RecursiveMode::Recursive)?;

    Ok(watcher)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_watcher_starts_on_existing_directory() {
        let dir = tempdir().unwrap();
        let watcher = VaultWatcher::new(dir.path(), &["md".to_string()]);
        assert!(watcher.is_ok());
    }

    #[test]
    fn test_watcher_fails_on_missing_directory() {
        let watcher = VaultWatcher::new(Path::new("/nonexistent/vault"), &["md".to_string()]);
        assert!(watcher.is_err());
    }

    #[test]
    fn test_shutdown_message_roundtrip() {
        let dir = tempdir().unwrap();
        let watcher = VaultWatcher::new(dir.path(), &["md".to_string()]).unwrap();

        watcher
            .shutdown_handle()
            .send(WatchMessage::Shutdown)
            .unwrap();

        assert!(matches!(
            watcher.receiver.recv().unwrap(),
            WatchMessage::Shutdown
        ));
    }
}
