//! FileSystem Actor
//!
//! Watches the tutorial directory and forwards changes to the tracked
//! document or its metadata file to the HubActor. No debouncing: every
//! relevant notify event becomes one reload.
//!
//! The directory is watched rather than the file itself, so editors that
//! save by rename, and documents created after start-up, are still seen.

use std::path::{Path, PathBuf};

use notify::event::{EventKind, ModifyKind};
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use super::messages::HubMsg;
use crate::logger;

/// FileSystem Actor - watches the tracked files
pub struct FsActor {
    /// Channel to receive notify events (sync -> async bridge)
    notify_rx: std::sync::mpsc::Receiver<notify::Result<notify::Event>>,
    /// Watcher handle (must be kept alive)
    _watcher: RecommendedWatcher,
    /// Channel to send messages to HubActor
    hub_tx: mpsc::Sender<HubMsg>,
    /// File names inside `dir` that trigger a reload
    tracked: Vec<String>,
}

impl FsActor {
    /// Start watching `dir` immediately; events buffer until [`run`](Self::run).
    pub fn new(
        dir: &Path,
        tracked: Vec<String>,
        hub_tx: mpsc::Sender<HubMsg>,
    ) -> notify::Result<Self> {
        let (notify_tx, notify_rx) = std::sync::mpsc::channel();

        let mut watcher = notify::recommended_watcher(move |res| {
            let _ = notify_tx.send(res);
        })?;
        watcher.watch(dir, RecursiveMode::NonRecursive)?;

        Ok(Self {
            notify_rx,
            _watcher: watcher,
            hub_tx,
            tracked,
        })
    }

    /// Run the actor event loop
    pub async fn run(self) {
        let notify_rx = self.notify_rx;
        let hub_tx = self.hub_tx;
        let tracked = self.tracked;
        let _watcher = self._watcher;

        let (async_tx, mut async_rx) = mpsc::channel::<notify::Event>(64);

        // notify delivers on a std channel; bridge it on a plain thread
        std::thread::spawn(move || {
            while let Ok(result) = notify_rx.recv() {
                match result {
                    Ok(event) => {
                        if async_tx.blocking_send(event).is_err() {
                            break;
                        }
                    }
                    Err(e) => logger::status_error("watch failed", &e.to_string()),
                }
            }
        });

        while let Some(event) = async_rx.recv().await {
            let changed = relevant_paths(&event, &tracked);
            if changed.is_empty() {
                continue;
            }

            crate::debug!("watch"; "{:?}: {:?}", event.kind, changed);
            if matches!(event.kind, EventKind::Remove(_)) {
                for path in &changed {
                    logger::status_warning(&format!("{} was removed", path.display()));
                }
            }

            if hub_tx.send(HubMsg::Reload { changed }).await.is_err() {
                break;
            }
        }
    }
}

/// Whether an event kind represents a content change.
///
/// Access events and metadata-only modifications (chmod, atime) are ignored.
fn is_content_change(kind: &EventKind) -> bool {
    match kind {
        EventKind::Access(_) => false,
        EventKind::Modify(ModifyKind::Metadata(_)) => false,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_) => true,
        EventKind::Any | EventKind::Other => true,
    }
}

/// Paths of the event that name a tracked file.
fn relevant_paths(event: &notify::Event, tracked: &[String]) -> Vec<PathBuf> {
    if !is_content_change(&event.kind) {
        return Vec::new();
    }
    event
        .paths
        .iter()
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|name| tracked.iter().any(|t| t == name))
        })
        .cloned()
        .collect()
}
