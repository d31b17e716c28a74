//! Actor Coordinator - Wires up the Live Reload Actor System
//!
//! The Coordinator is a **thin orchestrator** that:
//! - Starts the watcher
//! - Runs the HubActor and FsActor on one runtime
//! - Translates the process shutdown signal into `HubMsg::Shutdown`
//!
//! ```text
//! FsActor ──► HubActor ◄── HTTP workers (hub_tx clones)
//!                ▲
//!     shutdown ──┘
//! ```

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use crossbeam::channel::Receiver;
use tokio::sync::mpsc;

use super::fs::FsActor;
use super::hub::HubActor;
use super::messages::HubMsg;

/// Channel buffer size
pub const CHANNEL_BUFFER: usize = 32;

/// Coordinator - wires up and runs the actor system
pub struct Coordinator {
    hub_tx: mpsc::Sender<HubMsg>,
    hub_rx: mpsc::Receiver<HubMsg>,
    /// Directory to watch; `None` runs the hub without a watcher
    watch_dir: Option<PathBuf>,
    tracked: Vec<String>,
    heartbeat: Option<Duration>,
    shutdown_rx: Option<Receiver<()>>,
}

impl Coordinator {
    /// Create the hub channel. Hand out [`hub_sender`](Self::hub_sender)
    /// clones before calling [`run`](Self::run).
    pub fn new() -> Self {
        let (hub_tx, hub_rx) = mpsc::channel(CHANNEL_BUFFER);
        Self {
            hub_tx,
            hub_rx,
            watch_dir: None,
            tracked: Vec::new(),
            heartbeat: None,
            shutdown_rx: None,
        }
    }

    pub fn hub_sender(&self) -> mpsc::Sender<HubMsg> {
        self.hub_tx.clone()
    }

    /// Watch `dir` for changes to the named files
    pub fn with_watch(mut self, dir: PathBuf, tracked: Vec<String>) -> Self {
        self.watch_dir = Some(dir);
        self.tracked = tracked;
        self
    }

    /// Keepalive interval; zero disables it
    pub fn with_heartbeat(mut self, interval: Duration) -> Self {
        self.heartbeat = (!interval.is_zero()).then_some(interval);
        self
    }

    /// Set shutdown signal receiver
    pub fn with_shutdown_signal(mut self, rx: Receiver<()>) -> Self {
        self.shutdown_rx = Some(rx);
        self
    }

    /// Run the actor system until shutdown.
    pub async fn run(self) -> Result<()> {
        let Self {
            hub_tx,
            hub_rx,
            watch_dir,
            tracked,
            heartbeat,
            shutdown_rx,
        } = self;

        let fs_actor = match &watch_dir {
            Some(dir) => Some(
                FsActor::new(dir, tracked, hub_tx.clone())
                    .with_context(|| format!("failed to watch {}", dir.display()))?,
            ),
            None => None,
        };

        crate::debug!("actor"; "start");
        let hub_handle = tokio::spawn(HubActor::new(hub_rx, heartbeat).run());
        let fs_handle = fs_actor.map(|fs| tokio::spawn(fs.run()));

        if let Some(rx) = shutdown_rx {
            // crossbeam receiver is sync; poll it without blocking the runtime
            loop {
                if rx.try_recv().is_ok() || crate::core::is_shutdown() {
                    crate::debug!("actor"; "shutdown signal received");
                    break;
                }
                if hub_handle.is_finished() {
                    break;
                }
                tokio::time::sleep(Duration::from_millis(100)).await;
            }
            let _ = hub_tx.send(HubMsg::Shutdown).await;
        }
        drop(hub_tx);

        let _ = hub_handle.await;
        if let Some(handle) = fs_handle {
            handle.abort();
        }
        crate::debug!("actor"; "stopped");
        Ok(())
    }
}

impl Default for Coordinator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hub::Subscriber;
    use parking_lot::Mutex;
    use std::io;
    use std::sync::Arc;
    use tempfile::TempDir;

    struct Recorder(Arc<Mutex<Vec<String>>>);

    impl Subscriber for Recorder {
        fn send(&mut self, frame: &str) -> io::Result<()> {
            self.0.lock().push(frame.to_string());
            Ok(())
        }
        fn close(&mut self) {}
    }

    #[tokio::test]
    async fn test_file_change_reaches_subscriber() {
        let temp = TempDir::new().unwrap();
        let readme = temp.path().join("README.md");
        std::fs::write(&readme, "# One").unwrap();

        let (shutdown_tx, shutdown_rx) = crossbeam::channel::bounded(1);
        let coordinator = Coordinator::new()
            .with_watch(temp.path().to_path_buf(), vec!["README.md".into()])
            .with_shutdown_signal(shutdown_rx);
        let hub_tx = coordinator.hub_sender();
        let handle = tokio::spawn(coordinator.run());

        let frames = Arc::new(Mutex::new(Vec::new()));
        hub_tx
            .send(HubMsg::Subscribe(Box::new(Recorder(Arc::clone(&frames)))))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(200)).await;
        std::fs::write(&readme, "# Two").unwrap();

        let deadline = tokio::time::Instant::now() + Duration::from_secs(10);
        while frames.lock().is_empty() && tokio::time::Instant::now() < deadline {
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        assert!(frames.lock().iter().any(|f| f == "data: reload\n\n"));

        shutdown_tx.send(()).unwrap();
        handle.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_missing_watch_dir_is_error() {
        let temp = TempDir::new().unwrap();
        let result = Coordinator::new()
            .with_watch(temp.path().join("missing"), vec!["README.md".into()])
            .run()
            .await;
        assert!(result.is_err());
    }
}
