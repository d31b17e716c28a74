//! Hub Actor
//!
//! Sole owner of the [`Hub`]. Every membership change happens on this task,
//! so the subscriber set needs no lock.

use std::time::Duration;

use tokio::sync::mpsc;

use super::messages::HubMsg;
use crate::hub::Hub;
use crate::logger;

/// Hub Actor - serializes subscribe/broadcast/heartbeat
pub struct HubActor {
    rx: mpsc::Receiver<HubMsg>,
    hub: Hub,
    /// `None` disables keepalive frames
    heartbeat: Option<Duration>,
}

impl HubActor {
    pub fn new(rx: mpsc::Receiver<HubMsg>, heartbeat: Option<Duration>) -> Self {
        Self {
            rx,
            hub: Hub::new(),
            heartbeat,
        }
    }

    /// Run until `Shutdown` arrives or every sender is dropped.
    pub async fn run(mut self) {
        // A period past the end of time never ticks
        let now = tokio::time::Instant::now();
        self.heartbeat = self.heartbeat.filter(|period| now.checked_add(*period).is_some());

        // Disabled heartbeat still needs a timer to select on
        let period = self.heartbeat.unwrap_or(Duration::from_secs(3600));
        let mut ticker = tokio::time::interval_at(now + period, period);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                msg = self.rx.recv() => match msg {
                    Some(HubMsg::Subscribe(subscriber)) => {
                        self.hub.subscribe(subscriber);
                    }
                    Some(HubMsg::Reload { changed }) => self.reload(&changed),
                    Some(HubMsg::Shutdown) | None => break,
                },
                _ = ticker.tick(), if self.heartbeat.is_some() => {
                    self.hub.heartbeat();
                }
            }
        }

        crate::debug!("hub"; "closing {} client(s)", self.hub.len());
        self.hub.close_all();
    }

    fn reload(&mut self, changed: &[std::path::PathBuf]) {
        let names: Vec<_> = changed
            .iter()
            .filter_map(|p| p.file_name())
            .map(|n| n.to_string_lossy())
            .collect();
        let delivered = self.hub.broadcast();
        logger::status_success(&format!(
            "{} changed, reloading {} client(s)",
            names.join(", "),
            delivered
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hub::Subscriber;
    use parking_lot::Mutex;
    use std::io;
    use std::sync::Arc;

    struct Recorder(Arc<Mutex<Vec<String>>>);

    impl Subscriber for Recorder {
        fn send(&mut self, frame: &str) -> io::Result<()> {
            self.0.lock().push(frame.to_string());
            Ok(())
        }
        fn close(&mut self) {
            self.0.lock().push("closed".to_string());
        }
    }

    #[tokio::test]
    async fn test_subscribe_then_reload_then_shutdown() {
        let (tx, rx) = mpsc::channel(8);
        let handle = tokio::spawn(HubActor::new(rx, None).run());

        let frames = Arc::new(Mutex::new(Vec::new()));
        tx.send(HubMsg::Subscribe(Box::new(Recorder(Arc::clone(&frames)))))
            .await
            .unwrap();
        tx.send(HubMsg::Reload {
            changed: vec!["README.md".into()],
        })
        .await
        .unwrap();
        tx.send(HubMsg::Shutdown).await.unwrap();
        handle.await.unwrap();

        assert_eq!(*frames.lock(), vec!["data: reload\n\n", "closed"]);
    }

    #[tokio::test]
    async fn test_stops_when_senders_dropped() {
        let (tx, rx) = mpsc::channel(8);
        let handle = tokio::spawn(HubActor::new(rx, Some(Duration::from_secs(60))).run());
        drop(tx);
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_unrepresentable_heartbeat_is_disabled() {
        let (tx, rx) = mpsc::channel(8);
        let handle = tokio::spawn(HubActor::new(rx, Some(Duration::MAX)).run());
        tx.send(HubMsg::Shutdown).await.unwrap();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_heartbeat_ticks() {
        let (tx, rx) = mpsc::channel(8);
        let handle = tokio::spawn(HubActor::new(rx, Some(Duration::from_secs(15))).run());

        let frames = Arc::new(Mutex::new(Vec::new()));
        tx.send(HubMsg::Subscribe(Box::new(Recorder(Arc::clone(&frames)))))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_secs(31)).await;
        tx.send(HubMsg::Shutdown).await.unwrap();
        handle.await.unwrap();

        let frames = frames.lock();
        let keepalives = frames.iter().filter(|f| f.starts_with(": keepalive")).count();
        assert_eq!(keepalives, 2);
    }
}
