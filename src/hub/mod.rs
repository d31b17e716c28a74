//! Notification hub: the set of open live-reload streams.
//!
//! The hub owns every connected client exclusively. Writes that fail are
//! swallowed and the failing client is unsubscribed on the spot, so the set
//! only ever holds streams that accepted their last frame.
//!
//! ```text
//! subscribe(conn) ──► id
//! broadcast()     ──► "data: reload\n\n" to each ──► failed ones unsubscribed
//! heartbeat()     ──► ": keepalive\n\n"  to each ──► failed ones unsubscribed
//! ```
//!
//! The hub is not thread-safe on purpose: it lives inside
//! [`HubActor`](crate::actor::hub::HubActor), which is its only user.

mod sse;

pub use sse::SseSubscriber;

use std::io;

use rustc_hash::FxHashMap;

/// Payload clients react to by reloading the page.
pub const RELOAD_SENTINEL: &str = "reload";

/// A long-lived output stream owned by the hub.
pub trait Subscriber: Send {
    /// Hand off one complete event-stream frame. Must not block on a slow
    /// client; a client that cannot keep up reports an error instead.
    fn send(&mut self, frame: &str) -> io::Result<()>;

    /// Release the underlying transport. Called exactly once, on removal.
    fn close(&mut self);
}

/// Handle returned by [`Hub::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriberId(u64);

/// Frame carrying the reload sentinel.
pub fn reload_frame() -> String {
    format!("data: {RELOAD_SENTINEL}\n\n")
}

/// Comment frame; ignored by `EventSource`, but it fails on a closed socket.
pub const KEEPALIVE_FRAME: &str = ": keepalive\n\n";

/// Set of connected preview clients.
#[derive(Default)]
pub struct Hub {
    next_id: u64,
    subscribers: FxHashMap<SubscriberId, Box<dyn Subscriber>>,
}

impl Hub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    /// Add a connection and return its handle.
    pub fn subscribe(&mut self, subscriber: Box<dyn Subscriber>) -> SubscriberId {
        let id = SubscriberId(self.next_id);
        self.next_id += 1;
        self.subscribers.insert(id, subscriber);
        crate::debug!("hub"; "client connected (total: {})", self.subscribers.len());
        id
    }

    /// Remove a connection and close it. Returns whether it was present.
    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        match self.subscribers.remove(&id) {
            Some(mut subscriber) => {
                subscriber.close();
                crate::debug!("hub"; "client disconnected (total: {})", self.subscribers.len());
                true
            }
            None => false,
        }
    }

    /// Send the reload sentinel to every subscriber.
    ///
    /// Returns the number of successful deliveries.
    pub fn broadcast(&mut self) -> usize {
        self.send_all(&reload_frame())
    }

    /// Send a keepalive comment to every subscriber, pruning dead ones.
    pub fn heartbeat(&mut self) -> usize {
        self.send_all(KEEPALIVE_FRAME)
    }

    /// Close and drop every subscriber.
    pub fn close_all(&mut self) {
        let ids: Vec<_> = self.subscribers.keys().copied().collect();
        for id in ids {
            self.unsubscribe(id);
        }
    }

    fn send_all(&mut self, frame: &str) -> usize {
        if self.is_empty() {
            return 0;
        }

        let mut failed = Vec::new();
        for (id, subscriber) in &mut self.subscribers {
            if let Err(e) = subscriber.send(frame) {
                crate::debug!("hub"; "dropping client: {}", e);
                failed.push(*id);
            }
        }

        let delivered = self.subscribers.len() - failed.len();
        for id in failed {
            self.unsubscribe(id);
        }
        delivered
    }
}

impl Drop for Hub {
    fn drop(&mut self) {
        self.close_all();
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    /// What a recording subscriber has seen, shared with the test body.
    #[derive(Default)]
    struct Log {
        frames: Vec<String>,
        closed: usize,
    }

    struct Recorder(Arc<Mutex<Log>>);

    impl Subscriber for Recorder {
        fn send(&mut self, frame: &str) -> io::Result<()> {
            self.0.lock().frames.push(frame.to_string());
            Ok(())
        }

        fn close(&mut self) {
            self.0.lock().closed += 1;
        }
    }

    struct Broken(Arc<Mutex<Log>>);

    impl Subscriber for Broken {
        fn send(&mut self, _frame: &str) -> io::Result<()> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }

        fn close(&mut self) {
            self.0.lock().closed += 1;
        }
    }

    fn recorder() -> (Box<dyn Subscriber>, Arc<Mutex<Log>>) {
        let log = Arc::new(Mutex::new(Log::default()));
        (Box::new(Recorder(Arc::clone(&log))), log)
    }

    #[test]
    fn test_broadcast_without_subscribers_is_noop() {
        let mut hub = Hub::new();
        assert_eq!(hub.broadcast(), 0);
        assert!(hub.is_empty());
    }

    #[test]
    fn test_broadcast_reaches_every_subscriber_once() {
        let mut hub = Hub::new();
        let logs: Vec<_> = (0..5)
            .map(|_| {
                let (sub, log) = recorder();
                hub.subscribe(sub);
                log
            })
            .collect();

        assert_eq!(hub.broadcast(), 5);
        for log in &logs {
            assert_eq!(log.lock().frames, vec!["data: reload\n\n".to_string()]);
        }
    }

    #[test]
    fn test_unsubscribed_receives_nothing() {
        let mut hub = Hub::new();
        let (a, log_a) = recorder();
        let (b, log_b) = recorder();
        let id_a = hub.subscribe(a);
        hub.subscribe(b);

        assert!(hub.unsubscribe(id_a));
        assert_eq!(hub.broadcast(), 1);

        assert!(log_a.lock().frames.is_empty());
        assert_eq!(log_a.lock().closed, 1);
        assert_eq!(log_b.lock().frames.len(), 1);
    }

    #[test]
    fn test_unsubscribe_absent_is_noop() {
        let mut hub = Hub::new();
        let (a, log) = recorder();
        let id = hub.subscribe(a);

        assert!(hub.unsubscribe(id));
        assert!(!hub.unsubscribe(id));
        assert!(!hub.unsubscribe(SubscriberId(999)));
        assert_eq!(log.lock().closed, 1);
    }

    #[test]
    fn test_failing_subscriber_does_not_block_others() {
        let mut hub = Hub::new();
        let broken_log = Arc::new(Mutex::new(Log::default()));
        let (a, log_a) = recorder();
        let (b, log_b) = recorder();
        hub.subscribe(a);
        let broken = hub.subscribe(Box::new(Broken(Arc::clone(&broken_log))));
        hub.subscribe(b);

        assert_eq!(hub.broadcast(), 2);
        assert_eq!(log_a.lock().frames.len(), 1);
        assert_eq!(log_b.lock().frames.len(), 1);

        // removed and closed, never retried
        assert_eq!(hub.len(), 2);
        assert_eq!(broken_log.lock().closed, 1);
        assert_eq!(hub.broadcast(), 2);
        assert!(!hub.unsubscribe(broken));
    }

    #[test]
    fn test_heartbeat_prunes_dead_clients() {
        let mut hub = Hub::new();
        let (a, log_a) = recorder();
        hub.subscribe(a);
        hub.subscribe(Box::new(Broken(Arc::default())));

        assert_eq!(hub.heartbeat(), 1);
        assert_eq!(hub.len(), 1);
        assert_eq!(log_a.lock().frames, vec![KEEPALIVE_FRAME.to_string()]);
    }

    #[test]
    fn test_ids_are_unique() {
        let mut hub = Hub::new();
        let (a, _) = recorder();
        let (b, _) = recorder();
        let id_a = hub.subscribe(a);
        hub.unsubscribe(id_a);
        let id_b = hub.subscribe(b);
        assert_ne!(id_a, id_b);
    }

    #[test]
    fn test_close_all_and_drop_close_everyone() {
        let (a, log_a) = recorder();
        let (b, log_b) = recorder();
        {
            let mut hub = Hub::new();
            hub.subscribe(a);
            hub.close_all();
            assert!(hub.is_empty());
            hub.subscribe(b);
        }
        assert_eq!(log_a.lock().closed, 1);
        assert_eq!(log_b.lock().closed, 1);
    }
}
