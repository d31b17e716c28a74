//! Server-sent event stream over a raw HTTP connection.
//!
//! Each stream gets its own writer thread fed by a bounded queue. The hub
//! only ever enqueues, so a client that stops reading costs it nothing: once
//! the queue is full, [`send`](Subscriber::send) fails and the hub drops the
//! client. `EventSource` reconnects on its own after the stream closes.

use std::io::{self, Write};
use std::thread;

use crossbeam::channel::{self, Sender, TrySendError};

use super::Subscriber;

/// Response head written before the stream is handed to the hub.
///
/// No `Content-Length` and no chunked encoding: the body runs until the
/// connection closes.
pub const SSE_HEAD: &str = "HTTP/1.1 200 OK\r\n\
Content-Type: text/event-stream\r\n\
Cache-Control: no-cache\r\n\
Connection: keep-alive\r\n\
Access-Control-Allow-Origin: *\r\n\
\r\n";

/// Frames a client may fall behind before it counts as stalled.
pub const QUEUE_DEPTH: usize = 64;

/// Subscriber backed by any byte sink, usually the socket of an
/// `/events` request.
pub struct SseSubscriber {
    queue: Option<Sender<String>>,
}

impl SseSubscriber {
    /// Write the response head plus an initial comment, then hand the
    /// stream to a dedicated writer thread.
    pub fn open(mut writer: Box<dyn Write + Send>) -> io::Result<Self> {
        writer.write_all(SSE_HEAD.as_bytes())?;
        writer.write_all(b": connected\n\n")?;
        writer.flush()?;

        let (tx, rx) = channel::bounded::<String>(QUEUE_DEPTH);
        thread::Builder::new()
            .name("sse-writer".into())
            .spawn(move || {
                // ends when the queue is closed or the client goes away;
                // dropping `rx` then makes the next `send` fail
                for frame in rx {
                    if writer.write_all(frame.as_bytes()).is_err() || writer.flush().is_err() {
                        return;
                    }
                }
                let _ = writer.flush();
            })?;

        Ok(Self { queue: Some(tx) })
    }
}

impl Subscriber for SseSubscriber {
    /// Enqueue a frame without blocking.
    ///
    /// Fails when the stream was closed, the client disconnected, or the
    /// client is [`QUEUE_DEPTH`] frames behind.
    fn send(&mut self, frame: &str) -> io::Result<()> {
        let queue = self
            .queue
            .as_ref()
            .ok_or_else(|| io::Error::from(io::ErrorKind::NotConnected))?;
        queue.try_send(frame.to_string()).map_err(|e| match e {
            TrySendError::Full(_) => io::Error::new(io::ErrorKind::WouldBlock, "client stalled"),
            TrySendError::Disconnected(_) => io::Error::from(io::ErrorKind::BrokenPipe),
        })
    }

    /// Close the queue; the writer thread flushes what is left and exits.
    fn close(&mut self) {
        self.queue.take();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hub::{Hub, reload_frame};
    use parking_lot::Mutex;
    use std::io::Read;
    use std::net::{Ipv4Addr, TcpListener, TcpStream};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::{Duration, Instant};

    #[derive(Clone, Default)]
    struct Shared(Arc<Mutex<Vec<u8>>>);

    impl Shared {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock()).into_owned()
        }

        /// Wait for the writer thread to catch up.
        fn wait_until(&self, pred: impl Fn(&str) -> bool) -> bool {
            let deadline = Instant::now() + Duration::from_secs(5);
            while Instant::now() < deadline {
                if pred(&self.text()) {
                    return true;
                }
                thread::sleep(Duration::from_millis(5));
            }
            false
        }
    }

    impl Write for Shared {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Accepts the response head, then blocks on the first frame until
    /// `release` is dropped.
    struct Stalled {
        release: channel::Receiver<()>,
    }

    impl Write for Stalled {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if buf.starts_with(b"data:") || buf.starts_with(b": keepalive") {
                let _ = self.release.recv();
                return Err(io::Error::from(io::ErrorKind::BrokenPipe));
            }
            Ok(buf.len())
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn stalled() -> (SseSubscriber, Sender<()>) {
        let (release_tx, release) = channel::unbounded();
        let sub = SseSubscriber::open(Box::new(Stalled { release })).unwrap();
        (sub, release_tx)
    }

    #[test]
    fn test_open_writes_head() {
        let sink = Shared::default();
        SseSubscriber::open(Box::new(sink.clone())).unwrap();

        let text = sink.text();
        assert!(text.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(text.contains("Content-Type: text/event-stream\r\n"));
        assert!(text.contains("Cache-Control: no-cache\r\n"));
        assert!(text.ends_with("\r\n\r\n: connected\n\n"));
    }

    #[test]
    fn test_send_after_close_fails() {
        let sink = Shared::default();
        let mut sub = SseSubscriber::open(Box::new(sink.clone())).unwrap();

        sub.send(&reload_frame()).unwrap();
        assert!(sink.wait_until(|t| t.ends_with("data: reload\n\n")));

        sub.close();
        assert!(sub.send("data: reload\n\n").is_err());
    }

    #[test]
    fn test_frames_queued_before_close_are_written() {
        let sink = Shared::default();
        let mut sub = SseSubscriber::open(Box::new(sink.clone())).unwrap();
        for _ in 0..3 {
            sub.send(&reload_frame()).unwrap();
        }
        sub.close();
        assert!(sink.wait_until(|t| t.matches("data: reload").count() == 3));
    }

    #[test]
    fn test_stalled_client_fails_without_blocking() {
        let (mut sub, release) = stalled();

        let start = Instant::now();
        let failed_at = (0..QUEUE_DEPTH * 2).find(|_| sub.send(&reload_frame()).is_err());
        assert!(start.elapsed() < Duration::from_secs(1));

        // one frame held by the blocked writer, the rest fill the queue
        let failed_at = failed_at.expect("stalled client never failed");
        assert!(failed_at <= QUEUE_DEPTH + 1, "failed after {failed_at} frames");
        drop(release);
    }

    #[test]
    fn test_dead_writer_fails_next_send() {
        let (mut sub, release) = stalled();
        sub.send(&reload_frame()).unwrap();
        // writer errors out and drops its end of the queue
        drop(release);

        let deadline = Instant::now() + Duration::from_secs(5);
        while sub.send(": keepalive\n\n").is_ok() {
            assert!(Instant::now() < deadline, "dead writer never reported");
            thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn test_hub_drops_stalled_client_and_keeps_serving_others() {
        let mut hub = Hub::new();
        let (stalled_sub, release) = stalled();
        let sink = Shared::default();
        hub.subscribe(Box::new(stalled_sub));
        hub.subscribe(Box::new(SseSubscriber::open(Box::new(sink.clone())).unwrap()));

        for sent in 1..=QUEUE_DEPTH * 2 {
            hub.broadcast();
            // pace the healthy client so only the stalled one falls behind
            assert!(sink.wait_until(|t| t.matches("data: reload").count() >= sent));
        }

        assert_eq!(hub.len(), 1);
        assert_eq!(sink.text().matches("data: reload").count(), QUEUE_DEPTH * 2);
        drop(release);
    }

    /// A socket peer that never reads fills the kernel buffers; the hub must
    /// shed it and keep feeding a client that does read.
    #[test]
    fn test_never_reading_socket_is_dropped() {
        let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).unwrap();
        let addr = listener.local_addr().unwrap();

        // idle peer: connected, never reads
        let _idle_peer = TcpStream::connect(addr).unwrap();
        let (idle_server_side, _) = listener.accept().unwrap();

        // draining peer counts every byte it receives
        let mut draining_peer = TcpStream::connect(addr).unwrap();
        let (draining_server_side, _) = listener.accept().unwrap();
        let received = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&received);
        thread::spawn(move || {
            let mut buf = [0u8; 64 * 1024];
            while let Ok(n) = draining_peer.read(&mut buf) {
                if n == 0 {
                    break;
                }
                counter.fetch_add(n, Ordering::Relaxed);
            }
        });

        let mut hub = Hub::new();
        hub.subscribe(Box::new(SseSubscriber::open(Box::new(idle_server_side)).unwrap()));
        hub.subscribe(Box::new(SseSubscriber::open(Box::new(draining_server_side)).unwrap()));

        let preamble = SSE_HEAD.len() + ": connected\n\n".len();
        let frame = reload_frame();
        let mut sent = 0usize;
        let deadline = Instant::now() + Duration::from_secs(60);

        // far more than any loopback buffer holds
        while hub.len() == 2 && sent < 2_000_000 {
            hub.broadcast();
            sent += 1;
            if sent % 32 == 0 {
                let expected = preamble + sent * frame.len();
                while received.load(Ordering::Relaxed) < expected {
                    assert!(Instant::now() < deadline, "healthy client stopped receiving");
                    thread::yield_now();
                }
            }
        }

        assert_eq!(hub.len(), 1, "idle client was never dropped");

        // the healthy client still gets new frames
        for _ in 0..100 {
            assert_eq!(hub.broadcast(), 1);
            sent += 1;
        }
        let expected = preamble + sent * frame.len();
        while received.load(Ordering::Relaxed) < expected {
            assert!(Instant::now() < deadline, "healthy client stopped receiving");
            thread::sleep(Duration::from_millis(1));
        }
    }
}
