//! Shutdown state.
//!
//! `SHUTDOWN` flips once Ctrl+C is received. If a preview server has been
//! registered, the handler also wakes the actor system and unblocks the
//! HTTP accept loop so `preview` can return normally. Any other command is
//! interrupted: registered child processes are killed and the process exits
//! with [`INTERRUPTED_EXIT_CODE`].

use std::process::Child;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, LazyLock, OnceLock, Weak};

use parking_lot::Mutex;
use tiny_http::Server;

/// Conventional status for a process ended by SIGINT (128 + 2).
pub const INTERRUPTED_EXIT_CODE: i32 = 130;

/// Shutdown has been requested (Ctrl+C received)
static SHUTDOWN: AtomicBool = AtomicBool::new(false);

/// HTTP server reference for graceful shutdown
static SERVER: OnceLock<Arc<Server>> = OnceLock::new();

/// Shutdown signal sender for actor system
static SHUTDOWN_TX: OnceLock<crossbeam::channel::Sender<()>> = OnceLock::new();

/// Child processes to kill when interrupted
static CHILDREN: LazyLock<ChildRegistry> = LazyLock::new(ChildRegistry::default);

/// Weak handles to running children, so owners still decide when a child
/// goes away in the normal path.
#[derive(Default)]
struct ChildRegistry(Mutex<Vec<Weak<Mutex<Child>>>>);

impl ChildRegistry {
    fn register(&self, child: &Arc<Mutex<Child>>) {
        let mut children = self.0.lock();
        children.retain(|weak| weak.strong_count() > 0);
        children.push(Arc::downgrade(child));
    }

    /// Kill and reap every registered child that is still owned.
    fn kill_all(&self) {
        let children = std::mem::take(&mut *self.0.lock());
        for child in children.iter().filter_map(Weak::upgrade) {
            let mut child = child.lock();
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

/// Setup the global Ctrl+C handler. Call once at program start
///
/// The handler behavior depends on whether a server has been registered:
/// - Before `register_server()`: kill registered children, exit with status 130
/// - After `register_server()`: graceful shutdown (unblock server, notify actors)
pub fn setup_shutdown_handler() -> anyhow::Result<()> {
    ctrlc::set_handler(|| {
        SHUTDOWN.store(true, Ordering::SeqCst);

        if let Some(tx) = SHUTDOWN_TX.get() {
            let _ = tx.send(());
        }

        if let Some(server) = SERVER.get() {
            crate::log!("preview"; "shutting down...");
            server.unblock();
        } else {
            // create/probe: the command did not finish
            CHILDREN.kill_all();
            std::process::exit(INTERRUPTED_EXIT_CODE);
        }
    })
    .map_err(|e| anyhow::anyhow!("failed to set Ctrl+C handler: {}", e))
}

/// Register the HTTP server for graceful shutdown
///
/// Call this after binding the server, before entering the request loop
pub fn register_server(server: Arc<Server>, shutdown_tx: crossbeam::channel::Sender<()>) {
    let _ = SERVER.set(server);
    let _ = SHUTDOWN_TX.set(shutdown_tx);
}

/// Register a child process to be killed if the command is interrupted.
pub fn register_child(child: &Arc<Mutex<Child>>) {
    CHILDREN.register(child);
}

/// Check if shutdown has been requested
pub fn is_shutdown() -> bool {
    SHUTDOWN.load(Ordering::Relaxed)
}
