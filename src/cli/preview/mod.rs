//! Live preview server.
//!
//! ```text
//! GET /         rendered document (fresh on every request)
//! GET /events   text/event-stream, `data: reload` on change
//! GET /<path>   static file inside the tutorial directory
//! ```

mod lifecycle;
mod path;
mod response;

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use crossbeam::channel;
use tiny_http::{Request, Server};
use tokio::sync::mpsc;

use crate::actor::{Coordinator, messages::HubMsg};
use crate::cli::PreviewArgs;
use crate::config::{Config, PreviewConfig};
use crate::page::PreviewTarget;
use crate::{debug, log};

/// Worker threads answering HTTP requests.
///
/// Each open `/events` stream is handed to the hub, so workers are never
/// pinned by long-lived clients.
const REQUEST_THREADS: usize = 4;

/// Entry point for `cookbook preview [DIR]`.
pub fn run_preview(args: &PreviewArgs, config: &Config) -> Result<()> {
    let dir = resolve_dir(args.dir.as_deref())?;
    let target = PreviewTarget::new(dir, &config.preview);

    if !target.document_path().is_file() {
        log!("warn"; "{} not found in {}, serving a placeholder until it appears",
            target.document, target.dir.display());
    }

    let bound = bind_server(target, &config.preview)?;
    let (shutdown_tx, shutdown_rx) = channel::unbounded::<()>();
    crate::core::register_server(Arc::clone(&bound.server), shutdown_tx);

    let url = format!("http://{}", bound.addr);
    log!("preview"; "{}", url);
    log!("watch"; "{}", bound.target.document_path().display());

    if config.preview.open {
        lifecycle::open_browser(&url);
    }

    bound.run(shutdown_rx)
}

/// Canonical tutorial directory, defaulting to the current directory.
fn resolve_dir(dir: Option<&Path>) -> Result<PathBuf> {
    let dir = match dir {
        Some(dir) => dir.to_path_buf(),
        None => std::env::current_dir().context("failed to read current directory")?,
    };
    if !dir.is_dir() {
        bail!("not a directory: {}", dir.display());
    }
    dir.canonicalize()
        .with_context(|| format!("failed to resolve {}", dir.display()))
}

/// Bound server ready to accept requests
pub struct BoundServer {
    server: Arc<Server>,
    addr: SocketAddr,
    target: Arc<PreviewTarget>,
    coordinator: Coordinator,
    heartbeat: Duration,
}

/// Bind the HTTP server and prepare the actor system without starting either.
pub fn bind_server(target: PreviewTarget, config: &PreviewConfig) -> Result<BoundServer> {
    let (server, addr) = lifecycle::bind_with_retry(config.interface, config.port)?;
    Ok(BoundServer {
        server: Arc::new(server),
        addr,
        target: Arc::new(target),
        coordinator: Coordinator::new(),
        heartbeat: Duration::from_secs(config.heartbeat_secs),
    })
}

impl BoundServer {
    /// Get the bound address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Handle used to unblock the accept loop.
    pub fn server(&self) -> Arc<Server> {
        Arc::clone(&self.server)
    }

    /// Sender into the notification hub.
    pub fn hub_sender(&self) -> mpsc::Sender<HubMsg> {
        self.coordinator.hub_sender()
    }

    /// Start the actors and the request loop (blocking).
    ///
    /// Returns after the server is unblocked and the hub has closed every
    /// open event stream.
    pub fn run(self, shutdown_rx: channel::Receiver<()>) -> Result<()> {
        let hub_tx = self.coordinator.hub_sender();
        let options = lifecycle::ActorOptions {
            watch_dir: self.target.dir.clone(),
            tracked: vec![self.target.document.clone(), self.target.metadata.clone()],
            heartbeat: self.heartbeat,
        };
        let actor_handle = lifecycle::spawn_actors(self.coordinator, options, shutdown_rx);

        let result = run_request_loop(&self.server, &self.target, &hub_tx);

        // dropping the last sender ends the hub even if no signal arrived
        drop(hub_tx);
        lifecycle::wait_for_shutdown(actor_handle);
        result
    }
}

fn run_request_loop(
    server: &Server,
    target: &Arc<PreviewTarget>,
    hub_tx: &mpsc::Sender<HubMsg>,
) -> Result<()> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(REQUEST_THREADS)
        .thread_name(|i| format!("preview-http-{i}"))
        .panic_handler(|_| log!("error"; "request handler panicked"))
        .build()
        .context("failed to create request thread pool")?;

    for request in server.incoming_requests() {
        let target = Arc::clone(target);
        let hub_tx = hub_tx.clone();
        pool.spawn(move || {
            if let Err(e) = handle_request(request, &target, &hub_tx) {
                debug!("preview"; "request error: {:#}", e);
            }
        });
    }
    Ok(())
}

/// Handle a single HTTP request
fn handle_request(
    request: Request,
    target: &PreviewTarget,
    hub_tx: &mpsc::Sender<HubMsg>,
) -> Result<()> {
    if crate::core::is_shutdown() {
        return response::respond_unavailable(request);
    }

    if !response::is_get_or_head(&request) {
        return response::respond_method_not_allowed(request);
    }

    let route = path::url_path(request.url()).to_string();
    match route.as_str() {
        "/" => response::respond_page(request, target),
        "/events" if !response::is_head_request(&request) => {
            response::respond_events(request, hub_tx)
        }
        _ => match path::resolve_path(&route, &target.dir) {
            Some(file) => response::respond_file(request, &file),
            None => response::respond_not_found(request),
        },
    }
}
