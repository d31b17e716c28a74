//! Server lifecycle management.

use std::{
    net::{IpAddr, SocketAddr},
    path::PathBuf,
    thread::{self, JoinHandle},
    time::Duration,
};

use anyhow::Result;
use crossbeam::channel::Receiver;
use tiny_http::Server;

use crate::{actor::Coordinator, log, utils::exec::Cmd};

/// Maximum number of port binding attempts.
const MAX_PORT_RETRIES: u16 = 10;

/// Bind to the specified interface and port, with automatic port retry.
///
/// Port `0` asks the OS for any free port. The returned address is the one
/// actually bound.
pub fn bind_with_retry(interface: IpAddr, base_port: u16) -> Result<(Server, SocketAddr)> {
    let mut last_err = None;
    for offset in 0..MAX_PORT_RETRIES {
        let port = base_port.saturating_add(offset);
        let addr = SocketAddr::new(interface, port);

        match Server::http(addr) {
            Ok(server) => {
                let bound = server.server_addr().to_ip().unwrap_or(addr);
                if offset > 0 {
                    log!("preview"; "port {} in use, using {} instead", base_port, bound.port());
                }
                return Ok((server, bound));
            }
            Err(e) => last_err = Some(e),
        }
    }

    Err(anyhow::anyhow!(
        "Failed to bind after {} attempts (ports {}-{}): {}",
        MAX_PORT_RETRIES,
        base_port,
        base_port.saturating_add(MAX_PORT_RETRIES - 1),
        last_err.map(|e| e.to_string()).unwrap_or_default()
    ))
}

/// Options for the watcher and hub threads.
pub struct ActorOptions {
    pub watch_dir: PathBuf,
    pub tracked: Vec<String>,
    pub heartbeat: Duration,
}

/// Spawn the actor system on its own single-threaded runtime.
///
/// Returns once the coordinator is constructed so callers can hand the
/// hub sender to the HTTP workers.
pub fn spawn_actors(
    coordinator: Coordinator,
    options: ActorOptions,
    shutdown_rx: Receiver<()>,
) -> JoinHandle<()> {
    let coordinator = coordinator
        .with_watch(options.watch_dir, options.tracked)
        .with_heartbeat(options.heartbeat)
        .with_shutdown_signal(shutdown_rx);

    thread::spawn(move || {
        let rt = match tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
        {
            Ok(rt) => rt,
            Err(e) => {
                log!("error"; "failed to create tokio runtime: {}", e);
                return;
            }
        };

        if let Err(e) = rt.block_on(coordinator.run()) {
            log!("error"; "live reload disabled: {:#}", e);
        }
    })
}

/// Wait for actor system to shutdown gracefully (max 2 seconds).
pub fn wait_for_shutdown(handle: JoinHandle<()>) {
    for _ in 0..40 {
        if handle.is_finished() {
            let _ = handle.join();
            return;
        }
        thread::sleep(Duration::from_millis(50));
    }
}

/// Open `url` in the default browser. Failure is only a warning.
pub fn open_browser(url: &str) {
    let cmd = if cfg!(target_os = "macos") {
        Cmd::new("open").arg(url)
    } else if cfg!(windows) {
        Cmd::new("cmd").args(["/C", "start", "", url])
    } else {
        Cmd::new("xdg-open").arg(url)
    };

    match cmd.spawn() {
        // reap in the background so the opener never lingers as a zombie
        Ok(mut child) => {
            thread::spawn(move || {
                let _ = child.wait();
            });
        }
        Err(_) => {
            log!("warn"; "could not open a browser automatically, visit {}", url);
        }
    }
}
