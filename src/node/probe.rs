//! Reachability checks and the combined chain query.

use std::fmt;
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, anyhow, bail};
use url::Url;

use super::rpc::RpcClient;

/// Delay between connection attempts.
const POLL_STEP: Duration = Duration::from_millis(250);

/// What `cookbook probe` reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainInfo {
    pub chain: String,
    pub name: String,
    pub version: String,
    pub best_number: u64,
}

impl fmt::Display for ChainInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} on {} v{} at block #{}",
            self.chain, self.name, self.version, self.best_number
        )
    }
}

/// Resolve a `ws://` or `wss://` endpoint to a socket address.
pub fn endpoint_addr(endpoint: &str) -> Result<SocketAddr> {
    let url = Url::parse(endpoint).with_context(|| format!("invalid endpoint `{endpoint}`"))?;
    if !matches!(url.scheme(), "ws" | "wss") {
        bail!("endpoint `{endpoint}` must use ws:// or wss://");
    }
    let host = url
        .host_str()
        .ok_or_else(|| anyhow!("endpoint `{endpoint}` has no host"))?;
    let port = url
        .port_or_known_default()
        .ok_or_else(|| anyhow!("endpoint `{endpoint}` has no port"))?;

    // IPv6 hosts come back bracketed
    let host = host.trim_start_matches('[').trim_end_matches(']');
    (host, port)
        .to_socket_addrs()
        .with_context(|| format!("failed to resolve {host}"))?
        .next()
        .ok_or_else(|| anyhow!("no address for {host}"))
}

/// Poll until `addr` accepts a TCP connection or `timeout` elapses.
///
/// A timeout too large to represent as an instant never expires.
pub fn wait_for_port(addr: SocketAddr, timeout: Duration) -> bool {
    let deadline = Instant::now().checked_add(timeout);
    loop {
        let remaining = deadline.map_or(POLL_STEP, |d| d.saturating_duration_since(Instant::now()));
        let attempt = remaining.min(POLL_STEP).max(Duration::from_millis(1));
        if TcpStream::connect_timeout(&addr, attempt).is_ok() {
            return true;
        }
        if deadline.is_some_and(|d| d.saturating_duration_since(Instant::now()) < POLL_STEP) {
            return false;
        }
        thread::sleep(POLL_STEP);
    }
}

/// Wait for `endpoint`, then query chain, node name, version and best block.
pub fn probe(endpoint: &str, timeout: Duration) -> Result<ChainInfo> {
    let addr = endpoint_addr(endpoint)?;
    if !wait_for_port(addr, timeout) {
        bail!(
            "no node reachable at {endpoint} after {}s",
            timeout.as_secs()
        );
    }

    let mut client = RpcClient::connect(endpoint, timeout)?;
    let info = client.chain_info()?;
    client.close();
    Ok(info)
}
