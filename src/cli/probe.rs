//! `cookbook probe`: query a node's chain info.

use std::time::Duration;

use anyhow::{Context, Result};

use crate::cli::ProbeArgs;
use crate::config::Config;
use crate::log;
use crate::node::{self, NodeProcess};

pub fn run_probe(args: &ProbeArgs, config: &Config) -> Result<()> {
    let endpoint = config.node.endpoint.as_str();
    let timeout = Duration::from_secs(config.node.startup_timeout_secs);

    // kept alive until the probe finishes; dropping it kills the node
    let _node = if args.spawn {
        Some(spawn_node(endpoint, config)?)
    } else {
        None
    };

    log!("probe"; "{}", endpoint);
    let info = node::probe(endpoint, timeout)?;

    log!("probe"; "chain    {}", info.chain);
    log!("probe"; "node     {} {}", info.name, info.version);
    log!("probe"; "best     #{}", info.best_number);
    Ok(())
}

fn spawn_node(endpoint: &str, config: &Config) -> Result<NodeProcess> {
    let binary = config
        .node
        .binary
        .as_deref()
        .context("no node binary configured; set `node.binary` or POLKADOT_NODE_BIN")?;
    let port = node::endpoint_addr(endpoint)?.port();

    let process = NodeProcess::spawn(binary, port)?;
    log!("node"; "started {} (pid {}) on port {}", binary.display(), process.id(), process.rpc_port());
    Ok(process)
}
