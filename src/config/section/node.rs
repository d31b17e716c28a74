//! `[node]` section configuration.
//!
//! ```toml
//! [node]
//! endpoint = "ws://127.0.0.1:9944"
//! binary = "./target/release/node"   # optional, used by `probe --spawn`
//! startup_timeout_secs = 30
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Node connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    /// WebSocket JSON-RPC endpoint.
    pub endpoint: String,

    /// Pre-built node binary to spawn.
    pub binary: Option<PathBuf>,

    /// How long to wait for the RPC port.
    pub startup_timeout_secs: u64,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            endpoint: "ws://127.0.0.1:9944".into(),
            binary: None,
            startup_timeout_secs: 30,
        }
    }
}
