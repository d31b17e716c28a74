//! `[preview]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [preview]
//! interface = "127.0.0.1"     # Network interface (127.0.0.1 = localhost only)
//! port = 3000                 # First port tried; the next 9 are fallbacks
//! open = true                 # Open a browser once the server is up
//! document = "README.md"      # Tracked document inside the tutorial directory
//! metadata = "tutorial.yml"   # Optional metadata file next to the document
//! heartbeat_secs = 15         # Keepalive interval for event-stream clients
//! ```

use std::net::{IpAddr, Ipv4Addr};

use serde::{Deserialize, Serialize};

/// Live preview server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    /// Network interface to bind.
    /// - `127.0.0.1` (default): localhost only
    /// - `0.0.0.0`: all interfaces (LAN accessible)
    pub interface: IpAddr,

    /// HTTP port number.
    pub port: u16,

    /// Open the preview in a browser after start-up.
    pub open: bool,

    /// File name of the tracked document.
    pub document: String,

    /// File name of the tutorial metadata file.
    pub metadata: String,

    /// Seconds between keepalive comments on `/events`. `0` disables them.
    pub heartbeat_secs: u64,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            interface: IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)),
            port: 3000,
            open: true,
            document: "README.md".into(),
            metadata: "tutorial.yml".into(),
            heartbeat_secs: 15,
        }
    }
}
