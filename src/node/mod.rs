//! Local node helpers for tutorial end-to-end checks.
//!
//! - [`probe`]: endpoint resolution and port polling
//! - [`process`]: a dev node child process, killed on drop
//! - [`rpc`]: minimal JSON-RPC 2.0 client over WebSocket

pub mod probe;
pub mod process;
pub mod rpc;

pub use probe::{endpoint_addr, probe};
pub use process::NodeProcess;
