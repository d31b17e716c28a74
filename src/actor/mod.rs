//! Actor System for Live Reload
//!
//! Message-passing concurrency for preview mode:
//!
//! ```text
//! FsActor --Reload--> HubActor --"data: reload"--> browsers
//! (watch)               ^
//!                       +--Subscribe-- HTTP workers
//! ```
//!
//! # Module Structure
//!
//! - `messages` - Message types for inter-actor communication
//! - `fs` - File system watcher for the tracked document
//! - `hub` - Owns the [`Hub`](crate::hub::Hub) and its heartbeat
//! - `coordinator` - Wires up and runs actors

pub mod coordinator;
pub mod fs;
pub mod hub;
pub mod messages;

pub use coordinator::Coordinator;
