//! Actor Message Definitions
//!
//! ```text
//! FsActor --Reload--> HubActor <--Subscribe-- HTTP workers
//! ```

use std::path::PathBuf;

use crate::hub::Subscriber;

/// Messages to Hub Actor
pub enum HubMsg {
    /// Register an `/events` stream
    Subscribe(Box<dyn Subscriber>),
    /// Tracked files changed on disk
    Reload { changed: Vec<PathBuf> },
    /// Close every stream and stop
    Shutdown,
}

impl std::fmt::Debug for HubMsg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Subscribe(_) => f.write_str("Subscribe"),
            Self::Reload { changed } => f.debug_struct("Reload").field("changed", changed).finish(),
            Self::Shutdown => f.write_str("Shutdown"),
        }
    }
}
