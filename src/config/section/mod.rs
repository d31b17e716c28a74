//! Configuration section definitions.
//!
//! Each module corresponds to a section in `cookbook.toml`:
//!
//! | Module    | TOML Section | Purpose                              |
//! |-----------|--------------|--------------------------------------|
//! | `preview` | `[preview]`  | Live preview server                  |
//! | `create`  | `[create]`   | Tutorial scaffolding                 |
//! | `node`    | `[node]`     | Node endpoint for `probe` and e2e    |

mod create;
mod node;
mod preview;

pub use create::CreateConfig;
pub use node::NodeConfig;
pub use preview::PreviewConfig;
