//! Command-line interface.

mod args;
pub mod create;
pub mod preview;
pub mod probe;

pub use args::{Cli, Commands, CreateArgs, PreviewArgs, ProbeArgs};
