//! Shared helpers: subprocesses, HTML escaping, MIME lookup.

pub mod exec;
pub mod html;
pub mod mime;
