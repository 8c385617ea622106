//! The `tagwm` command-line tool.
//!
//! Configuration loading lives in `tagwm-config` and binding parsing in
//! `tagwm-keybindings`; this crate adds the CLI front end and the log bridge.

/// Application version (root crate version).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod cli;
pub mod debug;
