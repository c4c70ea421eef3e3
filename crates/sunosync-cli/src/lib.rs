//! Command-line adapter for sunosync.
//!
//! `main.rs` parses arguments and applies the [`ExitPolicy`]; everything
//! else lives here so it can be tested without spawning the binary.

#![deny(unsafe_code)]

pub mod bootstrap;
pub mod commands;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod parser;

// Re-export primary types for convenient access
pub use bootstrap::{CliContext, bootstrap, resolve_layout, resolve_token};
pub use commands::Commands;
pub use error::{CliError, ExitPolicy};
pub use parser::Cli;
