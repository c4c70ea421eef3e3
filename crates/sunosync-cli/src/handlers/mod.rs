//! Command handlers.
//!
//! Handlers follow the canonical pattern:
//! - Signature: `pub async fn execute(ctx: &CliContext, ...) -> Result<...>`
//! - Thin wrappers that build settings from flags, call `sunosync-sync`
//!   and report the outcome
//!
//! Handlers should NOT:
//! - Contain scan, diff or planning logic
//! - Decide exit codes (`main.rs` does)

pub mod check;
pub mod paths;
pub mod sync;
pub mod update;
