//! Port definitions (trait abstractions) for external systems.
//!
//! The sync engine only sees these traits. `sunosync-api` implements them
//! over HTTP; tests substitute in-memory fakes or mocks.
//!
//! # Design Rules
//!
//! - Ports return the closed [`FetchError`] taxonomy, never transport errors
//! - Retryable conditions are resolved inside the implementation
//! - Traits are object-safe and `Send + Sync`

mod error;
mod feed;
mod media;

pub use error::{FetchError, FetchResult};
pub use feed::{FeedPage, FeedPort};
pub use media::{MediaPort, MediaRequest};
