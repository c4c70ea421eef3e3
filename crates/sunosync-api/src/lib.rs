//! HTTP client for the remote clip feed.
//!
//! Implements [`sunosync_core::FeedPort`] and [`sunosync_core::MediaPort`]
//! over reqwest. Every request goes through one retrying operation that
//! classifies responses into done, retry or terminal and applies capped
//! exponential backoff with jitter.

#![deny(unsafe_code)]
// Allow private types in public type alias - DefaultSunoClient is meant to be
// used through the port traits, not its internal generic structure
#![allow(private_interfaces)]

mod client;
mod config;
mod error;
mod http;
mod parsing;
mod port;
mod retry;

// ============================================================================
// Public API
// ============================================================================

// Client
pub use client::DefaultSunoClient;

// Configuration
pub use config::{ApiClientConfig, DEFAULT_FEED_URL};

// Errors
pub use error::{ApiError, ApiResult};
