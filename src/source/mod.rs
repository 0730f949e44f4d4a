//! Data source abstraction for fetching release records.
//!
//! This module provides a trait-based abstraction over the HTTP transport
//! (so tests can substitute scripted fetchers) plus the poller that owns
//! the repeating fetch timer and delivers cycle outcomes to the UI loop.

mod fetch;
mod poller;
mod record;

pub use fetch::HttpFetcher;
pub use poller::{CycleOutcome, CycleSource, PollHandle, Poller};
pub use record::{Record, ReleaseKind, Severity};

use std::fmt;

use async_trait::async_trait;

/// Error describing a failed fetch or a failed poll cycle.
///
/// Network failures and malformed response bodies are folded into a single
/// message-carrying error; the dashboard does not distinguish them, it only
/// ever displays the message next to the last known-good data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchError {
    pub message: String,
}

impl FetchError {
    /// Create a new fetch error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for FetchError {}

/// Trait for fetching the records published at a single endpoint.
///
/// The production implementation is [`HttpFetcher`]; tests use scripted
/// implementations to exercise the poller without a network.
#[async_trait]
pub trait Fetch: Send + Sync {
    /// Fetch and decode the record payload at `url`.
    ///
    /// Any transport failure, non-success status, or undecodable body is
    /// reported as a [`FetchError`].
    async fn fetch(&self, url: &str) -> Result<Vec<Record>, FetchError>;
}
