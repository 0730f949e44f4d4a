// Library crate: public API items may not be used by the binary
#![allow(unused)]

//! # releasewatch
//!
//! A terminal dashboard and library for tracking the freshness of software
//! releases and Helm chart deployments.
//!
//! This crate polls one or more backend endpoints for release records,
//! merges the responses, classifies each record's severity into a display
//! color, and renders the result as a list of color-coded cards. A failed
//! poll never clears the dashboard: the last successful record set stays on
//! screen next to an inline error notice until a later cycle succeeds.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Application                          │
//! │  ┌─────────┐    ┌──────────┐    ┌─────────┐    ┌─────────┐ │
//! │  │  app    │───▶│   data   │───▶│   ui    │───▶│ Terminal│ │
//! │  │ (state) │    │(view model)   │(rendering)   │         │ │
//! │  └────┬────┘    └──────────┘    └─────────┘    └─────────┘ │
//! │       │                                                     │
//! │       ▼                                                     │
//! │  ┌─────────┐                                                │
//! │  │ source  │◀── Poller (HTTP, one GET per endpoint/cycle)  │
//! │  │ (input) │                                                │
//! │  └─────────┘                                                │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`app`]**: Application state, selection/filtering, and user
//!   interaction logic
//! - **[`source`]**: The poller that owns the repeating fetch timer, the
//!   [`Fetch`] transport trait with the reqwest-backed [`HttpFetcher`], and
//!   the wire-format [`Record`] types
//! - **[`data`]**: View model derivation - merges endpoint payloads in
//!   configuration order and classifies the batch's aggregate severity
//! - **[`ui`]**: Terminal rendering using ratatui - card list, overlays,
//!   and the severity color tables
//!
//! ## Polling model
//!
//! [`Poller::start`] performs one poll round immediately and then one per
//! interval. Each round issues one GET per configured endpoint, all
//! concurrently, joined all-or-nothing: a single failing endpoint fails the
//! whole round. Outcomes carry a monotonically increasing cycle id; the
//! view model discards outcomes older than the newest one applied, so a
//! slow early round can never overwrite a faster later one. Stopping the
//! returned [`PollHandle`] guarantees no further outcomes are delivered,
//! including from rounds still in flight.
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Watch a release backend
//! releasewatch --releases-url http://localhost:8080/api/releases
//!
//! # Watch releases and Helm charts, polling every 100 seconds
//! releasewatch --releases-url http://api/releases --helm-url http://api/helmreleases
//!
//! # One-shot: fetch once and write the dashboard state as JSON
//! releasewatch --export state.json
//! ```
//!
//! ### As a library
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use releasewatch::{HttpFetcher, Poller, ViewModel};
//!
//! # tokio_test::block_on(async {
//! let fetcher = Arc::new(HttpFetcher::new(Duration::from_secs(10)).unwrap());
//! let poller = Poller::new(
//!     fetcher,
//!     vec!["http://localhost:8080/api/releases".to_string()],
//! );
//!
//! let (handle, mut cycles) = poller.start(Duration::from_secs(100));
//! let mut view = ViewModel::new();
//!
//! // ... drain outcomes from the UI loop ...
//! if let Some(outcome) = cycles.poll() {
//!     view.apply(outcome);
//! }
//!
//! handle.stop();
//! # });
//! ```

pub mod app;
pub mod data;
pub mod events;
pub mod source;
pub mod ui;

// Re-export main types for convenience
pub use app::App;
pub use data::{aggregate_severity, merge, ViewModel};
pub use source::{
    CycleOutcome, CycleSource, Fetch, FetchError, HttpFetcher, PollHandle, Poller, Record,
    ReleaseKind, Severity,
};
pub use ui::{aggregate_tint, card_colors, CardColors, Theme};
