//! Data models and processing for release records.
//!
//! This module handles the transformation of raw poll cycle outcomes into
//! the render-ready view model.
//!
//! ## Data Flow
//!
//! ```text
//! CycleOutcome (from the poller)
//!        │
//!        ▼
//! ViewModel::apply()
//!        │
//!        ├──▶ merge()               (concatenate endpoint payloads)
//!        │
//!        └──▶ aggregate_severity()  (most severe classification present)
//! ```

pub mod view;

pub use view::{aggregate_severity, merge, ViewModel};
