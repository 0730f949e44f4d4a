//! Terminal rendering for the dashboard.
//!
//! - [`cards`]: the card list view (one color-coded card per record)
//! - [`common`]: header, status bar, and help overlay
//! - [`detail`]: record detail overlay
//! - [`theme`]: chrome theme plus the severity color tables

pub mod cards;
pub mod common;
pub mod detail;
pub mod theme;

pub use theme::{aggregate_tint, card_colors, CardColors, Theme};
