//! Theme configuration and severity color tables for the TUI.
//!
//! Supports light and dark chrome themes with automatic terminal detection.
//!
//! The severity colors live in two independent lookup tables: one tints the
//! whole dashboard from the aggregate classification, the other tints each
//! card individually. Their domains diverge (the aggregate never shows
//! `unknown`/`error`), so they are deliberately not unified.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::block::BorderType;

use crate::source::Severity;

/// Background and border colors for a single card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardColors {
    pub background: Color,
    pub border: Color,
}

/// Whole-dashboard tint for the aggregate severity.
///
/// Total over the severity domain: only `warning` and `critical` tint the
/// dashboard, everything else renders on the plain white default.
pub fn aggregate_tint(severity: Severity) -> Color {
    match severity {
        Severity::Warning => Color::Rgb(0xff, 0xee, 0xba),
        Severity::Critical => Color::Rgb(0xe0, 0xeb, 0xf5),
        _ => Color::Rgb(0xff, 0xff, 0xff),
    }
}

/// Per-card background and border colors.
///
/// Total over the severity domain: severities outside the four classified
/// ones (including `unknown`, `error`, and anything unrecognized on the
/// wire) fall through to the near-white fallback pair.
pub fn card_colors(severity: Severity) -> CardColors {
    match severity {
        Severity::None => CardColors {
            background: Color::Rgb(0x00, 0xb7, 0xbf),
            border: Color::Rgb(0x00, 0xb7, 0xbf),
        },
        Severity::Ok => CardColors {
            background: Color::Rgb(0x00, 0xe3, 0x0f),
            border: Color::Rgb(0x00, 0xe3, 0x0f),
        },
        Severity::Warning => CardColors {
            background: Color::Rgb(0xff, 0xf3, 0xcd),
            border: Color::Rgb(0xff, 0xee, 0xba),
        },
        Severity::Critical => CardColors {
            background: Color::Rgb(0xf8, 0xd7, 0xda),
            border: Color::Rgb(0xf5, 0xc6, 0xcb),
        },
        _ => CardColors {
            background: Color::Rgb(0xfe, 0xfe, 0xfe),
            border: Color::Rgb(0xfd, 0xfd, 0xfe),
        },
    }
}

/// Color and style theme for the TUI chrome.
///
/// Use [`Theme::auto_detect()`] for automatic theme selection based on
/// terminal background, or [`Theme::dark()`]/[`Theme::light()`] explicitly.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Accent color for highlights and active elements.
    pub highlight: Color,
    /// Color for warning-level text.
    pub warning: Color,
    /// Color for critical-level text.
    pub critical: Color,
    /// Color for healthy/ok text.
    pub healthy: Color,
    /// Color for borders and separators.
    pub border: Color,
    /// Style for header text.
    pub header: Style,
    /// Style for the selected card's border.
    pub selected: Style,
    /// Border style (rounded, plain, etc.).
    pub border_type: BorderType,
}

impl Theme {
    /// Create a dark theme suitable for dark terminal backgrounds.
    pub fn dark() -> Self {
        Self {
            highlight: Color::Cyan,
            warning: Color::Yellow,
            critical: Color::Red,
            healthy: Color::Green,
            border: Color::Gray,
            header: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            selected: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            border_type: BorderType::Rounded,
        }
    }

    /// Create a light theme suitable for light terminal backgrounds.
    pub fn light() -> Self {
        Self {
            highlight: Color::Blue,
            warning: Color::Yellow,
            critical: Color::Red,
            healthy: Color::Green,
            border: Color::DarkGray,
            header: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            selected: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            border_type: BorderType::Rounded,
        }
    }

    /// Auto-detect based on terminal background
    pub fn auto_detect() -> Self {
        // Use terminal-light crate to detect background luminance
        match terminal_light::luma() {
            Ok(luma) if luma > 0.5 => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Get a text style for a severity label
    pub fn severity_style(&self, severity: Severity) -> Style {
        match severity {
            Severity::None => Style::default().fg(self.highlight),
            Severity::Ok => Style::default().fg(self.healthy),
            Severity::Warning => Style::default().fg(self.warning),
            Severity::Critical => {
                Style::default().fg(self.critical).add_modifier(Modifier::BOLD)
            }
            Severity::Error => Style::default().fg(self.critical),
            Severity::Unknown => Style::default().fg(self.border),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_SEVERITIES: [Severity; 6] = [
        Severity::None,
        Severity::Ok,
        Severity::Warning,
        Severity::Critical,
        Severity::Error,
        Severity::Unknown,
    ];

    #[test]
    fn test_aggregate_tint_is_total() {
        for severity in ALL_SEVERITIES {
            // Every severity maps to some color; no panic, no gap.
            let _ = aggregate_tint(severity);
        }
        assert_eq!(aggregate_tint(Severity::Warning), Color::Rgb(0xff, 0xee, 0xba));
        assert_eq!(aggregate_tint(Severity::Critical), Color::Rgb(0xe0, 0xeb, 0xf5));
        assert_eq!(aggregate_tint(Severity::Ok), Color::Rgb(0xff, 0xff, 0xff));
        assert_eq!(aggregate_tint(Severity::None), Color::Rgb(0xff, 0xff, 0xff));
    }

    #[test]
    fn test_card_colors_is_total_with_fallback() {
        for severity in ALL_SEVERITIES {
            let _ = card_colors(severity);
        }

        let fallback = CardColors {
            background: Color::Rgb(0xfe, 0xfe, 0xfe),
            border: Color::Rgb(0xfd, 0xfd, 0xfe),
        };
        // Display-only severities (and anything unrecognized on the wire,
        // which deserializes to Unknown) use the fallback pair.
        assert_eq!(card_colors(Severity::Unknown), fallback);
        assert_eq!(card_colors(Severity::Error), fallback);

        assert_ne!(card_colors(Severity::Warning), card_colors(Severity::Critical));
    }

    #[test]
    fn test_aggregate_and_card_tables_are_independent() {
        // The two tables intentionally disagree on warning/critical values.
        assert_ne!(
            aggregate_tint(Severity::Critical),
            card_colors(Severity::Critical).background
        );
    }
}
