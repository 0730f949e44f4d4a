//! Common UI components shared across the dashboard.
//!
//! This module contains the header bar, status bar, and help overlay.

use chrono::Local;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::ui::theme::aggregate_tint;

/// Render the header bar with the aggregate severity tint.
///
/// Displays: title, record count, aggregate classification.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    if !app.view.is_loaded {
        let line = Line::from(vec![
            Span::styled(" RELEASES ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("| Loading..."),
        ]);
        frame.render_widget(Paragraph::new(line), area);
        return;
    }

    let tint = aggregate_tint(app.view.aggregate);
    let line = Line::from(vec![
        Span::styled(" RELEASES ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("│ "),
        Span::styled(
            format!("{}", app.view.records.len()),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(" records │ "),
        Span::raw(app.view.aggregate.label()),
        Span::raw(" "),
    ]);

    let paragraph =
        Paragraph::new(line).style(Style::default().bg(tint).fg(Color::Black));
    frame.render_widget(paragraph, area);
}

/// Render the status bar at the bottom.
///
/// Shows: time since last update and available controls, or the fetch
/// failure notice with the last known-good time. Also displays temporary
/// status messages.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    // Check for temporary status message first
    if let Some(msg) = app.get_status_message() {
        let paragraph =
            Paragraph::new(format!(" {} ", msg)).style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    if let Some(ref error) = app.view.last_error {
        let last_updated = match app.view.last_success_time {
            Some(t) => format!("last updated at {}", t.format("%H:%M:%S")),
            None => "never updated".to_string(),
        };
        let notice = format!(
            " Could not fetch data ({}), {} | r:retry q:quit",
            error.message, last_updated,
        );
        let paragraph =
            Paragraph::new(notice).style(Style::default().fg(app.theme.warning));
        frame.render_widget(paragraph, area);
        return;
    }

    let status = if let Some(updated) = app.view.last_updated() {
        let elapsed = Local::now().signed_duration_since(updated);
        let controls = if app.filter_active {
            "Type to search | Enter:apply Esc:cancel"
        } else {
            "o:open Enter:detail /:search r:refresh ?:help q:quit"
        };
        format!(
            " {} | Updated {} ago | {}",
            app.source_description(),
            format_ago(elapsed.num_seconds().max(0)),
            controls,
        )
    } else {
        " Loading... | q:quit".to_string()
    };

    let paragraph = Paragraph::new(status).style(Style::default().add_modifier(Modifier::DIM));
    frame.render_widget(paragraph, area);
}

/// Format elapsed seconds for display (e.g. 42 -> "42s", 130 -> "2m10s").
fn format_ago(secs: i64) -> String {
    if secs >= 3600 {
        format!("{}h{}m", secs / 3600, (secs % 3600) / 60)
    } else if secs >= 60 {
        format!("{}m{}s", secs / 60, secs % 60)
    } else {
        format!("{}s", secs)
    }
}

/// Render the help overlay with keyboard shortcuts.
///
/// Displayed as a centered modal on top of the cards view.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header)]),
        Line::from(""),
        Line::from(vec![Span::styled(
            " Navigation",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  ↑/↓ j/k     Select card"),
        Line::from("  PgUp/PgDn   Jump 5 cards"),
        Line::from("  Home/End    Jump to first/last"),
        Line::from("  Enter       View record detail"),
        Line::from("  Esc         Go back"),
        Line::from(""),
        Line::from(vec![Span::styled(
            " Records",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  o         Open release page in browser"),
        Line::from("  /         Start filter/search"),
        Line::from("  c         Clear filter"),
        Line::from(""),
        Line::from(vec![Span::styled(
            " General",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  r         Refresh now"),
        Line::from("  e         Export to JSON"),
        Line::from("  q         Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let paragraph = Paragraph::new(help_text).block(block);

    // Center the help overlay - responsive to terminal size
    let help_width = 44u16.min(area.width.saturating_sub(4));
    let help_height = 23u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(help_width)) / 2;
    let y = area.y + (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    // Clear the area behind the help
    frame.render_widget(ratatui::widgets::Clear, help_area);
    frame.render_widget(paragraph, help_area);
}
