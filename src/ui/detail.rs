//! Detail overlay rendering.
//!
//! Displays a modal overlay with the full contents of the selected record.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::App;

/// Minimum width required for the detail overlay to render properly.
const MIN_OVERLAY_WIDTH: u16 = 50;
/// Minimum height required for the detail overlay to render properly.
const MIN_OVERLAY_HEIGHT: u16 = 14;

/// Render the record detail as a modal overlay.
///
/// Shows every field of the selected record, including the ones the card
/// itself has no room for (release name, publication date, link URL).
pub fn render_overlay(frame: &mut Frame, app: &App, area: Rect) {
    // Skip rendering if terminal is too small for the overlay
    if area.width < MIN_OVERLAY_WIDTH || area.height < MIN_OVERLAY_HEIGHT {
        return;
    }

    let Some(record) = app.selected_record() else {
        return;
    };

    let overlay_width = (area.width * 80 / 100).clamp(MIN_OVERLAY_WIDTH, 90);
    let overlay_height = MIN_OVERLAY_HEIGHT;

    let x = area.x + (area.width.saturating_sub(overlay_width)) / 2;
    let y = area.y + (area.height.saturating_sub(overlay_height)) / 2;
    let overlay_area = Rect::new(x, y, overlay_width, overlay_height);

    // Clear the area behind the overlay
    frame.render_widget(Clear, overlay_area);

    let severity_style = app.theme.severity_style(record.severity);

    let published = record
        .published_at
        .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| "-".to_string());

    let label = Style::default().add_modifier(Modifier::DIM);
    let value = Style::default().add_modifier(Modifier::BOLD);

    let lines = vec![
        Line::from(vec![Span::styled(
            format!(" {} ", record.repository_name),
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
        Line::from(vec![
            Span::styled(" Name:       ", label),
            Span::raw(record.name.clone()),
        ]),
        Line::from(vec![
            Span::styled(" Tag:        ", label),
            Span::styled(record.tag_name.clone(), value),
        ]),
        Line::from(vec![
            Span::styled(" App:        ", label),
            Span::raw(record.app_version().unwrap_or("-").to_string()),
        ]),
        Line::from(vec![
            Span::styled(" Kind:       ", label),
            Span::raw(record.kind.label()),
        ]),
        Line::from(vec![
            Span::styled(" Severity:   ", label),
            Span::styled(record.severity.label(), severity_style),
        ]),
        Line::from(vec![
            Span::styled(" Published:  ", label),
            Span::raw(published),
            Span::raw(format!("  ({} days ago)", record.days)),
        ]),
        Line::from(vec![
            Span::styled(" Link:       ", label),
            Span::raw(record.link_url.as_deref().unwrap_or("-").to_string()),
        ]),
        Line::from(""),
        Line::from(vec![Span::styled(
            " o:open link  Esc:close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Record Detail ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, overlay_area);
}
