//! Cards view rendering.
//!
//! Displays one color-coded card per record, in merge order, with a
//! placeholder message when there is nothing to show.

use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::ui::theme::card_colors;

/// Rows each card occupies (borders plus one content line).
pub const CARD_HEIGHT: u16 = 3;

/// Widest a card is drawn, mirroring the fixed-width cards of the
/// original dashboard.
const CARD_MAX_WIDTH: u16 = 64;

/// Render the cards view.
pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    if !app.view.is_loaded {
        return;
    }

    if app.view.records.is_empty() {
        render_placeholder(frame, area, "Please specify some repositories to track");
        return;
    }

    if app.filtered_count() == 0 {
        render_placeholder(frame, area, "No records match the current filter");
        return;
    }

    let visible = (area.height / CARD_HEIGHT).max(1) as usize;
    app.scroll_offset = scroll_window(app.selected_index, app.scroll_offset, visible);

    let card_width = area.width.min(CARD_MAX_WIDTH);
    let records = app.filtered_records();

    for (row, (index, record)) in records
        .iter()
        .enumerate()
        .skip(app.scroll_offset)
        .take(visible)
        .enumerate()
    {
        let card_area = Rect::new(
            area.x,
            area.y + (row as u16) * CARD_HEIGHT,
            card_width,
            CARD_HEIGHT,
        );

        let colors = card_colors(record.severity);
        let border_style = if index == app.selected_index {
            app.theme.selected
        } else {
            Style::default().fg(colors.border)
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(app.theme.border_type)
            .border_style(border_style)
            .style(Style::default().bg(colors.background).fg(Color::Black));
        let inner = block.inner(card_area);
        frame.render_widget(block, card_area);

        let chunks =
            Layout::horizontal([Constraint::Min(0), Constraint::Length(10)]).split(inner);

        let mut spans = Vec::new();
        if record.is_helm_chart() {
            spans.push(Span::styled("⎈ ", Style::default().add_modifier(Modifier::BOLD)));
        }
        spans.push(Span::styled(
            record.repository_name.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw(" - "));
        let tag_style = if record.is_latest() {
            Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default()
        };
        spans.push(Span::styled(record.tag_name.clone(), tag_style));
        if let Some(app_version) = record.app_version() {
            spans.push(Span::styled(
                app_version.to_string(),
                Style::default().add_modifier(Modifier::DIM),
            ));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), chunks[0]);

        let days = Paragraph::new(format!("{} days", record.days)).alignment(Alignment::Right);
        frame.render_widget(days, chunks[1]);
    }
}

/// Centered message shown instead of the card list.
fn render_placeholder(frame: &mut Frame, area: Rect, message: &str) {
    let y = area.y + area.height / 2;
    let centered = Rect::new(area.x, y.min(area.bottom().saturating_sub(1)), area.width, 1);
    let paragraph = Paragraph::new(message)
        .alignment(Alignment::Center)
        .style(Style::default().add_modifier(Modifier::BOLD));
    frame.render_widget(paragraph, centered);
}

/// Adjust the scroll offset so the selected card stays within the window.
fn scroll_window(selected: usize, offset: usize, visible: usize) -> usize {
    if selected < offset {
        selected
    } else if selected >= offset + visible {
        selected + 1 - visible
    } else {
        offset
    }
}
