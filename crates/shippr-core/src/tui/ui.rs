//! UI rendering for the TUI

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::app::App;
use super::components::{hints, status_indicator};
use super::theme::{MUTED, PRIMARY, WARNING};

/// Draw the entire UI
pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(10),   // Current screen
            Constraint::Length(1), // Status bar
        ])
        .split(frame.size());

    draw_header(frame, app, chunks[0]);
    app.screen().render(frame, chunks[1]);
    draw_status_bar(frame, app, chunks[2]);
}

fn draw_header(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(MUTED));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(12),
            Constraint::Min(20),
            Constraint::Length(16),
        ])
        .split(inner);

    let logo = Paragraph::new("▲ shippr").style(Style::default().fg(PRIMARY).bold());
    frame.render_widget(logo, chunks[0]);

    let route = app.route();
    let mut crumbs = vec![Span::styled(
        route.name.title().to_string(),
        Style::default().bold(),
    )];
    if app.router().can_go_back() {
        crumbs.push(Span::styled(
            format!("  ({} deep)", app.router().depth()),
            Style::default().fg(MUTED),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(crumbs)), chunks[1]);

    let session = if app.signed_in() { "Signed in" } else { "Signed out" };
    frame.render_widget(
        Paragraph::new(Line::from(status_indicator(session, app.signed_in())))
            .alignment(Alignment::Right),
        chunks[2],
    );
}

fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(area);

    // Busy label, then status message, then key hints
    let left = if let Some(label) = app.busy() {
        Paragraph::new(label).style(Style::default().fg(WARNING))
    } else if let Some(status) = app.get_status() {
        Paragraph::new(status.to_string()).style(Style::default().fg(MUTED))
    } else {
        Paragraph::new(hints(app.screen().hints()))
    };
    frame.render_widget(left, chunks[0]);

    let right = Paragraph::new(app.api_url().to_string())
        .style(Style::default().fg(MUTED))
        .alignment(Alignment::Right);
    frame.render_widget(right, chunks[1]);
}

/// Fixed-size box centered in `r`, shrunk to fit
pub fn centered_box(width: u16, height: u16, r: Rect) -> Rect {
    let width = width.min(r.width);
    let height = height.min(r.height);
    Rect {
        x: r.x + (r.width - width) / 2,
        y: r.y + (r.height - height) / 2,
        width,
        height,
    }
}
