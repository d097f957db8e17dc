//! TUI rendering
//!
//! - `colors`: palette
//! - `header`: title, usage badge and header controls
//! - `selector`: agent selector bar, menu and tools popover
//! - `modals`: share, billing and help overlays

pub mod colors;
pub mod header;
pub mod modals;
pub mod selector;

use crate::app::{App, Mode, ToastLevel};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

/// Width of the compact-layout sidebar
const SIDEBAR_WIDTH: u16 = 24;

/// Render the full application UI
pub fn render(frame: &mut Frame<'_>, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(frame.area());

    header::render_header(frame, app, chunks[0]);
    render_body(frame, app, chunks[1]);
    selector::render_selector_bar(frame, app, chunks[2]);
    render_status_bar(frame, app, chunks[3]);

    match app.mode() {
        Mode::Menu => selector::render_agent_menu(frame, app, chunks[2]),
        Mode::Tools => selector::render_tools_popover(frame, app, chunks[2]),
        Mode::Share => modals::render_share_overlay(frame, app),
        Mode::Billing => modals::render_billing_overlay(frame, app),
        Mode::Help => modals::render_help_overlay(frame, app),
        Mode::Editing | Mode::Normal => {}
    }
}

fn panel(title: &str, body: &str) -> Paragraph<'static> {
    Paragraph::new(Line::from(Span::styled(
        body.to_string(),
        Style::default().fg(colors::TEXT_MUTED),
    )))
    .block(
        Block::default()
            .title(format!(" {title} "))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(colors::BORDER)),
    )
}

fn render_body(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let compact = app.is_compact();
    let mut constraints = Vec::new();
    if compact && app.sidebar_open {
        constraints.push(Constraint::Length(SIDEBAR_WIDTH));
    }
    constraints.push(Constraint::Min(0));
    if app.files_visible && !compact {
        constraints.push(Constraint::Percentage(25));
    }
    if app.side_panel_visible {
        constraints.push(Constraint::Percentage(if compact { 50 } else { 35 }));
    }

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area);
    let mut slots = chunks.iter().copied();

    if compact
        && app.sidebar_open
        && let Some(slot) = slots.next()
    {
        frame.render_widget(panel("Threads", "Sidebar"), slot);
    }
    if let Some(slot) = slots.next() {
        let title = format!("Thread {}", app.header.thread_id);
        frame.render_widget(panel(&title, ""), slot);
    }
    if app.files_visible
        && !compact
        && let Some(slot) = slots.next()
    {
        frame.render_widget(panel("Files", "Files in this task"), slot);
    }
    if app.side_panel_visible
        && let Some(slot) = slots.next()
    {
        frame.render_widget(panel("Computer", "Tool output preview"), slot);
    }
}

fn render_status_bar(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let line = if let Some(toast) = app.toasts.latest() {
        let color = match toast.level {
            ToastLevel::Error => colors::ACCENT_NEGATIVE,
            ToastLevel::Success => colors::ACCENT_POSITIVE,
        };
        Line::from(Span::styled(
            format!(" {}", toast.message),
            Style::default().fg(color),
        ))
    } else {
        let mut spans = vec![Span::styled(
            format!(" {}", app.config.keys.status_hints()),
            Style::default().fg(colors::TEXT_MUTED),
        )];
        if app.renames_in_flight() > 0 {
            spans.push(Span::styled(
                "  saving…",
                Style::default().fg(colors::ACCENT_WARNING),
            ));
        }
        Line::from(spans)
    };
    frame.render_widget(
        Paragraph::new(line).style(Style::default().bg(colors::SURFACE)),
        area,
    );
}
