//! Header bar: project title, usage badge and controls

use super::colors;
use crate::app::App;
use crate::app::rename::{TitleInput, is_placeholder};
use crate::config::Action;
use crate::usage::UsageSnapshot;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

/// Minimum drawn width of the title edit field
const EDIT_FIELD_MIN_WIDTH: usize = 24;

/// Skeleton drawn while the project name is loading
const TITLE_SKELETON: &str = "░░░░░░░░░░░░░░░░";

/// Render the header bar into `area`
pub fn render_header(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors::BORDER));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let controls = controls_line(app);
    let controls_width = u16::try_from(controls.width()).unwrap_or(inner.width);
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(controls_width)])
        .split(inner);

    let (title, cursor_offset) = title_line(app);
    frame.render_widget(Paragraph::new(title), chunks[0]);
    frame.render_widget(Paragraph::new(controls), chunks[1]);

    if let Some(offset) = cursor_offset {
        let x = chunks[0]
            .x
            .saturating_add(u16::try_from(offset).unwrap_or(u16::MAX))
            .min(chunks[0].right().saturating_sub(1));
        frame.set_cursor_position(Position::new(x, chunks[0].y));
    }
}

/// The left side of the header, plus the cursor column when editing
fn title_line(app: &App) -> (Line<'static>, Option<usize>) {
    let mut spans = Vec::new();
    if app.is_compact() {
        spans.push(Span::styled("≡ ", Style::default().fg(colors::TEXT_DIM)));
    }
    let prefix_width: usize = spans.iter().map(Span::width).sum();

    if let Some(input) = app.header.rename.input() {
        spans.extend(edit_field_spans(input));
        spans.push(Span::styled(
            "  ✓ Enter  ✗ Esc",
            Style::default().fg(colors::TEXT_MUTED),
        ));
        return (Line::from(spans), Some(prefix_width + input.cursor_column()));
    }

    if is_placeholder(&app.project_name) {
        spans.push(Span::styled(
            TITLE_SKELETON,
            Style::default().fg(colors::TEXT_MUTED),
        ));
    } else {
        spans.push(Span::styled(
            app.project_name.clone(),
            Style::default()
                .fg(colors::TEXT_PRIMARY)
                .add_modifier(Modifier::BOLD),
        ));
    }
    (Line::from(spans), None)
}

fn edit_field_spans(input: &TitleInput) -> Vec<Span<'static>> {
    let text = input.text().to_string();
    let padding = EDIT_FIELD_MIN_WIDTH.saturating_sub(text.chars().count());
    let text_style = if input.is_all_selected() {
        Style::default().fg(colors::TEXT_ON_ACCENT).bg(colors::SELECTED)
    } else {
        Style::default().fg(colors::TEXT_PRIMARY).bg(colors::INPUT_BG)
    };
    vec![
        Span::styled(text, text_style),
        Span::styled(" ".repeat(padding), Style::default().bg(colors::INPUT_BG)),
    ]
}

/// Usage badge text, or `None` while loading
#[must_use]
pub fn usage_badge(usage: &UsageSnapshot) -> Option<String> {
    usage.label().map(|label| format!(" {} ", label.text()))
}

fn controls_line(app: &App) -> Line<'static> {
    let keys = &app.config.keys;
    let mut spans = Vec::new();

    if app.header.is_debug() {
        spans.push(Span::styled(
            " Debug ",
            Style::default()
                .fg(colors::TEXT_ON_ACCENT)
                .bg(colors::ACCENT_WARNING),
        ));
        spans.push(Span::raw(" "));
    }

    let usage = app.usage();
    if let Some(badge) = usage_badge(&usage) {
        let mut style = Style::default().fg(colors::TEXT_DIM).bg(colors::BADGE_BG);
        if usage.is_clickable() {
            style = style.add_modifier(Modifier::UNDERLINED);
        }
        spans.push(Span::styled(badge, style));
        spans.push(Span::raw(" "));
    }

    let control = |action: Action, label: &str, active: bool| {
        let style = if active {
            Style::default().fg(colors::SELECTED)
        } else {
            Style::default().fg(colors::TEXT_DIM)
        };
        Span::styled(format!(" [{}] {label}", keys.primary_key(action)), style)
    };

    if !app.is_compact() {
        spans.push(control(Action::ViewFiles, "Files", app.files_visible));
        spans.push(control(Action::Share, "Share", app.header.is_share_open()));
    }
    spans.push(control(
        Action::ToggleSidePanel,
        "Panel",
        app.side_panel_visible,
    ));
    Line::from(spans)
}
