//! Modal overlays: share, billing and help

use super::colors;
use super::header::usage_badge;
use crate::app::App;
use crate::config::Action;
use crate::usage::SubscriptionTier;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

/// Create a centered rect with percentage width and absolute height
#[must_use]
pub fn centered_rect_absolute(percent_x: u16, height: u16, area: Rect) -> Rect {
    let vertical_padding = area.height.saturating_sub(height) / 2;
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(vertical_padding),
            Constraint::Length(height),
            Constraint::Length(vertical_padding),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

fn modal(frame: &mut Frame<'_>, title: &str, lines: Vec<Line<'_>>, percent_x: u16) {
    let height = u16::try_from(lines.len() + 2).unwrap_or(u16::MAX);
    let area = centered_rect_absolute(percent_x, height, frame.area());
    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .title(format!(" {title} "))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(colors::SELECTED)),
        )
        .style(Style::default().bg(colors::MODAL_BG))
        .wrap(Wrap { trim: false });

    frame.render_widget(Clear, area);
    frame.render_widget(paragraph, area);
}

fn label_value<'a>(label: &'a str, value: String) -> Line<'a> {
    Line::from(vec![
        Span::styled(label, Style::default().fg(colors::TEXT_DIM)),
        Span::styled(
            value,
            Style::default()
                .fg(colors::TEXT_PRIMARY)
                .add_modifier(Modifier::BOLD),
        ),
    ])
}

/// Render the share overlay
pub fn render_share_overlay(frame: &mut Frame<'_>, app: &App) {
    let lines = vec![
        Line::from(Span::styled(
            "Anyone with this link can view the chat.",
            Style::default().fg(colors::TEXT_PRIMARY),
        )),
        Line::from(""),
        label_value("  Link:    ", app.share_url()),
        label_value(
            "  Project: ",
            app.header
                .project_id
                .clone()
                .unwrap_or_else(|| "(none)".to_string()),
        ),
        Line::from(""),
        Line::from(Span::styled(
            "Esc close",
            Style::default().fg(colors::TEXT_MUTED),
        )),
    ];
    modal(frame, "Share Chat", lines, 70);
}

/// Render the billing overlay
pub fn render_billing_overlay(frame: &mut Frame<'_>, app: &App) {
    let usage = app.usage();
    let mut lines = Vec::new();

    if let Some(badge) = usage_badge(&usage) {
        lines.push(Line::from(Span::styled(
            badge.trim().to_string(),
            Style::default().fg(colors::ACCENT_WARNING),
        )));
        lines.push(Line::from(""));
    }

    lines.push(Line::from(Span::styled(
        "Plans",
        Style::default().fg(colors::TEXT_DIM),
    )));
    for tier in SubscriptionTier::ALL
        .iter()
        .filter(|t| **t != SubscriptionTier::Admin)
    {
        lines.push(Line::from(vec![
            Span::styled(
                format!("  {:<8}", tier.label()),
                Style::default().fg(colors::TEXT_PRIMARY),
            ),
            Span::styled(
                format!("{} runs / month", tier.monthly_limit()),
                Style::default().fg(colors::TEXT_DIM),
            ),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled(
            "Enter",
            Style::default()
                .fg(colors::ACCENT_POSITIVE)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(" upgrade • ", Style::default().fg(colors::TEXT_MUTED)),
        Span::styled(
            "Esc",
            Style::default()
                .fg(colors::ACCENT_NEGATIVE)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(" close", Style::default().fg(colors::TEXT_MUTED)),
    ]));
    modal(frame, "Upgrade", lines, 50);
}

/// Render the help overlay
pub fn render_help_overlay(frame: &mut Frame<'_>, app: &App) {
    let mut lines = vec![
        Line::from(Span::styled(
            "Keybindings",
            Style::default()
                .fg(colors::TEXT_PRIMARY)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    let mut current_group = None;
    for &action in Action::ALL_FOR_HELP {
        let group = action.group();
        if current_group != Some(group) {
            if current_group.is_some() {
                lines.push(Line::from(""));
            }
            lines.push(Line::from(Span::styled(
                group.title(),
                Style::default().fg(colors::TEXT_DIM),
            )));
            current_group = Some(group);
        }
        lines.push(Line::from(Span::styled(
            app.config.keys.help_line(action),
            Style::default().fg(colors::TEXT_PRIMARY),
        )));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Editing: Enter save • Esc cancel • Tab save and leave",
        Style::default().fg(colors::TEXT_MUTED),
    )));
    lines.push(Line::from(Span::styled(
        "Press any key to close",
        Style::default().fg(colors::TEXT_MUTED),
    )));
    modal(frame, "Help", lines, 60);
}
