//! Agent selector bar, its dropdown menu and the tools popover

use super::colors;
use crate::agent::{Agent, McpIntegration, Resolution};
use crate::app::{App, MenuRow};
use crate::config::Action;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

/// Width of the menu and the tools popover
const POPUP_WIDTH: u16 = 48;

/// Description shown under the "no explicit agent" row
const DEFAULT_ROW_DESCRIPTION: &str = "Your personal AI employee";

/// Label of the creation row
const CREATE_ROW_LABEL: &str = "+ Agent Playground";

/// Render the selector bar into `area`
pub fn render_selector_bar(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let selector = &app.selector;
    let resolution = selector.resolve(app.selected_agent_id.as_deref());
    let keys = &app.config.keys;

    let name_style = if selector.is_disabled() {
        Style::default().fg(colors::TEXT_MUTED)
    } else {
        Style::default()
            .fg(colors::TEXT_PRIMARY)
            .add_modifier(Modifier::BOLD)
    };

    let mut spans = vec![
        Span::styled("▾ ", Style::default().fg(colors::TEXT_DIM)),
        Span::styled(resolution.display_name().to_string(), name_style),
    ];
    if selector.is_loading() {
        spans.push(Span::styled(
            "  loading…",
            Style::default().fg(colors::TEXT_MUTED),
        ));
    }
    spans.push(Span::styled(
        format!("  [{}] change", keys.primary_key(Action::AgentMenu)),
        Style::default().fg(colors::TEXT_MUTED),
    ));
    if resolution.shows_tools() {
        spans.push(Span::styled(
            format!("  [{}] tools", keys.primary_key(Action::ToolsPopover)),
            Style::default().fg(colors::TOOLS_BADGE),
        ));
    }

    let block = Block::default()
        .title(" Agent ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors::BORDER));
    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

/// Rectangle of a popup of `height` rows sitting just above `anchor`
fn popup_above(anchor: Rect, height: u16, bounds: Rect) -> Rect {
    let height = height.min(anchor.y.saturating_sub(bounds.y));
    Rect {
        x: anchor.x,
        y: anchor.y.saturating_sub(height),
        width: POPUP_WIDTH.min(bounds.right().saturating_sub(anchor.x)),
        height,
    }
}

fn row_prefix(is_cursor: bool, is_checked: bool) -> String {
    let cursor = if is_cursor { "▶ " } else { "  " };
    let check = if is_checked { "✓ " } else { "  " };
    format!("{cursor}{check}")
}

/// Lines of the agent menu
#[must_use]
pub fn menu_lines(
    rows: &[MenuRow<'_>],
    resolution: &Resolution<'_>,
    cursor: usize,
) -> Vec<Line<'static>> {
    menu_body(rows, resolution, cursor).0
}

/// Menu lines plus the index of each row's first line
fn menu_body(
    rows: &[MenuRow<'_>],
    resolution: &Resolution<'_>,
    cursor: usize,
) -> (Vec<Line<'static>>, Vec<usize>) {
    let mut lines = Vec::new();
    let mut row_starts = Vec::with_capacity(rows.len());
    let separator = || {
        Line::from(Span::styled(
            "─".repeat(usize::from(POPUP_WIDTH) - 4),
            Style::default().fg(colors::BORDER),
        ))
    };

    for (idx, row) in rows.iter().enumerate() {
        let is_cursor = idx == cursor;
        let row_style = if is_cursor {
            Style::default()
                .fg(colors::TEXT_PRIMARY)
                .bg(colors::SURFACE_HIGHLIGHT)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(colors::TEXT_PRIMARY)
        };

        match row {
            MenuRow::None => {
                row_starts.push(lines.len());
                lines.push(Line::from(vec![
                    Span::styled(
                        row_prefix(is_cursor, resolution.default_row_checked()),
                        row_style,
                    ),
                    Span::styled(
                        " Agent ",
                        Style::default().fg(colors::TEXT_DIM).bg(colors::BADGE_BG),
                    ),
                ]));
                lines.push(description_line(DEFAULT_ROW_DESCRIPTION));
                if rows.len() > 2 {
                    lines.push(separator());
                }
            }
            MenuRow::Agent(agent) => {
                row_starts.push(lines.len());
                lines.push(agent_line(
                    agent,
                    row_prefix(is_cursor, resolution.is_checked(agent)),
                    row_style,
                ));
                if let Some(description) = agent.description.as_deref() {
                    lines.push(description_line(description));
                }
            }
            MenuRow::Create => {
                lines.push(separator());
                row_starts.push(lines.len());
                lines.push(Line::from(Span::styled(
                    format!("{}{CREATE_ROW_LABEL}", row_prefix(is_cursor, false)),
                    if is_cursor {
                        row_style
                    } else {
                        Style::default().fg(colors::TEXT_DIM)
                    },
                )));
            }
        }
    }
    (lines, row_starts)
}

/// First visible line so that `cursor_line` fits in `visible` lines
#[must_use]
pub const fn scroll_offset(cursor_line: usize, visible: usize) -> usize {
    if visible == 0 || cursor_line < visible {
        0
    } else {
        cursor_line + 1 - visible
    }
}

fn scroll_indicator(hidden_above: usize, hidden_below: usize) -> Line<'static> {
    let text = match (hidden_above > 0, hidden_below > 0) {
        (true, true) => format!("  ↑{hidden_above} more above, ↓{hidden_below} more below"),
        (true, false) => format!("  ↑{hidden_above} more above"),
        (false, true) => format!("  ↓{hidden_below} more below"),
        (false, false) => String::new(),
    };
    Line::from(Span::styled(text, Style::default().fg(colors::TEXT_MUTED)))
}

fn agent_line(agent: &Agent, prefix: String, row_style: Style) -> Line<'static> {
    let mut spans = vec![Span::styled(prefix, row_style)];
    if let Some(avatar) = agent.avatar.as_deref().filter(|a| !a.is_empty()) {
        spans.push(Span::styled(format!("{avatar} "), row_style));
    }
    spans.push(Span::styled(agent.name.clone(), row_style));
    if agent.is_default {
        spans.push(Span::styled(
            "  ★ System",
            Style::default().fg(colors::ACCENT_WARNING),
        ));
    }
    Line::from(spans)
}

fn description_line(text: &str) -> Line<'static> {
    Line::from(Span::styled(
        format!("      {text}"),
        Style::default().fg(colors::TEXT_MUTED),
    ))
}

/// Render the agent menu above `anchor`, scrolled to keep the cursor row visible
pub fn render_agent_menu(frame: &mut Frame<'_>, app: &App, anchor: Rect) {
    // Indicator line, hint line and the two borders
    const CHROME_LINES: usize = 4;

    let selector = &app.selector;
    let resolution = selector.resolve(app.selected_agent_id.as_deref());
    let (body, row_starts) = menu_body(&selector.rows(), &resolution, selector.cursor());

    let wanted = u16::try_from(body.len() + CHROME_LINES).unwrap_or(u16::MAX);
    let area = popup_above(anchor, wanted, frame.area());
    let visible = usize::from(area.height).saturating_sub(CHROME_LINES);

    let cursor_line = row_starts.get(selector.cursor()).copied().unwrap_or(0);
    let offset = scroll_offset(cursor_line, visible);
    let hidden_above = row_starts.iter().filter(|&&l| l < offset).count();
    let hidden_below = row_starts
        .iter()
        .filter(|&&l| l >= offset + visible)
        .count();

    let mut lines: Vec<Line<'static>> = body.into_iter().skip(offset).take(visible).collect();
    lines.push(scroll_indicator(hidden_above, hidden_below));
    lines.push(Line::from(Span::styled(
        "↑/↓ select • Enter confirm • Esc close",
        Style::default().fg(colors::TEXT_MUTED),
    )));

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .title(" Agents ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(colors::BORDER)),
        )
        .style(Style::default().bg(colors::MODAL_BG));

    frame.render_widget(Clear, area);
    frame.render_widget(paragraph, area);
}

fn tools_count(mcp: &McpIntegration) -> Option<Span<'static>> {
    (mcp.enabled_tools_count > 0).then(|| {
        Span::styled(
            format!("  {} tools", mcp.enabled_tools_count),
            Style::default().fg(colors::TOOLS_BADGE),
        )
    })
}

/// Lines of the tools popover for `agent`
#[must_use]
pub fn tools_lines(agent: Option<&Agent>) -> Vec<Line<'static>> {
    let heading = |text: &'static str| {
        Line::from(Span::styled(
            text,
            Style::default()
                .fg(colors::TEXT_DIM)
                .add_modifier(Modifier::BOLD),
        ))
    };
    let name = |mcp: &McpIntegration| {
        Span::styled(
            format!("  {}", mcp.name),
            Style::default().fg(colors::TEXT_PRIMARY),
        )
    };

    let mut lines = Vec::new();
    let configured = agent.map_or(&[][..], |a| a.configured_mcps.as_slice());
    let custom = agent.map_or(&[][..], |a| a.custom_mcps.as_slice());

    if !configured.is_empty() {
        lines.push(heading("Configured Servers"));
        for mcp in configured {
            let mut spans = vec![name(mcp)];
            spans.extend(tools_count(mcp));
            lines.push(Line::from(spans));
        }
    }

    if !custom.is_empty() {
        if !lines.is_empty() {
            lines.push(Line::from(""));
        }
        lines.push(heading("Custom Servers"));
        for mcp in custom {
            let mut spans = vec![name(mcp)];
            if let Some(kind) = mcp.kind.as_deref() {
                spans.push(Span::styled(
                    format!("  [{kind}]"),
                    Style::default().fg(colors::TEXT_DIM),
                ));
            }
            spans.extend(tools_count(mcp));
            lines.push(Line::from(spans));
        }
    }

    if lines.is_empty() {
        lines.push(Line::from(Span::styled(
            "No MCP tools configured",
            Style::default().fg(colors::TEXT_MUTED),
        )));
    }
    lines
}

/// Render the tools popover above `anchor`
pub fn render_tools_popover(frame: &mut Frame<'_>, app: &App, anchor: Rect) {
    let resolution = app.selector.resolve(app.selected_agent_id.as_deref());
    let lines = tools_lines(resolution.effective());

    let height = u16::try_from(lines.len() + 2).unwrap_or(u16::MAX);
    let area = popup_above(anchor, height, frame.area());
    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .title(" MCP Tools ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(colors::BORDER)),
        )
        .style(Style::default().bg(colors::MODAL_BG));

    frame.render_widget(Clear, area);
    frame.render_widget(paragraph, area);
}
