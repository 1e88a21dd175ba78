//! Overlay rendering (error notification, help popup)

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::model::UiState;

const KEYBINDINGS: &[(&str, &str)] = &[
    ("", "── Menu ──"),
    ("↑ / ↓", "Move selection"),
    ("Enter", "Open sample"),
    ("Esc / Backspace", "Close sample"),
    ("", ""),
    ("", "── Recorder ──"),
    ("R", "Record / Resume"),
    ("P", "Pause"),
    ("S / Enter", "Preview / Confirm"),
    ("D / Delete", "Delete (exit preview)"),
    ("X", "Restart"),
    ("C", "Flip camera"),
    ("", ""),
    ("", "── Players ──"),
    ("Space", "Play / Pause"),
    ("↑ / ↓", "Scroll feed"),
    ("I", "Insert clip after current"),
    ("X", "Remove current clip"),
    ("M", "Move current clip to end"),
    ("U", "Refresh current clip"),
    ("", ""),
    ("", "── General ──"),
    ("H", "Toggle this help"),
    ("Q", "Quit"),
];

/// Centered rect clamped to the frame.
fn popup_area(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height.saturating_sub(2));
    Rect {
        x: area.width.saturating_sub(width) / 2,
        y: area.height.saturating_sub(height) / 2,
        width,
        height,
    }
}

fn popup_block(title: &str, color: Color) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
        .title(title)
        .title_style(Style::default().fg(color).add_modifier(Modifier::BOLD))
        .style(Style::default().bg(Color::Black))
}

pub fn render_error_notification(frame: &mut Frame, ui_state: &UiState) {
    let Some(error_msg) = &ui_state.error_message else {
        return;
    };
    let area = frame.area();

    let width = 52.min(area.width.saturating_sub(4));
    let inner_width = width.saturating_sub(4).max(1) as usize;
    let wrapped_lines = error_msg.chars().count().div_ceil(inner_width).max(1) as u16;
    let popup = popup_area(area, width, wrapped_lines + 2);

    frame.render_widget(Clear, popup);
    let error_widget = Paragraph::new(error_msg.as_str())
        .style(Style::default().fg(Color::Red))
        .wrap(Wrap { trim: false })
        .block(popup_block(" Error (Esc to dismiss) ", Color::Red));
    frame.render_widget(error_widget, popup);
}

pub fn render_help_popup(frame: &mut Frame) {
    let popup = popup_area(frame.area(), 62, KEYBINDINGS.len() as u16 + 2);
    frame.render_widget(Clear, popup);

    let lines: Vec<Line> = KEYBINDINGS
        .iter()
        .map(|(key, desc)| {
            if key.is_empty() {
                Line::from(Span::styled(
                    format!("{:^38}", desc),
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                ))
            } else {
                Line::from(vec![
                    Span::styled(
                        format!("{:>18}", key),
                        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                    ),
                    Span::raw("  "),
                    Span::styled(*desc, Style::default().fg(Color::White)),
                ])
            }
        })
        .collect();

    let help_text = Paragraph::new(lines).block(popup_block(" Help (H or Esc to close) ", Color::Cyan));
    frame.render_widget(help_text, popup);
}
