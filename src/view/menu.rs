//! Samples menu rendering

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, ListItem, Padding, Paragraph},
    Frame,
};

use crate::model::{MenuEntry, UiState};
use super::utils::render_scrollable_list;

pub fn render_menu(frame: &mut Frame, area: Rect, ui_state: &UiState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(MenuEntry::ALL.len() as u16 + 2),
            Constraint::Min(0), // Status message
        ])
        .split(area);

    let selected = MenuEntry::ALL
        .iter()
        .position(|entry| *entry == ui_state.menu_selected)
        .unwrap_or(0);

    let items: Vec<ListItem> = MenuEntry::ALL
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let style = if i == selected {
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(entry.label()).style(style)
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Samples ")
        .padding(Padding::horizontal(1))
        .border_style(Style::default().fg(Color::Green));
    render_scrollable_list(frame, chunks[0], items, selected, block);

    if let Some(message) = &ui_state.message {
        let status = Paragraph::new(message.as_str())
            .style(Style::default().fg(Color::Yellow))
            .block(Block::default().padding(Padding::horizontal(2)));
        frame.render_widget(status, chunks[1]);
    }
}
