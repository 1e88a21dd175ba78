//! View module - UI rendering
//!
//! This module handles all UI rendering for the application using ratatui.
//! It is organized into submodules by component type:
//!
//! - `utils`: Shared utility functions (formatting, scrollable lists)
//! - `menu`: Samples menu and status message
//! - `player`: Single-video and feed samples
//! - `recorder`: Recorder sample
//! - `overlays`: Modal overlays (error, help)

mod utils;
mod menu;
mod player;
mod recorder;
mod overlays;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::model::{AppModel, Sample};

pub struct AppView;

impl AppView {
    pub fn render(frame: &mut Frame, model: &AppModel) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Title + identity
                Constraint::Min(0),    // Menu or open sample
                Constraint::Length(3), // Key hints
            ])
            .split(frame.area());

        Self::render_top_bar(frame, chunks[0], model);

        match model.sample() {
            None => menu::render_menu(frame, chunks[1], model.ui_state()),
            Some(Sample::Recorder(sample)) => recorder::render_recorder(frame, chunks[1], sample),
            Some(Sample::PlayVideo(single)) => player::render_single_video(frame, chunks[1], single),
            Some(Sample::PlayFeed(feed)) => player::render_feed(frame, chunks[1], feed, model),
        }

        Self::render_hints(frame, chunks[2], model.sample());

        let ui_state = model.ui_state();
        if ui_state.error_message.is_some() {
            overlays::render_error_notification(frame, ui_state);
        }

        if ui_state.show_help_popup {
            overlays::render_help_popup(frame);
        }
    }

    fn render_top_bar(frame: &mut Frame, area: Rect, model: &AppModel) {
        let title = match model.sample() {
            Some(sample) => format!(" VideoKit Samples / {} ", sample.title()),
            None => " VideoKit Samples ".to_string(),
        };
        let bar = Paragraph::new(format!(" {}", model.identity()))
            .style(Style::default().fg(Color::Cyan))
            .block(Block::default().borders(Borders::ALL).title(title));
        frame.render_widget(bar, area);
    }

    fn render_hints(frame: &mut Frame, area: Rect, sample: Option<&Sample>) {
        let hints = match sample {
            None => "↑↓ select | Enter open | H help | Q quit",
            Some(Sample::Recorder(_)) => "R record | P pause | S preview/confirm | D delete | X restart | C camera | Esc back",
            Some(Sample::PlayVideo(_)) => "Space play/pause | Esc back",
            Some(Sample::PlayFeed(_)) => "↑↓ scroll | Space play/pause | I insert | X remove | M move to end | U refresh | Esc back",
        };
        let bar = Paragraph::new(Line::from(format!(" {}", hints)))
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(bar, area);
    }
}
