//! Recorder sample rendering

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Padding, Paragraph},
    Frame,
};

use crate::model::{format_timer, PrimaryButton, RecorderSample, RecorderState};
use crate::sdk::CameraDirection;

fn button(key: &str, label: &str, enabled: bool) -> Vec<Span<'static>> {
    let style = if enabled {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    vec![Span::styled(format!("[{}] {}", key, label), style), Span::raw("   ")]
}

pub fn render_recorder(frame: &mut Frame, area: Rect, sample: &RecorderSample) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // State + timer
            Constraint::Length(3), // Buttons
            Constraint::Min(0),    // Last clip
        ])
        .split(area);

    let state = sample.displayed_state();
    let controls = sample.controls();

    let state_label = match state {
        RecorderState::Idle => "Ready",
        RecorderState::Recording => "Recording",
        RecorderState::Paused => "Paused",
        RecorderState::Preview => "Preview",
        RecorderState::Busy => "Working...",
    };
    let camera = match sample.camera {
        CameraDirection::Front => "front camera",
        CameraDirection::Back => "back camera",
    };

    let mut status = Vec::new();
    if controls.recording_indicator {
        status.push(Span::styled("● ", Style::default().fg(Color::Red)));
    }
    status.push(Span::styled(state_label, Style::default().add_modifier(Modifier::BOLD)));
    status.push(Span::raw(format!("   {}", camera)));

    let mut lines = vec![Line::from(status)];
    if controls.show_timer {
        lines.push(Line::from(Span::styled(
            sample.timer.clone(),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )));
    }
    let header = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Camera ")
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(header, chunks[0]);

    let mut spans = Vec::new();
    match controls.primary {
        PrimaryButton::Record => spans.extend(button("R", "Record", true)),
        PrimaryButton::Pause => spans.extend(button("P", "Pause", true)),
        PrimaryButton::Hidden if state == RecorderState::Paused => spans.extend(button("R", "Resume", true)),
        PrimaryButton::Hidden => {}
    }
    if controls.can_delete {
        spans.extend(button("D", "Delete", true));
    }
    if controls.can_restart {
        spans.extend(button("X", "Restart", true));
    }
    spans.extend(button("C", "Flip camera", controls.can_toggle_camera));
    spans.extend(button("S", controls.proceed_label, controls.can_proceed));

    let buttons = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
    frame.render_widget(buttons, chunks[1]);

    let last_clip = match &sample.last_clip {
        Some(clip) => format!(
            "Clip #{} started {} ({})",
            clip.recording.id,
            clip.recording.started_at.format("%H:%M:%S"),
            format_timer(clip.duration)
        ),
        None => "No clip recorded yet".to_string(),
    };
    let footer = Paragraph::new(last_clip)
        .style(Style::default().fg(Color::Gray))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Last clip ")
                .padding(Padding::horizontal(1)),
        );
    frame.render_widget(footer, chunks[2]);
}
