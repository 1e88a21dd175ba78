//! Player samples: single video and the recycling feed

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, ListItem, Padding, Paragraph},
    Frame,
};

use crate::model::{AppModel, AspectMode, FeedSession, LoopMode, PlaybackConfig, SingleVideo};
use crate::sdk::SimulatedPlayerDevice;
use super::utils::{format_duration, render_scrollable_list, truncate_string};

fn config_label(config: &PlaybackConfig) -> String {
    let aspect = match config.aspect_mode {
        AspectMode::Crop => "Crop",
        AspectMode::Fit => "Fit",
    };
    let looping = match config.loop_mode {
        LoopMode::Repeat => "Repeat",
        LoopMode::Once => "Once",
    };
    format!("{} / {}", aspect, looping)
}

pub fn render_single_video(frame: &mut Frame, area: Rect, single: &SingleVideo<SimulatedPlayerDevice>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(area);

    let handle = single.handle_id();
    let surface = single.pool().device().surface(handle);
    let config = surface.map(|s| s.config).unwrap_or_default();

    let status = if single.is_playing() { "▶ Playing" } else { "⏸  Paused" };
    let lines = vec![
        Line::from(Span::styled(
            single.video.title.clone(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::from(format!("by {}", single.video.author)),
        Line::from(""),
        Line::from(vec![
            Span::styled(status, Style::default().fg(Color::Green)),
            Span::raw(format!("   player {}   {}", handle, config_label(&config))),
        ]),
    ];
    let info = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", single.video.id))
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(info, chunks[0]);

    // Looping position since the last play
    let duration_ms = single.video.duration_ms.max(1);
    let position_ms = surface
        .filter(|s| s.playing)
        .and_then(|s| s.started_at)
        .map(|t| (t.elapsed().as_millis() % duration_ms as u128) as u32)
        .unwrap_or(0);
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL))
        .gauge_style(Style::default().fg(Color::Green))
        .ratio((position_ms as f64 / duration_ms as f64).clamp(0.0, 1.0))
        .label(format!(
            "{} / {}",
            format_duration(position_ms),
            format_duration(single.video.duration_ms)
        ));
    frame.render_widget(gauge, chunks[1]);
}

pub fn render_feed(frame: &mut Frame, area: Rect, feed: &FeedSession<SimulatedPlayerDevice>, model: &AppModel) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(area);

    let controller = feed.controller();
    let pool = controller.pool();
    let active = controller.active_index();
    let title_width = (chunks[0].width as usize).saturating_sub(22).max(8);

    let items: Vec<ListItem> = feed
        .playlist()
        .ids()
        .iter()
        .enumerate()
        .map(|(i, id)| {
            let handle = pool.bound_to(i).and_then(|h| pool.handle(h));
            let marker = match handle {
                Some(h) if h.is_playing => "▶",
                Some(_) => "●",
                None => " ",
            };
            let player = handle.map(|h| h.id.to_string()).unwrap_or_default();
            let title = model.video_title(id).unwrap_or(id);
            let text = format!(" {} {:>3}  {}  {:>4}", marker, i + 1, truncate_string(title, title_width), player);

            let style = if Some(i) == active {
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
            } else if handle.is_some() {
                Style::default().fg(Color::White)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            ListItem::new(text).style(style)
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Feed ({}) ", feed.playlist().len()))
        .border_style(Style::default().fg(Color::Green));
    render_scrollable_list(frame, chunks[0], items, active.unwrap_or(0), block);

    let stats = pool.stats();
    let lines = vec![
        Line::from(format!("Capacity   {}", pool.capacity())),
        Line::from(format!("Live       {}", pool.live_count())),
        Line::from(format!("Playing    {}", pool.playing_count())),
        Line::from(""),
        Line::from(format!("Created    {}", stats.created)),
        Line::from(format!("Acquired   {}", stats.acquired)),
        Line::from(format!("Released   {}", stats.released)),
    ];
    let panel = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Player pool ")
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(panel, chunks[1]);
}
