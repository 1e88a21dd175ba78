//! Main application model with state management

use std::collections::HashMap;
use std::time::{Duration, Instant};

use super::sample::Sample;
use super::types::{MenuEntry, UiState};

const ERROR_DISPLAY_TIME: Duration = Duration::from_secs(5);

/// Main application model containing all state
pub struct AppModel {
    sample: Option<Sample>,
    ui_state: UiState,
    should_quit: bool,
    identity: String,
    extra_clips: usize,
    video_titles: HashMap<String, String>,
}

impl AppModel {
    pub fn new(identity: String) -> Self {
        Self {
            sample: None,
            ui_state: UiState::default(),
            should_quit: false,
            identity,
            extra_clips: 0,
            video_titles: HashMap::new(),
        }
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    // ========================================================================
    // Samples
    // ========================================================================

    pub fn sample(&self) -> Option<&Sample> {
        self.sample.as_ref()
    }

    pub fn sample_mut(&mut self) -> Option<&mut Sample> {
        self.sample.as_mut()
    }

    /// Replacing a sample drops the previous one and the resources it owns.
    pub fn open_sample(&mut self, sample: Sample) {
        tracing::info!(sample = sample.title(), "Sample opened");
        self.ui_state.message = None;
        self.sample = Some(sample);
    }

    pub fn close_sample(&mut self) {
        if let Some(sample) = self.sample.take() {
            tracing::info!(sample = sample.title(), "Sample closed");
        }
    }

    /// Fresh id for clips added from the feed.
    pub fn next_clip_id(&mut self) -> String {
        self.extra_clips += 1;
        format!("extra-{:02}", self.extra_clips)
    }

    pub fn remember_title(&mut self, id: String, title: String) {
        self.video_titles.insert(id, title);
    }

    pub fn video_title(&self, id: &str) -> Option<&str> {
        self.video_titles.get(id).map(String::as_str)
    }

    // ========================================================================
    // Menu & Messages
    // ========================================================================

    pub fn menu_move_up(&mut self) {
        self.ui_state.menu_selected = self.ui_state.menu_selected.prev();
    }

    pub fn menu_move_down(&mut self) {
        self.ui_state.menu_selected = self.ui_state.menu_selected.next();
    }

    pub fn selected_menu_entry(&self) -> MenuEntry {
        self.ui_state.menu_selected
    }

    pub fn set_message(&mut self, message: impl Into<String>) {
        self.ui_state.message = Some(message.into());
    }

    pub fn clear_message(&mut self) {
        self.ui_state.message = None;
    }

    pub fn set_error(&mut self, error: impl Into<String>) {
        let error = error.into();
        tracing::warn!(error = %error, "Error shown to user");
        self.ui_state.error_message = Some(error);
        self.ui_state.error_timestamp = Some(Instant::now());
    }

    pub fn clear_error(&mut self) {
        self.ui_state.error_message = None;
        self.ui_state.error_timestamp = None;
    }

    pub fn has_error(&self) -> bool {
        self.ui_state.error_message.is_some()
    }

    pub fn auto_clear_old_errors(&mut self) {
        if self
            .ui_state
            .error_timestamp
            .is_some_and(|t| t.elapsed() >= ERROR_DISPLAY_TIME)
        {
            self.clear_error();
        }
    }

    pub fn ui_state(&self) -> &UiState {
        &self.ui_state
    }

    pub fn show_help_popup(&mut self) {
        self.ui_state.show_help_popup = true;
    }

    pub fn hide_help_popup(&mut self) {
        self.ui_state.show_help_popup = false;
    }

    pub fn is_help_popup_open(&self) -> bool {
        self.ui_state.show_help_popup
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn set_should_quit(&mut self, quit: bool) {
        self.should_quit = quit;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn menu_wraps_around() {
        let mut model = AppModel::new("tester".into());
        model.menu_move_up();
        assert_eq!(model.selected_menu_entry(), MenuEntry::Feed);
        model.menu_move_down();
        assert_eq!(model.selected_menu_entry(), MenuEntry::Recorder);
    }

    #[test]
    fn clip_ids_are_unique() {
        let mut model = AppModel::new("tester".into());
        assert_ne!(model.next_clip_id(), model.next_clip_id());
    }

    #[test]
    fn errors_clear_explicitly() {
        let mut model = AppModel::new("tester".into());
        model.set_error("boom");
        model.auto_clear_old_errors();
        assert!(model.has_error());
        model.clear_error();
        assert!(!model.has_error());
    }
}
