//! Core type definitions for the application shell

use std::time::Instant;

/// Entries of the samples menu
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum MenuEntry {
    #[default]
    Recorder,
    SingleVideo,
    Feed,
}

impl MenuEntry {
    pub const ALL: [MenuEntry; 3] = [MenuEntry::Recorder, MenuEntry::SingleVideo, MenuEntry::Feed];

    pub fn next(self) -> Self {
        match self {
            MenuEntry::Recorder => MenuEntry::SingleVideo,
            MenuEntry::SingleVideo => MenuEntry::Feed,
            MenuEntry::Feed => MenuEntry::Recorder,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            MenuEntry::Recorder => MenuEntry::Feed,
            MenuEntry::SingleVideo => MenuEntry::Recorder,
            MenuEntry::Feed => MenuEntry::SingleVideo,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MenuEntry::Recorder => "Recorder",
            MenuEntry::SingleVideo => "Player (single video)",
            MenuEntry::Feed => "Player (feed)",
        }
    }
}

/// UI state for the application
#[derive(Clone, Debug, Default)]
pub struct UiState {
    pub menu_selected: MenuEntry,
    /// Status line under the menu (loading, not found)
    pub message: Option<String>,
    pub error_message: Option<String>,
    pub error_timestamp: Option<Instant>,
    pub show_help_popup: bool,
}
