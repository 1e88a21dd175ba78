//! Model module - Application state and data types
//!
//! This module contains the state of the samples app and the resource-lifecycle
//! logic behind the player and recorder samples:
//!
//! - `types`: Shell type definitions (menu, UI state)
//! - `error`: Feed, recorder and content errors
//! - `playlist`: Observable ordered playlist
//! - `player_pool`: Bounded pool of reusable player handles
//! - `feed`: Feed view-recycling controller
//! - `recorder`: Recorder control state machine
//! - `recorder_controls`: Recorder button affordances, Busy debounce, timer format
//! - `sample`: The samples and the resources each one owns
//! - `app_model`: Main application model

mod types;
mod error;
mod playlist;
mod player_pool;
mod feed;
mod recorder;
mod recorder_controls;
mod sample;
mod app_model;

pub use types::{MenuEntry, UiState};

pub use error::{ContentError, FeedError, RecorderError, RecorderOperation};

pub use playlist::Playlist;

pub use player_pool::{AspectMode, HandleId, LoopMode, PlaybackConfig};

pub use recorder::{RecorderState, RecorderStateMachine};

pub use recorder_controls::{format_timer, PrimaryButton};

pub use sample::{FeedSession, RecorderSample, Sample, SingleVideo};

pub use app_model::AppModel;
