//! SDK collaborator contracts
//!
//! The video SDK is an external collaborator: this module only describes what the
//! samples need from it and ships an in-process simulation so the app runs without
//! a real backend.
//!
//! - `session`: session bootstrap (app token + identity)
//! - `catalog`: content fetch (video lists, playlists)
//! - `simulated`: simulated player and recorder devices

mod session;
mod catalog;
mod simulated;

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::model::{HandleId, PlaybackConfig};

pub use session::Sessions;
pub use catalog::{DemoCatalog, FilteredPlaylistSpec, FilteredVideosRequest, VideoItem, VideoService};
pub use simulated::{SimulatedPlayerDevice, SimulatedRecorder};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SdkError {
    #[error("app token is empty, set VIDEOKIT_APP_TOKEN or the config file")]
    MissingAppToken,
    #[error("session not started")]
    NotStarted,
    #[error("device error: {0}")]
    Device(String),
    #[error("request failed: {0}")]
    Request(String),
}

/// Decoder/renderer surfaces, one per pooled handle.
///
/// Calls are issued from the feed's single execution context and are infallible
/// from the caller's point of view; devices log their own failures.
pub trait PlayerDevice {
    fn create(&mut self, handle: HandleId);
    fn bind(&mut self, handle: HandleId, item: &str, config: &PlaybackConfig);
    fn play(&mut self, handle: HandleId);
    fn pause(&mut self, handle: HandleId);
    fn release(&mut self, handle: HandleId);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum CameraDirection {
    #[default]
    Front,
    Back,
}

impl CameraDirection {
    pub fn toggled(self) -> Self {
        match self {
            CameraDirection::Front => CameraDirection::Back,
            CameraDirection::Back => CameraDirection::Front,
        }
    }
}

/// Capture device driven by the recorder state machine.
#[async_trait]
pub trait RecorderDevice: Send + Sync {
    /// Begins or continues capturing into the current recording.
    async fn start(&self) -> Result<(), SdkError>;
    /// Discards the current recording.
    async fn reset(&self) -> Result<(), SdkError>;
    fn pause(&self);
    /// Finalizes the current recording.
    fn stop(&self);
    fn enter_preview(&self);
    fn exit_preview(&self);
    fn toggle_camera(&self) -> CameraDirection;
    /// Captured footage length so far.
    fn duration(&self) -> Duration;
}
