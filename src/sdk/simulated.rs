//! Simulated devices used when no real decode/capture engine is linked in

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::model::{HandleId, PlaybackConfig};
use super::{CameraDirection, PlayerDevice, RecorderDevice, SdkError};

#[derive(Clone, Debug, Default)]
pub struct Surface {
    pub item: Option<String>,
    pub config: PlaybackConfig,
    pub playing: bool,
    pub started_at: Option<Instant>,
}

/// Player device that tracks surfaces in memory.
#[derive(Default)]
pub struct SimulatedPlayerDevice {
    surfaces: HashMap<HandleId, Surface>,
}

impl SimulatedPlayerDevice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn surface(&self, handle: HandleId) -> Option<&Surface> {
        self.surfaces.get(&handle)
    }
}

impl PlayerDevice for SimulatedPlayerDevice {
    fn create(&mut self, handle: HandleId) {
        tracing::debug!(handle = %handle, "Surface created");
        self.surfaces.insert(handle, Surface::default());
    }

    fn bind(&mut self, handle: HandleId, item: &str, config: &PlaybackConfig) {
        let surface = self.surfaces.entry(handle).or_default();
        surface.item = Some(item.to_string());
        surface.config = *config;
        surface.playing = false;
        surface.started_at = None;
        tracing::debug!(handle = %handle, item, "Surface bound");
    }

    fn play(&mut self, handle: HandleId) {
        if let Some(surface) = self.surfaces.get_mut(&handle) {
            surface.playing = true;
            surface.started_at = Some(Instant::now());
            tracing::trace!(handle = %handle, "Surface playing");
        }
    }

    fn pause(&mut self, handle: HandleId) {
        if let Some(surface) = self.surfaces.get_mut(&handle) {
            surface.playing = false;
            tracing::trace!(handle = %handle, "Surface paused");
        }
    }

    fn release(&mut self, handle: HandleId) {
        if let Some(surface) = self.surfaces.get_mut(&handle) {
            *surface = Surface::default();
            tracing::debug!(handle = %handle, "Surface released");
        }
    }
}

#[derive(Default)]
struct Capture {
    recorded: Duration,
    running_since: Option<Instant>,
    camera: CameraDirection,
}

impl Capture {
    fn suspend(&mut self) {
        if let Some(since) = self.running_since.take() {
            self.recorded += since.elapsed();
        }
    }
}

/// Recorder device that pretends to capture by measuring wall-clock time.
pub struct SimulatedRecorder {
    capture: Mutex<Capture>,
    start_latency: Duration,
}

impl SimulatedRecorder {
    pub fn new(start_latency: Duration) -> Self {
        Self {
            capture: Mutex::new(Capture::default()),
            start_latency,
        }
    }
}

#[async_trait]
impl RecorderDevice for SimulatedRecorder {
    async fn start(&self) -> Result<(), SdkError> {
        tokio::time::sleep(self.start_latency).await;
        let mut capture = self.capture.lock();
        if capture.running_since.is_none() {
            capture.running_since = Some(Instant::now());
        }
        tracing::debug!(recorded_ms = capture.recorded.as_millis() as u64, "Capture running");
        Ok(())
    }

    async fn reset(&self) -> Result<(), SdkError> {
        tokio::time::sleep(self.start_latency / 2).await;
        let mut capture = self.capture.lock();
        capture.running_since = None;
        capture.recorded = Duration::ZERO;
        tracing::debug!("Capture discarded");
        Ok(())
    }

    fn pause(&self) {
        self.capture.lock().suspend();
    }

    fn stop(&self) {
        let mut capture = self.capture.lock();
        capture.suspend();
        tracing::info!(recorded_ms = capture.recorded.as_millis() as u64, "Capture finalized");
        capture.recorded = Duration::ZERO;
    }

    fn enter_preview(&self) {
        self.capture.lock().suspend();
    }

    fn exit_preview(&self) {}

    fn toggle_camera(&self) -> CameraDirection {
        let mut capture = self.capture.lock();
        capture.camera = capture.camera.toggled();
        capture.camera
    }

    fn duration(&self) -> Duration {
        let capture = self.capture.lock();
        capture.recorded + capture.running_since.map(|s| s.elapsed()).unwrap_or_default()
    }
}
