//! Bounded pool of reusable player handles

use std::fmt;

use crate::sdk::PlayerDevice;
use super::error::FeedError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandleId(usize);

impl fmt::Display for HandleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum AspectMode {
    #[default]
    Crop,
    Fit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LoopMode {
    #[default]
    Repeat,
    Once,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct PlaybackConfig {
    pub aspect_mode: AspectMode,
    pub loop_mode: LoopMode,
}

#[derive(Clone, Debug)]
pub struct PlayerHandle {
    pub id: HandleId,
    pub bound_item: Option<String>,
    pub bound_index: Option<usize>,
    pub config: PlaybackConfig,
    pub is_playing: bool,
}

impl PlayerHandle {
    fn new(id: HandleId) -> Self {
        Self {
            id,
            bound_item: None,
            bound_index: None,
            config: PlaybackConfig::default(),
            is_playing: false,
        }
    }

    pub fn is_bound(&self) -> bool {
        self.bound_index.is_some()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PoolStats {
    pub created: usize,
    pub acquired: usize,
    pub released: usize,
}

/// Arena of handles. Handles are never destroyed, only unbound and reused.
pub struct PlayerPool<D> {
    device: D,
    handles: Vec<PlayerHandle>,
    /// Most recently released on top.
    free: Vec<HandleId>,
    capacity: usize,
    defaults: PlaybackConfig,
    stats: PoolStats,
}

impl<D: PlayerDevice> PlayerPool<D> {
    pub fn new(device: D, capacity: usize) -> Self {
        Self {
            device,
            handles: Vec::with_capacity(capacity),
            free: Vec::new(),
            capacity: capacity.max(1),
            defaults: PlaybackConfig::default(),
            stats: PoolStats::default(),
        }
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn stats(&self) -> PoolStats {
        self.stats
    }

    pub fn handle(&self, id: HandleId) -> Option<&PlayerHandle> {
        self.handles.get(id.0)
    }

    pub fn bound_to(&self, index: usize) -> Option<HandleId> {
        self.handles
            .iter()
            .find(|h| h.bound_index == Some(index))
            .map(|h| h.id)
    }

    /// Handles currently bound to an item.
    pub fn live_count(&self) -> usize {
        self.handles.iter().filter(|h| h.is_bound()).count()
    }

    pub fn playing_count(&self) -> usize {
        self.handles.iter().filter(|h| h.is_playing).count()
    }

    /// Returns the handle bound to `index`, binding a free or new one if needed.
    pub fn acquire(&mut self, index: usize, items: &[String]) -> Result<HandleId, FeedError> {
        let Some(item) = items.get(index) else {
            return Err(FeedError::OutOfRange { index, len: items.len() });
        };
        if let Some(existing) = self.bound_to(index) {
            return Ok(existing);
        }

        let id = match self.free.pop() {
            Some(id) => id,
            None if self.handles.len() < self.capacity => {
                let id = HandleId(self.handles.len());
                self.handles.push(PlayerHandle::new(id));
                self.device.create(id);
                self.stats.created += 1;
                id
            }
            None => {
                return Err(FeedError::ResourceExhausted { capacity: self.capacity });
            }
        };

        let handle = &mut self.handles[id.0];
        handle.bound_item = Some(item.clone());
        handle.bound_index = Some(index);
        handle.config = self.defaults;
        handle.is_playing = false;
        self.device.bind(id, item, &handle.config);
        self.stats.acquired += 1;

        tracing::debug!(handle = %id, index, item = %item, "Handle acquired");
        Ok(id)
    }

    /// Unbinds the handle and returns it to the free stack. Releasing a free handle is a no-op.
    pub fn release(&mut self, id: HandleId) -> bool {
        let Some(handle) = self.handles.get_mut(id.0) else {
            tracing::warn!(handle = %id, "Release of unknown handle ignored");
            return false;
        };
        if !handle.is_bound() {
            return false;
        }

        if handle.is_playing {
            self.device.pause(id);
        }
        self.device.release(id);
        let index = handle.bound_index.take();
        handle.bound_item = None;
        handle.is_playing = false;
        self.free.push(id);
        self.stats.released += 1;

        tracing::debug!(handle = %id, index = ?index, "Handle released");
        true
    }

    pub fn configure(&mut self, id: HandleId, config: PlaybackConfig) {
        if let Some(handle) = self.handles.get_mut(id.0).filter(|h| h.is_bound()) {
            handle.config = config;
            if let Some(item) = handle.bound_item.as_deref() {
                self.device.bind(id, item, &config);
            }
        }
    }

    pub fn play(&mut self, id: HandleId) {
        match self.handles.get_mut(id.0) {
            Some(handle) if handle.is_bound() => {
                if !handle.is_playing {
                    handle.is_playing = true;
                    self.device.play(id);
                }
            }
            _ => tracing::warn!(handle = %id, "Play on unbound handle ignored"),
        }
    }

    pub fn pause(&mut self, id: HandleId) {
        if let Some(handle) = self.handles.get_mut(id.0) {
            if handle.is_playing {
                handle.is_playing = false;
                self.device.pause(id);
            }
        }
    }

    pub fn toggle(&mut self, id: HandleId) {
        match self.handle(id).map(|h| h.is_playing) {
            Some(true) => self.pause(id),
            Some(false) => self.play(id),
            None => {}
        }
    }

    /// Follows a slot whose playlist position shifted.
    pub(crate) fn rebind_index(&mut self, id: HandleId, index: usize) {
        if let Some(handle) = self.handles.get_mut(id.0).filter(|h| h.is_bound()) {
            handle.bound_index = Some(index);
        }
    }

    /// Records new content for a bound handle without touching the device.
    pub(crate) fn refresh_item(&mut self, id: HandleId, item: &str) {
        if let Some(handle) = self.handles.get_mut(id.0).filter(|h| h.is_bound()) {
            handle.bound_item = Some(item.to_string());
        }
    }
}
