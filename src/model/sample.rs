//! The three demo samples and the resources each one owns

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Mutex, MutexGuard};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::sdk::{CameraDirection, PlayerDevice, SimulatedPlayerDevice, VideoItem};
use super::error::FeedError;
use super::feed::FeedController;
use super::player_pool::{HandleId, PlayerPool};
use super::playlist::{Playlist, SubscriptionId};
use super::recorder::{FinishedRecording, Recording, RecorderState, RecorderStateMachine};
use super::recorder_controls::{format_timer, BusyDebounce, RecorderControls};

pub enum Sample {
    Recorder(RecorderSample),
    PlayVideo(SingleVideo<SimulatedPlayerDevice>),
    PlayFeed(FeedSession<SimulatedPlayerDevice>),
}

impl Sample {
    pub fn title(&self) -> &'static str {
        match self {
            Sample::Recorder(_) => "Recorder",
            Sample::PlayVideo(_) => "Player (single video)",
            Sample::PlayFeed(_) => "Player (feed)",
        }
    }
}

pub struct RecorderSample {
    pub machine: RecorderStateMachine,
    recording: watch::Receiver<Option<Recording>>,
    debounce: BusyDebounce,
    displayed: RecorderState,
    controls: RecorderControls,
    pub camera: CameraDirection,
    pub timer: String,
    pub last_clip: Option<FinishedRecording>,
    listeners: Vec<JoinHandle<()>>,
}

impl RecorderSample {
    pub fn new(machine: RecorderStateMachine, busy_debounce: Duration) -> Self {
        let displayed = RecorderState::Busy;
        let recording = machine.subscribe_recording();
        let has_recording = recording.borrow().is_some();
        Self {
            controls: RecorderControls::derive(displayed, has_recording),
            machine,
            recording,
            debounce: BusyDebounce::new(busy_debounce),
            displayed,
            camera: CameraDirection::default(),
            timer: format_timer(Duration::ZERO),
            last_clip: None,
            listeners: Vec::new(),
        }
    }

    /// Re-reads the machine through the Busy debounce.
    pub fn refresh(&mut self, now: Instant) {
        self.displayed = self.debounce.update(self.machine.state(), now);
        let has_recording = self.recording.borrow().is_some();
        self.controls = RecorderControls::derive(self.displayed, has_recording);
    }

    pub fn displayed_state(&self) -> RecorderState {
        self.displayed
    }

    pub fn controls(&self) -> &RecorderControls {
        &self.controls
    }

    /// Background tasks feeding this sample; aborted when it closes.
    pub fn attach_listener(&mut self, task: JoinHandle<()>) {
        self.listeners.push(task);
    }
}

impl Drop for RecorderSample {
    fn drop(&mut self) {
        for task in self.listeners.drain(..) {
            task.abort();
        }
    }
}

/// One player with the default Crop/Repeat config, playing as soon as it opens.
pub struct SingleVideo<D: PlayerDevice> {
    pub video: VideoItem,
    pool: PlayerPool<D>,
    handle: HandleId,
}

impl<D: PlayerDevice> SingleVideo<D> {
    pub fn new(video: VideoItem, device: D) -> Result<Self, FeedError> {
        let mut pool = PlayerPool::new(device, 1);
        let handle = pool.acquire(0, std::slice::from_ref(&video.id))?;
        pool.play(handle);
        tracing::info!(video = %video.id, "Single video opened");
        Ok(Self { video, pool, handle })
    }

    pub fn toggle(&mut self) {
        self.pool.toggle(self.handle);
    }

    pub fn is_playing(&self) -> bool {
        self.pool.handle(self.handle).is_some_and(|h| h.is_playing)
    }

    pub fn handle_id(&self) -> HandleId {
        self.handle
    }

    pub fn pool(&self) -> &PlayerPool<D> {
        &self.pool
    }
}

impl<D: PlayerDevice> Drop for SingleVideo<D> {
    fn drop(&mut self) {
        self.pool.release(self.handle);
    }
}

/// A playlist shown through the recycling feed.
///
/// The controller observes the playlist for as long as the session lives.
pub struct FeedSession<D: PlayerDevice + Send + 'static> {
    playlist: Playlist,
    controller: Arc<Mutex<FeedController<D>>>,
    subscription: Option<SubscriptionId>,
}

impl<D: PlayerDevice + Send + 'static> FeedSession<D> {
    pub fn new(mut playlist: Playlist, device: D, capacity: usize, offscreen_limit: usize) -> Self {
        let pool = PlayerPool::new(device, capacity);
        let controller = FeedController::new(pool, playlist.ids().to_vec(), offscreen_limit);
        let controller = Arc::new(Mutex::new(controller));
        let subscription = playlist.subscribe(controller.clone());

        if !playlist.is_empty() {
            if let Err(e) = controller.lock().set_focus(0) {
                tracing::error!(error = %e, "Could not focus first video");
            }
        }

        Self {
            playlist,
            controller,
            subscription: Some(subscription),
        }
    }

    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    pub fn controller(&self) -> MutexGuard<'_, FeedController<D>> {
        self.controller.lock()
    }

    fn focus(&self) -> Option<usize> {
        self.controller.lock().active_index()
    }

    pub fn focus_next(&mut self) -> Result<(), FeedError> {
        let next = self.focus().map_or(0, |f| f + 1);
        if next >= self.playlist.len() {
            return Ok(());
        }
        self.controller.lock().set_focus(next)
    }

    pub fn focus_previous(&mut self) -> Result<(), FeedError> {
        match self.focus() {
            Some(f) if f > 0 => self.controller.lock().set_focus(f - 1),
            _ => Ok(()),
        }
    }

    pub fn toggle(&mut self) {
        self.controller.lock().toggle_active();
    }

    pub fn insert_after_focus(&mut self, id: String) -> Result<(), FeedError> {
        let at = self.focus().map_or(0, |f| f + 1);
        self.playlist.insert(at, vec![id])
    }

    pub fn remove_focused(&mut self) -> Result<(), FeedError> {
        let Some(focus) = self.focus() else {
            return Ok(());
        };
        self.playlist.remove(focus, 1)?;
        if !self.playlist.is_empty() {
            let next = focus.min(self.playlist.len() - 1);
            self.controller.lock().set_focus(next)?;
        }
        Ok(())
    }

    pub fn move_focused_to_end(&mut self) -> Result<(), FeedError> {
        let Some(focus) = self.focus() else {
            return Ok(());
        };
        let last = self.playlist.len().saturating_sub(1);
        self.playlist.move_item(focus, last)
    }

    /// Metadata refresh of the focused item, keeping its id.
    pub fn refresh_focused(&mut self) -> Result<(), FeedError> {
        let Some(item) = self.focus().and_then(|f| self.playlist.get(f)) else {
            return Ok(());
        };
        self.playlist.replace(item.position, vec![item.id])
    }

    /// Stops observing the playlist and releases every handle.
    pub fn close(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            self.playlist.unsubscribe(subscription);
            self.controller.lock().teardown();
            let stats = self.controller.lock().pool().stats();
            tracing::info!(
                created = stats.created,
                acquired = stats.acquired,
                released = stats.released,
                "Feed closed"
            );
        }
    }
}

impl<D: PlayerDevice + Send + 'static> Drop for FeedSession<D> {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    use crate::model::player_pool::tests::{items, Call, CallLog};
    use crate::model::recorder_controls::PrimaryButton;
    use crate::sdk::SimulatedRecorder;

    fn session(values: &[&str]) -> (FeedSession<CallLog>, CallLog) {
        let log = CallLog::default();
        let playlist = Playlist::from_ids(items(values)).unwrap();
        (FeedSession::new(playlist, log.clone(), 3, 1), log)
    }

    #[test]
    fn opens_on_first_video() {
        let (session, _log) = session(&["A", "B"]);
        assert_eq!(session.controller().active_index(), Some(0));
        assert_eq!(session.controller().pool().playing_count(), 1);
        assert_eq!(session.playlist().observer_count(), 1);
    }

    #[test]
    fn scrolling_stops_at_the_ends() {
        let (mut session, _log) = session(&["A", "B"]);
        session.focus_previous().unwrap();
        assert_eq!(session.controller().active_index(), Some(0));
        session.focus_next().unwrap();
        session.focus_next().unwrap();
        assert_eq!(session.controller().active_index(), Some(1));
    }

    #[test]
    fn removing_focused_plays_the_next() {
        let (mut session, _log) = session(&["A", "B", "C"]);
        session.remove_focused().unwrap();
        let controller = session.controller();
        assert_eq!(controller.active_index(), Some(0));
        assert_eq!(controller.item(0), Some("B"));
        assert_eq!(controller.pool().playing_count(), 1);
    }

    #[test]
    fn insert_move_and_refresh_go_through_the_playlist() {
        let (mut session, log) = session(&["A", "B", "C"]);
        session.insert_after_focus("X".to_string()).unwrap();
        assert_eq!(session.playlist().ids(), ["A", "X", "B", "C"]);

        log.take();
        session.refresh_focused().unwrap();
        assert!(log.take().is_empty());

        session.move_focused_to_end().unwrap();
        assert_eq!(session.playlist().ids(), ["X", "B", "C", "A"]);
        assert_eq!(session.controller().active_index(), Some(3));
        assert_eq!(session.controller().item(3), Some("A"));
    }

    #[test]
    fn close_unsubscribes_and_balances() {
        let (mut session, log) = session(&["A", "B", "C"]);
        session.focus_next().unwrap();
        session.close();
        session.close();

        assert_eq!(session.playlist().observer_count(), 0);
        let stats = session.controller().pool().stats();
        assert_eq!(stats.acquired, stats.released);
        let releases = log.take().iter().filter(|c| matches!(c, Call::Release(_))).count();
        assert_eq!(releases, stats.released);
    }

    #[test]
    fn single_video_plays_and_releases_on_drop() {
        let log = CallLog::default();
        let video = VideoItem {
            id: "clip".to_string(),
            title: "Clip".to_string(),
            author: "me".to_string(),
            duration_ms: 1_000,
            tags: Vec::new(),
            created_at: Utc::now(),
        };
        let mut single = SingleVideo::new(video, log.clone()).unwrap();
        assert!(single.is_playing());
        single.toggle();
        assert!(!single.is_playing());
        let handle = single.handle;

        drop(single);
        assert_eq!(log.take().last(), Some(&Call::Release(handle)));
    }

    #[tokio::test]
    async fn recorder_sample_shows_idle_controls() {
        let device = Arc::new(SimulatedRecorder::new(Duration::ZERO));
        let (machine, _errors) = RecorderStateMachine::new(device);
        let mut sample = RecorderSample::new(machine, Duration::from_millis(400));
        assert_eq!(sample.displayed_state(), RecorderState::Busy);

        sample.refresh(Instant::now());
        assert_eq!(sample.displayed_state(), RecorderState::Idle);
        assert_eq!(sample.controls().primary, PrimaryButton::Record);
    }

    #[tokio::test]
    async fn recorder_controls_follow_recording_presence() {
        let device = Arc::new(SimulatedRecorder::new(Duration::ZERO));
        let (machine, _errors) = RecorderStateMachine::new(device);
        let mut sample = RecorderSample::new(machine.clone(), Duration::ZERO);

        machine.start_suspending().await.unwrap();
        sample.refresh(Instant::now());
        assert!(sample.controls().can_delete);

        machine.reset().await.unwrap();
        sample.refresh(Instant::now());
        assert_eq!(sample.displayed_state(), RecorderState::Idle);
        assert!(!sample.controls().can_delete);
    }

    #[tokio::test]
    async fn recorder_sample_aborts_listeners_on_drop() {
        let device = Arc::new(SimulatedRecorder::new(Duration::ZERO));
        let (machine, _errors) = RecorderStateMachine::new(device);
        let mut sample = RecorderSample::new(machine, Duration::ZERO);

        let task = tokio::spawn(std::future::pending::<()>());
        let abort = task.abort_handle();
        sample.attach_listener(task);
        drop(sample);
        for _ in 0..10 {
            if abort.is_finished() {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert!(abort.is_finished());
    }
}
