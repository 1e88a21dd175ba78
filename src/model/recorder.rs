//! Recorder control state machine
//!
//! Gates user actions on the current recorder state and drives the capture device.
//! Async operations park the machine in `Busy` until the device answers; while
//! Busy every triggering action is ignored. Failures revert to the state the
//! machine was in before the attempt and are reported both to the caller and on
//! the error channel.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::{DateTime, Local};
use futures::Stream;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::sdk::{CameraDirection, RecorderDevice, SdkError};
use super::error::{RecorderError, RecorderOperation};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecorderState {
    Idle,
    Recording,
    Paused,
    Preview,
    Busy,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecorderAction {
    Start,
    Pause,
    Resume,
    /// Stop capturing and show the preview
    Stop,
    Reset,
    ExitPreview,
    /// Finalize the clip from the preview
    Confirm,
    Restart,
    ToggleCamera,
}

impl RecorderState {
    pub fn allows(self, action: RecorderAction, has_recording: bool) -> bool {
        use RecorderAction as A;
        use RecorderState as S;

        match (self, action) {
            (S::Busy, _) => false,
            (S::Idle, A::Start) => true,
            (S::Recording, A::Pause) => true,
            (S::Recording, A::Stop) => has_recording,
            (S::Paused, A::Resume | A::Stop) => true,
            (S::Recording | S::Paused | S::Preview, A::Reset) => true,
            (S::Recording | S::Paused | S::Preview, A::Restart) => has_recording,
            (S::Preview, A::ExitPreview | A::Confirm) => true,
            (S::Idle | S::Recording | S::Paused, A::ToggleCamera) => true,
            _ => false,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Recording {
    pub id: u64,
    pub started_at: DateTime<Local>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FinishedRecording {
    pub recording: Recording,
    pub duration: Duration,
}

struct Shared {
    device: Arc<dyn RecorderDevice>,
    state: watch::Sender<RecorderState>,
    recording: watch::Sender<Option<Recording>>,
    errors: mpsc::UnboundedSender<RecorderError>,
    next_recording: AtomicU64,
}

#[derive(Clone)]
pub struct RecorderStateMachine {
    shared: Arc<Shared>,
}

impl RecorderStateMachine {
    /// Creates the machine in `Idle` together with its error channel.
    pub fn new(device: Arc<dyn RecorderDevice>) -> (Self, mpsc::UnboundedReceiver<RecorderError>) {
        let (errors, errors_rx) = mpsc::unbounded_channel();
        let machine = Self {
            shared: Arc::new(Shared {
                device,
                state: watch::Sender::new(RecorderState::Idle),
                recording: watch::Sender::new(None),
                errors,
                next_recording: AtomicU64::new(1),
            }),
        };
        (machine, errors_rx)
    }

    pub fn state(&self) -> RecorderState {
        *self.shared.state.borrow()
    }

    pub fn recording(&self) -> Option<Recording> {
        self.shared.recording.borrow().clone()
    }

    pub fn has_recording(&self) -> bool {
        self.shared.recording.borrow().is_some()
    }

    pub fn subscribe_state(&self) -> watch::Receiver<RecorderState> {
        self.shared.state.subscribe()
    }

    pub fn subscribe_recording(&self) -> watch::Receiver<Option<Recording>> {
        self.shared.recording.subscribe()
    }

    pub fn duration(&self) -> Duration {
        self.shared.device.duration()
    }

    /// Captured duration, sampled immediately and then every `period`.
    pub fn duration_flow(&self, period: Duration) -> impl Stream<Item = Duration> + Send + use<> {
        let device = self.shared.device.clone();
        futures::stream::unfold((device, true), move |(device, first)| async move {
            if !first {
                tokio::time::sleep(period).await;
            }
            let duration = device.duration();
            Some((duration, (device, false)))
        })
    }

    /// Moves to Busy if `action` is legal, returning the state to revert to.
    fn enter_busy(&self, action: RecorderAction) -> Option<RecorderState> {
        let has_recording = self.has_recording();
        let mut previous = None;
        self.shared.state.send_if_modified(|state| {
            if state.allows(action, has_recording) {
                previous = Some(*state);
                *state = RecorderState::Busy;
                true
            } else {
                false
            }
        });
        if previous.is_none() {
            tracing::trace!(?action, state = ?self.state(), "Recorder action ignored");
        }
        previous
    }

    fn apply(&self, action: RecorderAction, to: RecorderState, effect: impl FnOnce(&dyn RecorderDevice)) -> bool {
        let has_recording = self.has_recording();
        let applied = self.shared.state.send_if_modified(|state| {
            if state.allows(action, has_recording) {
                *state = to;
                true
            } else {
                false
            }
        });
        if applied {
            effect(self.shared.device.as_ref());
            tracing::debug!(?action, state = ?to, "Recorder transition");
        } else {
            tracing::trace!(?action, state = ?self.state(), "Recorder action ignored");
        }
        applied
    }

    fn settle(&self, state: RecorderState) {
        self.shared.state.send_replace(state);
        tracing::debug!(?state, "Recorder settled");
    }

    fn begin_recording(&self) {
        if self.has_recording() {
            return;
        }
        let id = self.shared.next_recording.fetch_add(1, Ordering::Relaxed);
        self.shared.recording.send_replace(Some(Recording {
            id,
            started_at: Local::now(),
        }));
    }

    fn fail(
        &self,
        operation: RecorderOperation,
        revert_to: RecorderState,
        source: SdkError,
    ) -> Result<bool, RecorderError> {
        self.settle(revert_to);
        let error = RecorderError::AsyncOperationFailed { operation, source };
        tracing::warn!(error = %error, reverted_to = ?revert_to, "Recorder operation failed");
        // The receiver may be gone when the sample was closed mid-operation.
        let _ = self.shared.errors.send(error.clone());
        Err(error)
    }

    /// Idle → Busy → Recording. Returns `Ok(false)` when the action was not legal.
    pub async fn start_suspending(&self) -> Result<bool, RecorderError> {
        let Some(previous) = self.enter_busy(RecorderAction::Start) else {
            return Ok(false);
        };
        match self.shared.device.start().await {
            Ok(()) => {
                self.begin_recording();
                self.settle(RecorderState::Recording);
                Ok(true)
            }
            Err(e) => self.fail(RecorderOperation::Start, previous, e),
        }
    }

    /// Paused → Busy → Recording.
    pub async fn resume_suspending(&self) -> Result<bool, RecorderError> {
        let Some(previous) = self.enter_busy(RecorderAction::Resume) else {
            return Ok(false);
        };
        match self.shared.device.start().await {
            Ok(()) => {
                self.settle(RecorderState::Recording);
                Ok(true)
            }
            Err(e) => self.fail(RecorderOperation::Resume, previous, e),
        }
    }

    /// Discards the recording: Recording/Paused/Preview → Busy → Idle.
    pub async fn reset_suspending(&self) -> Result<bool, RecorderError> {
        let Some(previous) = self.enter_busy(RecorderAction::Reset) else {
            return Ok(false);
        };
        match self.shared.device.reset().await {
            Ok(()) => {
                self.shared.recording.send_replace(None);
                self.settle(RecorderState::Idle);
                Ok(true)
            }
            Err(e) => self.fail(RecorderOperation::Reset, previous, e),
        }
    }

    /// Reset then start inside a single Busy span.
    ///
    /// A failed reset reverts to the previous state with the recording intact. A
    /// failed start lands in Idle, since the old footage is already gone.
    pub async fn restart_suspending(&self) -> Result<bool, RecorderError> {
        let Some(previous) = self.enter_busy(RecorderAction::Restart) else {
            return Ok(false);
        };
        if let Err(e) = self.shared.device.reset().await {
            return self.fail(RecorderOperation::Restart, previous, e);
        }
        self.shared.recording.send_replace(None);

        match self.shared.device.start().await {
            Ok(()) => {
                self.begin_recording();
                self.settle(RecorderState::Recording);
                Ok(true)
            }
            Err(e) => self.fail(RecorderOperation::Restart, RecorderState::Idle, e),
        }
    }

    pub fn start(&self) -> JoinHandle<()> {
        let this = self.clone();
        tokio::spawn(async move {
            let _ = this.start_suspending().await;
        })
    }

    pub fn resume(&self) -> JoinHandle<()> {
        let this = self.clone();
        tokio::spawn(async move {
            let _ = this.resume_suspending().await;
        })
    }

    pub fn reset(&self) -> JoinHandle<()> {
        let this = self.clone();
        tokio::spawn(async move {
            let _ = this.reset_suspending().await;
        })
    }

    pub fn restart(&self) -> JoinHandle<()> {
        let this = self.clone();
        tokio::spawn(async move {
            let _ = this.restart_suspending().await;
        })
    }

    pub fn pause(&self) -> bool {
        self.apply(RecorderAction::Pause, RecorderState::Paused, |d| d.pause())
    }

    /// Stop capturing and show the preview.
    pub fn enter_preview(&self) -> bool {
        self.apply(RecorderAction::Stop, RecorderState::Preview, |d| d.enter_preview())
    }

    /// Back from the preview to a paused recording.
    pub fn exit_preview(&self) -> bool {
        self.apply(RecorderAction::ExitPreview, RecorderState::Paused, |d| d.exit_preview())
    }

    /// Finalizes the previewed clip and returns to Idle.
    pub fn confirm(&self) -> Option<FinishedRecording> {
        let duration = self.duration();
        if !self.apply(RecorderAction::Confirm, RecorderState::Idle, |d| d.stop()) {
            return None;
        }
        let recording = self.shared.recording.send_replace(None)?;
        tracing::info!(recording = recording.id, duration_ms = duration.as_millis() as u64, "Recording confirmed");
        Some(FinishedRecording { recording, duration })
    }

    pub fn toggle_camera(&self) -> Option<CameraDirection> {
        let mut direction = None;
        self.apply(RecorderAction::ToggleCamera, self.state(), |d| direction = Some(d.toggle_camera()));
        direction
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicBool;

    use async_trait::async_trait;
    use parking_lot::Mutex;
    use tokio::sync::Notify;

    #[derive(Default)]
    struct ScriptedDevice {
        gate_start: AtomicBool,
        gate: Notify,
        fail_start: AtomicBool,
        fail_reset: AtomicBool,
        probe: Mutex<Option<watch::Receiver<RecorderState>>>,
        seen_during_calls: Mutex<Vec<RecorderState>>,
        calls: Mutex<Vec<&'static str>>,
    }

    impl ScriptedDevice {
        fn note(&self, call: &'static str) {
            self.calls.lock().push(call);
            if let Some(probe) = self.probe.lock().as_ref() {
                self.seen_during_calls.lock().push(*probe.borrow());
            }
        }
    }

    #[async_trait]
    impl RecorderDevice for ScriptedDevice {
        async fn start(&self) -> Result<(), SdkError> {
            self.note("start");
            if self.gate_start.load(Ordering::SeqCst) {
                self.gate.notified().await;
            }
            if self.fail_start.load(Ordering::SeqCst) {
                return Err(SdkError::Device("camera busy".into()));
            }
            Ok(())
        }

        async fn reset(&self) -> Result<(), SdkError> {
            self.note("reset");
            if self.fail_reset.load(Ordering::SeqCst) {
                return Err(SdkError::Device("disk full".into()));
            }
            Ok(())
        }

        fn pause(&self) {
            self.note("pause");
        }
        fn stop(&self) {
            self.note("stop");
        }
        fn enter_preview(&self) {
            self.note("enter_preview");
        }
        fn exit_preview(&self) {
            self.note("exit_preview");
        }
        fn toggle_camera(&self) -> CameraDirection {
            self.note("toggle_camera");
            CameraDirection::Back
        }
        fn duration(&self) -> Duration {
            Duration::from_secs(3)
        }
    }

    fn machine() -> (RecorderStateMachine, Arc<ScriptedDevice>, mpsc::UnboundedReceiver<RecorderError>) {
        let device = Arc::new(ScriptedDevice::default());
        let (machine, errors) = RecorderStateMachine::new(device.clone());
        (machine, device, errors)
    }

    #[test]
    fn action_table() {
        use RecorderAction as A;
        use RecorderState as S;

        assert!(S::Idle.allows(A::Start, false));
        assert!(!S::Idle.allows(A::Reset, false));
        assert!(S::Recording.allows(A::Pause, true));
        assert!(S::Recording.allows(A::Stop, true));
        assert!(!S::Recording.allows(A::Stop, false));
        assert!(!S::Recording.allows(A::Start, true));
        assert!(S::Paused.allows(A::Resume, true));
        assert!(!S::Paused.allows(A::Start, true));
        assert!(S::Preview.allows(A::ExitPreview, true));
        assert!(!S::Preview.allows(A::ToggleCamera, true));
        for action in [A::Start, A::Pause, A::Resume, A::Stop, A::Reset, A::ExitPreview, A::Confirm, A::Restart] {
            assert!(!S::Busy.allows(action, true), "{action:?} allowed while busy");
        }
    }

    #[tokio::test]
    async fn start_passes_through_busy_and_blocks_actions() {
        let (machine, device, _errors) = machine();
        device.gate_start.store(true, Ordering::SeqCst);
        let mut states = machine.subscribe_state();

        let task = tokio::spawn({
            let machine = machine.clone();
            async move { machine.start_suspending().await }
        });
        states.wait_for(|s| *s == RecorderState::Busy).await.unwrap();

        assert!(!machine.pause());
        assert!(!machine.enter_preview());
        assert_eq!(machine.start_suspending().await, Ok(false));
        assert_eq!(machine.reset_suspending().await, Ok(false));
        assert_eq!(machine.state(), RecorderState::Busy);

        device.gate.notify_one();
        assert_eq!(task.await.unwrap(), Ok(true));
        assert_eq!(machine.state(), RecorderState::Recording);
        assert!(machine.has_recording());
        assert_eq!(*device.calls.lock(), vec!["start"]);
    }

    #[tokio::test]
    async fn pause_then_resume() {
        let (machine, _device, _errors) = machine();
        machine.start_suspending().await.unwrap();

        assert!(machine.pause());
        assert_eq!(machine.state(), RecorderState::Paused);
        assert_eq!(machine.start_suspending().await, Ok(false));
        assert_eq!(machine.state(), RecorderState::Paused);
        assert_eq!(machine.resume_suspending().await, Ok(true));
        assert_eq!(machine.state(), RecorderState::Recording);
    }

    #[tokio::test]
    async fn failed_reset_reverts_and_reports() {
        let (machine, device, mut errors) = machine();
        machine.start_suspending().await.unwrap();
        let recording = machine.recording();
        device.fail_reset.store(true, Ordering::SeqCst);

        let result = machine.reset_suspending().await;
        let expected = RecorderError::AsyncOperationFailed {
            operation: RecorderOperation::Reset,
            source: SdkError::Device("disk full".into()),
        };
        assert_eq!(result, Err(expected.clone()));
        assert_eq!(machine.state(), RecorderState::Recording);
        assert_eq!(machine.recording(), recording);
        assert_eq!(errors.recv().await, Some(expected));
    }

    #[tokio::test]
    async fn failed_start_returns_to_idle() {
        let (machine, device, mut errors) = machine();
        device.fail_start.store(true, Ordering::SeqCst);

        assert!(machine.start_suspending().await.is_err());
        assert_eq!(machine.state(), RecorderState::Idle);
        assert!(!machine.has_recording());
        assert!(errors.try_recv().is_ok());
    }

    #[tokio::test]
    async fn preview_and_confirm() {
        let (machine, device, _errors) = machine();
        machine.start_suspending().await.unwrap();

        assert!(machine.enter_preview());
        assert_eq!(machine.state(), RecorderState::Preview);
        assert!(!machine.pause());
        assert_eq!(machine.toggle_camera(), None);

        assert!(machine.exit_preview());
        assert_eq!(machine.state(), RecorderState::Paused);
        assert!(machine.enter_preview());

        let finished = machine.confirm().unwrap();
        assert_eq!(finished.duration, Duration::from_secs(3));
        assert_eq!(machine.state(), RecorderState::Idle);
        assert!(!machine.has_recording());
        assert_eq!(
            *device.calls.lock(),
            vec!["start", "enter_preview", "exit_preview", "enter_preview", "stop"]
        );
    }

    #[tokio::test]
    async fn restart_stays_busy_across_both_steps() {
        let (machine, device, _errors) = machine();
        machine.start_suspending().await.unwrap();
        let first = machine.recording().unwrap();
        *device.probe.lock() = Some(machine.subscribe_state());

        assert_eq!(machine.restart_suspending().await, Ok(true));
        assert_eq!(*device.seen_during_calls.lock(), vec![RecorderState::Busy, RecorderState::Busy]);
        assert_eq!(machine.state(), RecorderState::Recording);
        assert_ne!(machine.recording().unwrap().id, first.id);
    }

    #[tokio::test]
    async fn restart_with_failed_start_lands_in_idle() {
        let (machine, device, _errors) = machine();
        machine.start_suspending().await.unwrap();
        machine.pause();
        device.fail_start.store(true, Ordering::SeqCst);

        assert!(machine.restart_suspending().await.is_err());
        assert_eq!(machine.state(), RecorderState::Idle);
        assert!(!machine.has_recording());
    }

    #[tokio::test]
    async fn recording_receiver_follows_start_and_reset() {
        let (machine, _device, _errors) = machine();
        let mut recording = machine.subscribe_recording();
        assert!(recording.borrow_and_update().is_none());

        machine.start().await.unwrap();
        let started = recording.wait_for(Option::is_some).await.unwrap().clone();
        assert_eq!(started, machine.recording());

        machine.reset().await.unwrap();
        recording.wait_for(Option::is_none).await.unwrap();
        assert_eq!(machine.state(), RecorderState::Idle);
    }

    #[tokio::test]
    async fn fire_and_forget_start() {
        let (machine, _device, _errors) = machine();
        machine.start().await.unwrap();
        assert_eq!(machine.state(), RecorderState::Recording);
    }

    #[tokio::test]
    async fn duration_flow_samples_device() {
        use futures::StreamExt;

        let (machine, _device, _errors) = machine();
        let samples: Vec<Duration> = machine.duration_flow(Duration::from_millis(1)).take(2).collect().await;
        assert_eq!(samples, vec![Duration::from_secs(3); 2]);
    }
}
