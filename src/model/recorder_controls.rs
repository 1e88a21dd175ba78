//! Which recorder buttons are shown and enabled for a given state

use std::time::{Duration, Instant};

use super::recorder::RecorderState;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PrimaryButton {
    Record,
    Pause,
    /// Kept in the layout but invisible
    Hidden,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecorderControls {
    pub show_timer: bool,
    pub recording_indicator: bool,
    pub can_delete: bool,
    pub can_restart: bool,
    pub primary: PrimaryButton,
    pub can_toggle_camera: bool,
    pub can_proceed: bool,
    pub proceed_label: &'static str,
}

impl RecorderControls {
    pub fn derive(state: RecorderState, has_recording: bool) -> Self {
        let primary = match state {
            RecorderState::Idle => PrimaryButton::Record,
            RecorderState::Recording => PrimaryButton::Pause,
            RecorderState::Paused | RecorderState::Preview | RecorderState::Busy => PrimaryButton::Hidden,
        };

        Self {
            show_timer: state != RecorderState::Preview && has_recording,
            recording_indicator: state == RecorderState::Recording,
            can_delete: has_recording,
            can_restart: has_recording,
            primary,
            can_toggle_camera: !matches!(state, RecorderState::Busy | RecorderState::Preview),
            can_proceed: state != RecorderState::Busy && has_recording,
            proceed_label: if state == RecorderState::Preview { "Confirm" } else { "Preview" },
        }
    }
}

/// Holds back short Busy blips so quick operations don't flash the UI.
pub struct BusyDebounce {
    delay: Duration,
    shown: RecorderState,
    busy_since: Option<Instant>,
}

impl BusyDebounce {
    /// Starts out showing Busy until the first real state arrives.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            shown: RecorderState::Busy,
            busy_since: None,
        }
    }

    pub fn update(&mut self, actual: RecorderState, now: Instant) -> RecorderState {
        if actual == RecorderState::Busy {
            let since = *self.busy_since.get_or_insert(now);
            if now.saturating_duration_since(since) >= self.delay {
                self.shown = RecorderState::Busy;
            }
        } else {
            self.busy_since = None;
            self.shown = actual;
        }
        self.shown
    }
}

/// `MM:SS`
pub fn format_timer(duration: Duration) -> String {
    let total_seconds = duration.as_secs();
    format!("{:02}:{:02}", total_seconds / 60, total_seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_without_recording() {
        let controls = RecorderControls::derive(RecorderState::Idle, false);
        assert_eq!(controls.primary, PrimaryButton::Record);
        assert!(!controls.show_timer);
        assert!(!controls.can_delete);
        assert!(!controls.can_proceed);
        assert!(controls.can_toggle_camera);
    }

    #[test]
    fn preview_hides_timer_and_confirms() {
        let controls = RecorderControls::derive(RecorderState::Preview, true);
        assert!(!controls.show_timer);
        assert!(!controls.can_toggle_camera);
        assert!(controls.can_proceed);
        assert_eq!(controls.proceed_label, "Confirm");
        assert_eq!(controls.primary, PrimaryButton::Hidden);
    }

    #[test]
    fn busy_blocks_proceed() {
        let controls = RecorderControls::derive(RecorderState::Busy, true);
        assert!(!controls.can_proceed);
        assert!(!controls.can_toggle_camera);
        assert!(controls.show_timer);
    }

    #[test]
    fn busy_shows_only_after_delay() {
        let mut debounce = BusyDebounce::new(Duration::from_millis(400));
        let t0 = Instant::now();

        assert_eq!(debounce.update(RecorderState::Recording, t0), RecorderState::Recording);
        assert_eq!(debounce.update(RecorderState::Busy, t0), RecorderState::Recording);
        assert_eq!(
            debounce.update(RecorderState::Busy, t0 + Duration::from_millis(399)),
            RecorderState::Recording
        );
        assert_eq!(
            debounce.update(RecorderState::Busy, t0 + Duration::from_millis(400)),
            RecorderState::Busy
        );
        assert_eq!(
            debounce.update(RecorderState::Idle, t0 + Duration::from_millis(401)),
            RecorderState::Idle
        );
    }

    #[test]
    fn timer_format() {
        assert_eq!(format_timer(Duration::from_millis(999)), "00:00");
        assert_eq!(format_timer(Duration::from_secs(75)), "01:15");
        assert_eq!(format_timer(Duration::from_secs(3600)), "60:00");
    }
}
