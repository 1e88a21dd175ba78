//! Key event handling

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

use crate::model::{AppModel, FeedError, RecorderState, Sample};
use super::AppController;

impl AppController {
    pub async fn handle_key_event(&self, key: KeyEvent) -> Result<()> {
        if key.kind != KeyEventKind::Press {
            return Ok(());
        }

        let mut model = self.model.lock().await;

        // Handle error message first (blocks all other interactions)
        if model.has_error() {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter) {
                model.clear_error();
            }
            return Ok(());
        }

        // Handle help popup
        if model.is_help_popup_open() {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('h') | KeyCode::Char('H')) {
                model.hide_help_popup();
            }
            return Ok(());
        }

        // Global keybindings
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                model.set_should_quit(true);
                return Ok(());
            }
            KeyCode::Char('h') | KeyCode::Char('H') => {
                model.show_help_popup();
                return Ok(());
            }
            KeyCode::Esc | KeyCode::Backspace if model.sample().is_some() => {
                model.close_sample();
                return Ok(());
            }
            _ => {}
        }

        if model.sample().is_none() {
            return self.handle_menu_key(model, key.code);
        }

        let result = if matches!(model.sample(), Some(Sample::PlayFeed(_))) {
            Self::handle_feed_key(&mut model, key.code)
        } else if matches!(model.sample(), Some(Sample::Recorder(_))) {
            Self::handle_recorder_key(&mut model, key.code);
            Ok(())
        } else {
            if let Some(Sample::PlayVideo(single)) = model.sample_mut() {
                if key.code == KeyCode::Char(' ') {
                    single.toggle();
                }
            }
            Ok(())
        };

        if let Err(e) = result {
            tracing::warn!(error = %e, "Feed action failed");
            model.set_error(Self::format_error(&e.into()));
        }
        Ok(())
    }

    fn handle_menu_key(&self, mut model: tokio::sync::MutexGuard<'_, AppModel>, code: KeyCode) -> Result<()> {
        match code {
            KeyCode::Up | KeyCode::Char('k') => model.menu_move_up(),
            KeyCode::Down | KeyCode::Char('j') => model.menu_move_down(),
            KeyCode::Enter => {
                let entry = model.selected_menu_entry();
                drop(model);
                // Loading runs in the background so the loading message gets drawn
                let controller = self.clone();
                tokio::spawn(async move {
                    controller.open_entry(entry).await;
                });
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_feed_key(model: &mut AppModel, code: KeyCode) -> Result<(), FeedError> {
        let new_clip = match code {
            KeyCode::Char('i') | KeyCode::Char('I') => Some(model.next_clip_id()),
            _ => None,
        };
        let Some(Sample::PlayFeed(feed)) = model.sample_mut() else {
            return Ok(());
        };

        match code {
            KeyCode::Down | KeyCode::Char('j') => feed.focus_next(),
            KeyCode::Up | KeyCode::Char('k') => feed.focus_previous(),
            KeyCode::Char(' ') => {
                feed.toggle();
                Ok(())
            }
            KeyCode::Char('x') | KeyCode::Char('X') => feed.remove_focused(),
            KeyCode::Char('m') | KeyCode::Char('M') => feed.move_focused_to_end(),
            KeyCode::Char('u') | KeyCode::Char('U') => feed.refresh_focused(),
            _ => match new_clip {
                Some(id) => feed.insert_after_focus(id),
                None => Ok(()),
            },
        }
    }

    fn handle_recorder_key(model: &mut AppModel, code: KeyCode) {
        let Some(Sample::Recorder(sample)) = model.sample_mut() else {
            return;
        };
        let machine = &sample.machine;

        match code {
            KeyCode::Char('r') | KeyCode::Char('R') => {
                if machine.state() == RecorderState::Paused {
                    machine.resume();
                } else {
                    machine.start();
                }
            }
            KeyCode::Char('p') | KeyCode::Char('P') => {
                machine.pause();
            }
            // Proceed: preview the clip, then confirm it
            KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Enter => {
                if machine.state() == RecorderState::Preview {
                    if let Some(clip) = machine.confirm() {
                        sample.last_clip = Some(clip);
                    }
                } else {
                    machine.enter_preview();
                }
            }
            // Delete leaves the preview, otherwise discards the recording
            KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Delete => {
                if machine.state() == RecorderState::Preview {
                    machine.exit_preview();
                } else {
                    machine.reset();
                }
            }
            KeyCode::Char('x') | KeyCode::Char('X') => {
                machine.restart();
            }
            KeyCode::Char('c') | KeyCode::Char('C') => {
                if let Some(direction) = machine.toggle_camera() {
                    sample.camera = direction;
                }
            }
            _ => {}
        }
    }
}
