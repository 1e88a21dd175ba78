//! Opening the samples and loading their content

use std::sync::Arc;

use crate::model::{
    ContentError, FeedSession, MenuEntry, RecorderSample, RecorderStateMachine, Sample, SingleVideo,
};
use crate::sdk::{FilteredPlaylistSpec, FilteredVideosRequest, SimulatedPlayerDevice, SimulatedRecorder, VideoItem};
use super::AppController;

const LOADING_VIDEO: &str = "Loading latest video...";
const LOADING_PLAYLIST: &str = "Loading playlist with latest videos...";

impl AppController {
    pub async fn open_entry(&self, entry: MenuEntry) {
        match entry {
            MenuEntry::Recorder => self.open_recorder().await,
            MenuEntry::SingleVideo => self.open_video_player().await,
            MenuEntry::Feed => self.open_video_playlist().await,
        }
    }

    pub async fn open_recorder(&self) {
        let device = Arc::new(SimulatedRecorder::new(self.config.recorder_start_latency()));
        let (machine, errors) = RecorderStateMachine::new(device);
        let mut sample = RecorderSample::new(machine.clone(), self.config.busy_debounce());

        for task in self.start_recorder_event_listener(machine, errors) {
            sample.attach_listener(task);
        }

        self.model.lock().await.open_sample(Sample::Recorder(sample));
    }

    /// Plays the newest video in a single player.
    pub async fn open_video_player(&self) {
        self.model.lock().await.set_message(LOADING_VIDEO);

        let request = FilteredVideosRequest {
            limit: Some(1),
            ..Default::default()
        };
        let result = match self.catalog.get_list(&request).await {
            Ok(videos) => videos.into_iter().next().ok_or(ContentError::NotFound),
            Err(e) => Err(ContentError::from(e)),
        };

        let video = match result {
            Ok(video) => video,
            Err(e) => {
                self.report_content_error(e).await;
                return;
            }
        };

        let mut model = self.model.lock().await;
        tracing::info!(video = %video.id, title = %video.title, "Latest video loaded");
        model.remember_title(video.id.clone(), video.title.clone());
        match SingleVideo::new(video, SimulatedPlayerDevice::new()) {
            Ok(single) => model.open_sample(Sample::PlayVideo(single)),
            Err(e) => {
                model.clear_message();
                model.set_error(Self::format_error(&e.into()));
            }
        }
    }

    /// Opens the recycling feed over the newest videos.
    pub async fn open_video_playlist(&self) {
        self.model.lock().await.set_message(LOADING_PLAYLIST);

        let playlist = match self.catalog.load_playlist(&FilteredPlaylistSpec::default()).await {
            Ok(playlist) if playlist.is_empty() => Err(ContentError::NotFound),
            Ok(playlist) => Ok(playlist),
            Err(e) => Err(ContentError::from(e)),
        };
        let playlist = match playlist {
            Ok(playlist) => playlist,
            Err(e) => {
                self.report_content_error(e).await;
                return;
            }
        };

        let mut titles: Vec<VideoItem> = Vec::with_capacity(playlist.len());
        for id in playlist.ids() {
            if let Some(video) = self.catalog.video(id).await {
                titles.push(video);
            }
        }

        tracing::info!(size = playlist.len(), "Playlist loaded");
        let session = FeedSession::new(
            playlist,
            SimulatedPlayerDevice::new(),
            self.config.pool_capacity(),
            self.config.offscreen_limit,
        );

        let mut model = self.model.lock().await;
        for video in titles {
            model.remember_title(video.id, video.title);
        }
        model.open_sample(Sample::PlayFeed(session));
    }

    async fn report_content_error(&self, error: ContentError) {
        tracing::warn!(error = %error, "Content load failed");
        let mut model = self.model.lock().await;
        match error {
            ContentError::NotFound => model.set_message(error.to_string()),
            ContentError::Sdk(_) => model.clear_message(),
        }
        model.set_error(Self::format_error(&error.into()));
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::sync::Mutex;

    use super::*;
    use crate::config::AppConfig;
    use crate::model::AppModel;
    use crate::sdk::{DemoCatalog, Sessions};

    fn controller(catalog_size: usize, started: bool) -> AppController {
        let sessions = Sessions::new();
        if started {
            sessions.start("token", "tester").unwrap();
        }
        let catalog = DemoCatalog::new(sessions, catalog_size).with_latency(Duration::ZERO);
        let config = AppConfig {
            recorder_start_latency_ms: 0,
            ..AppConfig::default()
        };
        AppController::new(
            Arc::new(Mutex::new(AppModel::new("tester".into()))),
            Arc::new(catalog),
            Arc::new(config),
        )
    }

    #[tokio::test]
    async fn single_video_plays_latest() {
        let controller = controller(4, true);
        controller.open_video_player().await;

        let model = controller.model.lock().await;
        match model.sample() {
            Some(Sample::PlayVideo(single)) => {
                assert_eq!(single.video.id, "clip-01");
                assert!(single.is_playing());
            }
            _ => panic!("single video sample not opened"),
        }
        assert!(model.ui_state().message.is_none());
    }

    #[tokio::test]
    async fn empty_catalog_reports_not_found() {
        let controller = controller(0, true);
        controller.open_video_playlist().await;

        let model = controller.model.lock().await;
        assert!(model.sample().is_none());
        assert_eq!(
            model.ui_state().message.as_deref(),
            Some("Could not find any playable video for the given app token")
        );
        assert!(model.has_error());
    }

    #[tokio::test]
    async fn feed_opens_focused_on_first() {
        let controller = controller(6, true);
        controller.open_video_playlist().await;

        let model = controller.model.lock().await;
        let Some(Sample::PlayFeed(session)) = model.sample() else {
            panic!("feed sample not opened");
        };
        assert_eq!(session.controller().active_index(), Some(0));
        assert_eq!(session.playlist().len(), 6);
        assert!(model.video_title("clip-01").is_some());
    }

    #[tokio::test]
    async fn missing_session_surfaces_error() {
        let controller = controller(3, false);
        controller.open_video_player().await;

        let model = controller.model.lock().await;
        assert!(model.sample().is_none());
        assert!(model.ui_state().message.is_none());
        assert!(model.has_error());
    }

    #[tokio::test]
    async fn recorder_opens_idle() {
        let controller = controller(1, true);
        controller.open_recorder().await;

        let model = controller.model.lock().await;
        let Some(Sample::Recorder(sample)) = model.sample() else {
            panic!("recorder sample not opened");
        };
        assert!(!sample.machine.has_recording());
    }
}
