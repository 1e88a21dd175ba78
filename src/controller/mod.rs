//! Controller module - Application logic and event handling
//!
//! This module contains the application controller that handles user input and
//! coordinates between the model, the SDK collaborators and the view.
//! It is organized into submodules by responsibility:
//!
//! - `input`: Key event handling
//! - `samples`: Opening the samples and loading their content
//! - `recorder_events`: Recorder error and timer listeners

mod input;
mod samples;
mod recorder_events;

use std::sync::Arc;
use tokio::sync::Mutex;

use crate::config::AppConfig;
use crate::model::{AppModel, ContentError, FeedError, RecorderError};
use crate::sdk::{SdkError, VideoService};

#[derive(Clone)]
pub struct AppController {
    pub(crate) model: Arc<Mutex<AppModel>>,
    pub(crate) catalog: Arc<dyn VideoService>,
    pub(crate) config: Arc<AppConfig>,
}

impl AppController {
    pub fn new(model: Arc<Mutex<AppModel>>, catalog: Arc<dyn VideoService>, config: Arc<AppConfig>) -> Self {
        Self { model, catalog, config }
    }

    pub(crate) fn format_error(error: &anyhow::Error) -> String {
        if let Some(e) = error.downcast_ref::<ContentError>() {
            return match e {
                ContentError::NotFound => "Could not find any playable video for the given app token".to_string(),
                ContentError::Sdk(sdk) => Self::format_sdk_error(sdk),
            };
        }
        if let Some(e) = error.downcast_ref::<SdkError>() {
            return Self::format_sdk_error(e);
        }
        if let Some(FeedError::ResourceExhausted { capacity }) = error.downcast_ref::<FeedError>() {
            return format!("All {} players are busy. Scroll back and try again.", capacity);
        }
        if let Some(RecorderError::AsyncOperationFailed { operation, source }) = error.downcast_ref::<RecorderError>() {
            return format!("Could not {} recording: {}", operation, source);
        }
        format!("Error: {}", error)
    }

    fn format_sdk_error(error: &SdkError) -> String {
        match error {
            SdkError::MissingAppToken | SdkError::NotStarted => {
                "Session is not started. Check the app token and restart.".to_string()
            }
            other => format!("Error: {}", other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RecorderOperation;

    #[test]
    fn not_found_has_a_friendly_message() {
        let error = anyhow::Error::from(ContentError::NotFound);
        assert_eq!(
            AppController::format_error(&error),
            "Could not find any playable video for the given app token"
        );
    }

    #[test]
    fn recorder_failures_name_the_operation() {
        let error = anyhow::Error::from(RecorderError::AsyncOperationFailed {
            operation: RecorderOperation::Start,
            source: SdkError::Device("camera busy".into()),
        });
        let message = AppController::format_error(&error);
        assert!(message.contains("camera busy"), "{message}");
    }

    #[test]
    fn unknown_errors_fall_through() {
        let error = anyhow::anyhow!("boom");
        assert_eq!(AppController::format_error(&error), "Error: boom");
    }
}
