//! Error types for the feed, recorder and content loading

use thiserror::Error;

use crate::sdk::SdkError;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FeedError {
    /// Index outside the playlist bounds
    #[error("index {index} out of range for playlist of {len}")]
    OutOfRange { index: usize, len: usize },

    /// The pool has no free handle and is at capacity
    #[error("player pool exhausted ({capacity} live handles)")]
    ResourceExhausted { capacity: usize },

    /// Playlist ids must be unique
    #[error("video {0} is already in the playlist")]
    DuplicateId(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecorderOperation {
    Start,
    Resume,
    Reset,
    Restart,
}

impl std::fmt::Display for RecorderOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RecorderOperation::Start => "start",
            RecorderOperation::Resume => "resume",
            RecorderOperation::Reset => "reset",
            RecorderOperation::Restart => "restart",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RecorderError {
    #[error("recorder {operation} failed: {source}")]
    AsyncOperationFailed {
        operation: RecorderOperation,
        source: SdkError,
    },
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ContentError {
    #[error("Could not find any playable video for the given app token")]
    NotFound,
    #[error(transparent)]
    Sdk(#[from] SdkError),
}
