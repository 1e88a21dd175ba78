//! Session bootstrap

use std::sync::Arc;
use parking_lot::RwLock;

use super::SdkError;

#[derive(Clone, Debug)]
struct SessionInfo {
    app_token: String,
    identity: String,
}

/// Process-wide SDK session. Must be started once before any data or playback call.
#[derive(Clone, Default)]
pub struct Sessions {
    current: Arc<RwLock<Option<SessionInfo>>>,
}

impl Sessions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&self, app_token: &str, identity: &str) -> Result<(), SdkError> {
        if app_token.trim().is_empty() {
            return Err(SdkError::MissingAppToken);
        }

        let mut current = self.current.write();
        if let Some(existing) = current.as_ref() {
            tracing::warn!(identity = %existing.identity, "Session already started, ignoring restart");
            return Ok(());
        }

        tracing::info!(identity, token_len = app_token.len(), "SDK session started");
        *current = Some(SessionInfo {
            app_token: app_token.to_string(),
            identity: identity.to_string(),
        });
        Ok(())
    }

    pub fn ensure_started(&self) -> Result<(), SdkError> {
        match self.current.read().as_ref() {
            Some(info) if !info.app_token.is_empty() => Ok(()),
            _ => Err(SdkError::NotStarted),
        }
    }

    pub fn identity(&self) -> Option<String> {
        self.current.read().as_ref().map(|info| info.identity.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_token_fails_fast() {
        let sessions = Sessions::new();
        assert_eq!(sessions.start("  ", "someone"), Err(SdkError::MissingAppToken));
        assert_eq!(sessions.ensure_started(), Err(SdkError::NotStarted));
    }

    #[test]
    fn first_start_wins() {
        let sessions = Sessions::new();
        sessions.start("token", "first").unwrap();
        sessions.start("token", "second").unwrap();
        assert_eq!(sessions.identity().as_deref(), Some("first"));
        assert!(sessions.ensure_started().is_ok());
    }
}
