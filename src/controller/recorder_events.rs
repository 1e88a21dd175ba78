//! Recorder listeners: error reporting and the running timer

use futures::StreamExt;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;

use crate::model::{format_timer, RecorderError, RecorderStateMachine, Sample};
use super::AppController;

impl AppController {
    /// Spawns the listeners that feed a recorder sample. The sample owns the
    /// returned tasks and aborts them when it closes.
    pub fn start_recorder_event_listener(
        &self,
        machine: RecorderStateMachine,
        mut errors: UnboundedReceiver<RecorderError>,
    ) -> Vec<JoinHandle<()>> {
        tracing::info!("Starting recorder event listener");

        let model = self.model.clone();
        let error_task = tokio::spawn(async move {
            while let Some(error) = errors.recv().await {
                tracing::warn!(error = %error, "Recorder operation failed");
                model.lock().await.set_error(Self::format_error(&error.into()));
            }
            tracing::debug!("Recorder error channel closed");
        });

        let model = self.model.clone();
        let period = self.config.timer_refresh();
        let timer_task = tokio::spawn(async move {
            let mut durations = Box::pin(machine.duration_flow(period));
            while let Some(duration) = durations.next().await {
                let mut model = model.lock().await;
                if let Some(Sample::Recorder(sample)) = model.sample_mut() {
                    sample.timer = format_timer(duration);
                }
            }
        });

        vec![error_task, timer_task]
    }
}
