use super::{Component, ComponentState, SmileBackApp};
use crate::error::Result;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{info, warn};

impl SmileBackApp {
    /// Stop background tasks and release hardware lines
    pub async fn shutdown(&mut self) -> Result<i32> {
        info!("Beginning graceful shutdown");

        self.cancellation_token.cancel();
        // Releases the display sink of a controller that never ran
        self.controller = None;
        self.set_component_state(Component::Controller, ComponentState::Stopping)
            .await;

        let mut exit_code = 0;
        for task in self.tasks.drain(..) {
            let abort = task.abort_handle();
            match timeout(Duration::from_secs(2), task).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) if e.is_cancelled() => {}
                Ok(Err(e)) => {
                    warn!("Background task failed: {}", e);
                    exit_code = 1;
                }
                Err(_) => {
                    warn!("Background task did not stop in time, aborting");
                    abort.abort();
                }
            }
        }
        self.set_component_state(Component::Controller, ComponentState::Stopped)
            .await;

        // Dropping the input stops its edge watcher; LED goes back to idle
        self.motion_line = None;
        if let Some(led) = self.led_line.take() {
            if let Err(e) = led.write(crate::gpio::Level::High) {
                warn!("Failed to reset LED: {}", e);
            }
        }

        info!("Graceful shutdown completed with exit code: {}", exit_code);
        Ok(exit_code)
    }
}
